//! Random topology growth, mainly for generating test trees.

use crate::model::error::TreeError;
use crate::model::feature::DEFAULT_NAME;
use crate::model::tree::{ChildSpec, NodeIndex, Tree};
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use tracing::{debug, trace};

/// Characters random leaf names are drawn from
const NAME_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
/// Length of random leaf names
const NAME_LENGTH: usize = 5;

impl Tree {
    /// Adds `size` new leaves with random names and branch lengths below `index`.
    ///
    /// See [Tree::populate_with_rng]; this variant uses the thread-local RNG.
    pub fn populate(&mut self, index: NodeIndex, size: usize) -> Result<Vec<NodeIndex>, TreeError> {
        self.populate_with_rng(index, size, &mut rand::thread_rng())
    }

    /// Adds `size` new leaves with random names and branch lengths below
    /// `index`, using the given random number generator.
    ///
    /// A node without children first receives two new leaves (one if
    /// `size == 1`). Afterwards a uniformly chosen leaf under `index`, old or
    /// new, is split into two new leaves until `size` leaves were added, so no
    /// single-child node is left behind. Splitting an old leaf adds two leaves
    /// at once; when only one is missing, only leaves created by this call are
    /// candidates. Collapsed nodes are never split. Names consist of five
    /// distinct lowercase letters and branch lengths are drawn uniformly from
    /// `[0, 1)`.
    ///
    /// # Returns
    /// The leaves added by this call, in pre-order.
    pub fn populate_with_rng<R: Rng + ?Sized>(
        &mut self,
        index: NodeIndex,
        size: usize,
        rng: &mut R,
    ) -> Result<Vec<NodeIndex>, TreeError> {
        debug!(node = index, size, "populating");
        if size == 0 {
            return Ok(Vec::new());
        }

        let mut added: HashSet<NodeIndex> = HashSet::with_capacity(size);
        if self[index].num_children() == 0 {
            for _ in 0..size.min(2) {
                added.insert(self.add_random_leaf(index, rng)?);
            }
        }

        while added.len() < size {
            let missing = size - added.len();
            let candidates: Vec<NodeIndex> = self
                .iter_leaves(index)
                .filter(|leaf| leaf.num_children() == 0 && leaf.index() != index)
                .map(|leaf| leaf.index())
                .filter(|leaf| missing > 1 || added.contains(leaf))
                .collect();

            let Some(&target) = candidates.choose(rng) else {
                // Only old leaves to split but a single leaf missing
                added.insert(self.add_random_leaf(index, rng)?);
                continue;
            };

            if added.remove(&target) {
                self[target].set_name(DEFAULT_NAME);
            }
            trace!(node = target, "splitting leaf");
            added.insert(self.add_random_leaf(target, rng)?);
            added.insert(self.add_random_leaf(target, rng)?);
        }

        Ok(self
            .get_leaves(index)
            .into_iter()
            .filter(|leaf| added.contains(leaf))
            .collect())
    }

    fn add_random_leaf<R: Rng + ?Sized>(&mut self, parent: NodeIndex, rng: &mut R) -> Result<NodeIndex, TreeError> {
        let name: String = NAME_CHARSET
            .choose_multiple(rng, NAME_LENGTH)
            .map(|&b| b as char)
            .collect();
        let dist = rng.gen_range(0.0..1.0);
        self.add_child(parent, ChildSpec::new().with_name(name).with_dist(dist))
    }
}
