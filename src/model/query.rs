//! Topology queries: common ancestors, path distances, farthest nodes and
//! the midpoint outgroup.
//!
//! All searches walk parent links or use the stack-based iterators, so
//! their stack usage does not depend on the depth of the tree.

use crate::model::error::{StructureError, TreeError};
use crate::model::tree::{NodeIndex, Tree};
use std::collections::{HashMap, HashSet};

impl Tree {
    /// Returns the lowest node that is an ancestor-or-self of `index` and of
    /// every node in `targets`.
    ///
    /// Walks up from `index`, each step covering the subtrees of the sibling
    /// branches not yet visited, and stops at the first node whose covered
    /// set contains all targets.
    ///
    /// # Errors
    /// [StructureError::Disconnected] if a target is not in the structure of `index`.
    pub fn get_common_ancestor(
        &self,
        index: NodeIndex,
        targets: &[NodeIndex],
    ) -> Result<NodeIndex, TreeError> {
        let mut pending: HashSet<NodeIndex> = targets.iter().copied().collect();
        let mut current = index;
        let mut prev: Option<NodeIndex> = None;

        loop {
            pending.remove(&current);
            for &child in self[current].children() {
                if Some(child) == prev {
                    continue;
                }
                for covered in self.subtree_indices(child) {
                    pending.remove(&covered);
                }
            }

            if pending.is_empty() {
                return Ok(current);
            }

            prev = Some(current);
            match self[current].parent() {
                Some(parent) => current = parent,
                None => {
                    let missing = targets
                        .iter()
                        .copied()
                        .find(|t| pending.contains(t))
                        .unwrap_or(current);
                    return Err(StructureError::Disconnected(index, missing).into());
                }
            }
        }
    }

    /// Returns the sum of branch lengths on the path between two nodes.
    ///
    /// # Errors
    /// [StructureError::Disconnected] if the nodes are not connected.
    pub fn get_distance(&self, a: NodeIndex, b: NodeIndex) -> Result<f64, TreeError> {
        self.path_length(a, b, false)
    }

    /// Returns the number of edges on the path between two nodes.
    ///
    /// # Errors
    /// [StructureError::Disconnected] if the nodes are not connected.
    pub fn get_topological_distance(&self, a: NodeIndex, b: NodeIndex) -> Result<usize, TreeError> {
        Ok(self.path_length(a, b, true)? as usize)
    }

    /// Returns the farthest leaf under `index` and the distance to it.
    ///
    /// With `topology_only`, every edge counts as 1 instead of its `dist`.
    /// Ties go to the leaf encountered first in child order; a leaf returns
    /// itself at distance 0.
    pub fn get_farthest_leaf(&self, index: NodeIndex, topology_only: bool) -> (NodeIndex, f64) {
        // Farthest leaf below each finished node, consumed by its parent
        let mut best: HashMap<NodeIndex, (NodeIndex, f64)> = HashMap::new();

        for node in self.post_order_iter(index) {
            if node.is_leaf() {
                best.insert(node.index(), (node.index(), 0.0));
                continue;
            }

            let mut champion: Option<(NodeIndex, f64)> = None;
            for &child in node.children() {
                if let Some((leaf, below)) = best.remove(&child) {
                    let dist = below + self.edge_length(child, topology_only);
                    if champion.is_none_or(|(_, d)| dist > d) {
                        champion = Some((leaf, dist));
                    }
                }
            }
            if let Some(champion) = champion {
                best.insert(node.index(), champion);
            }
        }

        best.remove(&index).unwrap_or((index, 0.0))
    }

    /// Returns the node farthest from `index` anywhere in its structure,
    /// together with the distance to it.
    ///
    /// Considers the subtree below `index` first, then climbs the ancestors,
    /// checking each ancestor and the subtrees hanging off the path.
    pub fn get_farthest_node(&self, index: NodeIndex, topology_only: bool) -> (NodeIndex, f64) {
        let (mut farthest, mut farthest_dist) = self.get_farthest_leaf(index, topology_only);

        let mut prev = index;
        let mut climbed = self.edge_length(prev, topology_only);
        let mut current = self[prev].parent();

        while let Some(ancestor) = current {
            if climbed > farthest_dist {
                farthest = ancestor;
                farthest_dist = climbed;
            }

            for &child in self[ancestor].children() {
                if child == prev {
                    continue;
                }
                let (leaf, below) = self.get_farthest_leaf(child, topology_only);
                let dist = climbed + self.edge_length(child, topology_only) + below;
                if dist > farthest_dist {
                    farthest = leaf;
                    farthest_dist = dist;
                }
            }

            prev = ancestor;
            current = self[ancestor].parent();
            if current.is_some() {
                climbed += self.edge_length(prev, topology_only);
            }
        }

        (farthest, farthest_dist)
    }

    /// Returns the node whose branch contains the midpoint of the longest
    /// leaf-to-node path of the structure, for use with [Tree::set_outgroup].
    ///
    /// Takes the farthest leaf `A` from the absolute root and the farthest
    /// node `B` from `A`, then climbs from `A` until the accumulated branch
    /// length exceeds half of `dist(A, B)`. Returns the root if the threshold
    /// is never crossed.
    pub fn get_midpoint_outgroup(&self, index: NodeIndex) -> NodeIndex {
        let root = self.get_tree_root(index);
        let (a, _) = self.get_farthest_leaf(root, false);
        let (_, a_to_b) = self.get_farthest_node(a, false);
        let half = a_to_b / 2.0;

        let mut climbed = 0.0;
        let mut current = a;
        while let Some(parent) = self[current].parent() {
            climbed += self[current].dist();
            if climbed > half {
                return current;
            }
            current = parent;
        }
        current
    }

    /// Weight of the branch above `index`.
    pub(crate) fn edge_length(&self, index: NodeIndex, topology_only: bool) -> f64 {
        if topology_only {
            1.0
        } else {
            self[index].dist()
        }
    }

    fn path_length(&self, a: NodeIndex, b: NodeIndex, topology_only: bool) -> Result<f64, TreeError> {
        let ancestor = self.get_common_ancestor(a, &[b])?;
        let mut total = 0.0;
        for start in [a, b] {
            let mut current = start;
            while current != ancestor {
                total += self.edge_length(current, topology_only);
                match self[current].parent() {
                    Some(parent) => current = parent,
                    None => return Err(StructureError::Disconnected(a, b).into()),
                }
            }
        }
        Ok(total)
    }
}
