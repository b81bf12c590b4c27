//! Leaf-set pruning.

use crate::model::error::{StructureError, TreeError};
use crate::model::tree::{NodeIndex, Tree};
use std::collections::HashSet;
use tracing::debug;

/// Whether [Tree::prune] keeps or removes the selected leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PruneMethod {
    /// Remove every leaf that is not selected
    #[default]
    Keep,
    /// Remove every selected leaf
    Crop,
}

/// Refers to leaves either by name or by index.
///
/// A name selects every leaf carrying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// All leaves with this name
    Name(String),
    /// The node at this index
    Node(NodeIndex),
}

impl From<&str> for Selector {
    fn from(name: &str) -> Self {
        Selector::Name(name.to_string())
    }
}

impl From<String> for Selector {
    fn from(name: String) -> Self {
        Selector::Name(name)
    }
}

impl From<NodeIndex> for Selector {
    fn from(index: NodeIndex) -> Self {
        Selector::Node(index)
    }
}

impl Tree {
    /// Prunes the subtree under `index` down to a consistent topology.
    ///
    /// With [PruneMethod::Keep] every leaf not selected is removed, with
    /// [PruneMethod::Crop] every selected leaf is removed. After a leaf is
    /// removed, each ancestor left with a single child is deleted in turn
    /// (its child moves up), stopping at `index`, which is never removed.
    ///
    /// # Returns
    /// The removed leaves, in pre-order. They stay in the arena detached.
    /// If `index` is a leaf itself, nothing is removed.
    ///
    /// # Errors
    /// * [StructureError::LeavesNotInTree] if a selected node is not a leaf under `index`
    /// * [StructureError::UnknownLeafName] if a name matches no leaf under `index`
    ///
    /// Validation happens before any change; a later failure may leave the
    /// tree partially pruned.
    ///
    /// # Example
    /// ```
    /// use phylonode::model::{PruneMethod, Tree};
    ///
    /// let mut tree = Tree::from_newick("(((A,B),C),(D,E));").unwrap();
    /// let root = tree.root_index();
    /// tree.prune(root, ["A", "D"], PruneMethod::Keep).unwrap();
    /// assert_eq!(tree.get_leaf_names(root), vec!["A", "D"]);
    /// ```
    pub fn prune<I>(&mut self, index: NodeIndex, selectors: I, method: PruneMethod) -> Result<Vec<NodeIndex>, TreeError>
    where
        I: IntoIterator,
        I::Item: Into<Selector>,
    {
        let leaves = self.get_leaves(index);
        let selected = self.resolve_selectors(index, &leaves, selectors)?;

        // A leaf anchor is never removed, so it is never reported either
        let to_remove: Vec<NodeIndex> = leaves
            .into_iter()
            .filter(|&leaf| leaf != index)
            .filter(|leaf| match method {
                PruneMethod::Keep => !selected.contains(leaf),
                PruneMethod::Crop => selected.contains(leaf),
            })
            .collect();

        debug!(node = index, ?method, removing = to_remove.len(), "pruning");

        for &leaf in &to_remove {
            let mut current = self[leaf].parent();
            self.detach(leaf);

            // Collapse ancestors left with a single child
            while let Some(c) = current {
                if c == index || self[c].num_children() != 1 {
                    break;
                }
                current = self[c].parent();
                self.delete(c)?;
            }
        }

        Ok(to_remove)
    }

    fn resolve_selectors<I>(
        &self,
        index: NodeIndex,
        leaves: &[NodeIndex],
        selectors: I,
    ) -> Result<HashSet<NodeIndex>, TreeError>
    where
        I: IntoIterator,
        I::Item: Into<Selector>,
    {
        let leaf_set: HashSet<NodeIndex> = leaves.iter().copied().collect();
        let mut selected = HashSet::new();
        let mut strangers = Vec::new();

        for selector in selectors {
            match selector.into() {
                Selector::Name(name) => {
                    let matches = self.get_leaves_by_name(index, &name);
                    if matches.is_empty() {
                        return Err(StructureError::UnknownLeafName(name).into());
                    }
                    selected.extend(matches);
                }
                Selector::Node(node) => {
                    if leaf_set.contains(&node) {
                        selected.insert(node);
                    } else {
                        strangers.push(node);
                    }
                }
            }
        }

        if !strangers.is_empty() {
            return Err(StructureError::LeavesNotInTree(strangers).into());
        }
        Ok(selected)
    }
}
