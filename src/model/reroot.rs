//! Rerooting (outgroup reassignment) and unrooting.
//!
//! [Tree::set_outgroup] runs in three steps, each leaving the arena in a
//! state whose links can be checked on their own:
//! 1. detach the branch leading to the outgroup from the root and gather the
//!    root's remaining children behind a single connector,
//! 2. reverse the parent/child direction along the path from the outgroup's
//!    parent up to that branch, moving each branch length (and support) to
//!    the node that now sits below the edge,
//! 3. hang the outgroup and its former parent (or the connector) below the
//!    root and split their combined branch length evenly.

use crate::model::error::{StructureError, TreeError};
use crate::model::tree::{NodeIndex, Tree};
use tracing::{debug, trace, warn};

impl Tree {
    /// Reroots the structure under `root` so that `outgroup` becomes one of
    /// the two children of `root`.
    ///
    /// Every branch keeps its length; branches on the path from the old root
    /// to `outgroup` are re-oriented. If `root` had more than two children,
    /// the ones not leading to `outgroup` are merged below a new connector
    /// node with a zero-length branch. Setting `root` itself as outgroup does
    /// nothing.
    ///
    /// # Errors
    /// [StructureError::NotADescendant] if `outgroup` is not below `root`.
    ///
    /// # Example
    /// ```
    /// use phylonode::model::Tree;
    ///
    /// let mut tree = Tree::from_newick("((A:1,B:1):1,(C:1,D:1):1);").unwrap();
    /// let root = tree.root_index();
    /// let c = tree.get_leaves_by_name(root, "C")[0];
    /// tree.set_outgroup(root, c).unwrap();
    /// assert_eq!(tree.children(root)[0], c);
    /// assert_eq!(tree[c].dist(), 0.5);
    /// ```
    pub fn set_outgroup(&mut self, root: NodeIndex, outgroup: NodeIndex) -> Result<(), TreeError> {
        if outgroup == root {
            return Ok(());
        }

        let branch = self.branch_towards(root, outgroup)?;
        let outgroup_parent = self[outgroup]
            .parent()
            .ok_or(StructureError::NoParent(outgroup))?;
        debug!(root, outgroup, branch, "setting outgroup");

        let connector = self.detach_target_branch(root, branch);

        let partner = if outgroup_parent == root {
            match connector {
                Some(connector) => connector,
                None => {
                    // Outgroup was the only child; nothing to balance
                    self.link(root, outgroup);
                    return Ok(());
                }
            }
        } else {
            self.reverse_ancestor_chain(outgroup_parent, branch, connector)?;
            self.unlink(outgroup_parent, outgroup);
            let support = self[outgroup].support();
            let partner = &mut self[outgroup_parent];
            partner.set_dist_unchecked(0.0);
            partner.set_support_unchecked(support);
            outgroup_parent
        };

        self.attach_rerooted_pair(root, outgroup, partner);
        debug_assert!(self.is_valid(), "rerooting left inconsistent links");
        Ok(())
    }

    /// Unroots the node by deleting one of its two children, preferring the
    /// first non-leaf child, so that the node ends up with three or more
    /// children. Nodes without exactly two children are left unchanged.
    ///
    /// The deleted child's branch length is dropped, as with [Tree::delete].
    ///
    /// # Errors
    /// [StructureError::CannotUnrootTwoLeaves] if both children are leaves.
    pub fn unroot(&mut self, index: NodeIndex) -> Result<(), TreeError> {
        if !self.is_root(index) {
            warn!(node = index, "unrooting an internal node");
        }

        let children = self[index].children().to_vec();
        if let [first, second] = children[..] {
            let target = if !self.is_leaf(first) {
                first
            } else if !self.is_leaf(second) {
                second
            } else {
                return Err(StructureError::CannotUnrootTwoLeaves.into());
            };
            debug!(node = index, deleted = target, "unrooting");
            self.delete(target)?;
        }

        Ok(())
    }

    // ------------------------------------------------------------------------
    // Rerooting steps
    // ------------------------------------------------------------------------
    /// Child of `root` on the path down to `node`.
    fn branch_towards(&self, root: NodeIndex, node: NodeIndex) -> Result<NodeIndex, TreeError> {
        let mut current = node;
        loop {
            match self[current].parent() {
                Some(parent) if parent == root => return Ok(current),
                Some(parent) => current = parent,
                None => {
                    return Err(StructureError::NotADescendant {
                        ancestor: root,
                        node,
                    }
                    .into());
                }
            }
        }
    }

    /// Empties the children of `root` and returns the node standing in for
    /// all children except `branch`: nothing if there are none, the child
    /// itself if there is one, otherwise a new connector holding them.
    ///
    /// Parent pointers of `branch` and of a single remaining child still
    /// name `root` afterwards; later steps overwrite them.
    fn detach_target_branch(&mut self, root: NodeIndex, branch: NodeIndex) -> Option<NodeIndex> {
        let mut others = std::mem::take(self[root].children_mut());
        others.retain(|&c| c != branch);

        match others.len() {
            0 => None,
            1 => Some(others[0]),
            _ => {
                let connector = self.new_node();
                self[connector].set_dist_unchecked(0.0);
                for child in others {
                    self.link(connector, child);
                }
                Some(connector)
            }
        }
    }

    /// Reverses the edges on the path from `start` up to `branch`, then hangs
    /// `connector` below `branch` with the length of the old root edge added
    /// and its support.
    fn reverse_ancestor_chain(
        &mut self,
        start: NodeIndex,
        branch: NodeIndex,
        connector: Option<NodeIndex>,
    ) -> Result<(), TreeError> {
        let mut node = start;
        let mut new_parent: Option<NodeIndex> = None;
        let mut carried = (self[start].dist(), self[start].support());

        while node != branch {
            let up = self[node].parent().ok_or(StructureError::NoParent(node))?;

            // `up` becomes a child of `node`
            if let Some(position) = self.child_position(up, node) {
                self[up].children_mut().remove(position);
            }
            self[node].children_mut().push(up);

            let previous = (self[up].dist(), self[up].support());
            self[up].set_dist_unchecked(carried.0);
            self[up].set_support_unchecked(carried.1);
            carried = previous;

            self[node].set_parent(new_parent);
            trace!(node, new_child = up, "reversed edge");

            new_parent = Some(node);
            node = up;
        }

        // The connector's edge is the old root edge of `branch`
        if let Some(connector) = connector {
            self.link(branch, connector);
            let merged = self[connector].dist() + carried.0;
            self[connector].set_dist_unchecked(merged);
            self[connector].set_support_unchecked(carried.1);
        }
        self[branch].set_parent(new_parent);

        Ok(())
    }

    /// Makes `outgroup` and `partner` the children of `root`, splitting their
    /// combined branch length evenly.
    fn attach_rerooted_pair(&mut self, root: NodeIndex, outgroup: NodeIndex, partner: NodeIndex) {
        self[root].children_mut().clear();
        self.link(root, outgroup);
        self.link(root, partner);

        let half = (self[outgroup].dist() + self[partner].dist()) / 2.0;
        self[outgroup].set_dist_unchecked(half);
        self[partner].set_dist_unchecked(half);
    }
}
