//! Traversal of the subtree below a node.
//!
//! Both strategies are stack-based, so deep trees do not exhaust the call
//! stack, and both visit children in their stored left-to-right order.
//! Collapsed nodes are treated as leaves: their children are not visited.

use crate::model::node::Node;
use crate::model::tree::{NodeIndex, Tree};

/// Order in which [Tree::traverse] visits a subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Parents before children
    #[default]
    PreOrder,
    /// Children before parents
    PostOrder,
}

// =$========================================================================$=
// TRAVERSAL API
// =$========================================================================$=
impl Tree {
    /// Returns an iterator over the subtree under `start` (inclusive)
    /// using the given [Strategy].
    pub fn traverse(&self, start: NodeIndex, strategy: Strategy) -> Traversal<'_> {
        match strategy {
            Strategy::PreOrder => Traversal::PreOrder(self.pre_order_iter(start)),
            Strategy::PostOrder => Traversal::PostOrder(self.post_order_iter(start)),
        }
    }

    /// Returns an iterator over the subtree in pre-order (parents before children).
    ///
    /// # Example
    /// ```
    /// use phylonode::model::{ChildSpec, Tree};
    ///
    /// let mut tree = Tree::new();
    /// let root = tree.root_index();
    /// let a = tree.add_child(root, ChildSpec::new().with_name("A")).unwrap();
    /// let b = tree.add_child(root, ChildSpec::new().with_name("B")).unwrap();
    ///
    /// let order: Vec<_> = tree.pre_order_iter(root).map(|n| n.index()).collect();
    /// assert_eq!(order, vec![root, a, b]);
    /// ```
    pub fn pre_order_iter(&self, start: NodeIndex) -> PreOrderIter<'_> {
        PreOrderIter::new(self, start, false)
    }

    /// Returns an iterator over the subtree in post-order (children before parents).
    ///
    /// # Example
    /// ```
    /// use phylonode::model::{ChildSpec, Tree};
    ///
    /// let mut tree = Tree::new();
    /// let root = tree.root_index();
    /// let a = tree.add_child(root, ChildSpec::new().with_name("A")).unwrap();
    /// let b = tree.add_child(root, ChildSpec::new().with_name("B")).unwrap();
    ///
    /// let order: Vec<_> = tree.post_order_iter(root).map(|n| n.index()).collect();
    /// assert_eq!(order, vec![a, b, root]);
    /// ```
    pub fn post_order_iter(&self, start: NodeIndex) -> PostOrderIter<'_> {
        PostOrderIter::new(self, start)
    }

    /// Returns an iterator over all nodes below `start`, excluding `start`.
    pub fn iter_descendants(
        &self,
        start: NodeIndex,
        strategy: Strategy,
    ) -> impl Iterator<Item = &Node> + '_ {
        self.traverse(start, strategy)
            .filter(move |n| n.index() != start)
    }

    /// Returns the indices of all nodes below `start` in pre-order.
    pub fn get_descendants(&self, start: NodeIndex) -> Vec<NodeIndex> {
        self.iter_descendants(start, Strategy::PreOrder)
            .map(Node::index)
            .collect()
    }

    /// Returns an iterator over the leaves under `start` in pre-order.
    pub fn iter_leaves(&self, start: NodeIndex) -> impl Iterator<Item = &Node> + '_ {
        self.pre_order_iter(start).filter(|n| n.is_leaf())
    }

    /// Returns the indices of the leaves under `start` in pre-order.
    pub fn get_leaves(&self, start: NodeIndex) -> Vec<NodeIndex> {
        self.iter_leaves(start).map(Node::index).collect()
    }

    /// Returns an iterator over the names of the leaves under `start`.
    pub fn iter_leaf_names(&self, start: NodeIndex) -> impl Iterator<Item = &str> + '_ {
        self.iter_leaves(start).map(Node::name)
    }

    /// Returns the names of the leaves under `start` in pre-order.
    pub fn get_leaf_names(&self, start: NodeIndex) -> Vec<&str> {
        self.iter_leaf_names(start).collect()
    }

    /// Returns all nodes under `start` (inclusive) with the given name.
    pub fn get_descendants_by_name(&self, start: NodeIndex, name: &str) -> Vec<NodeIndex> {
        self.pre_order_iter(start)
            .filter(|n| n.name() == name)
            .map(Node::index)
            .collect()
    }

    /// Returns all leaves under `start` with the given name.
    pub fn get_leaves_by_name(&self, start: NodeIndex, name: &str) -> Vec<NodeIndex> {
        self.iter_leaves(start)
            .filter(|n| n.name() == name)
            .map(Node::index)
            .collect()
    }

    /// Returns the number of leaves under `start`; 1 for a leaf.
    pub fn num_leaves(&self, start: NodeIndex) -> usize {
        self.iter_leaves(start).count()
    }

    /// Returns whether a proper descendant of `start` is the given node.
    pub fn contains_node(&self, start: NodeIndex, index: NodeIndex) -> bool {
        self.iter_descendants(start, Strategy::PreOrder)
            .any(|n| n.index() == index)
    }

    /// Returns whether a proper descendant of `start` carries the given name.
    pub fn contains_name(&self, start: NodeIndex, name: &str) -> bool {
        self.iter_descendants(start, Strategy::PreOrder)
            .any(|n| n.name() == name)
    }

    /// Indices of the whole subtree under `start` in pre-order,
    /// descending into collapsed nodes.
    pub(crate) fn subtree_indices(&self, start: NodeIndex) -> Vec<NodeIndex> {
        PreOrderIter::new(self, start, true)
            .map(Node::index)
            .collect()
    }
}

// =$========================================================================$=
// ITERATORS
// =$========================================================================$=
/// Iterator returned by [Tree::traverse].
pub enum Traversal<'a> {
    /// Pre-order traversal
    PreOrder(PreOrderIter<'a>),
    /// Post-order traversal
    PostOrder(PostOrderIter<'a>),
}

impl<'a> Iterator for Traversal<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Traversal::PreOrder(iter) => iter.next(),
            Traversal::PostOrder(iter) => iter.next(),
        }
    }
}

/// Iterator for pre-order traversal (parents before children).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
/// Each node is visited before any of its descendants.
pub struct PreOrderIter<'a> {
    tree: &'a Tree,
    stack: Vec<NodeIndex>,
    descend_collapsed: bool,
}

impl<'a> PreOrderIter<'a> {
    fn new(tree: &'a Tree, start: NodeIndex, descend_collapsed: bool) -> Self {
        PreOrderIter {
            tree,
            stack: vec![start],
            descend_collapsed,
        }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let node = &self.tree[index];

        // Push children in reverse, so leftmost is processed first
        if self.descend_collapsed || !node.is_collapsed() {
            self.stack.extend(node.children().iter().rev());
        }

        Some(node)
    }
}

/// Iterator for post-order traversal (children before parents).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
/// Each node is visited after all its descendants have been visited, and
/// the visited marker on the stack ensures no node is expanded twice.
pub struct PostOrderIter<'a> {
    tree: &'a Tree,
    stack: Vec<(NodeIndex, bool)>, // (index, children_visited)
}

impl<'a> PostOrderIter<'a> {
    fn new(tree: &'a Tree, start: NodeIndex) -> Self {
        PostOrderIter {
            tree,
            stack: vec![(start, false)],
        }
    }
}

impl<'a> Iterator for PostOrderIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((index, children_visited)) = self.stack.pop() {
            let node = &self.tree[index];

            if children_visited || node.is_leaf() {
                // Either we've already processed children, or this is a leaf
                return Some(node);
            }

            // Mark this node as "children will be visited"
            self.stack.push((index, true));
            for &child in node.children().iter().rev() {
                self.stack.push((child, false));
            }
        }
        None
    }
}
