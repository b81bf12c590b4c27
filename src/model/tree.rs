//! Provides the mutable tree arena.
//!
//! [Tree] stores all [Node]s in a contiguous vector and references them by
//! [NodeIndex]. Parent links are indices into the same arena, ownership runs
//! top-down through each node's ordered children.
//!
//! The arena may hold several disconnected structures at once: detaching a
//! subtree or creating a standalone node with [Tree::new_node] leaves it in
//! the arena as the root of its own structure. Nodes are never freed, so an
//! index stays valid for the lifetime of the tree.

use crate::model::error::{StructureError, TreeError};
use crate::model::feature::{self, FeatureValue};
use crate::model::node::Node;
use tracing::trace;

/// Index of a node in a tree (arena).
pub type NodeIndex = usize;

// =$========================================================================$=
// TREE
// =$========================================================================$=
/// A rooted tree of arbitrary out-degree using the arena pattern on [Node].
///
/// # Structure
/// - All nodes, connected or not, are stored in the arena.
/// - Index of a designated root is maintained; it is the node handed out by
///   constructors and the default anchor for whole-tree operations.
/// - No assumption on order of indices is maintained.
///
/// # Construction
/// Start with [Tree::new] (a single root), then grow it with
/// [Tree::add_child], parse it with [Tree::from_newick], or generate a random
/// topology with [Tree::populate].
/// Test validity with [Tree::is_valid].
#[derive(Debug, Clone)]
pub struct Tree {
    /// Nodes of this tree (arena pattern)
    nodes: Vec<Node>,

    /// Index of the designated root
    root_index: NodeIndex,
}

// ============================================================================
// New, Getters / Accessors, etc. (pub)
// ============================================================================
impl Tree {
    /// Creates a tree consisting of a single root node with default attributes.
    pub fn new() -> Self {
        Self::with_capacity(1)
    }

    /// Creates a single-root tree with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(Node::new(0));
        Tree {
            nodes,
            root_index: 0,
        }
    }

    /// Creates a standalone node (root of a size-1 structure) and returns its index.
    pub fn new_node(&mut self) -> NodeIndex {
        let index = self.nodes.len();
        self.nodes.push(Node::new(index));
        index
    }

    /// Returns the index of the designated root.
    pub fn root_index(&self) -> NodeIndex {
        self.root_index
    }

    /// Returns a reference to the designated root.
    pub fn root(&self) -> &Node {
        &self[self.root_index]
    }

    /// Designates another parentless node as the root.
    ///
    /// # Errors
    /// [StructureError::AlreadyAttached] if `index` has a parent.
    pub fn set_root_index(&mut self, index: NodeIndex) -> Result<(), TreeError> {
        if let Some(parent) = self[index].parent() {
            return Err(StructureError::AlreadyAttached {
                parent,
                child: index,
            }
            .into());
        }
        self.root_index = index;
        Ok(())
    }

    /// Returns a reference to the node at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn node(&self, index: NodeIndex) -> &Node {
        &self[index]
    }

    /// Returns a mutable reference to the node at the given index.
    ///
    /// Links cannot be changed through this reference, only attributes.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn node_mut(&mut self, index: NodeIndex) -> &mut Node {
        &mut self[index]
    }

    /// Returns the number of nodes in the arena, connected or not.
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns whether the node is collapsed or has no children.
    pub fn is_leaf(&self, index: NodeIndex) -> bool {
        self[index].is_leaf()
    }

    /// Returns whether the node has no parent.
    pub fn is_root(&self, index: NodeIndex) -> bool {
        self[index].is_root()
    }

    /// Returns the ordered children of a node.
    pub fn children(&self, index: NodeIndex) -> &[NodeIndex] {
        self[index].children()
    }

    /// Returns the other children of the node's parent, in order.
    pub fn sisters(&self, index: NodeIndex) -> Vec<NodeIndex> {
        match self[index].parent() {
            Some(parent) => self[parent]
                .children()
                .iter()
                .copied()
                .filter(|&c| c != index)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Returns the absolute root of the structure containing `index`.
    pub fn get_tree_root(&self, index: NodeIndex) -> NodeIndex {
        let mut current = index;
        while let Some(parent) = self[current].parent() {
            current = parent;
        }
        current
    }

    /// Returns whether `ancestor` lies on the path from `index` up to its root
    /// (a node is its own ancestor).
    pub fn is_ancestor_or_self(&self, ancestor: NodeIndex, index: NodeIndex) -> bool {
        let mut current = Some(index);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self[c].parent();
        }
        false
    }

    /// Marks the node as collapsed, so that it acts as a leaf.
    pub fn collapse(&mut self, index: NodeIndex) {
        self[index].set_collapsed(true);
    }

    /// Clears the collapsed flag of the node.
    pub fn expand(&mut self, index: NodeIndex) {
        self[index].set_collapsed(false);
    }

    /// Reverses the order of the node's children.
    pub fn swap_children(&mut self, index: NodeIndex) {
        self[index].children_mut().reverse();
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<NodeIndex> for Tree {
    type Output = Node;

    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.nodes[index]
    }
}

impl std::ops::IndexMut<NodeIndex> for Tree {
    fn index_mut(&mut self, index: NodeIndex) -> &mut Self::Output {
        &mut self.nodes[index]
    }
}

// =$========================================================================$=
// CHILD SPEC
// =$========================================================================$=
/// Describes a child to attach with [Tree::add_child].
///
/// Without [existing](Self::existing), a fresh node is created. Values are
/// validated when the child is attached.
///
/// # Example
/// ```
/// use phylonode::model::{ChildSpec, Tree};
///
/// let mut tree = Tree::new();
/// let root = tree.root_index();
/// let a = tree.add_child(root, ChildSpec::new().with_name("A").with_dist(0.5)).unwrap();
/// assert_eq!(tree[a].dist(), 0.5);
/// assert!(tree.add_child(root, ChildSpec::new().with_dist("-1")).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ChildSpec {
    node: Option<NodeIndex>,
    name: Option<FeatureValue>,
    dist: Option<FeatureValue>,
    support: Option<FeatureValue>,
}

impl ChildSpec {
    /// A fresh child with default attributes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the given existing (parentless) node instead of a fresh one.
    pub fn existing(node: NodeIndex) -> Self {
        ChildSpec {
            node: Some(node),
            ..Self::default()
        }
    }

    /// Name to give to the child.
    pub fn with_name<V: Into<FeatureValue>>(mut self, name: V) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Length of the branch between child and parent; numbers or numeric text.
    pub fn with_dist<V: Into<FeatureValue>>(mut self, dist: V) -> Self {
        self.dist = Some(dist.into());
        self
    }

    /// Support of the child's branch; numbers or numeric text.
    pub fn with_support<V: Into<FeatureValue>>(mut self, support: V) -> Self {
        self.support = Some(support.into());
        self
    }
}

// ============================================================================
// Topology editing (pub)
// ============================================================================
impl Tree {
    /// Attaches a child to `parent` and returns the child's index.
    ///
    /// Creates a fresh node unless the spec names an existing one. Optional
    /// `name`, `dist` and `support` are validated before anything changes.
    ///
    /// # Errors
    /// * [TreeError::Validation] if `dist`/`support` is not a non-negative number
    /// * [StructureError::DesignatedRoot] if the existing node is the tree's root
    /// * [StructureError::AlreadyAttached] if the existing node has a parent
    /// * [StructureError::WouldCreateCycle] if the existing node is an
    ///   ancestor-or-self of `parent`
    pub fn add_child(&mut self, parent: NodeIndex, spec: ChildSpec) -> Result<NodeIndex, TreeError> {
        let name = spec.name.as_ref().map(FeatureValue::to_name).transpose()?;
        let dist = spec
            .dist
            .as_ref()
            .map(|v| v.to_non_negative(feature::DIST))
            .transpose()?;
        let support = spec
            .support
            .as_ref()
            .map(|v| v.to_non_negative(feature::SUPPORT))
            .transpose()?;

        let child = match spec.node {
            Some(child) => {
                if child == self.root_index {
                    return Err(StructureError::DesignatedRoot(child).into());
                }
                if let Some(current) = self[child].parent() {
                    return Err(StructureError::AlreadyAttached {
                        parent: current,
                        child,
                    }
                    .into());
                }
                if self.is_ancestor_or_self(child, parent) {
                    return Err(StructureError::WouldCreateCycle { parent, child }.into());
                }
                child
            }
            None => self.new_node(),
        };

        let node = &mut self[child];
        if let Some(name) = name {
            node.set_name(name);
        }
        if let Some(dist) = dist {
            node.set_dist(dist)?;
        }
        if let Some(support) = support {
            node.set_support(support)?;
        }

        self.link(parent, child);
        Ok(child)
    }

    /// Removes `child` from the children of `parent`; both stay in the arena,
    /// no longer connected.
    ///
    /// # Errors
    /// [StructureError::NotAChild] if `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeIndex, child: NodeIndex) -> Result<NodeIndex, TreeError> {
        if !self.unlink(parent, child) {
            return Err(StructureError::NotAChild { parent, child }.into());
        }
        Ok(child)
    }

    /// Adds a sister to the node, i.e. a child to its parent.
    ///
    /// # Errors
    /// [StructureError::NoParent] if the node is a root, otherwise as
    /// [Tree::add_child].
    pub fn add_sister(&mut self, index: NodeIndex, spec: ChildSpec) -> Result<NodeIndex, TreeError> {
        let parent = self[index].parent().ok_or(StructureError::NoParent(index))?;
        self.add_child(parent, spec)
    }

    /// Removes a sister of the node (the first one if `sister` is `None`).
    ///
    /// # Returns
    /// The removed sister, or `None` if the node has no sisters.
    ///
    /// # Errors
    /// * [StructureError::NoParent] if the node is a root
    /// * [StructureError::NotASister] if `sister` does not share the parent
    pub fn remove_sister(
        &mut self,
        index: NodeIndex,
        sister: Option<NodeIndex>,
    ) -> Result<Option<NodeIndex>, TreeError> {
        let parent = self[index].parent().ok_or(StructureError::NoParent(index))?;
        let sisters = self.sisters(index);
        let target = match sister {
            Some(s) if sisters.contains(&s) => s,
            Some(s) => {
                return Err(StructureError::NotASister {
                    node: index,
                    other: s,
                }
                .into());
            }
            None => match sisters.first() {
                Some(&s) => s,
                None => return Ok(None),
            },
        };
        self.remove_child(parent, target).map(Some)
    }

    /// Detaches the node (and its subtree) from its parent and returns it.
    ///
    /// The subtree stays intact and can be attached elsewhere with
    /// [ChildSpec::existing]. Detaching a root does nothing.
    pub fn detach(&mut self, index: NodeIndex) -> NodeIndex {
        if let Some(parent) = self[index].parent() {
            self.unlink(parent, index);
        }
        index
    }

    /// Deletes the node from its structure, handing its children to its parent.
    ///
    /// The children take the deleted node's place in the parent's child order
    /// and keep their own `dist`; the deleted node's branch length is dropped.
    ///
    /// # Errors
    /// [StructureError::NoParent] if the node is a root.
    pub fn delete(&mut self, index: NodeIndex) -> Result<(), TreeError> {
        let parent = self[index].parent().ok_or(StructureError::NoParent(index))?;
        let position = self.child_position(parent, index).ok_or(StructureError::NotAChild {
            parent,
            child: index,
        })?;

        let children = std::mem::take(self[index].children_mut());
        for &child in &children {
            self[child].set_parent(Some(parent));
        }
        let siblings = self[parent].children_mut();
        let tail = siblings.split_off(position + 1);
        siblings.pop();
        siblings.extend(children);
        siblings.extend(tail);
        self[index].set_parent(None);

        trace!(node = index, parent, "deleted node");
        Ok(())
    }
}

// ============================================================================
// Validation (pub)
// ============================================================================
impl Tree {
    /// Validates all links in the arena.
    ///
    /// Checks:
    /// - All node indices match their position in the arena
    /// - All child indices are valid, appear once and point back to the parent
    /// - All parent indices are valid and list the node exactly once
    /// - Following parents from any node terminates (no cycles)
    /// - The designated root has no parent
    ///
    /// # Returns
    /// `true` if the arena is consistent, `false` otherwise
    pub fn is_valid(&self) -> bool {
        let len = self.nodes.len();
        if self.root_index >= len || !self.nodes[self.root_index].is_root() {
            return false;
        }

        for (index, node) in self.nodes.iter().enumerate() {
            if node.index() != index {
                return false;
            }

            // Children point back and are unique
            let mut seen = std::collections::HashSet::new();
            for &child in node.children() {
                if child >= len || !seen.insert(child) {
                    return false;
                }
                if self.nodes[child].parent() != Some(index) {
                    return false;
                }
            }

            // Parent lists this node exactly once
            if let Some(parent) = node.parent() {
                if parent >= len {
                    return false;
                }
                let count = self.nodes[parent]
                    .children()
                    .iter()
                    .filter(|&&c| c == index)
                    .count();
                if count != 1 {
                    return false;
                }
            }

            // Walking up must end within len steps
            let mut steps = 0;
            let mut current = node.parent();
            while let Some(c) = current {
                steps += 1;
                if steps > len {
                    return false;
                }
                current = self.nodes[c].parent();
            }
        }

        true
    }
}

// ============================================================================
// Link primitives (crate)
// ============================================================================
impl Tree {
    /// Appends `child` to the children of `parent` and sets its parent.
    pub(crate) fn link(&mut self, parent: NodeIndex, child: NodeIndex) {
        self[parent].children_mut().push(child);
        self[child].set_parent(Some(parent));
    }

    /// Removes `child` from `parent`'s children and clears its parent.
    /// Returns `false` if `child` was not a child of `parent`.
    pub(crate) fn unlink(&mut self, parent: NodeIndex, child: NodeIndex) -> bool {
        match self.child_position(parent, child) {
            Some(position) => {
                self[parent].children_mut().remove(position);
                self[child].set_parent(None);
                true
            }
            None => false,
        }
    }

    /// Position of `child` within the children of `parent`.
    pub(crate) fn child_position(&self, parent: NodeIndex, child: NodeIndex) -> Option<usize> {
        self[parent].children().iter().position(|&c| c == child)
    }
}
