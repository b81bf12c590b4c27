//! Error types raised by tree operations.
//!
//! Two families exist: [ValidationError] for malformed attribute values
//! (`name`, `dist`, `support`) and [StructureError] for operations whose
//! structural precondition does not hold. Both are wrapped by [TreeError],
//! which is what the public tree API returns.

use crate::model::tree::NodeIndex;

/// Error returned by tree operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TreeError {
    /// An attribute value was rejected
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A structural precondition was violated
    #[error("structure error: {0}")]
    Structure(#[from] StructureError),
}

/// Malformed value for one of the built-in attributes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Value is below zero
    #[error("{field} must be non-negative, got {value}")]
    Negative {
        /// Attribute name
        field: &'static str,
        /// Offending value
        value: f64,
    },

    /// Value is NaN or infinite
    #[error("{field} must be finite, got {value}")]
    NotFinite {
        /// Attribute name
        field: &'static str,
        /// Offending value
        value: f64,
    },

    /// Text could not be read as a number
    #[error("{field} must be a number, got {text:?}")]
    NotANumber {
        /// Attribute name
        field: &'static str,
        /// Offending text
        text: String,
    },

    /// Value has a type the attribute cannot hold
    #[error("{field} cannot hold a {found} value")]
    WrongType {
        /// Attribute name
        field: &'static str,
        /// Name of the rejected value type
        found: &'static str,
    },
}

/// Structural precondition violation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StructureError {
    /// `child` is not in the children of `parent`
    #[error("node {child} is not a child of node {parent}")]
    NotAChild {
        /// Presumed parent
        parent: NodeIndex,
        /// Presumed child
        child: NodeIndex,
    },

    /// `other` does not share the parent of `node`
    #[error("node {other} is not a sister of node {node}")]
    NotASister {
        /// Reference node
        node: NodeIndex,
        /// Presumed sister
        other: NodeIndex,
    },

    /// Operation requires a parent but the node is a root
    #[error("node {0} is a root and has no parent")]
    NoParent(NodeIndex),

    /// The nodes are not part of the same connected structure
    #[error("nodes {0} and {1} are not connected")]
    Disconnected(NodeIndex, NodeIndex),

    /// `node` is not below `ancestor`
    #[error("node {node} is not a descendant of node {ancestor}")]
    NotADescendant {
        /// Expected ancestor
        ancestor: NodeIndex,
        /// Node that was expected below it
        node: NodeIndex,
    },

    /// The node already belongs to a child sequence
    #[error("node {child} is already attached to node {parent}")]
    AlreadyAttached {
        /// Current parent
        parent: NodeIndex,
        /// Node that was to be attached
        child: NodeIndex,
    },

    /// The designated root of the arena cannot become a child
    #[error("node {0} is the designated root and cannot be attached")]
    DesignatedRoot(NodeIndex),

    /// Attaching would make a node its own ancestor
    #[error("attaching node {child} below node {parent} would create a cycle")]
    WouldCreateCycle {
        /// Node receiving the child
        parent: NodeIndex,
        /// Node that was to be attached
        child: NodeIndex,
    },

    /// Both children of the root are leaves
    #[error("cannot unroot a tree with only two leaves")]
    CannotUnrootTwoLeaves,

    /// Some selected nodes are not leaves under the pruned node
    #[error("not all selected nodes are leaves of the structure: {0:?}")]
    LeavesNotInTree(Vec<NodeIndex>),

    /// A selector name matched no leaf
    #[error("no leaf named {0:?}")]
    UnknownLeafName(String),
}
