//! Data model for mutable rooted phylogenetic trees.
//!
//! # Tree representation
//! Trees are represented by [Tree], which uses the arena pattern to store
//! [Node]s referenced by [NodeIndex]. Each node carries an ordered list of
//! children and an optional parent; there is no restriction on out-degree.
//! A node is a leaf iff it has no children or is collapsed.
//!
//! Besides topology, each node has typed `name`, `dist` and `support`
//! attributes plus arbitrary [FeatureValue] features (see [Node::add_feature]).
//!
//! # Operations
//! | Concern | Methods |
//! |---------|---------|
//! | Editing | [Tree::add_child], [Tree::remove_child], [Tree::add_sister], [Tree::delete], [Tree::detach] |
//! | Traversal | [Tree::traverse], [Tree::pre_order_iter], [Tree::post_order_iter], [Tree::get_leaves] |
//! | Queries | [Tree::get_common_ancestor], [Tree::get_distance], [Tree::get_farthest_leaf], [Tree::get_midpoint_outgroup] |
//! | Restructuring | [Tree::prune], [Tree::set_outgroup], [Tree::unroot] |
//! | Generation | [Tree::populate], [Tree::populate_with_rng] |
//! | Inspection | [Tree::describe], [Tree::get_ascii], [Tree::is_valid] |
//!
//! Operations that fail return a [TreeError]; inputs are checked before the
//! arena is touched wherever possible. Clone the tree first if a sequence of
//! edits must be all-or-nothing.

pub mod display;
pub mod error;
pub mod feature;
pub mod node;
pub mod populate;
pub mod prune;
pub mod query;
pub mod reroot;
pub mod traversal;
pub mod tree;

// Tree
pub use node::Node;
pub use tree::ChildSpec;
pub use tree::NodeIndex;
pub use tree::Tree;
// Attributes
pub use feature::FeatureValue;
// Configuration
pub use prune::{PruneMethod, Selector};
pub use traversal::Strategy;
// Errors
pub use error::{StructureError, TreeError, ValidationError};
// Inspection
pub use display::{Rooting, TreeSummary};
