//! Phylonode is a library for building, querying and restructuring rooted
//! phylogenetic trees.
//!
//! Core functionality provided:
//! - Tree model: [Tree] stores [Node]s of arbitrary out-degree in an arena
//!   and refers to them by [NodeIndex]. Nodes carry a name, a branch length
//!   (`dist`), a branch support and any number of extra features.
//! - Traversal: pre-order and post-order iterators, leaf and name lookups.
//! - Queries: common ancestors, path distances, farthest leaves and nodes,
//!   midpoint outgroup.
//! - Restructuring: pruning to a leaf set, rerooting at an outgroup,
//!   unrooting, deleting and detaching nodes.
//! - Generation: random trees of a given number of leaves.
//! - Newick: reading (including NHX annotations) and writing.
//!
//! # Usage patterns
//! 1. Build a tree by hand with [Tree::add_child], generate one with
//!    [Tree::populate], or parse one with [Tree::from_newick].
//! 2. Query and restructure it through the methods on [Tree]. Nodes are
//!    always addressed by index, so no borrow of the tree is held between
//!    calls.
//! 3. Write it back with [newick::write_newick].
//!
//! ## Example
//! ```
//! use phylonode::{PruneMethod, Tree};
//!
//! let mut tree = Tree::from_newick("(((A:1,B:1):1,C:2):1,(D:1,E:3):1);").unwrap();
//! let root = tree.root_index();
//!
//! let a = tree.get_leaves_by_name(root, "A")[0];
//! let e = tree.get_leaves_by_name(root, "E")[0];
//! assert_eq!(tree.get_distance(a, e).unwrap(), 7.0);
//!
//! let outgroup = tree.get_midpoint_outgroup(root);
//! tree.set_outgroup(root, outgroup).unwrap();
//! tree.prune(root, ["A", "C", "E"], PruneMethod::Keep).unwrap();
//! assert_eq!(tree.num_leaves(root), 3);
//! assert!(tree.is_valid());
//! ```
//!
//! # Logging
//! Mutating operations and Newick I/O emit [tracing] events (`debug` on
//! entry, `trace` per structural step). The library never installs a
//! subscriber.

pub mod model;
pub mod newick;
pub mod parser;

pub use model::{
    ChildSpec, FeatureValue, Node, NodeIndex, PruneMethod, Strategy, StructureError, Tree,
    TreeError, ValidationError,
};
pub use newick::NewickOptions;
pub use parser::ParsingError;

// ============================================================================
// Quick Newick API
// ============================================================================
/// Parses a Newick string into a new [Tree].
///
/// See [`Tree::from_newick`] for details.
pub fn parse_newick_str<S: AsRef<str>>(newick: S) -> Result<Tree, ParsingError> {
    Tree::from_newick(newick.as_ref())
}

/// Returns the Newick string of the whole tree with default [NewickOptions].
pub fn to_newick(tree: &Tree) -> String {
    tree.to_newick()
}
