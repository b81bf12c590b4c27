//! Newick format reader and writer for [Tree](crate::model::Tree).
//!
//! # API
//! * [`read_newick`] - reads a file or string into an existing node
//! * [`Tree::from_newick`](crate::model::Tree::from_newick) /
//!   [`Tree::from_newick_file`](crate::model::Tree::from_newick_file) - new tree
//! * [`write_newick`] / [`write_newick_file`] - serialize a subtree,
//!   configured by [NewickOptions]
//!
//! # Format
//! The reader accepts the following grammar:
//! * `tree ::= subtree ';'`
//! * `subtree ::= internal | leaf`
//! * `internal ::= '(' subtree (',' subtree)* ')' [label] tail`
//! * `leaf ::= [label] tail`
//! * `tail ::= [annotation] [':' number] [annotation]`
//!
//! Furthermore:
//! * Nodes may have any number of children, including one
//! * Whitespace and `[...]` comments can occur between all elements,
//!   just not within an unquoted label or a branch length
//! * Labels may be single-quoted, with `''` standing for a quote
//! * A numeric label of an internal node is read as its support,
//!   any other label as its name
//!
//! Annotations become node features:
//! * NHX: `[&&NHX:species=human:rate=0.5]`
//! * BEAST style: `[&rate=0.5,color=blue]`
//!
//! Values parsing as integer or float are stored as such, anything else as
//! text. Keys `name`, `dist` and `support` set the node's attributes.

mod defs;
pub mod reader;
pub mod writer;

pub use reader::read_newick;
pub use writer::{NewickOptions, write_newick, write_newick_file};
