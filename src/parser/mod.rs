//! Basic low-level byte parser functionality.
//!
//! The Newick reader in [crate::newick] is built on [ByteParser], reports
//! failures as [ParsingError] and escapes labels with [utils::escape_label].

pub mod byte_parser;
pub mod byte_source;
pub mod parsing_error;
pub mod utils;

pub use byte_parser::ByteParser;
pub use parsing_error::{ParsingError, ParsingErrorType};
