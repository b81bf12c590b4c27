//! Constants for reading and writing Newick.

/// Newick label delimiters: parentheses, brackets, comma, colon, semicolon
pub(crate) const NEWICK_LABEL_DELIMITERS: &[u8] = b"()[],:;";

/// Opening of an annotation block, as opposed to a plain `[...]` comment
pub(crate) const ANNOTATION_START: &[u8] = b"[&";

/// Marker following [ANNOTATION_START] in NHX blocks (`[&&NHX:k=v:k=v]`)
pub(crate) const NHX_MARKER: &[u8] = b"&NHX:";

/// Estimated characters per node, used to pre-allocate output strings
pub(crate) const CHARS_PER_NODE_GUESS: usize = 16;
