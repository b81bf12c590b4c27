//! Label escaping for writing Newick.
//!
//! Labels are written verbatim unless they contain a character the reader
//! would treat as structure, in which case they are wrapped in single quotes
//! with internal single quotes doubled. Reading an escaped label back with
//! [ByteParser::parse_label](crate::parser::ByteParser::parse_label) yields
//! the original label.

/// Characters that cannot appear in an unquoted label
const RESERVED: &[char] = &[',', ';', '(', ')', ':', '[', ']', '\''];

/// Checks whether a label has to be quoted to survive a round trip.
///
/// # Examples
/// ```
/// # use phylonode::parser::utils::needs_quoting;
/// assert!(!needs_quoting("Pukeko"));
/// assert!(needs_quoting("Pu[ke]ko"));
/// assert!(needs_quoting("Australasian Swamphen"));
/// assert!(needs_quoting(""));
/// ```
pub fn needs_quoting(label: &str) -> bool {
    label.is_empty() || label.chars().any(|c| c.is_whitespace() || RESERVED.contains(&c))
}

/// Escapes a label for use in Newick.
///
/// # Examples
/// ```
/// # use phylonode::parser::utils::escape_label;
/// assert_eq!(escape_label("Pukeko"), "Pukeko");
/// assert_eq!(escape_label("Pu[ke]ko"), "'Pu[ke]ko'");
/// assert_eq!(escape_label("Australasian Swamphen"), "'Australasian Swamphen'");
/// assert_eq!(escape_label("Baillon's Crake"), "'Baillon''s Crake'");
/// ```
pub fn escape_label(label: &str) -> String {
    if needs_quoting(label) {
        format!("'{}'", label.replace('\'', "''"))
    } else {
        label.to_string()
    }
}
