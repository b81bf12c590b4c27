//! Stack-based reader building Newick trees into a [Tree] arena.

use crate::model::feature::FeatureValue;
use crate::model::tree::{ChildSpec, NodeIndex, Tree};
use crate::newick::defs::{ANNOTATION_START, NEWICK_LABEL_DELIMITERS, NHX_MARKER};
use crate::parser::byte_parser::ByteParser;
use crate::parser::byte_source::ByteSource;
use crate::parser::parsing_error::ParsingError;
use std::path::Path;
use tracing::debug;

// ============================================================================
// API (pub)
// ============================================================================
/// Reads a Newick tree into the existing node `root` of `tree`.
///
/// `input` is read from disk if it names an existing file, otherwise it is
/// taken as the Newick text itself. Parsed children are appended to the
/// children `root` already has, and the attributes of the outermost Newick
/// node are applied to `root`.
///
/// # Errors
/// [ParsingError] if the file cannot be read or the text is not valid
/// Newick. The tree may hold a partially read subtree below `root` then.
///
/// # Example
/// ```
/// use phylonode::model::Tree;
/// use phylonode::newick::read_newick;
///
/// let mut tree = Tree::new();
/// let root = tree.root_index();
/// read_newick(&mut tree, root, "(A:1,(B:2,C:3)90:0.5);").unwrap();
/// assert_eq!(tree.get_leaf_names(root), vec!["A", "B", "C"]);
/// ```
pub fn read_newick(tree: &mut Tree, root: NodeIndex, input: &str) -> Result<(), ParsingError> {
    let path = Path::new(input);
    if path.is_file() {
        debug!(path = %path.display(), "reading newick file");
        let mut parser = ByteParser::from_file(path)?;
        NewickReader::new(tree).read_tree(&mut parser, root)
    } else {
        debug!(len = input.len(), "reading newick string");
        let mut parser = ByteParser::for_str(input);
        NewickReader::new(tree).read_tree(&mut parser, root)
    }
}

impl Tree {
    /// Parses a Newick string into a new tree.
    ///
    /// # Example
    /// ```
    /// use phylonode::model::Tree;
    ///
    /// let tree = Tree::from_newick("((A:0.1,B:0.2)[&&NHX:species=duck]:0.3,C:0.4);").unwrap();
    /// assert_eq!(tree.num_leaves(tree.root_index()), 3);
    /// ```
    pub fn from_newick(newick: &str) -> Result<Tree, ParsingError> {
        let mut tree = Tree::new();
        let root = tree.root_index();
        let mut parser = ByteParser::for_str(newick);
        NewickReader::new(&mut tree).read_tree(&mut parser, root)?;
        Ok(tree)
    }

    /// Reads the first Newick tree of a file into a new tree.
    pub fn from_newick_file<P: AsRef<Path>>(path: P) -> Result<Tree, ParsingError> {
        let mut tree = Tree::new();
        let root = tree.root_index();
        let mut parser = ByteParser::from_file(path)?;
        NewickReader::new(&mut tree).read_tree(&mut parser, root)?;
        Ok(tree)
    }
}

// =#========================================================================#=
// NEWICK READER
// =#========================================================================#=
/// Grammar handled:
/// * `tree ::= subtree ';'`
/// * `subtree ::= '(' subtree (',' subtree)* ')' [label] tail | [label] tail`
/// * `tail ::= [annotation] [':' number] [annotation]`
///
/// Whitespace and `[...]` comments may appear between all tokens.
struct NewickReader<'t> {
    tree: &'t mut Tree,
}

impl<'t> NewickReader<'t> {
    fn new(tree: &'t mut Tree) -> Self {
        Self { tree }
    }

    fn read_tree<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
        root: NodeIndex,
    ) -> Result<(), ParsingError> {
        self.parse_subtree(parser, root)?;

        skip_filler(parser)?;
        if !parser.consume_if(b';') {
            let next_char = parser.peek().map(char::from);
            return Err(ParsingError::invalid_newick_string(
                parser,
                format!("Expected ';' at end of tree but found {:?}", next_char),
            ));
        }
        Ok(())
    }

    /// Parses a subtree whose top node is `top`, which already exists.
    ///
    /// Open groups are kept on an explicit stack, so nesting depth is not
    /// bounded by the call stack.
    fn parse_subtree<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
        top: NodeIndex,
    ) -> Result<(), ParsingError> {
        let mut open: Vec<NodeIndex> = Vec::new();
        let mut node = top;

        loop {
            skip_filler(parser)?;
            if parser.consume_if(b'(') {
                open.push(node);
                node = self.new_child(parser, node)?;
                continue;
            }

            let label = parser.parse_label(NEWICK_LABEL_DELIMITERS)?;
            if !label.is_empty() {
                self.tree[node].set_name(label);
            }
            self.parse_tail(parser, node)?;

            // Close groups until the next sibling starts
            loop {
                let Some(&parent) = open.last() else {
                    return Ok(());
                };
                skip_filler(parser)?;
                match parser.next_byte() {
                    Some(b',') => {
                        node = self.new_child(parser, parent)?;
                        break;
                    }
                    Some(b')') => {
                        open.pop();
                        skip_filler(parser)?;
                        let label = parser.parse_label(NEWICK_LABEL_DELIMITERS)?;
                        self.apply_internal_label(parser, parent, label)?;
                        self.parse_tail(parser, parent)?;
                    }
                    Some(other) => {
                        return Err(ParsingError::invalid_newick_string(
                            parser,
                            format!("Expected ',' or ')' after child but found {:?}", char::from(other)),
                        ));
                    }
                    None => return Err(ParsingError::unexpected_eof(parser)),
                }
            }
        }
    }

    fn new_child<B: ByteSource>(
        &mut self,
        parser: &ByteParser<B>,
        parent: NodeIndex,
    ) -> Result<NodeIndex, ParsingError> {
        self.tree
            .add_child(parent, ChildSpec::new())
            .map_err(|e| ParsingError::from_tree_error(e, parser))
    }

    /// A numeric label of an internal node is its support, any other its name.
    fn apply_internal_label<B: ByteSource>(
        &mut self,
        parser: &ByteParser<B>,
        node: NodeIndex,
        label: String,
    ) -> Result<(), ParsingError> {
        if label.is_empty() {
            return Ok(());
        }
        match label.parse::<f64>() {
            Ok(support) => self.tree[node]
                .set_support(support)
                .map_err(|e| ParsingError::invalid_value(parser, e.to_string())),
            Err(_) => {
                self.tree[node].set_name(label);
                Ok(())
            }
        }
    }

    /// Parses `[annotation] [':' number] [annotation]`.
    fn parse_tail<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
        node: NodeIndex,
    ) -> Result<(), ParsingError> {
        self.parse_annotations(parser, node)?;

        if parser.consume_if(b':') {
            skip_filler(parser)?;
            let dist = parse_number(parser)?;
            self.tree[node]
                .set_dist(dist)
                .map_err(|e| ParsingError::invalid_value(parser, e.to_string()))?;
            self.parse_annotations(parser, node)?;
        }

        Ok(())
    }

    /// Parses any number of annotation blocks, skipping comments around them.
    fn parse_annotations<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
        node: NodeIndex,
    ) -> Result<(), ParsingError> {
        skip_filler(parser)?;
        while parser.consume_if_sequence(ANNOTATION_START) {
            let separator = if parser.consume_if_sequence(NHX_MARKER) { b':' } else { b',' };
            self.parse_annotation_pairs(parser, node, separator)?;
            skip_filler(parser)?;
        }
        Ok(())
    }

    /// Parses `key=value` pairs up to and including the closing `]`.
    fn parse_annotation_pairs<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
        node: NodeIndex,
        separator: u8,
    ) -> Result<(), ParsingError> {
        let value_delimiters = [separator, b']'];

        loop {
            parser.skip_whitespace();
            let key = parser.parse_unquoted_label(b"=]")?;
            if key.is_empty() {
                return Err(ParsingError::invalid_annotation(
                    parser,
                    "Empty annotation key".to_string(),
                ));
            }
            if !parser.consume_if(b'=') {
                return Err(ParsingError::invalid_annotation(
                    parser,
                    format!("Expected '=' after annotation key '{key}'"),
                ));
            }

            let value = parser.parse_label(&value_delimiters)?;
            self.tree[node]
                .add_feature(key, annotation_value(value))
                .map_err(|e| ParsingError::from_tree_error(e, parser))?;

            parser.skip_whitespace();
            if !parser.consume_if(separator) {
                break;
            }
        }

        if !parser.consume_if(b']') {
            return Err(ParsingError::invalid_annotation(
                parser,
                "Expected ']' at end of annotation block".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Helpers
// ============================================================================
/// Skips whitespace and plain comments, stopping in front of an annotation.
fn skip_filler<B: ByteSource>(parser: &mut ByteParser<B>) -> Result<(), ParsingError> {
    loop {
        parser.skip_whitespace();
        if parser.peek_is_sequence(ANNOTATION_START) || !parser.skip_comment()? {
            return Ok(());
        }
    }
}

/// Parses a branch length, supporting scientific notation (e.g., `1.5e-10`).
fn parse_number<B: ByteSource>(parser: &mut ByteParser<B>) -> Result<f64, ParsingError> {
    let mut text = String::new();
    while let Some(b) = parser.peek() {
        if b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E') {
            text.push(b as char);
            parser.next_byte();
        } else {
            break;
        }
    }

    if text.is_empty() {
        return Err(ParsingError::invalid_value(
            parser,
            "Missing branch length after ':'".to_string(),
        ));
    }
    text.parse().map_err(|_| {
        ParsingError::invalid_value(parser, format!("Invalid branch length: {text}"))
    })
}

/// Integers and floats are typed, everything else stays text.
fn annotation_value(value: String) -> FeatureValue {
    if let Ok(v) = value.parse::<i64>() {
        FeatureValue::Int(v)
    } else if let Ok(v) = value.parse::<f64>() {
        FeatureValue::Float(v)
    } else {
        FeatureValue::Text(value)
    }
}
