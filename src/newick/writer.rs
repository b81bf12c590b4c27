//! Newick serialization of a subtree.

use crate::model::feature::FeatureValue;
use crate::model::tree::{NodeIndex, Tree};
use crate::newick::defs::CHARS_PER_NODE_GUESS;
use crate::parser::utils::escape_label;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::debug;

// =#========================================================================#=
// NEWICK OPTIONS
// =#========================================================================#=
/// Controls which data [write_newick] emits for every node.
///
/// # Example
/// ```
/// use phylonode::model::Tree;
/// use phylonode::newick::{NewickOptions, write_newick};
///
/// let tree = Tree::from_newick("((A:1,B:2)0.9:0.5,C:3);").unwrap();
/// let options = NewickOptions::new().with_support(false);
/// assert_eq!(write_newick(&tree, tree.root_index(), &options), "((A:1,B:2):0.5,C:3);");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewickOptions {
    features: Vec<String>,
    support: bool,
    dist: bool,
}

impl NewickOptions {
    /// Options writing support and branch lengths, but no features.
    pub fn new() -> Self {
        Self {
            features: Vec::new(),
            support: true,
            dist: true,
        }
    }

    /// Names of features written as NHX annotation, when present on a node.
    pub fn with_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features = features.into_iter().map(Into::into).collect();
        self
    }

    /// Whether internal nodes carry their support as label.
    pub fn with_support(mut self, support: bool) -> Self {
        self.support = support;
        self
    }

    /// Whether branch lengths are written.
    pub fn with_dist(mut self, dist: bool) -> Self {
        self.dist = dist;
        self
    }
}

impl Default for NewickOptions {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// API (pub)
// ============================================================================
/// Returns the Newick representation of the subtree under `index`,
/// terminated with `;`.
///
/// Leaves are written as `name[:dist]`, internal nodes as
/// `(children)[support][:dist]`, each followed by `[&&NHX:key=value:...]`
/// if any of the requested features is registered on the node. Support and
/// branch length of `index` itself are not written.
pub fn write_newick(tree: &Tree, index: NodeIndex, options: &NewickOptions) -> String {
    debug!(node = index, ?options, "writing newick");
    let mut newick = String::with_capacity(tree.num_leaves(index) * 2 * CHARS_PER_NODE_GUESS);

    // Each node is entered once and exited once; children are entered
    // between, separated by commas.
    enum Step {
        Enter(NodeIndex),
        Comma,
        Exit(NodeIndex),
    }

    let mut stack = vec![Step::Enter(index)];
    while let Some(step) = stack.pop() {
        match step {
            Step::Enter(node) if tree.is_leaf(node) => {
                newick.push_str(&escape_label(tree[node].name()));
                push_tail(tree, &mut newick, node, node != index, options);
            }
            Step::Enter(node) => {
                newick.push('(');
                stack.push(Step::Exit(node));
                for (position, &child) in tree.children(node).iter().enumerate().rev() {
                    stack.push(Step::Enter(child));
                    if position > 0 {
                        stack.push(Step::Comma);
                    }
                }
            }
            Step::Comma => newick.push(','),
            Step::Exit(node) => {
                newick.push(')');
                if options.support && node != index {
                    newick.push_str(&tree[node].support().to_string());
                }
                push_tail(tree, &mut newick, node, node != index, options);
            }
        }
    }

    newick.push(';');
    newick
}

/// Writes the Newick representation of the subtree under `index` to a file,
/// followed by a newline.
///
/// # Errors
/// Returns an I/O error if creating or writing the file fails.
pub fn write_newick_file<P: AsRef<Path>>(
    path: P,
    tree: &Tree,
    index: NodeIndex,
    options: &NewickOptions,
) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(write_newick(tree, index, options).as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()
}

impl Tree {
    /// Returns the Newick representation of the whole tree with default
    /// [NewickOptions]. See [write_newick].
    pub fn to_newick(&self) -> String {
        write_newick(self, self.root_index(), &NewickOptions::default())
    }
}

// ============================================================================
// Helpers
// ============================================================================
/// Appends `[:dist]` and the NHX block of a node.
fn push_tail(tree: &Tree, newick: &mut String, node: NodeIndex, with_dist: bool, options: &NewickOptions) {
    if options.dist && with_dist {
        newick.push(':');
        newick.push_str(&tree[node].dist().to_string());
    }

    let mut pairs = options
        .features
        .iter()
        .filter_map(|key| tree[node].feature(key).map(|value| (key, value)))
        .peekable();
    if pairs.peek().is_none() {
        return;
    }

    newick.push_str("[&&NHX");
    for (key, value) in pairs {
        newick.push(':');
        newick.push_str(key);
        newick.push('=');
        newick.push_str(&annotation_text(&value));
    }
    newick.push(']');
}

/// Text of a feature value inside an NHX block.
///
/// Text is quoted if it would end the block or start a quoted label.
fn annotation_text(value: &FeatureValue) -> String {
    let Some(text) = value.as_str() else {
        return value.to_string();
    };
    if text.contains([':', ']', '=', '[', ',', '\'']) || text.contains(char::is_whitespace) {
        format!("'{}'", text.replace('\'', "''"))
    } else {
        text.to_string()
    }
}
