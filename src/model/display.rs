//! Textual summaries and ascii-art rendering of a subtree.

use crate::model::node::Node;
use crate::model::tree::{NodeIndex, Tree};
use std::collections::HashMap;
use std::fmt;

/// Width of one branch segment in [Tree::get_ascii]
const SEGMENT: usize = 10;

/// Rooting state of a structure, judged from the degree of its absolute root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rooting {
    /// Root has exactly two children
    Rooted,
    /// Root has three or more children
    Unrooted,
    /// Root has fewer than two children
    Unknown,
}

impl fmt::Display for Rooting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Rooting::Rooted => "Yes",
            Rooting::Unrooted => "No",
            Rooting::Unknown => "Unknown",
        };
        f.write_str(text)
    }
}

/// Overview of a subtree as returned by [Tree::describe].
#[derive(Debug, Clone, PartialEq)]
pub struct TreeSummary {
    /// Nodes in the subtree, including its top node
    pub num_nodes: usize,
    pub num_leaves: usize,
    pub rooting: Rooting,
    /// Name of the leaf farthest from the top node
    pub farthest_leaf: String,
    /// Branch length distance to that leaf
    pub farthest_dist: f64,
}

impl fmt::Display for TreeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of nodes:\t {}", self.num_nodes)?;
        writeln!(f, "Number of leaves:\t {}", self.num_leaves)?;
        writeln!(f, "Rooted: {}", self.rooting)?;
        write!(
            f,
            "Farthest leaf: {} at distance {}",
            self.farthest_leaf, self.farthest_dist
        )
    }
}

impl Tree {
    /// Summarises the subtree under `index`.
    pub fn describe(&self, index: NodeIndex) -> TreeSummary {
        let root = self.get_tree_root(index);
        let rooting = match self[root].num_children() {
            2 => Rooting::Rooted,
            n if n > 2 => Rooting::Unrooted,
            _ => Rooting::Unknown,
        };
        let (farthest, farthest_dist) = self.get_farthest_leaf(index, false);

        TreeSummary {
            num_nodes: self.pre_order_iter(index).count(),
            num_leaves: self.num_leaves(index),
            rooting,
            farthest_leaf: self[farthest].name().to_string(),
            farthest_dist,
        }
    }

    /// Draws the subtree under `index` as ascii art, one leaf per line.
    ///
    /// Each level takes a 10-character segment; the branch to a first child
    /// starts with `/`, to a last child with `\`, to any other child with
    /// `-`. With `show_internal`, internal names are painted onto their stem.
    /// Without `compact`, an empty line separates sibling blocks.
    ///
    /// # Example
    /// ```
    /// use phylonode::model::Tree;
    ///
    /// let tree = Tree::from_newick("(A,B);").unwrap();
    /// let art = tree.get_ascii(tree.root_index(), false, true);
    /// assert_eq!(art, "--------- /-A\n          \\-B");
    /// ```
    pub fn get_ascii(&self, index: NodeIndex, show_internal: bool, compact: bool) -> String {
        // Rendered block of each finished node plus the line of its stem
        let mut blocks: HashMap<NodeIndex, (Vec<String>, usize)> = HashMap::new();

        for node in self.post_order_iter(index) {
            let block = if node.is_leaf() {
                (vec![format!("--{}", node.name())], 0)
            } else {
                self.join_child_blocks(node, &mut blocks, show_internal, compact)
            };
            blocks.insert(node.index(), block);
        }

        blocks
            .remove(&index)
            .map(|(lines, _)| lines.join("\n"))
            .unwrap_or_default()
    }

    fn join_child_blocks(
        &self,
        node: &Node,
        blocks: &mut HashMap<NodeIndex, (Vec<String>, usize)>,
        show_internal: bool,
        compact: bool,
    ) -> (Vec<String>, usize) {
        let children = node.children();
        let last = children.len() - 1;
        let mut mids = Vec::with_capacity(children.len());
        let mut result: Vec<String> = Vec::new();

        for (position, child) in children.iter().enumerate() {
            let (mut lines, mid) = blocks.remove(child).unwrap_or_default();
            let branch = match position {
                0 => '/',
                p if p == last => '\\',
                _ => '-',
            };
            if let Some(stem) = lines.get_mut(mid) {
                stem.replace_range(..1, &branch.to_string());
            }
            mids.push(mid + result.len());
            result.extend(lines);
            if !compact {
                result.push(String::new());
            }
        }
        if !compact {
            result.pop();
        }

        let (lo, hi, end) = (mids[0], mids[mids.len() - 1], result.len());
        let pad = " ".repeat(SEGMENT);
        let bar = format!("{}|", " ".repeat(SEGMENT - 1));
        let mut prefixes: Vec<String> = Vec::with_capacity(end);
        prefixes.extend(std::iter::repeat_n(pad.clone(), lo + 1));
        prefixes.extend(std::iter::repeat_n(bar, hi.saturating_sub(lo + 1)));
        prefixes.extend(std::iter::repeat_n(pad, end - hi));

        let mid = (lo + hi) / 2;
        let tail = prefixes[mid].chars().last().unwrap_or(' ');
        prefixes[mid] = format!("{}{}", "-".repeat(SEGMENT - 1), tail);

        let mut result: Vec<String> = prefixes
            .into_iter()
            .zip(result)
            .map(|(prefix, line)| prefix + &line)
            .collect();

        if show_internal {
            let stem: Vec<char> = result[mid].chars().collect();
            let name = node.name();
            let skip = name.chars().count() + 1;
            let mut painted = String::new();
            painted.push(stem[0]);
            painted.push_str(name);
            painted.extend(stem.iter().skip(skip));
            result[mid] = painted;
        }

        (result, mid)
    }
}
