//! Node module for phylogenetic tree representation.

use crate::model::error::{TreeError, ValidationError};
use crate::model::feature::{
    self, DEFAULT_DIST, DEFAULT_NAME, DEFAULT_SUPPORT, FeatureValue, Features,
};
use crate::model::tree::NodeIndex;

// =#========================================================================#=
// NODE
// =#========================================================================#=
/// Represents a node in a phylogenetic tree arena.
///
/// A node is a leaf iff it is collapsed or has no children, and a root iff
/// it has no parent.
///
/// # Invariants
/// - `index` is the position of this node in the arena
/// - `dist` and `support` are finite and non-negative (enforced by setters)
/// - `children` holds each child exactly once, and each child's `parent`
///   points back to this node (maintained by [Tree](crate::model::Tree))
#[derive(Debug, Clone)]
pub struct Node {
    /// Index of this node in the tree arena
    index: NodeIndex,
    /// Index of the parent node; `None` for a root
    parent: Option<NodeIndex>,
    /// Ordered indices of the child nodes
    children: Vec<NodeIndex>,
    name: String,
    /// Length of the branch to the parent
    dist: f64,
    /// Support of the bipartition induced by the branch to the parent
    support: f64,
    features: Features,
    collapsed: bool,
}

impl Node {
    /// Creates a new standalone node with default attributes.
    ///
    /// # Arguments
    /// * `index` - The unique index of this node in the tree (arena)
    pub(crate) fn new(index: NodeIndex) -> Self {
        Node {
            index,
            parent: None,
            children: Vec::new(),
            name: DEFAULT_NAME.to_string(),
            dist: DEFAULT_DIST,
            support: DEFAULT_SUPPORT,
            features: Features::new(),
            collapsed: false,
        }
    }

    /// Returns the index of this node.
    pub fn index(&self) -> NodeIndex {
        self.index
    }

    /// Returns the index of the parent, or `None` for a root.
    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    /// Returns the ordered child indices.
    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }

    /// Returns the number of children (out-degree).
    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    /// Returns `true` if this node is collapsed or has no children.
    pub fn is_leaf(&self) -> bool {
        self.collapsed || self.children.is_empty()
    }

    /// Returns `true` if this node has no parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Returns `true` if this node is collapsed.
    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Returns the name of this node.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the length of the branch to the parent.
    pub fn dist(&self) -> f64 {
        self.dist
    }

    /// Returns the support of the branch to the parent.
    pub fn support(&self) -> f64 {
        self.support
    }

    /// Sets the name of this node.
    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
        self.features.register(feature::NAME);
    }

    /// Sets the length of the branch to the parent.
    ///
    /// # Errors
    /// [ValidationError] if `dist` is negative or not finite.
    pub fn set_dist(&mut self, dist: f64) -> Result<(), ValidationError> {
        self.dist = feature::validate_non_negative(feature::DIST, dist)?;
        self.features.register(feature::DIST);
        Ok(())
    }

    /// Sets the support of the branch to the parent.
    ///
    /// # Errors
    /// [ValidationError] if `support` is negative or not finite.
    pub fn set_support(&mut self, support: f64) -> Result<(), ValidationError> {
        self.support = feature::validate_non_negative(feature::SUPPORT, support)?;
        self.features.register(feature::SUPPORT);
        Ok(())
    }

    /// Adds or updates a feature, registering its name.
    ///
    /// `name`, `dist` and `support` are routed to the typed fields and
    /// validated; any other key is stored as is.
    ///
    /// # Errors
    /// [TreeError::Validation] if a built-in attribute receives an invalid value.
    pub fn add_feature<K, V>(&mut self, key: K, value: V) -> Result<(), TreeError>
    where
        K: Into<String>,
        V: Into<FeatureValue>,
    {
        let key = key.into();
        let value = value.into();
        match key.as_str() {
            feature::NAME => self.set_name(value.to_name()?),
            feature::DIST => self.set_dist(value.to_non_negative(feature::DIST)?)?,
            feature::SUPPORT => self.set_support(value.to_non_negative(feature::SUPPORT)?)?,
            _ => self.features.insert(key, value),
        }
        Ok(())
    }

    /// Deletes a feature and unregisters its name.
    ///
    /// A built-in attribute falls back to its default value. Deleting an
    /// absent feature does nothing.
    pub fn del_feature(&mut self, key: &str) {
        match key {
            feature::NAME => self.name = DEFAULT_NAME.to_string(),
            feature::DIST => self.dist = DEFAULT_DIST,
            feature::SUPPORT => self.support = DEFAULT_SUPPORT,
            _ => {}
        }
        self.features.remove(key);
    }

    /// Returns the value of a registered feature (built-ins included).
    pub fn feature(&self, key: &str) -> Option<FeatureValue> {
        if !feature::is_builtin(key) {
            return self.features.get(key).cloned();
        }
        if !self.features.is_registered(key) {
            return None;
        }
        Some(match key {
            feature::NAME => FeatureValue::Text(self.name.clone()),
            feature::DIST => FeatureValue::Float(self.dist),
            _ => FeatureValue::Float(self.support),
        })
    }

    /// Returns `true` if a feature named `key` is registered.
    pub fn has_feature(&self, key: &str) -> bool {
        self.features.is_registered(key)
    }

    /// Returns the registered feature names in sorted order.
    pub fn feature_names(&self) -> Vec<&str> {
        self.features.names().collect()
    }

    // ------------------------------------------------------------------------
    // Link maintenance, only the arena may touch these
    // ------------------------------------------------------------------------
    pub(crate) fn set_parent(&mut self, parent: Option<NodeIndex>) {
        self.parent = parent;
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<NodeIndex> {
        &mut self.children
    }

    pub(crate) fn set_collapsed(&mut self, collapsed: bool) {
        self.collapsed = collapsed;
    }

    /// Raw setters for values already known to be valid (rerooting).
    pub(crate) fn set_dist_unchecked(&mut self, dist: f64) {
        self.dist = dist;
    }

    pub(crate) fn set_support_unchecked(&mut self, support: f64) {
        self.support = support;
    }
}
