//! Node features (named attributes).
//!
//! Provides [FeatureValue], the tagged value type stored per node, and
//! [Features], the per-node map from feature name to value together with the
//! set of registered names. The three built-in attributes `name`, `dist` and
//! `support` live in typed fields on [Node](crate::model::Node) instead; this
//! module only supplies their defaults and the conversions used to validate
//! values assigned to them.

use crate::model::error::ValidationError;
use std::any::Any;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

/// Name of the built-in label attribute
pub const NAME: &str = "name";
/// Name of the built-in branch length attribute
pub const DIST: &str = "dist";
/// Name of the built-in branch support attribute
pub const SUPPORT: &str = "support";

/// Default node name
pub const DEFAULT_NAME: &str = "NoName";
/// Default branch length
pub const DEFAULT_DIST: f64 = 1.0;
/// Default branch support
pub const DEFAULT_SUPPORT: f64 = 1.0;

/// Returns whether `key` is one of `name`, `dist`, `support`.
pub fn is_builtin(key: &str) -> bool {
    matches!(key, NAME | DIST | SUPPORT)
}

// =#========================================================================#=
// FEATURE VALUE
// =#========================================================================$=
/// Enum to encapsulate a node feature value.
#[derive(Clone)]
pub enum FeatureValue {
    /// For floating point values
    Float(f64),
    /// For integer values
    Int(i64),
    /// For strings
    Text(String),
    /// For flags
    Bool(bool),
    /// For anything else; compared by identity
    Opaque(Arc<dyn Any + Send + Sync>),
}

impl FeatureValue {
    /// Short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            FeatureValue::Float(_) => "float",
            FeatureValue::Int(_) => "int",
            FeatureValue::Text(_) => "text",
            FeatureValue::Bool(_) => "bool",
            FeatureValue::Opaque(_) => "opaque",
        }
    }

    /// Returns the value as `f64` if it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Float(v) => Some(*v),
            FeatureValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Returns the text if this is a [FeatureValue::Text].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FeatureValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Converts the value into a finite, non-negative number for `field`.
    ///
    /// Text is parsed as a float.
    ///
    /// # Errors
    /// [ValidationError] if the value is not numeric, negative or not finite.
    pub fn to_non_negative(&self, field: &'static str) -> Result<f64, ValidationError> {
        let value = match self {
            FeatureValue::Float(v) => *v,
            FeatureValue::Int(v) => *v as f64,
            FeatureValue::Text(text) => {
                text.trim()
                    .parse::<f64>()
                    .map_err(|_| ValidationError::NotANumber {
                        field,
                        text: text.clone(),
                    })?
            }
            other => {
                return Err(ValidationError::WrongType {
                    field,
                    found: other.type_name(),
                });
            }
        };
        validate_non_negative(field, value)
    }

    /// Converts the value into a node name.
    ///
    /// Numbers and flags are rendered as text; opaque values are rejected.
    pub fn to_name(&self) -> Result<String, ValidationError> {
        match self {
            FeatureValue::Text(s) => Ok(s.clone()),
            FeatureValue::Float(v) => Ok(v.to_string()),
            FeatureValue::Int(v) => Ok(v.to_string()),
            FeatureValue::Bool(v) => Ok(v.to_string()),
            FeatureValue::Opaque(_) => Err(ValidationError::WrongType {
                field: NAME,
                found: "opaque",
            }),
        }
    }
}

/// Checks that `value` is finite and non-negative.
pub fn validate_non_negative(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field, value });
    }
    if value < 0.0 {
        return Err(ValidationError::Negative { field, value });
    }
    Ok(value)
}

impl fmt::Debug for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Float(v) => f.debug_tuple("Float").field(v).finish(),
            FeatureValue::Int(v) => f.debug_tuple("Int").field(v).finish(),
            FeatureValue::Text(v) => f.debug_tuple("Text").field(v).finish(),
            FeatureValue::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            FeatureValue::Opaque(_) => f.write_str("Opaque(..)"),
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Float(v) => write!(f, "{v}"),
            FeatureValue::Int(v) => write!(f, "{v}"),
            FeatureValue::Text(v) => f.write_str(v),
            FeatureValue::Bool(v) => write!(f, "{v}"),
            FeatureValue::Opaque(_) => f.write_str("<opaque>"),
        }
    }
}

impl PartialEq for FeatureValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FeatureValue::Float(a), FeatureValue::Float(b)) => a == b,
            (FeatureValue::Int(a), FeatureValue::Int(b)) => a == b,
            (FeatureValue::Text(a), FeatureValue::Text(b)) => a == b,
            (FeatureValue::Bool(a), FeatureValue::Bool(b)) => a == b,
            (FeatureValue::Opaque(a), FeatureValue::Opaque(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<f64> for FeatureValue {
    fn from(v: f64) -> Self {
        FeatureValue::Float(v)
    }
}

impl From<f32> for FeatureValue {
    fn from(v: f32) -> Self {
        FeatureValue::Float(v as f64)
    }
}

impl From<i64> for FeatureValue {
    fn from(v: i64) -> Self {
        FeatureValue::Int(v)
    }
}

impl From<i32> for FeatureValue {
    fn from(v: i32) -> Self {
        FeatureValue::Int(v as i64)
    }
}

impl From<bool> for FeatureValue {
    fn from(v: bool) -> Self {
        FeatureValue::Bool(v)
    }
}

impl From<String> for FeatureValue {
    fn from(v: String) -> Self {
        FeatureValue::Text(v)
    }
}

impl From<&str> for FeatureValue {
    fn from(v: &str) -> Self {
        FeatureValue::Text(v.to_string())
    }
}

// =#========================================================================#=
// FEATURES
// =#========================================================================$=
/// Custom features of a single node plus the set of registered names.
///
/// Registered names decide what a writer emits for the node. The built-in
/// names are registered from construction on, even though their values are
/// held outside of this map.
#[derive(Debug, Clone)]
pub struct Features {
    values: HashMap<String, FeatureValue>,
    registered: BTreeSet<String>,
}

impl Features {
    /// Creates the feature set of a fresh node (built-ins registered).
    pub fn new() -> Self {
        let registered = [NAME, DIST, SUPPORT].iter().map(|s| s.to_string()).collect();
        Features {
            values: HashMap::new(),
            registered,
        }
    }

    /// Returns the custom value stored for `key`.
    pub fn get(&self, key: &str) -> Option<&FeatureValue> {
        self.values.get(key)
    }

    /// Stores a custom value and registers `key`.
    pub fn insert(&mut self, key: String, value: FeatureValue) {
        self.registered.insert(key.clone());
        self.values.insert(key, value);
    }

    /// Registers `key` without storing a value (used for built-ins).
    pub fn register(&mut self, key: &str) {
        if !self.registered.contains(key) {
            self.registered.insert(key.to_string());
        }
    }

    /// Removes the value of `key` and unregisters it. Returns the removed value.
    pub fn remove(&mut self, key: &str) -> Option<FeatureValue> {
        self.registered.remove(key);
        self.values.remove(key)
    }

    /// Returns whether `key` is registered.
    pub fn is_registered(&self, key: &str) -> bool {
        self.registered.contains(key)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.registered.iter().map(String::as_str)
    }
}

impl Default for Features {
    fn default() -> Self {
        Self::new()
    }
}
