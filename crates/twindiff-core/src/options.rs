use std::fmt;
use std::sync::Arc;

use crate::{Node, OptionsError};

/// Fields consulted by [`DefaultIdentity`], in priority order.
pub const DEFAULT_IDENTITY_FIELDS: [&str; 3] = ["_id", "id", "name"];

/// Derives the identity key used to match array elements across the before
/// and after arrays.
///
/// Elements with equal keys at different positions are treated as the same
/// logical element that moved. Implementations must be pure: the same node
/// always yields the same key.
pub trait IdentityStrategy: fmt::Debug + Send + Sync {
    /// Returns the identity key for `node`.
    fn identity(&self, node: &Node) -> String;
}

/// Matches objects by `_id`, then `id`, then `name`, falling back to the
/// element's full serialization.
///
/// ```
/// # use twindiff_core::{DefaultIdentity, IdentityStrategy, Node};
/// let a = Node::from_json_str("{\"id\":7,\"v\":1}")?;
/// let b = Node::from_json_str("{\"id\":7,\"v\":2}")?;
/// assert_eq!(DefaultIdentity.identity(&a), DefaultIdentity.identity(&b));
/// # Ok::<(), twindiff_core::CanonicalizeError>(())
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultIdentity;

impl IdentityStrategy for DefaultIdentity {
    fn identity(&self, node: &Node) -> String {
        keyed_identity(node, DEFAULT_IDENTITY_FIELDS.iter().copied())
    }
}

/// Matches objects by a caller-supplied list of fields.
///
/// ```
/// # use twindiff_core::{IdentityStrategy, KeyedIdentity, Node};
/// let strategy = KeyedIdentity::new(["sku"])?;
/// let a = Node::from_json_str("{\"sku\":\"A-1\",\"qty\":1}")?;
/// let b = Node::from_json_str("{\"sku\":\"A-1\",\"qty\":5}")?;
/// assert_eq!(strategy.identity(&a), strategy.identity(&b));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyedIdentity {
    fields: Vec<String>,
}

impl KeyedIdentity {
    /// Builds a strategy from an ordered list of field names.
    pub fn new<I, S>(fields: I) -> Result<Self, OptionsError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut collected: Vec<String> = Vec::new();
        for field in fields {
            let field = field.into();
            if field.trim().is_empty() {
                return Err(OptionsError::EmptyIdentityKey);
            }
            if !collected.contains(&field) {
                collected.push(field);
            }
        }
        if collected.is_empty() {
            return Err(OptionsError::NoIdentityKeys);
        }
        Ok(Self { fields: collected })
    }

    /// Returns the configured field names in priority order.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

impl IdentityStrategy for KeyedIdentity {
    fn identity(&self, node: &Node) -> String {
        keyed_identity(node, self.fields.iter().map(String::as_str))
    }
}

/// Matches elements purely by value.
#[derive(Clone, Copy, Debug, Default)]
pub struct SerializedIdentity;

impl IdentityStrategy for SerializedIdentity {
    fn identity(&self, node: &Node) -> String {
        node.canonical_json()
    }
}

fn keyed_identity<'a>(node: &Node, fields: impl IntoIterator<Item = &'a str>) -> String {
    if let Node::Object(map) = node {
        for field in fields {
            match map.get(field) {
                None | Some(Node::Null) => continue,
                Some(value) => return format!("{field}={}", value.canonical_json()),
            }
        }
    }
    node.canonical_json()
}

/// Configuration passed to [`diff`](crate::diff).
#[derive(Clone, Debug)]
pub struct DiffOptions {
    identity: Arc<dyn IdentityStrategy>,
    detect_moves: bool,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self { identity: Arc::new(DefaultIdentity), detect_moves: true }
    }
}

impl DiffOptions {
    /// Returns the identity strategy used for array reconciliation.
    #[must_use]
    pub fn identity(&self) -> &dyn IdentityStrategy {
        self.identity.as_ref()
    }

    /// Indicates whether elements that changed position are reported as moves.
    ///
    /// ```
    /// # use twindiff_core::DiffOptions;
    /// assert!(DiffOptions::default().detect_moves());
    /// assert!(!DiffOptions::default().with_detect_moves(false).detect_moves());
    /// ```
    #[must_use]
    pub fn detect_moves(&self) -> bool {
        self.detect_moves
    }

    /// Replaces the identity strategy.
    #[must_use]
    pub fn with_identity<S>(mut self, strategy: S) -> Self
    where
        S: IdentityStrategy + 'static,
    {
        self.identity = Arc::new(strategy);
        self
    }

    /// Uses a [`KeyedIdentity`] built from the given field names.
    ///
    /// ```
    /// # use twindiff_core::{DiffOptions, OptionsError};
    /// assert!(DiffOptions::default().with_identity_keys(["uuid"]).is_ok());
    /// let err = DiffOptions::default().with_identity_keys([" "]).unwrap_err();
    /// assert_eq!(err, OptionsError::EmptyIdentityKey);
    /// ```
    pub fn with_identity_keys<I, S>(self, keys: I) -> Result<Self, OptionsError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(self.with_identity(KeyedIdentity::new(keys)?))
    }

    /// Enables or disables move detection.
    #[must_use]
    pub fn with_detect_moves(mut self, enabled: bool) -> Self {
        self.detect_moves = enabled;
        self
    }
}
