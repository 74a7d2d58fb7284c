use thiserror::Error;

/// Errors that can occur while canonicalizing external data into [`Node`](crate::Node).
#[derive(Debug, Error)]
pub enum CanonicalizeError {
    /// The input contained no document at all.
    #[error("input is empty")]
    Empty,
    /// The provided JSON input was invalid.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The provided YAML input was invalid.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// Encountered a number that cannot be represented as an IEEE-754 f64.
    #[error("number {value} cannot be represented as f64")]
    NumberOutOfRange {
        /// The textual representation of the offending number.
        value: String,
    },
    /// YAML maps may only contain string keys.
    #[error("unsupported YAML key type: {found}")]
    NonStringYamlKey {
        /// A description of the key that triggered the error.
        found: String,
    },
    /// YAML tags have no JSON counterpart and are rejected.
    #[error("unsupported YAML tag: {tag}")]
    UnsupportedYamlTag {
        /// The tag identifier encountered in the document.
        tag: String,
    },
    /// Attempted to construct a [`Number`](crate::Number) that is not finite.
    #[error("non-finite number encountered: {value}")]
    NotFinite {
        /// The offending numeric value.
        value: f64,
    },
}

/// Errors emitted when constructing [`DiffOptions`](crate::DiffOptions).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionsError {
    /// An identity strategy needs at least one field to look at.
    #[error("identity keys require at least one field name")]
    NoIdentityKeys,
    /// Identity keys must be non-empty strings.
    #[error("identity keys must be non-empty strings")]
    EmptyIdentityKey,
}

/// Errors raised while decoding the JSON encoding of a [`Delta`](crate::Delta).
#[derive(Debug, Error)]
pub enum DeltaError {
    /// The encoded value is neither a leaf array nor an object/array delta.
    #[error("expected a delta at {path}, found {found}")]
    NotADelta {
        /// Dotted path of the offending node.
        path: String,
        /// Short description of what was found instead.
        found: &'static str,
    },
    /// Leaf encodings hold one, two or three elements.
    #[error("leaf delta at {path} has unsupported length {len}")]
    LeafLength {
        /// Dotted path of the offending node.
        path: String,
        /// Number of elements found.
        len: usize,
    },
    /// Array deltas may only hold `_t`, `<index>` and `_<index>` keys.
    #[error("array delta at {path} has invalid key {key:?}")]
    ArrayKey {
        /// Dotted path of the array delta.
        path: String,
        /// The key that could not be interpreted.
        key: String,
    },
    /// An embedded value could not be canonicalized.
    #[error("invalid value in delta: {0}")]
    Value(#[from] CanonicalizeError),
}

/// Errors reported by [`DiffSession`](crate::DiffSession) before any comparison runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// One of the two panels has no document loaded.
    #[error("both panels need data for comparison ({side} side is empty)")]
    MissingDocument {
        /// Which side is missing.
        side: crate::Side,
    },
}
