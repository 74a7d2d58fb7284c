use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;

use crate::{
    diff::{Path, PathSegment},
    CanonicalizeError, Delta, DiffOptions, Number,
};

/// Represents the JSON-like data model compared by the diff engine.
///
/// Objects keep their keys in sorted order so that every traversal over a
/// document is deterministic regardless of the key order of the source text.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// JSON `null`.
    Null,
    /// JSON boolean.
    Bool(bool),
    /// JSON number represented as IEEE-754 double precision.
    Number(Number),
    /// JSON string.
    String(String),
    /// JSON array.
    Array(Vec<Node>),
    /// JSON object with deterministic key ordering.
    Object(BTreeMap<String, Node>),
}

impl Node {
    /// Parses a JSON string into a [`Node`].
    ///
    /// ```
    /// # use twindiff_core::Node;
    /// let node = Node::from_json_str("{\"hello\":\"world\"}")?;
    /// assert!(matches!(node, Node::Object(_)));
    /// assert!(Node::from_json_str("  ").is_err());
    /// # Ok::<(), twindiff_core::CanonicalizeError>(())
    /// ```
    pub fn from_json_str(input: &str) -> Result<Self, CanonicalizeError> {
        if input.trim().is_empty() {
            return Err(CanonicalizeError::Empty);
        }
        let value: JsonValue = serde_json::from_str(input)?;
        Self::from_json_value(value)
    }

    /// Parses a YAML string into a [`Node`].
    ///
    /// ```
    /// # use twindiff_core::Node;
    /// let node = Node::from_yaml_str("---\nanswer: 42\n")?;
    /// assert!(matches!(node, Node::Object(_)));
    /// # Ok::<(), twindiff_core::CanonicalizeError>(())
    /// ```
    pub fn from_yaml_str(input: &str) -> Result<Self, CanonicalizeError> {
        if input.trim().is_empty() {
            return Err(CanonicalizeError::Empty);
        }
        let value: YamlValue = serde_yaml::from_str(input)?;
        Self::from_yaml_value(value)
    }

    /// Converts a serde JSON value into a [`Node`].
    pub fn from_json_value(value: JsonValue) -> Result<Self, CanonicalizeError> {
        match value {
            JsonValue::Null => Ok(Self::Null),
            JsonValue::Bool(v) => Ok(Self::Bool(v)),
            JsonValue::Number(num) => {
                let Some(as_f64) = num.as_f64() else {
                    return Err(CanonicalizeError::NumberOutOfRange { value: num.to_string() });
                };
                Ok(Self::Number(Number::new(as_f64)?))
            }
            JsonValue::String(s) => Ok(Self::String(s)),
            JsonValue::Array(values) => {
                let mut items = Vec::with_capacity(values.len());
                for value in values {
                    items.push(Self::from_json_value(value)?);
                }
                Ok(Self::Array(items))
            }
            JsonValue::Object(map) => {
                let mut object = BTreeMap::new();
                for (key, value) in map {
                    object.insert(key, Self::from_json_value(value)?);
                }
                Ok(Self::Object(object))
            }
        }
    }

    fn from_yaml_value(value: YamlValue) -> Result<Self, CanonicalizeError> {
        match value {
            YamlValue::Null => Ok(Self::Null),
            YamlValue::Bool(v) => Ok(Self::Bool(v)),
            YamlValue::Number(num) => {
                if let Some(f) = num.as_f64() {
                    return Ok(Self::Number(Number::new(f)?));
                }
                if let Some(i) = num.as_i64() {
                    return Ok(Self::Number(Number::new(i as f64)?));
                }
                if let Some(u) = num.as_u64() {
                    return Ok(Self::Number(Number::new(u as f64)?));
                }
                Err(CanonicalizeError::NumberOutOfRange { value: num.to_string() })
            }
            YamlValue::String(s) => Ok(Self::String(s)),
            YamlValue::Sequence(seq) => {
                let mut items = Vec::with_capacity(seq.len());
                for value in seq {
                    items.push(Self::from_yaml_value(value)?);
                }
                Ok(Self::Array(items))
            }
            YamlValue::Mapping(map) => {
                let mut object = BTreeMap::new();
                for (key, value) in map {
                    let key = match key {
                        YamlValue::String(s) => s,
                        other => {
                            return Err(CanonicalizeError::NonStringYamlKey {
                                found: format!("{other:?}"),
                            });
                        }
                    };
                    object.insert(key, Self::from_yaml_value(value)?);
                }
                Ok(Self::Object(object))
            }
            YamlValue::Tagged(tagged) => {
                Err(CanonicalizeError::UnsupportedYamlTag { tag: tagged.tag.to_string() })
            }
        }
    }

    /// Converts the node into a serde JSON value.
    #[must_use]
    pub fn to_json_value(&self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::Bool(v) => JsonValue::Bool(*v),
            Self::Number(n) => JsonValue::Number(n.to_json_number()),
            Self::String(s) => JsonValue::String(s.clone()),
            Self::Array(values) => JsonValue::Array(values.iter().map(Self::to_json_value).collect()),
            Self::Object(map) => {
                let mut object = serde_json::Map::new();
                for (key, value) in map {
                    object.insert(key.clone(), value.to_json_value());
                }
                JsonValue::Object(object)
            }
        }
    }

    /// Compact JSON text with sorted object keys.
    ///
    /// ```
    /// # use twindiff_core::Node;
    /// let node = Node::from_json_str("{\"b\": [1.0, true], \"a\": null}")?;
    /// assert_eq!(node.canonical_json(), "{\"a\":null,\"b\":[1,true]}");
    /// # Ok::<(), twindiff_core::CanonicalizeError>(())
    /// ```
    #[must_use]
    pub fn canonical_json(&self) -> String {
        self.to_json_value().to_string()
    }

    /// Short lowercase name of the node's kind.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    /// Indicates whether the node is an object or an array.
    #[must_use]
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Array(_) | Self::Object(_))
    }

    /// Number of direct children; zero for primitives.
    #[must_use]
    pub fn child_count(&self) -> usize {
        match self {
            Self::Array(items) => items.len(),
            Self::Object(map) => map.len(),
            _ => 0,
        }
    }

    /// Returns the value stored under `key` when this node is an object.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Node> {
        match self {
            Self::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Looks up a single child by path segment.
    #[must_use]
    pub fn child(&self, segment: &PathSegment) -> Option<&Node> {
        match self {
            Self::Object(map) => map.get(&segment.to_key()),
            Self::Array(items) => segment.as_index().and_then(|index| items.get(index)),
            _ => None,
        }
    }

    /// Resolves a [`Path`] inside the document.
    ///
    /// ```
    /// # use twindiff_core::{diff::Path, Node};
    /// let doc = Node::from_json_str("{\"users\":[{\"name\":\"ada\"}]}")?;
    /// let name = doc.get_path(&Path::parse_dotted("users.0.name"));
    /// assert_eq!(name, Some(&Node::String("ada".into())));
    /// assert!(doc.get_path(&Path::parse_dotted("users.1")).is_none());
    /// # Ok::<(), twindiff_core::CanonicalizeError>(())
    /// ```
    #[must_use]
    pub fn get_path(&self, path: &Path) -> Option<&Node> {
        path.segments().iter().try_fold(self, |node, segment| node.child(segment))
    }

    /// Computes the structural delta from `self` to `other`.
    ///
    /// ```
    /// # use twindiff_core::{DiffOptions, Node};
    /// let lhs = Node::from_json_str("1")?;
    /// let rhs = Node::from_json_str("2")?;
    /// assert!(lhs.diff(&rhs, &DiffOptions::default()).is_some());
    /// assert!(lhs.diff(&lhs, &DiffOptions::default()).is_none());
    /// # Ok::<(), twindiff_core::CanonicalizeError>(())
    /// ```
    #[must_use]
    pub fn diff(&self, other: &Self, options: &DiffOptions) -> Option<Delta> {
        crate::diff::diff_nodes(self, other, options)
    }
}

impl TryFrom<JsonValue> for Node {
    type Error = CanonicalizeError;

    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        Self::from_json_value(value)
    }
}

impl From<&Node> for JsonValue {
    fn from(node: &Node) -> Self {
        node.to_json_value()
    }
}

impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = JsonValue::deserialize(deserializer)?;
        Self::from_json_value(value).map_err(serde::de::Error::custom)
    }
}
