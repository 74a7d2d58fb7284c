//! JSON encoding of [`Delta`] trees.
//!
//! | Delta | Encoding |
//! |-------|----------|
//! | added | `[new]` |
//! | modified | `[old, new]` |
//! | removed | `[old, 0, 0]` |
//! | moved | `[value, to, 3]` |
//! | text patch | `[patch, 0, 2]` |
//! | other three-element leaf | kept verbatim, classified as modified |
//! | object | `{"key": <delta>, ...}` plus optional `"_added"`/`"_removed"` |
//! | array | `{"_t": "a", "<i>": <delta>, "_<i>": <delta>}` |

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};

use super::{parse_index, ArrayDelta, Delta, LeafDelta, ObjectDelta, Path, PathSegment, WholeMarker};
use crate::{DeltaError, Node};

const ARRAY_MARKER_KEY: &str = "_t";
const ARRAY_MARKER: &str = "a";
const ADDED_KEY: &str = "_added";
const REMOVED_KEY: &str = "_removed";
const CODE_REMOVED: u64 = 0;
const CODE_TEXT: u64 = 2;
const CODE_MOVED: u64 = 3;

impl LeafDelta {
    /// Encodes the leaf as its fixed-length JSON array.
    #[must_use]
    pub fn to_json_value(&self) -> JsonValue {
        match self {
            Self::Added { new } => JsonValue::Array(vec![new.to_json_value()]),
            Self::Modified { old, new } => {
                JsonValue::Array(vec![old.to_json_value(), new.to_json_value()])
            }
            Self::Removed { old } => JsonValue::Array(vec![
                old.to_json_value(),
                JsonValue::from(0),
                JsonValue::from(CODE_REMOVED),
            ]),
            Self::Moved { value, to } => JsonValue::Array(vec![
                value.to_json_value(),
                JsonValue::from(*to as u64),
                JsonValue::from(CODE_MOVED),
            ]),
            Self::TextPatch { patch } => JsonValue::Array(vec![
                JsonValue::String(patch.clone()),
                JsonValue::from(0),
                JsonValue::from(CODE_TEXT),
            ]),
            Self::Other { value, position, code } => JsonValue::Array(vec![
                value.to_json_value(),
                position.to_json_value(),
                code.to_json_value(),
            ]),
        }
    }

    fn from_json_items(mut items: Vec<JsonValue>, path: &Path) -> Result<Self, DeltaError> {
        match items.len() {
            1 => Ok(Self::Added { new: Node::from_json_value(items.remove(0))? }),
            2 => {
                let new = Node::from_json_value(items.remove(1))?;
                let old = Node::from_json_value(items.remove(0))?;
                Ok(Self::Modified { old, new })
            }
            3 => {
                let position = items[1].as_u64();
                let code = items[2].as_u64();
                match (position, code) {
                    (Some(0), Some(CODE_REMOVED)) => {
                        Ok(Self::Removed { old: Node::from_json_value(items.remove(0))? })
                    }
                    (Some(to), Some(CODE_MOVED)) => match usize::try_from(to) {
                        Ok(to) => {
                            Ok(Self::Moved { value: Node::from_json_value(items.remove(0))?, to })
                        }
                        Err(_) => Self::other(items, path),
                    },
                    (Some(0), Some(CODE_TEXT)) => match &mut items[0] {
                        JsonValue::String(patch) => {
                            Ok(Self::TextPatch { patch: std::mem::take(patch) })
                        }
                        _ => Self::other(items, path),
                    },
                    _ => Self::other(items, path),
                }
            }
            len => Err(DeltaError::LeafLength { path: path.to_string(), len }),
        }
    }

    fn other(mut items: Vec<JsonValue>, path: &Path) -> Result<Self, DeltaError> {
        let code = Node::from_json_value(items.remove(2))?;
        let position = Node::from_json_value(items.remove(1))?;
        let value = Node::from_json_value(items.remove(0))?;
        tracing::debug!(
            %path,
            code = %code.canonical_json(),
            "unrecognized leaf encoding read as a modification"
        );
        Ok(Self::Other { value, position, code })
    }
}

impl Delta {
    /// Encodes the delta tree as JSON.
    ///
    /// ```
    /// # use twindiff_core::{diff, DiffOptions, Node};
    /// let before = Node::from_json_str("{\"a\":1,\"b\":2}")?;
    /// let after = Node::from_json_str("{\"a\":1}")?;
    /// let delta = diff(&before, &after, &DiffOptions::default()).unwrap();
    /// assert_eq!(delta.to_json_value().to_string(), "{\"b\":[2,0,0]}");
    /// # Ok::<(), twindiff_core::CanonicalizeError>(())
    /// ```
    #[must_use]
    pub fn to_json_value(&self) -> JsonValue {
        match self {
            Self::Leaf(leaf) => leaf.to_json_value(),
            Self::Object(object) => {
                let mut map = Map::new();
                match object.marker {
                    Some(WholeMarker::Added) => {
                        map.insert(ADDED_KEY.to_owned(), JsonValue::Bool(true));
                    }
                    Some(WholeMarker::Removed) => {
                        map.insert(REMOVED_KEY.to_owned(), JsonValue::Bool(true));
                    }
                    None => {}
                }
                for (key, child) in &object.children {
                    map.insert(key.clone(), child.to_json_value());
                }
                JsonValue::Object(map)
            }
            Self::Array(array) => {
                let mut map = Map::new();
                map.insert(ARRAY_MARKER_KEY.to_owned(), JsonValue::from(ARRAY_MARKER));
                for (index, child) in &array.after {
                    map.insert(index.to_string(), child.to_json_value());
                }
                for (index, child) in &array.before {
                    map.insert(format!("_{index}"), child.to_json_value());
                }
                JsonValue::Object(map)
            }
        }
    }

    /// Decodes a delta from its JSON encoding.
    ///
    /// ```
    /// # use twindiff_core::{classify, ChangeKind, Delta};
    /// let delta = Delta::from_json_value(serde_json::json!({"_t": "a", "_0": [1, 0, 0]}))?;
    /// assert_eq!(classify(Some(&delta)), Some(ChangeKind::Modified));
    /// # Ok::<(), twindiff_core::DeltaError>(())
    /// ```
    pub fn from_json_value(value: JsonValue) -> Result<Self, DeltaError> {
        decode(value, &mut Path::new())
    }

    /// Parses a delta from JSON text.
    pub fn from_json_str(input: &str) -> Result<Self, DeltaError> {
        let value: JsonValue =
            serde_json::from_str(input).map_err(crate::CanonicalizeError::from)?;
        Self::from_json_value(value)
    }
}

fn decode(value: JsonValue, path: &mut Path) -> Result<Delta, DeltaError> {
    match value {
        JsonValue::Array(items) => Ok(Delta::Leaf(LeafDelta::from_json_items(items, path)?)),
        JsonValue::Object(map) => {
            let is_array = map.get(ARRAY_MARKER_KEY).and_then(JsonValue::as_str) == Some(ARRAY_MARKER);
            if is_array {
                decode_array(map, path)
            } else {
                decode_object(map, path)
            }
        }
        other => Err(DeltaError::NotADelta { path: path.to_string(), found: json_kind(&other) }),
    }
}

fn decode_object(map: Map<String, JsonValue>, path: &mut Path) -> Result<Delta, DeltaError> {
    let mut object = ObjectDelta::default();
    for (key, value) in map {
        let is_delta_shaped = matches!(value, JsonValue::Array(_) | JsonValue::Object(_));
        if !is_delta_shaped && key == ADDED_KEY {
            object.marker = Some(WholeMarker::Added);
            continue;
        }
        if !is_delta_shaped && key == REMOVED_KEY {
            object.marker = Some(WholeMarker::Removed);
            continue;
        }
        path.push(PathSegment::key(key.as_str()));
        let child = decode(value, path)?;
        path.pop();
        object.children.insert(key, child);
    }
    Ok(Delta::Object(object))
}

fn decode_array(map: Map<String, JsonValue>, path: &mut Path) -> Result<Delta, DeltaError> {
    let mut array = ArrayDelta::default();
    for (key, value) in map {
        if key == ARRAY_MARKER_KEY {
            continue;
        }
        let (target, index) = match key.strip_prefix('_') {
            Some(rest) => (&mut array.before, parse_index(rest)),
            None => (&mut array.after, parse_index(&key)),
        };
        let Some(index) = index else {
            return Err(DeltaError::ArrayKey { path: path.to_string(), key });
        };
        path.push(PathSegment::index(index));
        let child = decode(value, path)?;
        path.pop();
        target.insert(index, child);
    }
    Ok(Delta::Array(array))
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

impl Serialize for Delta {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Delta {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = JsonValue::deserialize(deserializer)?;
        Self::from_json_value(value).map_err(serde::de::Error::custom)
    }
}
