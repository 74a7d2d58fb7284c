//! Delta data structures and the structural diff algorithm.
//!
//! A [`Delta`] describes how one document turns into another. It is a typed
//! tree: leaves carry the changed values, objects carry per-key child deltas
//! and arrays carry two sparse maps, one keyed by positions in the after
//! array and one keyed by positions in the before array. The JSON encoding of
//! that tree lives in the `encode` submodule.

mod encode;
mod list;
mod object;
mod path;
mod primitives;

use std::collections::BTreeMap;

pub use path::{Path, PathSegment};

pub(crate) use path::parse_index;

use serde::{Deserialize, Serialize};

use crate::{DiffOptions, Node};

/// The kind of change attached to a delta node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// The node exists only in the after document.
    Added,
    /// The node exists only in the before document.
    Removed,
    /// The node exists on both sides with different content or position.
    Modified,
}

impl ChangeKind {
    /// Lowercase label used in summaries and rendered output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Modified => "modified",
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A change at a single location.
#[derive(Clone, Debug, PartialEq)]
pub enum LeafDelta {
    /// A value that exists only in the after document. Encoded as `[new]`.
    Added {
        /// The added value.
        new: Node,
    },
    /// A value that exists only in the before document. Encoded as `[old, 0, 0]`.
    Removed {
        /// The removed value.
        old: Node,
    },
    /// A replaced value. Encoded as `[old, new]`.
    Modified {
        /// Value in the before document.
        old: Node,
        /// Value in the after document.
        new: Node,
    },
    /// An array element that moved to position `to` of the after array.
    /// Stored under its before position and encoded as `[value, to, 3]`.
    Moved {
        /// The moved element as it appeared in the before array.
        value: Node,
        /// Index of the element in the after array.
        to: usize,
    },
    /// A textual patch of a long string, encoded as `[patch, 0, 2]`. Never
    /// produced by [`diff`], only accepted when decoding.
    TextPatch {
        /// The unified-diff style patch text.
        patch: String,
    },
    /// A three-element leaf whose code is not one of the above. It counts as
    /// a modification and is re-encoded exactly as it was read.
    Other {
        /// First element of the encoding.
        value: Node,
        /// Second element of the encoding.
        position: Node,
        /// Third element of the encoding.
        code: Node,
    },
}

impl LeafDelta {
    /// Returns the change kind carried by this leaf.
    #[must_use]
    pub fn kind(&self) -> ChangeKind {
        match self {
            Self::Added { .. } => ChangeKind::Added,
            Self::Removed { .. } => ChangeKind::Removed,
            Self::Modified { .. }
            | Self::Moved { .. }
            | Self::TextPatch { .. }
            | Self::Other { .. } => ChangeKind::Modified,
        }
    }

    /// Value on the before side, when the encoding carries it.
    #[must_use]
    pub fn old_value(&self) -> Option<&Node> {
        match self {
            Self::Removed { old } | Self::Modified { old, .. } => Some(old),
            Self::Moved { value, .. } => Some(value),
            Self::Added { .. } | Self::TextPatch { .. } | Self::Other { .. } => None,
        }
    }

    /// Value on the after side, when the encoding carries it.
    #[must_use]
    pub fn new_value(&self) -> Option<&Node> {
        match self {
            Self::Added { new } | Self::Modified { new, .. } => Some(new),
            Self::Moved { value, .. } => Some(value),
            Self::Removed { .. } | Self::TextPatch { .. } | Self::Other { .. } => None,
        }
    }
}

/// Whole-object marker carried by an [`ObjectDelta`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WholeMarker {
    /// Encoded as the reserved key `_added`.
    Added,
    /// Encoded as the reserved key `_removed`.
    Removed,
}

/// Per-key changes of an object.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjectDelta {
    /// Optional whole-object add/remove marker.
    pub marker: Option<WholeMarker>,
    /// Child deltas keyed by object key.
    pub children: BTreeMap<String, Delta>,
}

/// Sparse changes of an array.
///
/// `after` is keyed by positions in the after array (additions, nested
/// modifications of matched elements); `before` is keyed by positions in the
/// before array (removals and the origin of moves). The same index can appear
/// in both maps.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ArrayDelta {
    /// Entries keyed by after-array position (encoded as `"<i>"`).
    pub after: BTreeMap<usize, Delta>,
    /// Entries keyed by before-array position (encoded as `"_<i>"`).
    pub before: BTreeMap<usize, Delta>,
}

impl ArrayDelta {
    /// Looks up `index`, preferring the after-position entry.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Delta> {
        self.after.get(&index).or_else(|| self.before.get(&index))
    }

    /// Indicates whether neither map holds an entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.after.is_empty() && self.before.is_empty()
    }
}

/// The difference between two documents.
#[derive(Clone, Debug, PartialEq)]
pub enum Delta {
    /// A change to a single value.
    Leaf(LeafDelta),
    /// Changes inside an object.
    Object(ObjectDelta),
    /// Changes inside an array.
    Array(ArrayDelta),
}

impl Delta {
    pub(crate) fn added(new: Node) -> Self {
        Self::Leaf(LeafDelta::Added { new })
    }

    pub(crate) fn removed(old: Node) -> Self {
        Self::Leaf(LeafDelta::Removed { old })
    }

    pub(crate) fn modified(old: Node, new: Node) -> Self {
        Self::Leaf(LeafDelta::Modified { old, new })
    }

    /// Indicates whether the node records a change of its own, as opposed to
    /// only holding changes further down. Array deltas never do.
    #[must_use]
    pub fn carries_own_change(&self) -> bool {
        match self {
            Self::Leaf(_) => true,
            Self::Object(object) => object.marker.is_some(),
            Self::Array(_) => false,
        }
    }

    /// Iterates over the structural children of this node together with the
    /// path segment each is reached by. Leaves have no children; array
    /// entries are reported under their numeric index, after-entries first.
    pub fn children(&self) -> Box<dyn Iterator<Item = (PathSegment, &Delta)> + '_> {
        match self {
            Self::Leaf(_) => Box::new(std::iter::empty()),
            Self::Object(object) => Box::new(
                object.children.iter().map(|(key, child)| (PathSegment::key(key.as_str()), child)),
            ),
            Self::Array(array) => Box::new(
                array
                    .after
                    .iter()
                    .chain(array.before.iter())
                    .map(|(index, child)| (PathSegment::index(*index), child)),
            ),
        }
    }
}

/// Computes the delta between two documents; `None` when they are equal.
///
/// ```
/// # use twindiff_core::{diff, ChangeKind, DiffOptions, Node};
/// let before = Node::from_json_str("{\"a\":1}")?;
/// let after = Node::from_json_str("{\"a\":1,\"b\":2}")?;
/// let delta = diff(&before, &after, &DiffOptions::default()).expect("documents differ");
/// assert_eq!(delta.to_json_value(), serde_json::json!({"b": [2]}));
/// # Ok::<(), twindiff_core::CanonicalizeError>(())
/// ```
#[must_use]
pub fn diff(before: &Node, after: &Node, options: &DiffOptions) -> Option<Delta> {
    diff_nodes(before, after, options)
}

pub(crate) fn diff_nodes(before: &Node, after: &Node, options: &DiffOptions) -> Option<Delta> {
    match (before, after) {
        (Node::Object(left), Node::Object(right)) => object::diff_objects(left, right, options),
        (Node::Array(left), Node::Array(right)) => list::diff_lists(left, right, options),
        _ => primitives::diff_primitives(before, after),
    }
}

/// Diffs two optional slots, used where a key or element may be absent on
/// one side.
pub(crate) fn diff_slots(
    before: Option<&Node>,
    after: Option<&Node>,
    options: &DiffOptions,
) -> Option<Delta> {
    match (before, after) {
        (Some(before), Some(after)) => diff_nodes(before, after, options),
        (Some(before), None) => Some(Delta::removed(before.clone())),
        (None, Some(after)) => Some(Delta::added(after.clone())),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::arb_json_value;
    use proptest::prelude::*;
    use serde_json::json;

    fn node(text: &str) -> Node {
        Node::from_json_str(text).unwrap()
    }

    fn encoded(before: &str, after: &str) -> serde_json::Value {
        diff(&node(before), &node(after), &DiffOptions::default())
            .map(|delta| delta.to_json_value())
            .unwrap_or(serde_json::Value::Null)
    }

    #[test]
    fn numbers_produce_modification() {
        let delta = diff(&node("1"), &node("2"), &DiffOptions::default()).unwrap();
        assert_eq!(delta, Delta::modified(node("1"), node("2")));
    }

    #[test]
    fn empty_objects_are_equal() {
        assert!(diff(&node("{}"), &node("{}"), &DiffOptions::default()).is_none());
    }

    #[test]
    fn null_against_object_is_replacement() {
        assert_eq!(encoded("null", "{}"), json!([null, {}]));
    }

    #[test]
    fn object_against_array_is_replacement() {
        assert_eq!(encoded("{\"a\":1}", "[1]"), json!([{"a": 1}, [1]]));
    }

    #[test]
    fn objects_track_additions_and_removals() {
        assert_eq!(
            encoded("{\"a\":1,\"b\":2}", "{\"b\":2,\"c\":3}"),
            json!({"a": [1, 0, 0], "c": [3]})
        );
    }

    #[test]
    fn nested_objects_only_report_changed_keys() {
        assert_eq!(
            encoded("{\"a\":{\"b\":1,\"c\":true}}", "{\"a\":{\"b\":2,\"c\":true}}"),
            json!({"a": {"b": [1, 2]}})
        );
    }

    #[test]
    fn whole_object_value_added_under_key() {
        assert_eq!(encoded("{}", "{\"o\":{\"x\":1}}"), json!({"o": [{"x": 1}]}));
    }

    #[test]
    fn key_order_does_not_matter() {
        assert!(diff(
            &node("{\"a\":1,\"b\":[1,2]}"),
            &node("{\"b\":[1,2],\"a\":1}"),
            &DiffOptions::default()
        )
        .is_none());
    }

    proptest! {
        #[test]
        fn identical_nodes_produce_no_delta(json in arb_json_value()) {
            let node = Node::from_json_value(json.clone()).unwrap();
            let other = Node::from_json_value(json).unwrap();
            prop_assert!(diff(&node, &other, &DiffOptions::default()).is_none());
        }

        #[test]
        fn differing_nodes_produce_delta(a in arb_json_value(), b in arb_json_value()) {
            let lhs = Node::from_json_value(a).unwrap();
            let rhs = Node::from_json_value(b).unwrap();
            let delta = diff(&lhs, &rhs, &DiffOptions::default());
            prop_assert_eq!(delta.is_none(), lhs == rhs);
        }
    }
}
