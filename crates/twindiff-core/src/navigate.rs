//! Path-based lookup inside a delta tree.

use crate::{diff::Path, Delta};

/// Resolves the delta node at `path`.
///
/// Array deltas are looked up by after-position first and fall back to the
/// before-position entry. Any segment that has no counterpart yields `None`;
/// this is the normal outcome for unchanged parts of a document.
///
/// ```
/// # use twindiff_core::{diff::Path, resolve, Delta};
/// let delta = Delta::from_json_value(serde_json::json!({
///     "items": {"_t": "a", "0": [1], "_2": [5, 0, 0]}
/// }))?;
/// assert!(resolve(Some(&delta), &Path::parse_dotted("items.0")).is_some());
/// assert!(resolve(Some(&delta), &Path::parse_dotted("items.2")).is_some());
/// assert!(resolve(Some(&delta), &Path::parse_dotted("items.1")).is_none());
/// assert!(resolve(Some(&delta), &Path::parse_dotted("other.x")).is_none());
/// # Ok::<(), twindiff_core::DeltaError>(())
/// ```
#[must_use]
pub fn resolve<'a>(delta: Option<&'a Delta>, path: &Path) -> Option<&'a Delta> {
    let mut current = delta?;
    for segment in path {
        current = match current {
            Delta::Array(array) => array.get(segment.as_index()?)?,
            Delta::Object(object) => object.children.get(&segment.to_key())?,
            Delta::Leaf(_) => return None,
        };
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::PathSegment;
    use crate::testing::arb_json_value;
    use crate::{diff, ChangeKind, DiffOptions, Node};
    use proptest::prelude::*;
    use serde_json::json;

    fn delta(value: serde_json::Value) -> Delta {
        Delta::from_json_value(value).unwrap()
    }

    #[test]
    fn empty_path_returns_root() {
        let root = delta(json!({"a": [1]}));
        assert_eq!(resolve(Some(&root), &Path::new()), Some(&root));
    }

    #[test]
    fn absent_delta_resolves_to_none() {
        assert!(resolve(None, &Path::parse_dotted("a.b")).is_none());
    }

    #[test]
    fn after_position_shadows_before_position() {
        let root = delta(json!({"_t": "a", "1": [4], "_1": [2, 0, 0]}));
        let node = resolve(Some(&root), &Path::from(PathSegment::index(1)));
        assert_eq!(crate::classify(node), Some(ChangeKind::Added));
    }

    #[test]
    fn key_segment_resolves_inside_array_delta() {
        let root = delta(json!({"_t": "a", "_3": [2, 0, 0]}));
        let node = resolve(Some(&root), &Path::from(PathSegment::key("3")));
        assert_eq!(crate::classify(node), Some(ChangeKind::Removed));
    }

    #[test]
    fn prefixed_key_segment_is_not_an_index() {
        let root = delta(json!({"_t": "a", "_3": [2, 0, 0]}));
        assert!(resolve(Some(&root), &Path::from(PathSegment::key("_3"))).is_none());
    }

    #[test]
    fn leaf_stops_navigation() {
        let root = delta(json!({"a": [{"x": 1}, {"x": 2}]}));
        assert!(resolve(Some(&root), &Path::parse_dotted("a.x")).is_none());
    }

    #[test]
    fn index_segment_resolves_numeric_object_key() {
        let root = delta(json!({"0": [1, 2]}));
        assert!(resolve(Some(&root), &Path::from(PathSegment::index(0))).is_some());
    }

    fn arb_path() -> impl Strategy<Value = Path> {
        let segment = prop_oneof![
            (0usize..6).prop_map(PathSegment::index),
            "[a-c_0-9]{1,3}".prop_map(PathSegment::key),
        ];
        proptest::collection::vec(segment, 0..5).prop_map(Path::from)
    }

    proptest! {
        #[test]
        fn resolve_degrades_to_none(a in arb_json_value(), b in arb_json_value(), path in arb_path()) {
            let lhs = Node::from_json_value(a).unwrap();
            let rhs = Node::from_json_value(b).unwrap();
            let delta = diff(&lhs, &rhs, &DiffOptions::default());
            let resolved = resolve(delta.as_ref(), &path);
            if delta.is_none() {
                prop_assert!(resolved.is_none());
            }
            prop_assert_eq!(resolve(delta.as_ref(), &Path::new()), delta.as_ref());
        }
    }
}
