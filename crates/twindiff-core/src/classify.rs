//! Change classification of delta nodes.

use crate::{ChangeKind, Delta, WholeMarker};

/// Classifies a delta node.
///
/// Array deltas are always `modified` at the array level; their items surface
/// individually one level deeper. Object deltas report their whole-object
/// marker when present, otherwise `modified` if any child classifies.
///
/// ```
/// # use twindiff_core::{classify, ChangeKind, Delta};
/// let added = Delta::from_json_value(serde_json::json!([1]))?;
/// let removed = Delta::from_json_value(serde_json::json!([1, 0, 0]))?;
/// let moved = Delta::from_json_value(serde_json::json!([1, 4, 3]))?;
/// assert_eq!(classify(Some(&added)), Some(ChangeKind::Added));
/// assert_eq!(classify(Some(&removed)), Some(ChangeKind::Removed));
/// assert_eq!(classify(Some(&moved)), Some(ChangeKind::Modified));
/// assert_eq!(classify(None), None);
/// # Ok::<(), twindiff_core::DeltaError>(())
/// ```
#[must_use]
pub fn classify(node: Option<&Delta>) -> Option<ChangeKind> {
    match node? {
        Delta::Array(_) => Some(ChangeKind::Modified),
        Delta::Leaf(leaf) => Some(leaf.kind()),
        Delta::Object(object) => match object.marker {
            Some(WholeMarker::Added) => Some(ChangeKind::Added),
            Some(WholeMarker::Removed) => Some(ChangeKind::Removed),
            None => object
                .children
                .values()
                .any(|child| classify(Some(child)).is_some())
                .then_some(ChangeKind::Modified),
        },
    }
}

/// Reports whether a node, or anything below it, carries a change.
///
/// ```
/// # use twindiff_core::{has_changes, Delta};
/// let empty = Delta::from_json_value(serde_json::json!({}))?;
/// let nested = Delta::from_json_value(serde_json::json!({"a": {"b": [1, 2]}}))?;
/// assert!(!has_changes(Some(&empty)));
/// assert!(has_changes(Some(&nested)));
/// # Ok::<(), twindiff_core::DeltaError>(())
/// ```
#[must_use]
pub fn has_changes(node: Option<&Delta>) -> bool {
    let Some(node) = node else {
        return false;
    };
    classify(Some(node)).is_some() || node.children().any(|(_, child)| has_changes(Some(child)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::arb_json_value;
    use crate::{diff, DiffOptions, Node};
    use proptest::prelude::*;
    use serde_json::json;

    fn delta(value: serde_json::Value) -> Delta {
        Delta::from_json_value(value).unwrap()
    }

    #[test]
    fn modification_leaf_is_modified() {
        assert_eq!(classify(Some(&delta(json!([1, 2])))), Some(ChangeKind::Modified));
    }

    #[test]
    fn text_patch_is_modified() {
        assert_eq!(classify(Some(&delta(json!(["@@", 0, 2])))), Some(ChangeKind::Modified));
    }

    #[test]
    fn array_delta_is_modified_even_for_pure_moves() {
        assert_eq!(
            classify(Some(&delta(json!({"_t": "a", "_1": ["b", 0, 3]})))),
            Some(ChangeKind::Modified)
        );
    }

    #[test]
    fn whole_object_markers_win() {
        assert_eq!(classify(Some(&delta(json!({"_added": true, "a": [1, 2]})))), Some(ChangeKind::Added));
        assert_eq!(classify(Some(&delta(json!({"_removed": true})))), Some(ChangeKind::Removed));
    }

    #[test]
    fn object_without_classified_children_is_unclassified() {
        let node = delta(json!({"a": {}}));
        assert_eq!(classify(Some(&node)), None);
        assert!(!has_changes(Some(&node)));
    }

    #[test]
    fn object_with_nested_object_change_is_modified() {
        assert_eq!(classify(Some(&delta(json!({"a": {"b": [1]}})))), Some(ChangeKind::Modified));
    }

    #[test]
    fn modification_is_its_own_inverse_in_kind() {
        let a = Node::from_json_str("\"left\"").unwrap();
        let b = Node::from_json_str("\"right\"").unwrap();
        let forward = diff(&a, &b, &DiffOptions::default());
        let backward = diff(&b, &a, &DiffOptions::default());
        assert_eq!(classify(forward.as_ref()), Some(ChangeKind::Modified));
        assert_eq!(classify(backward.as_ref()), Some(ChangeKind::Modified));
    }

    fn any_descendant_classified(node: &Delta) -> bool {
        node.children()
            .any(|(_, child)| classify(Some(child)).is_some() || any_descendant_classified(child))
    }

    proptest! {
        #[test]
        fn produced_deltas_always_have_changes(a in arb_json_value(), b in arb_json_value()) {
            let lhs = Node::from_json_value(a).unwrap();
            let rhs = Node::from_json_value(b).unwrap();
            if let Some(delta) = diff(&lhs, &rhs, &DiffOptions::default()) {
                prop_assert!(classify(Some(&delta)).is_some());
                prop_assert!(has_changes(Some(&delta)));
            }
        }

        #[test]
        fn has_changes_is_monotone(a in arb_json_value(), b in arb_json_value()) {
            let lhs = Node::from_json_value(a).unwrap();
            let rhs = Node::from_json_value(b).unwrap();
            if let Some(delta) = diff(&lhs, &rhs, &DiffOptions::default()) {
                if any_descendant_classified(&delta) {
                    prop_assert!(has_changes(Some(&delta)));
                }
            }
        }
    }
}
