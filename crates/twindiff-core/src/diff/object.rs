use std::collections::BTreeMap;

use super::{diff_slots, Delta, ObjectDelta};
use crate::{DiffOptions, Node};

pub(super) fn diff_objects(
    before: &BTreeMap<String, Node>,
    after: &BTreeMap<String, Node>,
    options: &DiffOptions,
) -> Option<Delta> {
    let mut children = BTreeMap::new();

    for (key, value) in before {
        if let Some(delta) = diff_slots(Some(value), after.get(key), options) {
            children.insert(key.clone(), delta);
        }
    }

    for (key, value) in after {
        if before.contains_key(key) {
            continue;
        }
        children.insert(key.clone(), Delta::added(value.clone()));
    }

    if children.is_empty() {
        None
    } else {
        Some(Delta::Object(ObjectDelta { marker: None, children }))
    }
}
