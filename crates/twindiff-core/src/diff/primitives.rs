use super::Delta;
use crate::Node;

/// Compares non-container values, or values of different kinds, as a whole.
pub(super) fn diff_primitives(before: &Node, after: &Node) -> Option<Delta> {
    if before == after {
        return None;
    }
    Some(Delta::modified(before.clone(), after.clone()))
}
