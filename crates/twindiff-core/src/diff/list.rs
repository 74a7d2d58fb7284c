use std::collections::BTreeMap;

use super::{diff_nodes, ArrayDelta, Delta, LeafDelta};
use crate::{DiffOptions, Node};

/// Reconciles two arrays by element identity.
///
/// Elements are first matched along the common head and tail, then the
/// remaining middle sections are aligned with a longest common subsequence
/// over identity keys. Unmatched before-elements are removals, unmatched
/// after-elements are additions, unless move detection pairs an addition
/// with a removal that shares its identity key.
pub(super) fn diff_lists(before: &[Node], after: &[Node], options: &DiffOptions) -> Option<Delta> {
    if before == after {
        return None;
    }

    let identity = options.identity();
    let left_keys: Vec<String> = before.iter().map(|node| identity.identity(node)).collect();
    let right_keys: Vec<String> = after.iter().map(|node| identity.identity(node)).collect();
    let mut delta = ArrayDelta::default();
    let mut stats = Stats::default();

    let mut head = 0usize;
    while head < before.len() && head < after.len() && left_keys[head] == right_keys[head] {
        stats.matched += 1;
        if let Some(child) = diff_nodes(&before[head], &after[head], options) {
            delta.after.insert(head, child);
        }
        head += 1;
    }

    let mut tail = 0usize;
    while head + tail < before.len()
        && head + tail < after.len()
        && left_keys[before.len() - 1 - tail] == right_keys[after.len() - 1 - tail]
    {
        let left = before.len() - 1 - tail;
        let right = after.len() - 1 - tail;
        stats.matched += 1;
        if let Some(child) = diff_nodes(&before[left], &after[right], options) {
            delta.after.insert(right, child);
        }
        tail += 1;
    }

    let left_end = before.len() - tail;
    let right_end = after.len() - tail;

    let common = longest_common_subsequence(&left_keys[head..left_end], &right_keys[head..right_end]);
    let matches: BTreeMap<usize, usize> =
        common.into_iter().map(|(left, right)| (right + head, left + head)).collect();
    let matched_left: Vec<bool> = {
        let mut flags = vec![false; left_end - head];
        for left in matches.values() {
            flags[left - head] = true;
        }
        flags
    };

    let mut unclaimed: Vec<usize> =
        (head..left_end).filter(|index| !matched_left[index - head]).collect();
    for &index in &unclaimed {
        delta.before.insert(index, Delta::removed(before[index].clone()));
    }
    stats.removed = unclaimed.len();

    for right in head..right_end {
        if let Some(&left) = matches.get(&right) {
            stats.matched += 1;
            if let Some(child) = diff_nodes(&before[left], &after[right], options) {
                delta.after.insert(right, child);
            }
            continue;
        }

        let origin = if options.detect_moves() {
            unclaimed.iter().position(|&left| left_keys[left] == right_keys[right])
        } else {
            None
        };

        match origin {
            Some(slot) => {
                let left = unclaimed.remove(slot);
                stats.removed -= 1;
                stats.moved += 1;
                delta.before.insert(
                    left,
                    Delta::Leaf(LeafDelta::Moved { value: before[left].clone(), to: right }),
                );
                if let Some(child) = diff_nodes(&before[left], &after[right], options) {
                    delta.after.insert(right, child);
                }
            }
            None => {
                stats.added += 1;
                delta.after.insert(right, Delta::added(after[right].clone()));
            }
        }
    }

    tracing::trace!(
        before_len = before.len(),
        after_len = after.len(),
        matched = stats.matched,
        moved = stats.moved,
        added = stats.added,
        removed = stats.removed,
        "reconciled array"
    );

    if delta.is_empty() {
        None
    } else {
        Some(Delta::Array(delta))
    }
}

#[derive(Debug, Default)]
struct Stats {
    matched: usize,
    moved: usize,
    added: usize,
    removed: usize,
}

/// Returns matched `(left, right)` index pairs of a longest common
/// subsequence, in ascending order.
fn longest_common_subsequence(lhs: &[String], rhs: &[String]) -> Vec<(usize, usize)> {
    let n = lhs.len();
    let m = rhs.len();
    if n == 0 || m == 0 {
        return Vec::new();
    }
    let mut table = vec![vec![0usize; m + 1]; n + 1];
    for (i, lhs_key) in lhs.iter().enumerate() {
        for (j, rhs_key) in rhs.iter().enumerate() {
            if lhs_key == rhs_key {
                table[i + 1][j + 1] = table[i][j] + 1;
            } else {
                table[i + 1][j + 1] = table[i][j + 1].max(table[i + 1][j]);
            }
        }
    }

    let mut result = Vec::with_capacity(table[n][m]);
    let mut i = n;
    let mut j = m;
    while i > 0 && j > 0 {
        if lhs[i - 1] == rhs[j - 1] {
            result.push((i - 1, j - 1));
            i -= 1;
            j -= 1;
        } else if table[i - 1][j] >= table[i][j - 1] {
            i -= 1;
        } else {
            j -= 1;
        }
    }
    result.reverse();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::diff;
    use serde_json::json;

    fn encoded(before: &str, after: &str, options: &DiffOptions) -> serde_json::Value {
        let before = Node::from_json_str(before).unwrap();
        let after = Node::from_json_str(after).unwrap();
        diff(&before, &after, options)
            .map(|delta| delta.to_json_value())
            .unwrap_or(serde_json::Value::Null)
    }

    #[test]
    fn equal_arrays_have_no_delta() {
        assert_eq!(encoded("[1,[2],{\"a\":3}]", "[1,[2],{\"a\":3}]", &DiffOptions::default()), json!(null));
    }

    #[test]
    fn substitution_is_removal_plus_addition() {
        assert_eq!(
            encoded("[1,2,3]", "[1,4,3]", &DiffOptions::default()),
            json!({"_t": "a", "1": [4], "_1": [2, 0, 0]})
        );
    }

    #[test]
    fn append_is_addition() {
        assert_eq!(encoded("[1,2]", "[1,2,3]", &DiffOptions::default()), json!({"_t": "a", "2": [3]}));
    }

    #[test]
    fn truncation_is_removal() {
        assert_eq!(
            encoded("[1,2,3]", "[1]", &DiffOptions::default()),
            json!({"_t": "a", "_1": [2, 0, 0], "_2": [3, 0, 0]})
        );
    }

    #[test]
    fn matched_element_with_changed_content_nests() {
        assert_eq!(
            encoded(
                "[{\"id\":1,\"v\":\"x\"}]",
                "[{\"id\":1,\"v\":\"z\"}]",
                &DiffOptions::default()
            ),
            json!({"_t": "a", "0": {"v": ["x", "z"]}})
        );
    }

    #[test]
    fn swapped_elements_are_a_single_move() {
        assert_eq!(
            encoded(
                "[{\"id\":1,\"v\":\"x\"},{\"id\":2,\"v\":\"y\"}]",
                "[{\"id\":2,\"v\":\"y\"},{\"id\":1,\"v\":\"x\"}]",
                &DiffOptions::default()
            ),
            json!({"_t": "a", "_1": [{"id": 2, "v": "y"}, 0, 3]})
        );
    }

    #[test]
    fn moved_element_with_changed_content_reports_both() {
        assert_eq!(
            encoded(
                "[{\"id\":1,\"v\":\"x\"},{\"id\":2,\"v\":\"y\"}]",
                "[{\"id\":2,\"v\":\"w\"},{\"id\":1,\"v\":\"x\"}]",
                &DiffOptions::default()
            ),
            json!({
                "_t": "a",
                "0": {"v": ["y", "w"]},
                "_1": [{"id": 2, "v": "y"}, 0, 3]
            })
        );
    }

    #[test]
    fn move_detection_can_be_disabled() {
        assert_eq!(
            encoded("[\"a\",\"b\"]", "[\"b\",\"a\"]", &DiffOptions::default().with_detect_moves(false)),
            json!({"_t": "a", "_1": ["b", 0, 0], "0": ["b"]})
        );
    }

    #[test]
    fn insertion_in_middle_keeps_tail_matched() {
        assert_eq!(
            encoded("[{\"id\":1},{\"id\":3}]", "[{\"id\":1},{\"id\":2},{\"id\":3}]", &DiffOptions::default()),
            json!({"_t": "a", "1": [{"id": 2}]})
        );
    }

    #[test]
    fn lcs_returns_index_pairs() {
        let lhs: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let rhs: Vec<String> = ["b", "c", "d"].iter().map(|s| s.to_string()).collect();
        assert_eq!(longest_common_subsequence(&lhs, &rhs), vec![(1, 0), (2, 1)]);
    }
}
