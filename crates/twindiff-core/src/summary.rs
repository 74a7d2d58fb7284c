//! Aggregate change counts over a whole delta.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{classify, ChangeKind, Delta};

/// Counts of elementary changes in a delta.
///
/// Every classified node below the root is counted, including containers
/// whose children are counted as well, so `total` can exceed the number of
/// top-level differences. The root itself only counts when it carries a
/// change of its own (a replaced document or a whole-object marker); a root
/// object or array merely holds the changes inside the document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiffSummary {
    /// Number of added nodes.
    pub added: usize,
    /// Number of removed nodes.
    pub removed: usize,
    /// Number of modified nodes.
    pub modified: usize,
    /// `added + removed + modified`.
    pub total: usize,
}

impl DiffSummary {
    /// Indicates whether no changes were counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Returns the counter for one change kind.
    #[must_use]
    pub fn count(&self, kind: ChangeKind) -> usize {
        match kind {
            ChangeKind::Added => self.added,
            ChangeKind::Removed => self.removed,
            ChangeKind::Modified => self.modified,
        }
    }

    fn record(&mut self, kind: ChangeKind) {
        match kind {
            ChangeKind::Added => self.added += 1,
            ChangeKind::Removed => self.removed += 1,
            ChangeKind::Modified => self.modified += 1,
        }
        self.total += 1;
    }
}

impl fmt::Display for DiffSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("No differences");
        }
        write!(
            f,
            "{} modified, {} added, {} removed, {} total",
            self.modified, self.added, self.removed, self.total
        )
    }
}

/// Walks every node of `delta` and counts its classifications.
///
/// ```
/// # use twindiff_core::{diff, summarize, DiffOptions, DiffSummary, Node};
/// let before = Node::from_json_str("{\"a\":1}")?;
/// let after = Node::from_json_str("{\"a\":1,\"b\":2}")?;
/// let delta = diff(&before, &after, &DiffOptions::default());
/// assert_eq!(
///     summarize(delta.as_ref()),
///     DiffSummary { added: 1, removed: 0, modified: 0, total: 1 }
/// );
/// # Ok::<(), twindiff_core::CanonicalizeError>(())
/// ```
#[must_use]
pub fn summarize(delta: Option<&Delta>) -> DiffSummary {
    let mut summary = DiffSummary::default();
    let Some(root) = delta else {
        return summary;
    };
    if root.carries_own_change() {
        if let Some(kind) = classify(Some(root)) {
            summary.record(kind);
        }
    }
    for (_, child) in root.children() {
        walk(child, &mut summary);
    }
    summary
}

fn walk(node: &Delta, summary: &mut DiffSummary) {
    if let Some(kind) = classify(Some(node)) {
        summary.record(kind);
    }
    for (_, child) in node.children() {
        walk(child, summary);
    }
}
