//! Expand/collapse state shared by the two tree views of a comparison.
//!
//! The state moves through three phases. A fresh comparison starts with only
//! the root expanded, is immediately auto-expanded along every path that
//! holds changes, and from then on changes only through explicit messages.

use std::collections::BTreeSet;

use crate::{diff::Path, has_changes, Delta};

/// Lifecycle phase of an [`ExpandState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExpandPhase {
    /// Only the root path is expanded.
    RootOnly,
    /// Expanded paths were derived from the delta.
    AutoExpanded,
    /// At least one user message was applied since the last derivation.
    UserAdjusted,
}

/// A user-triggered mutation of an [`ExpandState`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExpandMessage {
    /// Expands the path when collapsed and collapses it when expanded.
    Toggle(Path),
    /// Expands the path.
    Expand(Path),
    /// Collapses the path.
    Collapse(Path),
}

/// The set of expanded paths for one comparison.
///
/// Both sides of a comparison read the same state, which keeps the left and
/// right trees structurally in sync.
///
/// ```
/// # use twindiff_core::{diff, diff::Path, DiffOptions, ExpandPhase, ExpandState, Node};
/// let before = Node::from_json_str("{\"a\":{\"b\":1}}")?;
/// let after = Node::from_json_str("{\"a\":{\"b\":2}}")?;
/// let delta = diff(&before, &after, &DiffOptions::default());
///
/// let mut state = ExpandState::derive(delta.as_ref());
/// assert_eq!(state.phase(), ExpandPhase::AutoExpanded);
/// assert!(state.is_expanded(&Path::new()));
/// assert!(state.is_expanded(&Path::parse_dotted("a")));
///
/// state.toggle(&Path::parse_dotted("a"));
/// assert!(!state.is_expanded(&Path::parse_dotted("a")));
/// assert_eq!(state.phase(), ExpandPhase::UserAdjusted);
/// # Ok::<(), twindiff_core::CanonicalizeError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpandState {
    phase: ExpandPhase,
    expanded: BTreeSet<Path>,
}

impl Default for ExpandState {
    fn default() -> Self {
        Self::root_only()
    }
}

impl ExpandState {
    /// The initial state: only the root is expanded.
    #[must_use]
    pub fn root_only() -> Self {
        let mut expanded = BTreeSet::new();
        expanded.insert(Path::new());
        Self { phase: ExpandPhase::RootOnly, expanded }
    }

    /// Resets to the root and expands every path at which `delta` has changes.
    #[must_use]
    pub fn derive(delta: Option<&Delta>) -> Self {
        let mut state = Self::root_only();
        if let Some(delta) = delta {
            let mut path = Path::new();
            collect_changed(delta, &mut path, &mut state.expanded);
            state.phase = ExpandPhase::AutoExpanded;
        }
        tracing::debug!(expanded = state.expanded.len(), "derived expand state");
        state
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> ExpandPhase {
        self.phase
    }

    /// Indicates whether `path` is expanded.
    #[must_use]
    pub fn is_expanded(&self, path: &Path) -> bool {
        self.expanded.contains(path)
    }

    /// Iterates over expanded paths in canonical order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> + '_ {
        self.expanded.iter()
    }

    /// Number of expanded paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    /// Indicates whether no path, not even the root, is expanded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    /// Flips a single path; returns whether it is expanded afterwards.
    pub fn toggle(&mut self, path: &Path) -> bool {
        self.apply(ExpandMessage::Toggle(path.clone()));
        self.is_expanded(path)
    }

    /// Applies a user message.
    pub fn apply(&mut self, message: ExpandMessage) {
        match message {
            ExpandMessage::Toggle(path) => {
                if !self.expanded.remove(&path) {
                    self.expanded.insert(path);
                }
            }
            ExpandMessage::Expand(path) => {
                self.expanded.insert(path);
            }
            ExpandMessage::Collapse(path) => {
                self.expanded.remove(&path);
            }
        }
        self.phase = ExpandPhase::UserAdjusted;
    }

    /// Consuming form of [`apply`](Self::apply) for reducer-style callers.
    #[must_use]
    pub fn reduce(mut self, message: ExpandMessage) -> Self {
        self.apply(message);
        self
    }
}

/// Pure derivation of the auto-expanded path set for a delta.
#[must_use]
pub fn derive_expand_state(delta: Option<&Delta>) -> ExpandState {
    ExpandState::derive(delta)
}

fn collect_changed(node: &Delta, path: &mut Path, expanded: &mut BTreeSet<Path>) {
    if has_changes(Some(node)) {
        expanded.insert(path.clone());
    }
    for (segment, child) in node.children() {
        path.push(segment);
        collect_changed(child, path, expanded);
        path.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{diff, DiffOptions, Node};

    fn derive(before: &str, after: &str) -> ExpandState {
        let before = Node::from_json_str(before).unwrap();
        let after = Node::from_json_str(after).unwrap();
        ExpandState::derive(diff(&before, &after, &DiffOptions::default()).as_ref())
    }

    fn dotted(state: &ExpandState) -> Vec<String> {
        state.paths().map(ToString::to_string).collect()
    }

    #[test]
    fn no_delta_keeps_root_only() {
        let state = derive("{\"a\":1}", "{\"a\":1}");
        assert_eq!(state.phase(), ExpandPhase::RootOnly);
        assert_eq!(dotted(&state), vec![""]);
    }

    #[test]
    fn nested_change_expands_every_ancestor() {
        let state = derive("{\"a\":{\"b\":{\"c\":1}},\"z\":0}", "{\"a\":{\"b\":{\"c\":2}},\"z\":0}");
        assert_eq!(dotted(&state), vec!["", "a", "a.b", "a.b.c"]);
        assert!(!state.is_expanded(&Path::parse_dotted("z")));
    }

    #[test]
    fn numeric_object_keys_match_dotted_paths() {
        let mut state = derive("{\"m\":{\"1\":{\"x\":1}}}", "{\"m\":{\"1\":{\"x\":2}}}");
        let path = Path::parse_dotted("m.1");
        assert!(state.is_expanded(&path));
        assert!(!state.toggle(&path));
        assert_eq!(dotted(&state), vec!["", "m", "m.1.x"]);
    }

    #[test]
    fn removed_array_entries_expand_under_their_before_index() {
        let state = derive("{\"l\":[1,{\"x\":2}]}", "{\"l\":[1]}");
        assert!(state.is_expanded(&Path::parse_dotted("l.1")));
        assert!(state.paths().all(|path| !path.to_string().contains('_')));
    }

    #[test]
    fn double_toggle_restores_set_but_stays_user_adjusted() {
        let mut state = derive("{\"a\":{\"b\":1}}", "{\"a\":{\"b\":2}}");
        let before = dotted(&state);
        let path = Path::parse_dotted("a");
        assert!(!state.toggle(&path));
        assert_eq!(state.phase(), ExpandPhase::UserAdjusted);
        assert!(state.toggle(&path));
        assert_eq!(state.phase(), ExpandPhase::UserAdjusted);
        assert_eq!(dotted(&state), before);
    }

    #[test]
    fn expand_and_collapse_are_idempotent() {
        let path = Path::parse_dotted("x.0");
        let state = ExpandState::root_only()
            .reduce(ExpandMessage::Expand(path.clone()))
            .reduce(ExpandMessage::Expand(path.clone()));
        assert_eq!(state.len(), 2);
        let state = state
            .reduce(ExpandMessage::Collapse(path.clone()))
            .reduce(ExpandMessage::Collapse(path));
        assert_eq!(dotted(&state), vec![""]);
    }

    #[test]
    fn rederiving_discards_user_paths() {
        let mut state = derive("[1]", "[2]");
        state.apply(ExpandMessage::Expand(Path::parse_dotted("stale.path")));
        let fresh = derive("[1]", "[2]");
        assert!(!fresh.is_expanded(&Path::parse_dotted("stale.path")));
        assert_eq!(derive_expand_state(None), ExpandState::root_only());
    }
}
