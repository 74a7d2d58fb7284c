//! Comparison lifecycle: one delta, one summary and one shared expand state
//! per pair of documents.

use crate::{
    diff, diff::Path, summarize, ComparisonKey, Delta, DiffOptions, DiffSummary, ExpandMessage,
    ExpandState, Node, SessionError, Side,
};

/// A computed comparison of two documents.
///
/// ```
/// # use twindiff_core::{Comparison, DiffOptions, Node};
/// let before = Node::from_json_str("{\"a\":1}")?;
/// let after = Node::from_json_str("{\"a\":1,\"b\":2}")?;
/// let comparison = Comparison::new(before, after, &DiffOptions::default());
/// assert_eq!(comparison.summary().added, 1);
/// assert!(comparison.expand().is_expanded(&twindiff_core::diff::Path::parse_dotted("b")));
/// # Ok::<(), twindiff_core::CanonicalizeError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Comparison {
    key: ComparisonKey,
    before: Node,
    after: Node,
    delta: Option<Delta>,
    summary: DiffSummary,
    expand: ExpandState,
}

impl Comparison {
    /// Diffs `before` against `after` and derives the initial expand state.
    #[must_use]
    pub fn new(before: Node, after: Node, options: &DiffOptions) -> Self {
        let key = ComparisonKey::of(&before, &after);
        let delta = diff(&before, &after, options);
        let summary = summarize(delta.as_ref());
        let expand = ExpandState::derive(delta.as_ref());
        tracing::debug!(%key, total = summary.total, "computed comparison");
        Self { key, before, after, delta, summary, expand }
    }

    /// Identity of the document pair.
    #[must_use]
    pub fn key(&self) -> ComparisonKey {
        self.key
    }

    /// The before document.
    #[must_use]
    pub fn before(&self) -> &Node {
        &self.before
    }

    /// The after document.
    #[must_use]
    pub fn after(&self) -> &Node {
        &self.after
    }

    /// The document shown on `side`.
    #[must_use]
    pub fn document(&self, side: Side) -> &Node {
        match side {
            Side::Left => &self.before,
            Side::Right => &self.after,
        }
    }

    /// The delta; `None` when the documents are equal.
    #[must_use]
    pub fn delta(&self) -> Option<&Delta> {
        self.delta.as_ref()
    }

    /// Change counts of the delta.
    #[must_use]
    pub fn summary(&self) -> DiffSummary {
        self.summary
    }

    /// Expand state shared by both sides.
    #[must_use]
    pub fn expand(&self) -> &ExpandState {
        &self.expand
    }

    /// Flips the expansion of `path`; returns whether it is expanded afterwards.
    pub fn toggle(&mut self, path: &Path) -> bool {
        self.expand.toggle(path)
    }

    /// Applies an expand message.
    pub fn apply(&mut self, message: ExpandMessage) {
        self.expand.apply(message);
    }
}

/// Holds the current comparison and recomputes it only when the documents change.
#[derive(Clone, Debug, Default)]
pub struct DiffSession {
    options: DiffOptions,
    current: Option<Comparison>,
}

impl DiffSession {
    /// Creates an empty session that diffs with `options`.
    #[must_use]
    pub fn new(options: DiffOptions) -> Self {
        Self { options, current: None }
    }

    /// Loads a pair of documents.
    ///
    /// Reloading the pair that is already loaded keeps the comparison and any
    /// user adjustments to its expand state. A different pair replaces it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MissingDocument`] when either side is absent;
    /// the current comparison is left untouched.
    pub fn load(
        &mut self,
        before: Option<Node>,
        after: Option<Node>,
    ) -> Result<&Comparison, SessionError> {
        let before = before.ok_or(SessionError::MissingDocument { side: Side::Left })?;
        let after = after.ok_or(SessionError::MissingDocument { side: Side::Right })?;
        let key = ComparisonKey::of(&before, &after);
        // The key is only a hash; the documents themselves decide a match.
        let unchanged = self.current.as_ref().is_some_and(|current| {
            current.key == key && current.before == before && current.after == after
        });
        if unchanged {
            tracing::debug!(%key, "documents unchanged, keeping comparison");
        } else {
            tracing::debug!(%key, "documents changed, resetting comparison");
            self.current = None;
        }
        let options = &self.options;
        Ok(self.current.get_or_insert_with(|| Comparison::new(before, after, options)))
    }

    /// The loaded comparison, if any.
    #[must_use]
    pub fn current(&self) -> Option<&Comparison> {
        self.current.as_ref()
    }

    /// Toggles `path` in the current comparison; `None` when nothing is loaded.
    pub fn toggle(&mut self, path: &Path) -> Option<bool> {
        self.current.as_mut().map(|current| current.toggle(path))
    }

    /// Diff options used for new comparisons.
    #[must_use]
    pub fn options(&self) -> &DiffOptions {
        &self.options
    }
}
