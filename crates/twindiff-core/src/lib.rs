//! Structural JSON diffing with a synchronized two-panel presentation model.
//!
//! `twindiff-core` computes a [`Delta`] between two documents, reconciling
//! arrays by element identity so that insertions and moves are reported as
//! such instead of as cascades of positional changes. On top of the delta it
//! offers classification, path lookup, change counting, a flat unified change
//! list and the state needed to render the two documents side by side with a
//! shared expand/collapse state.
//!
//! ```
//! use twindiff_core::{diff, render_rows, summarize, DiffOptions, ExpandState, Node, Side};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let before = Node::from_json_str("{\"users\":[{\"id\":1},{\"id\":2}]}")?;
//!     let after = Node::from_json_str("{\"users\":[{\"id\":2},{\"id\":1}]}")?;
//!     let delta = diff(&before, &after, &DiffOptions::default());
//!
//!     let summary = summarize(delta.as_ref());
//!     assert_eq!((summary.added, summary.removed), (0, 0));
//!
//!     let expand = ExpandState::derive(delta.as_ref());
//!     let rows = render_rows(delta.as_ref(), Side::Left, &before, &expand);
//!     assert_eq!(rows.len(), 5);
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod classify;
pub mod diff;
mod error;
mod expand;
mod hash;
mod navigate;
mod node;
mod number;
mod options;
mod render;
mod session;
mod summary;
#[cfg(test)]
mod testing;
mod tree;
mod unified;

pub use classify::{classify, has_changes};
pub use diff::{
    diff, ArrayDelta, ChangeKind, Delta, LeafDelta, ObjectDelta, Path, PathSegment, WholeMarker,
};
pub use error::{CanonicalizeError, DeltaError, OptionsError, SessionError};
pub use expand::{derive_expand_state, ExpandMessage, ExpandPhase, ExpandState};
pub use hash::{fnv1a, ComparisonKey};
pub use navigate::resolve;
pub use node::Node;
pub use number::Number;
pub use options::{
    DefaultIdentity, DiffOptions, IdentityStrategy, KeyedIdentity, SerializedIdentity,
    DEFAULT_IDENTITY_FIELDS,
};
pub use render::RenderConfig;
pub use session::{Comparison, DiffSession};
pub use summary::{summarize, DiffSummary};
pub use tree::{node_view, render_rows, render_tree_text, Highlight, NodeView, Side, TreeRow};
pub use unified::{
    render_unified, unified_changes, ChangeLine, UnifiedOptions, DEFAULT_MAX_CONTAINER_DEPTH,
};

/// Returns the semantic version of the `twindiff-core` crate.
///
/// ```
/// assert!(!twindiff_core::version().is_empty());
/// ```
#[must_use]
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
