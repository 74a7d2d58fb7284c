//! Per-side presentation model for the dual tree view.
//!
//! Both sides walk their own document but consult the same delta and the same
//! [`ExpandState`], so they expand and collapse in lockstep. Only the
//! highlight of an individual node depends on the side.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    classify,
    diff::{Path, PathSegment},
    has_changes,
    render::{highlight_color, RenderConfig},
    resolve, ChangeKind, Delta, ExpandState, Node,
};

/// One of the two panels of a comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The before document.
    Left,
    /// The after document.
    Right,
}

impl Side {
    /// Both sides in display order.
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    /// Lowercase label used in messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual category of a node on one side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Highlight {
    /// Rendered without emphasis.
    #[default]
    None,
    /// Present only after the change.
    Added,
    /// Present only before the change.
    Removed,
    /// Changed in place or holding changes below.
    Modified,
}

impl Highlight {
    /// Maps a classification onto one side.
    ///
    /// Additions have nothing to show on the left and removals have nothing to
    /// show on the right. A node without a classification of its own that
    /// still holds changes below is highlighted as modified.
    ///
    /// ```
    /// # use twindiff_core::{ChangeKind, Highlight, Side};
    /// assert_eq!(Highlight::for_side(Side::Left, Some(ChangeKind::Added), true), Highlight::None);
    /// assert_eq!(Highlight::for_side(Side::Right, Some(ChangeKind::Added), true), Highlight::Added);
    /// assert_eq!(Highlight::for_side(Side::Right, None, false), Highlight::None);
    /// ```
    #[must_use]
    pub fn for_side(side: Side, classification: Option<ChangeKind>, nested_changes: bool) -> Self {
        if classification.is_none() && !nested_changes {
            return Self::None;
        }
        match (side, classification) {
            (Side::Left, Some(ChangeKind::Added)) | (Side::Right, Some(ChangeKind::Removed)) => {
                Self::None
            }
            (Side::Left, Some(ChangeKind::Removed)) => Self::Removed,
            (Side::Right, Some(ChangeKind::Added)) => Self::Added,
            _ => Self::Modified,
        }
    }
}

/// Everything a renderer needs to know about one node on one side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeView {
    /// Classification of the delta node at this path, if any.
    pub classification: Option<ChangeKind>,
    /// Side-specific visual category.
    pub highlight: Highlight,
    /// Whether the highlight is shown on this side.
    pub visible: bool,
    /// Whether the node is a container.
    pub expandable: bool,
    /// Whether the container's children are shown.
    pub expanded: bool,
}

/// Computes the view of the node at `path` whose document value is `value`.
///
/// A path without a delta node renders unclassified; that is the usual case
/// for unchanged parts of a document.
///
/// ```
/// # use twindiff_core::{diff, diff::Path, node_view, DiffOptions, ExpandState, Highlight, Node, Side};
/// let before = Node::from_json_str("{\"a\":1}")?;
/// let after = Node::from_json_str("{\"a\":1,\"b\":2}")?;
/// let delta = diff(&before, &after, &DiffOptions::default());
/// let expand = ExpandState::derive(delta.as_ref());
///
/// let path = Path::parse_dotted("b");
/// let value = after.get_path(&path).unwrap();
/// let right = node_view(delta.as_ref(), Side::Right, value, &path, &expand);
/// assert_eq!(right.highlight, Highlight::Added);
/// assert!(right.visible && !right.expandable);
///
/// let root = node_view(delta.as_ref(), Side::Left, &before, &Path::new(), &expand);
/// assert!(root.expanded);
/// # Ok::<(), twindiff_core::CanonicalizeError>(())
/// ```
#[must_use]
pub fn node_view(
    delta: Option<&Delta>,
    side: Side,
    value: &Node,
    path: &Path,
    expand: &ExpandState,
) -> NodeView {
    let node = resolve(delta, path);
    let classification = classify(node);
    let highlight = Highlight::for_side(side, classification, has_changes(node));
    let expandable = value.is_container();
    NodeView {
        classification,
        highlight,
        visible: highlight != Highlight::None,
        expandable,
        expanded: expandable && expand.is_expanded(path),
    }
}

/// A single visible line of a rendered tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeRow {
    /// Nesting depth; the root is `0`.
    pub depth: usize,
    /// Object key or array index under which the node sits; `None` for the root.
    pub label: Option<String>,
    /// Location of the node.
    pub path: Path,
    /// Side-specific view of the node.
    pub view: NodeView,
    /// Short description of the value.
    pub preview: String,
}

/// Flattens one side into rows, descending only into expanded containers.
///
/// Object keys are visited in canonical order and array elements by index.
#[must_use]
pub fn render_rows(
    delta: Option<&Delta>,
    side: Side,
    value: &Node,
    expand: &ExpandState,
) -> Vec<TreeRow> {
    let mut rows = Vec::new();
    let mut path = Path::new();
    walk(delta, side, value, expand, &mut path, None, &mut rows);
    rows
}

fn walk(
    delta: Option<&Delta>,
    side: Side,
    value: &Node,
    expand: &ExpandState,
    path: &mut Path,
    label: Option<String>,
    rows: &mut Vec<TreeRow>,
) {
    let view = node_view(delta, side, value, path, expand);
    rows.push(TreeRow {
        depth: path.len(),
        label,
        path: path.clone(),
        view,
        preview: preview(value),
    });
    if !view.expanded {
        return;
    }
    match value {
        Node::Object(map) => {
            for (key, child) in map {
                path.push(PathSegment::key(key.as_str()));
                walk(delta, side, child, expand, path, Some(key.clone()), rows);
                path.pop();
            }
        }
        Node::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                path.push(PathSegment::index(index));
                walk(delta, side, child, expand, path, Some(index.to_string()), rows);
                path.pop();
            }
        }
        _ => {}
    }
}

fn preview(value: &Node) -> String {
    match value {
        Node::Object(map) => format!("{{{} props}}", map.len()),
        Node::Array(items) => format!("[{} items]", items.len()),
        other => other.canonical_json(),
    }
}

/// Formats rows as indented text, one row per line.
///
/// ```
/// # use twindiff_core::{diff, render_rows, render_tree_text, DiffOptions, ExpandState, Node, RenderConfig, Side};
/// let before = Node::from_json_str("{\"a\":1}")?;
/// let after = Node::from_json_str("{\"a\":2}")?;
/// let delta = diff(&before, &after, &DiffOptions::default());
/// let expand = ExpandState::derive(delta.as_ref());
/// let rows = render_rows(delta.as_ref(), Side::Right, &after, &expand);
/// assert_eq!(
///     render_tree_text(&rows, &RenderConfig::default()),
///     "~ v {1 props} (modified)\n~     a: 2 (modified)\n"
/// );
/// # Ok::<(), twindiff_core::CanonicalizeError>(())
/// ```
#[must_use]
pub fn render_tree_text(rows: &[TreeRow], config: &RenderConfig) -> String {
    let mut output = String::new();
    for row in rows {
        let mut line = String::new();
        line.push(match row.view.highlight {
            Highlight::None => ' ',
            Highlight::Added => '+',
            Highlight::Removed => '-',
            Highlight::Modified => '~',
        });
        line.push(' ');
        line.push_str(&"  ".repeat(row.depth));
        line.push_str(match (row.view.expandable, row.view.expanded) {
            (true, true) => "v ",
            (true, false) => "> ",
            (false, _) => "  ",
        });
        if let Some(label) = &row.label {
            line.push_str(label);
            line.push_str(": ");
        }
        line.push_str(&row.preview);
        if let Some(kind) = row.view.classification {
            line.push_str(&format!(" ({kind})"));
        }
        output.push_str(&config.paint(&line, highlight_color(row.view.highlight)));
        output.push('\n');
    }
    output
}
