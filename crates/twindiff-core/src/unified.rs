//! Flat, path-ordered list of changes.

use serde::{Deserialize, Serialize};

use crate::{
    classify,
    diff::{Path, PathSegment},
    render::{kind_color, kind_marker, RenderConfig},
    ChangeKind, Delta, LeafDelta, Node, WholeMarker,
};

/// Default depth limit for container-level `modified` lines.
pub const DEFAULT_MAX_CONTAINER_DEPTH: usize = 2;

/// Settings for [`unified_changes`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnifiedOptions {
    max_container_depth: usize,
}

impl Default for UnifiedOptions {
    fn default() -> Self {
        Self { max_container_depth: DEFAULT_MAX_CONTAINER_DEPTH }
    }
}

impl UnifiedOptions {
    /// Containers modified below this many path segments get no line of
    /// their own; their changed descendants are still listed.
    #[must_use]
    pub fn with_max_container_depth(mut self, depth: usize) -> Self {
        self.max_container_depth = depth;
        self
    }

    /// Current container depth limit.
    #[must_use]
    pub fn max_container_depth(self) -> usize {
        self.max_container_depth
    }
}

/// One entry of the unified change list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChangeLine {
    /// Location of the change. Positions inside arrays refer to the before
    /// array for removals and moves and to the after array otherwise.
    pub path: Path,
    /// Kind of the change.
    pub kind: ChangeKind,
    /// Value before the change, if it existed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old: Option<Node>,
    /// Value after the change, if it exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new: Option<Node>,
    /// Target index of an array element that changed position.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moved_to: Option<usize>,
}

/// Collects one line per classified delta node, sorted by dotted path.
///
/// The root only produces a line when it was replaced as a whole. Removals
/// sort before additions at the same path.
///
/// ```
/// # use twindiff_core::{diff, unified_changes, ChangeKind, DiffOptions, Node, UnifiedOptions};
/// let before = Node::from_json_str("{\"a\":1,\"b\":true}")?;
/// let after = Node::from_json_str("{\"a\":2,\"c\":null}")?;
/// let delta = diff(&before, &after, &DiffOptions::default());
/// let lines = unified_changes(&before, &after, delta.as_ref(), &UnifiedOptions::default());
/// let kinds: Vec<_> = lines.iter().map(|line| (line.path.to_string(), line.kind)).collect();
/// assert_eq!(kinds, vec![
///     ("a".to_owned(), ChangeKind::Modified),
///     ("b".to_owned(), ChangeKind::Removed),
///     ("c".to_owned(), ChangeKind::Added),
/// ]);
/// # Ok::<(), twindiff_core::CanonicalizeError>(())
/// ```
#[must_use]
pub fn unified_changes(
    before: &Node,
    after: &Node,
    delta: Option<&Delta>,
    options: &UnifiedOptions,
) -> Vec<ChangeLine> {
    let Some(delta) = delta else {
        return Vec::new();
    };
    let mut collector = Collector { before, after, options, lines: Vec::new() };
    let mut path = Path::new();
    if delta.carries_own_change() {
        collector.emit(delta, &path, Slot::Matched);
    }
    collector.descend(delta, &mut path);
    let mut lines = collector.lines;
    lines.sort_by_cached_key(|line| (line.path.to_string(), rank(line.kind)));
    lines
}

fn rank(kind: ChangeKind) -> u8 {
    match kind {
        ChangeKind::Removed => 0,
        ChangeKind::Modified => 1,
        ChangeKind::Added => 2,
    }
}

#[derive(Clone, Copy)]
enum Slot {
    /// Path is valid in both documents (object keys, after-entries of arrays).
    Matched,
    /// Path is an index into the before array.
    Before,
}

struct Collector<'a> {
    before: &'a Node,
    after: &'a Node,
    options: &'a UnifiedOptions,
    lines: Vec<ChangeLine>,
}

impl Collector<'_> {
    fn descend(&mut self, node: &Delta, path: &mut Path) {
        match node {
            Delta::Leaf(_) => {}
            Delta::Object(object) => {
                for (key, child) in &object.children {
                    path.push(PathSegment::key(key.as_str()));
                    self.visit(child, path, Slot::Matched);
                    path.pop();
                }
            }
            Delta::Array(array) => {
                for (index, child) in &array.after {
                    path.push(PathSegment::index(*index));
                    self.visit(child, path, Slot::Matched);
                    path.pop();
                }
                for (index, child) in &array.before {
                    path.push(PathSegment::index(*index));
                    self.visit(child, path, Slot::Before);
                    path.pop();
                }
            }
        }
    }

    fn visit(&mut self, node: &Delta, path: &mut Path, slot: Slot) {
        self.emit(node, path, slot);
        self.descend(node, path);
    }

    fn emit(&mut self, node: &Delta, path: &Path, slot: Slot) {
        let Some(kind) = classify(Some(node)) else {
            return;
        };
        let line = match node {
            Delta::Leaf(leaf) => self.leaf_line(leaf, path, slot),
            Delta::Object(_) | Delta::Array(_) => {
                if kind == ChangeKind::Modified && path.len() > self.options.max_container_depth {
                    return;
                }
                let (old, new) = match node {
                    Delta::Object(object) if object.marker == Some(WholeMarker::Added) => {
                        (None, self.after.get_path(path).cloned())
                    }
                    Delta::Object(object) if object.marker == Some(WholeMarker::Removed) => {
                        (self.before.get_path(path).cloned(), None)
                    }
                    _ => (self.before.get_path(path).cloned(), self.after.get_path(path).cloned()),
                };
                ChangeLine { path: path.clone(), kind, old, new, moved_to: None }
            }
        };
        self.lines.push(line);
    }

    fn leaf_line(&self, leaf: &LeafDelta, path: &Path, slot: Slot) -> ChangeLine {
        let mut line = ChangeLine {
            path: path.clone(),
            kind: leaf.kind(),
            old: leaf.old_value().cloned(),
            new: leaf.new_value().cloned(),
            moved_to: None,
        };
        match leaf {
            LeafDelta::Moved { to, .. } => {
                let mut target = path.clone();
                target.pop();
                target.push(PathSegment::index(*to));
                line.new = self.after.get_path(&target).cloned().or(line.new);
                line.moved_to = Some(*to);
            }
            LeafDelta::TextPatch { .. } | LeafDelta::Other { .. } => {
                if matches!(slot, Slot::Matched) {
                    line.old = self.before.get_path(path).cloned();
                    line.new = self.after.get_path(path).cloned();
                }
            }
            _ => {}
        }
        line
    }
}

/// Formats change lines as text, one change per line.
///
/// ```
/// # use twindiff_core::{diff, render_unified, unified_changes, DiffOptions, Node, RenderConfig, UnifiedOptions};
/// let before = Node::from_json_str("{\"a\":1,\"b\":true}")?;
/// let after = Node::from_json_str("{\"a\":2,\"c\":null}")?;
/// let delta = diff(&before, &after, &DiffOptions::default());
/// let lines = unified_changes(&before, &after, delta.as_ref(), &UnifiedOptions::default());
/// assert_eq!(
///     render_unified(&lines, &RenderConfig::default()),
///     "~ a: 1 -> 2\n- b: true\n+ c: null\n"
/// );
/// # Ok::<(), twindiff_core::CanonicalizeError>(())
/// ```
#[must_use]
pub fn render_unified(lines: &[ChangeLine], config: &RenderConfig) -> String {
    let mut output = String::new();
    for line in lines {
        let path = if line.path.is_empty() { "(root)".to_owned() } else { line.path.to_string() };
        let mut text = format!("{} {path}: ", kind_marker(line.kind));
        match (&line.old, &line.new) {
            (Some(old), Some(new)) if line.kind == ChangeKind::Modified => {
                text.push_str(&old.canonical_json());
                text.push_str(" -> ");
                text.push_str(&new.canonical_json());
            }
            (Some(value), _) | (None, Some(value)) => text.push_str(&value.canonical_json()),
            (None, None) => text.push_str("(patched)"),
        }
        if let Some(to) = line.moved_to {
            text.push_str(&format!(" (moved to {to})"));
        }
        output.push_str(&config.paint(&text, Some(kind_color(line.kind))));
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{diff, DiffOptions};

    fn lines(before: &str, after: &str, options: &UnifiedOptions) -> Vec<ChangeLine> {
        let before = Node::from_json_str(before).unwrap();
        let after = Node::from_json_str(after).unwrap();
        let delta = diff(&before, &after, &DiffOptions::default());
        unified_changes(&before, &after, delta.as_ref(), options)
    }

    fn text(before: &str, after: &str) -> String {
        render_unified(&lines(before, after, &UnifiedOptions::default()), &RenderConfig::default())
    }

    #[test]
    fn identical_documents_have_no_lines() {
        assert!(lines("[1]", "[1]", &UnifiedOptions::default()).is_empty());
    }

    #[test]
    fn replaced_root_is_listed() {
        assert_eq!(text("1", "\"one\""), "~ (root): 1 -> \"one\"\n");
    }

    #[test]
    fn deep_container_lines_are_suppressed_but_leaves_remain() {
        let before = "{\"a\":{\"b\":{\"c\":{\"d\":1}}}}";
        let after = "{\"a\":{\"b\":{\"c\":{\"d\":2}}}}";
        let paths: Vec<String> = lines(before, after, &UnifiedOptions::default())
            .iter()
            .map(|line| line.path.to_string())
            .collect();
        assert_eq!(paths, vec!["a", "a.b", "a.b.c.d"]);

        let all = lines(before, after, &UnifiedOptions::default().with_max_container_depth(10));
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn substitution_lists_removal_before_addition() {
        assert_eq!(text("[1,2]", "[1,4]"), "- 1: 2\n+ 1: 4\n");
    }

    #[test]
    fn moved_element_reports_target() {
        let out = text("[{\"id\":1},{\"id\":2}]", "[{\"id\":2},{\"id\":1}]");
        assert_eq!(out, "~ 1: {\"id\":2} -> {\"id\":2} (moved to 0)\n");
    }

    #[test]
    fn container_values_come_from_documents() {
        let found = lines("{\"o\":{\"x\":1}}", "{\"o\":{\"x\":1,\"y\":2}}", &UnifiedOptions::default());
        assert_eq!(found[0].path.to_string(), "o");
        assert_eq!(found[0].old, Some(Node::from_json_str("{\"x\":1}").unwrap()));
        assert_eq!(found[0].new, Some(Node::from_json_str("{\"x\":1,\"y\":2}").unwrap()));
    }

    #[test]
    fn color_wraps_each_line() {
        let found = lines("{\"a\":1}", "{}", &UnifiedOptions::default());
        let out = render_unified(&found, &RenderConfig::color(true));
        assert_eq!(out, "\u{1b}[31m- a: 1\u{1b}[0m\n");
    }
}
