use twindiff_core::{
    render_rows, render_tree_text, render_unified, unified_changes, ChangeKind, DiffOptions,
    DiffSession, Highlight, Node, Path, PathSegment, RenderConfig, SessionError, Side, UnifiedOptions,
};

fn node(text: &str) -> Node {
    Node::from_json_str(text).expect("valid json")
}

const BEFORE: &str = r#"{
    "name": "inventory",
    "items": [
        {"id": 1, "label": "bolt", "qty": 10},
        {"id": 2, "label": "nut", "qty": 5},
        {"id": 3, "label": "washer", "qty": 7}
    ],
    "meta": {"owner": "ops", "tags": ["a", "b"]}
}"#;

const AFTER: &str = r#"{
    "name": "inventory",
    "items": [
        {"id": 3, "label": "washer", "qty": 7},
        {"id": 1, "label": "bolt", "qty": 12},
        {"id": 4, "label": "screw", "qty": 1}
    ],
    "meta": {"owner": "ops", "tags": ["a", "b"]},
    "rev": 2
}"#;

#[test]
fn session_drives_both_panels() {
    let mut session = DiffSession::default();
    let comparison = session.load(Some(node(BEFORE)), Some(node(AFTER))).expect("both sides");

    let summary = comparison.summary();
    assert_eq!(summary.total, summary.added + summary.removed + summary.modified);
    assert!(summary.added >= 2, "{summary}");

    let left = render_rows(comparison.delta(), Side::Left, comparison.before(), comparison.expand());
    let right =
        render_rows(comparison.delta(), Side::Right, comparison.after(), comparison.expand());

    let meta = |rows: &[twindiff_core::TreeRow]| {
        rows.iter().find(|row| row.path == Path::parse_dotted("meta")).cloned().expect("meta row")
    };
    assert!(!meta(&left).view.expanded);
    assert_eq!(meta(&left).view.highlight, Highlight::None);
    assert_eq!(meta(&left).view, meta(&right).view);

    let rev = right.iter().find(|row| row.label.as_deref() == Some("rev")).expect("rev row");
    assert_eq!(rev.view.highlight, Highlight::Added);
    assert!(left.iter().all(|row| row.label.as_deref() != Some("rev")));
}

#[test]
fn removed_item_highlights_on_left_only() {
    let mut session = DiffSession::default();
    let comparison = session
        .load(Some(node("[{\"id\":1},{\"id\":2},{\"id\":3}]")), Some(node("[{\"id\":1},{\"id\":3}]")))
        .expect("both sides");
    let left = render_rows(comparison.delta(), Side::Left, comparison.before(), comparison.expand());
    let removed = left
        .iter()
        .find(|row| row.path == Path::parse_dotted("1"))
        .expect("removed item is listed");
    assert_eq!(removed.view.classification, Some(ChangeKind::Removed));
    assert_eq!(removed.view.highlight, Highlight::Removed);
    let right = render_rows(comparison.delta(), Side::Right, comparison.after(), comparison.expand());
    assert!(right.iter().all(|row| row.view.highlight == Highlight::None || row.path.is_empty()));
}

#[test]
fn both_panels_classify_a_shared_index_alike() {
    let mut session = DiffSession::default();
    let comparison = session.load(Some(node(BEFORE)), Some(node(AFTER))).expect("both sides");
    let left = render_rows(comparison.delta(), Side::Left, comparison.before(), comparison.expand());
    let right =
        render_rows(comparison.delta(), Side::Right, comparison.after(), comparison.expand());
    for path in ["items.0", "items.1", "items.2"] {
        let path = Path::parse_dotted(path);
        let find = |rows: &[twindiff_core::TreeRow]| {
            rows.iter().find(|row| row.path == path).map(|row| row.view.classification)
        };
        assert_eq!(find(&left), find(&right), "{path}");
    }
}

#[test]
fn collapsing_hides_children_on_both_sides() {
    let mut session = DiffSession::default();
    session.load(Some(node(BEFORE)), Some(node(AFTER))).expect("both sides");
    session.toggle(&Path::parse_dotted("items"));
    let comparison = session.current().expect("loaded");
    for side in Side::BOTH {
        let rows = render_rows(
            comparison.delta(),
            side,
            comparison.document(side),
            comparison.expand(),
        );
        assert!(rows
            .iter()
            .all(|row| row.path.len() < 2 || row.path.segments()[0] != PathSegment::key("items")));
    }
}

#[test]
fn missing_panel_is_an_error() {
    let mut session = DiffSession::default();
    assert_eq!(
        session.load(Some(node(BEFORE)), None).unwrap_err(),
        SessionError::MissingDocument { side: Side::Right }
    );
}

#[test]
fn unified_list_is_sorted_and_rendered() {
    let before = node(BEFORE);
    let after = node(AFTER);
    let delta = before.diff(&after, &DiffOptions::default());
    let lines = unified_changes(&before, &after, delta.as_ref(), &UnifiedOptions::default());
    let paths: Vec<String> = lines.iter().map(|line| line.path.to_string()).collect();
    let mut sorted = paths.clone();
    sorted.sort();
    assert_eq!(paths, sorted);

    let text = render_unified(&lines, &RenderConfig::default());
    assert!(text.contains("+ rev: 2\n"), "{text}");
    assert!(text.contains("- items.1: {\"id\":2,\"label\":\"nut\",\"qty\":5}\n"), "{text}");
}

#[test]
fn tree_text_is_stable_for_simple_objects() {
    let before = node("{\"a\":1,\"b\":{\"c\":true}}");
    let after = node("{\"a\":1,\"b\":{\"c\":false}}");
    let mut session = DiffSession::default();
    let comparison = session.load(Some(before), Some(after)).expect("both sides");
    let rows = render_rows(comparison.delta(), Side::Left, comparison.before(), comparison.expand());
    let text = render_tree_text(&rows, &RenderConfig::default());
    assert_eq!(
        text,
        "~ v {2 props} (modified)\n      a: 1\n~   v b: {1 props} (modified)\n~       c: true (modified)\n"
    );
}

#[test]
fn dotted_toggle_reaches_numeric_object_key() {
    let mut session = DiffSession::default();
    session
        .load(Some(node("{\"m\":{\"1\":{\"x\":1}}}")), Some(node("{\"m\":{\"1\":{\"x\":2}}}")))
        .expect("both sides");
    let path = Path::parse_dotted("m.1");
    assert!(session.current().expect("loaded").expand().is_expanded(&path));

    assert_eq!(session.toggle(&path), Some(false));
    let comparison = session.current().expect("loaded");
    assert!(!comparison.expand().is_expanded(&path));
    for side in Side::BOTH {
        let rows =
            render_rows(comparison.delta(), side, comparison.document(side), comparison.expand());
        let row = rows.iter().find(|row| row.path == path).expect("numeric key row");
        assert!(!row.view.expanded, "{side}");
        assert!(rows.iter().all(|row| row.label.as_deref() != Some("x")), "{side}");
    }
}
