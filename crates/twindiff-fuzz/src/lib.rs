//! Fuzzing harnesses for twindiff.
//!
//! Each public function accepts raw bytes so it can be driven from
//! `cargo fuzz` targets as well as from plain unit tests. Recoverable errors
//! are swallowed; invariants that must hold for every input are asserted.
//!
//! ```
//! twindiff_fuzz::fuzz_canonicalization(b"{\"a\":1}");
//! twindiff_fuzz::fuzz_diff(&[1, 2, 3, 4]);
//! twindiff_fuzz::fuzz_delta_decode(b"{\"_t\":\"a\",\"_0\":[1,0,0]}");
//! ```
#![forbid(unsafe_code)]
#![warn(missing_docs)]

use arbitrary::Unstructured;
use serde_json::{Map as JsonMap, Number as JsonNumber, Value as JsonValue};
use twindiff_core::{
    classify, has_changes, render_rows, resolve, summarize, unified_changes,
    Delta, DiffOptions, ExpandState, Node, Path, Side, UnifiedOptions,
};

const MAX_DEPTH: usize = 4;
const MAX_ARRAY_LEN: u8 = 6;
const MAX_OBJECT_LEN: u8 = 6;
const MAX_STRING_LEN: u8 = 12;
const KEY_POOL: [&str; 6] = ["_id", "id", "name", "a", "b", "c"];

/// Feeds arbitrary bytes through the JSON and YAML canonicalization routines.
///
/// ```
/// twindiff_fuzz::fuzz_canonicalization(b"{\"key\":\"value\"}");
/// ```
pub fn fuzz_canonicalization(data: &[u8]) {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = Node::from_json_str(text);
        let _ = Node::from_yaml_str(text);
    }
}

/// Diffs two random documents and runs every consumer of the delta.
///
/// Panics when a cross-cutting invariant is violated: reflexivity, summary
/// additivity, or stability of the wire encoding.
///
/// ```
/// twindiff_fuzz::fuzz_diff(b"seed");
/// ```
pub fn fuzz_diff(data: &[u8]) {
    let mut unstructured = Unstructured::new(data);
    let Some(before) = random_node(&mut unstructured) else {
        return;
    };
    let Some(after) = random_node(&mut unstructured) else {
        return;
    };
    let detect_moves = unstructured.arbitrary().unwrap_or(true);
    let options = DiffOptions::default().with_detect_moves(detect_moves);

    assert!(before.diff(&before, &options).is_none(), "diff is not reflexive");

    let delta = before.diff(&after, &options);
    assert_eq!(delta.is_none(), before == after);

    let summary = summarize(delta.as_ref());
    assert_eq!(summary.total, summary.added + summary.removed + summary.modified);

    if let Some(delta) = &delta {
        assert!(has_changes(Some(delta)));
        assert!(classify(Some(delta)).is_some());
        let decoded = Delta::from_json_value(delta.to_json_value()).expect("encoding decodes");
        assert_eq!(decoded.to_json_value(), delta.to_json_value());
    }

    let expand = ExpandState::derive(delta.as_ref());
    for path in expand.paths() {
        let _ = resolve(delta.as_ref(), path);
    }
    let _ = render_rows(delta.as_ref(), Side::Left, &before, &expand);
    let _ = render_rows(delta.as_ref(), Side::Right, &after, &expand);
    let _ = unified_changes(&before, &after, delta.as_ref(), &UnifiedOptions::default());
}

/// Decodes arbitrary bytes as a delta and navigates whatever decodes.
///
/// ```
/// twindiff_fuzz::fuzz_delta_decode(b"[1, 2]");
/// ```
pub fn fuzz_delta_decode(data: &[u8]) {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(delta) = Delta::from_json_str(text) else {
        return;
    };
    let _ = classify(Some(&delta));
    let summary = summarize(Some(&delta));
    assert_eq!(summary.total, summary.added + summary.removed + summary.modified);
    let expand = ExpandState::derive(Some(&delta));
    assert!(expand.is_expanded(&Path::new()));
    for path in expand.paths() {
        let _ = resolve(Some(&delta), path);
    }
}

fn random_node(unstructured: &mut Unstructured<'_>) -> Option<Node> {
    let value = json_value_from_unstructured(unstructured, 0).ok()?;
    Node::from_json_value(value).ok()
}

fn json_value_from_unstructured(
    unstructured: &mut Unstructured<'_>,
    depth: usize,
) -> Result<JsonValue, arbitrary::Error> {
    if depth >= MAX_DEPTH {
        return json_leaf(unstructured);
    }

    match unstructured.int_in_range::<u8>(0..=5)? {
        0..=3 => json_leaf(unstructured),
        4 => {
            let len = usize::from(unstructured.int_in_range::<u8>(0..=MAX_ARRAY_LEN)?);
            let mut items = Vec::with_capacity(len);
            for _ in 0..len {
                items.push(json_value_from_unstructured(unstructured, depth + 1)?);
            }
            Ok(JsonValue::Array(items))
        }
        _ => {
            let len = usize::from(unstructured.int_in_range::<u8>(0..=MAX_OBJECT_LEN)?);
            let mut map = JsonMap::new();
            for _ in 0..len {
                let key = random_key(unstructured)?;
                let value = json_value_from_unstructured(unstructured, depth + 1)?;
                map.insert(key, value);
            }
            Ok(JsonValue::Object(map))
        }
    }
}

fn json_leaf(unstructured: &mut Unstructured<'_>) -> Result<JsonValue, arbitrary::Error> {
    match unstructured.int_in_range::<u8>(0..=3)? {
        0 => Ok(JsonValue::Null),
        1 => Ok(JsonValue::Bool(unstructured.arbitrary()?)),
        2 => Ok(JsonValue::Number(random_number(unstructured)?)),
        _ => Ok(JsonValue::String(random_string(unstructured)?)),
    }
}

fn random_key(unstructured: &mut Unstructured<'_>) -> Result<String, arbitrary::Error> {
    if unstructured.ratio(3, 4)? {
        Ok((*unstructured.choose(&KEY_POOL)?).to_owned())
    } else {
        random_string(unstructured)
    }
}

fn random_number(unstructured: &mut Unstructured<'_>) -> Result<JsonNumber, arbitrary::Error> {
    if unstructured.arbitrary()? {
        Ok(JsonNumber::from(unstructured.int_in_range::<i64>(-8..=8)?))
    } else {
        let numerator = f64::from(unstructured.arbitrary::<i32>()?);
        let denominator = f64::from(unstructured.int_in_range::<u16>(1..=1024)?);
        JsonNumber::from_f64(numerator / denominator).ok_or(arbitrary::Error::IncorrectFormat)
    }
}

fn random_string(unstructured: &mut Unstructured<'_>) -> Result<String, arbitrary::Error> {
    let len = usize::from(unstructured.int_in_range::<u8>(0..=MAX_STRING_LEN)?);
    let mut string = String::with_capacity(len);
    for _ in 0..len {
        let byte = unstructured.int_in_range::<u8>(0x20..=0x7e)?;
        string.push(char::from(byte));
    }
    Ok(string)
}
