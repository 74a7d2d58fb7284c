//! Benchmark corpora for twindiff.
//!
//! Each corpus is generated deterministically in memory so benchmarks and
//! tests need no fixture files.
//!
//! # Examples
//!
//! ```
//! use twindiff_core::DiffOptions;
//!
//! let corpus = twindiff_benches::available_corpora()
//!     .iter()
//!     .find(|corpus| corpus.name() == "shuffled-records")
//!     .expect("registered corpus");
//! let dataset = corpus.load().expect("corpus builds");
//! assert!(dataset.diff(&DiffOptions::default()).is_some());
//! ```
#![forbid(unsafe_code)]
#![warn(missing_docs)]

use serde_json::{json, Value as JsonValue};
use twindiff_core::{diff, CanonicalizeError, Delta, DiffOptions, Node};

/// A named document pair generator.
#[derive(Clone, Copy, Debug)]
pub struct Corpus {
    name: &'static str,
    build: fn() -> (JsonValue, JsonValue),
}

impl Corpus {
    /// Stable identifier used in benchmark ids.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Builds the document pair.
    ///
    /// # Errors
    ///
    /// Returns an error when a generated document is not representable.
    pub fn load(&self) -> Result<Dataset, CanonicalizeError> {
        let (before, after) = (self.build)();
        let bytes = before.to_string().len() + after.to_string().len();
        Ok(Dataset {
            before: Node::from_json_value(before)?,
            after: Node::from_json_value(after)?,
            bytes,
        })
    }
}

/// A loaded document pair.
#[derive(Clone, Debug)]
pub struct Dataset {
    before: Node,
    after: Node,
    bytes: usize,
}

impl Dataset {
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

    /// Combined size of both documents as compact JSON.
    #[must_use]
    pub fn fixture_bytes(&self) -> usize {
        self.bytes
    }

    /// Diffs the pair.
    #[must_use]
    pub fn diff(&self, options: &DiffOptions) -> Option<Delta> {
        diff(&self.before, &self.after, options)
    }
}

static CORPORA: [Corpus; 3] = [
    Corpus { name: "shuffled-records", build: shuffled_records },
    Corpus { name: "nested-config", build: nested_config },
    Corpus { name: "append-heavy", build: append_heavy },
];

/// All registered corpora.
#[must_use]
pub fn available_corpora() -> &'static [Corpus] {
    &CORPORA
}

fn record(id: usize, revision: usize) -> JsonValue {
    json!({
        "id": id,
        "name": format!("item-{id}"),
        "revision": revision,
        "tags": ["alpha", "beta"],
    })
}

fn shuffled_records() -> (JsonValue, JsonValue) {
    const LEN: usize = 400;
    let before: Vec<JsonValue> = (0..LEN).map(|id| record(id, 0)).collect();
    let after: Vec<JsonValue> = (0..LEN)
        .map(|slot| (slot * 7) % LEN)
        .filter(|id| id % 50 != 0)
        .map(|id| record(id, usize::from(id % 13 == 0)))
        .chain((LEN..LEN + 10).map(|id| record(id, 0)))
        .collect();
    (JsonValue::Array(before), JsonValue::Array(after))
}

fn config_level(depth: usize, seed: usize) -> JsonValue {
    if depth == 0 {
        return json!({ "enabled": seed % 2 == 0, "limit": seed, "label": format!("leaf-{seed}") });
    }
    let mut map = serde_json::Map::new();
    for branch in 0..4 {
        map.insert(format!("section{branch}"), config_level(depth - 1, seed * 4 + branch));
    }
    JsonValue::Object(map)
}

fn nested_config() -> (JsonValue, JsonValue) {
    let before = config_level(5, 1);
    let mut after = before.clone();
    if let Some(section) = after.pointer_mut("/section1/section2/section3/section0/section1") {
        section["limit"] = json!(0);
    }
    if let Some(section) = after.pointer_mut("/section3/section3") {
        section["added"] = json!({"note": "new"});
    }
    if let JsonValue::Object(root) = &mut after {
        root.remove("section0");
    }
    (before, after)
}

fn append_heavy() -> (JsonValue, JsonValue) {
    let before: Vec<JsonValue> = (0..1000).map(|n| json!(n)).collect();
    let mut after = before.clone();
    for position in (0..1000).step_by(100).rev() {
        after.insert(position, json!(format!("inserted-{position}")));
    }
    after.extend((0..50).map(|n| json!(-n - 1)));
    (JsonValue::Array(before), JsonValue::Array(after))
}
