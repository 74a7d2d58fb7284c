//! Shared proptest strategies for unit tests.

use proptest::prelude::*;
use proptest::{collection, string::string_regex};
use serde_json::Value as JsonValue;

/// Arbitrary JSON documents with a bias towards shared keys and identity
/// fields, so that array matching and move detection get exercised.
pub(crate) fn arb_json_value() -> impl Strategy<Value = JsonValue> {
    let leaf = prop_oneof![
        Just(JsonValue::Null),
        any::<bool>().prop_map(JsonValue::Bool),
        (-4i64..4).prop_map(JsonValue::from),
        proptest::num::f64::ANY.prop_filter_map("finite", |f| {
            if f.is_finite() {
                serde_json::Number::from_f64(f).map(JsonValue::Number)
            } else {
                None
            }
        }),
        string_regex("[a-c0-9]{0,4}").unwrap().prop_map(JsonValue::String),
    ];

    leaf.prop_recursive(3, 12, 4, |inner| {
        let key = prop_oneof![
            Just("id".to_owned()),
            Just("name".to_owned()),
            string_regex("[a-d]{1,2}").unwrap(),
        ];
        prop_oneof![
            collection::vec(inner.clone(), 0..5).prop_map(JsonValue::Array),
            collection::btree_map(key, inner, 0..4)
                .prop_map(|map| JsonValue::Object(map.into_iter().collect())),
        ]
    })
}
