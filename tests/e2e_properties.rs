//! Property-based tests for value coercion and GUID resolution.

use ifc_lca_psets::coerce::{coerce, coerce_or_label};
use ifc_lca_psets::data::DataSource;
use ifc_lca_psets::model::{GlobalId, Primitive, TypedValue};
use proptest::prelude::*;
use serde_json::json;

proptest! {
    #[test]
    fn boolean_is_true_only_for_truthy_words(raw in "[a-zA-Z0-9 ]{1,8}") {
        let expected = ["true", "1", "t", "yes"].contains(&raw.to_lowercase().as_str());
        let value = coerce("IfcBoolean", Some(raw.as_str())).unwrap();
        prop_assert_eq!(value.value, Primitive::Boolean(expected));
    }

    #[test]
    fn integers_parse_back(n in any::<i64>()) {
        let value = coerce("IfcInteger", Some(n.to_string().as_str())).unwrap();
        prop_assert_eq!(value, TypedValue::new("IfcInteger", n));
    }

    #[test]
    fn finite_floats_parse_back(f in -1.0e12f64..1.0e12) {
        let value = coerce("IfcReal", Some(f.to_string().as_str())).unwrap();
        prop_assert_eq!(value.value, Primitive::Float(f));
    }

    #[test]
    fn non_numeric_text_becomes_label(raw in "[a-z]{1,12}") {
        let value = coerce_or_label("IfcReal", Some(raw.as_str())).unwrap();
        prop_assert_eq!(value, TypedValue::label(raw));
    }

    #[test]
    fn first_entry_with_guid_wins(values in prop::collection::vec("[a-z]{1,6}", 1..6)) {
        let entries: Vec<_> = values.iter().map(|v| json!({ "guid": "g", "value": v })).collect();
        let data = DataSource::new(json!({ "items": entries }).into());
        let found = data.value("g").and_then(|n| n.as_str()).map(String::from);
        prop_assert_eq!(found, Some(values[0].clone()));
    }

    #[test]
    fn global_ids_are_22_ifc_characters(_seed in any::<u8>()) {
        let id = GlobalId::new();
        prop_assert_eq!(id.as_str().len(), 22);
        prop_assert!(id.as_str().chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$'));
    }
}
