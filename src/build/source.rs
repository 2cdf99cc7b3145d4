//! Where raw property values come from.
//!
//! `DemoValues` yields placeholders for everything, so every property of the
//! schema is built with its type's zero value. `LiveValues` reads a
//! [`DataSource`] and lets the builders skip whatever the product data does
//! not provide.

use serde_json::Number;

use crate::coerce::{coerce_number_or_label, coerce_or_label};
use crate::data::{DataNode, DataSource, Scalar, VALUE_KEY};
use crate::model::TypedValue;
use crate::schema::{GUID, Schema, SchemaProperty};
use crate::{Error, Result};

use super::{INFORMATION_MODULE, LIST_DELIMITER, METHODOLOGY_PSET};

// ============================================================================
// Raw values
// ============================================================================

/// A raw value handed to coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// Present but carrying nothing; coerces to the type's zero value.
    Empty,
    Text(String),
    /// A JSON number, with the text it reads as in lists and labels.
    Number { text: String, value: Number },
}

impl RawValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Empty => None,
            RawValue::Text(t) | RawValue::Number { text: t, .. } => Some(t),
        }
    }

    /// Coerce into `declared_type`, keeping unparsable input as a label.
    pub fn coerce_or_label(&self, declared_type: &str) -> Result<TypedValue> {
        match self {
            RawValue::Number { value, .. } => coerce_number_or_label(declared_type, value),
            _ => coerce_or_label(declared_type, self.as_text()),
        }
    }

    /// `None` for data that is not truthy.
    fn present(node: &DataNode) -> Option<Self> {
        match node {
            DataNode::Scalar(Scalar::Number(n)) if node.is_truthy() => {
                Some(RawValue::Number { text: n.to_string(), value: n.clone() })
            }
            _ => node.raw_text().map(RawValue::Text),
        }
    }

    fn from_node(node: &DataNode) -> Self {
        Self::present(node).unwrap_or(RawValue::Empty)
    }
}

/// The per-column values of one indicator row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndicatorRow<'a> {
    /// Demo rows: every cell is a zero value.
    Placeholder,
    /// The row's `"values"` bundle.
    Values(&'a DataNode),
}

impl IndicatorRow<'_> {
    /// Raw cell for the column with this GUID. `None` when the bundle has no
    /// entry for it.
    pub fn cell(&self, column_guid: Option<&str>) -> Option<RawValue> {
        match self {
            IndicatorRow::Placeholder => Some(RawValue::Empty),
            IndicatorRow::Values(bundle) => column_guid
                .and_then(|guid| bundle.resolve(guid, VALUE_KEY))
                .map(RawValue::from_node),
        }
    }
}

// ============================================================================
// ValueSource
// ============================================================================

/// Value lookup strategy shared by every builder.
pub trait ValueSource {
    /// True for the placeholder source.
    fn is_demo(&self) -> bool;

    /// Raw value of a schema property. `None` means "skip this property".
    fn property_value(&self, property: &SchemaProperty) -> Option<RawValue>;

    /// Values of one indicator row. `None` means "skip this row".
    fn indicator_row(&self, row: &SchemaProperty) -> Option<IndicatorRow<'_>>;

    /// Column codes (`A1`, `C3`, `D`, ...) the indicator tables are built
    /// with, in order.
    fn applicable_columns(&self, schema: &Schema) -> Result<Vec<String>>;
}

/// Placeholder values for every property, row and column.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoValues;

impl ValueSource for DemoValues {
    fn is_demo(&self) -> bool {
        true
    }

    fn property_value(&self, _property: &SchemaProperty) -> Option<RawValue> {
        Some(RawValue::Empty)
    }

    fn indicator_row(&self, _row: &SchemaProperty) -> Option<IndicatorRow<'_>> {
        Some(IndicatorRow::Placeholder)
    }

    fn applicable_columns(&self, schema: &Schema) -> Result<Vec<String>> {
        Ok(schema.table_columns.names().map(String::from).collect())
    }
}

/// Values looked up by ISO 22057 GUID in product data.
#[derive(Debug, Clone, Copy)]
pub struct LiveValues<'d> {
    data: &'d DataSource,
}

impl<'d> LiveValues<'d> {
    pub fn new(data: &'d DataSource) -> Self {
        Self { data }
    }

}

impl ValueSource for LiveValues<'_> {
    fn is_demo(&self) -> bool {
        false
    }

    fn property_value(&self, property: &SchemaProperty) -> Option<RawValue> {
        let guid = property.guid()?;
        RawValue::present(self.data.value(guid)?)
    }

    fn indicator_row(&self, row: &SchemaProperty) -> Option<IndicatorRow<'_>> {
        let guid = row.guid()?;
        self.data
            .values(guid)
            .filter(|bundle| bundle.is_truthy())
            .map(IndicatorRow::Values)
    }

    fn applicable_columns(&self, schema: &Schema) -> Result<Vec<String>> {
        let methodology = schema.property_sets.require(METHODOLOGY_PSET)?;
        let module = methodology
            .property(INFORMATION_MODULE)
            .ok_or_else(|| Error::MissingField {
                row: METHODOLOGY_PSET.to_string(),
                field: INFORMATION_MODULE.to_string(),
            })?;
        let guid = module.require(GUID)?;

        let Some(declared) = self.data.value(guid).and_then(DataNode::raw_text) else {
            tracing::warn!(guid, "product data declares no information modules, tables get no module columns");
            return Ok(Vec::new());
        };
        Ok(declared
            .split(LIST_DELIMITER)
            .map(|code| normalize_module_code(code).to_string())
            .collect())
    }
}

/// Module `D1` is published under the column code `D`.
pub fn normalize_module_code(code: &str) -> &str {
    if code == "D1" { "D" } else { code }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{PROPERTY_NAME, SchemaBlock, SchemaTable, TableKind};
    use serde_json::json;

    fn prop(guid: &str) -> SchemaProperty {
        SchemaProperty::default().with_field(PROPERTY_NAME, "P").with_field(GUID, guid)
    }

    fn schema_with_module(guid: &str) -> Schema {
        let mut schema = Schema::empty();
        schema.property_sets = SchemaTable::from_blocks(
            TableKind::PropertySets,
            [SchemaBlock::new(METHODOLOGY_PSET).with_property(
                SchemaProperty::default()
                    .with_field(PROPERTY_NAME, INFORMATION_MODULE)
                    .with_field(GUID, guid),
            )],
        )
        .unwrap();
        schema.table_columns = SchemaTable::from_blocks(
            TableKind::TableColumns,
            [SchemaBlock::new("A1"), SchemaBlock::new("A2"), SchemaBlock::new("D")],
        )
        .unwrap();
        schema
    }

    #[test]
    fn test_demo_values() {
        let demo = DemoValues;
        assert_eq!(demo.property_value(&prop("g")), Some(RawValue::Empty));
        assert_eq!(demo.indicator_row(&prop("g")), Some(IndicatorRow::Placeholder));
        assert_eq!(IndicatorRow::Placeholder.cell(None), Some(RawValue::Empty));
    }

    #[test]
    fn test_demo_columns_are_all_columns() {
        let schema = schema_with_module("g");
        assert_eq!(DemoValues.applicable_columns(&schema).unwrap(), vec!["A1", "A2", "D"]);
    }

    #[test]
    fn test_live_property_value() {
        let data = DataSource::new(
            json!([{ "guid": "g1", "value": "Concrete" }, { "guid": "g2", "value": 0 }]).into(),
        );
        let live = LiveValues::new(&data);
        assert_eq!(live.property_value(&prop("g1")), Some(RawValue::Text("Concrete".into())));
        assert_eq!(live.property_value(&prop("g2")), None);
        assert_eq!(live.property_value(&prop("g3")), None);
        assert_eq!(live.property_value(&SchemaProperty::default()), None);
    }

    #[test]
    fn test_live_indicator_cells() {
        let data = DataSource::new(
            json!({ "guid": "row", "values": [ { "guid": "c2", "value": 5 }, { "guid": "c3", "value": 0 } ] })
                .into(),
        );
        let live = LiveValues::new(&data);
        let row = live.indicator_row(&prop("row")).unwrap();
        assert_eq!(row.cell(Some("c1")), None);
        assert_eq!(row.cell(Some("c2")), Some(RawValue::Number { text: "5".into(), value: 5.into() }));
        assert_eq!(row.cell(Some("c3")), Some(RawValue::Empty));
        assert_eq!(row.cell(None), None);
        assert!(live.indicator_row(&prop("other")).is_none());
    }

    #[test]
    fn test_live_numbers_keep_numeric_form() {
        let data = DataSource::new(json!([{ "guid": "life", "value": 50.0 }, { "guid": "note", "value": 2.5 }]).into());
        let live = LiveValues::new(&data);

        let life = live.property_value(&prop("life")).unwrap();
        assert_eq!(life.as_text(), Some("50.0"));
        assert_eq!(life.coerce_or_label("IfcInteger").unwrap(), TypedValue::new("IfcInteger", 50i64));
        assert_eq!(life.coerce_or_label("IfcReal").unwrap(), TypedValue::new("IfcReal", 50.0));
        assert_eq!(life.coerce_or_label("IfcLabel").unwrap(), TypedValue::new("IfcLabel", "50.0"));

        let note = live.property_value(&prop("note")).unwrap();
        assert_eq!(note.coerce_or_label("IfcInteger").unwrap(), TypedValue::label("2.5"));
    }

    #[test]
    fn test_live_columns_from_information_module() {
        let schema = schema_with_module("g-mod");
        let data = DataSource::new(json!({ "guid": "g-mod", "value": "A1;A2;D1" }).into());
        let columns = LiveValues::new(&data).applicable_columns(&schema).unwrap();
        assert_eq!(columns, vec!["A1", "A2", "D"]);
    }

    #[test]
    fn test_live_columns_without_value() {
        let schema = schema_with_module("g-mod");
        let data = DataSource::new(json!({}).into());
        assert!(LiveValues::new(&data).applicable_columns(&schema).unwrap().is_empty());
    }

    #[test]
    fn test_live_columns_need_methodology_set() {
        let data = DataSource::new(json!({}).into());
        let err = LiveValues::new(&data).applicable_columns(&Schema::empty()).unwrap_err();
        assert!(matches!(err, Error::MissingBlock { .. }));
    }

    #[test]
    fn test_normalize_module_code() {
        assert_eq!(normalize_module_code("D1"), "D");
        assert_eq!(normalize_module_code("D2"), "D2");
        assert_eq!(normalize_module_code("A1"), "A1");
    }
}
