//! The property entities: the five shapes plus the shared pieces they point at.

use serde::{Deserialize, Serialize};

use super::{EntityId, TypedValue};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySingleValue {
    pub name: String,
    pub specification: Option<String>,
    pub nominal_value: Option<TypedValue>,
    pub unit: Option<EntityId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyListValue {
    pub name: String,
    pub specification: Option<String>,
    pub list_values: Vec<TypedValue>,
    pub unit: Option<EntityId>,
}

/// Shared value set referenced by enumerated values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyEnumeration {
    pub name: String,
    pub enumeration_values: Vec<TypedValue>,
    pub unit: Option<EntityId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyEnumeratedValue {
    pub name: String,
    pub specification: Option<String>,
    pub enumeration_values: Vec<TypedValue>,
    pub enumeration_reference: Option<EntityId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexProperty {
    pub name: String,
    pub specification: Option<String>,
    pub usage_name: String,
    pub has_properties: Vec<EntityId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyReferenceValue {
    pub name: String,
    pub specification: Option<String>,
    pub usage_name: Option<String>,
    pub property_reference: Option<EntityId>,
}

// ============================================================================
// Tables
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: Option<String>,
    pub rows: Vec<EntityId>,
    pub columns: Vec<EntityId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub row_cells: Vec<TypedValue>,
    pub is_heading: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableColumn {
    pub identifier: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub unit: Option<EntityId>,
    pub reference_path: Option<EntityId>,
}

/// Path into the model, e.g. `IfcBuildingElementProxyType.HasPropertySets['X']`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub type_identifier: Option<String>,
    pub attribute_identifier: Option<String>,
    pub instance_name: Option<String>,
    pub list_positions: Vec<i64>,
    pub inner_reference: Option<EntityId>,
}
