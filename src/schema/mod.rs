//! # Property Schema
//!
//! The five CSV tables that drive the builders, parsed into ordered blocks:
//!
//! | Table | Block | Property rows |
//! |-------|-------|---------------|
//! | property sets | `LCAPset_*` set | one per property |
//! | enumerations | enumeration name | one per allowed value |
//! | complex properties | complex property name | one per constituent |
//! | table rows | indicator table | one per indicator row |
//! | table columns | column code (`A1`, `D`, ...) | (none) |
//!
//! Blocks and properties keep their CSV order; table rows are emitted
//! positionally from it.

pub mod loader;
pub mod types;

use std::path::{Path, PathBuf};

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ============================================================================
// Column names
// ============================================================================

pub const PROPERTY_NAME: &str = "PropertyName";
pub const DATA_TYPE: &str = "DataType";
pub const IFC_TYPE: &str = "IFCType";
pub const UNIT: &str = "Unit";
pub const GUID: &str = "ISO22057GUID";
pub const SPECIFICATION: &str = "Specification";
pub const ENUMERATION_REFERENCE: &str = "EnumerationReference";
pub const ENUMERATION_VALUES: &str = "EnumerationValues";
pub const ROW_NAME: &str = "RowName";
pub const REFERENCE_TO: &str = "ReferenceTo";
pub const DESCRIPTION: &str = "Description";

/// Unit cell value meaning "no unit".
pub const UNITLESS: &str = "unitless";

// ============================================================================
// Shape kind
// ============================================================================

/// Which property entity a schema row asks for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    SingleValue,
    ListValue,
    EnumeratedValue,
    ComplexProperty,
    ReferenceValue,
    Unsupported(String),
}

impl ShapeKind {
    pub fn parse(ifc_type: &str) -> Self {
        match ifc_type {
            "IfcPropertySingleValue" => ShapeKind::SingleValue,
            "IfcPropertyListValue" => ShapeKind::ListValue,
            "IfcPropertyEnumeratedValue" => ShapeKind::EnumeratedValue,
            "IfcComplexProperty" => ShapeKind::ComplexProperty,
            "IfcPropertyReferenceValue" => ShapeKind::ReferenceValue,
            other => ShapeKind::Unsupported(other.to_string()),
        }
    }
}

// ============================================================================
// SchemaProperty
// ============================================================================

/// One property row: the non-empty cells of the row, in column order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SchemaProperty {
    fields: Vec<(String, String)>,
}

impl SchemaProperty {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// A field the caller cannot do without; missing is a schema defect.
    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key).ok_or_else(|| Error::MissingField {
            row: self.label(),
            field: key.to_string(),
        })
    }

    /// Short human label for diagnostics: the property or row name, else the
    /// first cell.
    pub fn label(&self) -> String {
        self.property_name()
            .or_else(|| self.row_name())
            .or_else(|| self.fields.first().map(|(_, v)| v.as_str()))
            .unwrap_or("<empty row>")
            .to_string()
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn property_name(&self) -> Option<&str> { self.get(PROPERTY_NAME) }
    pub fn data_type(&self) -> Option<&str> { self.get(DATA_TYPE) }
    pub fn guid(&self) -> Option<&str> { self.get(GUID) }
    pub fn specification(&self) -> Option<&str> { self.get(SPECIFICATION) }
    pub fn enumeration_reference(&self) -> Option<&str> { self.get(ENUMERATION_REFERENCE) }
    pub fn enumeration_value(&self) -> Option<&str> { self.get(ENUMERATION_VALUES) }
    pub fn row_name(&self) -> Option<&str> { self.get(ROW_NAME) }
    pub fn reference_to(&self) -> Option<&str> { self.get(REFERENCE_TO) }
    pub fn description(&self) -> Option<&str> { self.get(DESCRIPTION) }

    /// Declared unit, `None` when absent or `unitless`.
    pub fn unit(&self) -> Option<&str> {
        self.get(UNIT).filter(|u| *u != UNITLESS)
    }

    pub fn shape(&self) -> ShapeKind {
        ShapeKind::parse(self.get(IFC_TYPE).unwrap_or_default())
    }
}

// ============================================================================
// SchemaBlock
// ============================================================================

/// A named group of property rows with its block-level attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaBlock {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub properties: Vec<SchemaProperty>,
}

impl SchemaBlock {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), attributes: Vec::new(), properties: Vec::new() }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn with_property(mut self, property: SchemaProperty) -> Self {
        self.properties.push(property);
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn description(&self) -> Option<&str> {
        self.attribute(DESCRIPTION)
    }

    /// First property with the given `PropertyName`.
    pub fn property(&self, name: &str) -> Option<&SchemaProperty> {
        self.properties.iter().find(|p| p.property_name() == Some(name))
    }
}

// ============================================================================
// SchemaTable
// ============================================================================

/// Which of the five CSV files a table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableKind {
    PropertySets,
    Enumerations,
    ComplexProperties,
    TableRows,
    TableColumns,
}

impl TableKind {
    pub fn name(&self) -> &'static str {
        match self {
            TableKind::PropertySets => "property sets",
            TableKind::Enumerations => "enumerations",
            TableKind::ComplexProperties => "complex properties",
            TableKind::TableRows => "table rows",
            TableKind::TableColumns => "table columns",
        }
    }
}

/// Ordered block-name → block mapping.
#[derive(Debug, Clone)]
pub struct SchemaTable {
    kind: TableKind,
    blocks: Vec<SchemaBlock>,
    index: HashMap<String, usize>,
}

impl SchemaTable {
    pub fn new(kind: TableKind) -> Self {
        Self { kind, blocks: Vec::new(), index: HashMap::new() }
    }

    /// Build a table from already-parsed blocks.
    pub fn from_blocks(kind: TableKind, blocks: impl IntoIterator<Item = SchemaBlock>) -> Result<Self> {
        let mut table = Self::new(kind);
        for block in blocks {
            table.insert(block)?;
        }
        Ok(table)
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }

    /// Append a block. Block names are unique within a table.
    pub fn insert(&mut self, block: SchemaBlock) -> Result<()> {
        if self.index.contains_key(&block.name) {
            return Err(Error::Schema(format!(
                "duplicate block '{}' in {} table",
                block.name,
                self.kind.name()
            )));
        }
        self.index.insert(block.name.clone(), self.blocks.len());
        self.blocks.push(block);
        Ok(())
    }

    pub(crate) fn last_mut(&mut self) -> Option<&mut SchemaBlock> {
        self.blocks.last_mut()
    }

    pub fn get(&self, name: &str) -> Option<&SchemaBlock> {
        self.index.get(name).map(|&i| &self.blocks[i])
    }

    /// A block the caller cannot do without; missing is a schema defect.
    pub fn require(&self, name: &str) -> Result<&SchemaBlock> {
        self.get(name).ok_or_else(|| Error::MissingBlock {
            table: self.kind.name().to_string(),
            name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SchemaBlock> {
        self.blocks.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().map(|b| b.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

// ============================================================================
// Schema
// ============================================================================

/// Locations of the five schema CSVs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaPaths {
    pub property_sets: PathBuf,
    pub enumerations: PathBuf,
    pub complex_properties: PathBuf,
    pub table_rows: PathBuf,
    pub table_columns: PathBuf,
}

impl Default for SchemaPaths {
    fn default() -> Self {
        Self::in_dir("CSV")
    }
}

impl SchemaPaths {
    /// The ISO 22057 product CSVs under `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            property_sets: dir.join("22057IFC_psets.csv"),
            enumerations: dir.join("22057IFC_enumerations.csv"),
            complex_properties: dir.join("22057IFC_complexprops.csv"),
            table_rows: dir.join("22057IFC_tablerows.csv"),
            table_columns: dir.join("22057IFC_tablecolumns.csv"),
        }
    }
}

/// The complete schema, loaded once before any building starts.
#[derive(Debug, Clone)]
pub struct Schema {
    pub property_sets: SchemaTable,
    pub enumerations: SchemaTable,
    pub complex_properties: SchemaTable,
    pub table_rows: SchemaTable,
    pub table_columns: SchemaTable,
}

impl Schema {
    pub fn load(paths: &SchemaPaths) -> Result<Self> {
        let schema = Self {
            property_sets: SchemaTable::from_path(TableKind::PropertySets, &paths.property_sets)?,
            enumerations: SchemaTable::from_path(TableKind::Enumerations, &paths.enumerations)?,
            complex_properties: SchemaTable::from_path(
                TableKind::ComplexProperties,
                &paths.complex_properties,
            )?,
            table_rows: SchemaTable::from_path(TableKind::TableRows, &paths.table_rows)?,
            table_columns: SchemaTable::from_path(TableKind::TableColumns, &paths.table_columns)?,
        };
        tracing::info!(
            property_sets = schema.property_sets.len(),
            enumerations = schema.enumerations.len(),
            complex_properties = schema.complex_properties.len(),
            table_rows = schema.table_rows.len(),
            table_columns = schema.table_columns.len(),
            "schema loaded"
        );
        Ok(schema)
    }

    /// Schema with no blocks at all, to be filled through the public fields.
    pub fn empty() -> Self {
        Self {
            property_sets: SchemaTable::new(TableKind::PropertySets),
            enumerations: SchemaTable::new(TableKind::Enumerations),
            complex_properties: SchemaTable::new(TableKind::ComplexProperties),
            table_rows: SchemaTable::new(TableKind::TableRows),
            table_columns: SchemaTable::new(TableKind::TableColumns),
        }
    }
}
