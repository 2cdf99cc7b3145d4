//! Two-level CSV loader.
//!
//! ```text
//! SetName,PropertyName,DataType,...      ← header; column 0 names blocks
//! LCAPset_Product,,,Description=...      ← opens a block
//! ,Material,IfcLabel,...                 ← property of the open block
//! ,Mass,IfcMassMeasure,...
//! LCAPset_Other,...                      ← opens the next block
//! ```
//!
//! Empty cells are dropped; a row whose cells are all empty is ignored.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::{SchemaBlock, SchemaProperty, SchemaTable, TableKind};
use crate::{Error, Result};

const BOM: char = '\u{feff}';

impl SchemaTable {
    /// Parse a schema table from any CSV reader.
    pub fn from_reader<R: Read>(kind: TableKind, reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()?
            .iter()
            .enumerate()
            .map(|(i, h)| if i == 0 { h.trim_start_matches(BOM) } else { h }.to_string())
            .collect();
        if headers.is_empty() {
            return Err(Error::Schema(format!("{} CSV has no header row", kind.name())));
        }

        let mut table = SchemaTable::new(kind);
        for record in rdr.records() {
            let record = record?;
            let key = record.get(0).unwrap_or_default();
            let cells: Vec<(String, String)> = headers
                .iter()
                .zip(record.iter())
                .skip(1)
                .filter(|(_, value)| !value.is_empty())
                .map(|(header, value)| (header.clone(), value.to_string()))
                .collect();

            if !key.is_empty() {
                table.insert(SchemaBlock {
                    name: key.to_string(),
                    attributes: cells,
                    properties: Vec::new(),
                })?;
            } else if !cells.is_empty() {
                let line = record.position().map_or(0, |p| p.line());
                let block = table.last_mut().ok_or_else(|| {
                    Error::Schema(format!(
                        "{} CSV line {line}: property row before any block",
                        kind.name()
                    ))
                })?;
                block.properties.push(SchemaProperty::new(cells));
            }
        }
        Ok(table)
    }

    /// Parse a schema table from a CSV file.
    pub fn from_path(kind: TableKind, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        tracing::debug!(path = %path.display(), table = kind.name(), "loading schema table");
        Self::from_reader(kind, file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PSETS: &str = "\u{feff}SetName,PropertyName,DataType,IFCType,Description\n\
        LCAPset_Product,,,,Product data\n\
        ,Material,IfcLabel,IfcPropertySingleValue,\n\
        ,Mass,IfcMassMeasure,IfcPropertySingleValue,Total mass\n\
        ,,,,\n\
        LCAPset_Empty,,,,\n\
        LCAPset_Third,,,,\n\
        ,Zeta,IfcLabel,IfcPropertySingleValue,\n\
        ,Alpha,IfcLabel,IfcPropertySingleValue,\n";

    #[test]
    fn test_blocks_and_attributes() {
        let table = SchemaTable::from_reader(TableKind::PropertySets, PSETS.as_bytes()).unwrap();
        assert_eq!(
            table.names().collect::<Vec<_>>(),
            vec!["LCAPset_Product", "LCAPset_Empty", "LCAPset_Third"]
        );

        let product = table.get("LCAPset_Product").unwrap();
        assert_eq!(product.description(), Some("Product data"));
        assert_eq!(product.properties.len(), 2);
        assert!(table.get("LCAPset_Empty").unwrap().properties.is_empty());
    }

    #[test]
    fn test_empty_cells_dropped() {
        let table = SchemaTable::from_reader(TableKind::PropertySets, PSETS.as_bytes()).unwrap();
        let material = &table.get("LCAPset_Product").unwrap().properties[0];
        assert_eq!(
            material.fields(),
            &[
                ("PropertyName".to_string(), "Material".to_string()),
                ("DataType".to_string(), "IfcLabel".to_string()),
                ("IFCType".to_string(), "IfcPropertySingleValue".to_string()),
            ]
        );
    }

    #[test]
    fn test_property_order_preserved() {
        let table = SchemaTable::from_reader(TableKind::PropertySets, PSETS.as_bytes()).unwrap();
        let names: Vec<_> = table
            .get("LCAPset_Third")
            .unwrap()
            .properties
            .iter()
            .filter_map(|p| p.property_name())
            .collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);
    }

    #[test]
    fn test_property_before_block_fails() {
        let csv = "Name,PropertyName\n,Orphan\n";
        let err = SchemaTable::from_reader(TableKind::PropertySets, csv.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
    }

    #[test]
    fn test_blank_rows_before_first_block_ignored() {
        let csv = "Name,PropertyName\n,\nPset_A,\n,Only\n";
        let table = SchemaTable::from_reader(TableKind::PropertySets, csv.as_bytes()).unwrap();
        assert_eq!(table.get("Pset_A").unwrap().properties.len(), 1);
    }

    #[test]
    fn test_short_rows_tolerated() {
        let csv = "Column,Description,ISO22057GUID\nA1,Raw material supply\nA2,Transport,abc-123\n";
        let table = SchemaTable::from_reader(TableKind::TableColumns, csv.as_bytes()).unwrap();
        assert_eq!(table.get("A1").unwrap().attribute("ISO22057GUID"), None);
        assert_eq!(table.get("A2").unwrap().attribute("ISO22057GUID"), Some("abc-123"));
    }

    #[test]
    fn test_duplicate_block_fails() {
        let csv = "Name,PropertyName\nPset_A,\nPset_A,\n";
        assert!(SchemaTable::from_reader(TableKind::PropertySets, csv.as_bytes()).is_err());
    }
}
