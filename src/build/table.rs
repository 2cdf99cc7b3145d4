//! Indicator tables.
//!
//! Every block of the table-rows schema becomes an `IfcPropertyReferenceValue`
//! pointing at an `IfcTable`:
//!
//! ```text
//! Indicator | Unit        | A1  | A2  | ... | D
//! ----------+-------------+-----+-----+-----+----
//! GWP-total | kg CO2 eq.  | 5.0 | NaN | ... | 0.0
//! ```
//!
//! The two leading columns are fixed; the module columns depend on the value
//! source. Columns and their `IfcReference` paths are shared across tables.

use crate::Result;
use crate::model::*;
use crate::schema::{DATA_TYPE, GUID, REFERENCE_TO, ROW_NAME, SchemaBlock, UNIT};
use crate::storage::ModelBackend;

use super::{
    BuildContext, INDICATOR_COLUMN, REFERENCE_ATTRIBUTE, REFERENCE_TYPE, ReferenceKey,
    RegistryKey, TABLE_SUFFIX, UNIT_COLUMN, USAGE_SUFFIX,
};

impl<'s, M: ModelBackend> BuildContext<'s, M> {
    /// Attach one reference-valued table property per table-rows block.
    pub fn build_environmental_indicators(&mut self, pset: EntityId) -> Result<()> {
        let schema = self.schema;
        for block in schema.table_rows.iter() {
            self.build_reference_value(pset, block)?;
        }
        Ok(())
    }

    /// `IfcPropertyReferenceValue` named after the block, usage `<name>Results`.
    /// Skipped when the table has no rows.
    pub fn build_reference_value(&mut self, pset: EntityId, block: &SchemaBlock) -> Result<Option<EntityId>> {
        let Some(table) = self.build_table(block)? else {
            return Ok(None);
        };
        let id = self.model.create_entity(Entity::PropertyReferenceValue(PropertyReferenceValue {
            name: block.name.clone(),
            specification: None,
            usage_name: Some(format!("{}{USAGE_SUFFIX}", block.name)),
            property_reference: Some(table),
        }))?;
        self.model.attach_property(pset, id)?;
        self.stats.properties_created += 1;
        Ok(Some(id))
    }

    /// Build the `<name>Table` for one table-rows block.
    ///
    /// Rows come first; a table without rows creates neither a table nor
    /// columns.
    pub fn build_table(&mut self, block: &SchemaBlock) -> Result<Option<EntityId>> {
        let codes = self.applicable_columns()?;
        let rows = self.build_rows(block, &codes)?;
        if rows.is_empty() {
            tracing::debug!(table = %block.name, "no indicator rows, skipping table");
            self.stats.tables_skipped += 1;
            return Ok(None);
        }
        let columns = self.build_columns(&codes)?;
        let id = self.model.create_entity(Entity::Table(Table {
            name: Some(format!("{}{TABLE_SUFFIX}", block.name)),
            rows,
            columns,
        }))?;
        self.stats.tables_created += 1;
        Ok(Some(id))
    }

    /// Module column codes of the value source that the schema defines.
    pub fn applicable_columns(&self) -> Result<Vec<String>> {
        let schema = self.schema;
        let codes = self.source.applicable_columns(schema)?;
        Ok(codes
            .into_iter()
            .filter(|code| {
                let known = schema.table_columns.contains(code);
                if !known {
                    tracing::warn!(column = %code, "information module has no column definition, skipping");
                }
                known
            })
            .collect())
    }

    /// One `IfcTableRow` per indicator row with values: row name, unit, then
    /// a cell per module column.
    ///
    /// A cell the row's values have no entry for reads `IfcLabel('NaN')`.
    pub fn build_rows(&mut self, block: &SchemaBlock, codes: &[String]) -> Result<Vec<EntityId>> {
        let schema = self.schema;
        let mut rows = Vec::with_capacity(block.properties.len());
        for row in &block.properties {
            let Some(indicators) = self.source.indicator_row(row) else {
                tracing::trace!(row = %row.label(), "indicator row has no values, skipping");
                self.stats.rows_skipped += 1;
                continue;
            };
            let data_type = row.require(DATA_TYPE)?;

            let mut row_cells = Vec::with_capacity(codes.len() + 2);
            row_cells.push(TypedValue::label(row.require(ROW_NAME)?));
            row_cells.push(TypedValue::label(row.get(UNIT).unwrap_or(NAN_SENTINEL)));
            for code in codes {
                let column_guid = schema.table_columns.get(code).and_then(|c| c.attribute(GUID));
                let cell = match indicators.cell(column_guid) {
                    Some(raw) => raw.coerce_or_label(data_type)?,
                    None => TypedValue::missing(),
                };
                row_cells.push(cell);
            }

            rows.push(self.model.create_entity(Entity::TableRow(TableRow {
                row_cells,
                is_heading: None,
            }))?);
        }
        Ok(rows)
    }

    /// `Indicator`, `Unit`, then one column per module code.
    pub fn build_columns(&mut self, codes: &[String]) -> Result<Vec<EntityId>> {
        let schema = self.schema;
        let mut columns = Vec::with_capacity(codes.len() + 2);
        for fixed in [INDICATOR_COLUMN, UNIT_COLUMN] {
            columns.push(self.column(fixed, None)?);
        }
        for code in codes {
            let definition = schema.table_columns.require(code)?;
            columns.push(self.column(code, Some(definition))?);
        }
        Ok(columns)
    }

    /// The shared `IfcTableColumn` named `name`. A definition with a
    /// `ReferenceTo` gets a `ReferencePath`.
    pub fn column(&mut self, name: &str, definition: Option<&SchemaBlock>) -> Result<EntityId> {
        let key = RegistryKey::TableColumn(name.to_string());
        if let Some(id) = self.lookup(&key)? {
            return Ok(id);
        }
        let reference_path = match definition.and_then(|d| d.attribute(REFERENCE_TO)) {
            Some(instance) => Some(self.reference(instance)?),
            None => None,
        };
        let id = self.model.create_entity(Entity::TableColumn(TableColumn {
            identifier: Some(name.to_string()),
            name: Some(name.to_string()),
            description: definition.and_then(SchemaBlock::description).map(String::from),
            unit: None,
            reference_path,
        }))?;
        self.registry.register(key, id);
        Ok(id)
    }

    /// The shared `IfcReference` to `HasPropertySets` of an element type
    /// instance.
    pub fn reference(&mut self, instance_name: &str) -> Result<EntityId> {
        let key = RegistryKey::Reference(ReferenceKey {
            type_identifier: REFERENCE_TYPE.to_string(),
            attribute_identifier: REFERENCE_ATTRIBUTE.to_string(),
            instance_name: instance_name.to_string(),
        });
        if let Some(id) = self.lookup(&key)? {
            return Ok(id);
        }
        let id = self.model.create_entity(Entity::Reference(Reference {
            type_identifier: Some(REFERENCE_TYPE.to_string()),
            attribute_identifier: Some(REFERENCE_ATTRIBUTE.to_string()),
            instance_name: Some(instance_name.to_string()),
            list_positions: Vec::new(),
            inner_reference: None,
        }))?;
        self.registry.register(key, id);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{DemoValues, INFORMATION_MODULE, LiveValues, METHODOLOGY_PSET};
    use crate::data::DataSource;
    use crate::schema::{DESCRIPTION, PROPERTY_NAME, Schema, SchemaProperty, SchemaTable, TableKind};
    use crate::storage::MemoryModel;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn schema() -> Schema {
        let mut schema = Schema::empty();
        schema.property_sets = SchemaTable::from_blocks(
            TableKind::PropertySets,
            [SchemaBlock::new(METHODOLOGY_PSET).with_property(
                SchemaProperty::default()
                    .with_field(PROPERTY_NAME, INFORMATION_MODULE)
                    .with_field(GUID, "g-mod"),
            )],
        )
        .unwrap();
        schema.table_rows = SchemaTable::from_blocks(
            TableKind::TableRows,
            [SchemaBlock::new("CoreIndicators").with_property(
                SchemaProperty::default()
                    .with_field(ROW_NAME, "GWP-total")
                    .with_field(DATA_TYPE, "IfcReal")
                    .with_field(UNIT, "kg CO2 eq.")
                    .with_field(GUID, "row-gwp"),
            )],
        )
        .unwrap();
        schema.table_columns = SchemaTable::from_blocks(
            TableKind::TableColumns,
            [
                SchemaBlock::new("A1")
                    .with_attribute(DESCRIPTION, "Raw material supply")
                    .with_attribute(GUID, "col-a1")
                    .with_attribute(REFERENCE_TO, "A1-A3"),
                SchemaBlock::new("A2").with_attribute(GUID, "col-a2").with_attribute(REFERENCE_TO, "A1-A3"),
            ],
        )
        .unwrap();
        schema
    }

    fn object(model: &MemoryModel) -> EntityId {
        model
            .create_entity(Entity::Object(ObjectDefinition {
                global_id: GlobalId::new(),
                class: ObjectClass::BuildingElementProxyType,
                name: None,
                description: None,
                has_property_sets: Vec::new(),
            }))
            .unwrap()
    }

    #[test]
    fn test_demo_table_layout() {
        let schema = schema();
        let model = MemoryModel::new();
        let target = object(&model);
        let mut ctx = BuildContext::new(model, target, &schema, DemoValues);

        let block = schema.table_rows.get("CoreIndicators").unwrap();
        let table = ctx.build_table(block).unwrap().unwrap();
        let Entity::Table(table) = ctx.model().require_entity(table).unwrap() else { panic!("wrong kind") };
        assert_eq!(table.name.as_deref(), Some("CoreIndicatorsTable"));
        assert_eq!(table.columns.len(), 4);

        let names: Vec<_> = table
            .columns
            .iter()
            .map(|c| ctx.model().require_entity(*c).unwrap().name().map(String::from))
            .collect();
        assert_eq!(names, vec![Some("Indicator".into()), Some("Unit".into()), Some("A1".into()), Some("A2".into())]);

        let Entity::TableRow(row) = ctx.model().require_entity(table.rows[0]).unwrap() else { panic!("wrong kind") };
        assert_eq!(
            row.row_cells,
            vec![
                TypedValue::label("GWP-total"),
                TypedValue::label("kg CO2 eq."),
                TypedValue::new("IfcReal", 0.0),
                TypedValue::new("IfcReal", 0.0),
            ]
        );
    }

    #[test]
    fn test_columns_and_references_shared() {
        let schema = schema();
        let model = MemoryModel::new();
        let target = object(&model);
        let mut ctx = BuildContext::new(model, target, &schema, DemoValues);

        let block = schema.table_rows.get("CoreIndicators").unwrap();
        ctx.build_table(block).unwrap();
        ctx.build_table(block).unwrap();
        assert_eq!(ctx.model().entities_of_kind(EntityKind::TableColumn).unwrap().len(), 4);

        let references = ctx.model().entities_of_kind(EntityKind::Reference).unwrap();
        assert_eq!(references.len(), 1);
        let Entity::Reference(reference) = &references[0].1 else { panic!("wrong kind") };
        assert_eq!(reference.type_identifier.as_deref(), Some("IfcBuildingElementProxyType"));
        assert_eq!(reference.attribute_identifier.as_deref(), Some("HasPropertySets"));
        assert_eq!(reference.instance_name.as_deref(), Some("A1-A3"));
    }

    #[test]
    fn test_live_missing_cell_is_nan() {
        let schema = schema();
        let data = DataSource::new(
            json!({
                "module": { "guid": "g-mod", "value": "A1;A2" },
                "gwp": { "guid": "row-gwp", "values": [ { "guid": "col-a2", "value": 5 } ] }
            })
            .into(),
        );
        let model = MemoryModel::new();
        let target = object(&model);
        let mut ctx = BuildContext::new(model, target, &schema, LiveValues::new(&data));

        let block = schema.table_rows.get("CoreIndicators").unwrap();
        let codes = vec!["A1".to_string(), "A2".to_string()];
        let rows = ctx.build_rows(block, &codes).unwrap();
        let Entity::TableRow(row) = ctx.model().require_entity(rows[0]).unwrap() else { panic!("wrong kind") };
        assert_eq!(row.row_cells[2], TypedValue::missing());
        assert_eq!(row.row_cells[3], TypedValue::new("IfcReal", 5.0));
    }

    #[test]
    fn test_table_without_rows_leaves_nothing() {
        let schema = schema();
        let data = DataSource::new(json!({}).into());
        let model = MemoryModel::new();
        let target = object(&model);
        let mut ctx = BuildContext::new(model, target, &schema, LiveValues::new(&data));
        let pset = ctx.model().add_property_set(target, "Pset").unwrap();

        let block = schema.table_rows.get("CoreIndicators").unwrap();
        assert_eq!(ctx.build_reference_value(pset, block).unwrap(), None);
        assert!(ctx.model().entities_of_kind(EntityKind::TableColumn).unwrap().is_empty());
        assert!(ctx.model().entities_of_kind(EntityKind::Table).unwrap().is_empty());
        assert_eq!(ctx.stats().tables_skipped, 1);
    }

    #[test]
    fn test_reference_value_usage_name() {
        let schema = schema();
        let model = MemoryModel::new();
        let target = object(&model);
        let mut ctx = BuildContext::new(model, target, &schema, DemoValues);
        let pset = ctx.model().add_property_set(target, "Pset").unwrap();

        let block = schema.table_rows.get("CoreIndicators").unwrap();
        let id = ctx.build_reference_value(pset, block).unwrap().unwrap();
        let Entity::PropertyReferenceValue(value) = ctx.model().require_entity(id).unwrap() else {
            panic!("wrong kind")
        };
        assert_eq!(value.name, "CoreIndicators");
        assert_eq!(value.usage_name.as_deref(), Some("CoreIndicatorsResults"));
        assert!(value.property_reference.is_some());
    }
}
