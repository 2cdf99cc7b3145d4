//! Property-set assembly: one `IfcPropertySet` per schema block, filled in
//! schema order and dropped again if nothing ended up in it.

use crate::Result;
use crate::model::EntityId;
use crate::schema::{SchemaBlock, ShapeKind};
use crate::storage::ModelBackend;

use super::{BuildContext, BuildStats, ENVIRONMENTAL_INDICATORS_PSET, Placement};

impl<'s, M: ModelBackend> BuildContext<'s, M> {
    /// Build every property set of the schema onto the target.
    pub fn assemble(&mut self) -> Result<BuildStats> {
        let schema = self.schema;
        tracing::info!(
            target_object = %self.target,
            property_sets = schema.property_sets.len(),
            demo = self.source.is_demo(),
            "assembling property sets"
        );
        for block in schema.property_sets.iter() {
            self.assemble_property_set(block)?;
        }
        tracing::info!(
            kept = self.stats.property_sets_kept,
            removed = self.stats.property_sets_removed,
            properties = self.stats.properties_created,
            tables = self.stats.tables_created,
            "property sets assembled"
        );
        Ok(self.stats)
    }

    /// Build one property set. Returns `None` when it came out empty and was
    /// removed from the target.
    pub fn assemble_property_set(&mut self, block: &SchemaBlock) -> Result<Option<EntityId>> {
        let pset = self.model.add_property_set(self.target, &block.name)?;
        if let Some(description) = block.description() {
            self.model.set_property_set_description(pset, description)?;
        }

        for property in &block.properties {
            if property.shape() == ShapeKind::ComplexProperty {
                self.build_complex_property(pset, property)?;
                continue;
            }
            let Some(id) = self.build_simple_property(property, Placement::Attached(pset))? else {
                continue;
            };
            if let Some(spec) = property.specification() {
                self.model.set_specification(id, spec)?;
            }
        }

        if block.name == ENVIRONMENTAL_INDICATORS_PSET {
            self.build_environmental_indicators(pset)?;
        }

        if self.model.property_count(pset)? == 0 {
            tracing::debug!(pset = %block.name, "property set is empty, removing it");
            self.model.remove_property_set(self.target, pset)?;
            self.stats.property_sets_removed += 1;
            return Ok(None);
        }
        self.stats.property_sets_kept += 1;
        Ok(Some(pset))
    }
}
