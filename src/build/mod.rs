//! # Property Builders
//!
//! Turns schema blocks into IFC property entities on one target object.
//!
//! ```text
//! Schema ──► assembler ──► properties ──► model
//!               │              │
//!               │              └── registry (enumerations, complex props)
//!               └── table ──► registry (columns, references)
//!
//! ValueSource: DemoValues | LiveValues  (where raw values come from)
//! ```
//!
//! A [`BuildContext`] owns everything one build needs. Nothing here is
//! global: two contexts over two models never see each other's entities.

pub mod assembler;
pub mod properties;
pub mod registry;
pub mod source;
pub mod table;

use serde::{Deserialize, Serialize};

use crate::model::EntityId;
use crate::schema::Schema;
use crate::storage::ModelBackend;

pub use registry::{EntityRegistry, ReferenceKey, RegistryKey};
pub use source::{DemoValues, IndicatorRow, LiveValues, RawValue, ValueSource};

// ============================================================================
// Names the builders look for
// ============================================================================

/// The set whose end gets the indicator tables.
pub const ENVIRONMENTAL_INDICATORS_PSET: &str = "LCAPset_EnvironmentalIndicators";
/// The set holding the declared information modules.
pub const METHODOLOGY_PSET: &str = "LCAPset_EPDMethodologicalSpecification";
pub const INFORMATION_MODULE: &str = "InformationModule";

/// Fixed leading columns of every indicator table.
pub const INDICATOR_COLUMN: &str = "Indicator";
pub const UNIT_COLUMN: &str = "Unit";

/// Column `ReferencePath` target.
pub const REFERENCE_TYPE: &str = "IfcBuildingElementProxyType";
pub const REFERENCE_ATTRIBUTE: &str = "HasPropertySets";

pub const TABLE_SUFFIX: &str = "Table";
pub const USAGE_SUFFIX: &str = "Results";

/// Separator of multi-valued raw values.
pub const LIST_DELIMITER: char = ';';

// ============================================================================
// Placement
// ============================================================================

/// Where a freshly built property goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Appended to the set's `HasProperties`.
    Attached(EntityId),
    /// Left loose; a complex property collects it.
    Nested,
}

// ============================================================================
// BuildStats
// ============================================================================

/// Counters of one build, returned by [`BuildContext::assemble`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStats {
    pub property_sets_kept: u64,
    pub property_sets_removed: u64,
    pub properties_created: u64,
    pub properties_skipped: u64,
    pub complex_properties_skipped: u64,
    pub unsupported_properties: u64,
    pub tables_created: u64,
    pub tables_skipped: u64,
    pub rows_skipped: u64,
    pub enumeration_values_skipped: u64,
    pub registry_hits: u64,
}

// ============================================================================
// BuildContext
// ============================================================================

/// One build: the model, its target object, the schema and a value source.
pub struct BuildContext<'s, M: ModelBackend> {
    model: M,
    target: EntityId,
    schema: &'s Schema,
    source: Box<dyn ValueSource + 's>,
    registry: EntityRegistry,
    stats: BuildStats,
}

impl<'s, M: ModelBackend> BuildContext<'s, M> {
    pub fn new(
        model: M,
        target: EntityId,
        schema: &'s Schema,
        source: impl ValueSource + 's,
    ) -> Self {
        Self {
            model,
            target,
            schema,
            source: Box::new(source),
            registry: EntityRegistry::new(),
            stats: BuildStats::default(),
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn target(&self) -> EntityId {
        self.target
    }

    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    /// Whether values come from the placeholder source.
    pub fn is_demo(&self) -> bool {
        self.source.is_demo()
    }

    /// Hand the populated model back.
    pub fn into_model(self) -> M {
        self.model
    }

    /// Registry lookup that counts hits.
    fn lookup(&mut self, key: &RegistryKey) -> crate::Result<Option<EntityId>> {
        let found = self.registry.lookup(&self.model, key)?;
        if found.is_some() {
            self.stats.registry_hits += 1;
        }
        Ok(found)
    }
}
