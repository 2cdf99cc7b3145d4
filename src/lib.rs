//! # ifc-lca-psets: ISO 22057 / LCA Property Sets for IFC
//!
//! Builds the LCA property sets of a construction product onto an IFC4X3
//! object, driven by five CSV schema tables and, optionally, GUID-keyed
//! product data in JSON.
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `ModelBackend` is the contract between builders and storage
//! 2. **Clean DTOs**: `Entity`, `TypedValue`, `EntityId` cross all boundaries
//! 3. **Schema owns nothing**: CSV → `Schema` is loaded once and never mutated
//! 4. **One value source**: demo placeholders or live data, chosen once per build
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ifc_lca_psets::{GeneratorConfig, generate};
//!
//! # fn example() -> ifc_lca_psets::Result<()> {
//! let config = GeneratorConfig::from_path("generator.json")?;
//! let report = generate(&config)?;
//! println!("{} sets written to {}", report.stats.property_sets_kept, report.output_path.display());
//! # Ok(())
//! # }
//! ```
//!
//! ## Pipeline
//!
//! | Stage | Module | Output |
//! |-------|--------|--------|
//! | Load | `schema`, `data` | `Schema`, `DataSource` |
//! | Bootstrap | `bootstrap` | project, units, target object |
//! | Build | `build` | property sets on the target |
//! | Export | `export` | `.ifc` STEP file |

use std::path::PathBuf;

use serde::Serialize;

// ============================================================================
// Modules
// ============================================================================

pub mod bootstrap;
pub mod build;
pub mod coerce;
pub mod config;
pub mod data;
pub mod export;
pub mod model;
pub mod schema;
pub mod storage;

// ============================================================================
// Re-exports
// ============================================================================

pub use bootstrap::{BootstrapConfig, ModelHandles, bootstrap};
pub use build::{BuildContext, BuildStats, DemoValues, LiveValues, Placement, ValueSource};
pub use config::GeneratorConfig;
pub use data::{DataNode, DataSource};
pub use model::{Entity, EntityId, EntityKind, GlobalId, ObjectClass, Primitive, PrimitiveKind, TypedValue};
pub use schema::{Schema, SchemaBlock, SchemaPaths, SchemaProperty, SchemaTable, ShapeKind};
pub use storage::{MemoryModel, ModelBackend};

// ============================================================================
// Run driver
// ============================================================================

/// What one [`generate`] run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationReport {
    pub output_path: PathBuf,
    pub target: EntityId,
    pub entity_count: u64,
    pub stats: BuildStats,
}

/// Load, bootstrap, build and export in one go.
pub fn generate(config: &GeneratorConfig) -> Result<GenerationReport> {
    config.validate()?;
    let schema = Schema::load(&config.schema)?;
    let data = match (&config.data_file, config.generate_demo) {
        (Some(path), false) => Some(DataSource::from_path(path)?),
        _ => None,
    };

    let model = MemoryModel::new();
    let handles = bootstrap(&model, &config.model)?;
    let (model, stats) = match &data {
        Some(data) => build_into(model, handles.target, &schema, LiveValues::new(data))?,
        None => build_into(model, handles.target, &schema, DemoValues)?,
    };

    let output_path = config.output_path();
    export::write_step_file(&model, &output_path)?;
    Ok(GenerationReport {
        output_path,
        target: handles.target,
        entity_count: model.entity_count()?,
        stats,
    })
}

/// Assemble every property set onto `target` and hand the model back.
pub fn build_into<'s, M: ModelBackend>(
    model: M,
    target: EntityId,
    schema: &'s Schema,
    source: impl ValueSource + 's,
) -> Result<(M, BuildStats)> {
    let mut ctx = BuildContext::new(model, target, schema, source);
    let stats = ctx.assemble()?;
    Ok((ctx.into_model(), stats))
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Schema error: no block '{name}' in {table} table")]
    MissingBlock { table: String, name: String },

    #[error("Schema error: row '{row}' has no {field}")]
    MissingField { row: String, field: String },

    #[error("Schema error: unknown data type '{0}'")]
    UnknownDataType(String),

    #[error("Cannot read '{raw}' as {type_name}")]
    Coercion { type_name: String, raw: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Type error: expected {expected}, got {got}")]
    TypeError { expected: String, got: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
