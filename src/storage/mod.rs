//! # Model Backend Trait
//!
//! This is THE contract between the property builders and whatever holds the
//! IFC instances. Every operation the builders, the bootstrap and the exporter
//! need is defined here.
//!
//! ## Implementations
//!
//! | Backend | Module | Description |
//! |---------|--------|-------------|
//! | `MemoryModel` | `memory` | Ordered in-memory entity store |
//!
//! Property-set attachment and removal are default methods built on the
//! entity CRUD primitives, so a backend only has to store and scan entities.

pub mod memory;

use crate::model::*;
use crate::{Error, Result};

pub use memory::MemoryModel;

/// IFC schema identifier written to exported files.
pub const SCHEMA_IDENTIFIER: &str = "IFC4X3";

// ============================================================================
// ModelBackend Trait
// ============================================================================

/// The object-model contract.
///
/// Backends return `Error::NotFound` for unknown ids and `Error::TypeError`
/// when an id points at the wrong sort of entity.
pub trait ModelBackend: Send + Sync + 'static {
    /// Schema the model is written against.
    fn schema_identifier(&self) -> &str {
        SCHEMA_IDENTIFIER
    }

    // ========================================================================
    // Entity CRUD
    // ========================================================================

    /// Store a new entity and return its id. Ids grow monotonically.
    fn create_entity(&self, entity: Entity) -> Result<EntityId>;

    /// Get an entity by id. Returns None if not found.
    fn get_entity(&self, id: EntityId) -> Result<Option<Entity>>;

    /// Overwrite an existing entity. The kind must not change.
    fn replace_entity(&self, id: EntityId, entity: Entity) -> Result<()>;

    /// Delete an entity. Returns true if it existed.
    fn delete_entity(&self, id: EntityId) -> Result<bool>;

    // ========================================================================
    // Scan
    // ========================================================================

    /// All entities of one kind, in creation order.
    fn entities_of_kind(&self, kind: EntityKind) -> Result<Vec<(EntityId, Entity)>>;

    /// Every entity, in id order.
    fn all_entities(&self) -> Result<Vec<(EntityId, Entity)>>;

    /// Total number of entities.
    fn entity_count(&self) -> Result<u64>;

    /// Get an entity that must exist.
    fn require_entity(&self, id: EntityId) -> Result<Entity> {
        self.get_entity(id)?
            .ok_or_else(|| Error::NotFound(format!("Entity {id}")))
    }

    // ========================================================================
    // Property sets
    // ========================================================================

    /// Create an empty property set and attach it to `object`.
    ///
    /// Type objects list the set in `HasPropertySets`; occurrences get an
    /// `IfcRelDefinesByProperties`.
    fn add_property_set(&self, object: EntityId, name: &str) -> Result<EntityId> {
        let mut definition = require_object(self, object)?;
        let pset = self.create_entity(Entity::PropertySet(PropertySet {
            global_id: GlobalId::new(),
            name: name.to_string(),
            description: None,
            has_properties: Vec::new(),
        }))?;

        if definition.class.is_type() {
            definition.has_property_sets.push(pset);
            self.replace_entity(object, Entity::Object(definition))?;
        } else {
            self.create_entity(Entity::RelDefinesByProperties(RelDefinesByProperties {
                global_id: GlobalId::new(),
                related_objects: vec![object],
                relating_property_set: pset,
            }))?;
        }
        Ok(pset)
    }

    /// Set a property set's `Description`.
    fn set_property_set_description(&self, pset: EntityId, description: &str) -> Result<()> {
        let mut set = require_property_set(self, pset)?;
        set.description = Some(description.to_string());
        self.replace_entity(pset, Entity::PropertySet(set))
    }

    /// Append a property to a set's `HasProperties`.
    fn attach_property(&self, pset: EntityId, property: EntityId) -> Result<()> {
        let entity = self.require_entity(property)?;
        if !entity.is_property() {
            return Err(Error::TypeError {
                expected: "IfcProperty".into(),
                got: entity.ifc_class().into(),
            });
        }
        let mut set = require_property_set(self, pset)?;
        set.has_properties.push(property);
        self.replace_entity(pset, Entity::PropertySet(set))
    }

    /// Annotate a property with its `Specification`.
    fn set_specification(&self, property: EntityId, specification: &str) -> Result<()> {
        let mut entity = self.require_entity(property)?;
        if !entity.set_specification(specification) {
            return Err(Error::TypeError {
                expected: "IfcProperty".into(),
                got: entity.ifc_class().into(),
            });
        }
        self.replace_entity(property, entity)
    }

    /// Number of properties in a set.
    fn property_count(&self, pset: EntityId) -> Result<usize> {
        Ok(require_property_set(self, pset)?.has_properties.len())
    }

    /// Property sets currently attached to `object`.
    fn property_sets_of(&self, object: EntityId) -> Result<Vec<EntityId>> {
        let definition = require_object(self, object)?;
        if definition.class.is_type() {
            return Ok(definition.has_property_sets);
        }
        Ok(self
            .entities_of_kind(EntityKind::RelDefinesByProperties)?
            .into_iter()
            .filter_map(|(_, e)| match e {
                Entity::RelDefinesByProperties(rel) if rel.related_objects.contains(&object) => {
                    Some(rel.relating_property_set)
                }
                _ => None,
            })
            .collect())
    }

    /// Detach a property set from `object` and delete it.
    ///
    /// Defining relationships left without objects are deleted too.
    fn remove_property_set(&self, object: EntityId, pset: EntityId) -> Result<bool> {
        let mut definition = require_object(self, object)?;
        if definition.class.is_type() {
            definition.has_property_sets.retain(|p| *p != pset);
            self.replace_entity(object, Entity::Object(definition))?;
        } else {
            for (id, entity) in self.entities_of_kind(EntityKind::RelDefinesByProperties)? {
                let Entity::RelDefinesByProperties(mut rel) = entity else { continue };
                if rel.relating_property_set != pset {
                    continue;
                }
                rel.related_objects.retain(|o| *o != object);
                if rel.related_objects.is_empty() {
                    self.delete_entity(id)?;
                } else {
                    self.replace_entity(id, Entity::RelDefinesByProperties(rel))?;
                }
            }
        }
        self.delete_entity(pset)
    }
}

fn require_object<M: ModelBackend + ?Sized>(model: &M, id: EntityId) -> Result<ObjectDefinition> {
    match model.require_entity(id)? {
        Entity::Object(o) => Ok(o),
        other => Err(Error::TypeError {
            expected: "object definition".into(),
            got: other.ifc_class().into(),
        }),
    }
}

fn require_property_set<M: ModelBackend + ?Sized>(model: &M, id: EntityId) -> Result<PropertySet> {
    match model.require_entity(id)? {
        Entity::PropertySet(p) => Ok(p),
        other => Err(Error::TypeError {
            expected: "IfcPropertySet".into(),
            got: other.ifc_class().into(),
        }),
    }
}
