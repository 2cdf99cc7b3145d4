//! Identity registry for shared entities.
//!
//! Enumerations, complex properties, table columns and references are
//! created once per model and reused by every property or table that needs
//! them. The registry remembers them by natural key; on first use it also
//! indexes whatever the model already holds, so a context built over a
//! pre-populated model reuses existing entities too.

use hashbrown::HashMap;

use crate::Result;
use crate::model::{Entity, EntityId, EntityKind};
use crate::storage::ModelBackend;

/// Natural key of an `IfcReference`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferenceKey {
    pub type_identifier: String,
    pub attribute_identifier: String,
    pub instance_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RegistryKey {
    Enumeration(String),
    ComplexProperty(String),
    TableColumn(String),
    Reference(ReferenceKey),
}

impl RegistryKey {
    /// The key an existing entity is known by, if it is a shared kind.
    pub fn of(entity: &Entity) -> Option<RegistryKey> {
        match entity {
            Entity::PropertyEnumeration(e) => Some(RegistryKey::Enumeration(e.name.clone())),
            Entity::ComplexProperty(c) => Some(RegistryKey::ComplexProperty(c.name.clone())),
            Entity::TableColumn(c) => c.name.clone().map(RegistryKey::TableColumn),
            Entity::Reference(r) => Some(RegistryKey::Reference(ReferenceKey {
                type_identifier: r.type_identifier.clone()?,
                attribute_identifier: r.attribute_identifier.clone()?,
                instance_name: r.instance_name.clone()?,
            })),
            _ => None,
        }
    }
}

const SHARED_KINDS: [EntityKind; 4] = [
    EntityKind::PropertyEnumeration,
    EntityKind::ComplexProperty,
    EntityKind::TableColumn,
    EntityKind::Reference,
];

#[derive(Debug, Default)]
pub struct EntityRegistry {
    entries: HashMap<RegistryKey, EntityId>,
    primed: bool,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id registered under `key`, indexing the model on first call.
    pub fn lookup<M: ModelBackend + ?Sized>(
        &mut self,
        model: &M,
        key: &RegistryKey,
    ) -> Result<Option<EntityId>> {
        if !self.primed {
            self.prime(model)?;
        }
        Ok(self.entries.get(key).copied())
    }

    /// Record a freshly created shared entity. The first registration wins.
    pub fn register(&mut self, key: RegistryKey, id: EntityId) {
        self.entries.entry(key).or_insert(id);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn prime<M: ModelBackend + ?Sized>(&mut self, model: &M) -> Result<()> {
        for kind in SHARED_KINDS {
            for (id, entity) in model.entities_of_kind(kind)? {
                if let Some(key) = RegistryKey::of(&entity) {
                    self.register(key, id);
                }
            }
        }
        self.primed = true;
        tracing::trace!(entries = self.entries.len(), "entity registry primed");
        Ok(())
    }
}
