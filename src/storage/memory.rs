//! In-memory model backend.
//!
//! This is the reference implementation of `ModelBackend`.
//! It keeps entities in an id-ordered map protected by RwLock, so an export
//! walks them in creation order.
//!
//! ## Limitations
//!
//! - **No inverse attributes**: reverse lookups (e.g. which sets hold a
//!   property) are full scans.
//! - **Single-writer only**: per-collection locks mean multi-step mutations
//!   are NOT atomic. The builders drive it strictly sequentially.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use hashbrown::HashMap;
use parking_lot::RwLock;

use super::ModelBackend;
use crate::model::*;
use crate::{Error, Result};

// ============================================================================
// MemoryModel
// ============================================================================

/// In-memory IFC entity store.
pub struct MemoryModel {
    inner: Arc<MemoryInner>,
}

struct MemoryInner {
    entities: RwLock<BTreeMap<EntityId, Entity>>,
    /// kind → ids in creation order
    kind_index: RwLock<HashMap<EntityKind, Vec<EntityId>>>,
    next_id: AtomicU64,
}

impl MemoryModel {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MemoryInner {
                entities: RwLock::new(BTreeMap::new()),
                kind_index: RwLock::new(HashMap::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }
}

impl Default for MemoryModel {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// ModelBackend impl
// ============================================================================

impl ModelBackend for MemoryModel {
    fn create_entity(&self, entity: Entity) -> Result<EntityId> {
        let id = EntityId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        self.inner.kind_index.write().entry(entity.kind()).or_default().push(id);
        self.inner.entities.write().insert(id, entity);
        Ok(id)
    }

    fn get_entity(&self, id: EntityId) -> Result<Option<Entity>> {
        Ok(self.inner.entities.read().get(&id).cloned())
    }

    fn replace_entity(&self, id: EntityId, entity: Entity) -> Result<()> {
        let mut entities = self.inner.entities.write();
        let slot = entities.get_mut(&id).ok_or_else(|| Error::NotFound(format!("Entity {id}")))?;
        if slot.kind() != entity.kind() {
            return Err(Error::TypeError {
                expected: slot.ifc_class().into(),
                got: entity.ifc_class().into(),
            });
        }
        *slot = entity;
        Ok(())
    }

    fn delete_entity(&self, id: EntityId) -> Result<bool> {
        let removed = self.inner.entities.write().remove(&id);
        if let Some(entity) = &removed {
            let mut idx = self.inner.kind_index.write();
            if let Some(ids) = idx.get_mut(&entity.kind()) {
                ids.retain(|eid| *eid != id);
            }
        }
        Ok(removed.is_some())
    }

    fn entities_of_kind(&self, kind: EntityKind) -> Result<Vec<(EntityId, Entity)>> {
        let idx = self.inner.kind_index.read();
        let entities = self.inner.entities.read();

        let ids = idx.get(&kind).cloned().unwrap_or_default();
        Ok(ids
            .into_iter()
            .filter_map(|id| entities.get(&id).map(|e| (id, e.clone())))
            .collect())
    }

    fn all_entities(&self) -> Result<Vec<(EntityId, Entity)>> {
        Ok(self
            .inner
            .entities
            .read()
            .iter()
            .map(|(id, e)| (*id, e.clone()))
            .collect())
    }

    fn entity_count(&self) -> Result<u64> {
        Ok(self.inner.entities.read().len() as u64)
    }
}

// ============================================================================
// Tests
// ============================================================================
