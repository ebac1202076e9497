//! One-mode entity repositories.
//!
//! An [`EntityRepository`] is a deduplicated keyed collection of one entity
//! type. It is backed by a [`DashMap`], so every individual operation is
//! atomic and callable through `&self` from many threads: `add` is an atomic
//! add-if-absent and `remove` an atomic take.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use orgnet_types::{Entity, EntityId};

use crate::error::{NetworkError, Result, Scope};

/// A keyed, deduplicated collection of one entity type.
#[derive(Debug, Clone)]
pub struct EntityRepository<T> {
    entities: DashMap<EntityId, T>,
}

impl<T: Entity> EntityRepository<T> {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self {
            entities: DashMap::new(),
        }
    }

    /// Insert an entity by identity.
    ///
    /// Returns `true` if the entity was inserted, `false` if an entity with
    /// the same id was already present (the existing entity is kept).
    pub fn add(&self, entity: T) -> bool {
        match self.entities.entry(entity.id()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(entity);
                true
            }
        }
    }

    /// Return `true` if an entity with this id is present.
    pub fn exists(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Return a copy of the entity, if present.
    pub fn get(&self, id: EntityId) -> Option<T> {
        self.entities.get(&id).map(|entry| entry.value().clone())
    }

    /// Return a copy of the entity, failing if it was never registered.
    pub fn require(&self, id: EntityId) -> Result<T> {
        self.get(id).ok_or(NetworkError::NotFound {
            scope: Scope::Repository(T::KIND),
            id,
        })
    }

    /// Remove the entity and return it. Removing an absent id is a no-op.
    pub fn remove(&self, id: EntityId) -> Option<T> {
        self.entities.remove(&id).map(|(_, entity)| entity)
    }

    /// Remove every entity.
    pub fn clear(&self) {
        self.entities.clear();
    }

    /// Return `true` if the repository holds at least one entity.
    pub fn any(&self) -> bool {
        !self.entities.is_empty()
    }

    /// Return the number of entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Return `true` if the repository is empty.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Return every id, sorted.
    pub fn ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.entities.iter().map(|entry| *entry.key()).collect();
        ids.sort_unstable();
        ids
    }

    /// Return a copy of every entity, sorted by id.
    pub fn values(&self) -> Vec<T> {
        let mut values: Vec<T> = self
            .entities
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        values.sort_unstable_by_key(|entity| entity.id());
        values
    }

    /// Copy the entity `id` under a fresh identity into `target`.
    ///
    /// The copy keeps the class of the original. Returns the new id.
    pub fn duplicate(&self, id: EntityId, target: &Self) -> Result<EntityId> {
        let copy = self.require(id)?.duplicate();
        let new_id = copy.id();
        target.add(copy);
        debug!(kind = %T::KIND, %id, %new_id, "Duplicated entity");
        Ok(new_id)
    }

    /// Add a copy of every entity to `target`, keeping identities.
    pub fn copy_to(&self, target: &Self) {
        for entry in &self.entities {
            target.add(entry.value().clone());
        }
    }
}

impl<T: Entity> Default for EntityRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}
