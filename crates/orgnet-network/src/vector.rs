//! Stable row/column indices for matrix projection.
//!
//! A [`VectorNetwork`] is an ordered, de-duplicated list of entity ids plus
//! the reverse map from id to 0-based position. It is built once per
//! projection and never mutated afterwards.

use std::collections::HashMap;

use serde::Serialize;

use orgnet_types::EntityId;

/// An immutable ordered index of entity ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VectorNetwork {
    /// Ids in position order.
    ids: Vec<EntityId>,
    /// Reverse lookup: id to position.
    #[serde(skip)]
    index: HashMap<EntityId, usize>,
}

impl VectorNetwork {
    /// Build an index from ids in enumeration order.
    ///
    /// Repeated ids keep their first position.
    pub fn new(ids: impl IntoIterator<Item = EntityId>) -> Self {
        let mut vector = Self::default();
        for id in ids {
            if let std::collections::hash_map::Entry::Vacant(slot) = vector.index.entry(id) {
                slot.insert(vector.ids.len());
                vector.ids.push(id);
            }
        }
        vector
    }

    /// Return the position of `id`, if indexed.
    pub fn index_of(&self, id: EntityId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Return the id at `position`, if in range.
    pub fn id_at(&self, position: usize) -> Option<EntityId> {
        self.ids.get(position).copied()
    }

    /// Return `true` if `id` is indexed.
    pub fn contains(&self, id: EntityId) -> bool {
        self.index.contains_key(&id)
    }

    /// Return the ids in position order.
    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }

    /// Return the number of indexed ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Return `true` if nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Return `true` if at least one id is indexed.
    pub fn any(&self) -> bool {
        !self.ids.is_empty()
    }
}

impl FromIterator<EntityId> for VectorNetwork {
    fn from_iter<I: IntoIterator<Item = EntityId>>(iter: I) -> Self {
        Self::new(iter)
    }
}
