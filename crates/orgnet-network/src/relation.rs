//! Generic keyed-to-collection relation networks.
//!
//! A [`RelationNetwork`] maps a key entity (an agent, a group, a resource, a
//! task) to the relation records it holds. Within one key's collection the
//! record targets are unique: adding a second record with the same target is
//! a no-op and the existing record wins.
//!
//! Every mutation takes `&self` and locks only the shard holding the key, so
//! concurrent `add`/`remove` on the same key never lose entries.
//!
//! Two lookups with different failure modes coexist on purpose:
//!
//! - [`RelationNetwork::get`] assumes the key was registered and fails with
//!   [`NetworkError::NotFound`] otherwise.
//! - [`RelationNetwork::exists_relation`], [`RelationNetwork::value`] and
//!   [`RelationNetwork::targets`] answer "is the relation there" and return an
//!   empty or negative result for unknown keys.

use dashmap::DashMap;

use orgnet_types::{AgentBelief, AgentGroup, AgentKnowledge, AgentResource, AgentTask};
use orgnet_types::{EntityId, Relation, ResourceTask, TaskKnowledge};

use crate::error::{NetworkError, Result, Scope};
use crate::matrix::{self, Matrix};
use crate::vector::VectorNetwork;

/// Agent x Knowledge expertise, keyed by agent.
pub type AgentKnowledgeNetwork = RelationNetwork<AgentKnowledge>;
/// Agent x Belief convictions, keyed by agent.
pub type AgentBeliefNetwork = RelationNetwork<AgentBelief>;
/// Agent x Resource associations, keyed by agent.
pub type AgentResourceNetwork = RelationNetwork<AgentResource>;
/// Agent x Task assignments, keyed by agent.
pub type AgentTaskNetwork = RelationNetwork<AgentTask>;
/// Group x Agent memberships, keyed by group.
pub type AgentGroupNetwork = RelationNetwork<AgentGroup>;
/// Resource x Task usage, keyed by resource.
pub type ResourceTaskNetwork = RelationNetwork<ResourceTask>;
/// Task x Knowledge requirements, keyed by task.
pub type TaskKnowledgeNetwork = RelationNetwork<TaskKnowledge>;

/// A keyed store of relation records of one type.
#[derive(Debug, Clone)]
pub struct RelationNetwork<R> {
    records: DashMap<EntityId, Vec<R>>,
}

impl<R: Relation> RelationNetwork<R> {
    /// Create an empty network.
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Register `key` with an empty collection if it is unknown.
    pub fn add_key(&self, key: EntityId) {
        self.records.entry(key).or_default();
    }

    /// Add `record` under `key`, creating the key if needed.
    ///
    /// Returns `false` if a record with the same target already exists under
    /// `key`; the existing record is kept unchanged.
    pub fn add(&self, key: EntityId, record: R) -> bool {
        let mut collection = self.records.entry(key).or_default();
        let target = record.target();
        if collection.iter().any(|existing| existing.target() == target) {
            return false;
        }
        collection.push(record);
        true
    }

    /// Overwrite the value of an existing relation.
    ///
    /// Returns `false` if the relation does not exist.
    pub fn update_value(&self, key: EntityId, target: EntityId, value: f64) -> bool {
        self.records.get_mut(&key).is_some_and(|mut collection| {
            collection
                .iter_mut()
                .find(|record| record.target() == target)
                .map(|record| record.set_value(value))
                .is_some()
        })
    }

    /// Remove `key` and every record under it. Returns the removed records.
    pub fn remove_key(&self, key: EntityId) -> Option<Vec<R>> {
        self.records.remove(&key).map(|(_, collection)| collection)
    }

    /// Remove the record pointing at `target` under `key`.
    ///
    /// The key stays registered even if its collection becomes empty.
    /// Returns the removed record, if any.
    pub fn remove_relation(&self, key: EntityId, target: EntityId) -> Option<R> {
        let mut collection = self.records.get_mut(&key)?;
        let position = collection
            .iter()
            .position(|record| record.target() == target)?;
        Some(collection.remove(position))
    }

    /// Remove every record under `key` matching `predicate`.
    ///
    /// Returns the removed records.
    pub fn remove_where(&self, key: EntityId, predicate: impl Fn(&R) -> bool) -> Vec<R> {
        let Some(mut collection) = self.records.get_mut(&key) else {
            return Vec::new();
        };
        let (removed, kept): (Vec<R>, Vec<R>) =
            collection.drain(..).partition(|record| predicate(record));
        *collection = kept;
        removed
    }

    /// Remove every record pointing at `target`, under every key.
    ///
    /// Returns the number of records removed.
    pub fn remove_target(&self, target: EntityId) -> usize {
        let mut removed = 0_usize;
        for mut entry in self.records.iter_mut() {
            let before = entry.len();
            entry.retain(|record| record.target() != target);
            removed = removed.saturating_add(before.saturating_sub(entry.len()));
        }
        removed
    }

    /// Remove every key and record.
    pub fn clear(&self) {
        self.records.clear();
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Return `true` if `key` is registered.
    pub fn exists(&self, key: EntityId) -> bool {
        self.records.contains_key(&key)
    }

    /// Return `true` if `key` holds a record pointing at `target`.
    pub fn exists_relation(&self, key: EntityId, target: EntityId) -> bool {
        self.records.get(&key).is_some_and(|collection| {
            collection.iter().any(|record| record.target() == target)
        })
    }

    /// Return a copy of the records under `key`.
    ///
    /// Fails with [`NetworkError::NotFound`] if `key` was never registered.
    pub fn get(&self, key: EntityId) -> Result<Vec<R>> {
        self.records
            .get(&key)
            .map(|collection| collection.clone())
            .ok_or(NetworkError::NotFound {
                scope: Scope::Network(R::NETWORK),
                id: key,
            })
    }

    /// Return a copy of the record under `key` pointing at `target`.
    pub fn relation(&self, key: EntityId, target: EntityId) -> Option<R> {
        self.records.get(&key).and_then(|collection| {
            collection
                .iter()
                .find(|record| record.target() == target)
                .cloned()
        })
    }

    /// Return the value of the relation from `key` to `target`, if present.
    pub fn value(&self, key: EntityId, target: EntityId) -> Option<f64> {
        self.relation(key, target).map(|record| record.value())
    }

    /// Return the targets under `key`, in insertion order. Empty if unknown.
    pub fn targets(&self, key: EntityId) -> Vec<EntityId> {
        self.records
            .get(&key)
            .map(|collection| collection.iter().map(Relation::target).collect())
            .unwrap_or_default()
    }

    /// Return every key holding a record pointing at `target`, sorted.
    pub fn keys_with(&self, target: EntityId) -> Vec<EntityId> {
        let mut keys: Vec<EntityId> = self
            .records
            .iter()
            .filter(|entry| entry.iter().any(|record| record.target() == target))
            .map(|entry| *entry.key())
            .collect();
        keys.sort_unstable();
        keys
    }

    /// Keep only the ids among `keys` that hold a record pointing at
    /// `target`, preserving their order.
    pub fn filter_keys_with(&self, keys: &[EntityId], target: EntityId) -> Vec<EntityId> {
        keys.iter()
            .copied()
            .filter(|key| self.exists_relation(*key, target))
            .collect()
    }

    /// Return every registered key, sorted.
    pub fn keys(&self) -> Vec<EntityId> {
        let mut keys: Vec<EntityId> = self.records.iter().map(|entry| *entry.key()).collect();
        keys.sort_unstable();
        keys
    }

    /// Return every `(key, record)` pair, sorted by key.
    pub fn entries(&self) -> Vec<(EntityId, Vec<R>)> {
        let mut entries: Vec<(EntityId, Vec<R>)> = self
            .records
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        entries.sort_unstable_by_key(|(key, _)| *key);
        entries
    }

    /// Return the number of registered keys.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Return `true` if no key is registered.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Return `true` if at least one key is registered.
    pub fn any(&self) -> bool {
        !self.records.is_empty()
    }

    /// Return the total number of records across all keys.
    pub fn relation_count(&self) -> usize {
        self.records
            .iter()
            .fold(0_usize, |total, entry| total.saturating_add(entry.len()))
    }

    // -----------------------------------------------------------------------
    // Copy / projection
    // -----------------------------------------------------------------------

    /// Add every key and record to `target`, keeping existing records there.
    pub fn copy_to(&self, target: &Self) {
        for (key, records) in self.entries() {
            target.add_key(key);
            for record in records {
                target.add(key, record);
            }
        }
    }

    /// Project the network into a dense matrix.
    ///
    /// Rows are indexed by `rows` (key ids), columns by `columns` (target
    /// ids), and each cell holds the record's value. Returns `Ok(None)` when
    /// either index is empty or the network holds no record.
    pub fn to_matrix(
        &self,
        rows: &VectorNetwork,
        columns: &VectorNetwork,
    ) -> Result<Option<Matrix>> {
        let cells: Vec<(EntityId, EntityId, f64)> = self
            .records
            .iter()
            .flat_map(|entry| {
                let key = *entry.key();
                entry
                    .iter()
                    .map(|record| (key, record.target(), record.value()))
                    .collect::<Vec<_>>()
            })
            .collect();
        matrix::project(R::NETWORK, rows, columns, cells)
    }
}

impl<R: Relation> Default for RelationNetwork<R> {
    fn default() -> Self {
        Self::new()
    }
}
