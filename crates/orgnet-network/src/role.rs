//! Agent x Role assignments scoped to groups.
//!
//! Unlike the keyed networks, role records are kept in insertion order: when
//! an agent plays the same role in several groups, the earliest assignment
//! wins tie-breaks. Records are unique on `(agent, group, role)`.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use orgnet_types::{AgentRole, EntityId, NetworkKind};

use crate::error::Result;
use crate::matrix::{self, Matrix};
use crate::vector::VectorNetwork;

/// Ordered store of role assignments.
#[derive(Debug, Default)]
pub struct AgentRoleNetwork {
    records: RwLock<Vec<AgentRole>>,
}

impl Clone for AgentRoleNetwork {
    fn clone(&self) -> Self {
        Self {
            records: RwLock::new(self.records()),
        }
    }
}

impl AgentRoleNetwork {
    /// Create an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    // The guarded `Vec` is never left half-updated, so a poisoned lock is
    // still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, Vec<AgentRole>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<AgentRole>> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Append a role record. Returns `false` if the exact record exists.
    pub fn add(&self, record: AgentRole) -> bool {
        let mut records = self.write();
        if records.contains(&record) {
            return false;
        }
        records.push(record);
        true
    }

    /// Remove one exact record. Returns `true` if it was present.
    pub fn remove(&self, record: &AgentRole) -> bool {
        let mut records = self.write();
        let before = records.len();
        records.retain(|existing| existing != record);
        records.len() < before
    }

    /// Remove every record where `id` is the agent or the group.
    pub fn remove_agent(&self, id: EntityId) -> usize {
        self.remove_matching(|record| record.involves(id))
    }

    /// Remove the roles `agent` plays in `group`.
    pub fn remove_agent_from_group(&self, agent: EntityId, group: EntityId) -> usize {
        self.remove_matching(|record| record.agent == agent && record.group == group)
    }

    /// Remove every role scoped to `group`.
    pub fn remove_group(&self, group: EntityId) -> usize {
        self.remove_matching(|record| record.group == group)
    }

    /// Move the roles `agent` plays in `from` to `to`, keeping their order.
    ///
    /// A moved record that already exists in `to` is dropped. Returns the
    /// number of records moved.
    pub fn transfer(&self, agent: EntityId, from: EntityId, to: EntityId) -> usize {
        let mut records = self.write();
        let mut moved = 0_usize;
        let mut kept: Vec<AgentRole> = Vec::with_capacity(records.len());
        for record in records.drain(..) {
            if record.agent == agent && record.group == from {
                let retargeted = AgentRole::new(agent, to, record.role);
                moved = moved.saturating_add(1);
                if !kept.contains(&retargeted) {
                    kept.push(retargeted);
                }
            } else if !kept.contains(&record) {
                kept.push(record);
            }
        }
        *records = kept;
        moved
    }

    /// Remove every record.
    pub fn clear(&self) {
        self.write().clear();
    }

    fn remove_matching(&self, predicate: impl Fn(&AgentRole) -> bool) -> usize {
        let mut records = self.write();
        let before = records.len();
        records.retain(|record| !predicate(record));
        before.saturating_sub(records.len())
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Return `true` if the exact record exists.
    pub fn exists(&self, record: &AgentRole) -> bool {
        self.read().contains(record)
    }

    /// Return `true` if `agent` plays any role in `group`.
    pub fn has_role_in(&self, agent: EntityId, group: EntityId) -> bool {
        self.read()
            .iter()
            .any(|record| record.agent == agent && record.group == group)
    }

    /// Return the records of `agent`, in insertion order.
    pub fn roles_of(&self, agent: EntityId) -> Vec<AgentRole> {
        self.read()
            .iter()
            .filter(|record| record.agent == agent)
            .copied()
            .collect()
    }

    /// Return the roles `agent` plays in `group`, in insertion order.
    pub fn roles_in(&self, agent: EntityId, group: EntityId) -> Vec<EntityId> {
        self.read()
            .iter()
            .filter(|record| record.agent == agent && record.group == group)
            .map(|record| record.role)
            .collect()
    }

    /// Return the agents playing `role` in `group`, in insertion order.
    pub fn members_with_role(&self, group: EntityId, role: EntityId) -> Vec<EntityId> {
        self.read()
            .iter()
            .filter(|record| record.group == group && record.role == role)
            .map(|record| record.agent)
            .collect()
    }

    /// Return the group of the earliest assignment of `role` to `agent`.
    pub fn first_group_with_role(&self, agent: EntityId, role: EntityId) -> Option<EntityId> {
        self.read()
            .iter()
            .find(|record| record.agent == agent && record.role == role)
            .map(|record| record.group)
    }

    /// Return the distinct groups `agent` has a role in, in insertion order.
    pub fn groups_of(&self, agent: EntityId) -> Vec<EntityId> {
        let mut groups: Vec<EntityId> = Vec::new();
        for record in self.read().iter().filter(|record| record.agent == agent) {
            if !groups.contains(&record.group) {
                groups.push(record.group);
            }
        }
        groups
    }

    /// Return a copy of every record, in insertion order.
    pub fn records(&self) -> Vec<AgentRole> {
        self.read().clone()
    }

    /// Return the number of records.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Return `true` if there is no record.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Return `true` if there is at least one record.
    pub fn any(&self) -> bool {
        !self.is_empty()
    }

    // -----------------------------------------------------------------------
    // Copy / projection
    // -----------------------------------------------------------------------

    /// Append every record to `target`, skipping records it already holds.
    pub fn copy_to(&self, target: &Self) {
        for record in self.records() {
            target.add(record);
        }
    }

    /// Project into a binary agent x role matrix.
    ///
    /// An agent playing the same role in several groups fills one cell.
    pub fn to_matrix(
        &self,
        agents: &VectorNetwork,
        roles: &VectorNetwork,
    ) -> Result<Option<Matrix>> {
        let cells: Vec<(EntityId, EntityId, f64)> = self
            .read()
            .iter()
            .map(|record| (record.agent, record.role, 1.0))
            .collect();
        matrix::project(NetworkKind::AgentRole, agents, roles, cells)
    }
}
