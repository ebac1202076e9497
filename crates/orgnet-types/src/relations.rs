//! Relation records stored in the two-mode networks.
//!
//! A keyed network maps one [`EntityId`] (an agent, a group, a resource, a
//! task) to a collection of records. Each record names its *target* entity
//! and a numeric *value* used when the network is projected into a matrix.
//! Binary relations report a value of `1.0`.

use serde::{Deserialize, Serialize};

use crate::enums::{NetworkKind, ResourceUsage};
use crate::ids::EntityId;

/// Behaviour shared by every keyed relation record.
pub trait Relation: Clone + Send + Sync + 'static {
    /// The network this record belongs to.
    const NETWORK: NetworkKind;

    /// The entity the record points at. Unique within one key's collection.
    fn target(&self) -> EntityId;

    /// The numeric strength written into the projected matrix cell.
    fn value(&self) -> f64 {
        1.0
    }

    /// Overwrite the numeric strength.
    fn set_value(&mut self, value: f64);
}

// ---------------------------------------------------------------------------
// Agent x Knowledge / Agent x Belief
// ---------------------------------------------------------------------------

/// An agent's expertise in a knowledge area (0.0 to 1.0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentKnowledge {
    /// The knowledge area.
    pub knowledge: EntityId,
    /// Expertise level.
    pub expertise: f64,
}

impl AgentKnowledge {
    /// Create a new expertise record.
    pub const fn new(knowledge: EntityId, expertise: f64) -> Self {
        Self {
            knowledge,
            expertise,
        }
    }
}

impl Relation for AgentKnowledge {
    const NETWORK: NetworkKind = NetworkKind::AgentKnowledge;

    fn target(&self) -> EntityId {
        self.knowledge
    }

    fn value(&self) -> f64 {
        self.expertise
    }

    fn set_value(&mut self, value: f64) {
        self.expertise = value;
    }
}

/// An agent's conviction about a belief (-1.0 to 1.0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentBelief {
    /// The belief.
    pub belief: EntityId,
    /// Conviction level.
    pub conviction: f64,
}

impl AgentBelief {
    /// Create a new conviction record.
    pub const fn new(belief: EntityId, conviction: f64) -> Self {
        Self { belief, conviction }
    }
}

impl Relation for AgentBelief {
    const NETWORK: NetworkKind = NetworkKind::AgentBelief;

    fn target(&self) -> EntityId {
        self.belief
    }

    fn value(&self) -> f64 {
        self.conviction
    }

    fn set_value(&mut self, value: f64) {
        self.conviction = value;
    }
}

// ---------------------------------------------------------------------------
// Agent x Resource
// ---------------------------------------------------------------------------

/// An agent's association with a resource.
///
/// When `group` is set, the association was inherited from that group's own
/// resources and disappears when the agent leaves the group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResource {
    /// The resource.
    pub resource: EntityId,
    /// How the agent relates to the resource.
    pub usage: ResourceUsage,
    /// Share of the resource allocated to the agent (0.0 to 1.0).
    pub allocation: f64,
    /// The group the association is scoped to, if any.
    pub group: Option<EntityId>,
}

impl AgentResource {
    /// Create an unscoped association with full allocation.
    pub const fn new(resource: EntityId, usage: ResourceUsage) -> Self {
        Self {
            resource,
            usage,
            allocation: 1.0,
            group: None,
        }
    }

    /// Return the same association with a different allocation.
    #[must_use]
    pub const fn with_allocation(mut self, allocation: f64) -> Self {
        self.allocation = allocation;
        self
    }

    /// Return the same association scoped to `group`.
    #[must_use]
    pub const fn scoped_to(mut self, group: EntityId) -> Self {
        self.group = Some(group);
        self
    }

    /// Return `true` if the association is scoped to `group`.
    pub fn is_scoped_to(&self, group: EntityId) -> bool {
        self.group == Some(group)
    }
}

impl Relation for AgentResource {
    const NETWORK: NetworkKind = NetworkKind::AgentResource;

    fn target(&self) -> EntityId {
        self.resource
    }

    fn value(&self) -> f64 {
        self.allocation
    }

    fn set_value(&mut self, value: f64) {
        self.allocation = value;
    }
}

// ---------------------------------------------------------------------------
// Agent x Task
// ---------------------------------------------------------------------------

/// An agent's assignment to a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentTask {
    /// The task.
    pub task: EntityId,
    /// Share of the agent's capacity spent on the task (0.0 to 1.0).
    pub allocation: f64,
}

impl AgentTask {
    /// Create a new assignment.
    pub const fn new(task: EntityId, allocation: f64) -> Self {
        Self { task, allocation }
    }
}

impl Relation for AgentTask {
    const NETWORK: NetworkKind = NetworkKind::AgentTask;

    fn target(&self) -> EntityId {
        self.task
    }

    fn value(&self) -> f64 {
        self.allocation
    }

    fn set_value(&mut self, value: f64) {
        self.allocation = value;
    }
}

// ---------------------------------------------------------------------------
// Group x Agent
// ---------------------------------------------------------------------------

/// A membership record, stored under the group's key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentGroup {
    /// The member agent.
    pub agent: EntityId,
    /// Share of the agent's time spent in the group (0.0 to 1.0).
    pub allocation: f64,
}

impl AgentGroup {
    /// Create a membership with full allocation.
    pub const fn new(agent: EntityId) -> Self {
        Self {
            agent,
            allocation: 1.0,
        }
    }

    /// Return the same membership with a different allocation.
    #[must_use]
    pub const fn with_allocation(mut self, allocation: f64) -> Self {
        self.allocation = allocation;
        self
    }
}

impl Relation for AgentGroup {
    const NETWORK: NetworkKind = NetworkKind::AgentGroup;

    fn target(&self) -> EntityId {
        self.agent
    }

    fn value(&self) -> f64 {
        self.allocation
    }

    fn set_value(&mut self, value: f64) {
        self.allocation = value;
    }
}

// ---------------------------------------------------------------------------
// Resource x Task / Task x Knowledge
// ---------------------------------------------------------------------------

/// A resource used by a task. Binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceTask {
    /// The task using the resource.
    pub task: EntityId,
    /// Usage strength, `1.0` unless overwritten.
    pub weight: f64,
}

impl ResourceTask {
    /// Create a new usage record.
    pub const fn new(task: EntityId) -> Self {
        Self { task, weight: 1.0 }
    }
}

impl Relation for ResourceTask {
    const NETWORK: NetworkKind = NetworkKind::ResourceTask;

    fn target(&self) -> EntityId {
        self.task
    }

    fn value(&self) -> f64 {
        self.weight
    }

    fn set_value(&mut self, value: f64) {
        self.weight = value;
    }
}

/// A knowledge area required by a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskKnowledge {
    /// The required knowledge area.
    pub knowledge: EntityId,
    /// Minimum expertise required (0.0 to 1.0).
    pub level: f64,
}

impl TaskKnowledge {
    /// Create a new requirement.
    pub const fn new(knowledge: EntityId, level: f64) -> Self {
        Self { knowledge, level }
    }
}

impl Relation for TaskKnowledge {
    const NETWORK: NetworkKind = NetworkKind::TaskKnowledge;

    fn target(&self) -> EntityId {
        self.knowledge
    }

    fn value(&self) -> f64 {
        self.level
    }

    fn set_value(&mut self, value: f64) {
        self.level = value;
    }
}

// ---------------------------------------------------------------------------
// Agent x Role (ordered, not keyed)
// ---------------------------------------------------------------------------

/// An agent playing a role inside a group.
///
/// Role records are unique on the full `(agent, group, role)` triple: the same
/// agent may play the same role in several groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentRole {
    /// The agent playing the role.
    pub agent: EntityId,
    /// The group the role applies to.
    pub group: EntityId,
    /// The role.
    pub role: EntityId,
}

impl AgentRole {
    /// Create a new role record.
    pub const fn new(agent: EntityId, group: EntityId, role: EntityId) -> Self {
        Self { agent, group, role }
    }

    /// Return `true` if the record involves `id` as agent or group.
    pub fn involves(&self, id: EntityId) -> bool {
        self.agent == id || self.group == id
    }
}
