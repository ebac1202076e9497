//! One-mode entity types stored in the meta-network repositories.
//!
//! Every entity carries its own [`EntityId`]. Entities hold no reference to
//! the meta-network that stores them: operations with cross-network effects
//! (removal, duplication) take the owning aggregate as an explicit argument.

use serde::{Deserialize, Serialize};

use crate::enums::EntityKind;
use crate::ids::{ClassId, EntityId};

/// Behaviour shared by every one-mode entity.
pub trait Entity: Clone + Send + Sync + 'static {
    /// The repository kind this entity lives in.
    const KIND: EntityKind;

    /// Return the entity's identifier.
    fn id(&self) -> EntityId;

    /// Return a copy of this entity carrying a different identifier.
    #[must_use]
    fn with_id(&self, id: EntityId) -> Self;

    /// Return a copy of this entity with a fresh identity in the same class.
    #[must_use]
    fn duplicate(&self) -> Self {
        self.with_id(EntityId::new(self.id().class))
    }
}

/// Implements [`Entity`] for a struct with an `id: EntityId` field.
macro_rules! impl_entity {
    ($name:ident, $kind:expr) => {
        impl Entity for $name {
            const KIND: EntityKind = $kind;

            fn id(&self) -> EntityId {
                self.id
            }

            fn with_id(&self, id: EntityId) -> Self {
                Self {
                    id,
                    ..self.clone()
                }
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Agent
// ---------------------------------------------------------------------------

/// An actor in the organization: a person, a team, or the organization
/// itself. Groups are agents whose class marks them as groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    /// Unique agent identifier.
    pub id: EntityId,
    /// Display name.
    pub name: String,
}

impl Agent {
    /// Create a new agent with a fresh identifier in `class`.
    pub fn new(class: ClassId, name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(class),
            name: name.into(),
        }
    }
}

impl_entity!(Agent, EntityKind::Agent);

// ---------------------------------------------------------------------------
// Knowledge / Belief
// ---------------------------------------------------------------------------

/// A knowledge area, split into `length` knowledge bits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Knowledge {
    /// Unique knowledge identifier.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Number of knowledge bits the area is divided into.
    pub length: u8,
}

impl Knowledge {
    /// Create a new knowledge area with a fresh identifier in `class`.
    pub fn new(class: ClassId, name: impl Into<String>, length: u8) -> Self {
        Self {
            id: EntityId::new(class),
            name: name.into(),
            length,
        }
    }
}

impl_entity!(Knowledge, EntityKind::Knowledge);

/// A belief, split into `length` belief bits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Belief {
    /// Unique belief identifier.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Number of belief bits.
    pub length: u8,
}

impl Belief {
    /// Create a new belief with a fresh identifier in `class`.
    pub fn new(class: ClassId, name: impl Into<String>, length: u8) -> Self {
        Self {
            id: EntityId::new(class),
            name: name.into(),
            length,
        }
    }
}

impl_entity!(Belief, EntityKind::Belief);

// ---------------------------------------------------------------------------
// Resource / Role
// ---------------------------------------------------------------------------

/// A resource: a tool, a database, a budget line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Unique resource identifier.
    pub id: EntityId,
    /// Display name.
    pub name: String,
}

impl Resource {
    /// Create a new resource with a fresh identifier in `class`.
    pub fn new(class: ClassId, name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(class),
            name: name.into(),
        }
    }
}

impl_entity!(Resource, EntityKind::Resource);

/// A role an agent can play inside a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Unique role identifier.
    pub id: EntityId,
    /// Display name.
    pub name: String,
}

impl Role {
    /// Create a new role with a fresh identifier in `class`.
    pub fn new(class: ClassId, name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(class),
            name: name.into(),
        }
    }
}

impl_entity!(Role, EntityKind::Role);

// ---------------------------------------------------------------------------
// Task / Event
// ---------------------------------------------------------------------------

/// A unit of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Relative effort of the task.
    pub weight: f64,
}

impl Task {
    /// Create a new task with a fresh identifier in `class`.
    pub fn new(class: ClassId, name: impl Into<String>, weight: f64) -> Self {
        Self {
            id: EntityId::new(class),
            name: name.into(),
            weight,
        }
    }
}

impl_entity!(Task, EntityKind::Task);

/// Something that happens to the organization at a given step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Unique event identifier.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// The step at which the event fires.
    pub step: u64,
}

impl Event {
    /// Create a new event with a fresh identifier in `class`.
    pub fn new(class: ClassId, name: impl Into<String>, step: u64) -> Self {
        Self {
            id: EntityId::new(class),
            name: name.into(),
            step,
        }
    }
}

impl_entity!(Event, EntityKind::Event);
