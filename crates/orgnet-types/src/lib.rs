//! Shared type definitions for the Orgnet meta-network.
//!
//! This crate is the single source of truth for the identifiers, entities,
//! and relation records stored by `orgnet-network`. It holds data only: no
//! collections, no locking, no cross-network logic.
//!
//! # Modules
//!
//! - [`ids`] -- [`ClassId`] and the composite [`EntityId`]
//! - [`enums`] -- Entity and network kinds, resource usage
//! - [`entities`] -- One-mode entities and the [`Entity`] trait
//! - [`relations`] -- Two-mode relation records and the [`Relation`] trait

pub mod entities;
pub mod enums;
pub mod ids;
pub mod relations;

// Re-export all public types at crate root for convenience.
pub use entities::{Agent, Belief, Entity, Event, Knowledge, Resource, Role, Task};
pub use enums::{EntityKind, NetworkKind, ResourceUsage};
pub use ids::{ClassId, EntityId};
pub use relations::{
    AgentBelief, AgentGroup, AgentKnowledge, AgentResource, AgentRole, AgentTask, Relation,
    ResourceTask, TaskKnowledge,
};
