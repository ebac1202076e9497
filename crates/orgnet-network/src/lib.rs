//! In-memory meta-network store for organizational network analysis.
//!
//! This crate keeps the one-mode entity repositories and two-mode relation
//! networks of an organization consistent with each other, and projects them
//! into dense matrices for network metrics. It sits on top of `orgnet-types`
//! (which defines the identifiers, entities and relation records) and does no
//! I/O beyond optional configuration loading.
//!
//! # Modules
//!
//! - [`config`] -- Tunables for interaction decay and group joins ([`NetworkConfig`])
//! - [`error`] -- Error types for all network operations ([`NetworkError`])
//! - [`interaction`] -- Agent x Agent weighted symmetric links ([`InteractionNetwork`])
//! - [`matrix`] -- Dense row-major matrices ([`Matrix`])
//! - [`meta`] -- The aggregate root and its cross-network operations ([`MetaNetwork`])
//! - [`metrics`] -- Density, degree and centralization over a [`Matrix`]
//! - [`relation`] -- Generic keyed-to-collection relation store ([`RelationNetwork`])
//! - [`repository`] -- One-mode entity repositories ([`EntityRepository`])
//! - [`role`] -- Agent x Role assignments scoped to groups ([`AgentRoleNetwork`])
//! - [`snapshot`] -- Matrix snapshot of a whole meta-network ([`MatrixMetaNetwork`])
//! - [`vector`] -- Stable row/column indices ([`VectorNetwork`])
//!
//! # Concurrency
//!
//! Every store is `Send + Sync` and mutates through `&self`. Cross-network
//! operations on [`MetaNetwork`] are serialized by an aggregate-wide gate, so
//! a [`MetaNetwork::to_matrix`] snapshot never observes a removal cascade
//! half-way through.

pub mod config;
pub mod error;
pub mod interaction;
pub mod matrix;
pub mod meta;
pub mod metrics;
pub mod relation;
pub mod repository;
pub mod role;
pub mod snapshot;
pub mod vector;

// Re-export primary types at crate root for convenience.
pub use config::{ConfigError, NetworkConfig};
pub use error::{NetworkError, Result, Scope};
pub use interaction::{DEFAULT_PASSIVE_TOLERANCE, Interaction, InteractionNetwork};
pub use matrix::Matrix;
pub use meta::MetaNetwork;
pub use relation::{
    AgentBeliefNetwork, AgentGroupNetwork, AgentKnowledgeNetwork, AgentResourceNetwork,
    AgentTaskNetwork, RelationNetwork, ResourceTaskNetwork, TaskKnowledgeNetwork,
};
pub use repository::EntityRepository;
pub use role::AgentRoleNetwork;
pub use snapshot::MatrixMetaNetwork;
pub use vector::VectorNetwork;
