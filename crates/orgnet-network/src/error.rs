//! Error types for the orgnet-network crate.
//!
//! All operations that can fail return typed errors rather than panicking.
//! The variants separate caller mistakes (invalid arguments, lookups that
//! assume prior registration) from broken internal invariants (a matrix
//! projection that meets an id its index does not know, a removal that lost
//! a race with another writer).

use orgnet_types::{EntityId, EntityKind, NetworkKind};

/// Where a failing lookup happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// A one-mode entity repository.
    Repository(EntityKind),
    /// A two-mode relation network.
    Network(NetworkKind),
}

impl core::fmt::Display for Scope {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Repository(kind) => write!(f, "{kind} repository"),
            Self::Network(kind) => write!(f, "{kind} network"),
        }
    }
}

/// Errors that can occur during meta-network operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NetworkError {
    /// An argument failed validation. The operation had no effect.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// Description of what was wrong.
        reason: String,
    },

    /// A lookup that requires prior registration found nothing.
    #[error("{id} is not registered in the {scope}")]
    NotFound {
        /// Where the lookup happened.
        scope: Scope,
        /// The missing identifier.
        id: EntityId,
    },

    /// A matrix projection met an id missing from its index.
    ///
    /// The index was built from a different snapshot than the network being
    /// projected. This is a programming error, not a recoverable condition.
    #[error("inconsistent projection of the {network} network: {id} is missing from the index")]
    Inconsistent {
        /// The network being projected.
        network: NetworkKind,
        /// The identifier the index could not resolve.
        id: EntityId,
    },

    /// A removal expected to succeed found the entity already gone.
    #[error("concurrent removal of {0}: another writer removed it first")]
    ConcurrentRemoval(EntityId),
}

/// Convenience alias for results in this crate.
pub type Result<T> = core::result::Result<T, NetworkError>;
