//! Identifier types for meta-network entities.
//!
//! An [`EntityId`] pairs a [`ClassId`] with a per-instance [`Uuid`]. The class
//! distinguishes *kinds of actor* (a person, a team, a manager) or *kinds of
//! thing* (a knowledge area, a tool), while the instance part makes every
//! entity unique. Ids are totally ordered by `(class, instance)`; symmetric
//! relations use that order to pick a canonical edge direction.
//!
//! Instance ids use UUID v7 (time-ordered) so freshly created ids sort in
//! creation order within a class.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of an entity class.
///
/// Classes are opaque small integers chosen by the caller. Two agents share a
/// class when they play the same kind of part in the organization; group
/// co-member bookkeeping only applies between agents of the same class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClassId(pub u16);

impl ClassId {
    /// Create a class identifier from its raw value.
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Return the raw class value.
    pub const fn into_inner(self) -> u16 {
        self.0
    }
}

impl core::fmt::Display for ClassId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for ClassId {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

/// Unique identifier for any entity in the meta-network.
///
/// Field order matters: the derived [`Ord`] compares `class` first, then
/// `instance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId {
    /// The entity's class.
    pub class: ClassId,
    /// The per-instance identifier.
    pub instance: Uuid,
}

impl EntityId {
    /// Create a new identifier in the given class using UUID v7.
    pub fn new(class: ClassId) -> Self {
        Self {
            class,
            instance: Uuid::now_v7(),
        }
    }

    /// Build an identifier from an existing instance UUID.
    pub const fn from_parts(class: ClassId, instance: Uuid) -> Self {
        Self { class, instance }
    }

    /// Return `true` if both identifiers belong to the same class.
    pub fn same_class(&self, other: &Self) -> bool {
        self.class == other.class
    }
}

impl core::fmt::Display for EntityId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}:{}", self.class, self.instance)
    }
}
