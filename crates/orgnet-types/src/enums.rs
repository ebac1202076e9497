//! Enumeration types for the Orgnet meta-network.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Entity kinds (one-mode networks)
// ---------------------------------------------------------------------------

/// The kind of a one-mode entity repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Actors: people, teams, organizations. Groups are agents too.
    Agent,
    /// Knowledge areas agents can hold expertise in.
    Knowledge,
    /// Beliefs agents can hold convictions about.
    Belief,
    /// Resources agents and tasks use.
    Resource,
    /// Roles agents play inside groups.
    Role,
    /// Tasks agents work on.
    Task,
    /// Events that happen to the organization.
    Event,
}

impl EntityKind {
    /// Every entity kind, in repository order.
    pub const ALL: [Self; 7] = [
        Self::Agent,
        Self::Knowledge,
        Self::Belief,
        Self::Resource,
        Self::Role,
        Self::Task,
        Self::Event,
    ];

    /// Return a lowercase label used in logs and error messages.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Agent => "agent",
            Self::Knowledge => "knowledge",
            Self::Belief => "belief",
            Self::Resource => "resource",
            Self::Role => "role",
            Self::Task => "task",
            Self::Event => "event",
        }
    }
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Network kinds (two-mode networks)
// ---------------------------------------------------------------------------

/// The kind of a two-mode relation network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NetworkKind {
    /// Agent x Agent weighted symmetric interactions.
    Interaction,
    /// Group x Agent memberships.
    AgentGroup,
    /// Agent x Role assignments scoped to a group.
    AgentRole,
    /// Agent x Resource associations.
    AgentResource,
    /// Agent x Knowledge expertise.
    AgentKnowledge,
    /// Agent x Belief convictions.
    AgentBelief,
    /// Agent x Task assignments.
    AgentTask,
    /// Resource x Task usage.
    ResourceTask,
    /// Task x Knowledge requirements.
    TaskKnowledge,
}

impl NetworkKind {
    /// Every network kind, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Interaction,
        Self::AgentGroup,
        Self::AgentRole,
        Self::AgentResource,
        Self::AgentKnowledge,
        Self::AgentBelief,
        Self::AgentTask,
        Self::ResourceTask,
        Self::TaskKnowledge,
    ];

    /// Return a kebab-case label used in logs and error messages.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Interaction => "interaction",
            Self::AgentGroup => "agent-group",
            Self::AgentRole => "agent-role",
            Self::AgentResource => "agent-resource",
            Self::AgentKnowledge => "agent-knowledge",
            Self::AgentBelief => "agent-belief",
            Self::AgentTask => "agent-task",
            Self::ResourceTask => "resource-task",
            Self::TaskKnowledge => "task-knowledge",
        }
    }
}

impl core::fmt::Display for NetworkKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Resource usage
// ---------------------------------------------------------------------------

/// How an agent relates to a resource it is associated with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceUsage {
    /// The agent uses the resource.
    #[default]
    Use,
    /// The agent owns the resource.
    Own,
    /// The agent administers the resource on behalf of others.
    Manage,
}
