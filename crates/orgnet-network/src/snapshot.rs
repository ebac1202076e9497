//! Matrix snapshot of a whole meta-network.
//!
//! A [`MatrixMetaNetwork`] is produced by
//! [`MetaNetwork::to_matrix`](crate::MetaNetwork::to_matrix). It holds one
//! [`VectorNetwork`] per entity kind and one optional [`Matrix`] per relation
//! network, each matrix indexed by the vectors of its endpoint kinds. A
//! network with nothing to project carries `None`, never a 0 x 0 matrix.

use serde::Serialize;

use orgnet_types::NetworkKind;

use crate::matrix::Matrix;
use crate::vector::VectorNetwork;

/// Read-only matrices for every relation network, plus their indices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixMetaNetwork {
    /// Agent index. Groups not registered as agents are appended after the
    /// registered agents.
    pub agents: VectorNetwork,
    /// Group index: every key of the Agent-Group network.
    pub groups: VectorNetwork,
    /// Knowledge index.
    pub knowledge: VectorNetwork,
    /// Belief index.
    pub beliefs: VectorNetwork,
    /// Resource index.
    pub resources: VectorNetwork,
    /// Role index.
    pub roles: VectorNetwork,
    /// Task index.
    pub tasks: VectorNetwork,
    /// Event index.
    pub events: VectorNetwork,

    /// Agent x Agent interaction weights (symmetric).
    pub interactions: Option<Matrix>,
    /// Group x Agent membership allocations.
    pub agent_group: Option<Matrix>,
    /// Agent x Role, binary.
    pub agent_role: Option<Matrix>,
    /// Agent x Resource allocations.
    pub agent_resource: Option<Matrix>,
    /// Agent x Knowledge expertise.
    pub agent_knowledge: Option<Matrix>,
    /// Agent x Belief conviction.
    pub agent_belief: Option<Matrix>,
    /// Agent x Task allocations.
    pub agent_task: Option<Matrix>,
    /// Resource x Task weights.
    pub resource_task: Option<Matrix>,
    /// Task x Knowledge required levels.
    pub task_knowledge: Option<Matrix>,
}

impl MatrixMetaNetwork {
    /// Return the matrix of one network, if it projected to anything.
    pub const fn matrix(&self, network: NetworkKind) -> Option<&Matrix> {
        match network {
            NetworkKind::Interaction => self.interactions.as_ref(),
            NetworkKind::AgentGroup => self.agent_group.as_ref(),
            NetworkKind::AgentRole => self.agent_role.as_ref(),
            NetworkKind::AgentResource => self.agent_resource.as_ref(),
            NetworkKind::AgentKnowledge => self.agent_knowledge.as_ref(),
            NetworkKind::AgentBelief => self.agent_belief.as_ref(),
            NetworkKind::AgentTask => self.agent_task.as_ref(),
            NetworkKind::ResourceTask => self.resource_task.as_ref(),
            NetworkKind::TaskKnowledge => self.task_knowledge.as_ref(),
        }
    }

    /// Return the row and column indices a network is projected through.
    pub const fn indices(&self, network: NetworkKind) -> (&VectorNetwork, &VectorNetwork) {
        match network {
            NetworkKind::Interaction => (&self.agents, &self.agents),
            NetworkKind::AgentGroup => (&self.groups, &self.agents),
            NetworkKind::AgentRole => (&self.agents, &self.roles),
            NetworkKind::AgentResource => (&self.agents, &self.resources),
            NetworkKind::AgentKnowledge => (&self.agents, &self.knowledge),
            NetworkKind::AgentBelief => (&self.agents, &self.beliefs),
            NetworkKind::AgentTask => (&self.agents, &self.tasks),
            NetworkKind::ResourceTask => (&self.resources, &self.tasks),
            NetworkKind::TaskKnowledge => (&self.tasks, &self.knowledge),
        }
    }

    /// Return the networks that projected to a matrix.
    pub fn projected(&self) -> Vec<NetworkKind> {
        NetworkKind::ALL
            .into_iter()
            .filter(|network| self.matrix(*network).is_some())
            .collect()
    }
}
