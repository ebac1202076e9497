//! The meta-network aggregate.
//!
//! [`MetaNetwork`] owns one [`EntityRepository`] per entity kind and one store
//! per relation network. Single-store reads and writes go straight through
//! the accessors; every store is safe to share between threads on its own.
//! Operations that must keep several stores consistent (group membership,
//! agent removal, copying, projection) are methods on the aggregate and run
//! behind an aggregate-wide gate:
//!
//! - writers (`add_agent_to_group`, `remove_agent_from_group`,
//!   `transfer_agent`, `remove_agent`, `clear`, `copy_to`) hold it
//!   exclusively;
//! - snapshots (`to_matrix`, `clone`, membership queries) hold it shared.
//!
//! A projection therefore never observes a cascade half-way through.
//!
//! Groups are agents: a group is any id used as a key of the Agent-Group
//! network, and may also hold its own resources in the Agent-Resource
//! network. Members inherit those resources, scoped to the group, for as
//! long as they stay in it.

use std::ptr;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, warn};

use orgnet_types::{
    Agent, AgentGroup, Belief, Entity, EntityId, Event, Knowledge, NetworkKind, Resource, Role,
    Task,
};

use crate::config::NetworkConfig;
use crate::error::{NetworkError, Result, Scope};
use crate::interaction::InteractionNetwork;
use crate::relation::{
    AgentBeliefNetwork, AgentGroupNetwork, AgentKnowledgeNetwork, AgentResourceNetwork,
    AgentTaskNetwork, ResourceTaskNetwork, TaskKnowledgeNetwork,
};
use crate::repository::EntityRepository;
use crate::role::AgentRoleNetwork;
use crate::snapshot::MatrixMetaNetwork;
use crate::vector::VectorNetwork;

/// The aggregate root owning every repository and relation network.
#[derive(Debug)]
pub struct MetaNetwork {
    config: NetworkConfig,
    gate: RwLock<()>,

    agents: EntityRepository<Agent>,
    knowledge: EntityRepository<Knowledge>,
    beliefs: EntityRepository<Belief>,
    resources: EntityRepository<Resource>,
    roles: EntityRepository<Role>,
    tasks: EntityRepository<Task>,
    events: EntityRepository<Event>,

    interactions: InteractionNetwork,
    agent_group: AgentGroupNetwork,
    agent_roles: AgentRoleNetwork,
    agent_resources: AgentResourceNetwork,
    agent_knowledge: AgentKnowledgeNetwork,
    agent_beliefs: AgentBeliefNetwork,
    agent_tasks: AgentTaskNetwork,
    resource_tasks: ResourceTaskNetwork,
    task_knowledge: TaskKnowledgeNetwork,
}

impl MetaNetwork {
    /// Create an empty meta-network with the default configuration.
    pub fn new() -> Self {
        Self::with_config(NetworkConfig::default())
    }

    /// Create an empty meta-network with the given configuration.
    ///
    /// The configuration is taken as is; use [`NetworkConfig::validate`] on
    /// values built in code.
    pub fn with_config(config: NetworkConfig) -> Self {
        Self {
            interactions: InteractionNetwork::with_tolerance(config.passive_tolerance),
            config,
            gate: RwLock::new(()),
            agents: EntityRepository::new(),
            knowledge: EntityRepository::new(),
            beliefs: EntityRepository::new(),
            resources: EntityRepository::new(),
            roles: EntityRepository::new(),
            tasks: EntityRepository::new(),
            events: EntityRepository::new(),
            agent_group: AgentGroupNetwork::new(),
            agent_roles: AgentRoleNetwork::new(),
            agent_resources: AgentResourceNetwork::new(),
            agent_knowledge: AgentKnowledgeNetwork::new(),
            agent_beliefs: AgentBeliefNetwork::new(),
            agent_tasks: AgentTaskNetwork::new(),
            resource_tasks: ResourceTaskNetwork::new(),
            task_knowledge: TaskKnowledgeNetwork::new(),
        }
    }

    // The gate guards no data of its own, so a poisoned gate is still usable.
    fn read_gate(&self) -> RwLockReadGuard<'_, ()> {
        self.gate.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_gate(&self) -> RwLockWriteGuard<'_, ()> {
        self.gate.write().unwrap_or_else(PoisonError::into_inner)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The configuration this meta-network was built with.
    pub const fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// The agent repository.
    pub const fn agents(&self) -> &EntityRepository<Agent> {
        &self.agents
    }

    /// The knowledge repository.
    pub const fn knowledge(&self) -> &EntityRepository<Knowledge> {
        &self.knowledge
    }

    /// The belief repository.
    pub const fn beliefs(&self) -> &EntityRepository<Belief> {
        &self.beliefs
    }

    /// The resource repository.
    pub const fn resources(&self) -> &EntityRepository<Resource> {
        &self.resources
    }

    /// The role repository.
    pub const fn roles(&self) -> &EntityRepository<Role> {
        &self.roles
    }

    /// The task repository.
    pub const fn tasks(&self) -> &EntityRepository<Task> {
        &self.tasks
    }

    /// The event repository.
    pub const fn events(&self) -> &EntityRepository<Event> {
        &self.events
    }

    /// The Agent x Agent interaction network.
    pub const fn interactions(&self) -> &InteractionNetwork {
        &self.interactions
    }

    /// The Group x Agent membership network.
    ///
    /// Prefer [`add_agent_to_group`](Self::add_agent_to_group) and
    /// [`remove_agent_from_group`](Self::remove_agent_from_group) over
    /// mutating it directly: they keep roles, resources and interactions in
    /// step with memberships.
    pub const fn agent_group(&self) -> &AgentGroupNetwork {
        &self.agent_group
    }

    /// The Agent x Role network.
    pub const fn agent_roles(&self) -> &AgentRoleNetwork {
        &self.agent_roles
    }

    /// The Agent x Resource network.
    pub const fn agent_resources(&self) -> &AgentResourceNetwork {
        &self.agent_resources
    }

    /// The Agent x Knowledge network.
    pub const fn agent_knowledge(&self) -> &AgentKnowledgeNetwork {
        &self.agent_knowledge
    }

    /// The Agent x Belief network.
    pub const fn agent_beliefs(&self) -> &AgentBeliefNetwork {
        &self.agent_beliefs
    }

    /// The Agent x Task network.
    pub const fn agent_tasks(&self) -> &AgentTaskNetwork {
        &self.agent_tasks
    }

    /// The Resource x Task network.
    pub const fn resource_tasks(&self) -> &ResourceTaskNetwork {
        &self.resource_tasks
    }

    /// The Task x Knowledge network.
    pub const fn task_knowledge(&self) -> &TaskKnowledgeNetwork {
        &self.task_knowledge
    }

    // -----------------------------------------------------------------------
    // Group membership
    // -----------------------------------------------------------------------

    /// Add an agent to a group.
    ///
    /// Registers `group` in the Agent-Group network if new, records the
    /// membership, and hands the member every resource the group holds,
    /// scoped to the group. Role assignment is left to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::InvalidArgument`] if the agent is the group
    /// itself or the allocation is negative or not finite.
    pub fn add_agent_to_group(&self, membership: AgentGroup, group: EntityId) -> Result<()> {
        validate_membership(&membership, group)?;
        let _gate = self.write_gate();
        self.join(membership, group);
        Ok(())
    }

    /// Remove an agent from a group.
    ///
    /// A no-op if the group is unknown. Otherwise decays the agent's
    /// interactions with its same-class co-members, then drops the
    /// membership, the roles the agent plays in the group and the resources
    /// it inherited from it.
    ///
    /// Returns `true` if the agent was a member.
    pub fn remove_agent_from_group(&self, agent: EntityId, group: EntityId) -> bool {
        let _gate = self.write_gate();
        if !self.agent_group.exists(group) {
            return false;
        }
        let was_member = self.agent_group.exists_relation(group, agent);
        if was_member {
            self.decay_with_peers(agent, group);
            self.agent_group.remove_relation(group, agent);
        }
        let roles = self.agent_roles.remove_agent_from_group(agent, group);
        let resources = self
            .agent_resources
            .remove_where(agent, |record| record.is_scoped_to(group))
            .len();
        let restored = self.inherit_from_groups(agent);
        debug!(%agent, %group, was_member, roles, resources, restored, "Agent left group");
        was_member
    }

    /// Move an agent from one group to another.
    ///
    /// Interactions with the old co-members decay as on
    /// [`remove_agent_from_group`](Self::remove_agent_from_group). The
    /// membership record moves with its allocation, roles are re-scoped to
    /// the new group, and inherited resources are swapped for the new
    /// group's. Moving to the same group is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::InvalidArgument`] if `to` is the agent itself,
    /// or [`NetworkError::NotFound`] if the agent is not a member of `from`.
    pub fn transfer_agent(&self, agent: EntityId, from: EntityId, to: EntityId) -> Result<()> {
        if from == to {
            return Ok(());
        }
        if agent == to {
            return Err(NetworkError::InvalidArgument {
                reason: format!("agent {agent} cannot join itself as a group"),
            });
        }

        let _gate = self.write_gate();
        let Some(membership) = self.agent_group.relation(from, agent) else {
            return Err(NetworkError::NotFound {
                scope: Scope::Network(NetworkKind::AgentGroup),
                id: agent,
            });
        };

        self.decay_with_peers(agent, from);
        self.agent_group.remove_relation(from, agent);
        let roles = self.agent_roles.transfer(agent, from, to);
        self.agent_resources
            .remove_where(agent, |record| record.is_scoped_to(from));
        self.join(membership, to);
        self.inherit_from_groups(agent);
        debug!(%agent, %from, %to, roles, "Agent transferred between groups");
        Ok(())
    }

    /// Return the groups `agent` is a member of, sorted.
    pub fn groups_of(&self, agent: EntityId) -> Vec<EntityId> {
        let _gate = self.read_gate();
        self.agent_group.keys_with(agent)
    }

    /// Return the members of `group`, in joining order.
    pub fn members_of(&self, group: EntityId) -> Vec<EntityId> {
        let _gate = self.read_gate();
        self.agent_group.targets(group)
    }

    /// Return the members of `group` sharing the class of `agent`, excluding
    /// `agent` itself.
    pub fn co_members(&self, agent: EntityId, group: EntityId) -> Vec<EntityId> {
        let _gate = self.read_gate();
        self.peers_in(agent, group)
    }

    fn join(&self, membership: AgentGroup, group: EntityId) {
        let agent = membership.agent;
        self.agent_group.add_key(group);
        if !self.agent_group.add(group, membership) {
            debug!(%agent, %group, "Agent already a member of group");
        }

        let inherited = self.inherit_from(agent, group);
        let linked = if self.config.link_members_on_join {
            self.interactions
                .link_to_all(agent, &self.peers_in(agent, group))
        } else {
            0
        };
        debug!(%agent, %group, inherited, linked, "Agent joined group");
    }

    // Only the group's own resources pass down, not those it inherited.
    fn inherit_from(&self, agent: EntityId, group: EntityId) -> usize {
        let mut inherited = 0_usize;
        for record in self.agent_resources.get(group).unwrap_or_default() {
            if record.group.is_none() && self.agent_resources.add(agent, record.scoped_to(group)) {
                inherited = inherited.saturating_add(1);
            }
        }
        inherited
    }

    // A resource held through two groups is stored once, scoped to the first.
    // Dropping that scope must hand it back through the groups still held.
    fn inherit_from_groups(&self, agent: EntityId) -> usize {
        self.agent_group
            .keys_with(agent)
            .into_iter()
            .fold(0_usize, |total, group| {
                total.saturating_add(self.inherit_from(agent, group))
            })
    }

    fn peers_in(&self, agent: EntityId, group: EntityId) -> Vec<EntityId> {
        self.agent_group
            .targets(group)
            .into_iter()
            .filter(|member| *member != agent && member.same_class(&agent))
            .collect()
    }

    fn decay_with_peers(&self, agent: EntityId, group: EntityId) {
        let step = self.config.group_decay_step;
        for peer in self.peers_in(agent, group) {
            self.interactions.decrease(agent, peer, step);
        }
    }

    // -----------------------------------------------------------------------
    // Removal
    // -----------------------------------------------------------------------

    /// Remove an agent from every network, then from the agent repository.
    ///
    /// Covers interactions, memberships on both sides (the agent as member
    /// and as group), roles, resources (including those inherited from the
    /// agent as a group), knowledge, tasks and beliefs. Removing an unknown
    /// id still purges stray relations and succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::ConcurrentRemoval`] if the agent was registered
    /// when the call started but was gone by the final repository removal.
    pub fn remove_agent(&self, id: EntityId) -> Result<()> {
        let _gate = self.write_gate();
        let was_present = self.agents.exists(id);

        let links = self.interactions.remove_agent(id);
        let memberships = self.agent_group.remove_target(id);
        let members = self.agent_group.remove_key(id).map_or(0, |records| records.len());
        let roles = self.agent_roles.remove_agent(id);
        self.agent_resources.remove_key(id);
        for holder in self.agent_resources.keys() {
            let dropped = self
                .agent_resources
                .remove_where(holder, |record| record.is_scoped_to(id));
            if !dropped.is_empty() {
                self.inherit_from_groups(holder);
            }
        }
        self.agent_knowledge.remove_key(id);
        self.agent_tasks.remove_key(id);
        self.agent_beliefs.remove_key(id);

        self.finish_removal(id, was_present)?;
        debug!(%id, links, memberships, members, roles, "Removed agent");
        Ok(())
    }

    fn finish_removal(&self, id: EntityId, was_present: bool) -> Result<()> {
        if self.agents.remove(id).is_none() && was_present {
            warn!(%id, "Agent vanished from the repository during removal");
            return Err(NetworkError::ConcurrentRemoval(id));
        }
        Ok(())
    }

    /// Empty every repository and relation network.
    pub fn clear(&self) {
        let _gate = self.write_gate();
        self.clear_stores();
        debug!("Cleared meta-network");
    }

    fn clear_stores(&self) {
        self.agents.clear();
        self.knowledge.clear();
        self.beliefs.clear();
        self.resources.clear();
        self.roles.clear();
        self.tasks.clear();
        self.events.clear();
        self.interactions.clear();
        self.agent_group.clear();
        self.agent_roles.clear();
        self.agent_resources.clear();
        self.agent_knowledge.clear();
        self.agent_beliefs.clear();
        self.agent_tasks.clear();
        self.resource_tasks.clear();
        self.task_knowledge.clear();
    }

    // -----------------------------------------------------------------------
    // Copy / duplicate
    // -----------------------------------------------------------------------

    /// Replace the contents of `target` with a deep copy of this network.
    ///
    /// Entity identities are copied first, relation records second. The
    /// target keeps its own configuration. Copying a network onto itself is
    /// a no-op.
    pub fn copy_to(&self, target: &Self) {
        if ptr::eq(self, target) {
            return;
        }
        let snapshot = self.clone();
        let _gate = target.write_gate();
        target.clear_stores();

        snapshot.agents.copy_to(&target.agents);
        snapshot.knowledge.copy_to(&target.knowledge);
        snapshot.beliefs.copy_to(&target.beliefs);
        snapshot.resources.copy_to(&target.resources);
        snapshot.roles.copy_to(&target.roles);
        snapshot.tasks.copy_to(&target.tasks);
        snapshot.events.copy_to(&target.events);

        snapshot.interactions.copy_to(&target.interactions);
        snapshot.agent_group.copy_to(&target.agent_group);
        snapshot.agent_roles.copy_to(&target.agent_roles);
        snapshot.agent_resources.copy_to(&target.agent_resources);
        snapshot.agent_knowledge.copy_to(&target.agent_knowledge);
        snapshot.agent_beliefs.copy_to(&target.agent_beliefs);
        snapshot.agent_tasks.copy_to(&target.agent_tasks);
        snapshot.resource_tasks.copy_to(&target.resource_tasks);
        snapshot.task_knowledge.copy_to(&target.task_knowledge);
        debug!(agents = target.agents.len(), "Copied meta-network");
    }

    /// Copy an agent under a fresh identity into `target`.
    ///
    /// The copy keeps the agent's class and carries its knowledge, beliefs,
    /// tasks and own resources. Memberships, roles, interactions and
    /// resources inherited from groups stay with the original. `target` may
    /// be this network; otherwise the knowledge areas, beliefs, resources
    /// and tasks the records point at are registered in `target` first.
    /// Returns the new id.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::NotFound`] if `id` is not a registered agent.
    pub fn duplicate_agent(&self, id: EntityId, target: &Self) -> Result<EntityId> {
        let same = ptr::eq(self, target);
        let (agent, knowledge, beliefs, tasks, resources, referenced) = {
            let _gate = self.read_gate();
            let agent = self.agents.require(id)?;
            let knowledge = self.agent_knowledge.get(id).unwrap_or_default();
            let beliefs = self.agent_beliefs.get(id).unwrap_or_default();
            let tasks = self.agent_tasks.get(id).unwrap_or_default();
            let resources: Vec<_> = self
                .agent_resources
                .get(id)
                .unwrap_or_default()
                .into_iter()
                .filter(|record| record.group.is_none())
                .collect();
            let referenced = if same {
                Referenced::default()
            } else {
                Referenced {
                    knowledge: collect(&self.knowledge, knowledge.iter().map(|k| k.knowledge)),
                    beliefs: collect(&self.beliefs, beliefs.iter().map(|b| b.belief)),
                    tasks: collect(&self.tasks, tasks.iter().map(|t| t.task)),
                    resources: collect(&self.resources, resources.iter().map(|r| r.resource)),
                }
            };
            (agent, knowledge, beliefs, tasks, resources, referenced)
        };

        let copy = agent.duplicate();
        let new_id = copy.id();
        let _gate = target.write_gate();
        target.agents.add(copy);
        for entity in referenced.knowledge {
            target.knowledge.add(entity);
        }
        for entity in referenced.beliefs {
            target.beliefs.add(entity);
        }
        for entity in referenced.tasks {
            target.tasks.add(entity);
        }
        for entity in referenced.resources {
            target.resources.add(entity);
        }
        for record in knowledge {
            target.agent_knowledge.add(new_id, record);
        }
        for record in beliefs {
            target.agent_beliefs.add(new_id, record);
        }
        for record in resources {
            target.agent_resources.add(new_id, record);
        }
        for record in tasks {
            target.agent_tasks.add(new_id, record);
        }
        debug!(%id, %new_id, "Duplicated agent");
        Ok(new_id)
    }

    // -----------------------------------------------------------------------
    // Projection
    // -----------------------------------------------------------------------

    /// Project every relation network into a matrix snapshot.
    ///
    /// Indices are rebuilt from the current repository contents on each
    /// call. Agents come in id order, followed by any group that is not a
    /// registered agent, so group-held resources have a row.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::Inconsistent`] if a relation references an id
    /// that is not registered in the repository of its kind.
    pub fn to_matrix(&self) -> Result<MatrixMetaNetwork> {
        let _gate = self.read_gate();

        let groups = VectorNetwork::new(self.agent_group.keys());
        let agents = VectorNetwork::new(
            self.agents
                .ids()
                .into_iter()
                .chain(groups.ids().iter().copied()),
        );
        let knowledge = VectorNetwork::new(self.knowledge.ids());
        let beliefs = VectorNetwork::new(self.beliefs.ids());
        let resources = VectorNetwork::new(self.resources.ids());
        let roles = VectorNetwork::new(self.roles.ids());
        let tasks = VectorNetwork::new(self.tasks.ids());
        let events = VectorNetwork::new(self.events.ids());

        let interactions = self.interactions.to_matrix(&agents)?;
        let agent_group = self.agent_group.to_matrix(&groups, &agents)?;
        let agent_role = self.agent_roles.to_matrix(&agents, &roles)?;
        let agent_resource = self.agent_resources.to_matrix(&agents, &resources)?;
        let agent_knowledge = self.agent_knowledge.to_matrix(&agents, &knowledge)?;
        let agent_belief = self.agent_beliefs.to_matrix(&agents, &beliefs)?;
        let agent_task = self.agent_tasks.to_matrix(&agents, &tasks)?;
        let resource_task = self.resource_tasks.to_matrix(&resources, &tasks)?;
        let task_knowledge = self.task_knowledge.to_matrix(&tasks, &knowledge)?;

        debug!(
            agents = agents.len(),
            groups = groups.len(),
            knowledge = knowledge.len(),
            beliefs = beliefs.len(),
            resources = resources.len(),
            roles = roles.len(),
            tasks = tasks.len(),
            "Projected meta-network"
        );

        Ok(MatrixMetaNetwork {
            agents,
            groups,
            knowledge,
            beliefs,
            resources,
            roles,
            tasks,
            events,
            interactions,
            agent_group,
            agent_role,
            agent_resource,
            agent_knowledge,
            agent_belief,
            agent_task,
            resource_task,
            task_knowledge,
        })
    }
}

impl Default for MetaNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MetaNetwork {
    /// Deep-copy every store under a shared gate.
    fn clone(&self) -> Self {
        let _gate = self.read_gate();
        Self {
            config: self.config.clone(),
            gate: RwLock::new(()),
            agents: self.agents.clone(),
            knowledge: self.knowledge.clone(),
            beliefs: self.beliefs.clone(),
            resources: self.resources.clone(),
            roles: self.roles.clone(),
            tasks: self.tasks.clone(),
            events: self.events.clone(),
            interactions: self.interactions.clone(),
            agent_group: self.agent_group.clone(),
            agent_roles: self.agent_roles.clone(),
            agent_resources: self.agent_resources.clone(),
            agent_knowledge: self.agent_knowledge.clone(),
            agent_beliefs: self.agent_beliefs.clone(),
            agent_tasks: self.agent_tasks.clone(),
            resource_tasks: self.resource_tasks.clone(),
            task_knowledge: self.task_knowledge.clone(),
        }
    }
}

/// Entities a duplicated agent's records point at.
#[derive(Default)]
struct Referenced {
    knowledge: Vec<Knowledge>,
    beliefs: Vec<Belief>,
    tasks: Vec<Task>,
    resources: Vec<Resource>,
}

fn collect<T: Entity>(
    repository: &EntityRepository<T>,
    ids: impl Iterator<Item = EntityId>,
) -> Vec<T> {
    ids.filter_map(|id| repository.get(id)).collect()
}

fn validate_membership(membership: &AgentGroup, group: EntityId) -> Result<()> {
    if membership.agent == group {
        return Err(NetworkError::InvalidArgument {
            reason: format!("agent {group} cannot join itself as a group"),
        });
    }
    if !membership.allocation.is_finite() || membership.allocation < 0.0 {
        return Err(NetworkError::InvalidArgument {
            reason: format!(
                "membership allocation must be finite and non-negative, got {}",
                membership.allocation
            ),
        });
    }
    Ok(())
}
