//! Integration tests for the `orgnet-network` meta-network.
//!
//! These drive [`MetaNetwork`] only through its public surface: repository
//! and network accessors plus the cross-network operations. They cover
//! idempotent inserts, canonical interaction edges, cascading removal, group
//! departure, matrix shapes, deep copies and concurrent use from several
//! threads.

// Integration tests use expect/unwrap extensively for clarity -- panicking
// on failure is the correct behavior in test code.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::missing_panics_doc,
    clippy::too_many_lines
)]

use std::thread;

use orgnet_network::{Interaction, MetaNetwork, NetworkConfig, NetworkError, metrics};
use orgnet_types::{
    Agent, AgentBelief, AgentGroup, AgentKnowledge, AgentResource, AgentRole, AgentTask, ClassId,
    Entity, EntityId, Knowledge, NetworkKind, Resource, ResourceTask, ResourceUsage, Role, Task,
    TaskKnowledge,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

const PERSON: ClassId = ClassId::new(1);
const TEAM: ClassId = ClassId::new(2);
const RESOURCE: ClassId = ClassId::new(3);
const KNOWLEDGE: ClassId = ClassId::new(4);
const BELIEF: ClassId = ClassId::new(5);
const ROLE: ClassId = ClassId::new(6);
const TASK: ClassId = ClassId::new(7);

// =============================================================================
// Helpers
// =============================================================================

fn agent(network: &MetaNetwork, name: &str) -> EntityId {
    let agent = Agent::new(PERSON, name);
    let id = agent.id();
    network.agents().add(agent);
    id
}

fn group(network: &MetaNetwork, name: &str) -> EntityId {
    let group = Agent::new(TEAM, name);
    let id = group.id();
    network.agents().add(group);
    id
}

fn join(network: &MetaNetwork, member: EntityId, group: EntityId) {
    network
        .add_agent_to_group(AgentGroup::new(member), group)
        .expect("valid membership");
}

// =============================================================================
// Repository and edge properties
// =============================================================================

#[test]
fn repeated_add_keeps_one_entity() {
    let network = MetaNetwork::new();
    let ana = Agent::new(PERSON, "ana");
    let id = ana.id();

    assert!(network.agents().add(ana.clone()));
    assert!(!network.agents().add(ana));
    assert_eq!(network.agents().len(), 1);
    assert!(network.agents().exists(id));
}

#[test]
fn interaction_edges_are_canonical() {
    let a = EntityId::new(PERSON);
    let b = EntityId::new(PERSON);
    let forward = Interaction::new(a, b).unwrap();
    let backward = Interaction::new(b, a).unwrap();

    assert_eq!(forward, backward);
    assert_eq!(forward.source(), backward.source());
    assert_eq!(forward.target(), backward.target());
    assert!(forward.source() < forward.target());
    assert_eq!(forward.has_link(a, b), forward.has_link(b, a));

    let network = MetaNetwork::new();
    network.interactions().add_interaction(a, b).unwrap();
    network.interactions().add_interaction(b, a).unwrap();
    assert_eq!(network.interactions().len(), 1);
    assert_eq!(network.interactions().weight(a, b), Some(2.0));
}

#[test]
fn self_interaction_is_rejected() {
    let a = EntityId::new(PERSON);
    assert!(matches!(
        Interaction::new(a, a),
        Err(NetworkError::InvalidArgument { .. })
    ));
}

#[test]
fn weight_never_goes_negative() {
    let network = MetaNetwork::new();
    let (a, b) = (agent(&network, "a"), agent(&network, "b"));
    network.interactions().add_interaction(a, b).unwrap();

    for _ in 0..5 {
        network.interactions().decrease(a, b, 1.0);
    }
    let link = network.interactions().get(a, b).unwrap();
    assert!(link.weight() >= 0.0);
    assert!(!link.is_active());
    assert!(network.interactions().is_passive(a, b));
}

#[test]
fn required_lookup_distinguishes_absent_agent_from_absent_relation() {
    let network = MetaNetwork::new();
    let known = agent(&network, "known");
    let rust = EntityId::new(KNOWLEDGE);
    network.agent_knowledge().add_key(known);

    // Registered agent without the relation: empty, not an error.
    assert!(network.agent_knowledge().get(known).unwrap().is_empty());
    assert!(!network.agent_knowledge().exists_relation(known, rust));

    // Unregistered agent: precondition violated.
    let stranger = EntityId::new(PERSON);
    assert!(matches!(
        network.agent_beliefs().get(stranger),
        Err(NetworkError::NotFound { id, .. }) if id == stranger
    ));
}

// =============================================================================
// Cross-network operations
// =============================================================================

#[test]
fn remove_agent_cascades_through_every_network() {
    let network = MetaNetwork::new();
    let team = group(&network, "team");
    let ana = agent(&network, "ana");
    let bob = agent(&network, "bob");
    let (knowledge, belief, resource, role, task) = (
        EntityId::new(KNOWLEDGE),
        EntityId::new(BELIEF),
        EntityId::new(RESOURCE),
        EntityId::new(ROLE),
        EntityId::new(TASK),
    );

    join(&network, ana, team);
    join(&network, bob, team);
    network.interactions().add_interaction(ana, bob).unwrap();
    network.agent_roles().add(AgentRole::new(ana, team, role));
    network
        .agent_resources()
        .add(ana, AgentResource::new(resource, ResourceUsage::Own));
    network
        .agent_knowledge()
        .add(ana, AgentKnowledge::new(knowledge, 0.7));
    network.agent_tasks().add(ana, AgentTask::new(task, 0.5));
    network
        .agent_beliefs()
        .add(ana, AgentBelief::new(belief, -0.2));

    network.remove_agent(ana).unwrap();

    assert!(!network.agents().exists(ana));
    assert!(network.interactions().links_of(ana).is_empty());
    assert!(network.groups_of(ana).is_empty());
    assert!(network.agent_roles().roles_of(ana).is_empty());
    assert!(!network.agent_resources().exists(ana));
    assert!(!network.agent_knowledge().exists(ana));
    assert!(!network.agent_tasks().exists(ana));
    assert!(!network.agent_beliefs().exists(ana));

    // Bob is untouched.
    assert!(network.agents().exists(bob));
    assert_eq!(network.members_of(team), vec![bob]);
}

#[test]
fn leaving_a_group_decays_the_shared_tie() {
    let network = MetaNetwork::new();
    let team = group(&network, "team");
    let (a, b) = (agent(&network, "a"), agent(&network, "b"));
    let role = EntityId::new(ROLE);
    join(&network, a, team);
    join(&network, b, team);
    network.agent_roles().add(AgentRole::new(a, team, role));
    for _ in 0..3 {
        network.interactions().add_interaction(a, b).unwrap();
    }
    let before = network.interactions().weight(a, b).unwrap();

    assert!(network.remove_agent_from_group(a, team));

    let after = network.interactions().weight(a, b).unwrap();
    assert!(after < before);
    assert!(!network.agent_group().exists_relation(team, a));
    assert!(network.agent_roles().roles_in(a, team).is_empty());
}

#[test]
fn end_to_end_group_departure() {
    let network = MetaNetwork::new();
    let a1 = agent(&network, "a1");
    let a2 = agent(&network, "a2");
    let g = group(&network, "g");

    join(&network, a1, g);
    join(&network, a2, g);
    network.interactions().add_interaction(a1, a2).unwrap();
    assert_eq!(network.interactions().weight(a1, a2), Some(1.0));

    network.remove_agent_from_group(a1, g);

    assert!(!network.members_of(g).contains(&a1));
    assert_eq!(network.interactions().weight(a1, a2), Some(0.0));
    assert!(!network.interactions().get(a1, a2).unwrap().is_active());
    assert!(!network.interactions().has_active_interaction(a1, a2));
}

#[test]
fn group_scoped_resources_follow_membership() {
    let network = MetaNetwork::new();
    let team = group(&network, "team");
    let ana = agent(&network, "ana");
    let server = Resource::new(RESOURCE, "server");
    let server_id = server.id();
    network.resources().add(server);
    network
        .agent_resources()
        .add(team, AgentResource::new(server_id, ResourceUsage::Manage));

    join(&network, ana, team);
    let inherited = network.agent_resources().relation(ana, server_id).unwrap();
    assert_eq!(inherited.usage, ResourceUsage::Manage);
    assert!(inherited.is_scoped_to(team));

    network.remove_agent_from_group(ana, team);
    assert!(!network.agent_resources().exists_relation(ana, server_id));
}

// =============================================================================
// Projection
// =============================================================================

#[test]
fn matrix_shapes_follow_indices() {
    let mut rng = SmallRng::seed_from_u64(0x5eed);
    let network = MetaNetwork::new();

    let mut agents: Vec<Agent> = (0..7).map(|i| Agent::new(PERSON, format!("a{i}"))).collect();
    let mut areas: Vec<Knowledge> = (0..4)
        .map(|i| Knowledge::new(KNOWLEDGE, format!("k{i}"), 10))
        .collect();
    agents.shuffle(&mut rng);
    areas.shuffle(&mut rng);
    for entity in &agents {
        network.agents().add(entity.clone());
    }
    for entity in &areas {
        network.knowledge().add(entity.clone());
    }

    // Sparse relations: only two agents know anything.
    let knower = agents[2].id();
    let other = agents[5].id();
    network
        .agent_knowledge()
        .add(knower, AgentKnowledge::new(areas[0].id(), 0.4));
    network
        .agent_knowledge()
        .add(other, AgentKnowledge::new(areas[3].id(), 0.9));
    network.interactions().add_interaction(knower, other).unwrap();

    let snapshot = network.to_matrix().unwrap();
    for kind in snapshot.projected() {
        let (rows, columns) = snapshot.indices(kind);
        let matrix = snapshot.matrix(kind).unwrap();
        assert_eq!(matrix.rows(), rows.len(), "{kind} rows");
        assert_eq!(matrix.columns(), columns.len(), "{kind} columns");
    }

    let knowledge = snapshot.matrix(NetworkKind::AgentKnowledge).unwrap();
    assert_eq!((knowledge.rows(), knowledge.columns()), (7, 4));
    let row = snapshot.agents.index_of(other).unwrap();
    let column = snapshot.knowledge.index_of(areas[3].id()).unwrap();
    assert_eq!(knowledge.get(row, column), Some(0.9));

    let interactions = snapshot.matrix(NetworkKind::Interaction).unwrap();
    assert!(interactions.is_square());
    let (r, c) = (
        snapshot.agents.index_of(knower).unwrap(),
        snapshot.agents.index_of(other).unwrap(),
    );
    assert_eq!(interactions.get(r, c), interactions.get(c, r));

    // Networks with no records project to nothing.
    assert!(snapshot.matrix(NetworkKind::AgentTask).is_none());
    assert!(snapshot.matrix(NetworkKind::ResourceTask).is_none());
}

#[test]
fn task_networks_project_through_their_own_indices() {
    let network = MetaNetwork::new();
    let build = Task::new(TASK, "build", 2.0);
    let review = Task::new(TASK, "review", 1.0);
    let ci = Resource::new(RESOURCE, "ci");
    let rust = Knowledge::new(KNOWLEDGE, "rust", 10);
    let (build_id, review_id, ci_id, rust_id) = (build.id(), review.id(), ci.id(), rust.id());
    network.tasks().add(build);
    network.tasks().add(review);
    network.resources().add(ci);
    network.knowledge().add(rust);
    network.resource_tasks().add(ci_id, ResourceTask::new(build_id));
    network
        .task_knowledge()
        .add(review_id, TaskKnowledge::new(rust_id, 0.6));

    let snapshot = network.to_matrix().unwrap();
    let resource_task = snapshot.matrix(NetworkKind::ResourceTask).unwrap();
    assert_eq!((resource_task.rows(), resource_task.columns()), (1, 2));
    let task_knowledge = snapshot.matrix(NetworkKind::TaskKnowledge).unwrap();
    assert_eq!((task_knowledge.rows(), task_knowledge.columns()), (2, 1));
    let row = snapshot.tasks.index_of(review_id).unwrap();
    assert_eq!(task_knowledge.get(row, 0), Some(0.6));
}

#[test]
fn role_projection_and_metrics() {
    let network = MetaNetwork::new();
    let team = group(&network, "team");
    let lead = Role::new(ROLE, "lead");
    let lead_id = lead.id();
    network.roles().add(lead);
    let members: Vec<EntityId> = (0..4).map(|i| agent(&network, &format!("m{i}"))).collect();
    for member in &members {
        join(&network, *member, team);
    }
    network
        .agent_roles()
        .add(AgentRole::new(members[0], team, lead_id));
    for member in &members[1..] {
        network
            .interactions()
            .add_interaction(members[0], *member)
            .unwrap();
    }

    let snapshot = network.to_matrix().unwrap();
    let roles = snapshot.matrix(NetworkKind::AgentRole).unwrap();
    assert_eq!(roles.columns(), 1);
    assert_eq!(roles.rows(), snapshot.agents.len());

    let interactions = snapshot.matrix(NetworkKind::Interaction).unwrap();
    let density = metrics::one_mode_density(interactions).unwrap();
    assert!(density > 0.0 && density < 1.0);
    let centralization = metrics::degree_centralization(interactions).unwrap();
    assert!(centralization > 0.0);
}

#[test]
fn snapshot_serializes_to_json() {
    let network = MetaNetwork::new();
    let team = group(&network, "team");
    let ana = agent(&network, "ana");
    join(&network, ana, team);

    let snapshot = network.to_matrix().unwrap();
    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["agent_group"]["rows"], 1);
    assert_eq!(json["agent_group"]["columns"], 2);
    assert!(json["interactions"].is_null());
    assert_eq!(json["agents"]["ids"].as_array().map(Vec::len), Some(2));
}

// =============================================================================
// Copies
// =============================================================================

#[test]
fn clone_is_independent_both_ways() {
    let source = MetaNetwork::new();
    let team = group(&source, "team");
    let ana = agent(&source, "ana");
    join(&source, ana, team);

    let copy = source.clone();
    agent(&source, "late");
    assert_eq!(source.agents().len(), 3);
    assert_eq!(copy.agents().len(), 2);

    copy.remove_agent(ana).unwrap();
    assert!(source.agents().exists(ana));
    assert_eq!(source.members_of(team), vec![ana]);
    assert!(copy.members_of(team).is_empty());
}

#[test]
fn copy_to_keeps_target_configuration() {
    let source = MetaNetwork::new();
    let (a, b) = (agent(&source, "a"), agent(&source, "b"));
    source.interactions().add_interaction(a, b).unwrap();

    let config = NetworkConfig {
        passive_tolerance: 0.5,
        ..NetworkConfig::default()
    };
    let target = MetaNetwork::with_config(config);
    source.copy_to(&target);

    assert_eq!(target.interactions().weight(a, b), Some(1.0));
    assert!((target.interactions().passive_tolerance() - 0.5).abs() < f64::EPSILON);
}

#[test]
fn duplicate_into_same_network() {
    let network = MetaNetwork::new();
    let ana = agent(&network, "ana");
    let rust = EntityId::new(KNOWLEDGE);
    network
        .agent_knowledge()
        .add(ana, AgentKnowledge::new(rust, 0.3));

    let twin = network.duplicate_agent(ana, &network).unwrap();
    assert_eq!(network.agents().len(), 2);
    assert_eq!(network.agents().get(twin).map(|a| a.name), Some("ana".to_owned()));
    assert_eq!(network.agent_knowledge().value(twin, rust), Some(0.3));
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn concurrent_mutation_and_projection() {
    let network = MetaNetwork::new();
    let teams: Vec<EntityId> = (0..3).map(|i| group(&network, &format!("t{i}"))).collect();
    let stayers: Vec<EntityId> = (0..24).map(|i| agent(&network, &format!("s{i}"))).collect();
    let leavers: Vec<EntityId> = (0..24).map(|i| agent(&network, &format!("l{i}"))).collect();
    let area = Knowledge::new(KNOWLEDGE, "rust", 10);
    let area_id = area.id();
    network.knowledge().add(area);
    for (i, leaver) in leavers.iter().enumerate() {
        join(&network, *leaver, teams[i % teams.len()]);
        network
            .agent_knowledge()
            .add(*leaver, AgentKnowledge::new(area_id, 0.5));
    }

    thread::scope(|scope| {
        for chunk in stayers.chunks(8) {
            let network = &network;
            let teams = &teams;
            scope.spawn(move || {
                for (i, member) in chunk.iter().enumerate() {
                    join(network, *member, teams[i % teams.len()]);
                    if let Some(previous) = chunk.get(i.wrapping_sub(1)) {
                        network
                            .interactions()
                            .add_interaction(*member, *previous)
                            .unwrap();
                    }
                }
            });
        }

        let network_ref = &network;
        let leavers_ref = &leavers;
        scope.spawn(move || {
            for leaver in leavers_ref {
                network_ref.remove_agent(*leaver).unwrap();
            }
        });

        scope.spawn(move || {
            for _ in 0..50 {
                let snapshot = network_ref.to_matrix();
                assert!(snapshot.is_ok(), "torn projection: {snapshot:?}");
            }
        });
    });

    assert_eq!(network.agents().len(), teams.len() + stayers.len());
    for leaver in &leavers {
        assert!(network.groups_of(*leaver).is_empty());
        assert!(!network.agent_knowledge().exists(*leaver));
    }
    let members: usize = teams.iter().map(|team| network.members_of(*team).len()).sum();
    assert_eq!(members, stayers.len());
    assert_eq!(network.interactions().len(), stayers.len() - 3);
}
