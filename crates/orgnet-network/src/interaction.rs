//! Weighted symmetric agent-to-agent interactions.
//!
//! An [`Interaction`] is an undirected edge stored once per unordered pair of
//! agents. Construction canonicalizes the pair so that `source` is always the
//! smaller [`EntityId`] and `target` the larger; lookups and equality are
//! therefore independent of argument order.
//!
//! Weights count interactions. They move by explicit increase/decrease calls
//! and never drop below zero.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::Serialize;
use tracing::debug;

use orgnet_types::{EntityId, NetworkKind};

use crate::error::{NetworkError, Result};
use crate::matrix::{self, Matrix};
use crate::vector::VectorNetwork;

/// Default weight below which an interaction counts as passive.
pub const DEFAULT_PASSIVE_TOLERANCE: f64 = 0.0001;

/// Order a pair so the smaller id comes first.
fn canonical(a: EntityId, b: EntityId) -> (EntityId, EntityId) {
    if a <= b { (a, b) } else { (b, a) }
}

// ---------------------------------------------------------------------------
// Interaction
// ---------------------------------------------------------------------------

/// An undirected weighted edge between two agents.
///
/// Two interactions are equal when they connect the same unordered pair,
/// whatever their weights.
#[derive(Debug, Clone, Serialize)]
pub struct Interaction {
    source: EntityId,
    target: EntityId,
    weight: f64,
    normalized_weight: f64,
}

impl Interaction {
    /// Create the first interaction between `a` and `b` (weight 1).
    ///
    /// Argument order does not matter. Fails if `a == b`.
    pub fn new(a: EntityId, b: EntityId) -> Result<Self> {
        if a == b {
            return Err(NetworkError::InvalidArgument {
                reason: format!("an agent cannot interact with itself ({a})"),
            });
        }
        let (source, target) = canonical(a, b);
        Ok(Self {
            source,
            target,
            weight: 1.0,
            normalized_weight: 0.0,
        })
    }

    /// The smaller endpoint.
    pub const fn source(&self) -> EntityId {
        self.source
    }

    /// The larger endpoint.
    pub const fn target(&self) -> EntityId {
        self.target
    }

    /// The interaction count.
    pub const fn weight(&self) -> f64 {
        self.weight
    }

    /// The weight relative to the heaviest interaction of the network, as of
    /// the last [`InteractionNetwork::normalize_weights`] call.
    pub const fn normalized_weight(&self) -> f64 {
        self.normalized_weight
    }

    /// Add one interaction.
    pub fn increase_weight(&mut self) {
        self.increase_by(1.0);
    }

    /// Add `amount` interactions. Negative amounts are ignored.
    pub fn increase_by(&mut self, amount: f64) {
        if amount > 0.0 {
            self.weight += amount;
        }
    }

    /// Remove one interaction, stopping at zero.
    pub fn decrease_weight(&mut self) {
        self.decrease_by(1.0);
    }

    /// Remove `amount` interactions, stopping at zero.
    pub fn decrease_by(&mut self, amount: f64) {
        if amount > 0.0 {
            self.weight = (self.weight - amount).max(0.0);
        }
    }

    /// Return `true` while at least some interaction remains.
    pub fn is_active(&self) -> bool {
        self.weight > 0.0
    }

    /// Return `true` if the weight is below `tolerance`.
    pub fn is_passive(&self, tolerance: f64) -> bool {
        self.weight < tolerance
    }

    /// Return `true` if this edge connects `a` and `b`, in either order.
    pub fn has_link(&self, a: EntityId, b: EntityId) -> bool {
        canonical(a, b) == (self.source, self.target)
    }

    /// Return `true` if this edge connects `a` and `b` and is active.
    pub fn has_active_interaction(&self, a: EntityId, b: EntityId) -> bool {
        self.is_active() && self.has_link(a, b)
    }

    /// Return `true` if `id` is one of the endpoints.
    pub fn connects(&self, id: EntityId) -> bool {
        self.source == id || self.target == id
    }

    /// Return the endpoint opposite `id`, if `id` is an endpoint.
    pub fn partner_of(&self, id: EntityId) -> Option<EntityId> {
        if self.source == id {
            Some(self.target)
        } else if self.target == id {
            Some(self.source)
        } else {
            None
        }
    }

    const fn key(&self) -> (EntityId, EntityId) {
        (self.source, self.target)
    }
}

impl PartialEq for Interaction {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Interaction {}

impl core::hash::Hash for Interaction {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

// ---------------------------------------------------------------------------
// InteractionNetwork
// ---------------------------------------------------------------------------

/// The agent-to-agent interaction network.
#[derive(Debug, Clone)]
pub struct InteractionNetwork {
    links: DashMap<(EntityId, EntityId), Interaction>,
    passive_tolerance: f64,
}

impl InteractionNetwork {
    /// Create an empty network with the default passive tolerance.
    pub fn new() -> Self {
        Self::with_tolerance(DEFAULT_PASSIVE_TOLERANCE)
    }

    /// Create an empty network with a custom passive tolerance.
    pub fn with_tolerance(passive_tolerance: f64) -> Self {
        Self {
            links: DashMap::new(),
            passive_tolerance,
        }
    }

    /// The weight below which an interaction counts as passive.
    pub const fn passive_tolerance(&self) -> f64 {
        self.passive_tolerance
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Record one interaction between `a` and `b`.
    ///
    /// Creates the edge with weight 1 if absent, otherwise increases it by 1.
    /// Returns the new weight.
    pub fn add_interaction(&self, a: EntityId, b: EntityId) -> Result<f64> {
        let link = Interaction::new(a, b)?;
        let weight = match self.links.entry(link.key()) {
            Entry::Occupied(mut existing) => {
                existing.get_mut().increase_weight();
                existing.get().weight()
            }
            Entry::Vacant(slot) => slot.insert(link).weight(),
        };
        Ok(weight)
    }

    /// Insert a prepared edge. Returns `false` if the pair is already linked.
    pub fn add(&self, link: Interaction) -> bool {
        match self.links.entry(link.key()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(link);
                true
            }
        }
    }

    /// Record one interaction between `agent` and each of `others`.
    ///
    /// Self-pairs are skipped. Returns the number of edges touched.
    pub fn link_to_all(&self, agent: EntityId, others: &[EntityId]) -> usize {
        others
            .iter()
            .filter(|other| self.add_interaction(agent, **other).is_ok())
            .count()
    }

    /// Increase the weight of an existing edge by `amount`.
    ///
    /// Returns the new weight, or `None` if the pair is not linked.
    pub fn increase(&self, a: EntityId, b: EntityId, amount: f64) -> Option<f64> {
        let mut link = self.links.get_mut(&canonical(a, b))?;
        link.increase_by(amount);
        Some(link.weight())
    }

    /// Decrease the weight of an existing edge by `amount`, stopping at zero.
    ///
    /// Returns the new weight, or `None` if the pair is not linked.
    pub fn decrease(&self, a: EntityId, b: EntityId, amount: f64) -> Option<f64> {
        let mut link = self.links.get_mut(&canonical(a, b))?;
        link.decrease_by(amount);
        Some(link.weight())
    }

    /// Remove the edge between `a` and `b`.
    pub fn remove_link(&self, a: EntityId, b: EntityId) -> Option<Interaction> {
        self.links.remove(&canonical(a, b)).map(|(_, link)| link)
    }

    /// Remove every edge touching `agent`. Returns the number removed.
    pub fn remove_agent(&self, agent: EntityId) -> usize {
        let before = self.links.len();
        self.links.retain(|_, link| !link.connects(agent));
        before.saturating_sub(self.links.len())
    }

    /// Recompute every normalized weight as `weight / max weight`.
    ///
    /// With no active edge every normalized weight is zero.
    pub fn normalize_weights(&self) {
        let max = self
            .links
            .iter()
            .map(|link| link.weight())
            .fold(0.0_f64, f64::max);
        for mut link in self.links.iter_mut() {
            link.normalized_weight = if max > 0.0 { link.weight / max } else { 0.0 };
        }
        debug!(max, links = self.links.len(), "Normalized interaction weights");
    }

    /// Remove every edge.
    pub fn clear(&self) {
        self.links.clear();
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Return a copy of the edge between `a` and `b`.
    pub fn get(&self, a: EntityId, b: EntityId) -> Option<Interaction> {
        self.links
            .get(&canonical(a, b))
            .map(|link| link.value().clone())
    }

    /// Return the weight between `a` and `b`, if linked.
    pub fn weight(&self, a: EntityId, b: EntityId) -> Option<f64> {
        self.links
            .get(&canonical(a, b))
            .map(|link| link.weight())
    }

    /// Return `true` if `a` and `b` are linked, in either order.
    pub fn has_link(&self, a: EntityId, b: EntityId) -> bool {
        self.links.contains_key(&canonical(a, b))
    }

    /// Return `true` if `a` and `b` are linked with a positive weight.
    pub fn has_active_interaction(&self, a: EntityId, b: EntityId) -> bool {
        self.links
            .get(&canonical(a, b))
            .is_some_and(|link| link.has_active_interaction(a, b))
    }

    /// Return `true` if the pair is unlinked or its weight is below the
    /// passive tolerance.
    pub fn is_passive(&self, a: EntityId, b: EntityId) -> bool {
        self.links
            .get(&canonical(a, b))
            .is_none_or(|link| link.is_passive(self.passive_tolerance))
    }

    /// Return a copy of every edge touching `agent`, sorted by partner.
    pub fn links_of(&self, agent: EntityId) -> Vec<Interaction> {
        let mut links: Vec<Interaction> = self
            .links
            .iter()
            .filter(|link| link.connects(agent))
            .map(|link| link.value().clone())
            .collect();
        links.sort_unstable_by_key(|link| link.partner_of(agent));
        links
    }

    /// Return every partner `agent` has an active interaction with, sorted.
    pub fn active_partners(&self, agent: EntityId) -> Vec<EntityId> {
        let mut partners: Vec<EntityId> = self
            .links
            .iter()
            .filter(|link| link.is_active())
            .filter_map(|link| link.partner_of(agent))
            .collect();
        partners.sort_unstable();
        partners
    }

    /// Return a copy of every edge, sorted by `(source, target)`.
    pub fn links(&self) -> Vec<Interaction> {
        let mut links: Vec<Interaction> =
            self.links.iter().map(|link| link.value().clone()).collect();
        links.sort_unstable_by_key(Interaction::key);
        links
    }

    /// Return the number of edges.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Return `true` if there is no edge.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Return `true` if there is at least one edge.
    pub fn any(&self) -> bool {
        !self.links.is_empty()
    }

    // -----------------------------------------------------------------------
    // Copy / projection
    // -----------------------------------------------------------------------

    /// Add every edge to `target`, keeping edges already linked there.
    pub fn copy_to(&self, target: &Self) {
        for link in self.links() {
            target.add(link);
        }
    }

    /// Project the network into a symmetric agent x agent weight matrix.
    pub fn to_matrix(&self, agents: &VectorNetwork) -> Result<Option<Matrix>> {
        let cells: Vec<(EntityId, EntityId, f64)> = self
            .links
            .iter()
            .flat_map(|link| {
                [
                    (link.source, link.target, link.weight),
                    (link.target, link.source, link.weight),
                ]
            })
            .collect();
        matrix::project(NetworkKind::Interaction, agents, agents, cells)
    }
}

impl Default for InteractionNetwork {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use orgnet_types::ClassId;

    use super::*;

    fn agent() -> EntityId {
        EntityId::new(ClassId::new(1))
    }

    // -----------------------------------------------------------------------
    // Interaction
    // -----------------------------------------------------------------------

    #[test]
    fn construction_is_order_independent() {
        let (a, b) = (agent(), agent());
        let ab = Interaction::new(a, b);
        let ba = Interaction::new(b, a);
        assert!(ab.is_ok() && ba.is_ok());
        if let (Ok(ab), Ok(ba)) = (ab, ba) {
            assert_eq!(ab.source(), ba.source());
            assert_eq!(ab.target(), ba.target());
            assert_eq!(ab, ba);
            assert!(ab.source() < ab.target());
            assert!(ab.has_link(a, b) && ab.has_link(b, a));
        }
    }

    #[test]
    fn self_interaction_rejected() {
        let a = agent();
        assert!(matches!(
            Interaction::new(a, a),
            Err(NetworkError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn first_interaction_has_weight_one() {
        let link = Interaction::new(agent(), agent());
        assert_eq!(link.map(|l| l.weight()).ok(), Some(1.0));
    }

    #[test]
    fn weight_floor_is_zero() {
        if let Ok(mut link) = Interaction::new(agent(), agent()) {
            for _ in 0..5 {
                link.decrease_weight();
            }
            assert!(link.weight() >= 0.0);
            assert!(!link.is_active());
            assert!(link.is_passive(DEFAULT_PASSIVE_TOLERANCE));
            link.decrease_by(10.0);
            assert!(link.weight() >= 0.0);
        }
    }

    #[test]
    fn equality_ignores_weight() {
        let (a, b) = (agent(), agent());
        if let (Ok(mut heavy), Ok(light)) = (Interaction::new(a, b), Interaction::new(b, a)) {
            heavy.increase_by(5.0);
            assert_eq!(heavy, light);
        }
    }

    #[test]
    fn clone_is_deep_value_copy() {
        if let Ok(mut original) = Interaction::new(agent(), agent()) {
            let copy = original.clone();
            original.increase_weight();
            assert!((copy.weight() - 1.0).abs() < f64::EPSILON);
            assert!((original.weight() - 2.0).abs() < f64::EPSILON);
            assert_eq!(copy, original);
        }
    }

    #[test]
    fn partner_of_endpoints() {
        let (a, b, c) = (agent(), agent(), agent());
        if let Ok(link) = Interaction::new(a, b) {
            assert_eq!(link.partner_of(a), Some(b));
            assert_eq!(link.partner_of(b), Some(a));
            assert_eq!(link.partner_of(c), None);
        }
    }

    // -----------------------------------------------------------------------
    // InteractionNetwork
    // -----------------------------------------------------------------------

    #[test]
    fn add_interaction_creates_then_increases() {
        let network = InteractionNetwork::new();
        let (a, b) = (agent(), agent());

        assert_eq!(network.add_interaction(a, b).ok(), Some(1.0));
        assert_eq!(network.add_interaction(b, a).ok(), Some(2.0));
        assert_eq!(network.len(), 1);
        assert_eq!(network.weight(b, a), Some(2.0));
    }

    #[test]
    fn has_link_is_symmetric() {
        let network = InteractionNetwork::new();
        let (a, b, c) = (agent(), agent(), agent());
        let _ = network.add_interaction(a, b);

        assert!(network.has_link(a, b));
        assert!(network.has_link(b, a));
        assert!(!network.has_link(a, c));
    }

    #[test]
    fn active_requires_positive_weight() {
        let network = InteractionNetwork::new();
        let (a, b) = (agent(), agent());
        let _ = network.add_interaction(a, b);
        assert!(network.has_active_interaction(b, a));

        assert_eq!(network.decrease(a, b, 1.0), Some(0.0));
        assert!(!network.has_active_interaction(a, b));
        assert!(network.has_link(a, b));
        assert!(network.is_passive(a, b));
        assert_eq!(network.decrease(a, b, 1.0), Some(0.0));
    }

    #[test]
    fn decrease_unlinked_is_none() {
        let network = InteractionNetwork::new();
        assert_eq!(network.decrease(agent(), agent(), 1.0), None);
        assert_eq!(network.increase(agent(), agent(), 1.0), None);
    }

    #[test]
    fn remove_agent_drops_touching_links() {
        let network = InteractionNetwork::new();
        let (a, b, c) = (agent(), agent(), agent());
        let _ = network.add_interaction(a, b);
        let _ = network.add_interaction(a, c);
        let _ = network.add_interaction(b, c);

        assert_eq!(network.remove_agent(a), 2);
        assert!(network.links_of(a).is_empty());
        assert!(network.has_link(b, c));
    }

    #[test]
    fn normalize_against_heaviest_link() {
        let network = InteractionNetwork::new();
        let (a, b, c) = (agent(), agent(), agent());
        let _ = network.add_interaction(a, b);
        let _ = network.add_interaction(a, c);
        network.increase(a, c, 3.0);
        network.normalize_weights();

        let ab = network.get(a, b).map(|l| l.normalized_weight());
        let ac = network.get(a, c).map(|l| l.normalized_weight());
        assert_eq!(ab, Some(0.25));
        assert_eq!(ac, Some(1.0));
    }

    #[test]
    fn link_to_all_skips_self() {
        let network = InteractionNetwork::new();
        let (a, b, c) = (agent(), agent(), agent());

        assert_eq!(network.link_to_all(a, &[a, b, c]), 2);
        assert_eq!(network.active_partners(a).len(), 2);
    }

    #[test]
    fn to_matrix_is_symmetric() {
        let network = InteractionNetwork::new();
        let (a, b, c) = (agent(), agent(), agent());
        let _ = network.add_interaction(a, c);
        let agents = VectorNetwork::new([a, b, c]);

        let matrix = network.to_matrix(&agents).ok().flatten();
        assert!(matrix.is_some());
        if let Some(matrix) = matrix {
            assert_eq!((matrix.rows(), matrix.columns()), (3, 3));
            assert_eq!(matrix.get(0, 2), Some(1.0));
            assert_eq!(matrix.get(2, 0), Some(1.0));
            assert_eq!(matrix.get(1, 1), Some(0.0));
        }
    }
}
