//! Headless sandbox: creatures, fruit trees and water on a square map
//!
//! The world owns everything the cognition core only borrows: bodies that
//! move, eyes that see, a sense of explored territory, and the resources
//! themselves. [`crate::simulation::tick::run_simulation_tick`] advances it.

pub mod exploration;
pub mod movement;
pub mod perception;
pub mod resources;

use std::rc::Rc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::agent::Agent;
use crate::cognition::collaborators::{Consumable, PeerDirectory, TraitKind};
use crate::cognition::memory_store::SensoryMemory;
use crate::core::config::CognitionConfig;
use crate::core::error::{MindError, Result};
use crate::core::types::{EntityId, SimTime, Vec2};
use crate::entity::needs::Physiology;
use crate::entity::observation::{Observation, ObservationKind, TargetHandle};
use crate::genetics::life_stage::Growth;
use crate::genetics::phenotype::Phenotype;
use crate::spatial::sparse_hash::SparseHashGrid;

use exploration::ChunkExplorer;
use movement::Locomotion;
use perception::{Presence, SightSensor};
use resources::{FruitTree, Resource, WaterSource};

/// The world-side half of a creature
#[derive(Debug)]
pub struct Embodiment {
    pub presence: Rc<Presence>,
    pub locomotion: Locomotion,
    pub explorer: ChunkExplorer,
    pub sensor: SightSensor,
}

pub struct World {
    config: CognitionConfig,
    time: SimTime,
    /// Parallel to `bodies`
    agents: Vec<Agent>,
    bodies: Vec<Embodiment>,
    resources: Vec<Resource>,
    resource_grid: SparseHashGrid<usize>,
    rng: ChaCha8Rng,
}

impl World {
    pub fn new(config: CognitionConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let cell = config.sandbox.sight_radius.max(config.sandbox.interaction_radius);
        Ok(Self {
            config,
            time: 0.0,
            agents: Vec::new(),
            bodies: Vec::new(),
            resources: Vec::new(),
            resource_grid: SparseHashGrid::new(cell),
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    pub fn config(&self) -> &CognitionConfig {
        &self.config
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    fn random_point(&mut self) -> Vec2 {
        let size = self.config.sandbox.world_size;
        Vec2::new(self.rng.gen_range(0.0..size), self.rng.gen_range(0.0..size))
    }

    /// Scatter the configured number of trees and water sources
    pub fn populate(&mut self) {
        for _ in 0..self.config.sandbox.fruit_trees {
            let position = self.random_point();
            self.add_tree(position);
        }
        for _ in 0..self.config.sandbox.water_sources {
            let position = self.random_point();
            self.add_water(position);
        }
        tracing::info!(resources = self.resources.len(), "world populated");
    }

    fn add_resource(&mut self, resource: Resource) {
        self.resource_grid.insert(self.resources.len(), resource.position());
        self.resources.push(resource);
    }

    /// Plant a tree; its fruit is placed around it
    pub fn add_tree(&mut self, position: Vec2) -> Rc<FruitTree> {
        let sandbox = &self.config.sandbox;
        let tree = Rc::new(FruitTree::new(position, sandbox.fruits_per_tree, sandbox.fruit_respawn_delay));
        for fruit in tree.fruits() {
            self.add_resource(Resource::Fruit(Rc::clone(fruit)));
        }
        self.add_resource(Resource::Tree(Rc::clone(&tree)));
        tree
    }

    pub fn add_water(&mut self, position: Vec2) -> Rc<WaterSource> {
        let water = Rc::new(WaterSource::new(position));
        self.add_resource(Resource::Water(Rc::clone(&water)));
        water
    }

    /// Spawn a creature with a random phenotype at `position`
    pub fn spawn_agent(&mut self, position: Vec2) -> EntityId {
        let variance = self.config.sandbox.trait_variance;
        let phenotype = Phenotype::with_variance(variance, &mut self.rng);
        let seed = self.rng.gen::<u64>();

        let physiology = Physiology::new(&self.config.physiology).with_traits(&phenotype);
        let growth = Growth::new(self.config.growth.clone()).with_maturation(phenotype.maturation);
        let agent = Agent::new(EntityId::new(), position, &self.config, seed)
            .with_physiology(physiology)
            .with_age(growth)
            .with_traits(phenotype);
        self.insert_agent(agent)
    }

    /// Add a fully built agent
    pub fn insert_agent(&mut self, agent: Agent) -> EntityId {
        let id = agent.id();
        let sandbox = &self.config.sandbox;
        let body = Embodiment {
            presence: Rc::new(Presence::new(id)),
            locomotion: Locomotion::new(agent.position, sandbox),
            explorer: ChunkExplorer::new(sandbox.world_size, sandbox.chunk_size, self.rng.gen()),
            sensor: SightSensor::new(),
        };
        tracing::debug!(agent = %id, position = ?agent.position, "agent spawned");
        self.agents.push(agent);
        self.bodies.push(body);
        id
    }

    /// Remove a creature; memories of it stop being eligible targets
    pub fn despawn_agent(&mut self, id: EntityId) -> Result<Agent> {
        let index = self.index_of(id)?;
        let body = self.bodies.remove(index);
        body.presence.despawn();
        Ok(self.agents.remove(index))
    }

    fn index_of(&self, id: EntityId) -> Result<usize> {
        self.agents
            .iter()
            .position(|a| a.id() == id)
            .ok_or(MindError::AgentNotFound(id))
    }

    pub fn agent(&self, id: EntityId) -> Result<&Agent> {
        self.index_of(id).map(|i| &self.agents[i])
    }

    pub fn agent_mut(&mut self, id: EntityId) -> Result<&mut Agent> {
        let index = self.index_of(id)?;
        Ok(&mut self.agents[index])
    }

    pub fn body(&self, id: EntityId) -> Result<&Embodiment> {
        self.index_of(id).map(|i| &self.bodies[i])
    }

    /// Teleport a creature, dropping whatever it was walking to
    pub fn place_agent(&mut self, id: EntityId, position: Vec2) -> Result<()> {
        let index = self.index_of(id)?;
        self.agents[index].position = position;
        let sandbox = &self.config.sandbox;
        self.bodies[index].locomotion = Locomotion::new(position, sandbox);
        Ok(())
    }

    pub(crate) fn advance_clock(&mut self, dt: f32) -> SimTime {
        self.time += dt;
        self.time
    }

    pub(crate) fn update_resources(&mut self) {
        let now = self.time;
        for resource in &self.resources {
            if let Resource::Tree(tree) = resource {
                tree.update(now);
            }
        }
    }

    /// Everything agent `index` can currently see
    pub(crate) fn visible_from(&self, index: usize) -> Vec<Observation> {
        let agent = &self.agents[index];
        let radius = self.config.sandbox.sight_radius * agent.trait_multiplier(TraitKind::SensoryRange);
        let mut seen: Vec<Observation> = self
            .resource_grid
            .query_radius(agent.position, radius)
            .filter_map(|(i, _)| self.resources.get(i))
            .filter(|r| r.is_considerable())
            .map(|r| Observation::new(r.handle(), r.position(), r.kind()))
            .collect();

        for (other, body) in self.agents.iter().zip(&self.bodies) {
            if other.id() == agent.id() || other.position.distance(&agent.position) > radius {
                continue;
            }
            seen.push(Observation::new(
                TargetHandle::new(&body.presence),
                other.position,
                ObservationKind::Mate,
            ));
        }
        seen
    }

    /// Resources agent `index` can act on right now
    pub(crate) fn adjacent_to(&self, index: usize) -> Vec<Rc<dyn Consumable>> {
        let position = self.agents[index].position;
        self.resource_grid
            .query_radius(position, self.config.sandbox.interaction_radius)
            .filter_map(|(i, _)| self.resources.get(i))
            .map(Resource::as_consumable)
            .collect()
    }

    /// Other agents within talking distance of agent `index`
    pub(crate) fn peers_near(&self, index: usize) -> Vec<EntityId> {
        let me = &self.agents[index];
        self.agents
            .iter()
            .filter(|a| a.id() != me.id())
            .filter(|a| a.position.distance(&me.position) <= self.config.sandbox.talk_radius)
            .map(Agent::id)
            .collect()
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut Vec<Agent>, &mut Vec<Embodiment>) {
        (&mut self.agents, &mut self.bodies)
    }
}

/// Read-only view of every agent except the one currently ticking
pub struct PeerView<'a> {
    before: &'a [Agent],
    after: &'a [Agent],
}

impl<'a> PeerView<'a> {
    /// Split `agents` around `index`: the view plus the agent itself
    pub fn split(agents: &'a mut [Agent], index: usize) -> Option<(&'a mut Agent, PeerView<'a>)> {
        let (before, rest) = agents.split_at_mut(index);
        let (me, after) = rest.split_first_mut()?;
        Some((me, PeerView { before, after }))
    }

    fn find(&self, id: EntityId) -> Option<&'a Agent> {
        self.before.iter().chain(self.after.iter()).find(|a| a.id() == id)
    }
}

impl PeerDirectory for PeerView<'_> {
    fn memory_of(&self, peer: EntityId) -> Option<&SensoryMemory> {
        self.find(peer).map(Agent::memory)
    }

    fn is_willing_to_talk(&self, peer: EntityId, with: EntityId, now: SimTime) -> bool {
        self.find(peer)
            .map(|agent| agent.is_willing_to_talk(with, now))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> World {
        World::new(CognitionConfig::default(), 9).unwrap()
    }

    #[test]
    fn test_tree_registers_fruit_and_trunk() {
        let mut world = world();
        world.add_tree(Vec2::new(100.0, 100.0));
        let fruits_per_tree = world.config().sandbox.fruits_per_tree;
        assert_eq!(world.resources().len(), fruits_per_tree + 1);
    }

    #[test]
    fn test_hanging_fruit_is_not_visible() {
        let mut world = world();
        world.add_tree(Vec2::new(100.0, 100.0));
        world.add_water(Vec2::new(120.0, 100.0));
        let id = world.spawn_agent(Vec2::new(100.0, 120.0));
        let index = world.index_of(id).unwrap();

        let seen = world.visible_from(index);
        let kinds: Vec<ObservationKind> = seen.iter().map(|o| o.kind).collect();
        assert!(kinds.contains(&ObservationKind::FruitTree));
        assert!(kinds.contains(&ObservationKind::Water));
        assert!(!kinds.contains(&ObservationKind::Fruit));
    }

    #[test]
    fn test_agents_see_each_other() {
        let mut world = world();
        world.spawn_agent(Vec2::new(0.0, 0.0));
        world.spawn_agent(Vec2::new(10.0, 0.0));
        world.spawn_agent(Vec2::new(900.0, 900.0));

        let seen = world.visible_from(0);
        assert_eq!(seen.iter().filter(|o| o.kind == ObservationKind::Mate).count(), 1);
        assert_eq!(world.peers_near(0).len(), 1);
    }

    #[test]
    fn test_unknown_agent_is_an_error() {
        let world = world();
        assert!(matches!(world.agent(EntityId::new()), Err(MindError::AgentNotFound(_))));
    }

    #[test]
    fn test_peer_view_excludes_self() {
        let mut world = world();
        let a = world.spawn_agent(Vec2::ZERO);
        let b = world.spawn_agent(Vec2::ZERO);
        let (agents, _) = world.parts_mut();
        let (me, view) = PeerView::split(agents, 0).unwrap();
        assert_eq!(me.id(), a);
        assert!(view.memory_of(a).is_none());
        assert!(view.memory_of(b).is_some());
        assert!(view.is_willing_to_talk(b, a, 0.0));
    }
}
