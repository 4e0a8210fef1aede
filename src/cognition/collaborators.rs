//! Interfaces to everything the cognition core does not own
//!
//! Movement, physiology, traits, aging, perception, exploration and other
//! agents are all consumed through these traits. An agent may run without
//! any of them; missing ones fall back to neutral values.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::cognition::memory_store::SensoryMemory;
use crate::core::types::{EntityId, SimTime, Vec2};
use crate::entity::needs::NeedKind;
use crate::entity::observation::{Observation, ObservationKind, Perceivable};
use crate::genetics::life_stage::LifeStage;

/// Physical locomotion
pub trait Mover {
    fn move_to(&mut self, target: Vec2);
    fn stop_moving(&mut self);
    fn has_arrived(&self) -> bool;
    fn velocity(&self) -> Vec2 {
        Vec2::ZERO
    }
}

/// Hunger and thirst levels, 0.0 = satisfied, 1.0 = desperate
pub trait PhysiologyProvider {
    fn hunger_level(&self) -> f32;
    fn thirst_level(&self) -> f32;
    fn update(&mut self, _dt: f32) {}
    fn eat(&mut self, _amount: f32) {}
    fn drink(&mut self, _amount: f32) {}
    /// Needs that became urgent since the last call
    fn take_alerts(&mut self) -> Vec<NeedKind> {
        Vec::new()
    }
}

/// Heritable multipliers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraitKind {
    HungerRate,
    ThirstRate,
    MemoryDecay,
    Speed,
    Maturation,
    SensoryRange,
}

pub trait TraitProvider {
    fn multiplier(&self, _kind: TraitKind) -> f32 {
        1.0
    }
}

/// Life stage scaling
pub trait AgeProvider {
    fn memory_decay_factor(&self) -> f32;
    fn speed_factor(&self) -> f32;
    fn update(&mut self, _dt: f32) {}
    /// Stage changes (from, to) since the last call
    fn take_stage_changes(&mut self) -> Vec<(LifeStage, LifeStage)> {
        Vec::new()
    }
}

/// Pull-style perception: everything currently in sight
pub trait PerceptionSource {
    fn check_around(&mut self) -> Vec<Observation>;
}

/// Supplies wander destinations in unexplored territory
pub trait Explorer {
    fn random_unexplored_point(&mut self, near: Vec2) -> Option<Vec2>;
    fn mark_visited(&mut self, position: Vec2);
}

/// Read access to other agents
pub trait PeerDirectory {
    fn memory_of(&self, peer: EntityId) -> Option<&SensoryMemory>;

    /// Whether `peer` would currently accept a conversation with `with`
    fn is_willing_to_talk(&self, peer: EntityId, with: EntityId, now: SimTime) -> bool;
}

/// What consuming a resource does to the consumer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConsumeEffect {
    Nourish(f32),
    Hydrate(f32),
    Nothing,
}

/// A perceivable resource that can be eaten, drunk or shaken
pub trait Consumable: Perceivable {
    fn kind(&self) -> ObservationKind;
    fn consume(&self) -> ConsumeEffect;
}

/// Need levels sampled once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NeedLevels {
    pub hunger: f32,
    pub thirst: f32,
}

/// Collaborators an agent can be missing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollaboratorKind {
    Mover,
    Physiology,
    Traits,
    Age,
    Perception,
    Explorer,
    Peers,
}

/// Remembers which missing collaborators were already reported
#[derive(Debug, Clone, Default)]
pub struct MissingCollaborators {
    reported: AHashSet<CollaboratorKind>,
}

impl MissingCollaborators {
    pub fn new() -> Self {
        Self::default()
    }

    /// Warn the first time `kind` turns out to be missing for `owner`
    pub fn report(&mut self, owner: EntityId, kind: CollaboratorKind) {
        if self.reported.insert(kind) {
            tracing::warn!(agent = %owner, ?kind, "collaborator missing, using neutral default");
        }
    }

    pub fn was_reported(&self, kind: CollaboratorKind) -> bool {
        self.reported.contains(&kind)
    }
}
