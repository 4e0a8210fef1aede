//! Behavior state machine
//!
//! Each agent is always in exactly one state. States are checked for
//! transitions in a fixed priority order, on a cooldown, and never while the
//! lock from the previous switch is still running.

pub mod controller;
pub mod state;

use std::rc::Rc;

use crate::cognition::brain::Brain;
use crate::cognition::collaborators::{
    Consumable, ConsumeEffect, Explorer, Mover, NeedLevels, PeerDirectory, PerceptionSource,
};
use crate::core::types::{EntityId, SimTime, Vec2};
use crate::entity::social::SocialLedger;

/// World-owned collaborators lent to an agent for one tick
#[derive(Default)]
pub struct Surroundings<'a> {
    pub mover: Option<&'a mut dyn Mover>,
    pub perception: Option<&'a mut dyn PerceptionSource>,
    pub explorer: Option<&'a mut dyn Explorer>,
    /// Resources within interaction range
    pub adjacent: &'a [Rc<dyn Consumable>],
    /// Other agents within talking range
    pub nearby_peers: &'a [EntityId],
    pub peers: Option<&'a dyn PeerDirectory>,
}

impl<'a> Surroundings<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mover(mut self, mover: &'a mut dyn Mover) -> Self {
        self.mover = Some(mover);
        self
    }

    pub fn with_perception(mut self, perception: &'a mut dyn PerceptionSource) -> Self {
        self.perception = Some(perception);
        self
    }

    pub fn with_explorer(mut self, explorer: &'a mut dyn Explorer) -> Self {
        self.explorer = Some(explorer);
        self
    }

    pub fn with_adjacent(mut self, adjacent: &'a [Rc<dyn Consumable>]) -> Self {
        self.adjacent = adjacent;
        self
    }

    pub fn with_peers(mut self, nearby: &'a [EntityId], directory: &'a dyn PeerDirectory) -> Self {
        self.nearby_peers = nearby;
        self.peers = Some(directory);
        self
    }

    pub fn mover_arrived(&self) -> Option<bool> {
        self.mover.as_deref().map(|m| m.has_arrived())
    }
}

/// Everything a state may read or touch during one tick
pub struct TickContext<'c, 'a> {
    pub now: SimTime,
    pub dt: f32,
    pub position: Vec2,
    pub needs: NeedLevels,
    pub decay_per_second: f32,
    pub brain: &'c mut Brain,
    pub social: &'c mut SocialLedger,
    pub surroundings: &'c mut Surroundings<'a>,
    /// Effects of whatever was consumed this tick, applied by the agent
    pub effects: Vec<ConsumeEffect>,
}
