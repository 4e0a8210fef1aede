//! Sight: who and what each creature can see from where it stands

use std::cell::Cell;

use ahash::AHashSet;

use crate::cognition::collaborators::PerceptionSource;
use crate::core::types::EntityId;
use crate::entity::observation::{Observation, Perceivable};

/// A creature's visible body, so others can see and remember it
#[derive(Debug)]
pub struct Presence {
    id: EntityId,
    alive: Cell<bool>,
}

impl Presence {
    pub fn new(id: EntityId) -> Self {
        Self { id, alive: Cell::new(true) }
    }

    pub fn despawn(&self) {
        self.alive.set(false);
    }
}

impl Perceivable for Presence {
    fn id(&self) -> EntityId {
        self.id
    }

    fn is_considerable(&self) -> bool {
        self.alive.get()
    }
}

/// Everything currently in sight, refreshed by the world every tick
#[derive(Debug, Default)]
pub struct SightSensor {
    visible: Vec<Observation>,
    in_sight: AHashSet<EntityId>,
}

impl SightSensor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the visible set. Returns only what just came into view.
    pub fn scan(&mut self, seen: Vec<Observation>) -> Vec<Observation> {
        let now_in_sight: AHashSet<EntityId> = seen.iter().map(Observation::target_id).collect();
        let fresh = seen
            .iter()
            .filter(|o| !self.in_sight.contains(&o.target_id()))
            .cloned()
            .collect();
        self.in_sight = now_in_sight;
        self.visible = seen;
        fresh
    }

    pub fn visible(&self) -> &[Observation] {
        &self.visible
    }
}

impl PerceptionSource for SightSensor {
    fn check_around(&mut self) -> Vec<Observation> {
        self.visible.clone()
    }
}
