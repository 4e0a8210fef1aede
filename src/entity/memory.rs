//! Long-term memory of a past observation
//!
//! A memory fades linearly from the strength it was formed (or last
//! reinforced) with. As it fades, the remembered position grows fuzzier.

use crate::core::types::{EntityId, SimTime, Vec2};
use crate::entity::observation::{Observation, ObservationKind, TargetHandle};

/// A decaying, positionally fuzzy record of a past sighting
#[derive(Debug, Clone)]
pub struct Memory {
    pub observation: Observation,
    /// When this memory was last seen, reinforced or imported
    pub last_seen: SimTime,
    /// Strength at `last_seen`
    pub initial_strength: f32,
}

impl Memory {
    pub fn new(observation: Observation, last_seen: SimTime, initial_strength: f32) -> Self {
        Self {
            observation,
            last_seen,
            initial_strength,
        }
    }

    pub fn kind(&self) -> ObservationKind {
        self.observation.kind
    }

    pub fn position(&self) -> Vec2 {
        self.observation.position
    }

    pub fn target(&self) -> &TargetHandle {
        &self.observation.target
    }

    pub fn target_id(&self) -> EntityId {
        self.observation.target.id()
    }

    /// Strength remaining at `now`, floored at zero.
    ///
    /// Strengthless memories and queries from before `last_seen` read as zero.
    pub fn current_strength(&self, now: SimTime, decay_per_second: f32) -> f32 {
        if !(self.initial_strength > 0.0) || !now.is_finite() || now < self.last_seen {
            return 0.0;
        }
        let elapsed = now - self.last_seen;
        let strength = self.initial_strength - elapsed * decay_per_second.max(0.0);
        strength.max(0.0)
    }

    /// Ratio of current to initial strength, within `[0, 1]`
    pub fn reliability(&self, now: SimTime, decay_per_second: f32) -> f32 {
        if !(self.initial_strength > 0.0) {
            return 0.0;
        }
        (self.current_strength(now, decay_per_second) / self.initial_strength).clamp(0.0, 1.0)
    }

    pub fn is_active(&self, now: SimTime, decay_per_second: f32) -> bool {
        self.current_strength(now, decay_per_second) > 0.0
    }

    /// Radius of uncertainty around the remembered position.
    /// Zero for a fresh memory, `max_radius` for a dead one.
    pub fn position_accuracy_radius(
        &self,
        now: SimTime,
        decay_per_second: f32,
        max_radius: f32,
    ) -> f32 {
        let max_radius = max_radius.max(0.0);
        if !self.is_active(now, decay_per_second) {
            return max_radius;
        }
        (1.0 - self.reliability(now, decay_per_second)) * max_radius
    }

    /// Same entity at (approximately) the same place as `observation`
    pub fn matches(&self, observation: &Observation) -> bool {
        self.observation.matches(observation)
    }
}
