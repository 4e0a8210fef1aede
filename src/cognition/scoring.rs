//! Target desirability
//!
//! Two kinds of numbers live here. Decision weights and memory strengths are
//! computed once, when a sighting is folded into memory. Target scores are
//! computed whenever a drive asks for somewhere to go, and fold in distance
//! and how much the agent still trusts its memory.

use crate::cognition::collaborators::NeedLevels;
use crate::core::config::MemoryConfig;
use crate::core::types::{EntityId, SimTime, Vec2};
use crate::entity::memory::Memory;
use crate::entity::observation::{Observation, ObservationKind, ScoredObservation, TargetHandle};

pub const FRUIT_PREFERENCE: f32 = 100.0;
pub const FRUIT_TREE_PREFERENCE: f32 = 70.0;
pub const FOOD_DISTANCE_PENALTY: f32 = 0.05;

pub const WATER_PREFERENCE: f32 = 120.0;
pub const WATER_DISTANCE_PENALTY: f32 = 0.02;

/// Distances at or below this are treated as "right here"
const DISTANCE_EPSILON: f32 = 1e-6;

/// Something that can be scored as a target
#[derive(Debug, Clone, Copy)]
pub enum Candidate<'a> {
    /// Seen this tick, fully reliable
    Fresh(&'a Observation),
    /// Recalled from long-term memory
    Remembered(&'a Memory),
}

impl<'a> Candidate<'a> {
    pub fn observation(&self) -> &'a Observation {
        match *self {
            Candidate::Fresh(observation) => observation,
            Candidate::Remembered(memory) => &memory.observation,
        }
    }

    pub fn kind(&self) -> ObservationKind {
        self.observation().kind
    }

    /// Original (unfuzzed) position
    pub fn position(&self) -> Vec2 {
        self.observation().position
    }

    pub fn target(&self) -> &'a TargetHandle {
        &self.observation().target
    }

    pub fn target_id(&self) -> EntityId {
        self.observation().target.id()
    }

    pub fn is_remembered(&self) -> bool {
        matches!(self, Candidate::Remembered(_))
    }

    /// 1.0 for fresh sightings, current/initial strength for memories
    pub fn reliability(&self, now: SimTime, decay_per_second: f32) -> f32 {
        match self {
            Candidate::Fresh(_) => 1.0,
            Candidate::Remembered(memory) => memory.reliability(now, decay_per_second),
        }
    }
}

/// Per-need target scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetEvaluator {
    Food,
    Water,
}

impl TargetEvaluator {
    /// Kinds this evaluator gathers candidates for
    pub fn accepted_kinds(self) -> &'static [ObservationKind] {
        match self {
            TargetEvaluator::Food => &[ObservationKind::Fruit, ObservationKind::FruitTree],
            TargetEvaluator::Water => &[ObservationKind::Water],
        }
    }

    /// Score a candidate from `agent_position`. Zero means "not viable".
    pub fn score(self, candidate: &Candidate<'_>, agent_position: Vec2, now: SimTime, decay_per_second: f32) -> f32 {
        let (preference, penalty) = match (self, candidate.kind()) {
            (TargetEvaluator::Food, ObservationKind::Fruit) => (FRUIT_PREFERENCE, FOOD_DISTANCE_PENALTY),
            (TargetEvaluator::Food, ObservationKind::FruitTree) => (FRUIT_TREE_PREFERENCE, FOOD_DISTANCE_PENALTY),
            (TargetEvaluator::Water, ObservationKind::Water) => (WATER_PREFERENCE, WATER_DISTANCE_PENALTY),
            _ => return 0.0,
        };

        let mut score = preference;
        let distance = candidate.position().distance(&agent_position);
        if distance > DISTANCE_EPSILON {
            score /= 1.0 + distance * penalty;
        }
        score * candidate.reliability(now, decay_per_second)
    }
}

/// Strength a fresh memory of `kind` starts with, capped
pub fn memory_strength(kind: ObservationKind, needs: NeedLevels, config: &MemoryConfig) -> f32 {
    let threshold = config.need_bonus_threshold;
    let mut strength = config.base_strength * config.multipliers.for_kind(kind);
    let pressing = match kind {
        ObservationKind::Fruit | ObservationKind::FruitTree => needs.hunger > threshold,
        ObservationKind::Water => needs.thirst > threshold,
        _ => false,
    };
    if pressing {
        strength += config.need_driven_bonus;
    }
    strength.min(config.max_strength)
}

/// Immediate desirability of `kind` given current needs. Negative for dangers.
pub fn decision_weight(kind: ObservationKind, needs: NeedLevels) -> f32 {
    let base = kind.base_weight();
    match kind {
        ObservationKind::Fruit | ObservationKind::FruitTree => base * (1.0 + needs.hunger * 2.0),
        ObservationKind::Water => base * (1.0 + needs.thirst * 2.0),
        ObservationKind::Mate => base * (1.0 - needs.hunger) * (1.0 - needs.thirst),
        _ => base,
    }
}

/// Decision weight of a remembered sighting, scaled by how much it is trusted
pub fn remembered_decision_weight(memory: &Memory, needs: NeedLevels, now: SimTime, decay_per_second: f32) -> f32 {
    decision_weight(memory.kind(), needs) * memory.reliability(now, decay_per_second)
}

/// Weigh a sighting for memory formation
pub fn score_observation(observation: &Observation, needs: NeedLevels, config: &MemoryConfig) -> ScoredObservation {
    ScoredObservation {
        observation: observation.clone(),
        decision_weight: decision_weight(observation.kind, needs),
        candidate_strength: memory_strength(observation.kind, needs, config).max(0.0),
    }
}
