//! The brain: memory, drives and target selection for one agent

use std::f32::consts::TAU;

use ahash::AHashSet;
use ordered_float::OrderedFloat;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::cognition::collaborators::NeedLevels;
use crate::cognition::feelings::{DriveKind, Feelings};
use crate::cognition::memory_store::SensoryMemory;
use crate::cognition::scoring::{memory_strength, score_observation, Candidate, TargetEvaluator};
use crate::core::config::{CognitionConfig, MemoryConfig};
use crate::core::types::{EntityId, SimTime, Vec2};
use crate::entity::observation::{Observation, ObservationKind};
use crate::entity::thoughts::CognitionEvent;

/// Accuracy radii below this are not worth fuzzing
const MIN_FUZZ_RADIUS: f32 = 0.01;

/// Outcome of a best-target lookup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetChoice {
    /// Where to go, fuzzed for remembered targets
    pub position: Vec2,
    /// Where the target was actually seen
    pub original: Vec2,
    pub target: EntityId,
    pub kind: ObservationKind,
    pub score: f32,
    pub remembered: bool,
}

#[derive(Debug, Clone)]
pub struct Brain {
    owner: EntityId,
    memory: SensoryMemory,
    memory_config: MemoryConfig,
    feelings: Feelings,
    /// Original position of the previous choice, for anti-repetition
    last_returned: Option<Vec2>,
    rng: ChaCha8Rng,
    events: Vec<CognitionEvent>,
}

impl Brain {
    pub fn new(owner: EntityId, config: &CognitionConfig, seed: u64) -> Self {
        Self {
            owner,
            memory: SensoryMemory::new(owner, config.memory.clone()),
            memory_config: config.memory.clone(),
            feelings: Feelings::new(config.drives.clone()),
            last_returned: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    /// Swap in a custom drive roster
    pub fn with_feelings(mut self, feelings: Feelings) -> Self {
        self.feelings = feelings;
        self
    }

    pub fn owner(&self) -> EntityId {
        self.owner
    }

    pub fn memory(&self) -> &SensoryMemory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut SensoryMemory {
        &mut self.memory
    }

    pub fn feelings(&self) -> &Feelings {
        &self.feelings
    }

    pub fn dominant_drive(&self) -> DriveKind {
        self.feelings.dominant()
    }

    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Take in sightings. Known places are reinforced immediately.
    pub fn perceive<I>(&mut self, observations: I, now: SimTime, needs: NeedLevels)
    where
        I: IntoIterator<Item = Observation>,
    {
        let config = &self.memory_config;
        self.memory
            .record_observations(observations, now, |o| memory_strength(o.kind, needs, config));
    }

    /// Per-tick update: memory upkeep, then drive arbitration.
    ///
    /// Returns the new dominant drive when it changed.
    pub fn process(&mut self, now: SimTime, decay_per_second: f32, needs: NeedLevels) -> Option<DriveKind> {
        let config = &self.memory_config;
        let acquired = self
            .memory
            .tick(now, decay_per_second, |o| score_observation(o, needs, config));
        for event in &acquired {
            tracing::trace!(agent = %self.owner, ?event, "memory acquired");
        }
        self.events.extend(acquired);

        let previous = self.feelings.last_emitted();
        let changed = self
            .feelings
            .compute(needs, self.memory.long_term(), now, decay_per_second);
        if let Some(to) = changed {
            tracing::debug!(agent = %self.owner, from = ?previous, to = ?to, "dominant drive changed");
            self.events.push(CognitionEvent::DriveChanged { from: previous, to });
        }
        changed
    }

    /// Best target for a need, scored by `evaluator`
    pub fn best_target(
        &mut self,
        evaluator: TargetEvaluator,
        self_position: Vec2,
        now: SimTime,
        decay_per_second: f32,
    ) -> Option<TargetChoice> {
        self.best_target_by(
            evaluator.accepted_kinds(),
            |candidate| evaluator.score(candidate, self_position, now, decay_per_second),
            now,
            decay_per_second,
        )
    }

    /// Best target among `kinds` under an arbitrary scoring function.
    ///
    /// Fresh sightings take precedence over memories of the same entity.
    /// The previous pick is skipped when a viable runner-up exists, and
    /// remembered positions are fuzzed by their accuracy radius.
    pub fn best_target_by<F>(
        &mut self,
        kinds: &[ObservationKind],
        mut score: F,
        now: SimTime,
        decay_per_second: f32,
    ) -> Option<TargetChoice>
    where
        F: FnMut(&Candidate<'_>) -> f32,
    {
        let fresh = self
            .memory
            .short_term()
            .iter()
            .filter(|o| kinds.contains(&o.kind) && o.target.is_considered())
            .map(Candidate::Fresh);
        let remembered = self
            .memory
            .long_term()
            .iter()
            .filter(|m| {
                kinds.contains(&m.kind())
                    && m.target().is_considered()
                    && m.is_active(now, decay_per_second)
            })
            .map(Candidate::Remembered);

        let mut seen = AHashSet::new();
        let mut scored: Vec<(Candidate<'_>, f32)> = fresh
            .chain(remembered)
            .filter(|c| seen.insert(c.target_id()))
            .map(|c| {
                let s = score(&c);
                (c, s)
            })
            .collect();
        // Stable: equal scores keep gathering order
        scored.sort_by(|a, b| OrderedFloat(b.1).cmp(&OrderedFloat(a.1)));

        let top = scored.first()?;
        if !(top.1 > 0.0) {
            return None;
        }

        let mut pick = 0;
        let repeats_last = self
            .last_returned
            .map(|last| last.approx_eq(&top.0.position()))
            .unwrap_or(false);
        if repeats_last && scored.len() > 1 && scored[1].1 > 0.0 {
            pick = 1;
        }

        let (candidate, best_score) = scored[pick];
        let original = candidate.position();
        let radius = match candidate {
            Candidate::Remembered(memory) => memory.position_accuracy_radius(
                now,
                decay_per_second,
                self.memory_config.max_position_accuracy_radius,
            ),
            Candidate::Fresh(_) => 0.0,
        };
        let choice = TargetChoice {
            position: original,
            original,
            target: candidate.target_id(),
            kind: candidate.kind(),
            score: best_score,
            remembered: candidate.is_remembered(),
        };
        drop(scored);

        self.last_returned = Some(original);
        let position = if radius > MIN_FUZZ_RADIUS {
            let angle = self.rng.gen::<f32>() * TAU;
            let magnitude = self.rng.gen::<f32>() * radius;
            original + Vec2::from_angle(angle) * magnitude
        } else {
            original
        };

        tracing::trace!(agent = %self.owner, kind = ?choice.kind, score = best_score, "target selected");
        Some(TargetChoice { position, ..choice })
    }

    /// Import another agent's long-term memories
    pub fn import_memories(&mut self, other: &SensoryMemory, now: SimTime) -> usize {
        let learned = self.memory.merge_from(other, now);
        if learned > 0 {
            self.events.push(CognitionEvent::MemoriesImported { from: other.owner(), learned });
        }
        learned
    }

    pub fn push_event(&mut self, event: CognitionEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<CognitionEvent> {
        std::mem::take(&mut self.events)
    }
}
