//! Sensory memory: short-term sightings folded into decaying long-term memories
//!
//! Sightings land in a short-term buffer (or reinforce a memory the agent
//! already holds). Every tick, dead memories are pruned and the buffer is
//! drained into long-term memory, strongest decision first.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;

use crate::core::config::MemoryConfig;
use crate::core::types::{EntityId, SimTime};
use crate::entity::memory::Memory;
use crate::entity::observation::{Observation, ScoredObservation};
use crate::entity::thoughts::CognitionEvent;

/// One agent's short-term buffer and long-term memories
#[derive(Debug, Clone)]
pub struct SensoryMemory {
    owner: EntityId,
    config: MemoryConfig,
    short_term: Vec<Observation>,
    long_term: Vec<Memory>,
}

impl SensoryMemory {
    pub fn new(owner: EntityId, config: MemoryConfig) -> Self {
        Self {
            owner,
            config,
            short_term: Vec::new(),
            long_term: Vec::new(),
        }
    }

    pub fn owner(&self) -> EntityId {
        self.owner
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    pub fn short_term(&self) -> &[Observation] {
        &self.short_term
    }

    pub fn long_term(&self) -> &[Memory] {
        &self.long_term
    }

    /// Long-term memory for the same entity at the same place
    pub fn find(&self, observation: &Observation) -> Option<&Memory> {
        self.long_term.iter().find(|m| m.matches(observation))
    }

    fn find_mut(&mut self, observation: &Observation) -> Option<&mut Memory> {
        self.long_term.iter_mut().find(|m| m.matches(observation))
    }

    /// Take in a batch of sightings.
    ///
    /// Known memories are reinforced on the spot using `strength_fn` for
    /// their fresh base strength; everything else waits in the short-term
    /// buffer for the next [`tick`](Self::tick).
    pub fn record_observations<I, F>(&mut self, observations: I, now: SimTime, mut strength_fn: F)
    where
        I: IntoIterator<Item = Observation>,
        F: FnMut(&Observation) -> f32,
    {
        let bonus = self.config.reinforcement_bonus;
        let cap = self.config.max_strength;
        for observation in observations {
            let fresh_strength = strength_fn(&observation);
            if let Some(memory) = self.find_mut(&observation) {
                memory.initial_strength = (fresh_strength + bonus).min(cap);
                memory.last_seen = now;
                tracing::trace!(kind = ?memory.kind(), strength = memory.initial_strength, "memory reinforced");
            } else if !self.short_term.iter().any(|o| o.matches(&observation)) {
                self.short_term.push(observation);
            }
        }
    }

    /// Prune dead memories, then fold the short-term buffer into long-term memory
    pub fn tick<F>(&mut self, now: SimTime, decay_per_second: f32, mut score_fn: F) -> Vec<CognitionEvent>
    where
        F: FnMut(&Observation) -> ScoredObservation,
    {
        self.long_term
            .retain(|m| m.current_strength(now, decay_per_second) > 0.0);

        if self.short_term.is_empty() {
            return Vec::new();
        }

        let pending = std::mem::take(&mut self.short_term);
        let mut scored: Vec<ScoredObservation> = pending
            .iter()
            .filter(|o| o.target.is_present())
            .map(|o| score_fn(o))
            .filter(|s| s.candidate_strength > 0.0)
            .collect();
        scored.sort_by_key(|s| Reverse(OrderedFloat(s.decision_weight)));

        let cap = self.config.max_strength;
        let mut events = Vec::new();
        for candidate in scored {
            if self.find(&candidate.observation).is_some() {
                continue;
            }
            let strength = candidate.candidate_strength.min(cap);
            events.push(CognitionEvent::MemoryAcquired {
                kind: candidate.observation.kind,
                position: candidate.observation.position,
                strength,
            });
            self.long_term
                .push(Memory::new(candidate.observation, now, strength));
        }
        events
    }

    /// A live memory of this exact sighting exists
    pub fn has_active_memory(&self, observation: &Observation, now: SimTime, decay_per_second: f32) -> bool {
        self.long_term
            .iter()
            .any(|m| m.matches(observation) && m.is_active(now, decay_per_second))
    }

    /// Insert a memory directly, capped at the maximum strength.
    /// Replaces a memory of the same sighting.
    pub fn remember(&mut self, mut memory: Memory) {
        memory.initial_strength = memory.initial_strength.min(self.config.max_strength);
        match self.find_mut(&memory.observation) {
            Some(existing) => *existing = memory,
            None => self.long_term.push(memory),
        }
    }

    /// Learn another agent's long-term memories.
    ///
    /// Unknown places enter with a reduced second-hand strength; places
    /// already known get half a reinforcement. Their memories of this agent
    /// are skipped. Returns how many memories were new. Merging a store with
    /// itself (or a copy of itself) changes nothing.
    pub fn merge_from(&mut self, other: &SensoryMemory, now: SimTime) -> usize {
        if other.owner == self.owner {
            return 0;
        }

        let cap = self.config.max_strength;
        let half_bonus = self.config.reinforcement_bonus * 0.5;
        let imported_base = self.config.base_strength * self.config.imported_strength_factor;
        let mut learned = 0;

        for theirs in &other.long_term {
            if theirs.target_id() == self.owner {
                continue;
            }
            match self.find_mut(&theirs.observation) {
                Some(mine) => {
                    mine.initial_strength = (mine.initial_strength + half_bonus).min(cap);
                    mine.last_seen = now;
                }
                None => {
                    let strength =
                        (imported_base * self.config.multipliers.for_kind(theirs.kind())).min(cap);
                    self.long_term
                        .push(Memory::new(theirs.observation.clone(), now, strength));
                    learned += 1;
                }
            }
        }
        learned
    }

    pub fn len(&self) -> usize {
        self.long_term.len()
    }

    pub fn is_empty(&self) -> bool {
        self.long_term.is_empty()
    }
}
