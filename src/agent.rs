//! One creature: brain, behavior controller, social ledger and the
//! collaborators it owns outright

use std::fmt;

use crate::behavior::controller::BehaviorController;
use crate::behavior::state::StateKind;
use crate::behavior::{Surroundings, TickContext};
use crate::cognition::brain::Brain;
use crate::cognition::collaborators::{
    AgeProvider, CollaboratorKind, ConsumeEffect, NeedLevels, PhysiologyProvider, TraitKind, TraitProvider,
};
use crate::cognition::feelings::DriveKind;
use crate::cognition::memory_store::SensoryMemory;
use crate::core::config::CognitionConfig;
use crate::core::types::{EntityId, SimTime, Vec2};
use crate::entity::observation::Observation;
use crate::entity::social::SocialLedger;
use crate::entity::thoughts::{CognitionEvent, ThoughtBuffer};

pub struct Agent {
    id: EntityId,
    pub position: Vec2,
    brain: Brain,
    controller: BehaviorController,
    social: SocialLedger,
    thoughts: ThoughtBuffer,
    physiology: Option<Box<dyn PhysiologyProvider>>,
    traits: Option<Box<dyn TraitProvider>>,
    age: Option<Box<dyn AgeProvider>>,
    /// Memory decay per second before trait and age scaling
    base_decay: f32,
}

impl Agent {
    pub fn new(id: EntityId, position: Vec2, config: &CognitionConfig, seed: u64) -> Self {
        Self {
            id,
            position,
            brain: Brain::new(id, config, seed),
            controller: BehaviorController::new(id, config.behavior.clone(), &config.physiology),
            social: SocialLedger::new(id, config.social.clone()),
            thoughts: ThoughtBuffer::new(),
            physiology: None,
            traits: None,
            age: None,
            base_decay: config.memory.base_decay_per_second,
        }
    }

    pub fn with_physiology(mut self, physiology: impl PhysiologyProvider + 'static) -> Self {
        self.physiology = Some(Box::new(physiology));
        self
    }

    pub fn with_traits(mut self, traits: impl TraitProvider + 'static) -> Self {
        self.traits = Some(Box::new(traits));
        self
    }

    pub fn with_age(mut self, age: impl AgeProvider + 'static) -> Self {
        self.age = Some(Box::new(age));
        self
    }

    pub fn with_brain(mut self, brain: Brain) -> Self {
        self.brain = brain;
        self
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn brain(&self) -> &Brain {
        &self.brain
    }

    pub fn brain_mut(&mut self) -> &mut Brain {
        &mut self.brain
    }

    pub fn memory(&self) -> &SensoryMemory {
        self.brain.memory()
    }

    pub fn controller(&self) -> &BehaviorController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut BehaviorController {
        &mut self.controller
    }

    pub fn social(&self) -> &SocialLedger {
        &self.social
    }

    pub fn thoughts(&self) -> &ThoughtBuffer {
        &self.thoughts
    }

    pub fn state(&self) -> StateKind {
        self.controller.current_state()
    }

    pub fn dominant_drive(&self) -> DriveKind {
        self.brain.dominant_drive()
    }

    pub fn physiology(&self) -> Option<&dyn PhysiologyProvider> {
        self.physiology.as_deref()
    }

    pub fn physiology_mut(&mut self) -> Option<&mut (dyn PhysiologyProvider + 'static)> {
        self.physiology.as_deref_mut()
    }

    /// Current needs; zero without a physiology
    pub fn need_levels(&self) -> NeedLevels {
        self.physiology
            .as_deref()
            .map(|p| NeedLevels { hunger: p.hunger_level(), thirst: p.thirst_level() })
            .unwrap_or_default()
    }

    pub fn trait_multiplier(&self, kind: TraitKind) -> f32 {
        self.traits.as_deref().map_or(1.0, |t| t.multiplier(kind))
    }

    /// Heritable speed scaled by life stage
    pub fn speed_multiplier(&self) -> f32 {
        let stage = self.age.as_deref().map_or(1.0, |a| a.speed_factor());
        self.trait_multiplier(TraitKind::Speed) * stage
    }

    /// Memory decay per second after trait and life stage scaling
    pub fn effective_decay(&self) -> f32 {
        let stage = self.age.as_deref().map_or(1.0, |a| a.memory_decay_factor());
        self.base_decay * self.trait_multiplier(TraitKind::MemoryDecay) * stage
    }

    /// Whether this agent would accept a conversation with `other` right now
    pub fn is_willing_to_talk(&self, other: EntityId, now: SimTime) -> bool {
        self.social.can_talk_to(other, now)
    }

    /// Push a batch of sightings into the brain
    pub fn perceive<I>(&mut self, observations: I, now: SimTime)
    where
        I: IntoIterator<Item = Observation>,
    {
        let needs = self.need_levels();
        self.brain.perceive(observations, now, needs);
    }

    /// One full cognitive tick.
    ///
    /// Order: physiology and age advance, the brain folds in sightings and
    /// re-arbitrates drives, a drive change re-targets, then the active
    /// behavior state runs. Returns everything that happened, which is also
    /// appended to the thought log.
    pub fn tick(&mut self, now: SimTime, dt: f32, surroundings: &mut Surroundings<'_>) -> Vec<CognitionEvent> {
        self.advance_body(dt);

        let needs = self.need_levels();
        let decay = self.effective_decay();
        let changed = self.brain.process(now, decay, needs);

        let mut ctx = TickContext {
            now,
            dt,
            position: self.position,
            needs,
            decay_per_second: decay,
            brain: &mut self.brain,
            social: &mut self.social,
            surroundings,
            effects: Vec::new(),
        };
        self.controller.ensure_started(&mut ctx);
        if let Some(drive) = changed {
            self.controller.on_drive_selected(drive, &mut ctx);
        }
        self.controller.process(&mut ctx);
        let effects = ctx.effects;

        for effect in effects {
            self.apply_effect(effect);
        }

        let events = self.brain.drain_events();
        for event in &events {
            self.thoughts.add(now, event.clone());
        }
        events
    }

    fn advance_body(&mut self, dt: f32) {
        if self.traits.is_none() {
            self.controller.report_missing(CollaboratorKind::Traits);
        }

        match self.physiology.as_deref_mut() {
            Some(physiology) => {
                physiology.update(dt);
                for need in physiology.take_alerts() {
                    tracing::debug!(agent = %self.id, ?need, "need became urgent");
                    self.brain.push_event(CognitionEvent::NeedUrgent { need });
                }
            }
            None => self.controller.report_missing(CollaboratorKind::Physiology),
        }

        match self.age.as_deref_mut() {
            Some(age) => {
                age.update(dt);
                for (from, to) in age.take_stage_changes() {
                    self.brain.push_event(CognitionEvent::LifeStageChanged { from, to });
                }
            }
            None => self.controller.report_missing(CollaboratorKind::Age),
        }
    }

    fn apply_effect(&mut self, effect: ConsumeEffect) {
        let Some(physiology) = self.physiology.as_deref_mut() else {
            self.controller.report_missing(CollaboratorKind::Physiology);
            return;
        };
        match effect {
            ConsumeEffect::Nourish(amount) => physiology.eat(amount),
            ConsumeEffect::Hydrate(amount) => physiology.drink(amount),
            ConsumeEffect::Nothing => {}
        }
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("id", &self.id)
            .field("position", &self.position)
            .field("state", &self.state())
            .field("drive", &self.dominant_drive())
            .field("memories", &self.memory().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::needs::Physiology;
    use crate::genetics::life_stage::Growth;
    use crate::genetics::phenotype::Phenotype;

    fn agent() -> Agent {
        let config = CognitionConfig::default();
        Agent::new(EntityId::new(), Vec2::ZERO, &config, 1)
    }

    #[test]
    fn test_bare_agent_uses_neutral_defaults() {
        let mut agent = agent();
        assert_eq!(agent.need_levels(), NeedLevels::default());
        assert_eq!(agent.speed_multiplier(), 1.0);

        let mut surroundings = Surroundings::new();
        agent.tick(0.0, 0.1, &mut surroundings);
        assert!(agent.controller().was_reported_missing(CollaboratorKind::Physiology));
        assert!(agent.controller().was_reported_missing(CollaboratorKind::Age));
        assert!(agent.controller().was_reported_missing(CollaboratorKind::Traits));
        assert_eq!(agent.dominant_drive(), DriveKind::Boredom);
    }

    #[test]
    fn test_decay_scales_with_traits_and_age() {
        let config = CognitionConfig::default();
        let traits = Phenotype { memory_decay: 1.2, ..Phenotype::default() };
        let agent = agent()
            .with_traits(traits)
            .with_age(Growth::new(config.growth.clone()));
        // Babies forget 1.5x faster
        let expected = config.memory.base_decay_per_second * 1.2 * 1.5;
        assert!((agent.effective_decay() - expected).abs() < 1e-5);
    }

    #[test]
    fn test_first_tick_logs_drive_and_wander() {
        let config = CognitionConfig::default();
        let mut agent = agent().with_physiology(Physiology::new(&config.physiology));
        let mut surroundings = Surroundings::new();
        let events = agent.tick(0.0, 0.1, &mut surroundings);

        assert!(events
            .iter()
            .any(|e| matches!(e, CognitionEvent::DriveChanged { from: None, to: DriveKind::Boredom })));
        assert!(events.iter().any(|e| matches!(e, CognitionEvent::Wandering { .. })));
        assert_eq!(agent.thoughts().len(), events.len());
    }
}
