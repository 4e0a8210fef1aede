//! Integration tests for the behavior state machine
//!
//! The controller is driven tick by tick with hand-built surroundings:
//! - State lock and transition cooldown
//! - Consume states gated by need level and adjacency
//! - Moving to a desired target
//! - Talking only when bored and next to a willing peer
//! - Missing collaborators fall back to neutral defaults

use std::cell::Cell;
use std::rc::Rc;

use creature_mind::behavior::controller::BehaviorController;
use creature_mind::behavior::state::StateKind;
use creature_mind::behavior::{Surroundings, TickContext};
use creature_mind::cognition::brain::Brain;
use creature_mind::cognition::collaborators::{
    CollaboratorKind, Consumable, ConsumeEffect, Mover, NeedLevels, PeerDirectory,
};
use creature_mind::cognition::feelings::DriveKind;
use creature_mind::cognition::memory_store::SensoryMemory;
use creature_mind::core::config::{BehaviorConfig, CognitionConfig};
use creature_mind::core::types::{EntityId, SimTime, Vec2};
use creature_mind::entity::thoughts::CognitionEvent;
use creature_mind::entity::observation::{ObservationKind, Perceivable};
use creature_mind::entity::social::SocialLedger;

struct Pantry {
    id: EntityId,
    kind: ObservationKind,
    uses: Cell<u32>,
}

impl Pantry {
    fn new(kind: ObservationKind) -> Rc<Self> {
        Rc::new(Self { id: EntityId::new(), kind, uses: Cell::new(0) })
    }
}

impl Perceivable for Pantry {
    fn id(&self) -> EntityId {
        self.id
    }

    fn is_considerable(&self) -> bool {
        true
    }
}

impl Consumable for Pantry {
    fn kind(&self) -> ObservationKind {
        self.kind
    }

    fn consume(&self) -> ConsumeEffect {
        self.uses.set(self.uses.get() + 1);
        match self.kind {
            ObservationKind::Water => ConsumeEffect::Hydrate(1.0),
            ObservationKind::Fruit => ConsumeEffect::Nourish(0.1),
            _ => ConsumeEffect::Nothing,
        }
    }
}

#[derive(Default)]
struct TestMover {
    target: Option<Vec2>,
    orders: u32,
}

impl Mover for TestMover {
    fn move_to(&mut self, target: Vec2) {
        self.target = Some(target);
        self.orders += 1;
    }

    fn stop_moving(&mut self) {
        self.target = None;
    }

    fn has_arrived(&self) -> bool {
        self.target.is_none()
    }
}

/// A mover that never starts on an order
#[derive(Default)]
struct StuckMover {
    orders: u32,
}

impl Mover for StuckMover {
    fn move_to(&mut self, _target: Vec2) {
        self.orders += 1;
    }

    fn stop_moving(&mut self) {}

    fn has_arrived(&self) -> bool {
        true
    }
}

/// Peers that always want to talk. Only those in `present` still exist.
struct Crowd {
    memory: SensoryMemory,
    present: Vec<EntityId>,
}

impl Crowd {
    fn new(present: Vec<EntityId>) -> Self {
        let memory = SensoryMemory::new(EntityId::new(), CognitionConfig::default().memory);
        Self { memory, present }
    }
}

impl PeerDirectory for Crowd {
    fn memory_of(&self, peer: EntityId) -> Option<&SensoryMemory> {
        self.present.contains(&peer).then_some(&self.memory)
    }

    fn is_willing_to_talk(&self, _peer: EntityId, _with: EntityId, _now: SimTime) -> bool {
        true
    }
}

struct Rig {
    controller: BehaviorController,
    brain: Brain,
    social: SocialLedger,
}

impl Rig {
    fn new(behavior: BehaviorConfig) -> Self {
        let owner = EntityId::new();
        let config = CognitionConfig { behavior: behavior.clone(), ..CognitionConfig::default() };
        Self {
            controller: BehaviorController::new(owner, behavior, &config.physiology),
            brain: Brain::new(owner, &config, 3),
            social: SocialLedger::new(owner, config.social.clone()),
        }
    }

    /// Run `ticks` ticks of `dt`, returning the state after each one and the effects
    fn run(
        &mut self,
        ticks: usize,
        dt: f32,
        needs: NeedLevels,
        surroundings: &mut Surroundings<'_>,
    ) -> (Vec<StateKind>, Vec<ConsumeEffect>) {
        let mut states = Vec::new();
        let mut effects = Vec::new();
        for i in 0..ticks {
            let mut ctx = TickContext {
                now: i as f32 * dt,
                dt,
                position: Vec2::ZERO,
                needs,
                decay_per_second: 2.0,
                brain: &mut self.brain,
                social: &mut self.social,
                surroundings: &mut *surroundings,
                effects: Vec::new(),
            };
            self.controller.process(&mut ctx);
            effects.extend(ctx.effects);
            states.push(self.controller.current_state());
        }
        (states, effects)
    }

    fn select(&mut self, drive: DriveKind, surroundings: &mut Surroundings<'_>) {
        let mut ctx = TickContext {
            now: 0.0,
            dt: 0.1,
            position: Vec2::ZERO,
            needs: NeedLevels::default(),
            decay_per_second: 2.0,
            brain: &mut self.brain,
            social: &mut self.social,
            surroundings,
            effects: Vec::new(),
        };
        self.controller.on_drive_selected(drive, &mut ctx);
    }
}

fn entries(states: &[StateKind], kind: StateKind) -> usize {
    let first = usize::from(states.first() == Some(&kind));
    first + states.windows(2).filter(|w| w[0] != kind && w[1] == kind).count()
}

fn locked_config() -> BehaviorConfig {
    BehaviorConfig {
        condition_check_cooldown: 0.0,
        state_lock_duration: 1.0,
        ..BehaviorConfig::default()
    }
}

#[test]
fn test_no_switch_while_locked() {
    let mut rig = Rig::new(locked_config());
    let water: Rc<dyn Consumable> = Pantry::new(ObservationKind::Water);
    let adjacent = vec![water];
    let mut surroundings = Surroundings::new().with_adjacent(&adjacent);
    let needs = NeedLevels { hunger: 0.0, thirst: 0.9 };

    let (states, effects) = rig.run(15, 0.1, needs, &mut surroundings);
    // The 1 s lock from entering Idle holds for at least nine 0.1 s ticks
    assert!(states[..9].iter().all(|s| *s == StateKind::Idle));
    assert!(states.contains(&StateKind::Drink));
    assert_eq!(effects, vec![ConsumeEffect::Hydrate(1.0)]);
}

#[test]
fn test_sated_agent_does_not_eat() {
    let mut rig = Rig::new(BehaviorConfig::default());
    let fruit: Rc<dyn Consumable> = Pantry::new(ObservationKind::Fruit);
    let adjacent = vec![fruit];
    let mut surroundings = Surroundings::new().with_adjacent(&adjacent);
    let needs = NeedLevels { hunger: 0.05, thirst: 0.0 };

    let (states, effects) = rig.run(40, 0.1, needs, &mut surroundings);
    assert!(!states.contains(&StateKind::Eat));
    assert!(effects.is_empty());
}

#[test]
fn test_hungry_agent_eats_once_per_visit() {
    let mut rig = Rig::new(BehaviorConfig::default());
    let pantry = Pantry::new(ObservationKind::Fruit);
    let adjacent: Vec<Rc<dyn Consumable>> = vec![pantry.clone()];
    let mut surroundings = Surroundings::new().with_adjacent(&adjacent);
    let needs = NeedLevels { hunger: 0.5, thirst: 0.0 };

    let (states, effects) = rig.run(5, 0.1, needs, &mut surroundings);
    assert_eq!(states.last(), Some(&StateKind::Eat));
    assert_eq!(effects, vec![ConsumeEffect::Nourish(0.1)]);
    assert_eq!(pantry.uses.get(), 1);
}

#[test]
fn test_shake_needs_more_hunger_than_eat() {
    let mut rig = Rig::new(BehaviorConfig::default());
    let tree: Rc<dyn Consumable> = Pantry::new(ObservationKind::FruitTree);
    let adjacent = vec![tree];
    let mut surroundings = Surroundings::new().with_adjacent(&adjacent);

    let (states, _) = rig.run(20, 0.1, NeedLevels { hunger: 0.15, thirst: 0.0 }, &mut surroundings);
    assert!(!states.contains(&StateKind::Shake));

    let (states, effects) = rig.run(20, 0.1, NeedLevels { hunger: 0.3, thirst: 0.0 }, &mut surroundings);
    assert!(states.contains(&StateKind::Shake));
    assert!(!effects.is_empty());
    assert!(effects.iter().all(|e| *e == ConsumeEffect::Nothing));
}

#[test]
fn test_desired_target_is_handed_to_mover() {
    let mut rig = Rig::new(BehaviorConfig::default());
    let mut mover = TestMover::default();
    let mut surroundings = Surroundings::new().with_mover(&mut mover);

    // Start up, then ask to go somewhere
    rig.run(1, 0.1, NeedLevels::default(), &mut surroundings);
    rig.controller.set_desired_target(Some(Vec2::new(80.0, 0.0)));
    let (states, _) = rig.run(10, 0.1, NeedLevels::default(), &mut surroundings);

    assert_eq!(states.last(), Some(&StateKind::Move));
    assert_eq!(rig.controller.desired_target(), None);
    drop(surroundings);
    assert_eq!(mover.target, Some(Vec2::new(80.0, 0.0)));
    assert_eq!(mover.orders, 1);
}

#[test]
fn test_wander_without_explorer_falls_back_to_random_point() {
    let mut rig = Rig::new(BehaviorConfig::default());
    let mut surroundings = Surroundings::new();
    let mut ctx = TickContext {
        now: 0.0,
        dt: 0.1,
        position: Vec2::new(500.0, 500.0),
        needs: NeedLevels::default(),
        decay_per_second: 2.0,
        brain: &mut rig.brain,
        social: &mut rig.social,
        surroundings: &mut surroundings,
        effects: Vec::new(),
    };
    rig.controller.on_drive_selected(DriveKind::Boredom, &mut ctx);

    let target = rig.controller.desired_target().unwrap();
    let distance = target.distance(&Vec2::new(500.0, 500.0));
    // Between 0.2 and 1.0 of the 200 unit wander radius
    assert!((40.0 - 1e-3..=200.0 + 1e-3).contains(&distance), "distance {}", distance);
    assert!(rig.controller.was_reported_missing(CollaboratorKind::Explorer));
}

#[test]
fn test_hunger_without_food_known_wanders() {
    let mut rig = Rig::new(BehaviorConfig::default());
    let mut surroundings = Surroundings::new();
    let mut ctx = TickContext {
        now: 0.0,
        dt: 0.1,
        position: Vec2::ZERO,
        needs: NeedLevels { hunger: 0.9, thirst: 0.0 },
        decay_per_second: 2.0,
        brain: &mut rig.brain,
        social: &mut rig.social,
        surroundings: &mut surroundings,
        effects: Vec::new(),
    };
    rig.controller.on_drive_selected(DriveKind::Hunger, &mut ctx);
    assert_eq!(rig.controller.current_drive(), DriveKind::Hunger);
    assert!(rig.controller.desired_target().is_some());
}

#[test]
fn test_force_state_ignores_lock() {
    let mut rig = Rig::new(locked_config());
    let mut surroundings = Surroundings::new();
    rig.run(1, 0.1, NeedLevels::default(), &mut surroundings);
    assert!(rig.controller.lock_remaining() > 0.0);

    let mut ctx = TickContext {
        now: 0.1,
        dt: 0.1,
        position: Vec2::ZERO,
        needs: NeedLevels::default(),
        decay_per_second: 2.0,
        brain: &mut rig.brain,
        social: &mut rig.social,
        surroundings: &mut surroundings,
        effects: Vec::new(),
    };
    rig.controller.force_state(StateKind::Talk, &mut ctx);
    assert_eq!(rig.controller.current_state(), StateKind::Talk);
    assert!((rig.controller.lock_remaining() - 1.0).abs() < 1e-6);
}

#[test]
fn test_lock_holds_after_switch_to_move() {
    let mut rig = Rig::new(locked_config());
    let mut surroundings = Surroundings::new();
    rig.run(1, 0.1, NeedLevels::default(), &mut surroundings);
    rig.controller.set_desired_target(Some(Vec2::new(80.0, 0.0)));

    let (states, _) = rig.run(40, 0.1, NeedLevels::default(), &mut surroundings);
    let switched = states.iter().position(|s| *s == StateKind::Move).unwrap();
    // Move has nothing left to do after one tick, but the 1 s lock keeps it
    assert!(states[switched..switched + 10].iter().all(|s| *s == StateKind::Move), "{:?}", states);
    assert!(states[switched + 10..].contains(&StateKind::Idle));
}

#[test]
fn test_refused_move_keeps_desired_target() {
    let mut rig = Rig::new(BehaviorConfig::default());
    let mut mover = StuckMover::default();
    let mut surroundings = Surroundings::new().with_mover(&mut mover);
    let target = Vec2::new(80.0, 0.0);

    rig.run(1, 0.1, NeedLevels::default(), &mut surroundings);
    rig.controller.set_desired_target(Some(target));
    let (states, _) = rig.run(10, 0.1, NeedLevels::default(), &mut surroundings);

    assert_eq!(states.last(), Some(&StateKind::Move));
    assert_eq!(rig.controller.desired_target(), Some(target));
    drop(surroundings);
    // Re-issued every tick until the mover starts
    assert!(mover.orders > 1, "orders {}", mover.orders);
}

#[test]
fn test_hungry_agent_next_to_willing_peer_does_not_talk() {
    let mut rig = Rig::new(BehaviorConfig::default());
    let peer = EntityId::new();
    let crowd = Crowd::new(vec![peer]);
    let nearby = vec![peer];
    let mut surroundings = Surroundings::new().with_peers(&nearby, &crowd);
    rig.select(DriveKind::Hunger, &mut surroundings);

    let (states, _) = rig.run(30, 0.1, NeedLevels { hunger: 0.9, thirst: 0.0 }, &mut surroundings);
    assert!(!states.contains(&StateKind::Talk), "{:?}", states);
}

#[test]
fn test_bored_agent_talks_to_willing_peer() {
    let mut rig = Rig::new(BehaviorConfig::default());
    let peer = EntityId::new();
    let crowd = Crowd::new(vec![peer]);
    let nearby = vec![peer];
    let mut surroundings = Surroundings::new().with_peers(&nearby, &crowd);

    let (states, _) = rig.run(30, 0.1, NeedLevels::default(), &mut surroundings);
    assert_eq!(rig.controller.current_drive(), DriveKind::Boredom);
    assert!(states.contains(&StateKind::Talk), "{:?}", states);
    assert!(rig.social.knows(peer));
}

#[test]
fn test_bored_agent_alone_does_not_talk() {
    let mut rig = Rig::new(BehaviorConfig::default());
    let crowd = Crowd::new(vec![EntityId::new()]);
    let nearby: Vec<EntityId> = Vec::new();
    let mut surroundings = Surroundings::new().with_peers(&nearby, &crowd);

    let (states, _) = rig.run(30, 0.1, NeedLevels::default(), &mut surroundings);
    assert!(!states.contains(&StateKind::Talk), "{:?}", states);
}

#[test]
fn test_one_conversation_per_talk_visit() {
    let mut rig = Rig::new(BehaviorConfig::default());
    let peer = EntityId::new();
    let crowd = Crowd::new(vec![peer]);
    let nearby = vec![peer];
    let mut surroundings = Surroundings::new().with_peers(&nearby, &crowd);

    // Well past the 5 s discussion, well short of the 20 s cooldown
    let (states, _) = rig.run(150, 0.1, NeedLevels::default(), &mut surroundings);
    assert_eq!(entries(&states, StateKind::Talk), 1, "{:?}", states);
    assert_ne!(states.last(), Some(&StateKind::Talk));

    let talks = rig
        .brain
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, CognitionEvent::TalkedWith { .. }))
        .count();
    assert_eq!(talks, 1);
}

#[test]
fn test_partner_gone_mid_conversation_ends_talk_quietly() {
    let mut rig = Rig::new(BehaviorConfig::default());
    let peer = EntityId::new();
    // Willing to start, then gone from the directory
    let crowd = Crowd::new(Vec::new());
    let nearby = vec![peer];
    let mut surroundings = Surroundings::new().with_peers(&nearby, &crowd);

    let (states, _) = rig.run(80, 0.1, NeedLevels::default(), &mut surroundings);
    assert!(states.contains(&StateKind::Talk));
    assert_ne!(states.last(), Some(&StateKind::Talk));
    assert!(!rig.controller.was_reported_missing(CollaboratorKind::Peers));
    assert!(!rig
        .brain
        .drain_events()
        .iter()
        .any(|e| matches!(e, CognitionEvent::TalkedWith { .. })));
}
