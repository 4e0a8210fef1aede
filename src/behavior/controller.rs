//! Behavior controller: drives the active state and picks the next one

use std::f32::consts::TAU;

use rand::Rng;

use crate::behavior::state::{BehaviorState, ConsumeKind, Intent, StateKind};
use crate::behavior::TickContext;
use crate::cognition::collaborators::CollaboratorKind;
use crate::cognition::feelings::DriveKind;
use crate::cognition::scoring::TargetEvaluator;
use crate::core::config::{BehaviorConfig, PhysiologyConfig};
use crate::core::types::{EntityId, Vec2};
use crate::entity::thoughts::CognitionEvent;

/// Transition priority: first matching state wins
pub const STATE_PRIORITY: [StateKind; 6] = [
    StateKind::Drink,
    StateKind::Eat,
    StateKind::Shake,
    StateKind::Talk,
    StateKind::Move,
    StateKind::Idle,
];

#[derive(Debug, Clone)]
pub struct BehaviorController {
    config: BehaviorConfig,
    /// In [`STATE_PRIORITY`] order
    states: Vec<BehaviorState>,
    current: usize,
    started: bool,
    check_timer: f32,
    lock_timer: f32,
    intent: Intent,
}

impl BehaviorController {
    pub fn new(owner: EntityId, config: BehaviorConfig, physiology: &PhysiologyConfig) -> Self {
        let states: Vec<BehaviorState> = STATE_PRIORITY
            .iter()
            .map(|kind| match kind {
                StateKind::Drink => BehaviorState::consume(ConsumeKind::Drink, physiology.drink_full_level),
                StateKind::Eat => BehaviorState::consume(ConsumeKind::Eat, physiology.eat_full_level),
                StateKind::Shake => BehaviorState::consume(ConsumeKind::Shake, physiology.shake_full_level),
                StateKind::Talk => BehaviorState::talk(),
                StateKind::Move => BehaviorState::Move { issued: None },
                StateKind::Idle => BehaviorState::Idle,
            })
            .collect();
        let idle = Self::index_of(StateKind::Idle);
        Self {
            config,
            states,
            current: idle,
            started: false,
            check_timer: 0.0,
            lock_timer: 0.0,
            intent: Intent::new(owner),
        }
    }

    fn index_of(kind: StateKind) -> usize {
        STATE_PRIORITY
            .iter()
            .position(|k| *k == kind)
            .unwrap_or(STATE_PRIORITY.len() - 1)
    }

    pub fn current_state(&self) -> StateKind {
        self.states[self.current].kind()
    }

    pub fn current_drive(&self) -> DriveKind {
        self.intent.drive
    }

    pub fn desired_target(&self) -> Option<Vec2> {
        self.intent.desired_target
    }

    pub fn set_desired_target(&mut self, target: Option<Vec2>) {
        self.intent.desired_target = target;
    }

    pub fn clear_desired_target(&mut self) {
        self.intent.clear_desired_target();
    }

    pub fn lock_remaining(&self) -> f32 {
        self.lock_timer
    }

    pub fn was_reported_missing(&self, kind: CollaboratorKind) -> bool {
        self.intent.missing.was_reported(kind)
    }

    pub fn report_missing(&mut self, kind: CollaboratorKind) {
        self.intent.missing.report(self.intent.owner, kind);
    }

    /// Enter the default state on first use. Idempotent.
    pub fn ensure_started(&mut self, ctx: &mut TickContext<'_, '_>) {
        if self.started {
            return;
        }
        self.started = true;
        let idle = Self::index_of(StateKind::Idle);
        self.current = idle;
        self.states[idle].enter(ctx, &mut self.intent);
        self.lock_timer = self.config.state_lock_duration;
    }

    /// Run the active state, then evaluate transitions if the timers allow
    pub fn process(&mut self, ctx: &mut TickContext<'_, '_>) {
        self.ensure_started(ctx);
        self.states[self.current].process(ctx, &mut self.intent);

        self.lock_timer = (self.lock_timer - ctx.dt).max(0.0);
        self.check_timer -= ctx.dt;

        if self.lock_timer == 0.0 && self.check_timer <= 0.0 {
            self.check_timer = self.config.condition_check_cooldown;
            self.evaluate_transitions(ctx);
        }
    }

    fn evaluate_transitions(&mut self, ctx: &mut TickContext<'_, '_>) {
        for index in 0..self.states.len() {
            if index != self.current && self.states[index].should_transition(ctx, &self.intent) {
                self.change_state(index, ctx);
                return;
            }
        }
    }

    fn change_state(&mut self, index: usize, ctx: &mut TickContext<'_, '_>) {
        if index == self.current {
            return;
        }
        let from = self.states[self.current].kind();
        let to = self.states[index].kind();
        tracing::debug!(agent = %self.intent.owner, ?from, ?to, "behavior state changed");

        self.states[self.current].exit(ctx, &mut self.intent);
        self.current = index;
        self.states[index].enter(ctx, &mut self.intent);
        self.lock_timer = self.config.state_lock_duration;
        ctx.brain.push_event(CognitionEvent::StateChanged { from, to });

        if to == StateKind::Idle {
            self.on_drive_selected(self.intent.drive, ctx);
        }
    }

    /// Switch immediately, ignoring conditions and timers
    pub fn force_state(&mut self, kind: StateKind, ctx: &mut TickContext<'_, '_>) {
        self.change_state(Self::index_of(kind), ctx);
    }

    /// React to a (new) dominant drive by choosing where to go
    pub fn on_drive_selected(&mut self, drive: DriveKind, ctx: &mut TickContext<'_, '_>) {
        self.intent.drive = drive;
        let evaluator = match drive {
            DriveKind::Hunger => TargetEvaluator::Food,
            DriveKind::Thirst => TargetEvaluator::Water,
            DriveKind::Boredom => {
                self.intent.desired_target = Some(self.wander_point(ctx));
                return;
            }
            DriveKind::Fear | DriveKind::Heat => return,
        };

        match ctx
            .brain
            .best_target(evaluator, ctx.position, ctx.now, ctx.decay_per_second)
        {
            Some(choice) => {
                ctx.brain.push_event(CognitionEvent::TargetSelected {
                    drive,
                    position: choice.position,
                    remembered: choice.remembered,
                });
                self.intent.desired_target = Some(choice.position);
            }
            None => self.intent.desired_target = Some(self.wander_point(ctx)),
        }
    }

    /// Somewhere unexplored, or a random point around the agent
    fn wander_point(&mut self, ctx: &mut TickContext<'_, '_>) -> Vec2 {
        let explored = match ctx.surroundings.explorer.as_deref_mut() {
            Some(explorer) => explorer.random_unexplored_point(ctx.position),
            None => {
                self.intent.missing.report(self.intent.owner, CollaboratorKind::Explorer);
                None
            }
        };
        let point = explored.unwrap_or_else(|| {
            let rng = ctx.brain.rng();
            let angle = rng.gen::<f32>() * TAU;
            let distance = rng.gen::<f32>().max(self.config.wander_min_fraction) * self.config.wander_radius_max;
            ctx.position + Vec2::from_angle(angle) * distance
        });
        ctx.brain.push_event(CognitionEvent::Wandering { position: point });
        point
    }
}
