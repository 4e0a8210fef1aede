//! The behavior states and their transition conditions

use serde::{Deserialize, Serialize};

use crate::behavior::TickContext;
use crate::cognition::collaborators::{CollaboratorKind, MissingCollaborators, Mover};
use crate::cognition::feelings::DriveKind;
use crate::core::types::{EntityId, Vec2};
use crate::entity::observation::ObservationKind;
use crate::entity::thoughts::CognitionEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateKind {
    Idle,
    Move,
    Drink,
    Eat,
    Shake,
    Talk,
}

/// Which resource a consume state works on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsumeKind {
    Drink,
    Eat,
    Shake,
}

impl ConsumeKind {
    pub fn resource(self) -> ObservationKind {
        match self {
            ConsumeKind::Drink => ObservationKind::Water,
            ConsumeKind::Eat => ObservationKind::Fruit,
            ConsumeKind::Shake => ObservationKind::FruitTree,
        }
    }

    pub fn state_kind(self) -> StateKind {
        match self {
            ConsumeKind::Drink => StateKind::Drink,
            ConsumeKind::Eat => StateKind::Eat,
            ConsumeKind::Shake => StateKind::Shake,
        }
    }
}

/// What the controller wants, shared with the active state
#[derive(Debug, Clone)]
pub struct Intent {
    pub owner: EntityId,
    /// Where the current drive wants to go, until the mover takes it
    pub desired_target: Option<Vec2>,
    pub drive: DriveKind,
    pub missing: MissingCollaborators,
}

impl Intent {
    pub fn new(owner: EntityId) -> Self {
        Self {
            owner,
            desired_target: None,
            drive: DriveKind::Boredom,
            missing: MissingCollaborators::new(),
        }
    }

    pub fn clear_desired_target(&mut self) {
        self.desired_target = None;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BehaviorState {
    Idle,
    Move {
        /// Target handed to the mover on this visit
        issued: Option<Vec2>,
    },
    Consume {
        kind: ConsumeKind,
        /// Need level at or below which the agent is "full"
        full_level: f32,
        consumed: bool,
    },
    Talk {
        talking: bool,
        talked: bool,
    },
}

impl BehaviorState {
    pub fn consume(kind: ConsumeKind, full_level: f32) -> Self {
        BehaviorState::Consume { kind, full_level, consumed: false }
    }

    pub fn talk() -> Self {
        BehaviorState::Talk { talking: false, talked: false }
    }

    pub fn kind(&self) -> StateKind {
        match self {
            BehaviorState::Idle => StateKind::Idle,
            BehaviorState::Move { .. } => StateKind::Move,
            BehaviorState::Consume { kind, .. } => kind.state_kind(),
            BehaviorState::Talk { .. } => StateKind::Talk,
        }
    }

    pub fn enter(&mut self, ctx: &mut TickContext<'_, '_>, intent: &mut Intent) {
        match self {
            BehaviorState::Idle => {
                match ctx.surroundings.perception.as_deref_mut() {
                    Some(perception) => {
                        let seen = perception.check_around();
                        ctx.brain.perceive(seen, ctx.now, ctx.needs);
                    }
                    None => intent.missing.report(intent.owner, CollaboratorKind::Perception),
                }
                stop_moving(ctx, intent);
                intent.clear_desired_target();
            }
            BehaviorState::Move { issued } => {
                *issued = None;
                if let Some(target) = intent.desired_target {
                    match ctx.surroundings.mover.as_deref_mut() {
                        Some(mover) => {
                            issue_order(mover, target, issued);
                        }
                        None => intent.missing.report(intent.owner, CollaboratorKind::Mover),
                    }
                }
            }
            BehaviorState::Consume { consumed, .. } => {
                *consumed = false;
                stop_moving(ctx, intent);
            }
            BehaviorState::Talk { talking, talked } => {
                *talking = false;
                *talked = false;
                stop_moving(ctx, intent);
                intent.clear_desired_target();
            }
        }
    }

    pub fn process(&mut self, ctx: &mut TickContext<'_, '_>, intent: &mut Intent) {
        match self {
            BehaviorState::Idle => {}
            BehaviorState::Move { issued } => {
                let Some(target) = intent.desired_target else {
                    return;
                };
                match ctx.surroundings.mover.as_deref_mut() {
                    Some(mover) => {
                        if *issued != Some(target) && !issue_order(mover, target, issued) {
                            return;
                        }
                        // The mover owns the target from here on
                        intent.clear_desired_target();
                    }
                    None => {
                        intent.missing.report(intent.owner, CollaboratorKind::Mover);
                        intent.clear_desired_target();
                    }
                }
            }
            BehaviorState::Consume { kind, consumed, .. } => {
                if *consumed {
                    return;
                }
                let wanted = kind.resource();
                let resource = ctx
                    .surroundings
                    .adjacent
                    .iter()
                    .find(|r| r.kind() == wanted && r.is_considerable());
                if let Some(resource) = resource {
                    let effect = resource.consume();
                    ctx.effects.push(effect);
                    ctx.brain.push_event(CognitionEvent::Consumed { kind: wanted });
                    tracing::debug!(agent = %intent.owner, ?wanted, ?effect, "consumed");
                    *consumed = true;
                }
            }
            BehaviorState::Talk { talking, talked } => {
                if *talked {
                    return;
                }
                if !*talking {
                    let partners = eligible_peers(ctx);
                    let met = ctx.social.start_group_conversation(&partners, ctx.now);
                    for event in met {
                        ctx.brain.push_event(event);
                    }
                    *talking = true;
                }
                if let Some(partner) = ctx.social.advance(ctx.dt, ctx.now) {
                    match ctx.surroundings.peers {
                        Some(directory) => match directory.memory_of(partner) {
                            Some(theirs) => {
                                ctx.brain.import_memories(theirs, ctx.now);
                                ctx.brain.push_event(CognitionEvent::TalkedWith { peer: partner });
                            }
                            None => {
                                tracing::debug!(agent = %intent.owner, peer = %partner, "partner left mid-conversation");
                            }
                        },
                        None => intent.missing.report(intent.owner, CollaboratorKind::Peers),
                    }
                }
                if !ctx.social.has_pending_conversation() {
                    *talking = false;
                    *talked = true;
                }
            }
        }
    }

    pub fn exit(&mut self, ctx: &mut TickContext<'_, '_>, intent: &mut Intent) {
        match self {
            BehaviorState::Idle => {}
            BehaviorState::Move { issued } => {
                *issued = None;
                intent.clear_desired_target();
            }
            BehaviorState::Consume { consumed, .. } => *consumed = false,
            BehaviorState::Talk { talking, talked } => {
                *talking = false;
                *talked = false;
                ctx.social.stop_conversation();
            }
        }
    }

    /// Whether the controller should switch into this state
    pub fn should_transition(&self, ctx: &TickContext<'_, '_>, intent: &Intent) -> bool {
        match self {
            BehaviorState::Idle => {
                intent.desired_target.is_none()
                    && ctx.surroundings.mover_arrived().unwrap_or(true)
                    && !ctx.social.has_pending_conversation()
            }
            BehaviorState::Move { .. } => {
                intent.desired_target.is_some() || !ctx.surroundings.mover_arrived().unwrap_or(true)
            }
            BehaviorState::Consume { kind, full_level, consumed } => {
                let level = match kind {
                    ConsumeKind::Drink => ctx.needs.thirst,
                    ConsumeKind::Eat | ConsumeKind::Shake => ctx.needs.hunger,
                };
                let wanted = kind.resource();
                let near_resource = ctx
                    .surroundings
                    .adjacent
                    .iter()
                    .any(|r| r.kind() == wanted && r.is_considerable());
                level > *full_level && !*consumed && near_resource
            }
            BehaviorState::Talk { talked, .. } => {
                !*talked
                    && !ctx.social.has_pending_conversation()
                    && intent.drive == DriveKind::Boredom
                    && !eligible_peers(ctx).is_empty()
            }
        }
    }
}

/// Order the mover to `target`. An order the mover does not start on is
/// not recorded, so it is retried on the next tick.
fn issue_order(mover: &mut dyn Mover, target: Vec2, issued: &mut Option<Vec2>) -> bool {
    mover.move_to(target);
    let accepted = !mover.has_arrived();
    *issued = accepted.then_some(target);
    accepted
}

fn stop_moving(ctx: &mut TickContext<'_, '_>, intent: &mut Intent) {
    match ctx.surroundings.mover.as_deref_mut() {
        Some(mover) => mover.stop_moving(),
        None => intent.missing.report(intent.owner, CollaboratorKind::Mover),
    }
}

/// Nearby peers both sides are currently willing to talk to
fn eligible_peers(ctx: &TickContext<'_, '_>) -> Vec<EntityId> {
    let Some(directory) = ctx.surroundings.peers else {
        return Vec::new();
    };
    let me = ctx.social.owner();
    ctx.surroundings
        .nearby_peers
        .iter()
        .copied()
        .filter(|&peer| {
            ctx.social.can_talk_to(peer, ctx.now) && directory.is_willing_to_talk(peer, me, ctx.now)
        })
        .collect()
}
