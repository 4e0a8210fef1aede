//! Cognition events and the per-agent log of them

use std::collections::VecDeque;
use std::fmt;

use serde::Serialize;

use crate::behavior::state::StateKind;
use crate::cognition::feelings::DriveKind;
use crate::core::types::{EntityId, SimTime, Vec2};
use crate::entity::needs::NeedKind;
use crate::entity::observation::ObservationKind;
use crate::genetics::life_stage::LifeStage;

/// Something notable that happened inside an agent's head
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event")]
pub enum CognitionEvent {
    /// The dominant drive switched
    DriveChanged {
        from: Option<DriveKind>,
        to: DriveKind,
    },
    /// A target was resolved for the current drive
    TargetSelected {
        drive: DriveKind,
        position: Vec2,
        /// Chosen from long-term memory rather than a fresh sighting
        remembered: bool,
    },
    /// Nothing viable, heading for a wander point instead
    Wandering { position: Vec2 },
    MemoryAcquired {
        kind: ObservationKind,
        position: Vec2,
        strength: f32,
    },
    MemoriesImported { from: EntityId, learned: usize },
    StateChanged { from: StateKind, to: StateKind },
    Consumed { kind: ObservationKind },
    MetPeer { peer: EntityId },
    TalkedWith { peer: EntityId },
    NeedUrgent { need: NeedKind },
    LifeStageChanged { from: LifeStage, to: LifeStage },
}

impl fmt::Display for CognitionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CognitionEvent::DriveChanged { from: Some(from), to } => {
                write!(f, "I feel {:?} more than {:?} now", to, from)
            }
            CognitionEvent::DriveChanged { from: None, to } => write!(f, "I feel {:?}", to),
            CognitionEvent::TargetSelected { drive, position, remembered } => {
                let source = if *remembered { "remember" } else { "see" };
                write!(
                    f,
                    "{:?}: going to what I {} at ({:.0}, {:.0})",
                    drive, source, position.x, position.y
                )
            }
            CognitionEvent::Wandering { position } => {
                write!(f, "Wandering towards ({:.0}, {:.0})", position.x, position.y)
            }
            CognitionEvent::MemoryAcquired { kind, position, strength } => write!(
                f,
                "Remembering {:?} at ({:.0}, {:.0}) [{:.0}]",
                kind, position.x, position.y, strength
            ),
            CognitionEvent::MemoriesImported { from, learned } => {
                write!(f, "Learned {} new places from {}", learned, from)
            }
            CognitionEvent::StateChanged { from, to } => write!(f, "{:?} -> {:?}", from, to),
            CognitionEvent::Consumed { kind } => match kind {
                ObservationKind::Water => write!(f, "Drank water"),
                ObservationKind::FruitTree => write!(f, "Shook a fruit tree"),
                other => write!(f, "Ate {:?}", other),
            },
            CognitionEvent::MetPeer { peer } => write!(f, "Met {}", peer),
            CognitionEvent::TalkedWith { peer } => write!(f, "Talked with {}", peer),
            CognitionEvent::NeedUrgent { need } => write!(f, "Urgently need to {}", need.verb()),
            CognitionEvent::LifeStageChanged { from, to } => {
                write!(f, "Grew from {:?} into {:?}", from, to)
            }
        }
    }
}

/// A timestamped cognition event
#[derive(Debug, Clone, Serialize)]
pub struct Thought {
    pub time: SimTime,
    pub event: CognitionEvent,
}

/// Bounded log of recent thoughts, oldest evicted first
#[derive(Debug, Clone)]
pub struct ThoughtBuffer {
    thoughts: VecDeque<Thought>,
    max_thoughts: usize,
}

impl Default for ThoughtBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ThoughtBuffer {
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    pub fn with_capacity(max_thoughts: usize) -> Self {
        Self {
            thoughts: VecDeque::with_capacity(max_thoughts),
            max_thoughts: max_thoughts.max(1),
        }
    }

    pub fn add(&mut self, time: SimTime, event: CognitionEvent) {
        if self.thoughts.len() >= self.max_thoughts {
            self.thoughts.pop_front();
        }
        self.thoughts.push_back(Thought { time, event });
    }

    pub fn latest(&self) -> Option<&Thought> {
        self.thoughts.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Thought> {
        self.thoughts.iter()
    }

    pub fn about_peer(&self, peer: EntityId) -> impl Iterator<Item = &Thought> {
        self.thoughts.iter().filter(move |t| {
            matches!(
                t.event,
                CognitionEvent::MetPeer { peer: p }
                    | CognitionEvent::TalkedWith { peer: p }
                    | CognitionEvent::MemoriesImported { from: p, .. } if p == peer
            )
        })
    }

    pub fn len(&self) -> usize {
        self.thoughts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thoughts.is_empty()
    }
}
