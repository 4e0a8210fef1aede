//! Drive arbitration
//!
//! Every tick each drive on the roster gets a weight from the agent's needs
//! and memories. The heaviest one is dominant; the behavior layer only hears
//! about it when it changes.

use serde::{Deserialize, Serialize};

use crate::cognition::collaborators::NeedLevels;
use crate::core::config::DriveConfig;
use crate::core::types::SimTime;
use crate::entity::memory::Memory;
use crate::entity::observation::ObservationKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DriveKind {
    Hunger,
    Thirst,
    Boredom,
    Fear,
    Heat,
}

/// A drive and its weight for the current tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drive {
    pub kind: DriveKind,
    pub weight: f32,
}

impl Drive {
    fn new(kind: DriveKind) -> Self {
        Self { kind, weight: 0.0 }
    }

    /// Recompute the weight. Never negative.
    pub fn compute(
        &mut self,
        needs: NeedLevels,
        memories: &[Memory],
        now: SimTime,
        decay_per_second: f32,
        config: &DriveConfig,
    ) {
        let weight = match self.kind {
            DriveKind::Hunger => needs.hunger,
            DriveKind::Thirst => needs.thirst,
            DriveKind::Boredom => config.boredom_weight,
            DriveKind::Fear => {
                let max_trust = memories
                    .iter()
                    .filter(|m| matches!(m.kind(), ObservationKind::Threat | ObservationKind::Predator))
                    .map(|m| m.reliability(now, decay_per_second))
                    .fold(0.0_f32, f32::max);
                config.fear_weight * max_trust
            }
            DriveKind::Heat => {
                let trusts: Vec<f32> = memories
                    .iter()
                    .filter(|m| m.kind() == ObservationKind::Shelter)
                    .map(|m| m.reliability(now, decay_per_second))
                    .collect();
                if trusts.is_empty() {
                    // No shelter known at all
                    config.heat_weight * 0.5
                } else {
                    let mean = trusts.iter().sum::<f32>() / trusts.len() as f32;
                    config.heat_weight * (1.0 - mean)
                }
            }
        };
        self.weight = if weight.is_finite() { weight.max(0.0) } else { 0.0 };
    }
}

/// Heaviest drive, first wins on ties. Boredom when nothing weighs anything.
pub fn dominant_drive(drives: &[Drive]) -> DriveKind {
    let mut best: Option<&Drive> = None;
    for drive in drives {
        if drive.weight <= 0.0 {
            continue;
        }
        match best {
            Some(current) if current.weight >= drive.weight => {}
            _ => best = Some(drive),
        }
    }
    best.map(|d| d.kind).unwrap_or(DriveKind::Boredom)
}

/// The roster of drives and the last dominant one reported
#[derive(Debug, Clone)]
pub struct Feelings {
    config: DriveConfig,
    roster: Vec<Drive>,
    last_emitted: Option<DriveKind>,
}

impl Feelings {
    pub fn new(config: DriveConfig) -> Self {
        let mut roster = vec![DriveKind::Hunger, DriveKind::Thirst];
        if config.enable_fear {
            roster.push(DriveKind::Fear);
        }
        if config.enable_heat {
            roster.push(DriveKind::Heat);
        }
        roster.push(DriveKind::Boredom);
        Self::with_roster(config, roster)
    }

    /// Custom roster, evaluated (and tie-broken) in the given order
    pub fn with_roster(config: DriveConfig, kinds: Vec<DriveKind>) -> Self {
        Self {
            config,
            roster: kinds.into_iter().map(Drive::new).collect(),
            last_emitted: None,
        }
    }

    /// Recompute every drive. Returns the new dominant drive if it changed.
    pub fn compute(
        &mut self,
        needs: NeedLevels,
        memories: &[Memory],
        now: SimTime,
        decay_per_second: f32,
    ) -> Option<DriveKind> {
        for drive in &mut self.roster {
            drive.compute(needs, memories, now, decay_per_second, &self.config);
        }
        let dominant = dominant_drive(&self.roster);
        if self.last_emitted == Some(dominant) {
            return None;
        }
        self.last_emitted = Some(dominant);
        Some(dominant)
    }

    /// Last reported dominant drive (Boredom before the first computation)
    pub fn dominant(&self) -> DriveKind {
        self.last_emitted.unwrap_or(DriveKind::Boredom)
    }

    pub fn last_emitted(&self) -> Option<DriveKind> {
        self.last_emitted
    }

    pub fn drives(&self) -> &[Drive] {
        &self.roster
    }

    pub fn weight_of(&self, kind: DriveKind) -> Option<f32> {
        self.roster.iter().find(|d| d.kind == kind).map(|d| d.weight)
    }
}
