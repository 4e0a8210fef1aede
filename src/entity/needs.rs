//! Hunger and thirst, the physiological needs that drive behavior

use serde::{Deserialize, Serialize};

use crate::cognition::collaborators::{PhysiologyProvider, TraitKind, TraitProvider};
use crate::core::config::PhysiologyConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NeedKind {
    Hunger,
    Thirst,
}

impl NeedKind {
    pub fn verb(self) -> &'static str {
        match self {
            NeedKind::Hunger => "eat",
            NeedKind::Thirst => "drink",
        }
    }
}

/// Hunger and thirst levels that rise over time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Physiology {
    /// 0.0 = fed, 1.0 = starving
    pub hunger: f32,
    /// 0.0 = quenched, 1.0 = parched
    pub thirst: f32,
    hunger_rate: f32,
    thirst_rate: f32,
    hunger_threshold: f32,
    thirst_threshold: f32,
    hunger_alerted: bool,
    thirst_alerted: bool,
    #[serde(skip)]
    alerts: Vec<NeedKind>,
}

impl Physiology {
    pub fn new(config: &PhysiologyConfig) -> Self {
        Self {
            hunger: config.initial_hunger.clamp(0.0, 1.0),
            thirst: config.initial_thirst.clamp(0.0, 1.0),
            hunger_rate: config.hunger_rate,
            thirst_rate: config.thirst_rate,
            hunger_threshold: config.hunger_threshold,
            thirst_threshold: config.thirst_threshold,
            hunger_alerted: false,
            thirst_alerted: false,
            alerts: Vec::new(),
        }
    }

    /// Scale the need rates by heritable traits
    pub fn with_traits(mut self, traits: &dyn TraitProvider) -> Self {
        self.hunger_rate *= traits.multiplier(TraitKind::HungerRate);
        self.thirst_rate *= traits.multiplier(TraitKind::ThirstRate);
        self
    }

    pub fn is_hungry(&self) -> bool {
        self.hunger >= self.hunger_threshold
    }

    pub fn is_thirsty(&self) -> bool {
        self.thirst >= self.thirst_threshold
    }

    /// An alert is raised once per threshold crossing; the need has to drop
    /// back under the threshold before it can alert again.
    fn latch_alerts(&mut self) {
        let hungry = self.is_hungry();
        if hungry && !self.hunger_alerted {
            self.alerts.push(NeedKind::Hunger);
        }
        self.hunger_alerted = hungry;

        let thirsty = self.is_thirsty();
        if thirsty && !self.thirst_alerted {
            self.alerts.push(NeedKind::Thirst);
        }
        self.thirst_alerted = thirsty;
    }
}

impl PhysiologyProvider for Physiology {
    fn hunger_level(&self) -> f32 {
        self.hunger
    }

    fn thirst_level(&self) -> f32 {
        self.thirst
    }

    fn update(&mut self, dt: f32) {
        self.hunger = (self.hunger + self.hunger_rate * dt).min(1.0);
        self.thirst = (self.thirst + self.thirst_rate * dt).min(1.0);
        self.latch_alerts();
    }

    fn eat(&mut self, amount: f32) {
        self.hunger = (self.hunger - amount).max(0.0);
        self.latch_alerts();
    }

    fn drink(&mut self, amount: f32) {
        self.thirst = (self.thirst - amount).max(0.0);
        self.latch_alerts();
    }

    fn take_alerts(&mut self) -> Vec<NeedKind> {
        std::mem::take(&mut self.alerts)
    }
}
