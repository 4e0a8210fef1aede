//! Aging and life stages
//!
//! Babies forget quickly and move slowly; adolescents are the sharpest and
//! fastest; the old forget fastest of all.

use serde::{Deserialize, Serialize};

use crate::cognition::collaborators::AgeProvider;
use crate::core::config::GrowthConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LifeStage {
    Baby,
    Youngling,
    Adolescent,
    Adult,
    Old,
}

impl LifeStage {
    pub fn memory_decay_factor(self) -> f32 {
        match self {
            LifeStage::Baby => 1.5,
            LifeStage::Youngling => 1.0,
            LifeStage::Adolescent => 0.8,
            LifeStage::Adult => 1.0,
            LifeStage::Old => 1.8,
        }
    }

    pub fn speed_factor(self) -> f32 {
        match self {
            LifeStage::Baby => 0.5,
            LifeStage::Youngling => 0.8,
            LifeStage::Adolescent => 1.1,
            LifeStage::Adult => 1.0,
            LifeStage::Old => 0.7,
        }
    }
}

/// Age counter with stage tracking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Growth {
    pub age: f32,
    stage: LifeStage,
    maturation: f32,
    config: GrowthConfig,
    #[serde(skip)]
    transitions: Vec<(LifeStage, LifeStage)>,
}

impl Growth {
    pub fn new(config: GrowthConfig) -> Self {
        let age = config.initial_age.max(0.0);
        let stage = Self::stage_for(&config, age);
        Self {
            age,
            stage,
            maturation: 1.0,
            config,
            transitions: Vec::new(),
        }
    }

    /// Scale aging speed by a heritable maturation multiplier
    pub fn with_maturation(mut self, maturation: f32) -> Self {
        self.maturation = maturation.max(0.0);
        self
    }

    pub fn stage(&self) -> LifeStage {
        self.stage
    }

    fn stage_for(config: &GrowthConfig, age: f32) -> LifeStage {
        if age >= config.old_age {
            LifeStage::Old
        } else if age >= config.adult_age {
            LifeStage::Adult
        } else if age >= config.adolescent_age {
            LifeStage::Adolescent
        } else if age >= config.youngling_age {
            LifeStage::Youngling
        } else {
            LifeStage::Baby
        }
    }
}

impl AgeProvider for Growth {
    fn memory_decay_factor(&self) -> f32 {
        self.stage.memory_decay_factor()
    }

    fn speed_factor(&self) -> f32 {
        self.stage.speed_factor()
    }

    fn update(&mut self, dt: f32) {
        self.age += self.config.age_units_per_second * self.maturation * dt;
        let stage = Self::stage_for(&self.config, self.age);
        if stage != self.stage {
            tracing::debug!(from = ?self.stage, to = ?stage, age = self.age, "life stage changed");
            self.transitions.push((self.stage, stage));
            self.stage = stage;
        }
    }

    fn take_stage_changes(&mut self) -> Vec<(LifeStage, LifeStage)> {
        std::mem::take(&mut self.transitions)
    }
}
