//! Phenotype - heritable multipliers on physiology, memory and movement
//!
//! Every trait is a multiplier around 1.0. A creature with `memory_decay`
//! of 1.2 forgets 20% faster than average; one with `speed` of 0.8 walks
//! 20% slower.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cognition::collaborators::{TraitKind, TraitProvider};

/// Trait multipliers never leave this range
const TRAIT_MIN: f32 = 0.5;
const TRAIT_MAX: f32 = 1.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phenotype {
    /// How fast hunger builds (0.5-1.5, default 1.0)
    pub hunger_rate: f32,

    /// How fast thirst builds (0.5-1.5, default 1.0)
    pub thirst_rate: f32,

    /// How fast memories fade (0.5-1.5, default 1.0)
    /// Affects: effective decay of every long-term memory
    pub memory_decay: f32,

    /// Walking speed (0.5-1.5, default 1.0)
    pub speed: f32,

    /// Aging speed (0.5-1.5, default 1.0)
    pub maturation: f32,

    /// Sight radius (0.5-1.5, default 1.0)
    pub sensory_range: f32,
}

impl Default for Phenotype {
    fn default() -> Self {
        Self {
            hunger_rate: 1.0,
            thirst_rate: 1.0,
            memory_decay: 1.0,
            speed: 1.0,
            maturation: 1.0,
            sensory_range: 1.0,
        }
    }
}

impl Phenotype {
    /// Create a phenotype with random variance around the defaults
    pub fn with_variance<R: Rng>(variance: f32, rng: &mut R) -> Self {
        let variance = variance.abs();
        let mut vary = |base: f32| -> f32 {
            if variance == 0.0 {
                return base;
            }
            let delta = rng.gen_range(-variance..=variance);
            (base + delta).clamp(TRAIT_MIN, TRAIT_MAX)
        };

        Self {
            hunger_rate: vary(1.0),
            thirst_rate: vary(1.0),
            memory_decay: vary(1.0),
            speed: vary(1.0),
            maturation: vary(1.0),
            sensory_range: vary(1.0),
        }
    }

    pub fn get(&self, kind: TraitKind) -> f32 {
        match kind {
            TraitKind::HungerRate => self.hunger_rate,
            TraitKind::ThirstRate => self.thirst_rate,
            TraitKind::MemoryDecay => self.memory_decay,
            TraitKind::Speed => self.speed,
            TraitKind::Maturation => self.maturation,
            TraitKind::SensoryRange => self.sensory_range,
        }
    }
}

impl TraitProvider for Phenotype {
    fn multiplier(&self, kind: TraitKind) -> f32 {
        self.get(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_default_is_neutral() {
        let phenotype = Phenotype::default();
        for kind in [
            TraitKind::HungerRate,
            TraitKind::ThirstRate,
            TraitKind::MemoryDecay,
            TraitKind::Speed,
            TraitKind::Maturation,
            TraitKind::SensoryRange,
        ] {
            assert_eq!(phenotype.multiplier(kind), 1.0);
        }
    }

    #[test]
    fn test_variance_stays_in_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..100 {
            let p = Phenotype::with_variance(0.3, &mut rng);
            for value in [p.hunger_rate, p.thirst_rate, p.memory_decay, p.speed, p.maturation, p.sensory_range] {
                assert!((0.69..=1.31).contains(&value), "trait out of range: {}", value);
            }
        }
    }

    #[test]
    fn test_zero_variance_is_default() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(Phenotype::with_variance(0.0, &mut rng), Phenotype::default());
    }

    #[test]
    fn test_same_seed_same_phenotype() {
        let a = Phenotype::with_variance(0.2, &mut ChaCha8Rng::seed_from_u64(11));
        let b = Phenotype::with_variance(0.2, &mut ChaCha8Rng::seed_from_u64(11));
        assert_eq!(a, b);
    }
}
