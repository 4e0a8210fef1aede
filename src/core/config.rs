//! Cognition configuration with documented constants
//!
//! All tunable numbers are collected here with explanations of their purpose
//! and how they interact with each other. Every section deserializes from TOML
//! with per-field defaults, so a config file only needs the values it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{MindError, Result};
use crate::entity::observation::ObservationKind;

/// Top-level configuration for one simulation run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CognitionConfig {
    pub memory: MemoryConfig,
    pub drives: DriveConfig,
    pub behavior: BehaviorConfig,
    pub physiology: PhysiologyConfig,
    pub growth: GrowthConfig,
    pub social: SocialConfig,
    pub sandbox: SandboxConfig,
}

impl CognitionConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        self.memory.validate()?;
        self.behavior.validate()?;
        self.physiology.validate()?;
        self.growth.validate()?;
        self.social.validate()?;
        self.sandbox.validate()?;
        Ok(())
    }
}

// === MEMORY SYSTEM ===

/// Parameters of the sensory memory store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Radius of positional uncertainty for the weakest memories (world units)
    ///
    /// A memory at full strength is exact; one about to be forgotten can be
    /// off by up to this distance when used as a target.
    pub max_position_accuracy_radius: f32,

    /// Default initial strength for a standard memory
    pub base_strength: f32,

    /// Strength lost per second, before trait and life-stage multipliers
    ///
    /// At the default (2.0), a plain memory of strength 100 lasts 50 seconds.
    pub base_decay_per_second: f32,

    /// Strength added when a known memory is sighted again
    pub reinforcement_bonus: f32,

    /// Absolute cap for memory strength
    pub max_strength: f32,

    /// Fraction of `base_strength` given to memories learned from a peer
    ///
    /// Second-hand knowledge starts weaker since the context in which the
    /// peer formed it is unknown.
    pub imported_strength_factor: f32,

    /// Flat bonus added when the memory is formed while the relevant need is high
    pub need_driven_bonus: f32,

    /// Need level above which `need_driven_bonus` applies
    pub need_bonus_threshold: f32,

    /// Per-category multipliers on `base_strength`
    pub multipliers: StrengthMultipliers,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_position_accuracy_radius: 50.0,
            base_strength: 100.0,
            base_decay_per_second: 2.0,
            reinforcement_bonus: 30.0,
            max_strength: 250.0,
            imported_strength_factor: 0.6,
            need_driven_bonus: 40.0,
            need_bonus_threshold: 0.5,
            multipliers: StrengthMultipliers::default(),
        }
    }
}

impl MemoryConfig {
    pub fn validate(&self) -> Result<()> {
        if self.base_strength <= 0.0 || self.max_strength <= 0.0 {
            return Err(MindError::InvalidConfig(
                "memory strengths must be positive".into(),
            ));
        }
        if self.base_strength > self.max_strength {
            return Err(MindError::InvalidConfig(format!(
                "base_strength ({}) should be <= max_strength ({})",
                self.base_strength, self.max_strength
            )));
        }
        if self.base_decay_per_second < 0.0 {
            return Err(MindError::InvalidConfig(
                "base_decay_per_second must not be negative".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.imported_strength_factor) {
            return Err(MindError::InvalidConfig(format!(
                "imported_strength_factor ({}) must be within 0..=1",
                self.imported_strength_factor
            )));
        }
        if self.max_position_accuracy_radius < 0.0 {
            return Err(MindError::InvalidConfig(
                "max_position_accuracy_radius must not be negative".into(),
            ));
        }
        Ok(())
    }
}

/// Multipliers for initial memory strength based on what was seen
///
/// Transient things (a fallen fruit) are remembered weakly; lasting landmarks
/// and dangers are remembered strongly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StrengthMultipliers {
    pub fruit: f32,
    pub fruit_tree: f32,
    pub water: f32,
    pub threat: f32,
    pub predator: f32,
    pub mate: f32,
    pub shelter: f32,
}

impl Default for StrengthMultipliers {
    fn default() -> Self {
        Self {
            fruit: 0.7,
            fruit_tree: 1.5,
            water: 1.5,
            threat: 2.0,
            predator: 2.5,
            mate: 1.0,
            shelter: 1.2,
        }
    }
}

impl StrengthMultipliers {
    pub fn for_kind(&self, kind: ObservationKind) -> f32 {
        match kind {
            ObservationKind::Fruit => self.fruit,
            ObservationKind::FruitTree => self.fruit_tree,
            ObservationKind::Water => self.water,
            ObservationKind::Threat => self.threat,
            ObservationKind::Predator => self.predator,
            ObservationKind::Mate => self.mate,
            ObservationKind::Shelter => self.shelter,
            ObservationKind::Unknown => 1.0,
        }
    }
}

// === DRIVES ===

/// Baseline weights of the memory-driven and constant drives
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    /// Constant boredom weight
    ///
    /// Keeps the agent wandering when hunger and thirst are low. Must stay
    /// above zero or an agent with no needs would have nothing to do.
    pub boredom_weight: f32,
    pub fear_weight: f32,
    pub heat_weight: f32,
    /// Add the Fear drive to the roster
    pub enable_fear: bool,
    /// Add the Heat drive to the roster
    pub enable_heat: bool,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            boredom_weight: 0.2,
            fear_weight: 1.0,
            heat_weight: 0.5,
            enable_fear: false,
            enable_heat: false,
        }
    }
}

// === BEHAVIOR ===

/// State machine timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Seconds between transition evaluations
    ///
    /// Transitions are not checked every tick; this trades a little
    /// responsiveness for throughput with many agents.
    pub condition_check_cooldown: f32,

    /// Seconds during which no transition may happen after a switch
    pub state_lock_duration: f32,

    /// Radius of the fallback wander point when no explorer is available
    pub wander_radius_max: f32,

    /// Minimum wander distance as a fraction of `wander_radius_max`
    pub wander_min_fraction: f32,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            condition_check_cooldown: 0.5,
            state_lock_duration: 0.2,
            wander_radius_max: 200.0,
            wander_min_fraction: 0.2,
        }
    }
}

impl BehaviorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.condition_check_cooldown < 0.0 || self.state_lock_duration < 0.0 {
            return Err(MindError::InvalidConfig(
                "behavior timers must not be negative".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.wander_min_fraction) {
            return Err(MindError::InvalidConfig(format!(
                "wander_min_fraction ({}) must be within 0..=1",
                self.wander_min_fraction
            )));
        }
        Ok(())
    }
}

// === PHYSIOLOGY ===

/// Hunger and thirst dynamics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysiologyConfig {
    /// 0.0 = full, 1.0 = starving
    pub initial_hunger: f32,
    /// 0.0 = quenched, 1.0 = parched
    pub initial_thirst: f32,
    /// Hunger increase per second
    ///
    /// At the default (0.005) a fed agent reaches the urgency threshold
    /// in about 160 seconds. Thirst builds twice as fast.
    pub hunger_rate: f32,
    pub thirst_rate: f32,
    /// Hunger level reported as urgent
    pub hunger_threshold: f32,
    /// Thirst level reported as urgent
    pub thirst_threshold: f32,
    /// Hunger at or below which the agent will not eat
    pub eat_full_level: f32,
    /// Thirst at or below which the agent will not drink
    pub drink_full_level: f32,
    /// Hunger at or below which the agent will not bother shaking a tree
    pub shake_full_level: f32,
}

impl Default for PhysiologyConfig {
    fn default() -> Self {
        Self {
            initial_hunger: 0.0,
            initial_thirst: 0.0,
            hunger_rate: 0.005,
            thirst_rate: 0.01,
            hunger_threshold: 0.8,
            thirst_threshold: 0.65,
            eat_full_level: 0.1,
            drink_full_level: 0.1,
            shake_full_level: 0.2,
        }
    }
}

impl PhysiologyConfig {
    pub fn validate(&self) -> Result<()> {
        if self.hunger_rate < 0.0 || self.thirst_rate < 0.0 {
            return Err(MindError::InvalidConfig(
                "need rates must not be negative".into(),
            ));
        }
        for (name, level) in [
            ("initial_hunger", self.initial_hunger),
            ("initial_thirst", self.initial_thirst),
            ("hunger_threshold", self.hunger_threshold),
            ("thirst_threshold", self.thirst_threshold),
            ("eat_full_level", self.eat_full_level),
            ("drink_full_level", self.drink_full_level),
            ("shake_full_level", self.shake_full_level),
        ] {
            if !(0.0..=1.0).contains(&level) {
                return Err(MindError::InvalidConfig(format!(
                    "{} ({}) must be within 0..=1",
                    name, level
                )));
            }
        }
        Ok(())
    }
}

// === GROWTH ===

/// Aging speed and life stage thresholds (age units)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthConfig {
    pub age_units_per_second: f32,
    pub initial_age: f32,
    pub youngling_age: f32,
    pub adolescent_age: f32,
    pub adult_age: f32,
    pub old_age: f32,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            age_units_per_second: 0.1,
            initial_age: 0.0,
            youngling_age: 20.0,
            adolescent_age: 50.0,
            adult_age: 100.0,
            old_age: 200.0,
        }
    }
}

impl GrowthConfig {
    pub fn validate(&self) -> Result<()> {
        let ordered = self.youngling_age < self.adolescent_age
            && self.adolescent_age < self.adult_age
            && self.adult_age < self.old_age;
        if !ordered {
            return Err(MindError::InvalidConfig(
                "life stage thresholds must be strictly increasing".into(),
            ));
        }
        Ok(())
    }
}

// === SOCIAL ===

/// Conversation pacing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialConfig {
    /// Seconds spent with each partner before exchanging memories
    pub discussion_duration: f32,
    /// Seconds before the same pair may talk again
    pub discussion_cooldown: f32,
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self {
            discussion_duration: 5.0,
            discussion_cooldown: 20.0,
        }
    }
}

impl SocialConfig {
    pub fn validate(&self) -> Result<()> {
        if self.discussion_duration < 0.0 || self.discussion_cooldown < 0.0 {
            return Err(MindError::InvalidConfig(
                "social timers must not be negative".into(),
            ));
        }
        Ok(())
    }
}

// === SANDBOX ===

/// Headless world used by the runner and integration tests
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// World is the square `[0, world_size]` on both axes
    pub world_size: f32,
    /// Edge length of an exploration chunk
    pub chunk_size: f32,
    /// Base sight radius, before the sensory range multiplier
    pub sight_radius: f32,
    /// Distance at which a resource counts as adjacent
    pub interaction_radius: f32,
    /// Distance at which two agents can talk
    pub talk_radius: f32,
    /// Base movement speed (units per second)
    pub base_speed: f32,
    /// Distance to target under which the mover reports arrival
    pub arrival_radius: f32,
    /// Seconds between stall checks while moving
    pub stall_check_interval: f32,
    /// Minimum travel per stall check before the mover gives up
    pub stall_distance: f32,
    /// Seconds before an emptied fruit tree regrows
    pub fruit_respawn_delay: f32,
    pub fruit_trees: usize,
    pub fruits_per_tree: usize,
    pub water_sources: usize,
    /// Spread of phenotype traits around 1.0
    pub trait_variance: f32,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            world_size: 1000.0,
            chunk_size: 200.0,
            sight_radius: 150.0,
            interaction_radius: 12.0,
            talk_radius: 30.0,
            base_speed: 100.0,
            arrival_radius: 4.0,
            stall_check_interval: 1.0,
            stall_distance: 5.0,
            fruit_respawn_delay: 20.0,
            fruit_trees: 8,
            fruits_per_tree: 4,
            water_sources: 4,
            trait_variance: 0.2,
        }
    }
}

impl SandboxConfig {
    pub fn validate(&self) -> Result<()> {
        if self.world_size <= 0.0 || self.chunk_size <= 0.0 {
            return Err(MindError::InvalidConfig(
                "world_size and chunk_size must be positive".into(),
            ));
        }
        if self.interaction_radius > self.sight_radius {
            return Err(MindError::InvalidConfig(format!(
                "interaction_radius ({}) should be <= sight_radius ({})",
                self.interaction_radius, self.sight_radius
            )));
        }
        if !(0.0..1.0).contains(&self.trait_variance) {
            return Err(MindError::InvalidConfig(format!(
                "trait_variance ({}) must be within 0..1",
                self.trait_variance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(CognitionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = CognitionConfig::from_toml_str(
            r#"
            [memory]
            base_decay_per_second = 4.0

            [memory.multipliers]
            fruit = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(config.memory.base_decay_per_second, 4.0);
        assert_eq!(config.memory.multipliers.fruit, 0.5);
        assert_eq!(config.memory.multipliers.water, 1.5);
        assert_eq!(config.memory.max_strength, 250.0);
        assert_eq!(config.behavior.condition_check_cooldown, 0.5);
    }

    #[test]
    fn test_rejects_base_above_cap() {
        let result = CognitionConfig::from_toml_str(
            r#"
            [memory]
            base_strength = 300.0
            max_strength = 250.0
            "#,
        );
        assert!(matches!(result, Err(MindError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_unordered_life_stages() {
        let mut config = CognitionConfig::default();
        config.growth.adult_age = 10.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let result = CognitionConfig::from_toml_str("[memory\nbase_strength = ");
        assert!(matches!(result, Err(MindError::TomlError(_))));
    }

    #[test]
    fn test_unknown_kind_multiplier_is_neutral() {
        let multipliers = StrengthMultipliers::default();
        assert_eq!(multipliers.for_kind(ObservationKind::Unknown), 1.0);
        assert_eq!(multipliers.for_kind(ObservationKind::Predator), 2.5);
    }
}
