//! Combat and behavior configuration with documented constants
//!
//! All tuning numbers live here. Every struct deserializes from TOML with
//! missing fields falling back to the defaults below, and every struct is
//! validated once when the config is built. Nothing downstream re-checks.

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What happens to current health when max health changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxHealthPolicy {
    /// Keep the same fraction of max (50/100 -> 100/200)
    #[default]
    Rescale,
    /// Keep the same absolute value, clamped to the new max
    Clamp,
}

/// Health record configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Vitality at spawn. Must be positive.
    pub max_health: f32,

    /// How current health follows a max-health change
    pub max_health_policy: MaxHealthPolicy,

    /// Chance (0-100) to fully negate an incoming hit.
    ///
    /// Zero means no evasion hook is bound at all.
    pub evasion_chance: f32,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            max_health_policy: MaxHealthPolicy::Rescale,
            evasion_chance: 0.0,
        }
    }
}

impl HealthConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_health.is_finite() && self.max_health > 0.0) {
            return Err(ConfigError::InvalidMaxHealth(self.max_health));
        }
        check_chance("evasion_chance", self.evasion_chance)
    }
}

/// Critical hit tuning, shared by every attacker
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Chance (0-100) that a strike is critical
    pub crit_chance: f32,

    /// Damage multiplier on a critical strike
    ///
    /// At 1.5, a 20 damage swing crits for 30.
    pub crit_multiplier: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            crit_chance: 10.0,
            crit_multiplier: 1.5,
        }
    }
}

impl CombatConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_chance("crit_chance", self.crit_chance)?;
        if !(self.crit_multiplier.is_finite() && self.crit_multiplier >= 1.0) {
            return Err(ConfigError::InvalidMultiplier {
                field: "crit_multiplier",
                value: self.crit_multiplier,
            });
        }
        Ok(())
    }
}

/// Player-controlled entity tuning (all durations in seconds)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub health: HealthConfig,

    /// Walk speed (world units per second)
    pub move_speed: f32,

    /// Roll burst speed (world units per second)
    pub roll_speed: f32,

    /// How long a roll lasts. The player ignores damage for the whole roll.
    pub roll_duration: f32,

    /// Time after a roll ends before another roll is allowed
    pub roll_cooldown: f32,

    /// Extra ignore-damage window granted when a roll ends
    ///
    /// Covers the recovery frames so a roll through an attack
    /// doesn't get clipped on the way out.
    pub post_roll_invulnerability: f32,

    /// Stagger time after taking a non-lethal hit
    pub hurt_duration: f32,

    /// Length of the open/interact animation
    pub interact_duration: f32,

    /// How long the death animation plays before teardown is signalled
    pub death_linger: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            health: HealthConfig::default(),
            move_speed: 5.0,
            roll_speed: 12.0,
            roll_duration: 0.4,
            roll_cooldown: 0.8,
            post_roll_invulnerability: 0.15,
            hurt_duration: 0.3,
            interact_duration: 0.6,
            death_linger: 2.0,
        }
    }
}

impl PlayerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.health.validate()?;
        check_duration("roll_duration", self.roll_duration)?;
        check_duration("roll_cooldown", self.roll_cooldown)?;
        check_duration("post_roll_invulnerability", self.post_roll_invulnerability)?;
        check_duration("hurt_duration", self.hurt_duration)?;
        check_duration("interact_duration", self.interact_duration)?;
        check_duration("death_linger", self.death_linger)?;
        check_radius("move_speed", self.move_speed)?;
        check_radius("roll_speed", self.roll_speed)
    }
}

/// Enemy tuning (distances in world units, durations in seconds)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub health: HealthConfig,

    pub move_speed: f32,

    /// Distance at which a dormant enemy notices a target
    pub aggro_radius: f32,

    /// Maximum distance from home an enemy will chase to.
    ///
    /// Must be at least `aggro_radius`, otherwise an enemy could
    /// aggro on something it is immediately leashed away from.
    pub leash_radius: f32,

    /// Seconds of continuous chasing allowed before giving up
    pub chase_window: f32,

    /// Pause between patrol legs
    pub patrol_idle: f32,

    /// A patrol leg taking longer than this counts as finished
    pub patrol_leg_timeout: f32,

    /// Distance at which a waypoint or home counts as reached
    pub arrive_tolerance: f32,

    /// Stop closing in once this near the target (surround behavior).
    ///
    /// `None` chases all the way in.
    pub surround_distance: Option<f32>,

    /// Delay between death and teardown, covering the death animation
    pub despawn_delay: f32,

    /// Flat damage absorbed from every hit
    pub armor: f32,

    /// Heal to full when ReturnHome arrives
    pub reset_health_on_return: bool,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            health: HealthConfig {
                max_health: 60.0,
                ..HealthConfig::default()
            },
            move_speed: 3.5,
            aggro_radius: 8.0,
            leash_radius: 20.0,
            chase_window: 6.0,
            patrol_idle: 2.0,
            patrol_leg_timeout: 5.0,
            arrive_tolerance: 0.25,
            surround_distance: None,
            despawn_delay: 1.5,
            armor: 0.0,
            reset_health_on_return: true,
        }
    }
}

impl EnemyConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.health.validate()?;
        check_radius("move_speed", self.move_speed)?;
        check_radius("aggro_radius", self.aggro_radius)?;
        check_radius("leash_radius", self.leash_radius)?;
        if self.leash_radius < self.aggro_radius {
            return Err(ConfigError::InvalidRadius {
                field: "leash_radius (smaller than aggro_radius)",
                value: self.leash_radius,
            });
        }
        check_radius("arrive_tolerance", self.arrive_tolerance)?;
        if let Some(distance) = self.surround_distance {
            check_radius("surround_distance", distance)?;
        }
        check_duration("chase_window", self.chase_window)?;
        check_duration("patrol_idle", self.patrol_idle)?;
        check_duration("patrol_leg_timeout", self.patrol_leg_timeout)?;
        check_duration("despawn_delay", self.despawn_delay)?;
        check_duration("armor", self.armor)
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkirmishConfig {
    pub player: PlayerConfig,
    pub enemy: EnemyConfig,
    pub combat: CombatConfig,
}

impl SkirmishConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.player.validate()?;
        self.enemy.validate()?;
        self.combat.validate()
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SkirmishConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: &Path) -> crate::core::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&content)?)
    }
}

pub(crate) fn check_chance(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ChanceOutOfRange { field, value })
    }
}

fn check_duration(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NegativeDuration { field, value })
    }
}

fn check_radius(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidRadius { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SkirmishConfig::default().validate().is_ok());
    }

    #[test]
    fn test_negative_max_health_rejected() {
        let mut config = SkirmishConfig::default();
        config.player.health.max_health = -5.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidMaxHealth(_))
        ));
    }

    #[test]
    fn test_chance_above_hundred_rejected() {
        let mut config = SkirmishConfig::default();
        config.combat.crit_chance = 150.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ChanceOutOfRange { field: "crit_chance", .. })
        ));
    }

    #[test]
    fn test_leash_smaller_than_aggro_rejected() {
        let mut config = SkirmishConfig::default();
        config.enemy.leash_radius = 2.0;
        config.enemy.aggro_radius = 8.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let toml = r#"
            [enemy]
            aggro_radius = 5.0
            surround_distance = 1.5

            [enemy.health]
            evasion_chance = 25.0
        "#;
        let config = SkirmishConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.enemy.aggro_radius, 5.0);
        assert_eq!(config.enemy.surround_distance, Some(1.5));
        assert_eq!(config.enemy.health.evasion_chance, 25.0);
        assert_eq!(config.enemy.health.max_health, 100.0);
        assert_eq!(config.player.roll_duration, 0.4);
    }

    #[test]
    fn test_invalid_toml_values_rejected() {
        let toml = r#"
            [player.health]
            evasion_chance = -1.0
        "#;
        assert!(SkirmishConfig::from_toml_str(toml).is_err());
    }
}
