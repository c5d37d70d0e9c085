//! Critical hit and evasion rolls
//!
//! Both are independent uniform draws against a configured percentage.
//! Rolls take the RNG explicitly so a seeded run replays exactly.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::{check_chance, CombatConfig};
use crate::core::error::ConfigError;
use crate::health::damage::DamageEvent;
use crate::health::mitigation::EvasionCheck;

/// A percentage chance, validated to [0, 100] at construction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChanceRoll {
    percent: f32,
}

impl ChanceRoll {
    pub fn new(percent: f32) -> Result<Self, ConfigError> {
        check_chance("chance", percent)?;
        Ok(Self { percent })
    }

    pub fn never() -> Self {
        Self { percent: 0.0 }
    }

    pub fn always() -> Self {
        Self { percent: 100.0 }
    }

    pub fn percent(&self) -> f32 {
        self.percent
    }

    pub fn roll(&self, rng: &mut impl Rng) -> bool {
        if self.percent <= 0.0 {
            return false;
        }
        if self.percent >= 100.0 {
            return true;
        }
        rng.gen_range(0.0..100.0) < self.percent
    }
}

/// Outcome of rolling a strike's damage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrikeRoll {
    pub amount: f32,
    pub critical: bool,
}

/// Critical hit table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CritTable {
    chance: ChanceRoll,
    multiplier: f32,
}

impl CritTable {
    pub fn new(chance: ChanceRoll, multiplier: f32) -> Result<Self, ConfigError> {
        if !(multiplier.is_finite() && multiplier >= 1.0) {
            return Err(ConfigError::InvalidMultiplier {
                field: "crit_multiplier",
                value: multiplier,
            });
        }
        Ok(Self { chance, multiplier })
    }

    pub fn from_config(config: &CombatConfig) -> Result<Self, ConfigError> {
        Self::new(ChanceRoll::new(config.crit_chance)?, config.crit_multiplier)
    }

    /// Table that never crits
    pub fn none() -> Self {
        Self {
            chance: ChanceRoll::never(),
            multiplier: 1.0,
        }
    }

    pub fn roll(&self, base: f32, rng: &mut impl Rng) -> StrikeRoll {
        if self.chance.roll(rng) {
            StrikeRoll {
                amount: base * self.multiplier,
                critical: true,
            }
        } else {
            StrikeRoll {
                amount: base,
                critical: false,
            }
        }
    }
}

/// Evasion hook driven by a seeded chance roll
#[derive(Debug, Clone)]
pub struct RolledEvasion {
    chance: ChanceRoll,
    rng: ChaCha8Rng,
}

impl RolledEvasion {
    pub fn new(chance: ChanceRoll, seed: u64) -> Self {
        Self {
            chance,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl EvasionCheck for RolledEvasion {
    fn evades(&mut self, _event: &DamageEvent) -> bool {
        self.chance.roll(&mut self.rng)
    }
}
