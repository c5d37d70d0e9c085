//! Health record: vitality, invulnerability and the death trigger
//!
//! The record owns its `current` value. Damage and heals go through
//! `take_damage` / `heal`; nothing else writes it. Once health reaches
//! zero the record is terminal for good, which is what makes a second
//! death notice impossible rather than merely guarded against.

use crate::core::config::{HealthConfig, MaxHealthPolicy};
use crate::core::error::ConfigError;
use crate::health::damage::{DamageEvent, DamageOutcome, HealthNotice, Rejection};
use crate::health::mitigation::{Absorption, DamageGate, EvasionCheck};
use crate::health::rolls::{ChanceRoll, RolledEvasion};

pub struct HealthRecord {
    current: f32,
    max: f32,
    invulnerable: bool,
    /// Seconds left in a temporary ignore-damage window
    ignore_window: f32,
    alive: bool,
    policy: MaxHealthPolicy,
    gate: Option<Box<dyn DamageGate>>,
    evasion: Option<Box<dyn EvasionCheck>>,
    absorption: Option<Box<dyn Absorption>>,
    notices: Vec<HealthNotice>,
}

impl std::fmt::Debug for HealthRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthRecord")
            .field("current", &self.current)
            .field("max", &self.max)
            .field("invulnerable", &self.invulnerable)
            .field("ignore_window", &self.ignore_window)
            .field("alive", &self.alive)
            .field("evasion", &self.evasion.is_some())
            .field("absorption", &self.absorption.is_some())
            .finish()
    }
}

impl HealthRecord {
    /// Full health, no hooks bound
    pub fn new(max: f32) -> Result<Self, ConfigError> {
        if !(max.is_finite() && max > 0.0) {
            return Err(ConfigError::InvalidMaxHealth(max));
        }
        Ok(Self {
            current: max,
            max,
            invulnerable: false,
            ignore_window: 0.0,
            alive: true,
            policy: MaxHealthPolicy::default(),
            gate: None,
            evasion: None,
            absorption: None,
            notices: Vec::new(),
        })
    }

    /// Build from config. Evasion is only bound when its chance is non-zero.
    pub fn from_config(config: &HealthConfig, seed: u64) -> Result<Self, ConfigError> {
        let mut record = Self::new(config.max_health)?.with_policy(config.max_health_policy);
        if config.evasion_chance > 0.0 {
            let chance = ChanceRoll::new(config.evasion_chance)?;
            record.evasion = Some(Box::new(RolledEvasion::new(chance, seed)));
        }
        Ok(record)
    }

    pub fn with_policy(mut self, policy: MaxHealthPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_gate(mut self, gate: impl DamageGate + 'static) -> Self {
        self.gate = Some(Box::new(gate));
        self
    }

    pub fn with_evasion(mut self, evasion: impl EvasionCheck + 'static) -> Self {
        self.evasion = Some(Box::new(evasion));
        self
    }

    pub fn with_absorption(mut self, absorption: impl Absorption + 'static) -> Self {
        self.absorption = Some(Box::new(absorption));
        self
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Current as a fraction of max (0.0 to 1.0)
    pub fn fraction(&self) -> f32 {
        self.current / self.max
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Explicit flag or an active ignore-damage window
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable || self.ignore_window > 0.0
    }

    pub fn set_invulnerable(&mut self, invulnerable: bool) {
        self.invulnerable = invulnerable;
    }

    /// Ignore damage for the next `seconds`. Never shortens an active window.
    pub fn grant_invulnerability(&mut self, seconds: f32) {
        self.ignore_window = self.ignore_window.max(seconds);
    }

    /// Seconds left in the ignore-damage window
    pub fn ignore_window(&self) -> f32 {
        self.ignore_window
    }

    /// Cut the ignore-damage window down to at most `seconds`. Never extends it.
    pub fn limit_invulnerability(&mut self, seconds: f32) {
        self.ignore_window = self.ignore_window.min(seconds.max(0.0));
    }

    /// Count down the ignore-damage window
    pub fn tick(&mut self, dt: f32) {
        if self.ignore_window > 0.0 {
            self.ignore_window = (self.ignore_window - dt).max(0.0);
        }
    }

    /// Run one hit through the mitigation pipeline.
    ///
    /// Order is fixed and the first terminal outcome wins: liveness,
    /// invulnerability, amount, evasion, absorption, apply, death.
    pub fn take_damage(&mut self, event: &DamageEvent) -> DamageOutcome {
        if !self.alive {
            return DamageOutcome::Rejected(Rejection::Dead);
        }

        if self.is_invulnerable() || self.gate.as_ref().is_some_and(|gate| gate.ignores(event)) {
            return DamageOutcome::Rejected(Rejection::Invulnerable);
        }

        // NaN fails this comparison too
        if !(event.amount > 0.0) {
            return DamageOutcome::Rejected(Rejection::NonPositive);
        }

        if let Some(evasion) = self.evasion.as_mut() {
            if evasion.evades(event) {
                self.notices.push(HealthNotice::Evaded {
                    requested: event.amount,
                });
                return DamageOutcome::Evaded;
            }
        }

        let absorbed = match self.absorption.as_mut() {
            Some(absorption) => absorption.reduction(event).max(0.0),
            None => 0.0,
        };
        if absorbed >= event.amount {
            self.notices.push(HealthNotice::Absorbed {
                requested: event.amount,
            });
            return DamageOutcome::Absorbed;
        }

        let before = self.current;
        self.current = (self.current - (event.amount - absorbed)).max(0.0);
        let net = before - self.current;
        self.notices.push(HealthNotice::DamageApplied {
            requested: event.amount,
            net,
            absorbed,
            current: self.current,
        });

        let lethal = self.current <= 0.0;
        if lethal {
            self.current = 0.0;
            self.alive = false;
            self.notices.push(HealthNotice::Died);
        }

        DamageOutcome::Applied {
            requested: event.amount,
            net,
            absorbed,
            lethal,
        }
    }

    /// Restore health, clamped at max. Returns the amount actually healed.
    ///
    /// A terminal record cannot be healed.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if !self.alive || !(amount > 0.0) {
            return 0.0;
        }
        let before = self.current;
        self.current = (self.current + amount).min(self.max);
        let healed = self.current - before;
        if healed > 0.0 {
            self.notices.push(HealthNotice::Healed {
                amount: healed,
                current: self.current,
            });
        }
        healed
    }

    pub fn restore_full(&mut self) -> f32 {
        self.heal(self.max)
    }

    /// Change max health, following the record's policy for current
    pub fn set_max_health(&mut self, max: f32) -> Result<(), ConfigError> {
        if !(max.is_finite() && max > 0.0) {
            return Err(ConfigError::InvalidMaxHealth(max));
        }
        if self.alive {
            self.current = match self.policy {
                MaxHealthPolicy::Rescale => self.current / self.max * max,
                MaxHealthPolicy::Clamp => self.current.min(max),
            };
            self.current = self.current.min(max);
        }
        self.max = max;
        self.notices.push(HealthNotice::MaxHealthChanged {
            max,
            current: self.current,
        });
        Ok(())
    }

    pub fn notices(&self) -> &[HealthNotice] {
        &self.notices
    }

    pub fn drain_notices(&mut self) -> Vec<HealthNotice> {
        std::mem::take(&mut self.notices)
    }
}
