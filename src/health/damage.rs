//! Damage events and mitigation outcomes

use crate::core::types::{EntityId, Vec2};
use serde::{Deserialize, Serialize};

/// A single incoming hit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageEvent {
    /// Raw damage before mitigation
    pub amount: f32,
    /// World hit point, for feedback only
    pub hit_point: Vec2,
    /// Surface normal at the hit point, for feedback only
    pub hit_normal: Vec2,
    /// Who dealt it (attribution only)
    pub source: Option<EntityId>,
    /// Was this a critical strike? (display only, already folded into `amount`)
    pub critical: bool,
}

impl DamageEvent {
    pub fn new(amount: f32) -> Self {
        Self {
            amount,
            hit_point: Vec2::ZERO,
            hit_normal: Vec2::ZERO,
            source: None,
            critical: false,
        }
    }

    pub fn from_source(mut self, source: EntityId) -> Self {
        self.source = Some(source);
        self
    }

    pub fn at(mut self, hit_point: Vec2, hit_normal: Vec2) -> Self {
        self.hit_point = hit_point;
        self.hit_normal = hit_normal;
        self
    }

    pub fn critical(mut self, critical: bool) -> Self {
        self.critical = critical;
        self
    }
}

/// Why a hit was refused before any roll happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rejection {
    /// Target is already terminal
    Dead,
    /// Flag set or inside an ignore-damage window
    Invulnerable,
    /// Zero, negative or NaN amount
    NonPositive,
}

/// Result of running one hit through the mitigation pipeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DamageOutcome {
    Rejected(Rejection),
    /// Evasion roll succeeded, hit fully negated
    Evaded,
    /// Absorption covered the whole hit, health unchanged
    Absorbed,
    /// Some damage got through
    Applied {
        /// Amount the attacker asked for (what damage numbers show)
        requested: f32,
        /// Amount actually subtracted from health
        net: f32,
        /// Amount taken off by absorption (zero if none)
        absorbed: f32,
        /// Health reached zero on this hit
        lethal: bool,
    },
}

impl DamageOutcome {
    pub fn is_lethal(&self) -> bool {
        matches!(self, DamageOutcome::Applied { lethal: true, .. })
    }

    /// Health went down
    pub fn landed(&self) -> bool {
        matches!(self, DamageOutcome::Applied { .. })
    }

    pub fn is_partial_absorption(&self) -> bool {
        matches!(self, DamageOutcome::Applied { absorbed, .. } if *absorbed > 0.0)
    }

    pub fn net_damage(&self) -> f32 {
        match self {
            DamageOutcome::Applied { net, .. } => *net,
            _ => 0.0,
        }
    }
}

/// Fire-and-forget notifications raised by a health record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HealthNotice {
    DamageApplied {
        requested: f32,
        net: f32,
        absorbed: f32,
        current: f32,
    },
    Evaded {
        requested: f32,
    },
    Absorbed {
        requested: f32,
    },
    Healed {
        amount: f32,
        current: f32,
    },
    MaxHealthChanged {
        max: f32,
        current: f32,
    },
    /// Raised exactly once per record
    Died,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_queries() {
        let applied = DamageOutcome::Applied {
            requested: 20.0,
            net: 15.0,
            absorbed: 5.0,
            lethal: false,
        };
        assert!(applied.landed());
        assert!(applied.is_partial_absorption());
        assert!(!applied.is_lethal());
        assert_eq!(applied.net_damage(), 15.0);

        assert!(!DamageOutcome::Evaded.landed());
        assert_eq!(DamageOutcome::Absorbed.net_damage(), 0.0);
    }

    #[test]
    fn test_event_builder() {
        let source = EntityId::new();
        let event = DamageEvent::new(12.0)
            .from_source(source)
            .at(Vec2::new(1.0, 2.0), Vec2::new(0.0, 1.0))
            .critical(true);
        assert_eq!(event.source, Some(source));
        assert!(event.critical);
        assert_eq!(event.hit_point, Vec2::new(1.0, 2.0));
    }
}
