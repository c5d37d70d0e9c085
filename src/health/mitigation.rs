//! Mitigation hooks bound to a health record
//!
//! Each hook is optional. An unbound hook simply never triggers.

use crate::health::damage::DamageEvent;

/// External "ignore damage" check, consulted alongside the invulnerable flag
pub trait DamageGate {
    fn ignores(&self, event: &DamageEvent) -> bool;
}

/// Probabilistic full negation of a hit
pub trait EvasionCheck {
    fn evades(&mut self, event: &DamageEvent) -> bool;
}

/// Stat-driven reduction of a hit. Returns the amount taken off.
pub trait Absorption {
    fn reduction(&mut self, event: &DamageEvent) -> f32;
}

impl<F: Fn(&DamageEvent) -> bool> DamageGate for F {
    fn ignores(&self, event: &DamageEvent) -> bool {
        self(event)
    }
}

impl<F: FnMut(&DamageEvent) -> bool> EvasionCheck for F {
    fn evades(&mut self, event: &DamageEvent) -> bool {
        self(event)
    }
}

impl<F: FnMut(&DamageEvent) -> f32> Absorption for F {
    fn reduction(&mut self, event: &DamageEvent) -> f32 {
        self(event)
    }
}

/// Flat armor: every hit loses the same amount
#[derive(Debug, Clone, Copy)]
pub struct ArmorAbsorption {
    pub armor: f32,
}

impl Absorption for ArmorAbsorption {
    fn reduction(&mut self, _event: &DamageEvent) -> f32 {
        self.armor.max(0.0)
    }
}

/// Percentage resistance, 0.0 to 1.0 of each hit
#[derive(Debug, Clone, Copy)]
pub struct ResistAbsorption {
    pub fraction: f32,
}

impl Absorption for ResistAbsorption {
    fn reduction(&mut self, event: &DamageEvent) -> f32 {
        event.amount * self.fraction.clamp(0.0, 1.0)
    }
}
