//! Attack descriptors
//!
//! A descriptor is one attack an entity knows: its reach, timing and
//! damage. The state that starts an attack holds its own copy, so swapping
//! the loadout mid-swing cannot change a swing already in progress.

use crate::fsm::BehaviorStateId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangedMode {
    /// One projectile per release
    Normal,
    /// Several projectiles fanned around the aim direction
    Scatter,
    /// Hold to charge, release to fire
    Charged,
    /// Hold to charge, release to burst forward
    Dash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackKind {
    Melee,
    Ranged(RangedMode),
}

impl AttackKind {
    /// Behavior state that executes this kind of attack
    pub fn state(&self) -> BehaviorStateId {
        match self {
            AttackKind::Melee => BehaviorStateId::MeleeAttack,
            AttackKind::Ranged(RangedMode::Normal | RangedMode::Scatter) => {
                BehaviorStateId::RangedAttack
            }
            AttackKind::Ranged(RangedMode::Charged) => BehaviorStateId::ChargedAttack,
            AttackKind::Ranged(RangedMode::Dash) => BehaviorStateId::DashAttack,
        }
    }

    /// Started by holding the attack input rather than pressing it
    pub fn is_held(&self) -> bool {
        matches!(
            self,
            AttackKind::Ranged(RangedMode::Charged | RangedMode::Dash)
        )
    }
}

/// Static description of an attack (durations in seconds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackSpec {
    pub name: String,
    pub kind: AttackKind,
    pub damage: f32,
    /// Distance at which the attack is worth starting
    pub range: f32,
    /// Distance a strike connects at
    pub reach: f32,
    /// Half-angle of the strike cone (radians)
    pub arc: f32,
    pub windup: f32,
    pub active: f32,
    pub recovery: f32,
    pub cooldown: f32,
    /// Projectiles per release (scatter)
    pub projectiles: u32,
    /// Total fan angle for scatter volleys (radians)
    pub spread: f32,
    /// Hold time below which a charged release cancels
    pub min_charge: f32,
    /// Hold time at which charge stops growing
    pub max_charge: f32,
    /// Damage multiplier at full charge
    pub max_charge_multiplier: f32,
    /// Burst speed while a dash executes
    pub dash_speed: f32,
}

impl AttackSpec {
    pub fn sword() -> Self {
        Self {
            name: "sword".into(),
            kind: AttackKind::Melee,
            damage: 20.0,
            range: 1.8,
            reach: 2.0,
            arc: std::f32::consts::FRAC_PI_2,
            windup: 0.15,
            active: 0.1,
            recovery: 0.25,
            cooldown: 0.0,
            projectiles: 1,
            spread: 0.0,
            min_charge: 0.0,
            max_charge: 0.0,
            max_charge_multiplier: 1.0,
            dash_speed: 0.0,
        }
    }

    pub fn claws() -> Self {
        Self {
            name: "claws".into(),
            damage: 8.0,
            range: 1.5,
            reach: 1.7,
            windup: 0.3,
            recovery: 0.4,
            cooldown: 0.5,
            ..Self::sword()
        }
    }

    pub fn bow() -> Self {
        Self {
            name: "bow".into(),
            kind: AttackKind::Ranged(RangedMode::Normal),
            damage: 12.0,
            range: 12.0,
            reach: 14.0,
            arc: 0.15,
            windup: 0.2,
            active: 0.05,
            recovery: 0.2,
            cooldown: 0.3,
            ..Self::sword()
        }
    }

    pub fn blunderbuss() -> Self {
        Self {
            name: "blunderbuss".into(),
            kind: AttackKind::Ranged(RangedMode::Scatter),
            damage: 6.0,
            range: 6.0,
            reach: 7.0,
            projectiles: 5,
            spread: 0.8,
            cooldown: 0.9,
            ..Self::bow()
        }
    }

    pub fn longbow() -> Self {
        Self {
            name: "longbow".into(),
            kind: AttackKind::Ranged(RangedMode::Charged),
            damage: 15.0,
            range: 18.0,
            reach: 20.0,
            windup: 0.0,
            min_charge: 0.3,
            max_charge: 1.2,
            max_charge_multiplier: 3.0,
            ..Self::bow()
        }
    }

    pub fn blink() -> Self {
        Self {
            name: "blink".into(),
            kind: AttackKind::Ranged(RangedMode::Dash),
            damage: 25.0,
            range: 6.0,
            reach: 2.5,
            arc: std::f32::consts::PI,
            windup: 0.0,
            active: 0.25,
            recovery: 0.3,
            cooldown: 1.5,
            min_charge: 0.4,
            max_charge: 0.4,
            max_charge_multiplier: 1.0,
            dash_speed: 20.0,
            ..Self::sword()
        }
    }

    pub fn total_duration(&self) -> f32 {
        self.windup + self.active + self.recovery
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Ready,
    Windup,
    Active,
    Recovery,
    Finished,
}

/// Executable copy of an attack
#[derive(Debug, Clone, PartialEq)]
pub struct AttackDescriptor {
    spec: AttackSpec,
    phase: Phase,
    elapsed: f32,
    struck: bool,
}

impl AttackDescriptor {
    pub fn new(spec: AttackSpec) -> Self {
        Self {
            spec,
            phase: Phase::Ready,
            elapsed: 0.0,
            struck: false,
        }
    }

    pub fn spec(&self) -> &AttackSpec {
        &self.spec
    }

    pub fn kind(&self) -> AttackKind {
        self.spec.kind
    }

    /// Is a target at `target_distance` worth swinging at?
    ///
    /// No target means no attack.
    pub fn can_attack(&self, target_distance: Option<f32>) -> bool {
        target_distance.is_some_and(|distance| distance <= self.spec.range)
    }

    /// Start executing. Returns false if already mid-execution.
    pub fn try_attack(&mut self) -> bool {
        match self.phase {
            Phase::Ready | Phase::Finished => {
                self.phase = Phase::Windup;
                self.elapsed = 0.0;
                self.struck = false;
                true
            }
            _ => false,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Windup | Phase::Active | Phase::Recovery)
    }

    /// In the active (hitting) phase
    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    pub fn finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Advance the execution clock.
    ///
    /// Returns true on the one tick the strike lands (end of windup). A
    /// tick long enough to cover the whole attack both strikes and finishes.
    pub fn advance(&mut self, dt: f32) -> bool {
        if !self.is_running() {
            return false;
        }
        self.elapsed += dt;

        let strike_at = self.spec.windup;
        let recover_at = self.spec.windup + self.spec.active;
        let done_at = self.spec.total_duration();

        let mut strikes = false;
        if !self.struck && self.elapsed >= strike_at {
            self.struck = true;
            strikes = true;
        }

        self.phase = if self.elapsed >= done_at {
            Phase::Finished
        } else if self.elapsed >= recover_at {
            Phase::Recovery
        } else if self.elapsed >= strike_at {
            Phase::Active
        } else {
            Phase::Windup
        };

        strikes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_maps_to_state() {
        assert_eq!(AttackKind::Melee.state(), BehaviorStateId::MeleeAttack);
        assert_eq!(
            AttackKind::Ranged(RangedMode::Scatter).state(),
            BehaviorStateId::RangedAttack
        );
        assert_eq!(
            AttackKind::Ranged(RangedMode::Dash).state(),
            BehaviorStateId::DashAttack
        );
        assert!(AttackKind::Ranged(RangedMode::Charged).is_held());
        assert!(!AttackKind::Melee.is_held());
    }

    #[test]
    fn test_can_attack_needs_target_in_range() {
        let sword = AttackDescriptor::new(AttackSpec::sword());
        assert!(sword.can_attack(Some(1.0)));
        assert!(!sword.can_attack(Some(5.0)));
        assert!(!sword.can_attack(None));
    }

    #[test]
    fn test_strike_fires_once_then_finishes() {
        let mut sword = AttackDescriptor::new(AttackSpec::sword());
        assert!(sword.try_attack());
        assert!(!sword.try_attack());

        assert!(!sword.advance(0.1)); // windup
        assert!(sword.advance(0.1)); // crosses windup
        assert!(sword.is_active());
        assert!(!sword.advance(0.1));
        assert!(!sword.finished());
        assert!(!sword.advance(0.3));
        assert!(sword.finished());
    }

    #[test]
    fn test_long_tick_strikes_and_finishes() {
        let mut sword = AttackDescriptor::new(AttackSpec::sword());
        sword.try_attack();
        assert!(sword.advance(5.0));
        assert!(sword.finished());
        assert!(sword.try_attack());
    }

    #[test]
    fn test_idle_descriptor_does_not_advance() {
        let mut bow = AttackDescriptor::new(AttackSpec::bow());
        assert!(!bow.advance(1.0));
        assert!(!bow.finished());
    }
}
