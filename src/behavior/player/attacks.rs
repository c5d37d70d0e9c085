//! Player attack states
//!
//! Every attack state locks in its own copy of the current descriptor on
//! entry, so swapping the loadout mid-swing leaves the swing untouched.
//! Exit releases whatever the state was holding (movement lock, charge,
//! invulnerability window), whether the attack finished or was cut short.

use crate::behavior::player::body::PlayerBody;
use crate::capability::Signal;
use crate::combat::AttackDescriptor;
use crate::fsm::{BehaviorState, BehaviorStateId, StateHost, Transition};

/// Commit to the current attack, or explain why there is none
fn lock_in(ctx: &mut PlayerBody, state: BehaviorStateId) -> Option<AttackDescriptor> {
    let Some(combat) = ctx.combat.as_mut() else {
        tracing::warn!("{}: {:?} entered without a combat capability", ctx.id, state);
        return None;
    };
    let Some(attack) = combat.try_attack() else {
        tracing::warn!("{}: {:?} entered with no attack available", ctx.id, state);
        return None;
    };
    ctx.signal(Signal::AttackStarted(attack.kind()));
    Some(attack)
}

/// Press-to-fire attacks: melee swings and normal or scatter shots
#[derive(Debug)]
pub struct Swing {
    id: BehaviorStateId,
    attack: Option<AttackDescriptor>,
}

impl Swing {
    pub fn melee() -> Self {
        Self {
            id: BehaviorStateId::MeleeAttack,
            attack: None,
        }
    }

    pub fn ranged() -> Self {
        Self {
            id: BehaviorStateId::RangedAttack,
            attack: None,
        }
    }
}

impl BehaviorState<PlayerBody> for Swing {
    fn id(&self) -> BehaviorStateId {
        self.id
    }

    fn enter(&mut self, ctx: &mut PlayerBody) -> Transition {
        self.attack = lock_in(ctx, self.id);
        if self.attack.is_none() {
            return Transition::To(BehaviorStateId::Idle);
        }
        ctx.movement.stop();
        ctx.movement.set_locked(true);
        Transition::Stay
    }

    fn step(&mut self, ctx: &mut PlayerBody, dt: f32) -> Transition {
        let Some(attack) = self.attack.as_mut() else {
            return Transition::To(BehaviorStateId::Idle);
        };
        if attack.advance(dt) {
            ctx.release(attack.spec(), 1.0);
        }
        if attack.finished() {
            Transition::To(BehaviorStateId::Idle)
        } else {
            Transition::Stay
        }
    }

    fn exit(&mut self, ctx: &mut PlayerBody) {
        self.attack = None;
        ctx.movement.set_locked(false);
    }
}

/// Hold to charge, release to fire one strike scaled by the charge held
#[derive(Debug, Default)]
pub struct ChargedAttack {
    attack: Option<AttackDescriptor>,
    charge: f32,
    multiplier: Option<f32>,
}

impl ChargedAttack {
    /// Damage multiplier for a release after `charge` seconds, or `None`
    /// if released too early
    pub fn release_multiplier(attack: &AttackDescriptor, charge: f32) -> Option<f32> {
        let spec = attack.spec();
        if charge < spec.min_charge {
            return None;
        }
        let window = spec.max_charge - spec.min_charge;
        let progress = if window > 0.0 {
            ((charge - spec.min_charge) / window).clamp(0.0, 1.0)
        } else {
            1.0
        };
        Some(1.0 + (spec.max_charge_multiplier - 1.0) * progress)
    }
}

impl BehaviorState<PlayerBody> for ChargedAttack {
    fn id(&self) -> BehaviorStateId {
        BehaviorStateId::ChargedAttack
    }

    fn enter(&mut self, ctx: &mut PlayerBody) -> Transition {
        self.attack = lock_in(ctx, BehaviorStateId::ChargedAttack);
        if self.attack.is_none() {
            return Transition::To(BehaviorStateId::Idle);
        }
        self.charge = 0.0;
        self.multiplier = None;
        ctx.movement.stop();
        ctx.movement.set_locked(true);
        Transition::Stay
    }

    fn step(&mut self, ctx: &mut PlayerBody, dt: f32) -> Transition {
        let Some(attack) = self.attack.as_mut() else {
            return Transition::To(BehaviorStateId::Idle);
        };

        let released = self.multiplier;
        let multiplier = match released {
            Some(multiplier) => multiplier,
            None if ctx.input.attack_held => {
                let max = attack.spec().max_charge.max(attack.spec().min_charge);
                self.charge = (self.charge + dt).min(max);
                let progress = if max > 0.0 { self.charge / max } else { 1.0 };
                ctx.signal(Signal::Charging(progress));
                return Transition::Stay;
            }
            None => match Self::release_multiplier(attack, self.charge) {
                Some(multiplier) => {
                    self.multiplier = Some(multiplier);
                    multiplier
                }
                None => {
                    tracing::debug!("{}: charge released early ({:.2}s)", ctx.id, self.charge);
                    return Transition::To(ctx.settle_state());
                }
            },
        };

        if attack.advance(dt) {
            ctx.release(attack.spec(), multiplier);
        }
        if attack.finished() {
            Transition::To(ctx.settle_state())
        } else {
            Transition::Stay
        }
    }

    fn exit(&mut self, ctx: &mut PlayerBody) {
        self.attack = None;
        self.charge = 0.0;
        self.multiplier = None;
        ctx.movement.set_locked(false);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DashPhase {
    Charge { held: f32 },
    Execute { remaining: f32 },
    Recover { remaining: f32 },
}

/// Charge, burst forward through enemies while untouchable, recover
#[derive(Debug)]
pub struct DashAttack {
    attack: Option<AttackDescriptor>,
    phase: DashPhase,
    granted_window: bool,
    /// Window someone else had granted when the dash granted its own
    outside_window: f32,
    since_grant: f32,
}

impl Default for DashAttack {
    fn default() -> Self {
        Self {
            attack: None,
            phase: DashPhase::Charge { held: 0.0 },
            granted_window: false,
            outside_window: 0.0,
            since_grant: 0.0,
        }
    }
}

impl BehaviorState<PlayerBody> for DashAttack {
    fn id(&self) -> BehaviorStateId {
        BehaviorStateId::DashAttack
    }

    fn enter(&mut self, ctx: &mut PlayerBody) -> Transition {
        self.attack = lock_in(ctx, BehaviorStateId::DashAttack);
        if self.attack.is_none() {
            return Transition::To(BehaviorStateId::Idle);
        }
        self.phase = DashPhase::Charge { held: 0.0 };
        ctx.movement.stop();
        Transition::Stay
    }

    fn step(&mut self, ctx: &mut PlayerBody, dt: f32) -> Transition {
        let Some(attack) = self.attack.as_ref() else {
            return Transition::To(BehaviorStateId::Idle);
        };
        let spec = attack.spec();

        let phase = self.phase;
        match phase {
            DashPhase::Charge { held } => {
                if !ctx.input.attack_held {
                    tracing::debug!("{}: dash cancelled during charge", ctx.id);
                    return Transition::To(ctx.settle_state());
                }
                let held = held + dt;
                let progress = if spec.min_charge > 0.0 {
                    (held / spec.min_charge).min(1.0)
                } else {
                    1.0
                };
                ctx.signal(Signal::Charging(progress));
                if held < spec.min_charge {
                    self.phase = DashPhase::Charge { held };
                    return Transition::Stay;
                }

                let direction = ctx
                    .combat
                    .as_ref()
                    .map(|combat| combat.aim_direction())
                    .unwrap_or_else(|| ctx.movement.facing());
                self.outside_window = ctx.health.ignore_window();
                self.since_grant = 0.0;
                ctx.health.grant_invulnerability(spec.active);
                self.granted_window = true;
                ctx.movement.burst(direction, spec.dash_speed);
                ctx.release(spec, 1.0);
                self.phase = DashPhase::Execute {
                    remaining: spec.active,
                };
                Transition::Stay
            }
            DashPhase::Execute { remaining } => {
                self.since_grant += dt;
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    ctx.movement.stop();
                    self.phase = DashPhase::Recover {
                        remaining: spec.recovery,
                    };
                } else {
                    self.phase = DashPhase::Execute { remaining };
                }
                Transition::Stay
            }
            DashPhase::Recover { remaining } => {
                self.since_grant += dt;
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    return Transition::To(ctx.settle_state());
                }
                self.phase = DashPhase::Recover { remaining };
                Transition::Stay
            }
        }
    }

    fn exit(&mut self, ctx: &mut PlayerBody) {
        if self.granted_window {
            // Drop only the dash's share; an outside grant keeps its remaining time
            let outside_left = (self.outside_window - self.since_grant).max(0.0);
            ctx.health.limit_invulnerability(outside_left);
            self.granted_window = false;
        }
        self.attack = None;
        self.phase = DashPhase::Charge { held: 0.0 };
        ctx.movement.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::AttackSpec;

    #[test]
    fn test_release_multiplier_scales_linearly() {
        let bow = AttackDescriptor::new(AttackSpec::longbow());
        assert_eq!(ChargedAttack::release_multiplier(&bow, 0.1), None);
        assert_eq!(ChargedAttack::release_multiplier(&bow, 0.3), Some(1.0));
        assert_eq!(ChargedAttack::release_multiplier(&bow, 5.0), Some(3.0));

        let mid = ChargedAttack::release_multiplier(&bow, 0.75).unwrap();
        assert!((mid - 2.0).abs() < 0.001);
    }
}
