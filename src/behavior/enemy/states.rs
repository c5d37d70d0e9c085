//! Enemy states

use crate::behavior::enemy::body::EnemyBody;
use crate::capability::Signal;
use crate::combat::AttackDescriptor;
use crate::fsm::{BehaviorState, BehaviorStateId, StateHost, Transition};

/// Waiting between patrol legs
#[derive(Debug, Default)]
pub struct Idle;

impl BehaviorState<EnemyBody> for Idle {
    fn id(&self) -> BehaviorStateId {
        BehaviorStateId::Idle
    }

    fn enter(&mut self, ctx: &mut EnemyBody) -> Transition {
        ctx.movement.stop();
        ctx.movement.start_patrol_idle_timer();
        Transition::Stay
    }

    fn step(&mut self, ctx: &mut EnemyBody, dt: f32) -> Transition {
        if ctx.movement.target_within_aggro_radius() {
            return Transition::To(BehaviorStateId::Chase);
        }
        if ctx.movement.tick_patrol_idle(dt) {
            return Transition::To(BehaviorStateId::Move);
        }
        Transition::Stay
    }
}

/// Walking one patrol leg
#[derive(Debug, Default)]
pub struct Patrol;

impl BehaviorState<EnemyBody> for Patrol {
    fn id(&self) -> BehaviorStateId {
        BehaviorStateId::Move
    }

    fn step(&mut self, ctx: &mut EnemyBody, dt: f32) -> Transition {
        if ctx.movement.target_within_aggro_radius() {
            return Transition::To(BehaviorStateId::Chase);
        }
        if ctx.movement.patrol_step(dt) {
            return Transition::To(BehaviorStateId::Idle);
        }
        Transition::Stay
    }

    fn exit(&mut self, ctx: &mut EnemyBody) {
        ctx.movement.stop();
    }
}

/// Pursuit. Attack range is checked before the leash, so a target that is
/// both reachable and past the leash still gets attacked.
#[derive(Debug, Default)]
pub struct Chase;

impl BehaviorState<EnemyBody> for Chase {
    fn id(&self) -> BehaviorStateId {
        BehaviorStateId::Chase
    }

    fn enter(&mut self, ctx: &mut EnemyBody) -> Transition {
        ctx.movement.begin_chase();
        Transition::Stay
    }

    fn step(&mut self, ctx: &mut EnemyBody, _dt: f32) -> Transition {
        ctx.movement.look_at_target();
        if ctx.can_attack() {
            return Transition::To(BehaviorStateId::MeleeAttack);
        }
        if !ctx.movement.target_within_leash_radius()
            || !ctx.movement.target_within_chase_window()
        {
            return Transition::To(BehaviorStateId::ReturnHome);
        }

        let holding = match (ctx.surround_distance(), ctx.movement.target_distance()) {
            (Some(hold_at), Some(distance)) => distance <= hold_at,
            _ => false,
        };
        if holding {
            ctx.movement.stop();
        } else {
            ctx.movement.move_to_target();
        }
        Transition::Stay
    }
}

/// One swing at the chase target. Re-enters itself while the target stays
/// in range and the attack is ready again.
#[derive(Debug, Default)]
pub struct MeleeAttack {
    attack: Option<AttackDescriptor>,
}

impl BehaviorState<EnemyBody> for MeleeAttack {
    fn id(&self) -> BehaviorStateId {
        BehaviorStateId::MeleeAttack
    }

    fn enter(&mut self, ctx: &mut EnemyBody) -> Transition {
        let attack = match ctx.combat.as_mut() {
            Some(combat) => combat.try_attack(),
            None => None,
        };
        let Some(attack) = attack else {
            tracing::warn!("{}: melee attack entered with no attack available", ctx.id);
            return Transition::To(BehaviorStateId::Idle);
        };
        ctx.signal(Signal::AttackStarted(attack.kind()));
        self.attack = Some(attack);
        ctx.movement.stop();
        ctx.movement.look_at_target();
        ctx.movement.set_locked(true);
        Transition::Stay
    }

    fn step(&mut self, ctx: &mut EnemyBody, dt: f32) -> Transition {
        let Some(attack) = self.attack.as_mut() else {
            return Transition::To(BehaviorStateId::Idle);
        };
        if attack.advance(dt) {
            ctx.release(attack.spec());
        }
        if !attack.finished() {
            return Transition::Stay;
        }
        if ctx.can_attack() {
            Transition::To(BehaviorStateId::MeleeAttack)
        } else {
            Transition::To(BehaviorStateId::Chase)
        }
    }

    fn exit(&mut self, ctx: &mut EnemyBody) {
        self.attack = None;
        ctx.movement.set_locked(false);
    }
}

/// Walking back to the spawn point. A target back inside aggro range wins
/// over finishing the walk.
#[derive(Debug, Default)]
pub struct ReturnHome;

impl BehaviorState<EnemyBody> for ReturnHome {
    fn id(&self) -> BehaviorStateId {
        BehaviorStateId::ReturnHome
    }

    fn enter(&mut self, ctx: &mut EnemyBody) -> Transition {
        ctx.movement.move_home();
        Transition::Stay
    }

    fn step(&mut self, ctx: &mut EnemyBody, _dt: f32) -> Transition {
        if ctx.movement.target_within_aggro_radius() {
            return Transition::To(BehaviorStateId::Chase);
        }
        if ctx.movement.at_home_position() {
            if ctx.config.reset_health_on_return {
                ctx.health.restore_full();
            }
            return Transition::To(BehaviorStateId::Idle);
        }
        Transition::Stay
    }

    fn exit(&mut self, ctx: &mut EnemyBody) {
        ctx.movement.stop();
    }
}
