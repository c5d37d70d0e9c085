//! Player non-combat states: idle, move, roll, hurt and interaction

use crate::behavior::player::body::PlayerBody;
use crate::capability::Signal;
use crate::fsm::{BehaviorState, BehaviorStateId, StateHost, Transition};

fn toward(current: BehaviorStateId, next: BehaviorStateId) -> Transition {
    if next == current {
        Transition::Stay
    } else {
        Transition::To(next)
    }
}

#[derive(Debug, Default)]
pub struct Idle;

impl BehaviorState<PlayerBody> for Idle {
    fn id(&self) -> BehaviorStateId {
        BehaviorStateId::Idle
    }

    fn enter(&mut self, ctx: &mut PlayerBody) -> Transition {
        ctx.movement.stop();
        Transition::Stay
    }

    fn step(&mut self, ctx: &mut PlayerBody, _dt: f32) -> Transition {
        toward(BehaviorStateId::Idle, ctx.locomotion_decision())
    }
}

#[derive(Debug, Default)]
pub struct Move;

impl BehaviorState<PlayerBody> for Move {
    fn id(&self) -> BehaviorStateId {
        BehaviorStateId::Move
    }

    fn step(&mut self, ctx: &mut PlayerBody, _dt: f32) -> Transition {
        let next = ctx.locomotion_decision();
        if next == BehaviorStateId::Move {
            ctx.movement.move_in_direction(ctx.input.move_axis);
        }
        toward(BehaviorStateId::Move, next)
    }

    fn exit(&mut self, ctx: &mut PlayerBody) {
        ctx.movement.stop();
    }
}

/// Dodge roll: a burst along the input (or facing) with damage ignored
/// throughout, then a short grace window once it ends.
#[derive(Debug, Default)]
pub struct Roll {
    remaining: f32,
}

impl BehaviorState<PlayerBody> for Roll {
    fn id(&self) -> BehaviorStateId {
        BehaviorStateId::Roll
    }

    fn enter(&mut self, ctx: &mut PlayerBody) -> Transition {
        let direction = if ctx.input.has_move() {
            ctx.input.move_axis
        } else {
            ctx.movement.facing()
        };
        self.remaining = ctx.config.roll_duration;
        ctx.health.grant_invulnerability(ctx.config.roll_duration);
        ctx.movement.burst(direction, ctx.config.roll_speed);
        Transition::Stay
    }

    fn step(&mut self, ctx: &mut PlayerBody, dt: f32) -> Transition {
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            Transition::To(ctx.settle_state())
        } else {
            Transition::Stay
        }
    }

    fn exit(&mut self, ctx: &mut PlayerBody) {
        self.remaining = 0.0;
        ctx.movement.stop();
        ctx.health
            .grant_invulnerability(ctx.config.post_roll_invulnerability);
        ctx.roll_cooldown = ctx.config.roll_cooldown;
    }
}

#[derive(Debug, Default)]
pub struct Hurt {
    remaining: f32,
}

impl BehaviorState<PlayerBody> for Hurt {
    fn id(&self) -> BehaviorStateId {
        BehaviorStateId::Hurt
    }

    fn enter(&mut self, ctx: &mut PlayerBody) -> Transition {
        self.remaining = ctx.config.hurt_duration;
        ctx.movement.stop();
        Transition::Stay
    }

    fn step(&mut self, ctx: &mut PlayerBody, dt: f32) -> Transition {
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            Transition::To(ctx.settle_state())
        } else {
            Transition::Stay
        }
    }
}

/// Opening the nearest interactable. Falls back to Idle when nothing is
/// in reach by the time the state is entered.
#[derive(Debug, Default)]
pub struct OpenInteraction {
    remaining: f32,
}

impl BehaviorState<PlayerBody> for OpenInteraction {
    fn id(&self) -> BehaviorStateId {
        BehaviorStateId::OpenInteraction
    }

    fn enter(&mut self, ctx: &mut PlayerBody) -> Transition {
        let position = ctx.movement.position();
        let Some(source) = ctx.interaction.as_mut() else {
            return Transition::To(BehaviorStateId::Idle);
        };
        let Some(id) = source.nearest_interactable(position) else {
            tracing::debug!("{}: nothing to interact with", ctx.id);
            return Transition::To(BehaviorStateId::Idle);
        };
        source.interact(id);
        ctx.movement.stop();
        self.remaining = ctx.config.interact_duration;
        ctx.signal(Signal::InteractionStarted(id));
        Transition::Stay
    }

    fn step(&mut self, _ctx: &mut PlayerBody, dt: f32) -> Transition {
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            Transition::To(BehaviorStateId::Idle)
        } else {
            Transition::Stay
        }
    }
}
