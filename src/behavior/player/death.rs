//! Terminal player state

use crate::behavior::player::body::PlayerBody;
use crate::fsm::{BehaviorState, BehaviorStateId, Transition};

/// Lingers for `death_linger` seconds with movement and collisions off,
/// then flags the body so the owner can tear the entity down.
#[derive(Debug, Default)]
pub struct Death {
    remaining: f32,
}

impl BehaviorState<PlayerBody> for Death {
    fn id(&self) -> BehaviorStateId {
        BehaviorStateId::Death
    }

    fn enter(&mut self, ctx: &mut PlayerBody) -> Transition {
        self.remaining = ctx.config.death_linger;
        ctx.movement.stop();
        ctx.movement.set_locked(true);
        ctx.movement.set_collisions_enabled(false);
        Transition::Stay
    }

    fn step(&mut self, ctx: &mut PlayerBody, dt: f32) -> Transition {
        if ctx.death_finished {
            return Transition::Stay;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            tracing::debug!("{}: death linger elapsed", ctx.id);
            ctx.death_finished = true;
        }
        Transition::Stay
    }
}
