//! Player behavior catalog
//!
//! | From | Condition | To |
//! |---|---|---|
//! | Idle / Move | attack input, attack ready | the attack's state |
//! | Idle / Move | roll input, roll off cooldown | Roll |
//! | Idle / Move | interact input, interactable in reach | OpenInteraction |
//! | Idle / Move | move input present / absent | Move / Idle |
//! | attacks, Roll, Hurt | finished | Idle or Move |
//! | OpenInteraction | finished | Idle |
//! | any | lethal hit | Death (requested by the owner) |

pub mod attacks;
pub mod body;
pub mod death;
pub mod locomotion;

pub use attacks::{ChargedAttack, DashAttack, Swing};
pub use body::PlayerBody;
pub use death::Death;
pub use locomotion::{Hurt, Idle, Move, OpenInteraction, Roll};

use crate::core::types::EntityId;
use crate::fsm::{BehaviorStateId, StateMachine, StepHook, Transition};

/// Interact polling shared by Idle and Move.
///
/// Runs before the state so an interact press wins over movement.
#[derive(Debug, Default)]
pub struct InteractionHook;

impl StepHook<PlayerBody> for InteractionHook {
    fn before_step(&mut self, current: BehaviorStateId, ctx: &mut PlayerBody) -> Transition {
        if !current.is_locomotion() || !ctx.input.interact_pressed {
            return Transition::Stay;
        }
        let position = ctx.movement.position();
        match ctx.interaction.as_ref() {
            Some(source) if source.nearest_interactable(position).is_some() => {
                Transition::To(BehaviorStateId::OpenInteraction)
            }
            _ => Transition::Stay,
        }
    }
}

/// Full player catalog. The machine is not started.
pub fn player_catalog(owner: EntityId) -> StateMachine<PlayerBody> {
    StateMachine::new(owner)
        .with_state(Idle)
        .with_state(Move)
        .with_state(Swing::melee())
        .with_state(Swing::ranged())
        .with_state(ChargedAttack::default())
        .with_state(DashAttack::default())
        .with_state(Roll::default())
        .with_state(Hurt::default())
        .with_state(OpenInteraction::default())
        .with_state(Death::default())
        .with_hook(InteractionHook)
}
