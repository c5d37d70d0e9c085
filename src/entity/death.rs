//! Death hand-off

use serde::{Deserialize, Serialize};

use crate::fsm::{BehaviorStateId, StateHost, StateMachine};

/// How a lethal hit reaches the rest of the entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathRoute {
    /// Pre-empt the machine into Death; teardown waits on that state
    StateTransition,
    /// Skip the machine and count down to teardown directly
    Finalize,
}

impl DeathRoute {
    /// Entities whose catalog has a Death state die through it
    pub fn for_machine<C: StateHost>(machine: &StateMachine<C>) -> Self {
        if machine.contains(BehaviorStateId::Death) {
            DeathRoute::StateTransition
        } else {
            DeathRoute::Finalize
        }
    }
}

/// Countdown between a finalized death and "death finished"
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Teardown {
    remaining: f32,
}

impl Teardown {
    pub fn new(delay: f32) -> Self {
        Self {
            remaining: delay.max(0.0),
        }
    }

    pub fn tick(&mut self, dt: f32) {
        self.remaining = (self.remaining - dt).max(0.0);
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn is_complete(&self) -> bool {
        self.remaining <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_teardown_counts_down() {
        let mut teardown = Teardown::new(1.0);
        assert!(!teardown.is_complete());
        teardown.tick(0.6);
        assert!(!teardown.is_complete());
        teardown.tick(0.6);
        assert!(teardown.is_complete());
        assert_eq!(teardown.remaining(), 0.0);
    }

    #[test]
    fn test_zero_delay_is_immediate() {
        assert!(Teardown::new(0.0).is_complete());
        assert!(Teardown::new(-3.0).is_complete());
    }
}
