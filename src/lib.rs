//! Skirmish - entity behavior state machines and damage resolution
//!
//! Each entity owns a state machine over a catalog of behavior states and
//! a health record that runs every hit through a fixed mitigation
//! pipeline. The simulation loop ties them together one tick at a time.

pub mod behavior;
pub mod capability;
pub mod combat;
pub mod core;
pub mod entity;
pub mod fsm;
pub mod health;
pub mod simulation;
