//! Headless simulation loop

pub mod perception;
pub mod tick;
pub mod world;

pub use perception::nearest_hostile;
pub use tick::{SimulationEvent, TickReport};
pub use world::Simulation;
