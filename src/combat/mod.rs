//! Attacks, the combat capability and strike resolution

pub mod attack;
pub mod capability;
pub mod strike;

pub use attack::{AttackDescriptor, AttackKind, AttackSpec, RangedMode};
pub use capability::{Combat, Loadout};
pub use strike::{volley, HitCandidate, HitDetector, ReachHitDetector, Strike, StrikeOrigin};
