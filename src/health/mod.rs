//! Health records and the damage mitigation pipeline

pub mod damage;
pub mod mitigation;
pub mod record;
pub mod rolls;

pub use damage::{DamageEvent, DamageOutcome, HealthNotice, Rejection};
pub use mitigation::{Absorption, ArmorAbsorption, DamageGate, EvasionCheck, ResistAbsorption};
pub use record::HealthRecord;
pub use rolls::{ChanceRoll, CritTable, RolledEvasion, StrikeRoll};
