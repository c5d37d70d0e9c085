//! Sense phase: who each entity is looking at

use crate::combat::HitCandidate;
use crate::core::types::{EntityId, Vec2};

/// Nearest living, collidable hostile to `observer`
pub fn nearest_hostile(
    observer: &HitCandidate,
    candidates: &[HitCandidate],
) -> Option<(EntityId, Vec2)> {
    candidates
        .iter()
        .filter(|c| {
            c.id != observer.id && c.collidable && observer.faction.is_hostile_to(c.faction)
        })
        .map(|c| (c, observer.position.distance(&c.position)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(c, _)| (c.id, c.position))
}
