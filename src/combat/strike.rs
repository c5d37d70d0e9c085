//! Strikes and hit detection
//!
//! A strike is what an attack state emits on its active frame. Which
//! entities it touches is decided by a [`HitDetector`]. The default
//! detector is a reach check plus a cone.

use crate::combat::attack::{AttackKind, AttackSpec};
use crate::combat::capability::Combat;
use crate::core::types::{EntityId, Faction, Vec2};
use crate::health::damage::DamageEvent;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strike {
    pub source: EntityId,
    pub faction: Faction,
    /// Explicit target, if the attacker had one locked
    pub target: Option<EntityId>,
    pub kind: AttackKind,
    pub origin: Vec2,
    pub direction: Vec2,
    pub reach: f32,
    /// Half-angle of the hit cone (radians)
    pub arc: f32,
    pub amount: f32,
    pub critical: bool,
}

impl Strike {
    /// Damage event for a hit on something at `hit_point`
    pub fn damage_event(&self, hit_point: Vec2) -> DamageEvent {
        let normal = (self.origin - hit_point).normalize();
        DamageEvent::new(self.amount)
            .from_source(self.source)
            .at(hit_point, normal)
            .critical(self.critical)
    }
}

/// Where a volley comes from and who fires it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrikeOrigin {
    pub source: EntityId,
    pub faction: Faction,
    pub target: Option<EntityId>,
    pub position: Vec2,
    pub aim: Vec2,
}

/// Strikes for one active frame of `spec`.
///
/// Scatter attacks fan `projectiles` strikes evenly across `spread`
/// around the aim; everything else fires one. Each strike rolls its own
/// crit.
pub fn volley(
    from: &StrikeOrigin,
    spec: &AttackSpec,
    multiplier: f32,
    combat: &mut dyn Combat,
) -> Vec<Strike> {
    let count = spec.projectiles.max(1);
    let step = if count > 1 {
        spec.spread / (count - 1) as f32
    } else {
        0.0
    };
    let first = if count > 1 { -spec.spread / 2.0 } else { 0.0 };

    (0..count)
        .map(|i| {
            let roll = combat.roll_strike(spec.damage * multiplier);
            Strike {
                source: from.source,
                faction: from.faction,
                target: from.target,
                kind: spec.kind,
                origin: from.position,
                direction: from.aim.rotate(first + step * i as f32),
                reach: spec.reach,
                arc: spec.arc,
                amount: roll.amount,
                critical: roll.critical,
            }
        })
        .collect()
}

/// What a hit detector knows about a potential victim
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitCandidate {
    pub id: EntityId,
    pub faction: Faction,
    pub position: Vec2,
    /// Collision predicates enabled (disabled while dying)
    pub collidable: bool,
}

pub trait HitDetector {
    fn detect(&self, strike: &Strike, candidates: &[HitCandidate]) -> Vec<EntityId>;
}

/// Reach-and-cone hit detection.
///
/// Explicit targets are hit if within reach. Otherwise melee hits every
/// hostile in its cone and ranged shots hit the nearest one.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReachHitDetector;

impl ReachHitDetector {
    fn eligible(strike: &Strike, candidate: &HitCandidate) -> bool {
        candidate.id != strike.source
            && candidate.collidable
            && strike.faction.is_hostile_to(candidate.faction)
            && strike.origin.distance(&candidate.position) <= strike.reach
    }

    fn in_cone(strike: &Strike, candidate: &HitCandidate) -> bool {
        let to_candidate = (candidate.position - strike.origin).normalize();
        if to_candidate == Vec2::ZERO {
            return true;
        }
        let direction = strike.direction.normalize();
        if direction == Vec2::ZERO {
            return true;
        }
        to_candidate.dot(&direction) >= strike.arc.min(std::f32::consts::PI).cos()
    }
}

impl HitDetector for ReachHitDetector {
    fn detect(&self, strike: &Strike, candidates: &[HitCandidate]) -> Vec<EntityId> {
        if let Some(target) = strike.target {
            return candidates
                .iter()
                .filter(|c| c.id == target && Self::eligible(strike, c))
                .map(|c| c.id)
                .collect();
        }

        let mut hits: Vec<&HitCandidate> = candidates
            .iter()
            .filter(|c| Self::eligible(strike, c) && Self::in_cone(strike, c))
            .collect();

        match strike.kind {
            AttackKind::Melee => hits.iter().map(|c| c.id).collect(),
            AttackKind::Ranged(_) => {
                hits.sort_by(|a, b| {
                    let da = strike.origin.distance(&a.position);
                    let db = strike.origin.distance(&b.position);
                    da.total_cmp(&db)
                });
                hits.first().map(|c| vec![c.id]).unwrap_or_default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::attack::RangedMode;
    use crate::combat::capability::Loadout;
    use crate::health::rolls::CritTable;

    fn strike(kind: AttackKind) -> Strike {
        Strike {
            source: EntityId::new(),
            faction: Faction::Player,
            target: None,
            kind,
            origin: Vec2::ZERO,
            direction: Vec2::new(1.0, 0.0),
            reach: 5.0,
            arc: 0.5,
            amount: 10.0,
            critical: false,
        }
    }

    fn enemy_at(x: f32, y: f32) -> HitCandidate {
        HitCandidate {
            id: EntityId::new(),
            faction: Faction::Enemy,
            position: Vec2::new(x, y),
            collidable: true,
        }
    }

    #[test]
    fn test_melee_hits_everything_in_cone() {
        let near = enemy_at(1.0, 0.0);
        let far = enemy_at(4.0, 0.2);
        let behind = enemy_at(-1.0, 0.0);
        let out_of_reach = enemy_at(9.0, 0.0);
        let hits = ReachHitDetector.detect(
            &strike(AttackKind::Melee),
            &[near, far, behind, out_of_reach],
        );
        assert_eq!(hits, vec![near.id, far.id]);
    }

    #[test]
    fn test_ranged_hits_nearest_only() {
        let near = enemy_at(2.0, 0.0);
        let far = enemy_at(4.0, 0.0);
        let hits = ReachHitDetector.detect(
            &strike(AttackKind::Ranged(RangedMode::Normal)),
            &[far, near],
        );
        assert_eq!(hits, vec![near.id]);
    }

    #[test]
    fn test_allies_and_dying_entities_are_not_hit() {
        let mut ally = enemy_at(1.0, 0.0);
        ally.faction = Faction::Player;
        let mut dying = enemy_at(1.5, 0.0);
        dying.collidable = false;
        let hits = ReachHitDetector.detect(&strike(AttackKind::Melee), &[ally, dying]);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_explicit_target_ignores_cone() {
        let target = enemy_at(-2.0, 0.0);
        let bystander = enemy_at(1.0, 0.0);
        let mut s = strike(AttackKind::Melee);
        s.target = Some(target.id);
        assert_eq!(
            ReachHitDetector.detect(&s, &[target, bystander]),
            vec![target.id]
        );
    }

    #[test]
    fn test_damage_event_carries_attribution() {
        let s = strike(AttackKind::Melee);
        let event = s.damage_event(Vec2::new(1.0, 0.0));
        assert_eq!(event.source, Some(s.source));
        assert_eq!(event.amount, 10.0);
        assert_eq!(event.hit_normal, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_scatter_volley_fans_across_spread() {
        let spec = AttackSpec::blunderbuss();
        let mut loadout = Loadout::new(CritTable::none(), 3).with_attack(spec.clone());
        let from = StrikeOrigin {
            source: EntityId::new(),
            faction: Faction::Player,
            target: None,
            position: Vec2::ZERO,
            aim: Vec2::new(1.0, 0.0),
        };
        let strikes = volley(&from, &spec, 1.0, &mut loadout);
        assert_eq!(strikes.len(), 5);

        let first = strikes[0].direction.y.atan2(strikes[0].direction.x);
        let last = strikes[4].direction.y.atan2(strikes[4].direction.x);
        assert!((first + 0.4).abs() < 0.001);
        assert!((last - 0.4).abs() < 0.001);
        assert!(strikes[2].direction.y.abs() < 0.001);
    }

    #[test]
    fn test_single_volley_scales_damage() {
        let spec = AttackSpec::longbow();
        let mut loadout = Loadout::new(CritTable::none(), 3).with_attack(spec.clone());
        let from = StrikeOrigin {
            source: EntityId::new(),
            faction: Faction::Enemy,
            target: None,
            position: Vec2::ZERO,
            aim: Vec2::new(0.0, 1.0),
        };
        let strikes = volley(&from, &spec, 2.0, &mut loadout);
        assert_eq!(strikes.len(), 1);
        assert_eq!(strikes[0].amount, 30.0);
        assert_eq!(strikes[0].direction, Vec2::new(0.0, 1.0));
    }
}
