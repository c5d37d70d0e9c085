//! Combat capability contract and the loadout reference implementation

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::combat::attack::{AttackDescriptor, AttackSpec};
use crate::core::types::Vec2;
use crate::health::rolls::{CritTable, StrikeRoll};

/// What attack states need from an entity's weapons
pub trait Combat {
    /// The attack the next combat state would use
    fn current_attack(&self) -> Option<&AttackDescriptor>;

    fn can_attack(&self, target_distance: Option<f32>) -> bool {
        self.is_ready()
            && self
                .current_attack()
                .is_some_and(|attack| attack.can_attack(target_distance))
    }

    /// An attack is selected and off cooldown, target or not
    fn is_ready(&self) -> bool {
        self.current_attack().is_some()
    }

    /// Commit to the current attack.
    ///
    /// Returns the caller's own copy, already started, or `None` when there
    /// is nothing to attack with (no descriptor, still cooling down).
    fn try_attack(&mut self) -> Option<AttackDescriptor>;

    fn aim_direction(&self) -> Vec2;

    fn set_aim(&mut self, _direction: Vec2) {}

    /// Swap the current attack by name. Attacks already locked in by a
    /// running state are unaffected.
    fn select_attack(&mut self, _name: &str) -> bool {
        false
    }

    /// Final damage for one strike of `base`
    fn roll_strike(&mut self, base: f32) -> StrikeRoll {
        StrikeRoll {
            amount: base,
            critical: false,
        }
    }

    /// Count down cooldowns
    fn tick(&mut self, _dt: f32) {}
}

/// A set of attacks with one selected, per-attack cooldowns and crit rolls
#[derive(Debug, Clone)]
pub struct Loadout {
    attacks: Vec<AttackDescriptor>,
    cooldowns: Vec<f32>,
    selected: Option<usize>,
    aim: Vec2,
    crit: CritTable,
    rng: ChaCha8Rng,
}

impl Loadout {
    pub fn new(crit: CritTable, seed: u64) -> Self {
        Self {
            attacks: Vec::new(),
            cooldowns: Vec::new(),
            selected: None,
            aim: Vec2::new(1.0, 0.0),
            crit,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Add an attack. The first one added is selected.
    pub fn with_attack(mut self, spec: AttackSpec) -> Self {
        self.attacks.push(AttackDescriptor::new(spec));
        self.cooldowns.push(0.0);
        if self.selected.is_none() {
            self.selected = Some(0);
        }
        self
    }

    pub fn select(&mut self, index: usize) -> bool {
        if index < self.attacks.len() {
            self.selected = Some(index);
            true
        } else {
            false
        }
    }

    pub fn cooldown_remaining(&self) -> f32 {
        self.selected.map(|i| self.cooldowns[i]).unwrap_or(0.0)
    }
}

impl Combat for Loadout {
    fn current_attack(&self) -> Option<&AttackDescriptor> {
        self.selected.map(|i| &self.attacks[i])
    }

    fn is_ready(&self) -> bool {
        self.selected.is_some_and(|i| self.cooldowns[i] <= 0.0)
    }

    fn try_attack(&mut self) -> Option<AttackDescriptor> {
        let index = self.selected?;
        if self.cooldowns[index] > 0.0 {
            return None;
        }
        self.cooldowns[index] = self.attacks[index].spec().cooldown;
        let mut locked = self.attacks[index].clone();
        locked.try_attack();
        Some(locked)
    }

    fn aim_direction(&self) -> Vec2 {
        self.aim
    }

    fn set_aim(&mut self, direction: Vec2) {
        let direction = direction.normalize();
        if direction != Vec2::ZERO {
            self.aim = direction;
        }
    }

    fn select_attack(&mut self, name: &str) -> bool {
        match self.attacks.iter().position(|a| a.spec().name == name) {
            Some(index) => self.select(index),
            None => false,
        }
    }

    fn roll_strike(&mut self, base: f32) -> StrikeRoll {
        self.crit.roll(base, &mut self.rng)
    }

    fn tick(&mut self, dt: f32) {
        for cooldown in self.cooldowns.iter_mut() {
            *cooldown = (*cooldown - dt).max(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::attack::AttackKind;
    use crate::health::rolls::ChanceRoll;

    #[test]
    fn test_empty_loadout_cannot_attack() {
        let mut loadout = Loadout::new(CritTable::none(), 1);
        assert!(loadout.current_attack().is_none());
        assert!(!loadout.can_attack(Some(0.5)));
        assert!(loadout.try_attack().is_none());
    }

    #[test]
    fn test_cooldown_blocks_second_attack() {
        let mut loadout = Loadout::new(CritTable::none(), 1).with_attack(AttackSpec::claws());
        let first = loadout.try_attack().unwrap();
        assert!(first.is_running());
        assert!(!loadout.can_attack(Some(1.0)));
        assert!(!loadout.is_ready());
        assert!(loadout.try_attack().is_none());

        loadout.tick(0.6);
        assert!(loadout.can_attack(Some(1.0)));
    }

    #[test]
    fn test_locked_copy_survives_swap() {
        let mut loadout = Loadout::new(CritTable::none(), 1)
            .with_attack(AttackSpec::sword())
            .with_attack(AttackSpec::bow());
        let locked = loadout.try_attack().unwrap();
        assert!(loadout.select_attack("bow"));

        assert_eq!(locked.kind(), AttackKind::Melee);
        assert_eq!(
            loadout.current_attack().map(|a| a.spec().name.as_str()),
            Some("bow")
        );
    }

    #[test]
    fn test_crit_table_applies() {
        let crit = CritTable::new(ChanceRoll::always(), 2.0).unwrap();
        let mut loadout = Loadout::new(crit, 1).with_attack(AttackSpec::sword());
        let roll = loadout.roll_strike(10.0);
        assert!(roll.critical);
        assert_eq!(roll.amount, 20.0);
    }

    #[test]
    fn test_aim_ignores_zero_vector() {
        let mut loadout = Loadout::new(CritTable::none(), 1);
        loadout.set_aim(Vec2::new(0.0, 3.0));
        loadout.set_aim(Vec2::ZERO);
        assert_eq!(loadout.aim_direction(), Vec2::new(0.0, 1.0));
    }
}
