//! Enemy state-machine context

use crate::behavior::Body;
use crate::capability::{Movement, Signal};
use crate::combat::{volley, AttackSpec, Combat, Strike, StrikeOrigin};
use crate::core::config::EnemyConfig;
use crate::core::types::{EntityId, Faction};
use crate::fsm::StateHost;
use crate::health::HealthRecord;

pub struct EnemyBody {
    pub id: EntityId,
    pub movement: Box<dyn Movement>,
    pub combat: Option<Box<dyn Combat>>,
    pub health: HealthRecord,
    pub config: EnemyConfig,
    signals: Vec<Signal>,
    strikes: Vec<Strike>,
}

impl EnemyBody {
    pub fn new(
        id: EntityId,
        movement: Box<dyn Movement>,
        health: HealthRecord,
        config: EnemyConfig,
    ) -> Self {
        Self {
            id,
            movement,
            combat: None,
            health,
            config,
            signals: Vec::new(),
            strikes: Vec::new(),
        }
    }

    pub fn with_combat(mut self, combat: impl Combat + 'static) -> Self {
        self.combat = Some(Box::new(combat));
        self
    }

    /// Target in range and an attack ready. False without combat.
    pub fn can_attack(&self) -> bool {
        self.combat
            .as_ref()
            .is_some_and(|combat| combat.can_attack(self.movement.target_distance()))
    }

    /// Stand-off distance from the target while chasing
    pub fn surround_distance(&self) -> Option<f32> {
        self.config.surround_distance
    }

    pub(crate) fn release(&mut self, spec: &AttackSpec) {
        let Some(combat) = self.combat.as_deref_mut() else {
            return;
        };
        let from = StrikeOrigin {
            source: self.id,
            faction: Faction::Enemy,
            target: self.movement.target(),
            position: self.movement.position(),
            aim: self.movement.facing(),
        };
        for strike in volley(&from, spec, 1.0, combat) {
            self.signals.push(Signal::StrikeReleased {
                amount: strike.amount,
                critical: strike.critical,
            });
            self.strikes.push(strike);
        }
    }
}

impl std::fmt::Debug for EnemyBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnemyBody")
            .field("id", &self.id)
            .field("position", &self.movement.position())
            .field("health", &self.health)
            .finish()
    }
}

impl StateHost for EnemyBody {
    fn owner(&self) -> EntityId {
        self.id
    }

    fn signal(&mut self, signal: Signal) {
        self.signals.push(signal);
    }
}

impl Body for EnemyBody {
    fn faction(&self) -> Faction {
        Faction::Enemy
    }

    fn health(&self) -> &HealthRecord {
        &self.health
    }

    fn health_mut(&mut self) -> &mut HealthRecord {
        &mut self.health
    }

    fn movement(&self) -> &dyn Movement {
        self.movement.as_ref()
    }

    fn movement_mut(&mut self) -> &mut dyn Movement {
        self.movement.as_mut()
    }

    fn tick_timers(&mut self, dt: f32) {
        self.health.tick(dt);
        if let Some(combat) = self.combat.as_mut() {
            combat.tick(dt);
        }
    }

    fn despawn_delay(&self) -> f32 {
        self.config.despawn_delay
    }

    fn take_strikes(&mut self) -> Vec<Strike> {
        std::mem::take(&mut self.strikes)
    }

    fn take_signals(&mut self) -> Vec<Signal> {
        std::mem::take(&mut self.signals)
    }
}
