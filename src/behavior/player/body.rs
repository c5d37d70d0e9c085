//! Player state-machine context

use crate::behavior::Body;
use crate::capability::{InteractionSource, Movement, PlayerInput, Signal};
use crate::combat::{volley, AttackSpec, Combat, Strike, StrikeOrigin};
use crate::core::config::PlayerConfig;
use crate::core::types::{EntityId, Faction};
use crate::fsm::{BehaviorStateId, StateHost};
use crate::health::HealthRecord;

pub struct PlayerBody {
    pub id: EntityId,
    pub movement: Box<dyn Movement>,
    pub combat: Option<Box<dyn Combat>>,
    pub interaction: Option<Box<dyn InteractionSource>>,
    pub input: PlayerInput,
    pub health: HealthRecord,
    pub config: PlayerConfig,
    /// Seconds until the next roll is allowed
    pub roll_cooldown: f32,
    pub(crate) death_finished: bool,
    signals: Vec<Signal>,
    strikes: Vec<Strike>,
}

impl PlayerBody {
    pub fn new(
        id: EntityId,
        movement: Box<dyn Movement>,
        health: HealthRecord,
        config: PlayerConfig,
    ) -> Self {
        Self {
            id,
            movement,
            combat: None,
            interaction: None,
            input: PlayerInput::default(),
            health,
            config,
            roll_cooldown: 0.0,
            death_finished: false,
            signals: Vec::new(),
            strikes: Vec::new(),
        }
    }

    pub fn with_combat(mut self, combat: impl Combat + 'static) -> Self {
        self.combat = Some(Box::new(combat));
        self
    }

    pub fn with_interaction(mut self, source: impl InteractionSource + 'static) -> Self {
        self.interaction = Some(Box::new(source));
        self
    }

    pub fn roll_ready(&self) -> bool {
        self.roll_cooldown <= 0.0
    }

    /// Attack state the current input asks for, if combat allows it.
    ///
    /// Charged and dash attacks start on hold, everything else on press.
    /// No combat capability means no attack.
    pub fn attack_request(&self) -> Option<BehaviorStateId> {
        let combat = self.combat.as_ref()?;
        let kind = combat.current_attack()?.kind();
        let triggered = if kind.is_held() {
            self.input.attack_held
        } else {
            self.input.attack_pressed
        };
        (triggered && combat.is_ready()).then(|| kind.state())
    }

    /// Where locomotion input points the player next (attack, roll, move, idle)
    pub fn locomotion_decision(&self) -> BehaviorStateId {
        if let Some(attack) = self.attack_request() {
            return attack;
        }
        if self.input.roll_pressed && self.roll_ready() {
            return BehaviorStateId::Roll;
        }
        self.settle_state()
    }

    /// Idle or Move, depending on current input
    pub fn settle_state(&self) -> BehaviorStateId {
        if self.input.has_move() {
            BehaviorStateId::Move
        } else {
            BehaviorStateId::Idle
        }
    }

    /// Queue the strikes for one active frame of `spec`
    pub(crate) fn release(&mut self, spec: &AttackSpec, multiplier: f32) {
        let Some(combat) = self.combat.as_deref_mut() else {
            return;
        };
        let from = StrikeOrigin {
            source: self.id,
            faction: Faction::Player,
            target: None,
            position: self.movement.position(),
            aim: combat.aim_direction(),
        };
        for strike in volley(&from, spec, multiplier, combat) {
            self.signals.push(Signal::StrikeReleased {
                amount: strike.amount,
                critical: strike.critical,
            });
            self.strikes.push(strike);
        }
    }
}

impl std::fmt::Debug for PlayerBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerBody")
            .field("id", &self.id)
            .field("position", &self.movement.position())
            .field("health", &self.health)
            .field("roll_cooldown", &self.roll_cooldown)
            .field("death_finished", &self.death_finished)
            .finish()
    }
}

impl StateHost for PlayerBody {
    fn owner(&self) -> EntityId {
        self.id
    }

    fn signal(&mut self, signal: Signal) {
        self.signals.push(signal);
    }
}

impl Body for PlayerBody {
    fn faction(&self) -> Faction {
        Faction::Player
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
        self.roll_cooldown = (self.roll_cooldown - dt).max(0.0);
        self.health.tick(dt);
        if let Some(combat) = self.combat.as_mut() {
            combat.tick(dt);
        }
    }

    fn death_finished(&self) -> bool {
        self.death_finished
    }

    fn set_input(&mut self, input: PlayerInput) {
        if input.has_move() {
            if let Some(combat) = self.combat.as_mut() {
                combat.set_aim(input.move_axis);
            }
        }
        self.input = input;
    }

    fn take_strikes(&mut self) -> Vec<Strike> {
        std::mem::take(&mut self.strikes)
    }

    fn take_signals(&mut self) -> Vec<Signal> {
        std::mem::take(&mut self.signals)
    }
}
