//! Movement capability contract and a kinematic reference implementation
//!
//! States only ever see predicates and intents. Radii, timers and
//! geometry belong to the movement capability. Every method has an inert
//! default, so a capability that doesn't support something degrades to
//! "stand still, see nothing" instead of failing.

use crate::core::config::{EnemyConfig, PlayerConfig};
use crate::core::types::{EntityId, Vec2};

pub trait Movement {
    fn position(&self) -> Vec2;

    /// Unit vector the entity is facing
    fn facing(&self) -> Vec2 {
        Vec2::new(1.0, 0.0)
    }

    /// Current target, as last observed
    fn target(&self) -> Option<EntityId> {
        None
    }

    /// Sensing phase: tell the capability where the target is this tick
    fn observe_target(&mut self, _target: Option<(EntityId, Vec2)>) {}

    fn target_distance(&self) -> Option<f32> {
        None
    }

    fn look_at_target(&mut self) {}
    fn move_to_target(&mut self) {}

    /// Pursuit starts now (resets the chase window)
    fn begin_chase(&mut self) {}

    fn move_home(&mut self) {}
    fn move_in_direction(&mut self, _direction: Vec2) {}

    /// Fixed-speed burst (rolls, dashes) until `stop`
    fn burst(&mut self, _direction: Vec2, _speed: f32) {}

    fn stop(&mut self) {}
    fn set_locked(&mut self, _locked: bool) {}
    fn set_collisions_enabled(&mut self, _enabled: bool) {}

    fn collisions_enabled(&self) -> bool {
        true
    }

    fn target_within_aggro_radius(&self) -> bool {
        false
    }

    fn target_within_leash_radius(&self) -> bool {
        false
    }

    fn target_within_chase_window(&self) -> bool {
        false
    }

    fn at_home_position(&self) -> bool {
        true
    }

    /// Walk the patrol route. Returns true when a leg is finished.
    fn patrol_step(&mut self, _dt: f32) -> bool {
        true
    }

    fn start_patrol_idle_timer(&mut self) {}

    /// Returns true once the idle pause has run out
    fn tick_patrol_idle(&mut self, _dt: f32) -> bool {
        false
    }

    /// Physics phase: apply the current intent
    fn integrate(&mut self, _dt: f32) {}
}

/// Tuning for [`Locomotion`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocomotionParams {
    pub speed: f32,
    pub aggro_radius: f32,
    pub leash_radius: f32,
    pub chase_window: f32,
    pub patrol_idle: f32,
    pub patrol_leg_timeout: f32,
    pub arrive_tolerance: f32,
}

impl LocomotionParams {
    pub fn enemy(config: &EnemyConfig) -> Self {
        Self {
            speed: config.move_speed,
            aggro_radius: config.aggro_radius,
            leash_radius: config.leash_radius,
            chase_window: config.chase_window,
            patrol_idle: config.patrol_idle,
            patrol_leg_timeout: config.patrol_leg_timeout,
            arrive_tolerance: config.arrive_tolerance,
        }
    }

    /// Players never aggro or patrol
    pub fn player(config: &PlayerConfig) -> Self {
        Self {
            speed: config.move_speed,
            aggro_radius: 0.0,
            leash_radius: 0.0,
            chase_window: 0.0,
            patrol_idle: 0.0,
            patrol_leg_timeout: 0.0,
            arrive_tolerance: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Intent {
    Still,
    Toward(Vec2),
    Target,
    Home,
    Direction(Vec2),
    Burst { direction: Vec2, speed: f32 },
}

/// Straight-line kinematics on an open plane
#[derive(Debug, Clone)]
pub struct Locomotion {
    position: Vec2,
    home: Vec2,
    facing: Vec2,
    params: LocomotionParams,
    intent: Intent,
    locked: bool,
    collisions: bool,
    target: Option<(EntityId, Vec2)>,
    patrol: Vec<Vec2>,
    patrol_index: usize,
    leg_elapsed: f32,
    idle_remaining: f32,
    chasing: bool,
    chase_elapsed: f32,
}

impl Locomotion {
    /// Home is the spawn position
    pub fn new(position: Vec2, params: LocomotionParams) -> Self {
        Self {
            position,
            home: position,
            facing: Vec2::new(1.0, 0.0),
            params,
            intent: Intent::Still,
            locked: false,
            collisions: true,
            target: None,
            patrol: Vec::new(),
            patrol_index: 0,
            leg_elapsed: 0.0,
            idle_remaining: 0.0,
            chasing: false,
            chase_elapsed: 0.0,
        }
    }

    pub fn with_patrol(mut self, waypoints: Vec<Vec2>) -> Self {
        self.patrol = waypoints;
        self
    }

    pub fn home(&self) -> Vec2 {
        self.home
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    fn step_toward(&mut self, point: Vec2, dt: f32) {
        let delta = point - self.position;
        let distance = delta.length();
        if distance <= self.params.arrive_tolerance {
            return;
        }
        let direction = delta.normalize();
        self.facing = direction;
        let travel = (self.params.speed * dt).min(distance);
        self.position = self.position + direction * travel;
    }
}

impl Movement for Locomotion {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn facing(&self) -> Vec2 {
        self.facing
    }

    fn target(&self) -> Option<EntityId> {
        self.target.map(|(id, _)| id)
    }

    fn observe_target(&mut self, target: Option<(EntityId, Vec2)>) {
        self.target = target;
    }

    fn target_distance(&self) -> Option<f32> {
        self.target.map(|(_, at)| self.position.distance(&at))
    }

    fn look_at_target(&mut self) {
        if let Some((_, at)) = self.target {
            let direction = (at - self.position).normalize();
            if direction != Vec2::ZERO {
                self.facing = direction;
            }
        }
    }

    fn move_to_target(&mut self) {
        self.intent = Intent::Target;
    }

    fn begin_chase(&mut self) {
        self.chasing = true;
        self.chase_elapsed = 0.0;
    }

    fn move_home(&mut self) {
        self.chasing = false;
        self.intent = Intent::Home;
    }

    fn move_in_direction(&mut self, direction: Vec2) {
        self.intent = Intent::Direction(direction);
    }

    fn burst(&mut self, direction: Vec2, speed: f32) {
        self.intent = Intent::Burst {
            direction: direction.normalize(),
            speed,
        };
    }

    fn stop(&mut self) {
        self.intent = Intent::Still;
    }

    fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    fn set_collisions_enabled(&mut self, enabled: bool) {
        self.collisions = enabled;
    }

    fn collisions_enabled(&self) -> bool {
        self.collisions
    }

    fn target_within_aggro_radius(&self) -> bool {
        self.target_distance()
            .is_some_and(|distance| distance <= self.params.aggro_radius)
    }

    /// The target is still close enough to home to be worth chasing
    fn target_within_leash_radius(&self) -> bool {
        self.target
            .is_some_and(|(_, at)| at.distance(&self.home) <= self.params.leash_radius)
    }

    fn target_within_chase_window(&self) -> bool {
        self.chase_elapsed <= self.params.chase_window
    }

    fn at_home_position(&self) -> bool {
        self.position.distance(&self.home) <= self.params.arrive_tolerance
    }

    fn patrol_step(&mut self, dt: f32) -> bool {
        if self.patrol.is_empty() {
            self.intent = Intent::Still;
            return true;
        }
        let waypoint = self.patrol[self.patrol_index];
        self.leg_elapsed += dt;
        let arrived = self.position.distance(&waypoint) <= self.params.arrive_tolerance;
        if arrived || self.leg_elapsed >= self.params.patrol_leg_timeout {
            self.patrol_index = (self.patrol_index + 1) % self.patrol.len();
            self.leg_elapsed = 0.0;
            self.intent = Intent::Still;
            return true;
        }
        self.intent = Intent::Toward(waypoint);
        false
    }

    fn start_patrol_idle_timer(&mut self) {
        self.idle_remaining = self.params.patrol_idle;
    }

    fn tick_patrol_idle(&mut self, dt: f32) -> bool {
        self.idle_remaining -= dt;
        self.idle_remaining <= 0.0
    }

    fn integrate(&mut self, dt: f32) {
        if self.chasing {
            self.chase_elapsed += dt;
        }
        if self.locked {
            return;
        }
        match self.intent {
            Intent::Still => {}
            Intent::Toward(point) => self.step_toward(point, dt),
            Intent::Target => {
                if let Some((_, at)) = self.target {
                    self.step_toward(at, dt);
                }
            }
            Intent::Home => {
                let home = self.home;
                self.step_toward(home, dt);
            }
            Intent::Direction(direction) => {
                let magnitude = direction.length().min(1.0);
                if magnitude > 0.0 {
                    self.facing = direction.normalize();
                    self.position =
                        self.position + direction.normalize() * (magnitude * self.params.speed * dt);
                }
            }
            Intent::Burst { direction, speed } => {
                self.position = self.position + direction * (speed * dt);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> LocomotionParams {
        LocomotionParams {
            speed: 2.0,
            aggro_radius: 5.0,
            leash_radius: 10.0,
            chase_window: 3.0,
            patrol_idle: 1.0,
            patrol_leg_timeout: 4.0,
            arrive_tolerance: 0.1,
        }
    }

    #[test]
    fn test_aggro_and_leash_predicates() {
        let mut body = Locomotion::new(Vec2::ZERO, params());
        assert!(!body.target_within_aggro_radius());

        body.observe_target(Some((EntityId::new(), Vec2::new(4.0, 0.0))));
        assert!(body.target_within_aggro_radius());
        assert!(body.target_within_leash_radius());

        body.observe_target(Some((EntityId::new(), Vec2::new(12.0, 0.0))));
        assert!(!body.target_within_aggro_radius());
        assert!(!body.target_within_leash_radius());
    }

    #[test]
    fn test_move_to_target_closes_distance() {
        let mut body = Locomotion::new(Vec2::ZERO, params());
        body.observe_target(Some((EntityId::new(), Vec2::new(4.0, 0.0))));
        body.move_to_target();
        body.integrate(1.0);
        assert!((body.position().x - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_locked_body_does_not_move() {
        let mut body = Locomotion::new(Vec2::ZERO, params());
        body.move_in_direction(Vec2::new(1.0, 0.0));
        body.set_locked(true);
        body.integrate(1.0);
        assert_eq!(body.position(), Vec2::ZERO);
    }

    #[test]
    fn test_chase_window_runs_out() {
        let mut body = Locomotion::new(Vec2::ZERO, params());
        body.begin_chase();
        body.integrate(2.0);
        assert!(body.target_within_chase_window());
        body.integrate(2.0);
        assert!(!body.target_within_chase_window());

        body.begin_chase();
        assert!(body.target_within_chase_window());
    }

    #[test]
    fn test_patrol_leg_reaches_waypoint() {
        let mut body =
            Locomotion::new(Vec2::ZERO, params()).with_patrol(vec![Vec2::new(1.0, 0.0)]);
        assert!(!body.patrol_step(0.1));
        body.integrate(1.0);
        assert!(body.patrol_step(0.1));
    }

    #[test]
    fn test_patrol_leg_times_out() {
        let mut body =
            Locomotion::new(Vec2::ZERO, params()).with_patrol(vec![Vec2::new(100.0, 0.0)]);
        body.set_locked(true);
        assert!(!body.patrol_step(2.0));
        assert!(body.patrol_step(2.0));
    }

    #[test]
    fn test_return_home() {
        let mut body = Locomotion::new(Vec2::ZERO, params());
        body.move_in_direction(Vec2::new(1.0, 0.0));
        body.integrate(1.0);
        assert!(!body.at_home_position());

        body.move_home();
        body.integrate(2.0);
        assert!(body.at_home_position());
    }

    #[test]
    fn test_patrol_idle_timer() {
        let mut body = Locomotion::new(Vec2::ZERO, params());
        body.start_patrol_idle_timer();
        assert!(!body.tick_patrol_idle(0.6));
        assert!(body.tick_patrol_idle(0.6));
    }
}
