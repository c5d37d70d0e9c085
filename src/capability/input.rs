//! Player input and interaction lookup

use crate::core::types::{InteractableId, Vec2};

/// Stick magnitude below this counts as no input
pub const MOVE_DEADZONE: f32 = 0.1;

/// Input sampled once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    /// Desired direction, magnitude 0.0 to 1.0
    pub move_axis: Vec2,
    /// Attack went down this tick
    pub attack_pressed: bool,
    /// Attack is being held (charged and dash attacks)
    pub attack_held: bool,
    pub roll_pressed: bool,
    pub interact_pressed: bool,
}

impl PlayerInput {
    pub fn has_move(&self) -> bool {
        self.move_axis.length() > MOVE_DEADZONE
    }

    pub fn moving(direction: Vec2) -> Self {
        Self {
            move_axis: direction,
            ..Self::default()
        }
    }
}

/// Interactables near the player
pub trait InteractionSource {
    fn nearest_interactable(&self, position: Vec2) -> Option<InteractableId>;

    /// The interaction animation has started on `id`
    fn interact(&mut self, _id: InteractableId) {}
}

/// Fixed set of interactables with a pickup reach
#[derive(Debug, Clone, Default)]
pub struct Interactables {
    items: Vec<(InteractableId, Vec2)>,
    reach: f32,
    /// Interactables opened so far, in order
    pub opened: Vec<InteractableId>,
}

impl Interactables {
    pub fn new(reach: f32) -> Self {
        Self {
            items: Vec::new(),
            reach,
            opened: Vec::new(),
        }
    }

    pub fn with(mut self, id: InteractableId, position: Vec2) -> Self {
        self.items.push((id, position));
        self
    }
}

impl InteractionSource for Interactables {
    fn nearest_interactable(&self, position: Vec2) -> Option<InteractableId> {
        self.items
            .iter()
            .filter(|(id, _)| !self.opened.contains(id))
            .map(|(id, at)| (*id, at.distance(&position)))
            .filter(|(_, distance)| *distance <= self.reach)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    fn interact(&mut self, id: InteractableId) {
        self.opened.push(id);
    }
}
