use crate::vecmath::Vec2;
use serde::{Deserialize, Serialize};

/// Radius bounds the pointer's influence circle is clamped into.
pub const MIN_POINTER_RADIUS: f64 = 10.0;
pub const MAX_POINTER_RADIUS: f64 = 200.0;

/// The four interactive perturbation modes.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PointerAction {
    Heat,
    Push,
    Create,
    Spray,
}

/// Per-frame snapshot of the external pointer: position in world
/// coordinates, signed action strength, influence radius, and selected mode.
///
/// The core does not capture input itself; the embedding layer feeds this
/// struct once per frame through the setters below.
#[derive(Debug, Clone, Copy)]
pub struct Pointer {
    pub pos: Vec2,
    /// +1 while the primary button is held, -1 for the secondary, 0 when
    /// neither (or both) — 0 short-circuits all modification work.
    pub sign: i32,
    pub radius: f64,
    pub action: PointerAction,
}

impl Pointer {
    pub fn new(action: PointerAction) -> Self {
        Self {
            pos: Vec2::zero(),
            sign: 0,
            radius: 100.0,
            action,
        }
    }

    /// Updates the tracked position; `(-1, -1)` means "unchanged" and is
    /// ignored.
    pub fn set_position(&mut self, x: f64, y: f64) {
        if x != -1.0 || y != -1.0 {
            self.pos = Vec2::new(x, y);
        }
    }

    /// Derives the action sign from two competing buttons.
    pub fn set_buttons(&mut self, primary_down: bool, secondary_down: bool) {
        self.sign = primary_down as i32 - secondary_down as i32;
    }

    /// Scales the influence radius, clamped into the sane range.
    pub fn scale_radius(&mut self, factor: f64) {
        self.radius = (self.radius * factor).clamp(MIN_POINTER_RADIUS, MAX_POINTER_RADIUS);
    }

    pub fn set_action(&mut self, action: PointerAction) {
        self.action = action;
    }
}
