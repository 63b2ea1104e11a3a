//! Pointer input contract.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }
}

/// Pointer event arguments in model coordinates. Converting from screen
/// space is the host's concern.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputArgs {
    pub x: f64,
    pub y: f64,
    pub modifiers: Modifiers,
}

impl InputArgs {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(x: f64, y: f64, modifiers: Modifiers) -> Self {
        Self { x, y, modifiers }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Pointer events in gesture order. The host maps its primary button to
/// `BeginDown`/`BeginUp` and its secondary button to `EndDown`/`EndUp`;
/// per gesture, down arrives first, then zero or more moves, then up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    BeginDown(InputArgs),
    BeginUp(InputArgs),
    EndDown(InputArgs),
    EndUp(InputArgs),
    Move(InputArgs),
}
