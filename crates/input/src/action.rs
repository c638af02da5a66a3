use pixelswarm_kernel::{Force, forces};
use serde::{Deserialize, Serialize};

/// A pointer or touch event, already mapped to canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerAction {
    /// The pointer moved to `(x, y)`.
    Moved { x: f64, y: f64 },
    /// The pointer left the canvas.
    Left,
}

/// What the pointer does to nearby particles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionMode {
    /// Push particles away, strongest near the pointer.
    Repel { strength: f64 },
    /// Pull particles toward the pointer.
    Attract { strength: f64 },
}

impl Default for InteractionMode {
    fn default() -> Self {
        Self::Repel { strength: 3.0 }
    }
}

impl InteractionMode {
    /// A fresh force centred on `(x, y)`.
    pub fn force_at(&self, x: f64, y: f64) -> Force {
        match *self {
            Self::Repel { strength } => forces::disturbance(x, y, strength),
            Self::Attract { strength } => forces::radial_pull(x, y, strength),
        }
    }
}
