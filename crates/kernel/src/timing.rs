use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Timing curve mapping lifecycle health in `[0, 1]` to a radius fraction.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingCurve {
    Linear,
    #[default]
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    /// Always 1: particles appear or vanish at full size.
    One,
    /// Always 0.
    Zero,
    /// Caller-supplied curve. Should be monotonic on `[0, 1]` with values in `[0, 1]`.
    #[serde(skip)]
    Custom(Rc<dyn Fn(f64) -> f64>),
}

impl TimingCurve {
    pub fn custom<F>(curve: F) -> Self
    where
        F: Fn(f64) -> f64 + 'static,
    {
        Self::Custom(Rc::new(curve))
    }

    pub fn evaluate(&self, t: f64) -> f64 {
        match self {
            Self::Linear => t,
            Self::EaseInQuad => t * t,
            Self::EaseOutQuad => t * (2.0 - t),
            Self::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Self::One => 1.0,
            Self::Zero => 0.0,
            Self::Custom(curve) => curve(t),
        }
    }
}

impl fmt::Debug for TimingCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("Linear"),
            Self::EaseInQuad => f.write_str("EaseInQuad"),
            Self::EaseOutQuad => f.write_str("EaseOutQuad"),
            Self::EaseInOutQuad => f.write_str("EaseInOutQuad"),
            Self::One => f.write_str("One"),
            Self::Zero => f.write_str("Zero"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
