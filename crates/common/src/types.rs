use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a particle, stable for the particle's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticleId(pub Uuid);

impl ParticleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, for log lines and debug output.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for ParticleId {
    fn default() -> Self {
        Self::new()
    }
}

/// Axis-aligned rectangle in canvas space. `top < bottom` (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Bounds {
    /// Bounds covering a canvas of the given size with its origin at the top left.
    pub fn from_dimensions(dimensions: Dimensions) -> Self {
        Self {
            top: 0.0,
            right: dimensions.width,
            bottom: dimensions.height,
            left: 0.0,
        }
    }
}

/// Width and height of a drawing surface, in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::new(400.0, 400.0)
    }
}

/// One decoded pixel sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// CSS-style hex color, `#rrggbb`. Alpha is dropped.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn particle_id_uniqueness() {
        let a = ParticleId::new();
        let b = ParticleId::new();
        assert_ne!(a, b);
        assert_eq!(a.short().len(), 8);
    }

    #[test]
    fn bounds_from_dimensions() {
        let b = Bounds::from_dimensions(Dimensions::new(800.0, 600.0));
        assert_eq!(b.left, 0.0);
        assert_eq!(b.top, 0.0);
        assert_eq!(b.right, 800.0);
        assert_eq!(b.bottom, 600.0);
    }

    #[test]
    fn rgba_hex() {
        assert_eq!(Rgba::new(97, 217, 251, 255).to_hex(), "#61d9fb");
        assert_eq!(Rgba::default().to_hex(), "#000000");
    }
}
