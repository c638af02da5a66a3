//! Image-to-particle setup: turns a decoded pixel grid into one child scope
//! and one particle per accepted pixel, each pulled toward its pixel's place
//! on the canvas.
//!
//! # Invariants
//! - Pixels are visited in a uniformly random order and consumed until
//!   `max_particles` are accepted or the grid is exhausted.
//! - Every accepted pixel gets its own child scope holding exactly one
//!   particle and one pull force.
//! - Pull forces are replaced, never mutated, when the layout changes.

mod error;
mod grid;
mod options;
mod setup;
mod target;

pub use error::SetupError;
pub use grid::PixelGrid;
pub use options::{ParticleOptions, ParticleOverrides, PixelContext, PixelFn};
pub use setup::{ImageScene, ScenePixel, SetupOptions, populate_world};
pub use target::PixelTarget;

pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("image"));
    }
}
