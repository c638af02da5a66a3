//! Shared value types for the pixelswarm engine.
//!
//! # Invariants
//! - `Vector` arithmetic is total: no operation panics or returns an error.

mod types;
mod vector;

pub use types::{Bounds, Dimensions, ParticleId, Rgba};
pub use vector::Vector;
