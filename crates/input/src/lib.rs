//! Interaction: pointer input mapped to short-lived forces on the world.
//!
//! # Invariants
//! - At most one interactive force is attached at a time; a new pointer
//!   event replaces it.
//! - An interactive force is removed when its duration lapses, when the
//!   pointer leaves, or on teardown. None outlives its interaction.

pub mod action;
mod interaction;
mod transient;

pub use action::{InteractionMode, PointerAction};
pub use interaction::PointerInteraction;
pub use transient::{DEFAULT_TRANSIENT_MS, TransientForce};

pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"))
}
