//! Pixelswarm kernel: particles, force fields, nested simulation scopes and
//! the world lifecycle.
//!
//! # Invariants
//! - A tick integrates position from the previous velocity, then applies the
//!   summed forces to velocity.
//! - A scope applies its own forces plus every ancestor's, root first.
//! - Health rises monotonically while creating and falls while dying; the
//!   death signal resolves exactly once.
//! - Every lifecycle transition is reported to the callback and event log.

mod config;
mod error;
mod force;
mod particle;
mod scope;
mod signal;
mod timing;
mod world;

pub use config::WorldConfig;
pub use error::{ConfigError, KernelError};
pub use force::{Force, forces};
pub use particle::Particle;
pub use scope::{ScopeId, SimulationTree};
pub use signal::DeathSignal;
pub use timing::TimingCurve;
pub use world::{LifecycleState, StateChangeCallback, World, WorldEvent};

/// Crate name and version, for diagnostics.
pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"))
}
