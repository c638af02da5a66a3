//! Developer tooling: read-only world inspection.
//!
//! # Invariants
//! - Inspection never mutates the world.

mod inspector;

pub use inspector::{ParticleInfo, ScopeInfo, WorldInspector, WorldSummary};

pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"))
}
