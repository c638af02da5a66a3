//! Frame driver: turns host animation callbacks into fixed-rate simulation
//! steps.
//!
//! # Invariants
//! - At most one step per host callback; no catch-up stepping.
//! - A step runs only when the target-rate frame counter advances.
//! - Stopping cancels the pending callback and resets the timing epoch.
//! - A replaced world keeps stepping until its death resolves; only then does
//!   the incoming world take its place.

mod driver;
mod host;
mod stage;
mod timer;

pub use driver::FrameDriver;
pub use host::{FrameHost, FrameToken, HeadlessHost};
pub use stage::Stage;
pub use timer::StepTimer;

pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"))
}
