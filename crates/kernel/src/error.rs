use pixelswarm_common::ParticleId;

use crate::scope::ScopeId;

/// Invalid numeric configuration, rejected before it reaches the tick loop.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("frame rate must be finite and positive, got {0}")]
    InvalidFrameRate(f64),
    #[error("{phase} duration must be finite and positive, got {value} ms")]
    InvalidDuration { phase: &'static str, value: f64 },
}

/// Errors from scope tree and world operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KernelError {
    #[error("scope {0:?} not found")]
    ScopeNotFound(ScopeId),
    #[error("particle {id:?} is invalid: {reason}")]
    InvalidParticle { id: ParticleId, reason: &'static str },
    #[error(transparent)]
    Config(#[from] ConfigError),
}
