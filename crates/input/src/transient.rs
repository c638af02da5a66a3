use pixelswarm_kernel::{Force, KernelError, World};

/// How long an interactive force stays attached unless renewed.
pub const DEFAULT_TRANSIENT_MS: f64 = 100.0;

#[derive(Debug)]
struct Attached {
    force: Force,
    deadline_ms: f64,
}

/// A force attached to the world's root scope for a bounded time.
///
/// Applying a new force detaches the previous one first. Callers must
/// [`TransientForce::cancel`] on teardown so the force does not outlive the
/// interaction.
#[derive(Debug)]
pub struct TransientForce {
    duration_ms: f64,
    attached: Option<Attached>,
}

impl Default for TransientForce {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSIENT_MS)
    }
}

impl TransientForce {
    pub fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms,
            attached: None,
        }
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    pub fn is_active(&self) -> bool {
        self.attached.is_some()
    }

    pub fn deadline_ms(&self) -> Option<f64> {
        self.attached.as_ref().map(|a| a.deadline_ms)
    }

    /// Attach `force` until `now_ms + duration`, replacing any attached force.
    pub fn apply(&mut self, world: &mut World, force: Force, now_ms: f64) -> Result<(), KernelError> {
        self.cancel(world)?;
        world.add_force(force.clone())?;
        let deadline_ms = now_ms + self.duration_ms;
        tracing::debug!(deadline_ms, "transient force attached");
        self.attached = Some(Attached { force, deadline_ms });
        Ok(())
    }

    /// Detach the force if its deadline has passed. Returns true if it was
    /// removed.
    pub fn expire(&mut self, world: &mut World, now_ms: f64) -> Result<bool, KernelError> {
        match &self.attached {
            Some(attached) if attached.deadline_ms <= now_ms => self.cancel(world),
            _ => Ok(false),
        }
    }

    /// Detach the force now. Returns true if one was attached.
    pub fn cancel(&mut self, world: &mut World) -> Result<bool, KernelError> {
        let Some(attached) = self.attached.take() else {
            return Ok(false);
        };
        world.remove_force(&attached.force)?;
        tracing::debug!("transient force detached");
        Ok(true)
    }
}
