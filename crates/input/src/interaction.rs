use pixelswarm_kernel::{KernelError, World};

use crate::action::{InteractionMode, PointerAction};
use crate::transient::TransientForce;

/// Maps pointer events to a transient force on a world.
#[derive(Debug, Default)]
pub struct PointerInteraction {
    mode: InteractionMode,
    transient: TransientForce,
}

impl PointerInteraction {
    pub fn new(mode: InteractionMode, duration_ms: f64) -> Self {
        Self {
            mode,
            transient: TransientForce::new(duration_ms),
        }
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: InteractionMode) {
        self.mode = mode;
    }

    pub fn is_active(&self) -> bool {
        self.transient.is_active()
    }

    pub fn handle(
        &mut self,
        world: &mut World,
        action: PointerAction,
        now_ms: f64,
    ) -> Result<(), KernelError> {
        match action {
            PointerAction::Moved { x, y } => {
                self.transient.apply(world, self.mode.force_at(x, y), now_ms)
            }
            PointerAction::Left => self.transient.cancel(world).map(|_| ()),
        }
    }

    /// Expire the force once its time is up. Call once per frame.
    pub fn update(&mut self, world: &mut World, now_ms: f64) -> Result<bool, KernelError> {
        self.transient.expire(world, now_ms)
    }

    /// Remove any attached force before the world or the interaction goes away.
    pub fn teardown(&mut self, world: &mut World) -> Result<(), KernelError> {
        self.transient.cancel(world).map(|_| ())
    }
}
