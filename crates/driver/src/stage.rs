use pixelswarm_kernel::{DeathSignal, World};

/// Owns the world being shown and sequences replacement.
///
/// [`Stage::replace`] starts the current world's death. The outgoing world
/// keeps stepping (and should keep rendering) until its [`DeathSignal`]
/// resolves; the step that resolves it promotes the incoming world, so two
/// unrelated particle sets are never shown together.
#[derive(Debug)]
pub struct Stage {
    current: World,
    incoming: Option<World>,
    outgoing: Option<DeathSignal>,
    swaps: u64,
}

impl Stage {
    pub fn new(world: World) -> Self {
        Self {
            current: world,
            incoming: None,
            outgoing: None,
            swaps: 0,
        }
    }

    /// The world to step and render this frame.
    pub fn current(&self) -> &World {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut World {
        &mut self.current
    }

    pub fn into_current(self) -> World {
        self.current
    }

    /// Queue `next` behind the current world's death. If a swap is already
    /// in flight, `next` replaces the queued world and the same death is
    /// awaited.
    pub fn replace(&mut self, next: World) -> DeathSignal {
        if self.incoming.replace(next).is_some() {
            tracing::debug!("queued world replaced before promotion");
        }
        let signal = self.current.initiate_death();
        self.outgoing = Some(signal.clone());
        tracing::debug!(state = ?self.current.state(), "world swap requested");
        signal
    }

    pub fn is_swapping(&self) -> bool {
        self.incoming.is_some()
    }

    /// Completed swaps.
    pub fn swaps(&self) -> u64 {
        self.swaps
    }

    /// Tick the current world once. Returns true if this step finished the
    /// outgoing world's death and promoted the incoming one.
    pub fn step(&mut self) -> bool {
        self.current.tick();
        let resolved = self.outgoing.as_ref().is_some_and(DeathSignal::is_resolved);
        if !resolved {
            return false;
        }
        self.outgoing = None;
        match self.incoming.take() {
            Some(next) => {
                let previous = std::mem::replace(&mut self.current, next);
                self.swaps += 1;
                tracing::debug!(
                    retired_ticks = previous.tick_count(),
                    swaps = self.swaps,
                    "world promoted"
                );
                true
            }
            None => false,
        }
    }
}
