use std::fmt;

use pixelswarm_common::ParticleId;
use serde::{Deserialize, Serialize};

use crate::config::{WorldConfig, validate_duration, validate_frame_rate};
use crate::error::{ConfigError, KernelError};
use crate::force::Force;
use crate::particle::Particle;
use crate::scope::{ScopeId, SimulationTree};
use crate::signal::DeathSignal;
use crate::timing::TimingCurve;

/// Lifecycle of a world: fade in, live, fade out, gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleState {
    Creating,
    Created,
    Dying,
    Dead,
}

/// An event record produced by every lifecycle transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    StateChanged {
        tick: u64,
        from: LifecycleState,
        to: LifecycleState,
    },
}

/// Called synchronously with the new state on every lifecycle transition.
pub type StateChangeCallback = Box<dyn FnMut(LifecycleState, &World)>;

/// The root of a simulation: a scope tree plus a creation/death lifecycle.
///
/// Each [`World::tick`] first advances the lifecycle (health and perceived
/// radii), then integrates every particle in the tree. The world owns the
/// whole tree exclusively; scope operations are reached through
/// [`World::tree_mut`] or the root-scope shortcuts below.
pub struct World {
    tree: SimulationTree,
    config: WorldConfig,
    state: LifecycleState,
    health: f64,
    creation_rate: f64,
    death_rate: f64,
    ticks: u64,
    /// Health at the start of the current fade segment.
    phase_start: f64,
    /// Ticks taken in the current fade segment.
    phase_ticks: u64,
    /// Ticks the current fade segment needs to reach its endpoint.
    phase_target: u64,
    death: Option<DeathSignal>,
    on_state_change: Option<StateChangeCallback>,
    event_log: Vec<WorldEvent>,
}

impl Default for World {
    fn default() -> Self {
        Self::from_valid(WorldConfig::default())
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("state", &self.state)
            .field("health", &self.health)
            .field("ticks", &self.ticks)
            .field("scopes", &self.tree.scope_count())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl World {
    /// Create a world in the `Creating` state at health 0.
    pub fn new(config: WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: WorldConfig) -> Self {
        let mut world = Self {
            tree: SimulationTree::new(config.bounds),
            creation_rate: config.creation_rate(),
            death_rate: config.death_rate(),
            config,
            state: LifecycleState::Creating,
            health: 0.0,
            ticks: 0,
            phase_start: 0.0,
            phase_ticks: 0,
            phase_target: 0,
            death: None,
            on_state_change: None,
            event_log: Vec::new(),
        };
        world.begin_phase();
        world
    }

    /// Start a fade segment from the current health at the current rate.
    /// A segment covering distance `d` at rate `r` ends after exactly
    /// `ceil(d / r)` ticks.
    fn begin_phase(&mut self) {
        self.phase_start = self.health;
        self.phase_ticks = 0;
        self.phase_target = match self.state {
            LifecycleState::Creating => ((1.0 - self.health) / self.creation_rate).ceil() as u64,
            LifecycleState::Dying => (self.health / self.death_rate).ceil() as u64,
            LifecycleState::Created | LifecycleState::Dead => 0,
        };
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Lifecycle progress in `[0, 1]`.
    pub fn health(&self) -> f64 {
        self.health
    }

    /// Number of completed ticks.
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Health gained per tick while creating.
    pub fn creation_rate(&self) -> f64 {
        self.creation_rate
    }

    /// Health lost per tick while dying.
    pub fn death_rate(&self) -> f64 {
        self.death_rate
    }

    pub fn tree(&self) -> &SimulationTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut SimulationTree {
        &mut self.tree
    }

    pub fn root(&self) -> ScopeId {
        self.tree.root()
    }

    /// Change the integration rate. Both lifecycle rates are recomputed at
    /// once; health already gained or lost is kept.
    pub fn set_frame_rate(&mut self, frame_rate: f64) -> Result<(), ConfigError> {
        validate_frame_rate(frame_rate)?;
        self.config.frame_rate = frame_rate;
        self.creation_rate = self.config.creation_rate();
        self.death_rate = self.config.death_rate();
        self.begin_phase();
        Ok(())
    }

    pub fn set_creation_duration(&mut self, duration_ms: f64) -> Result<(), ConfigError> {
        validate_duration("creation", duration_ms)?;
        self.config.creation_duration_ms = duration_ms;
        self.creation_rate = self.config.creation_rate();
        self.begin_phase();
        Ok(())
    }

    pub fn set_death_duration(&mut self, duration_ms: f64) -> Result<(), ConfigError> {
        validate_duration("death", duration_ms)?;
        self.config.death_duration_ms = duration_ms;
        self.death_rate = self.config.death_rate();
        self.begin_phase();
        Ok(())
    }

    pub fn set_creation_curve(&mut self, curve: TimingCurve) {
        self.config.creation_curve = curve;
    }

    pub fn set_death_curve(&mut self, curve: TimingCurve) {
        self.config.death_curve = curve;
    }

    /// Register the state-change callback, replacing any previous one.
    pub fn on_state_change<F>(&mut self, callback: F)
    where
        F: FnMut(LifecycleState, &World) + 'static,
    {
        self.on_state_change = Some(Box::new(callback));
    }

    pub fn add_particle(&mut self, particle: Particle) -> Result<ParticleId, KernelError> {
        self.tree.add_particle(self.tree.root(), particle)
    }

    pub fn remove_particle(&mut self, id: ParticleId) -> Result<Option<Particle>, KernelError> {
        self.tree.remove_particle(self.tree.root(), id)
    }

    /// Add a force to the root scope, so it acts on every particle.
    pub fn add_force(&mut self, force: Force) -> Result<(), KernelError> {
        self.tree.add_force(self.tree.root(), force)
    }

    pub fn remove_force(&mut self, force: &Force) -> Result<bool, KernelError> {
        self.tree.remove_force(self.tree.root(), force)
    }

    pub fn create_child_scope(&mut self) -> Result<ScopeId, KernelError> {
        self.tree.create_child_scope(self.tree.root())
    }

    /// Every particle in the world, in tree order.
    pub fn all_particles(&self) -> Vec<&Particle> {
        self.tree.all_particles(self.tree.root()).unwrap_or_default()
    }

    pub fn particle_count(&self) -> usize {
        self.tree.particle_count(self.tree.root()).unwrap_or_default()
    }

    /// Start the death fade. Returns a handle that resolves when the world
    /// reaches `Dead`. Calling this again returns the same handle.
    pub fn initiate_death(&mut self) -> DeathSignal {
        if let Some(signal) = &self.death {
            return signal.clone();
        }
        let signal = DeathSignal::new();
        self.death = Some(signal.clone());
        self.transition(LifecycleState::Dying);
        self.begin_phase();
        signal
    }

    /// The pending or resolved death handle, if death was initiated.
    pub fn death_signal(&self) -> Option<&DeathSignal> {
        self.death.as_ref()
    }

    /// Advance the lifecycle, then integrate every particle once.
    pub fn tick(&mut self) {
        self.ticks += 1;
        match self.state {
            LifecycleState::Creating => {
                self.phase_ticks += 1;
                self.health = if self.phase_ticks >= self.phase_target {
                    1.0
                } else {
                    let gained = self.phase_ticks as f64 * self.creation_rate;
                    (self.phase_start + gained).min(1.0)
                };
                let fraction = self.config.creation_curve.evaluate(self.health);
                self.scale_perceived_radii(fraction);
                if self.health == 1.0 {
                    self.transition(LifecycleState::Created);
                }
            }
            LifecycleState::Dying => {
                self.phase_ticks += 1;
                self.health = if self.phase_ticks >= self.phase_target {
                    0.0
                } else {
                    let lost = self.phase_ticks as f64 * self.death_rate;
                    (self.phase_start - lost).max(0.0)
                };
                let fraction = self.config.death_curve.evaluate(self.health);
                self.scale_perceived_radii(fraction);
                if self.health == 0.0 {
                    self.transition(LifecycleState::Dead);
                    if let Some(signal) = &self.death {
                        signal.resolve();
                    }
                }
            }
            LifecycleState::Created | LifecycleState::Dead => {}
        }
        self.tree.tick();
        tracing::trace!(tick = self.ticks, health = self.health, "world tick");
    }

    fn scale_perceived_radii(&mut self, fraction: f64) {
        let root = self.tree.root();
        if let Err(err) = self
            .tree
            .for_each_particle_mut(root, |p| p.perceived_radius = p.radius * fraction)
        {
            tracing::error!(%err, "root scope missing during lifecycle update");
        }
    }

    fn transition(&mut self, to: LifecycleState) {
        let from = self.state;
        if from == to {
            return;
        }
        self.state = to;
        tracing::info!(?from, ?to, tick = self.ticks, "world lifecycle transition");
        self.event_log.push(WorldEvent::StateChanged {
            tick: self.ticks,
            from,
            to,
        });
        if let Some(mut callback) = self.on_state_change.take() {
            callback(to, self);
            if self.on_state_change.is_none() {
                self.on_state_change = Some(callback);
            }
        }
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }
}
