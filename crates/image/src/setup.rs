use pixelswarm_common::Dimensions;
use pixelswarm_kernel::{Force, KernelError, ScopeId, World};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::SetupError;
use crate::grid::PixelGrid;
use crate::options::{ParticleOptions, PixelContext};
use crate::target::PixelTarget;

/// Scene-level setup knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetupOptions {
    /// Upper bound on accepted pixels.
    pub max_particles: usize,
    /// Canvas units per image pixel.
    pub scale: f64,
    pub canvas: Dimensions,
    /// Strength of each particle's pull toward its target.
    pub pull_strength: f64,
}

impl Default for SetupOptions {
    fn default() -> Self {
        Self {
            max_particles: 5000,
            scale: 1.0,
            canvas: Dimensions::default(),
            pull_strength: 1.0,
        }
    }
}

/// One accepted pixel: its scope and the pull force currently attached to it.
#[derive(Debug, Clone)]
pub struct ScenePixel {
    pub scope: ScopeId,
    pub target: PixelTarget,
    force: Force,
}

impl ScenePixel {
    pub fn force(&self) -> &Force {
        &self.force
    }
}

/// The pixels placed into a world by [`populate_world`].
#[derive(Debug, Clone)]
pub struct ImageScene {
    pixels: Vec<ScenePixel>,
    pull_strength: f64,
}

impl ImageScene {
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[ScenePixel] {
        &self.pixels
    }

    /// Move every target for a new canvas size or scale.
    ///
    /// Each scope's pull force is swapped for a new one. `world` must be the
    /// world this scene was populated into. If any pixel's scope is gone,
    /// nothing is changed.
    pub fn relayout(
        &mut self,
        world: &mut World,
        canvas: Dimensions,
        scale: f64,
    ) -> Result<(), SetupError> {
        if let Some(missing) = self
            .pixels
            .iter()
            .find(|p| !world.tree().contains(p.scope))
        {
            return Err(KernelError::ScopeNotFound(missing.scope).into());
        }
        for pixel in &mut self.pixels {
            let tree = world.tree_mut();
            tree.remove_force(pixel.scope, &pixel.force)?;
            pixel.target.canvas = canvas;
            pixel.target.scale = scale;
            pixel.force = pixel.target.force(self.pull_strength);
            tree.add_force(pixel.scope, pixel.force.clone())?;
        }
        tracing::debug!(pixels = self.pixels.len(), scale, "scene relaid out");
        Ok(())
    }
}

/// Populate `world` from `grid`.
///
/// Pixel indices are shuffled with `rng` and taken from the end until
/// `setup.max_particles` pixels pass `options.filter` or the grid runs out.
/// Each accepted pixel gets a child scope of the root holding its particle
/// and a pull toward its target. On error every scope added so far is
/// removed again, leaving `world` as it was.
pub fn populate_world<R>(
    world: &mut World,
    grid: &PixelGrid,
    setup: &SetupOptions,
    options: &ParticleOptions,
    rng: &mut R,
) -> Result<ImageScene, SetupError>
where
    R: Rng + ?Sized,
{
    let mut pixels = Vec::with_capacity(setup.max_particles.min(grid.len()));
    if let Err(err) = place_pixels(world, grid, setup, options, rng, &mut pixels) {
        let root = world.root();
        for pixel in &pixels {
            world.tree_mut().remove_child_scope(root, pixel.scope)?;
        }
        tracing::warn!(%err, discarded = pixels.len(), "image scene setup failed");
        return Err(err);
    }
    Ok(ImageScene {
        pixels,
        pull_strength: setup.pull_strength,
    })
}

fn place_pixels<R>(
    world: &mut World,
    grid: &PixelGrid,
    setup: &SetupOptions,
    options: &ParticleOptions,
    rng: &mut R,
    pixels: &mut Vec<ScenePixel>,
) -> Result<(), SetupError>
where
    R: Rng + ?Sized,
{
    let mut order: Vec<usize> = (0..grid.len()).collect();
    order.shuffle(rng);

    let width = grid.width() as usize;
    let limit = setup.max_particles.min(grid.len());
    let mut visited = 0usize;

    while pixels.len() < limit {
        let Some(index) = order.pop() else {
            break;
        };
        visited += 1;
        let (x, y) = ((index % width) as u32, (index / width) as u32);
        let Some(pixel) = grid.get(x, y) else {
            continue;
        };
        let target = PixelTarget {
            pixel_x: x,
            pixel_y: y,
            image: grid.dimensions(),
            canvas: setup.canvas,
            scale: setup.scale,
        };
        let ctx = PixelContext {
            x,
            y,
            pixel,
            grid,
            final_position: target.position(),
        };
        if !options.accepts(&ctx) {
            continue;
        }

        let particle = options.particle(&ctx);
        particle
            .validate()
            .map_err(|reason| KernelError::InvalidParticle {
                id: particle.id,
                reason,
            })?;

        let scope = world.create_child_scope()?;
        let force = target.force(setup.pull_strength);
        let tree = world.tree_mut();
        tree.add_force(scope, force.clone())?;
        tree.add_particle(scope, particle)?;
        pixels.push(ScenePixel {
            scope,
            target,
            force,
        });
    }

    tracing::info!(
        accepted = pixels.len(),
        visited,
        total = grid.len(),
        "image scene populated"
    );
    Ok(())
}
