use std::time::Duration;

use pixelswarm_common::Rgba;
use pixelswarm_driver::{FrameDriver, FrameHost, HeadlessHost, Stage};
use pixelswarm_image::{ParticleOptions, ParticleOverrides, PixelGrid, populate_world};
use pixelswarm_input::{DEFAULT_TRANSIENT_MS, PointerAction, PointerInteraction};
use pixelswarm_kernel::{World, forces};
use pixelswarm_render::{CanvasRenderer, Renderer, SvgCanvas};
use rand::rngs::StdRng;

use crate::scene::SceneConfig;

/// How a headless run is driven.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Host callbacks to deliver.
    pub frames: usize,
    /// Host callback rate, independent of the simulation frame rate.
    pub host_hz: f64,
    /// Pointer position applied halfway through the run.
    pub poke: Option<(f64, f64)>,
    /// Host frame at which a freshly shuffled world is queued.
    pub swap_at: Option<usize>,
}

/// What a finished run leaves behind.
pub struct RunReport {
    pub stage: Stage,
    pub renderer: CanvasRenderer<SvgCanvas>,
    pub steps: u64,
    pub average_step: Duration,
    pub max_step: Duration,
}

/// Build the scene's world and drive it through `run.frames` host callbacks.
pub fn run_scene(
    scene: &SceneConfig,
    grid: &PixelGrid,
    run: &RunOptions,
    rng: &mut StdRng,
) -> anyhow::Result<RunReport> {
    if !(run.host_hz.is_finite() && run.host_hz > 0.0) {
        anyhow::bail!("host rate must be positive, got {}", run.host_hz);
    }

    let mut stage = Stage::new(build_scene(scene, grid, rng)?);
    let mut driver = FrameDriver::new(HeadlessHost::new(), scene.world.frame_rate)?;
    let mut renderer =
        CanvasRenderer::new(SvgCanvas::new(scene.setup.canvas, scene.background.clone()));
    let mut pointer = PointerInteraction::new(scene.interaction, DEFAULT_TRANSIENT_MS);

    let host_interval_ms = 1000.0 / run.host_hz;
    driver.start();
    for frame in 0..run.frames {
        let now = driver.host().now_ms();
        if frame == run.frames / 2 {
            if let Some((x, y)) = run.poke {
                pointer.handle(stage.current_mut(), PointerAction::Moved { x, y }, now)?;
            }
        }
        if run.swap_at == Some(frame) {
            pointer.teardown(stage.current_mut())?;
            stage.replace(build_scene(scene, grid, rng)?);
        }
        pointer.update(stage.current_mut(), now)?;
        for token in driver.host_mut().take_pending() {
            driver.on_frame(token, || {
                stage.step();
                renderer.render(stage.current());
            });
        }
        driver.host_mut().advance(host_interval_ms);
    }
    driver.stop();
    pointer.teardown(stage.current_mut())?;

    let timer = driver.timer();
    tracing::info!(
        steps = driver.steps_run(),
        swaps = stage.swaps(),
        particles = stage.current().particle_count(),
        "run finished"
    );
    Ok(RunReport {
        steps: driver.steps_run(),
        average_step: timer.average(),
        max_step: timer.max(),
        stage,
        renderer,
    })
}

/// A world with friction and jitter at the root and one scope per pixel.
pub fn build_scene(
    scene: &SceneConfig,
    grid: &PixelGrid,
    rng: &mut StdRng,
) -> anyhow::Result<World> {
    let mut world = World::new(scene.world.clone())?;
    world.add_force(forces::friction())?;
    world.add_force(forces::entropy(scene.entropy))?;
    let overrides = if scene.pixel_colors {
        ParticleOverrides::default().pixel_colors()
    } else {
        ParticleOverrides::default()
    };
    let options = ParticleOptions::with_overrides(overrides);
    populate_world(&mut world, grid, &scene.setup, &options, rng)?;
    Ok(world)
}

/// A shaded disc on a transparent square.
pub fn demo_grid(size: u32) -> PixelGrid {
    let centre = f64::from(size) / 2.0;
    PixelGrid::from_fn(size, size, |x, y| {
        let dx = f64::from(x) + 0.5 - centre;
        let dy = f64::from(y) + 0.5 - centre;
        let d = (dx * dx + dy * dy).sqrt() / centre;
        if d > 1.0 {
            return Rgba::new(0, 0, 0, 0);
        }
        let shade = (255.0 * (1.0 - d * 0.6)) as u8;
        Rgba::new(shade, (f64::from(shade) * 0.6) as u8, 255 - shade / 2, 255)
    })
}
