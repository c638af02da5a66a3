mod run;
mod scene;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use pixelswarm_common::Vector;
use pixelswarm_driver::{FrameDriver, HeadlessHost};
use pixelswarm_image::PixelGrid;
use pixelswarm_kernel::{LifecycleState, Particle, World, WorldConfig};
use pixelswarm_render::{DebugTextRenderer, Renderer};
use pixelswarm_tools::WorldInspector;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

use crate::run::{RunOptions, demo_grid, run_scene};
use crate::scene::SceneConfig;

#[derive(Parser)]
#[command(name = "pixelswarm", about = "Particle images, simulated headlessly")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions
    Info,
    /// Build a scene from an image and run it for a number of host frames
    Simulate {
        /// PNG or JPEG to load; a generated disc is used if omitted
        #[arg(short, long)]
        image: Option<PathBuf>,
        /// Scene config (JSON, or YAML by extension)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Host callbacks to deliver
        #[arg(short, long, default_value = "120")]
        frames: usize,
        /// Host callback rate, independent of the simulation frame rate
        #[arg(long, default_value = "60")]
        host_hz: f64,
        /// RNG seed for pixel selection
        #[arg(short, long)]
        seed: Option<u64>,
        /// Override the scene's particle cap
        #[arg(long)]
        max_particles: Option<usize>,
        /// Poke the swarm at X Y halfway through the run
        #[arg(long, num_args = 2, value_names = ["X", "Y"], allow_negative_numbers = true)]
        poke: Option<Vec<f64>>,
        /// Replace the world with a freshly shuffled one at this host frame
        #[arg(long)]
        swap_at: Option<usize>,
        /// Write the final frame as SVG
        #[arg(long)]
        svg: Option<PathBuf>,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
        /// Dump every particle after the run
        #[arg(long)]
        dump: bool,
    },
    /// Drive a small world through creation and death
    Lifecycle {
        #[arg(long, default_value = "30")]
        frame_rate: f64,
        #[arg(long, default_value = "1000")]
        creation_ms: f64,
        #[arg(long, default_value = "500")]
        death_ms: f64,
        /// Particles to place on a ring
        #[arg(short, long, default_value = "12")]
        particles: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("pixelswarm-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("kernel: {}", pixelswarm_kernel::crate_info());
            println!("driver: {}", pixelswarm_driver::crate_info());
            println!("render: {}", pixelswarm_render::crate_info());
            println!("input: {}", pixelswarm_input::crate_info());
            println!("image: {}", pixelswarm_image::crate_info());
            println!("tools: {}", pixelswarm_tools::crate_info());
        }
        Commands::Simulate {
            image,
            config,
            frames,
            host_hz,
            seed,
            max_particles,
            poke,
            swap_at,
            svg,
            json,
            dump,
        } => {
            let mut scene = match &config {
                Some(path) => SceneConfig::load(path)?,
                None => SceneConfig::default(),
            };
            if let Some(max) = max_particles {
                scene.setup.max_particles = max;
            }
            let grid = match &image {
                Some(path) => PixelGrid::open(path)
                    .with_context(|| format!("loading image {}", path.display()))?,
                None => demo_grid(48),
            };
            let seed = seed.unwrap_or_else(rand::random);
            println!(
                "Simulate: {}x{} pixels, seed={seed}, frames={frames}",
                grid.width(),
                grid.height()
            );

            let options = RunOptions {
                frames,
                host_hz,
                poke: poke.as_deref().and_then(|p| match p {
                    [x, y] => Some((*x, *y)),
                    _ => None,
                }),
                swap_at,
            };
            let report = run_scene(&scene, &grid, &options, &mut StdRng::seed_from_u64(seed))?;
            let stage = &report.stage;
            println!(
                "Steps: {} (avg {:?}, max {:?}), swaps: {}",
                report.steps,
                report.average_step,
                report.max_step,
                stage.swaps()
            );
            let summary = WorldInspector::summary(stage.current());
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{summary}");
                let scopes = WorldInspector::list_scopes(stage.current());
                let depth = scopes.iter().map(|s| s.depth).max().unwrap_or(0);
                println!("Scopes: {} (max depth {depth})", scopes.len());
            }
            if dump {
                print!("{}", DebugTextRenderer::new().render(stage.current()));
            }
            if let Some(path) = svg {
                std::fs::write(&path, report.renderer.canvas().document())
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("Wrote {}", path.display());
            }
        }
        Commands::Lifecycle {
            frame_rate,
            creation_ms,
            death_ms,
            particles,
        } => {
            let mut world = World::new(WorldConfig {
                frame_rate,
                creation_duration_ms: creation_ms,
                death_duration_ms: death_ms,
                ..WorldConfig::default()
            })?;
            println!(
                "Lifecycle: creation_rate={:.4}/tick death_rate={:.4}/tick",
                world.creation_rate(),
                world.death_rate()
            );
            for i in 0..particles {
                let angle = i as f64 / particles.max(1) as f64 * std::f64::consts::TAU;
                let mut position = Vector::from_polar(angle, 50.0);
                position.add_scalar(100.0);
                world.add_particle(Particle {
                    position,
                    radius: 3.0,
                    ..Particle::default()
                })?;
            }
            world.on_state_change(|state, w| {
                println!(
                    "  tick {:>4}: {state:?} (health {:.3})",
                    w.tick_count(),
                    w.health()
                );
            });

            let mut driver = FrameDriver::new(HeadlessHost::new(), frame_rate)?;
            let interval = driver.frame_interval_ms();
            driver.start();
            while world.state() == LifecycleState::Creating {
                driver.run_headless(1, interval, || world.tick());
            }
            let radius = world.all_particles().first().map(|p| p.perceived_radius);
            println!("Created: perceived radius {radius:?}");

            let death = world.initiate_death();
            while !death.is_resolved() {
                driver.run_headless(1, interval, || world.tick());
            }
            driver.stop();
            pollster::block_on(death);
            println!(
                "Dead after {} ticks; {} transitions logged",
                world.tick_count(),
                world.drain_events().len()
            );
        }
    }

    Ok(())
}
