use std::collections::BTreeMap;

use pixelswarm_kernel::World;

use crate::canvas::{Canvas, Circle};

/// Renderer-agnostic interface.
///
/// A renderer reads the world and produces output. It never mutates the
/// world; particle state is kernel-owned.
pub trait Renderer {
    type Output;

    /// Render one frame from the given world state.
    fn render(&mut self, world: &World) -> Self::Output;
}

/// Group every particle's circle by color. Colors come out sorted.
pub fn color_batches(world: &World) -> BTreeMap<&str, Vec<Circle>> {
    let mut batches: BTreeMap<&str, Vec<Circle>> = BTreeMap::new();
    for particle in world.all_particles() {
        batches
            .entry(particle.color.as_str())
            .or_default()
            .push(Circle {
                center: particle.position,
                radius: particle.perceived_radius,
            });
    }
    batches
}

/// What a canvas frame drew.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub circles: usize,
    pub batches: usize,
}

/// Clears the canvas and draws one batch per color.
#[derive(Debug)]
pub struct CanvasRenderer<C: Canvas> {
    canvas: C,
}

impl<C: Canvas> CanvasRenderer<C> {
    pub fn new(canvas: C) -> Self {
        Self { canvas }
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn into_canvas(self) -> C {
        self.canvas
    }
}

impl<C: Canvas> Renderer for CanvasRenderer<C> {
    type Output = FrameStats;

    fn render(&mut self, world: &World) -> FrameStats {
        self.canvas.clear();
        let mut stats = FrameStats::default();
        for (color, circles) in color_batches(world) {
            self.canvas.fill_circles(color, &circles);
            stats.circles += circles.len();
            stats.batches += 1;
        }
        tracing::trace!(circles = stats.circles, batches = stats.batches, "frame drawn");
        stats
    }
}

/// Human-readable dump of the world state, for the CLI and logs.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&mut self, world: &World) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== World (tick={}, state={:?}, health={:.3}) ===\n",
            world.tick_count(),
            world.state(),
            world.health()
        ));
        let particles = world.all_particles();
        out.push_str(&format!("Particles: {}\n", particles.len()));
        for p in particles {
            out.push_str(&format!(
                "  [{}] pos=({:.2}, {:.2}) r={:.2} {}\n",
                p.id.short(),
                p.position.x,
                p.position.y,
                p.perceived_radius,
                p.color
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use pixelswarm_common::{Dimensions, Vector};
    use pixelswarm_kernel::Particle;

    use super::*;

    #[derive(Debug, Default)]
    struct RecordingCanvas {
        clears: usize,
        batches: Vec<(String, Vec<Circle>)>,
    }

    impl Canvas for RecordingCanvas {
        fn dimensions(&self) -> Dimensions {
            Dimensions::default()
        }

        fn clear(&mut self) {
            self.clears += 1;
            self.batches.clear();
        }

        fn fill_circles(&mut self, color: &str, circles: &[Circle]) {
            self.batches.push((color.to_string(), circles.to_vec()));
        }
    }

    fn particle(color: &str, x: f64) -> Particle {
        Particle {
            color: color.to_string(),
            position: Vector::new(x, 0.0),
            radius: 2.0,
            ..Particle::default()
        }
    }

    fn world_with(colors: &[&str]) -> World {
        let mut world = World::default();
        for (i, color) in colors.iter().enumerate() {
            world.add_particle(particle(color, i as f64)).unwrap();
        }
        world
    }

    #[test]
    fn batches_group_by_color_in_sorted_order() {
        let world = world_with(&["white", "red", "white", "blue"]);
        let batches = color_batches(&world);
        let colors: Vec<&str> = batches.keys().copied().collect();
        assert_eq!(colors, vec!["blue", "red", "white"]);
        assert_eq!(batches["white"].len(), 2);
    }

    #[test]
    fn canvas_renderer_clears_then_draws_each_batch() {
        let world = world_with(&["white", "red", "white"]);
        let mut renderer = CanvasRenderer::new(RecordingCanvas::default());
        let stats = renderer.render(&world);
        assert_eq!(stats, FrameStats { circles: 3, batches: 2 });

        let canvas = renderer.into_canvas();
        assert_eq!(canvas.clears, 1);
        assert_eq!(canvas.batches[0].0, "red");
        assert_eq!(canvas.batches[1].0, "white");
        assert_eq!(canvas.batches[1].1.len(), 2);
    }

    #[test]
    fn circles_use_perceived_radius() {
        let mut world = world_with(&["white"]);
        let first = color_batches(&world)["white"][0];
        assert_eq!(first.radius, 0.0);

        world.set_creation_curve(pixelswarm_kernel::TimingCurve::One);
        world.tick();
        let after = color_batches(&world)["white"][0];
        assert_eq!(after.radius, 2.0);
    }

    #[test]
    fn rendering_does_not_mutate_world() {
        let world = world_with(&["white", "red"]);
        let before: Vec<Particle> = world.all_particles().into_iter().cloned().collect();
        CanvasRenderer::new(RecordingCanvas::default()).render(&world);
        DebugTextRenderer::new().render(&world);
        let after: Vec<Particle> = world.all_particles().into_iter().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn debug_renderer_empty_world() {
        let output = DebugTextRenderer::new().render(&World::default());
        assert!(output.contains("tick=0"));
        assert!(output.contains("state=Creating"));
        assert!(output.contains("Particles: 0"));
    }

    #[test]
    fn debug_renderer_lists_particles() {
        let output = DebugTextRenderer::new().render(&world_with(&["red", "white"]));
        assert!(output.contains("Particles: 2"));
        assert!(output.contains("pos=(1.00, 0.00)"));
        assert!(output.contains("red"));
    }
}
