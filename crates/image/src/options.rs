use std::fmt;
use std::rc::Rc;

use pixelswarm_common::{Rgba, Vector};
use pixelswarm_kernel::Particle;

use crate::grid::PixelGrid;

/// What a per-pixel decision function sees.
#[derive(Debug, Clone, Copy)]
pub struct PixelContext<'a> {
    pub x: u32,
    pub y: u32,
    pub pixel: Rgba,
    pub grid: &'a PixelGrid,
    /// Where this pixel's particle will settle on the canvas.
    pub final_position: Vector,
}

/// A per-pixel decision function.
pub type PixelFn<T> = Rc<dyn Fn(&PixelContext<'_>) -> T>;

fn pixel_fn<T>(f: impl Fn(&PixelContext<'_>) -> T + 'static) -> PixelFn<T> {
    Rc::new(f)
}

/// How each accepted pixel becomes a particle.
///
/// Defaults: filter accepts any pixel with non-zero alpha, radius 1, mass 25,
/// color `"white"`, friction 10, spawned at the origin at rest.
#[derive(Clone)]
pub struct ParticleOptions {
    pub filter: PixelFn<bool>,
    pub radius: PixelFn<f64>,
    pub mass: PixelFn<f64>,
    pub color: PixelFn<String>,
    pub friction: PixelFn<f64>,
    pub initial_position: PixelFn<Vector>,
    pub initial_velocity: PixelFn<Vector>,
}

impl Default for ParticleOptions {
    fn default() -> Self {
        Self {
            filter: pixel_fn(|ctx| ctx.pixel.a > 0),
            radius: pixel_fn(|_| 1.0),
            mass: pixel_fn(|_| 25.0),
            color: pixel_fn(|_| "white".to_string()),
            friction: pixel_fn(|_| 10.0),
            initial_position: pixel_fn(|_| Vector::ZERO),
            initial_velocity: pixel_fn(|_| Vector::ZERO),
        }
    }
}

impl fmt::Debug for ParticleOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParticleOptions").finish_non_exhaustive()
    }
}

impl ParticleOptions {
    /// Defaults with `overrides` applied.
    pub fn with_overrides(overrides: ParticleOverrides) -> Self {
        Self::default().merge(overrides)
    }

    /// Replace every field the overrides set.
    pub fn merge(self, overrides: ParticleOverrides) -> Self {
        Self {
            filter: overrides.filter.unwrap_or(self.filter),
            radius: overrides.radius.unwrap_or(self.radius),
            mass: overrides.mass.unwrap_or(self.mass),
            color: overrides.color.unwrap_or(self.color),
            friction: overrides.friction.unwrap_or(self.friction),
            initial_position: overrides.initial_position.unwrap_or(self.initial_position),
            initial_velocity: overrides.initial_velocity.unwrap_or(self.initial_velocity),
        }
    }

    pub fn accepts(&self, ctx: &PixelContext<'_>) -> bool {
        (self.filter)(ctx)
    }

    pub fn particle(&self, ctx: &PixelContext<'_>) -> Particle {
        Particle {
            position: (self.initial_position)(ctx),
            velocity: (self.initial_velocity)(ctx),
            mass: (self.mass)(ctx),
            radius: (self.radius)(ctx),
            friction: (self.friction)(ctx),
            color: (self.color)(ctx),
            ..Particle::default()
        }
    }
}

/// Partial [`ParticleOptions`]; set fields win when merged.
#[derive(Clone, Default)]
pub struct ParticleOverrides {
    pub filter: Option<PixelFn<bool>>,
    pub radius: Option<PixelFn<f64>>,
    pub mass: Option<PixelFn<f64>>,
    pub color: Option<PixelFn<String>>,
    pub friction: Option<PixelFn<f64>>,
    pub initial_position: Option<PixelFn<Vector>>,
    pub initial_velocity: Option<PixelFn<Vector>>,
}

impl fmt::Debug for ParticleOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParticleOverrides")
            .field("filter", &self.filter.is_some())
            .field("radius", &self.radius.is_some())
            .field("mass", &self.mass.is_some())
            .field("color", &self.color.is_some())
            .field("friction", &self.friction.is_some())
            .field("initial_position", &self.initial_position.is_some())
            .field("initial_velocity", &self.initial_velocity.is_some())
            .finish()
    }
}

impl ParticleOverrides {
    pub fn filter(mut self, f: impl Fn(&PixelContext<'_>) -> bool + 'static) -> Self {
        self.filter = Some(pixel_fn(f));
        self
    }

    pub fn radius(mut self, f: impl Fn(&PixelContext<'_>) -> f64 + 'static) -> Self {
        self.radius = Some(pixel_fn(f));
        self
    }

    pub fn mass(mut self, f: impl Fn(&PixelContext<'_>) -> f64 + 'static) -> Self {
        self.mass = Some(pixel_fn(f));
        self
    }

    pub fn color(mut self, f: impl Fn(&PixelContext<'_>) -> String + 'static) -> Self {
        self.color = Some(pixel_fn(f));
        self
    }

    /// Color each particle with its pixel's RGB.
    pub fn pixel_colors(self) -> Self {
        self.color(|ctx| ctx.pixel.to_hex())
    }

    pub fn friction(mut self, f: impl Fn(&PixelContext<'_>) -> f64 + 'static) -> Self {
        self.friction = Some(pixel_fn(f));
        self
    }

    pub fn initial_position(mut self, f: impl Fn(&PixelContext<'_>) -> Vector + 'static) -> Self {
        self.initial_position = Some(pixel_fn(f));
        self
    }

    pub fn initial_velocity(mut self, f: impl Fn(&PixelContext<'_>) -> Vector + 'static) -> Self {
        self.initial_velocity = Some(pixel_fn(f));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_ctx<T>(pixel: Rgba, f: impl FnOnce(&PixelContext<'_>) -> T) -> T {
        let grid = PixelGrid::new(1, 1, vec![pixel]).unwrap();
        let ctx = PixelContext {
            x: 0,
            y: 0,
            pixel,
            grid: &grid,
            final_position: Vector::new(7.0, 8.0),
        };
        f(&ctx)
    }

    #[test]
    fn defaults_build_a_white_particle() {
        let options = ParticleOptions::default();
        let p = with_ctx(Rgba::new(10, 20, 30, 255), |ctx| options.particle(ctx));
        assert_eq!(p.radius, 1.0);
        assert_eq!(p.mass, 25.0);
        assert_eq!(p.friction, 10.0);
        assert_eq!(p.color, "white");
        assert_eq!(p.position, Vector::ZERO);
        assert_eq!(p.velocity, Vector::ZERO);
    }

    #[test]
    fn default_filter_skips_transparent_pixels() {
        let options = ParticleOptions::default();
        assert!(with_ctx(Rgba::new(0, 0, 0, 1), |ctx| options.accepts(ctx)));
        assert!(!with_ctx(Rgba::new(255, 255, 255, 0), |ctx| options.accepts(ctx)));
    }

    #[test]
    fn overrides_win_and_unset_fields_keep_defaults() {
        let options = ParticleOptions::with_overrides(
            ParticleOverrides::default()
                .radius(|ctx| f64::from(ctx.pixel.r) / 10.0)
                .pixel_colors()
                .initial_position(|ctx| ctx.final_position),
        );
        let p = with_ctx(Rgba::new(20, 0, 255, 255), |ctx| options.particle(ctx));
        assert_eq!(p.radius, 2.0);
        assert_eq!(p.color, "#1400ff");
        assert_eq!(p.position, Vector::new(7.0, 8.0));
        assert_eq!(p.mass, 25.0);
    }

    #[test]
    fn overrides_debug_shows_which_fields_are_set() {
        let debug = format!("{:?}", ParticleOverrides::default().mass(|_| 1.0));
        assert!(debug.contains("mass: true"));
        assert!(debug.contains("radius: false"));
    }
}
