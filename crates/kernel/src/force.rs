use std::fmt;
use std::rc::Rc;

use pixelswarm_common::Vector;

use crate::particle::Particle;

/// A force field: maps a particle's current state to the force acting on it.
///
/// Forces carry no simulation state. A "moving" force (one that follows the
/// pointer, say) is modelled by building a new `Force` and swapping it for the
/// old one, never by mutating it. Clones share identity: removal from a scope
/// matches by [`Force::ptr_eq`], not by behavior.
#[derive(Clone)]
pub struct Force(Rc<dyn Fn(&Particle) -> Vector>);

impl Force {
    pub fn new<F>(field: F) -> Self
    where
        F: Fn(&Particle) -> Vector + 'static,
    {
        Self(Rc::new(field))
    }

    pub fn apply(&self, particle: &Particle) -> Vector {
        (self.0)(particle)
    }

    /// Whether both handles refer to the same force.
    pub fn ptr_eq(&self, other: &Force) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Force {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Force({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

/// The force library.
pub mod forces {
    use super::*;

    /// Added to the disturbance denominator so the force stays finite at its origin.
    const DISTURBANCE_EPSILON: f64 = 0.01;
    /// Keeps the strength divisor non-zero when `strength` is 0.
    const STRENGTH_OFFSET: f64 = 0.001;

    /// Attraction toward `(x, y)` proportional to displacement:
    /// `(target - position) * strength`.
    pub fn radial_pull(x: f64, y: f64, strength: f64) -> Force {
        let target = Vector::new(x, y);
        Force::new(move |particle| {
            let mut pull = target;
            pull.subtract(particle.position).multiply_scalar(strength);
            pull
        })
    }

    /// Repulsion away from `(x, y)` that is strong near the point and decays
    /// with distance: `-(target - position) / (d² / (strength + 0.001) + 0.01)`.
    ///
    /// Far from the origin the magnitude falls off as `strength / d`.
    pub fn disturbance(x: f64, y: f64, strength: f64) -> Force {
        let origin = Vector::new(x, y);
        Force::new(move |particle| {
            let mut push = origin;
            push.subtract(particle.position).multiply_scalar(-1.0);
            let distance = push.magnitude();
            let falloff = distance * distance / (strength + STRENGTH_OFFSET) + DISTURBANCE_EPSILON;
            push.divide_scalar(falloff);
            push
        })
    }

    /// Uniform noise in `[-0.5, 0.5)²` scaled by `magnitude`, resampled on every call.
    pub fn entropy(magnitude: f64) -> Force {
        Force::new(move |_| {
            let mut noise = Vector::new(rand::random::<f64>(), rand::random::<f64>());
            noise.add_scalar(-0.5).multiply_scalar(magnitude);
            noise
        })
    }

    /// Damping proportional to momentum: `-velocity * clamp(friction, 0, 1) * mass`.
    ///
    /// Zero when the particle is at rest. Each call returns a force with a new
    /// identity; keep the handle if it must be removed later.
    pub fn friction() -> Force {
        Force::new(|particle| {
            if particle.velocity.magnitude() == 0.0 {
                return Vector::ZERO;
            }
            let coefficient = particle.friction.clamp(0.0, 1.0);
            let mut damping = particle.velocity;
            damping.multiply_scalar(-(coefficient * particle.mass));
            damping
        })
    }
}
