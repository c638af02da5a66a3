use pixelswarm_common::{ParticleId, Vector};
use serde::{Deserialize, Serialize};

/// A physical point mass owned by exactly one scope.
///
/// `perceived_radius` is derived: the world rewrites it from `radius` and
/// the active timing curve while creating or dying, and renderers draw it
/// instead of `radius`. It stays 0 until the first lifecycle tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub id: ParticleId,
    pub position: Vector,
    pub velocity: Vector,
    pub mass: f64,
    pub radius: f64,
    pub perceived_radius: f64,
    /// Damping coefficient read by [`crate::forces::friction`].
    pub friction: f64,
    pub color: String,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            id: ParticleId::new(),
            position: Vector::ZERO,
            velocity: Vector::ZERO,
            mass: 100.0,
            radius: 1.0,
            perceived_radius: 0.0,
            friction: 10.0,
            color: "white".into(),
        }
    }
}

impl Particle {
    /// Check the state the integrator relies on: positive finite mass,
    /// non-negative radius, finite position and velocity.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err("mass must be finite and positive");
        }
        if !(self.radius.is_finite() && self.radius >= 0.0) {
            return Err("radius must be finite and non-negative");
        }
        let finite = |v: Vector| v.x.is_finite() && v.y.is_finite();
        if !finite(self.position) || !finite(self.velocity) {
            return Err("position and velocity must be finite");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let p = Particle::default();
        assert_eq!(p.radius, 1.0);
        assert_eq!(p.mass, 100.0);
        assert_eq!(p.friction, 10.0);
        assert_eq!(p.perceived_radius, 0.0);
        assert_eq!(p.color, "white");
        assert_eq!(p.position, Vector::ZERO);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn default_ids_are_distinct() {
        assert_ne!(Particle::default().id, Particle::default().id);
    }

    #[test]
    fn validate_rejects_bad_state() {
        let zero_mass = Particle {
            mass: 0.0,
            ..Particle::default()
        };
        assert!(zero_mass.validate().is_err());

        let negative_radius = Particle {
            radius: -1.0,
            ..Particle::default()
        };
        assert!(negative_radius.validate().is_err());

        let nan_position = Particle {
            position: Vector::new(f64::NAN, 0.0),
            ..Particle::default()
        };
        assert!(nan_position.validate().is_err());
    }
}
