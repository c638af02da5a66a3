use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A 2D vector with in-place arithmetic.
///
/// The arithmetic operations mutate the receiver and return it so calls can
/// be chained: `v.subtract(p).multiply_scalar(0.5)`. Conversions (`to_unit`,
/// `from_polar`, `sum`) produce new values instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(&mut self, other: Vector) -> &mut Self {
        self.x += other.x;
        self.y += other.y;
        self
    }

    pub fn subtract(&mut self, other: Vector) -> &mut Self {
        self.x -= other.x;
        self.y -= other.y;
        self
    }

    /// Add `scalar` to both components.
    pub fn add_scalar(&mut self, scalar: f64) -> &mut Self {
        self.x += scalar;
        self.y += scalar;
        self
    }

    pub fn multiply_scalar(&mut self, scalar: f64) -> &mut Self {
        self.x *= scalar;
        self.y *= scalar;
        self
    }

    pub fn divide_scalar(&mut self, scalar: f64) -> &mut Self {
        self.x /= scalar;
        self.y /= scalar;
        self
    }

    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Angle from the positive x axis in radians. Zero at the origin.
    pub fn angle(&self) -> f64 {
        if self.x == 0.0 && self.y == 0.0 {
            return 0.0;
        }
        self.y.atan2(self.x)
    }

    /// A copy scaled to magnitude 1, or an unscaled copy of the zero vector.
    pub fn to_unit(&self) -> Vector {
        let mut unit = *self;
        let magnitude = self.magnitude();
        if magnitude > 0.0 {
            unit.divide_scalar(magnitude);
        }
        unit
    }

    pub fn from_polar(angle: f64, magnitude: f64) -> Vector {
        Vector::new(magnitude * angle.cos(), magnitude * angle.sin())
    }

    /// Fold vectors with repeated `add`, starting from zero.
    pub fn sum<I>(vectors: I) -> Vector
    where
        I: IntoIterator<Item = Vector>,
    {
        let mut total = Vector::ZERO;
        for v in vectors {
            total.add(v);
        }
        total
    }
}

impl std::iter::Sum for Vector {
    fn sum<I: Iterator<Item = Vector>>(iter: I) -> Self {
        Vector::sum(iter)
    }
}

impl From<DVec2> for Vector {
    fn from(v: DVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Vector> for DVec2 {
    fn from(v: Vector) -> Self {
        DVec2::new(v.x, v.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn operations_chain_and_mutate_receiver() {
        let mut v = Vector::new(1.0, 2.0);
        v.add(Vector::new(1.0, 1.0))
            .multiply_scalar(3.0)
            .subtract(Vector::new(2.0, 3.0))
            .divide_scalar(2.0)
            .add_scalar(1.0);
        assert_eq!(v, Vector::new(3.0, 4.0));
    }

    #[test]
    fn copies_are_independent() {
        let original = Vector::new(1.0, 1.0);
        let mut copy = original;
        copy.add(Vector::new(5.0, 5.0));
        assert_eq!(original, Vector::new(1.0, 1.0));
        assert_eq!(copy, Vector::new(6.0, 6.0));
    }

    #[test]
    fn magnitude_and_angle() {
        let v = Vector::new(3.0, 4.0);
        assert!(approx(v.magnitude(), 5.0));
        assert!(approx(Vector::new(0.0, 2.0).angle(), std::f64::consts::FRAC_PI_2));
        assert_eq!(Vector::ZERO.angle(), 0.0);
        assert_eq!(Vector::new(-0.0, -0.0).angle(), 0.0);
    }

    #[test]
    fn to_unit_has_magnitude_one() {
        for v in [
            Vector::new(3.0, 4.0),
            Vector::new(-0.001, 0.0),
            Vector::new(1e6, -2e6),
        ] {
            assert!(approx(v.to_unit().magnitude(), 1.0));
        }
    }

    #[test]
    fn to_unit_of_zero_is_zero() {
        assert_eq!(Vector::ZERO.to_unit(), Vector::ZERO);
    }

    #[test]
    fn from_polar_round_trips_angle_and_magnitude() {
        let v = Vector::from_polar(0.75, 2.0);
        assert!(approx(v.magnitude(), 2.0));
        assert!(approx(v.angle(), 0.75));
    }

    #[test]
    fn sum_folds_from_zero() {
        assert_eq!(Vector::sum(Vec::<Vector>::new()), Vector::ZERO);
        let total: Vector = [Vector::new(1.0, 2.0), Vector::new(3.0, -1.0)]
            .into_iter()
            .sum();
        assert_eq!(total, Vector::new(4.0, 1.0));
    }

    #[test]
    fn glam_conversion() {
        let d: DVec2 = Vector::new(1.5, -2.0).into();
        assert_eq!(d, DVec2::new(1.5, -2.0));
        assert_eq!(Vector::from(d * 2.0), Vector::new(3.0, -4.0));
    }
}
