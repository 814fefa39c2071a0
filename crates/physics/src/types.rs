use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// 2D vector in world units (pixels for the stick walk rig, y grows downwards).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self - other).length()
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// Point mass. Pinned particles are never moved by an integrator (the ground
/// anchor is pinned).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub mass: f64,
    pub pinned: bool,
}

impl Particle {
    /// Free particle at rest.
    #[must_use]
    pub const fn new(position: Vec2, mass: f64) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            mass,
            pinned: false,
        }
    }

    /// Pinned particle at rest.
    #[must_use]
    pub const fn pinned(position: Vec2, mass: f64) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            mass,
            pinned: true,
        }
    }

    #[must_use]
    pub const fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Returns the reason this particle cannot be simulated, if any.
    pub(crate) fn validate(&self) -> Result<(), &'static str> {
        if !self.position.is_finite() {
            return Err("position is not finite");
        }
        if !self.velocity.is_finite() {
            return Err("velocity is not finite");
        }
        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err("mass must be finite and positive");
        }
        Ok(())
    }
}

/// One of the two ends of an edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Begin,
    End,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Begin => f.write_str("begin"),
            Endpoint::End => f.write_str("end"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_arithmetic() {
        let a = Vec2::new(3.0, 4.0);
        let b = Vec2::new(1.0, -2.0);
        assert_eq!(a + b, Vec2::new(4.0, 2.0));
        assert_eq!(a - b, Vec2::new(2.0, 6.0));
        assert_eq!(a * 2.0, Vec2::new(6.0, 8.0));
        assert_eq!(-b, Vec2::new(-1.0, 2.0));
        assert!((a.length() - 5.0).abs() < 1e-12);
        assert!((a.distance(Vec2::ZERO) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn particle_validation_rejects_bad_mass() {
        assert!(Particle::new(Vec2::ZERO, 5.0).validate().is_ok());
        assert!(Particle::new(Vec2::ZERO, 0.0).validate().is_err());
        assert!(Particle::new(Vec2::ZERO, f64::NAN).validate().is_err());
        assert!(Particle::new(Vec2::new(f64::INFINITY, 0.0), 1.0)
            .validate()
            .is_err());
    }
}
