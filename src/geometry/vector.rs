//! 2D vectors with polar/Cartesian duality
//!
//! Angles are measured from the +y axis towards +x, i.e. `atan2(x, y)`,
//! so an angle of 0 points "down" the board in screen coordinates.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    x: f32,
    y: f32,
    /// Last known heading, kept so a zero-length vector can be regrown
    heading: f32,
}

impl Vector {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            heading: x.atan2(y),
        }
    }

    /// Vector pointing from `from` to `to`
    pub fn between(from: Vec2, to: Vec2) -> Self {
        Self::new(to.x - from.x, to.y - from.y)
    }

    pub fn from_polar(length: f32, angle: f32) -> Self {
        Self {
            x: length * angle.sin(),
            y: length * angle.cos(),
            heading: angle,
        }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn angle(&self) -> f32 {
        if self.x == 0.0 && self.y == 0.0 {
            self.heading
        } else {
            self.x.atan2(self.y)
        }
    }

    /// Rescale, keeping the current heading
    pub fn set_length(&mut self, length: f32) {
        let angle = self.angle();
        *self = Self::from_polar(length, angle);
    }

    /// Rotate to an absolute heading, keeping the current length
    pub fn set_angle(&mut self, angle: f32) {
        let length = self.length();
        *self = Self::from_polar(length, angle);
    }

    pub fn add(&mut self, other: &Vector) {
        *self = Self::new(self.x + other.x, self.y + other.y);
    }

    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// A vector anchored at a world point, e.g. a targeting line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OriginVector {
    pub origin: Vec2,
    pub vector: Vector,
}

impl OriginVector {
    pub fn between(origin: Vec2, to: Vec2) -> Self {
        Self {
            origin,
            vector: Vector::between(origin, to),
        }
    }

    pub fn end_point(&self) -> Vec2 {
        self.origin + self.vector.as_vec2()
    }

    pub fn halfway_point(&self) -> Vec2 {
        let half = self.vector.length() / 2.0;
        let angle = self.vector.angle();
        Vec2::new(
            self.origin.x + half * angle.sin(),
            self.origin.y + half * angle.cos(),
        )
    }
}

/// Largest heading change applied by one steering step (radians)
const MAX_STEER: f32 = std::f32::consts::PI / 10.0;

/// Decorative wanderer: a unit-length heading that drifts across the
/// board and wraps at the edges. Steers on every other step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftingVector {
    pub position: Vec2,
    pub velocity: Vector,
    steer_next: bool,
}

impl DriftingVector {
    pub fn new(position: Vec2, direction: Vector) -> Self {
        let mut velocity = direction;
        velocity.set_length(1.0);
        Self {
            position,
            velocity,
            steer_next: false,
        }
    }

    /// Advance one step inside a `width` x `height` world area.
    /// `margin` is how far past the top/left edge the wanderer may go
    /// before it reappears on the far side.
    pub fn step<R: Rng>(&mut self, rng: &mut R, width: f32, height: f32, margin: f32) {
        if self.steer_next {
            let steer = rng.gen::<f32>() * MAX_STEER - MAX_STEER / 2.0;
            let angle = self.velocity.angle();
            self.velocity.set_angle(angle + steer);
        }

        self.position.x = (self.position.x + self.velocity.x()) % width;
        self.position.y = (self.position.y + self.velocity.y()) % height;
        if self.position.x < -margin {
            self.position.x = width;
        }
        if self.position.y < -margin {
            self.position.y = height;
        }

        self.steer_next = !self.steer_next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::f32::consts::{FRAC_PI_2, PI};

    const EPS: f32 = 1e-4;

    #[test]
    fn test_angle_measured_from_y_axis() {
        assert!((Vector::new(0.0, 1.0).angle() - 0.0).abs() < EPS);
        assert!((Vector::new(1.0, 0.0).angle() - FRAC_PI_2).abs() < EPS);
        assert!((Vector::new(0.0, -1.0).angle() - PI).abs() < EPS);
    }

    #[test]
    fn test_set_length_keeps_direction() {
        let mut v = Vector::new(3.0, 4.0);
        v.set_length(10.0);
        assert!((v.x() - 6.0).abs() < EPS);
        assert!((v.y() - 8.0).abs() < EPS);
    }

    #[test]
    fn test_set_angle_keeps_length() {
        let mut v = Vector::new(0.0, 2.0);
        v.set_angle(FRAC_PI_2);
        assert!((v.x() - 2.0).abs() < EPS);
        assert!(v.y().abs() < EPS);
        assert!((v.length() - 2.0).abs() < EPS);
    }

    #[test]
    fn test_zero_vector_remembers_heading() {
        let mut v = Vector::from_polar(0.0, FRAC_PI_2);
        v.set_length(3.0);
        assert!((v.x() - 3.0).abs() < EPS);
    }

    #[test]
    fn test_add_and_between() {
        let mut v = Vector::between(Vec2::new(1.0, 1.0), Vec2::new(4.0, 5.0));
        assert!((v.length() - 5.0).abs() < EPS);
        v.add(&Vector::new(1.0, -1.0));
        assert_eq!(v.as_vec2(), Vec2::new(4.0, 3.0));
    }

    #[test]
    fn test_halfway_point() {
        let line = OriginVector::between(Vec2::new(10.0, 10.0), Vec2::new(30.0, 50.0));
        let mid = line.halfway_point();
        assert!((mid.x - 20.0).abs() < EPS);
        assert!((mid.y - 30.0).abs() < EPS);
        assert!((line.end_point() - Vec2::new(30.0, 50.0)).length() < EPS);
    }

    #[test]
    fn test_drifting_vector_stays_unit_length_and_wraps() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut drift = DriftingVector::new(Vec2::new(5.0, 5.0), Vector::new(0.0, -4.0));
        for _ in 0..50 {
            drift.step(&mut rng, 100.0, 100.0, 2.0);
            assert!((drift.velocity.length() - 1.0).abs() < EPS);
            assert!(drift.position.x <= 100.0 && drift.position.y <= 100.0);
        }
    }
}
