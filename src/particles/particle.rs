//! Individual particle representation

use glam::Vec3;

/// A single short-lived particle.
///
/// Position and velocity are in world space for stamped emitters and in the
/// parent's local space for emitters that follow their parent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Billboard rotation about the view axis, radians
    pub rotation: f32,
    pub scale: Vec3,
    /// Seconds since spawn
    pub time_alive: f32,
    /// Seconds the particle lives
    pub lifetime: f32,
}

impl Particle {
    pub fn new(position: Vec3, velocity: Vec3, size: f32, lifetime: f32) -> Self {
        Self {
            position,
            velocity,
            rotation: 0.0,
            scale: Vec3::new(size, size, 1.0),
            time_alive: 0.0,
            lifetime,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.time_alive < self.lifetime
    }

    /// Fraction of the lifetime used up, `[0, 1]`
    #[inline]
    pub fn progress(&self) -> f32 {
        if self.lifetime > 0.0 {
            (self.time_alive / self.lifetime).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// Move along the velocity and age by `dt`
    #[inline]
    pub fn advance(&mut self, dt: f32) {
        self.position += self.velocity * dt;
        self.time_alive += dt;
    }
}
