//! Visible control-surface deflection (ailerons and flaps)

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::input::ControlInput;
use crate::scene::Entity;

/// Which control axis drives a surface
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceAxis {
    Pitch,
    Roll,
}

/// Deflection state of one hinged surface.
///
/// The surface entity is rotated about `hinge` (in its parent's frame) as the
/// command is held, and eases back to neutral at the same rate when released.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ControlSurface {
    pub axis: SurfaceAxis,
    /// +1 or -1; ailerons on opposite wings deflect in opposite directions
    pub direction: f32,
    pub hinge: Vec3,
    /// Deflection limit in radians
    pub max_deflection: f32,
    /// Deflection rate in radians per second
    pub rate: f32,
    deflection: f32,
}

impl ControlSurface {
    pub const DEFAULT_MAX_DEFLECTION: f32 = 0.7;
    pub const DEFAULT_RATE: f32 = 2.0;

    pub fn new(axis: SurfaceAxis, direction: f32, hinge: Vec3) -> Self {
        Self {
            axis,
            direction: direction.signum(),
            hinge,
            max_deflection: Self::DEFAULT_MAX_DEFLECTION,
            rate: Self::DEFAULT_RATE,
            deflection: 0.0,
        }
    }

    /// Current deflection in radians
    pub fn deflection(&self) -> f32 {
        self.deflection
    }

    /// Command for this surface from the pilot input, -1..=1
    pub fn command(&self, input: &ControlInput) -> f32 {
        let raw = match self.axis {
            SurfaceAxis::Pitch => input.pitch,
            SurfaceAxis::Roll => input.roll,
        };
        raw.signum() as f32 * self.direction
    }

    /// Advance the deflection and rotate `entity` to match.
    ///
    /// When the limit is reached the basis is reset to rest and the clamped
    /// deflection applied in one rotation, so repeated steps against the stop
    /// do not accumulate rounding drift.
    pub fn steer(&mut self, entity: &mut Entity, input: &ControlInput, dt: f32) {
        let command = self.command(input);
        let step = self.rate * dt;
        let delta = if command != 0.0 {
            command * step
        } else {
            -self.deflection.signum() * step.min(self.deflection.abs())
        };
        if delta == 0.0 {
            return;
        }

        let target = self.deflection + delta;
        if target.abs() >= self.max_deflection {
            let clamped = target.clamp(-self.max_deflection, self.max_deflection);
            entity.reset_orientation();
            entity.rotate(clamped, self.hinge);
            self.deflection = clamped;
        } else {
            entity.rotate(delta, self.hinge);
            self.deflection = target;
        }
    }
}
