//! Point-mass integration for generic entities

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::scene::Entity;

use super::DEFAULT_GRAVITY;

/// Mass below which integration treats a body as this light
const MIN_MASS: f32 = 1e-4;

/// Generic body tuning
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyParams {
    pub mass: f32,
    /// Gravitational acceleration
    pub gravity: Vec3,
}

impl Default for BodyParams {
    fn default() -> Self {
        Self {
            mass: 1.0,
            gravity: Vec3::new(0.0, -DEFAULT_GRAVITY, 0.0),
        }
    }
}

/// One explicit-Euler step: the pending impulse plus gravity accelerate the
/// body, which then moves with its new velocity. The impulse is consumed.
pub fn integrate_body(entity: &mut Entity, params: &BodyParams, dt: f32) {
    let mass = params.mass.max(MIN_MASS);
    let net_force = entity.impulse + params.gravity * mass;
    entity.velocity += net_force / mass * dt;
    entity.position += entity.velocity * dt;
    entity.impulse = Vec3::ZERO;
}
