//! Simplified airplane flight model.
//!
//! Forces act on a point mass: gravity, throttle thrust, a quadratic drag that
//! grows when the airstream hits the fuselage side-on or flat-on, and a lift
//! along the current up axis proportional to forward airspeed. Pitch and roll
//! rotate the basis directly at a rate proportional to input times speed, so a
//! slow plane turns sluggishly.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::input::ControlInput;
use crate::scene::Entity;

use super::DEFAULT_GRAVITY;

/// Flight model tuning, in per-second units
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AirplaneParams {
    pub mass: f32,
    /// Downward gravitational acceleration
    pub gravity: f32,
    /// Force along forward at full throttle
    pub max_thrust: f32,
    /// Force against forward when braking
    pub max_brake_force: f32,
    /// Quadratic drag coefficient
    pub drag_constant: f32,
    /// Lift per unit of forward airspeed
    pub lift_constant: f32,
    /// Extra drag factor for airflow along the up axis
    pub vertical_area: f32,
    /// Extra drag factor for airflow along the lateral axis
    pub lateral_area: f32,
    /// Pitch rate per unit speed (rad per metre)
    pub pitch_sensitivity: f32,
    /// Roll rate per unit speed (rad per metre)
    pub roll_sensitivity: f32,
}

impl Default for AirplaneParams {
    fn default() -> Self {
        Self {
            mass: 1.0,
            gravity: DEFAULT_GRAVITY,
            max_thrust: 43.75,
            max_brake_force: 20.0,
            drag_constant: 0.0375,
            lift_constant: 0.8125,
            vertical_area: 4.0,
            lateral_area: 2.0,
            pitch_sensitivity: 0.03,
            roll_sensitivity: 0.07,
        }
    }
}

impl AirplaneParams {
    /// Forward speed at which level lift cancels gravity
    pub fn min_lift_speed(&self) -> f32 {
        if self.lift_constant <= 0.0 {
            return f32::INFINITY;
        }
        self.gravity * self.mass / self.lift_constant
    }
}

/// Force breakdown for one tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct AirplaneForces {
    pub gravity: Vec3,
    pub thrust: Vec3,
    pub drag: Vec3,
    pub lift: Vec3,
}

impl AirplaneForces {
    pub fn net(&self) -> Vec3 {
        self.gravity + self.thrust + self.drag + self.lift
    }
}

/// Forces on the airplane for its current basis and velocity
pub fn airplane_forces(entity: &Entity, input: &ControlInput, params: &AirplaneParams) -> AirplaneForces {
    let forward = entity.forward();
    let up = entity.up();
    let velocity = entity.velocity;

    let thrust = match input.throttle.signum() {
        1 => forward * params.max_thrust,
        -1 => -forward * params.max_brake_force,
        _ => Vec3::ZERO,
    };

    let drag = match velocity.try_normalize() {
        Some(dir) => {
            let vertical = 1.0 + params.vertical_area * dir.dot(up).abs();
            let lateral = 1.0 + params.lateral_area * dir.dot(entity.right()).abs();
            -dir * velocity.length_squared() * params.drag_constant * vertical * lateral
        }
        None => Vec3::ZERO,
    };

    AirplaneForces {
        gravity: Vec3::new(0.0, -params.gravity * params.mass, 0.0),
        thrust,
        drag,
        lift: up * forward.dot(velocity) * params.lift_constant,
    }
}

/// Advance the airplane one tick.
///
/// Forces are taken from the basis at the start of the tick; pitch then roll are
/// applied; finally velocity and position are integrated. Returns the forces
/// used.
pub fn airplane_step(
    entity: &mut Entity,
    input: &ControlInput,
    params: &AirplaneParams,
    dt: f32,
) -> AirplaneForces {
    let forces = airplane_forces(entity, input, params);
    let speed = entity.velocity.length();

    // +1 pitches the nose down, i.e. a negative turn about forward × up
    let pitch = -params.pitch_sensitivity * input.pitch.signum() as f32 * speed * dt;
    if pitch != 0.0 {
        let right = entity.right();
        entity.rotate(pitch, right);
    }

    // +1 rolls left: up tilts toward the left wing
    let roll = -params.roll_sensitivity * input.roll.signum() as f32 * speed * dt;
    if roll != 0.0 {
        entity.roll(roll);
    }

    let mass = params.mass.max(1e-4);
    entity.velocity += forces.net() / mass * dt;
    entity.position += entity.velocity * dt;

    log::trace!(
        "{}: speed {:.2} alt {:.2} net {:?}",
        entity.name,
        entity.velocity.length(),
        entity.position.y,
        forces.net()
    );
    forces
}
