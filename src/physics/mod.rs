//! Point-mass physics: generic bodies, the airplane model and ground contact

pub mod airplane;
pub mod body;
pub mod collision;
pub mod surface;

pub use airplane::{airplane_forces, airplane_step, AirplaneForces, AirplaneParams};
pub use body::{integrate_body, BodyParams};
pub use collision::{resolve_terrain_collision, FlatGround, GroundQuery};
pub use surface::{ControlSurface, SurfaceAxis};

/// Default downward gravitational acceleration
pub const DEFAULT_GRAVITY: f32 = 18.75;
