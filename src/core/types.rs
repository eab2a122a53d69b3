//! Core type aliases and re-exports

pub use glam::{
    Vec2, Vec3, Vec4,
    Mat3, Mat4,
    Quat,
};

/// Standard Result type for the simulation
pub type Result<T> = std::result::Result<T, crate::core::error::Error>;

/// Orientation basis every entity is modelled against: meshes face +Z with +Y up.
pub const DEFAULT_FORWARD: Vec3 = Vec3::Z;
pub const DEFAULT_UP: Vec3 = Vec3::Y;
