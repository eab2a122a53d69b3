//! Mathematical utilities

pub mod orientation;

pub use orientation::{direction_to_quaternion, orthonormalize, rotate_about};
