//! Flightsim - simulation core of a small flight-simulator demo

pub mod core;
pub mod math;
pub mod terrain;
pub mod scene;
pub mod physics;
pub mod particles;
