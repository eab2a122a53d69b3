//! Error types for the simulation core

use thiserror::Error;

/// Main error type for the simulation
#[derive(Debug, Error)]
pub enum Error {
    #[error("heightmap side length {0} is not 2^n + 1")]
    InvalidHeightmapSize(usize),

    #[error("invalid terrain parameters: {0}")]
    InvalidTerrain(String),

    #[error("smoothness must be finite and positive, got {0}")]
    InvalidSmoothness(f32),

    #[error("degenerate orientation: {0}")]
    DegenerateOrientation(String),

    #[error("parent cycle: {0}")]
    ParentCycle(String),

    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("invalid particle emitter: {0}")]
    InvalidEmitter(String),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}
