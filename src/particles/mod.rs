//! Particle effects: fixed-capacity emitters for smoke and contrails

pub mod billboard;
pub mod particle;
pub mod pool;
pub mod system;

pub use billboard::{ParticleBatch, ParticleInstance};
pub use particle::Particle;
pub use pool::ParticlePool;
pub use system::{EmitterConfig, ParticleSystem};
