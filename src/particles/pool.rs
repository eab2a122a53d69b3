//! Fixed-capacity particle storage

use super::particle::Particle;

/// Particles in a contiguous buffer that never grows past `capacity`.
///
/// Removal is a compact-remove: the last particle is moved into the freed
/// slot, so removal is O(1) and order is NOT preserved. Callers that need an
/// order (depth sorting) re-sort after mutating.
#[derive(Clone, Debug)]
pub struct ParticlePool {
    particles: Vec<Particle>,
    capacity: usize,
}

impl ParticlePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            particles: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.particles.len() >= self.capacity
    }

    /// Free slots
    pub fn remaining(&self) -> usize {
        self.capacity - self.particles.len()
    }

    /// Add a particle. Returns `false` (and drops it) when the pool is full.
    pub fn try_push(&mut self, particle: Particle) -> bool {
        if self.is_full() {
            return false;
        }
        self.particles.push(particle);
        true
    }

    /// Remove the particle at `index`, moving the last particle into its slot
    pub fn compact_remove(&mut self, index: usize) -> Particle {
        self.particles.swap_remove(index)
    }

    /// Advance every particle by `dt` and compact-remove the expired ones.
    /// Returns the number removed.
    pub fn advance(&mut self, dt: f32) -> usize {
        let mut removed = 0;
        let mut i = 0;
        while i < self.particles.len() {
            let particle = &mut self.particles[i];
            particle.advance(dt);
            if particle.is_alive() {
                i += 1;
            } else {
                // The moved-in particle is advanced on the next pass over `i`
                self.compact_remove(i);
                removed += 1;
            }
        }
        removed
    }

    /// Sort farthest first by the given depth key
    pub fn sort_by_depth_desc(&mut self, depth: impl Fn(&Particle) -> f32) {
        self.particles
            .sort_unstable_by(|a, b| depth(b).total_cmp(&depth(a)));
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }
}
