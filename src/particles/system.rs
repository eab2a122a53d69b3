//! Rate-driven particle emitter with depth sorting

use std::f32::consts::PI;

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::core::rng::SimRng;
use crate::core::{Error, Result};

use super::particle::Particle;
use super::pool::ParticlePool;

/// Emitter configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// Maximum live particles; spawns beyond this are dropped
    pub capacity: usize,
    pub particles_per_second: f32,
    /// Lifetime range in seconds `[min, max]`
    pub lifetime: [f32; 2],
    /// Billboard size range `[min, max]`
    pub size: [f32; 2],
    /// Per-axis lower corner of the spawn-direction box
    pub direction_min: Vec3,
    /// Per-axis upper corner of the spawn-direction box
    pub direction_max: Vec3,
    /// Speed along the normalized spawn direction
    pub speed: f32,
    /// Spawn point in the parent's local space
    pub offset: Vec3,
    /// Keep particles in parent space and re-apply the parent every frame,
    /// instead of stamping them into world space at spawn
    pub follow_parent: bool,
    /// Texture atlas cells per side
    pub atlas_size: u32,
    pub seed: u64,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            capacity: 256,
            particles_per_second: 60.0,
            lifetime: [1.0, 2.0],
            size: [1.0, 1.0],
            direction_min: Vec3::new(-1.0, 0.0, -1.0),
            direction_max: Vec3::new(1.0, 1.0, 1.0),
            speed: 1.0,
            offset: Vec3::ZERO,
            follow_parent: false,
            atlas_size: 1,
            seed: 0,
        }
    }
}

impl EmitterConfig {
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(Error::InvalidEmitter(msg));
        if self.capacity == 0 {
            return fail("capacity must be at least 1".into());
        }
        if !self.particles_per_second.is_finite() || self.particles_per_second < 0.0 {
            return fail(format!("particles_per_second {}", self.particles_per_second));
        }
        let [lo, hi] = self.lifetime;
        if !(lo > 0.0 && lo <= hi && hi.is_finite()) {
            return fail(format!("lifetime range [{}, {}]", lo, hi));
        }
        let [lo, hi] = self.size;
        if !(lo >= 0.0 && lo <= hi && hi.is_finite()) {
            return fail(format!("size range [{}, {}]", lo, hi));
        }
        if !self.speed.is_finite() {
            return fail(format!("speed {}", self.speed));
        }
        if self.atlas_size == 0 {
            return fail("atlas_size must be at least 1".into());
        }
        Ok(())
    }
}

/// A particle emitter attached to an optional parent transform
#[derive(Clone, Debug)]
pub struct ParticleSystem {
    config: EmitterConfig,
    pool: ParticlePool,
    rng: SimRng,
    time_since_last_spawn: f32,
    last_parent_position: Option<Vec3>,
    emitting: bool,
}

impl ParticleSystem {
    pub fn new(config: EmitterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            pool: ParticlePool::new(config.capacity),
            rng: SimRng::new(config.seed),
            config,
            time_since_last_spawn: 0.0,
            last_parent_position: None,
            emitting: true,
        })
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        self.pool.as_slice()
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    pub fn is_emitting(&self) -> bool {
        self.emitting
    }

    /// Pause or resume spawning. Live particles keep ageing either way.
    pub fn set_emitting(&mut self, emitting: bool) {
        self.emitting = emitting;
    }

    /// One tick: age and expire, spawn, then depth sort.
    ///
    /// `parent` is the parent's world transform (identity when `None`). The
    /// camera position and forward axis drive the farthest-first sort.
    pub fn update(&mut self, parent: Option<&Mat4>, camera_position: Vec3, camera_forward: Vec3, dt: f32) {
        let parent = parent.copied().unwrap_or(Mat4::IDENTITY);

        self.pool.advance(dt);
        self.spawn(&parent, dt);
        self.sort(&parent, camera_position, camera_forward);
    }

    fn spawn(&mut self, parent: &Mat4, dt: f32) {
        let current = parent.w_axis.truncate();
        let last = self.last_parent_position.replace(current).unwrap_or(current);

        if !self.emitting {
            self.time_since_last_spawn = 0.0;
            return;
        }
        self.time_since_last_spawn += dt;
        let due = (self.config.particles_per_second * self.time_since_last_spawn).floor() as usize;
        if due == 0 {
            return;
        }
        self.time_since_last_spawn = 0.0;

        let count = due.min(self.pool.remaining());
        if count < due {
            log::trace!("Emitter full, dropping {} spawns", due - count);
        }

        for i in 0..count {
            let mut particle = self.sample_particle();
            if !self.config.follow_parent {
                // Spread the batch along the parent's path since the last tick
                let t = (i + 1) as f32 / count as f32;
                let mut stamp = *parent;
                stamp.w_axis = last.lerp(current, t).extend(1.0);
                particle.position = stamp.transform_point3(particle.position);
            }
            self.pool.try_push(particle);
        }
    }

    fn sample_particle(&mut self) -> Particle {
        let cfg = &self.config;
        let rng = &mut self.rng;
        let direction = Vec3::new(
            rng.range_f32(cfg.direction_min.x, cfg.direction_max.x),
            rng.range_f32(cfg.direction_min.y, cfg.direction_max.y),
            rng.range_f32(cfg.direction_min.z, cfg.direction_max.z),
        )
        .normalize_or_zero();
        let lifetime = rng.range_f32(cfg.lifetime[0], cfg.lifetime[1]);
        let size = rng.range_f32(cfg.size[0], cfg.size[1]);

        let mut particle = Particle::new(cfg.offset, direction * cfg.speed, size, lifetime);
        particle.rotation = rng.range_f32(0.0, PI);
        particle
    }

    fn sort(&mut self, parent: &Mat4, camera_position: Vec3, camera_forward: Vec3) {
        let follow = self.config.follow_parent;
        self.pool.sort_by_depth_desc(|p| {
            let world = if follow {
                parent.transform_point3(p.position)
            } else {
                p.position
            };
            (world - camera_position).dot(camera_forward)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still_config() -> EmitterConfig {
        EmitterConfig {
            direction_min: Vec3::ZERO,
            direction_max: Vec3::ZERO,
            speed: 0.0,
            ..Default::default()
        }
    }

    fn tick(system: &mut ParticleSystem, parent: Option<&Mat4>, dt: f32) {
        system.update(parent, Vec3::ZERO, Vec3::Z, dt);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let bad = [
            EmitterConfig { capacity: 0, ..Default::default() },
            EmitterConfig { particles_per_second: -1.0, ..Default::default() },
            EmitterConfig { lifetime: [0.0, 1.0], ..Default::default() },
            EmitterConfig { lifetime: [2.0, 1.0], ..Default::default() },
            EmitterConfig { size: [-1.0, 1.0], ..Default::default() },
            EmitterConfig { atlas_size: 0, ..Default::default() },
        ];
        for config in bad {
            assert!(matches!(ParticleSystem::new(config), Err(Error::InvalidEmitter(_))));
        }
        assert!(ParticleSystem::new(EmitterConfig::default()).is_ok());
    }

    #[test]
    fn test_pool_never_exceeds_capacity() {
        let mut system = ParticleSystem::new(EmitterConfig {
            capacity: 50,
            particles_per_second: 1000.0,
            lifetime: [10.0, 10.0],
            ..Default::default()
        })
        .unwrap();

        let mut peak = 0;
        for _ in 0..100 {
            tick(&mut system, None, 1.0 / 60.0);
            assert!(system.len() <= 50);
            peak = peak.max(system.len());
        }
        assert_eq!(peak, 50);
    }

    #[test]
    fn test_spawn_count_follows_rate() {
        let mut system = ParticleSystem::new(EmitterConfig {
            particles_per_second: 8.0,
            lifetime: [100.0, 100.0],
            ..still_config()
        })
        .unwrap();
        tick(&mut system, None, 0.0625);
        assert_eq!(system.len(), 0);
        tick(&mut system, None, 0.9375);
        assert_eq!(system.len(), 8);
    }

    #[test]
    fn test_lifetime_removal() {
        let lifetime = 2.0;
        let mut system = ParticleSystem::new(EmitterConfig {
            particles_per_second: 1.0,
            lifetime: [lifetime, lifetime],
            ..still_config()
        })
        .unwrap();

        tick(&mut system, None, 1.0);
        assert_eq!(system.len(), 1);
        system.set_emitting(false);

        let eps = 0.01;
        tick(&mut system, None, lifetime - eps);
        assert_eq!(system.len(), 1);
        tick(&mut system, None, 2.0 * eps);
        assert_eq!(system.len(), 0);
    }

    #[test]
    fn test_samples_within_ranges() {
        let mut system = ParticleSystem::new(EmitterConfig {
            particles_per_second: 600.0,
            capacity: 1000,
            lifetime: [1.0, 3.0],
            size: [0.5, 2.0],
            direction_min: Vec3::new(-0.2, 0.5, -1.0),
            direction_max: Vec3::new(0.2, 1.0, -0.5),
            speed: 4.0,
            ..Default::default()
        })
        .unwrap();
        tick(&mut system, None, 0.5);
        assert!(system.len() > 250);
        for p in system.particles() {
            assert!((1.0..=3.0).contains(&p.lifetime));
            assert!((0.5..=2.0).contains(&p.scale.x));
            assert_eq!(p.scale.x, p.scale.y);
            assert_eq!(p.scale.z, 1.0);
            assert!((p.velocity.length() - 4.0).abs() < 1e-4);
            assert!(p.velocity.y > 0.0 && p.velocity.z < 0.0);
            assert!((0.0..=PI).contains(&p.rotation));
        }
    }

    #[test]
    fn test_same_seed_same_stream() {
        let config = EmitterConfig { seed: 99, ..Default::default() };
        let mut a = ParticleSystem::new(config.clone()).unwrap();
        let mut b = ParticleSystem::new(config).unwrap();
        for _ in 0..30 {
            tick(&mut a, None, 1.0 / 30.0);
            tick(&mut b, None, 1.0 / 30.0);
        }
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn test_sorted_farthest_first() {
        let mut system = ParticleSystem::new(EmitterConfig {
            particles_per_second: 200.0,
            lifetime: [5.0, 5.0],
            direction_min: Vec3::splat(-1.0),
            direction_max: Vec3::splat(1.0),
            speed: 10.0,
            ..Default::default()
        })
        .unwrap();
        let camera = Vec3::new(0.0, 0.0, -20.0);
        let forward = Vec3::new(0.3, 0.0, 1.0).normalize();
        for _ in 0..20 {
            system.update(None, camera, forward, 1.0 / 30.0);
        }
        let depths: Vec<f32> = system
            .particles()
            .iter()
            .map(|p| (p.position - camera).dot(forward))
            .collect();
        assert!(depths.len() > 10);
        assert!(depths.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_follow_parent_sorts_in_world_space() {
        use glam::Quat;

        let mut system = ParticleSystem::new(EmitterConfig {
            particles_per_second: 4.0,
            lifetime: [100.0, 100.0],
            direction_min: Vec3::Z,
            direction_max: Vec3::Z,
            speed: 2.0,
            follow_parent: true,
            ..Default::default()
        })
        .unwrap();

        // Turned around and pushed out: local +Z points back toward the camera
        let parent = Mat4::from_rotation_translation(
            Quat::from_rotation_y(std::f32::consts::PI),
            Vec3::new(0.0, 0.0, 50.0),
        );
        let camera = Vec3::ZERO;
        let forward = Vec3::Z;
        for _ in 0..8 {
            system.update(Some(&parent), camera, forward, 0.25);
        }

        let particles = system.particles();
        assert_eq!(particles.len(), 8);
        let world_depths: Vec<f32> = particles
            .iter()
            .map(|p| (parent.transform_point3(p.position) - camera).dot(forward))
            .collect();
        assert!(world_depths.windows(2).all(|w| w[0] >= w[1]), "{:?}", world_depths);

        // Sorting on local coordinates would have put the oldest particle first
        let local_z: Vec<f32> = particles.iter().map(|p| p.position.z).collect();
        assert!(local_z.windows(2).all(|w| w[0] <= w[1]), "{:?}", local_z);
        assert!(local_z[0] < local_z[7]);
    }

    #[test]
    fn test_stamped_batch_spreads_along_parent_path() {
        let mut system = ParticleSystem::new(EmitterConfig {
            particles_per_second: 8.0,
            lifetime: [100.0, 100.0],
            ..still_config()
        })
        .unwrap();

        tick(&mut system, Some(&Mat4::IDENTITY), 0.0625);
        let moved = Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0));
        tick(&mut system, Some(&moved), 0.9375);

        let mut xs: Vec<f32> = system.particles().iter().map(|p| p.position.x).collect();
        xs.sort_by(f32::total_cmp);
        let expected: Vec<f32> = (1..=8).map(|i| 10.0 * i as f32 / 8.0).collect();
        assert_eq!(xs.len(), 8);
        for (x, e) in xs.iter().zip(&expected) {
            assert!((x - e).abs() < 1e-4, "{} vs {}", x, e);
        }
    }

    #[test]
    fn test_follow_parent_keeps_local_coordinates() {
        let mut system = ParticleSystem::new(EmitterConfig {
            particles_per_second: 8.0,
            lifetime: [100.0, 100.0],
            offset: Vec3::new(0.0, 0.0, -2.0),
            follow_parent: true,
            ..still_config()
        })
        .unwrap();
        let parent = Mat4::from_translation(Vec3::new(50.0, 10.0, 0.0));
        tick(&mut system, Some(&parent), 1.0);
        assert_eq!(system.len(), 8);
        assert!(system.particles().iter().all(|p| p.position == Vec3::new(0.0, 0.0, -2.0)));
    }

    #[test]
    fn test_paused_emitter_does_not_burst() {
        let mut system = ParticleSystem::new(EmitterConfig {
            particles_per_second: 10.0,
            lifetime: [100.0, 100.0],
            ..still_config()
        })
        .unwrap();
        system.set_emitting(false);
        tick(&mut system, None, 5.0);
        assert!(system.is_empty());
        system.set_emitting(true);
        tick(&mut system, None, 0.25);
        assert_eq!(system.len(), 2);
    }
}
