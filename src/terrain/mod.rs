//! Procedural terrain generation

pub mod heightmap;
pub use heightmap::{Heightmap, RunwayParams};

pub mod diamond_square;

pub mod sampler;
pub use sampler::TerrainSampler;

pub mod mesh;
pub use mesh::{TerrainMesh, TerrainVertex};

pub mod export;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

/// Parameters controlling terrain generation
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    /// Heightmap side is `2^size_exponent + 1`
    pub size_exponent: u32,
    pub smoothness: f32,
    pub seed: u64,
    /// Horizontal spacing between samples
    pub tile_size_xz: f32,
    /// Vertical scale applied to raw samples
    pub tile_size_y: f32,
    /// Detail texture repeats across the whole map
    pub texture_scale: f32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            size_exponent: 8,
            smoothness: 0.5,
            seed: 1519128009,
            tile_size_xz: 8.0,
            tile_size_y: 1.0,
            texture_scale: 80.0,
        }
    }
}

impl TerrainParams {
    /// Largest accepted `size_exponent` (a 65537 x 65537 map)
    pub const MAX_SIZE_EXPONENT: u32 = 16;

    /// Heightmap side length in samples. Saturates for exponents that do not
    /// fit a `usize`; such sizes fail [`TerrainParams::validate`].
    pub fn size(&self) -> usize {
        1usize
            .checked_shl(self.size_exponent)
            .map_or(usize::MAX, |side| side.saturating_add(1))
    }

    /// Reject parameters that would overflow, allocate absurdly or sample to NaN
    pub fn validate(&self) -> Result<()> {
        if self.size_exponent > Self::MAX_SIZE_EXPONENT {
            return Err(Error::InvalidTerrain(format!(
                "size_exponent {} exceeds {}",
                self.size_exponent,
                Self::MAX_SIZE_EXPONENT
            )));
        }
        if !self.smoothness.is_finite() || self.smoothness <= 0.0 {
            return Err(Error::InvalidSmoothness(self.smoothness));
        }
        self.validate_scales()
    }

    fn validate_scales(&self) -> Result<()> {
        for (name, value) in [
            ("tile_size_xz", self.tile_size_xz),
            ("tile_size_y", self.tile_size_y),
            ("texture_scale", self.texture_scale),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidTerrain(format!(
                    "{} must be finite and positive, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Generated terrain placed in the world at `origin`
#[derive(Clone, Debug)]
pub struct Terrain {
    heightmap: Heightmap,
    params: TerrainParams,
    origin: Vec3,
}

impl Terrain {
    /// Generate the heightmap and optionally flatten a runway into it
    pub fn generate(params: TerrainParams, runway: Option<&RunwayParams>) -> Result<Self> {
        params.validate()?;
        let start = std::time::Instant::now();
        let mut heightmap =
            diamond_square::generate(params.size(), params.smoothness, params.seed)?;
        if let Some(runway) = runway {
            heightmap.carve_runway(runway);
        }

        let (lo, hi) = heightmap.min_max();
        log::info!(
            "Generated {}x{} terrain (seed {}) in {:.1}ms, heights {:.1}..{:.1}",
            heightmap.size(),
            heightmap.size(),
            params.seed,
            start.elapsed().as_secs_f64() * 1000.0,
            lo,
            hi
        );
        Self::from_heightmap(heightmap, params)
    }

    /// Wrap an existing heightmap. `params.size_exponent`, `smoothness` and
    /// `seed` are ignored; the scales must still be finite and positive.
    pub fn from_heightmap(heightmap: Heightmap, params: TerrainParams) -> Result<Self> {
        params.validate_scales()?;
        Ok(Self {
            heightmap,
            params,
            origin: Vec3::ZERO,
        })
    }

    pub fn with_origin(mut self, origin: Vec3) -> Self {
        self.origin = origin;
        self
    }

    pub fn heightmap(&self) -> &Heightmap {
        &self.heightmap
    }

    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Sampler over raw heightmap values in terrain-local coordinates
    pub fn sampler(&self) -> TerrainSampler<'_> {
        TerrainSampler::new(&self.heightmap, self.params.tile_size_xz)
    }

    /// World-space ground height at world `(x, z)`; clamps outside the map
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        let local = self.sampler().height_at(x - self.origin.x, z - self.origin.z);
        self.origin.y + local * self.params.tile_size_y
    }

    /// World-space side length
    pub fn extent(&self) -> f32 {
        self.sampler().extent()
    }

    /// World-space centre of the map at ground level
    pub fn center(&self) -> Vec3 {
        let half = self.extent() * 0.5;
        let (x, z) = (self.origin.x + half, self.origin.z + half);
        Vec3::new(x, self.height_at(x, z), z)
    }

    /// Build the render mesh (terrain-local coordinates)
    pub fn mesh(&self) -> TerrainMesh {
        TerrainMesh::build(
            &self.heightmap,
            self.params.tile_size_xz,
            self.params.tile_size_y,
            self.params.texture_scale,
        )
    }
}
