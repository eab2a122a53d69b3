//! Square height grid

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

/// Square row-major grid of heights with side length `2^n + 1`.
///
/// Sample `(x, z)` lives at index `z * size + x`.
#[derive(Clone, Debug, PartialEq)]
pub struct Heightmap {
    size: usize,
    data: Vec<f32>,
}

impl Heightmap {
    /// Allocate a zeroed heightmap. Fails unless `size` is `2^n + 1`.
    pub fn new(size: usize) -> Result<Self> {
        if !Self::is_valid_size(size) {
            return Err(Error::InvalidHeightmapSize(size));
        }
        Ok(Self {
            size,
            data: vec![0.0; size * size],
        })
    }

    /// Whether `size` is a legal side length (`2^n + 1`, n >= 0)
    pub fn is_valid_size(size: usize) -> bool {
        size >= 2 && (size - 1).is_power_of_two()
    }

    /// Side length in samples
    pub fn size(&self) -> usize {
        self.size
    }

    /// Flat index of sample `(x, z)`
    #[inline]
    pub fn index(&self, x: usize, z: usize) -> usize {
        z * self.size + x
    }

    /// Height at grid coordinate `(x, z)`
    #[inline]
    pub fn get(&self, x: usize, z: usize) -> f32 {
        self.data[self.index(x, z)]
    }

    /// Set the height at grid coordinate `(x, z)`
    #[inline]
    pub fn set(&mut self, x: usize, z: usize, height: f32) {
        let i = self.index(x, z);
        self.data[i] = height;
    }

    /// Raw samples in row-major order
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Lowest and highest sample
    pub fn min_max(&self) -> (f32, f32) {
        self.data.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &h| {
            (lo.min(h), hi.max(h))
        })
    }

    /// Flatten a runway strip: every sample in the inclusive rectangle is set to
    /// the mean of the two reference samples plus `params.elevation_offset`.
    ///
    /// The rectangle is clipped to the grid. Returns the runway surface height.
    pub fn carve_runway(&mut self, params: &RunwayParams) -> f32 {
        let last = self.size - 1;
        let [ax, az] = params.reference_a.map(|c| c.min(last));
        let [bx, bz] = params.reference_b.map(|c| c.min(last));
        let surface = (self.get(ax, az) + self.get(bx, bz)) / 2.0 + params.elevation_offset;

        let x1 = params.max[0].min(last);
        let z1 = params.max[1].min(last);
        for z in params.min[1]..=z1 {
            for x in params.min[0]..=x1 {
                self.set(x, z, surface);
            }
        }

        log::info!(
            "Carved runway x={}..={} z={}..={} at height {:.2}",
            params.min[0], x1, params.min[1], z1, surface
        );
        surface
    }
}

/// Grid rectangle flattened into a runway after generation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunwayParams {
    /// Inclusive lower grid corner `[x, z]`
    pub min: [usize; 2],
    /// Inclusive upper grid corner `[x, z]`
    pub max: [usize; 2],
    /// First grid sample `[x, z]` averaged for the surface height
    pub reference_a: [usize; 2],
    /// Second grid sample `[x, z]` averaged for the surface height
    pub reference_b: [usize; 2],
    /// Added on top of the reference average
    pub elevation_offset: f32,
}

impl Default for RunwayParams {
    fn default() -> Self {
        Self {
            min: [3, 3],
            max: [8, 30],
            reference_a: [8, 3],
            reference_b: [8, 80],
            elevation_offset: 45.0,
        }
    }
}
