//! Diamond-square fractal heightmap generation

use crate::core::rng::SimRng;
use crate::core::{Error, Result};

use super::heightmap::Heightmap;

/// Generate a fractal heightmap with the diamond-square algorithm.
///
/// `size` must be `2^n + 1`. `smoothness` divides every random displacement and
/// doubles each subdivision round, so finer passes add proportionally less
/// detail. The same `(size, smoothness, seed)` always yields the same map.
pub fn generate(size: usize, smoothness: f32, seed: u64) -> Result<Heightmap> {
    if !smoothness.is_finite() || smoothness <= 0.0 {
        return Err(Error::InvalidSmoothness(smoothness));
    }
    let mut map = Heightmap::new(size)?;
    let mut rng = SimRng::new(seed);
    let mut smoothness = smoothness;
    let last = size - 1;

    // Corners are drawn first, so they depend only on the seed and smoothness.
    for (x, z) in [(0, 0), (last, 0), (0, last), (last, last)] {
        map.set(x, z, rng.displacement(smoothness));
    }

    let mut step = last;
    while step > 1 {
        smoothness *= 2.0;
        let half = step / 2;

        for z in (0..last).step_by(step) {
            for x in (0..last).step_by(step) {
                let offset = rng.displacement(smoothness);
                diamond_step(&mut map, x, z, step, offset);
            }
        }

        for (row, z) in (0..size).step_by(half).enumerate() {
            let start = if row % 2 == 0 { half } else { 0 };
            for x in (start..size).step_by(step) {
                let offset = rng.displacement(smoothness);
                square_step(&mut map, x, z, half, offset);
            }
        }

        step = half;
    }

    log::debug!(
        "Diamond-square: size={}, seed={}, range={:?}",
        size, seed, map.min_max()
    );
    Ok(map)
}

/// Set the centre of the `step`-sized cell whose top-left corner is `(x, z)`.
fn diamond_step(map: &mut Heightmap, x: usize, z: usize, step: usize, offset: f32) {
    let avg = (map.get(x, z)
        + map.get(x + step, z)
        + map.get(x, z + step)
        + map.get(x + step, z + step))
        / 4.0;
    map.set(x + step / 2, z + step / 2, avg + offset);
}

/// Set the diamond centre `(x, z)` from its neighbours `half` away. Neighbours
/// outside the grid are left out of the average.
fn square_step(map: &mut Heightmap, x: usize, z: usize, half: usize, offset: f32) {
    let size = map.size();
    let mut sum = 0.0;
    let mut count = 0u32;

    if z >= half {
        sum += map.get(x, z - half);
        count += 1;
    }
    if z + half < size {
        sum += map.get(x, z + half);
        count += 1;
    }
    if x >= half {
        sum += map.get(x - half, z);
        count += 1;
    }
    if x + half < size {
        sum += map.get(x + half, z);
        count += 1;
    }

    map.set(x, z, sum / count as f32 + offset);
}
