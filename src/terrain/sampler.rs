//! Height queries against a heightmap laid out on a regular tile grid

use super::heightmap::Heightmap;

/// Terrain height at terrain-local `(x, z)` for a grid with `tile_size` spacing.
///
/// Each cell is split into two triangles along the anti-diagonal; the query is
/// the barycentric blend of the containing triangle's corners, so the result is
/// continuous across cell edges and exact at grid points. Queries outside
/// `[0, (size - 1) * tile_size]` are clamped onto the grid edge.
///
/// A `tile_size` that is not finite and positive collapses the grid onto its
/// first sample.
pub fn height_at(map: &Heightmap, tile_size: f32, x: f32, z: f32) -> f32 {
    if !tile_size.is_finite() || tile_size <= 0.0 {
        return map.get(0, 0);
    }
    let last = map.size() - 1;
    let extent = last as f32 * tile_size;

    let gx = x.clamp(0.0, extent) / tile_size;
    let gz = z.clamp(0.0, extent) / tile_size;

    // Points on the far edge belong to the last cell.
    let cx = (gx.floor() as usize).min(last - 1);
    let cz = (gz.floor() as usize).min(last - 1);
    let px = gx - cx as f32;
    let pz = gz - cz as f32;

    let h00 = map.get(cx, cz);
    let h10 = map.get(cx + 1, cz);
    let h01 = map.get(cx, cz + 1);

    if px <= 1.0 - pz {
        (1.0 - px - pz) * h00 + px * h10 + pz * h01
    } else {
        let h11 = map.get(cx + 1, cz + 1);
        (1.0 - px) * h01 + (1.0 - pz) * h10 + (px + pz - 1.0) * h11
    }
}

/// A heightmap bound to its tile spacing
#[derive(Clone, Copy, Debug)]
pub struct TerrainSampler<'a> {
    map: &'a Heightmap,
    tile_size: f32,
}

impl<'a> TerrainSampler<'a> {
    pub fn new(map: &'a Heightmap, tile_size: f32) -> Self {
        Self { map, tile_size }
    }

    /// See [`height_at`]
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        height_at(self.map, self.tile_size, x, z)
    }

    /// World-space extent along each horizontal axis; zero for a degenerate tile size
    pub fn extent(&self) -> f32 {
        (self.map.size() - 1) as f32 * self.tile_size.max(0.0)
    }
}
