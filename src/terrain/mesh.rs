//! Renderable triangle mesh built from a heightmap
//!
//! Every grid cell becomes two triangles split along the same anti-diagonal the
//! sampler uses, so the rendered surface matches collision heights exactly.

use bytemuck::{Pod, Zeroable};
use rayon::prelude::*;

use super::heightmap::Heightmap;

/// Terrain vertex (40 bytes, tightly packed)
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct TerrainVertex {
    /// Terrain-local position
    pub position: [f32; 3],
    pub normal: [f32; 3],
    /// Detail texture coordinate, repeats `texture_scale` times across the map
    pub uv: [f32; 2],
    /// Splat-map coordinate in `[0, 1]`
    pub splat_uv: [f32; 2],
}

/// Indexed triangle list covering the whole heightmap
#[derive(Clone, Debug, Default)]
pub struct TerrainMesh {
    pub vertices: Vec<TerrainVertex>,
    pub indices: Vec<u32>,
}

impl TerrainMesh {
    /// Build the mesh. Sample `(x, z)` lands at
    /// `(x * tile_xz, h * tile_y, z * tile_xz)` and is vertex `z * size + x`.
    pub fn build(map: &Heightmap, tile_xz: f32, tile_y: f32, texture_scale: f32) -> Self {
        let size = map.size();
        let last = size - 1;
        let inv_last = 1.0 / last as f32;

        let vertices: Vec<TerrainVertex> = (0..size * size)
            .into_par_iter()
            .map(|i| {
                let (x, z) = (i % size, i / size);
                let splat = [x as f32 * inv_last, z as f32 * inv_last];
                TerrainVertex {
                    position: [x as f32 * tile_xz, map.get(x, z) * tile_y, z as f32 * tile_xz],
                    normal: vertex_normal(map, x, z, tile_xz, tile_y),
                    uv: [splat[0] * texture_scale, splat[1] * texture_scale],
                    splat_uv: splat,
                }
            })
            .collect();

        let indices: Vec<u32> = (0..last * last)
            .into_par_iter()
            .flat_map_iter(|cell| {
                let (x, z) = (cell % last, cell / last);
                let i00 = (z * size + x) as u32;
                let i10 = i00 + 1;
                let i01 = i00 + size as u32;
                let i11 = i01 + 1;
                [i00, i01, i10, i10, i01, i11]
            })
            .collect();

        log::debug!(
            "Terrain mesh: {} vertices, {} triangles",
            vertices.len(),
            indices.len() / 3
        );
        Self { vertices, indices }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Central-difference normal; edges fall back to one-sided differences.
fn vertex_normal(map: &Heightmap, x: usize, z: usize, tile_xz: f32, tile_y: f32) -> [f32; 3] {
    let last = map.size() - 1;
    let (x0, x1) = (x.saturating_sub(1), (x + 1).min(last));
    let (z0, z1) = (z.saturating_sub(1), (z + 1).min(last));

    let dh_dx = (map.get(x1, z) - map.get(x0, z)) * tile_y / ((x1 - x0) as f32 * tile_xz);
    let dh_dz = (map.get(x, z1) - map.get(x, z0)) * tile_y / ((z1 - z0) as f32 * tile_xz);

    glam::Vec3::new(-dh_dx, 1.0, -dh_dz).normalize().to_array()
}
