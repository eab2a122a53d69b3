//! Heightmap export as 16-bit grayscale images

use std::path::Path;

use image::{ImageBuffer, Luma};

use crate::core::Result;

use super::heightmap::Heightmap;

pub type HeightImage = ImageBuffer<Luma<u16>, Vec<u16>>;

/// Map heights linearly onto `0..=u16::MAX`, lowest sample black.
/// A flat map comes out black.
pub fn heightmap_image(map: &Heightmap) -> HeightImage {
    let size = map.size() as u32;
    let (lo, hi) = map.min_max();
    let range = hi - lo;
    ImageBuffer::from_fn(size, size, |x, z| {
        let h = map.get(x as usize, z as usize);
        let t = if range > 0.0 { (h - lo) / range } else { 0.0 };
        Luma([(t * u16::MAX as f32).round() as u16])
    })
}

/// Write `map` as a PNG, creating parent directories
pub fn save_png(map: &Heightmap, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    heightmap_image(map).save(path)?;
    log::info!("Wrote {}x{} heightmap to {}", map.size(), map.size(), path.display());
    Ok(())
}
