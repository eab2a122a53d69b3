//! Flattened scene graph output for the renderer.
//!
//! `RenderItem` is the result of walking the scene graph: one entry per visible
//! entity with a mesh, carrying the composed world transform.

use glam::Mat4;

use super::entity::{EntityKind, MeshHandle, TextureHandle};
use super::graph::EntityId;

/// One entry in the flattened visible set
#[derive(Clone, Debug, PartialEq)]
pub struct RenderItem {
    pub id: EntityId,
    /// Model-to-world matrix including every ancestor
    pub world: Mat4,
    pub mesh: MeshHandle,
    pub texture: Option<TextureHandle>,
    /// Material selection: terrain splat slots, light params or a plain mesh
    pub kind: EntityKind,
}

impl RenderItem {
    /// Column-major matrix ready for a uniform upload
    pub fn world_cols(&self) -> [[f32; 4]; 4] {
        self.world.to_cols_array_2d()
    }
}
