//! Placeable scene entities
//!
//! One struct covers every placeable object. What used to be subclasses
//! (terrain, lights) is a [`EntityKind`] payload.

use glam::{Quat, Vec3};

use crate::core::types::{DEFAULT_FORWARD, DEFAULT_UP};
use crate::core::{Error, Result};
use crate::math::orientation::{direction_to_quaternion, orthonormalize, rotate_about};

use super::graph::EntityId;
use super::light::LightParams;

/// Opaque handle to a mesh owned by the renderer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u32);

/// Opaque handle to a texture owned by the renderer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Kind-specific entity data
#[derive(Clone, Debug, Default, PartialEq)]
pub enum EntityKind {
    #[default]
    Generic,
    /// Splat-blended ground: three detail textures plus the splat map
    Terrain { splat_textures: [TextureHandle; 4] },
    Light(LightParams),
}

/// A placeable object.
///
/// The forward/up basis is private so it stays orthonormal: it can only change
/// through [`Entity::set_orientation`] or [`Entity::rotate`].
#[derive(Clone, Debug)]
pub struct Entity {
    pub name: String,
    pub kind: EntityKind,
    pub position: Vec3,
    pub scale: Vec3,
    forward: Vec3,
    up: Vec3,
    pub velocity: Vec3,
    /// One-shot force, cleared by every physics step
    pub impulse: Vec3,
    /// Vertical offset from the origin to the lowest point (negative when the
    /// lowest point is below the origin)
    pub ground_contact_offset: f32,
    /// Offset from the rotation centre to the entity origin
    pub pivot: Vec3,
    pub(crate) parent: Option<EntityId>,
    pub visible: bool,
    pub mesh: Option<MeshHandle>,
    pub texture: Option<TextureHandle>,
}

impl Entity {
    pub fn new(name: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            name: name.into(),
            kind,
            position: Vec3::ZERO,
            scale: Vec3::ONE,
            forward: DEFAULT_FORWARD,
            up: DEFAULT_UP,
            velocity: Vec3::ZERO,
            impulse: Vec3::ZERO,
            ground_contact_offset: 0.0,
            pivot: Vec3::ZERO,
            parent: None,
            visible: true,
            mesh: None,
            texture: None,
        }
    }

    pub fn generic(name: impl Into<String>) -> Self {
        Self::new(name, EntityKind::Generic)
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_mesh(mut self, mesh: MeshHandle) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// `forward × up`
    pub fn right(&self) -> Vec3 {
        self.forward.cross(self.up)
    }

    /// Parent handle as stored; may refer to a removed entity
    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    /// Replace the orientation basis. `up` is re-orthogonalized against
    /// `forward`; zero, non-finite or parallel inputs are rejected.
    pub fn set_orientation(&mut self, forward: Vec3, up: Vec3) -> Result<()> {
        let (forward, up) = orthonormalize(forward, up).ok_or_else(|| {
            Error::DegenerateOrientation(format!(
                "{}: forward {:?} up {:?}",
                self.name, forward, up
            ))
        })?;
        self.forward = forward;
        self.up = up;
        Ok(())
    }

    /// Reset the basis to the default +Z forward, +Y up
    pub fn reset_orientation(&mut self) {
        self.forward = DEFAULT_FORWARD;
        self.up = DEFAULT_UP;
    }

    /// Rotate the basis about `axis`, re-normalizing afterwards. A rotation
    /// that would degenerate the basis is skipped.
    pub fn rotate(&mut self, angle: f32, axis: Vec3) {
        let forward = rotate_about(self.forward, angle, axis);
        let up = rotate_about(self.up, angle, axis);
        if let Some((f, u)) = orthonormalize(forward, up) {
            self.forward = f;
            self.up = u;
        }
    }

    /// Rotate only `up` about the current forward axis (roll)
    pub fn roll(&mut self, angle: f32) {
        let up = rotate_about(self.up, angle, self.forward);
        if let Some((f, u)) = orthonormalize(self.forward, up) {
            self.forward = f;
            self.up = u;
        }
    }

    /// Rotation taking the default basis onto this entity's basis
    pub fn orientation(&self) -> Quat {
        direction_to_quaternion(self.forward, self.up, DEFAULT_FORWARD, DEFAULT_UP)
    }

    pub fn is_light(&self) -> bool {
        matches!(self.kind, EntityKind::Light(_))
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::generic("entity")
    }
}
