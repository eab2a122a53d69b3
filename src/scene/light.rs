//! Light payloads and their GPU uniform form

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::core::Result;

use super::entity::{Entity, EntityKind};

/// Light kinds, discriminants match the shader's `type` field
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u32)]
pub enum LightType {
    Directional = 0,
    Point = 1,
    Spotlight = 2,
}

/// Light-specific data carried by [`EntityKind::Light`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LightParams {
    pub light_type: LightType,
    pub color: Vec3,
    pub intensity: f32,
    /// Spotlight cone half-angle in radians
    pub cutoff_angle: f32,
    /// Linear attenuation term
    pub attenuation_c1: f32,
    /// Quadratic attenuation term
    pub attenuation_c2: f32,
}

impl Default for LightParams {
    fn default() -> Self {
        Self {
            light_type: LightType::Point,
            color: Vec3::ONE,
            intensity: 1.0,
            cutoff_angle: 0.0,
            attenuation_c1: 0.0,
            attenuation_c2: 0.0,
        }
    }
}

/// Omnidirectional light at `position`
pub fn create_point_light(
    position: Vec3,
    scale: Vec3,
    intensity: f32,
    attenuation_c1: f32,
    attenuation_c2: f32,
    color: Vec3,
) -> Entity {
    let mut entity = Entity::new(
        "point_light",
        EntityKind::Light(LightParams {
            light_type: LightType::Point,
            color,
            intensity,
            attenuation_c1,
            attenuation_c2,
            ..Default::default()
        }),
    );
    entity.position = position;
    entity.scale = scale;
    entity
}

/// Cone light shining along `forward`
#[allow(clippy::too_many_arguments)]
pub fn create_spotlight(
    position: Vec3,
    scale: Vec3,
    intensity: f32,
    attenuation_c1: f32,
    attenuation_c2: f32,
    cutoff_angle: f32,
    forward: Vec3,
    up: Vec3,
    color: Vec3,
) -> Result<Entity> {
    let mut entity = Entity::new(
        "spotlight",
        EntityKind::Light(LightParams {
            light_type: LightType::Spotlight,
            color,
            intensity,
            cutoff_angle,
            attenuation_c1,
            attenuation_c2,
        }),
    );
    entity.position = position;
    entity.scale = scale;
    entity.set_orientation(forward, up)?;
    Ok(entity)
}

/// Sun-like light shining along `forward`; position only matters for debug drawing
pub fn create_directional_light(
    position: Vec3,
    scale: Vec3,
    intensity: f32,
    forward: Vec3,
    up: Vec3,
    color: Vec3,
) -> Result<Entity> {
    let mut entity = Entity::new(
        "directional_light",
        EntityKind::Light(LightParams {
            light_type: LightType::Directional,
            color,
            intensity,
            ..Default::default()
        }),
    );
    entity.position = position;
    entity.scale = scale;
    entity.set_orientation(forward, up)?;
    Ok(entity)
}

/// Light uniform data for the GPU (64 bytes, std140-compatible)
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GpuLight {
    /// World-space position (offset 0)
    pub position: [f32; 3],
    /// [`LightType`] discriminant (offset 12)
    pub light_type: u32,
    /// World-space unit direction (offset 16)
    pub direction: [f32; 3],
    pub intensity: f32,
    /// Linear RGB (offset 32)
    pub color: [f32; 3],
    pub cutoff_angle: f32,
    /// Attenuation c1, c2 (offset 48)
    pub attenuation: [f32; 2],
    pub _pad: [f32; 2],
}

impl GpuLight {
    /// Pack a light using its entity's world transform. Position is the
    /// transformed origin, direction the transformed local +Z.
    pub fn from_world(params: &LightParams, world: &Mat4) -> Self {
        let position = (*world * Vec4::new(0.0, 0.0, 0.0, 1.0)).truncate();
        let direction = (*world * Vec4::new(0.0, 0.0, 1.0, 0.0))
            .truncate()
            .normalize_or_zero();
        Self {
            position: position.to_array(),
            light_type: params.light_type as u32,
            direction: direction.to_array(),
            intensity: params.intensity,
            color: params.color.to_array(),
            cutoff_angle: params.cutoff_angle,
            attenuation: [params.attenuation_c1, params.attenuation_c2],
            _pad: [0.0; 2],
        }
    }
}
