//! Entity-local transform matrices

use glam::{Mat4, Quat};

use super::entity::Entity;

/// Local transform of an entity relative to its parent:
/// `T(position) · T(pivot)⁻¹ · R · T(pivot) · S`.
///
/// A basis that yields a non-finite rotation falls back to identity rotation
/// so a NaN never reaches the renderer.
pub fn local_transform(entity: &Entity) -> Mat4 {
    let mut rotation = entity.orientation();
    if !rotation.is_finite() {
        log::warn!(
            "{}: non-finite orientation from forward {:?} up {:?}, using identity",
            entity.name,
            entity.forward(),
            entity.up()
        );
        rotation = Quat::IDENTITY;
    }

    Mat4::from_translation(entity.position)
        * Mat4::from_translation(-entity.pivot)
        * Mat4::from_quat(rotation)
        * Mat4::from_translation(entity.pivot)
        * Mat4::from_scale(entity.scale)
}

/// Rotation-only part of [`local_transform`]
pub fn local_rotation(entity: &Entity) -> Mat4 {
    let rotation = entity.orientation();
    if rotation.is_finite() {
        Mat4::from_quat(rotation)
    } else {
        Mat4::IDENTITY
    }
}
