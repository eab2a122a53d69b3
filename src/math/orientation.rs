//! Forward/up orientation bases and their quaternion form

use crate::core::types::{Quat, Vec3};

/// Dot products beyond this count as parallel
const PARALLEL_EPSILON: f32 = 0.99999;

/// Rotate `v` by `angle` radians about `axis`.
///
/// A zero axis leaves `v` unchanged.
pub fn rotate_about(v: Vec3, angle: f32, axis: Vec3) -> Vec3 {
    let axis = axis.normalize_or_zero();
    if axis == Vec3::ZERO {
        return v;
    }
    Quat::from_axis_angle(axis, angle) * v
}

/// Gram-Schmidt a forward/up pair into an orthonormal basis.
///
/// Returns `None` when either vector is zero or non-finite, or when the two are
/// parallel, since no unique basis exists then.
pub fn orthonormalize(forward: Vec3, up: Vec3) -> Option<(Vec3, Vec3)> {
    let forward = forward.try_normalize()?;
    let up = (up - forward * up.dot(forward)).try_normalize()?;
    Some((forward, up))
}

/// Quaternion that rotates the `default_forward`/`default_up` basis onto `forward`/`up`.
///
/// First rotates the default forward onto `forward`, then rolls about the new
/// forward so the rotated default up lands on `up`. When `forward` is parallel
/// to `default_forward` the rotation axis is `forward` itself (the angle is ~0),
/// when antiparallel it is `up`, so the axis is never zero-length.
///
/// Inputs are expected to be orthonormal; see [`orthonormalize`].
pub fn direction_to_quaternion(
    forward: Vec3,
    up: Vec3,
    default_forward: Vec3,
    default_up: Vec3,
) -> Quat {
    let cos_forward = default_forward.dot(forward).clamp(-1.0, 1.0);
    let axis = if cos_forward > PARALLEL_EPSILON {
        forward
    } else if cos_forward < -PARALLEL_EPSILON {
        up
    } else {
        default_forward.cross(forward)
    };
    let quat_forward = Quat::from_axis_angle(axis.normalize(), cos_forward.acos());

    // Roll
    let new_up = (quat_forward * default_up).normalize();
    let cos_up = new_up.dot(up).clamp(-1.0, 1.0);
    if cos_up > PARALLEL_EPSILON {
        return quat_forward;
    }
    // Antiparallel ups have no cross product; both are perpendicular to forward,
    // so a half turn about forward lines them up.
    let roll_axis = new_up.cross(up).try_normalize().unwrap_or(forward);
    let quat_up = Quat::from_axis_angle(roll_axis, cos_up.acos());

    (quat_up * quat_forward).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{DEFAULT_FORWARD, DEFAULT_UP};
    use std::f32::consts::FRAC_PI_2;

    fn assert_maps_basis(forward: Vec3, up: Vec3) {
        let q = direction_to_quaternion(forward, up, DEFAULT_FORWARD, DEFAULT_UP);
        assert!(q.is_finite());
        assert!((q * DEFAULT_FORWARD - forward).length() < 1e-4, "forward {:?}", forward);
        assert!((q * DEFAULT_UP - up).length() < 1e-4, "up {:?}", up);
    }

    #[test]
    fn test_identity_basis() {
        let q = direction_to_quaternion(DEFAULT_FORWARD, DEFAULT_UP, DEFAULT_FORWARD, DEFAULT_UP);
        assert!(q.angle_between(Quat::IDENTITY) < 1e-4);
    }

    #[test]
    fn test_yaw() {
        assert_maps_basis(Vec3::X, Vec3::Y);
        assert_maps_basis(Vec3::NEG_X, Vec3::Y);
    }

    #[test]
    fn test_antiparallel_forward() {
        assert_maps_basis(Vec3::NEG_Z, Vec3::Y);
    }

    #[test]
    fn test_pure_roll() {
        assert_maps_basis(Vec3::Z, Vec3::X);
        assert_maps_basis(Vec3::Z, Vec3::NEG_Y);
    }

    #[test]
    fn test_arbitrary_basis() {
        let (f, u) = orthonormalize(Vec3::new(1.0, 2.0, -0.5), Vec3::new(-0.3, 1.0, 0.7)).unwrap();
        assert_maps_basis(f, u);
    }

    #[test]
    fn test_orthonormalize_rejects_degenerate() {
        assert!(orthonormalize(Vec3::ZERO, Vec3::Y).is_none());
        assert!(orthonormalize(Vec3::Z, Vec3::ZERO).is_none());
        assert!(orthonormalize(Vec3::Z, Vec3::Z * 3.0).is_none());
        assert!(orthonormalize(Vec3::new(f32::NAN, 0.0, 1.0), Vec3::Y).is_none());
    }

    #[test]
    fn test_orthonormalize_fixes_skew() {
        let (f, u) = orthonormalize(Vec3::Z * 2.0, Vec3::new(0.0, 1.0, 0.5)).unwrap();
        assert!((f - Vec3::Z).length() < 1e-6);
        assert!((u - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_rotate_about() {
        let v = rotate_about(Vec3::Z, FRAC_PI_2, Vec3::Y);
        assert!((v - Vec3::X).length() < 1e-5);
        assert_eq!(rotate_about(Vec3::Z, 1.0, Vec3::ZERO), Vec3::Z);
    }
}
