//! Viewer camera: a pose plus a perspective projection

use crate::core::types::{Mat3, Mat4, Quat, Vec3};

/// Perspective frustum parameters
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    /// Vertical field of view in radians
    pub fov_y: f32,
    /// Width over height
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y: 0.8,
            aspect: 4.0 / 3.0,
            near: 0.1,
            far: 4000.0,
        }
    }
}

impl Projection {
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }
}

/// Camera looking down its local -Z with +Y up
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Vec3,
    /// Camera-to-world rotation
    pub rotation: Quat,
    pub projection: Projection,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 5.0), Projection::default())
    }
}

impl Camera {
    pub fn new(position: Vec3, projection: Projection) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            projection,
        }
    }

    /// Aim at `target`, keeping `up` as close to screen-up as possible.
    ///
    /// No-op when `target` is the camera position or `up` lies along the view
    /// direction.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        let Some(forward) = (target - self.position).try_normalize() else {
            return;
        };
        let Some(right) = forward.cross(up).try_normalize() else {
            return;
        };
        let up = right.cross(forward);
        self.rotation = Quat::from_mat3(&Mat3::from_cols(right, up, -forward)).normalize();
    }

    /// Camera-to-world transform
    pub fn pose(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }

    /// World-to-camera transform
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_quat(self.rotation.conjugate()) * Mat4::from_translation(-self.position)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection.matrix() * self.view_matrix()
    }

    /// Rotation only, for turning billboards toward the viewer
    pub fn rotation_matrix(&self) -> Mat4 {
        Mat4::from_quat(self.rotation)
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Signed distance of `point` in front of the camera
    pub fn depth_of(&self, point: Vec3) -> f32 {
        (point - self.position).dot(self.forward())
    }

    /// Resize; ignored for a zero-height viewport
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.projection.aspect = width as f32 / height as f32;
        }
    }
}
