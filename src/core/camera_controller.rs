//! Chase camera that trails the airplane

use serde::{Deserialize, Serialize};

use crate::core::camera::Camera;
use crate::core::types::Vec3;

/// Chase camera tuning
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaseCameraParams {
    /// Distance behind the target along its forward axis
    pub distance: f32,
    /// Height above the target along its up axis
    pub height: f32,
    /// Catch-up rate. The camera closes `stiffness * dt * gap` of the gap per
    /// step, so it moves faster the further it falls behind.
    pub stiffness: f32,
}

impl Default for ChaseCameraParams {
    fn default() -> Self {
        Self {
            distance: 7.5,
            height: 3.0,
            stiffness: 0.6,
        }
    }
}

/// Eases a camera toward a point behind and above a moving target
pub struct ChaseCameraController {
    pub params: ChaseCameraParams,
}

impl ChaseCameraController {
    /// Create new controller
    pub fn new(params: ChaseCameraParams) -> Self {
        Self { params }
    }

    /// Where the camera wants to be for a target with the given basis
    pub fn desired_position(&self, target: Vec3, forward: Vec3, up: Vec3) -> Vec3 {
        target - forward * self.params.distance + up * self.params.height
    }

    /// Snap the camera to its desired position
    pub fn snap(&self, camera: &mut Camera, target: Vec3, forward: Vec3, up: Vec3) {
        camera.position = self.desired_position(target, forward, up);
        camera.look_at(target, up);
    }

    /// Move the camera one step toward its desired position and aim it at the target
    pub fn update(&self, camera: &mut Camera, target: Vec3, forward: Vec3, up: Vec3, dt: f32) {
        let desired = self.desired_position(target, forward, up);
        let gap = desired - camera.position;
        let t = (self.params.stiffness * dt * gap.length()).min(1.0);
        camera.position += gap * t;
        camera.look_at(target, up);
    }
}

impl Default for ChaseCameraController {
    fn default() -> Self {
        Self::new(ChaseCameraParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desired_position() {
        let controller = ChaseCameraController::default();
        let p = controller.desired_position(Vec3::ZERO, Vec3::Z, Vec3::Y);
        assert!((p - Vec3::new(0.0, 3.0, -7.5)).length() < 1e-5);
    }

    #[test]
    fn test_update_closes_gap() {
        let controller = ChaseCameraController::default();
        let mut camera = Camera::default();
        camera.position = Vec3::new(0.0, 3.0, -20.0);

        let before = (camera.position - Vec3::new(0.0, 3.0, -7.5)).length();
        controller.update(&mut camera, Vec3::ZERO, Vec3::Z, Vec3::Y, 1.0 / 60.0);
        let after = (camera.position - Vec3::new(0.0, 3.0, -7.5)).length();

        assert!(after < before);
        assert!(camera.forward().z > 0.0);
    }

    #[test]
    fn test_update_never_overshoots() {
        let controller = ChaseCameraController::default();
        let mut camera = Camera::default();
        camera.position = Vec3::new(0.0, 3.0, -5000.0);

        controller.update(&mut camera, Vec3::ZERO, Vec3::Z, Vec3::Y, 1.0);
        assert!((camera.position - Vec3::new(0.0, 3.0, -7.5)).length() < 1e-3);
    }
}
