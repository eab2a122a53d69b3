//! Camera-facing instance data for particle rendering

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};

use crate::core::camera::Camera;

use super::system::ParticleSystem;

/// Per-particle instance data (80 bytes)
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    /// Billboard model matrix, column-major. Multiply by the batch's parent
    /// transform to get world space.
    pub model: [[f32; 4]; 4],
    /// `time_alive / lifetime`, selects the atlas frame
    pub progress: f32,
    pub _pad: [f32; 3],
}

/// Everything the renderer needs to draw one emitter
#[derive(Clone, Debug, Default)]
pub struct ParticleBatch {
    /// Applied to every instance; identity for stamped emitters
    pub parent: Mat4,
    /// Atlas cells per side
    pub atlas_size: u32,
    /// Farthest first
    pub instances: Vec<ParticleInstance>,
}

impl ParticleSystem {
    /// Build billboards that face `camera`.
    ///
    /// For emitters that follow their parent the parent rotation is cancelled
    /// out of each billboard so it still faces the camera after the renderer
    /// applies `parent`.
    pub fn batch(&self, parent: Option<&Mat4>, camera: &Camera) -> ParticleBatch {
        let follow = self.config().follow_parent;
        let parent = match parent {
            Some(m) if follow => *m,
            _ => Mat4::IDENTITY,
        };

        let mut facing = camera.rotation_matrix();
        if follow {
            let (_, rotation, _) = parent.to_scale_rotation_translation();
            if rotation.is_finite() {
                facing = Mat4::from_quat(rotation.inverse()) * facing;
            }
        }

        let instances = self
            .particles()
            .iter()
            .map(|p| {
                let model = Mat4::from_translation(p.position)
                    * facing
                    * Mat4::from_quat(Quat::from_rotation_z(p.rotation))
                    * Mat4::from_scale(p.scale);
                ParticleInstance {
                    model: model.to_cols_array_2d(),
                    progress: p.progress(),
                    _pad: [0.0; 3],
                }
            })
            .collect();

        ParticleBatch {
            parent,
            atlas_size: self.config().atlas_size,
            instances,
        }
    }
}

impl ParticleBatch {
    /// World-space centre of instance `i`
    pub fn world_position(&self, i: usize) -> Option<Vec3> {
        let model = Mat4::from_cols_array_2d(&self.instances.get(i)?.model);
        Some((self.parent * model).transform_point3(Vec3::ZERO))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::system::EmitterConfig;

    fn emitter(follow_parent: bool) -> ParticleSystem {
        ParticleSystem::new(EmitterConfig {
            particles_per_second: 4.0,
            lifetime: [4.0, 4.0],
            direction_min: Vec3::ZERO,
            direction_max: Vec3::ZERO,
            offset: Vec3::new(0.0, 1.0, 0.0),
            follow_parent,
            atlas_size: 4,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_instance_size() {
        assert_eq!(std::mem::size_of::<ParticleInstance>(), 80);
    }

    #[test]
    fn test_progress_and_atlas() {
        let mut system = emitter(false);
        system.update(None, Vec3::ZERO, Vec3::Z, 1.0);
        system.update(None, Vec3::ZERO, Vec3::Z, 1.0);
        let camera = Camera::default();
        let batch = system.batch(None, &camera);
        assert_eq!(batch.atlas_size, 4);
        assert_eq!(batch.instances.len(), 8);
        let mut progress: Vec<f32> = batch.instances.iter().map(|i| i.progress).collect();
        progress.sort_by(f32::total_cmp);
        assert_eq!(progress.first(), Some(&0.0));
        assert_eq!(progress.last(), Some(&0.25));
    }

    #[test]
    fn test_follow_billboards_face_camera_in_world() {
        let mut system = emitter(true);
        let parent = Mat4::from_rotation_translation(
            Quat::from_rotation_y(1.1),
            Vec3::new(5.0, 0.0, 0.0),
        );
        system.update(Some(&parent), Vec3::ZERO, Vec3::Z, 1.0);

        let mut camera = Camera::default();
        camera.look_at(Vec3::new(5.0, 1.0, 0.0), Vec3::Y);
        let batch = system.batch(Some(&parent), &camera);
        assert_eq!(batch.parent, parent);

        for (i, instance) in batch.instances.iter().enumerate() {
            let model = Mat4::from_cols_array_2d(&instance.model);
            let rotation = Quat::from_rotation_z(system.particles()[i].rotation);
            // Undo the in-plane spin; what remains must be the camera's rotation
            let world = parent * model * Mat4::from_quat(rotation.inverse());
            let normal = world.transform_vector3(Vec3::Z).normalize();
            assert!((normal - camera.rotation_matrix().transform_vector3(Vec3::Z)).length() < 1e-4);
            let centre = batch.world_position(i).unwrap();
            assert!((centre - Vec3::new(5.0, 1.0, 0.0)).length() < 1e-4);
        }
    }

    #[test]
    fn test_stamped_batch_ignores_parent() {
        let mut system = emitter(false);
        let parent = Mat4::from_translation(Vec3::new(0.0, 0.0, 9.0));
        system.update(Some(&parent), Vec3::ZERO, Vec3::Z, 1.0);
        let batch = system.batch(Some(&parent), &Camera::default());
        assert_eq!(batch.parent, Mat4::IDENTITY);
        let centre = batch.world_position(0).unwrap();
        assert!((centre - Vec3::new(0.0, 1.0, 9.0)).length() < 1e-5);
    }
}
