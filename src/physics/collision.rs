//! Ground collision by position correction

use crate::scene::Entity;
use crate::terrain::{Terrain, TerrainSampler};

/// Anything that can report ground height under a world `(x, z)`
pub trait GroundQuery {
    fn ground_height(&self, x: f32, z: f32) -> f32;
}

impl GroundQuery for Terrain {
    fn ground_height(&self, x: f32, z: f32) -> f32 {
        self.height_at(x, z)
    }
}

impl GroundQuery for TerrainSampler<'_> {
    fn ground_height(&self, x: f32, z: f32) -> f32 {
        self.height_at(x, z)
    }
}

/// Flat plane at a fixed height
#[derive(Clone, Copy, Debug)]
pub struct FlatGround(pub f32);

impl GroundQuery for FlatGround {
    fn ground_height(&self, _x: f32, _z: f32) -> f32 {
        self.0
    }
}

/// Push the entity out of the ground. If the ground is above the entity's
/// lowest point it is lifted so that point rests on the surface and its
/// vertical velocity is zeroed. No restitution, no friction.
///
/// Returns whether the entity is touching the ground.
pub fn resolve_terrain_collision(entity: &mut Entity, ground: &impl GroundQuery) -> bool {
    let height = ground.ground_height(entity.position.x, entity.position.z);
    if height > entity.position.y + entity.ground_contact_offset {
        entity.position.y = height - entity.ground_contact_offset;
        entity.velocity.y = 0.0;
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::Heightmap;
    use glam::Vec3;

    #[test]
    fn test_lifts_entity_onto_ground() {
        let mut e = Entity::generic("plane").with_position(Vec3::new(3.0, 4.0, 3.0));
        e.ground_contact_offset = -1.0;
        e.velocity = Vec3::new(5.0, -10.0, 2.0);

        assert!(resolve_terrain_collision(&mut e, &FlatGround(10.0)));
        assert_eq!(e.position.y, 11.0);
        assert_eq!(e.velocity, Vec3::new(5.0, 0.0, 2.0));
    }

    #[test]
    fn test_airborne_untouched() {
        let mut e = Entity::generic("crate").with_position(Vec3::new(0.0, 20.0, 0.0));
        e.ground_contact_offset = -0.6;
        e.velocity = Vec3::new(0.0, -3.0, 0.0);
        assert!(!resolve_terrain_collision(&mut e, &FlatGround(10.0)));
        assert_eq!(e.position.y, 20.0);
        assert_eq!(e.velocity.y, -3.0);
    }

    #[test]
    fn test_resting_contact_is_not_collision() {
        let mut e = Entity::generic("crate").with_position(Vec3::new(0.0, 11.0, 0.0));
        e.ground_contact_offset = -1.0;
        assert!(!resolve_terrain_collision(&mut e, &FlatGround(10.0)));
    }

    #[test]
    fn test_uses_interpolated_terrain_height() {
        let mut map = Heightmap::new(3).unwrap();
        map.set(1, 0, 4.0);
        let sampler = TerrainSampler::new(&map, 2.0);
        // Halfway between (0,0)=0 and (1,0)=4 on the cell edge
        let mut e = Entity::generic("e").with_position(Vec3::new(1.0, -5.0, 0.0));
        assert!(resolve_terrain_collision(&mut e, &sampler));
        assert!((e.position.y - 2.0).abs() < 1e-6);
    }
}
