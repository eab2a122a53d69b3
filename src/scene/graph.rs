//! Scene graph: entity arena with generational handles.
//!
//! Entities live in contiguous slots. Parent links are [`EntityId`]s, so a link
//! to a removed entity simply stops resolving and the child behaves as a root.
//! Cycles are rejected when a parent is assigned, and [`SceneGraph::validate`]
//! re-checks the whole graph at startup.

use glam::Mat4;

use crate::core::{Error, Result};

use super::entity::{Entity, EntityKind};
use super::flatten::RenderItem;
use super::light::GpuLight;
use super::transform::local_transform;

/// Handle to an entity. Stale once the entity is removed, even if the slot is reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityId {
    index: u32,
    generation: u32,
}

impl EntityId {
    pub fn index(&self) -> u32 {
        self.index
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    entity: Option<Entity>,
}

/// Arena of entities forming a parent forest
#[derive(Clone, Debug, Default)]
pub struct SceneGraph {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root entity. Any parent already set on `entity` is cleared.
    pub fn insert(&mut self, mut entity: Entity) -> EntityId {
        entity.parent = None;
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entity = Some(entity);
            return EntityId {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            entity: Some(entity),
        });
        EntityId { index, generation: 0 }
    }

    /// Add an entity under an existing parent
    pub fn insert_child(&mut self, entity: Entity, parent: EntityId) -> Result<EntityId> {
        if !self.contains(parent) {
            return Err(Error::EntityNotFound(format!("parent {}", parent)));
        }
        let id = self.insert(entity);
        if let Some(e) = self.get_mut(id) {
            e.parent = Some(parent);
        }
        Ok(id)
    }

    /// Remove an entity. Children keep their stale link and resolve to no parent.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let entity = slot.entity.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Some(entity)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entity.as_ref()
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entity.as_mut()
    }

    /// Like [`get`](Self::get) but reports a missing entity as an error
    pub fn entity(&self, id: EntityId) -> Result<&Entity> {
        self.get(id)
            .ok_or_else(|| Error::EntityNotFound(id.to_string()))
    }

    /// Like [`get_mut`](Self::get_mut) but reports a missing entity as an error
    pub fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity> {
        self.get_mut(id)
            .ok_or_else(|| Error::EntityNotFound(id.to_string()))
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Live entities in slot order
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.entity.as_ref().map(|e| {
                (
                    EntityId {
                        index: i as u32,
                        generation: slot.generation,
                    },
                    e,
                )
            })
        })
    }

    /// Parent of `id`, or `None` when it has none or the parent was removed
    pub fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.get(id)?.parent.filter(|p| self.contains(*p))
    }

    /// Re-parent `child`. Fails if either entity is missing or if `parent`
    /// is `child` or one of its descendants.
    pub fn set_parent(&mut self, child: EntityId, parent: Option<EntityId>) -> Result<()> {
        if !self.contains(child) {
            return Err(Error::EntityNotFound(child.to_string()));
        }
        if let Some(parent) = parent {
            if !self.contains(parent) {
                return Err(Error::EntityNotFound(format!("parent {}", parent)));
            }
            let mut cursor = Some(parent);
            while let Some(ancestor) = cursor {
                if ancestor == child {
                    return Err(Error::ParentCycle(format!(
                        "{} cannot be parented to its descendant {}",
                        child, parent
                    )));
                }
                cursor = self.parent(ancestor);
            }
        }
        if let Some(e) = self.get_mut(child) {
            e.parent = parent;
        }
        Ok(())
    }

    /// Check that no parent chain loops back on itself
    pub fn validate(&self) -> Result<()> {
        for (id, _) in self.iter() {
            self.ancestor_depth(id)?;
        }
        log::debug!("Scene graph valid: {} entities", self.len);
        Ok(())
    }

    /// Number of live ancestors; errors on a cycle
    fn ancestor_depth(&self, id: EntityId) -> Result<usize> {
        let mut depth = 0;
        let mut cursor = self.parent(id);
        while let Some(ancestor) = cursor {
            depth += 1;
            if depth > self.len {
                return Err(Error::ParentCycle(format!(
                    "parent chain of {} ({}) loops",
                    id,
                    self.get(id).map(|e| e.name.as_str()).unwrap_or("?")
                )));
            }
            cursor = self.parent(ancestor);
        }
        Ok(depth)
    }

    /// World transform: `world(parent) · local(entity)`, composed up the chain
    pub fn world_transform(&self, id: EntityId) -> Result<Mat4> {
        let mut world = local_transform(self.entity(id)?);
        let mut cursor = self.parent(id);
        let mut depth = 0;
        while let Some(ancestor) = cursor {
            depth += 1;
            if depth > self.len {
                return Err(Error::ParentCycle(format!("while composing {}", id)));
            }
            world = local_transform(self.entity(ancestor)?) * world;
            cursor = self.parent(ancestor);
        }
        Ok(world)
    }

    /// Whether the entity and every live ancestor are visible
    pub fn is_visible(&self, id: EntityId) -> bool {
        let mut cursor = Some(id);
        let mut depth = 0;
        while let Some(current) = cursor {
            match self.get(current) {
                Some(e) if e.visible => {}
                _ => return false,
            }
            depth += 1;
            if depth > self.len {
                return false;
            }
            cursor = self.parent(current);
        }
        true
    }

    /// Collect every visible entity that has a mesh, with its world transform
    pub fn flatten(&self) -> Result<Vec<RenderItem>> {
        let mut out = Vec::new();
        for (id, entity) in self.iter() {
            let Some(mesh) = entity.mesh else {
                continue;
            };
            if !self.is_visible(id) {
                continue;
            }
            out.push(RenderItem {
                id,
                world: self.world_transform(id)?,
                mesh,
                texture: entity.texture,
                kind: entity.kind.clone(),
            });
        }
        Ok(out)
    }

    /// Pack every light entity for upload
    pub fn collect_lights(&self) -> Result<Vec<GpuLight>> {
        let mut out = Vec::new();
        for (id, entity) in self.iter() {
            if let EntityKind::Light(params) = &entity.kind {
                out.push(GpuLight::from_world(params, &self.world_transform(id)?));
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::entity::MeshHandle;
    use crate::scene::light::create_point_light;
    use glam::Vec3;

    fn named(name: &str) -> Entity {
        Entity::generic(name)
    }

    #[test]
    fn test_insert_and_get() {
        let mut graph = SceneGraph::new();
        let a = graph.insert(named("a"));
        let b = graph.insert(named("b"));
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.get(a).unwrap().name, "a");
        assert_eq!(graph.get(b).unwrap().name, "b");
        assert_ne!(a, b);
    }

    #[test]
    fn test_remove_invalidates_handle() {
        let mut graph = SceneGraph::new();
        let a = graph.insert(named("a"));
        assert!(graph.remove(a).is_some());
        assert!(graph.get(a).is_none());
        assert!(graph.remove(a).is_none());
        assert!(graph.is_empty());

        // Slot is reused with a new generation
        let b = graph.insert(named("b"));
        assert_eq!(a.index(), b.index());
        assert_ne!(a, b);
        assert!(graph.get(a).is_none());
        assert_eq!(graph.get(b).unwrap().name, "b");
    }

    #[test]
    fn test_removed_parent_resolves_to_none() {
        let mut graph = SceneGraph::new();
        let parent = graph.insert(named("parent").with_position(Vec3::new(10.0, 0.0, 0.0)));
        let child = graph
            .insert_child(named("child").with_position(Vec3::new(1.0, 0.0, 0.0)), parent)
            .unwrap();
        assert_eq!(graph.parent(child), Some(parent));

        graph.remove(parent);
        // Reusing the slot must not resurrect the link
        graph.insert(named("other").with_position(Vec3::splat(100.0)));

        assert_eq!(graph.parent(child), None);
        let world = graph.world_transform(child).unwrap();
        assert!((world.transform_point3(Vec3::ZERO) - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_insert_child_requires_parent() {
        let mut graph = SceneGraph::new();
        let gone = graph.insert(named("gone"));
        graph.remove(gone);
        let result = graph.insert_child(named("orphan"), gone);
        assert!(matches!(result, Err(Error::EntityNotFound(_))));
        assert!(graph.is_empty());
    }

    #[test]
    fn test_set_parent_rejects_cycles() {
        let mut graph = SceneGraph::new();
        let a = graph.insert(named("a"));
        let b = graph.insert_child(named("b"), a).unwrap();
        let c = graph.insert_child(named("c"), b).unwrap();

        assert!(matches!(graph.set_parent(a, Some(c)), Err(Error::ParentCycle(_))));
        assert!(matches!(graph.set_parent(a, Some(a)), Err(Error::ParentCycle(_))));
        assert_eq!(graph.parent(a), None);

        graph.set_parent(c, Some(a)).unwrap();
        assert_eq!(graph.parent(c), Some(a));
        graph.set_parent(c, None).unwrap();
        assert_eq!(graph.parent(c), None);
        assert!(graph.validate().is_ok());
    }

    #[test]
    fn test_validate_detects_cycle() {
        let mut graph = SceneGraph::new();
        let a = graph.insert(named("a"));
        let b = graph.insert_child(named("b"), a).unwrap();
        // Bypass set_parent to build a loop
        graph.get_mut(a).unwrap().parent = Some(b);

        assert!(matches!(graph.validate(), Err(Error::ParentCycle(_))));
        assert!(matches!(graph.world_transform(b), Err(Error::ParentCycle(_))));
        assert!(!graph.is_visible(b));
    }

    #[test]
    fn test_world_transform_composition() {
        let mut graph = SceneGraph::new();
        let mut parent = named("parent").with_position(Vec3::new(10.0, 5.0, 0.0));
        parent.scale = Vec3::splat(2.0);
        parent.set_orientation(Vec3::X, Vec3::Y).unwrap();
        let parent_id = graph.insert(parent.clone());

        let mut child = named("child").with_position(Vec3::new(0.0, 0.0, 3.0));
        child.set_orientation(Vec3::Y, Vec3::NEG_Z).unwrap();
        let child_id = graph.insert_child(child.clone(), parent_id).unwrap();

        let expected = local_transform(&parent) * local_transform(&child);
        let world = graph.world_transform(child_id).unwrap();
        assert!(world.abs_diff_eq(expected, 1e-5));

        // Child origin: parent rotates local +Z onto +X, scales by 2, then offsets
        assert!((world.transform_point3(Vec3::ZERO) - Vec3::new(16.0, 5.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_world_transform_missing_entity() {
        let mut graph = SceneGraph::new();
        let a = graph.insert(named("a"));
        graph.remove(a);
        assert!(matches!(graph.world_transform(a), Err(Error::EntityNotFound(_))));
    }

    #[test]
    fn test_flatten_skips_hidden_subtrees_and_meshless() {
        let mut graph = SceneGraph::new();
        let root = graph.insert(named("root").with_mesh(MeshHandle(1)));
        let child = graph
            .insert_child(named("child").with_mesh(MeshHandle(2)), root)
            .unwrap();
        graph.insert(named("marker"));

        let items = graph.flatten().unwrap();
        assert_eq!(items.len(), 2);

        graph.get_mut(root).unwrap().visible = false;
        let items = graph.flatten().unwrap();
        assert!(items.is_empty());

        graph.get_mut(root).unwrap().visible = true;
        graph.get_mut(child).unwrap().visible = false;
        let items = graph.flatten().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].mesh, MeshHandle(1));
    }

    #[test]
    fn test_collect_lights_uses_parent_transform() {
        let mut graph = SceneGraph::new();
        let carrier = graph.insert(named("carrier").with_position(Vec3::new(0.0, 10.0, 0.0)));
        let light = create_point_light(Vec3::new(1.0, 0.0, 0.0), Vec3::ONE, 2.0, 0.0, 0.0, Vec3::ONE);
        graph.insert_child(light, carrier).unwrap();
        graph.insert(named("not a light"));

        let lights = graph.collect_lights().unwrap();
        assert_eq!(lights.len(), 1);
        assert!((Vec3::from(lights[0].position) - Vec3::new(1.0, 10.0, 0.0)).length() < 1e-5);
    }
}
