//! World assembly and the per-tick simulation pipeline

use glam::{Mat4, Vec3};
use serde::Serialize;

use crate::core::camera::Camera;
use crate::core::camera_controller::ChaseCameraController;
use crate::core::input::ControlInput;
use crate::core::time::SimClock;
use crate::core::Result;
use crate::particles::{ParticleBatch, ParticleSystem};
use crate::physics::{
    airplane_step, integrate_body, resolve_terrain_collision, AirplaneForces, ControlSurface,
    SurfaceAxis,
};
use crate::terrain::Terrain;

use super::config::SimConfig;
use super::entity::{Entity, EntityKind, MeshHandle, TextureHandle};
use super::flatten::RenderItem;
use super::graph::{EntityId, SceneGraph};
use super::light::{create_directional_light, create_point_light, create_spotlight, GpuLight};

pub const TERRAIN_MESH: MeshHandle = MeshHandle(0);
pub const AIRPLANE_MESH: MeshHandle = MeshHandle(1);
pub const SURFACE_MESH: MeshHandle = MeshHandle(2);
pub const CRATE_MESH: MeshHandle = MeshHandle(3);

/// Hinged surfaces: name, axis, deflection sign, hinge position on the airframe
const SURFACES: [(&str, SurfaceAxis, f32, Vec3); 4] = [
    ("aileron_left", SurfaceAxis::Roll, 1.0, Vec3::new(3.0, 0.0, -1.0)),
    ("aileron_right", SurfaceAxis::Roll, -1.0, Vec3::new(-3.0, 0.0, -1.0)),
    ("flap_left", SurfaceAxis::Pitch, 1.0, Vec3::new(1.2, 0.0, -2.5)),
    ("flap_right", SurfaceAxis::Pitch, 1.0, Vec3::new(-1.2, 0.0, -2.5)),
];

/// Drop an entity so its lowest point sits on the ground
fn rest_on_ground(entity: &mut Entity, terrain: &Terrain) {
    let ground = terrain.height_at(entity.position.x, entity.position.z);
    entity.position.y = ground - entity.ground_contact_offset;
    entity.velocity = Vec3::ZERO;
}

/// Snapshot of the airplane for logging and traces
#[derive(Clone, Debug, Serialize)]
pub struct Telemetry {
    pub time: f64,
    pub tick: u64,
    pub position: Vec3,
    pub velocity: Vec3,
    pub speed: f32,
    /// Height of the lowest point above the ground
    pub altitude: f32,
    pub forward: Vec3,
    pub up: Vec3,
    pub on_ground: bool,
    pub forces: AirplaneForces,
    pub smoke_particles: usize,
    pub contrail_particles: usize,
}

/// Owns the generated world and advances it tick by tick
pub struct SceneManager {
    config: SimConfig,
    terrain: Terrain,
    graph: SceneGraph,
    airplane: EntityId,
    crate_box: EntityId,
    surfaces: Vec<(EntityId, ControlSurface)>,
    smoke: ParticleSystem,
    contrail: ParticleSystem,
    camera: Camera,
    chase: ChaseCameraController,
    clock: SimClock,
    ticks: u64,
    time: f64,
    last_forces: AirplaneForces,
    on_ground: bool,
}

impl SceneManager {
    /// Generate terrain, place every entity and validate the graph
    pub fn new(config: SimConfig) -> Result<Self> {
        let terrain = Terrain::generate(config.terrain.clone(), config.runway.as_ref())?;
        let mut graph = SceneGraph::new();

        let mut ground = Entity::new(
            "terrain",
            EntityKind::Terrain {
                splat_textures: [TextureHandle(1), TextureHandle(2), TextureHandle(3), TextureHandle(4)],
            },
        )
        .with_position(terrain.origin())
        .with_mesh(TERRAIN_MESH);
        ground.texture = Some(TextureHandle(0));
        graph.insert(ground);

        let mut plane = Entity::generic("airplane")
            .with_position(config.airplane_start)
            .with_scale(Vec3::splat(config.airplane_scale))
            .with_mesh(AIRPLANE_MESH);
        plane.ground_contact_offset = config.airplane_contact_offset;
        rest_on_ground(&mut plane, &terrain);
        let airplane = graph.insert(plane);

        let mut surfaces = Vec::with_capacity(SURFACES.len());
        for (name, axis, direction, hinge) in SURFACES {
            let id = graph.insert_child(
                Entity::generic(name).with_position(hinge).with_mesh(SURFACE_MESH),
                airplane,
            )?;
            surfaces.push((id, ControlSurface::new(axis, direction, Vec3::X)));
        }

        let mut crate_entity = Entity::generic("crate")
            .with_position(config.crate_start)
            .with_mesh(CRATE_MESH);
        crate_entity.ground_contact_offset = config.crate_contact_offset;
        rest_on_ground(&mut crate_entity, &terrain);
        let crate_box = graph.insert(crate_entity);

        let centre = terrain.center();
        graph.insert(create_directional_light(
            centre + Vec3::new(0.0, 500.0, 0.0),
            Vec3::ONE,
            0.8,
            Vec3::new(0.3, -1.0, 0.2),
            Vec3::Z,
            Vec3::new(1.0, 0.96, 0.88),
        )?);
        graph.insert_child(
            create_spotlight(
                Vec3::new(0.0, -0.5, 2.0),
                Vec3::splat(0.2),
                4.0,
                0.05,
                0.002,
                0.35,
                Vec3::new(0.0, -0.2, 1.0),
                Vec3::Y,
                Vec3::ONE,
            )?,
            airplane,
        )?;
        graph.insert(create_point_light(
            config.crate_start + Vec3::new(0.0, 6.0, 0.0),
            Vec3::splat(0.3),
            3.0,
            0.09,
            0.032,
            Vec3::new(1.0, 0.6, 0.3),
        ));

        graph.validate()?;

        let smoke = ParticleSystem::new(config.smoke.clone())?;
        let contrail = ParticleSystem::new(config.contrail.clone())?;

        let chase = ChaseCameraController::new(config.chase_camera.clone());
        let mut camera = Camera::default();
        {
            let plane = graph.entity(airplane)?;
            chase.snap(&mut camera, plane.position, plane.forward(), plane.up());
        }

        let clock = SimClock::new(config.physics_step.max(1e-4))
            .with_max_steps(config.max_steps_per_frame);

        log::info!(
            "World ready: {} entities, airplane at {:?}, runway {}",
            graph.len(),
            graph.entity(airplane)?.position,
            if config.runway.is_some() { "carved" } else { "absent" }
        );

        Ok(Self {
            config,
            terrain,
            graph,
            airplane,
            crate_box,
            surfaces,
            smoke,
            contrail,
            camera,
            chase,
            clock,
            ticks: 0,
            time: 0.0,
            last_forces: AirplaneForces::default(),
            on_ground: true,
        })
    }

    /// Feed one rendered frame's real time; runs the due fixed steps.
    /// Jump is only applied on the first of them.
    pub fn frame(&mut self, input: &ControlInput, frame_dt: f32) -> Result<u32> {
        let steps = self.clock.advance(frame_dt);
        let dt = self.clock.step();
        let mut input = *input;
        for _ in 0..steps {
            self.step(&input, dt)?;
            input.jump = false;
        }
        Ok(steps)
    }

    /// One simulation tick: physics, ground collision, control surfaces,
    /// camera, then particles.
    pub fn step(&mut self, input: &ControlInput, dt: f32) -> Result<()> {
        {
            let body = self.config.body.clone();
            let jump = self.config.jump_impulse;
            let crate_box = self.graph.entity_mut(self.crate_box)?;
            if input.jump {
                crate_box.impulse += Vec3::new(0.0, jump, 0.0);
            }
            integrate_body(crate_box, &body, dt);
            resolve_terrain_collision(crate_box, &self.terrain);
        }

        {
            let plane = self.graph.entity_mut(self.airplane)?;
            self.last_forces = airplane_step(plane, input, &self.config.airplane, dt);
            self.on_ground = resolve_terrain_collision(plane, &self.terrain);
        }

        for (id, surface) in &mut self.surfaces {
            if let Some(entity) = self.graph.get_mut(*id) {
                surface.steer(entity, input, dt);
            }
        }

        let (position, forward, up) = {
            let plane = self.graph.entity(self.airplane)?;
            (plane.position, plane.forward(), plane.up())
        };
        self.chase.update(&mut self.camera, position, forward, up, dt);

        let plane_world = self.graph.world_transform(self.airplane)?;
        let (cam_pos, cam_fwd) = (self.camera.position, self.camera.forward());
        self.smoke.update(Some(&plane_world), cam_pos, cam_fwd, dt);
        self.contrail.update(Some(&plane_world), cam_pos, cam_fwd, dt);

        self.ticks += 1;
        self.time += dt as f64;
        Ok(())
    }

    pub fn telemetry(&self) -> Result<Telemetry> {
        let plane = self.graph.entity(self.airplane)?;
        let ground = self.terrain.height_at(plane.position.x, plane.position.z);
        Ok(Telemetry {
            time: self.time,
            tick: self.ticks,
            position: plane.position,
            velocity: plane.velocity,
            speed: plane.velocity.length(),
            altitude: plane.position.y + plane.ground_contact_offset - ground,
            forward: plane.forward(),
            up: plane.up(),
            on_ground: self.on_ground,
            forces: self.last_forces,
            smoke_particles: self.smoke.len(),
            contrail_particles: self.contrail.len(),
        })
    }

    /// Visible meshes with world transforms
    pub fn render_items(&self) -> Result<Vec<RenderItem>> {
        self.graph.flatten()
    }

    pub fn lights(&self) -> Result<Vec<GpuLight>> {
        self.graph.collect_lights()
    }

    /// Billboard batches for smoke then contrail
    pub fn particle_batches(&self) -> Result<Vec<ParticleBatch>> {
        let plane_world: Mat4 = self.graph.world_transform(self.airplane)?;
        Ok(vec![
            self.smoke.batch(Some(&plane_world), &self.camera),
            self.contrail.batch(Some(&plane_world), &self.camera),
        ])
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Ticks run so far, whether through `frame` or `step`
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn airplane(&self) -> EntityId {
        self.airplane
    }

    pub fn crate_box(&self) -> EntityId {
        self.crate_box
    }

    /// Control surfaces with their current deflection state
    pub fn surfaces(&self) -> &[(EntityId, ControlSurface)] {
        &self.surfaces
    }

    pub fn smoke(&self) -> &ParticleSystem {
        &self.smoke
    }

    pub fn contrail(&self) -> &ParticleSystem {
        &self.contrail
    }
}
