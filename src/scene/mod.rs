//! Entities, their hierarchy and the assembled world

pub mod config;
pub mod entity;
pub mod flatten;
pub mod graph;
pub mod light;
pub mod manager;
pub mod transform;

pub use config::SimConfig;
pub use entity::{Entity, EntityKind, MeshHandle, TextureHandle};
pub use flatten::RenderItem;
pub use graph::{EntityId, SceneGraph};
pub use light::{
    create_directional_light, create_point_light, create_spotlight, GpuLight, LightParams,
    LightType,
};
pub use manager::{SceneManager, Telemetry};
pub use transform::local_transform;
