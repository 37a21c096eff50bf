//! # Lumina 3D
//!
//! A small real-time 3D engine core: a sparse-set ECS, built-in geometry
//! generators, basic and Phong materials, forward lighting and a
//! screen-space overlay, rendered through `wgpu`.
//!
//! ## Architecture
//!
//! Everything hangs off a [`World`]. Entities are plain monotonic ids;
//! components live in one [`Pool`] per kind and systems are free
//! functions over the world:
//! - [`Transform`], [`Camera`], [`FirstPersonController`] and the
//!   [`Billboard`] tag describe where things are and how they move.
//! - [`geometry`] builds CPU-side meshes ([`BoxGeometry`],
//!   [`TorusGeometry`], ..) and uploads them as [`Mesh`] components.
//! - [`materials`] turn a color, an optional texture and a shader pair
//!   into a render pipeline per entity.
//! - [`AmbientLight`] and [`PointLight`] feed the per-draw light slots,
//!   capped at [`MAX_LIGHTS`].
//! - [`Overlay`] queues pixel-space rectangles and bitmaps that draw on
//!   top of the scene each frame.
//!
//! The [`Renderer`] walks the world once per frame: it resolves the
//! active camera, packs a uniform slot per visible mesh and records a
//! single pass, scene first, overlays second. GPU objects are owned by
//! the [`lumina_gpu`] resource table; despawning an entity releases every
//! handle its components held, exactly once.
//!
//! The crate ships no scheduler and no event loop. The host application
//! owns the window and input, translates events into [`ControllerEvent`]s
//! and an [`InputState`], and calls the systems and the renderer itself;
//! `examples/first_person.rs` shows the full wiring under `winit`.

pub mod ecs;
pub mod geometry;
pub mod lights;
pub mod materials;
pub mod overlay;
pub mod render;
pub mod scene;
pub mod systems;

pub use ecs::{Entity, EntityAllocator, Pool, World};
pub use geometry::{
    BoxGeometry, Geometry, GeometryError, Mesh, OctahedronGeometry, TetrahedronGeometry,
    TorusGeometry, Vertex,
};
pub use lights::{AmbientLight, PointLight};
pub use materials::{BasicMaterial, Material, PhongMaterial, Side};
pub use overlay::Overlay;
pub use render::{
    FrameUniforms, LightSet, PipelineLayouts, Renderer, RendererConfig, MAX_LIGHTS,
};
pub use scene::{Billboard, Camera, FirstPersonController, Transform};
pub use systems::{
    controller_event_system, controller_update_system, ControllerEvent, InputState,
};
