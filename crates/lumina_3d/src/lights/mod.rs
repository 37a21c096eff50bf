//! Light components.
//!
//! Lighting is forward and capped: each frame the renderer packs up to
//! [`MAX_LIGHTS`](crate::render::MAX_LIGHTS) ambient and point lights
//! into the per-draw uniform block. A light with zero or negative
//! brightness is skipped at gather time, so it can be dimmed off without
//! removing the component.

mod ambient;
mod point;

pub use ambient::AmbientLight;
pub use point::PointLight;
