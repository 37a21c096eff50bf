//! Unlit material preset.

use glam::Vec3;
use lumina_gpu::{GpuContext, TextureId};

use super::{Material, Side};
use crate::render::{shaders, PipelineLayouts};

/// Builder for a flat-shaded material: texture times base color, no
/// lighting terms at all.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BasicMaterial {
    /// Base color.
    pub color: Vec3,
    /// Optional texture; the shared white fallback is used when unset.
    pub texture: Option<TextureId>,
    /// Face culling choice.
    pub side: Side,
}

impl BasicMaterial {
    pub fn new(color: Vec3) -> Self {
        Self {
            color,
            texture: None,
            side: Side::default(),
        }
    }

    pub fn with_texture(mut self, texture: TextureId) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    /// Compile the unlit shaders and build the material.
    ///
    /// Each stage gets its own module so the component owns one handle
    /// per stage, released independently on despawn. The pipeline is
    /// built by the second shader install, once both stages are present.
    pub fn create(&self, gpu: &mut GpuContext, layouts: &PipelineLayouts) -> Material {
        let vs = gpu
            .resources
            .create_shader(&gpu.device, "basic vertex shader", shaders::BASIC);
        let fs = gpu
            .resources
            .create_shader(&gpu.device, "basic fragment shader", shaders::BASIC);
        let mut material = Material::new(self.color, self.side);
        material.texture = self.texture;
        material.set_vertex_shader(gpu, layouts, vs);
        material.set_fragment_shader(gpu, layouts, fs);
        material
    }
}
