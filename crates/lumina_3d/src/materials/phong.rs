//! Blinn-Phong lit material preset.

use glam::Vec3;
use lumina_gpu::{GpuContext, TextureId};

use super::{Material, Side};
use crate::render::{shaders, PipelineLayouts};

/// Builder for a lit material shaded with the frame's ambient and point
/// lights: Lambert diffuse plus a Blinn-Phong specular term.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhongMaterial {
    /// Base color.
    pub color: Vec3,
    /// Optional texture; the shared white fallback is used when unset.
    pub texture: Option<TextureId>,
    /// Face culling choice.
    pub side: Side,
}

impl PhongMaterial {
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

    /// Compile the lit shaders and build the material.
    pub fn create(&self, gpu: &mut GpuContext, layouts: &PipelineLayouts) -> Material {
        let vs = gpu
            .resources
            .create_shader(&gpu.device, "phong vertex shader", shaders::PHONG);
        let fs = gpu
            .resources
            .create_shader(&gpu.device, "phong fragment shader", shaders::PHONG);
        let mut material = Material::new(self.color, self.side);
        material.texture = self.texture;
        material.set_vertex_shader(gpu, layouts, vs);
        material.set_fragment_shader(gpu, layouts, fs);
        material
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let builder = PhongMaterial::new(Vec3::ONE);
        assert_eq!(builder.side, Side::Front);
        assert!(builder.texture.is_none());
    }
}
