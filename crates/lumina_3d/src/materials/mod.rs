//! Material components.
//!
//! A [`Material`] stores the surface inputs for one entity: a base color,
//! an optional texture and the shader pair its pipeline is built from.
//! The pipeline itself is derived state, rebuilt whenever a shader stage
//! changes while both stages are set. An entity whose material has no
//! pipeline yet is skipped by the renderer rather than treated as an
//! error, so materials can be assembled incrementally.
//!
//! [`BasicMaterial`] and [`PhongMaterial`] are the shipped presets; both
//! compile their embedded shaders and hand back a fully built component.

mod basic;
mod phong;

pub use basic::BasicMaterial;
pub use phong::PhongMaterial;

use glam::Vec3;
use lumina_gpu::{GpuContext, PipelineId, ResourceHost, ShaderId, TextureId};
use tracing::warn;

use crate::render::{build_mesh_pipeline, PipelineLayouts};

/// Which triangle faces survive culling.
///
/// Geometry in this crate winds clockwise, so [`Side::Front`] keeps
/// clockwise faces and culls the rest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Side {
    /// Show front faces, cull back faces.
    #[default]
    Front,
    /// Show back faces, cull front faces.
    Back,
    /// Show both faces, cull nothing.
    Double,
}

impl Side {
    /// Cull mode handed to the pipeline builder.
    pub fn cull_mode(self) -> Option<wgpu::Face> {
        match self {
            Side::Front => Some(wgpu::Face::Back),
            Side::Back => Some(wgpu::Face::Front),
            Side::Double => None,
        }
    }
}

/// Surface description component.
///
/// All GPU state is held as handles into the context's resource table.
/// Despawning the owning entity releases every handle the material still
/// holds; the shared white fallback texture is never a material's to
/// release because materials only reference it implicitly at draw time
/// when [`texture`](Self::texture) is unset or stale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    /// Base color, multiplied with the sampled texture.
    pub color: Vec3,
    /// Texture handle, or `None` for the shared white fallback.
    pub texture: Option<TextureId>,
    /// Vertex stage shader handle.
    pub vertex_shader: Option<ShaderId>,
    /// Fragment stage shader handle.
    pub fragment_shader: Option<ShaderId>,
    /// Derived pipeline, present once both shader stages are set.
    pub pipeline: Option<PipelineId>,
    /// Face culling choice baked into the pipeline.
    pub side: Side,
}

impl Material {
    /// A bare material with no shaders and therefore no pipeline.
    ///
    /// Not drawable until both stages are set; the renderer skips it.
    pub fn new(color: Vec3, side: Side) -> Self {
        Self {
            color,
            texture: None,
            vertex_shader: None,
            fragment_shader: None,
            pipeline: None,
            side,
        }
    }

    pub fn with_texture(mut self, texture: TextureId) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Whether the renderer can draw with this material.
    pub fn is_drawable(&self) -> bool {
        self.pipeline.is_some()
    }

    /// Install the vertex stage and rebuild the pipeline if the fragment
    /// stage is already set.
    pub fn set_vertex_shader(
        &mut self,
        gpu: &mut GpuContext,
        layouts: &PipelineLayouts,
        shader: ShaderId,
    ) {
        self.vertex_shader = Some(shader);
        self.rebuild_pipeline(gpu, layouts);
    }

    /// Install the fragment stage and rebuild the pipeline if the vertex
    /// stage is already set.
    pub fn set_fragment_shader(
        &mut self,
        gpu: &mut GpuContext,
        layouts: &PipelineLayouts,
        shader: ShaderId,
    ) {
        self.fragment_shader = Some(shader);
        self.rebuild_pipeline(gpu, layouts);
    }

    fn rebuild_pipeline(&mut self, gpu: &mut GpuContext, layouts: &PipelineLayouts) {
        let (Some(vs_id), Some(fs_id)) = (self.vertex_shader, self.fragment_shader) else {
            return;
        };
        let (Some(vs), Some(fs)) = (gpu.resources.shader(vs_id), gpu.resources.shader(fs_id))
        else {
            warn!("material shader handle is stale, keeping previous pipeline");
            return;
        };
        let pipeline = build_mesh_pipeline(
            &gpu.device,
            layouts,
            gpu.surface_format(),
            vs,
            fs,
            self.side,
            "material pipeline",
        );
        let old = self.pipeline.replace(gpu.resources.insert_pipeline(pipeline));
        if let Some(old) = old {
            gpu.resources.release_pipeline(old);
        }
    }

    /// Give every held handle back to the resource table.
    pub(crate) fn release(&self, resources: &mut impl ResourceHost) {
        if let Some(texture) = self.texture {
            resources.release_texture(texture);
        }
        if let Some(shader) = self.vertex_shader {
            resources.release_shader(shader);
        }
        if let Some(shader) = self.fragment_shader {
            resources.release_shader(shader);
        }
        if let Some(pipeline) = self.pipeline {
            resources.release_pipeline(pipeline);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_cull_mapping() {
        assert_eq!(Side::Front.cull_mode(), Some(wgpu::Face::Back));
        assert_eq!(Side::Back.cull_mode(), Some(wgpu::Face::Front));
        assert_eq!(Side::Double.cull_mode(), None);
    }

    #[test]
    fn test_default_side_shows_front_faces() {
        assert_eq!(Side::default(), Side::Front);
    }

    #[test]
    fn test_bare_material_is_not_drawable() {
        let material = Material::new(Vec3::ONE, Side::Front);
        assert!(!material.is_drawable());
        assert!(material.texture.is_none());
        assert!(material.vertex_shader.is_none());
        assert!(material.fragment_shader.is_none());
    }
}
