//! Frame rendering: uniform block layout, light gathering, pipelines and
//! the per-frame render system.
//!
//! Every mesh draw reads one [`FrameUniforms`] block out of a shared
//! uniform slab, bound at a dynamic offset. The block carries the full
//! per-draw state: transforms, material color, the frame's packed lights
//! and the camera position, so a draw needs no other per-object bind
//! groups besides its texture.

mod pipelines;
pub mod shaders;
mod system;

pub use pipelines::{build_mesh_pipeline, build_overlay_pipeline, PipelineLayouts};
pub use system::{Renderer, RendererConfig};

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use smallvec::SmallVec;

use crate::ecs::World;

/// Light slots in the uniform block. Lights past the cap are ignored for
/// the frame, in component pool order.
pub const MAX_LIGHTS: usize = 8;

/// Per-draw uniform block, layout-matched to the WGSL `FrameUniforms`
/// struct in every mesh shader.
///
/// Light arrays are always fully written: slots without a live light
/// carry zero brightness in `w`/`a`, which the shaders treat as "no
/// contribution", so stale data never bleeds between draws.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    /// Object-to-world matrix, column major.
    pub model: [[f32; 4]; 4],
    /// World-to-view matrix.
    pub view: [[f32; 4]; 4],
    /// View-to-clip projection.
    pub proj: [[f32; 4]; 4],
    /// Material base color, alpha 1.
    pub color: [f32; 4],
    /// Ambient lights as rgb + brightness.
    pub ambient: [[f32; 4]; MAX_LIGHTS],
    /// Point light world positions, w unused.
    pub point_pos: [[f32; 4]; MAX_LIGHTS],
    /// Point light colors as rgb + brightness.
    pub point_color: [[f32; 4]; MAX_LIGHTS],
    /// Camera world position for specular terms, w unused.
    pub camera_pos: [f32; 4],
}

impl FrameUniforms {
    /// Assemble the block for one draw.
    pub fn new(
        model: Mat4,
        view: Mat4,
        proj: Mat4,
        color: Vec3,
        lights: &LightSet,
        camera_pos: Vec3,
    ) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            proj: proj.to_cols_array_2d(),
            color: [color.x, color.y, color.z, 1.0],
            ambient: lights.ambient_slots(),
            point_pos: lights.point_position_slots(),
            point_color: lights.point_color_slots(),
            camera_pos: [camera_pos.x, camera_pos.y, camera_pos.z, 0.0],
        }
    }
}

/// The frame's lights, gathered once and shared by every draw.
///
/// Gathering walks each light pool in dense order and keeps the first
/// [`MAX_LIGHTS`] usable entries per kind. A light with brightness at or
/// below zero is skipped without consuming a slot, as is a point light
/// whose entity has no transform to take a position from.
#[derive(Clone, Debug, Default)]
pub struct LightSet {
    /// Packed ambient lights, rgb + brightness.
    pub ambient: SmallVec<[[f32; 4]; MAX_LIGHTS]>,
    /// Point light positions, paired index-wise with `point_colors`.
    pub point_positions: SmallVec<[[f32; 4]; MAX_LIGHTS]>,
    /// Packed point light colors, rgb + brightness.
    pub point_colors: SmallVec<[[f32; 4]; MAX_LIGHTS]>,
}

impl LightSet {
    /// Collect this frame's lights from the world.
    pub fn gather(world: &World) -> Self {
        let mut set = Self::default();

        for light in world.ambient_lights.values() {
            if set.ambient.len() >= MAX_LIGHTS {
                break;
            }
            if light.brightness <= 0.0 {
                continue;
            }
            set.ambient.push(light.packed());
        }

        for (entity, light) in world.point_lights.iter() {
            if set.point_positions.len() >= MAX_LIGHTS {
                break;
            }
            if light.brightness <= 0.0 {
                continue;
            }
            let Some(transform) = world.transforms.get(entity) else {
                continue;
            };
            let p = transform.position;
            set.point_positions.push([p.x, p.y, p.z, 0.0]);
            set.point_colors.push(light.packed());
        }

        set
    }

    fn ambient_slots(&self) -> [[f32; 4]; MAX_LIGHTS] {
        let mut slots = [[0.0; 4]; MAX_LIGHTS];
        slots[..self.ambient.len()].copy_from_slice(&self.ambient);
        slots
    }

    fn point_position_slots(&self) -> [[f32; 4]; MAX_LIGHTS] {
        let mut slots = [[0.0; 4]; MAX_LIGHTS];
        slots[..self.point_positions.len()].copy_from_slice(&self.point_positions);
        slots
    }

    fn point_color_slots(&self) -> [[f32; 4]; MAX_LIGHTS] {
        let mut slots = [[0.0; 4]; MAX_LIGHTS];
        slots[..self.point_colors.len()].copy_from_slice(&self.point_colors);
        slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lights::{AmbientLight, PointLight};
    use crate::scene::Transform;

    #[test]
    fn test_uniform_block_size_matches_wgsl() {
        // 3 mat4 + color + 3 light arrays of 8 vec4 + camera position.
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 608);
    }

    #[test]
    fn test_unused_light_slots_are_zero() {
        let mut world = World::new();
        let e = world.spawn();
        world.add_ambient_light(e, AmbientLight::new(Vec3::ONE, 0.25));

        let lights = LightSet::gather(&world);
        let uniforms = FrameUniforms::new(
            Mat4::IDENTITY,
            Mat4::IDENTITY,
            Mat4::IDENTITY,
            Vec3::ONE,
            &lights,
            Vec3::ZERO,
        );
        assert_eq!(uniforms.ambient[0], [1.0, 1.0, 1.0, 0.25]);
        for slot in &uniforms.ambient[1..] {
            assert_eq!(*slot, [0.0; 4]);
        }
        for slot in &uniforms.point_color {
            assert_eq!(slot[3], 0.0);
        }
    }

    #[test]
    fn test_gather_skips_dark_lights_without_consuming_slots() {
        let mut world = World::new();
        for brightness in [0.0, -1.0, 0.5] {
            let e = world.spawn();
            world.add_ambient_light(e, AmbientLight::white(brightness));
        }
        let lights = LightSet::gather(&world);
        assert_eq!(lights.ambient.len(), 1);
        assert_eq!(lights.ambient[0], [1.0, 1.0, 1.0, 0.5]);
    }

    #[test]
    fn test_gather_skips_point_lights_without_transform() {
        let mut world = World::new();
        let placed = world.spawn();
        world.add_transform(placed, Transform::from_position(Vec3::new(1.0, 2.0, 3.0)));
        world.add_point_light(placed, PointLight::white(1.0));

        let floating = world.spawn();
        world.add_point_light(floating, PointLight::white(1.0));

        let lights = LightSet::gather(&world);
        assert_eq!(lights.point_positions.len(), 1);
        assert_eq!(lights.point_positions[0], [1.0, 2.0, 3.0, 0.0]);
        assert_eq!(lights.point_colors.len(), 1);
    }

    #[test]
    fn test_gather_caps_at_max_lights_in_pool_order() {
        let mut world = World::new();
        for i in 0..(MAX_LIGHTS + 4) {
            let e = world.spawn();
            world.add_ambient_light(e, AmbientLight::white(1.0 + i as f32));
        }
        let lights = LightSet::gather(&world);
        assert_eq!(lights.ambient.len(), MAX_LIGHTS);
        // Dense order is insertion order when nothing was removed.
        for (i, slot) in lights.ambient.iter().enumerate() {
            assert_eq!(slot[3], 1.0 + i as f32);
        }
    }
}
