//! The per-frame render system.
//!
//! One frame is: acquire the swapchain texture, sync the depth target,
//! resolve the active camera, gather lights, then record a single pass
//! that draws every renderable mesh and finishes with the overlay
//! flush. Draw state lives in a uniform slab with one 256-aligned slot
//! per draw, bound at a dynamic offset, so the pass rebinds nothing but
//! the offset and the material texture between draws.
//!
//! Misconfigured entities never fail the frame: a mesh without a
//! material, a material without a built pipeline, or a handle that no
//! longer resolves in the resource table all just skip that entity.
//! Only a failed swapchain acquire abandons the frame, and the caller
//! is expected to log it and carry on.

use std::f32::consts::PI;

use glam::{Mat4, Quat};
use lumina_gpu::{FrameError, GpuContext, ResourceHost, TextureId};
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use super::{FrameUniforms, LightSet, PipelineLayouts};
use crate::ecs::World;
use crate::overlay::OverlayVertex;
use crate::scene::Transform;

/// Tuning for [`Renderer`].
#[derive(Clone, Copy, Debug)]
pub struct RendererConfig {
    /// Clear color for the scene pass.
    pub clear_color: wgpu::Color,
    /// Uniform slab capacity in draws per frame. Draws past this are
    /// dropped with a warning.
    pub max_draws: u32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            clear_color: wgpu::Color::BLACK,
            max_draws: 1024,
        }
    }
}

/// Records and submits one frame per [`render`](Self::render) call.
///
/// Owns the shared bind group layouts, the per-draw uniform slab and a
/// cache of texture bind groups keyed by texture id. The cache drops an
/// entry as soon as its texture leaves the resource table, which also
/// stops the bind group from keeping the released texture alive on the
/// device.
pub struct Renderer {
    layouts: PipelineLayouts,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    uniform_stride: u64,
    texture_bind_groups: FxHashMap<TextureId, wgpu::BindGroup>,
    config: RendererConfig,
}

impl Renderer {
    pub fn new(gpu: &GpuContext, config: RendererConfig) -> Self {
        let layouts = PipelineLayouts::new(&gpu.device);

        let block = std::mem::size_of::<FrameUniforms>() as u64;
        let alignment = gpu.device.limits().min_uniform_buffer_offset_alignment as u64;
        let uniform_stride = aligned_stride(block, alignment);
        debug!(block, uniform_stride, max_draws = config.max_draws, "sizing uniform slab");

        let uniform_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame uniform slab"),
            size: uniform_stride * config.max_draws as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame uniforms"),
            layout: &layouts.uniforms,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &uniform_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(block),
                }),
            }],
        });

        Self {
            layouts,
            uniform_buffer,
            uniform_bind_group,
            uniform_stride,
            texture_bind_groups: FxHashMap::default(),
            config,
        }
    }

    /// Shared bind group layouts, needed to build material and overlay
    /// pipelines compatible with this renderer.
    pub fn layouts(&self) -> &PipelineLayouts {
        &self.layouts
    }

    /// Render one frame of `world` and present it.
    ///
    /// With no resolvable active camera the frame is presented empty and
    /// the call still succeeds. A failed swapchain acquire is returned
    /// after the surface has been nudged towards recovery; the caller
    /// logs and skips.
    pub fn render(&mut self, gpu: &mut GpuContext, world: &mut World) -> Result<(), FrameError> {
        let mut frame = match gpu.begin_frame() {
            Ok(frame) => frame,
            Err(e) => {
                warn!("skipping frame: {e}");
                return Err(e);
            }
        };
        gpu.ensure_depth_target();

        // Entries for textures that died since last frame would pin the
        // underlying objects; drop them before recording.
        self.texture_bind_groups
            .retain(|&id, _| gpu.resources.texture(id).is_some());

        let Some((camera_transform, camera)) = world.camera_state() else {
            debug!("no active camera, presenting empty frame");
            gpu.end_frame(frame);
            return Ok(());
        };

        let view = view_matrix(&camera_transform);
        let proj = camera.projection(gpu.aspect_ratio());
        let lights = LightSet::gather(world);
        let (width, height) = gpu.size();

        {
            let mut pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.config.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: gpu.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.draw_meshes(&mut pass, gpu, world, view, proj, &lights, camera_transform);
            self.flush_overlays(&mut pass, gpu, world, (width as f32, height as f32));
        }

        gpu.end_frame(frame);
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_meshes(
        &mut self,
        pass: &mut wgpu::RenderPass<'_>,
        gpu: &GpuContext,
        world: &World,
        view: Mat4,
        proj: Mat4,
        lights: &LightSet,
        camera: Transform,
    ) {
        let mut draw_index: u32 = 0;
        for (entity, mesh) in world.meshes.iter() {
            let Some(material) = world.materials.get(entity) else {
                continue;
            };
            let Some(pipeline_id) = material.pipeline else {
                continue;
            };
            let Some(pipeline) = gpu.resources.pipeline(pipeline_id) else {
                continue;
            };
            let Some(transform) = world.transforms.get(entity) else {
                continue;
            };
            let Some(vertex_buffer) = gpu.resources.buffer(mesh.vertex_buffer) else {
                continue;
            };
            // Resolved up front so a stale index handle skips the draw
            // instead of falling back to a non-indexed one.
            let index_buffer = match mesh.index_buffer {
                Some(id) => match gpu.resources.buffer(id) {
                    Some(buffer) => Some(buffer),
                    None => continue,
                },
                None => None,
            };
            if draw_index >= self.config.max_draws {
                warn!(
                    max_draws = self.config.max_draws,
                    "uniform slab full, dropping remaining draws"
                );
                break;
            }

            let model = model_matrix(transform, world.billboards.has(entity), camera.rotation);
            let uniforms =
                FrameUniforms::new(model, view, proj, material.color, lights, camera.position);
            let offset = draw_index * self.uniform_stride as u32;
            gpu.queue
                .write_buffer(&self.uniform_buffer, offset as u64, bytemuck::bytes_of(&uniforms));

            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, &self.uniform_bind_group, &[offset]);

            let texture = material
                .texture
                .filter(|&id| gpu.resources.texture(id).is_some())
                .unwrap_or_else(|| gpu.white_texture());
            let Some(texture_group) = self.texture_bind_group(gpu, texture) else {
                continue;
            };
            pass.set_bind_group(1, texture_group, &[]);

            pass.set_vertex_buffer(0, vertex_buffer.slice(..));
            match index_buffer {
                Some(buffer) => {
                    pass.set_index_buffer(buffer.slice(..), mesh.index_format);
                    pass.draw_indexed(0..mesh.index_count, 0, 0..1);
                }
                None => pass.draw(0..mesh.vertex_count, 0..1),
            }
            draw_index += 1;
        }
    }

    fn flush_overlays(
        &mut self,
        pass: &mut wgpu::RenderPass<'_>,
        gpu: &mut GpuContext,
        world: &mut World,
        resolution: (f32, f32),
    ) {
        for (_, overlay) in world.overlays.iter_mut() {
            if overlay.rects.is_empty() {
                continue;
            }
            {
                let Some(pipeline) = gpu.resources.pipeline(overlay.pipeline) else {
                    continue;
                };
                let Some(vertex_buffer) = gpu.resources.buffer(overlay.vertex_buffer) else {
                    continue;
                };
                let Some(index_buffer) = gpu.resources.buffer(overlay.index_buffer) else {
                    continue;
                };
                pass.set_pipeline(pipeline);
                pass.set_vertex_buffer(0, vertex_buffer.slice(..));
                pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);

                for (slot, rect) in overlay.rects.iter().enumerate() {
                    let vertices = rect.quad(resolution);
                    let offset = (slot * 4 * std::mem::size_of::<OverlayVertex>()) as u64;
                    gpu.queue
                        .write_buffer(vertex_buffer, offset, bytemuck::cast_slice(&vertices));

                    if rect.texture == overlay.white_texture {
                        match self.texture_bind_group(gpu, rect.texture) {
                            Some(group) => pass.set_bind_group(0, group, &[]),
                            None => continue,
                        }
                    } else {
                        // Transient bitmaps skip the cache; caching would
                        // keep the texture alive past its release below.
                        let Some(group) = transient_bind_group(&self.layouts, gpu, rect.texture)
                        else {
                            continue;
                        };
                        pass.set_bind_group(0, &group, &[]);
                    }

                    let first = (slot * 6) as u32;
                    pass.draw_indexed(first..first + 6, 0, 0..1);
                }
            }
            // The drawn quads are recorded; transient textures go back to
            // the table now and the queue resets for the next frame.
            for rect in overlay.rects.drain(..) {
                if rect.texture != overlay.white_texture {
                    gpu.resources.release_texture(rect.texture);
                }
            }
        }
    }

    fn texture_bind_group(&mut self, gpu: &GpuContext, id: TextureId) -> Option<&wgpu::BindGroup> {
        if !self.texture_bind_groups.contains_key(&id) {
            let entry = gpu.resources.texture(id)?;
            let group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("material texture bind group"),
                layout: &self.layouts.textures,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&entry.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(gpu.default_sampler()),
                    },
                ],
            });
            self.texture_bind_groups.insert(id, group);
        }
        self.texture_bind_groups.get(&id)
    }
}

fn transient_bind_group(
    layouts: &PipelineLayouts,
    gpu: &GpuContext,
    id: TextureId,
) -> Option<wgpu::BindGroup> {
    let entry = gpu.resources.texture(id)?;
    Some(gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("overlay bitmap bind group"),
        layout: &layouts.textures,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&entry.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(gpu.default_sampler()),
            },
        ],
    }))
}

/// World-to-view transform: undo the camera rotation, then its position.
fn view_matrix(camera: &Transform) -> Mat4 {
    Mat4::from_quat(camera.rotation.conjugate()) * Mat4::from_translation(-camera.position)
}

/// Model matrix for one entity. A billboarded entity trades its own
/// rotation for the camera's turned half a revolution about Y, so its
/// front faces the viewer; position and scale stay its own.
fn model_matrix(transform: &Transform, billboarded: bool, camera_rotation: Quat) -> Mat4 {
    let rotation = if billboarded {
        camera_rotation * Quat::from_rotation_y(PI)
    } else {
        transform.rotation
    };
    Mat4::from_scale_rotation_translation(transform.scale, rotation, transform.position)
}

/// Round `size` up to the next multiple of `alignment`.
fn aligned_stride(size: u64, alignment: u64) -> u64 {
    size.div_ceil(alignment) * alignment
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn assert_mat4_eq(a: Mat4, b: Mat4) {
        for (x, y) in a.to_cols_array().iter().zip(b.to_cols_array()) {
            assert!((x - y).abs() < 1e-5, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn test_view_matrix_inverts_the_camera_pose() {
        let camera = Transform::from_position(Vec3::new(3.0, -2.0, 5.0))
            .with_rotation(Quat::from_euler(glam::EulerRot::YXZ, 0.8, -0.3, 0.0));
        let pose = Mat4::from_rotation_translation(camera.rotation, camera.position);
        assert_mat4_eq(view_matrix(&camera) * pose, Mat4::IDENTITY);
    }

    #[test]
    fn test_model_matrix_is_translate_rotate_scale() {
        let transform = Transform::from_position(Vec3::new(1.0, 2.0, 3.0))
            .with_rotation(Quat::from_rotation_y(0.5))
            .with_scale(2.0);
        let expected = Mat4::from_translation(transform.position)
            * Mat4::from_quat(transform.rotation)
            * Mat4::from_scale(transform.scale);
        assert_mat4_eq(model_matrix(&transform, false, Quat::IDENTITY), expected);
    }

    #[test]
    fn test_billboard_faces_the_camera() {
        let transform = Transform::from_position(Vec3::new(4.0, 0.0, -7.0))
            .with_rotation(Quat::from_rotation_x(1.2));
        let camera_rotation = Quat::from_euler(glam::EulerRot::YXZ, 2.1, 0.4, 0.0);

        let model = model_matrix(&transform, true, camera_rotation);
        let expected = Mat4::from_scale_rotation_translation(
            transform.scale,
            camera_rotation * Quat::from_rotation_y(PI),
            transform.position,
        );
        assert_mat4_eq(model, expected);

        // With an identity camera the substituted forward points back
        // along +Z, straight at a camera looking down -Z.
        let facing = model_matrix(&transform, true, Quat::IDENTITY);
        let forward = facing.transform_vector3(Vec3::NEG_Z);
        assert!((forward - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_billboard_keeps_own_position_and_scale() {
        let transform = Transform::from_position(Vec3::new(-1.0, 5.0, 2.0)).with_scale(3.0);
        let model = model_matrix(&transform, true, Quat::from_rotation_y(1.0));
        let (scale, _, translation) = model.to_scale_rotation_translation();
        assert!((translation - transform.position).length() < 1e-5);
        assert!((scale - Vec3::splat(3.0)).length() < 1e-5);
    }

    #[test]
    fn test_uniform_stride_alignment() {
        assert_eq!(aligned_stride(608, 256), 768);
        assert_eq!(aligned_stride(608, 32), 608);
        assert_eq!(aligned_stride(1, 256), 256);
        assert_eq!(aligned_stride(256, 256), 256);
    }

    #[test]
    fn test_renderer_config_defaults() {
        let config = RendererConfig::default();
        assert_eq!(config.max_draws, 1024);
        assert_eq!(config.clear_color, wgpu::Color::BLACK);
    }
}
