//! Screen-space overlay component.
//!
//! The overlay is an immediate-mode quad queue: systems call
//! [`Overlay::queue_rect`] or [`Overlay::queue_bitmap`] during the update,
//! and the renderer flushes the queue at the end of the frame's pass, on
//! top of the 3D scene. Geometry lives in pixel coordinates with the
//! origin at the top left; the vertex shader divides by the resolution
//! carried in each vertex, so queued quads need no per-resize fixup.
//!
//! Bitmaps (rasterized text, icons) upload into a transient texture that
//! the renderer releases right after the quad is drawn. Nothing is cached
//! between frames; a caller drawing text every frame uploads it every
//! frame. Plain rectangles reference the context's shared white texture,
//! which the flush never releases.
//!
//! The queue has a fixed capacity chosen at creation. Quads past the cap
//! are dropped without error, matching the renderer's general policy of
//! degrading quietly instead of failing the frame.

use bytemuck::{Pod, Zeroable};
use lumina_gpu::{
    create_rgba_texture, BufferId, GpuContext, PipelineId, ResourceHost, ShaderId, TextureId,
};

use crate::render::{build_overlay_pipeline, shaders, PipelineLayouts};

/// Smallest GPU allocation for the quad vertex store.
const MIN_VERTEX_BUFFER_SIZE: u64 = 4096;

/// One overlay quad: position and size in pixels plus a tint and the
/// texture it samples.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct OverlayRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: [f32; 4],
    pub texture: TextureId,
}

impl OverlayRect {
    /// Expand into the four corner vertices, carrying the surface
    /// resolution the shader divides by.
    pub fn quad(&self, resolution: (f32, f32)) -> [OverlayVertex; 4] {
        let (x1, y1) = (self.x, self.y);
        let (x2, y2) = (self.x + self.width, self.y + self.height);
        let resolution = [resolution.0, resolution.1];
        let corner = |x: f32, y: f32, u: f32, v: f32| OverlayVertex {
            position: [x, y],
            resolution,
            color: self.color,
            uv: [u, v],
        };
        [
            corner(x1, y2, 0.0, 1.0),
            corner(x2, y2, 1.0, 1.0),
            corner(x1, y1, 0.0, 0.0),
            corner(x2, y1, 1.0, 0.0),
        ]
    }
}

/// Vertex format for overlay quads.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct OverlayVertex {
    /// Position in pixels, origin top left.
    pub position: [f32; 2],
    /// Surface size in pixels at queue time.
    pub resolution: [f32; 2],
    /// Tint multiplied with the sampled texture.
    pub color: [f32; 4],
    /// Texture coordinates.
    pub uv: [f32; 2],
}

impl OverlayVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x2,
        1 => Float32x2,
        2 => Float32x4,
        3 => Float32x2,
    ];

    /// Vertex buffer layout for the overlay pipeline.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<OverlayVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Per-entity overlay state: the quad queue and the GPU objects that
/// draw it.
///
/// The vertex buffer holds one quad slot per queue entry and is
/// rewritten at flush. The index buffer is written once at creation;
/// slot `i` always reads vertices `4*i..4*i+4`, so only the draw range
/// changes per quad. Despawning the owning entity releases the buffers,
/// shaders, pipeline and any still-queued transient textures.
#[derive(Debug)]
pub struct Overlay {
    pub(crate) rects: Vec<OverlayRect>,
    pub(crate) max_rects: u32,
    pub(crate) vertex_buffer: BufferId,
    pub(crate) index_buffer: BufferId,
    pub(crate) vertex_shader: ShaderId,
    pub(crate) fragment_shader: ShaderId,
    pub(crate) pipeline: PipelineId,
    pub(crate) white_texture: TextureId,
}

impl Overlay {
    /// Build an overlay with room for `max_rects` quads per frame.
    pub fn new(gpu: &mut GpuContext, layouts: &PipelineLayouts, max_rects: u32) -> Self {
        let vertex_bytes =
            (max_rects as u64 * 4 * std::mem::size_of::<OverlayVertex>() as u64).max(MIN_VERTEX_BUFFER_SIZE);
        let vertex_buffer = gpu.resources.create_buffer(
            &gpu.device,
            "overlay quads",
            vertex_bytes,
            wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        );

        let mut indices: Vec<u32> = Vec::with_capacity(max_rects as usize * 6);
        for slot in 0..max_rects {
            let base = slot * 4;
            indices.extend_from_slice(&[base, base + 1, base + 2, base + 1, base + 3, base + 2]);
        }
        let index_buffer = gpu.resources.create_index_buffer(
            &gpu.device,
            "overlay indices",
            bytemuck::cast_slice(&indices),
        );

        let compile = |label: &str| {
            gpu.device
                .create_shader_module(wgpu::ShaderModuleDescriptor {
                    label: Some(label),
                    source: wgpu::ShaderSource::Wgsl(shaders::OVERLAY.into()),
                })
        };
        let vs = compile("overlay vertex shader");
        let fs = compile("overlay fragment shader");
        let pipeline =
            build_overlay_pipeline(&gpu.device, layouts, gpu.surface_format(), &vs, &fs);

        Self {
            rects: Vec::with_capacity(max_rects as usize),
            max_rects,
            vertex_buffer,
            index_buffer,
            vertex_shader: gpu.resources.insert_shader(vs),
            fragment_shader: gpu.resources.insert_shader(fs),
            pipeline: gpu.resources.insert_pipeline(pipeline),
            white_texture: gpu.white_texture(),
        }
    }

    /// Queue a solid rectangle. Dropped silently if the queue is full.
    pub fn queue_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: [f32; 4]) {
        if self.rects.len() >= self.max_rects as usize {
            return;
        }
        self.rects.push(OverlayRect {
            x,
            y,
            width,
            height,
            color,
            texture: self.white_texture,
        });
    }

    /// Queue a pre-rasterized RGBA8 bitmap, drawn at its pixel size.
    ///
    /// The pixels upload into a transient texture owned by this frame;
    /// the renderer releases it right after the quad draws. Dropped
    /// silently, without uploading, if the queue is full.
    pub fn queue_bitmap(
        &mut self,
        gpu: &mut GpuContext,
        x: f32,
        y: f32,
        width: u32,
        height: u32,
        pixels: &[u8],
        color: [f32; 4],
    ) {
        if self.rects.len() >= self.max_rects as usize {
            return;
        }
        let texture =
            create_rgba_texture(&gpu.device, &gpu.queue, "overlay bitmap", width, height, pixels);
        self.rects.push(OverlayRect {
            x,
            y,
            width: width as f32,
            height: height as f32,
            color,
            texture: gpu.resources.insert_texture(texture),
        });
    }

    /// Number of quads waiting for the next flush.
    pub fn queued(&self) -> usize {
        self.rects.len()
    }

    /// Capacity chosen at creation.
    pub fn max_rects(&self) -> u32 {
        self.max_rects
    }

    /// Give every held handle back, including textures still queued.
    ///
    /// The shared white texture is context-owned and not touched.
    pub(crate) fn release(&self, resources: &mut impl ResourceHost) {
        resources.release_buffer(self.vertex_buffer);
        resources.release_buffer(self.index_buffer);
        resources.release_shader(self.vertex_shader);
        resources.release_shader(self.fragment_shader);
        resources.release_pipeline(self.pipeline);
        for rect in &self.rects {
            if rect.texture != self.white_texture {
                resources.release_texture(rect.texture);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_overlay(max_rects: u32) -> Overlay {
        Overlay {
            rects: Vec::new(),
            max_rects,
            vertex_buffer: BufferId::default(),
            index_buffer: BufferId::default(),
            vertex_shader: ShaderId::default(),
            fragment_shader: ShaderId::default(),
            pipeline: PipelineId::default(),
            white_texture: TextureId::default(),
        }
    }

    #[test]
    fn test_vertex_is_ten_floats() {
        assert_eq!(std::mem::size_of::<OverlayVertex>(), 40);
        let layout = OverlayVertex::layout();
        assert_eq!(layout.array_stride, 40);
        let offsets: Vec<u64> = layout.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 8, 16, 32]);
    }

    #[test]
    fn test_quad_corners_and_uvs() {
        let rect = OverlayRect {
            x: 10.0,
            y: 20.0,
            width: 30.0,
            height: 40.0,
            color: [1.0, 0.0, 0.0, 1.0],
            texture: TextureId::default(),
        };
        let quad = rect.quad((800.0, 600.0));
        assert_eq!(quad[0].position, [10.0, 60.0]);
        assert_eq!(quad[1].position, [40.0, 60.0]);
        assert_eq!(quad[2].position, [10.0, 20.0]);
        assert_eq!(quad[3].position, [40.0, 20.0]);
        assert_eq!(quad[0].uv, [0.0, 1.0]);
        assert_eq!(quad[1].uv, [1.0, 1.0]);
        assert_eq!(quad[2].uv, [0.0, 0.0]);
        assert_eq!(quad[3].uv, [1.0, 0.0]);
        for vertex in &quad {
            assert_eq!(vertex.resolution, [800.0, 600.0]);
            assert_eq!(vertex.color, [1.0, 0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn test_queue_drops_past_capacity() {
        let mut overlay = bare_overlay(2);
        overlay.queue_rect(0.0, 0.0, 1.0, 1.0, [1.0; 4]);
        overlay.queue_rect(1.0, 0.0, 1.0, 1.0, [1.0; 4]);
        overlay.queue_rect(2.0, 0.0, 1.0, 1.0, [1.0; 4]);
        assert_eq!(overlay.queued(), 2);
        assert_eq!(overlay.rects[1].x, 1.0);
    }

    #[test]
    fn test_plain_rects_reference_the_white_texture() {
        let mut overlay = bare_overlay(4);
        overlay.queue_rect(0.0, 0.0, 5.0, 5.0, [0.5; 4]);
        assert_eq!(overlay.rects[0].texture, overlay.white_texture);
    }
}
