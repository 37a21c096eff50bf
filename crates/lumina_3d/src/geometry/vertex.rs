//! Mesh vertex format.

use bytemuck::{Pod, Zeroable};

/// Vertex data for 3D meshes: position, normal and texture coordinates,
/// tightly packed as eight floats.
///
/// The layout is shared by every mesh pipeline; see [`Vertex::layout`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vertex {
    /// Position in local space.
    pub position: [f32; 3],
    /// Normal vector.
    pub normal: [f32; 3],
    /// Texture coordinates.
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x2,
    ];

    pub const fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }

    /// Vertex with position and texture coordinates, normal left zeroed
    /// for a later
    /// [`compute_vertex_normals`](super::Geometry::compute_vertex_normals)
    /// pass.
    pub const fn flat(position: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal: [0.0; 3],
            uv,
        }
    }

    /// Vertex buffer layout for mesh pipelines.
    pub const fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_is_eight_packed_floats() {
        assert_eq!(std::mem::size_of::<Vertex>(), 8 * 4);
        let layout = Vertex::layout();
        assert_eq!(layout.array_stride, 32);
        assert_eq!(layout.attributes.len(), 3);
        assert_eq!(layout.attributes[1].offset, 12);
        assert_eq!(layout.attributes[2].offset, 24);
    }
}
