//! Geometry generation and GPU mesh upload.
//!
//! A [`Geometry`] holds CPU-side vertex and index data, built by the
//! generators in [`primitives`] or assembled by hand. [`Mesh`] is the
//! uploaded form: buffer handles plus draw counts, stored on an entity
//! as a component. The world releases those handles when the entity is
//! despawned.

mod primitives;
mod vertex;

pub use primitives::{BoxGeometry, OctahedronGeometry, TetrahedronGeometry, TorusGeometry};
pub use vertex::Vertex;

use glam::Vec3;
use lumina_gpu::{BufferId, GpuContext, ResourceHost};

/// Errors from geometry generation.
#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    /// A torus needs at least 3 segments around both rings.
    #[error("torus needs at least 3 segments in each direction, got {radial} radial and {tubular} tubular")]
    SegmentCount { radial: u32, tubular: u32 },
    /// Ring and tube radii must both be positive.
    #[error("torus radii must be positive, got radius {radius} and tube radius {tube_radius}")]
    NonPositiveRadius { radius: f32, tube_radius: f32 },
    /// Arc angle outside the half-open range (0, 2*PI].
    #[error("torus arc must be in (0, 2*PI], got {0}")]
    InvalidArc(f32),
    /// More vertices than a 16-bit index can address.
    #[error("mesh has {0} vertices, too many for 16-bit indices")]
    TooManyVertices(usize),
}

/// CPU-side mesh data: vertices plus 16-bit triangle indices.
#[derive(Clone, Debug, Default)]
pub struct Geometry {
    /// Vertex data.
    pub vertices: Vec<Vertex>,
    /// Triangle indices, clockwise front faces.
    pub indices: Vec<u16>,
}

impl Geometry {
    /// Empty geometry.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_data(vertices: Vec<Vertex>, indices: Vec<u16>) -> Self {
        Self { vertices, indices }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Recomputes smooth per-vertex normals from the triangle list.
    ///
    /// Each face's unit normal is accumulated onto its three corner
    /// vertices and the sums renormalized, so vertices shared between
    /// faces get an averaged normal. Vertices referenced by no triangle
    /// end up with a zero normal.
    pub fn compute_vertex_normals(&mut self) {
        let mut accum = vec![Vec3::ZERO; self.vertices.len()];
        for tri in self.indices.chunks_exact(3) {
            let [ia, ib, ic] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let a = Vec3::from(self.vertices[ia].position);
            let b = Vec3::from(self.vertices[ib].position);
            let c = Vec3::from(self.vertices[ic].position);
            let face = (b - a).cross(c - a).normalize_or_zero();
            accum[ia] += face;
            accum[ib] += face;
            accum[ic] += face;
        }
        for (vertex, normal) in self.vertices.iter_mut().zip(accum) {
            vertex.normal = normal.normalize_or_zero().to_array();
        }
    }
}

/// GPU-resident mesh component.
///
/// Holds buffer handles into the context's resource table together with
/// draw counts. A mesh without an index buffer is drawn non-indexed over
/// `vertex_count` vertices. Despawning the owning entity releases both
/// buffers; a stale handle left behind by a manual release just makes
/// the renderer skip the mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mesh {
    /// Vertex buffer handle.
    pub vertex_buffer: BufferId,
    /// Number of vertices, used for non-indexed draws.
    pub vertex_count: u32,
    /// Index buffer handle, if the mesh is indexed.
    pub index_buffer: Option<BufferId>,
    /// Number of indices to draw.
    pub index_count: u32,
    /// Width of the stored indices.
    pub index_format: wgpu::IndexFormat,
}

impl Mesh {
    /// Uploads geometry into fresh GPU buffers.
    pub fn upload(gpu: &mut GpuContext, geometry: &Geometry) -> Self {
        let vertex_buffer = gpu.resources.create_vertex_buffer(
            &gpu.device,
            "mesh vertices",
            bytemuck::cast_slice(&geometry.vertices),
        );
        let index_buffer = (!geometry.indices.is_empty()).then(|| {
            gpu.resources.create_index_buffer(
                &gpu.device,
                "mesh indices",
                bytemuck::cast_slice(&geometry.indices),
            )
        });
        Self {
            vertex_buffer,
            vertex_count: geometry.vertices.len() as u32,
            index_buffer,
            index_count: geometry.indices.len() as u32,
            index_format: wgpu::IndexFormat::Uint16,
        }
    }

    /// Give the mesh's buffer handles back to the resource table.
    pub(crate) fn release(&self, resources: &mut impl ResourceHost) {
        resources.release_buffer(self.vertex_buffer);
        if let Some(index_buffer) = self.index_buffer {
            resources.release_buffer(index_buffer);
        }
    }

    /// Uploads an unindexed triangle soup.
    pub fn from_vertices(gpu: &mut GpuContext, vertices: &[Vertex]) -> Self {
        let vertex_buffer = gpu.resources.create_vertex_buffer(
            &gpu.device,
            "mesh vertices",
            bytemuck::cast_slice(vertices),
        );
        Self {
            vertex_buffer,
            vertex_count: vertices.len() as u32,
            index_buffer: None,
            index_count: 0,
            index_format: wgpu::IndexFormat::Uint16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normals_follow_index_winding() {
        let mut geometry = Geometry::from_data(
            vec![
                Vertex::flat([0.0, 0.0, 0.0], [0.0, 0.0]),
                Vertex::flat([1.0, 0.0, 0.0], [1.0, 0.0]),
                Vertex::flat([0.0, 1.0, 0.0], [0.0, 1.0]),
            ],
            vec![0, 1, 2],
        );
        geometry.compute_vertex_normals();
        for vertex in &geometry.vertices {
            assert_eq!(vertex.normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn test_shared_edge_normals_average() {
        // Two faces meeting at a right angle along the x axis.
        let mut geometry = Geometry::from_data(
            vec![
                Vertex::flat([0.0, 0.0, 0.0], [0.0, 0.0]),
                Vertex::flat([1.0, 0.0, 0.0], [1.0, 0.0]),
                Vertex::flat([0.0, 1.0, 0.0], [0.0, 1.0]),
                Vertex::flat([0.0, 0.0, -1.0], [0.0, 1.0]),
            ],
            vec![0, 1, 2, 0, 1, 3],
        );
        geometry.compute_vertex_normals();
        // Shared corner 0 averages the +z and +y face normals.
        let n = Vec3::from(geometry.vertices[0].normal);
        let expected = (Vec3::Z + Vec3::Y).normalize();
        assert!(n.abs_diff_eq(expected, 1e-6), "{n}");
        // Unshared corner keeps its single face normal.
        let lone = Vec3::from(geometry.vertices[2].normal);
        assert!(lone.abs_diff_eq(Vec3::Z, 1e-6));
    }

    #[test]
    fn test_unreferenced_vertex_gets_zero_normal() {
        let mut geometry = Geometry::from_data(
            vec![
                Vertex::flat([0.0, 0.0, 0.0], [0.0, 0.0]),
                Vertex::flat([1.0, 0.0, 0.0], [1.0, 0.0]),
                Vertex::flat([0.0, 1.0, 0.0], [0.0, 1.0]),
                Vertex::flat([9.0, 9.0, 9.0], [0.0, 0.0]),
            ],
            vec![0, 1, 2],
        );
        geometry.compute_vertex_normals();
        assert_eq!(geometry.vertices[3].normal, [0.0, 0.0, 0.0]);
    }
}
