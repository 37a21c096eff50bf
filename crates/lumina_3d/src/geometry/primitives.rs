//! Built-in geometry generators.
//!
//! All generators emit the shared [`Vertex`] format with clockwise
//! front-face winding and 16-bit indices.

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use tracing::warn;

use super::{Geometry, GeometryError, Vertex};

/// Axis-aligned box generator.
pub struct BoxGeometry;

impl BoxGeometry {
    /// Box of the given extents, centered on the origin.
    ///
    /// `length` spans Z, `width` spans X and `height` spans Y. Each face
    /// gets its own four vertices with a full 0..1 UV tile, so normals
    /// stay hard across edges.
    pub fn new(length: f32, width: f32, height: f32) -> Geometry {
        let wx = width / 2.0;
        let hy = height / 2.0;
        let lz = length / 2.0;

        let vertices = vec![
            // front (-z)
            Vertex::flat([-wx, -hy, -lz], [0.0, 1.0]),
            Vertex::flat([wx, -hy, -lz], [1.0, 1.0]),
            Vertex::flat([wx, hy, -lz], [1.0, 0.0]),
            Vertex::flat([-wx, hy, -lz], [0.0, 0.0]),
            // back (+z)
            Vertex::flat([-wx, -hy, lz], [0.0, 1.0]),
            Vertex::flat([wx, -hy, lz], [1.0, 1.0]),
            Vertex::flat([wx, hy, lz], [1.0, 0.0]),
            Vertex::flat([-wx, hy, lz], [0.0, 0.0]),
            // left (-x)
            Vertex::flat([-wx, hy, -lz], [1.0, 0.0]),
            Vertex::flat([-wx, hy, lz], [1.0, 1.0]),
            Vertex::flat([-wx, -hy, lz], [0.0, 1.0]),
            Vertex::flat([-wx, -hy, -lz], [0.0, 0.0]),
            // right (+x)
            Vertex::flat([wx, hy, -lz], [1.0, 1.0]),
            Vertex::flat([wx, -hy, -lz], [0.0, 1.0]),
            Vertex::flat([wx, -hy, lz], [0.0, 0.0]),
            Vertex::flat([wx, hy, lz], [1.0, 0.0]),
            // top (+y)
            Vertex::flat([-wx, hy, -lz], [0.0, 0.0]),
            Vertex::flat([wx, hy, -lz], [1.0, 0.0]),
            Vertex::flat([wx, hy, lz], [1.0, 1.0]),
            Vertex::flat([-wx, hy, lz], [0.0, 1.0]),
            // bottom (-y)
            Vertex::flat([-wx, -hy, -lz], [0.0, 1.0]),
            Vertex::flat([-wx, -hy, lz], [0.0, 0.0]),
            Vertex::flat([wx, -hy, lz], [1.0, 0.0]),
            Vertex::flat([wx, -hy, -lz], [1.0, 1.0]),
        ];

        let indices = vec![
            0, 2, 1, 2, 0, 3, // front
            4, 5, 6, 6, 7, 4, // back
            9, 8, 11, 11, 10, 9, // left
            15, 13, 12, 13, 15, 14, // right
            16, 18, 17, 18, 16, 19, // top
            20, 23, 22, 22, 21, 20, // bottom
        ];

        let mut geometry = Geometry::from_data(vertices, indices);
        geometry.compute_vertex_normals();
        geometry
    }

    /// Cube with equal extents.
    pub fn cube(size: f32) -> Geometry {
        Self::new(size, size, size)
    }
}

/// Torus generator with the hole along the Y axis.
pub struct TorusGeometry;

impl TorusGeometry {
    /// Torus with default tessellation (12 radial, 48 tubular, full arc).
    pub fn new(radius: f32, tube_radius: f32) -> Result<Geometry, GeometryError> {
        Self::with_detail(radius, tube_radius, 12, 48, TAU)
    }

    /// Torus with explicit tessellation and sweep.
    ///
    /// `radial_segments` subdivide the tube cross-section,
    /// `tubular_segments` subdivide the sweep around the hole and `arc`
    /// is the sweep angle in radians. A full-circle arc welds the seam;
    /// a partial arc leaves the ends open with an extra vertex ring.
    pub fn with_detail(
        radius: f32,
        tube_radius: f32,
        radial_segments: u32,
        tubular_segments: u32,
        arc: f32,
    ) -> Result<Geometry, GeometryError> {
        if radial_segments < 3 || tubular_segments < 3 {
            warn!(radial_segments, tubular_segments, "rejecting torus tessellation");
            return Err(GeometryError::SegmentCount {
                radial: radial_segments,
                tubular: tubular_segments,
            });
        }
        if tube_radius <= 0.0 || radius <= 0.0 {
            warn!(radius, tube_radius, "rejecting torus radii");
            return Err(GeometryError::NonPositiveRadius {
                radius,
                tube_radius,
            });
        }
        if arc <= 0.0 || arc > TAU {
            warn!(arc, "rejecting torus arc");
            return Err(GeometryError::InvalidArc(arc));
        }

        let is_closed = (arc - TAU).abs() < 1e-6;
        let num_tubular = tubular_segments + if is_closed { 0 } else { 1 };
        let num_radial = radial_segments;

        let num_vertices = (num_tubular * num_radial) as usize;
        if num_vertices > u16::MAX as usize {
            warn!(num_vertices, "torus exceeds the 16-bit index range");
            return Err(GeometryError::TooManyVertices(num_vertices));
        }

        let mut vertices = Vec::with_capacity(num_vertices);
        for tu in 0..num_tubular {
            let u = tu as f32 / tubular_segments as f32 * arc;
            let (sin_u, cos_u) = u.sin_cos();

            for ra in 0..num_radial {
                let v = ra as f32 / radial_segments as f32 * TAU;
                let (sin_v, cos_v) = v.sin_cos();

                let position = Vec3::new(
                    (radius + tube_radius * cos_v) * cos_u,
                    tube_radius * sin_v,
                    (radius + tube_radius * cos_v) * sin_u,
                );
                let tube_center = Vec3::new(radius * cos_u, 0.0, radius * sin_u);
                let normal = (position - tube_center).normalize();

                vertices.push(Vertex::new(
                    position.to_array(),
                    normal.to_array(),
                    [
                        tu as f32 / tubular_segments as f32,
                        ra as f32 / radial_segments as f32,
                    ],
                ));
            }
        }

        let mut indices = Vec::with_capacity((tubular_segments * radial_segments * 6) as usize);
        for tu in 0..tubular_segments {
            let mut tu1 = tu + 1;
            if is_closed {
                tu1 %= tubular_segments;
            }
            for ra in 0..radial_segments {
                let ra1 = (ra + 1) % radial_segments;

                let a = (tu * num_radial + ra) as u16;
                let b = (tu1 * num_radial + ra) as u16;
                let c = (tu1 * num_radial + ra1) as u16;
                let d = (tu * num_radial + ra1) as u16;

                indices.extend_from_slice(&[a, d, b, b, d, c]);
            }
        }

        Ok(Geometry::from_data(vertices, indices))
    }
}

/// Regular tetrahedron generator.
pub struct TetrahedronGeometry;

impl TetrahedronGeometry {
    /// Tetrahedron with vertices on a sphere of the given radius.
    pub fn new(radius: f32) -> Geometry {
        let corners = [
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(-1.0, -1.0, 1.0),
        ];

        let vertices = corners
            .iter()
            .map(|corner| {
                let unit = corner.normalize();
                Vertex::flat((unit * radius).to_array(), spherical_uv(unit))
            })
            .collect();

        let indices = vec![0, 1, 2, 0, 3, 1, 0, 2, 3, 1, 3, 2];

        let mut geometry = Geometry::from_data(vertices, indices);
        geometry.compute_vertex_normals();
        geometry
    }
}

/// Regular octahedron generator.
pub struct OctahedronGeometry;

impl OctahedronGeometry {
    /// Octahedron with vertices on a sphere of the given radius.
    pub fn new(radius: f32) -> Geometry {
        let corners = [
            Vec3::Y,     // north pole
            Vec3::X,
            Vec3::Z,
            Vec3::NEG_X,
            Vec3::NEG_Z,
            Vec3::NEG_Y, // south pole
        ];

        let vertices = corners
            .iter()
            .map(|&unit| Vertex::flat((unit * radius).to_array(), spherical_uv(unit)))
            .collect();

        let indices = vec![
            0, 2, 1, 0, 3, 2, 0, 4, 3, 0, 1, 4, // upper pyramid
            5, 1, 2, 5, 2, 3, 5, 3, 4, 5, 4, 1, // lower pyramid
        ];

        let mut geometry = Geometry::from_data(vertices, indices);
        geometry.compute_vertex_normals();
        geometry
    }
}

/// Spherical UV projection of a unit direction.
fn spherical_uv(unit: Vec3) -> [f32; 2] {
    [
        0.5 + unit.z.atan2(unit.x) / TAU,
        unit.y.clamp(-1.0, 1.0).acos() / PI,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_unit_normals(geometry: &Geometry) {
        for (i, vertex) in geometry.vertices.iter().enumerate() {
            let len = Vec3::from(vertex.normal).length();
            assert!((len - 1.0).abs() < 1e-4, "vertex {i} normal length {len}");
        }
    }

    #[test]
    fn test_box_counts_and_extent() {
        let geometry = BoxGeometry::new(4.0, 2.0, 6.0);
        assert_eq!(geometry.vertex_count(), 24);
        assert_eq!(geometry.index_count(), 36);
        for vertex in &geometry.vertices {
            assert!(vertex.position[0].abs() <= 1.0); // width 2
            assert!(vertex.position[1].abs() <= 3.0); // height 6
            assert!(vertex.position[2].abs() <= 2.0); // length 4
        }
        assert_unit_normals(&geometry);
    }

    #[test]
    fn test_box_front_face_points_out() {
        let geometry = BoxGeometry::cube(1.0);
        // First four vertices belong to the -z face and share its normal.
        for vertex in &geometry.vertices[..4] {
            let n = Vec3::from(vertex.normal);
            assert!(n.abs_diff_eq(Vec3::NEG_Z, 1e-5), "{n}");
        }
        // Top face normals point up.
        for vertex in &geometry.vertices[16..20] {
            let n = Vec3::from(vertex.normal);
            assert!(n.abs_diff_eq(Vec3::Y, 1e-5), "{n}");
        }
    }

    #[test]
    fn test_torus_closed_counts() {
        let geometry = TorusGeometry::new(2.0, 0.5).unwrap();
        // Closed arc shares the seam ring: tubular * radial vertices.
        assert_eq!(geometry.vertex_count(), 48 * 12);
        assert_eq!(geometry.index_count(), 48 * 12 * 6);
        assert_unit_normals(&geometry);
    }

    #[test]
    fn test_torus_open_arc_gains_a_ring() {
        let geometry = TorusGeometry::with_detail(2.0, 0.5, 12, 48, PI).unwrap();
        assert_eq!(geometry.vertex_count(), 49 * 12);
        assert_eq!(geometry.index_count(), 48 * 12 * 6);
    }

    #[test]
    fn test_torus_first_vertex_on_outer_equator() {
        let geometry = TorusGeometry::new(2.0, 0.5).unwrap();
        let first = &geometry.vertices[0];
        assert!(Vec3::from(first.position).abs_diff_eq(Vec3::new(2.5, 0.0, 0.0), 1e-5));
        assert!(Vec3::from(first.normal).abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn test_torus_rejects_bad_parameters() {
        assert!(matches!(
            TorusGeometry::with_detail(2.0, 0.5, 2, 48, TAU),
            Err(GeometryError::SegmentCount { radial: 2, .. })
        ));
        assert!(matches!(
            TorusGeometry::with_detail(0.0, 0.5, 12, 48, TAU),
            Err(GeometryError::NonPositiveRadius { .. })
        ));
        assert!(matches!(
            TorusGeometry::with_detail(2.0, -0.5, 12, 48, TAU),
            Err(GeometryError::NonPositiveRadius { .. })
        ));
        assert!(matches!(
            TorusGeometry::with_detail(2.0, 0.5, 12, 48, 0.0),
            Err(GeometryError::InvalidArc(_))
        ));
        assert!(matches!(
            TorusGeometry::with_detail(2.0, 0.5, 12, 48, 7.0),
            Err(GeometryError::InvalidArc(_))
        ));
        assert!(matches!(
            TorusGeometry::with_detail(2.0, 0.5, 256, 256, TAU),
            Err(GeometryError::TooManyVertices(65536))
        ));
    }

    #[test]
    fn test_tetrahedron_on_sphere() {
        let geometry = TetrahedronGeometry::new(3.0);
        assert_eq!(geometry.vertex_count(), 4);
        assert_eq!(geometry.index_count(), 12);
        for vertex in &geometry.vertices {
            let r = Vec3::from(vertex.position).length();
            assert!((r - 3.0).abs() < 1e-5, "radius {r}");
        }
        assert_unit_normals(&geometry);
    }

    #[test]
    fn test_octahedron_poles_and_uvs() {
        let geometry = OctahedronGeometry::new(2.0);
        assert_eq!(geometry.vertex_count(), 6);
        assert_eq!(geometry.index_count(), 24);
        // Radius independent UVs: poles map to the v extremes.
        assert!((geometry.vertices[0].uv[1] - 0.0).abs() < 1e-6);
        assert!((geometry.vertices[5].uv[1] - 1.0).abs() < 1e-6);
        // Pole normals point along the axis.
        assert!(Vec3::from(geometry.vertices[0].normal).abs_diff_eq(Vec3::Y, 1e-5));
        assert!(Vec3::from(geometry.vertices[5].normal).abs_diff_eq(Vec3::NEG_Y, 1e-5));
    }
}
