//! Perspective camera component.

use glam::Mat4;

/// Perspective projection parameters.
///
/// The camera's pose comes from the entity's
/// [`Transform`](crate::scene::Transform); this component only carries the
/// projection. Field of view is in radians throughout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Near clip plane distance.
    pub near: f32,
    /// Far clip plane distance.
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov_y: std::f32::consts::FRAC_PI_3,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    pub fn new(fov_y: f32, near: f32, far: f32) -> Self {
        Self { fov_y, near, far }
    }

    /// Set vertical field of view in radians.
    pub fn with_fov(mut self, fov_y: f32) -> Self {
        self.fov_y = fov_y;
        self
    }

    /// Set near and far clip distances.
    pub fn with_clip(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    /// Projection matrix for the given aspect ratio, mapping depth to
    /// the 0..1 clip range.
    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect, self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_projection_maps_near_to_zero_depth() {
        let cam = Camera::default();
        let proj = cam.projection(16.0 / 9.0);
        let near_point = proj.project_point3(Vec3::new(0.0, 0.0, -cam.near));
        assert!(near_point.z.abs() < 1e-5, "near plane depth {}", near_point.z);
        let far_point = proj.project_point3(Vec3::new(0.0, 0.0, -cam.far));
        assert!((far_point.z - 1.0).abs() < 1e-4, "far plane depth {}", far_point.z);
    }

    #[test]
    fn test_wider_fov_shrinks_projected_extent() {
        let narrow = Camera::default().with_fov(0.5).projection(1.0);
        let wide = Camera::default().with_fov(1.5).projection(1.0);
        let p = Vec3::new(1.0, 1.0, -10.0);
        assert!(narrow.project_point3(p).x > wide.project_point3(p).x);
    }
}
