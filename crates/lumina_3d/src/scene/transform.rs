//! Position, orientation and scale.

use glam::{Mat4, Quat, Vec3};

/// Spatial component placing an entity in the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// World-space position.
    pub position: Vec3,
    /// Orientation quaternion. Systems keep this normalized.
    pub rotation: Quat,
    /// Per-axis scale factor.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Identity transform at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Transform at `position` with identity rotation and unit scale.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Set position.
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set rotation.
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set uniform scale.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    /// Set per-axis scale.
    pub fn with_scale_vec(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// View direction, the local -Z axis rotated into world space.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Local +X axis in world space.
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Local +Y axis in world space.
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Model matrix, translation * rotation * scale.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.matrix(), Mat4::IDENTITY);
        assert_eq!(t.forward(), Vec3::NEG_Z);
        assert_eq!(t.right(), Vec3::X);
        assert_eq!(t.up(), Vec3::Y);
    }

    #[test]
    fn test_matrix_applies_scale_then_rotation_then_translation() {
        let t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0))
            .with_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2))
            .with_scale(2.0);
        // Local +X scaled to length 2, yawed 90 degrees onto -Z, then offset.
        let p = t.matrix().transform_point3(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::new(1.0, 2.0, 1.0), 1e-5), "{p}");
    }

    #[test]
    fn test_yaw_turns_forward_axis() {
        let t = Transform::new()
            .with_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        // Quarter turn left points the view down -X.
        assert!(t.forward().abs_diff_eq(Vec3::NEG_X, 1e-6));
        assert!(t.right().abs_diff_eq(Vec3::NEG_Z, 1e-6));
    }
}
