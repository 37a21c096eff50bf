//! Point light.

use glam::Vec3;

/// Omnidirectional light emitting from a position.
///
/// The position comes from the entity's
/// [`Transform`](crate::scene::Transform); a point light without a
/// transform is skipped at gather time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    /// Light color.
    pub color: Vec3,
    /// Scalar brightness multiplier.
    pub brightness: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            brightness: 1.0,
        }
    }
}

impl PointLight {
    pub fn new(color: Vec3, brightness: f32) -> Self {
        Self { color, brightness }
    }

    /// White light at the given brightness.
    pub fn white(brightness: f32) -> Self {
        Self {
            color: Vec3::ONE,
            brightness,
        }
    }

    /// Color and brightness packed as `[r, g, b, brightness]` for the
    /// shader uniform block.
    pub fn packed(&self) -> [f32; 4] {
        [self.color.x, self.color.y, self.color.z, self.brightness]
    }
}
