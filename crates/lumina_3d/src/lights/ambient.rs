//! Ambient light.

use glam::Vec3;

/// Uniform illumination applied to every lit surface.
///
/// Ambient light has no position; a transform on the same entity is
/// ignored. Use sparingly, it flattens shading.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmbientLight {
    /// Light color.
    pub color: Vec3,
    /// Scalar brightness multiplier.
    pub brightness: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            brightness: 0.1,
        }
    }
}

impl AmbientLight {
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
