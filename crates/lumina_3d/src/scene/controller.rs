//! First-person camera controller component.

/// Mouse-look and fly-movement settings for an entity.
///
/// The component is pure configuration; the actual work happens in
/// [`controller_event_system`](crate::systems::controller_event_system)
/// and [`controller_update_system`](crate::systems::controller_update_system),
/// which drive the entity's [`Transform`](crate::scene::Transform).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FirstPersonController {
    /// Radians of rotation per pixel of pointer motion.
    pub sensitivity: f32,
    /// Movement speed in world units per second.
    pub move_speed: f32,
}

impl Default for FirstPersonController {
    fn default() -> Self {
        Self {
            sensitivity: 0.002,
            move_speed: 5.0,
        }
    }
}

impl FirstPersonController {
    pub fn new(sensitivity: f32, move_speed: f32) -> Self {
        Self {
            sensitivity,
            move_speed,
        }
    }

    /// Set look sensitivity in radians per pixel.
    pub fn with_sensitivity(mut self, sensitivity: f32) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    /// Set movement speed in units per second.
    pub fn with_move_speed(mut self, move_speed: f32) -> Self {
        self.move_speed = move_speed;
        self
    }
}
