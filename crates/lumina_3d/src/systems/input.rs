//! Held-key state for the movement system.

/// Movement keys currently held.
///
/// The application owns the mapping from physical keys to these flags
/// and keeps them current from its event loop;
/// [`controller_update_system`](super::controller_update_system) samples
/// the state once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    /// Move along the view direction.
    pub forward: bool,
    /// Move against the view direction.
    pub backward: bool,
    /// Strafe left.
    pub left: bool,
    /// Strafe right.
    pub right: bool,
    /// Rise along the entity's up axis.
    pub ascend: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any movement key is held.
    pub fn any_movement(&self) -> bool {
        self.forward || self.backward || self.left || self.right || self.ascend
    }

    /// Release every key, for focus loss or capture toggles.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_by_default() {
        assert!(!InputState::new().any_movement());
    }

    #[test]
    fn test_clear_releases_held_keys() {
        let mut input = InputState {
            forward: true,
            right: true,
            ..Default::default()
        };
        assert!(input.any_movement());
        input.clear();
        assert!(!input.any_movement());
    }
}
