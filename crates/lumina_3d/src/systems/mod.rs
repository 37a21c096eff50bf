//! Per-frame update systems.
//!
//! Systems are free functions over [`World`](crate::ecs::World); there is
//! no scheduler, the caller decides order. Input arrives decoupled from
//! any windowing crate: the application translates its window and device
//! events into [`ControllerEvent`]s and a held-key [`InputState`], and
//! the systems consume those.

mod controller;
mod input;

pub use controller::{controller_event_system, controller_update_system, ControllerEvent};
pub use input::InputState;
