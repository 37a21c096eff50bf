//! Scene components: transforms, cameras and camera controllers.

mod camera;
mod controller;
mod transform;

pub use camera::Camera;
pub use controller::FirstPersonController;
pub use transform::Transform;

/// Tag component that makes a mesh face the active camera.
///
/// A billboarded entity ignores its own rotation at draw time; the
/// renderer substitutes the camera's orientation turned half a revolution
/// about Y so the mesh front faces the viewer. Position and scale still
/// come from the entity's [`Transform`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Billboard;
