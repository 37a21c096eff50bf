//! The world: a fixed catalog of component pools plus entity lifecycle.
//!
//! There is one pool per component kind, owned by value, and an entity is
//! nothing but an id that may have a row in any of them. Adding a
//! component to an entity that already has one overwrites in place.
//!
//! Three component kinds own GPU handles: meshes, materials and overlays.
//! Their removal paths take a [`ResourceHost`] so the handles go back to
//! the resource table exactly when the component dies, and only then.
//! [`despawn`](World::despawn) is the cascade over the whole catalog,
//! [`clear`](World::clear) sweeps every id ever issued and then drops the
//! pool storage itself.

use lumina_gpu::ResourceHost;
use tracing::{debug, trace};

use super::{Entity, EntityAllocator, Pool};
use crate::geometry::Mesh;
use crate::lights::{AmbientLight, PointLight};
use crate::materials::Material;
use crate::overlay::Overlay;
use crate::scene::{Billboard, Camera, FirstPersonController, Transform};

/// Component storage and entity lifecycle for one scene.
#[derive(Default)]
pub struct World {
    allocator: EntityAllocator,
    pub(crate) transforms: Pool<Transform>,
    pub(crate) meshes: Pool<Mesh>,
    pub(crate) materials: Pool<Material>,
    pub(crate) cameras: Pool<Camera>,
    pub(crate) controllers: Pool<FirstPersonController>,
    pub(crate) billboards: Pool<Billboard>,
    pub(crate) ambient_lights: Pool<AmbientLight>,
    pub(crate) point_lights: Pool<PointLight>,
    pub(crate) overlays: Pool<Overlay>,
    active_camera: Option<Entity>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh entity id. Ids are never reused.
    pub fn spawn(&mut self) -> Entity {
        self.allocator.allocate()
    }

    /// One past the highest id ever issued.
    pub fn entities_issued(&self) -> u32 {
        self.allocator.issued()
    }

    /// Remove every component the entity has, releasing GPU handles.
    ///
    /// Safe to call for ids that were never spawned, already despawned,
    /// or never had components; those cases do nothing. The entity id
    /// itself stays retired forever.
    pub fn despawn(&mut self, entity: Entity, resources: &mut impl ResourceHost) {
        trace!(%entity, "despawn");
        self.transforms.remove(entity);
        if let Some(mesh) = self.meshes.remove(entity) {
            mesh.release(resources);
        }
        if let Some(material) = self.materials.remove(entity) {
            material.release(resources);
        }
        self.cameras.remove(entity);
        self.controllers.remove(entity);
        self.billboards.remove(entity);
        self.ambient_lights.remove(entity);
        self.point_lights.remove(entity);
        if let Some(overlay) = self.overlays.remove(entity) {
            overlay.release(resources);
        }
    }

    /// Despawn every id ever issued, then drop the pool storage.
    ///
    /// The allocator keeps counting afterwards; a world is reusable but
    /// its ids stay unique across the sweep.
    pub fn clear(&mut self, resources: &mut impl ResourceHost) {
        debug!(entities = self.allocator.issued(), "clearing world");
        for id in 0..self.allocator.issued() {
            self.despawn(Entity::from_raw(id), resources);
        }
        self.transforms = Pool::new();
        self.meshes = Pool::new();
        self.materials = Pool::new();
        self.cameras = Pool::new();
        self.controllers = Pool::new();
        self.billboards = Pool::new();
        self.ambient_lights = Pool::new();
        self.point_lights = Pool::new();
        self.overlays = Pool::new();
        self.active_camera = None;
    }

    /// Whether the entity currently has a component of any kind.
    pub fn has_any_component(&self, entity: Entity) -> bool {
        self.transforms.has(entity)
            || self.meshes.has(entity)
            || self.materials.has(entity)
            || self.cameras.has(entity)
            || self.controllers.has(entity)
            || self.billboards.has(entity)
            || self.ambient_lights.has(entity)
            || self.point_lights.has(entity)
            || self.overlays.has(entity)
    }

    /// Choose which entity's camera renders the scene, or `None` for no
    /// camera (the renderer then skips frames).
    pub fn set_active_camera(&mut self, entity: Option<Entity>) {
        self.active_camera = entity;
    }

    pub fn active_camera(&self) -> Option<Entity> {
        self.active_camera
    }

    /// Resolve the active camera into its transform and lens.
    ///
    /// `None` when no entity is selected or the selected entity lost
    /// either component; a despawned camera entity degrades to this
    /// instead of dangling.
    pub fn camera_state(&self) -> Option<(Transform, Camera)> {
        let entity = self.active_camera?;
        Some((
            *self.transforms.get(entity)?,
            *self.cameras.get(entity)?,
        ))
    }

    // Transforms

    pub fn add_transform(&mut self, entity: Entity, transform: Transform) {
        self.transforms.add(entity, transform);
    }

    pub fn transform(&self, entity: Entity) -> Option<&Transform> {
        self.transforms.get(entity)
    }

    pub fn transform_mut(&mut self, entity: Entity) -> Option<&mut Transform> {
        self.transforms.get_mut(entity)
    }

    pub fn has_transform(&self, entity: Entity) -> bool {
        self.transforms.has(entity)
    }

    pub fn remove_transform(&mut self, entity: Entity) -> Option<Transform> {
        self.transforms.remove(entity)
    }

    // Meshes

    /// Attach a mesh. Overwriting an existing mesh does not release the
    /// old component's buffers; remove it first if the entity has one.
    pub fn add_mesh(&mut self, entity: Entity, mesh: Mesh) {
        self.meshes.add(entity, mesh);
    }

    pub fn mesh(&self, entity: Entity) -> Option<&Mesh> {
        self.meshes.get(entity)
    }

    pub fn mesh_mut(&mut self, entity: Entity) -> Option<&mut Mesh> {
        self.meshes.get_mut(entity)
    }

    pub fn has_mesh(&self, entity: Entity) -> bool {
        self.meshes.has(entity)
    }

    /// Detach and release the entity's mesh, if it has one.
    pub fn remove_mesh(&mut self, entity: Entity, resources: &mut impl ResourceHost) {
        if let Some(mesh) = self.meshes.remove(entity) {
            mesh.release(resources);
        }
    }

    // Materials

    /// Attach a material. Overwriting does not release the old
    /// component's handles; remove it first if the entity has one.
    pub fn add_material(&mut self, entity: Entity, material: Material) {
        self.materials.add(entity, material);
    }

    pub fn material(&self, entity: Entity) -> Option<&Material> {
        self.materials.get(entity)
    }

    pub fn material_mut(&mut self, entity: Entity) -> Option<&mut Material> {
        self.materials.get_mut(entity)
    }

    pub fn has_material(&self, entity: Entity) -> bool {
        self.materials.has(entity)
    }

    /// Detach and release the entity's material, if it has one.
    pub fn remove_material(&mut self, entity: Entity, resources: &mut impl ResourceHost) {
        if let Some(material) = self.materials.remove(entity) {
            material.release(resources);
        }
    }

    // Cameras

    pub fn add_camera(&mut self, entity: Entity, camera: Camera) {
        self.cameras.add(entity, camera);
    }

    pub fn camera(&self, entity: Entity) -> Option<&Camera> {
        self.cameras.get(entity)
    }

    pub fn camera_mut(&mut self, entity: Entity) -> Option<&mut Camera> {
        self.cameras.get_mut(entity)
    }

    pub fn has_camera(&self, entity: Entity) -> bool {
        self.cameras.has(entity)
    }

    pub fn remove_camera(&mut self, entity: Entity) -> Option<Camera> {
        self.cameras.remove(entity)
    }

    // First-person controllers

    pub fn add_controller(&mut self, entity: Entity, controller: FirstPersonController) {
        self.controllers.add(entity, controller);
    }

    pub fn controller(&self, entity: Entity) -> Option<&FirstPersonController> {
        self.controllers.get(entity)
    }

    pub fn controller_mut(&mut self, entity: Entity) -> Option<&mut FirstPersonController> {
        self.controllers.get_mut(entity)
    }

    pub fn has_controller(&self, entity: Entity) -> bool {
        self.controllers.has(entity)
    }

    pub fn remove_controller(&mut self, entity: Entity) -> Option<FirstPersonController> {
        self.controllers.remove(entity)
    }

    // Billboards

    pub fn add_billboard(&mut self, entity: Entity) {
        self.billboards.add(entity, Billboard);
    }

    pub fn has_billboard(&self, entity: Entity) -> bool {
        self.billboards.has(entity)
    }

    pub fn remove_billboard(&mut self, entity: Entity) {
        self.billboards.remove(entity);
    }

    // Ambient lights

    pub fn add_ambient_light(&mut self, entity: Entity, light: AmbientLight) {
        self.ambient_lights.add(entity, light);
    }

    pub fn ambient_light(&self, entity: Entity) -> Option<&AmbientLight> {
        self.ambient_lights.get(entity)
    }

    pub fn ambient_light_mut(&mut self, entity: Entity) -> Option<&mut AmbientLight> {
        self.ambient_lights.get_mut(entity)
    }

    pub fn has_ambient_light(&self, entity: Entity) -> bool {
        self.ambient_lights.has(entity)
    }

    pub fn remove_ambient_light(&mut self, entity: Entity) -> Option<AmbientLight> {
        self.ambient_lights.remove(entity)
    }

    // Point lights

    pub fn add_point_light(&mut self, entity: Entity, light: PointLight) {
        self.point_lights.add(entity, light);
    }

    pub fn point_light(&self, entity: Entity) -> Option<&PointLight> {
        self.point_lights.get(entity)
    }

    pub fn point_light_mut(&mut self, entity: Entity) -> Option<&mut PointLight> {
        self.point_lights.get_mut(entity)
    }

    pub fn has_point_light(&self, entity: Entity) -> bool {
        self.point_lights.has(entity)
    }

    pub fn remove_point_light(&mut self, entity: Entity) -> Option<PointLight> {
        self.point_lights.remove(entity)
    }

    // Overlays

    /// Attach an overlay. Overwriting does not release the old
    /// component's handles; remove it first if the entity has one.
    pub fn add_overlay(&mut self, entity: Entity, overlay: Overlay) {
        self.overlays.add(entity, overlay);
    }

    pub fn overlay(&self, entity: Entity) -> Option<&Overlay> {
        self.overlays.get(entity)
    }

    pub fn overlay_mut(&mut self, entity: Entity) -> Option<&mut Overlay> {
        self.overlays.get_mut(entity)
    }

    pub fn has_overlay(&self, entity: Entity) -> bool {
        self.overlays.has(entity)
    }

    /// Detach and release the entity's overlay, if it has one, including
    /// any transient textures still queued.
    pub fn remove_overlay(&mut self, entity: Entity, resources: &mut impl ResourceHost) {
        if let Some(overlay) = self.overlays.remove(entity) {
            overlay.release(resources);
        }
    }
}
