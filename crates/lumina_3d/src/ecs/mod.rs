//! Entity-component storage.
//!
//! The ECS layer is deliberately small: a monotonic [`EntityAllocator`],
//! one sparse-set [`Pool`] per component kind and a [`World`] that owns
//! the fixed catalog of pools plus the active camera selection. Systems
//! are free functions over `World`; there is no scheduler.

mod entity;
mod pool;
mod world;

pub use entity::{Entity, EntityAllocator};
pub use pool::Pool;
pub use world::World;
