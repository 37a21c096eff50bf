//! Entity identifiers and allocation.
//!
//! Entities are plain `u32` handles issued monotonically. Identifiers are
//! never reused within a world's lifetime, so a stale handle held across a
//! despawn can never alias a newer entity. Component pools index their
//! sparse arrays directly with the identifier value.

use std::fmt;

/// Handle to an entity in a [`World`](crate::ecs::World).
///
/// An `Entity` is nothing more than its numeric identifier. It carries no
/// generation bits; uniqueness comes from the allocator never reissuing an
/// id. Copying the handle is free and holding one does not keep any
/// component alive.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity(u32);

impl Entity {
    /// Builds an entity handle from a raw identifier.
    ///
    /// Normally handles come from [`World::spawn`](crate::ecs::World::spawn);
    /// this is for tests and for iterating the issued id range.
    pub const fn from_raw(id: u32) -> Self {
        Self(id)
    }

    /// Raw numeric identifier.
    pub const fn id(self) -> u32 {
        self.0
    }

    /// Identifier widened for indexing sparse arrays.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic entity id source.
///
/// `allocate` hands out `0, 1, 2, ..` in order. There is no free list;
/// despawned ids stay retired. [`issued`](Self::issued) reports the
/// exclusive upper bound of everything handed out so far, which is the
/// range world teardown sweeps.
#[derive(Debug, Default)]
pub struct EntityAllocator {
    next: u32,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next entity id.
    pub fn allocate(&mut self) -> Entity {
        let id = self.next;
        self.next += 1;
        Entity(id)
    }

    /// One past the highest id ever issued.
    pub fn issued(&self) -> u32 {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_monotonic() {
        let mut alloc = EntityAllocator::new();
        let a = alloc.allocate();
        let b = alloc.allocate();
        let c = alloc.allocate();
        assert_eq!(a.id(), 0);
        assert_eq!(b.id(), 1);
        assert_eq!(c.id(), 2);
        assert_eq!(alloc.issued(), 3);
    }

    #[test]
    fn test_handles_compare_by_id() {
        assert_eq!(Entity::from_raw(7), Entity::from_raw(7));
        assert_ne!(Entity::from_raw(7), Entity::from_raw(8));
        assert!(Entity::from_raw(1) < Entity::from_raw(2));
    }
}
