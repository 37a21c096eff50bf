//! Sparse-set component storage.
//!
//! A [`Pool`] keeps one component kind for all entities that carry it.
//! Live values sit contiguous in a dense array so per-frame system walks
//! are cache friendly, while a sparse array maps entity ids to dense slots
//! for O(1) membership tests, lookups, insertion and removal.
//!
//! The layout is three parallel structures:
//!
//! * `values`   - dense component payloads, active elements in `0..len`
//! * `entities` - dense slot -> owning entity id
//! * `sparse`   - entity id -> dense slot, [`ABSENT`] where unmapped
//!
//! Removal swaps the last dense element into the vacated slot, so dense
//! iteration order is insertion order only until the first removal.

use crate::ecs::Entity;

/// Sparse-array sentinel marking an entity with no component in the pool.
const ABSENT: u32 = u32::MAX;

/// First sparse-array allocation, in slots.
const SPARSE_SEED: usize = 1024;

/// First dense-array allocation, in elements.
const DENSE_SEED: usize = 64;

/// Dense storage for a single component kind, indexed by [`Entity`].
pub struct Pool<T> {
    values: Vec<T>,
    entities: Vec<Entity>,
    sparse: Vec<u32>,
}

impl<T> Pool<T> {
    pub const fn new() -> Self {
        Self {
            values: Vec::new(),
            entities: Vec::new(),
            sparse: Vec::new(),
        }
    }

    /// Number of entities currently holding this component.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether `entity` has a component in this pool.
    pub fn has(&self, entity: Entity) -> bool {
        self.sparse
            .get(entity.index())
            .is_some_and(|&slot| slot != ABSENT)
    }

    /// Inserts `value` for `entity`, overwriting in place if the entity
    /// already has one.
    ///
    /// An overwrite touches only the payload: the dense slot, the entity
    /// mapping and the pool length all stay as they were.
    pub fn add(&mut self, entity: Entity, value: T) {
        let index = entity.index();
        if index >= self.sparse.len() {
            self.grow_sparse(index);
        }
        let slot = self.sparse[index];
        if slot != ABSENT {
            self.values[slot as usize] = value;
            return;
        }
        if self.values.len() == self.values.capacity() {
            let extra = self.values.len().max(DENSE_SEED);
            self.values.reserve_exact(extra);
            self.entities.reserve_exact(extra);
        }
        self.sparse[index] = self.values.len() as u32;
        self.entities.push(entity);
        self.values.push(value);
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        let slot = *self.sparse.get(entity.index())?;
        if slot == ABSENT {
            return None;
        }
        Some(&self.values[slot as usize])
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let slot = *self.sparse.get(entity.index())?;
        if slot == ABSENT {
            return None;
        }
        Some(&mut self.values[slot as usize])
    }

    /// Removes and returns `entity`'s component, or `None` if it has none.
    ///
    /// The last dense element is swapped into the vacated slot and its
    /// owner's sparse mapping is patched, so every other component keeps
    /// its address stable except that one.
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let index = entity.index();
        let slot = *self.sparse.get(index)?;
        if slot == ABSENT {
            return None;
        }
        let slot = slot as usize;
        let value = self.values.swap_remove(slot);
        self.entities.swap_remove(slot);
        if slot < self.entities.len() {
            let moved = self.entities[slot];
            self.sparse[moved.index()] = slot as u32;
        }
        self.sparse[index] = ABSENT;
        Some(value)
    }

    /// Iterates `(entity, component)` pairs in dense order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.entities.iter().copied().zip(self.values.iter())
    }

    /// Iterates `(entity, component)` pairs in dense order, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.entities.iter().copied().zip(self.values.iter_mut())
    }

    /// Owning entities in dense order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Component payloads in dense order, parallel to [`entities`](Self::entities).
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Grows the sparse array to cover `index`, filling new slots with the
    /// absent sentinel. Capacity doubles from [`SPARSE_SEED`], jumping
    /// straight to `index + 1` when doubling alone would not reach it.
    fn grow_sparse(&mut self, index: usize) {
        let mut cap = if self.sparse.is_empty() {
            SPARSE_SEED
        } else {
            self.sparse.len() * 2
        };
        if cap <= index {
            cap = index + 1;
        }
        self.sparse.resize(cap, ABSENT);
    }
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e(id: u32) -> Entity {
        Entity::from_raw(id)
    }

    #[test]
    fn test_add_then_lookup() {
        let mut pool = Pool::new();
        pool.add(e(3), 30i32);
        pool.add(e(7), 70);

        assert_eq!(pool.len(), 2);
        assert!(pool.has(e(3)));
        assert!(pool.has(e(7)));
        assert!(!pool.has(e(4)));
        assert_eq!(pool.get(e(3)), Some(&30));
        assert_eq!(pool.get(e(7)), Some(&70));
        assert_eq!(pool.get(e(4)), None);
    }

    #[test]
    fn test_add_overwrites_in_place() {
        let mut pool = Pool::new();
        pool.add(e(0), "first");
        pool.add(e(1), "second");
        pool.add(e(0), "replaced");

        assert_eq!(pool.len(), 2);
        assert_eq!(pool.get(e(0)), Some(&"replaced"));
        // The overwritten entity keeps its original dense slot.
        assert_eq!(pool.entities(), &[e(0), e(1)]);
    }

    #[test]
    fn test_get_mut_edits_payload() {
        let mut pool = Pool::new();
        pool.add(e(5), 1u64);
        *pool.get_mut(e(5)).unwrap() += 41;
        assert_eq!(pool.get(e(5)), Some(&42));
        assert!(pool.get_mut(e(6)).is_none());
    }

    #[test]
    fn test_swap_remove_patches_moved_entity() {
        let mut pool = Pool::new();
        pool.add(e(10), 'a');
        pool.add(e(11), 'b');
        pool.add(e(12), 'c');

        assert_eq!(pool.remove(e(11)), Some('b'));
        assert_eq!(pool.len(), 2);
        assert!(!pool.has(e(11)));
        // Last element moved into the vacated middle slot, still reachable.
        assert_eq!(pool.get(e(12)), Some(&'c'));
        assert_eq!(pool.get(e(10)), Some(&'a'));
        assert_eq!(pool.entities(), &[e(10), e(12)]);
        assert_eq!(pool.values(), &['a', 'c']);
    }

    #[test]
    fn test_remove_last_element() {
        let mut pool = Pool::new();
        pool.add(e(0), 1);
        pool.add(e(1), 2);

        assert_eq!(pool.remove(e(1)), Some(2));
        assert_eq!(pool.len(), 1);
        assert!(pool.has(e(0)));
        assert!(!pool.has(e(1)));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut pool: Pool<i32> = Pool::new();
        pool.add(e(1), 10);

        assert_eq!(pool.remove(e(2)), None);
        assert_eq!(pool.remove(e(50_000)), None);
        assert_eq!(pool.len(), 1);

        // Removing twice only succeeds once.
        assert_eq!(pool.remove(e(1)), Some(10));
        assert_eq!(pool.remove(e(1)), None);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_sparse_growth_leaves_gaps_absent() {
        let mut pool = Pool::new();
        // Far beyond the seeded sparse capacity, forcing the jump path.
        pool.add(e(100_000), 9u8);

        assert_eq!(pool.len(), 1);
        assert!(pool.has(e(100_000)));
        for probe in [0, 1, 1023, 1024, 99_999, 100_001] {
            assert!(!pool.has(e(probe)), "id {probe} should be absent");
        }
    }

    #[test]
    fn test_dense_iteration_order() {
        let mut pool = Pool::new();
        pool.add(e(2), 20);
        pool.add(e(0), 0);
        pool.add(e(9), 90);

        let seen: Vec<_> = pool.iter().map(|(en, v)| (en.id(), *v)).collect();
        assert_eq!(seen, vec![(2, 20), (0, 0), (9, 90)]);

        // Removing the head swaps the tail forward.
        pool.remove(e(2));
        let seen: Vec<_> = pool.iter().map(|(en, v)| (en.id(), *v)).collect();
        assert_eq!(seen, vec![(9, 90), (0, 0)]);
    }

    #[test]
    fn test_iter_mut_updates_all() {
        let mut pool = Pool::new();
        for id in 0..4 {
            pool.add(e(id), id as i32);
        }
        for (_, v) in pool.iter_mut() {
            *v *= 10;
        }
        let sum: i32 = pool.iter().map(|(_, v)| *v).sum();
        assert_eq!(sum, 60);
    }

    #[test]
    fn test_zero_sized_tag_components() {
        #[derive(PartialEq, Debug)]
        struct Tag;

        let mut pool = Pool::new();
        pool.add(e(4), Tag);
        pool.add(e(8), Tag);
        assert_eq!(pool.len(), 2);
        assert!(pool.has(e(4)));
        assert_eq!(pool.remove(e(4)), Some(Tag));
        assert!(!pool.has(e(4)));
        assert!(pool.has(e(8)));
    }

    #[test]
    fn test_interleaved_add_remove_stays_consistent() {
        let mut pool = Pool::new();
        for id in 0..64 {
            pool.add(e(id), id);
        }
        // Drop the evens, keep the odds.
        for id in (0..64).step_by(2) {
            assert!(pool.remove(e(id)).is_some());
        }
        assert_eq!(pool.len(), 32);
        for id in 0..64 {
            assert_eq!(pool.has(e(id)), id % 2 == 1, "id {id}");
        }
        // Re-add a retired id's slot worth of fresh data.
        pool.add(e(2), 200);
        assert_eq!(pool.get(e(2)), Some(&200));
        assert_eq!(pool.len(), 33);
    }
}
