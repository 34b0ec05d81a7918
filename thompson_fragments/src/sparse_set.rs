use core::mem;

use crate::nfa::StateId;

/// A set of state IDs with constant time insertion, membership and clearing.
///
/// The set's capacity is fixed when it is created, and every inserted ID must
/// be less than it. Insertion order is preserved by iteration.
#[derive(Clone, Debug)]
pub(crate) struct SparseSet {
    len: usize,
    dense: Vec<StateId>,
    sparse: Vec<usize>,
}

impl SparseSet {
    pub(crate) fn new(capacity: usize) -> SparseSet {
        SparseSet { len: 0, dense: vec![0; capacity], sparse: vec![0; capacity] }
    }

    /// Grow this set so that it can hold IDs below `capacity`. The set is
    /// cleared.
    pub(crate) fn resize(&mut self, capacity: usize) {
        self.clear();
        self.dense.resize(capacity, 0);
        self.sparse.resize(capacity, 0);
    }

    pub(crate) fn capacity(&self) -> usize {
        self.dense.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert `id`, returning false if it was already present.
    ///
    /// # Panics
    ///
    /// This panics when `id` is not below the set's capacity.
    pub(crate) fn insert(&mut self, id: StateId) -> bool {
        if self.contains(id) {
            return false;
        }
        let i = self.len;
        assert!(
            i < self.capacity(),
            "{:?} exceeds capacity of {:?} when inserting {:?}",
            i,
            self.capacity(),
            id,
        );
        self.dense[i] = id;
        self.sparse[id] = i;
        self.len += 1;
        true
    }

    pub(crate) fn contains(&self, id: StateId) -> bool {
        let i = self.sparse[id];
        i < self.len && self.dense[i] == id
    }

    pub(crate) fn clear(&mut self) {
        self.len = 0;
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = StateId> + '_ {
        self.dense[..self.len].iter().copied()
    }

    pub(crate) fn memory_usage(&self) -> usize {
        self.dense.len() * mem::size_of::<StateId>()
            + self.sparse.len() * mem::size_of::<usize>()
    }
}
