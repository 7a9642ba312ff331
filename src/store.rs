//! Append-only entity storage.
//!
//! Records are never removed: callers flip the record's liveness flag
//! instead, so indices handed out by `append` stay valid for the whole
//! session and iteration order is always insertion order.

/// Capacity reserved on the first append.
pub const BASELINE_CAPACITY: usize = 256;

/// Anything with a liveness flag.
pub trait Live {
    fn is_alive(&self) -> bool;
}

#[derive(Clone, Debug)]
pub struct EntityStore<T> {
    items: Vec<T>,
    /// Logical capacity; the backing `Vec` always holds at least this much.
    capacity: usize,
}

impl<T> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EntityStore<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            capacity: 0,
        }
    }

    /// Push a record at the end and return its index.
    ///
    /// Doubles whenever the store is full, never growing to less than
    /// `BASELINE_CAPACITY`, even after a small `reserve_headroom`.
    /// Allocation failure aborts the process.
    pub fn append(&mut self, item: T) -> usize {
        if self.items.len() == self.capacity {
            self.grow_to((self.capacity * 2).max(BASELINE_CAPACITY));
        }
        self.items.push(item);
        self.items.len() - 1
    }

    /// Make sure at least `headroom` more records fit without growing.
    /// Never shrinks.
    pub fn reserve_headroom(&mut self, headroom: usize) {
        let wanted = self.items.len() + headroom;
        if wanted > self.capacity {
            self.grow_to(wanted);
        }
    }

    fn grow_to(&mut self, capacity: usize) {
        self.items.reserve_exact(capacity - self.items.len());
        self.capacity = capacity;
    }

    /// Number of initialised slots, live or not.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: Live> EntityStore<T> {
    /// Live records paired with their storage index.
    pub fn iter_live(&self) -> impl Iterator<Item = (usize, &T)> {
        self.items.iter().enumerate().filter(|(_, item)| item.is_alive())
    }

    pub fn live_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_alive()).count()
    }
}

impl<'a, T> IntoIterator for &'a EntityStore<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
