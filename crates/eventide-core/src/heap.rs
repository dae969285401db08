//! Array-backed binary min-heap with removal by handle.
//!
//! Every pushed item gets a [`Handle`] that stays valid until the item is
//! popped or removed. Nodes keep the handles of their pending events so a
//! later, better-informed event can cancel an earlier one in O(log n).
//!
//! Items are ordered by [`Prioritized::priority`]; items that compare equal
//! come out in insertion order.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

/// Ordering used by the heap. `Less` means "comes out first".
pub trait Prioritized {
    /// Compare two items.
    fn priority(&self, other: &Self) -> Ordering;
}

/// Identity of an item in a [`Heap`].
///
/// Handles are never reused by the heap that issued them, including across
/// [`Heap::clear`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle(u64);

impl Handle {
    /// Raw sequence number.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct Entry<T> {
    handle: Handle,
    item: T,
}

/// Binary min-heap.
#[derive(Debug, Clone)]
pub struct Heap<T> {
    entries: Vec<Entry<T>>,
    positions: HashMap<Handle, usize>,
    next_handle: u64,
}

impl<T> Default for Heap<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            positions: HashMap::new(),
            next_handle: 0,
        }
    }
}

impl<T: Prioritized> Heap<T> {
    /// Create an empty heap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty heap with room for `capacity` items.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
            next_handle: 0,
        }
    }

    /// Add an item, returning its handle.
    pub fn push(&mut self, item: T) -> Handle {
        let handle = Handle(self.next_handle);
        self.next_handle += 1;

        let pos = self.entries.len();
        self.entries.push(Entry { handle, item });
        self.positions.insert(handle, pos);
        self.sift_up(pos);
        handle
    }

    /// Remove and return the first item.
    pub fn pop(&mut self) -> Option<(Handle, T)> {
        if self.entries.is_empty() {
            return None;
        }
        let last = self.entries.len() - 1;
        self.swap(0, last);
        let entry = self.entries.pop()?;
        self.positions.remove(&entry.handle);
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Some((entry.handle, entry.item))
    }

    /// The first item, without removing it.
    pub fn peek(&self) -> Option<(Handle, &T)> {
        self.entries.first().map(|e| (e.handle, &e.item))
    }

    /// Look up an item that is still in the heap.
    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.positions
            .get(&handle)
            .map(|&pos| &self.entries[pos].item)
    }

    /// Remove an arbitrary item.
    ///
    /// Returns `None` if the item was already popped or removed.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        let pos = self.positions.remove(&handle)?;
        let last = self.entries.len() - 1;
        if pos == last {
            return self.entries.pop().map(|e| e.item);
        }

        // Move the last entry into the hole, then let it find its place.
        self.entries.swap(pos, last);
        let entry = self.entries.pop()?;
        self.positions.insert(self.entries[pos].handle, pos);
        if pos > 0 && self.less(pos, (pos - 1) / 2) {
            self.sift_up(pos);
        } else {
            self.sift_down(pos);
        }
        Some(entry.item)
    }

    /// Whether the item is still in the heap.
    pub fn contains(&self, handle: Handle) -> bool {
        self.positions.contains_key(&handle)
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the heap has no items.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every item.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.positions.clear();
    }

    /// Iterate over items in heap-array order (not priority order).
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> {
        self.entries.iter().map(|e| (e.handle, &e.item))
    }

    fn less(&self, i: usize, j: usize) -> bool {
        let (a, b) = (&self.entries[i], &self.entries[j]);
        match a.item.priority(&b.item) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => a.handle < b.handle,
        }
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.entries.swap(i, j);
        self.positions.insert(self.entries[i].handle, i);
        self.positions.insert(self.entries[j].handle, j);
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if !self.less(pos, parent) {
                break;
            }
            self.swap(pos, parent);
            pos = parent;
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * pos + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len && self.less(right, left) {
                right
            } else {
                left
            };
            if !self.less(child, pos) {
                break;
            }
            self.swap(pos, child);
            pos = child;
        }
    }
}
