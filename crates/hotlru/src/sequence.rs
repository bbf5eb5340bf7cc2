//! Recency sequence: a doubly-linked list threaded through a `Vec` arena.
//!
//! Links are slot indices, not references, so an entry can be unlinked and
//! relinked in O(1) without shared mutable aliasing. Freed slots go on a
//! free list and are reused by the next push.

use crate::error::{Error, Result};

/// Entry in the recency list
struct Entry<K, V> {
    key: K,
    value: V,
    more_recent: Option<usize>,
    less_recent: Option<usize>,
}

/// Entries ordered from most- to least-recently used.
///
/// Handles returned by [`push_most_recent`](Self::push_most_recent) stay
/// valid until the entry is removed or popped; after that the slot may be
/// handed out again.
pub struct RecencySequence<K, V> {
    slots: Vec<Option<Entry<K, V>>>,
    most_recent: Option<usize>,
    least_recent: Option<usize>,
    free_list: Vec<usize>,
    len: usize,
}

impl<K, V> RecencySequence<K, V> {
    /// Create an empty sequence
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty sequence with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            most_recent: None,
            least_recent: None,
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Number of linked entries
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the sequence is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert a new entry at the most-recent end and return its handle
    pub fn push_most_recent(&mut self, key: K, value: V) -> usize {
        let idx = self.alloc_slot();
        self.slots[idx] = Some(Entry {
            key,
            value,
            more_recent: None,
            less_recent: None,
        });
        self.link_front(idx);
        self.len += 1;
        idx
    }

    /// Move an already-linked entry to the most-recent end
    pub fn promote(&mut self, idx: usize) {
        if self.most_recent == Some(idx) {
            return;
        }
        let linked = self.is_linked(idx);
        debug_assert!(linked, "promote on unlinked slot {}", idx);
        if !linked {
            return;
        }

        self.unlink(idx);
        self.link_front(idx);
    }

    /// Remove and return the least-recent entry
    pub fn pop_least_recent(&mut self) -> Result<(K, V)> {
        let idx = self.least_recent.ok_or(Error::EmptySequence)?;
        self.remove(idx).ok_or(Error::EmptySequence)
    }

    /// Remove an arbitrary entry by handle
    pub fn remove(&mut self, idx: usize) -> Option<(K, V)> {
        if !self.is_linked(idx) {
            return None;
        }

        self.unlink(idx);
        let entry = self.slots[idx].take()?;
        self.free_list.push(idx);
        self.len -= 1;
        Some((entry.key, entry.value))
    }

    /// Borrow the key and value behind a handle
    pub fn get(&self, idx: usize) -> Option<(&K, &V)> {
        self.slots
            .get(idx)
            .and_then(Option::as_ref)
            .map(|entry| (&entry.key, &entry.value))
    }

    /// Mutably borrow the value behind a handle
    pub fn get_mut(&mut self, idx: usize) -> Option<&mut V> {
        self.slots
            .get_mut(idx)
            .and_then(Option::as_mut)
            .map(|entry| &mut entry.value)
    }

    /// Least-recent entry, without removing it
    pub fn peek_least_recent(&self) -> Option<(&K, &V)> {
        self.least_recent.and_then(|idx| self.get(idx))
    }

    /// Most-recent entry
    pub fn peek_most_recent(&self) -> Option<(&K, &V)> {
        self.most_recent.and_then(|idx| self.get(idx))
    }

    /// Iterate from most- to least-recent
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            seq: self,
            next: self.most_recent,
            remaining: self.len,
        }
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
        self.most_recent = None;
        self.least_recent = None;
        self.len = 0;
    }

    fn is_linked(&self, idx: usize) -> bool {
        matches!(self.slots.get(idx), Some(Some(_)))
    }

    fn link_front(&mut self, idx: usize) {
        let old_front = self.most_recent;

        if let Some(entry) = &mut self.slots[idx] {
            entry.more_recent = None;
            entry.less_recent = old_front;
        }

        match old_front {
            Some(front_idx) => {
                if let Some(front) = &mut self.slots[front_idx] {
                    front.more_recent = Some(idx);
                }
            }
            None => {
                self.least_recent = Some(idx);
            }
        }

        self.most_recent = Some(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (more, less) = match &mut self.slots[idx] {
            Some(entry) => (entry.more_recent.take(), entry.less_recent.take()),
            None => return,
        };

        match more {
            Some(more_idx) => {
                if let Some(more_entry) = &mut self.slots[more_idx] {
                    more_entry.less_recent = less;
                }
            }
            None => {
                self.most_recent = less;
            }
        }

        match less {
            Some(less_idx) => {
                if let Some(less_entry) = &mut self.slots[less_idx] {
                    less_entry.more_recent = more;
                }
            }
            None => {
                self.least_recent = more;
            }
        }
    }

    fn alloc_slot(&mut self) -> usize {
        if let Some(idx) = self.free_list.pop() {
            idx
        } else {
            let idx = self.slots.len();
            self.slots.push(None);
            idx
        }
    }
}

impl<K, V> Default for RecencySequence<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a [`RecencySequence`], most-recent first
pub struct Iter<'a, K, V> {
    seq: &'a RecencySequence<K, V>,
    next: Option<usize>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let seq = self.seq;
        let idx = self.next?;
        let entry = seq.slots[idx].as_ref()?;
        self.next = entry.less_recent;
        self.remaining = self.remaining.saturating_sub(1);
        Some((&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
