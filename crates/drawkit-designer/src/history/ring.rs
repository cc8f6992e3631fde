use std::collections::VecDeque;

/// Bounded history with a cursor.
///
/// Entries are kept oldest first. `current` points at the visible entry;
/// everything after it is the redo branch. Pushing discards the redo branch
/// and, once the ring is full, evicts the oldest entry.
#[derive(Debug, Clone)]
pub struct HistoryRing<T> {
    entries: VecDeque<T>,
    current: usize,
    capacity: usize,
}

impl<T> HistoryRing<T> {
    /// Creates a ring holding `initial` as its only entry.
    ///
    /// # Panics
    ///
    /// Panics if `capacity < 2`; a ring needs room for the current entry and
    /// at least one step to undo.
    pub fn new(capacity: usize, initial: T) -> Self {
        assert!(capacity >= 2, "history capacity must be at least 2, got {capacity}");
        let mut entries = VecDeque::with_capacity(capacity);
        entries.push_back(initial);
        Self {
            entries,
            current: 0,
            capacity,
        }
    }

    /// Appends `entry` after the cursor and makes it current. Returns the
    /// evicted oldest entry when the ring was full.
    pub fn push(&mut self, entry: T) -> Option<T> {
        let pruned = self.entries.len() - (self.current + 1);
        if pruned > 0 {
            tracing::debug!("Discarding {} redo step(s)", pruned);
            self.entries.truncate(self.current + 1);
        }
        let evicted = if self.entries.len() == self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(entry);
        self.current = self.entries.len() - 1;
        evicted
    }

    /// Moves the cursor one entry back. Returns false at the oldest entry.
    pub fn step_back(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Moves the cursor one entry forward. Returns false at the newest entry.
    pub fn step_forward(&mut self) -> bool {
        if self.is_at_tip() {
            return false;
        }
        self.current += 1;
        true
    }

    pub fn current(&self) -> &T {
        &self.entries[self.current]
    }

    pub fn current_mut(&mut self) -> &mut T {
        &mut self.entries[self.current]
    }

    /// Entry just before the cursor.
    pub fn previous(&self) -> Option<&T> {
        self.current.checked_sub(1).map(|i| &self.entries[i])
    }

    pub fn oldest(&self) -> &T {
        &self.entries[0]
    }

    pub fn newest(&self) -> &T {
        &self.entries[self.entries.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Cursor position counted from the oldest entry.
    pub fn position(&self) -> usize {
        self.current
    }

    /// True when there is nothing to redo.
    pub fn is_at_tip(&self) -> bool {
        self.current + 1 == self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }
}
