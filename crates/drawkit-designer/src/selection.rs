use std::collections::BTreeSet;

/// Selected shape indices.
///
/// `SelectionSet` is an ordered sparse set of positions in the current
/// snapshot's shape list. Indices only mean something against that one
/// snapshot, so the history clears the set on undo/redo and delete and
/// remaps it when shapes change position.
///
/// # Examples
///
/// ```
/// use drawkit_designer::selection::SelectionSet;
///
/// let mut selection = SelectionSet::new();
/// selection.insert(3);
/// selection.insert(1);
/// assert_eq!(selection.iter().collect::<Vec<_>>(), vec![1, 3]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    indices: BTreeSet<usize>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `index`; returns false if it was already selected.
    pub fn insert(&mut self, index: usize) -> bool {
        self.indices.insert(index)
    }

    pub fn remove(&mut self, index: usize) -> bool {
        self.indices.remove(&index)
    }

    /// Flips membership of `index`; returns the new state.
    pub fn toggle(&mut self, index: usize) -> bool {
        if self.indices.remove(&index) {
            false
        } else {
            self.indices.insert(index);
            true
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }

    /// Indices in ascending order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Largest selected index.
    pub fn last(&self) -> Option<usize> {
        self.indices.last().copied()
    }

    pub fn replace_with(&mut self, indices: impl IntoIterator<Item = usize>) {
        self.indices = indices.into_iter().collect();
    }

    /// Remaps indices after the element at `from` moved to `to`, with the
    /// elements in between sliding one place to close the gap.
    pub fn move_index(&mut self, from: usize, to: usize) {
        if from == to {
            return;
        }
        self.indices = self
            .indices
            .iter()
            .map(|&i| {
                if i == from {
                    to
                } else if from < to && i > from && i <= to {
                    i - 1
                } else if to < from && i >= to && i < from {
                    i + 1
                } else {
                    i
                }
            })
            .collect();
    }

    /// Remaps indices after an element was inserted at `start`.
    pub fn shift_from(&mut self, start: usize) {
        self.indices = self
            .indices
            .iter()
            .map(|&i| if i >= start { i + 1 } else { i })
            .collect();
    }
}

impl FromIterator<usize> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            indices: iter.into_iter().collect(),
        }
    }
}
