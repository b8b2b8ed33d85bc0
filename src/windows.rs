//! # Sliding windows
//!
//! A lazy, restartable sequence of fixed-size, fixed-step sub-collections
//! over a backing collection. The iterator borrows the backing storage —
//! nothing is copied until a window is materialized.
//!
//! A cursor `c` addresses the slice `[c*step, c*step + size)`; a window
//! exists while `c*step + size <= len`. With `size > len` there are no
//! windows at all, and `step > size` legitimately skips elements.

use crate::collection::Collection;

/// Lazy sliding-window cursor over a collection.
///
/// Built by [`Collection::sliding`] /
/// [`Collection::sliding_step`], which validate `size >= 1` and
/// `step >= 1`.
#[derive(Debug)]
pub struct Windows<'a> {
    backing: &'a Collection,
    size: usize,
    step: usize,
    cursor: usize,
}

impl<'a> Windows<'a> {
    pub(crate) fn new(backing: &'a Collection, size: usize, step: usize) -> Self {
        Self {
            backing,
            size,
            step,
            cursor: 0,
        }
    }

    /// Whether the cursor currently addresses a full window
    pub fn valid(&self) -> bool {
        self.cursor * self.step + self.size <= self.backing.len()
    }

    /// The window under the cursor, re-indexed, or `None` past the end
    pub fn current(&self) -> Option<Collection> {
        if !self.valid() {
            return None;
        }

        let start = self.cursor * self.step;
        Some(
            self.backing
                .iter()
                .skip(start)
                .take(self.size)
                .map(|(_, v)| v.clone())
                .collect(),
        )
    }

    /// Moves the cursor one window forward
    pub fn advance(&mut self) {
        self.cursor += 1;
    }

    /// Resets the cursor to the first window
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl Iterator for Windows<'_> {
    type Item = Collection;

    fn next(&mut self) -> Option<Collection> {
        let window = self.current()?;
        self.advance();
        Some(window)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.backing.len();
        let total = if len >= self.size {
            (len - self.size) / self.step + 1
        } else {
            0
        };
        let remaining = total.saturating_sub(self.cursor);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Windows<'_> {}
