use crate::render::surface::Raster;
use std::collections::VecDeque;

/// Maximum number of undo checkpoints kept.
pub const MAX_SNAPSHOTS: usize = 50;

/// Result of an undo request.
#[derive(Debug, PartialEq, Eq)]
pub enum UndoOutcome<'a, T = Raster> {
    /// The newest checkpoint was dropped; restore the state to this one.
    Restored(&'a T),
    /// Only the initial checkpoint remains.
    NothingToUndo,
}

/// Bounded linear stack of checkpoints, full-surface snapshots by default.
///
/// Never shrinks below one entry: the initial state is always retained.
#[derive(Clone, Debug)]
pub struct SnapshotHistory<T = Raster> {
    stack: VecDeque<T>,
    capacity: usize,
}

impl<T> SnapshotHistory<T> {
    pub fn new(initial: T) -> Self {
        Self::with_capacity(initial, MAX_SNAPSHOTS)
    }

    /// `capacity` is clamped to at least 1.
    pub fn with_capacity(initial: T, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut stack = VecDeque::with_capacity(capacity.min(MAX_SNAPSHOTS) + 1);
        stack.push_back(initial);
        Self { stack, capacity }
    }

    /// Append a checkpoint, evicting the oldest beyond capacity.
    pub fn push(&mut self, snapshot: T) {
        self.stack.push_back(snapshot);
        while self.stack.len() > self.capacity {
            self.stack.pop_front();
        }
    }

    pub fn undo(&mut self) -> UndoOutcome<'_, T> {
        if self.stack.len() <= 1 {
            return UndoOutcome::NothingToUndo;
        }
        self.stack.pop_back();
        match self.stack.back() {
            Some(top) => UndoOutcome::Restored(top),
            None => UndoOutcome::NothingToUndo,
        }
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.stack.len() > 1
    }

    pub fn top(&self) -> Option<&T> {
        self.stack.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.stack.iter()
    }
}

#[cfg(test)]
#[path = "../tests/unit/history.rs"]
mod tests;
