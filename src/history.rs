//! Linear undo/redo log of cell-set snapshots.
//!
//! Unlike a command stack, every entry is a full copy of the cell set. The
//! cursor always points at the snapshot that matches the live grid.

use std::collections::HashSet;

use crate::model::Cell;

pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Immutable copy of a grid state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    cells: HashSet<Cell>,
}

impl Snapshot {
    pub fn new(cells: HashSet<Cell>) -> Self {
        Self { cells }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn cells(&self) -> &HashSet<Cell> {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl From<&crate::grid::CellGrid> for Snapshot {
    fn from(grid: &crate::grid::CellGrid) -> Self {
        Self::new(grid.cells().clone())
    }
}

#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Snapshot>,
    cursor: usize,
    limit: usize,
}

impl History {
    /// Create a history holding only `initial`, capped at `limit` entries.
    pub fn new(limit: usize, initial: Snapshot) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
            limit: limit.max(1),
        }
    }

    /// Record a new state, discarding anything that could have been redone.
    pub fn push(&mut self, snapshot: Snapshot) {
        let discarded = self.entries.len() - (self.cursor + 1);
        if discarded > 0 {
            tracing::debug!(discarded, "truncating redo branch");
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push(snapshot);
        if self.entries.len() > self.limit {
            let overflow = self.entries.len() - self.limit;
            self.entries.drain(..overflow);
        }
        self.cursor = self.entries.len() - 1;
        tracing::trace!(len = self.entries.len(), cursor = self.cursor, "history push");
    }

    /// Step back one snapshot; `None` when already at the oldest entry.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor)
    }

    /// Step forward one snapshot; `None` when already at the newest entry.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn current(&self) -> &Snapshot {
        &self.entries[self.cursor]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT, Snapshot::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(cells: &[(i32, i32)]) -> Snapshot {
        Snapshot::new(cells.iter().map(|&c| Cell::from(c)).collect())
    }

    #[test]
    fn undo_redo_walks_cursor() {
        let mut h = History::default();
        h.push(snap(&[(0, 0)]));
        h.push(snap(&[(0, 0), (1, 0)]));
        assert_eq!(h.undo(), Some(&snap(&[(0, 0)])));
        assert_eq!(h.undo(), Some(&Snapshot::empty()));
        assert_eq!(h.undo(), None);
        assert_eq!(h.redo(), Some(&snap(&[(0, 0)])));
        assert_eq!(h.redo(), Some(&snap(&[(0, 0), (1, 0)])));
        assert_eq!(h.redo(), None);
    }

    #[test]
    fn push_after_undo_truncates_branch() {
        let mut h = History::default();
        h.push(snap(&[(0, 0)]));
        h.push(snap(&[(0, 0), (1, 0)]));
        h.undo();
        h.push(snap(&[(5, 5)]));
        assert_eq!(h.len(), 3);
        assert!(!h.can_redo());
        assert_eq!(h.current(), &snap(&[(5, 5)]));
    }

    #[test]
    fn cap_drops_oldest_and_rebases_cursor() {
        let mut h = History::new(5, Snapshot::empty());
        for i in 0..8 {
            h.push(snap(&[(i, 0)]));
        }
        assert_eq!(h.len(), 5);
        assert_eq!(h.cursor(), 4);
        let mut steps = 0;
        while h.undo().is_some() {
            steps += 1;
        }
        assert_eq!(steps, 4);
        assert_eq!(h.current(), &snap(&[(3, 0)]));
    }
}
