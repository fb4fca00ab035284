//! Sparse set of filled cells.
//!
//! The grid has no backing array: a cell is either present in the set or not.
//! All mutations are bounds-checked against `grid_size` and silently ignored
//! when the cell lies outside `[-grid_size, grid_size)` on either axis.

use std::collections::HashSet;

use crate::model::Cell;

/// Whether a gesture adds or removes cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PaintMode {
    Draw,
    Erase,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellGrid {
    cells: HashSet<Cell>,
    grid_size: i32,
}

impl CellGrid {
    pub fn new(grid_size: i32) -> Self {
        Self {
            cells: HashSet::new(),
            grid_size: grid_size.max(1),
        }
    }

    pub fn grid_size(&self) -> i32 {
        self.grid_size
    }

    /// Change the bounds. Cells already present are kept even if they now fall outside.
    pub fn set_grid_size(&mut self, grid_size: i32) {
        self.grid_size = grid_size.max(1);
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        let g = self.grid_size;
        (-g..g).contains(&cell.x) && (-g..g).contains(&cell.y)
    }

    pub fn has(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Returns true when the cell was newly added.
    pub fn insert(&mut self, cell: Cell) -> bool {
        if !self.in_bounds(cell) {
            tracing::trace!(%cell, grid_size = self.grid_size, "insert outside grid ignored");
            return false;
        }
        self.cells.insert(cell)
    }

    /// Returns true when the cell was present and got removed.
    pub fn remove(&mut self, cell: Cell) -> bool {
        if !self.in_bounds(cell) {
            tracing::trace!(%cell, grid_size = self.grid_size, "remove outside grid ignored");
            return false;
        }
        self.cells.remove(&cell)
    }

    /// The mode `toggle` would apply to `cell` when no mode is forced.
    pub fn inferred_mode(&self, cell: Cell) -> PaintMode {
        if self.has(cell) {
            PaintMode::Erase
        } else {
            PaintMode::Draw
        }
    }

    /// Apply `forced` (or the inferred mode) to `cell`.
    ///
    /// Returns the mode that was applied if the set actually changed.
    pub fn toggle(&mut self, cell: Cell, forced: Option<PaintMode>) -> Option<PaintMode> {
        let mode = forced.unwrap_or_else(|| self.inferred_mode(cell));
        let changed = match mode {
            PaintMode::Draw => self.insert(cell),
            PaintMode::Erase => self.remove(cell),
        };
        changed.then_some(mode)
    }

    /// Remove everything. Returns true if the grid was non-empty.
    pub fn clear(&mut self) -> bool {
        let had_cells = !self.cells.is_empty();
        self.cells.clear();
        had_cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter()
    }

    /// Cells in ascending `(x, y)` order, for deterministic traversal.
    pub fn sorted_cells(&self) -> Vec<Cell> {
        let mut cells: Vec<Cell> = self.cells.iter().copied().collect();
        cells.sort_unstable();
        cells
    }

    pub fn cells(&self) -> &HashSet<Cell> {
        &self.cells
    }

    /// Replace the cell set wholesale (used when restoring history).
    pub fn replace_cells(&mut self, cells: HashSet<Cell>) {
        self.cells = cells;
    }
}

impl Default for CellGrid {
    fn default() -> Self {
        Self::new(64)
    }
}

/// Cells crossed by the segment between the centers of `a` and `b`, both included.
///
/// Consecutive cells always share an edge, so a fast drag paints a 4-connected
/// chain. When the segment passes exactly through a cell corner the horizontal
/// step is taken first.
pub fn cells_between(a: Cell, b: Cell) -> Vec<Cell> {
    let nx = (b.x - a.x).abs() as i64;
    let ny = (b.y - a.y).abs() as i64;
    let sx = (b.x - a.x).signum();
    let sy = (b.y - a.y).signum();
    let mut cur = a;
    let mut out = Vec::with_capacity((nx + ny) as usize + 1);
    out.push(cur);
    let (mut ix, mut iy) = (0i64, 0i64);
    while ix < nx || iy < ny {
        // Compare where the next vertical and horizontal boundaries are crossed.
        if (1 + 2 * ix) * ny <= (1 + 2 * iy) * nx {
            cur.x += sx;
            ix += 1;
        } else {
            cur.y += sy;
            iy += 1;
        }
        out.push(cur);
    }
    out
}
