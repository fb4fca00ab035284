//! Tube tracing for the `ref` connection type.
//!
//! Filled cells form an undirected graph over 4-neighbor adjacency. The tracer
//! decomposes that graph into continuous paths through cell centers such that
//! every edge is covered by exactly one path:
//!
//! 1. Every degree-1 cell (an open end) seeds a walk, in ascending `(x, y)` order.
//! 2. A walk repeatedly follows the first unvisited edge of the current cell,
//!    trying neighbors in the fixed order +x, -x, +y, -y, and stops when the
//!    current cell has no unvisited edge left.
//! 3. Edges still unvisited afterwards belong to closed loops; every cell is
//!    rescanned in ascending order and walks start from any cell that still
//!    has an unvisited edge. Such a walk ends where it started.
//!
//! Isolated cells have no edges and produce no path.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::connections::EdgeKey;
use crate::grid::CellGrid;
use crate::model::Cell;

/// Adjacency lists of the filled-cell graph.
///
/// Cells are stored in ascending `(x, y)` order and each neighbor list follows
/// the +x, -x, +y, -y scan order.
#[derive(Debug, Clone, Default)]
pub struct CellGraph {
    adjacency: IndexMap<Cell, Vec<Cell>>,
}

impl CellGraph {
    pub fn from_grid(grid: &CellGrid) -> Self {
        let adjacency = grid
            .sorted_cells()
            .into_iter()
            .map(|cell| {
                let neighbors = cell
                    .orthogonal_neighbors()
                    .into_iter()
                    .filter(|n| grid.has(*n))
                    .collect();
                (cell, neighbors)
            })
            .collect();
        Self { adjacency }
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.adjacency.keys()
    }

    pub fn neighbors(&self, cell: Cell) -> &[Cell] {
        self.adjacency.get(&cell).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn degree(&self, cell: Cell) -> usize {
        self.neighbors(cell).len()
    }

    /// Cells with exactly one neighbor, ascending.
    pub fn endpoints(&self) -> Vec<Cell> {
        self.adjacency
            .iter()
            .filter(|(_, n)| n.len() == 1)
            .map(|(c, _)| *c)
            .collect()
    }

    /// Every undirected edge once.
    pub fn edges(&self) -> HashSet<EdgeKey> {
        self.adjacency
            .iter()
            .flat_map(|(c, ns)| ns.iter().map(move |n| EdgeKey::new(*c, *n)))
            .collect()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum::<usize>() / 2
    }
}

/// One continuous stroke through cell centers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracedPath {
    cells: Vec<Cell>,
}

impl TracedPath {
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn first(&self) -> Cell {
        self.cells[0]
    }

    pub fn last(&self) -> Cell {
        self.cells[self.cells.len() - 1]
    }

    /// A path whose walk returned to its starting cell.
    pub fn is_closed(&self) -> bool {
        self.cells.len() > 2 && self.first() == self.last()
    }

    /// Number of edges covered.
    pub fn edge_len(&self) -> usize {
        self.cells.len() - 1
    }

    pub fn edges(&self) -> impl Iterator<Item = EdgeKey> + '_ {
        self.cells.windows(2).map(|w| EdgeKey::new(w[0], w[1]))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PathTracer;

impl PathTracer {
    pub fn trace(grid: &CellGrid) -> Vec<TracedPath> {
        Self::trace_graph(&CellGraph::from_grid(grid))
    }

    pub fn trace_graph(graph: &CellGraph) -> Vec<TracedPath> {
        let mut visited: HashSet<EdgeKey> = HashSet::with_capacity(graph.edge_count());
        let mut paths = Vec::new();

        for start in graph.endpoints() {
            if let Some(path) = walk(graph, start, &mut visited) {
                paths.push(path);
            }
        }
        let open = paths.len();

        for &start in graph.cells() {
            while let Some(path) = walk(graph, start, &mut visited) {
                paths.push(path);
            }
        }

        tracing::trace!(
            open,
            closed = paths.len() - open,
            edges = visited.len(),
            "traced tubes"
        );
        paths
    }
}

/// Follow unvisited edges from `start` until stuck. `None` if `start` had none.
fn walk(graph: &CellGraph, start: Cell, visited: &mut HashSet<EdgeKey>) -> Option<TracedPath> {
    let mut cells = vec![start];
    let mut cur = start;
    loop {
        let next = graph
            .neighbors(cur)
            .iter()
            .copied()
            .find(|n| !visited.contains(&EdgeKey::new(cur, *n)));
        match next {
            Some(n) => {
                visited.insert(EdgeKey::new(cur, n));
                cells.push(n);
                cur = n;
            }
            None => break,
        }
    }
    (cells.len() > 1).then_some(TracedPath { cells })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(cells: &[(i32, i32)]) -> CellGrid {
        let mut g = CellGrid::new(32);
        for &c in cells {
            g.insert(Cell::from(c));
        }
        g
    }

    #[test]
    fn isolated_cell_has_no_path() {
        assert!(PathTracer::trace(&grid(&[(3, 3)])).is_empty());
        assert!(PathTracer::trace(&grid(&[(0, 0), (2, 2)])).is_empty());
    }

    #[test]
    fn corner_is_one_open_path() {
        let g = grid(&[(0, 0), (1, 0), (0, 1)]);
        let graph = CellGraph::from_grid(&g);
        assert_eq!(graph.endpoints(), vec![Cell::new(0, 1), Cell::new(1, 0)]);
        assert_eq!(graph.degree(Cell::new(0, 0)), 2);

        let paths = PathTracer::trace(&g);
        assert_eq!(paths.len(), 1);
        assert_eq!(
            paths[0].cells(),
            &[Cell::new(0, 1), Cell::new(0, 0), Cell::new(1, 0)]
        );
        assert!(!paths[0].is_closed());
    }

    #[test]
    fn ring_is_one_closed_path() {
        let g = grid(&[
            (0, 0),
            (1, 0),
            (2, 0),
            (2, 1),
            (2, 2),
            (1, 2),
            (0, 2),
            (0, 1),
        ]);
        assert!(CellGraph::from_grid(&g).endpoints().is_empty());
        let paths = PathTracer::trace(&g);
        assert_eq!(paths.len(), 1);
        assert!(paths[0].is_closed());
        assert_eq!(paths[0].edge_len(), 8);
    }

    #[test]
    fn junction_follows_scan_order() {
        // T shape: stem from (1,2) up to the bar (0,0)-(2,0).
        let g = grid(&[(0, 0), (1, 0), (2, 0), (1, 1), (1, 2)]);
        let paths = PathTracer::trace(&g);
        // Endpoints ascending: (0,0), (1,2), (2,0).
        // From (0,0): -> (1,0); at the junction +x comes first -> (2,0).
        assert_eq!(
            paths[0].cells(),
            &[Cell::new(0, 0), Cell::new(1, 0), Cell::new(2, 0)]
        );
        assert_eq!(
            paths[1].cells(),
            &[Cell::new(1, 2), Cell::new(1, 1), Cell::new(1, 0)]
        );
        assert_eq!(paths.len(), 2);
    }

    #[test]
    fn block_covers_each_edge_once() {
        let cells: Vec<(i32, i32)> = (0..4).flat_map(|x| (0..3).map(move |y| (x, y))).collect();
        let g = grid(&cells);
        let graph = CellGraph::from_grid(&g);
        let paths = PathTracer::trace_graph(&graph);
        let mut seen = HashSet::new();
        for p in &paths {
            for e in p.edges() {
                assert!(seen.insert(e), "edge {e} traced twice");
            }
        }
        assert_eq!(seen, graph.edges());
    }
}
