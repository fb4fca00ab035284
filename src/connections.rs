//! Neighbor-link enumeration for every connection type except `ref`.
//!
//! For each filled cell we look at a fixed offset pattern, keep each present
//! neighbor with probability `density`, and emit the link once per undirected
//! pair. The keep draw is seeded from the pair itself, so re-rendering an
//! unchanged drawing keeps exactly the same links.

use std::collections::HashSet;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::grid::CellGrid;
use crate::model::{Cell, ConnectionType, DEFAULT_WEB_RADIUS};

/// Order-independent identifier of an undirected cell pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey(pub Cell, pub Cell);

impl EdgeKey {
    pub fn new(a: Cell, b: Cell) -> Self {
        if a <= b { EdgeKey(a, b) } else { EdgeKey(b, a) }
    }

    fn seed(&self, salt: u64) -> u64 {
        // splitmix-style mixing of the four coordinates
        let mut h = salt ^ 0x9e37_79b9_7f4a_7c15;
        for v in [self.0.x, self.0.y, self.1.x, self.1.y] {
            h ^= v as u32 as u64;
            h = h.wrapping_mul(0xbf58_476d_1ce4_e5b9);
            h ^= h >> 31;
        }
        h
    }
}

impl std::fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.0, self.1)
    }
}

const ORTHOGONAL_OFFSETS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

const ORGANIC_OFFSETS: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

const WEB_OFFSETS: [(i32, i32); 16] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
    (2, 0),
    (-2, 0),
    (0, 2),
    (0, -2),
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
];

const SIMPLE_OFFSETS: [(i32, i32); 4] = [(1, 0), (0, 1), (2, 0), (0, 2)];

/// Largest perpendicular displacement of an organic curve, in cells.
pub const MAX_ORGANIC_BEND: f32 = 0.15;
/// Web links are stroked at this fraction of the regular width.
pub const WEB_WIDTH_SCALE: f32 = 0.5;

/// Candidate neighbor offsets for a connection type. Empty for `off` and `ref`.
pub fn neighbor_offsets(connection_type: ConnectionType) -> &'static [(i32, i32)] {
    match connection_type {
        ConnectionType::Off | ConnectionType::Ref => &[],
        ConnectionType::Orthogonal => &ORTHOGONAL_OFFSETS,
        ConnectionType::Organic => &ORGANIC_OFFSETS,
        ConnectionType::Web => &WEB_OFFSETS,
        ConnectionType::Simple => &SIMPLE_OFFSETS,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConnectionKind {
    Straight,
    /// Quadratic curve; control point is the midpoint pushed `bend` cells along the normal.
    Curved { bend: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub from: Cell,
    pub to: Cell,
    pub kind: ConnectionKind,
    /// Multiplier on the style's stroke width.
    pub width_scale: f32,
}

impl Connection {
    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(self.from, self.to)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ConnectionGraphBuilder {
    pub connection_type: ConnectionType,
    pub density: f32,
    pub seed: u64,
    /// Longest web link, in cells.
    pub web_radius: f32,
}

impl ConnectionGraphBuilder {
    pub fn new(connection_type: ConnectionType, density: f32, seed: u64) -> Self {
        Self {
            connection_type,
            density,
            seed,
            web_radius: DEFAULT_WEB_RADIUS,
        }
    }

    pub fn with_web_radius(mut self, radius: f32) -> Self {
        self.web_radius = radius;
        self
    }

    /// Enumerate links between filled cells. Each undirected pair appears at most once,
    /// grouped by the first cell (ascending `(x, y)`) that reaches it.
    pub fn build(&self, grid: &CellGrid) -> Vec<Connection> {
        let offsets = neighbor_offsets(self.connection_type);
        if offsets.is_empty() {
            return Vec::new();
        }
        let mut drawn: HashSet<EdgeKey> = HashSet::new();
        let mut out = Vec::new();
        for cell in grid.sorted_cells() {
            for &(dx, dy) in offsets {
                if self.connection_type == ConnectionType::Web
                    && ((dx * dx + dy * dy) as f32).sqrt() > self.web_radius
                {
                    continue;
                }
                let neighbor = cell.offset(dx, dy);
                if !grid.has(neighbor) {
                    continue;
                }
                let key = EdgeKey::new(cell, neighbor);
                if !drawn.insert(key) {
                    continue;
                }
                let mut rng = SmallRng::seed_from_u64(key.seed(self.seed));
                if self.density < 1.0 && rng.random::<f32>() >= self.density {
                    continue;
                }
                out.push(self.connection(cell, neighbor, &mut rng));
            }
        }
        tracing::trace!(links = out.len(), ty = ?self.connection_type, "connections built");
        out
    }

    fn connection(&self, from: Cell, to: Cell, rng: &mut SmallRng) -> Connection {
        match self.connection_type {
            ConnectionType::Organic => Connection {
                from,
                to,
                kind: ConnectionKind::Curved {
                    bend: rng.random_range(-MAX_ORGANIC_BEND..=MAX_ORGANIC_BEND),
                },
                width_scale: 1.0,
            },
            ConnectionType::Web => Connection {
                from,
                to,
                kind: ConnectionKind::Straight,
                width_scale: WEB_WIDTH_SCALE,
            },
            _ => Connection {
                from,
                to,
                kind: ConnectionKind::Straight,
                width_scale: 1.0,
            },
        }
    }
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
    fn offset_table_sizes() {
        assert_eq!(neighbor_offsets(ConnectionType::Off).len(), 0);
        assert_eq!(neighbor_offsets(ConnectionType::Orthogonal).len(), 4);
        assert_eq!(neighbor_offsets(ConnectionType::Organic).len(), 8);
        assert_eq!(neighbor_offsets(ConnectionType::Web).len(), 16);
        assert_eq!(neighbor_offsets(ConnectionType::Simple).len(), 4);
        assert_eq!(neighbor_offsets(ConnectionType::Ref).len(), 0);
    }

    #[test]
    fn edge_key_is_symmetric() {
        let a = Cell::new(2, 1);
        let b = Cell::new(1, 5);
        assert_eq!(EdgeKey::new(a, b), EdgeKey::new(b, a));
        assert_eq!(EdgeKey::new(a, b).to_string(), "1,5-2,1");
    }

    #[test]
    fn orthogonal_links_drawn_once() {
        let g = grid(&[(0, 0), (1, 0), (1, 1)]);
        let links = ConnectionGraphBuilder::new(ConnectionType::Orthogonal, 1.0, 0).build(&g);
        assert_eq!(links.len(), 2);
        let keys: HashSet<EdgeKey> = links.iter().map(Connection::key).collect();
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn ref_and_off_produce_no_links() {
        let g = grid(&[(0, 0), (1, 0)]);
        for ty in [ConnectionType::Off, ConnectionType::Ref] {
            assert!(ConnectionGraphBuilder::new(ty, 1.0, 0).build(&g).is_empty());
        }
    }

    #[test]
    fn organic_links_diagonals_with_bounded_bend() {
        let g = grid(&[(0, 0), (1, 1)]);
        let links = ConnectionGraphBuilder::new(ConnectionType::Organic, 1.0, 7).build(&g);
        assert_eq!(links.len(), 1);
        match links[0].kind {
            ConnectionKind::Curved { bend } => assert!(bend.abs() <= MAX_ORGANIC_BEND),
            other => panic!("expected curve, got {other:?}"),
        }
    }

    fn keys(links: &[Connection]) -> HashSet<EdgeKey> {
        links.iter().map(Connection::key).collect()
    }

    fn pair(a: (i32, i32), b: (i32, i32)) -> EdgeKey {
        EdgeKey::new(Cell::from(a), Cell::from(b))
    }

    #[test]
    fn simple_links_right_and_down_only() {
        let g = grid(&[(0, 0), (2, 0), (1, 1), (0, 2)]);
        let links = keys(&ConnectionGraphBuilder::new(ConnectionType::Simple, 1.0, 0).build(&g));
        assert!(links.contains(&pair((0, 0), (2, 0))));
        assert!(links.contains(&pair((0, 0), (0, 2))));
        assert!(!links.contains(&pair((0, 0), (1, 1))));
        assert!(!links.contains(&pair((2, 0), (1, 1))));
        assert_eq!(links.len(), 2);
    }

    #[test]
    fn web_links_knight_pairs_at_half_width() {
        let g = grid(&[(0, 0), (2, 1), (1, 1), (3, 3)]);
        let links = ConnectionGraphBuilder::new(ConnectionType::Web, 1.0, 0).build(&g);
        let set = keys(&links);
        assert!(set.contains(&pair((0, 0), (2, 1))));
        assert!(set.contains(&pair((0, 0), (1, 1))));
        assert!(set.contains(&pair((1, 1), (2, 1))));
        assert!(set.contains(&pair((2, 1), (3, 3))));
        // (1,1)-(3,3) is two diagonal steps, outside the web pattern.
        assert!(!set.contains(&pair((1, 1), (3, 3))));
        assert!(links.iter().all(|l| l.kind == ConnectionKind::Straight && l.width_scale == WEB_WIDTH_SCALE));
    }

    #[test]
    fn web_radius_limits_reach() {
        let g = grid(&[(0, 0), (2, 1), (2, 0), (1, 1)]);
        let full = keys(&ConnectionGraphBuilder::new(ConnectionType::Web, 1.0, 0).build(&g));
        let short = keys(
            &ConnectionGraphBuilder::new(ConnectionType::Web, 1.0, 0)
                .with_web_radius(1.5)
                .build(&g),
        );
        assert!(full.contains(&pair((0, 0), (2, 1))));
        assert!(full.contains(&pair((0, 0), (2, 0))));
        assert!(!short.contains(&pair((0, 0), (2, 1))));
        assert!(!short.contains(&pair((0, 0), (2, 0))));
        assert!(short.contains(&pair((0, 0), (1, 1))));
        assert!(short.is_subset(&full));
    }

    #[test]
    fn density_thins_every_neighbor_style() {
        let cells: Vec<(i32, i32)> = (0..12).flat_map(|x| (0..12).map(move |y| (x, y))).collect();
        let g = grid(&cells);
        for ty in [
            ConnectionType::Orthogonal,
            ConnectionType::Organic,
            ConnectionType::Web,
            ConnectionType::Simple,
        ] {
            let all = ConnectionGraphBuilder::new(ty, 1.0, 5).build(&g);
            let thin = ConnectionGraphBuilder::new(ty, 0.3, 5).build(&g);
            assert!(!thin.is_empty(), "{ty:?}");
            assert!(thin.len() < all.len() / 2, "{ty:?}: kept {} of {}", thin.len(), all.len());
            assert!(keys(&thin).is_subset(&keys(&all)), "{ty:?}");
            assert_eq!(thin, ConnectionGraphBuilder::new(ty, 0.3, 5).build(&g), "{ty:?}");
        }
    }

    #[test]
    fn density_thinning_is_stable() {
        let cells: Vec<(i32, i32)> = (0..20).flat_map(|x| (0..20).map(move |y| (x, y))).collect();
        let g = grid(&cells);
        let b = ConnectionGraphBuilder::new(ConnectionType::Orthogonal, 0.5, 3);
        let first = b.build(&g);
        let second = b.build(&g);
        assert_eq!(first, second);
        // 760 candidate edges on a 20x20 block; half should survive, give or take.
        assert!(first.len() > 250 && first.len() < 510, "kept {}", first.len());
    }
}
