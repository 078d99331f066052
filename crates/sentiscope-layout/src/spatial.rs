//! Uniform grid for collision candidate generation.

use std::collections::HashMap;

type CellKey = (i64, i64);

/// Spatial hash over node centers.
///
/// With a cell size at least the collision distance, every pair closer than
/// that distance lands in the same or an adjacent cell.
#[derive(Debug, Clone, Default)]
pub struct CollisionGrid {
    cell_size: f64,
    cells: HashMap<CellKey, Vec<usize>>,
    keys: Vec<Option<CellKey>>,
}

impl CollisionGrid {
    /// Create an empty grid.
    #[must_use]
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size: if cell_size > 0.0 && cell_size.is_finite() {
                cell_size
            } else {
                1.0
            },
            cells: HashMap::new(),
            keys: Vec::new(),
        }
    }

    /// Build a grid from positions indexed by their order.
    #[must_use]
    pub fn from_positions(cell_size: f64, positions: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let mut grid = Self::new(cell_size);
        for (x, y) in positions {
            grid.push(x, y);
        }
        grid
    }

    /// Cell edge length.
    #[must_use]
    pub const fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Number of indexed positions, including skipped non-finite ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if nothing has been indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Remove all entries, keeping the cell size.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.keys.clear();
    }

    /// Index the next position. Non-finite positions are never candidates.
    pub fn push(&mut self, x: f64, y: f64) {
        let index = self.keys.len();
        let key = self.key(x, y);
        if let Some(k) = key {
            self.cells.entry(k).or_default().push(index);
        }
        self.keys.push(key);
    }

    /// Indices in the 3x3 block of cells around `(x, y)`, in index order
    /// within each cell.
    pub fn neighbors(&self, x: f64, y: f64) -> Vec<usize> {
        let Some((cx, cy)) = self.key(x, y) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for dy in -1..=1 {
            for dx in -1..=1 {
                if let Some(bucket) = self.cells.get(&(cx + dx, cy + dy)) {
                    out.extend_from_slice(bucket);
                }
            }
        }
        out
    }

    /// Candidate pairs `(i, j)` with `i < j`, each reported once.
    ///
    /// Ordering depends only on insertion order and positions.
    #[must_use]
    pub fn candidate_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (i, key) in self.keys.iter().enumerate() {
            let Some((cx, cy)) = *key else { continue };
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let Some(bucket) = self.cells.get(&(cx + dx, cy + dy)) else {
                        continue;
                    };
                    pairs.extend(bucket.iter().filter(|&&j| j > i).map(|&j| (i, j)));
                }
            }
        }
        pairs
    }

    fn key(&self, x: f64, y: f64) -> Option<CellKey> {
        if !(x.is_finite() && y.is_finite()) {
            return None;
        }
        Some((
            (x / self.cell_size).floor() as i64,
            (y / self.cell_size).floor() as i64,
        ))
    }
}
