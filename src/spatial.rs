use glam::DVec3;

use crate::cell::PeriodicBox;

/// Periodic cell list over a cubic box. Each cell edge is at least the cutoff,
/// so every pair within the cutoff lies in the same or an adjacent cell.
pub struct CellList {
    pub cells: Vec<Vec<usize>>,
    /// Cells per axis.
    pub n: usize,
    pub cell_size: f64,
}

impl CellList {
    /// Smallest number of cells per axis for which the 27-cell stencil visits
    /// every cell at most once.
    pub const MIN_CELLS_PER_AXIS: usize = 3;

    /// Whether a box of this size holds at least three cells of width `cutoff` per axis.
    pub fn fits(cell: &PeriodicBox, cutoff: f64) -> bool {
        Self::cells_per_axis(cell, cutoff) >= Self::MIN_CELLS_PER_AXIS
    }

    fn cells_per_axis(cell: &PeriodicBox, cutoff: f64) -> usize {
        (cell.length() / cutoff).floor() as usize
    }

    /// Returns `None` when the box is too small to hold three cells per axis.
    pub fn build(positions: &[DVec3], cell: &PeriodicBox, cutoff: f64) -> Option<Self> {
        if !Self::fits(cell, cutoff) {
            return None;
        }
        let n = Self::cells_per_axis(cell, cutoff);
        let cell_size = cell.length() / n as f64;
        let mut cells = vec![Vec::new(); n * n * n];

        for (i, &p) in positions.iter().enumerate() {
            let (ix, iy, iz) = Self::coords(cell.wrap(p), cell_size, n);
            cells[ix * n * n + iy * n + iz].push(i);
        }

        Some(Self { cells, n, cell_size })
    }

    fn coords(p: DVec3, cell_size: f64, n: usize) -> (usize, usize, usize) {
        let ix = ((p.x / cell_size) as usize).min(n - 1);
        let iy = ((p.y / cell_size) as usize).min(n - 1);
        let iz = ((p.z / cell_size) as usize).min(n - 1);
        (ix, iy, iz)
    }

    /// Atom indices in the 27 cells around (and including) the cell of `pos`.
    pub fn stencil(&self, cell: &PeriodicBox, pos: DVec3) -> impl Iterator<Item = usize> + '_ {
        let n = self.n as i64;
        let (ix, iy, iz) = Self::coords(cell.wrap(pos), self.cell_size, self.n);
        let (ix, iy, iz) = (ix as i64, iy as i64, iz as i64);

        (-1..=1i64).flat_map(move |dx| {
            (-1..=1i64).flat_map(move |dy| {
                (-1..=1i64).flat_map(move |dz| {
                    let nx = (ix + dx).rem_euclid(n) as usize;
                    let ny = (iy + dy).rem_euclid(n) as usize;
                    let nz = (iz + dz).rem_euclid(n) as usize;
                    self.cells[nx * self.n * self.n + ny * self.n + nz].iter().copied()
                })
            })
        })
    }
}
