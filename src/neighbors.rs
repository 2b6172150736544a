use std::sync::Arc;

use glam::DVec3;
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cell::PeriodicBox;
use crate::error::{Error, Result};
use crate::spatial::CellList;

const PARALLEL_THRESHOLD: usize = 1000;

/// How the neighbour finder searches for pairs on a rebuild step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighbourStrategy {
    /// O(N²) reference search over every unordered pair.
    BruteForce,
    /// Periodic cell list. The box must hold at least three cells per axis.
    CellList,
    /// Cell list whenever the box allows it, brute force otherwise.
    #[default]
    Auto,
}

/// Species-pair exclusion mask. Atoms `i` and `j` are eligible for the
/// neighbour list only if their species pair is allowed.
#[derive(Debug, Clone)]
pub struct AdjacencyMask {
    species: Vec<usize>,
    n_species: usize,
    allowed: Vec<bool>,
}

impl AdjacencyMask {
    /// Every pair of `n_atoms` atoms is allowed.
    pub fn all(n_atoms: usize) -> Self {
        Self {
            species: vec![0; n_atoms],
            n_species: 1,
            allowed: vec![true],
        }
    }

    /// Builds the mask from per-atom species indices and a symmetric species-pair predicate.
    pub fn from_species(species: Vec<usize>, n_species: usize, allowed: impl Fn(usize, usize) -> bool) -> Self {
        let mut table = vec![false; n_species * n_species];
        for a in 0..n_species {
            for b in a..n_species {
                let ok = allowed(a, b) || allowed(b, a);
                table[a * n_species + b] = ok;
                table[b * n_species + a] = ok;
            }
        }
        Self { species, n_species, allowed: table }
    }

    #[inline]
    pub fn allows(&self, i: usize, j: usize) -> bool {
        self.allowed[self.species[i] * self.n_species + self.species[j]]
    }

    pub fn n_atoms(&self) -> usize {
        self.species.len()
    }
}

/// Pairs `(i, j)` with `i < j`, sorted by `i` then `j`, as of the last rebuild.
///
/// Cloning shares the underlying storage; a rebuild replaces it wholesale.
#[derive(Debug, Clone, Default)]
pub struct NeighbourList {
    pairs: Arc<Vec<(usize, usize)>>,
    built_at: Option<u64>,
}

impl NeighbourList {
    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Step of the last rebuild, `None` for a list that was never built.
    pub fn built_at_step(&self) -> Option<u64> {
        self.built_at
    }

    /// True when both lists come from the same rebuild.
    pub fn shares_storage_with(&self, other: &NeighbourList) -> bool {
        Arc::ptr_eq(&self.pairs, &other.pairs)
    }
}

/// Rebuilds the neighbour list every `update_interval` steps.
#[derive(Debug, Clone)]
pub struct NeighbourFinder {
    cutoff: f64,
    update_interval: u64,
    strategy: NeighbourStrategy,
    serial: bool,
}

impl NeighbourFinder {
    pub fn new(cutoff: f64, update_interval: u64) -> Result<Self> {
        if !(cutoff.is_finite() && cutoff > 0.0) {
            return Err(Error::Configuration(format!(
                "neighbour cutoff must be positive, got {}", cutoff
            )));
        }
        if update_interval == 0 {
            return Err(Error::Configuration("neighbour update interval must be at least 1".into()));
        }
        Ok(Self { cutoff, update_interval, strategy: NeighbourStrategy::Auto, serial: false })
    }

    pub fn with_strategy(mut self, strategy: NeighbourStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Keeps every search on the calling thread, whatever the system size.
    pub fn with_serial(mut self, serial: bool) -> Self {
        self.serial = serial;
        self
    }

    pub fn is_serial(&self) -> bool {
        self.serial
    }

    /// Fails when the box cannot hold the cell list the strategy demands.
    pub fn check_box(&self, cell: &PeriodicBox) -> Result<()> {
        if self.strategy == NeighbourStrategy::CellList && !CellList::fits(cell, self.cutoff) {
            return Err(Error::Configuration(format!(
                "cell list needs at least {} cells of width {} per axis, box length is {}",
                CellList::MIN_CELLS_PER_AXIS,
                self.cutoff,
                cell.length()
            )));
        }
        Ok(())
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    pub fn update_interval(&self) -> u64 {
        self.update_interval
    }

    pub fn strategy(&self) -> NeighbourStrategy {
        self.strategy
    }

    /// Returns a fresh list when `step` is a multiple of the update interval
    /// (or `current` was never built), otherwise `current` itself.
    pub fn find_neighbours(
        &self,
        positions: &[DVec3],
        cell: &PeriodicBox,
        mask: &AdjacencyMask,
        step: u64,
        current: &NeighbourList,
    ) -> NeighbourList {
        if current.built_at.is_some() && step % self.update_interval != 0 {
            return current.clone();
        }
        let list = self.build(positions, cell, mask, step);
        debug!("step {}: rebuilt neighbour list with {} pairs", step, list.len());
        list
    }

    /// Unconditional rebuild. Runs on the current Rayon pool from
    /// 1000 atoms unless the finder is serial.
    pub fn build(&self, positions: &[DVec3], cell: &PeriodicBox, mask: &AdjacencyMask, step: u64) -> NeighbourList {
        let parallel = !self.serial && positions.len() >= PARALLEL_THRESHOLD;
        let pairs = match self.strategy {
            NeighbourStrategy::BruteForce => brute_force_pairs(positions, cell, mask, self.cutoff, parallel),
            NeighbourStrategy::CellList | NeighbourStrategy::Auto => {
                cell_list_pairs(positions, cell, mask, self.cutoff, parallel)
            }
        };
        NeighbourList { pairs: Arc::new(pairs), built_at: Some(step) }
    }
}

/// Reference O(N²) search.
pub fn brute_force_pairs(
    positions: &[DVec3],
    cell: &PeriodicBox,
    mask: &AdjacencyMask,
    cutoff: f64,
    parallel: bool,
) -> Vec<(usize, usize)> {
    let n = positions.len();
    let cutoff_sq = cutoff * cutoff;
    let row = |i: usize| {
        let p_i = positions[i];
        (i + 1..n)
            .filter(|&j| mask.allows(i, j))
            .filter(|&j| cell.minimum_image(p_i, positions[j]).length_squared() <= cutoff_sq)
            .map(|j| (i, j))
            .collect::<Vec<_>>()
    };

    if parallel {
        (0..n).into_par_iter().flat_map_iter(row).collect()
    } else {
        (0..n).flat_map(row).collect()
    }
}

/// Cell-list search producing the same pairs, in the same order, as [`brute_force_pairs`].
/// Boxes under three cells wide are searched by brute force.
pub fn cell_list_pairs(
    positions: &[DVec3],
    cell: &PeriodicBox,
    mask: &AdjacencyMask,
    cutoff: f64,
    parallel: bool,
) -> Vec<(usize, usize)> {
    let cl = match CellList::build(positions, cell, cutoff) {
        Some(cl) => cl,
        None => return brute_force_pairs(positions, cell, mask, cutoff, parallel),
    };
    let n = positions.len();
    let cutoff_sq = cutoff * cutoff;
    let row = |i: usize| {
        let p_i = positions[i];
        let mut js: Vec<usize> = cl
            .stencil(cell, p_i)
            .filter(|&j| j > i && mask.allows(i, j))
            .filter(|&j| cell.minimum_image(p_i, positions[j]).length_squared() <= cutoff_sq)
            .collect();
        js.sort_unstable();
        js.into_iter().map(move |j| (i, j))
    };

    if parallel {
        (0..n).into_par_iter().flat_map_iter(row).collect()
    } else {
        (0..n).flat_map(row).collect()
    }
}
