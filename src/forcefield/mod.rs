pub mod glue;
pub mod interactions;
pub mod pair;
pub mod parallel;
pub mod sequential;

use glam::DVec3;
use log::warn;

use crate::atom::SpeciesTable;
use crate::cell::PeriodicBox;
use crate::error::{Error, Result};
use crate::neighbors::{AdjacencyMask, NeighbourList};
pub use glue::{Embedding, GlueDensity, GlueDensityPolicy, GlueInteraction};
pub use pair::{CutoffStrategy, MieInteraction};

const PARALLEL_THRESHOLD: usize = 1000;

/// The closed set of interaction kinds a simulation can combine.
#[derive(Debug, Clone)]
pub enum Interaction {
    Mie(MieInteraction),
    Glue(GlueInteraction),
}

impl From<MieInteraction> for Interaction {
    fn from(value: MieInteraction) -> Self {
        Interaction::Mie(value)
    }
}

impl From<GlueInteraction> for Interaction {
    fn from(value: GlueInteraction) -> Self {
        Interaction::Glue(value)
    }
}

impl Interaction {
    pub fn species(&self) -> &[String] {
        match self {
            Interaction::Mie(mie) => mie.species(),
            Interaction::Glue(glue) => glue.species(),
        }
    }

    /// Outer cutoff, `None` for a potential that never vanishes.
    pub fn cutoff(&self) -> Option<f64> {
        match self {
            Interaction::Mie(mie) => mie.cutoff(),
            Interaction::Glue(glue) => Some(glue.cutoff()),
        }
    }

    pub fn interacts(&self, a: usize, b: usize) -> bool {
        match self {
            Interaction::Mie(mie) => mie.interacts(a, b),
            Interaction::Glue(glue) => glue.interacts(a, b),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct EnergyTerms {
    /// Mie pair energies.
    pub pair: f64,
    /// Finnis-Sinclair pair polynomial.
    pub glue_pair: f64,
    /// Finnis-Sinclair embedding, `Σ -A sqrt(ρ)`.
    pub glue_embedding: f64,
    pub total: f64,
}

/// Result of one force evaluation.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub energy: EnergyTerms,
    pub forces: Vec<DVec3>,
    pub glue_density: Option<GlueDensity>,
}

/// Minimum-image geometry of one neighbour pair, shared by every interaction.
#[derive(Debug, Clone, Copy)]
pub struct PairGeometry {
    pub i: usize,
    pub j: usize,
    /// `x_j - x_i` under the minimum image convention.
    pub delta: DVec3,
    pub r2: f64,
}

/// Per-atom positions and species indices the force field evaluates.
#[derive(Debug, Clone, Copy)]
pub struct Configuration<'a> {
    pub positions: &'a [DVec3],
    pub species: &'a [usize],
    pub cell: &'a PeriodicBox,
}

/// Sums every interaction over the current neighbour list.
pub struct ForceField {
    interactions: Vec<Interaction>,
    num_threads: usize,
    pool: Option<rayon::ThreadPool>,
}

impl ForceField {
    /// `num_threads`: 1 forces serial evaluation, 0 picks automatically by
    /// system size, anything else runs on a pool of that many threads.
    pub fn new(interactions: Vec<Interaction>, num_threads: usize) -> Result<Self> {
        if interactions.iter().filter(|i| matches!(i, Interaction::Glue(_))).count() > 1 {
            return Err(Error::Configuration("at most one glue interaction is supported".into()));
        }
        let pool = if num_threads == 1 {
            None
        } else {
            let threads = if num_threads > 0 { num_threads } else { default_thread_count() };
            Some(rayon::ThreadPoolBuilder::new().num_threads(threads).build()?)
        };
        Ok(Self { interactions, num_threads, pool })
    }

    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    pub fn num_threads(&self) -> usize {
        self.pool.as_ref().map_or(1, |p| p.current_num_threads())
    }

    pub fn has_glue(&self) -> bool {
        self.interactions.iter().any(|i| matches!(i, Interaction::Glue(_)))
    }

    /// Largest finite interaction cutoff. `None` when no interaction has one.
    pub fn max_cutoff(&self) -> Option<f64> {
        self.interactions.iter().filter_map(Interaction::cutoff).reduce(f64::max)
    }

    /// Checks that every interaction was built for `species`.
    pub fn check_species(&self, species: &SpeciesTable) -> Result<()> {
        let names = species.names();
        for interaction in &self.interactions {
            if interaction.species() != names.as_slice() {
                return Err(Error::Configuration(format!(
                    "interaction built for species {:?} but the system has {:?}",
                    interaction.species(),
                    names
                )));
            }
        }
        Ok(())
    }

    /// A species pair is adjacent when at least one interaction acts on it.
    pub fn adjacency_mask(&self, species: &SpeciesTable) -> AdjacencyMask {
        AdjacencyMask::from_species(species.indices().to_vec(), species.len(), |a, b| {
            self.interactions.iter().any(|i| i.interacts(a, b))
        })
    }

    /// Warns about interactions reaching further than the neighbour cutoff.
    pub fn check_neighbour_cutoff(&self, neighbour_cutoff: f64) {
        for interaction in &self.interactions {
            if let Some(cutoff) = interaction.cutoff() {
                if cutoff > neighbour_cutoff {
                    warn!(
                        "interaction cutoff {:.4} exceeds neighbour cutoff {:.4}; some pairs will be missed",
                        cutoff, neighbour_cutoff
                    );
                }
            }
        }
    }

    fn use_parallel(&self, n_atoms: usize) -> bool {
        match self.num_threads {
            1 => false,
            0 => n_atoms >= PARALLEL_THRESHOLD,
            _ => true,
        }
    }

    /// Zeroes and recomputes forces and energy for `config` over `neighbours`.
    pub fn compute(&self, config: Configuration<'_>, neighbours: &NeighbourList, step: u64) -> Result<Evaluation> {
        let evaluation = match &self.pool {
            Some(pool) if self.use_parallel(config.positions.len()) => {
                pool.install(|| self.compute_parallel(config, neighbours, step))?
            }
            _ => self.compute_serial(config, neighbours, step)?,
        };
        check_finite(&evaluation, step)?;
        Ok(evaluation)
    }

    /// Runs `f` on this force field's thread pool, or inline when serial.
    pub(crate) fn install<R: Send>(&self, f: impl FnOnce() -> R + Send) -> R {
        match &self.pool {
            Some(pool) => pool.install(f),
            None => f(),
        }
    }
}

/// Thread count when none is requested: `RAYON_NUM_THREADS`, else 4.
pub fn default_thread_count() -> usize {
    std::env::var("RAYON_NUM_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|&n: &usize| n > 0)
        .unwrap_or(4)
}

pub(crate) fn pair_geometry(config: &Configuration<'_>, i: usize, j: usize, step: u64) -> Result<PairGeometry> {
    let delta = config.cell.minimum_image(config.positions[i], config.positions[j]);
    let r2 = delta.length_squared();
    if r2 == 0.0 {
        return Err(Error::CoincidentAtoms { i, j, step });
    }
    Ok(PairGeometry { i, j, delta, r2 })
}

fn check_finite(evaluation: &Evaluation, step: u64) -> Result<()> {
    if let Some(atom) = evaluation.forces.iter().position(|f| !f.is_finite()) {
        return Err(Error::NonFinite { quantity: "force", atom: Some(atom), step });
    }
    if !evaluation.energy.total.is_finite() {
        return Err(Error::NonFinite { quantity: "potential energy", atom: None, step });
    }
    Ok(())
}
