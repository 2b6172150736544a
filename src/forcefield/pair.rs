use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::atom::SpeciesTable;
use crate::error::{Error, Result};
use crate::forcefield::interactions::{mie, mie_prefactor, quintic_switch};

/// How a pairwise potential is brought to zero at a finite distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CutoffStrategy {
    /// Raw analytic form at every distance.
    None,
    /// Zero beyond `cutoff`; with `shift` the energy is offset to be continuous there.
    Shifted { cutoff: f64, shift: bool },
    /// Raw form below `activation`, quintic switch up to `cutoff`, zero beyond.
    Switched { activation: f64, cutoff: f64 },
}

impl CutoffStrategy {
    /// Builds a strategy from its configuration name. `activation` is only
    /// read by `switched`, `cutoff` is ignored by `none`.
    pub fn from_name(name: &str, cutoff: f64, activation: f64) -> Result<Self> {
        let strategy = match name {
            "none" => CutoffStrategy::None,
            "shifted" => CutoffStrategy::Shifted { cutoff, shift: true },
            "hard" | "truncated" => CutoffStrategy::Shifted { cutoff, shift: false },
            "switched" => CutoffStrategy::Switched { activation, cutoff },
            other => return Err(Error::UnsupportedCutoff(other.to_string())),
        };
        strategy.validate()?;
        Ok(strategy)
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            CutoffStrategy::None => Ok(()),
            CutoffStrategy::Shifted { cutoff, .. } => {
                if !(cutoff.is_finite() && cutoff > 0.0) {
                    return Err(Error::Configuration(format!("cutoff must be positive, got {}", cutoff)));
                }
                Ok(())
            }
            CutoffStrategy::Switched { activation, cutoff } => {
                if !(cutoff.is_finite() && cutoff > 0.0) {
                    return Err(Error::Configuration(format!("cutoff must be positive, got {}", cutoff)));
                }
                if !(activation > 0.0 && activation < cutoff) {
                    return Err(Error::Configuration(format!(
                        "activation distance {} must lie in (0, {})", activation, cutoff
                    )));
                }
                Ok(())
            }
        }
    }

    /// Outer cutoff, `None` when the potential never vanishes.
    pub fn cutoff(&self) -> Option<f64> {
        match *self {
            CutoffStrategy::None => None,
            CutoffStrategy::Shifted { cutoff, .. } | CutoffStrategy::Switched { cutoff, .. } => Some(cutoff),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct MiePair {
    sigma: f64,
    epsilon: f64,
}

/// Generic Mie pair potential `C ϵ [(σ/r)^m - (σ/r)^n]` with a cutoff strategy.
///
/// Cross-species parameters follow the geometric mean of the species' `σ`
/// and `ϵ` unless overridden. A pair with `σ = 0` does not interact.
#[derive(Debug, Clone)]
pub struct MieInteraction {
    species: Vec<String>,
    table: Vec<MiePair>,
    repulsive: f64,
    attractive: f64,
    prefactor: f64,
    strategy: CutoffStrategy,
}

impl MieInteraction {
    pub fn new(species: &SpeciesTable, repulsive: f64, attractive: f64, strategy: CutoffStrategy) -> Result<Self> {
        if !(attractive > 0.0 && repulsive > attractive) {
            return Err(Error::Configuration(format!(
                "Mie exponents must satisfy m > n > 0, got m = {}, n = {}", repulsive, attractive
            )));
        }
        strategy.validate()?;

        let atoms = species.species();
        let n = atoms.len();
        let mut table = Vec::with_capacity(n * n);
        for a in atoms {
            for b in atoms {
                table.push(MiePair {
                    sigma: (a.sigma * b.sigma).sqrt(),
                    epsilon: (a.epsilon * b.epsilon).sqrt(),
                });
            }
        }

        Ok(Self {
            species: species.names(),
            table,
            repulsive,
            attractive,
            prefactor: mie_prefactor(repulsive, attractive),
            strategy,
        })
    }

    /// 12-6 Lennard-Jones.
    pub fn lennard_jones(species: &SpeciesTable, strategy: CutoffStrategy) -> Result<Self> {
        Self::new(species, 12.0, 6.0, strategy)
    }

    /// Replaces the combined parameters of one species pair.
    pub fn with_pair_override(mut self, a: &str, b: &str, sigma: f64, epsilon: f64) -> Result<Self> {
        let ia = self.species_index(a)?;
        let ib = self.species_index(b)?;
        let n = self.species.len();
        let pair = MiePair { sigma, epsilon };
        self.table[ia * n + ib] = pair;
        self.table[ib * n + ia] = pair;
        Ok(self)
    }

    fn species_index(&self, name: &str) -> Result<usize> {
        self.species
            .iter()
            .position(|s| s == name)
            .ok_or_else(|| Error::Configuration(format!("unknown species '{}' in pair override", name)))
    }

    pub fn species(&self) -> &[String] {
        &self.species
    }

    pub fn strategy(&self) -> CutoffStrategy {
        self.strategy
    }

    pub fn cutoff(&self) -> Option<f64> {
        self.strategy.cutoff()
    }

    #[inline]
    fn pair(&self, a: usize, b: usize) -> MiePair {
        self.table[a * self.species.len() + b]
    }

    pub fn interacts(&self, a: usize, b: usize) -> bool {
        self.pair(a, b).sigma != 0.0
    }

    /// Returns `(V(r), f(r) / r)` under the configured cutoff strategy.
    #[inline]
    pub fn evaluate(&self, a: usize, b: usize, r2: f64) -> (f64, f64) {
        let MiePair { sigma, epsilon } = self.pair(a, b);
        if sigma == 0.0 {
            return (0.0, 0.0);
        }
        match self.strategy {
            CutoffStrategy::None => mie(r2, sigma, epsilon, self.repulsive, self.attractive, self.prefactor),
            CutoffStrategy::Shifted { cutoff, shift } => {
                if r2 > cutoff * cutoff {
                    return (0.0, 0.0);
                }
                let (energy, f_over_r) = mie(r2, sigma, epsilon, self.repulsive, self.attractive, self.prefactor);
                if shift {
                    let (at_cutoff, _) = mie(cutoff * cutoff, sigma, epsilon, self.repulsive, self.attractive, self.prefactor);
                    (energy - at_cutoff, f_over_r)
                } else {
                    (energy, f_over_r)
                }
            }
            CutoffStrategy::Switched { activation, cutoff } => {
                if r2 >= cutoff * cutoff {
                    return (0.0, 0.0);
                }
                let (energy, f_over_r) = mie(r2, sigma, epsilon, self.repulsive, self.attractive, self.prefactor);
                if r2 <= activation * activation {
                    return (energy, f_over_r);
                }
                let r = r2.sqrt();
                let (sw, dsw) = quintic_switch(r, activation, cutoff);
                (energy * sw, f_over_r * sw - energy * dsw / r)
            }
        }
    }

    pub fn potential_energy(&self, a: usize, b: usize, r2: f64) -> f64 {
        self.evaluate(a, b, r2).0
    }

    /// Force on the atom at the head of `delta` (the one `delta` points to).
    /// The atom at the tail receives the negation.
    pub fn force(&self, a: usize, b: usize, delta: DVec3) -> DVec3 {
        let (_, f_over_r) = self.evaluate(a, b, delta.length_squared());
        delta * f_over_r
    }
}
