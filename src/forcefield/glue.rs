use serde::{Deserialize, Serialize};

use crate::atom::SpeciesTable;
use crate::error::{Error, Result};
use crate::forcefield::interactions::{
    embedding_derivative, embedding_energy, glue_density, glue_density_derivative, glue_pair,
    glue_pair_derivative,
};

/// What to do when an atom ends up with a negative glue density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlueDensityPolicy {
    /// Abort with [`Error::NegativeGlueDensity`].
    #[default]
    Strict,
    /// Treat negative densities as zero.
    Clamp,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DensityShape {
    d: f64,
    beta: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PairPolynomial {
    c: f64,
    c0: f64,
    c1: f64,
    c2: f64,
}

/// Per-atom glue density `ρ_i`, produced by the density pass.
#[derive(Debug, Clone, PartialEq)]
pub struct GlueDensity(pub(crate) Vec<f64>);

impl GlueDensity {
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

/// Embedding energy and its derivative `F'(ρ_i)` for every atom. Only
/// obtainable from a [`GlueDensity`], which is what the force pass consumes.
#[derive(Debug, Clone)]
pub struct Embedding {
    energy: f64,
    derivatives: Vec<f64>,
}

impl Embedding {
    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn derivatives(&self) -> &[f64] {
        &self.derivatives
    }
}

/// Finnis-Sinclair glue potential:
/// `E = Σ_{i<j} V(r_ij) + Σ_i -A_i sqrt(ρ_i)` with `ρ_i = Σ_j φ_j(r_ij)`.
///
/// The density an atom receives from a neighbour uses the neighbour's `(d, β)`;
/// the pair polynomial of unlike species must be given explicitly.
#[derive(Debug, Clone)]
pub struct GlueInteraction {
    species: Vec<String>,
    density: Vec<Option<DensityShape>>,
    strength: Vec<Option<f64>>,
    pair: Vec<Option<PairPolynomial>>,
    policy: GlueDensityPolicy,
}

impl GlueInteraction {
    pub fn new(species: &SpeciesTable) -> Result<Self> {
        let atoms = species.species();
        let n = atoms.len();
        let mut density = Vec::with_capacity(n);
        let mut strength = Vec::with_capacity(n);
        let mut pair = vec![None; n * n];

        for (a, atom) in atoms.iter().enumerate() {
            match atom.glue {
                Some(p) => {
                    if !(p.d > 0.0 && p.c > 0.0) {
                        return Err(Error::Configuration(format!(
                            "glue parameters of '{}' need d > 0 and c > 0", atom.name
                        )));
                    }
                    density.push(Some(DensityShape { d: p.d, beta: p.beta }));
                    strength.push(Some(p.a));
                    pair[a * n + a] = Some(PairPolynomial { c: p.c, c0: p.c0, c1: p.c1, c2: p.c2 });
                }
                None => {
                    density.push(None);
                    strength.push(None);
                }
            }
        }

        Ok(Self {
            species: species.names(),
            density,
            strength,
            pair,
            policy: GlueDensityPolicy::Strict,
        })
    }

    pub fn with_policy(mut self, policy: GlueDensityPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the pair polynomial between two (usually unlike) species.
    pub fn with_pair_override(mut self, a: &str, b: &str, c: f64, c0: f64, c1: f64, c2: f64) -> Result<Self> {
        if !(c > 0.0) {
            return Err(Error::Configuration(format!("glue pair cutoff must be positive, got {}", c)));
        }
        let find = |name: &str| {
            self.species
                .iter()
                .position(|s| s == name)
                .ok_or_else(|| Error::Configuration(format!("unknown species '{}' in pair override", name)))
        };
        let ia = find(a)?;
        let ib = find(b)?;
        let n = self.species.len();
        let poly = Some(PairPolynomial { c, c0, c1, c2 });
        self.pair[ia * n + ib] = poly;
        self.pair[ib * n + ia] = poly;
        Ok(self)
    }

    pub fn species(&self) -> &[String] {
        &self.species
    }

    pub fn policy(&self) -> GlueDensityPolicy {
        self.policy
    }

    /// Largest distance at which any glue term is non-zero.
    pub fn cutoff(&self) -> f64 {
        let d = self.density.iter().flatten().map(|s| s.d);
        let c = self.pair.iter().flatten().map(|p| p.c);
        d.chain(c).fold(0.0, f64::max)
    }

    pub fn interacts(&self, a: usize, b: usize) -> bool {
        let n = self.species.len();
        self.pair[a * n + b].is_some() || self.exchanges_density(a, b)
    }

    #[inline]
    fn exchanges_density(&self, a: usize, b: usize) -> bool {
        self.strength[a].is_some() && self.strength[b].is_some()
    }

    /// `φ(r)` donated by an atom of species `donor`.
    #[inline]
    pub fn density_contribution(&self, donor: usize, r: f64) -> f64 {
        match self.density[donor] {
            Some(s) => glue_density(r, s.d, s.beta),
            None => 0.0,
        }
    }

    #[inline]
    fn density_slope(&self, donor: usize, r: f64) -> f64 {
        match self.density[donor] {
            Some(s) => glue_density_derivative(r, s.d, s.beta),
            None => 0.0,
        }
    }

    /// Pairwise term `V(r)` between species `a` and `b`.
    #[inline]
    pub fn pair_energy(&self, a: usize, b: usize, r: f64) -> f64 {
        match self.pair[a * self.species.len() + b] {
            Some(p) => glue_pair(r, p.c, p.c0, p.c1, p.c2),
            None => 0.0,
        }
    }

    #[inline]
    fn pair_slope(&self, a: usize, b: usize, r: f64) -> f64 {
        match self.pair[a * self.species.len() + b] {
            Some(p) => glue_pair_derivative(r, p.c, p.c0, p.c1, p.c2),
            None => 0.0,
        }
    }

    /// Density received by each end of a pair, `(ρ to i, ρ to j)`.
    #[inline]
    pub fn pair_densities(&self, a: usize, b: usize, r: f64) -> (f64, f64) {
        if !self.exchanges_density(a, b) {
            return (0.0, 0.0);
        }
        (self.density_contribution(b, r), self.density_contribution(a, r))
    }

    /// Turns the densities into embedding energies and derivatives, applying
    /// the negative-density policy.
    pub fn embed(&self, density: &GlueDensity, species: &[usize], step: u64) -> Result<Embedding> {
        let mut energy = 0.0;
        let mut derivatives = vec![0.0; density.0.len()];
        for (atom, (&rho, &s)) in density.0.iter().zip(species).enumerate() {
            let a = match self.strength[s] {
                Some(a) => a,
                None => continue,
            };
            let rho = if rho < 0.0 {
                match self.policy {
                    GlueDensityPolicy::Strict => {
                        return Err(Error::NegativeGlueDensity { atom, step, density: rho });
                    }
                    GlueDensityPolicy::Clamp => 0.0,
                }
            } else {
                rho
            };
            energy += embedding_energy(rho, a);
            derivatives[atom] = embedding_derivative(rho, a);
        }
        Ok(Embedding { energy, derivatives })
    }

    /// Returns `(V(r), f(r))` for the pair `(i, j)`, where `f = -dE/dr`
    /// includes both embedding terms coupled through the densities.
    #[inline]
    pub fn pair_force(&self, embedding: &Embedding, i: usize, j: usize, a: usize, b: usize, r: f64) -> (f64, f64) {
        let mut slope = self.pair_slope(a, b, r);
        if self.exchanges_density(a, b) {
            slope += embedding.derivatives[i] * self.density_slope(b, r);
            slope += embedding.derivatives[j] * self.density_slope(a, r);
        }
        (self.pair_energy(a, b, r), -slope)
    }
}
