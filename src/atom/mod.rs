use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Finnis-Sinclair parameters of one species.
///
/// `d` and `beta` shape the glue density contribution this species donates to
/// its neighbours, `a` scales its embedding energy, and `c`, `c0`, `c1`, `c2`
/// define the pairwise polynomial between two atoms of this species.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlueParameters {
    pub d: f64,
    pub beta: f64,
    pub a: f64,
    pub c: f64,
    pub c0: f64,
    pub c1: f64,
    pub c2: f64,
}

/// Species-level record, shared by every particle of that species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    /// Species label (e.g. "W", "Ar").
    pub name: String,
    /// Mass in model units.
    pub mass: f64,
    /// Mie length parameter. Zero means no pairwise interaction.
    #[serde(default)]
    pub sigma: f64,
    /// Mie energy parameter.
    #[serde(default)]
    pub epsilon: f64,
    /// Glue parameters, absent for species that take no part in glue interactions.
    #[serde(default)]
    pub glue: Option<GlueParameters>,
}

impl Atom {
    pub fn new(name: impl Into<String>, mass: f64) -> Self {
        Self {
            name: name.into(),
            mass,
            sigma: 0.0,
            epsilon: 0.0,
            glue: None,
        }
    }

    pub fn with_mie(mut self, sigma: f64, epsilon: f64) -> Self {
        self.sigma = sigma;
        self.epsilon = epsilon;
        self
    }

    pub fn with_glue(mut self, glue: GlueParameters) -> Self {
        self.glue = Some(glue);
        self
    }
}

/// Distinct species of a system, in order of first appearance, plus the
/// species index of every particle.
#[derive(Debug, Clone)]
pub struct SpeciesTable {
    species: Vec<Arc<Atom>>,
    indices: Vec<usize>,
}

impl SpeciesTable {
    pub fn from_atoms(atoms: &[Arc<Atom>]) -> Self {
        let mut species: Vec<Arc<Atom>> = Vec::new();
        let mut indices = Vec::with_capacity(atoms.len());
        for atom in atoms {
            let idx = match species.iter().position(|s| s.name == atom.name) {
                Some(idx) => idx,
                None => {
                    species.push(Arc::clone(atom));
                    species.len() - 1
                }
            };
            indices.push(idx);
        }
        Self { species, indices }
    }

    pub fn species(&self) -> &[Arc<Atom>] {
        &self.species
    }

    /// Species index of every particle.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.species.iter().position(|s| s.name == name)
    }

    pub fn names(&self) -> Vec<String> {
        self.species.iter().map(|s| s.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_species_table_first_appearance_order() {
        let w = Arc::new(Atom::new("W", 183.84));
        let mo = Arc::new(Atom::new("Mo", 95.95));
        let atoms = vec![mo.clone(), w.clone(), mo.clone(), w];
        let table = SpeciesTable::from_atoms(&atoms);

        assert_eq!(table.len(), 2);
        assert_eq!(table.names(), vec!["Mo".to_string(), "W".to_string()]);
        assert_eq!(table.indices(), &[0, 1, 0, 1]);
        assert_eq!(table.index_of("W"), Some(1));
        assert_eq!(table.index_of("Fe"), None);
    }
}
