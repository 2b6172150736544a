use glam::DVec3;

use crate::error::Result;
use crate::forcefield::{
    pair_geometry, Configuration, Embedding, EnergyTerms, Evaluation, ForceField, GlueDensity, GlueInteraction,
    Interaction, MieInteraction, PairGeometry,
};
use crate::neighbors::NeighbourList;

impl ForceField {
    pub(crate) fn compute_serial(&self, config: Configuration<'_>, neighbours: &NeighbourList, step: u64) -> Result<Evaluation> {
        let n = config.positions.len();
        let geometry = neighbours
            .pairs()
            .iter()
            .map(|&(i, j)| pair_geometry(&config, i, j, step))
            .collect::<Result<Vec<_>>>()?;

        let mut energy = EnergyTerms::default();
        let mut forces = vec![DVec3::ZERO; n];
        let mut glue_density = None;

        for interaction in &self.interactions {
            match interaction {
                Interaction::Mie(mie) => {
                    energy.pair += mie_forces_sequential(mie, &geometry, config.species, &mut forces);
                }
                Interaction::Glue(glue) => {
                    let density = glue_density_sequential(glue, &geometry, config.species, n);
                    let embedding = glue.embed(&density, config.species, step)?;
                    energy.glue_embedding += embedding.energy();
                    energy.glue_pair += glue_forces_sequential(glue, &embedding, &geometry, config.species, &mut forces);
                    glue_density = Some(density);
                }
            }
        }

        energy.total = energy.pair + energy.glue_pair + energy.glue_embedding;
        Ok(Evaluation { energy, forces, glue_density })
    }
}

fn mie_forces_sequential(mie: &MieInteraction, geometry: &[PairGeometry], species: &[usize], forces: &mut [DVec3]) -> f64 {
    let mut energy = 0.0;
    for g in geometry {
        let (e, f_over_r) = mie.evaluate(species[g.i], species[g.j], g.r2);
        let f_vec = g.delta * f_over_r;
        energy += e;
        forces[g.j] += f_vec;
        forces[g.i] -= f_vec;
    }
    energy
}

/// First pass: every atom's density from the current neighbour pairs.
fn glue_density_sequential(glue: &GlueInteraction, geometry: &[PairGeometry], species: &[usize], n: usize) -> GlueDensity {
    let mut rho = vec![0.0; n];
    for g in geometry {
        let (to_i, to_j) = glue.pair_densities(species[g.i], species[g.j], g.r2.sqrt());
        rho[g.i] += to_i;
        rho[g.j] += to_j;
    }
    GlueDensity(rho)
}

/// Second pass: pair forces using the embedding derivatives of both atoms.
fn glue_forces_sequential(
    glue: &GlueInteraction,
    embedding: &Embedding,
    geometry: &[PairGeometry],
    species: &[usize],
    forces: &mut [DVec3],
) -> f64 {
    let mut energy = 0.0;
    for g in geometry {
        let r = g.r2.sqrt();
        let (e, f) = glue.pair_force(embedding, g.i, g.j, species[g.i], species[g.j], r);
        let f_vec = g.delta * (f / r);
        energy += e;
        forces[g.j] += f_vec;
        forces[g.i] -= f_vec;
    }
    energy
}
