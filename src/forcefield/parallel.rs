use glam::DVec3;
use rayon::prelude::*;

use crate::error::Result;
use crate::forcefield::{
    pair_geometry, Configuration, Embedding, EnergyTerms, Evaluation, ForceField, GlueDensity, GlueInteraction,
    Interaction, MieInteraction, PairGeometry,
};
use crate::neighbors::NeighbourList;

/// Contiguous chunk length giving one chunk per worker thread.
fn chunk_len(len: usize) -> usize {
    let threads = rayon::current_num_threads().max(1);
    ((len + threads - 1) / threads).max(1)
}

/// Sums per-chunk partials in chunk order so the result does not depend on scheduling.
fn reduce_partials(partials: Vec<(f64, Vec<DVec3>)>, forces: &mut [DVec3]) -> f64 {
    let mut energy = 0.0;
    for (e, partial) in partials {
        energy += e;
        for (a, b) in forces.iter_mut().zip(partial.iter()) {
            *a += *b;
        }
    }
    energy
}

impl ForceField {
    pub(crate) fn compute_parallel(&self, config: Configuration<'_>, neighbours: &NeighbourList, step: u64) -> Result<Evaluation> {
        let n = config.positions.len();
        let geometry = neighbours
            .pairs()
            .par_iter()
            .map(|&(i, j)| pair_geometry(&config, i, j, step))
            .collect::<Result<Vec<_>>>()?;

        let mut energy = EnergyTerms::default();
        let mut forces = vec![DVec3::ZERO; n];
        let mut glue_density = None;

        for interaction in &self.interactions {
            match interaction {
                Interaction::Mie(mie) => {
                    energy.pair += mie_forces_parallel(mie, &geometry, config.species, &mut forces);
                }
                Interaction::Glue(glue) => {
                    let density = glue_density_parallel(glue, &geometry, config.species, n);
                    let embedding = glue.embed(&density, config.species, step)?;
                    energy.glue_embedding += embedding.energy();
                    energy.glue_pair += glue_forces_parallel(glue, &embedding, &geometry, config.species, &mut forces);
                    glue_density = Some(density);
                }
            }
        }

        energy.total = energy.pair + energy.glue_pair + energy.glue_embedding;
        Ok(Evaluation { energy, forces, glue_density })
    }
}

fn mie_forces_parallel(mie: &MieInteraction, geometry: &[PairGeometry], species: &[usize], forces: &mut [DVec3]) -> f64 {
    let n = forces.len();
    let partials: Vec<(f64, Vec<DVec3>)> = geometry
        .par_chunks(chunk_len(geometry.len()))
        .map(|chunk| {
            let mut acc_e = 0.0;
            let mut acc_f = vec![DVec3::ZERO; n];
            for g in chunk {
                let (e, f_over_r) = mie.evaluate(species[g.i], species[g.j], g.r2);
                let f_vec = g.delta * f_over_r;
                acc_e += e;
                acc_f[g.j] += f_vec;
                acc_f[g.i] -= f_vec;
            }
            (acc_e, acc_f)
        })
        .collect();
    reduce_partials(partials, forces)
}

fn glue_density_parallel(glue: &GlueInteraction, geometry: &[PairGeometry], species: &[usize], n: usize) -> GlueDensity {
    let partials: Vec<Vec<f64>> = geometry
        .par_chunks(chunk_len(geometry.len()))
        .map(|chunk| {
            let mut rho = vec![0.0; n];
            for g in chunk {
                let (to_i, to_j) = glue.pair_densities(species[g.i], species[g.j], g.r2.sqrt());
                rho[g.i] += to_i;
                rho[g.j] += to_j;
            }
            rho
        })
        .collect();

    let mut rho = vec![0.0; n];
    for partial in partials {
        for (a, b) in rho.iter_mut().zip(partial.iter()) {
            *a += *b;
        }
    }
    GlueDensity(rho)
}

fn glue_forces_parallel(
    glue: &GlueInteraction,
    embedding: &Embedding,
    geometry: &[PairGeometry],
    species: &[usize],
    forces: &mut [DVec3],
) -> f64 {
    let n = forces.len();
    let partials: Vec<(f64, Vec<DVec3>)> = geometry
        .par_chunks(chunk_len(geometry.len()))
        .map(|chunk| {
            let mut acc_e = 0.0;
            let mut acc_f = vec![DVec3::ZERO; n];
            for g in chunk {
                let r = g.r2.sqrt();
                let (e, f) = glue.pair_force(embedding, g.i, g.j, species[g.i], species[g.j], r);
                let f_vec = g.delta * (f / r);
                acc_e += e;
                acc_f[g.j] += f_vec;
                acc_f[g.i] -= f_vec;
            }
            (acc_e, acc_f)
        })
        .collect();
    reduce_partials(partials, forces)
}
