use std::sync::Arc;

use glam::DVec3;
use glue_md::{
    finnis_sinclair, lennard_jones, Atom, Configuration, CutoffStrategy, ForceField, GlueInteraction,
    Interaction, MieInteraction, NeighbourFinder, PeriodicBox, SpeciesTable,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random positions with no two atoms closer than `min_dist`.
fn random_configuration(rng: &mut StdRng, n: usize, l: f64, min_dist: f64) -> Vec<DVec3> {
    let cell = PeriodicBox::new(l).unwrap();
    let mut positions: Vec<DVec3> = Vec::with_capacity(n);
    while positions.len() < n {
        let p = DVec3::new(rng.gen_range(0.0..l), rng.gen_range(0.0..l), rng.gen_range(0.0..l));
        if positions.iter().all(|&q| cell.minimum_image(p, q).length() >= min_dist) {
            positions.push(p);
        }
    }
    positions
}

fn mixed_species(n: usize) -> Vec<Arc<Atom>> {
    let w = Arc::new(finnis_sinclair("W").unwrap());
    let mo = Arc::new(finnis_sinclair("Mo").unwrap());
    let ar = Arc::new(lennard_jones("Ar").unwrap());
    (0..n)
        .map(|i| match i % 3 {
            0 => w.clone(),
            1 => mo.clone(),
            _ => ar.clone(),
        })
        .collect()
}

fn interactions(species: &SpeciesTable) -> Vec<Interaction> {
    let mie = MieInteraction::lennard_jones(species, CutoffStrategy::Switched { activation: 5.0, cutoff: 6.0 }).unwrap();
    let mut glue = GlueInteraction::new(species).unwrap();
    if species.index_of("W").is_some() && species.index_of("Mo").is_some() {
        glue = glue.with_pair_override("W", "Mo", 3.25, 45.0, -32.8, 6.17).unwrap();
    }
    vec![mie.into(), glue.into()]
}

#[test]
fn test_two_body_contributions_are_exact_negations() {
    let mut rng = StdRng::seed_from_u64(3);
    let cell = PeriodicBox::new(20.0).unwrap();
    let atoms = mixed_species(3);

    for &(a, b) in &[(0usize, 0usize), (0, 1), (2, 2), (0, 2)] {
        let pair_atoms = vec![atoms[a].clone(), atoms[b].clone()];
        let species = SpeciesTable::from_atoms(&pair_atoms);
        let ff = ForceField::new(interactions(&species), 1).unwrap();
        let mask = ff.adjacency_mask(&species);

        for _ in 0..20 {
            let r = rng.gen_range(2.2..5.5);
            let dir = DVec3::new(rng.gen_range(0.1..1.0), rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0))
                .normalize();
            let positions = vec![DVec3::splat(10.0), DVec3::splat(10.0) + dir * r];
            let list = NeighbourFinder::new(6.5, 1).unwrap().build(&positions, &cell, &mask, 0);
            let config = Configuration { positions: &positions, species: species.indices(), cell: &cell };
            let eval = ff.compute(config, &list, 0).unwrap();
            assert_eq!(eval.forces[0], -eval.forces[1]);
        }
    }
}

#[test]
fn test_total_force_vanishes_on_random_configurations() {
    let mut rng = StdRng::seed_from_u64(17);
    let l = 16.0;
    let cell = PeriodicBox::new(l).unwrap();

    for _ in 0..5 {
        let n = 90;
        let positions = random_configuration(&mut rng, n, l, 2.3);
        let atoms = mixed_species(n);
        let species = SpeciesTable::from_atoms(&atoms);

        for threads in [1, 3] {
            let ff = ForceField::new(interactions(&species), threads).unwrap();
            let mask = ff.adjacency_mask(&species);
            let list = NeighbourFinder::new(6.5, 1).unwrap().build(&positions, &cell, &mask, 0);
            let config = Configuration { positions: &positions, species: species.indices(), cell: &cell };
            let eval = ff.compute(config, &list, 0).unwrap();

            let net: DVec3 = eval.forces.iter().copied().sum();
            let scale: f64 = eval.forces.iter().map(|f| f.length()).sum::<f64>().max(1.0);
            assert!(net.length() < 1e-10 * scale, "net force {:?} with {} threads", net, threads);
        }
    }
}
