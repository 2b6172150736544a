use std::sync::Arc;
use std::time::Instant;

use glam::DVec3;
use glue_md::{
    finnis_sinclair, Configuration, ForceField, GlueInteraction, NeighbourFinder, NeighbourList, PeriodicBox,
    SpeciesTable,
};

const LATTICE: f64 = 3.1652;

fn bcc_positions(cells: usize) -> Vec<DVec3> {
    let mut positions = Vec::with_capacity(2 * cells * cells * cells);
    for x in 0..cells {
        for y in 0..cells {
            for z in 0..cells {
                let corner = DVec3::new(x as f64, y as f64, z as f64) * LATTICE;
                positions.push(corner);
                positions.push(corner + DVec3::splat(0.5 * LATTICE));
            }
        }
    }
    positions
}

fn measure_avg_time(ff: &ForceField, config: Configuration<'_>, list: &NeighbourList, iters: usize) -> f64 {
    let start = Instant::now();
    for _ in 0..iters {
        ff.compute(config, list, 0).expect("force evaluation failed");
    }
    start.elapsed().as_secs_f64() * 1000.0 / iters as f64
}

fn main() {
    let cutoff = 4.6;
    let thread_counts = [1, 2, 4, 8, 12, 16];
    let cell_counts = [8, 12, 16];

    println!("\nThread Scalability Benchmark (W bcc, neighbour cutoff = {})", cutoff);
    println!("{:>10} | {:>10} | {:>10} | {:>8}", "Atoms", "Threads", "Time (ms)", "Speedup");
    println!("{:-<50}", "");

    for &cells in &cell_counts {
        let positions = bcc_positions(cells);
        let n = positions.len();
        let cell = PeriodicBox::new(cells as f64 * LATTICE).expect("invalid box");
        let atoms = vec![Arc::new(finnis_sinclair("W").expect("missing W")); n];
        let species = SpeciesTable::from_atoms(&atoms);
        let config = Configuration { positions: &positions, species: species.indices(), cell: &cell };

        let build = |threads| {
            let glue = GlueInteraction::new(&species).expect("glue parameters");
            ForceField::new(vec![glue.into()], threads).expect("thread pool")
        };
        let serial = build(1);
        let mask = serial.adjacency_mask(&species);
        let list = NeighbourFinder::new(cutoff, 1).expect("finder").build(&positions, &cell, &mask, 0);

        let t_serial = measure_avg_time(&serial, config, &list, 5);
        println!("{:>10} | {:>10} | {:>10.2} | {:>7.2}x", n, 1, t_serial, 1.0);

        for &threads in &thread_counts[1..] {
            let t = measure_avg_time(&build(threads), config, &list, 5);
            println!("{:>10} | {:>10} | {:>10.2} | {:>7.2}x", "", threads, t, t_serial / t);
        }
        println!("{:-<50}", "");
    }
}
