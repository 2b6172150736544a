//! Heats a bcc tungsten crystal with an Andersen thermostat, then lets it
//! run at constant energy and writes the trajectory to `tungsten.xyz`.

use std::fs::File;
use std::io::BufWriter;
use std::sync::Arc;

use glam::DVec3;
use glue_md::{
    finnis_sinclair, GlueInteraction, Logger, PeriodicBox, Quantity, Simulation, SimulationConfig, SpeciesTable,
    Thermostat, BOLTZMANN_EV,
};

fn main() -> glue_md::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let a = 3.1652;
    let cells = 4;
    let mut positions = Vec::new();
    for x in 0..cells {
        for y in 0..cells {
            for z in 0..cells {
                let corner = DVec3::new(x as f64, y as f64, z as f64) * a;
                positions.push(corner);
                positions.push(corner + DVec3::splat(0.5 * a));
            }
        }
    }
    let tungsten = Arc::new(finnis_sinclair("W").ok_or_else(|| {
        glue_md::Error::Configuration("no Finnis-Sinclair parameters for W".into())
    })?);
    let atoms = vec![tungsten; positions.len()];
    let species = SpeciesTable::from_atoms(&atoms);
    let cell = PeriodicBox::new(cells as f64 * a)?;
    let target = 600.0 * BOLTZMANN_EV;

    let config = SimulationConfig::new(0.1, 400)
        .with_neighbour_cutoff(4.8)
        .with_neighbour_update_interval(10)
        .with_progress_interval(50);

    let mut heating = Simulation::builder(cell, atoms.clone(), positions)
        .with_interaction(GlueInteraction::new(&species)?)
        .with_initial_temperature(target)
        .with_thermostat(Thermostat::Andersen { target, collision_probability: 0.01 })
        .with_config(config.clone())
        .build()?;
    heating.run()?;

    let mut production = Simulation::builder(cell, atoms, heating.positions().to_vec())
        .with_interaction(GlueInteraction::new(&species)?)
        .with_velocities(heating.velocities().to_vec())
        .with_logger("energy", Logger::new(Quantity::TotalEnergy, 10))
        .with_logger("temperature", Logger::new(Quantity::Temperature, 10))
        .with_logger("trajectory", Logger::new(Quantity::Trajectory, 20))
        .with_config(config)
        .build()?;
    let summary = production.run()?;

    let temperatures = production.logger("temperature").map(Logger::scalars).unwrap_or_default();
    let mean = temperatures.iter().sum::<f64>() / temperatures.len().max(1) as f64;
    println!("mean temperature: {:.1} K", mean / BOLTZMANN_EV);
    println!(
        "total energy: {:.6} -> {:.6} eV",
        summary.initial_total_energy, summary.final_total_energy
    );

    if let Some(trajectory) = production.logger("trajectory") {
        let out = BufWriter::new(File::create("tungsten.xyz")?);
        trajectory.write_xyz(&production.atom_names(), cell.length(), out)?;
    }
    Ok(())
}
