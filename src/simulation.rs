use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::DVec3;
use indexmap::IndexMap;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::atom::{Atom, SpeciesTable};
use crate::cell::PeriodicBox;
use crate::config::SimulationConfig;
use crate::error::{Error, Result};
use crate::forcefield::{Configuration, EnergyTerms, Evaluation, ForceField, Interaction};
use crate::integrator::{IntegratorState, VelocityVerlet};
use crate::logger::{Logger, Quantity, StateView};
use crate::neighbors::{AdjacencyMask, NeighbourFinder, NeighbourList};
use crate::thermostat::{self, Thermostat};

/// Assembles and validates a [`Simulation`].
pub struct SimulationBuilder {
    cell: PeriodicBox,
    atoms: Vec<Arc<Atom>>,
    positions: Vec<DVec3>,
    velocities: Option<Vec<DVec3>>,
    initial_temperature: Option<f64>,
    interactions: Vec<Interaction>,
    thermostat: Thermostat,
    loggers: IndexMap<String, Logger>,
    config: SimulationConfig,
}

impl SimulationBuilder {
    /// Starts from the initial state supplied by a lattice builder: one species
    /// record and one position per atom.
    pub fn new(cell: PeriodicBox, atoms: Vec<Arc<Atom>>, positions: Vec<DVec3>) -> Self {
        Self {
            cell,
            atoms,
            positions,
            velocities: None,
            initial_temperature: None,
            interactions: Vec::new(),
            thermostat: Thermostat::None,
            loggers: IndexMap::new(),
            config: SimulationConfig::default(),
        }
    }

    pub fn with_velocities(mut self, velocities: Vec<DVec3>) -> Self {
        self.velocities = Some(velocities);
        self
    }

    /// Draws Maxwell-Boltzmann velocities at `temperature` (energy units)
    /// when no explicit velocities are given.
    pub fn with_initial_temperature(mut self, temperature: f64) -> Self {
        self.initial_temperature = Some(temperature);
        self
    }

    pub fn with_interaction(mut self, interaction: impl Into<Interaction>) -> Self {
        self.interactions.push(interaction.into());
        self
    }

    pub fn with_thermostat(mut self, thermostat: Thermostat) -> Self {
        self.thermostat = thermostat;
        self
    }

    pub fn with_logger(mut self, name: impl Into<String>, logger: Logger) -> Self {
        self.loggers.insert(name.into(), logger);
        self
    }

    pub fn with_config(mut self, config: SimulationConfig) -> Self {
        self.config = config;
        self
    }

    /// Validates everything, wraps positions into the box and evaluates the
    /// initial forces. No step is taken.
    pub fn build(self) -> Result<Simulation> {
        let n = self.atoms.len();
        self.config.validate()?;
        self.thermostat.validate()?;

        if self.positions.len() != n {
            return Err(Error::Configuration(format!(
                "{} positions for {} atoms", self.positions.len(), n
            )));
        }
        if let Some(velocities) = &self.velocities {
            if velocities.len() != n {
                return Err(Error::Configuration(format!(
                    "{} velocities for {} atoms", velocities.len(), n
                )));
            }
        }
        if let Some(atom) = self.atoms.iter().find(|a| !(a.mass.is_finite() && a.mass > 0.0)) {
            return Err(Error::Configuration(format!(
                "species '{}' has non-positive mass {}", atom.name, atom.mass
            )));
        }
        if self.interactions.is_empty() {
            return Err(Error::Configuration("no interaction configured".into()));
        }

        let species = SpeciesTable::from_atoms(&self.atoms);
        let force_field = ForceField::new(self.interactions, self.config.num_threads)?;
        force_field.check_species(&species)?;

        let half_box = 0.5 * self.cell.length();
        for interaction in force_field.interactions() {
            if let Some(cutoff) = interaction.cutoff() {
                if cutoff >= half_box {
                    return Err(Error::Configuration(format!(
                        "interaction cutoff {} must be below half the box length {}", cutoff, half_box
                    )));
                }
            }
        }
        let cutoff = match self.config.neighbour_cutoff.or_else(|| force_field.max_cutoff()) {
            Some(cutoff) => cutoff,
            None => {
                return Err(Error::Configuration(
                    "no interaction has a finite cutoff; set a neighbour cutoff".into(),
                ))
            }
        };
        if cutoff >= half_box {
            return Err(Error::Configuration(format!(
                "neighbour cutoff {} must be below half the box length {}", cutoff, half_box
            )));
        }
        let finder = NeighbourFinder::new(cutoff, self.config.neighbour_update_interval)?
            .with_strategy(self.config.neighbour_strategy)
            .with_serial(self.config.num_threads == 1);
        finder.check_box(&self.cell)?;
        force_field.check_neighbour_cutoff(cutoff);

        for (name, logger) in &self.loggers {
            if logger.interval() == 0 {
                return Err(Error::Configuration(format!("logger '{}' has a zero interval", name)));
            }
            if logger.quantity() == Quantity::GlueDensity && !force_field.has_glue() {
                return Err(Error::Configuration(format!(
                    "logger '{}' samples glue density but no glue interaction is configured", name
                )));
            }
        }

        let masses: Vec<f64> = self.atoms.iter().map(|a| a.mass).collect();
        let positions: Vec<DVec3> = self.positions.iter().map(|&p| self.cell.wrap(p)).collect();
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let velocities = match (self.velocities, self.initial_temperature) {
            (Some(v), _) => v,
            (None, Some(t)) => thermostat::maxwell_boltzmann(&masses, t, &mut rng),
            (None, None) => vec![DVec3::ZERO; n],
        };
        let mask = force_field.adjacency_mask(&species);

        let mut simulation = Simulation {
            cell: self.cell,
            atoms: self.atoms,
            species,
            masses,
            positions,
            velocities,
            forces: vec![DVec3::ZERO; n],
            glue_density: None,
            energy: EnergyTerms::default(),
            force_field,
            finder,
            mask,
            neighbours: NeighbourList::default(),
            integrator: VelocityVerlet::new(self.config.timestep),
            thermostat: self.thermostat,
            rng,
            loggers: self.loggers,
            config: self.config,
            step: 0,
            state: IntegratorState::Initialized,
        };
        simulation.update_forces()?;
        simulation.sample_loggers();
        Ok(simulation)
    }
}

/// Summary returned by [`Simulation::run`].
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    /// Steps taken by this call.
    pub steps: u64,
    pub initial_total_energy: f64,
    pub final_total_energy: f64,
    pub final_temperature: f64,
    pub elapsed: Duration,
}

/// Complete mutable state of a run, advanced one velocity Verlet step at a time.
pub struct Simulation {
    cell: PeriodicBox,
    atoms: Vec<Arc<Atom>>,
    species: SpeciesTable,
    masses: Vec<f64>,
    positions: Vec<DVec3>,
    velocities: Vec<DVec3>,
    forces: Vec<DVec3>,
    glue_density: Option<Vec<f64>>,
    energy: EnergyTerms,
    force_field: ForceField,
    finder: NeighbourFinder,
    mask: AdjacencyMask,
    neighbours: NeighbourList,
    integrator: VelocityVerlet,
    thermostat: Thermostat,
    rng: StdRng,
    loggers: IndexMap<String, Logger>,
    config: SimulationConfig,
    step: u64,
    state: IntegratorState,
}

impl Simulation {
    pub fn builder(cell: PeriodicBox, atoms: Vec<Arc<Atom>>, positions: Vec<DVec3>) -> SimulationBuilder {
        SimulationBuilder::new(cell, atoms, positions)
    }

    /// Refreshes the neighbour list (if due) and recomputes forces at the current positions.
    fn update_forces(&mut self) -> Result<()> {
        let list = self.force_field.install(|| {
            self.finder
                .find_neighbours(&self.positions, &self.cell, &self.mask, self.step, &self.neighbours)
        });
        self.neighbours = list;

        let config = Configuration {
            positions: &self.positions,
            species: self.species.indices(),
            cell: &self.cell,
        };
        let Evaluation { energy, forces, glue_density } = self.force_field.compute(config, &self.neighbours, self.step)?;
        self.energy = energy;
        self.forces = forces;
        self.glue_density = glue_density.map(|d| d.into_inner());
        Ok(())
    }

    fn sample_loggers(&mut self) {
        let kinetic_energy = thermostat::kinetic_energy(&self.velocities, &self.masses);
        let view = StateView {
            step: self.step,
            temperature: thermostat::temperature(&self.velocities, &self.masses),
            kinetic_energy,
            potential_energy: self.energy.total,
            positions: &self.positions,
            velocities: &self.velocities,
            forces: &self.forces,
            glue_density: self.glue_density.as_deref(),
        };
        for logger in self.loggers.values_mut() {
            if !logger.is_due(view.step) {
                continue;
            }
            if let Some(sample) = logger.quantity().sample(&view) {
                logger.record(view.step, sample);
            }
        }
    }

    fn check_running(&self) -> Result<()> {
        match self.state {
            IntegratorState::Initialized | IntegratorState::Stepping => Ok(()),
            IntegratorState::Finished => Err(Error::Configuration("simulation has already finished".into())),
            IntegratorState::Failed => Err(Error::Configuration("simulation stopped after a failed step".into())),
        }
    }

    /// Performs one velocity Verlet step: positions, neighbours and forces,
    /// velocities, thermostat, then loggers. An error moves the simulation to
    /// [`IntegratorState::Failed`] with the forces of the last good step kept.
    pub fn step(&mut self) -> Result<()> {
        self.check_running()?;
        self.state = IntegratorState::Stepping;
        self.step += 1;

        self.integrator
            .advance_positions(&self.cell, &mut self.positions, &self.velocities, &self.forces, &self.masses);

        let old_forces = std::mem::take(&mut self.forces);
        if let Err(err) = self.update_forces() {
            self.forces = old_forces;
            self.state = IntegratorState::Failed;
            return Err(err);
        }
        self.integrator
            .advance_velocities(&mut self.velocities, &old_forces, &self.forces, &self.masses);

        if self.thermostat.apply(&mut self.velocities, &self.masses, &mut self.rng) {
            debug!("step {}: thermostat adjusted velocities", self.step);
        }

        self.sample_loggers();

        if self.config.progress_interval > 0 && self.step % self.config.progress_interval == 0 {
            info!(
                "{:>8} | {:>12.5} | {:>16.6} | {:>16.6}",
                self.step,
                self.temperature(),
                self.energy.total,
                self.total_energy()
            );
        }
        Ok(())
    }

    /// Steps until `config.n_steps` steps have been taken in total, counting
    /// any earlier manual [`Simulation::step`] calls, then moves to
    /// [`IntegratorState::Finished`]. A failing step leaves the simulation in
    /// [`IntegratorState::Failed`].
    pub fn run(&mut self) -> Result<RunSummary> {
        self.check_running()?;
        let start = Instant::now();
        let first_step = self.step;
        let initial_total_energy = self.total_energy();

        info!("{:=^72}", format!(" glue-md v{} ", env!("CARGO_PKG_VERSION")));
        info!(
            "atoms: {} | box: {:.4} | cutoff: {:.4} | dt: {} | threads: {}",
            self.atoms.len(),
            self.cell.length(),
            self.finder.cutoff(),
            self.integrator.timestep,
            self.force_field.num_threads()
        );
        info!("{:>8} | {:>12} | {:>16} | {:>16}", "step", "temperature", "potential", "total");

        while self.step < self.config.n_steps {
            self.step()?;
        }
        self.state = IntegratorState::Finished;

        let summary = RunSummary {
            steps: self.step - first_step,
            initial_total_energy,
            final_total_energy: self.total_energy(),
            final_temperature: self.temperature(),
            elapsed: start.elapsed(),
        };
        info!(
            "finished {} steps in {:.3?}, total energy {:.6} -> {:.6}",
            summary.steps, summary.elapsed, summary.initial_total_energy, summary.final_total_energy
        );
        Ok(summary)
    }

    pub fn cell(&self) -> &PeriodicBox {
        &self.cell
    }

    pub fn atoms(&self) -> &[Arc<Atom>] {
        &self.atoms
    }

    pub fn species(&self) -> &SpeciesTable {
        &self.species
    }

    /// Species name of every atom, e.g. for trajectory export.
    pub fn atom_names(&self) -> Vec<String> {
        self.atoms.iter().map(|a| a.name.clone()).collect()
    }

    pub fn masses(&self) -> &[f64] {
        &self.masses
    }

    pub fn positions(&self) -> &[DVec3] {
        &self.positions
    }

    pub fn velocities(&self) -> &[DVec3] {
        &self.velocities
    }

    pub fn forces(&self) -> &[DVec3] {
        &self.forces
    }

    pub fn glue_density(&self) -> Option<&[f64]> {
        self.glue_density.as_deref()
    }

    pub fn energy(&self) -> EnergyTerms {
        self.energy
    }

    pub fn potential_energy(&self) -> f64 {
        self.energy.total
    }

    pub fn kinetic_energy(&self) -> f64 {
        thermostat::kinetic_energy(&self.velocities, &self.masses)
    }

    pub fn total_energy(&self) -> f64 {
        self.kinetic_energy() + self.energy.total
    }

    pub fn temperature(&self) -> f64 {
        thermostat::temperature(&self.velocities, &self.masses)
    }

    pub fn neighbours(&self) -> &NeighbourList {
        &self.neighbours
    }

    pub fn neighbour_finder(&self) -> &NeighbourFinder {
        &self.finder
    }

    pub fn force_field(&self) -> &ForceField {
        &self.force_field
    }

    pub fn loggers(&self) -> &IndexMap<String, Logger> {
        &self.loggers
    }

    pub fn logger(&self, name: &str) -> Option<&Logger> {
        self.loggers.get(name)
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn current_step(&self) -> u64 {
        self.step
    }

    pub fn state(&self) -> IntegratorState {
        self.state
    }
}
