//! # glue-md
//!
//! `glue-md` is a parallel molecular dynamics engine for point particles in a
//! cubic periodic box, built around the Finnis-Sinclair "glue" potential and
//! the Mie / Lennard-Jones pair family.
//!
//! ## Features
//! - **Neighbour lists**: periodic cell lists rebuilt every K steps, with an O(N²) reference.
//! - **Interactions**: Mie pair potentials with none/shifted/switched cutoffs, and the
//!   two-pass glue (embedded-atom) potential.
//! - **Parallel**: force and density passes run on Rayon with ordered reduction.
//! - **Integration**: velocity Verlet with optional thermostats and in-memory loggers.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use glam::DVec3;
//! use glue_md::{
//!     finnis_sinclair, GlueInteraction, Logger, PeriodicBox, Quantity, Simulation,
//!     SimulationConfig, SpeciesTable,
//! };
//!
//! let tungsten = Arc::new(finnis_sinclair("W").unwrap());
//! let atoms = vec![tungsten.clone(), tungsten];
//! let positions = vec![DVec3::new(5.0, 5.0, 5.0), DVec3::new(8.0, 5.0, 5.0)];
//! let glue = GlueInteraction::new(&SpeciesTable::from_atoms(&atoms)).unwrap();
//!
//! let mut simulation = Simulation::builder(PeriodicBox::new(20.0).unwrap(), atoms, positions)
//!     .with_interaction(glue)
//!     .with_logger("energy", Logger::new(Quantity::TotalEnergy, 10))
//!     .with_config(SimulationConfig::new(0.01, 100).with_neighbour_cutoff(5.0))
//!     .build()
//!     .unwrap();
//! simulation.run().unwrap();
//! assert_eq!(simulation.logger("energy").unwrap().samples().len(), 11);
//! ```

pub mod atom;
pub mod cell;
pub mod config;
pub mod error;
pub mod forcefield;
pub mod integrator;
pub mod logger;
pub mod neighbors;
pub mod params;
pub mod simulation;
pub mod spatial;
pub mod thermostat;

pub use atom::{Atom, GlueParameters, SpeciesTable};
pub use cell::{minimum_image_vector, wrap_into_box, PeriodicBox};
pub use config::SimulationConfig;
pub use error::{Error, Result};
pub use forcefield::{
    Configuration, CutoffStrategy, EnergyTerms, Evaluation, ForceField, GlueDensity, GlueDensityPolicy,
    GlueInteraction, Interaction, MieInteraction,
};
pub use integrator::{IntegratorState, VelocityVerlet};
pub use logger::{Logger, Quantity, Sample};
pub use neighbors::{AdjacencyMask, NeighbourFinder, NeighbourList, NeighbourStrategy};
pub use params::{finnis_sinclair, lennard_jones, BOLTZMANN_EV};
pub use simulation::{RunSummary, Simulation, SimulationBuilder};
pub use thermostat::Thermostat;
