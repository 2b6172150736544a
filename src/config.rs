use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::neighbors::NeighbourStrategy;

/// Run parameters of a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Integration timestep in model time units.
    pub timestep: f64,
    /// Steps performed by [`crate::Simulation::run`].
    pub n_steps: u64,
    /// Neighbour list cutoff. Defaults to the largest interaction cutoff.
    pub neighbour_cutoff: Option<f64>,
    /// Rebuild the neighbour list every this many steps.
    pub neighbour_update_interval: u64,
    pub neighbour_strategy: NeighbourStrategy,
    /// 1 for serial evaluation, 0 to choose by system size.
    pub num_threads: usize,
    /// Steps between progress lines in the log; 0 disables them.
    pub progress_interval: u64,
    /// Seed of the thermostat and initial velocity generator.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            timestep: 1e-3,
            n_steps: 1000,
            neighbour_cutoff: None,
            neighbour_update_interval: 10,
            neighbour_strategy: NeighbourStrategy::Auto,
            num_threads: 0,
            progress_interval: 100,
            seed: 0,
        }
    }
}

impl SimulationConfig {
    pub fn new(timestep: f64, n_steps: u64) -> Self {
        Self { timestep, n_steps, ..Self::default() }
    }

    pub fn with_neighbour_cutoff(mut self, cutoff: f64) -> Self {
        self.neighbour_cutoff = Some(cutoff);
        self
    }

    pub fn with_neighbour_update_interval(mut self, interval: u64) -> Self {
        self.neighbour_update_interval = interval;
        self
    }

    pub fn with_neighbour_strategy(mut self, strategy: NeighbourStrategy) -> Self {
        self.neighbour_strategy = strategy;
        self
    }

    pub fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }

    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.timestep.is_finite() && self.timestep > 0.0) {
            return Err(Error::Configuration(format!("timestep must be positive, got {}", self.timestep)));
        }
        if self.neighbour_update_interval == 0 {
            return Err(Error::Configuration("neighbour update interval must be at least 1".into()));
        }
        Ok(())
    }
}
