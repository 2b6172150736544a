//! Error type shared by every fallible operation of the crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The simulation was assembled with inconsistent or out-of-range values.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A cutoff strategy name outside `none`, `shifted` and `switched`.
    #[error("unsupported cutoff strategy '{0}'")]
    UnsupportedCutoff(String),

    #[error("negative glue density {density} on atom {atom} at step {step}")]
    NegativeGlueDensity { atom: usize, step: u64, density: f64 },

    #[error("atoms {i} and {j} are at zero separation at step {step}")]
    CoincidentAtoms { i: usize, j: usize, step: u64 },

    /// A NaN or infinity appeared; `atom` is the first offending atom when known.
    #[error("non-finite {quantity} at step {step} (atom {atom:?})")]
    NonFinite { quantity: &'static str, atom: Option<usize>, step: u64 },

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
