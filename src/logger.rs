use std::io::Write;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Observable a [`Logger`] samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    Temperature,
    KineticEnergy,
    PotentialEnergy,
    /// Kinetic plus potential energy.
    TotalEnergy,
    Coordinates,
    Velocities,
    Forces,
    GlueDensity,
    /// Coordinates kept for export with [`Logger::write_xyz`].
    Trajectory,
}

/// One sampled value.
#[derive(Debug, Clone, PartialEq)]
pub enum Sample {
    Scalar(f64),
    Scalars(Vec<f64>),
    Vectors(Vec<DVec3>),
}

/// Fully updated state of one step, as seen by the loggers.
#[derive(Debug, Clone, Copy)]
pub struct StateView<'a> {
    pub step: u64,
    pub temperature: f64,
    pub kinetic_energy: f64,
    pub potential_energy: f64,
    pub positions: &'a [DVec3],
    pub velocities: &'a [DVec3],
    pub forces: &'a [DVec3],
    pub glue_density: Option<&'a [f64]>,
}

impl Quantity {
    /// Extracts this quantity from `view`; `None` if the view does not carry it.
    pub fn sample(&self, view: &StateView<'_>) -> Option<Sample> {
        let sample = match self {
            Quantity::Temperature => Sample::Scalar(view.temperature),
            Quantity::KineticEnergy => Sample::Scalar(view.kinetic_energy),
            Quantity::PotentialEnergy => Sample::Scalar(view.potential_energy),
            Quantity::TotalEnergy => Sample::Scalar(view.kinetic_energy + view.potential_energy),
            Quantity::Coordinates | Quantity::Trajectory => Sample::Vectors(view.positions.to_vec()),
            Quantity::Velocities => Sample::Vectors(view.velocities.to_vec()),
            Quantity::Forces => Sample::Vectors(view.forces.to_vec()),
            Quantity::GlueDensity => Sample::Scalars(view.glue_density?.to_vec()),
        };
        Some(sample)
    }
}

/// Append-only record of one quantity, sampled every `interval` steps.
#[derive(Debug, Clone)]
pub struct Logger {
    quantity: Quantity,
    interval: u64,
    samples: Vec<(u64, Sample)>,
}

impl Logger {
    pub fn new(quantity: Quantity, interval: u64) -> Self {
        Self { quantity, interval, samples: Vec::new() }
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn interval(&self) -> u64 {
        self.interval
    }

    pub fn is_due(&self, step: u64) -> bool {
        self.interval > 0 && step % self.interval == 0
    }

    pub fn samples(&self) -> &[(u64, Sample)] {
        &self.samples
    }

    pub fn steps(&self) -> Vec<u64> {
        self.samples.iter().map(|(step, _)| *step).collect()
    }

    /// Values of a scalar logger, in sampling order.
    pub fn scalars(&self) -> Vec<f64> {
        self.samples
            .iter()
            .filter_map(|(_, s)| match s {
                Sample::Scalar(x) => Some(*x),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn record(&mut self, step: u64, sample: Sample) {
        self.samples.push((step, sample));
    }

    /// Writes every vector sample as one extended XYZ frame.
    pub fn write_xyz<W: Write>(&self, names: &[String], box_length: f64, mut out: W) -> Result<()> {
        for (step, sample) in &self.samples {
            let vectors = match sample {
                Sample::Vectors(v) => v,
                _ => {
                    return Err(Error::Configuration(format!(
                        "{:?} logger has no per-atom vectors to export", self.quantity
                    )))
                }
            };
            if vectors.len() != names.len() {
                return Err(Error::Configuration(format!(
                    "{} species names for {} atoms", names.len(), vectors.len()
                )));
            }
            writeln!(out, "{}", vectors.len())?;
            writeln!(
                out,
                "Lattice=\"{l} 0 0 0 {l} 0 0 0 {l}\" Properties=species:S:1:pos:R:3 step={s}",
                l = box_length,
                s = step
            )?;
            for (name, p) in names.iter().zip(vectors) {
                writeln!(out, "{} {:.8} {:.8} {:.8}", name, p.x, p.y, p.z)?;
            }
        }
        Ok(())
    }
}
