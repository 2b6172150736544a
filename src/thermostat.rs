use glam::DVec3;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Velocity control applied once per step, after the velocity update.
///
/// Targets are temperatures in model energy units; converting from Kelvin is
/// left to the caller (see [`crate::params::BOLTZMANN_EV`]).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Thermostat {
    /// Velocities are left untouched (NVE).
    #[default]
    None,
    /// With probability `probability` per step, rescale every velocity so the
    /// instantaneous temperature equals `target`.
    Rescale { target: f64, probability: f64 },
    /// Weak coupling: `λ = sqrt(1 + coupling (target/T - 1))` every step.
    Berendsen { target: f64, coupling: f64 },
    /// Each atom independently redraws its velocity from the Maxwell-Boltzmann
    /// distribution with probability `collision_probability` per step.
    Andersen { target: f64, collision_probability: f64 },
}

impl Thermostat {
    pub fn validate(&self) -> Result<()> {
        let (target, rate, name) = match *self {
            Thermostat::None => return Ok(()),
            Thermostat::Rescale { target, probability } => (target, probability, "probability"),
            Thermostat::Berendsen { target, coupling } => (target, coupling, "coupling"),
            Thermostat::Andersen { target, collision_probability } => (target, collision_probability, "collision probability"),
        };
        if !(target.is_finite() && target >= 0.0) {
            return Err(Error::Configuration(format!("thermostat target must be non-negative, got {}", target)));
        }
        if !(0.0..=1.0).contains(&rate) {
            return Err(Error::Configuration(format!("thermostat {} must lie in [0, 1], got {}", name, rate)));
        }
        Ok(())
    }

    /// Applies the thermostat. Returns true if any velocity changed.
    pub fn apply<R: Rng>(&self, velocities: &mut [DVec3], masses: &[f64], rng: &mut R) -> bool {
        match *self {
            Thermostat::None => false,
            Thermostat::Rescale { target, probability } => {
                if rng.gen::<f64>() >= probability {
                    return false;
                }
                let current = temperature(velocities, masses);
                if current <= 0.0 {
                    return false;
                }
                scale(velocities, (target / current).sqrt());
                true
            }
            Thermostat::Berendsen { target, coupling } => {
                let current = temperature(velocities, masses);
                if current <= 0.0 {
                    return false;
                }
                let lambda = (1.0 + coupling * (target / current - 1.0)).max(0.0).sqrt();
                scale(velocities, lambda);
                true
            }
            Thermostat::Andersen { target, collision_probability } => {
                let mut changed = false;
                for (v, &m) in velocities.iter_mut().zip(masses) {
                    if rng.gen::<f64>() < collision_probability {
                        *v = gaussian_velocity(rng, (target / m).sqrt());
                        changed = true;
                    }
                }
                changed
            }
        }
    }
}

fn scale(velocities: &mut [DVec3], lambda: f64) {
    for v in velocities {
        *v *= lambda;
    }
}

fn gaussian_velocity<R: Rng>(rng: &mut R, std_dev: f64) -> DVec3 {
    DVec3::new(
        rng.sample::<f64, _>(StandardNormal),
        rng.sample::<f64, _>(StandardNormal),
        rng.sample::<f64, _>(StandardNormal),
    ) * std_dev
}

pub fn kinetic_energy(velocities: &[DVec3], masses: &[f64]) -> f64 {
    velocities
        .iter()
        .zip(masses)
        .map(|(v, &m)| 0.5 * m * v.length_squared())
        .sum()
}

/// Instantaneous temperature `2 KE / (3N)` in energy units.
pub fn temperature(velocities: &[DVec3], masses: &[f64]) -> f64 {
    if velocities.is_empty() {
        return 0.0;
    }
    2.0 * kinetic_energy(velocities, masses) / (3.0 * velocities.len() as f64)
}

/// Maxwell-Boltzmann velocities with zero total momentum, rescaled to exactly `target`.
pub fn maxwell_boltzmann<R: Rng>(masses: &[f64], target: f64, rng: &mut R) -> Vec<DVec3> {
    let mut velocities: Vec<DVec3> = masses
        .iter()
        .map(|&m| gaussian_velocity(rng, (target / m).sqrt()))
        .collect();

    let total_mass: f64 = masses.iter().sum();
    if velocities.len() > 1 && total_mass > 0.0 {
        let momentum: DVec3 = velocities.iter().zip(masses).map(|(v, &m)| *v * m).sum();
        let drift = momentum / total_mass;
        for v in &mut velocities {
            *v -= drift;
        }
    }

    let current = temperature(&velocities, masses);
    if current > 0.0 {
        scale(&mut velocities, (target / current).sqrt());
    }
    velocities
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_maxwell_boltzmann_exact_temperature() {
        let mut rng = StdRng::seed_from_u64(7);
        let masses = vec![2.0; 64];
        let v = maxwell_boltzmann(&masses, 0.3, &mut rng);
        assert_relative_eq!(temperature(&v, &masses), 0.3, epsilon = 1e-12);
        let momentum: DVec3 = v.iter().map(|v| *v * 2.0).sum();
        assert!(momentum.length() < 1e-10);
    }

    #[test]
    fn test_rescale_always_hits_target() {
        let mut rng = StdRng::seed_from_u64(1);
        let masses = vec![1.0; 10];
        let mut v = maxwell_boltzmann(&masses, 2.0, &mut rng);
        let thermostat = Thermostat::Rescale { target: 0.5, probability: 1.0 };
        assert!(thermostat.apply(&mut v, &masses, &mut rng));
        assert_relative_eq!(temperature(&v, &masses), 0.5, epsilon = 1e-12);

        let never = Thermostat::Rescale { target: 5.0, probability: 0.0 };
        assert!(!never.apply(&mut v, &masses, &mut rng));
        assert_relative_eq!(temperature(&v, &masses), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_berendsen_moves_toward_target() {
        let mut rng = StdRng::seed_from_u64(2);
        let masses = vec![1.0; 10];
        let mut v = maxwell_boltzmann(&masses, 2.0, &mut rng);
        Thermostat::Berendsen { target: 1.0, coupling: 0.1 }.apply(&mut v, &masses, &mut rng);
        assert_relative_eq!(temperature(&v, &masses), 1.9, epsilon = 1e-12);
    }

    #[test]
    fn test_andersen_full_collision_redraws_every_velocity() {
        let masses = vec![1.0, 2.0, 4.0, 8.0];
        let start = vec![DVec3::splat(10.0); 4];
        let thermostat = Thermostat::Andersen { target: 0.5, collision_probability: 1.0 };

        let mut first = start.clone();
        let mut rng = StdRng::seed_from_u64(11);
        assert!(thermostat.apply(&mut first, &masses, &mut rng));
        assert!(first.iter().zip(&start).all(|(new, old)| new != old));

        let mut second = start.clone();
        let mut rng = StdRng::seed_from_u64(11);
        thermostat.apply(&mut second, &masses, &mut rng);
        assert_eq!(first, second);

        let mut untouched = start.clone();
        let never = Thermostat::Andersen { target: 0.5, collision_probability: 0.0 };
        assert!(!never.apply(&mut untouched, &masses, &mut rng));
        assert_eq!(untouched, start);
    }

    #[test]
    fn test_none_is_a_no_op() {
        let mut rng = StdRng::seed_from_u64(3);
        let masses = vec![1.0; 3];
        let mut v = vec![DVec3::X, DVec3::Y, DVec3::Z];
        assert!(!Thermostat::None.apply(&mut v, &masses, &mut rng));
        assert_eq!(v, vec![DVec3::X, DVec3::Y, DVec3::Z]);
    }

    #[test]
    fn test_validation() {
        assert!(Thermostat::Rescale { target: 1.0, probability: 1.5 }.validate().is_err());
        assert!(Thermostat::Berendsen { target: -1.0, coupling: 0.1 }.validate().is_err());
        assert!(Thermostat::Andersen { target: 1.0, collision_probability: 0.01 }.validate().is_ok());
    }
}
