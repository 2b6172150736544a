use glam::DVec3;

use crate::cell::PeriodicBox;

/// Lifecycle of a simulation's integration loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegratorState {
    /// Initial forces computed, no step taken yet.
    Initialized,
    Stepping,
    /// `run` completed its steps; no further steps are accepted.
    Finished,
    /// A step returned an error. The state is kept for inspection and no
    /// further steps are accepted.
    Failed,
}

/// Velocity Verlet update rules.
#[derive(Debug, Clone, Copy)]
pub struct VelocityVerlet {
    pub timestep: f64,
}

impl VelocityVerlet {
    pub fn new(timestep: f64) -> Self {
        Self { timestep }
    }

    /// `x ← x + v dt + ½ (F/m) dt²`, wrapped back into the box.
    pub fn advance_positions(
        &self,
        cell: &PeriodicBox,
        positions: &mut [DVec3],
        velocities: &[DVec3],
        forces: &[DVec3],
        masses: &[f64],
    ) {
        let dt = self.timestep;
        for (((x, v), f), &m) in positions.iter_mut().zip(velocities).zip(forces).zip(masses) {
            *x = cell.wrap(*x + *v * dt + *f * (0.5 * dt * dt / m));
        }
    }

    /// `v ← v + ½ (F_old + F_new)/m dt`.
    pub fn advance_velocities(&self, velocities: &mut [DVec3], old_forces: &[DVec3], new_forces: &[DVec3], masses: &[f64]) {
        let half_dt = 0.5 * self.timestep;
        for (((v, f_old), f_new), &m) in velocities.iter_mut().zip(old_forces).zip(new_forces).zip(masses) {
            *v += (*f_old + *f_new) * (half_dt / m);
        }
    }
}
