use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Cubic simulation box, periodic along all three axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodicBox {
    length: f64,
}

impl PeriodicBox {
    pub fn new(length: f64) -> Result<Self> {
        if !(length.is_finite() && length > 0.0) {
            return Err(Error::Configuration(format!(
                "box length must be positive, got {}", length
            )));
        }
        Ok(Self { length })
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn volume(&self) -> f64 {
        self.length.powi(3)
    }

    /// Returns `b - a` under the minimum image convention, each component in (-L/2, L/2].
    pub fn minimum_image(&self, a: DVec3, b: DVec3) -> DVec3 {
        minimum_image_vector(a, b, self.length)
    }

    /// Reduces every coordinate into [0, L).
    pub fn wrap(&self, position: DVec3) -> DVec3 {
        wrap_into_box(position, self.length)
    }
}

fn minimum_image_component(d: f64, length: f64) -> f64 {
    let mut x = d - length * (d / length).round();
    if x <= -0.5 * length {
        x += length;
    } else if x > 0.5 * length {
        x -= length;
    }
    x
}

/// Shortest periodic displacement from `a` to `b` in a cubic box of edge `length`.
pub fn minimum_image_vector(a: DVec3, b: DVec3, length: f64) -> DVec3 {
    let diff = b - a;
    DVec3::new(
        minimum_image_component(diff.x, length),
        minimum_image_component(diff.y, length),
        minimum_image_component(diff.z, length),
    )
}

fn wrap_component(x: f64, length: f64) -> f64 {
    let w = x.rem_euclid(length);
    // rem_euclid can round up to exactly `length` for tiny negative inputs
    if w >= length { 0.0 } else { w }
}

pub fn wrap_into_box(position: DVec3, length: f64) -> DVec3 {
    DVec3::new(
        wrap_component(position.x, length),
        wrap_component(position.y, length),
        wrap_component(position.z, length),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimum_image_across_boundary() {
        let cell = PeriodicBox::new(10.0).unwrap();
        let p1 = DVec3::new(1.0, 1.0, 1.0);
        let p2 = DVec3::new(9.0, 9.0, 9.0);

        let d = cell.minimum_image(p1, p2);
        assert_eq!(d, DVec3::new(-2.0, -2.0, -2.0));
        assert!((d.length() - (3.0 * 2.0f64.powi(2)).sqrt()).abs() < 1e-9);
        assert_eq!(cell.minimum_image(p2, p1), DVec3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn test_minimum_image_half_box_is_positive() {
        let d = minimum_image_vector(DVec3::ZERO, DVec3::new(5.0, -5.0, 15.0), 10.0);
        assert_eq!(d, DVec3::new(5.0, 5.0, 5.0));
    }

    #[test]
    fn test_minimum_image_far_images() {
        let d = minimum_image_vector(DVec3::ZERO, DVec3::new(31.0, -29.5, 0.25), 10.0);
        assert!((d - DVec3::new(1.0, 0.5, 0.25)).length() < 1e-12);
    }

    #[test]
    fn test_wrap_into_box() {
        let cell = PeriodicBox::new(4.0).unwrap();
        let w = cell.wrap(DVec3::new(-1.0, 4.0, 9.5));
        assert_eq!(w, DVec3::new(3.0, 0.0, 1.5));

        let tiny = cell.wrap(DVec3::new(-1e-18, 0.0, 0.0));
        assert!(tiny.x >= 0.0 && tiny.x < 4.0);
    }

    #[test]
    fn test_rejects_non_positive_length() {
        assert!(PeriodicBox::new(0.0).is_err());
        assert!(PeriodicBox::new(-3.0).is_err());
        assert!(PeriodicBox::new(f64::NAN).is_err());
    }
}
