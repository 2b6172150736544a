pub mod data;

use crate::atom::{Atom, GlueParameters};
use data::{FINNIS_SINCLAIR_DATA, LENNARD_JONES_DATA};

/// Boltzmann constant in eV/K, for converting a target temperature in Kelvin
/// into the energy units used by the built-in tables.
pub const BOLTZMANN_EV: f64 = 8.617333262e-5;

/// Returns the Finnis-Sinclair species record for a chemical symbol.
pub fn finnis_sinclair(symbol: &str) -> Option<Atom> {
    FINNIS_SINCLAIR_DATA
        .iter()
        .find(|&&(id, ..)| id == symbol)
        .map(|&(id, mass, d, a, beta, c, c0, c1, c2)| {
            Atom::new(id, mass).with_glue(GlueParameters { d, beta, a, c, c0, c1, c2 })
        })
}

/// Returns a Lennard-Jones species record for a noble gas symbol.
pub fn lennard_jones(symbol: &str) -> Option<Atom> {
    LENNARD_JONES_DATA
        .iter()
        .find(|&&(id, ..)| id == symbol)
        .map(|&(id, mass, sigma, epsilon)| Atom::new(id, mass).with_mie(sigma, epsilon))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tungsten_lookup() {
        let w = finnis_sinclair("W").unwrap();
        let glue = w.glue.unwrap();
        assert_eq!(glue.d, 4.400224);
        assert_eq!(glue.a, 1.896373);
        assert_eq!(glue.beta, 0.0);
        assert_eq!(glue.c, 3.25);
        assert_eq!(w.sigma, 0.0);
        assert!(finnis_sinclair("Xx").is_none());
    }

    #[test]
    fn test_argon_lookup() {
        let ar = lennard_jones("Ar").unwrap();
        assert_eq!(ar.sigma, 3.405);
        assert!(ar.glue.is_none());
    }
}
