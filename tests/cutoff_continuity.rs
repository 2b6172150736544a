use std::sync::Arc;

use approx::assert_relative_eq;
use glue_md::{Atom, CutoffStrategy, MieInteraction, SpeciesTable};

fn reduced_units() -> SpeciesTable {
    SpeciesTable::from_atoms(&[Arc::new(Atom::new("X", 1.0).with_mie(1.0, 1.0))])
}

fn switched(activation: f64, cutoff: f64) -> MieInteraction {
    MieInteraction::lennard_jones(&reduced_units(), CutoffStrategy::Switched { activation, cutoff }).unwrap()
}

/// `(V, f)` at distance `r`, with `f` the radial force.
fn at(mie: &MieInteraction, r: f64) -> (f64, f64) {
    let (energy, f_over_r) = mie.evaluate(0, 0, r * r);
    (energy, f_over_r * r)
}

#[test]
fn test_switched_vanishes_smoothly_at_cutoff() {
    let mie = switched(2.0, 2.5);
    let (e_in, f_in) = at(&mie, 2.5 - 1e-6);
    assert!(e_in.abs() < 1e-12, "energy just inside cutoff: {}", e_in);
    assert!(f_in.abs() < 1e-10, "force just inside cutoff: {}", f_in);

    for r in [2.5, 2.5 + 1e-6, 3.0, 10.0] {
        assert_eq!(at(&mie, r), (0.0, 0.0));
    }
}

#[test]
fn test_switched_is_continuous_at_activation() {
    let mie = switched(2.0, 2.5);
    let (e_below, f_below) = at(&mie, 2.0 - 1e-9);
    let (e_above, f_above) = at(&mie, 2.0 + 1e-9);
    assert_relative_eq!(e_below, e_above, epsilon = 1e-8);
    assert_relative_eq!(f_below, f_above, epsilon = 1e-8);

    let raw = MieInteraction::lennard_jones(&reduced_units(), CutoffStrategy::None).unwrap();
    assert_eq!(at(&mie, 1.5), at(&raw, 1.5));
}

#[test]
fn test_switched_force_is_energy_derivative() {
    let mie = switched(2.0, 2.5);
    let h = 1e-6;
    for r in [2.05, 2.2, 2.31, 2.45] {
        let (_, force) = at(&mie, r);
        let numeric = -(at(&mie, r + h).0 - at(&mie, r - h).0) / (2.0 * h);
        assert_relative_eq!(force, numeric, epsilon = 1e-7);
    }
}

#[test]
fn test_shifted_energy_is_continuous_but_force_jumps() {
    let mie = MieInteraction::lennard_jones(
        &reduced_units(),
        CutoffStrategy::Shifted { cutoff: 2.5, shift: true },
    )
    .unwrap();
    let (e_in, f_in) = at(&mie, 2.5 - 1e-9);
    assert!(e_in.abs() < 1e-8);
    assert!(f_in < -1e-3);
    assert_eq!(at(&mie, 2.5 + 1e-9), (0.0, 0.0));
}

#[test]
fn test_named_strategies() {
    assert_eq!(
        CutoffStrategy::from_name("switched", 2.5, 2.0).unwrap(),
        CutoffStrategy::Switched { activation: 2.0, cutoff: 2.5 }
    );
    assert_eq!(
        CutoffStrategy::from_name("hard", 2.5, 0.0).unwrap(),
        CutoffStrategy::Shifted { cutoff: 2.5, shift: false }
    );
    assert!(CutoffStrategy::from_name("switched", 2.5, 3.0).is_err());
    assert!(matches!(
        CutoffStrategy::from_name("cosine", 2.5, 2.0),
        Err(glue_md::Error::UnsupportedCutoff(name)) if name == "cosine"
    ));
}
