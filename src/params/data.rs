/// Finnis-Sinclair table: (symbol, mass, d, A, beta, c, c0, c1, c2).
/// Lengths in Å, energies in eV, masses in amu.
pub const FINNIS_SINCLAIR_DATA: &[(&str, f64, f64, f64, f64, f64, f64, f64, f64)] = &[
    ("V",  50.9415, 3.692767, 2.010637, 0.0, 3.8,  -0.8816318,  1.4907756,  -0.3976370),
    ("Nb", 92.9064, 3.915354, 3.013789, 0.0, 4.2,  -1.5640104,  2.0055779,  -0.4663764),
    ("Ta", 180.948, 4.076980, 2.591061, 0.0, 4.2,   1.2157373,  0.0271471,  -0.1217350),
    ("Cr", 51.9961, 3.915720, 1.453418, 1.8, 2.9,  29.1429813, -23.3975027,  4.7578297),
    ("Mo", 95.95,   4.114825, 1.887117, 0.0, 3.25, 43.4475218, -31.9332978,  6.0804249),
    ("W",  183.84,  4.400224, 1.896373, 0.0, 3.25, 47.1346499, -33.7665655,  6.2541999),
    ("Fe", 55.845,  3.569745, 1.828905, 1.8, 3.4,   1.2371147, -0.3592185,  -0.0385607),
];

/// Lennard-Jones table: (symbol, mass, sigma, epsilon). Å, eV, amu.
pub const LENNARD_JONES_DATA: &[(&str, f64, f64, f64)] = &[
    ("Ne", 20.1797, 2.782, 0.003084),
    ("Ar", 39.948,  3.405, 0.010323),
    ("Kr", 83.798,  3.600, 0.014218),
    ("Xe", 131.293, 4.100, 0.019215),
];
