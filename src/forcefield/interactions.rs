//! Closed-form pieces of the supported potentials.
//!
//! Radial forces follow the convention `f(r) = -dV/dr`: a positive value
//! pushes the two atoms apart.

/// Normalisation of the Mie potential, `(m/(m-n)) (m/n)^(n/(m-n))`. Equals 4 for 12-6.
pub fn mie_prefactor(repulsive: f64, attractive: f64) -> f64 {
    let m = repulsive;
    let n = attractive;
    (m / (m - n)) * (m / n).powf(n / (m - n))
}

/// Returns `(V(r), f(r) / r)` of the raw Mie form, from the squared distance.
#[inline]
pub fn mie(r2: f64, sigma: f64, epsilon: f64, repulsive: f64, attractive: f64, prefactor: f64) -> (f64, f64) {
    let s2 = sigma * sigma / r2;
    let s_m = s2.powf(0.5 * repulsive);
    let s_n = s2.powf(0.5 * attractive);
    let energy = prefactor * epsilon * (s_m - s_n);
    let f_over_r = prefactor * epsilon * (repulsive * s_m - attractive * s_n) / r2;
    (energy, f_over_r)
}

/// Quintic switch `S(x) = 1 - 10x³ + 15x⁴ - 6x⁵` between `r_on` and `r_off`,
/// returned with its derivative with respect to `r`.
#[inline]
pub fn quintic_switch(r: f64, r_on: f64, r_off: f64) -> (f64, f64) {
    if r <= r_on {
        return (1.0, 0.0);
    }
    if r >= r_off {
        return (0.0, 0.0);
    }
    let width = r_off - r_on;
    let x = (r - r_on) / width;
    let x2 = x * x;
    let x3 = x2 * x;
    let sw = 1.0 - 10.0 * x3 + 15.0 * x3 * x - 6.0 * x3 * x2;
    let dsw = (-30.0 * x2 + 60.0 * x3 - 30.0 * x3 * x) / width;
    (sw, dsw)
}

/// Glue density donated at distance `r`, `(r-d)² + β(r-d)³/d`, zero for `r >= d`.
#[inline]
pub fn glue_density(r: f64, d: f64, beta: f64) -> f64 {
    if r >= d {
        return 0.0;
    }
    let x = r - d;
    x * x + beta * x * x * x / d
}

#[inline]
pub fn glue_density_derivative(r: f64, d: f64, beta: f64) -> f64 {
    if r >= d {
        return 0.0;
    }
    let x = r - d;
    2.0 * x + 3.0 * beta * x * x / d
}

/// Finnis-Sinclair pair term `(r-c)² (c0 + c1 r + c2 r²)`, zero beyond `c`.
#[inline]
pub fn glue_pair(r: f64, c: f64, c0: f64, c1: f64, c2: f64) -> f64 {
    if r > c {
        return 0.0;
    }
    let x = r - c;
    x * x * (c0 + c1 * r + c2 * r * r)
}

#[inline]
pub fn glue_pair_derivative(r: f64, c: f64, c0: f64, c1: f64, c2: f64) -> f64 {
    if r > c {
        return 0.0;
    }
    let x = r - c;
    2.0 * x * (c0 + c1 * r + c2 * r * r) + x * x * (c1 + 2.0 * c2 * r)
}

/// Embedding energy `-A sqrt(ρ)`. The caller guarantees `ρ >= 0`.
#[inline]
pub fn embedding_energy(rho: f64, a: f64) -> f64 {
    -a * rho.sqrt()
}

/// `-A / (2 sqrt(ρ))`, taken as zero for an atom with no density.
#[inline]
pub fn embedding_derivative(rho: f64, a: f64) -> f64 {
    if rho == 0.0 {
        0.0
    } else {
        -0.5 * a / rho.sqrt()
    }
}
