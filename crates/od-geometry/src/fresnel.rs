//! Normalized Fresnel integrals
//! `C(x) = ∫₀ˣ cos(πt²/2) dt`, `S(x) = ∫₀ˣ sin(πt²/2) dt`.
//!
//! Power series below [`SERIES_LIMIT`], complex continued fraction above it.
//! Both branches are accurate to a few ulps of the result for all finite
//! arguments; the functions are odd, so only `|x|` is evaluated.

use std::f64::consts::{FRAC_PI_2, PI};

use num_complex::Complex64;

/// Crossover between the series and the continued fraction.
const SERIES_LIMIT: f64 = 1.5;
const MAX_ITER: usize = 200;
const EPS: f64 = 1e-16;
/// Stand-in for zero in the modified Lentz recurrence.
const FP_MIN: f64 = 1e-300;

/// `(C(x), S(x))`.
pub fn fresnel(x: f64) -> (f64, f64) {
    let ax = x.abs();
    let (c, s) = if ax == 0.0 {
        (0.0, 0.0)
    } else if ax < SERIES_LIMIT {
        series(ax)
    } else {
        continued_fraction(ax)
    };
    if x < 0.0 { (-c, -s) } else { (c, s) }
}

fn series(x: f64) -> (f64, f64) {
    let fact = FRAC_PI_2 * x * x;
    let mut term = x;
    let mut c = x;
    let mut s = 0.0;
    for k in 1..MAX_ITER {
        term *= fact / k as f64;
        let contrib = term / (2 * k + 1) as f64;
        match k % 4 {
            0 => c += contrib,
            1 => s += contrib,
            2 => c -= contrib,
            _ => s -= contrib,
        }
        if term < EPS * c.abs().max(s.abs()) {
            break;
        }
    }
    (c, s)
}

fn continued_fraction(x: f64) -> (f64, f64) {
    let pix2 = PI * x * x;
    let one = Complex64::new(1.0, 0.0);
    let mut b = Complex64::new(1.0, -pix2);
    let mut cc = Complex64::new(1.0 / FP_MIN, 0.0);
    let mut d = one / b;
    let mut h = d;
    let mut n = -1.0_f64;
    for _ in 2..=MAX_ITER {
        n += 2.0;
        let a = -n * (n + 1.0);
        b += 4.0;
        d = one / (d * a + b);
        cc = b + a / cc;
        let del = cc * d;
        h *= del;
        if (del.re - 1.0).abs() + del.im.abs() < EPS {
            break;
        }
    }
    h *= Complex64::new(x, -x);
    let cs = Complex64::new(0.5, 0.5) * (one - Complex64::from_polar(1.0, 0.5 * pix2) * h);
    (cs.re, cs.im)
}
