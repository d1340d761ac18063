//! Small dense linear solves used by the circle and elevation fits.
//!
//! Systems here are at most 4×4, so plain Gaussian elimination with partial
//! pivoting is both exact enough and allocation-light.

/// Relative pivot magnitude below which a system is treated as singular.
const PIVOT_EPS: f64 = 1e-12;

/// Solve `a · x = b` in place.  Returns `None` for (numerically) singular
/// systems.
pub fn solve_dense(a: &mut [Vec<f64>], b: &mut [f64]) -> Option<Vec<f64>> {
    let n = b.len();
    debug_assert_eq!(a.len(), n);

    let scale = a
        .iter()
        .flat_map(|row| row.iter())
        .fold(0.0_f64, |m, v| m.max(v.abs()));
    if scale == 0.0 || !scale.is_finite() {
        return None;
    }

    for col in 0..n {
        // Partial pivot.
        let pivot = (col..n).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot][col].abs() <= PIVOT_EPS * scale {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..n {
            let f = a[row][col] / a[col][col];
            if f == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= f * a[col][k];
            }
            b[row] -= f * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    x.iter().all(|v| v.is_finite()).then_some(x)
}

/// Least-squares polynomial fit `y ≈ Σ cₖ·tᵏ` of the given degree.
///
/// The degree is lowered automatically when there are not enough samples
/// (or the normal matrix is singular); coefficients are returned lowest
/// order first, padded with zeros up to `degree + 1` entries.  Returns `None`
/// only when `samples` is empty.
pub fn polyfit(samples: &[(f64, f64)], degree: usize) -> Option<Vec<f64>> {
    if samples.is_empty() {
        return None;
    }
    let mut deg = degree.min(samples.len() - 1);
    loop {
        let m = deg + 1;
        let mut ata = vec![vec![0.0; m]; m];
        let mut atb = vec![0.0; m];
        for &(t, y) in samples {
            let mut powers = vec![1.0; m];
            for k in 1..m {
                powers[k] = powers[k - 1] * t;
            }
            for r in 0..m {
                atb[r] += powers[r] * y;
                for c in 0..m {
                    ata[r][c] += powers[r] * powers[c];
                }
            }
        }
        if let Some(mut coeffs) = solve_dense(&mut ata, &mut atb) {
            coeffs.resize(degree + 1, 0.0);
            return Some(coeffs);
        }
        if deg == 0 {
            // Unreachable in practice: a 1×1 normal matrix is the sample count.
            let mean = samples.iter().map(|&(_, y)| y).sum::<f64>() / samples.len() as f64;
            let mut coeffs = vec![0.0; degree + 1];
            coeffs[0] = mean;
            return Some(coeffs);
        }
        deg -= 1;
    }
}
