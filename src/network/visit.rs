//! Visit-ratio computation.
//!
//! Solves `e·(P - I) = 0` together with the normalization `sum(e) = 1` as an
//! overdetermined `(K+1) x K` least-squares problem through an SVD. Singular
//! values below a rank tolerance are dropped, so reducible routing matrices
//! yield the minimum-norm solution instead of blowing up.

use nalgebra::{DMatrix, DVector};

/// Computes the visit ratios of a row-stochastic routing matrix.
///
/// Entries are made non-negative by taking absolute values and then
/// renormalized to sum to 1. If the solve degenerates, the uniform vector is
/// returned.
pub fn visit_ratios(routing: &[Vec<f64>]) -> Vec<f64> {
    let k = routing.len();
    if k == 0 {
        return Vec::new();
    }
    let uniform = vec![1.0 / k as f64; k];

    // Rows 0..K hold (P^T - I), row K is all ones.
    let a = DMatrix::from_fn(k + 1, k, |r, c| {
        if r == k {
            1.0
        } else {
            routing[c][r] - if r == c { 1.0 } else { 0.0 }
        }
    });
    let b = DVector::from_fn(k + 1, |r, _| if r == k { 1.0 } else { 0.0 });

    let svd = a.svd(true, true);
    let tol = f64::EPSILON * (k + 1) as f64 * svd.singular_values.max();
    let Ok(solution) = svd.solve(&b, tol) else {
        return uniform;
    };

    let abs: Vec<f64> = solution.iter().map(|x| x.abs()).collect();
    let total: f64 = abs.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return uniform;
    }
    abs.iter().map(|x| x / total).collect()
}
