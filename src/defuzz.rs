//! Centroid defuzzification.

/// Centroid (center of gravity) of a sampled curve.
///
/// Computes `sum(x_i * degree_i) / sum(degree_i)` over the sample points.
/// Returns `None` when the curve carries no mass, which the engine maps to
/// its documented fallback (the output domain midpoint).
pub fn centroid(xs: &[f64], degrees: &[f64]) -> Option<f64> {
    debug_assert_eq!(xs.len(), degrees.len());

    let mass: f64 = degrees.iter().sum();
    if mass <= 0.0 {
        return None;
    }

    let weighted: f64 = xs.iter().zip(degrees).map(|(&x, &d)| x * d).sum();
    Some(weighted / mass)
}
