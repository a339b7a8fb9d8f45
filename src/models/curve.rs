//! Density curves for the rendering sink.

use crate::domain::Sample;
use crate::error::FitError;
use crate::models::{Family, FrozenDistribution};

/// Evenly spaced `(x, pdf(x))` pairs over `[domain_min, domain_max]` (inclusive).
///
/// `num_points == 0` yields an empty curve and `num_points == 1` the single
/// point at `domain_min`. Fails with `InvalidParameters` for invalid params or
/// a non-finite / inverted domain.
pub fn curve(
    family: Family,
    params: &[f64],
    domain_min: f64,
    domain_max: f64,
    num_points: usize,
) -> Result<Vec<(f64, f64)>, FitError> {
    let dist = FrozenDistribution::new(family, params)?;
    sample_curve(&dist, domain_min, domain_max, num_points)
}

/// Same as [`curve`] for an already-validated distribution.
pub fn sample_curve(
    dist: &FrozenDistribution,
    domain_min: f64,
    domain_max: f64,
    num_points: usize,
) -> Result<Vec<(f64, f64)>, FitError> {
    if !(domain_min.is_finite() && domain_max.is_finite()) || domain_max < domain_min {
        return Err(dist.family().invalid(format!(
            "invalid curve domain [{domain_min}, {domain_max}]"
        )));
    }

    let mut out = Vec::with_capacity(num_points);
    match num_points {
        0 => {}
        1 => out.push((domain_min, dist.pdf(domain_min))),
        n => {
            for i in 0..n {
                let u = i as f64 / (n as f64 - 1.0);
                let x = if i == n - 1 {
                    domain_max
                } else {
                    domain_min + u * (domain_max - domain_min)
                };
                out.push((x, dist.pdf(x)));
            }
        }
    }
    Ok(out)
}

/// Default plotting domain: the sample range padded by 10% of its spread.
pub fn default_domain(sample: &Sample) -> (f64, f64) {
    let pad = 0.1 * sample.spread();
    (sample.min() - pad, sample.max() + pad)
}
