//! One-sample Kolmogorov–Smirnov statistic and its asymptotic p-value.
//!
//! The p-value uses the Kolmogorov limiting distribution with Stephens'
//! finite-sample correction `lambda = (sqrt(n) + 0.12 + 0.11 / sqrt(n)) * D`.
//! It is approximate for small `n`, which is good enough for a pass/fail
//! verdict at conventional significance levels.

use std::f64::consts::PI;

/// Largest gap between the empirical CDF of `sorted` and `cdf`.
///
/// Both sides of every step are checked (`D+` and `D-`), so the result is the
/// two-sided statistic. `sorted` must be ascending; an empty slice yields 0.
pub fn ks_statistic(sorted: &[f64], cdf: impl Fn(f64) -> f64) -> f64 {
    let n = sorted.len() as f64;
    let mut d = 0.0_f64;
    for (i, &x) in sorted.iter().enumerate() {
        let f = cdf(x);
        let d_plus = (i as f64 + 1.0) / n - f;
        let d_minus = f - i as f64 / n;
        d = d.max(d_plus).max(d_minus);
    }
    d.clamp(0.0, 1.0)
}

/// Survival function of the Kolmogorov distribution, `Q(lambda) = P(K > lambda)`.
pub fn kolmogorov_survival(lambda: f64) -> f64 {
    if lambda.is_nan() {
        return f64::NAN;
    }
    if lambda <= 0.0 {
        return 1.0;
    }
    if lambda < 1.18 {
        // Theta-function form converges fast for small lambda.
        let y = (-PI * PI / (8.0 * lambda * lambda)).exp();
        let cdf = (2.0 * PI).sqrt() / lambda * (y + y.powi(9) + y.powi(25) + y.powi(49));
        (1.0 - cdf).clamp(0.0, 1.0)
    } else {
        let x = (-2.0 * lambda * lambda).exp();
        (2.0 * (x - x.powi(4) + x.powi(9))).clamp(0.0, 1.0)
    }
}

/// Two-sided p-value for statistic `d` observed on `n` points.
pub fn ks_p_value(d: f64, n: usize) -> f64 {
    if n == 0 {
        return 1.0;
    }
    let sqrt_n = (n as f64).sqrt();
    let lambda = (sqrt_n + 0.12 + 0.11 / sqrt_n) * d;
    kolmogorov_survival(lambda)
}
