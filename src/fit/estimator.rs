//! Maximum-likelihood estimation for every catalog family.
//!
//! Strategy per family:
//!
//! - closed form where the MLE has one (Normal, Exponential, Uniform)
//! - otherwise a Nelder–Mead search over an unconstrained reparameterization,
//!   with every parameter that has a closed-form conditional MLE profiled out
//!
//! Reparameterization conventions:
//! - positive parameters are searched on a log scale
//! - a lower-bounded support is written as `loc = min(x) - spread * exp(t)`,
//!   so every observation stays strictly inside the support
//! - each search coordinate lives in a fixed box; leaving it costs `+inf`
//!
//! Starting points come from the method of moments, so the search is fully
//! deterministic: the same sample and family always yield the same estimate.

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::domain::{FamilyFit, ParameterVector, Sample};
use crate::error::FitError;
use crate::fit::quality::evaluate;
use crate::math::{NelderMeadOptions, minimize};
use crate::models::{Family, FrozenDistribution};

/// Automatic fitting options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    /// Iteration cap for the simplex search. Hitting it yields `FitDivergence`
    /// unless the best point is pinned on the edge of its search box.
    pub max_iterations: usize,
    /// Relative objective tolerance.
    pub f_tol: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        let solver = NelderMeadOptions::default();
        Self {
            max_iterations: solver.max_iterations,
            f_tol: solver.f_tol,
        }
    }
}

impl FitOptions {
    fn solver(&self) -> NelderMeadOptions {
        NelderMeadOptions {
            max_iterations: self.max_iterations,
            f_tol: self.f_tol,
        }
    }
}

/// Search box for `t` in `loc = min - spread * exp(t)`.
const GAP_BOX: (f64, f64) = (-20.0, 8.0);
/// Search box for `ln(shape)`.
const SHAPE_BOX: (f64, f64) = (-7.0, 14.0);
/// Search box for `ln(scale / std_dev)` on unbounded-support families.
const SCALE_BOX: (f64, f64) = (-20.0, 10.0);

/// Initial simplex step in every log/gap coordinate.
const LOG_STEP: f64 = 0.3;

/// Distance to a box edge at which a capped search counts as pinned there.
const EDGE_TOL: f64 = LOG_STEP;

/// One coordinate of a likelihood search.
#[derive(Debug, Clone, Copy)]
struct Axis {
    start: f64,
    step: f64,
    bounds: (f64, f64),
}

impl Axis {
    /// Log/gap coordinate confined to `bounds`; the start is clamped into it.
    fn boxed(start: f64, bounds: (f64, f64)) -> Self {
        Self {
            start: start.clamp(bounds.0, bounds.1),
            step: LOG_STEP,
            bounds,
        }
    }

    fn free(start: f64, step: f64) -> Self {
        Self {
            start,
            step,
            bounds: (f64::NEG_INFINITY, f64::INFINITY),
        }
    }

    fn near_edge(&self, t: f64) -> bool {
        t - self.bounds.0 <= EDGE_TOL || self.bounds.1 - t <= EDGE_TOL
    }
}

/// Fit `family` to `sample` by maximum likelihood.
///
/// Errors:
/// - `DegenerateSample` for fewer than two observations or zero variance
/// - `FitDivergence` when the search does not converge within
///   `opts.max_iterations`, or ends on a non-finite likelihood
pub fn fit(sample: &Sample, family: Family, opts: &FitOptions) -> Result<ParameterVector, FitError> {
    if sample.len() < 2 {
        return Err(degenerate(family, "need at least 2 observations"));
    }
    if sample.distinct_count() < 2 || sample.variance() <= 0.0 {
        return Err(degenerate(family, "all observations are identical (zero variance)"));
    }

    let values = match family {
        Family::Normal => vec![sample.mean(), sample.std_dev()],
        Family::Exponential => vec![sample.min(), sample.mean() - sample.min()],
        Family::Uniform => vec![sample.min(), sample.range()],
        Family::Gamma => fit_gamma(sample, opts)?,
        // Chi-Square(df, loc, scale) is Gamma(df / 2, loc, 2 * scale).
        Family::ChiSquare => fit_gamma(sample, opts)
            .map(|g| vec![2.0 * g[0], g[1], 0.5 * g[2]])
            .map_err(|e| e.for_family(family))?,
        Family::Weibull => fit_weibull(sample, opts)?,
        Family::Lognormal => fit_lognormal(sample, opts)?,
        Family::Beta => fit_beta(sample, opts)?,
        Family::Logistic => fit_logistic(sample, opts)?,
        Family::Pareto => fit_pareto(sample, opts)?,
        Family::Rayleigh => fit_rayleigh(sample, opts)?,
        Family::StudentT => fit_student_t(sample, opts)?,
    };

    ParameterVector::new(family, values).map_err(|e| divergence(family, e.to_string()))
}

/// Fit every catalog family and score each successful fit.
///
/// Families are fitted in parallel; the output is in catalog order and a
/// failure for one family never affects the others.
pub fn fit_all(sample: &Sample, opts: &FitOptions) -> Vec<FamilyFit> {
    Family::ALL[..]
        .par_iter()
        .map(|&family| {
            let params = fit(sample, family, opts);
            if let Err(err) = &params {
                warn!(family = %family, error = %err, "automatic fit failed");
            }
            let quality = params
                .as_ref()
                .ok()
                .map(|p| evaluate(sample, family, p.values()));
            FamilyFit {
                family,
                params,
                quality,
            }
        })
        .collect()
}

fn degenerate(family: Family, reason: &str) -> FitError {
    FitError::DegenerateSample {
        family: family.display_name().to_string(),
        reason: reason.to_string(),
    }
}

fn divergence(family: Family, reason: impl Into<String>) -> FitError {
    FitError::FitDivergence {
        family: family.display_name().to_string(),
        reason: reason.into(),
    }
}

/// `exp(t)` when `t` is inside the search box.
fn boxed_exp(t: f64, (lo, hi): (f64, f64)) -> Option<f64> {
    (lo..=hi).contains(&t).then(|| t.exp())
}

/// Gap below the sample minimum, as `t = ln(gap / spread)`.
fn gap_coordinate(gap: f64, spread: f64) -> f64 {
    (gap / spread).ln()
}

/// `loc = min - spread * exp(t)`, or `None` outside the box.
fn loc_below_min(sample: &Sample, t: f64) -> Option<f64> {
    boxed_exp(t, GAP_BOX).map(|g| sample.min() - sample.spread() * g)
}

/// Population standardized moment of order `k` (3 = skewness, 4 = kurtosis).
fn standardized_moment(sample: &Sample, k: i32) -> f64 {
    let mean = sample.mean();
    let sd = sample.std_dev();
    let n = sample.len() as f64;
    sample
        .values()
        .iter()
        .map(|x| ((x - mean) / sd).powi(k))
        .sum::<f64>()
        / n
}

/// Negative log-likelihood of `params`; `+inf` when any point is outside the support.
fn negative_log_likelihood(family: Family, values: &[f64], params: &[f64]) -> f64 {
    let Ok(dist) = FrozenDistribution::new(family, params) else {
        return f64::INFINITY;
    };
    let mut total = 0.0;
    for &x in values {
        let lp = dist.ln_pdf(x);
        if !lp.is_finite() {
            return f64::INFINITY;
        }
        total -= lp;
    }
    total
}

/// Run the simplex search in `theta` space.
///
/// `decode` maps search coordinates to a full parameter vector (or `None`
/// when outside the feasible box). A search that runs out of iterations
/// still succeeds when its best point sits on the edge of a box: the
/// likelihood keeps improving toward a limit the box cuts off.
fn search<D>(
    sample: &Sample,
    family: Family,
    opts: &FitOptions,
    axes: &[Axis],
    decode: D,
) -> Result<Vec<f64>, FitError>
where
    D: Fn(&[f64]) -> Option<Vec<f64>>,
{
    let values = sample.values();
    let objective = |theta: &[f64]| {
        decode(theta).map_or(f64::INFINITY, |params| negative_log_likelihood(family, values, &params))
    };

    let start: Vec<f64> = axes.iter().map(|a| a.start).collect();
    let steps: Vec<f64> = axes.iter().map(|a| a.step).collect();
    if !objective(start.as_slice()).is_finite() {
        return Err(divergence(family, "no feasible starting point"));
    }

    let min = minimize(&objective, &start, &steps, &opts.solver())
        .map_err(|e| divergence(family, e.to_string()))?;
    let pinned = axes.iter().zip(&min.x).any(|(axis, &t)| axis.near_edge(t));
    if !min.converged && !pinned {
        return Err(divergence(
            family,
            format!("no convergence after {} iterations", min.iterations),
        ));
    }
    if !min.value.is_finite() {
        return Err(divergence(family, "likelihood is not finite at the optimum"));
    }

    debug!(
        family = %family,
        iterations = min.iterations,
        nll = min.value,
        converged = min.converged,
        "likelihood search finished"
    );

    decode(min.x.as_slice()).ok_or_else(|| divergence(family, "optimum left the feasible region"))
}

/// Shape and loc are searched; scale is profiled as `mean(x - loc) / shape`.
///
/// Chi-Square reuses this search through its Gamma form.
fn fit_gamma(sample: &Sample, opts: &FitOptions) -> Result<Vec<f64>, FitError> {
    let mean = sample.mean();
    let sd = sample.std_dev();
    let skew = standardized_moment(sample, 3);

    let a0 = if skew > 0.05 {
        (4.0 / (skew * skew)).clamp(0.05, 1e4)
    } else {
        100.0
    };
    let gap0 = (sample.min() - mean + a0.sqrt() * sd).max(0.05 * sample.spread());
    let axes = [
        Axis::boxed(a0.ln(), SHAPE_BOX),
        Axis::boxed(gap_coordinate(gap0, sample.spread()), GAP_BOX),
    ];

    let values = sample.values();
    search(sample, Family::Gamma, opts, &axes, |theta| {
        let shape = boxed_exp(theta[0], SHAPE_BOX)?;
        let loc = loc_below_min(sample, theta[1])?;
        let mean_gap = values.iter().map(|x| x - loc).sum::<f64>() / values.len() as f64;
        Some(vec![shape, loc, mean_gap / shape])
    })
}

/// Shape and loc are searched; scale is profiled as `mean((x - loc)^c)^(1/c)`.
fn fit_weibull(sample: &Sample, opts: &FitOptions) -> Result<Vec<f64>, FitError> {
    let gap0 = 0.1 * sample.spread();
    let cv = sample.std_dev() / (sample.mean() - sample.min() + gap0);
    let c0 = cv.powf(-1.086).clamp(0.2, 50.0);
    let axes = [
        Axis::boxed(c0.ln(), SHAPE_BOX),
        Axis::boxed(gap_coordinate(gap0, sample.spread()), GAP_BOX),
    ];

    let values = sample.values();
    search(sample, Family::Weibull, opts, &axes, |theta| {
        let c = boxed_exp(theta[0], SHAPE_BOX)?;
        let loc = loc_below_min(sample, theta[1])?;
        let moment = values.iter().map(|x| (x - loc).powf(c)).sum::<f64>() / values.len() as f64;
        let scale = moment.powf(1.0 / c);
        scale.is_finite().then(|| vec![c, loc, scale])
    })
}

/// Only loc is searched; `s` and `scale` follow from the logs of `x - loc`.
fn fit_lognormal(sample: &Sample, opts: &FitOptions) -> Result<Vec<f64>, FitError> {
    let mean = sample.mean();
    let sd = sample.std_dev();
    let skew = standardized_moment(sample, 3);

    let gap0 = if skew > 0.05 {
        // Invert skewness = (w + 2) sqrt(w - 1), w = exp(s^2).
        let a = 1.0 + 0.5 * skew * skew;
        let b = skew * (1.0 + 0.25 * skew * skew).sqrt();
        let w = ((a + b).cbrt() + (a - b).cbrt() - 1.0).max(1.0 + 1e-6);
        let scale0 = sd / (w * (w - 1.0)).sqrt();
        sample.min() - (mean - scale0 * w.sqrt())
    } else {
        10.0 * sample.spread()
    };
    let axes = [Axis::boxed(
        gap_coordinate(gap0.max(0.05 * sample.spread()), sample.spread()),
        GAP_BOX,
    )];

    let values = sample.values();
    search(sample, Family::Lognormal, opts, &axes, |theta| {
        let loc = loc_below_min(sample, theta[0])?;
        let n = values.len() as f64;
        let logs: Vec<f64> = values.iter().map(|x| (x - loc).ln()).collect();
        let mu = logs.iter().sum::<f64>() / n;
        let s = (logs.iter().map(|l| (l - mu).powi(2)).sum::<f64>() / n).sqrt();
        (s > 0.0).then(|| vec![s, loc, mu.exp()])
    })
}

/// Both shapes and both support gaps are searched (4-D).
fn fit_beta(sample: &Sample, opts: &FitOptions) -> Result<Vec<f64>, FitError> {
    let spread = sample.spread();
    let loc0 = sample.min() - 0.05 * spread;
    let scale0 = 1.1 * spread;
    let mz = (sample.mean() - loc0) / scale0;
    let vz = sample.variance() / (scale0 * scale0);
    let common = (mz * (1.0 - mz) / vz - 1.0).max(0.1);
    let a0 = (mz * common).clamp(0.1, 1e3);
    let b0 = ((1.0 - mz) * common).clamp(0.1, 1e3);
    let axes = [
        Axis::boxed(a0.ln(), SHAPE_BOX),
        Axis::boxed(b0.ln(), SHAPE_BOX),
        Axis::boxed(gap_coordinate(0.05 * spread, spread), GAP_BOX),
        Axis::boxed(gap_coordinate(0.05 * spread, spread), GAP_BOX),
    ];

    search(sample, Family::Beta, opts, &axes, |theta| {
        let a = boxed_exp(theta[0], SHAPE_BOX)?;
        let b = boxed_exp(theta[1], SHAPE_BOX)?;
        let loc = loc_below_min(sample, theta[2])?;
        let upper = sample.max() + spread * boxed_exp(theta[3], GAP_BOX)?;
        Some(vec![a, b, loc, upper - loc])
    })
}

/// loc and `ln(scale / sd)` are searched directly.
fn fit_logistic(sample: &Sample, opts: &FitOptions) -> Result<Vec<f64>, FitError> {
    let sd = sample.std_dev();
    let scale0 = sd * 3f64.sqrt() / std::f64::consts::PI;
    let axes = [
        Axis::free(sample.median(), 0.1 * sd),
        Axis::boxed((scale0 / sd).ln(), SCALE_BOX),
    ];

    search(sample, Family::Logistic, opts, &axes, |theta| {
        let scale = sd * boxed_exp(theta[1], SCALE_BOX)?;
        Some(vec![theta[0], scale])
    })
}

/// Only loc is searched; `scale = min - loc` and `b = n / sum(ln((x - loc) / scale))`.
fn fit_pareto(sample: &Sample, opts: &FitOptions) -> Result<Vec<f64>, FitError> {
    let values = sample.values();
    let min = sample.min();
    let axes = [Axis::boxed(0.0, GAP_BOX)];
    search(sample, Family::Pareto, opts, &axes, |theta| {
        let loc = loc_below_min(sample, theta[0])?;
        let scale = min - loc;
        let log_sum: f64 = values.iter().map(|x| ((x - loc) / scale).ln()).sum();
        let b = values.len() as f64 / log_sum;
        (b.is_finite() && b > 0.0).then(|| vec![b, loc, scale])
    })
}

/// Only loc is searched; `scale^2 = sum((x - loc)^2) / (2n)`.
fn fit_rayleigh(sample: &Sample, opts: &FitOptions) -> Result<Vec<f64>, FitError> {
    // Rayleigh mean = loc + scale * sqrt(pi / 2), std = scale * sqrt((4 - pi) / 2).
    let scale0 = sample.std_dev() / ((4.0 - std::f64::consts::PI) / 2.0).sqrt();
    let loc0 = sample.mean() - scale0 * (std::f64::consts::PI / 2.0).sqrt();
    let gap0 = (sample.min() - loc0).max(0.05 * sample.spread());
    let axes = [Axis::boxed(gap_coordinate(gap0, sample.spread()), GAP_BOX)];

    let values = sample.values();
    search(sample, Family::Rayleigh, opts, &axes, |theta| {
        let loc = loc_below_min(sample, theta[0])?;
        let sum_sq = values.iter().map(|x| (x - loc).powi(2)).sum::<f64>();
        Some(vec![loc, (sum_sq / (2.0 * values.len() as f64)).sqrt()])
    })
}

/// df, loc and `ln(scale / sd)` are searched (3-D).
fn fit_student_t(sample: &Sample, opts: &FitOptions) -> Result<Vec<f64>, FitError> {
    let sd = sample.std_dev();
    let excess = standardized_moment(sample, 4) - 3.0;
    let df0 = if excess > 0.05 {
        (6.0 / excess + 4.0).min(1e4)
    } else {
        30.0
    };
    let scale0 = sd * ((df0 - 2.0) / df0).sqrt();
    let axes = [
        Axis::boxed(df0.ln(), SHAPE_BOX),
        Axis::free(sample.median(), 0.1 * sd),
        Axis::boxed((scale0 / sd).ln(), SCALE_BOX),
    ];

    search(sample, Family::StudentT, opts, &axes, |theta| {
        let df = boxed_exp(theta[0], SHAPE_BOX)?;
        let scale = sd * boxed_exp(theta[2], SCALE_BOX)?;
        Some(vec![df, theta[1], scale])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::generate_sample;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn sample(values: &[f64]) -> Sample {
        Sample::new(values.to_vec()).unwrap()
    }

    fn nll(family: Family, s: &Sample, params: &[f64]) -> f64 {
        negative_log_likelihood(family, s.values(), params)
    }

    #[test]
    fn normal_closed_form() {
        let s = sample(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let p = fit(&s, Family::Normal, &FitOptions::default()).unwrap();
        assert_abs_diff_eq!(p.values()[0], 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.values()[1], 2f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn exponential_and_uniform_closed_forms() {
        let s = sample(&[2.0, 3.0, 7.0]);
        let e = fit(&s, Family::Exponential, &FitOptions::default()).unwrap();
        assert_eq!(e.values(), &[2.0, 2.0]);
        let u = fit(&s, Family::Uniform, &FitOptions::default()).unwrap();
        assert_eq!(u.values(), &[2.0, 5.0]);
    }

    #[test]
    fn degenerate_samples_are_rejected() {
        let opts = FitOptions::default();
        for family in Family::ALL {
            assert!(matches!(
                fit(&sample(&[4.2]), family, &opts),
                Err(FitError::DegenerateSample { .. })
            ));
            assert!(matches!(
                fit(&sample(&[4.2, 4.2, 4.2]), family, &opts),
                Err(FitError::DegenerateSample { .. })
            ));
        }
    }

    #[test]
    fn gamma_fit_preserves_mean_and_beats_start() {
        let s = generate_sample(Family::Gamma, &[3.0, 0.0, 2.0], 800, 11).unwrap();
        let p = fit(&s, Family::Gamma, &FitOptions::default()).unwrap();
        let [a, loc, scale] = p.values() else {
            panic!("gamma has three parameters");
        };
        // Profiled scale keeps the fitted mean on the sample mean.
        assert_abs_diff_eq!(loc + a * scale, s.mean(), epsilon = 1e-9);
        assert!(*loc < s.min());
        assert!(nll(Family::Gamma, &s, p.values()) <= nll(Family::Gamma, &s, &[3.0, 0.0, 2.0]));
    }

    #[test]
    fn chi_square_profiles_scale() {
        let s = generate_sample(Family::ChiSquare, &[4.0, 1.0, 1.0], 600, 5).unwrap();
        let p = fit(&s, Family::ChiSquare, &FitOptions::default()).unwrap();
        let [df, loc, scale] = p.values() else {
            panic!("chi-square has three parameters");
        };
        assert_abs_diff_eq!(loc + df * scale, s.mean(), epsilon = 1e-9);
    }

    #[test]
    fn every_fit_keeps_observations_in_support() {
        let s = generate_sample(Family::Gamma, &[2.5, 1.0, 1.5], 300, 42).unwrap();
        let opts = FitOptions::default();
        for family in Family::ALL {
            let p = fit(&s, family, &opts).unwrap_or_else(|e| panic!("{family}: {e}"));
            assert!(
                nll(family, &s, p.values()).is_finite(),
                "{family} fit puts data outside its support"
            );
        }
    }

    #[test]
    fn every_family_fits_the_worked_example() {
        let s = sample(&[3.0, 4.0, 4.0, 5.0, 5.0, 5.0, 6.0, 6.0, 7.0]);
        let opts = FitOptions::default();
        for family in Family::ALL {
            let p = fit(&s, family, &opts).unwrap_or_else(|e| panic!("{family}: {e}"));
            assert!(nll(family, &s, p.values()).is_finite(), "{family}");
        }
    }

    #[test]
    fn chi_square_and_gamma_reach_the_same_likelihood() {
        let samples = [
            sample(&[3.0, 4.0, 4.0, 5.0, 5.0, 5.0, 6.0, 6.0, 7.0]),
            sample(&[1.0, 2.0, 3.0, 4.0, 5.0]),
            generate_sample(Family::ChiSquare, &[3.0, 0.0, 1.0], 400, 17).unwrap(),
        ];
        let opts = FitOptions::default();
        for s in &samples {
            let g = fit(s, Family::Gamma, &opts).unwrap();
            let c = fit(s, Family::ChiSquare, &opts).unwrap();
            assert_eq!(c.values()[0], 2.0 * g.values()[0]);
            assert_eq!(c.values()[1], g.values()[1]);
            assert_relative_eq!(
                nll(Family::ChiSquare, s, c.values()),
                nll(Family::Gamma, s, g.values()),
                max_relative = 1e-6
            );
        }
    }

    #[test]
    fn chi_square_failure_names_chi_square() {
        let s = generate_sample(Family::ChiSquare, &[3.0, 0.0, 1.0], 200, 4).unwrap();
        let opts = FitOptions {
            max_iterations: 1,
            ..FitOptions::default()
        };
        match fit(&s, Family::ChiSquare, &opts) {
            Err(FitError::FitDivergence { family, .. }) => assert_eq!(family, "Chi-Square"),
            other => panic!("expected FitDivergence, got {other:?}"),
        }
    }

    #[test]
    fn capped_search_on_a_box_edge_is_accepted() {
        let axis = Axis::boxed(3.0, SHAPE_BOX);
        assert!(!axis.near_edge(3.0));
        assert!(axis.near_edge(SHAPE_BOX.1));
        assert!(axis.near_edge(SHAPE_BOX.0 + 0.5 * EDGE_TOL));
        assert!(!Axis::free(1e300, 1.0).near_edge(1e300));
        assert_eq!(Axis::boxed(99.0, GAP_BOX).start, GAP_BOX.1);

        // Light tails push the Student-t df toward its limit; two iterations
        // are enough once the search starts there.
        let s = sample(&[3.0, 4.0, 4.0, 5.0, 5.0, 5.0, 6.0, 6.0, 7.0]);
        let axes = [Axis::boxed(SHAPE_BOX.1, SHAPE_BOX)];
        let opts = FitOptions {
            max_iterations: 2,
            ..FitOptions::default()
        };
        let p = search(&s, Family::StudentT, &opts, &axes, |theta| {
            Some(vec![boxed_exp(theta[0], SHAPE_BOX)?, s.mean(), s.std_dev()])
        })
        .unwrap();
        assert!(p[0] > 1e5);
    }

    #[test]
    fn search_families_beat_true_parameters() {
        let s = generate_sample(Family::Lognormal, &[0.5, 0.0, 1.0], 500, 3).unwrap();
        let p = fit(&s, Family::Lognormal, &FitOptions::default()).unwrap();
        assert!(nll(Family::Lognormal, &s, p.values()) <= nll(Family::Lognormal, &s, &[0.5, 0.0, 1.0]));

        let s = generate_sample(Family::StudentT, &[5.0, 2.0, 1.0], 500, 8).unwrap();
        let p = fit(&s, Family::StudentT, &FitOptions::default()).unwrap();
        assert!(nll(Family::StudentT, &s, p.values()) <= nll(Family::StudentT, &s, &[5.0, 2.0, 1.0]));
        assert_abs_diff_eq!(p.values()[1], 2.0, epsilon = 0.2);
    }

    #[test]
    fn pareto_scale_touches_sample_minimum() {
        let s = generate_sample(Family::Pareto, &[3.0, 0.0, 1.0], 400, 9).unwrap();
        let p = fit(&s, Family::Pareto, &FitOptions::default()).unwrap();
        let [_, loc, scale] = p.values() else {
            panic!("pareto has three parameters");
        };
        assert_abs_diff_eq!(loc + scale, s.min(), epsilon = 1e-9);
    }

    #[test]
    fn fit_is_deterministic() {
        let s = generate_sample(Family::Weibull, &[1.5, 0.0, 2.0], 200, 1).unwrap();
        let opts = FitOptions::default();
        let a = fit(&s, Family::Weibull, &opts).unwrap();
        let b = fit(&s, Family::Weibull, &opts).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn tiny_iteration_budget_diverges() {
        let s = generate_sample(Family::Beta, &[2.0, 3.0, 0.0, 1.0], 200, 2).unwrap();
        let opts = FitOptions {
            max_iterations: 2,
            ..FitOptions::default()
        };
        assert!(matches!(
            fit(&s, Family::Beta, &opts),
            Err(FitError::FitDivergence { .. })
        ));
    }

    #[test]
    fn fit_all_reports_in_catalog_order() {
        let s = sample(&[3.0, 4.0, 4.0, 5.0, 5.0, 5.0, 6.0, 6.0, 7.0]);
        let fits = fit_all(&s, &FitOptions::default());
        assert_eq!(fits.len(), Family::ALL.len());
        for (fit, family) in fits.iter().zip(Family::ALL) {
            assert_eq!(fit.family, family);
            assert_eq!(fit.params.is_ok(), fit.quality.is_some());
        }
        let normal = fits[0].params.as_ref().unwrap();
        assert_abs_diff_eq!(normal.values()[0], 5.0, epsilon = 1e-12);
    }
}
