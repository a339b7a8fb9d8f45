//! Nelder–Mead minimization on top of `argmin`.
//!
//! The estimator always searches an unconstrained coordinate space and lets
//! the objective return `+inf` for infeasible points, so the solver never
//! needs to know about positivity or support constraints.
//!
//! - NaN objective values are treated as `+inf`
//! - same start + steps + objective => same result
//! - hitting the iteration cap is reported via `converged = false`

use argmin::core::{CostFunction, Error, Executor, State, TerminationReason, TerminationStatus};
use argmin::solver::neldermead::NelderMead;

/// Stopping rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NelderMeadOptions {
    /// Hard cap on simplex iterations.
    pub max_iterations: usize,
    /// Standard deviation of the simplex's objective values, relative to the
    /// objective at the starting point.
    pub f_tol: f64,
}

impl Default for NelderMeadOptions {
    fn default() -> Self {
        Self {
            max_iterations: 800,
            f_tol: 1e-10,
        }
    }
}

/// Result of a minimization run.
#[derive(Debug, Clone)]
pub struct Minimum {
    pub x: Vec<f64>,
    pub value: f64,
    pub iterations: u64,
    pub converged: bool,
}

struct Objective<F>(F);

impl<F> CostFunction for Objective<F>
where
    F: Fn(&[f64]) -> f64,
{
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, x: &Self::Param) -> Result<Self::Output, Error> {
        let v = (self.0)(x.as_slice());
        Ok(if v.is_nan() { f64::INFINITY } else { v })
    }
}

/// Minimize `objective` starting at `start`.
///
/// The initial simplex is `start` plus one vertex per coordinate, offset by
/// the matching entry of `steps`.
pub fn minimize<F>(
    objective: F,
    start: &[f64],
    steps: &[f64],
    opts: &NelderMeadOptions,
) -> Result<Minimum, Error>
where
    F: Fn(&[f64]) -> f64,
{
    if start.len() != steps.len() {
        return Err(Error::msg(format!(
            "{} starting coordinates but {} initial steps",
            start.len(),
            steps.len()
        )));
    }

    let mut simplex = Vec::with_capacity(start.len() + 1);
    simplex.push(start.to_vec());
    for (i, step) in steps.iter().enumerate() {
        let mut vertex = start.to_vec();
        vertex[i] += step;
        simplex.push(vertex);
    }

    let problem = Objective(objective);
    let f_start = problem.cost(&simplex[0])?;
    let sd_tolerance = if f_start.is_finite() {
        opts.f_tol * (1.0 + f_start.abs())
    } else {
        opts.f_tol
    };

    let solver = NelderMead::new(simplex).with_sd_tolerance(sd_tolerance)?;
    let res = Executor::new(problem, solver)
        .configure(|state| state.max_iters(opts.max_iterations as u64))
        .run()?;

    let state = res.state();
    let x = state
        .get_best_param()
        .cloned()
        .ok_or_else(|| Error::msg("solver returned no parameters"))?;
    let converged = matches!(
        state.get_termination_status(),
        TerminationStatus::Terminated(TerminationReason::SolverConverged)
    );

    Ok(Minimum {
        x,
        value: state.get_best_cost(),
        iterations: state.get_iter(),
        converged,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rosenbrock(x: &[f64]) -> f64 {
        (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2)
    }

    #[test]
    fn minimizes_quadratic_bowl() {
        let f = |x: &[f64]| (x[0] - 3.0).powi(2) + 10.0 * (x[1] + 1.0).powi(2);
        let min = minimize(f, &[0.0, 0.0], &[0.5, 0.5], &NelderMeadOptions::default()).unwrap();
        assert!(min.converged);
        assert!((min.x[0] - 3.0).abs() < 1e-3);
        assert!((min.x[1] + 1.0).abs() < 1e-3);
    }

    #[test]
    fn minimizes_rosenbrock() {
        let opts = NelderMeadOptions {
            max_iterations: 2000,
            ..NelderMeadOptions::default()
        };
        let min = minimize(rosenbrock, &[-1.2, 1.0], &[0.1, 0.1], &opts).unwrap();
        assert!(min.converged);
        assert!((min.x[0] - 1.0).abs() < 1e-2);
        assert!((min.x[1] - 1.0).abs() < 1e-2);
    }

    #[test]
    fn respects_iteration_cap() {
        let opts = NelderMeadOptions {
            max_iterations: 5,
            ..NelderMeadOptions::default()
        };
        let min = minimize(rosenbrock, &[-1.2, 1.0], &[0.1, 0.1], &opts).unwrap();
        assert!(!min.converged);
        assert!(min.iterations <= 5);
    }

    #[test]
    fn infeasible_region_is_avoided() {
        let f = |x: &[f64]| if x[0] < 1.0 { f64::INFINITY } else { x[0] * x[0] };
        let min = minimize(f, &[4.0], &[0.5], &NelderMeadOptions::default()).unwrap();
        assert!(min.x[0] >= 1.0 && min.x[0] < 4.0);
        assert!(min.value.is_finite());
    }

    #[test]
    fn nan_counts_as_infeasible() {
        let f = |x: &[f64]| if x[0] > 2.0 { f64::NAN } else { (x[0] - 1.0).powi(2) };
        let min = minimize(f, &[0.0], &[0.5], &NelderMeadOptions::default()).unwrap();
        assert!(min.value.is_finite());
        assert!(min.x[0] <= 2.0);
    }

    #[test]
    fn mismatched_steps_are_an_error() {
        let f = |x: &[f64]| x[0];
        assert!(minimize(f, &[0.0, 1.0], &[0.5], &NelderMeadOptions::default()).is_err());
    }

    #[test]
    fn deterministic() {
        let f = |x: &[f64]| (x[0] - 0.3).powi(2) + (x[1] * x[0] - 1.0).powi(2);
        let a = minimize(f, &[1.0, 1.0], &[0.2, 0.2], &NelderMeadOptions::default()).unwrap();
        let b = minimize(f, &[1.0, 1.0], &[0.2, 0.2], &NelderMeadOptions::default()).unwrap();
        assert_eq!(a.x, b.x);
        assert_eq!(a.iterations, b.iterations);
    }
}
