//! Slider bounds for interactive parameter exploration.
//!
//! Every parameter gets `[lower, upper]`, a step and a default derived from
//! its role and the sample:
//!
//! - location: `[min - spread, max + spread]`, default = fitted value
//! - scale: `[scale_floor, 2 * spread]`, default = fitted value
//! - shape: `[shape_lower, shape_upper]`, default = fitted value
//!
//! Without a usable fit the defaults fall back to `0` (location) and `1`
//! (scale, shape). Defaults are always clamped into their bounds.

use tracing::debug;

use crate::domain::{ParameterRangeHint, ParameterVector, Sample};
use crate::fit::estimator::{FitOptions, fit};
use crate::models::{Family, ParamRole};

/// Range policy constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangePolicy {
    /// Strictly positive lower bound for scale parameters.
    pub scale_floor: f64,
    pub shape_lower: f64,
    pub shape_upper: f64,
    pub shape_step: f64,
    /// Location/scale step as a fraction of the sample spread.
    pub step_fraction: f64,
}

impl Default for RangePolicy {
    fn default() -> Self {
        Self {
            scale_floor: 0.01,
            shape_lower: 0.1,
            shape_upper: 10.0,
            shape_step: 0.1,
            step_fraction: 0.01,
        }
    }
}

/// Fit `family` and derive slider hints from the result.
///
/// A failed fit only drops the fitted defaults; hints are always returned.
pub fn suggest(
    sample: &Sample,
    family: Family,
    opts: &FitOptions,
    policy: &RangePolicy,
) -> Vec<ParameterRangeHint> {
    let fitted = match fit(sample, family, opts) {
        Ok(p) => Some(p),
        Err(err) => {
            debug!(family = %family, error = %err, "no fitted defaults for slider ranges");
            None
        }
    };
    suggest_with(sample, family, fitted.as_ref(), policy)
}

/// Slider hints around an already computed fit (or none).
///
/// `fitted` is ignored when it belongs to another family.
pub fn suggest_with(
    sample: &Sample,
    family: Family,
    fitted: Option<&ParameterVector>,
    policy: &RangePolicy,
) -> Vec<ParameterRangeHint> {
    let fitted = fitted.filter(|p| p.family() == family).map(|p| p.values());
    let spread = sample.spread();
    let step = spread * policy.step_fraction;

    family
        .params()
        .iter()
        .enumerate()
        .map(|(i, spec)| {
            let fitted_value = fitted.map(|v| v[i]);
            let (lower, upper, step, fallback) = match spec.role {
                ParamRole::Location => (sample.min() - spread, sample.max() + spread, step, 0.0),
                ParamRole::Scale => (
                    policy.scale_floor,
                    (2.0 * spread).max(2.0 * policy.scale_floor),
                    step,
                    1.0,
                ),
                ParamRole::Shape => (policy.shape_lower, policy.shape_upper, policy.shape_step, 1.0),
            };
            let default = fitted_value.unwrap_or(fallback).clamp(lower, upper);
            ParameterRangeHint {
                name: spec.name.to_string(),
                role: spec.role,
                lower,
                upper,
                step,
                default,
            }
        })
        .collect()
}

/// Default slider positions as a parameter vector (always valid for `family`).
pub fn defaults(hints: &[ParameterRangeHint]) -> Vec<f64> {
    hints.iter().map(|h| h.default).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(values: &[f64]) -> Sample {
        Sample::new(values.to_vec()).unwrap()
    }

    fn assert_well_formed(hints: &[ParameterRangeHint]) {
        for h in hints {
            assert!(h.lower <= h.default && h.default <= h.upper, "{h:?}");
            assert!(h.step > 0.0);
            if h.role == ParamRole::Scale {
                assert!(h.lower > 0.0);
            }
        }
    }

    #[test]
    fn normal_hints_follow_fit() {
        let s = sample(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let hints = suggest(&s, Family::Normal, &FitOptions::default(), &RangePolicy::default());
        assert_eq!(hints.len(), 2);
        assert_eq!(hints[0].name, "loc");
        assert_eq!((hints[0].lower, hints[0].upper), (-3.0, 9.0));
        assert_eq!(hints[0].default, 3.0);
        assert_eq!((hints[1].lower, hints[1].upper), (0.01, 8.0));
        assert!((hints[1].default - 2f64.sqrt()).abs() < 1e-12);
        assert_well_formed(&hints);
    }

    #[test]
    fn unfit_defaults_are_clamped() {
        // Location fallback 0 lies far below [90, 110].
        let s = sample(&[100.0, 105.0]);
        let hints = suggest_with(&s, Family::Gamma, None, &RangePolicy::default());
        assert_eq!(hints[0].default, 1.0);
        assert_eq!(hints[1].default, 95.0);
        assert_eq!(hints[2].default, 1.0);
        assert_well_formed(&hints);
    }

    #[test]
    fn degenerate_sample_still_gets_hints() {
        let s = sample(&[4.0, 4.0, 4.0]);
        for family in Family::ALL {
            let hints = suggest(&s, family, &FitOptions::default(), &RangePolicy::default());
            assert_eq!(hints.len(), family.param_count());
            assert_well_formed(&hints);
        }
    }

    #[test]
    fn defaults_form_a_valid_parameter_vector() {
        let s = sample(&[0.003, 0.004, 0.0041]);
        for family in Family::ALL {
            let hints = suggest_with(&s, family, None, &RangePolicy::default());
            assert_well_formed(&hints);
            assert!(ParameterVector::new(family, defaults(&hints)).is_ok());
        }
    }

    #[test]
    fn foreign_fit_is_ignored() {
        let s = sample(&[1.0, 2.0, 3.0]);
        let other = ParameterVector::new(Family::Normal, vec![2.0, 0.5]).unwrap();
        let hints = suggest_with(&s, Family::Logistic, Some(&other), &RangePolicy::default());
        assert_eq!(hints[0].default, 0.0);
    }
}
