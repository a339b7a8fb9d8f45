//! Distribution families and their frozen (parameterized) form.
//!
//! Every family is a standard shape shifted by `loc` and stretched by `scale`:
//!
//! ```text
//! pdf(x) = f((x - loc) / scale; shapes) / scale
//! cdf(x) = F((x - loc) / scale; shapes)
//! ```
//!
//! Standard shapes come from `statrs` where it has one. Uniform, Logistic and
//! Rayleigh are simple enough to write out directly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use statrs::distribution::{
    Beta, ChiSquared, Continuous, ContinuousCDF, Exp, Gamma, LogNormal, Normal, Pareto, StudentsT,
    Weibull,
};

use crate::error::FitError;

/// Role of a parameter within its family's schema.
///
/// Roles drive domain validation (scale/shape must be positive) and the
/// slider policy in `fit::ranges`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamRole {
    Location,
    Scale,
    Shape,
}

/// One entry of a family's ordered parameter schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParamSpec {
    pub name: &'static str,
    pub role: ParamRole,
}

const fn loc() -> ParamSpec {
    ParamSpec {
        name: "loc",
        role: ParamRole::Location,
    }
}

const fn scale() -> ParamSpec {
    ParamSpec {
        name: "scale",
        role: ParamRole::Scale,
    }
}

const fn shape(name: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        role: ParamRole::Shape,
    }
}

const LOC_SCALE: [ParamSpec; 2] = [loc(), scale()];
const GAMMA: [ParamSpec; 3] = [shape("a"), loc(), scale()];
const WEIBULL: [ParamSpec; 3] = [shape("c"), loc(), scale()];
const LOGNORMAL: [ParamSpec; 3] = [shape("s"), loc(), scale()];
const BETA: [ParamSpec; 4] = [shape("a"), shape("b"), loc(), scale()];
const DF_LOC_SCALE: [ParamSpec; 3] = [shape("df"), loc(), scale()];
const PARETO: [ParamSpec; 3] = [shape("b"), loc(), scale()];

/// The catalog of supported families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Family {
    Normal,
    Gamma,
    Weibull,
    Exponential,
    Lognormal,
    Beta,
    ChiSquare,
    Uniform,
    Logistic,
    Pareto,
    Rayleigh,
    StudentT,
}

impl Family {
    /// All families in catalog order.
    pub const ALL: [Family; 12] = [
        Family::Normal,
        Family::Gamma,
        Family::Weibull,
        Family::Exponential,
        Family::Lognormal,
        Family::Beta,
        Family::ChiSquare,
        Family::Uniform,
        Family::Logistic,
        Family::Pareto,
        Family::Rayleigh,
        Family::StudentT,
    ];

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            Family::Normal => "Normal",
            Family::Gamma => "Gamma",
            Family::Weibull => "Weibull",
            Family::Exponential => "Exponential",
            Family::Lognormal => "Lognormal",
            Family::Beta => "Beta",
            Family::ChiSquare => "Chi-Square",
            Family::Uniform => "Uniform",
            Family::Logistic => "Logistic",
            Family::Pareto => "Pareto",
            Family::Rayleigh => "Rayleigh",
            Family::StudentT => "Student-t",
        }
    }

    /// Ordered parameter schema.
    pub fn params(self) -> &'static [ParamSpec] {
        match self {
            Family::Normal
            | Family::Exponential
            | Family::Uniform
            | Family::Logistic
            | Family::Rayleigh => &LOC_SCALE,
            Family::Gamma => &GAMMA,
            Family::Weibull => &WEIBULL,
            Family::Lognormal => &LOGNORMAL,
            Family::Beta => &BETA,
            Family::ChiSquare | Family::StudentT => &DF_LOC_SCALE,
            Family::Pareto => &PARETO,
        }
    }

    pub fn param_names(self) -> Vec<&'static str> {
        self.params().iter().map(|p| p.name).collect()
    }

    pub fn param_count(self) -> usize {
        self.params().len()
    }

    /// Next family in catalog order (wraps).
    pub fn next(self) -> Family {
        let idx = self.catalog_index();
        Family::ALL[(idx + 1) % Family::ALL.len()]
    }

    /// Previous family in catalog order (wraps).
    pub fn prev(self) -> Family {
        let idx = self.catalog_index();
        Family::ALL[(idx + Family::ALL.len() - 1) % Family::ALL.len()]
    }

    fn catalog_index(self) -> usize {
        Family::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub(crate) fn invalid(self, reason: impl Into<String>) -> FitError {
        FitError::InvalidParameters {
            family: self.display_name().to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Family {
    type Err = FitError;

    /// Case-insensitive lookup by name or common alias (`norm`, `chi2`, `t`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        let family = match key.as_str() {
            "normal" | "norm" | "gauss" | "gaussian" => Family::Normal,
            "gamma" => Family::Gamma,
            "weibull" | "weibullmin" => Family::Weibull,
            "exponential" | "expon" | "exp" => Family::Exponential,
            "lognormal" | "lognorm" => Family::Lognormal,
            "beta" => Family::Beta,
            "chisquare" | "chisquared" | "chi2" => Family::ChiSquare,
            "uniform" => Family::Uniform,
            "logistic" => Family::Logistic,
            "pareto" => Family::Pareto,
            "rayleigh" => Family::Rayleigh,
            "studentt" | "student" | "t" => Family::StudentT,
            _ => return Err(FitError::UnknownFamily(s.trim().to_string())),
        };
        Ok(family)
    }
}

/// `clap` value parser for `--dist` style flags.
pub fn parse_family(s: &str) -> Result<Family, FitError> {
    s.parse()
}

/// Standard (loc = 0, scale = 1) shape of a family.
#[derive(Debug, Clone)]
enum Standard {
    Normal(Normal),
    Gamma(Gamma),
    Weibull(Weibull),
    Exponential(Exp),
    Lognormal(LogNormal),
    Beta(Beta),
    ChiSquare(ChiSquared),
    Uniform,
    Logistic,
    Pareto(Pareto),
    Rayleigh,
    StudentT(StudentsT),
}

impl Standard {
    fn pdf(&self, z: f64) -> f64 {
        match self {
            Standard::Normal(d) => d.pdf(z),
            Standard::Gamma(d) => d.pdf(z),
            Standard::Weibull(d) => d.pdf(z),
            Standard::Exponential(d) => d.pdf(z),
            Standard::Lognormal(d) => d.pdf(z),
            Standard::Beta(d) => d.pdf(z),
            Standard::ChiSquare(d) => d.pdf(z),
            Standard::Uniform => {
                if (0.0..=1.0).contains(&z) {
                    1.0
                } else {
                    0.0
                }
            }
            Standard::Logistic => {
                // Symmetric form avoids overflow of exp(-z) for large negative z.
                let e = (-z.abs()).exp();
                e / ((1.0 + e) * (1.0 + e))
            }
            Standard::Pareto(d) => d.pdf(z),
            Standard::Rayleigh => {
                if z < 0.0 {
                    0.0
                } else {
                    z * (-0.5 * z * z).exp()
                }
            }
            Standard::StudentT(d) => d.pdf(z),
        }
    }

    fn ln_pdf(&self, z: f64) -> f64 {
        match self {
            Standard::Normal(d) => d.ln_pdf(z),
            Standard::Gamma(d) => d.ln_pdf(z),
            Standard::Weibull(d) => d.ln_pdf(z),
            Standard::Exponential(d) => d.ln_pdf(z),
            Standard::Lognormal(d) => d.ln_pdf(z),
            Standard::Beta(d) => d.ln_pdf(z),
            Standard::ChiSquare(d) => d.ln_pdf(z),
            Standard::Uniform => {
                if (0.0..=1.0).contains(&z) {
                    0.0
                } else {
                    f64::NEG_INFINITY
                }
            }
            Standard::Logistic => -z.abs() - 2.0 * (-z.abs()).exp().ln_1p(),
            Standard::Pareto(d) => d.ln_pdf(z),
            Standard::Rayleigh => {
                if z <= 0.0 {
                    f64::NEG_INFINITY
                } else {
                    z.ln() - 0.5 * z * z
                }
            }
            Standard::StudentT(d) => d.ln_pdf(z),
        }
    }

    fn cdf(&self, z: f64) -> f64 {
        match self {
            Standard::Normal(d) => d.cdf(z),
            Standard::Gamma(d) => cdf_from_zero(z, |v| d.cdf(v)),
            Standard::Weibull(d) => cdf_from_zero(z, |v| d.cdf(v)),
            Standard::Exponential(d) => cdf_from_zero(z, |v| d.cdf(v)),
            Standard::Lognormal(d) => cdf_from_zero(z, |v| d.cdf(v)),
            Standard::Beta(d) => {
                if z <= 0.0 {
                    0.0
                } else if z >= 1.0 {
                    1.0
                } else {
                    d.cdf(z)
                }
            }
            Standard::ChiSquare(d) => cdf_from_zero(z, |v| d.cdf(v)),
            Standard::Uniform => z.clamp(0.0, 1.0),
            Standard::Logistic => {
                if z >= 0.0 {
                    1.0 / (1.0 + (-z).exp())
                } else {
                    let e = z.exp();
                    e / (1.0 + e)
                }
            }
            Standard::Pareto(d) => {
                if z <= 1.0 {
                    0.0
                } else {
                    d.cdf(z)
                }
            }
            Standard::Rayleigh => {
                if z <= 0.0 {
                    0.0
                } else {
                    -(-0.5 * z * z).exp_m1()
                }
            }
            Standard::StudentT(d) => d.cdf(z),
        }
    }
}

/// Guard positive-support CDFs so we never hand `statrs` values it may reject.
fn cdf_from_zero(z: f64, f: impl Fn(f64) -> f64) -> f64 {
    if z <= 0.0 { 0.0 } else { f(z) }
}

/// A family with validated parameters, ready for repeated pdf/cdf evaluation.
#[derive(Debug, Clone)]
pub struct FrozenDistribution {
    family: Family,
    loc: f64,
    scale: f64,
    standard: Standard,
}

impl FrozenDistribution {
    /// Validate `params` against the family schema and freeze them.
    ///
    /// Fails with `InvalidParameters` on a length mismatch, a non-finite entry,
    /// a non-positive scale, or a non-positive shape.
    pub fn new(family: Family, params: &[f64]) -> Result<Self, FitError> {
        let schema = family.params();
        if params.len() != schema.len() {
            return Err(family.invalid(format!(
                "expected {} parameters ({}), got {}",
                schema.len(),
                family.param_names().join(", "),
                params.len()
            )));
        }
        for (spec, &value) in schema.iter().zip(params) {
            if !value.is_finite() {
                return Err(family.invalid(format!("{} must be finite, got {value}", spec.name)));
            }
            if matches!(spec.role, ParamRole::Scale | ParamRole::Shape) && value <= 0.0 {
                return Err(family.invalid(format!("{} must be > 0, got {value}", spec.name)));
            }
        }

        // Schema order is [shapes..., loc, scale] for every family.
        let n = params.len();
        let loc = params[n - 2];
        let scale = params[n - 1];
        let shapes = &params[..n - 2];

        let err = |e: &dyn fmt::Display| family.invalid(e.to_string());
        let standard = match family {
            Family::Normal => Standard::Normal(Normal::new(0.0, 1.0).map_err(|e| err(&e))?),
            Family::Gamma => Standard::Gamma(Gamma::new(shapes[0], 1.0).map_err(|e| err(&e))?),
            Family::Weibull => {
                Standard::Weibull(Weibull::new(shapes[0], 1.0).map_err(|e| err(&e))?)
            }
            Family::Exponential => Standard::Exponential(Exp::new(1.0).map_err(|e| err(&e))?),
            Family::Lognormal => {
                Standard::Lognormal(LogNormal::new(0.0, shapes[0]).map_err(|e| err(&e))?)
            }
            Family::Beta => Standard::Beta(Beta::new(shapes[0], shapes[1]).map_err(|e| err(&e))?),
            Family::ChiSquare => {
                Standard::ChiSquare(ChiSquared::new(shapes[0]).map_err(|e| err(&e))?)
            }
            Family::Uniform => Standard::Uniform,
            Family::Logistic => Standard::Logistic,
            Family::Pareto => Standard::Pareto(Pareto::new(1.0, shapes[0]).map_err(|e| err(&e))?),
            Family::Rayleigh => Standard::Rayleigh,
            Family::StudentT => {
                Standard::StudentT(StudentsT::new(0.0, 1.0, shapes[0]).map_err(|e| err(&e))?)
            }
        };

        Ok(Self {
            family,
            loc,
            scale,
            standard,
        })
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn loc(&self) -> f64 {
        self.loc
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    fn standardize(&self, x: f64) -> f64 {
        (x - self.loc) / self.scale
    }

    pub fn pdf(&self, x: f64) -> f64 {
        self.standard.pdf(self.standardize(x)) / self.scale
    }

    pub fn ln_pdf(&self, x: f64) -> f64 {
        self.standard.ln_pdf(self.standardize(x)) - self.scale.ln()
    }

    /// Cumulative distribution, always within `[0, 1]`.
    pub fn cdf(&self, x: f64) -> f64 {
        let p = self.standard.cdf(self.standardize(x));
        if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
    }

    /// Closed support interval `(lower, upper)`; infinite ends are unbounded.
    pub fn support(&self) -> (f64, f64) {
        match self.family {
            Family::Normal | Family::Logistic | Family::StudentT => {
                (f64::NEG_INFINITY, f64::INFINITY)
            }
            Family::Gamma
            | Family::Weibull
            | Family::Exponential
            | Family::Lognormal
            | Family::ChiSquare
            | Family::Rayleigh => (self.loc, f64::INFINITY),
            Family::Beta | Family::Uniform => (self.loc, self.loc + self.scale),
            Family::Pareto => (self.loc + self.scale, f64::INFINITY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!("Normal".parse::<Family>().unwrap(), Family::Normal);
        assert_eq!("chi2".parse::<Family>().unwrap(), Family::ChiSquare);
        assert_eq!("Chi-Square".parse::<Family>().unwrap(), Family::ChiSquare);
        assert_eq!("student-t".parse::<Family>().unwrap(), Family::StudentT);
        assert_eq!(" LOGNORM ".parse::<Family>().unwrap(), Family::Lognormal);
        assert!(matches!(
            "cauchy".parse::<Family>(),
            Err(FitError::UnknownFamily(name)) if name == "cauchy"
        ));
    }

    #[test]
    fn display_names_round_trip_through_parser() {
        for family in Family::ALL {
            assert_eq!(family.display_name().parse::<Family>().unwrap(), family);
        }
    }

    #[test]
    fn schema_ends_with_loc_scale() {
        for family in Family::ALL {
            let params = family.params();
            assert!(params.len() >= 2);
            assert_eq!(params[params.len() - 2].role, ParamRole::Location);
            assert_eq!(params[params.len() - 1].role, ParamRole::Scale);
        }
        assert_eq!(Family::Beta.param_names(), vec!["a", "b", "loc", "scale"]);
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(FrozenDistribution::new(Family::Normal, &[0.0]).is_err());
        assert!(FrozenDistribution::new(Family::Normal, &[0.0, 0.0]).is_err());
        assert!(FrozenDistribution::new(Family::Normal, &[f64::NAN, 1.0]).is_err());
        assert!(FrozenDistribution::new(Family::Gamma, &[-1.0, 0.0, 1.0]).is_err());
        assert!(FrozenDistribution::new(Family::StudentT, &[0.0, 0.0, 1.0]).is_err());
        assert!(FrozenDistribution::new(Family::Gamma, &[2.0, 0.0, 1.0]).is_ok());
    }

    #[test]
    fn normal_matches_closed_form() {
        let d = FrozenDistribution::new(Family::Normal, &[1.0, 2.0]).unwrap();
        let expected = (-0.5f64 * 0.25).exp() / (2.0 * (2.0 * std::f64::consts::PI).sqrt());
        assert_abs_diff_eq!(d.pdf(2.0), expected, epsilon = 1e-12);
        assert_abs_diff_eq!(d.cdf(1.0), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(d.ln_pdf(2.0), expected.ln(), epsilon = 1e-12);
    }

    #[test]
    fn closed_form_families_are_consistent() {
        let logistic = FrozenDistribution::new(Family::Logistic, &[0.0, 1.0]).unwrap();
        assert_abs_diff_eq!(logistic.pdf(0.0), 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(logistic.cdf(0.0), 0.5, epsilon = 1e-12);
        assert!(logistic.pdf(-800.0).is_finite());

        let rayleigh = FrozenDistribution::new(Family::Rayleigh, &[1.0, 2.0]).unwrap();
        assert_eq!(rayleigh.pdf(0.5), 0.0);
        assert_abs_diff_eq!(rayleigh.cdf(3.0), 1.0 - (-0.5f64).exp(), epsilon = 1e-12);

        let uniform = FrozenDistribution::new(Family::Uniform, &[2.0, 4.0]).unwrap();
        assert_abs_diff_eq!(uniform.pdf(3.0), 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(uniform.cdf(4.0), 0.5, epsilon = 1e-12);
        assert_eq!(uniform.ln_pdf(7.0), f64::NEG_INFINITY);
    }

    #[test]
    fn shifted_families_vanish_below_support() {
        let gamma = FrozenDistribution::new(Family::Gamma, &[2.0, 5.0, 1.0]).unwrap();
        assert_eq!(gamma.pdf(4.0), 0.0);
        assert_eq!(gamma.cdf(4.0), 0.0);
        assert_eq!(gamma.support(), (5.0, f64::INFINITY));

        let pareto = FrozenDistribution::new(Family::Pareto, &[3.0, 1.0, 2.0]).unwrap();
        assert_eq!(pareto.cdf(2.5), 0.0);
        assert_eq!(pareto.support().0, 3.0);
    }
}
