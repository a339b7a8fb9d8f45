//! Error types.
//!
//! Two layers:
//!
//! - [`FitError`]: the engine's failure kinds. Every variant is local to one
//!   `(sample, family, parameters)` request and never poisons later requests.
//! - [`AppError`]: what the binary reports (message + process exit code).
//!
//! Exit codes used by the binary:
//! - `2`: bad input / usage (unparsable data, unknown family, bad parameters)
//! - `3`: degenerate data (not enough distinct observations)
//! - `4`: computation failure (divergence, evaluation, terminal/IO errors)

use thiserror::Error;

use crate::models::Family;

/// Failure kinds of the fitting/evaluation engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    /// The family name is not part of the catalog.
    #[error("unknown distribution family '{0}'")]
    UnknownFamily(String),

    /// Parameter vector does not match the family schema or violates a domain constraint.
    #[error("invalid parameters for {family}: {reason}")]
    InvalidParameters { family: String, reason: String },

    /// The optimizer did not converge within its iteration budget.
    #[error("automatic fit of {family} did not converge: {reason}")]
    FitDivergence { family: String, reason: String },

    /// The sample cannot identify the family's parameters (too few / identical values).
    #[error("degenerate sample for {family}: {reason}")]
    DegenerateSample { family: String, reason: String },

    /// The sample/family/parameter combination cannot be scored.
    #[error("cannot evaluate fit of {family}: {reason}")]
    EvaluationError { family: String, reason: String },
}

impl FitError {
    /// Process exit code used when this error reaches the binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            FitError::UnknownFamily(_) | FitError::InvalidParameters { .. } => 2,
            FitError::DegenerateSample { .. } => 3,
            FitError::FitDivergence { .. } | FitError::EvaluationError { .. } => 4,
        }
    }

    /// The same failure, reported against `family`.
    pub fn for_family(self, family: Family) -> Self {
        let family = family.display_name().to_string();
        match self {
            FitError::UnknownFamily(name) => FitError::UnknownFamily(name),
            FitError::InvalidParameters { reason, .. } => FitError::InvalidParameters { family, reason },
            FitError::FitDivergence { reason, .. } => FitError::FitDivergence { family, reason },
            FitError::DegenerateSample { reason, .. } => FitError::DegenerateSample { family, reason },
            FitError::EvaluationError { reason, .. } => FitError::EvaluationError { family, reason },
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<FitError> for AppError {
    fn from(err: FitError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_errors_map_to_exit_codes() {
        let err = FitError::DegenerateSample {
            family: "Normal".to_string(),
            reason: "zero variance".to_string(),
        };
        let app: AppError = err.clone().into();
        assert_eq!(app.exit_code(), 3);
        assert_eq!(app.to_string(), err.to_string());

        assert_eq!(FitError::UnknownFamily("cauchy".to_string()).exit_code(), 2);
    }

    #[test]
    fn relabelled_error_keeps_kind_and_reason() {
        let err = FitError::FitDivergence {
            family: "Gamma".to_string(),
            reason: "no feasible starting point".to_string(),
        };
        assert_eq!(
            err.for_family(Family::ChiSquare),
            FitError::FitDivergence {
                family: "Chi-Square".to_string(),
                reason: "no feasible starting point".to_string(),
            }
        );
    }
}
