//! Export fit metrics to CSV.
//!
//! One row per family, meant to be easy to consume in spreadsheets or
//! downstream scripts. Failed fits keep their row with the error message.

use std::fs::File;
use std::path::Path;

use serde::Serialize;

use crate::domain::FamilyFit;
use crate::error::AppError;

#[derive(Debug, Serialize)]
struct MetricsRow {
    family: &'static str,
    parameters: String,
    mse: Option<f64>,
    max_error: Option<f64>,
    ks_statistic: Option<f64>,
    ks_p_value: Option<f64>,
    verdict: Option<&'static str>,
    error: Option<String>,
}

impl MetricsRow {
    fn from_fit(fit: &FamilyFit) -> Self {
        let mut row = Self {
            family: fit.family.display_name(),
            parameters: String::new(),
            mse: None,
            max_error: None,
            ks_statistic: None,
            ks_p_value: None,
            verdict: None,
            error: None,
        };

        match &fit.params {
            Ok(p) => {
                row.parameters = p
                    .rows()
                    .iter()
                    .map(|r| format!("{}={:.10}", r.name, r.value))
                    .collect::<Vec<_>>()
                    .join(";");
            }
            Err(e) => row.error = Some(e.to_string()),
        }

        match &fit.quality {
            Some(Ok(q)) => {
                row.mse = Some(q.mse);
                row.max_error = Some(q.max_error);
                row.ks_statistic = Some(q.ks_statistic);
                row.ks_p_value = Some(q.ks_p_value);
                row.verdict = Some(q.verdict().keyword());
            }
            Some(Err(e)) => row.error = Some(e.to_string()),
            None => {}
        }
        row
    }
}

/// Write one metrics row per fit.
pub fn write_metrics_csv(path: &Path, fits: &[FamilyFit]) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create metrics CSV '{}': {e}", path.display()))
    })?;
    let mut writer = csv::Writer::from_writer(file);

    for fit in fits {
        writer
            .serialize(MetricsRow::from_fit(fit))
            .map_err(|e| AppError::new(2, format!("Failed to write metrics CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to write metrics CSV: {e}")))?;

    Ok(())
}
