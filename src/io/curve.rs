//! Read/write curve JSON files.
//!
//! Curve JSON is the "portable" representation of a fit:
//! - family + parameter table
//! - quality metrics (when the fit could be scored) and sample summary
//! - a precomputed density grid for quick plotting
//!
//! The schema is defined by `domain::CurveFile`.

use std::fs::File;
use std::path::Path;

use chrono::Utc;

use crate::domain::{CurveFile, CurveGrid, ParameterVector, QualityReport, Sample};
use crate::error::AppError;
use crate::models::{default_domain, curve};

/// Build the curve file contents for a fit.
pub fn build_curve_file(
    sample: &Sample,
    params: &ParameterVector,
    quality: Option<&QualityReport>,
    points: usize,
) -> Result<CurveFile, AppError> {
    let (lo, hi) = default_domain(sample);
    let grid = curve(params.family(), params.values(), lo, hi, points.max(2))?;
    let (x, density) = grid.into_iter().unzip();

    Ok(CurveFile {
        tool: "distfit".to_string(),
        generated: Utc::now(),
        family: params.family(),
        parameters: params.rows(),
        quality: quality.copied(),
        summary: sample.summary(),
        grid: CurveGrid { x, density },
    })
}

/// Write a curve JSON file.
pub fn write_curve_json(
    path: &Path,
    sample: &Sample,
    params: &ParameterVector,
    quality: Option<&QualityReport>,
    points: usize,
) -> Result<(), AppError> {
    let curve = build_curve_file(sample, params, quality, points)?;
    let file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create curve JSON '{}': {e}", path.display()))
    })?;

    serde_json::to_writer_pretty(file, &curve)
        .map_err(|e| AppError::new(2, format!("Failed to write curve JSON: {e}")))?;

    Ok(())
}

/// Read a curve JSON file.
pub fn read_curve_json(path: &Path) -> Result<CurveFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open curve JSON '{}': {e}", path.display()))
    })?;
    let curve: CurveFile = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid curve JSON: {e}")))?;
    Ok(curve)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Family;

    #[test]
    fn curve_file_survives_disk() {
        let sample = Sample::new(vec![1.0, 2.0, 2.5, 4.0]).unwrap();
        let params = ParameterVector::new(Family::Normal, vec![2.375, 1.0]).unwrap();
        let path = std::env::temp_dir().join(format!("distfit-curve-{}.json", std::process::id()));

        write_curve_json(&path, &sample, &params, None, 11).unwrap();
        let back = read_curve_json(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(back.family, Family::Normal);
        assert_eq!(back.parameters, params.rows());
        assert_eq!(back.grid.x.len(), 11);
        assert_eq!(back.summary.count, 4);
        assert!(back.quality.is_none());
    }
}
