//! Debug bundle writer for inspecting a sample and every family's fit.
//!
//! The bundle is a markdown file under `debug/` with:
//! - the sample summary and its `auto` histogram
//! - the parameters being edited (TUI) and their quality, if any
//! - one row per family with the automatic fit's metrics or its failure

use std::fmt::Write as _;
use std::fs::{File, create_dir_all};
use std::io::Write as _;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::domain::{FamilyFit, ParameterVector, QualityReport, Sample};
use crate::error::{AppError, FitError};
use crate::fit::Histogram;
use crate::report::format::fmt_vec;

/// What the bundle describes.
pub struct DebugContext<'a> {
    /// Where the sample came from.
    pub origin: &'a str,
    pub sample: &'a Sample,
    /// Parameters currently shown to the user, with their evaluation.
    pub current: Option<(&'a ParameterVector, &'a Result<QualityReport, FitError>)>,
    pub fits: &'a [FamilyFit],
}

/// Write a bundle into `dir` (created if missing) and return its path.
pub fn write_debug_bundle(dir: &Path, ctx: &DebugContext<'_>) -> Result<PathBuf, AppError> {
    create_dir_all(dir).map_err(|e| AppError::new(4, format!("Failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("distfit_debug_n{}_{ts}.md", ctx.sample.len()));

    let text = render_debug_bundle(ctx);
    let mut file = File::create(&path)
        .map_err(|e| AppError::new(4, format!("Failed to create debug file: {e}")))?;
    file.write_all(text.as_bytes())
        .map_err(|e| AppError::new(4, format!("Failed to write debug file: {e}")))?;

    Ok(path)
}

/// Markdown contents of a bundle.
pub fn render_debug_bundle(ctx: &DebugContext<'_>) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_sections(&mut out, ctx);
    out
}

fn write_sections(out: &mut String, ctx: &DebugContext<'_>) -> std::fmt::Result {
    let s = ctx.sample.summary();

    writeln!(out, "# distfit debug bundle")?;
    writeln!(out, "- generated: {}", Local::now().to_rfc3339())?;
    writeln!(out, "- source: {}", ctx.origin)?;
    writeln!(
        out,
        "- n={} mean={:.6} std={:.6} min={:.6} max={:.6} median={:.6}",
        s.count, s.mean, s.std_dev, s.min, s.max, s.median
    )?;

    let hist = Histogram::auto(ctx.sample);
    writeln!(out, "\n## Histogram ({} bins)", hist.bins())?;
    writeln!(out, "| left | right | count | density |")?;
    writeln!(out, "| - | - | - | - |")?;
    for (i, w) in hist.edges.windows(2).enumerate() {
        writeln!(
            out,
            "| {:.6} | {:.6} | {} | {:.6} |",
            w[0], w[1], hist.counts[i], hist.density[i]
        )?;
    }

    if let Some((params, quality)) = ctx.current {
        writeln!(out, "\n## Current parameters ({})", params.family())?;
        for row in params.rows() {
            writeln!(out, "- {} = {:.10}", row.name, row.value)?;
        }
        match quality {
            Ok(q) => writeln!(
                out,
                "- mse={:.6e} max_error={:.6e} ks={:.6} p={:.6} ({})",
                q.mse,
                q.max_error,
                q.ks_statistic,
                q.ks_p_value,
                q.verdict().keyword()
            )?,
            Err(e) => writeln!(out, "- evaluation failed: {e}")?,
        }
    }

    writeln!(out, "\n## Automatic fits")?;
    writeln!(out, "| family | params | mse | max_error | ks | p | note |")?;
    writeln!(out, "| - | - | - | - | - | - | - |")?;
    for fit in ctx.fits {
        let name = fit.family.display_name();
        match (&fit.params, &fit.quality) {
            (Err(e), _) => writeln!(out, "| {name} | - | - | - | - | - | {e} |")?,
            (Ok(p), Some(Ok(q))) => writeln!(
                out,
                "| {name} | {} | {:.6e} | {:.6e} | {:.6} | {:.6} | {} |",
                fmt_vec(p.values()),
                q.mse,
                q.max_error,
                q.ks_statistic,
                q.ks_p_value,
                q.verdict().keyword()
            )?,
            (Ok(p), Some(Err(e))) => {
                writeln!(out, "| {name} | {} | - | - | - | - | {e} |", fmt_vec(p.values()))?
            }
            (Ok(p), None) => writeln!(out, "| {name} | {} | - | - | - | - | |", fmt_vec(p.values()))?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::{FitOptions, evaluate, fit_all};
    use crate::models::Family;

    #[test]
    fn bundle_lists_every_family() {
        let sample = Sample::new(vec![3.0, 4.0, 4.0, 5.0, 5.0, 5.0, 6.0, 6.0, 7.0]).unwrap();
        let fits = fit_all(&sample, &FitOptions::default());
        let params = ParameterVector::new(Family::Normal, vec![5.0, 1.0]).unwrap();
        let quality = evaluate(&sample, Family::Normal, params.values());

        let text = render_debug_bundle(&DebugContext {
            origin: "inline values",
            sample: &sample,
            current: Some((&params, &quality)),
            fits: &fits,
        });

        assert!(text.starts_with("# distfit debug bundle\n"));
        assert!(text.contains("- source: inline values"));
        assert!(text.contains("## Histogram (5 bins)"));
        assert!(text.contains("## Current parameters (Normal)"));
        for family in Family::ALL {
            assert!(text.contains(&format!("| {} |", family.display_name())));
        }
    }

    #[test]
    fn bundle_is_written_to_disk() {
        let dir = std::env::temp_dir().join(format!("distfit-debug-{}", std::process::id()));
        let sample = Sample::new(vec![1.0, 2.0, 3.0]).unwrap();
        let path = write_debug_bundle(
            &dir,
            &DebugContext {
                origin: "test",
                sample: &sample,
                current: None,
                fits: &[],
            },
        )
        .unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_dir_all(&dir);

        assert!(path.file_name().unwrap().to_string_lossy().starts_with("distfit_debug_n3_"));
        assert!(text.contains("## Automatic fits"));
        assert!(!text.contains("## Current parameters"));
    }
}
