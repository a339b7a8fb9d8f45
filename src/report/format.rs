//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::{FamilyFit, ParameterRangeHint, ParameterVector, QualityReport, SampleSummary};
use crate::error::FitError;
use crate::models::{CatalogEntry, Family, ParamRole};

/// Format the catalog (`distfit families`).
pub fn format_families(entries: &[CatalogEntry]) -> String {
    let mut out = String::new();
    out.push_str(format!("{:<12} {}\n", "family", "parameters").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<12} {:-<40}\n", "", "").trim_end());
    out.push('\n');

    for entry in entries {
        let params: Vec<String> = entry
            .params
            .iter()
            .map(|p| format!("{} ({})", p.name, role_label(p.role)))
            .collect();
        out.push_str(&format!("{:<12} {}\n", entry.name, params.join(", ")));
    }
    out
}

/// Descriptive statistics block.
pub fn format_summary(summary: &SampleSummary) -> String {
    let mut out = String::new();
    out.push_str("Data statistics:\n");
    out.push_str(&format!("  count  : {}\n", summary.count));
    out.push_str(&format!("  mean   : {:.4}\n", summary.mean));
    out.push_str(&format!("  std    : {:.4}\n", summary.std_dev));
    out.push_str(&format!("  min    : {:.4}\n", summary.min));
    out.push_str(&format!("  max    : {:.4}\n", summary.max));
    out.push_str(&format!("  median : {:.4}\n", summary.median));
    out
}

/// Parameter table for one fit.
pub fn format_parameters(params: &ParameterVector, title: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("{title} ({}):\n", params.family()));
    for row in params.rows() {
        out.push_str(&format!(
            "  {:<6} {:>14.6}  [{}]\n",
            row.name,
            row.value,
            role_label(row.role)
        ));
    }
    out
}

/// Quality metrics plus the KS verdict, or why the fit could not be scored.
pub fn format_quality(quality: &Result<QualityReport, FitError>) -> String {
    let mut out = String::new();
    out.push_str("Fit quality:\n");
    match quality {
        Ok(q) => {
            out.push_str(&format!("  MSE          : {:.6}\n", q.mse));
            out.push_str(&format!("  Max error    : {:.6}\n", q.max_error));
            out.push_str(&format!("  KS statistic : {:.4}\n", q.ks_statistic));
            out.push_str(&format!("  KS p-value   : {:.4}\n", q.ks_p_value));
            out.push_str(&format!("  Verdict      : {}\n", q.verdict().label()));
        }
        Err(e) => out.push_str(&format!("  Cannot evaluate fit: {e}\n")),
    }
    out
}

/// Slider hints for one family (`distfit ranges`).
pub fn format_ranges(family: Family, hints: &[ParameterRangeHint]) -> String {
    let mut out = String::new();
    out.push_str(&format!("Parameter ranges for {family}:\n"));
    out.push_str(
        format!(
            "{:<6} {:<9} {:>12} {:>12} {:>10} {:>12}\n",
            "param", "role", "lower", "upper", "step", "default"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<6} {:-<9} {:-<12} {:-<12} {:-<10} {:-<12}\n",
            "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for h in hints {
        out.push_str(&format!(
            "{:<6} {:<9} {:>12.4} {:>12.4} {:>10.4} {:>12.4}\n",
            h.name,
            role_label(h.role),
            h.lower,
            h.upper,
            h.step,
            h.default
        ));
    }
    out
}

/// Every family's automatic fit, in catalog order (`distfit scan`).
///
/// No ranking is applied: the table is a side-by-side view, not a recommendation.
pub fn format_scan(fits: &[FamilyFit]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<12} {:>12} {:>12} {:>8} {:>8} {:<5} {}\n",
            "family", "mse", "max_err", "ks", "p", "fit", "parameters"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<12} {:-<12} {:-<12} {:-<8} {:-<8} {:-<5} {:-<30}\n",
            "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for fit in fits {
        let name = fit.family.display_name();
        let params = match &fit.params {
            Ok(p) => fmt_vec(p.values()),
            Err(e) => {
                out.push_str(&format!("{name:<12} fit failed: {}\n", truncate(&e.to_string(), 80)));
                continue;
            }
        };
        match &fit.quality {
            Some(Ok(q)) => {
                let verdict = q.verdict().keyword();
                out.push_str(&format!(
                    "{name:<12} {:>12.6} {:>12.6} {:>8.4} {:>8.4} {verdict:<5} {params}\n",
                    q.mse, q.max_error, q.ks_statistic, q.ks_p_value
                ));
            }
            Some(Err(e)) => out.push_str(&format!(
                "{name:<12} {:>12} {:>12} {:>8} {:>8} {:<5} {params}  ({})\n",
                "-",
                "-",
                "-",
                "-",
                "-",
                truncate(&e.to_string(), 60)
            )),
            None => out.push_str(&format!("{name:<12} {params}\n")),
        }
    }
    out
}

fn role_label(role: ParamRole) -> &'static str {
    match role {
        ParamRole::Location => "location",
        ParamRole::Scale => "scale",
        ParamRole::Shape => "shape",
    }
}

pub(crate) fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.6}")).collect();
    format!("[{}]", parts.join(", "))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entries;

    #[test]
    fn families_table_lists_roles() {
        let text = format_families(&entries());
        let beta = format!("{:<12} a (shape), b (shape), loc (location), scale (scale)", "Beta");
        assert!(text.contains(&beta));
        assert_eq!(text.lines().count(), 2 + Family::ALL.len());
    }

    #[test]
    fn quality_block_shows_verdict_or_error() {
        let ok = format_quality(&Ok(QualityReport {
            mse: 0.0,
            max_error: 0.0,
            ks_statistic: 0.1,
            ks_p_value: 0.9,
        }));
        assert!(ok.contains("Good fit"));

        let err = format_quality(&Err(FitError::EvaluationError {
            family: "Normal".to_string(),
            reason: "boom".to_string(),
        }));
        assert!(err.contains("Cannot evaluate fit"));
    }

    #[test]
    fn scan_keeps_catalog_order_and_failures() {
        let fits = vec![
            FamilyFit {
                family: Family::Normal,
                params: ParameterVector::new(Family::Normal, vec![1.0, 2.0]),
                quality: None,
            },
            FamilyFit {
                family: Family::Gamma,
                params: Err(FitError::DegenerateSample {
                    family: "Gamma".to_string(),
                    reason: "zero variance".to_string(),
                }),
                quality: None,
            },
        ];
        let text = format_scan(&fits);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[2].starts_with("Normal"));
        assert!(lines[3].starts_with(&format!("{:<12} fit failed", "Gamma")));
    }

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate("abcdef", 4), "abc.");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
