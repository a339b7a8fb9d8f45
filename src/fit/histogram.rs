//! Density histograms of a sample.
//!
//! Bin count follows numpy's `bins="auto"` rule:
//!
//! - Sturges width: `range / (log2(n) + 1)`
//! - Freedman–Diaconis width: `2 * IQR / n^(1/3)`
//! - `auto` picks the smaller of the two, or Sturges alone when the IQR is 0
//!
//! Edges are evenly spaced from the sample minimum to the maximum; every bin is
//! half-open except the last, which also contains the maximum.

use crate::domain::Sample;

/// Upper limit on the automatic bin count (long-tailed samples can ask for more).
pub const MAX_AUTO_BINS: usize = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `bins + 1` ascending edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
    /// `count / (n * width)`; integrates to 1 over the edges.
    pub density: Vec<f64>,
}

impl Histogram {
    /// Histogram with the automatic bin count.
    pub fn auto(sample: &Sample) -> Self {
        Self::with_bins(sample, auto_bin_count(sample))
    }

    /// Histogram with exactly `bins` equal-width bins (at least one).
    ///
    /// A zero-range sample gets the unit interval around its value, as numpy does.
    pub fn with_bins(sample: &Sample, bins: usize) -> Self {
        let bins = bins.max(1);
        let (first, last) = if sample.range() > 0.0 {
            (sample.min(), sample.max())
        } else {
            (sample.min() - 0.5, sample.max() + 0.5)
        };

        let width = (last - first) / bins as f64;
        let mut edges: Vec<f64> = (0..=bins).map(|i| first + i as f64 * width).collect();
        edges[bins] = last;

        let mut counts = vec![0usize; bins];
        for &x in sample.values() {
            let mut idx = (((x - first) / width) as usize).min(bins - 1);
            // Rounding in the division can land one bin off; settle against the edges.
            while idx > 0 && x < edges[idx] {
                idx -= 1;
            }
            while idx + 1 < bins && x >= edges[idx + 1] {
                idx += 1;
            }
            counts[idx] += 1;
        }

        let n = sample.len() as f64;
        let density = counts
            .iter()
            .enumerate()
            .map(|(i, &c)| c as f64 / (n * (edges[i + 1] - edges[i])))
            .collect();

        Self {
            edges,
            counts,
            density,
        }
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    /// Bin midpoints, aligned with `density`.
    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
    }

    pub fn max_density(&self) -> f64 {
        self.density.iter().copied().fold(0.0, f64::max)
    }
}

/// Bin count of numpy's `auto` estimator, capped at [`MAX_AUTO_BINS`].
pub fn auto_bin_count(sample: &Sample) -> usize {
    let range = sample.range();
    if range <= 0.0 {
        return 1;
    }

    let n = sample.len() as f64;
    let sturges = range / (n.log2() + 1.0);
    let iqr = sample.quantile(0.75) - sample.quantile(0.25);
    let fd = 2.0 * iqr * n.powf(-1.0 / 3.0);
    let width = if fd > 0.0 { fd.min(sturges) } else { sturges };

    ((range / width).ceil() as usize).clamp(1, MAX_AUTO_BINS)
}
