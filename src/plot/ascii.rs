//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - sample histogram (density scale): `#` bars
//! - fitted density curve: `*` line drawn over the bars

use crate::domain::{CurveFile, Sample};
use crate::fit::Histogram;

/// Histogram bin count used for plots.
pub const PLOT_BINS: usize = 25;

/// Render the sample histogram with a density curve overlaid.
pub fn render_ascii_plot(sample: &Sample, curve: &[(f64, f64)], width: usize, height: usize) -> String {
    let hist = Histogram::with_bins(sample, PLOT_BINS);
    render_plot(Some(&hist), curve, width, height)
}

/// Render a saved curve file (curve only, no histogram).
pub fn render_ascii_plot_from_curve_file(curve: &CurveFile, width: usize, height: usize) -> String {
    let points: Vec<(f64, f64)> = curve
        .grid
        .x
        .iter()
        .zip(curve.grid.density.iter())
        .map(|(&x, &d)| (x, d))
        .collect();
    render_plot(None, &points, width, height)
}

fn render_plot(hist: Option<&Histogram>, curve: &[(f64, f64)], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (x_min, x_max) = x_range(hist, curve).unwrap_or((0.0, 1.0));
    let y_top = y_top(hist, curve);
    let y_max = y_top + (y_top * 0.05).max(1e-12);

    let mut grid = vec![vec![' '; width]; height];

    if let Some(hist) = hist {
        draw_bars(&mut grid, hist, x_min, x_max, y_max);
    }
    draw_curve(&mut grid, curve, x_min, x_max, y_max);

    let mut out = String::new();
    let bins = hist.map(|h| format!(" | bins={}", h.bins())).unwrap_or_default();
    out.push_str(&format!(
        "Plot: x=[{x_min:.3}, {x_max:.3}] | density=[0, {y_max:.4}]{bins}\n"
    ));
    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }
    out
}

fn x_range(hist: Option<&Histogram>, curve: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    if let Some(h) = hist {
        min_x = min_x.min(h.edges[0]);
        max_x = max_x.max(h.edges[h.edges.len() - 1]);
    }
    for &(x, _) in curve {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
    }
    if min_x.is_finite() && max_x.is_finite() && max_x > min_x {
        Some((min_x, max_x))
    } else {
        None
    }
}

fn y_top(hist: Option<&Histogram>, curve: &[(f64, f64)]) -> f64 {
    let curve_max = curve
        .iter()
        .map(|&(_, y)| y)
        .filter(|y| y.is_finite())
        .fold(0.0, f64::max);
    let top = hist.map_or(0.0, Histogram::max_density).max(curve_max);
    if top > 0.0 { top } else { 1.0 }
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = (y / y_max).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// One column per character cell, filled from the bottom row up to the bin density.
fn draw_bars(grid: &mut [Vec<char>], hist: &Histogram, x_min: f64, x_max: f64, y_max: f64) {
    let height = grid.len();
    let width = grid[0].len();
    let lo = hist.edges[0];
    let hi = hist.edges[hist.edges.len() - 1];

    for col in 0..width {
        let x = x_min + (col as f64 + 0.5) / width as f64 * (x_max - x_min);
        if x < lo || x > hi {
            continue;
        }
        let Some(bin) = hist.edges.windows(2).position(|w| x >= w[0] && x <= w[1]) else {
            continue;
        };
        let density = hist.density[bin];
        if density <= 0.0 {
            continue;
        }
        let top = map_y(density, y_max, height);
        for row in grid.iter_mut().take(height).skip(top) {
            row[col] = '#';
        }
    }
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], x_min: f64, x_max: f64, y_max: f64) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        if !y.is_finite() {
            prev = None;
            continue;
        }
        let xx = map_x(x, x_min, x_max, width);
        let yy = map_y(y, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, xx, yy, '*');
        } else {
            grid[yy][xx] = '*';
        }
        prev = Some((xx, yy));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0 && (y0 as usize) < grid.len() && x0 >= 0 && (x0 as usize) < grid[0].len() {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_only_golden_snapshot() {
        // Flat density at 0.5 across [0, 1].
        let curve = vec![(0.0, 0.5), (1.0, 0.5)];
        let txt = render_plot(None, &curve, 10, 5);
        let expected = concat!(
            "Plot: x=[0.000, 1.000] | density=[0, 0.5250]\n",
            "**********\n",
            "\n",
            "\n",
            "\n",
            "\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn histogram_bars_reach_the_bottom_row() {
        let sample = Sample::new((0..100).map(|i| i as f64 / 10.0).collect()).unwrap();
        let txt = render_ascii_plot(&sample, &[], 50, 10);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 11);
        assert!(lines[0].ends_with("bins=25"));
        assert!(lines[10].chars().all(|c| c == '#'));
        assert_eq!(lines[10].len(), 50);
    }

    #[test]
    fn curve_is_drawn_over_bars() {
        let sample = Sample::new(vec![0.0, 1.0, 1.0, 2.0]).unwrap();
        let curve = vec![(0.0, 0.0), (1.0, 0.5), (2.0, 0.0)];
        let txt = render_ascii_plot(&sample, &curve, 20, 8);
        assert!(txt.contains('#'));
        assert!(txt.contains('*'));
    }
}
