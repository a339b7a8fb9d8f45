//! Ratatui-based terminal UI for manual fitting.
//!
//! The user picks a family, nudges each parameter within the advisor's slider
//! bounds, and sees the density curve and quality metrics update on every edit.
//! The automatic fit seeds the sliders; `a` returns to it.

use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::app::pipeline::LoadedSample;
use crate::debug::{DebugContext, write_debug_bundle};
use crate::domain::{FamilyFit, ParameterRangeHint, ParameterVector, QualityReport};
use crate::error::{AppError, FitError};
use crate::fit::{FitOptions, Histogram, RangePolicy, defaults, evaluate, fit, fit_all, suggest_with};
use crate::models::{Family, curve, default_domain};

mod plotters_chart;

use plotters_chart::DensityChart;

/// Points on the on-screen density curve.
const CURVE_POINTS: usize = 200;
/// Multiplier of the hint step for `[` / `]`.
const COARSE_FACTOR: f64 = 10.0;

/// Start the TUI on an already loaded sample.
pub fn run(loaded: LoadedSample, family: Family) -> Result<(), AppError> {
    let mut app = App::new(loaded, family);

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    loaded: LoadedSample,
    histogram: Histogram,
    fit_options: FitOptions,
    policy: RangePolicy,

    family: Family,
    /// Automatic fit for `family` (`None` when it failed).
    fitted: Option<ParameterVector>,
    hints: Vec<ParameterRangeHint>,
    values: Vec<f64>,
    selected: usize,
    quality: Result<QualityReport, FitError>,

    /// Every family's automatic fit, computed on the first debug request.
    all_fits: Option<Vec<FamilyFit>>,
    status: String,
}

impl App {
    fn new(loaded: LoadedSample, family: Family) -> Self {
        let histogram = Histogram::auto(&loaded.sample);
        let mut app = Self {
            loaded,
            histogram,
            fit_options: FitOptions::default(),
            policy: RangePolicy::default(),
            family,
            fitted: None,
            hints: Vec::new(),
            values: Vec::new(),
            selected: 0,
            quality: Err(FitError::EvaluationError {
                family: family.display_name().to_string(),
                reason: "not evaluated yet".to_string(),
            }),
            all_fits: None,
            status: String::new(),
        };
        app.select_family(family);
        app
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => needs_redraw = true,
                _ => {}
            }
        }
        Ok(())
    }

    /// Apply one key press; `true` means quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Left => self.select_family(self.family.prev()),
            KeyCode::Right => self.select_family(self.family.next()),
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.selected + 1 < self.values.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.nudge(1.0),
            KeyCode::Char('-') | KeyCode::Char('_') => self.nudge(-1.0),
            KeyCode::Char(']') => self.nudge(COARSE_FACTOR),
            KeyCode::Char('[') => self.nudge(-COARSE_FACTOR),
            KeyCode::Char('a') => {
                self.values = defaults(&self.hints);
                if self.reevaluate() {
                    self.status = if self.fitted.is_some() {
                        self.with_clamp_note("Reset to the automatic fit")
                    } else {
                        "Reset to default parameters.".to_string()
                    };
                }
            }
            KeyCode::Char('d') => self.write_debug(),
            _ => {}
        }
        false
    }

    /// Fit `family`, rebuild its sliders and evaluate the starting point.
    fn select_family(&mut self, family: Family) {
        self.family = family;
        self.selected = 0;

        let sample = &self.loaded.sample;
        let fitted = fit(sample, family, &self.fit_options);
        self.hints = suggest_with(sample, family, fitted.as_ref().ok(), &self.policy);
        self.values = defaults(&self.hints);
        self.reevaluate();

        match fitted {
            Ok(p) => {
                self.fitted = Some(p);
                if self.quality.is_ok() {
                    self.status = self.with_clamp_note(&format!("{family}: automatic fit loaded"));
                }
            }
            Err(err) => {
                self.fitted = None;
                self.status = format!("{err}; using default parameters.");
            }
        }
    }

    /// `lead` plus the fitted values the slider bounds clamped, if any.
    fn with_clamp_note(&self, lead: &str) -> String {
        let Some(fitted) = &self.fitted else {
            return format!("{lead}.");
        };
        let clamped: Vec<String> = fitted
            .rows()
            .iter()
            .zip(&self.values)
            .filter(|(row, value)| row.value != **value)
            .map(|(row, _)| format!("{}={:.6}", row.name, row.value))
            .collect();
        if clamped.is_empty() {
            format!("{lead}.")
        } else {
            format!("{lead}, clamped to the slider bounds (fitted {}).", clamped.join(", "))
        }
    }

    /// Move the selected parameter by `factor` hint steps, clamped to its bounds.
    fn nudge(&mut self, factor: f64) {
        let Some(hint) = self.hints.get(self.selected) else {
            return;
        };
        let current = self.values[self.selected];
        let next = hint.clamp(current + factor * hint.step);
        if next == current {
            let side = if factor > 0.0 { "upper" } else { "lower" };
            self.status = format!("{} is at its {side} bound.", hint.name);
            return;
        }
        let label = format!("{} = {next:.6}", hint.name);
        self.values[self.selected] = next;
        if self.reevaluate() {
            self.status = label;
        }
    }

    /// Recompute the quality report; on failure the error becomes the status line.
    fn reevaluate(&mut self) -> bool {
        self.quality = evaluate(&self.loaded.sample, self.family, &self.values);
        match &self.quality {
            Ok(_) => true,
            Err(err) => {
                self.status = err.to_string();
                false
            }
        }
    }

    fn write_debug(&mut self) {
        let fits = self
            .all_fits
            .get_or_insert_with(|| fit_all(&self.loaded.sample, &self.fit_options));
        let current = ParameterVector::new(self.family, self.values.clone()).ok();
        let ctx = DebugContext {
            origin: &self.loaded.origin,
            sample: &self.loaded.sample,
            current: current.as_ref().map(|p| (p, &self.quality)),
            fits: fits.as_slice(),
        };
        self.status = match write_debug_bundle(Path::new("debug"), &ctx) {
            Ok(path) => format!("Wrote debug bundle: {}", path.display()),
            Err(err) => format!("Debug write failed: {err}"),
        };
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(frame.area());

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let s = self.loaded.sample.summary();
        let lines = vec![
            Line::from(vec![
                Span::styled("distfit", Style::default().fg(Color::Cyan)),
                Span::raw(format!(" | {} | family: ", self.loaded.origin)),
                Span::styled(
                    self.family.display_name(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(Span::styled(
                format!(
                    "n={} mean={:.4} std={:.4} min={:.4} max={:.4} median={:.4}",
                    s.count, s.mean, s.std_dev, s.min, s.max, s.median
                ),
                Style::default().fg(Color::Gray),
            )),
        ];
        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(area);
        let side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(8)])
            .split(chunks[1]);

        self.draw_chart(frame, chunks[0]);
        self.draw_sliders(frame, side[0]);
        self.draw_quality(frame, side[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Histogram + density").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let series = chart_series(self);
        let widget = DensityChart {
            histogram: &series.histogram,
            curve: &series.curve,
            x_bounds: series.x_bounds,
            y_bounds: series.y_bounds,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_sliders(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let bar_width = area.width.saturating_sub(6).clamp(8, 40) as usize;
        let items: Vec<ListItem> = self
            .hints
            .iter()
            .zip(&self.values)
            .map(|(hint, &value)| {
                ListItem::new(vec![
                    Line::from(format!("{:<6} {value:>12.6}  (step {:.4})", hint.name, hint.step)),
                    Line::from(Span::styled(
                        slider_bar(hint, value, bar_width),
                        Style::default().fg(Color::Gray),
                    )),
                ])
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Parameters").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_quality(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let lines = match &self.quality {
            Ok(q) => {
                let verdict = q.verdict();
                let color = match verdict {
                    crate::domain::FitVerdict::Good => Color::Green,
                    crate::domain::FitVerdict::Poor => Color::Red,
                };
                vec![
                    Line::from(format!("MSE        {:.6}", q.mse)),
                    Line::from(format!("Max error  {:.6}", q.max_error)),
                    Line::from(format!("KS stat    {:.4}", q.ks_statistic)),
                    Line::from(format!("KS p-value {:.4}", q.ks_p_value)),
                    Line::from(Span::styled(verdict.label(), Style::default().fg(color))),
                ]
            }
            Err(err) => vec![Line::from(Span::styled(
                format!("Cannot evaluate fit: {err}"),
                Style::default().fg(Color::Yellow),
            ))],
        };
        let p = Paragraph::new(Text::from(lines))
            .wrap(ratatui::widgets::Wrap { trim: true })
            .block(Block::default().title("Fit quality").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "←/→ family  ↑/↓ param  +/- step  [/] coarse  a auto  d debug  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

struct ChartSeries {
    histogram: Vec<(f64, f64)>,
    curve: Vec<(f64, f64)>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

/// Build chart series for Plotters.
///
/// The y range follows the histogram; a density spike (e.g. a shape below 1 at
/// the support edge) is clipped at three times the tallest bar.
fn chart_series(app: &App) -> ChartSeries {
    let (x0, x1) = default_domain(&app.loaded.sample);
    let histogram = histogram_outline(&app.histogram);

    let hist_top = app.histogram.max_density();
    let raw_curve = curve(app.family, &app.values, x0, x1, CURVE_POINTS).unwrap_or_default();
    let curve_top = raw_curve
        .iter()
        .map(|&(_, y)| y)
        .filter(|y| y.is_finite())
        .fold(0.0, f64::max);

    let mut y_top = hist_top.max(curve_top);
    if hist_top > 0.0 {
        y_top = y_top.min(3.0 * hist_top);
    }
    if !(y_top.is_finite() && y_top > 0.0) {
        y_top = 1.0;
    }
    let y_top = y_top * 1.05;

    let curve = raw_curve
        .into_iter()
        .filter(|(_, y)| !y.is_nan())
        .map(|(x, y)| (x, y.min(y_top)))
        .collect();

    ChartSeries {
        histogram,
        curve,
        x_bounds: [x0, x1],
        y_bounds: [0.0, y_top],
    }
}

/// Closed step outline of a density histogram, starting and ending on y = 0.
fn histogram_outline(hist: &Histogram) -> Vec<(f64, f64)> {
    let mut out = Vec::with_capacity(2 * hist.bins() + 2);
    out.push((hist.edges[0], 0.0));
    for (i, &d) in hist.density.iter().enumerate() {
        out.push((hist.edges[i], d));
        out.push((hist.edges[i + 1], d));
    }
    out.push((hist.edges[hist.edges.len() - 1], 0.0));
    out
}

/// Text slider: `lower ━━━●──── upper` scaled to `width` cells.
fn slider_bar(hint: &ParameterRangeHint, value: f64, width: usize) -> String {
    let width = width.max(2);
    let span = hint.upper - hint.lower;
    let u = if span > 0.0 {
        ((value - hint.lower) / span).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let pos = (u * (width as f64 - 1.0)).round() as usize;

    let mut bar = String::with_capacity(width * 3);
    for i in 0..width {
        bar.push(match i.cmp(&pos) {
            std::cmp::Ordering::Less => '━',
            std::cmp::Ordering::Equal => '●',
            std::cmp::Ordering::Greater => '─',
        });
    }
    bar
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Sample;
    use crate::models::ParamRole;

    fn app(values: Vec<f64>, family: Family) -> App {
        let loaded = LoadedSample {
            sample: Sample::new(values).unwrap(),
            origin: "test".to_string(),
            row_errors: Vec::new(),
        };
        App::new(loaded, family)
    }

    fn small() -> Vec<f64> {
        vec![3.0, 4.0, 4.0, 5.0, 5.0, 5.0, 6.0, 6.0, 7.0]
    }

    #[test]
    fn starts_from_the_automatic_fit() {
        let app = app(small(), Family::Normal);
        assert!(app.fitted.is_some());
        assert!((app.values[0] - 5.0).abs() < 1e-9);
        assert!(app.quality.is_ok());
    }

    #[test]
    fn arrows_cycle_families_and_parameters() {
        let mut app = app(small(), Family::Normal);
        app.handle_key(KeyCode::Right);
        assert_eq!(app.family, Family::Gamma);
        assert_eq!(app.values.len(), 3);

        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Down);
        assert_eq!(app.selected, 2);

        app.handle_key(KeyCode::Left);
        app.handle_key(KeyCode::Left);
        assert_eq!(app.family, Family::StudentT);
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn edits_stay_inside_slider_bounds() {
        let mut app = app(small(), Family::Normal);
        app.handle_key(KeyCode::Down);
        for _ in 0..1000 {
            app.handle_key(KeyCode::Char('['));
        }
        let hint = &app.hints[1];
        assert_eq!(hint.role, ParamRole::Scale);
        assert_eq!(app.values[1], hint.lower);
        assert!(app.status.contains("lower bound"));
        assert!(app.quality.is_ok());
    }

    #[test]
    fn reset_returns_to_the_fit() {
        let mut app = app(small(), Family::Normal);
        let start = app.values.clone();
        app.handle_key(KeyCode::Char(']'));
        assert_ne!(app.values, start);
        app.handle_key(KeyCode::Char('a'));
        assert_eq!(app.values, start);
        assert!(!app.handle_key(KeyCode::Char('a')));
        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn reset_reports_clamped_fitted_values() {
        let mut app = app(small(), Family::Gamma);
        let fitted = ParameterVector::new(Family::Gamma, vec![1e6, -1000.0, 0.001]).unwrap();
        app.hints = suggest_with(&app.loaded.sample, Family::Gamma, Some(&fitted), &app.policy);
        app.fitted = Some(fitted);

        app.handle_key(KeyCode::Char('a'));
        assert_eq!(app.values[0], app.hints[0].upper);
        assert!(app.status.contains("clamped"), "{}", app.status);
        assert!(app.status.contains(&format!("{}=1000000.000000", app.hints[0].name)));
    }

    #[test]
    fn reset_without_clamping_says_so_plainly() {
        let mut app = app(small(), Family::Normal);
        app.handle_key(KeyCode::Char('+'));
        app.handle_key(KeyCode::Char('a'));
        assert_eq!(app.status, "Reset to the automatic fit.");
    }

    #[test]
    fn failed_fit_reports_and_keeps_editing() {
        let mut app = app(vec![2.0, 2.0, 2.0], Family::Normal);
        assert!(app.fitted.is_none());
        assert!(app.status.contains("degenerate sample"));
        app.handle_key(KeyCode::Char('+'));
        assert!(app.quality.is_err());
        assert!(app.status.contains("cannot evaluate"));
    }

    #[test]
    fn outline_is_closed_on_the_axis() {
        let sample = Sample::new(small()).unwrap();
        let hist = Histogram::auto(&sample);
        let outline = histogram_outline(&hist);
        assert_eq!(outline.len(), 2 * hist.bins() + 2);
        assert_eq!(outline[0], (3.0, 0.0));
        assert_eq!(outline[outline.len() - 1], (7.0, 0.0));
    }

    #[test]
    fn slider_marks_the_value() {
        let hint = ParameterRangeHint {
            name: "loc".to_string(),
            role: ParamRole::Location,
            lower: 0.0,
            upper: 10.0,
            step: 0.1,
            default: 5.0,
        };
        assert_eq!(slider_bar(&hint, 0.0, 5), "●────");
        assert_eq!(slider_bar(&hint, 5.0, 5), "━━●──");
        assert_eq!(slider_bar(&hint, 99.0, 5), "━━━━●");
    }
}
