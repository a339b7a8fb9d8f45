//! Plotters-powered density chart widget for Ratatui.
//!
//! Plotters gives nicer axis + label rendering than Ratatui's built-in `Chart`.
//! Output is drawn into the Ratatui buffer with `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A render-only chart description; series and bounds are computed by the caller.
pub struct DensityChart<'a> {
    /// Step outline of the sample histogram (density scale).
    pub histogram: &'a [(f64, f64)],
    /// Fitted density curve.
    pub curve: &'a [(f64, f64)],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl Widget for DensityChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters cannot lay out a chart this small.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 7)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc("x")
                .y_desc("density")
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| format!("{v:.2}"))
                .y_label_formatter(&|v| format!("{v:.3}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let hist_color = RGBColor(128, 128, 128);
            let curve_color = RGBColor(0, 255, 255);

            chart.draw_series(LineSeries::new(self.histogram.iter().copied(), &hist_color))?;
            chart.draw_series(LineSeries::new(self.curve.iter().copied(), &curve_color))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
