//! Mini bar chart shown while a streamgraph layer is hovered.

use super::axis::{self, Orientation};
use super::Margin;
use sentiscope_core::scale::date_from_day_number;
use sentiscope_core::{BandScale, Canvas, Color, LinearScale, Point, Rect, Size, Transform2D};
use sentiscope_layout::Layer;

/// One bar per x value of the hovered layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Axis label (abbreviated month)
    pub label: String,
    /// Input value
    pub value: f64,
    /// Bar rectangle in plot coordinates
    pub rect: Rect,
}

/// Detail chart built fresh from a layer on every hover.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    key: String,
    color: Color,
    size: Size,
    margin: Margin,
    bars: Vec<Bar>,
    y_scale: LinearScale,
    y_ticks: Vec<f64>,
}

impl BarChart {
    /// Outer size of the chart.
    pub const SIZE: Size = Size::new(300.0, 200.0);

    /// Inner padding of the chart.
    pub const MARGIN: Margin = Margin::new(10.0, 10.0, 30.0, 40.0);

    /// Number of requested y ticks.
    pub const Y_TICKS: usize = 5;

    /// Build the chart for `layer` drawn in `color`.
    #[must_use]
    pub fn from_layer(layer: &Layer, color: Color) -> Self {
        let size = Self::SIZE;
        let margin = Self::MARGIN;
        let plot_width = f64::from(size.width - margin.left - margin.right);
        let plot_height = f64::from(size.height - margin.top - margin.bottom);

        let x_scale = BandScale::new(layer.bands.iter().map(|b| b.x.to_bits()), (0.0, plot_width))
            .padding(0.1);
        let max = layer.max_value();
        let y_scale = LinearScale::new((0.0, if max > 0.0 { max } else { 1.0 }), (plot_height, 0.0))
            .nice(Self::Y_TICKS);

        let bars = layer
            .bands
            .iter()
            .filter_map(|band| {
                let left = x_scale.position(&band.x.to_bits())?;
                let top = y_scale.map(band.value);
                Some(Bar {
                    label: month_label(band.x),
                    value: band.value,
                    rect: Rect::new(
                        left as f32,
                        top as f32,
                        x_scale.bandwidth() as f32,
                        (plot_height - top).max(0.0) as f32,
                    ),
                })
            })
            .collect();

        Self {
            key: layer.key.clone(),
            color,
            size,
            margin,
            bars,
            y_ticks: y_scale.ticks(Self::Y_TICKS),
            y_scale,
        }
    }

    /// Layer key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Bar fill color.
    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Bars in x order.
    #[must_use]
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// The y scale after rounding the domain outward.
    #[must_use]
    pub const fn y_scale(&self) -> &LinearScale {
        &self.y_scale
    }

    /// Y tick values.
    #[must_use]
    pub fn y_ticks(&self) -> &[f64] {
        &self.y_ticks
    }

    /// Outer size.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Paint with the chart's top-left corner at `origin`.
    pub fn paint(&self, canvas: &mut dyn Canvas, origin: Point) {
        let plot_height = self.size.height - self.margin.top - self.margin.bottom;
        let plot_width = self.size.width - self.margin.left - self.margin.right;

        canvas.push_transform(Transform2D::translate(
            origin.x + self.margin.left,
            origin.y + self.margin.top,
        ));

        for bar in &self.bars {
            canvas.fill_rect(bar.rect, self.color);
        }

        let x_ticks: Vec<(f32, String)> = self
            .bars
            .iter()
            .map(|bar| (bar.rect.x + bar.rect.width / 2.0, bar.label.clone()))
            .collect();
        axis::paint(
            canvas,
            Orientation::Bottom,
            Point::new(0.0, plot_height),
            plot_width,
            &x_ticks,
            10.0,
        );

        let y_ticks: Vec<(f32, String)> = self
            .y_ticks
            .iter()
            .map(|&t| (self.y_scale.map(t) as f32, axis::format_tick(t)))
            .collect();
        axis::paint(canvas, Orientation::Left, Point::ORIGIN, plot_height, &y_ticks, 10.0);

        canvas.pop_transform();
    }
}

fn month_label(day: f64) -> String {
    date_from_day_number(day).map_or_else(String::new, |d| d.format("%b").to_string())
}
