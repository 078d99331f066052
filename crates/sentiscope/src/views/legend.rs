//! Categorical and gradient legends.

use super::axis::format_tick;
use sentiscope_core::{Canvas, Color, ColorScale, Point, Rect, TextStyle};

/// Swatch edge of a categorical legend row.
pub const SWATCH: f32 = 15.0;

/// Vertical distance between categorical rows.
pub const ROW_HEIGHT: f32 = 20.0;

/// Width of one gradient swatch.
pub const GRADIENT_SWATCH_WIDTH: f32 = 12.0;

/// Height of the gradient strip.
pub const GRADIENT_HEIGHT: f32 = 10.0;

/// One swatch and label per entry, stacked downward from `origin`.
pub fn paint_categorical(canvas: &mut dyn Canvas, origin: Point, entries: &[(String, Color)]) {
    let style = TextStyle::default();
    for (i, (label, color)) in entries.iter().enumerate() {
        let y = origin.y + i as f32 * ROW_HEIGHT;
        canvas.fill_rect(Rect::new(origin.x, y, SWATCH, SWATCH), *color);
        canvas.draw_text(label, Point::new(origin.x + 20.0, y + 12.0), &style);
    }
}

/// A titled horizontal strip with one swatch per sample of `scale`.
///
/// Returns the number of swatches drawn.
pub fn paint_gradient(
    canvas: &mut dyn Canvas,
    origin: Point,
    scale: &ColorScale,
    step: f64,
    title: &str,
) -> usize {
    let samples = scale.sample(step);
    let label_style = TextStyle {
        size: 10.0,
        ..TextStyle::default()
    };
    canvas.draw_text(title, Point::new(origin.x, origin.y + 10.0), &TextStyle::default());

    let strip_y = origin.y + 16.0;
    for (i, (_, color)) in samples.iter().enumerate() {
        let x = origin.x + i as f32 * GRADIENT_SWATCH_WIDTH;
        canvas.fill_rect(
            Rect::new(x, strip_y, GRADIENT_SWATCH_WIDTH, GRADIENT_HEIGHT),
            *color,
        );
    }

    if let (Some(first), Some(last)) = (samples.first(), samples.last()) {
        let label_y = strip_y + GRADIENT_HEIGHT + 12.0;
        let end_x = origin.x + (samples.len() - 1) as f32 * GRADIENT_SWATCH_WIDTH;
        canvas.draw_text(&format_tick(first.0), Point::new(origin.x, label_y), &label_style);
        canvas.draw_text(&format_tick(last.0), Point::new(end_x, label_y), &label_style);
    }
    samples.len()
}
