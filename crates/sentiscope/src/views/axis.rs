//! Axis lines, tick marks and tick labels.

use sentiscope_core::{Canvas, Color, Point, TextAnchor, TextStyle};

const TICK_SIZE: f32 = 6.0;
const LABEL_GAP: f32 = 3.0;

/// Which side of the plot the axis sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Horizontal axis with labels below
    Bottom,
    /// Vertical axis with labels to the left
    Left,
}

/// Paint an axis starting at `origin` spanning `length` pixels.
///
/// `ticks` holds offsets along the axis (relative to `origin`) and labels.
pub fn paint(
    canvas: &mut dyn Canvas,
    orientation: Orientation,
    origin: Point,
    length: f32,
    ticks: &[(f32, String)],
    font_size: f32,
) {
    let color = Color::BLACK;
    let end = match orientation {
        Orientation::Bottom => Point::new(origin.x + length, origin.y),
        Orientation::Left => Point::new(origin.x, origin.y + length),
    };
    canvas.draw_line(origin, end, color, 1.0);

    let style = TextStyle {
        size: font_size,
        color,
        anchor: match orientation {
            Orientation::Bottom => TextAnchor::Middle,
            Orientation::Left => TextAnchor::End,
        },
        ..TextStyle::default()
    };

    for (offset, label) in ticks {
        match orientation {
            Orientation::Bottom => {
                let x = origin.x + offset;
                canvas.draw_line(
                    Point::new(x, origin.y),
                    Point::new(x, origin.y + TICK_SIZE),
                    color,
                    1.0,
                );
                canvas.draw_text(
                    label,
                    Point::new(x, origin.y + TICK_SIZE + LABEL_GAP + font_size),
                    &style,
                );
            }
            Orientation::Left => {
                let y = origin.y + offset;
                canvas.draw_line(
                    Point::new(origin.x - TICK_SIZE, y),
                    Point::new(origin.x, y),
                    color,
                    1.0,
                );
                canvas.draw_text(
                    label,
                    Point::new(origin.x - TICK_SIZE - LABEL_GAP, y + font_size * 0.35),
                    &style,
                );
            }
        }
    }
}

/// Format a tick value without floating point noise.
#[must_use]
pub fn format_tick(value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() < 1e-9 {
        return format!("{}", rounded as i64);
    }
    let text = format!("{value:.6}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
