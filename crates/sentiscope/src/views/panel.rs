//! Boxed overlays: the hover detail box and the selection list.

use crate::interaction::Overlay;
use sentiscope_core::{Canvas, Color, FontWeight, Point, Rect, Size, TextStyle};

/// Inner padding of every box.
pub const PADDING: f32 = 10.0;

/// Text size inside boxes.
pub const TEXT_SIZE: f32 = 12.0;

/// Baseline distance between text lines.
pub const LINE_HEIGHT: f32 = 18.0;

/// The hover overlay opens this far left of the pointer.
pub const ANCHOR_OFFSET_X: f32 = 150.0;

/// Longest line shown in the selection panel, in characters.
pub const MAX_LINE_CHARS: usize = 40;

/// Average glyph advance relative to the font size.
const GLYPH_ADVANCE: f32 = 0.6;

fn border_color() -> Color {
    Color::rgb8(0xcc, 0xcc, 0xcc)
}

/// Top-left corner of the hover overlay for a pointer at `anchor`.
#[must_use]
pub fn overlay_origin(anchor: Point) -> Point {
    Point::new(anchor.x - ANCHOR_OFFSET_X, anchor.y)
}

/// Estimated size of a block of lines, padding excluded.
#[must_use]
pub fn text_block_size(lines: &[&str]) -> Size {
    let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    Size::new(
        longest as f32 * TEXT_SIZE * GLYPH_ADVANCE,
        lines.len() as f32 * LINE_HEIGHT,
    )
}

/// White box with a light border.
pub fn paint_box(canvas: &mut dyn Canvas, bounds: Rect) {
    canvas.fill_rect(bounds, Color::WHITE);
    canvas.stroke_rect(bounds, border_color(), 1.0);
}

fn paint_lines(canvas: &mut dyn Canvas, origin: Point, lines: &[&str], style: &TextStyle) {
    for (i, line) in lines.iter().enumerate() {
        let baseline = origin.y + (i as f32).mul_add(LINE_HEIGHT, TEXT_SIZE);
        canvas.draw_text(line, Point::new(origin.x, baseline), style);
    }
}

/// Paint the hover overlay for a pointer at `anchor`.
pub fn paint_overlay(canvas: &mut dyn Canvas, overlay: &Overlay, anchor: Point) {
    let origin = overlay_origin(anchor);
    let content = match overlay {
        Overlay::BarChart(chart) => chart.size(),
        Overlay::Text(text) => {
            let lines: Vec<&str> = text.lines.iter().map(String::as_str).collect();
            text_block_size(&lines)
        }
    };
    paint_box(
        canvas,
        Rect::new(
            origin.x,
            origin.y,
            2.0f32.mul_add(PADDING, content.width),
            2.0f32.mul_add(PADDING, content.height),
        ),
    );

    let inner = Point::new(origin.x + PADDING, origin.y + PADDING);
    match overlay {
        Overlay::BarChart(chart) => chart.paint(canvas, inner),
        Overlay::Text(text) => {
            let lines: Vec<&str> = text.lines.iter().map(String::as_str).collect();
            let style = TextStyle {
                size: TEXT_SIZE,
                ..TextStyle::default()
            };
            paint_lines(canvas, inner, &lines, &style);
        }
    }
}

/// Paint the selection list, most recent first, in a box `width` wide.
///
/// Long lines are cut to [`MAX_LINE_CHARS`] characters.
pub fn paint_selection(canvas: &mut dyn Canvas, origin: Point, width: f32, texts: &[&str]) {
    let shortened: Vec<String> = texts.iter().map(|t| shorten(t)).collect();
    let height = (texts.len() + 1) as f32 * LINE_HEIGHT;
    paint_box(
        canvas,
        Rect::new(origin.x, origin.y, width, 2.0f32.mul_add(PADDING, height)),
    );

    let title = TextStyle {
        size: TEXT_SIZE,
        weight: FontWeight::Bold,
        ..TextStyle::default()
    };
    let inner = Point::new(origin.x + PADDING, origin.y + PADDING);
    paint_lines(canvas, inner, &["Selected"], &title);

    let body = TextStyle {
        size: TEXT_SIZE,
        ..TextStyle::default()
    };
    let lines: Vec<&str> = shortened.iter().map(String::as_str).collect();
    paint_lines(
        canvas,
        Point::new(inner.x, inner.y + LINE_HEIGHT),
        &lines,
        &body,
    );
}

fn shorten(text: &str) -> String {
    if text.chars().count() <= MAX_LINE_CHARS {
        return text.to_string();
    }
    let mut out: String = text.chars().take(MAX_LINE_CHARS - 3).collect();
    out.push_str("...");
    out
}
