//! SVG backend for the [`Canvas`] trait.

use sentiscope_core::{
    Canvas, Color, FontWeight, Point, Rect, TextAnchor, TextStyle, Transform2D,
};
use std::fmt::Write;

/// Accumulates SVG elements in surface coordinates.
#[derive(Debug, Default)]
pub(crate) struct SvgCanvas {
    body: String,
    transforms: Vec<Transform2D>,
}

impl SvgCanvas {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Wrap the drawn elements in an `<svg>` root of the given size.
    pub(crate) fn finish(&self, width: f64, height: f64) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" \
viewBox=\"0 0 {width} {height}\" font-family=\"sans-serif\">\n{}</svg>\n",
            self.body
        )
    }

    fn current(&self) -> Transform2D {
        self.transforms.last().copied().unwrap_or_default()
    }

    fn map(&self, point: Point) -> Point {
        self.current().apply(point)
    }

    fn points_attr(&self, points: &[Point]) -> String {
        points
            .iter()
            .map(|p| {
                let p = self.map(*p);
                format!("{:.2},{:.2}", p.x, p.y)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn line(&mut self, element: &str) {
        self.body.push_str(element);
        self.body.push('\n');
    }
}

fn paint(color: Color) -> String {
    if color.a < 1.0 {
        format!("{}\" fill-opacity=\"{:.3}", color.to_hex(), color.a)
    } else {
        color.to_hex()
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

impl Canvas for SvgCanvas {
    fn clear(&mut self) {
        self.body.clear();
        self.transforms.clear();
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let o = self.map(rect.origin());
        let element = format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\"/>",
            o.x,
            o.y,
            rect.width,
            rect.height,
            paint(color)
        );
        self.line(&element);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) {
        let o = self.map(rect.origin());
        let element = format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"none\" \
stroke=\"{}\" stroke-width=\"{width}\"/>",
            o.x,
            o.y,
            rect.width,
            rect.height,
            color.to_hex()
        );
        self.line(&element);
    }

    fn draw_text(&mut self, text: &str, position: Point, style: &TextStyle) {
        let p = self.map(position);
        let anchor = match style.anchor {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        };
        let mut element = format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" font-size=\"{}\" fill=\"{}\" text-anchor=\"{anchor}\"",
            p.x,
            p.y,
            style.size,
            paint(style.color)
        );
        if style.weight == FontWeight::Bold {
            element.push_str(" font-weight=\"bold\"");
        }
        let _ = write!(element, ">{}</text>", escape(text));
        self.line(&element);
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f32) {
        let (a, b) = (self.map(from), self.map(to));
        let element = format!(
            "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"{width}\"/>",
            a.x,
            a.y,
            b.x,
            b.y,
            color.to_hex()
        );
        self.line(&element);
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) {
        let c = self.map(center);
        let element = format!(
            "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{radius}\" fill=\"{}\"/>",
            c.x,
            c.y,
            paint(color)
        );
        self.line(&element);
    }

    fn stroke_circle(&mut self, center: Point, radius: f32, color: Color, width: f32) {
        let c = self.map(center);
        let element = format!(
            "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{radius}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{width}\"/>",
            c.x,
            c.y,
            color.to_hex()
        );
        self.line(&element);
    }

    fn draw_path(&mut self, points: &[Point], color: Color, width: f32) {
        let element = format!(
            "<polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{width}\"/>",
            self.points_attr(points),
            color.to_hex()
        );
        self.line(&element);
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        let element = format!(
            "<polygon points=\"{}\" fill=\"{}\"/>",
            self.points_attr(points),
            paint(color)
        );
        self.line(&element);
    }

    fn push_transform(&mut self, transform: Transform2D) {
        let composed = transform.then(&self.current());
        self.transforms.push(composed);
    }

    fn pop_transform(&mut self) {
        self.transforms.pop();
    }
}
