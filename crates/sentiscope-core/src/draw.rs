//! Draw commands.
//!
//! All rendering reduces to these primitives.

use crate::{Color, Point, Rect};
use serde::{Deserialize, Serialize};

/// Stroke style for path rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    /// Stroke color
    pub color: Color,
    /// Stroke width in pixels
    pub width: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1.0,
        }
    }
}

/// Box style for rectangles and circles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxStyle {
    /// Fill color (None = no fill)
    pub fill: Option<Color>,
    /// Stroke style (None = no stroke)
    pub stroke: Option<StrokeStyle>,
}

impl Default for BoxStyle {
    fn default() -> Self {
        Self {
            fill: Some(Color::WHITE),
            stroke: None,
        }
    }
}

impl BoxStyle {
    /// Create a box with only fill color.
    #[must_use]
    pub const fn fill(color: Color) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
        }
    }

    /// Create a box with only stroke.
    #[must_use]
    pub const fn stroke(style: StrokeStyle) -> Self {
        Self {
            fill: None,
            stroke: Some(style),
        }
    }
}

/// Font weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontWeight {
    /// Normal (400)
    #[default]
    Normal,
    /// Bold (700)
    Bold,
}

/// Horizontal text alignment relative to the draw position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAnchor {
    /// Position is the left edge
    #[default]
    Start,
    /// Position is the center
    Middle,
    /// Position is the right edge
    End,
}

/// Text style for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font size in pixels
    pub size: f32,
    /// Text color
    pub color: Color,
    /// Font weight
    pub weight: FontWeight,
    /// Alignment
    pub anchor: TextAnchor,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 12.0,
            color: Color::BLACK,
            weight: FontWeight::Normal,
            anchor: TextAnchor::Start,
        }
    }
}

/// 2D affine transformation matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    /// Matrix elements [a, b, c, d, e, f]
    /// | a c e |
    /// | b d f |
    /// | 0 0 1 |
    pub matrix: [f32; 6],
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform2D {
    /// Identity transformation.
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            matrix: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
        }
    }

    /// Create a translation transform.
    #[must_use]
    pub const fn translate(x: f32, y: f32) -> Self {
        Self {
            matrix: [1.0, 0.0, 0.0, 1.0, x, y],
        }
    }

    /// Chain transforms: first apply self, then apply other.
    ///
    /// For point p: `a.then(b).apply(p)` == `b.apply(a.apply(p))`
    #[must_use]
    pub fn then(&self, other: &Self) -> Self {
        let a = other.matrix;
        let b = self.matrix;
        Self {
            matrix: [
                a[0] * b[0] + a[2] * b[1],
                a[1] * b[0] + a[3] * b[1],
                a[0] * b[2] + a[2] * b[3],
                a[1] * b[2] + a[3] * b[3],
                a[0] * b[4] + a[2] * b[5] + a[4],
                a[1] * b[4] + a[3] * b[5] + a[5],
            ],
        }
    }

    /// Transform a point.
    #[must_use]
    pub fn apply(&self, point: Point) -> Point {
        let m = self.matrix;
        Point::new(
            m[0] * point.x + m[2] * point.y + m[4],
            m[1] * point.x + m[3] * point.y + m[5],
        )
    }
}

/// Drawing primitive - all rendering reduces to these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// Stroke a polyline
    Path {
        /// Points defining the path
        points: Vec<Point>,
        /// Whether the path is closed
        closed: bool,
        /// Stroke style
        style: StrokeStyle,
    },

    /// Fill a closed polygon
    Polygon {
        /// Vertices
        points: Vec<Point>,
        /// Fill color
        fill: Color,
    },

    /// Draw a rectangle
    Rect {
        /// Rectangle bounds
        bounds: Rect,
        /// Box style
        style: BoxStyle,
    },

    /// Draw a circle
    Circle {
        /// Center point
        center: Point,
        /// Radius
        radius: f32,
        /// Box style
        style: BoxStyle,
    },

    /// Draw text
    Text {
        /// Text content
        content: String,
        /// Position (baseline)
        position: Point,
        /// Text style
        style: TextStyle,
    },
}

impl DrawCommand {
    /// Create a filled rectangle.
    #[must_use]
    pub const fn filled_rect(bounds: Rect, color: Color) -> Self {
        Self::Rect {
            bounds,
            style: BoxStyle::fill(color),
        }
    }

    /// Create a filled circle.
    #[must_use]
    pub const fn filled_circle(center: Point, radius: f32, color: Color) -> Self {
        Self::Circle {
            center,
            radius,
            style: BoxStyle::fill(color),
        }
    }

    /// Create a line between two points.
    #[must_use]
    pub fn line(from: Point, to: Point, style: StrokeStyle) -> Self {
        Self::Path {
            points: vec![from, to],
            closed: false,
            style,
        }
    }

    /// Fill color of a shape command, if any.
    #[must_use]
    pub fn fill_color(&self) -> Option<Color> {
        match self {
            Self::Polygon { fill, .. } => Some(*fill),
            Self::Rect { style, .. } | Self::Circle { style, .. } => style.fill,
            Self::Path { .. } | Self::Text { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_style_default() {
        let style = StrokeStyle::default();
        assert_eq!(style.color, Color::BLACK);
        assert_eq!(style.width, 1.0);
    }

    #[test]
    fn test_box_style_fill_and_stroke() {
        let fill = BoxStyle::fill(Color::RED);
        assert_eq!(fill.fill, Some(Color::RED));
        assert!(fill.stroke.is_none());

        let stroke = BoxStyle::stroke(StrokeStyle {
            color: Color::BLUE,
            width: 2.0,
        });
        assert!(stroke.fill.is_none());
        assert_eq!(stroke.stroke.map(|s| s.width), Some(2.0));
    }

    #[test]
    fn test_transform_translate() {
        let t = Transform2D::translate(10.0, 20.0);
        assert_eq!(t.apply(Point::ORIGIN), Point::new(10.0, 20.0));
    }

    #[test]
    fn test_transform_chain() {
        let t = Transform2D::translate(10.0, 0.0).then(&Transform2D::translate(5.0, 7.0));
        assert_eq!(t.apply(Point::new(1.0, 1.0)), Point::new(16.0, 8.0));
    }

    #[test]
    fn test_draw_command_fill_color() {
        let circle = DrawCommand::filled_circle(Point::new(5.0, 5.0), 3.0, Color::GREEN);
        assert_eq!(circle.fill_color(), Some(Color::GREEN));
        let line = DrawCommand::line(Point::ORIGIN, Point::new(1.0, 1.0), StrokeStyle::default());
        assert_eq!(line.fill_color(), None);
        let polygon = DrawCommand::Polygon {
            points: vec![Point::ORIGIN],
            fill: Color::BLUE,
        };
        assert_eq!(polygon.fill_color(), Some(Color::BLUE));
    }

    #[test]
    fn test_draw_command_serializes() {
        let cmd = DrawCommand::filled_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::RED);
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("Rect"));
        let back: DrawCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmd);
    }
}
