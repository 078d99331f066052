//! Drawing surface abstraction and a recording implementation.

use crate::draw::{BoxStyle, DrawCommand, StrokeStyle, TextStyle, Transform2D};
use crate::{Color, Point, Rect};

/// Drawing surface owned exclusively by one render pass.
///
/// Views issue commands against this trait and never touch a concrete
/// backend. A pass always begins with [`Canvas::clear`].
pub trait Canvas {
    /// Discard everything drawn so far, including pushed transforms.
    fn clear(&mut self);

    /// Draw a filled rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draw a stroked rectangle.
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32);

    /// Draw text.
    fn draw_text(&mut self, text: &str, position: Point, style: &TextStyle);

    /// Draw a line between two points.
    fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f32);

    /// Draw a filled circle.
    fn fill_circle(&mut self, center: Point, radius: f32, color: Color);

    /// Draw a stroked circle.
    fn stroke_circle(&mut self, center: Point, radius: f32, color: Color, width: f32);

    /// Draw a path (polyline).
    fn draw_path(&mut self, points: &[Point], color: Color, width: f32);

    /// Fill a polygon.
    fn fill_polygon(&mut self, points: &[Point], color: Color);

    /// Push a transform, composed with the current one.
    fn push_transform(&mut self, transform: Transform2D);

    /// Pop the most recent transform.
    fn pop_transform(&mut self);
}

/// A Canvas implementation that records draw operations as `DrawCommand`s.
///
/// Recorded coordinates are in surface space: the current transform is
/// applied before a command is stored.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
    transform_stack: Vec<Transform2D>,
    clear_count: usize,
}

impl RecordingCanvas {
    /// Create a new empty recording canvas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the recorded draw commands.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take ownership of the recorded commands.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Get the number of recorded commands.
    #[must_use]
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Check if no commands have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// How many times the canvas has been cleared.
    #[must_use]
    pub const fn clear_count(&self) -> usize {
        self.clear_count
    }

    /// Get the current transform (identity if no transforms pushed).
    #[must_use]
    pub fn current_transform(&self) -> Transform2D {
        self.transform_stack
            .last()
            .copied()
            .unwrap_or_else(Transform2D::identity)
    }

    /// Get the transform stack depth.
    #[must_use]
    pub fn transform_depth(&self) -> usize {
        self.transform_stack.len()
    }

    /// Circles in draw order.
    pub fn circles(&self) -> impl Iterator<Item = (Point, f32, &BoxStyle)> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Circle {
                center,
                radius,
                style,
            } => Some((*center, *radius, style)),
            _ => None,
        })
    }

    /// Text runs in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Text { content, .. } => Some(content.as_str()),
            _ => None,
        })
    }

    fn map(&self, point: Point) -> Point {
        self.current_transform().apply(point)
    }

    fn map_rect(&self, rect: Rect) -> Rect {
        let origin = self.map(rect.origin());
        Rect::new(origin.x, origin.y, rect.width, rect.height)
    }
}

impl Canvas for RecordingCanvas {
    fn clear(&mut self) {
        self.commands.clear();
        self.transform_stack.clear();
        self.clear_count += 1;
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let bounds = self.map_rect(rect);
        self.commands.push(DrawCommand::filled_rect(bounds, color));
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) {
        let bounds = self.map_rect(rect);
        self.commands.push(DrawCommand::Rect {
            bounds,
            style: BoxStyle::stroke(StrokeStyle { color, width }),
        });
    }

    fn draw_text(&mut self, text: &str, position: Point, style: &TextStyle) {
        let position = self.map(position);
        self.commands.push(DrawCommand::Text {
            content: text.to_string(),
            position,
            style: style.clone(),
        });
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f32) {
        let (from, to) = (self.map(from), self.map(to));
        self.commands
            .push(DrawCommand::line(from, to, StrokeStyle { color, width }));
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) {
        let center = self.map(center);
        self.commands
            .push(DrawCommand::filled_circle(center, radius, color));
    }

    fn stroke_circle(&mut self, center: Point, radius: f32, color: Color, width: f32) {
        let center = self.map(center);
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            style: BoxStyle::stroke(StrokeStyle { color, width }),
        });
    }

    fn draw_path(&mut self, points: &[Point], color: Color, width: f32) {
        let points = points.iter().map(|p| self.map(*p)).collect();
        self.commands.push(DrawCommand::Path {
            points,
            closed: false,
            style: StrokeStyle { color, width },
        });
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        let points = points.iter().map(|p| self.map(*p)).collect();
        self.commands.push(DrawCommand::Polygon {
            points,
            fill: color,
        });
    }

    fn push_transform(&mut self, transform: Transform2D) {
        let combined = transform.then(&self.current_transform());
        self.transform_stack.push(combined);
    }

    fn pop_transform(&mut self) {
        self.transform_stack.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_canvas_new() {
        let canvas = RecordingCanvas::new();
        assert!(canvas.is_empty());
        assert_eq!(canvas.command_count(), 0);
        assert_eq!(canvas.transform_depth(), 0);
    }

    #[test]
    fn test_recording_canvas_fill_rect() {
        let mut canvas = RecordingCanvas::new();
        canvas.fill_rect(Rect::new(10.0, 20.0, 100.0, 50.0), Color::RED);

        assert_eq!(canvas.command_count(), 1);
        match &canvas.commands()[0] {
            DrawCommand::Rect { bounds, style } => {
                assert_eq!(bounds.x, 10.0);
                assert_eq!(style.fill, Some(Color::RED));
            }
            _ => panic!("Expected Rect command"),
        }
    }

    #[test]
    fn test_recording_canvas_clear_resets_everything() {
        let mut canvas = RecordingCanvas::new();
        canvas.push_transform(Transform2D::translate(5.0, 5.0));
        canvas.fill_circle(Point::ORIGIN, 3.0, Color::BLUE);
        canvas.clear();

        assert!(canvas.is_empty());
        assert_eq!(canvas.transform_depth(), 0);
        assert_eq!(canvas.clear_count(), 1);
    }

    #[test]
    fn test_recording_canvas_applies_transform() {
        let mut canvas = RecordingCanvas::new();
        canvas.push_transform(Transform2D::translate(50.0, 20.0));
        canvas.fill_circle(Point::new(1.0, 2.0), 6.0, Color::GREEN);
        canvas.pop_transform();
        canvas.fill_circle(Point::new(1.0, 2.0), 6.0, Color::GREEN);

        let centers: Vec<Point> = canvas.circles().map(|(c, _, _)| c).collect();
        assert_eq!(centers, vec![Point::new(51.0, 22.0), Point::new(1.0, 2.0)]);
    }

    #[test]
    fn test_recording_canvas_nested_transforms() {
        let mut canvas = RecordingCanvas::new();
        canvas.push_transform(Transform2D::translate(10.0, 0.0));
        canvas.push_transform(Transform2D::translate(0.0, 10.0));
        assert_eq!(canvas.transform_depth(), 2);
        canvas.fill_polygon(&[Point::ORIGIN, Point::new(1.0, 0.0), Point::new(0.0, 1.0)], Color::RED);

        match &canvas.commands()[0] {
            DrawCommand::Polygon { points, .. } => assert_eq!(points[0], Point::new(10.0, 10.0)),
            _ => panic!("Expected Polygon command"),
        }
    }

    #[test]
    fn test_recording_canvas_text_and_lines() {
        let mut canvas = RecordingCanvas::new();
        canvas.draw_text("March", Point::new(25.0, 80.0), &TextStyle::default());
        canvas.draw_line(Point::ORIGIN, Point::new(0.0, 6.0), Color::BLACK, 1.0);
        canvas.stroke_circle(Point::ORIGIN, 6.0, Color::BLACK, 2.0);

        assert_eq!(canvas.texts().collect::<Vec<_>>(), vec!["March"]);
        assert_eq!(canvas.command_count(), 3);
        assert_eq!(canvas.circles().count(), 1);
    }

    #[test]
    fn test_recording_canvas_take_commands() {
        let mut canvas = RecordingCanvas::new();
        canvas.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::RED);
        let taken = canvas.take_commands();
        assert_eq!(taken.len(), 1);
        assert!(canvas.is_empty());
    }
}
