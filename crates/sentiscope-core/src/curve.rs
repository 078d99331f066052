//! Smooth curves through sampled points.

use crate::Point;
use serde::{Deserialize, Serialize};

/// A 2D point in data or pixel space with `f64` precision.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point2D {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Narrow to a surface point.
    #[must_use]
    pub fn to_point(self) -> Point {
        Point::new(self.x as f32, self.y as f32)
    }
}

/// Catmull-Rom spline through points ordered by x.
#[derive(Debug, Clone)]
pub struct CatmullRom {
    points: Vec<Point2D>,
    /// Tension parameter (0.0 to 1.0)
    tension: f64,
}

impl CatmullRom {
    /// Create from points with default tension.
    #[must_use]
    pub fn from_points(points: &[Point2D]) -> Self {
        Self::with_tension(points, 0.5)
    }

    /// Create from points with custom tension.
    #[must_use]
    pub fn with_tension(points: &[Point2D], tension: f64) -> Self {
        let mut sorted = points.to_vec();
        sorted.sort_by(|a, b| a.x.total_cmp(&b.x));
        Self {
            points: sorted,
            tension: tension.clamp(0.0, 1.0),
        }
    }

    /// Get the underlying points.
    #[must_use]
    pub fn points(&self) -> &[Point2D] {
        &self.points
    }

    /// Sample a smooth path through the points.
    ///
    /// Every control point appears in the output. Fewer than three points
    /// are returned unchanged.
    #[must_use]
    pub fn to_path(&self, segments_per_span: usize) -> Vec<Point2D> {
        let n = self.points.len();
        if n < 3 || segments_per_span == 0 {
            return self.points.clone();
        }

        let mut path = Vec::with_capacity((n - 1) * segments_per_span + 1);
        for i in 0..n - 1 {
            let p0 = self.points[i.saturating_sub(1)];
            let p1 = self.points[i];
            let p2 = self.points[i + 1];
            let p3 = self.points[(i + 2).min(n - 1)];

            for j in 0..segments_per_span {
                let t = j as f64 / segments_per_span as f64;
                path.push(self.point_at(p0, p1, p2, p3, t));
            }
        }
        path.push(self.points[n - 1]);
        path
    }

    fn point_at(&self, p0: Point2D, p1: Point2D, p2: Point2D, p3: Point2D, t: f64) -> Point2D {
        let t2 = t * t;
        let t3 = t2 * t;
        let tau = self.tension;

        let c0 = tau.mul_add(-t, (-tau).mul_add(t3, 2.0 * tau * t2));
        let c1 = (2.0 - tau).mul_add(t3, (tau - 3.0) * t2) + 1.0;
        let c2 = tau.mul_add(t, (tau - 2.0).mul_add(t3, 2.0f64.mul_add(-tau, 3.0) * t2));
        let c3 = tau.mul_add(t3, -(tau * t2));

        Point2D::new(
            c3.mul_add(p3.x, c0 * p0.x + c1 * p1.x + c2 * p2.x),
            c3.mul_add(p3.y, c0 * p0.y + c1 * p1.y + c2 * p2.y),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_catmull_rom_short_input_unchanged() {
        let pts = [Point2D::new(0.0, 1.0), Point2D::new(1.0, 3.0)];
        assert_eq!(CatmullRom::from_points(&pts).to_path(8), pts.to_vec());
        assert!(CatmullRom::from_points(&[]).to_path(8).is_empty());
    }

    #[test]
    fn test_catmull_rom_sorts_by_x() {
        let cr = CatmullRom::from_points(&[
            Point2D::new(2.0, 0.0),
            Point2D::new(0.0, 0.0),
            Point2D::new(1.0, 0.0),
        ]);
        let xs: Vec<f64> = cr.points().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_catmull_rom_passes_through_control_points() {
        let pts = [
            Point2D::new(0.0, 0.0),
            Point2D::new(1.0, 2.0),
            Point2D::new(2.0, 1.0),
            Point2D::new(3.0, 3.0),
        ];
        let path = CatmullRom::from_points(&pts).to_path(4);
        assert_eq!(path.len(), 3 * 4 + 1);
        for (k, p) in pts.iter().enumerate() {
            let sampled = path[k * 4];
            assert!((sampled.x - p.x).abs() < 1e-9);
            assert!((sampled.y - p.y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_point2d_to_point() {
        let p = Point2D::new(1.5, -2.0).to_point();
        assert_eq!(p, Point::new(1.5, -2.0));
        assert!(!Point2D::new(f64::NAN, 0.0).is_finite());
    }

    proptest! {
        #[test]
        fn prop_catmull_rom_finite(ys in proptest::collection::vec(-100.0f64..100.0, 3..12)) {
            let pts: Vec<Point2D> = ys.iter().enumerate().map(|(i, y)| Point2D::new(i as f64, *y)).collect();
            let path = CatmullRom::from_points(&pts).to_path(6);
            prop_assert!(path.iter().all(Point2D::is_finite));
        }
    }
}
