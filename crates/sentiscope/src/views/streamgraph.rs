//! Streamgraph view: one smoothed polygon per metric key over time.

use super::axis::{self, Orientation};
use super::{legend, Margin};
use crate::options::DisplayOptions;
use sentiscope_core::scale::day_number;
use sentiscope_core::{
    polygon_contains, Canvas, CatmullRom, Color, LinearScale, Palette, Point, Point2D, Record,
    TimeScale, VizError,
};
use sentiscope_layout::{stack, Layer, Stack, StackOffset};
use tracing::{debug, warn};

/// Plot margins inside the surface.
pub const MARGIN: Margin = Margin::new(20.0, 150.0, 50.0, 50.0);

/// Points sampled per span between two columns when smoothing edges.
pub const SEGMENTS_PER_SPAN: usize = 8;

/// Gap between the plot bottom and the month axis.
const AXIS_OFFSET: f32 = 5.0;

/// A laid-out layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerShape {
    /// Stacked bands
    pub layer: Layer,
    /// Palette color
    pub color: Color,
    /// Closed outline in surface coordinates: top edge left to right, then
    /// bottom edge right to left
    pub outline: Vec<Point>,
}

/// Geometry of the streamgraph view.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamgraphScene {
    layers: Vec<LayerShape>,
    axis_origin: Point,
    axis_length: f32,
    month_ticks: Vec<(f32, String)>,
    legend_origin: Point,
}

impl StreamgraphScene {
    /// Stack `records` by the configured keys and lay out the polygons.
    ///
    /// Records without a date are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::InvalidDomain`] if the stacked extent is not
    /// finite and [`VizError::NonFiniteCoordinate`] if a projected edge
    /// point is not finite.
    pub fn build(records: &[Record], options: &DisplayOptions) -> Result<Self, VizError> {
        let inner_w = MARGIN.inner_width(options.width as f32);
        let inner_h = MARGIN.inner_height(options.height as f32);

        let dated: Vec<(f64, &Record)> = records
            .iter()
            .filter_map(|r| r.date.map(|d| (day_number(d), r)))
            .collect();
        if dated.len() < records.len() {
            warn!(skipped = records.len() - dated.len(), "records without a date skipped");
        }

        let legend_origin = Point::new(MARGIN.left + inner_w + 20.0, MARGIN.top + 20.0);
        let axis_origin = Point::new(MARGIN.left, MARGIN.top + inner_h + AXIS_OFFSET);

        let Some(time) = TimeScale::from_extent(
            records.iter().filter_map(|r| r.date),
            (0.0, f64::from(inner_w)),
        ) else {
            return Ok(Self {
                layers: Vec::new(),
                axis_origin,
                axis_length: inner_w,
                month_ticks: Vec::new(),
                legend_origin,
            });
        };

        let layers = Stack::new(options.group_key_set.iter().cloned())
            .offset(StackOffset::Wiggle)
            .compute(&dated, |(x, _)| *x, |(_, r), key| r.score_of(key));

        let (lo, hi) = stack::extent(&layers).unwrap_or((0.0, 0.0));
        let domain = VizError::check_domain("y", lo, hi)?;
        let y = LinearScale::new(domain, (f64::from(inner_h), 0.0));

        let palette = Palette::set1();
        let shapes = layers
            .into_iter()
            .map(|layer| {
                let outline = outline(&layer, &time, &y)?;
                Ok(LayerShape {
                    color: palette.color(layer.index),
                    layer,
                    outline,
                })
            })
            .collect::<Result<Vec<_>, VizError>>()?;

        let month_ticks = time
            .month_ticks()
            .into_iter()
            .map(|d| (time.map(d) as f32, d.format("%b").to_string()))
            .collect();

        debug!(layers = shapes.len(), columns = dated.len(), "streamgraph laid out");
        Ok(Self {
            layers: shapes,
            axis_origin,
            axis_length: inner_w,
            month_ticks,
            legend_origin,
        })
    }

    /// Layers bottom to top.
    #[must_use]
    pub fn layers(&self) -> &[LayerShape] {
        &self.layers
    }

    /// Layer at stack position `index`.
    #[must_use]
    pub fn layer(&self, index: usize) -> Option<&LayerShape> {
        self.layers.iter().find(|l| l.layer.index == index)
    }

    /// Month tick offsets along the axis and their labels.
    #[must_use]
    pub fn month_ticks(&self) -> &[(f32, String)] {
        &self.month_ticks
    }

    /// Stack position of the topmost layer containing `point`.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<usize> {
        self.layers
            .iter()
            .rev()
            .find(|shape| polygon_contains(&shape.outline, &point))
            .map(|shape| shape.layer.index)
    }

    /// Paint polygons, month axis and legend.
    pub fn paint(&self, canvas: &mut dyn Canvas) {
        for shape in &self.layers {
            canvas.fill_polygon(&shape.outline, shape.color);
        }
        axis::paint(
            canvas,
            Orientation::Bottom,
            self.axis_origin,
            self.axis_length,
            &self.month_ticks,
            10.0,
        );
        let entries: Vec<(String, Color)> = self
            .layers
            .iter()
            .map(|shape| (shape.layer.key.clone(), shape.color))
            .collect();
        legend::paint_categorical(canvas, self.legend_origin, &entries);
    }
}

fn outline(layer: &Layer, time: &TimeScale, y: &LinearScale) -> Result<Vec<Point>, VizError> {
    let (left, top) = (f64::from(MARGIN.left), f64::from(MARGIN.top));
    let project = |x: f64, value: f64| -> Result<Point2D, VizError> {
        let px = VizError::check_finite(&layer.key, time.map_days(x) + left)?;
        let py = VizError::check_finite(&layer.key, y.map(value) + top)?;
        Ok(Point2D::new(px, py))
    };

    let upper = layer
        .bands
        .iter()
        .map(|b| project(b.x, b.y1))
        .collect::<Result<Vec<_>, _>>()?;
    let lower = layer
        .bands
        .iter()
        .map(|b| project(b.x, b.y0))
        .collect::<Result<Vec<_>, _>>()?;

    let mut outline: Vec<Point> = CatmullRom::from_points(&upper)
        .to_path(SEGMENTS_PER_SPAN)
        .into_iter()
        .map(Point2D::to_point)
        .collect();
    outline.extend(
        CatmullRom::from_points(&lower)
            .to_path(SEGMENTS_PER_SPAN)
            .into_iter()
            .rev()
            .map(Point2D::to_point),
    );
    Ok(outline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::View;
    use chrono::NaiveDate;
    use sentiscope_core::{DrawCommand, RecordingCanvas};

    fn options() -> DisplayOptions {
        DisplayOptions {
            view: View::Streamgraph,
            group_key_set: vec!["GPT-4".to_string(), "Claude".to_string()],
            width: 800.0,
            height: 400.0,
            ..DisplayOptions::default()
        }
    }

    fn records() -> Vec<Record> {
        [(3, 0.8, 0.7), (4, 0.5, 0.9), (5, 0.6, 0.4)]
            .iter()
            .enumerate()
            .map(|(i, &(month, gpt, claude))| {
                Record::new(i as u64)
                    .date(NaiveDate::from_ymd_opt(2024, month, 1).unwrap())
                    .score("GPT-4", gpt)
                    .score("Claude", claude)
            })
            .collect()
    }

    #[test]
    fn test_one_polygon_per_key() {
        let scene = StreamgraphScene::build(&records(), &options()).unwrap();
        assert_eq!(scene.layers().len(), 2);
        for shape in scene.layers() {
            // Two smoothed edges of (3 - 1) * 8 + 1 points each.
            assert_eq!(shape.outline.len(), 34);
            assert!(shape.outline.iter().all(Point::is_finite));
        }
        assert_eq!(scene.layers()[1].color, Palette::set1().color(1));
    }

    #[test]
    fn test_outline_inside_plot() {
        let scene = StreamgraphScene::build(&records(), &options()).unwrap();
        for point in scene.layers().iter().flat_map(|s| &s.outline) {
            assert!(point.x >= 50.0 - 1e-3 && point.x <= 650.0 + 1e-3);
            // Catmull-Rom may overshoot slightly between columns.
            assert!(point.y >= 0.0 && point.y <= 380.0);
        }
    }

    #[test]
    fn test_hit_test_band_middle() {
        let scene = StreamgraphScene::build(&records(), &options()).unwrap();
        for shape in scene.layers() {
            // At a control column the outline passes exactly through y0/y1.
            let top = shape.outline[8];
            let bottom = shape.outline[shape.outline.len() - 1 - 8];
            let probe = Point::new(top.x, (top.y + bottom.y) / 2.0);
            assert_eq!(scene.hit_test(probe), Some(shape.layer.index));
        }
        assert_eq!(scene.hit_test(Point::new(5.0, 5.0)), None);
    }

    #[test]
    fn test_month_axis_and_legend() {
        let scene = StreamgraphScene::build(&records(), &options()).unwrap();
        let labels: Vec<&str> = scene.month_ticks().iter().map(|(_, l)| l.as_str()).collect();
        assert_eq!(labels, vec!["Mar", "Apr", "May"]);

        let mut canvas = RecordingCanvas::new();
        scene.paint(&mut canvas);
        let polygons = canvas
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Polygon { .. }))
            .count();
        assert_eq!(polygons, 2);
        let texts: Vec<&str> = canvas.texts().collect();
        assert!(texts.contains(&"GPT-4") && texts.contains(&"Claude"));
        assert!(texts.contains(&"Apr"));
    }

    #[test]
    fn test_undated_records_skipped() {
        let scene = StreamgraphScene::build(&[Record::new(0).score("GPT-4", 1.0)], &options()).unwrap();
        assert!(scene.layers().is_empty());
        assert_eq!(scene.hit_test(Point::new(100.0, 100.0)), None);
    }

    #[test]
    fn test_missing_key_is_flat_layer() {
        let mut opts = options();
        opts.group_key_set.push("Gemini".to_string());
        let scene = StreamgraphScene::build(&records(), &opts).unwrap();
        let gemini = scene.layer(2).unwrap();
        assert!(gemini.layer.bands.iter().all(|b| b.value == 0.0));
    }

    #[test]
    fn test_overflowing_extent_is_invalid_domain() {
        let record = Record::new(0)
            .date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
            .score("GPT-4", f64::MAX)
            .score("Claude", f64::MAX);
        let err = StreamgraphScene::build(&[record], &options()).unwrap_err();
        assert!(matches!(err, VizError::InvalidDomain { scale: "y", .. }));
    }

    #[test]
    fn test_non_finite_surface_is_rejected() {
        let opts = DisplayOptions {
            height: f64::INFINITY,
            ..options()
        };
        let err = StreamgraphScene::build(&records(), &opts).unwrap_err();
        assert!(matches!(err, VizError::NonFiniteCoordinate { .. }));
    }
}
