//! Views: geometry built from records and options, painted on a [`Canvas`].
//!
//! A [`Scene`] is the laid-out geometry of one view. It is rebuilt when the
//! records or layout-relevant options change and painted on every pass, so
//! recoloring and interaction never touch layout.

pub mod axis;
pub mod bar_chart;
pub mod legend;
pub mod panel;
pub mod scatter;
pub mod streamgraph;

use crate::interaction::{ElementId, SelectionSet};
use crate::options::{DisplayOptions, View};
use scatter::ScatterScene;
use sentiscope_core::{Canvas, Point, Record, VizError};
use streamgraph::StreamgraphScene;

/// Space reserved around a plot area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    /// Top margin
    pub top: f32,
    /// Right margin
    pub right: f32,
    /// Bottom margin
    pub bottom: f32,
    /// Left margin
    pub left: f32,
}

impl Margin {
    /// Create margins in CSS order.
    #[must_use]
    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Plot width left inside `width`.
    #[must_use]
    pub fn inner_width(&self, width: f32) -> f32 {
        (width - self.left - self.right).max(0.0)
    }

    /// Plot height left inside `height`.
    #[must_use]
    pub fn inner_height(&self, height: f32) -> f32 {
        (height - self.top - self.bottom).max(0.0)
    }
}

/// Laid-out geometry of the active view.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Scene {
    /// No records; a pass only clears the surface.
    #[default]
    Empty,
    /// Stacked layers
    Streamgraph(StreamgraphScene),
    /// Clustered nodes
    Scatter(ScatterScene),
}

impl Scene {
    /// Topmost element under `point`.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<ElementId> {
        match self {
            Self::Empty => None,
            Self::Streamgraph(scene) => scene.hit_test(point).map(ElementId::Layer),
            Self::Scatter(scene) => scene.hit_test(point).map(ElementId::Node),
        }
    }

    /// Lay out the configured view. No records yields [`Scene::Empty`].
    ///
    /// # Errors
    ///
    /// Returns error if a scale domain is invalid or a coordinate is not
    /// finite.
    pub fn build(records: &[Record], options: &DisplayOptions) -> Result<Self, VizError> {
        if records.is_empty() {
            return Ok(Self::Empty);
        }
        Ok(match options.view {
            View::Streamgraph => Self::Streamgraph(StreamgraphScene::build(records, options)?),
            View::Scatter => Self::Scatter(ScatterScene::build(records, options)?),
        })
    }

    /// Paint the view. The caller clears the canvas first.
    pub fn paint(
        &self,
        canvas: &mut dyn Canvas,
        records: &[Record],
        options: &DisplayOptions,
        selection: &SelectionSet,
    ) {
        match self {
            Self::Empty => {}
            Self::Streamgraph(scene) => scene.paint(canvas),
            Self::Scatter(scene) => scene.paint(canvas, records, options, selection),
        }
    }

    /// Check if there is nothing to draw.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}
