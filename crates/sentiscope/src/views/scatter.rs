//! Cluster scatter view: one circle per record, pulled toward its month.
//!
//! Nodes start near the surface center with a seeded offset, then the force
//! layout pulls them horizontally to the middle and vertically to their
//! month's cluster line while collision keeps circles apart.

use super::{legend, panel, Margin};
use crate::interaction::SelectionSet;
use crate::options::DisplayOptions;
use sentiscope_core::{
    Canvas, Color, FontWeight, Point, Record, RecordId, TextStyle, VizError,
};
use sentiscope_layout::{jitter, AxisForce, Collide, Node, Simulation};
use tracing::{debug, warn};

/// Plot margins inside the surface.
pub const MARGIN: Margin = Margin::new(50.0, 50.0, 50.0, 100.0);

/// Extent of the seeded starting offset, in pixels.
pub const INITIAL_SPREAD: f64 = 50.0;

/// Distance between a cluster line and the month label above it.
pub const LABEL_OFFSET: f32 = 70.0;

/// First and last cluster lines sit this far inside the surface.
const CLUSTER_INSET: f64 = 100.0;

/// Width of the selection panel.
const PANEL_WIDTH: f32 = 260.0;

/// Vertical cluster line for each configured month, top to bottom.
///
/// The first month sits at `margin.top + 100`, the last at `height - 100`
/// and the middle of the list at `height / 2`. Months in between are spaced
/// evenly within each half, so three months land on 150/350/600 by default.
/// A single month sits at `height / 2`.
#[must_use]
pub fn month_centers(options: &DisplayOptions) -> Vec<f64> {
    let first = f64::from(MARGIN.top) + CLUSTER_INSET;
    let middle = options.height / 2.0;
    let last = options.height - CLUSTER_INSET;
    match options.months.len() {
        0 => Vec::new(),
        1 => vec![middle],
        n => (0..n)
            .map(|i| {
                let t = i as f64 / (n - 1) as f64;
                if t <= 0.5 {
                    (middle - first).mul_add(2.0 * t, first)
                } else {
                    (last - middle).mul_add(2.0f64.mul_add(t, -1.0), middle)
                }
            })
            .collect(),
    }
}

/// A simulation over `records` with the configured forces.
///
/// Node data are positions into `records`. A record whose month is not
/// configured is pulled toward the vertical center.
#[must_use]
pub fn simulation(records: &[Record], options: &DisplayOptions) -> Simulation<usize> {
    let (cx, cy) = (options.width / 2.0, options.height / 2.0);
    let centers = month_centers(options);

    let targets: Vec<Option<f64>> = records
        .iter()
        .map(|r| {
            options
                .months
                .iter()
                .position(|m| *m == r.month)
                .and_then(|i| centers.get(i).copied())
        })
        .collect();
    let unmatched = targets.iter().filter(|t| t.is_none()).count();
    if unmatched > 0 {
        warn!(unmatched, "records with an unknown month pulled to center");
    }

    let nodes = records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let (jx, jy) = jitter(options.seed, r.index.0);
            Node::new(
                i,
                jx.mul_add(INITIAL_SPREAD, cx),
                jy.mul_add(INITIAL_SPREAD, cy),
            )
        })
        .collect();

    let strengths = options.force_strengths;
    Simulation::new(nodes, (cx, cy))
        .with_config(options.termination.simulation_config())
        .with_force("x", AxisForce::x(cx).strength(strengths.x))
        .with_force(
            "y",
            AxisForce::y(cy)
                .target(move |i: &usize| targets.get(*i).copied().flatten())
                .strength(strengths.y),
        )
        .with_force(
            "collide",
            Collide::new(options.collide_radius).strength(strengths.collide),
        )
}

/// A laid-out node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeShape {
    /// Record identity
    pub id: RecordId,
    /// Position of the record in the input slice
    pub record: usize,
    /// Circle center in surface coordinates
    pub center: Point,
    /// Drawn radius
    pub radius: f32,
}

/// Geometry of the scatter view.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterScene {
    nodes: Vec<NodeShape>,
    labels: Vec<(String, Point)>,
    legend_origin: Point,
    panel_origin: Point,
}

impl ScatterScene {
    /// Run the batch layout and capture the result.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::NonFiniteCoordinate`] if a node lands on a
    /// non-finite position.
    pub fn build(records: &[Record], options: &DisplayOptions) -> Result<Self, VizError> {
        let mut sim = simulation(records, options);
        let outcome = sim.run(options.termination.max_ticks());
        debug!(
            nodes = records.len(),
            ticks = outcome.ticks,
            converged = outcome.converged,
            "scatter laid out"
        );
        Self::from_nodes(records, options, sim.nodes())
    }

    /// Capture the current positions of a running or finished simulation.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::NonFiniteCoordinate`] if a position is not
    /// finite.
    pub fn from_nodes(
        records: &[Record],
        options: &DisplayOptions,
        nodes: &[Node<usize>],
    ) -> Result<Self, VizError> {
        let radius = options.node_radius as f32;
        let shapes = nodes
            .iter()
            .filter_map(|node| records.get(node.datum).map(|r| (node, r)))
            .map(|(node, record)| {
                let what = format!("node {}", record.index);
                let x = VizError::check_finite(&what, node.x)?;
                let y = VizError::check_finite(&what, node.y)?;
                Ok(NodeShape {
                    id: record.index,
                    record: node.datum,
                    center: Point::new(x as f32, y as f32),
                    radius,
                })
            })
            .collect::<Result<Vec<_>, VizError>>()?;

        let label_x = MARGIN.left / 2.0;
        let labels = options
            .months
            .iter()
            .zip(month_centers(options))
            .map(|(month, center)| (month.clone(), Point::new(label_x, center as f32 - LABEL_OFFSET)))
            .collect();

        let width = options.width as f32;
        Ok(Self {
            nodes: shapes,
            labels,
            legend_origin: Point::new(MARGIN.left, 4.0),
            panel_origin: Point::new(width - MARGIN.right - PANEL_WIDTH, MARGIN.top),
        })
    }

    /// Nodes in paint order.
    #[must_use]
    pub fn nodes(&self) -> &[NodeShape] {
        &self.nodes
    }

    /// Node for a record.
    #[must_use]
    pub fn node(&self, id: RecordId) -> Option<&NodeShape> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Month labels and their positions.
    #[must_use]
    pub fn labels(&self) -> &[(String, Point)] {
        &self.labels
    }

    /// Topmost node whose circle contains `point`.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<RecordId> {
        self.nodes
            .iter()
            .rev()
            .find(|n| n.center.distance(&point) <= n.radius)
            .map(|n| n.id)
    }

    /// Paint nodes, labels, legend and selection panel.
    ///
    /// Colors come from `options.color_by` at paint time, so switching the
    /// metric needs no new geometry.
    pub fn paint(
        &self,
        canvas: &mut dyn Canvas,
        records: &[Record],
        options: &DisplayOptions,
        selection: &SelectionSet,
    ) {
        let scale = options.color_by.scale();
        for node in &self.nodes {
            let Some(record) = records.get(node.record) else {
                continue;
            };
            let fill = scale.map(options.color_by.value(record));
            canvas.fill_circle(node.center, node.radius, fill);
            if selection.contains(node.id) {
                canvas.stroke_circle(node.center, node.radius, Color::BLACK, 2.0);
            }
        }

        let label_style = TextStyle {
            size: 14.0,
            weight: FontWeight::Bold,
            ..TextStyle::default()
        };
        for (month, position) in &self.labels {
            canvas.draw_text(month, *position, &label_style);
        }

        legend::paint_gradient(
            canvas,
            self.legend_origin,
            &scale,
            options.color_by.legend_step(),
            options.color_by.label(),
        );

        if !selection.is_empty() {
            let lines: Vec<&str> = selection
                .as_slice()
                .iter()
                .filter_map(|id| self.node(*id))
                .filter_map(|n| records.get(n.record))
                .map(|r| r.raw_text.as_str())
                .collect();
            panel::paint_selection(canvas, self.panel_origin, PANEL_WIDTH, &lines);
        }
    }
}
