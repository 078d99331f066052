//! Force-directed layout.
//!
//! A [`Simulation`] advances nodes one tick at a time. Each tick cools
//! `alpha`, lets every force add velocity, decays and integrates velocity,
//! then runs positional constraints. The host either calls
//! [`Simulation::run`] with a tick budget or drives ticks per frame through
//! [`crate::FrameDriver`].

use crate::spatial::CollisionGrid;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// One simulated body carrying a datum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node<T> {
    /// Payload used by forces to pick targets
    pub datum: T,
    /// X position
    pub x: f64,
    /// Y position
    pub y: f64,
    /// X velocity
    pub vx: f64,
    /// Y velocity
    pub vy: f64,
}

impl<T> Node<T> {
    /// Create a node at rest.
    pub const fn new(datum: T, x: f64, y: f64) -> Self {
        Self {
            datum,
            x,
            y,
            vx: 0.0,
            vy: 0.0,
        }
    }

    /// Velocity magnitude.
    #[must_use]
    pub fn speed(&self) -> f64 {
        self.vx.hypot(self.vy)
    }

    /// Distance between centers.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.vx.is_finite() && self.vy.is_finite()
    }
}

/// Deterministic pseudo-random offset in `[0, 1)²` for node `index`.
///
/// Used once when nodes are created; the tick loop itself draws no random
/// numbers.
#[must_use]
pub fn jitter(seed: u64, index: u64) -> (f64, f64) {
    let mut rng = SmallRng::seed_from_u64(seed ^ index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
    (rng.gen::<f64>(), rng.gen::<f64>())
}

/// A force acting on every node once per tick.
pub trait Force<T> {
    /// Add velocity increments scaled by `alpha`.
    fn apply(&mut self, nodes: &mut [Node<T>], alpha: f64);

    /// Adjust positions after integration.
    fn constrain(&mut self, _nodes: &mut [Node<T>]) {}
}

/// Axis a centering force pulls along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    /// Horizontal
    X,
    /// Vertical
    Y,
}

type TargetFn<T> = Box<dyn Fn(&T) -> Option<f64>>;

/// Pulls each node toward a per-datum coordinate on one axis.
///
/// `v += (target - position) * strength * alpha`. A datum without a target
/// uses the fallback coordinate.
pub struct AxisForce<T> {
    axis: Axis,
    fallback: f64,
    strength: f64,
    target: Option<TargetFn<T>>,
}

impl<T> AxisForce<T> {
    /// Horizontal force toward `fallback` until a target function is set.
    #[must_use]
    pub fn x(fallback: f64) -> Self {
        Self::new(Axis::X, fallback)
    }

    /// Vertical force toward `fallback` until a target function is set.
    #[must_use]
    pub fn y(fallback: f64) -> Self {
        Self::new(Axis::Y, fallback)
    }

    fn new(axis: Axis, fallback: f64) -> Self {
        Self {
            axis,
            fallback,
            strength: 0.1,
            target: None,
        }
    }

    /// Per-datum target coordinate.
    #[must_use]
    pub fn target(mut self, target: impl Fn(&T) -> Option<f64> + 'static) -> Self {
        self.target = Some(Box::new(target));
        self
    }

    /// Pull strength, clamped to `[0, 1]`.
    #[must_use]
    pub fn strength(mut self, strength: f64) -> Self {
        self.strength = if strength.is_finite() {
            strength.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self
    }

    /// Configured strength.
    #[must_use]
    pub const fn get_strength(&self) -> f64 {
        self.strength
    }

    /// Target coordinate for a datum.
    #[must_use]
    pub fn target_of(&self, datum: &T) -> f64 {
        self.target
            .as_ref()
            .and_then(|f| f(datum))
            .filter(|t| t.is_finite())
            .unwrap_or(self.fallback)
    }
}

impl<T> fmt::Debug for AxisForce<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AxisForce")
            .field("axis", &self.axis)
            .field("fallback", &self.fallback)
            .field("strength", &self.strength)
            .field("has_target", &self.target.is_some())
            .finish()
    }
}

impl<T> Force<T> for AxisForce<T> {
    fn apply(&mut self, nodes: &mut [Node<T>], alpha: f64) {
        let k = self.strength * alpha;
        for node in nodes {
            let target = self.target_of(&node.datum);
            match self.axis {
                Axis::X => node.vx += (target - node.x) * k,
                Axis::Y => node.vy += (target - node.y) * k,
            }
        }
    }
}

const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;
const OVERLAP_EPSILON: f64 = 1e-9;

/// Keeps circles of equal radius from overlapping.
///
/// Runs as a positional constraint after integration: every pair closer than
/// twice the radius is pushed apart along the line between centers, each
/// node taking half the overlap (scaled by strength). The same correction is
/// added to velocity. Relaxation passes repeat up to `iterations` times and
/// stop early once a pass finds no overlap.
#[derive(Debug, Clone)]
pub struct Collide {
    radius: f64,
    strength: f64,
    iterations: usize,
    grid: CollisionGrid,
}

impl Collide {
    /// Collision force for circles of `radius`.
    #[must_use]
    pub fn new(radius: f64) -> Self {
        let radius = if radius.is_finite() { radius.max(0.0) } else { 0.0 };
        Self {
            radius,
            strength: 1.0,
            iterations: 16,
            grid: CollisionGrid::new(2.0 * radius),
        }
    }

    /// Fraction of the overlap removed per pass, clamped to `[0, 1]`.
    #[must_use]
    pub fn strength(mut self, strength: f64) -> Self {
        self.strength = if strength.is_finite() {
            strength.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self
    }

    /// Maximum relaxation passes per tick (at least one).
    #[must_use]
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations.max(1);
        self
    }

    /// Circle radius.
    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// One pass over candidate pairs. Returns the largest overlap found.
    fn relax<T>(&mut self, nodes: &mut [Node<T>]) -> f64 {
        let min_distance = 2.0 * self.radius;
        self.grid.clear();
        for node in nodes.iter() {
            self.grid.push(node.x, node.y);
        }

        let mut worst = 0.0f64;
        for (i, j) in self.grid.candidate_pairs() {
            let mut dx = nodes[j].x - nodes[i].x;
            let mut dy = nodes[j].y - nodes[i].y;
            let mut distance = dx.hypot(dy);
            if distance >= min_distance {
                continue;
            }
            if distance < OVERLAP_EPSILON {
                let angle = GOLDEN_ANGLE * (i + j) as f64;
                dx = angle.cos();
                dy = angle.sin();
                distance = 0.0;
            } else {
                dx /= distance;
                dy /= distance;
            }

            let overlap = min_distance - distance;
            worst = worst.max(overlap);
            let shift = overlap * self.strength * 0.5;
            let (sx, sy) = (dx * shift, dy * shift);

            let a = &mut nodes[i];
            a.x -= sx;
            a.y -= sy;
            a.vx -= sx;
            a.vy -= sy;
            let b = &mut nodes[j];
            b.x += sx;
            b.y += sy;
            b.vx += sx;
            b.vy += sy;
        }
        worst
    }
}

impl<T> Force<T> for Collide {
    fn apply(&mut self, _nodes: &mut [Node<T>], _alpha: f64) {}

    fn constrain(&mut self, nodes: &mut [Node<T>]) {
        if self.radius <= 0.0 || self.strength <= 0.0 {
            return;
        }
        for _ in 0..self.iterations {
            if self.relax(nodes) <= OVERLAP_EPSILON {
                break;
            }
        }
    }
}

/// Cooling and damping parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulationConfig {
    /// Starting alpha
    pub alpha: f64,
    /// Alpha below which the simulation counts as settled
    pub alpha_min: f64,
    /// Per-tick approach rate of alpha toward its target
    pub alpha_decay: f64,
    /// Alpha target (0 cools to rest)
    pub alpha_target: f64,
    /// Fraction of velocity lost per tick
    pub velocity_decay: f64,
    /// Max node speed below which the simulation counts as settled
    pub convergence_threshold: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            alpha_min: 0.001,
            alpha_decay: 1.0 - 0.001f64.powf(1.0 / 300.0),
            alpha_target: 0.0,
            velocity_decay: 0.4,
            convergence_threshold: 0.01,
        }
    }
}

/// Result of a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutcome {
    /// Ticks executed by this run
    pub ticks: usize,
    /// Whether the simulation settled before the budget ran out
    pub converged: bool,
}

/// Iterative solver over a node set and named forces.
pub struct Simulation<T> {
    nodes: Vec<Node<T>>,
    forces: Vec<(String, Box<dyn Force<T>>)>,
    config: SimulationConfig,
    alpha: f64,
    center: (f64, f64),
    ticks: usize,
    max_speed: f64,
}

impl<T> Simulation<T> {
    /// Create a simulation. Non-finite starting positions are moved to
    /// `center` and non-finite velocities are zeroed.
    pub fn new(nodes: Vec<Node<T>>, center: (f64, f64)) -> Self {
        let config = SimulationConfig::default();
        let mut sim = Self {
            nodes,
            forces: Vec::new(),
            alpha: config.alpha,
            config,
            center,
            ticks: 0,
            max_speed: f64::INFINITY,
        };
        let reset = sim.sanitize();
        if reset > 0 {
            warn!(reset, "non-finite starting positions moved to center");
        }
        sim
    }

    /// Replace the cooling parameters and restart alpha.
    #[must_use]
    pub fn with_config(mut self, config: SimulationConfig) -> Self {
        self.alpha = config.alpha;
        self.config = config;
        self
    }

    /// Add a force, replacing any force with the same name in place.
    #[must_use]
    pub fn with_force(mut self, name: impl Into<String>, force: impl Force<T> + 'static) -> Self {
        self.set_force(name, force);
        self
    }

    /// Add or replace a named force.
    pub fn set_force(&mut self, name: impl Into<String>, force: impl Force<T> + 'static) {
        let name = name.into();
        let boxed: Box<dyn Force<T>> = Box::new(force);
        if let Some(slot) = self.forces.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = boxed;
        } else {
            self.forces.push((name, boxed));
        }
    }

    /// Remove a named force. Returns whether it existed.
    pub fn remove_force(&mut self, name: &str) -> bool {
        let before = self.forces.len();
        self.forces.retain(|(n, _)| n != name);
        self.forces.len() != before
    }

    /// Force names in application order.
    #[must_use]
    pub fn force_names(&self) -> Vec<&str> {
        self.forces.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Current cooling parameters.
    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Current alpha.
    #[must_use]
    pub const fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Ticks executed since creation.
    #[must_use]
    pub const fn ticks(&self) -> usize {
        self.ticks
    }

    /// Largest node speed after the last tick.
    #[must_use]
    pub const fn max_speed(&self) -> f64 {
        self.max_speed
    }

    /// Nodes in their current state.
    #[must_use]
    pub fn nodes(&self) -> &[Node<T>] {
        &self.nodes
    }

    /// Consume the simulation, keeping the nodes.
    #[must_use]
    pub fn into_nodes(self) -> Vec<Node<T>> {
        self.nodes
    }

    /// True after at least one tick once motion or alpha has died down.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.ticks > 0
            && (self.max_speed < self.config.convergence_threshold
                || self.alpha < self.config.alpha_min)
    }

    /// Advance one tick.
    pub fn step(&mut self) {
        self.alpha += (self.config.alpha_target - self.alpha) * self.config.alpha_decay;

        for (_, force) in &mut self.forces {
            force.apply(&mut self.nodes, self.alpha);
        }

        let retain = 1.0 - self.config.velocity_decay.clamp(0.0, 1.0);
        for node in &mut self.nodes {
            node.vx *= retain;
            node.vy *= retain;
            node.x += node.vx;
            node.y += node.vy;
        }

        for (_, force) in &mut self.forces {
            force.constrain(&mut self.nodes);
        }

        let reset = self.sanitize();
        if reset > 0 {
            warn!(reset, tick = self.ticks, "non-finite positions moved to center");
        }

        self.max_speed = self.nodes.iter().map(Node::speed).fold(0.0, f64::max);
        self.ticks += 1;
    }

    /// Tick until converged or `budget` ticks have run.
    pub fn run(&mut self, budget: usize) -> RunOutcome {
        let mut ticks = 0;
        while ticks < budget {
            self.step();
            ticks += 1;
            if self.is_converged() {
                break;
            }
        }
        let outcome = RunOutcome {
            ticks,
            converged: self.is_converged(),
        };
        debug!(
            nodes = self.nodes.len(),
            ticks = outcome.ticks,
            converged = outcome.converged,
            alpha = self.alpha,
            max_speed = self.max_speed,
            "force layout run finished"
        );
        outcome
    }

    fn sanitize(&mut self) -> usize {
        let (cx, cy) = self.center;
        let mut reset = 0;
        for node in &mut self.nodes {
            if !node.is_finite() {
                if !(node.x.is_finite() && node.y.is_finite()) {
                    node.x = cx;
                    node.y = cy;
                    reset += 1;
                }
                node.vx = if node.vx.is_finite() { node.vx } else { 0.0 };
                node.vy = if node.vy.is_finite() { node.vy } else { 0.0 };
            }
        }
        reset
    }
}

impl<T: fmt::Debug> fmt::Debug for Simulation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("nodes", &self.nodes)
            .field("forces", &self.force_names())
            .field("config", &self.config)
            .field("alpha", &self.alpha)
            .field("ticks", &self.ticks)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn three_nodes() -> Vec<Node<u64>> {
        (0..3)
            .map(|i| {
                let (jx, jy) = jitter(7, i);
                Node::new(i, 200.0 + jx * 50.0, 150.0 + jy * 50.0)
            })
            .collect()
    }

    #[test]
    fn test_jitter_is_deterministic() {
        assert_eq!(jitter(42, 3), jitter(42, 3));
        assert_ne!(jitter(42, 3), jitter(42, 4));
        let (x, y) = jitter(1, 0);
        assert!((0.0..1.0).contains(&x) && (0.0..1.0).contains(&y));
    }

    #[test]
    fn test_default_config_matches_cooling_schedule() {
        let config = SimulationConfig::default();
        assert_eq!(config.alpha, 1.0);
        assert_eq!(config.velocity_decay, 0.4);
        let after_300 = (1.0 - config.alpha_decay).powi(300);
        assert!((after_300 - 0.001).abs() < 1e-9);
    }

    #[test]
    fn test_axis_force_pulls_toward_target() {
        let mut nodes = vec![Node::new((), 0.0, 0.0)];
        let mut force = AxisForce::y(100.0).strength(0.5);
        force.apply(&mut nodes, 1.0);
        assert_eq!(nodes[0].vy, 50.0);
        assert_eq!(nodes[0].vx, 0.0);
    }

    #[test]
    fn test_axis_force_missing_target_uses_fallback() {
        let force = AxisForce::<&str>::y(350.0).target(|m| (*m == "May").then_some(600.0));
        assert_eq!(force.target_of(&"May"), 600.0);
        assert_eq!(force.target_of(&"June"), 350.0);
    }

    #[test]
    fn test_axis_force_ignores_non_finite_target() {
        let force = AxisForce::<()>::x(10.0).target(|()| Some(f64::NAN));
        assert_eq!(force.target_of(&()), 10.0);
    }

    #[test]
    fn test_axis_force_strength_clamped() {
        assert_eq!(AxisForce::<()>::x(0.0).strength(3.0).get_strength(), 1.0);
        assert_eq!(AxisForce::<()>::x(0.0).strength(-1.0).get_strength(), 0.0);
    }

    #[test]
    fn test_collide_separates_pair() {
        let mut nodes = vec![Node::new(0, 0.0, 0.0), Node::new(1, 4.0, 0.0)];
        Collide::new(8.0).constrain(&mut nodes);
        assert!((nodes[0].distance(&nodes[1]) - 16.0).abs() < 1e-9);
        assert!((nodes[0].x + 6.0).abs() < 1e-9);
        assert!((nodes[0].vx + 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_collide_splits_coincident_nodes() {
        let mut nodes = vec![Node::new(0, 5.0, 5.0), Node::new(1, 5.0, 5.0)];
        Collide::new(8.0).constrain(&mut nodes);
        assert!(nodes[0].distance(&nodes[1]) >= 16.0 - 1e-9);
        assert!(nodes.iter().all(Node::is_finite));
    }

    #[test]
    fn test_collide_leaves_separated_nodes() {
        let mut nodes = vec![Node::new(0, 0.0, 0.0), Node::new(1, 20.0, 0.0)];
        Collide::new(8.0).constrain(&mut nodes);
        assert_eq!(nodes[0].x, 0.0);
        assert_eq!(nodes[1].x, 20.0);
    }

    #[test]
    fn test_named_forces() {
        let mut sim = Simulation::new(three_nodes(), (200.0, 150.0))
            .with_force("x", AxisForce::x(200.0))
            .with_force("y", AxisForce::y(150.0))
            .with_force("collide", Collide::new(8.0));
        assert_eq!(sim.force_names(), vec!["x", "y", "collide"]);

        sim.set_force("x", AxisForce::x(0.0));
        assert_eq!(sim.force_names(), vec!["x", "y", "collide"]);
        assert!(sim.remove_force("y"));
        assert!(!sim.remove_force("y"));
        assert_eq!(sim.force_names(), vec!["x", "collide"]);
    }

    #[test]
    fn test_not_converged_before_first_tick() {
        let sim: Simulation<u64> = Simulation::new(Vec::new(), (0.0, 0.0));
        assert!(!sim.is_converged());
    }

    #[test]
    fn test_empty_simulation_converges_immediately() {
        let mut sim: Simulation<u64> = Simulation::new(Vec::new(), (0.0, 0.0));
        let outcome = sim.run(120);
        assert_eq!(outcome, RunOutcome { ticks: 1, converged: true });
    }

    #[test]
    fn test_non_finite_start_reset_to_center() {
        let nodes = vec![Node::new(0, f64::NAN, 3.0), Node::new(1, 1.0, f64::INFINITY)];
        let sim = Simulation::new(nodes, (400.0, 350.0));
        for node in sim.nodes() {
            assert_eq!((node.x, node.y), (400.0, 350.0));
        }
    }

    #[test]
    fn test_three_nodes_converge_without_overlap() {
        let target_y = 150.0;
        let mut sim = Simulation::new(three_nodes(), (200.0, 150.0))
            .with_force("y", AxisForce::y(target_y).strength(0.3))
            .with_force("collide", Collide::new(8.0));
        sim.run(120);

        let nodes = sim.nodes();
        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                let d = nodes[i].distance(&nodes[j]);
                assert!(d >= 16.0 - 1e-6, "nodes {i} and {j} overlap: {d}");
            }
            assert!((nodes[i].y - target_y).abs() < 2.0, "y drifted: {}", nodes[i].y);
        }
    }

    #[test]
    fn test_deterministic_runs() {
        let build = || {
            Simulation::new(three_nodes(), (200.0, 150.0))
                .with_force("x", AxisForce::x(200.0).strength(0.05))
                .with_force("y", AxisForce::y(150.0).strength(0.3))
                .with_force("collide", Collide::new(8.0))
        };
        let mut a = build();
        let mut b = build();
        a.run(60);
        b.run(60);
        assert_eq!(a.nodes(), b.nodes());
    }

    #[test]
    fn test_alpha_cools() {
        let mut sim = Simulation::new(three_nodes(), (200.0, 150.0));
        sim.step();
        let first = sim.alpha();
        assert!(first < 1.0);
        sim.step();
        assert!(sim.alpha() < first);
    }

    #[test]
    fn test_zero_alpha_min_never_cools_to_convergence() {
        let mut sim = Simulation::new(three_nodes(), (200.0, 150.0)).with_config(SimulationConfig {
            alpha_min: 0.0,
            convergence_threshold: 0.0,
            ..SimulationConfig::default()
        });
        let outcome = sim.run(400);
        assert_eq!(outcome.ticks, 400);
        assert!(!outcome.converged);
    }

    #[test]
    fn test_run_stops_at_budget() {
        let mut sim = Simulation::new(three_nodes(), (200.0, 150.0))
            .with_force("y", AxisForce::y(500.0).strength(0.3));
        let outcome = sim.run(5);
        assert_eq!(outcome.ticks, 5);
        assert!(!outcome.converged);
        assert_eq!(sim.ticks(), 5);
    }

    proptest! {
        #[test]
        fn prop_positions_stay_finite(
            starts in proptest::collection::vec((-1e4f64..1e4, -1e4f64..1e4), 1..25),
            strength in 0.0f64..1.0,
        ) {
            let nodes = starts.iter().enumerate().map(|(i, &(x, y))| Node::new(i, x, y)).collect();
            let mut sim = Simulation::new(nodes, (0.0, 0.0))
                .with_force("x", AxisForce::x(0.0).strength(strength))
                .with_force("y", AxisForce::y(0.0).strength(strength))
                .with_force("collide", Collide::new(6.0));
            sim.run(30);
            prop_assert!(sim.nodes().iter().all(Node::is_finite));
        }
    }
}
