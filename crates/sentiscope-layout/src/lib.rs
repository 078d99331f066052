#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
//! Layout engines for Sentiscope.
//!
//! - [`stack`]: stacked layers with zero, silhouette and wiggle baselines
//!   for streamgraphs
//! - [`force`]: an iterative force-directed solver with centering and
//!   collision forces
//! - [`FrameDriver`]: cooperative per-frame stepping of a simulation
//!
//! Both engines are pure functions of their input: the same records and
//! options always produce the same geometry.

mod driver;
pub mod force;
pub mod spatial;
pub mod stack;

pub use driver::{FrameDriver, FrameStatus};
pub use force::{jitter, Axis, AxisForce, Collide, Force, Node, RunOutcome, Simulation, SimulationConfig};
pub use spatial::CollisionGrid;
pub use stack::{Band, Layer, Stack, StackOffset};
