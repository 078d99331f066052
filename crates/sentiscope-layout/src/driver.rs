//! Per-frame stepping for animated layout.

use crate::force::Simulation;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What the host should do after a frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameStatus {
    /// More ticks remain; schedule another frame.
    Running,
    /// The layout settled or its tick cap was reached.
    Settled,
    /// The driver was stopped; schedule nothing further.
    Stopped,
}

impl FrameStatus {
    /// Whether the host should request another frame.
    #[must_use]
    pub const fn wants_frame(self) -> bool {
        matches!(self, Self::Running)
    }
}

/// Advances a simulation a few ticks per host frame.
#[derive(Debug)]
pub struct FrameDriver<T> {
    simulation: Simulation<T>,
    ticks_per_frame: usize,
    max_ticks: Option<usize>,
    stopped: bool,
}

impl<T> FrameDriver<T> {
    /// Drive `simulation`, running `ticks_per_frame` ticks (at least one)
    /// on every frame.
    pub fn new(simulation: Simulation<T>, ticks_per_frame: usize) -> Self {
        Self {
            simulation,
            ticks_per_frame: ticks_per_frame.max(1),
            max_ticks: None,
            stopped: false,
        }
    }

    /// Settle after this many ticks even if motion continues.
    #[must_use]
    pub const fn max_ticks(mut self, max_ticks: usize) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }

    /// Run one frame's worth of ticks.
    pub fn on_frame(&mut self) -> FrameStatus {
        if self.stopped {
            return FrameStatus::Stopped;
        }
        if self.is_settled() {
            return FrameStatus::Settled;
        }
        for _ in 0..self.ticks_per_frame {
            self.simulation.step();
            if self.is_settled() {
                debug!(ticks = self.simulation.ticks(), "animated layout settled");
                return FrameStatus::Settled;
            }
        }
        FrameStatus::Running
    }

    /// Stop permanently. Later frames do nothing.
    pub fn stop(&mut self) {
        if !self.stopped {
            debug!(ticks = self.simulation.ticks(), "frame driver stopped");
        }
        self.stopped = true;
    }

    /// Whether [`stop`](Self::stop) has been called.
    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// The driven simulation.
    #[must_use]
    pub const fn simulation(&self) -> &Simulation<T> {
        &self.simulation
    }

    fn is_settled(&self) -> bool {
        self.simulation.is_converged()
            || self
                .max_ticks
                .is_some_and(|cap| self.simulation.ticks() >= cap)
    }
}
