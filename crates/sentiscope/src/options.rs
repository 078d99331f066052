//! Display options recognized by the engine.
//!
//! Options deserialize from camelCase keys so the same document works as a
//! TOML file for the CLI or a JSON blob from a host.

use sentiscope_core::{ColorScale, Record};
use sentiscope_layout::SimulationConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Metric keys stacked by default, bottom to top.
pub const DEFAULT_GROUP_KEYS: [&str; 5] = ["GPT-4", "Gemini", "PaLM-2", "Claude", "LLaMA-3.1"];

/// Month buckets clustered by default, top to bottom.
pub const DEFAULT_MONTHS: [&str; 3] = ["March", "April", "May"];

/// Which visualization to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// Stacked layers over time
    Streamgraph,
    /// One circle per record clustered by month
    #[default]
    Scatter,
}

/// Metric that drives node color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorBy {
    /// Diverging red → neutral → green over [-1, 1]
    #[default]
    Sentiment,
    /// Sequential neutral → blue over [0, 1]
    Subjectivity,
}

impl ColorBy {
    /// Color scale for this metric.
    #[must_use]
    pub fn scale(self) -> ColorScale {
        match self {
            Self::Sentiment => ColorScale::sentiment(),
            Self::Subjectivity => ColorScale::subjectivity(),
        }
    }

    /// Legend sampling step.
    #[must_use]
    pub const fn legend_step(self) -> f64 {
        match self {
            Self::Sentiment => 0.1,
            Self::Subjectivity => 0.05,
        }
    }

    /// The metric's value for a record.
    #[must_use]
    pub const fn value(self, record: &Record) -> f64 {
        match self {
            Self::Sentiment => record.sentiment,
            Self::Subjectivity => record.subjectivity,
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sentiment => "Sentiment",
            Self::Subjectivity => "Subjectivity",
        }
    }
}

/// Strength of each scatter force, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceStrengths {
    /// Horizontal centering
    pub x: f64,
    /// Vertical pull toward the month cluster
    pub y: f64,
    /// Fraction of overlap removed per collision pass
    pub collide: f64,
}

impl Default for ForceStrengths {
    fn default() -> Self {
        Self {
            x: 0.05,
            y: 0.3,
            collide: 1.0,
        }
    }
}

/// When a batch layout stops.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Termination {
    /// Run exactly this many ticks.
    TickBudget(usize),
    /// Run until the fastest node is slower than `threshold`, at most
    /// `max_ticks` ticks.
    Convergence {
        /// Speed threshold in pixels per tick
        threshold: f64,
        /// Upper bound on ticks
        #[serde(rename = "maxTicks")]
        max_ticks: usize,
    },
}

impl Default for Termination {
    fn default() -> Self {
        Self::TickBudget(120)
    }
}

impl Termination {
    /// Maximum number of ticks.
    #[must_use]
    pub const fn max_ticks(&self) -> usize {
        match *self {
            Self::TickBudget(ticks) | Self::Convergence { max_ticks: ticks, .. } => ticks,
        }
    }

    /// Simulation parameters implementing this policy.
    ///
    /// A tick budget disables both settle checks, so every budgeted tick
    /// runs even after alpha has cooled.
    #[must_use]
    pub fn simulation_config(&self) -> SimulationConfig {
        match *self {
            Self::TickBudget(_) => SimulationConfig {
                convergence_threshold: 0.0,
                alpha_min: 0.0,
                ..SimulationConfig::default()
            },
            Self::Convergence { threshold, .. } => SimulationConfig {
                convergence_threshold: threshold,
                ..SimulationConfig::default()
            },
        }
    }
}

/// How the scatter layout is advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TickMode {
    /// Lay out completely before the first paint.
    #[default]
    Batch,
    /// Advance a few ticks on every host frame.
    Animated {
        /// Ticks run per frame callback
        #[serde(rename = "ticksPerFrame")]
        ticks_per_frame: usize,
    },
}

/// Everything that shapes a render pass besides the records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplayOptions {
    /// Visualization to draw
    pub view: View,
    /// Metric that colors scatter nodes
    pub color_by: ColorBy,
    /// Ordered metric keys for stacking
    pub group_key_set: Vec<String>,
    /// Ordered month buckets for clustering
    pub months: Vec<String>,
    /// Drawn circle radius
    pub node_radius: f64,
    /// Collision radius
    pub collide_radius: f64,
    /// Force strengths
    pub force_strengths: ForceStrengths,
    /// Batch stopping rule
    pub termination: Termination,
    /// Batch or per-frame stepping
    pub tick_mode: TickMode,
    /// Surface width in pixels
    pub width: f64,
    /// Surface height in pixels
    pub height: f64,
    /// Seed for initial node scatter
    pub seed: u64,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            view: View::default(),
            color_by: ColorBy::default(),
            group_key_set: DEFAULT_GROUP_KEYS.iter().map(|k| (*k).to_string()).collect(),
            months: DEFAULT_MONTHS.iter().map(|m| (*m).to_string()).collect(),
            node_radius: 6.0,
            collide_radius: 8.0,
            force_strengths: ForceStrengths::default(),
            termination: Termination::default(),
            tick_mode: TickMode::default(),
            width: 800.0,
            height: 700.0,
            seed: 0,
        }
    }
}

/// Error type for display option loading.
#[derive(Debug, Error)]
pub enum OptionsError {
    /// The document could not be parsed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// A value is out of range
    #[error("invalid option: {0}")]
    Invalid(String),
}

impl DisplayOptions {
    /// Parse and validate options from TOML.
    ///
    /// # Errors
    ///
    /// Returns error if the TOML is malformed or a value is out of range.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, OptionsError> {
        let options: Self = toml::from_str(toml_str)?;
        options.validate()?;
        Ok(options)
    }

    /// Serialize to a TOML document.
    #[must_use]
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), OptionsError> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(OptionsError::Invalid(format!("{name} must be positive, got {v}")))
            }
        };
        positive("width", self.width)?;
        positive("height", self.height)?;
        positive("nodeRadius", self.node_radius)?;
        positive("collideRadius", self.collide_radius)?;

        let strengths = [
            ("forceStrengths.x", self.force_strengths.x),
            ("forceStrengths.y", self.force_strengths.y),
            ("forceStrengths.collide", self.force_strengths.collide),
        ];
        for (name, v) in strengths {
            if !(0.0..=1.0).contains(&v) {
                return Err(OptionsError::Invalid(format!("{name} must be in [0, 1], got {v}")));
            }
        }

        if let Termination::Convergence { threshold, .. } = self.termination {
            if !(threshold.is_finite() && threshold >= 0.0) {
                return Err(OptionsError::Invalid(format!(
                    "convergence threshold must be non-negative, got {threshold}"
                )));
            }
        }
        if self.group_key_set.is_empty() && self.view == View::Streamgraph {
            return Err(OptionsError::Invalid("groupKeySet is empty".to_string()));
        }
        Ok(())
    }

    /// Whether switching from `other` to `self` needs new geometry.
    ///
    /// Only the color metric can change without a relayout.
    #[must_use]
    pub fn needs_relayout(&self, other: &Self) -> bool {
        let mut recolored = other.clone();
        recolored.color_by = self.color_by;
        recolored != *self
    }
}
