//! Color scales: piecewise-linear continuous ramps and categorical palettes.
//!
//! A [`ColorScale`] maps a numeric domain onto a sequence of color stops and
//! clamps inputs outside the domain to the nearest endpoint. Legends sample a
//! scale at a fixed step with [`ColorScale::sample`].

use crate::Color;
use serde::{Deserialize, Serialize};

/// Continuous color scale with two or more stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorScale {
    domain: Vec<f64>,
    range: Vec<Color>,
}

impl ColorScale {
    /// Create a scale from matching domain stops and colors.
    ///
    /// Domain stops must be ascending. Extra entries on the longer side are
    /// ignored.
    #[must_use]
    pub fn new(domain: Vec<f64>, range: Vec<Color>) -> Self {
        let n = domain.len().min(range.len());
        let mut domain = domain;
        let mut range = range;
        domain.truncate(n);
        range.truncate(n);
        Self { domain, range }
    }

    /// Diverging sentiment ramp: `-1 → red`, `0 → neutral`, `1 → green`.
    #[must_use]
    pub fn sentiment() -> Self {
        Self::new(
            vec![-1.0, 0.0, 1.0],
            vec![Color::RED, Color::NEUTRAL, Color::GREEN],
        )
    }

    /// Sequential subjectivity ramp: `0 → neutral`, `1 → blue`.
    #[must_use]
    pub fn subjectivity() -> Self {
        Self::new(vec![0.0, 1.0], vec![Color::NEUTRAL, Color::BLUE])
    }

    /// Domain stops.
    #[must_use]
    pub fn domain(&self) -> &[f64] {
        &self.domain
    }

    /// First and last domain stop.
    #[must_use]
    pub fn extent(&self) -> Option<(f64, f64)> {
        Some((*self.domain.first()?, *self.domain.last()?))
    }

    /// Map a value to a color, clamping to the domain.
    ///
    /// Non-finite input maps to the first stop.
    #[must_use]
    pub fn map(&self, value: f64) -> Color {
        let (Some(&first), Some(&last)) = (self.domain.first(), self.domain.last()) else {
            return Color::BLACK;
        };
        if !value.is_finite() || value <= first {
            return self.range[0];
        }
        if value >= last {
            return self.range[self.range.len() - 1];
        }

        let upper = self
            .domain
            .iter()
            .position(|&stop| value < stop)
            .unwrap_or(self.domain.len() - 1);
        let lower = upper - 1;
        let span = self.domain[upper] - self.domain[lower];
        let t = if span > 0.0 {
            (value - self.domain[lower]) / span
        } else {
            0.0
        };
        self.range[lower].lerp(&self.range[upper], t as f32)
    }

    /// Sample the scale from the first to the last stop at `step`.
    ///
    /// Both endpoints are always included, so `step = 0.1` over `[-1, 1]`
    /// yields 21 swatches.
    #[must_use]
    pub fn sample(&self, step: f64) -> Vec<(f64, Color)> {
        let Some((lo, hi)) = self.extent() else {
            return Vec::new();
        };
        if step <= 0.0 || !step.is_finite() || hi <= lo {
            return vec![(lo, self.map(lo))];
        }
        // Round rather than accumulate to keep sample values exact-ish.
        let count = ((hi - lo) / step).round() as usize;
        (0..=count)
            .map(|i| {
                let v = (i as f64).mul_add(step, lo).min(hi);
                (v, self.map(v))
            })
            .collect()
    }
}

/// Categorical palette assigning colors to keys by position, cycling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// Create a palette from a list of colors.
    #[must_use]
    pub fn new(colors: Vec<Color>) -> Self {
        Self { colors }
    }

    /// The five-color Set1 palette used for model series.
    #[must_use]
    pub fn set1() -> Self {
        Self::new(vec![
            Color::rgb8(0xe4, 0x1a, 0x1c),
            Color::rgb8(0x37, 0x7e, 0xb8),
            Color::rgb8(0x4d, 0xaf, 0x4a),
            Color::rgb8(0x98, 0x4e, 0xa3),
            Color::rgb8(0xff, 0x7f, 0x00),
        ])
    }

    /// Color for the key at `index` in the ordered key set.
    #[must_use]
    pub fn color(&self, index: usize) -> Color {
        if self.colors.is_empty() {
            return Color::BLACK;
        }
        self.colors[index % self.colors.len()]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::set1()
    }
}
