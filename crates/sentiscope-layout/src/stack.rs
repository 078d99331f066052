//! Stacked layers for streamgraphs.
//!
//! Each input row is one x column. Keys are stacked bottom to top in the
//! order given, starting from a per-column baseline chosen by the
//! [`StackOffset`]. Whatever the offset, every band is exactly as thick as
//! its input value and adjacent bands share an edge.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// The vertical interval one layer occupies at one x.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    /// Column position
    pub x: f64,
    /// Lower edge
    pub y0: f64,
    /// Upper edge
    pub y1: f64,
    /// Input value, equal to `y1 - y0`
    pub value: f64,
}

impl Band {
    /// Vertical center of the band.
    #[must_use]
    pub fn mid(&self) -> f64 {
        (self.y0 + self.y1) * 0.5
    }
}

/// All bands for one key, ordered by x.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Metric key
    pub key: String,
    /// Position of the key in the stack order
    pub index: usize,
    /// One band per column
    pub bands: Vec<Band>,
}

impl Layer {
    /// Largest input value in this layer.
    #[must_use]
    pub fn max_value(&self) -> f64 {
        self.bands.iter().map(|b| b.value).fold(0.0, f64::max)
    }
}

/// Baseline policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StackOffset {
    /// Stack upward from zero.
    Zero,
    /// Center the whole stack on zero.
    Silhouette,
    /// Shift each baseline to minimize the weighted slope of layer
    /// midpoints between consecutive columns.
    #[default]
    Wiggle,
}

/// Stack layout over an ordered key set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack {
    keys: Vec<String>,
    offset: StackOffset,
}

impl Stack {
    /// Create a stack with the given bottom-to-top key order.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            offset: StackOffset::default(),
        }
    }

    /// Set the baseline policy.
    #[must_use]
    pub const fn offset(mut self, offset: StackOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Keys in stack order.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Compute one layer per key.
    ///
    /// Columns are sorted by x before stacking. Non-finite values count as
    /// zero thickness.
    pub fn compute<R>(
        &self,
        rows: &[R],
        x: impl Fn(&R) -> f64,
        value: impl Fn(&R, &str) -> f64,
    ) -> Vec<Layer> {
        let mut columns: Vec<(f64, Vec<f64>)> = rows
            .iter()
            .map(|row| {
                let values = self
                    .keys
                    .iter()
                    .map(|key| {
                        let v = value(row, key);
                        if v.is_finite() {
                            v
                        } else {
                            0.0
                        }
                    })
                    .collect();
                (x(row), values)
            })
            .collect();
        columns.sort_by(|a, b| a.0.total_cmp(&b.0));

        let baselines = self.baselines(&columns);

        let mut layers: Vec<Layer> = self
            .keys
            .iter()
            .enumerate()
            .map(|(index, key)| Layer {
                key: key.clone(),
                index,
                bands: Vec::with_capacity(columns.len()),
            })
            .collect();

        for ((x, values), baseline) in columns.iter().zip(&baselines) {
            let mut y0 = *baseline;
            for (layer, &v) in layers.iter_mut().zip(values) {
                let y1 = y0 + v;
                layer.bands.push(Band {
                    x: *x,
                    y0,
                    y1,
                    value: v,
                });
                y0 = y1;
            }
        }

        debug!(
            layers = layers.len(),
            columns = columns.len(),
            offset = ?self.offset,
            "stacked layers"
        );
        layers
    }

    fn baselines(&self, columns: &[(f64, Vec<f64>)]) -> Vec<f64> {
        match self.offset {
            StackOffset::Zero => vec![0.0; columns.len()],
            StackOffset::Silhouette => columns
                .iter()
                .map(|(_, values)| -values.iter().sum::<f64>() * 0.5)
                .collect(),
            StackOffset::Wiggle => wiggle(columns),
        }
    }
}

fn wiggle(columns: &[(f64, Vec<f64>)]) -> Vec<f64> {
    let mut baselines = Vec::with_capacity(columns.len());
    let mut y = 0.0;
    if !columns.is_empty() {
        baselines.push(y);
    }
    for pair in columns.windows(2) {
        let (prev, curr) = (&pair[0].1, &pair[1].1);
        let mut total = 0.0;
        let mut weighted = 0.0;
        let mut below = 0.0;
        for (&v, &p) in curr.iter().zip(prev) {
            let delta = v - p;
            weighted += v * (delta * 0.5 + below);
            below += delta;
            total += v;
        }
        if total != 0.0 {
            y -= weighted / total;
        }
        baselines.push(y);
    }
    baselines
}

/// Lowest `y0` and highest `y1` across all bands.
#[must_use]
pub fn extent(layers: &[Layer]) -> Option<(f64, f64)> {
    layers
        .iter()
        .flat_map(|layer| &layer.bands)
        .fold(None, |acc, band| {
            let lo = band.y0.min(band.y1);
            let hi = band.y0.max(band.y1);
            Some(match acc {
                Some((a, b)) => (lo.min(a), hi.max(b)),
                None => (lo, hi),
            })
        })
}
