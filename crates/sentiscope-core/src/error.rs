//! Errors surfaced to the host by a render pass.

use crate::color::ColorParseError;
use thiserror::Error;

/// Renderer failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VizError {
    /// A coordinate reaching the renderer was NaN or infinite.
    #[error("non-finite coordinate for {what}: {value}")]
    NonFiniteCoordinate {
        /// Element being drawn
        what: String,
        /// Offending value
        value: f64,
    },

    /// A scale domain was inverted, empty or not finite.
    #[error("invalid domain for {scale} scale: [{start}, {end}]")]
    InvalidDomain {
        /// Scale name
        scale: &'static str,
        /// Domain start
        start: f64,
        /// Domain end
        end: f64,
    },

    /// A configured color could not be parsed.
    #[error("color parse error: {0}")]
    ColorParse(#[from] ColorParseError),
}

impl VizError {
    /// Check that a coordinate is finite.
    pub fn check_finite(what: &str, value: f64) -> Result<f64, Self> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(Self::NonFiniteCoordinate {
                what: what.to_string(),
                value,
            })
        }
    }

    /// Check that a domain is finite and `start <= end`.
    pub fn check_domain(scale: &'static str, start: f64, end: f64) -> Result<(f64, f64), Self> {
        if start.is_finite() && end.is_finite() && start <= end {
            Ok((start, end))
        } else {
            Err(Self::InvalidDomain { scale, start, end })
        }
    }
}
