//! Core types for the Sentiscope visualization engine.
//!
//! This crate provides the foundations shared by the layout engines and the
//! views:
//! - Geometric primitives: [`Point`], [`Size`], [`Rect`]
//! - Color representation: [`Color`], continuous [`ColorScale`]s and
//!   categorical [`Palette`]s
//! - Position scales: [`LinearScale`], [`TimeScale`], [`BandScale`]
//! - Drawing: [`DrawCommand`], the [`Canvas`] trait and [`RecordingCanvas`]
//! - Input: [`Event`]
//! - Data: [`Record`] keyed by [`RecordId`]

mod canvas;
mod color;
pub mod color_scale;
pub mod curve;
pub mod draw;
mod error;
mod event;
mod geometry;
mod record;
pub mod scale;

pub use canvas::{Canvas, RecordingCanvas};
pub use color::{Color, ColorParseError};
pub use color_scale::{ColorScale, Palette};
pub use curve::{CatmullRom, Point2D};
pub use draw::{BoxStyle, DrawCommand, FontWeight, StrokeStyle, TextAnchor, TextStyle, Transform2D};
pub use error::VizError;
pub use event::{Event, MouseButton};
pub use geometry::{polygon_contains, Point, Rect, Size};
pub use record::{Record, RecordId};
pub use scale::{BandScale, LinearScale, TimeScale};
