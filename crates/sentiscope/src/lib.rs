//! Sentiscope: streamgraph and cluster-scatter views over scored records.
//!
//! The [`Engine`] owns a dataset and [`DisplayOptions`], lays out the
//! active view lazily and paints it on any [`sentiscope_core::Canvas`].
//! Pointer events drive a hover overlay and a persistent selection.
//!
//! ```
//! use sentiscope::{DisplayOptions, Engine};
//! use sentiscope_core::{Record, RecordingCanvas};
//!
//! let mut engine = Engine::new(DisplayOptions::default());
//! engine.set_records(vec![
//!     Record::new(1).month("March").sentiment(-0.4),
//!     Record::new(2).month("May").sentiment(0.7),
//! ]);
//! let mut canvas = RecordingCanvas::new();
//! engine.render(&mut canvas).unwrap();
//! assert_eq!(canvas.circles().count(), 2);
//! ```

#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::module_name_repetitions,
    clippy::float_cmp,
    clippy::suboptimal_flops
)]

pub mod dataset;
mod engine;
pub mod interaction;
pub mod options;
pub mod views;

pub use dataset::{records_from_json, DatasetError};
pub use engine::{render, Engine, SelectionCallback};
pub use interaction::{ElementId, HoverController, HoverState, Overlay, SelectionSet, TextOverlay};
pub use options::{
    ColorBy, DisplayOptions, ForceStrengths, OptionsError, Termination, TickMode, View,
    DEFAULT_GROUP_KEYS, DEFAULT_MONTHS,
};
pub use views::Scene;
