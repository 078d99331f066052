//! Hover and selection state.
//!
//! Two independent machines: [`HoverController`] owns the transient overlay
//! shown while the pointer rests on an element, and [`SelectionSet`] keeps
//! the persistent click selection. Neither reads the other.

use crate::views::bar_chart::BarChart;
use sentiscope_core::{Point, Record, RecordId};
use serde::{Deserialize, Serialize};

/// A hit-testable element of the current scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementId {
    /// Streamgraph layer by stack position
    Layer(usize),
    /// Scatter node by record identity
    Node(RecordId),
}

/// Plain text detail box.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextOverlay {
    /// Lines top to bottom
    pub lines: Vec<String>,
}

impl TextOverlay {
    /// Raw text, month, both scores and any metric scores sorted by key.
    #[must_use]
    pub fn for_record(record: &Record) -> Self {
        let mut lines = vec![record.raw_text.clone()];
        if !record.month.is_empty() {
            lines.push(format!("Month: {}", record.month));
        }
        lines.push(format!("Sentiment: {:.2}", record.sentiment));
        lines.push(format!("Subjectivity: {:.2}", record.subjectivity));
        let mut scores: Vec<(&String, &f64)> = record.scores.iter().collect();
        scores.sort_by(|a, b| a.0.cmp(b.0));
        lines.extend(scores.into_iter().map(|(key, v)| format!("{key}: {v:.2}")));
        Self { lines }
    }
}

/// Content of the floating detail overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    /// Per-x bars of one streamgraph layer
    BarChart(BarChart),
    /// Record details for a scatter node
    Text(TextOverlay),
}

/// Hover state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum HoverState {
    /// Nothing hovered
    #[default]
    Idle,
    /// Pointer rests on `target`
    Hovered {
        /// Element under the pointer
        target: ElementId,
        /// Last pointer position
        anchor: Point,
        /// Overlay built on enter
        overlay: Overlay,
    },
}

/// Idle/Hovered state machine for the detail overlay.
#[derive(Debug, Clone, Default)]
pub struct HoverController {
    state: HoverState,
}

impl HoverController {
    /// Create an idle controller.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &HoverState {
        &self.state
    }

    /// Whether an element is hovered.
    #[must_use]
    pub const fn is_hovered(&self) -> bool {
        matches!(self.state, HoverState::Hovered { .. })
    }

    /// Hovered element, if any.
    #[must_use]
    pub const fn target(&self) -> Option<ElementId> {
        match &self.state {
            HoverState::Hovered { target, .. } => Some(*target),
            HoverState::Idle => None,
        }
    }

    /// Pointer anchor, if hovered.
    #[must_use]
    pub const fn anchor(&self) -> Option<Point> {
        match &self.state {
            HoverState::Hovered { anchor, .. } => Some(*anchor),
            HoverState::Idle => None,
        }
    }

    /// Overlay content, if hovered.
    #[must_use]
    pub const fn overlay(&self) -> Option<&Overlay> {
        match &self.state {
            HoverState::Hovered { overlay, .. } => Some(overlay),
            HoverState::Idle => None,
        }
    }

    /// Pointer entered `target`. Any previous overlay is discarded first.
    pub fn enter(&mut self, target: ElementId, anchor: Point, overlay: Overlay) {
        self.state = HoverState::Hovered {
            target,
            anchor,
            overlay,
        };
    }

    /// Track the pointer while hovered. Ignored when idle.
    pub fn move_to(&mut self, position: Point) {
        if let HoverState::Hovered { anchor, .. } = &mut self.state {
            *anchor = position;
        }
    }

    /// Pointer left. The overlay content is dropped. Returns whether
    /// anything was hovered.
    pub fn leave(&mut self) -> bool {
        let was_hovered = self.is_hovered();
        self.state = HoverState::Idle;
        was_hovered
    }
}

/// Selected records, most recent first, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSet {
    ids: Vec<RecordId>,
}

impl SelectionSet {
    /// Create an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` at the front if absent, remove it if present. Returns
    /// whether `id` is selected afterwards.
    pub fn toggle(&mut self, id: RecordId) -> bool {
        if let Some(pos) = self.ids.iter().position(|&s| s == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.insert(0, id);
            true
        }
    }

    /// Membership test.
    #[must_use]
    pub fn contains(&self, id: RecordId) -> bool {
        self.ids.contains(&id)
    }

    /// Selected ids, most recent first.
    #[must_use]
    pub fn as_slice(&self) -> &[RecordId] {
        &self.ids
    }

    /// Number of selected records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        self.ids.clear();
    }
}
