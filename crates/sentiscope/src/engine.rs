//! Render entry point tying records, options, layout and interaction.

use crate::interaction::{ElementId, HoverController, Overlay, SelectionSet, TextOverlay};
use crate::options::{DisplayOptions, TickMode, View};
use crate::views::bar_chart::BarChart;
use crate::views::scatter::{self, ScatterScene};
use crate::views::{panel, Scene};
use sentiscope_core::{Canvas, Event, MouseButton, Point, Record, RecordId, VizError};
use sentiscope_layout::{FrameDriver, FrameStatus};
use tracing::debug;

/// Selection change callback. Receives the selection, most recent first.
pub type SelectionCallback = Box<dyn FnMut(&[RecordId])>;

/// Owns one visualization: its records, options, laid-out scene and
/// interaction state.
///
/// Geometry is computed lazily on the next [`render`](Self::render) after
/// the records or a layout-relevant option change. In animated mode the
/// host calls [`on_frame`](Self::on_frame) once per frame until it stops
/// returning [`FrameStatus::Running`].
pub struct Engine {
    records: Vec<Record>,
    options: DisplayOptions,
    scene: Option<Scene>,
    driver: Option<FrameDriver<usize>>,
    hover: HoverController,
    selection: SelectionSet,
    subscribers: Vec<SelectionCallback>,
    torn_down: bool,
}

impl Engine {
    /// Create an engine with no records.
    #[must_use]
    pub fn new(options: DisplayOptions) -> Self {
        Self {
            records: Vec::new(),
            options,
            scene: None,
            driver: None,
            hover: HoverController::new(),
            selection: SelectionSet::new(),
            subscribers: Vec::new(),
            torn_down: false,
        }
    }

    /// Replace the dataset. Clears the selection and any hover.
    pub fn set_records(&mut self, records: Vec<Record>) {
        self.records = records;
        self.invalidate();
        if !self.selection.is_empty() {
            self.selection.clear();
            self.notify();
        }
    }

    /// Replace the display options.
    ///
    /// A change of color metric alone keeps the current geometry. Anything
    /// else lays out again on the next render. The selection survives.
    pub fn set_options(&mut self, options: DisplayOptions) {
        let relayout = options.needs_relayout(&self.options);
        self.options = options;
        if relayout {
            self.invalidate();
        }
    }

    /// Current records.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Current options.
    #[must_use]
    pub const fn options(&self) -> &DisplayOptions {
        &self.options
    }

    /// Selected ids, most recent first.
    #[must_use]
    pub fn selection(&self) -> &[RecordId] {
        self.selection.as_slice()
    }

    /// Hover state.
    #[must_use]
    pub const fn hover(&self) -> &HoverController {
        &self.hover
    }

    /// The scene drawn by the last render, if still current.
    #[must_use]
    pub const fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    /// Whether [`teardown`](Self::teardown) has run.
    #[must_use]
    pub const fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Register a selection change callback.
    pub fn subscribe(&mut self, callback: impl FnMut(&[RecordId]) + 'static) {
        self.subscribers.push(Box::new(callback));
    }

    /// Clear the canvas and redraw everything.
    ///
    /// # Errors
    ///
    /// Returns error if layout yields an invalid scale domain or a
    /// non-finite coordinate. The canvas is left cleared.
    pub fn render(&mut self, canvas: &mut dyn Canvas) -> Result<(), VizError> {
        canvas.clear();
        self.ensure_scene()?;
        let Some(scene) = &self.scene else {
            return Ok(());
        };
        scene.paint(canvas, &self.records, &self.options, &self.selection);
        if let (Some(overlay), Some(anchor)) = (self.hover.overlay(), self.hover.anchor()) {
            panel::paint_overlay(canvas, overlay, anchor);
        }
        Ok(())
    }

    /// Route a pointer event. Returns whether a redraw is needed.
    ///
    /// Hit tests run against the scene of the last render.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        if self.torn_down {
            return false;
        }
        match *event {
            Event::MouseMove { position } => self.pointer_moved(position),
            Event::MouseDown {
                position,
                button: MouseButton::Left,
            } => self.clicked(position),
            Event::MouseLeave => self.hover.leave(),
            Event::MouseDown { .. } | Event::MouseUp { .. } => false,
        }
    }

    /// Advance the animated layout by one frame.
    ///
    /// Returns [`FrameStatus::Settled`] straight away when nothing animates
    /// and [`FrameStatus::Stopped`] after teardown.
    ///
    /// # Errors
    ///
    /// Returns error if a node position is not finite.
    pub fn on_frame(&mut self) -> Result<FrameStatus, VizError> {
        if self.torn_down {
            return Ok(FrameStatus::Stopped);
        }
        if !self.is_animated() || self.records.is_empty() {
            return Ok(FrameStatus::Settled);
        }
        self.ensure_scene()?;
        let Some(driver) = self.driver.as_mut() else {
            return Ok(FrameStatus::Settled);
        };
        let status = driver.on_frame();
        let scene = ScatterScene::from_nodes(&self.records, &self.options, driver.simulation().nodes())?;
        self.scene = Some(Scene::Scatter(scene));
        Ok(status)
    }

    /// Stop any animation and drop interaction state. Later frames do
    /// nothing and later events are ignored.
    pub fn teardown(&mut self) {
        if let Some(driver) = self.driver.as_mut() {
            driver.stop();
        }
        self.hover.leave();
        self.subscribers.clear();
        self.torn_down = true;
        debug!("engine torn down");
    }

    fn is_animated(&self) -> bool {
        self.options.view == View::Scatter && matches!(self.options.tick_mode, TickMode::Animated { .. })
    }

    fn invalidate(&mut self) {
        self.scene = None;
        if let Some(driver) = self.driver.as_mut() {
            driver.stop();
        }
        self.driver = None;
        self.hover.leave();
    }

    fn ensure_scene(&mut self) -> Result<(), VizError> {
        if self.scene.is_some() {
            return Ok(());
        }
        let animate = self.is_animated() && !self.records.is_empty();
        let scene = match self.options.tick_mode {
            TickMode::Animated { ticks_per_frame } if animate => {
                let sim = scatter::simulation(&self.records, &self.options);
                let mut driver = FrameDriver::new(sim, ticks_per_frame)
                    .max_ticks(self.options.termination.max_ticks());
                if self.torn_down {
                    driver.stop();
                }
                let scene = ScatterScene::from_nodes(
                    &self.records,
                    &self.options,
                    driver.simulation().nodes(),
                )?;
                self.driver = Some(driver);
                Scene::Scatter(scene)
            }
            _ => Scene::build(&self.records, &self.options)?,
        };
        debug!(
            records = self.records.len(),
            view = ?self.options.view,
            "scene laid out"
        );
        self.scene = Some(scene);
        Ok(())
    }

    fn pointer_moved(&mut self, position: Point) -> bool {
        let hit = self.scene.as_ref().and_then(|s| s.hit_test(position));
        match (self.hover.target(), hit) {
            (Some(current), Some(target)) if current == target => {
                self.hover.move_to(position);
                true
            }
            (_, Some(target)) => match self.overlay_for(target) {
                Some(overlay) => {
                    self.hover.enter(target, position, overlay);
                    true
                }
                None => self.hover.leave(),
            },
            (_, None) => self.hover.leave(),
        }
    }

    fn clicked(&mut self, position: Point) -> bool {
        let hit = self.scene.as_ref().and_then(|s| s.hit_test(position));
        let Some(ElementId::Node(id)) = hit else {
            return false;
        };
        let selected = self.selection.toggle(id);
        debug!(%id, selected, total = self.selection.len(), "selection toggled");
        self.notify();
        true
    }

    fn overlay_for(&self, target: ElementId) -> Option<Overlay> {
        match (target, self.scene.as_ref()?) {
            (ElementId::Layer(index), Scene::Streamgraph(scene)) => {
                let shape = scene.layer(index)?;
                Some(Overlay::BarChart(BarChart::from_layer(&shape.layer, shape.color)))
            }
            (ElementId::Node(id), Scene::Scatter(_)) => self
                .records
                .iter()
                .find(|r| r.index == id)
                .map(|r| Overlay::Text(TextOverlay::for_record(r))),
            _ => None,
        }
    }

    fn notify(&mut self) {
        let ids = self.selection.as_slice();
        for callback in &mut self.subscribers {
            callback(ids);
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("records", &self.records.len())
            .field("options", &self.options)
            .field("scene", &self.scene.is_some())
            .field(
                "animating",
                &self.driver.as_ref().is_some_and(|d| !d.is_stopped()),
            )
            .field("selection", &self.selection)
            .field("subscribers", &self.subscribers.len())
            .field("torn_down", &self.torn_down)
            .finish()
    }
}

/// Lay out and draw `records` once, without interaction state.
///
/// Animated options are laid out in batch.
///
/// # Errors
///
/// Returns error if a scale domain is invalid or a coordinate is not finite.
pub fn render(
    records: &[Record],
    options: &DisplayOptions,
    canvas: &mut dyn Canvas,
) -> Result<(), VizError> {
    canvas.clear();
    let scene = Scene::build(records, options)?;
    scene.paint(canvas, records, options, &SelectionSet::new());
    Ok(())
}
