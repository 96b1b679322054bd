//! Annotation engine: owns the boxes for one image and drives the pointer
//! state machine over them.
//!
//! The host feeds discrete pointer events (`begin_*`, `update_*`, `end_*`) and
//! matches on the returned values; the engine never calls back into the host.
//! Selection is a single held id. Whether a given box is selected is always
//! derived from it.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use tracing::{debug, error, info};

use crate::charmap::{self, CharmapError};
use crate::config::{ConfigError, EngineConfig};
use crate::constraint;
use crate::coords::{CanvasSize, NormalizedRect, PixelRect, Point, from_pixel_rect, pixel_delta_to_ratio};
use crate::hit::{self, Hit};
use crate::input::{DrawnBox, InteractionError, InteractionState, OperationKind, StateKind};
use crate::label::{BoxId, LabelBox, LabelSet};
use crate::overlap::{self, Overlap};
use crate::plate;

/// Annotation engine state for the image currently on screen.
#[derive(Debug, Clone, Default)]
pub struct Annotator {
    labels: LabelSet,
    canvas: Option<CanvasSize>,
    config: EngineConfig,
    drawing_mode: bool,
    selected: Option<BoxId>,
    input: InteractionState,
    plate_sizes: Vec<usize>,
}

impl Annotator {
    /// Engine with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] from validating `config`.
    pub fn with_config(config: EngineConfig) -> Result<Self, ConfigError> {
        Ok(Self { config: config.validate()?, ..Self::default() })
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Record the pixel size the host currently renders the image at.
    pub fn set_canvas_size(&mut self, canvas: CanvasSize) {
        debug!(width = canvas.width(), height = canvas.height(), "canvas resized");
        self.canvas = Some(canvas);
    }

    #[must_use]
    pub fn canvas_size(&self) -> Option<CanvasSize> {
        self.canvas
    }

    // --- Collection ---

    /// Replace every box, e.g. after navigating to another image.
    ///
    /// Clears the selection and drops any gesture in progress. List order is
    /// kept as given.
    pub fn load_labels(&mut self, boxes: Vec<LabelBox>) {
        self.reset_interaction();
        self.plate_sizes.clear();
        info!(count = boxes.len(), "labels loaded");
        self.labels.replace(boxes);
    }

    /// Remove and return every box, leaving the engine empty.
    pub fn take_labels(&mut self) -> Vec<LabelBox> {
        self.reset_interaction();
        self.plate_sizes.clear();
        self.labels.take()
    }

    /// Boxes in list order (z-order; reading order after a sort).
    #[must_use]
    pub fn labels(&self) -> &[LabelBox] {
        self.labels.as_slice()
    }

    #[must_use]
    pub fn get(&self, id: &BoxId) -> Option<&LabelBox> {
        self.labels.get(id)
    }

    /// Add a box, typically from a completed draw, and re-sort. Any part of
    /// `rect` outside the canvas is cut off.
    pub fn add_box(&mut self, class_id: u32, rect: NormalizedRect) -> BoxId {
        let label = LabelBox::new(class_id, constraint::clip_to_unit(rect));
        let id = label.id;
        self.labels.push(label);
        info!(%id, class_id, "box added");
        self.resort();
        id
    }

    /// Remove a box and re-sort. A gesture on that box is abandoned.
    pub fn remove(&mut self, id: &BoxId) -> Option<LabelBox> {
        let removed = self.labels.remove(id)?;
        if self.selected == Some(*id) {
            self.selected = None;
        }
        if self.gesture_target() == Some(*id) {
            self.input = InteractionState::Idle;
        }
        info!(%id, "box removed");
        self.resort();
        Some(removed)
    }

    /// Remove the selected box, if any.
    pub fn delete_selected(&mut self) -> Option<LabelBox> {
        let id = self.selected?;
        self.remove(&id)
    }

    /// Change a box's class. Returns `false` if the box does not exist.
    pub fn set_class(&mut self, id: &BoxId, class_id: u32) -> bool {
        match self.labels.get_mut(id) {
            Some(label) => {
                label.class_id = class_id;
                debug!(%id, class_id, "class changed");
                true
            }
            None => false,
        }
    }

    // --- Selection ---

    /// Make `id` the only selected box. Returns `false` if it does not exist.
    pub fn select(&mut self, id: &BoxId) -> bool {
        if self.labels.get(id).is_none() {
            return false;
        }
        if self.selected != Some(*id) {
            debug!(%id, "selected");
        }
        self.selected = Some(*id);
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    #[must_use]
    pub fn selection(&self) -> Option<BoxId> {
        self.selected
    }

    /// The selected box itself.
    #[must_use]
    pub fn selected_box(&self) -> Option<&LabelBox> {
        self.selected.and_then(|id| self.labels.get(&id))
    }

    #[must_use]
    pub fn is_selected(&self, id: &BoxId) -> bool {
        self.selected == Some(*id)
    }

    // --- Drawing mode ---

    /// Turn drawing mode on or off. Turning it off abandons a draw in progress.
    pub fn set_drawing_mode(&mut self, on: bool) {
        if !on && self.input.kind() == StateKind::Drawing {
            debug!("draw abandoned");
            self.input = InteractionState::Idle;
        }
        self.drawing_mode = on;
    }

    /// Flip drawing mode, returning the new value.
    pub fn toggle_drawing_mode(&mut self) -> bool {
        self.set_drawing_mode(!self.drawing_mode);
        self.drawing_mode
    }

    #[must_use]
    pub fn drawing_mode(&self) -> bool {
        self.drawing_mode
    }

    // --- State machine ---

    #[must_use]
    pub fn state(&self) -> InteractionState {
        self.input
    }

    /// Pointer-down in drawing mode: anchor a new box.
    ///
    /// # Errors
    ///
    /// [`InteractionError::DrawingModeOff`] outside drawing mode,
    /// [`InteractionError::WrongState`] if a gesture is already active.
    pub fn begin_draw(&mut self, pt: Point) -> Result<(), InteractionError> {
        if !self.drawing_mode {
            error!("draw started with drawing mode off");
            return Err(InteractionError::DrawingModeOff);
        }
        self.expect_idle()?;
        self.input = InteractionState::Drawing { anchor: pt, current: pt };
        debug!(x = pt.x, y = pt.y, "draw started");
        Ok(())
    }

    /// Pointer-move while drawing: the preview rectangle in pixels.
    ///
    /// # Errors
    ///
    /// [`InteractionError::WrongState`] unless drawing.
    pub fn update_preview(&mut self, pt: Point) -> Result<PixelRect, InteractionError> {
        let InteractionState::Drawing { anchor, .. } = self.input else {
            return Err(self.wrong_state(StateKind::Drawing));
        };
        self.input = InteractionState::Drawing { anchor, current: pt };
        Ok(PixelRect::from_corners(anchor, pt))
    }

    /// Pointer-up while drawing: the finished rectangle, or `None` if it is
    /// smaller than the minimum box size on either axis.
    ///
    /// The rectangle is clipped to the canvas before the size check, so a
    /// release past the border yields a box that ends at the border.
    ///
    /// # Errors
    ///
    /// [`InteractionError::WrongState`] unless drawing,
    /// [`InteractionError::NoCanvas`] before a canvas size is set.
    pub fn end_draw(&mut self, pt: Point) -> Result<Option<DrawnBox>, InteractionError> {
        let InteractionState::Drawing { anchor, .. } = self.input else {
            return Err(self.wrong_state(StateKind::Drawing));
        };
        let canvas = self.require_canvas()?;
        self.input = InteractionState::Idle;

        let pixels = PixelRect::from_corners(anchor, pt).clamp_to(canvas);
        let min = self.config.min_box_px;
        if pixels.width() < min || pixels.height() < min {
            debug!(width = pixels.width(), height = pixels.height(), min, "drawn box too small; discarded");
            return Ok(None);
        }
        let rect = from_pixel_rect(pixels.x1, pixels.y1, pixels.x2, pixels.y2, canvas);
        info!(width = pixels.width(), height = pixels.height(), "draw finished");
        Ok(Some(DrawnBox { pixels, rect }))
    }

    /// Pointer-down outside drawing mode.
    ///
    /// With a box selected only that box is classified; otherwise every box is
    /// classified from the top down. A handle starts a resize, the body starts
    /// a drag, and a miss falls back to plain containment selection.
    ///
    /// # Errors
    ///
    /// [`InteractionError::WrongState`] if a gesture is already active,
    /// [`InteractionError::NoCanvas`] before a canvas size is set.
    pub fn begin_interaction(&mut self, pt: Point) -> Result<OperationKind, InteractionError> {
        self.expect_idle()?;
        let canvas = self.require_canvas()?;

        let Some(hit) = self.classify(pt, canvas) else {
            return Ok(match hit::topmost_containing(pt, self.labels.as_slice(), canvas) {
                Some(id) => {
                    self.select(&id);
                    OperationKind::Select { id }
                }
                None => {
                    self.clear_selection();
                    OperationKind::None
                }
            });
        };

        let id = hit.box_id;
        let Some(orig) = self.labels.get(&id).map(LabelBox::rect) else {
            return Err(InteractionError::MissingBox(id));
        };
        self.select(&id);
        if hit.tag.is_handle() {
            self.input = InteractionState::Resizing { id, handle: hit.tag, last: pt, orig };
            debug!(%id, handle = ?hit.tag, "resize started");
            Ok(OperationKind::Resize { id, handle: hit.tag })
        } else {
            self.input = InteractionState::Dragging { id, last: pt, orig };
            debug!(%id, "drag started");
            Ok(OperationKind::Drag { id })
        }
    }

    /// Pointer-move while dragging: shift by the delta since the last event.
    ///
    /// # Errors
    ///
    /// [`InteractionError::WrongState`] unless dragging,
    /// [`InteractionError::NoCanvas`] or [`InteractionError::MissingBox`].
    pub fn update_drag(&mut self, pt: Point) -> Result<LabelBox, InteractionError> {
        let InteractionState::Dragging { id, last, orig } = self.input else {
            return Err(self.wrong_state(StateKind::Dragging));
        };
        let canvas = self.require_canvas()?;
        let label = self.labels.get_mut(&id).ok_or(InteractionError::MissingBox(id))?;

        let (dx, dy) = pixel_delta_to_ratio(pt.x - last.x, pt.y - last.y, canvas);
        label.set_rect(constraint::translate(label.rect(), dx, dy));
        let moved = *label;
        self.input = InteractionState::Dragging { id, last: pt, orig };
        Ok(moved)
    }

    /// Pointer-up while dragging. Re-sorts and returns the moved box.
    ///
    /// # Errors
    ///
    /// [`InteractionError::WrongState`] unless dragging.
    pub fn end_drag(&mut self) -> Result<LabelBox, InteractionError> {
        let InteractionState::Dragging { id, .. } = self.input else {
            return Err(self.wrong_state(StateKind::Dragging));
        };
        self.finish_gesture(id, StateKind::Dragging)
    }

    /// Pointer-move while resizing: move the handle's edges by the delta
    /// since the last event.
    ///
    /// # Errors
    ///
    /// [`InteractionError::WrongState`] unless resizing,
    /// [`InteractionError::NoCanvas`] or [`InteractionError::MissingBox`].
    pub fn update_resize(&mut self, pt: Point) -> Result<LabelBox, InteractionError> {
        let InteractionState::Resizing { id, handle, last, orig } = self.input else {
            return Err(self.wrong_state(StateKind::Resizing));
        };
        let canvas = self.require_canvas()?;
        let min_px = self.config.min_box_px;
        let label = self.labels.get_mut(&id).ok_or(InteractionError::MissingBox(id))?;

        let resized = constraint::resize(label.rect(), handle, pt.x - last.x, pt.y - last.y, canvas, min_px);
        label.set_rect(resized);
        let updated = *label;
        self.input = InteractionState::Resizing { id, handle, last: pt, orig };
        Ok(updated)
    }

    /// Pointer-up while resizing. Re-sorts and returns the resized box.
    ///
    /// # Errors
    ///
    /// [`InteractionError::WrongState`] unless resizing.
    pub fn end_resize(&mut self) -> Result<LabelBox, InteractionError> {
        let InteractionState::Resizing { id, .. } = self.input else {
            return Err(self.wrong_state(StateKind::Resizing));
        };
        self.finish_gesture(id, StateKind::Resizing)
    }

    /// Abandon the active gesture. A dragged or resized box gets its
    /// pre-gesture geometry back.
    pub fn cancel(&mut self) {
        match self.input {
            InteractionState::Dragging { id, orig, .. } | InteractionState::Resizing { id, orig, .. } => {
                if let Some(label) = self.labels.get_mut(&id) {
                    label.set_rect(orig);
                }
                debug!(%id, "gesture cancelled; geometry restored");
            }
            InteractionState::Drawing { .. } => debug!("draw cancelled"),
            InteractionState::Idle => {}
        }
        self.input = InteractionState::Idle;
    }

    /// What a pointer-down at `pt` would grab, without changing anything.
    #[must_use]
    pub fn hover(&self, pt: Point) -> Option<Hit> {
        self.classify(pt, self.canvas?)
    }

    // --- Ordering and QA ---

    /// Re-sort into plate reading order. Returns the plate count.
    pub fn sort_and_group(&mut self) -> usize {
        self.resort();
        let plates = self.plate_sizes.len();
        info!(boxes = self.labels.as_slice().len(), plates, "labels sorted");
        plates
    }

    /// Boxes split into plates as of the most recent sort. Empty if the
    /// current boxes were loaded and never sorted.
    #[must_use]
    pub fn plates(&self) -> Vec<&[LabelBox]> {
        let mut rest = self.labels.as_slice();
        let mut plates = Vec::with_capacity(self.plate_sizes.len());
        for &size in &self.plate_sizes {
            let (plate, tail) = rest.split_at(size.min(rest.len()));
            plates.push(plate);
            rest = tail;
        }
        plates
    }

    /// Pairs of boxes overlapping by more than the configured ratio, as indices
    /// into [`Self::labels`].
    #[must_use]
    pub fn find_overlaps(&self) -> Vec<Overlap> {
        overlap::find_overlaps(self.labels.as_slice(), self.config.max_overlap_ratio)
    }

    /// Assign class ids from plate text, one character per box in reading order.
    ///
    /// # Errors
    ///
    /// Returns [`CharmapError::LengthMismatch`] and leaves every box untouched
    /// if the character count differs from the box count.
    pub fn assign_plate_text(&mut self, text: &str) -> Result<(), CharmapError> {
        self.sort_and_group();
        charmap::assign_plate_text(self.labels.as_mut_slice(), text)?;
        info!(count = self.labels.as_slice().len(), "plate text assigned");
        Ok(())
    }

    /// Current boxes read back as plate text, in list order.
    #[must_use]
    pub fn plate_text(&self) -> String {
        charmap::plate_text(self.labels.as_slice())
    }

    // --- Internals ---

    fn classify(&self, pt: Point, canvas: CanvasSize) -> Option<Hit> {
        let thresholds = self.config.thresholds();
        match self.selected_box() {
            Some(focus) => {
                let tag = hit::classify_box(pt, focus, canvas, thresholds);
                tag.is_hit().then_some(Hit { box_id: focus.id, tag })
            }
            None => hit::classify_all(pt, self.labels.as_slice(), canvas, thresholds),
        }
    }

    fn finish_gesture(&mut self, id: BoxId, gesture: StateKind) -> Result<LabelBox, InteractionError> {
        if self.labels.get(&id).is_none() {
            return Err(InteractionError::MissingBox(id));
        }
        self.input = InteractionState::Idle;
        self.resort();
        let label = self.labels.get(&id).copied().ok_or(InteractionError::MissingBox(id))?;
        info!(%id, %gesture, cx = label.cx, cy = label.cy, w = label.w, h = label.h, "gesture finished");
        Ok(label)
    }

    fn resort(&mut self) {
        let order = plate::sort_and_group(self.labels.as_slice(), self.config.group_overlap_ratio);
        self.labels.replace(order.boxes);
        self.plate_sizes = order.plate_sizes;
    }

    fn reset_interaction(&mut self) {
        self.input = InteractionState::Idle;
        self.selected = None;
    }

    fn gesture_target(&self) -> Option<BoxId> {
        match self.input {
            InteractionState::Dragging { id, .. } | InteractionState::Resizing { id, .. } => Some(id),
            InteractionState::Idle | InteractionState::Drawing { .. } => None,
        }
    }

    fn expect_idle(&self) -> Result<(), InteractionError> {
        if self.input.kind() == StateKind::Idle {
            Ok(())
        } else {
            Err(self.wrong_state(StateKind::Idle))
        }
    }

    fn wrong_state(&self, expected: StateKind) -> InteractionError {
        let found = self.input.kind();
        error!(%expected, %found, "interaction call in wrong state");
        InteractionError::WrongState { expected, found }
    }

    fn require_canvas(&self) -> Result<CanvasSize, InteractionError> {
        self.canvas.ok_or_else(|| {
            error!("interaction before canvas size was set");
            InteractionError::NoCanvas
        })
    }
}
