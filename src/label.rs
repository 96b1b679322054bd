//! Label model: the annotation box and the ordered in-memory collection.
//!
//! A [`LabelBox`] is one axis-aligned annotation in ratio coordinates. A
//! [`LabelSet`] holds the boxes for the current image in list order, which is
//! both the z-order for hit-testing (last = topmost) and, after a sort, the
//! reading order written back to the label file.

#[cfg(test)]
#[path = "label_test.rs"]
mod label_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::coords::NormalizedRect;

/// Unique identifier for a box within a session.
pub type BoxId = Uuid;

/// One rectangular annotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelBox {
    /// Session-local identity; not persisted.
    pub id: BoxId,
    /// Annotated character or category.
    pub class_id: u32,
    /// Center x as a fraction of canvas width.
    pub cx: f64,
    /// Center y as a fraction of canvas height.
    pub cy: f64,
    /// Width as a fraction of canvas width.
    pub w: f64,
    /// Height as a fraction of canvas height.
    pub h: f64,
    /// Position in the persisted reading order, once sorted.
    pub line_index: Option<usize>,
}

impl LabelBox {
    /// Create a box with a fresh id and no reading-order position.
    #[must_use]
    pub fn new(class_id: u32, rect: NormalizedRect) -> Self {
        Self {
            id: Uuid::new_v4(),
            class_id,
            cx: rect.cx,
            cy: rect.cy,
            w: rect.w,
            h: rect.h,
            line_index: None,
        }
    }

    /// The box geometry.
    #[must_use]
    pub fn rect(&self) -> NormalizedRect {
        NormalizedRect { cx: self.cx, cy: self.cy, w: self.w, h: self.h }
    }

    /// Replace the box geometry, keeping id, class and line index.
    pub fn set_rect(&mut self, rect: NormalizedRect) {
        self.cx = rect.cx;
        self.cy = rect.cy;
        self.w = rect.w;
        self.h = rect.h;
    }
}

/// Ordered collection of boxes for one image.
#[derive(Debug, Clone, Default)]
pub struct LabelSet {
    boxes: Vec<LabelBox>,
}

impl LabelSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self { boxes: Vec::new() }
    }

    /// Append a box on top of the z-order.
    pub fn push(&mut self, label: LabelBox) {
        self.boxes.push(label);
    }

    /// Remove a box by id, returning it if it was present.
    pub fn remove(&mut self, id: &BoxId) -> Option<LabelBox> {
        let index = self.position(id)?;
        Some(self.boxes.remove(index))
    }

    #[must_use]
    pub fn get(&self, id: &BoxId) -> Option<&LabelBox> {
        self.boxes.iter().find(|b| b.id == *id)
    }

    pub fn get_mut(&mut self, id: &BoxId) -> Option<&mut LabelBox> {
        self.boxes.iter_mut().find(|b| b.id == *id)
    }

    fn position(&self, id: &BoxId) -> Option<usize> {
        self.boxes.iter().position(|b| b.id == *id)
    }

    /// Replace every box, e.g. when navigating to another image.
    pub fn replace(&mut self, boxes: Vec<LabelBox>) {
        self.boxes = boxes;
    }

    /// Remove and return every box.
    pub fn take(&mut self) -> Vec<LabelBox> {
        std::mem::take(&mut self.boxes)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[LabelBox] {
        &self.boxes
    }

    pub fn as_mut_slice(&mut self) -> &mut [LabelBox] {
        &mut self.boxes
    }
}

impl From<Vec<LabelBox>> for LabelSet {
    fn from(boxes: Vec<LabelBox>) -> Self {
        Self { boxes }
    }
}
