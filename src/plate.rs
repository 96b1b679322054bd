//! Plate grouping: clusters boxes into plates by vertical overlap and derives
//! the reading order used for the label file and for plate text assignment.
//!
//! Boxes are visited top to bottom. Each joins the first existing plate it
//! overlaps vertically by at least the configured ratio, or starts a new plate.
//! Plates keep creation order; boxes within a plate are ordered left to right.
//! This is first-match single linkage and deliberately order dependent.

#[cfg(test)]
#[path = "plate_test.rs"]
mod plate_test;

use std::cmp::Ordering;

use tracing::debug;

use crate::label::LabelBox;

/// Result of grouping: boxes in reading order with `line_index` assigned.
#[derive(Debug, Clone, Default)]
pub struct PlateOrder {
    /// Boxes in reading order; `line_index == Some(position)`.
    pub boxes: Vec<LabelBox>,
    /// Number of boxes in each plate, in reading order.
    pub plate_sizes: Vec<usize>,
}

impl PlateOrder {
    #[must_use]
    pub fn plate_count(&self) -> usize {
        self.plate_sizes.len()
    }
}

/// Length of the intersection of the two boxes' vertical extents.
#[must_use]
pub fn vertical_overlap(a: &LabelBox, b: &LabelBox) -> f64 {
    let (ra, rb) = (a.rect(), b.rect());
    (ra.bottom().min(rb.bottom()) - ra.top().max(rb.top())).max(0.0)
}

/// Vertical overlap relative to the shorter box; `0.0` if either has no height.
#[must_use]
pub fn vertical_overlap_ratio(a: &LabelBox, b: &LabelBox) -> f64 {
    let shorter = a.h.min(b.h);
    if shorter <= 0.0 {
        return 0.0;
    }
    vertical_overlap(a, b) / shorter
}

/// Top to bottom. Ties on `cy` fall back to `cx`, then `h`, then `w`, so the
/// visit order never depends on the order boxes were given in.
fn row_order(a: &LabelBox, b: &LabelBox) -> Ordering {
    a.cy.total_cmp(&b.cy)
        .then_with(|| a.cx.total_cmp(&b.cx))
        .then_with(|| a.h.total_cmp(&b.h))
        .then_with(|| a.w.total_cmp(&b.w))
}

/// Group boxes into plates and return them in reading order.
#[must_use]
pub fn sort_and_group(boxes: &[LabelBox], group_overlap: f64) -> PlateOrder {
    let mut by_row = boxes.to_vec();
    by_row.sort_by(row_order);

    let mut plates: Vec<Vec<LabelBox>> = Vec::new();
    for label in by_row {
        let joined = plates.iter_mut().find(|plate| {
            plate
                .iter()
                .map(|member| vertical_overlap_ratio(&label, member))
                .fold(0.0, f64::max)
                >= group_overlap
        });
        match joined {
            Some(plate) => plate.push(label),
            None => plates.push(vec![label]),
        }
    }

    let mut order = PlateOrder { boxes: Vec::with_capacity(boxes.len()), plate_sizes: Vec::with_capacity(plates.len()) };
    for mut plate in plates {
        plate.sort_by(|a, b| a.cx.total_cmp(&b.cx));
        order.plate_sizes.push(plate.len());
        order.boxes.extend(plate);
    }
    for (index, label) in order.boxes.iter_mut().enumerate() {
        label.line_index = Some(index);
    }

    debug!(boxes = order.boxes.len(), plates = order.plate_count(), "sorted boxes into reading order");
    order
}
