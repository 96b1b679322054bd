//! Duplicate detection: flags pairs of boxes whose intersection covers too
//! much of either box. Read-only; nothing is mutated.

#[cfg(test)]
#[path = "overlap_test.rs"]
mod overlap_test;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::label::LabelBox;

/// Two boxes flagged as likely duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Overlap {
    /// Index of the first box in the input slice.
    pub first: usize,
    /// Index of the second box; always greater than `first`.
    pub second: usize,
    /// The larger of the two intersection-over-own-area ratios.
    pub ratio: f64,
}

/// Area of the intersection of two boxes in ratio space.
#[must_use]
pub fn intersection_area(a: &LabelBox, b: &LabelBox) -> f64 {
    let (ra, rb) = (a.rect(), b.rect());
    let w = (ra.right().min(rb.right()) - ra.left().max(rb.left())).max(0.0);
    let h = (ra.bottom().min(rb.bottom()) - ra.top().max(rb.top())).max(0.0);
    w * h
}

/// Largest share of either box's own area covered by the other.
///
/// A box without area contributes nothing.
#[must_use]
pub fn overlap_ratio(a: &LabelBox, b: &LabelBox) -> f64 {
    let inter = intersection_area(a, b);
    if inter <= 0.0 {
        return 0.0;
    }
    let own = |label: &LabelBox| {
        let area = label.rect().area();
        if area > 0.0 { inter / area } else { 0.0 }
    };
    own(a).max(own(b))
}

/// Every pair `(i, j)` with `i < j` that overlaps by more than `max_overlap`.
#[must_use]
pub fn find_overlaps(boxes: &[LabelBox], max_overlap: f64) -> Vec<Overlap> {
    let mut found = Vec::new();
    for (first, a) in boxes.iter().enumerate() {
        for (offset, b) in boxes[first + 1..].iter().enumerate() {
            let ratio = overlap_ratio(a, b);
            if ratio > max_overlap {
                found.push(Overlap { first, second: first + 1 + offset, ratio });
            }
        }
    }
    debug!(boxes = boxes.len(), flagged = found.len(), "overlap check complete");
    found
}
