//! Plate character mapping between typed plate text and class ids.
//!
//! The alphabet is the ten digits followed by the 26 Latin capitals; a
//! character's class id is its index. Hyphens and spaces are separators on
//! real plates and never map to a box.

#[cfg(test)]
#[path = "charmap_test.rs"]
mod charmap_test;

use tracing::debug;

use crate::label::LabelBox;

/// Plate alphabet in class-id order.
pub const PLATE_ALPHABET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Shown for class ids outside the alphabet.
pub const UNKNOWN_CHAR: char = '?';

/// Error returned when plate text cannot be applied to a set of boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CharmapError {
    /// The text maps to a different number of characters than there are boxes.
    #[error("plate text has {found} characters but there are {expected} boxes")]
    LengthMismatch { expected: usize, found: usize },
}

/// Class id for a plate character, case-insensitive.
#[must_use]
pub fn class_id_for(c: char) -> Option<u32> {
    let upper = c.to_ascii_uppercase();
    PLATE_ALPHABET.chars().zip(0_u32..).find(|&(a, _)| a == upper).map(|(_, id)| id)
}

/// Plate character for a class id.
#[must_use]
pub fn char_for(class_id: u32) -> Option<char> {
    PLATE_ALPHABET.chars().zip(0_u32..).find(|&(_, id)| id == class_id).map(|(c, _)| c)
}

/// Convert typed plate text to class ids, skipping separators and unknown characters.
#[must_use]
pub fn text_to_class_ids(text: &str) -> Vec<u32> {
    let mut ids = Vec::with_capacity(text.len());
    for c in text.chars().filter(|c| !matches!(c, '-' | ' ')) {
        match class_id_for(c) {
            Some(id) => ids.push(id),
            None => debug!(character = %c, "character not in plate alphabet; skipped"),
        }
    }
    ids
}

/// Assign class ids from `text` to boxes given in reading order.
///
/// # Errors
///
/// Returns [`CharmapError::LengthMismatch`] without touching any box if the
/// text does not map to exactly one character per box.
pub fn assign_plate_text(boxes: &mut [LabelBox], text: &str) -> Result<(), CharmapError> {
    let ids = text_to_class_ids(text);
    if ids.len() != boxes.len() {
        return Err(CharmapError::LengthMismatch { expected: boxes.len(), found: ids.len() });
    }
    for (label, id) in boxes.iter_mut().zip(ids) {
        label.class_id = id;
    }
    Ok(())
}

/// Read the boxes back as plate text.
#[must_use]
pub fn plate_text(boxes: &[LabelBox]) -> String {
    boxes
        .iter()
        .map(|b| char_for(b.class_id).unwrap_or(UNKNOWN_CHAR))
        .collect()
}
