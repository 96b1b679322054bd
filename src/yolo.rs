//! Label file codec: one `<class_id> <cx> <cy> <w> <h>` line per box.
//!
//! Parsing is line-tolerant. A malformed line is skipped and reported with its
//! 1-based line number; the rest of the file still loads.

#[cfg(test)]
#[path = "yolo_test.rs"]
mod yolo_test;

use serde::Serialize;
use tracing::{info, warn};

use crate::consts::LABEL_FLOAT_DIGITS;
use crate::coords::NormalizedRect;
use crate::label::LabelBox;

const FIELD_NAMES: [&str; 4] = ["cx", "cy", "w", "h"];

/// Why a single line failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum ParseErrorKind {
    /// The line does not have exactly five whitespace-separated tokens.
    #[error("expected 5 values, got {found}")]
    FieldCount { found: usize },
    /// The class id is not a non-negative integer.
    #[error("invalid class id {value:?}")]
    ClassId { value: String },
    /// A coordinate is not a finite number.
    #[error("invalid {field} value {value:?}")]
    Number { field: &'static str, value: String },
    /// Width or height is zero or negative.
    #[error("{field} must be positive, got {value}")]
    NonPositiveSize { field: &'static str, value: String },
}

/// A parse failure tied to its line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    /// 1-based line number.
    pub line: usize,
    pub kind: ParseErrorKind,
}

/// Outcome of parsing a whole label file.
#[derive(Debug, Clone, Default)]
pub struct ParsedLabels {
    /// Successfully parsed boxes in file order.
    pub boxes: Vec<LabelBox>,
    /// One entry per skipped line.
    pub errors: Vec<ParseError>,
}

/// Parse one line. Blank lines yield `Ok(None)`.
///
/// # Errors
///
/// Returns the [`ParseErrorKind`] describing the first problem found.
pub fn parse_line(line: &str) -> Result<Option<LabelBox>, ParseErrorKind> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let [class, fields @ ..] = tokens.as_slice() else {
        return Ok(None);
    };
    if fields.len() != FIELD_NAMES.len() {
        return Err(ParseErrorKind::FieldCount { found: tokens.len() });
    }

    let class_id = class
        .parse::<u32>()
        .map_err(|_| ParseErrorKind::ClassId { value: (*class).to_owned() })?;

    let mut values = [0.0_f64; 4];
    for ((slot, raw), field) in values.iter_mut().zip(fields).zip(FIELD_NAMES) {
        *slot = match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => return Err(ParseErrorKind::Number { field, value: (*raw).to_owned() }),
        };
    }
    let [cx, cy, w, h] = values;
    for (field, value, raw) in [("w", w, fields[2]), ("h", h, fields[3])] {
        if value <= 0.0 {
            return Err(ParseErrorKind::NonPositiveSize { field, value: raw.to_owned() });
        }
    }

    Ok(Some(LabelBox::new(class_id, NormalizedRect::new(cx, cy, w, h))))
}

/// Parse a whole label file, collecting per-line errors instead of stopping.
#[must_use]
pub fn parse_labels(text: &str) -> ParsedLabels {
    let mut parsed = ParsedLabels::default();
    for (index, line) in text.lines().enumerate() {
        match parse_line(line) {
            Ok(Some(label)) => parsed.boxes.push(label),
            Ok(None) => {}
            Err(kind) => {
                let error = ParseError { line: index + 1, kind };
                warn!(line = error.line, error = %error.kind, "skipping malformed label line");
                parsed.errors.push(error);
            }
        }
    }
    info!(boxes = parsed.boxes.len(), errors = parsed.errors.len(), "parsed label file");
    parsed
}

/// Format one box as a label line, without a trailing newline.
#[must_use]
pub fn format_line(label: &LabelBox) -> String {
    format!(
        "{} {:.digits$} {:.digits$} {:.digits$} {:.digits$}",
        label.class_id,
        label.cx,
        label.cy,
        label.w,
        label.h,
        digits = LABEL_FLOAT_DIGITS
    )
}

/// Format boxes as a label file in reading order.
///
/// Boxes with a `line_index` come first, by index; the rest follow in list order.
#[must_use]
pub fn format_labels(boxes: &[LabelBox]) -> String {
    let mut ordered: Vec<&LabelBox> = boxes.iter().collect();
    ordered.sort_by_key(|b| b.line_index.unwrap_or(usize::MAX));
    let mut out = String::new();
    for label in ordered {
        out.push_str(&format_line(label));
        out.push('\n');
    }
    out
}
