//! Shared numeric constants for the annotation engine.

// ── Hit-testing ─────────────────────────────────────────────────

/// Canvas-pixel distance within which a pointer counts as touching an edge.
pub const EDGE_THRESHOLD_PX: f64 = 8.0;

/// Canvas-pixel distance from both corner edges within which a pointer grabs the corner.
pub const CORNER_THRESHOLD_PX: f64 = 15.0;

// ── Geometry ────────────────────────────────────────────────────

/// Smallest width or height, in canvas pixels, a drawn or resized box may have.
pub const MIN_BOX_PX: f64 = 5.0;

/// Slack allowed when checking that a box lies inside the unit square.
pub const BOUNDS_EPSILON: f64 = 1e-6;

// ── Ordering and QA ─────────────────────────────────────────────

/// Vertical overlap ratio at which a box joins an existing plate group.
pub const GROUP_OVERLAP_RATIO: f64 = 0.5;

/// Intersection-over-own-area ratio above which two boxes are flagged as duplicates.
pub const MAX_OVERLAP_RATIO: f64 = 0.6;

// ── Label files ─────────────────────────────────────────────────

/// Decimal digits written for each ratio in a label line.
pub const LABEL_FLOAT_DIGITS: usize = 17;
