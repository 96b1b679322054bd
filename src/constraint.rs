//! Boundary policies applied while a box is being moved or resized.
//!
//! Moving uses a symmetric clamp on the center: size never changes, the box is
//! slid back inside the unit square. Resizing works in pixel space and only
//! ever touches the edge(s) named by the active handle; the opposite edge is
//! the anchor and stays put, so dragging past the canvas border neither jumps
//! nor inverts the box. Added boxes are clipped to the unit square.

#[cfg(test)]
#[path = "constraint_test.rs"]
mod constraint_test;

use tracing::debug;

use crate::consts::BOUNDS_EPSILON;
use crate::coords::{CanvasSize, NormalizedRect, PixelRect, from_pixel_rect, to_pixel_rect};
use crate::hit::HandleTag;

/// Translate by a ratio delta, then apply the move clamp.
#[must_use]
pub fn translate(rect: NormalizedRect, dx: f64, dy: f64) -> NormalizedRect {
    clamp_center(NormalizedRect { cx: rect.cx + dx, cy: rect.cy + dy, ..rect })
}

/// Symmetric move clamp: keep `w`/`h`, slide the center back inside.
///
/// A box wider or taller than the canvas has no valid center; it is recentred
/// at `(0.5, 0.5)`.
#[must_use]
pub fn clamp_center(rect: NormalizedRect) -> NormalizedRect {
    if rect.w > 1.0 || rect.h > 1.0 {
        debug!(w = rect.w, h = rect.h, "box larger than canvas; recentring");
        return NormalizedRect { cx: 0.5, cy: 0.5, ..rect };
    }
    let half_w = rect.w / 2.0;
    let half_h = rect.h / 2.0;
    NormalizedRect {
        cx: rect.cx.max(half_w).min(1.0 - half_w),
        cy: rect.cy.max(half_h).min(1.0 - half_h),
        ..rect
    }
}

/// Resize by a pixel delta on the edges selected by `handle`.
///
/// The minimum size is enforced first by pulling the dragged edge back toward
/// the anchor, then the dragged edge alone is clamped to the canvas. Tags that
/// are not handles leave the rectangle unchanged.
#[must_use]
pub fn resize(
    rect: NormalizedRect,
    handle: HandleTag,
    dx: f64,
    dy: f64,
    canvas: CanvasSize,
    min_px: f64,
) -> NormalizedRect {
    if !handle.is_handle() {
        return rect;
    }
    // A loaded box may already overflow. Starting from edges inside the canvas
    // keeps a clamped dragged edge from crossing its anchor.
    let PixelRect { mut x1, mut y1, mut x2, mut y2 } = to_pixel_rect(&rect, canvas).clamp_to(canvas);

    if handle.moves_left() {
        x1 = pull_low(x1 + dx, x2, min_px);
    }
    if handle.moves_right() {
        x2 = pull_high(x2 + dx, x1, min_px, canvas.width());
    }
    if handle.moves_top() {
        y1 = pull_low(y1 + dy, y2, min_px);
    }
    if handle.moves_bottom() {
        y2 = pull_high(y2 + dy, y1, min_px, canvas.height());
    }

    from_pixel_rect(x1, y1, x2, y2, canvas)
}

/// Intersect a box with the unit square.
///
/// Used when a box is added rather than moved, so overflow is cut off instead
/// of slid back. A box entirely outside collapses onto the nearest border.
#[must_use]
pub fn clip_to_unit(rect: NormalizedRect) -> NormalizedRect {
    if rect.within_unit(BOUNDS_EPSILON) {
        return rect;
    }
    let clip = |v: f64| v.max(0.0).min(1.0);
    let (left, right) = (clip(rect.left()), clip(rect.right()));
    let (top, bottom) = (clip(rect.top()), clip(rect.bottom()));
    let clipped =
        NormalizedRect { cx: (left + right) / 2.0, cy: (top + bottom) / 2.0, w: right - left, h: bottom - top };
    debug!(?rect, ?clipped, "box clipped to canvas");
    clipped
}

/// Whether the box lies inside the unit square within the bounds tolerance.
///
/// Boxes at least as large as the canvas on either axis are exempt.
#[must_use]
pub fn within_bounds(rect: &NormalizedRect) -> bool {
    rect.w >= 1.0 || rect.h >= 1.0 || rect.within_unit(BOUNDS_EPSILON)
}

/// Dragged low edge (left/top): at least `min_px` before the anchor, never below 0.
fn pull_low(edge: f64, anchor: f64, min_px: f64) -> f64 {
    edge.min(anchor - min_px).max(0.0)
}

/// Dragged high edge (right/bottom): at least `min_px` after the anchor, never past `limit`.
fn pull_high(edge: f64, anchor: f64, min_px: f64, limit: f64) -> f64 {
    edge.max(anchor + min_px).min(limit)
}
