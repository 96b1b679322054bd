//! Coordinate model: canvas-pixel points and rectangles, normalized (ratio)
//! rectangles, and the pure conversions between them.
//!
//! Boxes are stored in ratio space so they survive window resizes and zoom.
//! Everything the pointer touches is in canvas-pixel space. The functions here
//! are the only bridge between the two.

#[cfg(test)]
#[path = "coords_test.rs"]
mod coords_test;

use serde::{Deserialize, Serialize};

/// A point in canvas-pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Error returned when a canvas size cannot be used for conversions.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CanvasError {
    /// Width or height is zero, negative, or not finite.
    #[error("canvas dimensions must be positive and finite, got {width}x{height}")]
    InvalidSize { width: f64, height: f64 },
}

/// Pixel dimensions of the current display surface.
///
/// Construction is validated so every conversion can divide by the
/// dimensions without checking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    width: f64,
    height: f64,
}

impl CanvasSize {
    /// Build a canvas size.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidSize`] if either dimension is not a
    /// positive finite number.
    pub fn new(width: f64, height: f64) -> Result<Self, CanvasError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if valid(width) && valid(height) {
            Ok(Self { width, height })
        } else {
            Err(CanvasError::InvalidSize { width, height })
        }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }
}

/// Axis-aligned rectangle in canvas pixels, `x1 <= x2` and `y1 <= y2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl PixelRect {
    /// Build the rectangle spanned by two arbitrary corner points.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x1: a.x.min(b.x),
            y1: a.y.min(b.y),
            x2: a.x.max(b.x),
            y2: a.y.max(b.y),
        }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        self.x1 <= pt.x && pt.x <= self.x2 && self.y1 <= pt.y && pt.y <= self.y2
    }

    /// Clip every edge into `[0, width] x [0, height]`.
    ///
    /// A rectangle entirely off one side collapses onto that border.
    #[must_use]
    pub fn clamp_to(self, canvas: CanvasSize) -> Self {
        let clip = |v: f64, limit: f64| v.max(0.0).min(limit);
        Self {
            x1: clip(self.x1, canvas.width()),
            y1: clip(self.y1, canvas.height()),
            x2: clip(self.x2, canvas.width()),
            y2: clip(self.y2, canvas.height()),
        }
    }
}

/// A box in ratio space: center and size as fractions of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRect {
    pub cx: f64,
    pub cy: f64,
    pub w: f64,
    pub h: f64,
}

impl NormalizedRect {
    #[must_use]
    pub fn new(cx: f64, cy: f64, w: f64, h: f64) -> Self {
        Self { cx, cy, w, h }
    }

    #[must_use]
    pub fn left(&self) -> f64 {
        self.cx - self.w / 2.0
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.cx + self.w / 2.0
    }

    #[must_use]
    pub fn top(&self) -> f64 {
        self.cy - self.h / 2.0
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.cy + self.h / 2.0
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    /// Whether the rectangle lies inside the unit square, allowing `epsilon` of slack.
    #[must_use]
    pub fn within_unit(&self, epsilon: f64) -> bool {
        self.left() >= -epsilon
            && self.right() <= 1.0 + epsilon
            && self.top() >= -epsilon
            && self.bottom() <= 1.0 + epsilon
    }
}

/// Convert a normalized rectangle to its canvas-pixel bounds.
#[must_use]
pub fn to_pixel_rect(rect: &NormalizedRect, canvas: CanvasSize) -> PixelRect {
    let center_x = rect.cx * canvas.width;
    let center_y = rect.cy * canvas.height;
    let half_w = rect.w * canvas.width / 2.0;
    let half_h = rect.h * canvas.height / 2.0;
    PixelRect {
        x1: center_x - half_w,
        y1: center_y - half_h,
        x2: center_x + half_w,
        y2: center_y + half_h,
    }
}

/// Convert canvas-pixel bounds to a normalized rectangle.
///
/// Corner order does not matter; size is taken from the absolute spans.
#[must_use]
pub fn from_pixel_rect(x1: f64, y1: f64, x2: f64, y2: f64, canvas: CanvasSize) -> NormalizedRect {
    NormalizedRect {
        cx: (x1 + x2) / 2.0 / canvas.width,
        cy: (y1 + y2) / 2.0 / canvas.height,
        w: (x2 - x1).abs() / canvas.width,
        h: (y2 - y1).abs() / canvas.height,
    }
}

/// Convert a pixel displacement into a ratio displacement.
#[must_use]
pub fn pixel_delta_to_ratio(dx: f64, dy: f64, canvas: CanvasSize) -> (f64, f64) {
    (dx / canvas.width, dy / canvas.height)
}
