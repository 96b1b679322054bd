//! Hit classification: which resize handle, body, or nothing a pointer touches.
//!
//! Classification is threshold-based rather than handle-square based, so the
//! grab zones scale with whatever canvas-pixel size the host renders at.
//! Corners beat edges, edges beat the body.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use serde::{Deserialize, Serialize};

use crate::config::HitThresholds;
use crate::coords::{CanvasSize, PixelRect, Point, to_pixel_rect};
use crate::label::{BoxId, LabelBox};

/// Which part of a box a pointer position touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleTag {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
    /// Strictly within the box, away from every handle.
    Inside,
    None,
}

impl HandleTag {
    /// Whether this tag starts a resize.
    #[must_use]
    pub fn is_handle(self) -> bool {
        !matches!(self, Self::Inside | Self::None)
    }

    /// Whether the pointer touches the box at all.
    #[must_use]
    pub fn is_hit(self) -> bool {
        self != Self::None
    }

    /// Whether the handle moves the left edge.
    #[must_use]
    pub fn moves_left(self) -> bool {
        matches!(self, Self::TopLeft | Self::Left | Self::BottomLeft)
    }

    /// Whether the handle moves the right edge.
    #[must_use]
    pub fn moves_right(self) -> bool {
        matches!(self, Self::TopRight | Self::Right | Self::BottomRight)
    }

    /// Whether the handle moves the top edge.
    #[must_use]
    pub fn moves_top(self) -> bool {
        matches!(self, Self::TopLeft | Self::Top | Self::TopRight)
    }

    /// Whether the handle moves the bottom edge.
    #[must_use]
    pub fn moves_bottom(self) -> bool {
        matches!(self, Self::BottomLeft | Self::Bottom | Self::BottomRight)
    }

    /// CSS cursor name the host should show while hovering this tag.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::TopLeft | Self::BottomRight => "nwse-resize",
            Self::TopRight | Self::BottomLeft => "nesw-resize",
            Self::Top | Self::Bottom => "ns-resize",
            Self::Left | Self::Right => "ew-resize",
            Self::Inside => "move",
            Self::None => "default",
        }
    }
}

/// A classified pointer position against a specific box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub box_id: BoxId,
    pub tag: HandleTag,
}

/// Classify `pt` against a single pixel rectangle.
#[must_use]
pub fn classify(pt: Point, rect: &PixelRect, thresholds: HitThresholds) -> HandleTag {
    let edge = thresholds.edge();
    let corner = thresholds.corner();
    let PixelRect { x1, y1, x2, y2 } = *rect;

    if pt.x < x1 - edge || pt.x > x2 + edge || pt.y < y1 - edge || pt.y > y2 + edge {
        return HandleTag::None;
    }

    let dx1 = (pt.x - x1).abs();
    let dx2 = (pt.x - x2).abs();
    let dy1 = (pt.y - y1).abs();
    let dy2 = (pt.y - y2).abs();

    if dx1 <= corner && dy1 <= corner {
        return HandleTag::TopLeft;
    }
    if dx2 <= corner && dy1 <= corner {
        return HandleTag::TopRight;
    }
    if dx1 <= corner && dy2 <= corner {
        return HandleTag::BottomLeft;
    }
    if dx2 <= corner && dy2 <= corner {
        return HandleTag::BottomRight;
    }

    let within_x = x1 <= pt.x && pt.x <= x2;
    let within_y = y1 <= pt.y && pt.y <= y2;

    if dx1 <= edge && within_y {
        return HandleTag::Left;
    }
    if dx2 <= edge && within_y {
        return HandleTag::Right;
    }
    if dy1 <= edge && within_x {
        return HandleTag::Top;
    }
    if dy2 <= edge && within_x {
        return HandleTag::Bottom;
    }

    if within_x && within_y {
        return HandleTag::Inside;
    }
    HandleTag::None
}

/// Classify `pt` against one box in ratio space.
#[must_use]
pub fn classify_box(pt: Point, label: &LabelBox, canvas: CanvasSize, thresholds: HitThresholds) -> HandleTag {
    classify(pt, &to_pixel_rect(&label.rect(), canvas), thresholds)
}

/// Whether `pt` lies within the box's pixel rectangle, ignoring handles.
#[must_use]
pub fn contains(pt: Point, label: &LabelBox, canvas: CanvasSize) -> bool {
    to_pixel_rect(&label.rect(), canvas).contains(pt)
}

/// Classify against a z-ordered list (last = topmost).
///
/// The topmost box is classified with handles; if it is missed, the remaining
/// boxes are tested for plain containment from the top down and the first
/// containing box is reported as [`HandleTag::Inside`].
#[must_use]
pub fn classify_stack(pt: Point, boxes: &[LabelBox], canvas: CanvasSize, thresholds: HitThresholds) -> Option<Hit> {
    let (top, rest) = boxes.split_last()?;
    let tag = classify_box(pt, top, canvas, thresholds);
    if tag.is_hit() {
        return Some(Hit { box_id: top.id, tag });
    }
    rest.iter()
        .rev()
        .find(|b| contains(pt, b, canvas))
        .map(|b| Hit { box_id: b.id, tag: HandleTag::Inside })
}

/// Classify with handles against every box from the top down; first hit wins.
#[must_use]
pub fn classify_all(pt: Point, boxes: &[LabelBox], canvas: CanvasSize, thresholds: HitThresholds) -> Option<Hit> {
    boxes.iter().rev().find_map(|b| {
        let tag = classify_box(pt, b, canvas, thresholds);
        tag.is_hit().then_some(Hit { box_id: b.id, tag })
    })
}

/// Topmost box whose pixel rectangle contains `pt`.
#[must_use]
pub fn topmost_containing(pt: Point, boxes: &[LabelBox], canvas: CanvasSize) -> Option<BoxId> {
    boxes.iter().rev().find(|b| contains(pt, b, canvas)).map(|b| b.id)
}
