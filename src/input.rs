//! Interaction model: the gesture state machine's states and the values it
//! hands back to the host.
//!
//! `InteractionState` is the active gesture tracked between pointer-down and
//! pointer-up. Each active variant carries what is needed to compute
//! incremental deltas and, for drags and resizes, the geometry the box had
//! before the gesture so a cancel can put it back. `OperationKind` is the
//! closed set of outcomes of a pointer-down, in priority order.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::coords::{NormalizedRect, PixelRect, Point};
use crate::hit::HandleTag;
use crate::label::BoxId;

/// Internal state for the interaction state machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is drawing a new box from an anchor corner.
    Drawing {
        /// Pointer-down position; one corner of the new box.
        anchor: Point,
        /// Latest pointer position; the opposite corner of the preview.
        current: Point,
    },
    /// The user is moving a box.
    Dragging {
        /// Box being moved.
        id: BoxId,
        /// Pointer position at the previous event.
        last: Point,
        /// Geometry at the start of the drag, restored on cancel.
        orig: NormalizedRect,
    },
    /// The user is resizing a box by one of its eight handles.
    Resizing {
        /// Box being resized.
        id: BoxId,
        /// Which corner or edge is being dragged.
        handle: HandleTag,
        /// Pointer position at the previous event.
        last: Point,
        /// Geometry at the start of the resize, restored on cancel.
        orig: NormalizedRect,
    },
}

impl InteractionState {
    /// The discriminant, for error reporting and assertions.
    #[must_use]
    pub fn kind(&self) -> StateKind {
        match self {
            Self::Idle => StateKind::Idle,
            Self::Drawing { .. } => StateKind::Drawing,
            Self::Dragging { .. } => StateKind::Dragging,
            Self::Resizing { .. } => StateKind::Resizing,
        }
    }
}

/// Field-less mirror of [`InteractionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateKind {
    Idle,
    Drawing,
    Dragging,
    Resizing,
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Drawing => "drawing",
            Self::Dragging => "dragging",
            Self::Resizing => "resizing",
        };
        f.write_str(name)
    }
}

/// Outcome of a pointer-down outside drawing mode.
///
/// Variants are listed in priority order: a handle hit wins over a body hit,
/// which wins over a plain selection change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum OperationKind {
    /// A resize began on `id` using `handle`.
    Resize { id: BoxId, handle: HandleTag },
    /// A drag began on `id`.
    Drag { id: BoxId },
    /// Selection moved to `id`; no gesture began.
    Select { id: BoxId },
    /// Nothing was hit; selection was cleared.
    None,
}

/// A completed draw, ready for the host to turn into a box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawnBox {
    /// Final rectangle in canvas pixels.
    pub pixels: PixelRect,
    /// The same rectangle in ratio space.
    pub rect: NormalizedRect,
}

/// Caller-contract violations of the state machine.
///
/// These indicate a host bug (an event routed to the wrong handler), not a
/// user error. The engine state is left untouched when one is returned.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum InteractionError {
    /// The call requires a different active state.
    #[error("expected {expected} state, engine is {found}")]
    WrongState { expected: StateKind, found: StateKind },
    /// A draw was started while drawing mode is off.
    #[error("drawing mode is off")]
    DrawingModeOff,
    /// The canvas size has not been set yet.
    #[error("canvas size not set")]
    NoCanvas,
    /// The box under manipulation disappeared from the collection mid-gesture.
    #[error("box {0} is no longer in the collection")]
    MissingBox(BoxId),
}
