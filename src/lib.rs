//! Geometry and ordering engine for license-plate character annotation.
//!
//! Boxes are stored in ratio space (center and size as fractions of the
//! image) and manipulated through canvas-pixel pointer events. The crate turns
//! those events into validated box edits, hit-tests pointers against boxes,
//! groups characters into plates for a stable reading order, and flags likely
//! duplicate annotations. Rendering, file dialogs and image loading are the
//! host's job; the host only ever sees the values returned here.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::Annotator`], the state the host drives |
//! | [`input`] | Interaction states, operation outcomes and contract errors |
//! | [`hit`] | Threshold-based handle/body classification |
//! | [`constraint`] | Move and resize boundary policies |
//! | [`coords`] | Pixel and ratio geometry with the conversions between them |
//! | [`label`] | Annotation box and the ordered box collection |
//! | [`plate`] | Plate grouping and reading order |
//! | [`overlap`] | Duplicate-annotation detection |
//! | [`yolo`] | Label file parsing and formatting |
//! | [`charmap`] | Plate characters to class ids and back |
//! | [`config`] | Validated engine configuration, with environment overrides |
//! | [`consts`] | Shared numeric defaults (thresholds, ratios, minimum sizes) |

pub mod charmap;
pub mod config;
pub mod constraint;
pub mod consts;
pub mod coords;
pub mod engine;
pub mod hit;
pub mod input;
pub mod label;
pub mod overlap;
pub mod plate;
pub mod yolo;
