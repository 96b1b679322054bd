#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn rect_approx_eq(a: NormalizedRect, b: NormalizedRect) -> bool {
    approx_eq(a.cx, b.cx) && approx_eq(a.cy, b.cy) && approx_eq(a.w, b.w) && approx_eq(a.h, b.h)
}

fn canvas(w: f64, h: f64) -> CanvasSize {
    CanvasSize::new(w, h).unwrap()
}

// =============================================================
// Point
// =============================================================

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn point_equality() {
    assert_eq!(Point::new(1.0, 2.0), Point::new(1.0, 2.0));
    assert_ne!(Point::new(1.0, 2.0), Point::new(1.0, 3.0));
}

// =============================================================
// CanvasSize
// =============================================================

#[test]
fn canvas_accepts_positive_dimensions() {
    let c = canvas(640.0, 480.0);
    assert_eq!(c.width(), 640.0);
    assert_eq!(c.height(), 480.0);
}

#[test]
fn canvas_rejects_zero_width() {
    let err = CanvasSize::new(0.0, 480.0).unwrap_err();
    assert_eq!(err, CanvasError::InvalidSize { width: 0.0, height: 480.0 });
}

#[test]
fn canvas_rejects_negative_height() {
    assert!(CanvasSize::new(640.0, -1.0).is_err());
}

#[test]
fn canvas_rejects_non_finite() {
    assert!(CanvasSize::new(f64::NAN, 480.0).is_err());
    assert!(CanvasSize::new(640.0, f64::INFINITY).is_err());
}

#[test]
fn canvas_error_message_names_dimensions() {
    let err = CanvasSize::new(0.0, 10.0).unwrap_err();
    assert!(err.to_string().contains("0x10"));
}

// =============================================================
// PixelRect
// =============================================================

#[test]
fn from_corners_orders_coordinates() {
    let r = PixelRect::from_corners(Point::new(50.0, 10.0), Point::new(20.0, 40.0));
    assert_eq!(r, PixelRect { x1: 20.0, y1: 10.0, x2: 50.0, y2: 40.0 });
    assert_eq!(r.width(), 30.0);
    assert_eq!(r.height(), 30.0);
}

#[test]
fn contains_is_inclusive() {
    let r = PixelRect { x1: 0.0, y1: 0.0, x2: 10.0, y2: 10.0 };
    assert!(r.contains(Point::new(0.0, 0.0)));
    assert!(r.contains(Point::new(10.0, 10.0)));
    assert!(r.contains(Point::new(5.0, 5.0)));
    assert!(!r.contains(Point::new(10.1, 5.0)));
    assert!(!r.contains(Point::new(5.0, -0.1)));
}

#[test]
fn clamp_to_clips_edges_past_the_canvas() {
    let r = PixelRect { x1: -20.0, y1: 900.0, x2: 1200.0, y2: 1100.0 }.clamp_to(canvas(1000.0, 1000.0));
    assert_eq!(r, PixelRect { x1: 0.0, y1: 900.0, x2: 1000.0, y2: 1000.0 });
}

#[test]
fn clamp_to_collapses_rect_outside_canvas() {
    let r = PixelRect { x1: 1100.0, y1: 10.0, x2: 1300.0, y2: 50.0 }.clamp_to(canvas(1000.0, 500.0));
    assert_eq!(r.width(), 0.0);
    assert_eq!(r.x1, 1000.0);
    assert_eq!(r.height(), 40.0);
}

// =============================================================
// NormalizedRect
// =============================================================

#[test]
fn normalized_edges() {
    let r = NormalizedRect::new(0.5, 0.4, 0.2, 0.1);
    assert!(approx_eq(r.left(), 0.4));
    assert!(approx_eq(r.right(), 0.6));
    assert!(approx_eq(r.top(), 0.35));
    assert!(approx_eq(r.bottom(), 0.45));
    assert!(approx_eq(r.area(), 0.02));
}

#[test]
fn within_unit_accepts_touching_box() {
    assert!(NormalizedRect::new(0.1, 0.9, 0.2, 0.2).within_unit(1e-6));
}

#[test]
fn within_unit_rejects_overflowing_box() {
    assert!(!NormalizedRect::new(0.95, 0.5, 0.2, 0.2).within_unit(1e-6));
    assert!(!NormalizedRect::new(0.5, 0.05, 0.2, 0.2).within_unit(1e-6));
}

// =============================================================
// Conversions
// =============================================================

#[test]
fn to_pixel_rect_square_canvas() {
    let r = to_pixel_rect(&NormalizedRect::new(0.5, 0.5, 0.2, 0.2), canvas(1000.0, 1000.0));
    assert!(approx_eq(r.x1, 400.0));
    assert!(approx_eq(r.y1, 400.0));
    assert!(approx_eq(r.x2, 600.0));
    assert!(approx_eq(r.y2, 600.0));
}

#[test]
fn to_pixel_rect_uses_each_axis_dimension() {
    let r = to_pixel_rect(&NormalizedRect::new(0.25, 0.5, 0.5, 0.5), canvas(800.0, 200.0));
    assert!(approx_eq(r.x1, 0.0));
    assert!(approx_eq(r.x2, 400.0));
    assert!(approx_eq(r.y1, 50.0));
    assert!(approx_eq(r.y2, 150.0));
}

#[test]
fn from_pixel_rect_basic() {
    let r = from_pixel_rect(100.0, 50.0, 300.0, 150.0, canvas(400.0, 200.0));
    assert!(rect_approx_eq(r, NormalizedRect::new(0.5, 0.5, 0.5, 0.5)));
}

#[test]
fn from_pixel_rect_ignores_corner_order() {
    let c = canvas(400.0, 200.0);
    let a = from_pixel_rect(100.0, 50.0, 300.0, 150.0, c);
    let b = from_pixel_rect(300.0, 150.0, 100.0, 50.0, c);
    assert!(rect_approx_eq(a, b));
}

#[test]
fn round_trip_across_canvas_sizes() {
    let boxes = [
        NormalizedRect::new(0.5, 0.5, 0.2, 0.2),
        NormalizedRect::new(0.1, 0.9, 0.05, 0.1),
        NormalizedRect::new(0.73, 0.21, 0.33, 0.4),
    ];
    let canvases = [canvas(1.0, 1.0), canvas(1920.0, 1080.0), canvas(333.0, 777.0)];
    for b in boxes {
        for c in canvases {
            let px = to_pixel_rect(&b, c);
            let back = from_pixel_rect(px.x1, px.y1, px.x2, px.y2, c);
            assert!(rect_approx_eq(b, back), "{b:?} on {c:?} came back as {back:?}");
        }
    }
}

#[test]
fn pixel_delta_to_ratio_divides_per_axis() {
    let (dx, dy) = pixel_delta_to_ratio(50.0, -20.0, canvas(1000.0, 400.0));
    assert!(approx_eq(dx, 0.05));
    assert!(approx_eq(dy, -0.05));
}
