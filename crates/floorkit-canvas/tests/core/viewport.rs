use floorkit_canvas::viewport::{Viewport, MAX_SCALE, MIN_SCALE};
use floorkit_core::{DisplayBounds, NormalizedRect, Point, ScreenPoint, ViewportState};

fn assert_screen(actual: ScreenPoint, x: f64, y: f64) {
    assert!(
        (actual.x - x).abs() < 1e-9 && (actual.y - y).abs() < 1e-9,
        "expected ({x}, {y}), got {actual}"
    );
}

fn assert_point(actual: Point, x: f64, y: f64) {
    assert!(
        (actual.x - x).abs() < 1e-9 && (actual.y - y).abs() < 1e-9,
        "expected ({x}, {y}), got {actual}"
    );
}

#[test]
fn test_viewport_creation() {
    let vp = Viewport::new(800.0, 600.0);
    assert_eq!(vp.scale(), 1.0);
    assert_eq!(vp.pan_offset(), ScreenPoint::new(0.0, 0.0));
    assert_eq!(vp.min_scale(), MIN_SCALE);
    assert_eq!(vp.max_scale(), MAX_SCALE);
    assert!(vp.is_fallback());
}

#[test]
fn test_fallback_maps_center_to_viewport_center() {
    let vp = Viewport::new(800.0, 600.0);
    assert_screen(vp.to_screen(&Point::new(0.5, 0.5)), 400.0, 300.0);
}

#[test]
fn test_display_bounds_anchor_the_transform() {
    let mut vp = Viewport::new(800.0, 600.0);
    vp.set_display_bounds(Some(DisplayBounds::new(100.0, 50.0, 600.0, 500.0)));
    assert!(!vp.is_fallback());

    assert_screen(vp.to_screen(&Point::new(0.0, 0.0)), 100.0, 50.0);
    assert_screen(vp.to_screen(&Point::new(1.0, 1.0)), 700.0, 550.0);
    assert_screen(vp.to_screen(&Point::new(0.5, 0.5)), 400.0, 300.0);
}

#[test]
fn test_pan_and_scale_apply_after_bounds() {
    let mut vp = Viewport::new(800.0, 600.0);
    vp.set_display_bounds(Some(DisplayBounds::new(100.0, 50.0, 600.0, 500.0)));
    vp.set_state(ViewportState {
        pan_offset: ScreenPoint::new(10.0, 20.0),
        scale: 2.0,
    });

    let screen = vp.to_screen(&Point::new(0.5, 0.5));
    assert_screen(screen, 810.0, 620.0);
    assert_point(vp.to_normalized(&screen), 0.5, 0.5);
}

#[test]
fn test_to_normalized_clamps() {
    let vp = Viewport::new(800.0, 600.0);
    assert_point(vp.to_normalized(&ScreenPoint::new(-50.0, 10_000.0)), 0.0, 1.0);

    let raw = vp.to_normalized_unclamped(&ScreenPoint::new(-80.0, 900.0));
    assert_point(raw, -0.1, 1.5);
}

#[test]
fn test_clearing_bounds_returns_to_fallback() {
    let mut vp = Viewport::new(800.0, 600.0);
    vp.set_display_bounds(Some(DisplayBounds::new(100.0, 50.0, 600.0, 500.0)));
    vp.clear_display_bounds();
    assert!(vp.is_fallback());
    assert_screen(vp.to_screen(&Point::new(0.5, 0.5)), 400.0, 300.0);
}

#[test]
fn test_resize_changes_fallback_mapping() {
    let mut vp = Viewport::new(800.0, 600.0);
    vp.set_viewport_size(1000.0, 1000.0);
    assert_screen(vp.to_screen(&Point::new(0.5, 0.5)), 500.0, 500.0);
}

#[test]
fn test_zoom_at_keeps_cursor_point_fixed() {
    let mut vp = Viewport::new(800.0, 600.0);
    let cursor = ScreenPoint::new(200.0, 150.0);
    let before = vp.to_normalized(&cursor);

    assert!(vp.zoom_at(cursor, 2.0));
    assert_eq!(vp.scale(), 2.0);
    assert_screen(vp.pan_offset(), -200.0, -150.0);
    let after = vp.to_normalized(&cursor);
    assert_point(after, before.x, before.y);
}

#[test]
fn test_zoom_clamps_to_limits() {
    let mut vp = Viewport::new(800.0, 600.0);
    assert!(vp.zoom_at(ScreenPoint::new(0.0, 0.0), 100.0));
    assert_eq!(vp.scale(), MAX_SCALE);
    assert!(!vp.zoom_at(ScreenPoint::new(0.0, 0.0), 2.0));

    assert!(vp.zoom_at(ScreenPoint::new(0.0, 0.0), 0.0001));
    assert_eq!(vp.scale(), MIN_SCALE);
}

#[test]
fn test_zoom_in_and_out_around_center() {
    let mut vp = Viewport::new(800.0, 600.0);
    assert!(vp.zoom_in());
    assert!((vp.scale() - 1.2).abs() < 1e-12);
    assert_point(vp.to_normalized(&ScreenPoint::new(400.0, 300.0)), 0.5, 0.5);

    assert!(vp.zoom_out());
    assert!((vp.scale() - 1.0).abs() < 1e-12);
}

#[test]
fn test_set_scale_is_clamped() {
    let mut vp = Viewport::new(800.0, 600.0);
    vp.set_scale(50.0);
    assert_eq!(vp.scale(), 10.0);
    vp.set_scale(-1.0);
    assert_eq!(vp.scale(), 10.0);

    let mut narrow = Viewport::new(800.0, 600.0).with_scale_limits(0.5, 2.0);
    narrow.set_scale(0.1);
    assert_eq!(narrow.scale(), 0.5);
}

#[test]
fn test_center_on() {
    let mut vp = Viewport::new(800.0, 600.0);
    vp.center_on(&Point::new(0.25, 0.75));
    assert_screen(vp.pan_offset(), 200.0, -150.0);
    assert_screen(vp.to_screen(&Point::new(0.25, 0.75)), 400.0, 300.0);
}

#[test]
fn test_fit_to_rect() {
    let mut vp = Viewport::new(800.0, 600.0);
    let rect = NormalizedRect::from_corners(Point::new(0.25, 0.25), Point::new(0.75, 0.75));
    vp.fit_to(&rect, 0.0);
    assert!((vp.scale() - 2.0).abs() < 1e-12);
    assert_screen(vp.to_screen(&Point::new(0.5, 0.5)), 400.0, 300.0);
}

#[test]
fn test_pan_by_and_reset() {
    let mut vp = Viewport::new(800.0, 600.0);
    vp.pan_by(30.0, -20.0);
    vp.set_scale(3.0);
    assert_screen(vp.pan_offset(), 30.0, -20.0);

    vp.reset();
    assert_eq!(vp.state(), ViewportState::default());
}

#[test]
fn test_visible_rect_without_padding_covers_map() {
    let vp = Viewport::new(800.0, 600.0);
    let rect = vp.visible_rect(0.0);
    assert_point(Point::new(rect.min_x, rect.min_y), 0.0, 0.0);
    assert_point(Point::new(rect.max_x, rect.max_y), 1.0, 1.0);
}
