#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

// =============================================================
// Fit modes
// =============================================================

#[test]
fn cover_wide_bitmap_in_narrow_box() {
    // 200×100 box, 400×100 bitmap: scale = max(0.5, 1.0) = 1.0,
    // horizontal overflow centered at −100, no vertical offset.
    let fit = compute_fit(FitMode::Cover, 200.0, 100.0, 400.0, 100.0);
    assert_eq!(fit.scale_x, 1.0);
    assert_eq!(fit.scale_y, 1.0);
    assert_eq!(fit.offset.x, -100.0);
    assert_eq!(fit.offset.y, 0.0);
}

#[test]
fn cover_always_fills_the_box() {
    let fit = compute_fit(FitMode::Cover, 100.0, 100.0, 400.0, 200.0);
    // scale = max(0.25, 0.5) = 0.5; scaled bitmap 200×100 overflows x only.
    assert_eq!(fit.scale_x, 0.5);
    assert_eq!(fit.offset, crate::geom::Point::new(-50.0, 0.0));
}

#[test]
fn contain_letterboxes_with_positive_offset() {
    let fit = compute_fit(FitMode::Contain, 200.0, 100.0, 400.0, 100.0);
    // scale = min(0.5, 1.0) = 0.5; scaled 200×50, centered vertically.
    assert_eq!(fit.scale_x, 0.5);
    assert_eq!(fit.offset, crate::geom::Point::new(0.0, 25.0));
}

#[test]
fn fill_stretches_each_axis() {
    let fit = compute_fit(FitMode::Fill, 200.0, 100.0, 400.0, 100.0);
    assert_eq!(fit.scale_x, 0.5);
    assert_eq!(fit.scale_y, 1.0);
    assert_eq!(fit.offset, crate::geom::Point::default());
}

#[test]
fn fit_width_locks_horizontal() {
    let fit = compute_fit(FitMode::FitWidth, 200.0, 300.0, 400.0, 100.0);
    // scale = 0.5; scaled 200×50, vertical slack (300−50)/2 = 125.
    assert_eq!(fit.scale_x, 0.5);
    assert_eq!(fit.scale_y, 0.5);
    assert_eq!(fit.offset, crate::geom::Point::new(0.0, 125.0));
}

#[test]
fn fit_height_locks_vertical() {
    let fit = compute_fit(FitMode::FitHeight, 300.0, 50.0, 400.0, 100.0);
    // scale = 0.5; scaled 200×50, horizontal slack (300−200)/2 = 50.
    assert_eq!(fit.scale_x, 0.5);
    assert_eq!(fit.offset, crate::geom::Point::new(50.0, 0.0));
}

#[test]
fn degenerate_inputs_yield_identity() {
    assert_eq!(compute_fit(FitMode::Cover, 200.0, 100.0, 0.0, 100.0), Fit { scale_x: 1.0, scale_y: 1.0, offset: crate::geom::Point::default() });
    assert_eq!(compute_fit(FitMode::Contain, 0.0, 100.0, 400.0, 100.0).scale_x, 1.0);
}

#[test]
fn apply_to_writes_element_state() {
    let mut el = ImageElement::new("x", 0.0, 0.0, 200.0, 100.0);
    compute_fit(FitMode::Cover, 200.0, 100.0, 400.0, 100.0).apply_to(&mut el);
    assert_eq!(el.scale_x, 1.0);
    assert_eq!(el.image_offset.x, -100.0);
}

// =============================================================
// Crop session
// =============================================================

#[test]
fn full_session_covers_bitmap() {
    let s = CropSession::full(400.0, 100.0);
    assert_eq!(s.region, Rect::new(0.0, 0.0, 400.0, 100.0));
}

#[test]
fn crop_round_trip_is_idempotent() {
    // A crop equal to the full bitmap reproduces the contain scale with zero
    // net offset (only the centering term remains).
    let session = CropSession::full(400.0, 100.0);
    let fit = session.apply(200.0, 100.0);
    let reference = compute_fit(FitMode::Contain, 200.0, 100.0, 400.0, 100.0);
    assert_eq!(fit, reference);
}

#[test]
fn from_element_inverts_cover_state() {
    let mut el = ImageElement::new("x", 0.0, 0.0, 200.0, 100.0);
    compute_fit(FitMode::Cover, 200.0, 100.0, 400.0, 100.0).apply_to(&mut el);

    let s = CropSession::from_element(&el, 400.0, 100.0);
    // Cover showed the middle 200×100 of the bitmap.
    assert!(approx_eq(s.region.x, 100.0));
    assert!(approx_eq(s.region.y, 0.0));
    assert!(approx_eq(s.region.width, 200.0));
    assert!(approx_eq(s.region.height, 100.0));

    // Applying the untouched session reproduces the element's fit state.
    let fit = s.apply(200.0, 100.0);
    assert!(approx_eq(fit.scale_x, el.scale_x));
    assert!(approx_eq(fit.offset.x, el.image_offset.x));
    assert!(approx_eq(fit.offset.y, el.image_offset.y));
}

#[test]
fn drag_body_translates_with_clamp() {
    let mut s = CropSession::from_element(
        &{
            let mut el = ImageElement::new("x", 0.0, 0.0, 200.0, 100.0);
            compute_fit(FitMode::Cover, 200.0, 100.0, 400.0, 100.0).apply_to(&mut el);
            el
        },
        400.0,
        100.0,
    );
    s.drag_body(50.0, 0.0);
    assert!(approx_eq(s.region.x, 150.0));
    // Clamped at the right edge of the bitmap: max x = 400 − 200 = 200.
    s.drag_body(500.0, 0.0);
    assert!(approx_eq(s.region.x, 200.0));
    // And at the left edge.
    s.drag_body(-1000.0, 0.0);
    assert!(approx_eq(s.region.x, 0.0));
}

#[test]
fn drag_corner_preserves_aspect() {
    let mut s = CropSession::full(400.0, 200.0); // aspect 2.0
    s.drag_corner(CropCorner::Se, -100.0, 0.0);
    assert!(approx_eq(s.region.width / s.region.height, 2.0));
    assert!(approx_eq(s.region.width, 300.0));
    // NW corner stays fixed.
    assert!(approx_eq(s.region.x, 0.0));
    assert!(approx_eq(s.region.y, 0.0));
}

#[test]
fn drag_corner_nw_anchors_se() {
    let mut s = CropSession::full(400.0, 200.0);
    s.drag_corner(CropCorner::Nw, 100.0, 0.0); // shrink from the left
    assert!(approx_eq(s.region.width, 300.0));
    assert!(approx_eq(s.region.right(), 400.0));
    assert!(approx_eq(s.region.bottom(), 200.0));
}

#[test]
fn drag_corner_respects_minimum() {
    let mut s = CropSession::full(400.0, 200.0);
    s.drag_corner(CropCorner::Se, -1000.0, 0.0);
    assert!(s.region.width >= MIN_ELEMENT_SIZE);
}

#[test]
fn drag_corner_clamps_to_bitmap() {
    let mut s = CropSession::full(400.0, 200.0);
    s.drag_corner(CropCorner::Se, -100.0, 0.0); // 300×150 at origin
    s.drag_body(100.0, 50.0); // region at (100, 50)
    s.drag_corner(CropCorner::Se, 1000.0, 0.0); // grow past the edge
    // Room from the fixed NW corner: 300 wide, 150 tall; aspect 2 limits
    // width to 300.
    assert!(s.region.right() <= 400.0 + EPSILON);
    assert!(s.region.bottom() <= 200.0 + EPSILON);
    assert!(approx_eq(s.region.width / s.region.height, 2.0));
}

#[test]
fn apply_centers_cropped_region_in_box() {
    let mut s = CropSession::full(400.0, 200.0);
    s.drag_corner(CropCorner::Se, -200.0, 0.0); // 200×100 at origin
    let fit = s.apply(100.0, 100.0);
    // scale = min(100/200, 100/100) = 0.5; scaled crop 100×50, vertical
    // slack centered.
    assert!(approx_eq(fit.scale_x, 0.5));
    assert!(approx_eq(fit.offset.x, 0.0));
    assert!(approx_eq(fit.offset.y, 25.0));
}

#[test]
fn apply_offsets_interior_crop() {
    let mut s = CropSession::full(400.0, 200.0);
    s.drag_corner(CropCorner::Se, -200.0, 0.0); // 200×100
    s.drag_body(100.0, 50.0); // at (100, 50)
    let fit = s.apply(200.0, 100.0);
    // scale = min(1.0, 1.0) = 1.0; offset pulls the crop's corner to the
    // box origin with no slack.
    assert!(approx_eq(fit.scale_x, 1.0));
    assert!(approx_eq(fit.offset.x, -100.0));
    assert!(approx_eq(fit.offset.y, -50.0));
}

// =============================================================
// Fit rescale on box resize
// =============================================================

#[test]
fn rescale_axes_scales_state_proportionally() {
    let mut el = ImageElement::new("x", 0.0, 0.0, 200.0, 100.0);
    compute_fit(FitMode::Cover, 200.0, 100.0, 400.0, 100.0).apply_to(&mut el);

    // Corner resize doubling width and height.
    rescale_axes(&mut el, 2.0, 2.0);
    assert_eq!(el.scale_x, 2.0);
    assert_eq!(el.scale_y, 2.0);
    assert_eq!(el.image_offset.x, -200.0);
}

#[test]
fn rescale_single_axis_for_edge_resize() {
    let mut el = ImageElement::new("x", 0.0, 0.0, 200.0, 100.0);
    compute_fit(FitMode::Cover, 200.0, 100.0, 400.0, 100.0).apply_to(&mut el);

    rescale_axes(&mut el, 1.5, 1.0);
    assert_eq!(el.scale_x, 1.5);
    assert_eq!(el.scale_y, 1.0);
    assert_eq!(el.image_offset.x, -150.0);
    assert_eq!(el.image_offset.y, 0.0);
}

#[test]
fn rescale_ignores_degenerate_ratios() {
    let mut el = ImageElement::new("x", 0.0, 0.0, 200.0, 100.0);
    el.scale_x = 2.0;
    rescale_axes(&mut el, 0.0, f64::NAN);
    assert_eq!(el.scale_x, 2.0);
    assert_eq!(el.scale_y, 1.0);
}
