use super::*;

fn red() -> Color {
    Color::rgb(200, 30, 30)
}

fn alpha_at(c: &Canvas, x: u32, y: u32) -> u8 {
    c.image().get_pixel(x, y)[3]
}

#[test]
fn new_canvas_is_transparent_and_nonzero() {
    let c = Canvas::new(4, 3);
    assert_eq!((c.width(), c.height()), (4, 3));
    assert_eq!(alpha_at(&c, 0, 0), 0);

    let tiny = Canvas::new(0, 0);
    assert_eq!((tiny.width(), tiny.height()), (1, 1));
}

#[test]
fn fill_overwrites_everything() {
    let mut c = Canvas::new(2, 2);
    c.fill(Color::WHITE);
    assert_eq!(*c.image().get_pixel(1, 1), image::Rgba([255, 255, 255, 255]));
}

#[test]
fn blend_composites_source_over() {
    let mut c = Canvas::new(1, 1);
    c.fill(Color::WHITE);
    c.blend(0, 0, Color::rgba(0, 0, 0, 255), 0.5);
    let p = c.image().get_pixel(0, 0);
    // Half-covered black over white lands mid-gray.
    assert!((120..=135).contains(&p[0]));
    assert_eq!(p[3], 255);
}

#[test]
fn blend_ignores_out_of_bounds() {
    let mut c = Canvas::new(2, 2);
    c.blend(-1, 0, red(), 1.0);
    c.blend(0, 5, red(), 1.0);
    assert_eq!(alpha_at(&c, 0, 0), 0);
}

#[test]
fn fill_rect_covers_interior_only() {
    let mut c = Canvas::new(20, 20);
    c.fill_rounded_rect(&Rect::new(5.0, 5.0, 10.0, 10.0), 0.0, 0.0, red());
    assert_eq!(alpha_at(&c, 10, 10), 255);
    assert_eq!(alpha_at(&c, 2, 2), 0);
    assert_eq!(alpha_at(&c, 18, 10), 0);
}

#[test]
fn rounded_corners_are_cut() {
    let mut c = Canvas::new(20, 20);
    c.fill_rounded_rect(&Rect::new(0.0, 0.0, 20.0, 20.0), 8.0, 0.0, red());
    // Corner pixel is outside the radius, center of the edge is not.
    assert_eq!(alpha_at(&c, 0, 0), 0);
    assert_eq!(alpha_at(&c, 10, 0), 255);
    assert_eq!(alpha_at(&c, 10, 10), 255);
}

#[test]
fn rotated_rect_covers_rotated_area() {
    let mut c = Canvas::new(40, 40);
    // A thin horizontal bar turned vertical: its old ends are bare, points
    // above and below the center are covered.
    c.fill_rounded_rect(&Rect::new(5.0, 18.0, 30.0, 4.0), 0.0, 90.0, red());
    assert_eq!(alpha_at(&c, 6, 20), 0);
    assert_eq!(alpha_at(&c, 34, 20), 0);
    assert_eq!(alpha_at(&c, 20, 8), 255);
    assert_eq!(alpha_at(&c, 20, 32), 255);
}

#[test]
fn stroke_rect_leaves_interior_empty() {
    let mut c = Canvas::new(20, 20);
    c.stroke_rounded_rect(&Rect::new(2.0, 2.0, 16.0, 16.0), 0.0, 2.0, 0.0, red());
    assert_eq!(alpha_at(&c, 3, 10), 255); // inside the band
    assert_eq!(alpha_at(&c, 10, 10), 0); // interior
    assert_eq!(alpha_at(&c, 0, 10), 0); // outside the box
}

#[test]
fn ellipse_fills_inscribed_area() {
    let mut c = Canvas::new(20, 10);
    c.fill_ellipse(&Rect::new(0.0, 0.0, 20.0, 10.0), 0.0, red());
    assert_eq!(alpha_at(&c, 10, 5), 255); // center
    assert_eq!(alpha_at(&c, 0, 0), 0); // box corner
    assert_eq!(alpha_at(&c, 19, 0), 0);
}

#[test]
fn polygon_triangle_fill() {
    let mut c = Canvas::new(20, 20);
    let v = [Point::new(10.0, 1.0), Point::new(19.0, 19.0), Point::new(1.0, 19.0)];
    c.fill_polygon(&v, red());
    assert_eq!(alpha_at(&c, 10, 12), 255); // centroid-ish
    assert_eq!(alpha_at(&c, 1, 1), 0); // above the left slope
    assert_eq!(alpha_at(&c, 18, 2), 0);
}

#[test]
fn segment_round_caps_extend_past_endpoints() {
    let mut c = Canvas::new(30, 10);
    c.stroke_segment(Point::new(5.0, 5.0), Point::new(25.0, 5.0), 4.0, true, red());
    assert_eq!(alpha_at(&c, 15, 5), 255);
    assert!(alpha_at(&c, 3, 5) > 0); // cap reaches left of the endpoint

    let mut butt = Canvas::new(30, 10);
    butt.stroke_segment(Point::new(5.0, 5.0), Point::new(25.0, 5.0), 4.0, false, red());
    assert_eq!(alpha_at(&butt, 2, 5), 0); // flush end
}

#[test]
fn circle_fill_is_symmetric() {
    let mut c = Canvas::new(21, 21);
    c.fill_circle(Point::new(10.5, 10.5), 8.0, red());
    assert_eq!(alpha_at(&c, 10, 10), 255);
    assert_eq!(alpha_at(&c, 10, 3), alpha_at(&c, 10, 17));
    assert_eq!(alpha_at(&c, 0, 0), 0);
}

#[test]
fn blit_rotated_quarter_turn_swaps_axes() {
    let mut src = Canvas::new(20, 4);
    src.fill(Color::rgb(0, 200, 0));
    let mut dst = Canvas::new(40, 40);
    dst.blit_rotated(&src, Point::new(20.0, 20.0), 90.0);
    // The bar now runs vertically through the center.
    assert!(alpha_at(&dst, 20, 12) > 200);
    assert!(alpha_at(&dst, 20, 28) > 200);
    assert_eq!(alpha_at(&dst, 8, 20), 0);
}

#[test]
fn blit_stretched_scales_source_to_dst() {
    let mut src = image::RgbaImage::new(2, 2);
    src.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
    src.put_pixel(1, 0, image::Rgba([255, 0, 0, 255]));
    src.put_pixel(0, 1, image::Rgba([0, 0, 255, 255]));
    src.put_pixel(1, 1, image::Rgba([0, 0, 255, 255]));

    let mut dst = Canvas::new(10, 10);
    dst.blit_stretched(&src, &Rect::new(0.0, 0.0, 10.0, 10.0));
    // Top rows red, bottom rows blue.
    assert!(dst.image().get_pixel(5, 1)[0] > 200);
    assert!(dst.image().get_pixel(5, 8)[2] > 200);
}

#[test]
fn bilinear_sampling_interpolates_midpoints() {
    let mut src = image::RgbaImage::new(2, 1);
    src.put_pixel(0, 0, image::Rgba([0, 0, 0, 255]));
    src.put_pixel(1, 0, image::Rgba([100, 0, 0, 255]));
    let mid = sample_bilinear(&src, 0.5, 0.0);
    assert!((mid[0] - 50.0).abs() < 1e-9);
    assert!((mid[3] - 255.0).abs() < 1e-9);
}
