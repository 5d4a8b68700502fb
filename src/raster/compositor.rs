//! Scene compositor: walks the template's layer order and paints every
//! element into an RGBA surface.
//!
//! Output is deterministic for a given template, asset store, and scale.
//! Failures stay local: an image element whose bitmap was never loaded is
//! logged and skipped so one broken asset cannot blank an export.

#[cfg(test)]
#[path = "compositor_test.rs"]
mod compositor_test;

use image::RgbaImage;

use crate::assets::ImageStore;
use crate::color::Color;
use crate::element::{ElementRef, LineElement, LineTip, ShapeElement, ShapeKind};
use crate::error::EngineError;
use crate::geom::{rotate_point, Point, Rect};
use crate::raster::canvas::Canvas;
use crate::raster::image_el::draw_image;
use crate::raster::text::FontStore;
use crate::template::Template;

/// Rasterize a template at `scale` device pixels per template pixel.
#[must_use]
pub fn render(template: &Template, scale: f64, images: &ImageStore, fonts: &FontStore) -> RgbaImage {
    let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let mut canvas = Canvas::new(
        (template.width * scale).round().max(1.0) as u32,
        (template.height * scale).round().max(1.0) as u32,
    );

    canvas.fill(Color::parse_or(&template.background_color, Color::WHITE));

    if let Some(src) = &template.background_image {
        if let Some(bitmap) = images.get(src) {
            let full = Rect::new(0.0, 0.0, f64::from(canvas.width()), f64::from(canvas.height()));
            canvas.blit_stretched(bitmap, &full);
        } else {
            tracing::warn!(src, "background bitmap not loaded, using background color only");
        }
    }

    for el in template.paint_list() {
        match el {
            ElementRef::Image(img) => {
                if let Some(bitmap) = images.get(&img.src) {
                    draw_image(&mut canvas, img, bitmap, scale);
                } else {
                    tracing::warn!(element = %img.id, src = img.src, "bitmap not loaded, skipping image element");
                }
            }
            ElementRef::Text(text) => fonts.draw_element(&mut canvas, text, scale),
            ElementRef::Shape(shape) => draw_shape(&mut canvas, shape, scale),
            ElementRef::Line(line) => draw_line(&mut canvas, line, scale),
        }
    }

    canvas.into_image()
}

/// Encode a rendered surface as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, EngineError> {
    let mut bytes = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(image.clone())
        .write_to(&mut bytes, image::ImageFormat::Png)?;
    Ok(bytes.into_inner())
}

// =============================================================
// Shapes
// =============================================================

fn draw_shape(canvas: &mut Canvas, shape: &ShapeElement, scale: f64) {
    let rect = Rect::new(shape.x * scale, shape.y * scale, shape.width * scale, shape.height * scale);
    let fill = Color::parse_or(&shape.fill, Color::TRANSPARENT).with_opacity(shape.opacity);
    let border = Color::parse_or(&shape.border_color, Color::BLACK).with_opacity(shape.opacity);
    let border_w = shape.border_width * scale;

    match shape.kind {
        ShapeKind::Rectangle => {
            let radius = shape.border_radius * scale;
            canvas.fill_rounded_rect(&rect, radius, shape.rotation, fill);
            canvas.stroke_rounded_rect(&rect, radius, border_w, shape.rotation, border);
        }
        ShapeKind::Circle => {
            canvas.fill_ellipse(&rect, shape.rotation, fill);
            canvas.stroke_ellipse(&rect, border_w, shape.rotation, border);
        }
        ShapeKind::Triangle => {
            let center = rect.center();
            let raw = [
                Point::new(center.x, rect.y),
                Point::new(rect.right(), rect.bottom()),
                Point::new(rect.x, rect.bottom()),
            ];
            let vertices = raw.map(|v| rotate_point(v, center, shape.rotation));
            canvas.fill_polygon(&vertices, fill);
            canvas.stroke_polygon(&vertices, border_w, border);
        }
    }
}

// =============================================================
// Lines
// =============================================================

fn draw_line(canvas: &mut Canvas, line: &LineElement, scale: f64) {
    let width = line.effective_stroke_width() * scale;
    if width <= 0.0 {
        return;
    }
    let color = Color::parse_or(&line.stroke_color, Color::BLACK).with_opacity(line.opacity);
    let a = line.start.scaled(scale);
    let b = line.end.scaled(scale);
    let len = (b.x - a.x).hypot(b.y - a.y);
    if len == 0.0 {
        return;
    }
    let dir = Point::new((b.x - a.x) / len, (b.y - a.y) / len);
    let (start_tip, end_tip) = line.effective_tips();

    // Tips that occupy length trim the shaft so the stroke never pokes
    // through an arrow head.
    let start_trim = tip_trim(start_tip, width);
    let end_trim = tip_trim(end_tip, width);
    let shaft_a = Point::new(a.x + dir.x * start_trim, a.y + dir.y * start_trim);
    let shaft_b = Point::new(b.x - dir.x * end_trim, b.y - dir.y * end_trim);
    let shaft_len = (len - start_trim - end_trim).max(0.0);

    if shaft_len > 0.0 {
        match line.kind.dash_pattern() {
            Some((on, off)) => {
                draw_dashes(canvas, shaft_a, dir, shaft_len, width, on * width, off * width, color);
            }
            None => canvas.stroke_segment(shaft_a, shaft_b, width, false, color),
        }
    }

    draw_tip(canvas, start_tip, a, Point::new(-dir.x, -dir.y), width, color);
    draw_tip(canvas, end_tip, b, dir, width, color);
}

/// Shaft length consumed by a tip glyph.
fn tip_trim(tip: LineTip, width: f64) -> f64 {
    match tip {
        LineTip::Arrow => width * 3.0,
        LineTip::None | LineTip::Circle | LineTip::Rounded => 0.0,
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_dashes(
    canvas: &mut Canvas,
    start: Point,
    dir: Point,
    total: f64,
    width: f64,
    on: f64,
    off: f64,
    color: Color,
) {
    if on <= 0.0 {
        return;
    }
    let mut pos = 0.0;
    while pos < total {
        let seg_end = (pos + on).min(total);
        let a = Point::new(start.x + dir.x * pos, start.y + dir.y * pos);
        let b = Point::new(start.x + dir.x * seg_end, start.y + dir.y * seg_end);
        canvas.stroke_segment(a, b, width, false, color);
        pos = seg_end + off;
    }
}

/// Draw a tip glyph at `point`, with `dir` pointing outward along the line.
fn draw_tip(canvas: &mut Canvas, tip: LineTip, point: Point, dir: Point, width: f64, color: Color) {
    match tip {
        LineTip::None => {}
        LineTip::Rounded => canvas.fill_circle(point, width / 2.0, color),
        LineTip::Circle => {
            // Open ring, not a disc.
            let bbox = Rect::new(point.x - width, point.y - width, width * 2.0, width * 2.0);
            canvas.stroke_ellipse(&bbox, width / 2.0, 0.0, color);
        }
        LineTip::Arrow => {
            let len = width * 3.0;
            let half = width * 1.5;
            let base = Point::new(point.x - dir.x * len, point.y - dir.y * len);
            let perp = Point::new(-dir.y, dir.x);
            let vertices = [
                point,
                Point::new(base.x + perp.x * half, base.y + perp.y * half),
                Point::new(base.x - perp.x * half, base.y - perp.y * half),
            ];
            canvas.fill_polygon(&vertices, color);
        }
    }
}
