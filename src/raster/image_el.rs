//! Image element rasterization: fit-state sampling, border-radius clip,
//! grayscale, and rotation in a single inverse-mapped pass.
//!
//! Instead of compositing through an intermediate surface, every output
//! pixel is mapped backwards: inverse-rotate into the element's local box,
//! clip against the rounded box edge, then through the fit state
//! (`scale_x`/`scale_y`/`image_offset`) into bitmap coordinates for a
//! bilinear sample.

#[cfg(test)]
#[path = "image_el_test.rs"]
mod image_el_test;

use image::RgbaImage;

use crate::color::Color;
use crate::element::ImageElement;
use crate::geom::{rotate_point, rotated_bounds, Point, Rect};
use crate::raster::canvas::{rounded_rect_distance, sample_bilinear, Canvas};

/// Paint an image element into the canvas. `scale` converts template units
/// to device pixels.
pub fn draw_image(canvas: &mut Canvas, el: &ImageElement, bitmap: &RgbaImage, scale: f64) {
    if el.width <= 0.0 || el.height <= 0.0 || el.scale_x <= 0.0 || el.scale_y <= 0.0 {
        return;
    }
    let rect = Rect::new(el.x * scale, el.y * scale, el.width * scale, el.height * scale);
    let center = rect.center();
    let radius = el.border_radius * scale;
    let gray_t = (el.grayscale / 100.0).clamp(0.0, 1.0);
    let bbox = rotated_bounds(&rect, el.rotation).inflated(1.0);

    #[allow(clippy::cast_possible_truncation)]
    let x0 = (bbox.x.floor() as i64).max(0);
    #[allow(clippy::cast_possible_truncation)]
    let y0 = (bbox.y.floor() as i64).max(0);
    #[allow(clippy::cast_possible_truncation)]
    let x1 = (bbox.right().ceil() as i64).min(i64::from(canvas.width()));
    #[allow(clippy::cast_possible_truncation)]
    let y1 = (bbox.bottom().ceil() as i64).min(i64::from(canvas.height()));

    for y in y0..y1 {
        for x in x0..x1 {
            #[allow(clippy::cast_precision_loss)]
            let p = Point::new(x as f64 + 0.5, y as f64 + 0.5);
            let lp = rotate_point(p, center, -el.rotation);

            let clip = (0.5 - rounded_rect_distance(lp, &rect, radius)).clamp(0.0, 1.0);
            if clip <= 0.0 {
                continue;
            }

            // Device px inside the box, back through the fit state into
            // bitmap space.
            let tx = (lp.x - rect.x) / scale;
            let ty = (lp.y - rect.y) / scale;
            let sx = (tx - el.image_offset.x) / el.scale_x - 0.5;
            let sy = (ty - el.image_offset.y) / el.scale_y - 0.5;

            let [mut r, mut g, mut b, a] = sample_bilinear(bitmap, sx, sy);
            if a <= 0.0 {
                continue;
            }
            if gray_t > 0.0 {
                let luma = 0.299 * r + 0.587 * g + 0.114 * b;
                r = r * (1.0 - gray_t) + luma * gray_t;
                g = g * (1.0 - gray_t) + luma * gray_t;
                b = b * (1.0 - gray_t) + luma * gray_t;
            }
            canvas.blend(
                x,
                y,
                Color { r: to_u8(r), g: to_u8(g), b: to_u8(b), a: 255 },
                clip * a / 255.0,
            );
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_u8(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
