//! Low-level pixel canvas: alpha blending and antialiased primitives.
//!
//! Every filled primitive is painted through a signed-distance evaluation
//! per pixel; coverage at the boundary comes from clamping the distance
//! into a one-pixel band, which gives consistent antialiasing across
//! shapes, strokes, and rotated geometry without a separate AA pass.
//! Rotation is handled by inverse-rotating each sample point, so rotated
//! primitives cost the same as upright ones.

#[cfg(test)]
#[path = "canvas_test.rs"]
mod canvas_test;

use image::{Rgba, RgbaImage};

use crate::color::Color;
use crate::geom::{rotate_point, rotated_bounds, Point, Rect};

/// An RGBA pixel surface the compositor paints into.
#[derive(Debug, Clone)]
pub struct Canvas {
    pixels: RgbaImage,
}

impl Canvas {
    /// A transparent canvas of the given size. Zero dimensions are bumped
    /// to one pixel so degenerate templates still produce an image.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { pixels: RgbaImage::new(width.max(1), height.max(1)) }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    #[must_use]
    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }

    #[must_use]
    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Overwrite every pixel, discarding existing content.
    pub fn fill(&mut self, color: Color) {
        let px = Rgba([color.r, color.g, color.b, color.a]);
        for p in self.pixels.pixels_mut() {
            *p = px;
        }
    }

    /// Source-over blend of `color` at integer pixel coordinates, scaled by
    /// `coverage` in 0..=1. Out-of-bounds writes are dropped.
    pub fn blend(&mut self, x: i64, y: i64, color: Color, coverage: f64) {
        if coverage <= 0.0 {
            return;
        }
        if x < 0 || y < 0 || x >= i64::from(self.width()) || y >= i64::from(self.height()) {
            return;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (xu, yu) = (x as u32, y as u32);
        let sa = f64::from(color.a) / 255.0 * coverage.min(1.0);
        if sa <= 0.0 {
            return;
        }
        let dst = self.pixels.get_pixel_mut(xu, yu);
        let da = f64::from(dst[3]) / 255.0;
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            *dst = Rgba([0, 0, 0, 0]);
            return;
        }
        let blend_ch = |s: u8, d: u8| -> u8 {
            let v = (f64::from(s) * sa + f64::from(d) * da * (1.0 - sa)) / out_a;
            quantize(v)
        };
        *dst = Rgba([
            blend_ch(color.r, dst[0]),
            blend_ch(color.g, dst[1]),
            blend_ch(color.b, dst[2]),
            quantize(out_a * 255.0),
        ]);
    }

    /// Paint `color` wherever `sdf` is negative, antialiased over a
    /// one-pixel band, restricted to `bbox`.
    fn paint_sdf(&mut self, bbox: &Rect, color: Color, sdf: impl Fn(Point) -> f64) {
        #[allow(clippy::cast_possible_truncation)]
        let x0 = (bbox.x.floor() as i64).max(0);
        #[allow(clippy::cast_possible_truncation)]
        let y0 = (bbox.y.floor() as i64).max(0);
        #[allow(clippy::cast_possible_truncation)]
        let x1 = (bbox.right().ceil() as i64).min(i64::from(self.width()));
        #[allow(clippy::cast_possible_truncation)]
        let y1 = (bbox.bottom().ceil() as i64).min(i64::from(self.height()));
        for y in y0..y1 {
            for x in x0..x1 {
                #[allow(clippy::cast_precision_loss)]
                let p = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                let cov = (0.5 - sdf(p)).clamp(0.0, 1.0);
                self.blend(x, y, color, cov);
            }
        }
    }

    /// Fill a rectangle with rounded corners, optionally rotated about its
    /// center. A zero radius gives sharp corners.
    pub fn fill_rounded_rect(&mut self, rect: &Rect, radius: f64, rotation_deg: f64, color: Color) {
        let center = rect.center();
        let r = radius.clamp(0.0, rect.width.min(rect.height) / 2.0);
        let bbox = rotated_bounds(rect, rotation_deg).inflated(1.0);
        self.paint_sdf(&bbox, color, |p| {
            let lp = rotate_point(p, center, -rotation_deg);
            sd_round_rect(lp, center, rect.width / 2.0, rect.height / 2.0, r)
        });
    }

    /// Stroke a rounded rectangle's border on the inside of its edge, the
    /// way a CSS border sits within the box.
    pub fn stroke_rounded_rect(
        &mut self,
        rect: &Rect,
        radius: f64,
        width: f64,
        rotation_deg: f64,
        color: Color,
    ) {
        if width <= 0.0 {
            return;
        }
        let center = rect.center();
        let r = radius.clamp(0.0, rect.width.min(rect.height) / 2.0);
        let bbox = rotated_bounds(rect, rotation_deg).inflated(1.0);
        self.paint_sdf(&bbox, color, |p| {
            let lp = rotate_point(p, center, -rotation_deg);
            let d = sd_round_rect(lp, center, rect.width / 2.0, rect.height / 2.0, r);
            band_inside(d, width)
        });
    }

    /// Fill the ellipse inscribed in `rect`, optionally rotated.
    pub fn fill_ellipse(&mut self, rect: &Rect, rotation_deg: f64, color: Color) {
        let center = rect.center();
        let bbox = rotated_bounds(rect, rotation_deg).inflated(1.0);
        self.paint_sdf(&bbox, color, |p| {
            let lp = rotate_point(p, center, -rotation_deg);
            sd_ellipse(lp, center, rect.width / 2.0, rect.height / 2.0)
        });
    }

    /// Stroke the inscribed ellipse's border on the inside of its edge.
    pub fn stroke_ellipse(&mut self, rect: &Rect, width: f64, rotation_deg: f64, color: Color) {
        if width <= 0.0 {
            return;
        }
        let center = rect.center();
        let bbox = rotated_bounds(rect, rotation_deg).inflated(1.0);
        self.paint_sdf(&bbox, color, |p| {
            let lp = rotate_point(p, center, -rotation_deg);
            band_inside(sd_ellipse(lp, center, rect.width / 2.0, rect.height / 2.0), width)
        });
    }

    /// Fill a simple polygon given in order (either winding).
    pub fn fill_polygon(&mut self, vertices: &[Point], color: Color) {
        if vertices.len() < 3 {
            return;
        }
        let bbox = polygon_bounds(vertices).inflated(1.0);
        self.paint_sdf(&bbox, color, |p| sd_polygon(p, vertices));
    }

    /// Stroke a simple polygon's border on the inside of its edge.
    pub fn stroke_polygon(&mut self, vertices: &[Point], width: f64, color: Color) {
        if vertices.len() < 3 || width <= 0.0 {
            return;
        }
        let bbox = polygon_bounds(vertices).inflated(1.0);
        self.paint_sdf(&bbox, color, |p| band_inside(sd_polygon(p, vertices), width));
    }

    /// Fill a circle.
    pub fn fill_circle(&mut self, center: Point, radius: f64, color: Color) {
        if radius <= 0.0 {
            return;
        }
        let bbox =
            Rect::new(center.x - radius, center.y - radius, radius * 2.0, radius * 2.0).inflated(1.0);
        self.paint_sdf(&bbox, color, |p| (p.x - center.x).hypot(p.y - center.y) - radius);
    }

    /// Stroke a segment with a given width. Round caps extend half the
    /// width past each endpoint; butt caps cut flush, which dash segments
    /// rely on to keep their pattern lengths exact.
    pub fn stroke_segment(&mut self, a: Point, b: Point, width: f64, round_caps: bool, color: Color) {
        if width <= 0.0 {
            return;
        }
        let pad = width / 2.0 + 1.0;
        let bbox = Rect::from_points(a, b).inflated(pad);
        if round_caps {
            self.paint_sdf(&bbox, color, |p| sd_segment(p, a, b) - width / 2.0);
        } else {
            self.paint_sdf(&bbox, color, |p| sd_oriented_box(p, a, b, width / 2.0));
        }
    }

    /// Blend another canvas into this one, rotated about `center` by
    /// `rotation_deg`, with the source's own center mapped to `center`.
    /// Samples bilinearly so rotated edges stay smooth.
    pub fn blit_rotated(&mut self, src: &Canvas, center: Point, rotation_deg: f64) {
        let sw = f64::from(src.width());
        let sh = f64::from(src.height());
        let dst_rect = Rect::new(center.x - sw / 2.0, center.y - sh / 2.0, sw, sh);
        let bbox = rotated_bounds(&dst_rect, rotation_deg).inflated(1.0);

        #[allow(clippy::cast_possible_truncation)]
        let x0 = (bbox.x.floor() as i64).max(0);
        #[allow(clippy::cast_possible_truncation)]
        let y0 = (bbox.y.floor() as i64).max(0);
        #[allow(clippy::cast_possible_truncation)]
        let x1 = (bbox.right().ceil() as i64).min(i64::from(self.width()));
        #[allow(clippy::cast_possible_truncation)]
        let y1 = (bbox.bottom().ceil() as i64).min(i64::from(self.height()));

        for y in y0..y1 {
            for x in x0..x1 {
                #[allow(clippy::cast_precision_loss)]
                let p = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                let lp = rotate_point(p, center, -rotation_deg);
                let sx = lp.x - dst_rect.x - 0.5;
                let sy = lp.y - dst_rect.y - 0.5;
                let [r, g, b, a] = sample_bilinear(&src.pixels, sx, sy);
                if a > 0.0 {
                    self.blend(
                        x,
                        y,
                        Color { r: quantize(r), g: quantize(g), b: quantize(b), a: 255 },
                        a / 255.0,
                    );
                }
            }
        }
    }

    /// Blend a bitmap stretched to fill `dst`, sampling bilinearly.
    pub fn blit_stretched(&mut self, src: &RgbaImage, dst: &Rect) {
        if dst.width <= 0.0 || dst.height <= 0.0 {
            return;
        }
        #[allow(clippy::cast_possible_truncation)]
        let x0 = (dst.x.floor() as i64).max(0);
        #[allow(clippy::cast_possible_truncation)]
        let y0 = (dst.y.floor() as i64).max(0);
        #[allow(clippy::cast_possible_truncation)]
        let x1 = (dst.right().ceil() as i64).min(i64::from(self.width()));
        #[allow(clippy::cast_possible_truncation)]
        let y1 = (dst.bottom().ceil() as i64).min(i64::from(self.height()));
        let sx_per = f64::from(src.width()) / dst.width;
        let sy_per = f64::from(src.height()) / dst.height;

        for y in y0..y1 {
            for x in x0..x1 {
                #[allow(clippy::cast_precision_loss)]
                let px = x as f64 + 0.5;
                #[allow(clippy::cast_precision_loss)]
                let py = y as f64 + 0.5;
                // Clamp to the edge so a stretched fill reaches the border
                // without fading out.
                let sx = ((px - dst.x) * sx_per - 0.5).clamp(0.0, f64::from(src.width()) - 1.0);
                let sy = ((py - dst.y) * sy_per - 0.5).clamp(0.0, f64::from(src.height()) - 1.0);
                let [r, g, b, a] = sample_bilinear(src, sx, sy);
                if a > 0.0 {
                    self.blend(
                        x,
                        y,
                        Color { r: quantize(r), g: quantize(g), b: quantize(b), a: 255 },
                        a / 255.0,
                    );
                }
            }
        }
    }
}

// =============================================================
// Sampling
// =============================================================

/// Bilinear sample as f64 channels. Coordinates are in pixel space with
/// the origin at the first pixel's center; outside samples clamp to the
/// edge, with alpha fading out past the border.
#[must_use]
pub fn sample_bilinear(src: &RgbaImage, x: f64, y: f64) -> [f64; 4] {
    let w = i64::from(src.width());
    let h = i64::from(src.height());
    #[allow(clippy::cast_possible_truncation)]
    let x0 = x.floor() as i64;
    #[allow(clippy::cast_possible_truncation)]
    let y0 = y.floor() as i64;
    let fx = x - x.floor();
    let fy = y - y.floor();

    let fetch = |px: i64, py: i64| -> [f64; 4] {
        if px < 0 || py < 0 || px >= w || py >= h {
            // Clamp color, kill alpha: edges fade instead of smearing.
            let cx = px.clamp(0, w - 1);
            let cy = py.clamp(0, h - 1);
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let p = src.get_pixel(cx as u32, cy as u32);
            [f64::from(p[0]), f64::from(p[1]), f64::from(p[2]), 0.0]
        } else {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let p = src.get_pixel(px as u32, py as u32);
            [f64::from(p[0]), f64::from(p[1]), f64::from(p[2]), f64::from(p[3])]
        }
    };

    let c00 = fetch(x0, y0);
    let c10 = fetch(x0 + 1, y0);
    let c01 = fetch(x0, y0 + 1);
    let c11 = fetch(x0 + 1, y0 + 1);

    let mut out = [0.0; 4];
    for (i, o) in out.iter_mut().enumerate() {
        let top = c00[i] * (1.0 - fx) + c10[i] * fx;
        let bot = c01[i] * (1.0 - fx) + c11[i] * fx;
        *o = top * (1.0 - fy) + bot * fy;
    }
    out
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn quantize(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

// =============================================================
// Signed distances
// =============================================================

/// Distance from `p` to the edge of `rect` with the given corner radius;
/// negative inside. Shared with the image clip path.
pub(crate) fn rounded_rect_distance(p: Point, rect: &Rect, radius: f64) -> f64 {
    let r = radius.clamp(0.0, rect.width.min(rect.height) / 2.0);
    sd_round_rect(p, rect.center(), rect.width / 2.0, rect.height / 2.0, r)
}

fn sd_round_rect(p: Point, center: Point, half_w: f64, half_h: f64, radius: f64) -> f64 {
    let qx = (p.x - center.x).abs() - (half_w - radius);
    let qy = (p.y - center.y).abs() - (half_h - radius);
    let outside = qx.max(0.0).hypot(qy.max(0.0));
    outside + qx.max(qy).min(0.0) - radius
}

/// Gradient-normalized approximation; exact on the axes and close enough
/// elsewhere for single-pixel antialiasing.
fn sd_ellipse(p: Point, center: Point, a: f64, b: f64) -> f64 {
    if a <= 0.0 || b <= 0.0 {
        return f64::INFINITY;
    }
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    let k = (dx / a).hypot(dy / b);
    if k == 0.0 {
        return -a.min(b);
    }
    let grad = (dx / (a * a)).hypot(dy / (b * b));
    if grad == 0.0 { -a.min(b) } else { k * (k - 1.0) / grad }
}

fn sd_segment(p: Point, a: Point, b: Point) -> f64 {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let len_sq = abx * abx + aby * aby;
    if len_sq == 0.0 {
        return (p.x - a.x).hypot(p.y - a.y);
    }
    let t = (((p.x - a.x) * abx + (p.y - a.y) * aby) / len_sq).clamp(0.0, 1.0);
    (p.x - a.x - abx * t).hypot(p.y - a.y - aby * t)
}

/// Distance to a box running from `a` to `b` with half-width `half_w` and
/// flat ends.
fn sd_oriented_box(p: Point, a: Point, b: Point, half_w: f64) -> f64 {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let len = abx.hypot(aby);
    if len == 0.0 {
        return (p.x - a.x).hypot(p.y - a.y) - half_w;
    }
    let ux = abx / len;
    let uy = aby / len;
    let rel_x = (p.x - a.x) * ux + (p.y - a.y) * uy;
    let rel_y = -(p.x - a.x) * uy + (p.y - a.y) * ux;
    let qx = (rel_x - len / 2.0).abs() - len / 2.0;
    let qy = rel_y.abs() - half_w;
    qx.max(0.0).hypot(qy.max(0.0)) + qx.max(qy).min(0.0)
}

fn sd_polygon(p: Point, v: &[Point]) -> f64 {
    let n = v.len();
    let mut d = (p.x - v[0].x).powi(2) + (p.y - v[0].y).powi(2);
    let mut sign = 1.0;
    let mut j = n - 1;
    for i in 0..n {
        let ex = v[j].x - v[i].x;
        let ey = v[j].y - v[i].y;
        let wx = p.x - v[i].x;
        let wy = p.y - v[i].y;
        let ee = ex * ex + ey * ey;
        let t = if ee == 0.0 { 0.0 } else { ((wx * ex + wy * ey) / ee).clamp(0.0, 1.0) };
        let bx = wx - ex * t;
        let by = wy - ey * t;
        d = d.min(bx * bx + by * by);

        let c0 = p.y >= v[i].y;
        let c1 = p.y < v[j].y;
        let c2 = ex * wy > ey * wx;
        if (c0 && c1 && c2) || (!c0 && !c1 && !c2) {
            sign = -sign;
        }
        j = i;
    }
    sign * d.sqrt()
}

/// Coverage distance for a stroke band lying just inside a filled
/// boundary: negative within `[-width, 0]` of the outer distance `d`.
fn band_inside(d: f64, width: f64) -> f64 {
    d.max(-width - d)
}

fn polygon_bounds(vertices: &[Point]) -> Rect {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for v in vertices {
        min_x = min_x.min(v.x);
        min_y = min_y.min(v.y);
        max_x = max_x.max(v.x);
        max_y = max_y.max(v.y);
    }
    Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
}
