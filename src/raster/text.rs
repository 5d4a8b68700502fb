//! Text layout and glyph rasterization.
//!
//! Hosts register TTF/OTF faces per family name; anything without a
//! registered face renders through the built-in Spleen bitmap font scaled
//! to the requested size, so text output never depends on asset files.
//! Layout follows the box model of the element: padding, word wrap to the
//! content width, horizontal and vertical alignment, optional stroke
//! outline behind the fill, and optional circular-arc placement.

#[cfg(test)]
#[path = "text_test.rs"]
mod text_test;

use std::collections::HashMap;

use ab_glyph::{Font, FontArc, ScaleFont};
use spleen_font::{PSF2Font, FONT_12X24};

use crate::color::Color;
use crate::element::{CurveDirection, TextElement, TextStyle};
use crate::error::EngineError;
use crate::geom::{Point, Rect};
use crate::raster::canvas::Canvas;

/// Spleen 12x24 cell geometry.
const BITMAP_CELL_W: f64 = 12.0;
const BITMAP_CELL_H: f64 = 24.0;

/// Registered typefaces keyed by family name and boldness.
#[derive(Debug, Default)]
pub struct FontStore {
    faces: HashMap<(String, bool), FontArc>,
}

enum Face<'a> {
    Outline(&'a FontArc),
    Bitmap,
}

impl FontStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a TTF/OTF face for a family. `bold` registers the bold
    /// variant; weights ≥ 600 select it.
    pub fn register(
        &mut self,
        family: impl Into<String>,
        bold: bool,
        bytes: Vec<u8>,
    ) -> Result<(), EngineError> {
        let face = FontArc::try_from_vec(bytes)
            .map_err(|e| EngineError::FontLoad(e.to_string()))?;
        self.faces.insert((family.into().to_ascii_lowercase(), bold), face);
        Ok(())
    }

    #[must_use]
    pub fn has_face(&self, family: &str, bold: bool) -> bool {
        self.faces.contains_key(&(family.to_ascii_lowercase(), bold))
    }

    fn face_for(&self, style: &TextStyle) -> Face<'_> {
        let family = style.font_family.to_ascii_lowercase();
        let bold = style.is_bold();
        if let Some(f) = self.faces.get(&(family.clone(), bold)) {
            return Face::Outline(f);
        }
        // Bold request without a bold face falls back to the regular one.
        if let Some(f) = self.faces.get(&(family, false)) {
            return Face::Outline(f);
        }
        Face::Bitmap
    }

    // --- Metrics ---

    /// Advance width of a single character at the given pixel size.
    #[must_use]
    pub fn char_advance(&self, style: &TextStyle, ch: char, px_size: f64) -> f64 {
        let base = match self.face_for(style) {
            Face::Outline(font) => {
                let scaled = font.as_scaled(to_f32(px_size));
                f64::from(scaled.h_advance(font.glyph_id(ch)))
            }
            Face::Bitmap => BITMAP_CELL_W * (px_size / BITMAP_CELL_H),
        };
        base + style.letter_spacing.unwrap_or(0.0) * (px_size / style.font_size.max(1.0))
    }

    /// Measured width of a line at the given pixel size, letter spacing
    /// included between characters but not after the last one.
    #[must_use]
    pub fn measure_line(&self, style: &TextStyle, text: &str, px_size: f64) -> f64 {
        let mut width = 0.0;
        let mut count = 0usize;
        for ch in text.chars() {
            width += self.char_advance(style, ch, px_size);
            count += 1;
        }
        if count > 0 {
            width -= style.letter_spacing.unwrap_or(0.0) * (px_size / style.font_size.max(1.0));
        }
        width.max(0.0)
    }

    /// Wrap text to a maximum line width. Explicit newlines are kept;
    /// words that fit move down as whole units; words wider than the line
    /// are broken mid-word.
    #[must_use]
    pub fn wrap_text_lines(
        &self,
        style: &TextStyle,
        text: &str,
        px_size: f64,
        max_w: f64,
    ) -> Vec<String> {
        let mut out = Vec::new();
        for raw_line in text.lines() {
            let words: Vec<&str> = raw_line.split_whitespace().collect();
            if words.is_empty() {
                out.push(String::new());
                continue;
            }

            let mut current = String::new();
            for word in words {
                if current.is_empty() {
                    if self.measure_line(style, word, px_size) <= max_w {
                        current.push_str(word);
                    } else {
                        let mut chunks = self.break_long_word(style, word, px_size, max_w);
                        if let Some(last) = chunks.pop() {
                            out.extend(chunks);
                            current = last;
                        }
                    }
                    continue;
                }

                let candidate = format!("{current} {word}");
                if self.measure_line(style, &candidate, px_size) <= max_w {
                    current = candidate;
                } else {
                    out.push(std::mem::take(&mut current));
                    if self.measure_line(style, word, px_size) <= max_w {
                        current = word.to_owned();
                    } else {
                        let mut chunks = self.break_long_word(style, word, px_size, max_w);
                        if let Some(last) = chunks.pop() {
                            out.extend(chunks);
                            current = last;
                        }
                    }
                }
            }
            out.push(current);
        }
        if out.is_empty() {
            out.push(String::new());
        }
        out
    }

    fn break_long_word(&self, style: &TextStyle, word: &str, px_size: f64, max_w: f64) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();
        for ch in word.chars() {
            let mut candidate = current.clone();
            candidate.push(ch);
            if !current.is_empty() && self.measure_line(style, &candidate, px_size) > max_w {
                chunks.push(std::mem::take(&mut current));
                current.push(ch);
            } else {
                current = candidate;
            }
        }
        if !current.is_empty() {
            chunks.push(current);
        }
        if chunks.is_empty() {
            chunks.push(String::new());
        }
        chunks
    }

    // --- Drawing ---

    /// Paint a text element into the canvas. `scale` converts template
    /// units to device pixels; the element's rotation is applied about the
    /// box center.
    pub fn draw_element(&self, canvas: &mut Canvas, el: &TextElement, scale: f64) {
        if el.width <= 0.0 || el.height <= 0.0 {
            return;
        }
        if el.rotation == 0.0 {
            let origin = Point::new(el.x * scale, el.y * scale);
            self.draw_box(canvas, origin, el, scale);
            return;
        }

        // Rotated text renders upright into a scratch surface first, with
        // bleed for stroke and curve overshoot, then blits through the
        // rotated sampler.
        let bleed = (el.style.font_size * scale).ceil() + 4.0;
        let w = (el.width * scale + bleed * 2.0).ceil();
        let h = (el.height * scale + bleed * 2.0).ceil();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let mut scratch = Canvas::new(w as u32, h as u32);
        self.draw_box(&mut scratch, Point::new(bleed, bleed), el, scale);

        let center = Point::new(
            (el.x + el.width / 2.0) * scale,
            (el.y + el.height / 2.0) * scale,
        );
        canvas.blit_rotated(&scratch, center, el.rotation);
    }

    /// Paint the unrotated box at `origin` (device px).
    fn draw_box(&self, canvas: &mut Canvas, origin: Point, el: &TextElement, scale: f64) {
        let style = &el.style;
        let px_size = style.font_size * scale;
        let box_rect = Rect::new(origin.x, origin.y, el.width * scale, el.height * scale);

        if let Some(bg) = &style.background {
            let color = Color::parse_or(bg, Color::TRANSPARENT);
            let radius = style.border_radius.unwrap_or(0.0) * scale;
            canvas.fill_rounded_rect(&box_rect, radius, 0.0, color);
        }

        let pad = style.padding.unwrap_or_default();
        let content = Rect::new(
            box_rect.x + pad.left * scale,
            box_rect.y + pad.top * scale,
            (box_rect.width - (pad.left + pad.right) * scale).max(0.0),
            (box_rect.height - (pad.top + pad.bottom) * scale).max(0.0),
        );
        if content.width <= 0.0 || content.height <= 0.0 {
            return;
        }

        let color = Color::parse_or(&style.color, Color::BLACK);

        if let Some(curve) = style.curve {
            self.draw_curved(canvas, &content, &el.content, style, px_size, scale, color, curve.radius * scale, curve.direction);
            return;
        }

        let line_advance = px_size * style.line_height;
        let lines = self.wrap_text_lines(style, &el.content, px_size, content.width);

        #[allow(clippy::cast_precision_loss)]
        let total_h = line_advance * lines.len() as f64;
        let start_y = match style.vertical_align.unwrap_or_default() {
            crate::element::VerticalAlign::Top => content.y,
            crate::element::VerticalAlign::Middle => content.y + (content.height - total_h) / 2.0,
            crate::element::VerticalAlign::Bottom => content.y + content.height - total_h,
        };

        for (idx, line) in lines.iter().enumerate() {
            let line_w = self.measure_line(style, line, px_size);
            let x = match style.text_align {
                crate::element::TextAlign::Left => content.x,
                crate::element::TextAlign::Center => content.x + (content.width - line_w) / 2.0,
                crate::element::TextAlign::Right => content.x + content.width - line_w,
            };
            #[allow(clippy::cast_precision_loss)]
            let y_top = start_y + idx as f64 * line_advance + (line_advance - px_size) / 2.0;
            self.draw_line_with_stroke(canvas, Point::new(x, y_top), line, style, px_size, scale, color);
        }
    }

    /// Draw a line of text, stroke outline first so the fill sits on top.
    #[allow(clippy::too_many_arguments)]
    fn draw_line_with_stroke(
        &self,
        canvas: &mut Canvas,
        top_left: Point,
        text: &str,
        style: &TextStyle,
        px_size: f64,
        scale: f64,
        fill: Color,
    ) {
        if let Some(stroke) = &style.stroke {
            let sw = stroke.width * scale;
            if sw > 0.0 {
                let stroke_color = Color::parse_or(&stroke.color, Color::BLACK);
                // Eight ring offsets approximate a dilation by the stroke
                // width.
                for step in 0..8 {
                    let angle = f64::from(step) * std::f64::consts::FRAC_PI_4;
                    let offset = Point::new(
                        top_left.x + sw * angle.cos(),
                        top_left.y + sw * angle.sin(),
                    );
                    self.draw_line_text(canvas, offset, text, style, px_size, stroke_color);
                }
            }
        }
        self.draw_line_text(canvas, top_left, text, style, px_size, fill);
    }

    /// Rasterize one line with its top-left corner at `top_left`.
    fn draw_line_text(
        &self,
        canvas: &mut Canvas,
        top_left: Point,
        text: &str,
        style: &TextStyle,
        px_size: f64,
        color: Color,
    ) {
        match self.face_for(style) {
            Face::Outline(font) => {
                let scaled = font.as_scaled(to_f32(px_size));
                let baseline = top_left.y + f64::from(scaled.ascent());
                let mut caret = top_left.x;
                for ch in text.chars() {
                    let glyph_id = font.glyph_id(ch);
                    let glyph = glyph_id.with_scale_and_position(
                        to_f32(px_size),
                        ab_glyph::point(to_f32(caret), to_f32(baseline)),
                    );
                    if let Some(outlined) = font.outline_glyph(glyph) {
                        let bounds = outlined.px_bounds();
                        outlined.draw(|px, py, coverage| {
                            let x = i64::from(px) + f64_to_i64(f64::from(bounds.min.x));
                            let y = i64::from(py) + f64_to_i64(f64::from(bounds.min.y));
                            canvas.blend(x, y, color, f64::from(coverage));
                        });
                    }
                    caret += self.char_advance(style, ch, px_size);
                }
            }
            Face::Bitmap => {
                let mut caret = top_left.x;
                for ch in text.chars() {
                    self.draw_bitmap_glyph(canvas, Point::new(caret, top_left.y), ch, px_size, color);
                    caret += self.char_advance(style, ch, px_size);
                }
            }
        }
    }

    /// Nearest-neighbor scale of a Spleen glyph cell to the target size.
    fn draw_bitmap_glyph(&self, canvas: &mut Canvas, top_left: Point, ch: char, px_size: f64, color: Color) {
        let Ok(mut font) = PSF2Font::new(FONT_12X24) else {
            return;
        };
        let utf8 = ch.to_string();
        let Some(glyph) = font.glyph_for_utf8(utf8.as_bytes()) else {
            return;
        };
        // Collect the 12x24 cell once, then walk destination pixels.
        let mut cell = [false; 12 * 24];
        for (row_y, row) in glyph.enumerate() {
            for (col_x, on) in row.enumerate() {
                if row_y < 24 && col_x < 12 {
                    cell[row_y * 12 + col_x] = on;
                }
            }
        }
        let factor = px_size / BITMAP_CELL_H;
        let dst_w = (BITMAP_CELL_W * factor).round().max(1.0);
        let dst_h = px_size.round().max(1.0);
        #[allow(clippy::cast_possible_truncation)]
        let (dw, dh) = (dst_w as i64, dst_h as i64);
        for dy in 0..dh {
            for dx in 0..dw {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
                let sx = ((dx as f64 / dst_w) * BITMAP_CELL_W) as usize;
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
                let sy = ((dy as f64 / dst_h) * BITMAP_CELL_H) as usize;
                if sx < 12 && sy < 24 && cell[sy * 12 + sx] {
                    canvas.blend(
                        f64_to_i64(top_left.x) + dx,
                        f64_to_i64(top_left.y) + dy,
                        color,
                        1.0,
                    );
                }
            }
        }
    }

    /// Place characters one by one along a circular arc centered under (or
    /// over) the content box, each rotated to the arc tangent.
    #[allow(clippy::too_many_arguments)]
    fn draw_curved(
        &self,
        canvas: &mut Canvas,
        content: &Rect,
        text: &str,
        style: &TextStyle,
        px_size: f64,
        scale: f64,
        color: Color,
        radius: f64,
        direction: CurveDirection,
    ) {
        if radius <= 0.0 {
            return;
        }
        let single_line: String = text.lines().collect::<Vec<_>>().join(" ");
        let total_w = self.measure_line(style, &single_line, px_size);
        let center = content.center();
        let arc_center = match direction {
            CurveDirection::Up => Point::new(center.x, center.y + radius),
            CurveDirection::Down => Point::new(center.x, center.y - radius),
        };

        let cell_w = (px_size * 1.5).ceil() + 4.0;
        let cell_h = (px_size * 1.5).ceil() + 4.0;
        let mut advance_so_far = 0.0;
        for ch in single_line.chars() {
            let ch_w = self.char_advance(style, ch, px_size);
            let arc_pos = advance_so_far + ch_w / 2.0 - total_w / 2.0;
            advance_so_far += ch_w;
            let theta = arc_pos / radius;

            let (pos, rotation_deg) = match direction {
                CurveDirection::Up => (
                    Point::new(
                        arc_center.x + radius * theta.sin(),
                        arc_center.y - radius * theta.cos(),
                    ),
                    theta.to_degrees(),
                ),
                CurveDirection::Down => (
                    Point::new(
                        arc_center.x + radius * theta.sin(),
                        arc_center.y + radius * theta.cos(),
                    ),
                    -theta.to_degrees(),
                ),
            };

            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let mut scratch = Canvas::new(cell_w as u32, cell_h as u32);
            let ch_text = ch.to_string();
            let top_left = Point::new((cell_w - ch_w) / 2.0, (cell_h - px_size) / 2.0);
            let mut one_char_style = style.clone();
            one_char_style.curve = None;
            self.draw_line_with_stroke(&mut scratch, top_left, &ch_text, &one_char_style, px_size, scale, color);
            canvas.blit_rotated(&scratch, pos, rotation_deg);
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn to_f32(v: f64) -> f32 {
    v as f32
}

#[allow(clippy::cast_possible_truncation)]
fn f64_to_i64(v: f64) -> i64 {
    v.floor() as i64
}
