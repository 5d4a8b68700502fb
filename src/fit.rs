//! Crop/fit math for image elements.
//!
//! An image element's box and its natural bitmap rarely share an aspect
//! ratio; `scale_x`/`scale_y`/`image_offset` describe how the bitmap maps
//! onto the box. This module computes that state for the standard fit modes,
//! runs the interactive crop session, and rescales existing fit state when
//! the box itself is resized so the visible crop never jumps.

#[cfg(test)]
#[path = "fit_test.rs"]
mod fit_test;

use serde::{Deserialize, Serialize};

use crate::consts::MIN_ELEMENT_SIZE;
use crate::element::ImageElement;
use crate::geom::{Point, Rect};

/// How a bitmap's natural size maps onto its element box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FitMode {
    /// Scale up until the box is covered; overflow is centered and cropped.
    Cover,
    /// Scale down until the whole bitmap fits; remainder is letterboxed.
    Contain,
    /// Stretch each axis independently; may distort.
    Fill,
    /// Lock scale to the width axis, center vertically.
    FitWidth,
    /// Lock scale to the height axis, center horizontally.
    FitHeight,
}

/// Computed fit state, ready to store on an [`ImageElement`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fit {
    pub scale_x: f64,
    pub scale_y: f64,
    pub offset: Point,
}

impl Fit {
    const IDENTITY: Fit = Fit { scale_x: 1.0, scale_y: 1.0, offset: Point { x: 0.0, y: 0.0 } };

    /// Write this fit state onto an image element.
    pub fn apply_to(&self, el: &mut ImageElement) {
        el.scale_x = self.scale_x;
        el.scale_y = self.scale_y;
        el.image_offset = self.offset;
    }
}

/// Compute offset/scale so a `natural_w`×`natural_h` bitmap fills a
/// `box_w`×`box_h` box under the given fit mode.
#[must_use]
pub fn compute_fit(mode: FitMode, box_w: f64, box_h: f64, natural_w: f64, natural_h: f64) -> Fit {
    if natural_w <= 0.0 || natural_h <= 0.0 || box_w <= 0.0 || box_h <= 0.0 {
        return Fit::IDENTITY;
    }
    let sx = box_w / natural_w;
    let sy = box_h / natural_h;
    match mode {
        FitMode::Cover => centered(sx.max(sy), box_w, box_h, natural_w, natural_h),
        FitMode::Contain => centered(sx.min(sy), box_w, box_h, natural_w, natural_h),
        FitMode::Fill => Fit { scale_x: sx, scale_y: sy, offset: Point::default() },
        FitMode::FitWidth => centered(sx, box_w, box_h, natural_w, natural_h),
        FitMode::FitHeight => centered(sy, box_w, box_h, natural_w, natural_h),
    }
}

fn centered(scale: f64, box_w: f64, box_h: f64, natural_w: f64, natural_h: f64) -> Fit {
    Fit {
        scale_x: scale,
        scale_y: scale,
        offset: Point::new((box_w - natural_w * scale) / 2.0, (box_h - natural_h * scale) / 2.0),
    }
}

/// Proportionally rescale existing fit state when the element box is
/// resized, axis by axis.
///
/// Edge resizes pass the changed axis's ratio and `1.0` for the other;
/// corner resizes pass both. Scaling the offset with the scale keeps the
/// visible crop region fixed relative to the box.
pub fn rescale_axes(el: &mut ImageElement, ratio_x: f64, ratio_y: f64) {
    if ratio_x.is_finite() && ratio_x > 0.0 {
        el.scale_x *= ratio_x;
        el.image_offset.x *= ratio_x;
    }
    if ratio_y.is_finite() && ratio_y > 0.0 {
        el.scale_y *= ratio_y;
        el.image_offset.y *= ratio_y;
    }
}

/// Which corner of the crop rectangle is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropCorner {
    Nw,
    Ne,
    Sw,
    Se,
}

/// Interactive crop state: a rectangle in the natural bitmap's own pixel
/// space, plus the aspect ratio captured when crop mode was entered.
///
/// Transient state, never persisted on the element; applying it collapses back
/// into `scale_x`/`scale_y`/`image_offset`.
#[derive(Debug, Clone, PartialEq)]
pub struct CropSession {
    pub region: Rect,
    natural_w: f64,
    natural_h: f64,
    aspect: f64,
}

impl CropSession {
    /// Start a session covering the full bitmap.
    #[must_use]
    pub fn full(natural_w: f64, natural_h: f64) -> Self {
        let region = Rect::new(0.0, 0.0, natural_w, natural_h);
        Self { aspect: region.width / region.height.max(f64::MIN_POSITIVE), region, natural_w, natural_h }
    }

    /// Start a session from an element's current fit state, so the initial
    /// crop rectangle is exactly the portion of the bitmap visible in the
    /// box.
    #[must_use]
    pub fn from_element(el: &ImageElement, natural_w: f64, natural_h: f64) -> Self {
        if el.scale_x <= 0.0 || el.scale_y <= 0.0 {
            return Self::full(natural_w, natural_h);
        }
        let x = (-el.image_offset.x / el.scale_x).clamp(0.0, natural_w);
        let y = (-el.image_offset.y / el.scale_y).clamp(0.0, natural_h);
        let w = (el.width / el.scale_x).min(natural_w - x);
        let h = (el.height / el.scale_y).min(natural_h - y);
        if w <= 0.0 || h <= 0.0 {
            return Self::full(natural_w, natural_h);
        }
        let region = Rect::new(x, y, w, h);
        Self { aspect: region.width / region.height.max(f64::MIN_POSITIVE), region, natural_w, natural_h }
    }

    /// Translate the crop rectangle, clamped to the bitmap bounds.
    pub fn drag_body(&mut self, dx: f64, dy: f64) {
        let max_x = (self.natural_w - self.region.width).max(0.0);
        let max_y = (self.natural_h - self.region.height).max(0.0);
        self.region.x = (self.region.x + dx).clamp(0.0, max_x);
        self.region.y = (self.region.y + dy).clamp(0.0, max_y);
    }

    /// Resize the crop rectangle from one corner, preserving the aspect
    /// ratio captured at session start. The opposite corner stays fixed;
    /// width drives and the vertical change follows from the locked aspect.
    pub fn drag_corner(&mut self, corner: CropCorner, dx: f64, _dy: f64) {
        let r = self.region;

        let proposed_w = match corner {
            CropCorner::Ne | CropCorner::Se => r.width + dx,
            CropCorner::Nw | CropCorner::Sw => r.width - dx,
        };

        let mut w = proposed_w.max(MIN_ELEMENT_SIZE);
        let mut h = w / self.aspect;

        // Clamp against the fixed corner's room inside the bitmap.
        let (room_w, room_h) = match corner {
            CropCorner::Se => (self.natural_w - r.x, self.natural_h - r.y),
            CropCorner::Sw => (r.right(), self.natural_h - r.y),
            CropCorner::Ne => (self.natural_w - r.x, r.bottom()),
            CropCorner::Nw => (r.right(), r.bottom()),
        };
        if w > room_w {
            w = room_w;
            h = w / self.aspect;
        }
        if h > room_h {
            h = room_h;
            w = h * self.aspect;
        }

        // Anchor the opposite corner.
        let (x, y) = match corner {
            CropCorner::Se => (r.x, r.y),
            CropCorner::Sw => (r.right() - w, r.y),
            CropCorner::Ne => (r.x, r.bottom() - h),
            CropCorner::Nw => (r.right() - w, r.bottom() - h),
        };
        self.region = Rect::new(x, y, w, h);
    }

    /// Collapse the crop region into fit state so the cropped portion
    /// exactly fills the box, centered when one axis has slack.
    #[must_use]
    pub fn apply(&self, box_w: f64, box_h: f64) -> Fit {
        if self.region.width <= 0.0 || self.region.height <= 0.0 {
            return Fit::IDENTITY;
        }
        let scale = (box_w / self.region.width).min(box_h / self.region.height);
        let offset = Point::new(
            -self.region.x * scale + (box_w - self.region.width * scale) / 2.0,
            -self.region.y * scale + (box_h - self.region.height * scale) / 2.0,
        );
        Fit { scale_x: scale, scale_y: scale, offset }
    }
}
