//! Alignment guide engine: snap-line detection, snap correction, and canvas
//! clamping.
//!
//! Guides are transient: recomputed on every active-element change from the
//! current model snapshot, never stored. Detection compares the active
//! element's center and edges against the canvas center and every *other*
//! element; thresholds are divided by the view zoom so sensitivity feels
//! constant on screen. Snap correction uses a looser breakaway radius than
//! detection so a dragged element sticks to a guide until pulled clearly
//! free, which prevents jitter at the snap boundary.

#[cfg(test)]
#[path = "guides_test.rs"]
mod guides_test;

use crate::consts::{SNAP_BREAKAWAY_FACTOR, SNAP_THRESHOLD_PX, TEXT_WIDTH_FACTOR};
use crate::element::{ElementId, ElementRef};
use crate::geom::{Point, Rect};
use crate::template::Template;

/// The kind of alignment a guide describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideKind {
    /// Active element's center x matches the canvas center.
    CenterX,
    /// Active element's center y matches the canvas center.
    CenterY,
    /// Left edges aligned with another element.
    AlignLeft,
    /// Right edges aligned with another element.
    AlignRight,
    /// Top edges aligned with another element.
    AlignTop,
    /// Bottom edges aligned with another element.
    AlignBottom,
    /// Two elements' centers aligned on the x axis.
    CenterToCenterX,
    /// Two elements' centers aligned on the y axis.
    CenterToCenterY,
}

impl GuideKind {
    /// Whether this guide constrains the x axis (vertical guide line).
    #[must_use]
    pub fn is_vertical(self) -> bool {
        matches!(
            self,
            Self::CenterX | Self::AlignLeft | Self::AlignRight | Self::CenterToCenterX
        )
    }
}

/// A transient alignment line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Guide {
    pub kind: GuideKind,
    /// Coordinate of the line on its constrained axis.
    pub position: f64,
    /// For center-to-center guides, the visual span along the line between
    /// the two centers.
    pub span: Option<(f64, f64)>,
}

/// Effective bounding box used for guide math.
///
/// Text elements persisted without a measured box fall back to a rough
/// estimate from the content: `max_line_len × font_size × 0.6` wide,
/// `line_count × font_size × line_height` tall. The heuristic is kept for
/// fidelity with existing saved layouts.
#[must_use]
pub fn effective_bounds(el: &ElementRef<'_>) -> Rect {
    let bounds = el.bounds();
    if let ElementRef::Text(text) = el {
        if bounds.width <= 0.0 || bounds.height <= 0.0 {
            let lines: Vec<&str> = if text.content.is_empty() {
                vec![""]
            } else {
                text.content.lines().collect()
            };
            let max_len = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
            let width = max_len as f64 * text.style.font_size * TEXT_WIDTH_FACTOR;
            let height = lines.len() as f64 * text.style.font_size * text.style.line_height;
            return Rect::new(bounds.x, bounds.y, width, height);
        }
    }
    bounds
}

/// Compute all guides matching the active element's candidate bounds.
///
/// `scale` is the current view zoom; the 10px detection threshold is divided
/// by it so the on-screen feel is zoom-independent.
#[must_use]
pub fn compute_guides(template: &Template, active: &ElementId, bounds: &Rect, scale: f64) -> Vec<Guide> {
    let threshold = SNAP_THRESHOLD_PX / scale.max(f64::MIN_POSITIVE);
    let mut guides = Vec::new();

    let center = bounds.center();
    let canvas_cx = template.width / 2.0;
    let canvas_cy = template.height / 2.0;

    if (center.x - canvas_cx).abs() <= threshold {
        guides.push(Guide { kind: GuideKind::CenterX, position: canvas_cx, span: None });
    }
    if (center.y - canvas_cy).abs() <= threshold {
        guides.push(Guide { kind: GuideKind::CenterY, position: canvas_cy, span: None });
    }

    for other in template.all_elements() {
        if other.id() == *active {
            continue;
        }
        let ob = effective_bounds(&other);
        let oc = ob.center();

        if (bounds.x - ob.x).abs() <= threshold {
            guides.push(Guide { kind: GuideKind::AlignLeft, position: ob.x, span: None });
        }
        if (bounds.right() - ob.right()).abs() <= threshold {
            guides.push(Guide { kind: GuideKind::AlignRight, position: ob.right(), span: None });
        }
        if (bounds.y - ob.y).abs() <= threshold {
            guides.push(Guide { kind: GuideKind::AlignTop, position: ob.y, span: None });
        }
        if (bounds.bottom() - ob.bottom()).abs() <= threshold {
            guides.push(Guide { kind: GuideKind::AlignBottom, position: ob.bottom(), span: None });
        }
        if (center.x - oc.x).abs() <= threshold {
            guides.push(Guide {
                kind: GuideKind::CenterToCenterX,
                position: oc.x,
                span: Some((center.y.min(oc.y), center.y.max(oc.y))),
            });
        }
        if (center.y - oc.y).abs() <= threshold {
            guides.push(Guide {
                kind: GuideKind::CenterToCenterY,
                position: oc.y,
                span: Some((center.x.min(oc.x), center.x.max(oc.x))),
            });
        }
    }

    guides
}

/// Correct a candidate top-left position toward the nearest matching guide.
///
/// Uses the breakaway radius (1.5× detection) so an element already stuck to
/// a guide stays stuck until moved clearly away. Each axis snaps
/// independently to its nearest target.
#[must_use]
pub fn snap_position(
    template: &Template,
    active: &ElementId,
    pos: Point,
    width: f64,
    height: f64,
    scale: f64,
) -> Point {
    let breakaway = SNAP_THRESHOLD_PX / scale.max(f64::MIN_POSITIVE) * SNAP_BREAKAWAY_FACTOR;

    let mut x_targets: Vec<f64> = vec![template.width / 2.0 - width / 2.0];
    let mut y_targets: Vec<f64> = vec![template.height / 2.0 - height / 2.0];

    for other in template.all_elements() {
        if other.id() == *active {
            continue;
        }
        let ob = effective_bounds(&other);
        let oc = ob.center();
        x_targets.push(ob.x); // left-to-left
        x_targets.push(ob.right() - width); // right-to-right
        x_targets.push(oc.x - width / 2.0); // center-to-center
        y_targets.push(ob.y);
        y_targets.push(ob.bottom() - height);
        y_targets.push(oc.y - height / 2.0);
    }

    let snap_axis = |value: f64, targets: &[f64]| -> f64 {
        let mut best = value;
        let mut best_dist = breakaway;
        for &t in targets {
            let d = (value - t).abs();
            if d <= best_dist {
                best = t;
                best_dist = d;
            }
        }
        best
    };

    Point::new(snap_axis(pos.x, &x_targets), snap_axis(pos.y, &y_targets))
}

/// Clamp a top-left position so the `width`×`height` bounding box stays
/// fully inside the template canvas.
#[must_use]
pub fn constrain_to_canvas(pos: Point, width: f64, height: f64, template: &Template) -> Point {
    let max_x = (template.width - width).max(0.0);
    let max_y = (template.height - height).max(0.0);
    Point::new(pos.x.clamp(0.0, max_x), pos.y.clamp(0.0, max_y))
}
