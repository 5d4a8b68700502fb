//! Transform controller: the pointer-gesture state machine.
//!
//! Exactly one session (drag, resize, rotate, endpoint drag, or crop) is
//! active at a time, scoped to one element. Each `Gesture` variant carries
//! only the context that gesture needs; transitions happen solely on
//! pointer-down (`begin_*`), pointer-move, and pointer-up. Every successful
//! update writes through to the template immediately; the compositor
//! repaints from the model, so there is no batching layer.
//!
//! Pointer positions arrive in screen space and are divided by the current
//! zoom before any template-space math.

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use serde::{Deserialize, Serialize};

use crate::consts::{MIN_ELEMENT_SIZE, MIN_TEXT_HEIGHT, MIN_TEXT_WIDTH};
use crate::element::ElementId;
use crate::fit::{self, CropCorner, CropSession};
use crate::geom::{rotate_delta, Point, Rect};
use crate::guides::{self, Guide};
use crate::template::Template;

/// One of the eight resize grab points on a selected element's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl Handle {
    /// Whether dragging this handle changes the width.
    #[must_use]
    pub fn affects_x(self) -> bool {
        !matches!(self, Self::N | Self::S)
    }

    /// Whether dragging this handle changes the height.
    #[must_use]
    pub fn affects_y(self) -> bool {
        !matches!(self, Self::E | Self::W)
    }

    /// Whether this handle touches the left edge (position must shift so
    /// the right edge stays fixed).
    #[must_use]
    pub fn touches_west(self) -> bool {
        matches!(self, Self::W | Self::Nw | Self::Sw)
    }

    /// Whether this handle touches the top edge.
    #[must_use]
    pub fn touches_north(self) -> bool {
        matches!(self, Self::N | Self::Nw | Self::Ne)
    }

    #[must_use]
    pub fn is_corner(self) -> bool {
        matches!(self, Self::Ne | Self::Se | Self::Sw | Self::Nw)
    }
}

/// Which end of a line element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnd {
    Start,
    End,
}

/// Which part of the crop rectangle a crop gesture is holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropPart {
    Body,
    Corner(CropCorner),
}

/// The active gesture, carrying only the context it needs.
#[derive(Debug, Clone)]
pub enum Gesture {
    /// No session in progress; waiting for the next pointer-down.
    Idle,
    /// Moving an element; `grab_offset` is the pointer-to-origin offset
    /// captured at drag start so the element doesn't jump under the cursor.
    Dragging { id: ElementId, grab_offset: Point },
    /// Resizing via one of the eight handles. `orig` is the box at
    /// pointer-down; deltas are measured against `start_pointer` so the
    /// math never compounds across moves.
    Resizing {
        id: ElementId,
        handle: Handle,
        start_pointer: Point,
        orig: Rect,
        orig_fit: (f64, f64, Point),
        keep_aspect: bool,
    },
    /// Rotating about the element center.
    Rotating { id: ElementId, center: Point },
    /// Repositioning one endpoint of a line element.
    DraggingEndpoint { id: ElementId, end: LineEnd },
    /// Adjusting an image's crop rectangle in natural-bitmap space.
    Cropping {
        id: ElementId,
        part: CropPart,
        session: CropSession,
        last_pointer: Point,
        /// Template-px-per-natural-px factors per axis at session start,
        /// used to map pointer deltas into bitmap space.
        display_scale: (f64, f64),
    },
}

impl Default for Gesture {
    fn default() -> Self {
        Self::Idle
    }
}

/// Drives pointer gestures against a template.
#[derive(Debug)]
pub struct TransformController {
    gesture: Gesture,
    zoom: f64,
}

impl Default for TransformController {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformController {
    #[must_use]
    pub fn new() -> Self {
        Self { gesture: Gesture::Idle, zoom: 1.0 }
    }

    /// Current view zoom used to convert screen deltas to template space.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() && zoom > 0.0 {
            self.zoom = zoom;
        }
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    #[must_use]
    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self.gesture, Gesture::Idle)
    }

    /// Convert a screen-space pointer position to template space.
    #[must_use]
    pub fn to_template(&self, screen: Point) -> Point {
        screen.scaled(1.0 / self.zoom)
    }

    // --- Session starts ---
    //
    // Starting a new session replaces any lingering one; pointer-up is the
    // only other way out.

    /// Begin dragging an element. Returns false if the element is missing
    /// or not draggable.
    pub fn begin_drag(&mut self, template: &Template, id: ElementId, pointer_screen: Point) -> bool {
        let Some(el) = template.get(&id) else {
            return false;
        };
        if !el.draggable() {
            return false;
        }
        let p = self.to_template(pointer_screen);
        let b = el.bounds();
        self.gesture = Gesture::Dragging { id, grab_offset: Point::new(p.x - b.x, p.y - b.y) };
        tracing::debug!(element = %id, "drag session started");
        true
    }

    /// Begin resizing an element via `handle`. Image elements keep their
    /// aspect ratio on corner handles unless `aspect_override` is held.
    pub fn begin_resize(
        &mut self,
        template: &Template,
        id: ElementId,
        handle: Handle,
        pointer_screen: Point,
        aspect_override: bool,
    ) -> bool {
        let Some(el) = template.get(&id) else {
            return false;
        };
        if matches!(el, crate::element::ElementRef::Line(_)) {
            return false;
        }
        let keep_aspect = matches!(el, crate::element::ElementRef::Image(_)) && !aspect_override;
        let orig_fit = match el {
            crate::element::ElementRef::Image(img) => (img.scale_x, img.scale_y, img.image_offset),
            _ => (1.0, 1.0, Point::default()),
        };
        self.gesture = Gesture::Resizing {
            id,
            handle,
            start_pointer: self.to_template(pointer_screen),
            orig: el.bounds(),
            orig_fit,
            keep_aspect,
        };
        tracing::debug!(element = %id, ?handle, "resize session started");
        true
    }

    /// Begin rotating an element about its center.
    pub fn begin_rotate(&mut self, template: &Template, id: ElementId) -> bool {
        let Some(el) = template.get(&id) else {
            return false;
        };
        if matches!(el, crate::element::ElementRef::Line(_)) {
            return false;
        }
        self.gesture = Gesture::Rotating { id, center: el.bounds().center() };
        true
    }

    /// Begin dragging one endpoint of a line element.
    pub fn begin_endpoint_drag(&mut self, template: &Template, id: ElementId, end: LineEnd) -> bool {
        if !matches!(template.get(&id), Some(crate::element::ElementRef::Line(_))) {
            return false;
        }
        self.gesture = Gesture::DraggingEndpoint { id, end };
        true
    }

    /// Enter crop mode on an image element. The initial crop rectangle is
    /// the portion of the bitmap currently visible in the box.
    pub fn begin_crop(
        &mut self,
        template: &Template,
        id: ElementId,
        part: CropPart,
        pointer_screen: Point,
        natural_w: f64,
        natural_h: f64,
    ) -> bool {
        let Some(crate::element::ElementRef::Image(img)) = template.get(&id) else {
            return false;
        };
        let session = CropSession::from_element(img, natural_w, natural_h);
        let display_scale = (
            if img.scale_x > 0.0 { img.scale_x } else { 1.0 },
            if img.scale_y > 0.0 { img.scale_y } else { 1.0 },
        );
        self.gesture = Gesture::Cropping {
            id,
            part,
            session,
            last_pointer: self.to_template(pointer_screen),
            display_scale,
        };
        true
    }

    // --- Pointer-move ---

    /// Apply a pointer-move to the active session, writing the result to
    /// the template. Returns the guides matching the element's new bounds
    /// (non-empty only while dragging).
    pub fn pointer_move(&mut self, template: &mut Template, pointer_screen: Point) -> Vec<Guide> {
        let p = self.to_template(pointer_screen);
        match self.gesture.clone() {
            Gesture::Idle => Vec::new(),
            Gesture::Dragging { id, grab_offset } => self.move_drag(template, id, grab_offset, p),
            Gesture::Resizing { id, handle, start_pointer, orig, orig_fit, keep_aspect } => {
                self.move_resize(template, id, handle, start_pointer, orig, orig_fit, keep_aspect, p);
                Vec::new()
            }
            Gesture::Rotating { id, center } => {
                let angle = (p.y - center.y).atan2(p.x - center.x).to_degrees();
                if let Some(mut el) = template.get_mut(&id) {
                    el.set_rotation(angle);
                }
                Vec::new()
            }
            Gesture::DraggingEndpoint { id, end } => {
                let (tw, th) = (template.width, template.height);
                if let Some(line) = template.line_mut(&id) {
                    let clamped = Point::new(p.x.clamp(0.0, tw), p.y.clamp(0.0, th));
                    match end {
                        LineEnd::Start => line.start = clamped,
                        LineEnd::End => line.end = clamped,
                    }
                }
                Vec::new()
            }
            Gesture::Cropping { id, part, mut session, last_pointer, display_scale } => {
                let dx = (p.x - last_pointer.x) / display_scale.0;
                let dy = (p.y - last_pointer.y) / display_scale.1;
                match part {
                    CropPart::Body => session.drag_body(dx, dy),
                    CropPart::Corner(corner) => session.drag_corner(corner, dx, dy),
                }
                self.gesture = Gesture::Cropping { id, part, session, last_pointer: p, display_scale };
                Vec::new()
            }
        }
    }

    fn move_drag(&self, template: &mut Template, id: ElementId, grab_offset: Point, p: Point) -> Vec<Guide> {
        let Some(el) = template.get(&id) else {
            return Vec::new();
        };
        let b = el.bounds();
        let candidate = Point::new(p.x - grab_offset.x, p.y - grab_offset.y);
        let snapped = guides::snap_position(template, &id, candidate, b.width, b.height, self.zoom);
        let clamped = guides::constrain_to_canvas(snapped, b.width, b.height, template);

        let new_bounds = Rect::new(clamped.x, clamped.y, b.width, b.height);
        let emitted = guides::compute_guides(template, &id, &new_bounds, self.zoom);

        if let Some(mut el) = template.get_mut(&id) {
            el.set_position(clamped);
        }
        emitted
    }

    #[allow(clippy::too_many_arguments)]
    fn move_resize(
        &self,
        template: &mut Template,
        id: ElementId,
        handle: Handle,
        start_pointer: Point,
        orig: Rect,
        orig_fit: (f64, f64, Point),
        keep_aspect: bool,
        p: Point,
    ) {
        let Some(el) = template.get(&id) else {
            return;
        };
        let rotation = el.rotation();
        let is_text = matches!(el, crate::element::ElementRef::Text(_));

        // Handles live in the element's pre-rotation space; project the
        // screen delta into local axes.
        let (ldx, ldy) = rotate_delta(rotation, p.x - start_pointer.x, p.y - start_pointer.y);

        let mut width = orig.width;
        let mut height = orig.height;
        if handle.affects_x() {
            width = if handle.touches_west() { orig.width - ldx } else { orig.width + ldx };
        }
        if handle.affects_y() {
            height = if handle.touches_north() { orig.height - ldy } else { orig.height + ldy };
        }

        // Corner handles on aspect-locked elements: the axis with the larger
        // magnitude of change drives the other.
        if keep_aspect && handle.is_corner() && orig.width > 0.0 && orig.height > 0.0 {
            let aspect = orig.width / orig.height;
            if (width - orig.width).abs() >= (height - orig.height).abs() {
                height = width / aspect;
            } else {
                width = height * aspect;
            }
        }

        let (min_w, min_h) = if is_text {
            (MIN_TEXT_WIDTH, MIN_TEXT_HEIGHT)
        } else {
            (MIN_ELEMENT_SIZE, MIN_ELEMENT_SIZE)
        };
        width = width.max(min_w);
        height = height.max(min_h);

        // Shift the origin so the edge opposite the handle stays fixed.
        let mut x = orig.x;
        let mut y = orig.y;
        if handle.touches_west() {
            x = orig.x + (orig.width - width);
        }
        if handle.touches_north() {
            y = orig.y + (orig.height - height);
        }

        if let Some(img) = template.image_mut(&id) {
            // Restore the pointer-down fit state, then rescale it by the
            // resize ratios so the visible crop tracks the box.
            img.scale_x = orig_fit.0;
            img.scale_y = orig_fit.1;
            img.image_offset = orig_fit.2;
            let rx = if handle.affects_x() || keep_aspect { width / orig.width } else { 1.0 };
            let ry = if handle.affects_y() || keep_aspect { height / orig.height } else { 1.0 };
            fit::rescale_axes(img, rx, ry);
            img.x = x;
            img.y = y;
            img.width = width;
            img.height = height;
        } else if let Some(mut el) = template.get_mut(&id) {
            el.set_size(width, height);
            el.set_position(Point::new(x, y));
        }
    }

    // --- Pointer-up ---

    /// End the active session. For crop sessions this applies the crop to
    /// the element's fit state. Returns the id of the element whose session
    /// ended, if any.
    pub fn pointer_up(&mut self, template: &mut Template) -> Option<ElementId> {
        let finished = std::mem::take(&mut self.gesture);
        match finished {
            Gesture::Idle => None,
            Gesture::Dragging { id, .. }
            | Gesture::Resizing { id, .. }
            | Gesture::Rotating { id, .. }
            | Gesture::DraggingEndpoint { id, .. } => Some(id),
            Gesture::Cropping { id, session, .. } => {
                if let Some(img) = template.image_mut(&id) {
                    session.apply(img.width, img.height).apply_to(img);
                }
                Some(id)
            }
        }
    }
}

/// World-space positions of the eight resize handles for a (possibly
/// rotated) element box, in N, NE, E, SE, S, SW, W, NW order. Hosts use
/// these to draw selection chrome and hit-test pointer-downs.
#[must_use]
pub fn handle_positions(bounds: &Rect, rotation_deg: f64) -> [Point; 8] {
    let c = bounds.center();
    let half_w = bounds.width / 2.0;
    let half_h = bounds.height / 2.0;
    let local = [
        Point::new(0.0, -half_h),     // N
        Point::new(half_w, -half_h),  // NE
        Point::new(half_w, 0.0),      // E
        Point::new(half_w, half_h),   // SE
        Point::new(0.0, half_h),      // S
        Point::new(-half_w, half_h),  // SW
        Point::new(-half_w, 0.0),     // W
        Point::new(-half_w, -half_h), // NW
    ];
    local.map(|l| crate::geom::rotate_point(Point::new(c.x + l.x, c.y + l.y), c, rotation_deg))
}
