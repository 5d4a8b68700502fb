//! Shared numeric constants for the template engine.

// ── Units ───────────────────────────────────────────────────────

/// Fixed conversion from physical centimeters to template pixels.
pub const PX_PER_CM: f64 = 40.0;

// ── Alignment snapping ──────────────────────────────────────────

/// Guide detection threshold in screen pixels at 100% zoom.
///
/// Divided by the current zoom so sensitivity feels constant on screen.
pub const SNAP_THRESHOLD_PX: f64 = 10.0;

/// Breakaway multiplier applied to the detection threshold when correcting
/// a dragged position toward a guide. The looser radius keeps an element
/// stuck to a guide until it is moved far enough to break free.
pub const SNAP_BREAKAWAY_FACTOR: f64 = 1.5;

// ── Size floors ─────────────────────────────────────────────────

/// Minimum width/height for image and shape elements during resize.
pub const MIN_ELEMENT_SIZE: f64 = 20.0;

/// Minimum width for text elements during resize.
pub const MIN_TEXT_WIDTH: f64 = 50.0;

/// Minimum height for text elements during resize.
pub const MIN_TEXT_HEIGHT: f64 = 30.0;

// ── Text estimation ─────────────────────────────────────────────

/// Average glyph width as a fraction of font size, used to estimate a text
/// element's box when no explicit size is stored.
pub const TEXT_WIDTH_FACTOR: f64 = 0.6;

/// Line-height multiplier assumed when a text style carries none.
pub const DEFAULT_LINE_HEIGHT: f64 = 1.2;

// ── Sanitization defaults ───────────────────────────────────────

/// Fallback width for elements loaded with a non-finite width.
pub const DEFAULT_ELEMENT_WIDTH: f64 = 200.0;

/// Fallback height for elements loaded with a non-finite height.
pub const DEFAULT_ELEMENT_HEIGHT: f64 = 100.0;

// ── Selection chrome (host-facing) ──────────────────────────────

/// Screen-space hit slop in pixels for resize handles.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// Distance from the bounding box edge to the rotate handle, in screen pixels.
pub const ROTATE_HANDLE_OFFSET_PX: f64 = 24.0;
