//! Element model: the tagged union of visual primitives on a template.
//!
//! This module defines the four element kinds (image, text, shape, line),
//! their style records, and the borrowed/owned views used to treat them
//! uniformly. Data flows into this layer from persisted JSON records and
//! from the transform controller (mutations); the compositor reads it to
//! paint. Field names serialize in camelCase to match stored templates.
//!
//! Paint order is *not* stored here: the template's layer list is the only
//! source of truth, so no element carries a numeric z field.

#[cfg(test)]
#[path = "element_test.rs"]
mod element_test;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::consts::{DEFAULT_ELEMENT_HEIGHT, DEFAULT_ELEMENT_WIDTH, DEFAULT_LINE_HEIGHT};
use crate::geom::{Point, Rect};

/// Unique identifier for an element.
pub type ElementId = Uuid;

// =============================================================
// Enums
// =============================================================

/// Shape variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Triangle,
}

/// Line variant; determines the dash pattern and default tips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    #[default]
    Thin,
    Medium,
    Thick,
    Dashed,
    Dotted,
    Arrow,
    Rounded,
}

impl LineKind {
    /// Stroke width implied by the variant when the element stores none.
    #[must_use]
    pub fn default_stroke_width(self) -> f64 {
        match self {
            Self::Thin => 1.0,
            Self::Thick => 6.0,
            Self::Medium | Self::Dashed | Self::Dotted | Self::Arrow | Self::Rounded => 3.0,
        }
    }

    /// Dash pattern as `(on, off)` lengths in multiples of the stroke width.
    #[must_use]
    pub fn dash_pattern(self) -> Option<(f64, f64)> {
        match self {
            Self::Dashed => Some((3.0, 2.0)),
            Self::Dotted => Some((1.0, 1.0)),
            _ => None,
        }
    }

    /// Tips implied by the variant, overridden by explicit start/end tips.
    #[must_use]
    pub fn default_tips(self) -> (LineTip, LineTip) {
        match self {
            Self::Arrow => (LineTip::None, LineTip::Arrow),
            Self::Rounded => (LineTip::Rounded, LineTip::Rounded),
            _ => (LineTip::None, LineTip::None),
        }
    }
}

/// Decorative cap drawn at a line endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineTip {
    #[default]
    None,
    Arrow,
    Circle,
    Rounded,
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical text alignment within the element box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Which way curved text bows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveDirection {
    Up,
    Down,
}

// =============================================================
// Style records
// =============================================================

/// Four-sided padding in template pixels.
///
/// Deserializes from a bare number (uniform), `{x, y}` (axis), or
/// `{top, right, bottom, left}` (four-sided).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "PaddingSpec")]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    #[must_use]
    pub fn uniform(v: f64) -> Self {
        Self { top: v, right: v, bottom: v, left: v }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct AxisPadding {
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SidesPadding {
    #[serde(default)]
    top: f64,
    #[serde(default)]
    right: f64,
    #[serde(default)]
    bottom: f64,
    #[serde(default)]
    left: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PaddingSpec {
    Uniform(f64),
    Axis(AxisPadding),
    Sides(SidesPadding),
}

impl From<PaddingSpec> for Padding {
    fn from(spec: PaddingSpec) -> Self {
        match spec {
            PaddingSpec::Uniform(v) => Padding::uniform(v),
            PaddingSpec::Axis(a) => Padding { top: a.y, right: a.x, bottom: a.y, left: a.x },
            PaddingSpec::Sides(s) => Padding { top: s.top, right: s.right, bottom: s.bottom, left: s.left },
        }
    }
}

/// Outline drawn behind text fills.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStroke {
    pub color: String,
    pub width: f64,
}

/// Circular-arc text parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextCurve {
    /// Arc radius in template pixels.
    pub radius: f64,
    pub direction: CurveDirection,
}

/// Visual style of a text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(default = "default_font_family")]
    pub font_family: String,
    /// Pixel size. Accepts a bare number or a string with a unit suffix
    /// (`"24px"`); both parse to the same numeric value.
    #[serde(default = "default_font_size", deserialize_with = "de_font_size")]
    pub font_size: f64,
    /// CSS weight keyword or number; `"bold"` and values ≥ 600 select the
    /// bold face when one is registered.
    #[serde(default = "default_font_weight")]
    pub font_weight: String,
    #[serde(default = "default_text_color")]
    pub color: String,
    #[serde(default)]
    pub text_align: TextAlign,
    /// Line height as a multiplier of the font size.
    #[serde(default = "default_line_height")]
    pub line_height: f64,
    #[serde(default)]
    pub vertical_align: Option<VerticalAlign>,
    /// Extra advance between characters, in template pixels.
    #[serde(default)]
    pub letter_spacing: Option<f64>,
    #[serde(default)]
    pub stroke: Option<TextStroke>,
    #[serde(default)]
    pub curve: Option<TextCurve>,
    /// Box background painted behind the text, if any.
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub border_radius: Option<f64>,
    #[serde(default)]
    pub padding: Option<Padding>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: default_font_family(),
            font_size: default_font_size(),
            font_weight: default_font_weight(),
            color: default_text_color(),
            text_align: TextAlign::default(),
            line_height: default_line_height(),
            vertical_align: None,
            letter_spacing: None,
            stroke: None,
            curve: None,
            background: None,
            border_radius: None,
            padding: None,
        }
    }
}

impl TextStyle {
    /// Whether the configured weight selects the bold face.
    #[must_use]
    pub fn is_bold(&self) -> bool {
        let w = self.font_weight.trim();
        w.eq_ignore_ascii_case("bold")
            || w.eq_ignore_ascii_case("bolder")
            || w.parse::<f64>().is_ok_and(|n| n >= 600.0)
    }
}

fn default_font_family() -> String {
    "sans-serif".to_owned()
}

fn default_font_size() -> f64 {
    16.0
}

fn default_font_weight() -> String {
    "normal".to_owned()
}

fn default_text_color() -> String {
    "#000000".to_owned()
}

fn default_line_height() -> f64 {
    DEFAULT_LINE_HEIGHT
}

/// Accept a font size as a number or a string with a trailing unit.
fn de_font_size<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrString {
        Num(f64),
        Str(String),
    }

    match NumOrString::deserialize(deserializer)? {
        NumOrString::Num(n) => Ok(n),
        NumOrString::Str(s) => {
            let trimmed = s.trim();
            let digits: String = trimmed
                .chars()
                .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            digits
                .parse::<f64>()
                .map_err(|_| serde::de::Error::custom(format!("invalid font size: {s:?}")))
        }
    }
}

// =============================================================
// Elements
// =============================================================

/// A bitmap placed on the template.
///
/// `scale_x`/`scale_y`/`image_offset` describe how the natural bitmap maps
/// onto the element box (the cover/crop state); they are independent of the
/// box's own size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageElement {
    pub id: ElementId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub src: String,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub border_radius: f64,
    /// Grayscale intensity, 0–100.
    #[serde(default)]
    pub grayscale: f64,
    #[serde(default = "one")]
    pub scale_x: f64,
    #[serde(default = "one")]
    pub scale_y: f64,
    #[serde(default)]
    pub image_offset: Point,
    #[serde(default = "yes")]
    pub draggable: bool,
}

impl ImageElement {
    #[must_use]
    pub fn new(src: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            x,
            y,
            width,
            height,
            src: src.into(),
            rotation: 0.0,
            border_radius: 0.0,
            grayscale: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            image_offset: Point::default(),
            draggable: true,
        }
    }

    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Replace non-finite geometry with safe defaults and clamp ranges.
    pub fn sanitize(&mut self) {
        self.x = sane(self.x, 0.0);
        self.y = sane(self.y, 0.0);
        self.width = sane_positive(self.width, DEFAULT_ELEMENT_WIDTH);
        self.height = sane_positive(self.height, DEFAULT_ELEMENT_HEIGHT);
        self.rotation = sane(self.rotation, 0.0);
        self.border_radius = sane(self.border_radius, 0.0).max(0.0);
        self.grayscale = sane(self.grayscale, 0.0).clamp(0.0, 100.0);
        self.scale_x = sane_positive(self.scale_x, 1.0);
        self.scale_y = sane_positive(self.scale_y, 1.0);
        self.image_offset.x = sane(self.image_offset.x, 0.0);
        self.image_offset.y = sane(self.image_offset.y, 0.0);
    }
}

/// A block of text on the template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    pub id: ElementId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Content string; may contain explicit line breaks.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub style: TextStyle,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "yes")]
    pub draggable: bool,
}

impl TextElement {
    #[must_use]
    pub fn new(content: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            x,
            y,
            width,
            height,
            content: content.into(),
            style: TextStyle::default(),
            rotation: 0.0,
            draggable: true,
        }
    }

    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn sanitize(&mut self) {
        self.x = sane(self.x, 0.0);
        self.y = sane(self.y, 0.0);
        self.width = sane(self.width, 0.0).max(0.0);
        self.height = sane(self.height, 0.0).max(0.0);
        self.rotation = sane(self.rotation, 0.0);
        self.style.font_size = sane_positive(self.style.font_size, default_font_size());
        self.style.line_height = sane_positive(self.style.line_height, DEFAULT_LINE_HEIGHT);
    }
}

/// A rectangle, circle, or triangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeElement {
    pub id: ElementId,
    pub kind: ShapeKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_shape_fill")]
    pub fill: String,
    #[serde(default = "default_border_color")]
    pub border_color: String,
    #[serde(default)]
    pub border_width: f64,
    /// Corner radius; rectangle only.
    #[serde(default)]
    pub border_radius: f64,
    /// Opacity, 0–100.
    #[serde(default = "hundred")]
    pub opacity: f64,
    #[serde(default = "yes")]
    pub draggable: bool,
}

impl ShapeElement {
    #[must_use]
    pub fn new(kind: ShapeKind, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            x,
            y,
            width,
            height,
            rotation: 0.0,
            fill: default_shape_fill(),
            border_color: default_border_color(),
            border_width: 0.0,
            border_radius: 0.0,
            opacity: 100.0,
            draggable: true,
        }
    }

    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn sanitize(&mut self) {
        self.x = sane(self.x, 0.0);
        self.y = sane(self.y, 0.0);
        self.width = sane_positive(self.width, DEFAULT_ELEMENT_WIDTH);
        self.height = sane_positive(self.height, DEFAULT_ELEMENT_HEIGHT);
        self.rotation = sane(self.rotation, 0.0);
        self.border_width = sane(self.border_width, 0.0).max(0.0);
        self.border_radius = sane(self.border_radius, 0.0).max(0.0);
        self.opacity = sane(self.opacity, 100.0).clamp(0.0, 100.0);
    }
}

fn default_shape_fill() -> String {
    "#d94b4b".to_owned()
}

fn default_border_color() -> String {
    "#1f1a17".to_owned()
}

/// A straight line between two endpoints (not a box).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineElement {
    pub id: ElementId,
    pub start: Point,
    pub end: Point,
    #[serde(default)]
    pub kind: LineKind,
    #[serde(default = "default_border_color")]
    pub stroke_color: String,
    /// Zero means "use the variant default".
    #[serde(default)]
    pub stroke_width: f64,
    /// Opacity, 0–100.
    #[serde(default = "hundred")]
    pub opacity: f64,
    #[serde(default)]
    pub start_tip: Option<LineTip>,
    #[serde(default)]
    pub end_tip: Option<LineTip>,
    #[serde(default = "yes")]
    pub draggable: bool,
}

impl LineElement {
    #[must_use]
    pub fn new(kind: LineKind, start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            kind,
            stroke_color: default_border_color(),
            stroke_width: 0.0,
            opacity: 100.0,
            start_tip: None,
            end_tip: None,
            draggable: true,
        }
    }

    /// Endpoint bounding box, used for dragging, clamping, and guides.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }

    /// Effective stroke width: the stored value, or the variant default.
    #[must_use]
    pub fn effective_stroke_width(&self) -> f64 {
        if self.stroke_width > 0.0 { self.stroke_width } else { self.kind.default_stroke_width() }
    }

    /// Effective tips: explicit values win over the variant defaults.
    #[must_use]
    pub fn effective_tips(&self) -> (LineTip, LineTip) {
        let (ds, de) = self.kind.default_tips();
        (self.start_tip.unwrap_or(ds), self.end_tip.unwrap_or(de))
    }

    pub fn sanitize(&mut self) {
        self.start.x = sane(self.start.x, 0.0);
        self.start.y = sane(self.start.y, 0.0);
        self.end.x = sane(self.end.x, DEFAULT_ELEMENT_WIDTH);
        self.end.y = sane(self.end.y, 0.0);
        self.stroke_width = sane(self.stroke_width, 0.0).max(0.0);
        self.opacity = sane(self.opacity, 100.0).clamp(0.0, 100.0);
    }
}

// =============================================================
// Uniform views
// =============================================================

/// An owned element of any kind, used when adding to or removing from a
/// template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Image(ImageElement),
    Text(TextElement),
    Shape(ShapeElement),
    Line(LineElement),
}

impl Element {
    #[must_use]
    pub fn id(&self) -> ElementId {
        match self {
            Self::Image(e) => e.id,
            Self::Text(e) => e.id,
            Self::Shape(e) => e.id,
            Self::Line(e) => e.id,
        }
    }
}

/// A borrowed view of an element of any kind.
#[derive(Debug, Clone, Copy)]
pub enum ElementRef<'a> {
    Image(&'a ImageElement),
    Text(&'a TextElement),
    Shape(&'a ShapeElement),
    Line(&'a LineElement),
}

impl ElementRef<'_> {
    #[must_use]
    pub fn id(&self) -> ElementId {
        match self {
            Self::Image(e) => e.id,
            Self::Text(e) => e.id,
            Self::Shape(e) => e.id,
            Self::Line(e) => e.id,
        }
    }

    #[must_use]
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Image(e) => e.bounds(),
            Self::Text(e) => e.bounds(),
            Self::Shape(e) => e.bounds(),
            Self::Line(e) => e.bounds(),
        }
    }

    #[must_use]
    pub fn rotation(&self) -> f64 {
        match self {
            Self::Image(e) => e.rotation,
            Self::Text(e) => e.rotation,
            Self::Shape(e) => e.rotation,
            Self::Line(_) => 0.0,
        }
    }

    #[must_use]
    pub fn draggable(&self) -> bool {
        match self {
            Self::Image(e) => e.draggable,
            Self::Text(e) => e.draggable,
            Self::Shape(e) => e.draggable,
            Self::Line(e) => e.draggable,
        }
    }
}

/// A mutable view of an element of any kind.
#[derive(Debug)]
pub enum ElementMut<'a> {
    Image(&'a mut ImageElement),
    Text(&'a mut TextElement),
    Shape(&'a mut ShapeElement),
    Line(&'a mut LineElement),
}

impl ElementMut<'_> {
    #[must_use]
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Image(e) => e.bounds(),
            Self::Text(e) => e.bounds(),
            Self::Shape(e) => e.bounds(),
            Self::Line(e) => e.bounds(),
        }
    }

    #[must_use]
    pub fn rotation(&self) -> f64 {
        match self {
            Self::Image(e) => e.rotation,
            Self::Text(e) => e.rotation,
            Self::Shape(e) => e.rotation,
            Self::Line(_) => 0.0,
        }
    }

    pub fn set_rotation(&mut self, deg: f64) {
        match self {
            Self::Image(e) => e.rotation = deg,
            Self::Text(e) => e.rotation = deg,
            Self::Shape(e) => e.rotation = deg,
            Self::Line(_) => {}
        }
    }

    /// Move the element so its bounding box's top-left corner sits at `pos`.
    /// For lines this translates both endpoints.
    pub fn set_position(&mut self, pos: Point) {
        match self {
            Self::Image(e) => {
                e.x = pos.x;
                e.y = pos.y;
            }
            Self::Text(e) => {
                e.x = pos.x;
                e.y = pos.y;
            }
            Self::Shape(e) => {
                e.x = pos.x;
                e.y = pos.y;
            }
            Self::Line(e) => {
                let b = e.bounds();
                let dx = pos.x - b.x;
                let dy = pos.y - b.y;
                e.start.x += dx;
                e.start.y += dy;
                e.end.x += dx;
                e.end.y += dy;
            }
        }
    }

    /// Set the box size. No-op for lines, whose extent is their endpoints.
    pub fn set_size(&mut self, width: f64, height: f64) {
        match self {
            Self::Image(e) => {
                e.width = width;
                e.height = height;
            }
            Self::Text(e) => {
                e.width = width;
                e.height = height;
            }
            Self::Shape(e) => {
                e.width = width;
                e.height = height;
            }
            Self::Line(_) => {}
        }
    }
}

// =============================================================
// Helpers
// =============================================================

fn sane(v: f64, fallback: f64) -> f64 {
    if v.is_finite() { v } else { fallback }
}

fn sane_positive(v: f64, fallback: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { fallback }
}

fn one() -> f64 {
    1.0
}

fn hundred() -> f64 {
    100.0
}

fn yes() -> bool {
    true
}
