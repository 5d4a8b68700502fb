#![allow(clippy::float_cmp)]

use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;

// =============================================================
// Serde: shape/line enums
// =============================================================

#[test]
fn shape_kind_serde_roundtrip() {
    let cases = [
        (ShapeKind::Rectangle, "\"rectangle\""),
        (ShapeKind::Circle, "\"circle\""),
        (ShapeKind::Triangle, "\"triangle\""),
    ];
    for (kind, expected) in cases {
        assert_eq!(serde_json::to_string(&kind).unwrap(), expected);
        let back: ShapeKind = serde_json::from_str(expected).unwrap();
        assert_eq!(back, kind);
    }
}

#[test]
fn line_kind_deserialize_all_variants() {
    let cases = [
        ("\"thin\"", LineKind::Thin),
        ("\"medium\"", LineKind::Medium),
        ("\"thick\"", LineKind::Thick),
        ("\"dashed\"", LineKind::Dashed),
        ("\"dotted\"", LineKind::Dotted),
        ("\"arrow\"", LineKind::Arrow),
        ("\"rounded\"", LineKind::Rounded),
    ];
    for (input, expected) in cases {
        let kind: LineKind = serde_json::from_str(input).unwrap();
        assert_eq!(kind, expected);
    }
}

#[test]
fn kind_deserialize_invalid_rejects() {
    assert!(serde_json::from_str::<ShapeKind>("\"hexagon\"").is_err());
    assert!(serde_json::from_str::<LineKind>("\"wavy\"").is_err());
}

// =============================================================
// Line variant defaults
// =============================================================

#[test]
fn line_kind_dash_patterns() {
    assert_eq!(LineKind::Dashed.dash_pattern(), Some((3.0, 2.0)));
    assert_eq!(LineKind::Dotted.dash_pattern(), Some((1.0, 1.0)));
    assert_eq!(LineKind::Thin.dash_pattern(), None);
    assert_eq!(LineKind::Arrow.dash_pattern(), None);
}

#[test]
fn line_kind_default_tips() {
    assert_eq!(LineKind::Arrow.default_tips(), (LineTip::None, LineTip::Arrow));
    assert_eq!(LineKind::Rounded.default_tips(), (LineTip::Rounded, LineTip::Rounded));
    assert_eq!(LineKind::Thick.default_tips(), (LineTip::None, LineTip::None));
}

#[test]
fn line_effective_stroke_width_prefers_explicit() {
    let mut line = LineElement::new(LineKind::Thick, Point::new(0.0, 0.0), Point::new(10.0, 0.0));
    assert_eq!(line.effective_stroke_width(), 6.0);
    line.stroke_width = 2.5;
    assert_eq!(line.effective_stroke_width(), 2.5);
}

#[test]
fn line_effective_tips_explicit_override() {
    let mut line = LineElement::new(LineKind::Arrow, Point::new(0.0, 0.0), Point::new(10.0, 0.0));
    assert_eq!(line.effective_tips(), (LineTip::None, LineTip::Arrow));
    line.start_tip = Some(LineTip::Circle);
    assert_eq!(line.effective_tips(), (LineTip::Circle, LineTip::Arrow));
}

#[test]
fn line_bounds_is_endpoint_bbox() {
    let line = LineElement::new(LineKind::Thin, Point::new(50.0, 10.0), Point::new(20.0, 40.0));
    let b = line.bounds();
    assert_eq!(b.x, 20.0);
    assert_eq!(b.y, 10.0);
    assert_eq!(b.width, 30.0);
    assert_eq!(b.height, 30.0);
}

// =============================================================
// Padding deserialization forms
// =============================================================

#[test]
fn padding_uniform_from_number() {
    let p: Padding = serde_json::from_value(json!(8.0)).unwrap();
    assert_eq!(p, Padding { top: 8.0, right: 8.0, bottom: 8.0, left: 8.0 });
}

#[test]
fn padding_axis_form() {
    let p: Padding = serde_json::from_value(json!({ "x": 4.0, "y": 2.0 })).unwrap();
    assert_eq!(p, Padding { top: 2.0, right: 4.0, bottom: 2.0, left: 4.0 });
}

#[test]
fn padding_four_sided_form() {
    let p: Padding = serde_json::from_value(json!({ "top": 1.0, "right": 2.0, "bottom": 3.0, "left": 4.0 })).unwrap();
    assert_eq!(p, Padding { top: 1.0, right: 2.0, bottom: 3.0, left: 4.0 });
}

#[test]
fn padding_partial_sides_default_to_zero() {
    let p: Padding = serde_json::from_value(json!({ "top": 5.0 })).unwrap();
    assert_eq!(p, Padding { top: 5.0, right: 0.0, bottom: 0.0, left: 0.0 });
}

// =============================================================
// Font size: number or string
// =============================================================

#[test]
fn font_size_accepts_bare_number() {
    let style: TextStyle = serde_json::from_value(json!({ "fontSize": 24 })).unwrap();
    assert_eq!(style.font_size, 24.0);
}

#[test]
fn font_size_accepts_px_suffix() {
    let style: TextStyle = serde_json::from_value(json!({ "fontSize": "24px" })).unwrap();
    assert_eq!(style.font_size, 24.0);
}

#[test]
fn font_size_accepts_fractional_string() {
    let style: TextStyle = serde_json::from_value(json!({ "fontSize": "13.5px" })).unwrap();
    assert_eq!(style.font_size, 13.5);
}

#[test]
fn font_size_rejects_non_numeric_string() {
    assert!(serde_json::from_value::<TextStyle>(json!({ "fontSize": "large" })).is_err());
}

#[test]
fn text_style_defaults() {
    let style: TextStyle = serde_json::from_value(json!({})).unwrap();
    assert_eq!(style.font_size, 16.0);
    assert_eq!(style.font_family, "sans-serif");
    assert_eq!(style.text_align, TextAlign::Left);
    assert_eq!(style.line_height, 1.2);
    assert!(style.curve.is_none());
}

#[test]
fn font_weight_bold_detection() {
    let mut style = TextStyle::default();
    assert!(!style.is_bold());
    style.font_weight = "bold".to_owned();
    assert!(style.is_bold());
    style.font_weight = "700".to_owned();
    assert!(style.is_bold());
    style.font_weight = "400".to_owned();
    assert!(!style.is_bold());
}

// =============================================================
// Element serde
// =============================================================

#[test]
fn image_element_roundtrip() {
    let mut img = ImageElement::new("data:image/png;base64,abc", 10.0, 20.0, 200.0, 100.0);
    img.border_radius = 8.0;
    img.grayscale = 40.0;
    img.scale_x = 1.5;
    img.image_offset = Point::new(-25.0, 0.0);

    let value = serde_json::to_value(&img).unwrap();
    assert_eq!(value["borderRadius"], json!(8.0));
    assert_eq!(value["imageOffset"]["x"], json!(-25.0));

    let back: ImageElement = serde_json::from_value(value).unwrap();
    assert_eq!(back, img);
}

#[test]
fn image_element_defaults_on_sparse_record() {
    let img: ImageElement = serde_json::from_value(json!({
        "id": uuid::Uuid::new_v4(),
        "x": 0.0, "y": 0.0, "width": 100.0, "height": 50.0,
    }))
    .unwrap();
    assert_eq!(img.scale_x, 1.0);
    assert_eq!(img.scale_y, 1.0);
    assert_eq!(img.grayscale, 0.0);
    assert!(img.draggable);
}

#[test]
fn legacy_z_index_field_is_ignored() {
    // Paint order lives in the template layer list; a stray zIndex in a
    // persisted record must not round-trip into the model.
    let shape: Result<ShapeElement, _> = serde_json::from_value(json!({
        "id": uuid::Uuid::new_v4(),
        "kind": "rectangle",
        "x": 0.0, "y": 0.0, "width": 10.0, "height": 10.0,
        "zIndex": 99,
    }));
    let shape = shape.unwrap();
    let value = serde_json::to_value(&shape).unwrap();
    assert!(value.get("zIndex").is_none());
}

#[test]
fn owned_element_tagged_roundtrip() {
    let el = Element::Shape(ShapeElement::new(ShapeKind::Circle, 0.0, 0.0, 50.0, 50.0));
    let value = serde_json::to_value(&el).unwrap();
    assert_eq!(value["type"], json!("shape"));
    let back: Element = serde_json::from_value(value).unwrap();
    assert_eq!(back, el);
}

// =============================================================
// Sanitization
// =============================================================

#[test]
fn sanitize_replaces_non_finite_geometry() {
    let mut img = ImageElement::new("x", f64::NAN, 5.0, f64::INFINITY, -3.0);
    img.sanitize();
    assert_eq!(img.x, 0.0);
    assert_eq!(img.y, 5.0);
    assert_eq!(img.width, 200.0);
    assert_eq!(img.height, 100.0);
}

#[test]
fn sanitize_clamps_percentages() {
    let mut img = ImageElement::new("x", 0.0, 0.0, 10.0, 10.0);
    img.grayscale = 250.0;
    img.sanitize();
    assert_eq!(img.grayscale, 100.0);

    let mut shape = ShapeElement::new(ShapeKind::Rectangle, 0.0, 0.0, 10.0, 10.0);
    shape.opacity = -5.0;
    shape.sanitize();
    assert_eq!(shape.opacity, 0.0);
}

#[test]
fn sanitize_restores_bad_fit_state() {
    let mut img = ImageElement::new("x", 0.0, 0.0, 10.0, 10.0);
    img.scale_x = f64::NAN;
    img.image_offset = Point::new(f64::NAN, 3.0);
    img.sanitize();
    assert_eq!(img.scale_x, 1.0);
    assert_eq!(img.image_offset.x, 0.0);
    assert_eq!(img.image_offset.y, 3.0);
}

// =============================================================
// Mutable views
// =============================================================

#[test]
fn element_mut_set_position_translates_line_endpoints() {
    let mut line = LineElement::new(LineKind::Thin, Point::new(10.0, 10.0), Point::new(40.0, 30.0));
    let mut view = ElementMut::Line(&mut line);
    view.set_position(Point::new(0.0, 0.0));
    assert_eq!(line.start, Point::new(0.0, 0.0));
    assert_eq!(line.end, Point::new(30.0, 20.0));
}

#[test]
fn element_mut_rotation_ignored_for_lines() {
    let mut line = LineElement::new(LineKind::Thin, Point::new(0.0, 0.0), Point::new(10.0, 0.0));
    let mut view = ElementMut::Line(&mut line);
    view.set_rotation(45.0);
    assert_eq!(view.rotation(), 0.0);
}
