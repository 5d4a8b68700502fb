#![allow(clippy::float_cmp)]

use pretty_assertions::assert_eq;

use super::*;
use crate::element::{LineKind, ShapeKind};
use crate::geom::Point;

fn make_shape() -> ShapeElement {
    ShapeElement::new(ShapeKind::Rectangle, 0.0, 0.0, 100.0, 80.0)
}

fn make_image() -> ImageElement {
    ImageElement::new("img-src", 10.0, 10.0, 200.0, 100.0)
}

fn make_text() -> TextElement {
    TextElement::new("hello", 0.0, 0.0, 120.0, 40.0)
}

fn make_line() -> LineElement {
    LineElement::new(LineKind::Thin, Point::new(0.0, 0.0), Point::new(50.0, 50.0))
}

// =============================================================
// Construction
// =============================================================

#[test]
fn new_template_is_empty() {
    let t = Template::new("card", 400.0, 200.0);
    assert!(t.is_empty());
    assert_eq!(t.len(), 0);
    assert!(t.layer_order.is_empty());
    assert!(t.layer_bijection_holds());
}

#[test]
fn from_cm_uses_fixed_conversion() {
    let t = Template::from_cm("label", 9.0, 5.0);
    assert_eq!(t.width, 360.0);
    assert_eq!(t.height, 200.0);
}

// =============================================================
// Add / remove keep the bijection
// =============================================================

#[test]
fn add_appends_to_layer_order() {
    let mut t = Template::new("t", 400.0, 400.0);
    let a = t.add_shape(make_shape());
    let b = t.add_image(make_image());
    assert_eq!(t.layer_order, vec![a, b]);
    assert_eq!(t.len(), 2);
    assert!(t.layer_bijection_holds());
}

#[test]
fn add_each_kind() {
    let mut t = Template::new("t", 400.0, 400.0);
    t.add_image(make_image());
    t.add_text(make_text());
    t.add_shape(make_shape());
    t.add_line(make_line());
    assert_eq!(t.len(), 4);
    assert_eq!(t.layer_order.len(), 4);
    assert!(t.layer_bijection_holds());
}

#[test]
fn remove_drops_collection_and_layer_entry_together() {
    let mut t = Template::new("t", 400.0, 400.0);
    let a = t.add_shape(make_shape());
    let b = t.add_text(make_text());

    let removed = t.remove(&a).unwrap();
    assert_eq!(removed.id(), a);
    assert_eq!(t.layer_order, vec![b]);
    assert!(t.get(&a).is_none());
    assert!(t.layer_bijection_holds());
}

#[test]
fn remove_unknown_id_is_none() {
    let mut t = Template::new("t", 400.0, 400.0);
    t.add_shape(make_shape());
    assert!(t.remove(&uuid::Uuid::new_v4()).is_none());
    assert_eq!(t.len(), 1);
    assert!(t.layer_bijection_holds());
}

#[test]
fn bijection_holds_under_arbitrary_op_sequence() {
    let mut t = Template::new("t", 400.0, 400.0);
    let a = t.add_shape(make_shape());
    let b = t.add_image(make_image());
    let c = t.add_text(make_text());
    let d = t.add_line(make_line());

    t.bring_to_front(&a);
    assert!(t.layer_bijection_holds());
    t.send_backward(&c);
    assert!(t.layer_bijection_holds());
    t.remove(&b);
    assert!(t.layer_bijection_holds());
    t.bring_forward(&d);
    assert!(t.layer_bijection_holds());
    t.send_to_back(&a);
    assert!(t.layer_bijection_holds());
    let e = t.add_shape(make_shape());
    assert!(t.layer_bijection_holds());
    t.remove(&e);
    t.remove(&a);
    t.remove(&c);
    t.remove(&d);
    assert!(t.is_empty());
    assert!(t.layer_bijection_holds());
}

// =============================================================
// Layer reordering
// =============================================================

#[test]
fn bring_forward_swaps_with_neighbor_above() {
    let mut t = Template::new("t", 400.0, 400.0);
    let a = t.add_shape(make_shape());
    let b = t.add_shape(make_shape());
    assert!(t.bring_forward(&a));
    assert_eq!(t.layer_order, vec![b, a]);
}

#[test]
fn bring_forward_at_top_is_noop() {
    let mut t = Template::new("t", 400.0, 400.0);
    let a = t.add_shape(make_shape());
    let b = t.add_shape(make_shape());
    assert!(!t.bring_forward(&b));
    assert_eq!(t.layer_order, vec![a, b]);
}

#[test]
fn send_backward_swaps_with_neighbor_below() {
    let mut t = Template::new("t", 400.0, 400.0);
    let a = t.add_shape(make_shape());
    let b = t.add_shape(make_shape());
    assert!(t.send_backward(&b));
    assert_eq!(t.layer_order, vec![b, a]);
}

#[test]
fn bring_to_front_and_send_to_back() {
    let mut t = Template::new("t", 400.0, 400.0);
    let a = t.add_shape(make_shape());
    let b = t.add_shape(make_shape());
    let c = t.add_shape(make_shape());

    assert!(t.bring_to_front(&a));
    assert_eq!(t.layer_order, vec![b, c, a]);

    assert!(t.send_to_back(&c));
    assert_eq!(t.layer_order, vec![c, b, a]);
}

#[test]
fn reorder_unknown_id_returns_false() {
    let mut t = Template::new("t", 400.0, 400.0);
    t.add_shape(make_shape());
    let ghost = uuid::Uuid::new_v4();
    assert!(!t.bring_forward(&ghost));
    assert!(!t.send_backward(&ghost));
    assert!(!t.bring_to_front(&ghost));
    assert!(!t.send_to_back(&ghost));
}

#[test]
fn paint_list_follows_layer_order() {
    let mut t = Template::new("t", 400.0, 400.0);
    let a = t.add_line(make_line());
    let b = t.add_shape(make_shape());
    let c = t.add_image(make_image());
    t.send_to_back(&c);

    let order: Vec<_> = t.paint_list().iter().map(super::ElementRef::id).collect();
    assert_eq!(order, vec![c, a, b]);
}

// =============================================================
// Lookup
// =============================================================

#[test]
fn get_finds_every_kind() {
    let mut t = Template::new("t", 400.0, 400.0);
    let a = t.add_image(make_image());
    let b = t.add_text(make_text());
    let c = t.add_shape(make_shape());
    let d = t.add_line(make_line());

    assert!(matches!(t.get(&a), Some(ElementRef::Image(_))));
    assert!(matches!(t.get(&b), Some(ElementRef::Text(_))));
    assert!(matches!(t.get(&c), Some(ElementRef::Shape(_))));
    assert!(matches!(t.get(&d), Some(ElementRef::Line(_))));
    assert!(t.get(&uuid::Uuid::new_v4()).is_none());
}

#[test]
fn get_mut_writes_through() {
    let mut t = Template::new("t", 400.0, 400.0);
    let a = t.add_shape(make_shape());
    if let Some(mut view) = t.get_mut(&a) {
        view.set_position(Point::new(42.0, 7.0));
    }
    let b = t.get(&a).unwrap().bounds();
    assert_eq!((b.x, b.y), (42.0, 7.0));
}

// =============================================================
// Serde round-trip
// =============================================================

#[test]
fn template_serde_roundtrip_preserves_layer_order() {
    let mut t = Template::new("front", 360.0, 200.0);
    t.background_color = "#fafafa".to_owned();
    let a = t.add_image(make_image());
    let b = t.add_text(make_text());
    t.send_to_back(&b);

    let json = serde_json::to_string(&t).unwrap();
    let back: Template = serde_json::from_str(&json).unwrap();
    assert_eq!(back, t);
    assert_eq!(back.layer_order, vec![b, a]);
    assert!(back.layer_bijection_holds());
}

// =============================================================
// Sanitization / repair
// =============================================================

#[test]
fn sanitize_repairs_dangling_and_missing_layer_entries() {
    let mut t = Template::new("t", 400.0, 400.0);
    let a = t.add_shape(make_shape());
    let b = t.add_text(make_text());

    // Simulate a corrupt persisted record.
    t.layer_order = vec![a, a, uuid::Uuid::new_v4()];
    assert!(!t.layer_bijection_holds());

    t.sanitize();
    assert!(t.layer_bijection_holds());
    assert_eq!(t.layer_order.len(), 2);
    assert_eq!(t.layer_order[0], a);
    assert_eq!(t.layer_order[1], b);
}

#[test]
fn sanitize_restores_canvas_dimensions() {
    let mut t = Template::new("t", f64::NAN, -5.0);
    t.sanitize();
    assert_eq!(t.width, 400.0);
    assert_eq!(t.height, 400.0);
}
