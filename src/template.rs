//! Template aggregate: canvas geometry, background, the four element
//! collections, and the layer list that defines paint order.
//!
//! Every identifier in the layer list appears in exactly one collection and
//! every element appears exactly once in the layer list. All mutating
//! operations update both sides atomically; the bijection is re-checked with
//! a `debug_assert!` after each one, because a desync is a programming error
//! rather than a recoverable runtime case.

#[cfg(test)]
#[path = "template_test.rs"]
mod template_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::PX_PER_CM;
use crate::element::{
    Element, ElementId, ElementMut, ElementRef, ImageElement, LineElement, ShapeElement, TextElement,
};

/// The full composable document: canvas size, background, all elements, and
/// their bottom-to-top paint order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: Uuid,
    pub name: String,
    /// Canvas width in template pixels (40 px = 1 cm).
    pub width: f64,
    /// Canvas height in template pixels.
    pub height: f64,
    #[serde(default = "default_background")]
    pub background_color: String,
    #[serde(default)]
    pub background_image: Option<String>,
    /// Element ids in paint order; later entries draw on top.
    #[serde(default)]
    pub layer_order: Vec<ElementId>,
    #[serde(default)]
    pub images: Vec<ImageElement>,
    #[serde(default)]
    pub texts: Vec<TextElement>,
    #[serde(default)]
    pub shapes: Vec<ShapeElement>,
    #[serde(default)]
    pub lines: Vec<LineElement>,
}

fn default_background() -> String {
    "#ffffff".to_owned()
}

impl Template {
    /// Create an empty template with the given pixel dimensions.
    #[must_use]
    pub fn new(name: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            width,
            height,
            background_color: default_background(),
            background_image: None,
            layer_order: Vec::new(),
            images: Vec::new(),
            texts: Vec::new(),
            shapes: Vec::new(),
            lines: Vec::new(),
        }
    }

    /// Create an empty template from physical dimensions in centimeters.
    #[must_use]
    pub fn from_cm(name: impl Into<String>, width_cm: f64, height_cm: f64) -> Self {
        Self::new(name, width_cm * PX_PER_CM, height_cm * PX_PER_CM)
    }

    // --- Adding and removing ---

    /// Add an element of any kind; inserts into its collection and appends
    /// to the layer list in one operation. Returns the element's id.
    pub fn add(&mut self, element: Element) -> ElementId {
        let id = element.id();
        match element {
            Element::Image(e) => self.images.push(e),
            Element::Text(e) => self.texts.push(e),
            Element::Shape(e) => self.shapes.push(e),
            Element::Line(e) => self.lines.push(e),
        }
        self.layer_order.push(id);
        debug_assert!(self.layer_bijection_holds());
        id
    }

    pub fn add_image(&mut self, image: ImageElement) -> ElementId {
        self.add(Element::Image(image))
    }

    pub fn add_text(&mut self, text: TextElement) -> ElementId {
        self.add(Element::Text(text))
    }

    pub fn add_shape(&mut self, shape: ShapeElement) -> ElementId {
        self.add(Element::Shape(shape))
    }

    pub fn add_line(&mut self, line: LineElement) -> ElementId {
        self.add(Element::Line(line))
    }

    /// Remove an element by id from its collection *and* the layer list,
    /// returning it if it was present.
    pub fn remove(&mut self, id: &ElementId) -> Option<Element> {
        let removed = if let Some(i) = self.images.iter().position(|e| e.id == *id) {
            Some(Element::Image(self.images.remove(i)))
        } else if let Some(i) = self.texts.iter().position(|e| e.id == *id) {
            Some(Element::Text(self.texts.remove(i)))
        } else if let Some(i) = self.shapes.iter().position(|e| e.id == *id) {
            Some(Element::Shape(self.shapes.remove(i)))
        } else if let Some(i) = self.lines.iter().position(|e| e.id == *id) {
            Some(Element::Line(self.lines.remove(i)))
        } else {
            None
        };
        if removed.is_some() {
            self.layer_order.retain(|lid| lid != id);
        }
        debug_assert!(self.layer_bijection_holds());
        removed
    }

    // --- Lookup ---

    /// Borrow an element of any kind by id.
    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<ElementRef<'_>> {
        if let Some(e) = self.images.iter().find(|e| e.id == *id) {
            return Some(ElementRef::Image(e));
        }
        if let Some(e) = self.texts.iter().find(|e| e.id == *id) {
            return Some(ElementRef::Text(e));
        }
        if let Some(e) = self.shapes.iter().find(|e| e.id == *id) {
            return Some(ElementRef::Shape(e));
        }
        if let Some(e) = self.lines.iter().find(|e| e.id == *id) {
            return Some(ElementRef::Line(e));
        }
        None
    }

    /// Mutably borrow an element of any kind by id.
    pub fn get_mut(&mut self, id: &ElementId) -> Option<ElementMut<'_>> {
        if let Some(e) = self.images.iter_mut().find(|e| e.id == *id) {
            return Some(ElementMut::Image(e));
        }
        if let Some(e) = self.texts.iter_mut().find(|e| e.id == *id) {
            return Some(ElementMut::Text(e));
        }
        if let Some(e) = self.shapes.iter_mut().find(|e| e.id == *id) {
            return Some(ElementMut::Shape(e));
        }
        if let Some(e) = self.lines.iter_mut().find(|e| e.id == *id) {
            return Some(ElementMut::Line(e));
        }
        None
    }

    /// Mutably borrow an image element by id.
    pub fn image_mut(&mut self, id: &ElementId) -> Option<&mut ImageElement> {
        self.images.iter_mut().find(|e| e.id == *id)
    }

    /// Mutably borrow a line element by id.
    pub fn line_mut(&mut self, id: &ElementId) -> Option<&mut LineElement> {
        self.lines.iter_mut().find(|e| e.id == *id)
    }

    // --- Layer order ---

    /// Position of an element in the paint order (0 = bottom).
    #[must_use]
    pub fn layer_index(&self, id: &ElementId) -> Option<usize> {
        self.layer_order.iter().position(|lid| lid == id)
    }

    /// Swap the element one slot up in the paint order.
    pub fn bring_forward(&mut self, id: &ElementId) -> bool {
        let Some(i) = self.layer_index(id) else {
            return false;
        };
        if i + 1 >= self.layer_order.len() {
            return false;
        }
        self.layer_order.swap(i, i + 1);
        debug_assert!(self.layer_bijection_holds());
        true
    }

    /// Swap the element one slot down in the paint order.
    pub fn send_backward(&mut self, id: &ElementId) -> bool {
        let Some(i) = self.layer_index(id) else {
            return false;
        };
        if i == 0 {
            return false;
        }
        self.layer_order.swap(i, i - 1);
        debug_assert!(self.layer_bijection_holds());
        true
    }

    /// Move the element to the top of the paint order.
    pub fn bring_to_front(&mut self, id: &ElementId) -> bool {
        let Some(i) = self.layer_index(id) else {
            return false;
        };
        let id = self.layer_order.remove(i);
        self.layer_order.push(id);
        debug_assert!(self.layer_bijection_holds());
        true
    }

    /// Move the element to the bottom of the paint order.
    pub fn send_to_back(&mut self, id: &ElementId) -> bool {
        let Some(i) = self.layer_index(id) else {
            return false;
        };
        let id = self.layer_order.remove(i);
        self.layer_order.insert(0, id);
        debug_assert!(self.layer_bijection_holds());
        true
    }

    /// All elements in paint order (bottom first), for the compositor.
    ///
    /// Ids in the layer list with no backing element are skipped here; the
    /// bijection check exists to make that impossible in the first place.
    #[must_use]
    pub fn paint_list(&self) -> Vec<ElementRef<'_>> {
        self.layer_order.iter().filter_map(|id| self.get(id)).collect()
    }

    /// All element refs in collection order (no particular paint order).
    #[must_use]
    pub fn all_elements(&self) -> Vec<ElementRef<'_>> {
        let mut out: Vec<ElementRef<'_>> = Vec::with_capacity(self.len());
        out.extend(self.images.iter().map(ElementRef::Image));
        out.extend(self.texts.iter().map(ElementRef::Text));
        out.extend(self.shapes.iter().map(ElementRef::Shape));
        out.extend(self.lines.iter().map(ElementRef::Line));
        out
    }

    /// Number of elements across all collections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len() + self.texts.len() + self.shapes.len() + self.lines.len()
    }

    /// Returns `true` if the template has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // --- Invariants and hygiene ---

    /// Whether the layer list and the union of the four collections are in
    /// bijection.
    #[must_use]
    pub fn layer_bijection_holds(&self) -> bool {
        if self.layer_order.len() != self.len() {
            return false;
        }
        let mut seen = std::collections::HashSet::new();
        for id in &self.layer_order {
            if !seen.insert(*id) {
                return false;
            }
            if self.get(id).is_none() {
                return false;
            }
        }
        true
    }

    /// Sanitize every element's numeric fields after loading a persisted
    /// record, and repair a layer list that drifted out of sync (ids are
    /// deduplicated, missing ones appended on top, dangling ones dropped).
    pub fn sanitize(&mut self) {
        for e in &mut self.images {
            e.sanitize();
        }
        for e in &mut self.texts {
            e.sanitize();
        }
        for e in &mut self.shapes {
            e.sanitize();
        }
        for e in &mut self.lines {
            e.sanitize();
        }
        if !self.width.is_finite() || self.width <= 0.0 {
            self.width = 10.0 * PX_PER_CM;
        }
        if !self.height.is_finite() || self.height <= 0.0 {
            self.height = 10.0 * PX_PER_CM;
        }

        let mut seen = std::collections::HashSet::new();
        let ids: Vec<ElementId> = self.all_elements().iter().map(ElementRef::id).collect();
        self.layer_order.retain(|id| ids.contains(id) && seen.insert(*id));
        for id in ids {
            if !seen.contains(&id) {
                self.layer_order.push(id);
            }
        }
        debug_assert!(self.layer_bijection_holds());
    }
}
