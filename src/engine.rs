//! Engine facade: one object a host embeds to drive a template editing
//! session.
//!
//! The engine owns the document, the selection, the gesture controller,
//! and the asset stores, and exposes a narrow pointer-event API. Methods
//! that change what the host should display return a list of [`Action`]s;
//! the host applies them in order (repaint, update selection chrome, show
//! or hide guide lines). The engine itself never draws selection chrome;
//! hosts place handles via [`handle_positions`].

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use image::RgbaImage;

use crate::assets::ImageStore;
use crate::element::{Element, ElementId, ElementRef};
use crate::error::EngineError;
use crate::geom::Point;
use crate::guides::Guide;
use crate::raster::{self, FontStore};
use crate::template::Template;
use crate::transform::{CropPart, Handle, LineEnd, TransformController};

/// A display-side effect the host must apply after an engine call.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The scene changed; repaint from the model.
    Redraw,
    /// The selection changed; move or hide the selection chrome.
    SelectionChanged(Option<ElementId>),
    /// The set of visible alignment guides changed (possibly to none).
    GuidesChanged(Vec<Guide>),
}

/// Persistence seam for templates. Hosts decide where documents live.
pub trait TemplateStore {
    /// Load a template by id, `None` when absent.
    fn load(&self, id: &str) -> Result<Option<Template>, EngineError>;
    /// Persist a template.
    fn save(&mut self, template: &Template) -> Result<(), EngineError>;
}

/// An interactive editing session over one template.
#[derive(Debug)]
pub struct Engine {
    template: Template,
    selection: Option<ElementId>,
    controller: TransformController,
    guides: Vec<Guide>,
    images: ImageStore,
    fonts: FontStore,
}

impl Engine {
    /// Start a session. The template is sanitized on the way in, and any
    /// `data:` URI image sources are decoded into the asset store.
    #[must_use]
    pub fn new(mut template: Template) -> Self {
        template.sanitize();
        let mut engine = Self {
            template,
            selection: None,
            controller: TransformController::new(),
            guides: Vec::new(),
            images: ImageStore::new(),
            fonts: FontStore::new(),
        };
        engine.preload_data_uris();
        engine
    }

    fn preload_data_uris(&mut self) {
        let sources: Vec<String> = self
            .template
            .all_elements()
            .into_iter()
            .filter_map(|el| match el {
                ElementRef::Image(img) if img.src.starts_with("data:") => Some(img.src.clone()),
                _ => None,
            })
            .collect();
        for src in sources {
            if let Err(err) = self.images.resolve(&src) {
                tracing::warn!(%err, "embedded image failed to decode");
            }
        }
    }

    // --- Accessors ---

    #[must_use]
    pub fn template(&self) -> &Template {
        &self.template
    }

    #[must_use]
    pub fn template_mut(&mut self) -> &mut Template {
        &mut self.template
    }

    #[must_use]
    pub fn selection(&self) -> Option<ElementId> {
        self.selection
    }

    #[must_use]
    pub fn guides(&self) -> &[Guide] {
        &self.guides
    }

    #[must_use]
    pub fn images(&self) -> &ImageStore {
        &self.images
    }

    #[must_use]
    pub fn images_mut(&mut self) -> &mut ImageStore {
        &mut self.images
    }

    #[must_use]
    pub fn fonts_mut(&mut self) -> &mut FontStore {
        &mut self.fonts
    }

    // --- View ---

    pub fn set_zoom(&mut self, zoom: f64) {
        self.controller.set_zoom(zoom);
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.controller.zoom()
    }

    #[must_use]
    pub fn screen_to_template(&self, p: Point) -> Point {
        p.scaled(1.0 / self.zoom())
    }

    #[must_use]
    pub fn template_to_screen(&self, p: Point) -> Point {
        p.scaled(self.zoom())
    }

    /// World-space handle positions for the selected element, for hosts to
    /// draw and hit-test selection chrome. Empty when nothing box-like is
    /// selected.
    #[must_use]
    pub fn handle_positions(&self) -> Option<[Point; 8]> {
        let id = self.selection?;
        let el = self.template.get(&id)?;
        if matches!(el, ElementRef::Line(_)) {
            return None;
        }
        Some(crate::transform::handle_positions(&el.bounds(), el.rotation()))
    }

    // --- Selection and structure ---

    pub fn select(&mut self, id: Option<ElementId>) -> Vec<Action> {
        if self.selection == id {
            return Vec::new();
        }
        self.selection = id;
        vec![Action::SelectionChanged(id)]
    }

    /// Topmost element under a template-space point, honoring layer order.
    #[must_use]
    pub fn hit_test(&self, p: Point) -> Option<ElementId> {
        for el in self.template.paint_list().into_iter().rev() {
            let hit = match el {
                ElementRef::Line(line) => {
                    point_segment_distance(p, line.start, line.end)
                        <= (line.effective_stroke_width() / 2.0).max(4.0)
                }
                _ => {
                    let b = el.bounds();
                    let local = crate::geom::rotate_point(p, b.center(), -el.rotation());
                    b.contains(local)
                }
            };
            if hit {
                return Some(el.id());
            }
        }
        None
    }

    /// Add an element, select it, and preload its bitmap when embedded.
    pub fn add_element(&mut self, element: Element) -> (ElementId, Vec<Action>) {
        if let Element::Image(img) = &element {
            if img.src.starts_with("data:") {
                if let Err(err) = self.images.resolve(&img.src) {
                    tracing::warn!(%err, "embedded image failed to decode");
                }
            }
        }
        let id = self.template.add(element);
        self.selection = Some(id);
        (id, vec![Action::Redraw, Action::SelectionChanged(Some(id))])
    }

    /// Remove an element; clears the selection when it pointed at it.
    pub fn delete(&mut self, id: &ElementId) -> Vec<Action> {
        if self.template.remove(id).is_none() {
            return Vec::new();
        }
        let mut actions = vec![Action::Redraw];
        if self.selection == Some(*id) {
            self.selection = None;
            actions.push(Action::SelectionChanged(None));
        }
        actions
    }

    pub fn bring_forward(&mut self, id: &ElementId) -> Vec<Action> {
        if self.template.bring_forward(id) { vec![Action::Redraw] } else { Vec::new() }
    }

    pub fn send_backward(&mut self, id: &ElementId) -> Vec<Action> {
        if self.template.send_backward(id) { vec![Action::Redraw] } else { Vec::new() }
    }

    pub fn bring_to_front(&mut self, id: &ElementId) -> Vec<Action> {
        if self.template.bring_to_front(id) { vec![Action::Redraw] } else { Vec::new() }
    }

    pub fn send_to_back(&mut self, id: &ElementId) -> Vec<Action> {
        if self.template.send_to_back(id) { vec![Action::Redraw] } else { Vec::new() }
    }

    // --- Gestures ---

    /// Begin dragging `id` from a screen-space pointer position. Selects
    /// the element.
    pub fn begin_drag(&mut self, id: ElementId, pointer: Point) -> Vec<Action> {
        if !self.controller.begin_drag(&self.template, id, pointer) {
            return Vec::new();
        }
        let mut actions = self.select(Some(id));
        actions.push(Action::Redraw);
        actions
    }

    pub fn begin_resize(
        &mut self,
        id: ElementId,
        handle: Handle,
        pointer: Point,
        aspect_override: bool,
    ) -> Vec<Action> {
        if !self.controller.begin_resize(&self.template, id, handle, pointer, aspect_override) {
            return Vec::new();
        }
        self.select(Some(id))
    }

    pub fn begin_rotate(&mut self, id: ElementId) -> Vec<Action> {
        if !self.controller.begin_rotate(&self.template, id) {
            return Vec::new();
        }
        self.select(Some(id))
    }

    pub fn begin_endpoint_drag(&mut self, id: ElementId, end: LineEnd) -> Vec<Action> {
        if !self.controller.begin_endpoint_drag(&self.template, id, end) {
            return Vec::new();
        }
        self.select(Some(id))
    }

    /// Enter crop mode on an image element. Requires its bitmap to be
    /// loaded, since the crop rectangle lives in bitmap space.
    pub fn begin_crop(&mut self, id: ElementId, part: CropPart, pointer: Point) -> Vec<Action> {
        let Some(ElementRef::Image(img)) = self.template.get(&id) else {
            return Vec::new();
        };
        let Some((nw, nh)) = self.images.natural_size(&img.src) else {
            tracing::warn!(element = %id, "crop requested before bitmap loaded");
            return Vec::new();
        };
        if !self.controller.begin_crop(&self.template, id, part, pointer, nw, nh) {
            return Vec::new();
        }
        self.select(Some(id))
    }

    /// Route a pointer-move into the active gesture.
    pub fn pointer_move(&mut self, pointer: Point) -> Vec<Action> {
        if !self.controller.is_active() {
            return Vec::new();
        }
        let guides = self.controller.pointer_move(&mut self.template, pointer);
        let mut actions = vec![Action::Redraw];
        if guides != self.guides {
            self.guides = guides.clone();
            actions.push(Action::GuidesChanged(guides));
        }
        actions
    }

    /// End the active gesture; guides disappear with it.
    pub fn pointer_up(&mut self) -> Vec<Action> {
        let finished = self.controller.pointer_up(&mut self.template);
        let mut actions = Vec::new();
        if finished.is_some() {
            actions.push(Action::Redraw);
        }
        if !self.guides.is_empty() {
            self.guides.clear();
            actions.push(Action::GuidesChanged(Vec::new()));
        }
        actions
    }

    // --- Output ---

    /// Rasterize the scene at the current zoom for on-screen preview.
    #[must_use]
    pub fn render_preview(&self) -> RgbaImage {
        raster::render(&self.template, self.zoom(), &self.images, &self.fonts)
    }

    /// Export the template as PNG bytes at 1:1 scale. Selection and guides
    /// are display state, not document state, so they are dropped first
    /// and never appear in the output.
    pub fn export_png(&mut self) -> Result<Vec<u8>, EngineError> {
        self.selection = None;
        self.guides.clear();
        let rendered = raster::render(&self.template, 1.0, &self.images, &self.fonts);
        raster::encode_png(&rendered)
    }

    // --- Persistence ---

    pub fn load_from(store: &dyn TemplateStore, id: &str) -> Result<Option<Self>, EngineError> {
        Ok(store.load(id)?.map(Self::new))
    }

    pub fn save_to(&self, store: &mut dyn TemplateStore) -> Result<(), EngineError> {
        store.save(&self.template)
    }
}

fn point_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let len_sq = abx * abx + aby * aby;
    if len_sq == 0.0 {
        return (p.x - a.x).hypot(p.y - a.y);
    }
    let t = (((p.x - a.x) * abx + (p.y - a.y) * aby) / len_sq).clamp(0.0, 1.0);
    (p.x - a.x - abx * t).hypot(p.y - a.y - aby * t)
}
