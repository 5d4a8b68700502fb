//! Layered template composition engine.
//!
//! This crate owns the full lifecycle of a card/label template: the element
//! model (images, text, shapes, lines) with a layer list as the single
//! source of paint order, pointer-driven editing (drag, resize, rotate,
//! crop) with alignment snapping, and a from-scratch rasterizer that
//! renders the same model to RGBA pixels and PNG bytes. A host embeds
//! [`engine::Engine`], feeds it pointer events in screen space, and applies
//! the returned [`engine::Action`]s to its display layer.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Session facade: selection, gestures, hit-testing, export |
//! | [`template`] | Document aggregate and the layer-order invariant |
//! | [`element`] | Element kinds, style records, and uniform views |
//! | [`transform`] | Pointer-gesture state machine (drag/resize/rotate/crop) |
//! | [`guides`] | Alignment guide detection and snap correction |
//! | [`fit`] | Cover/contain math and the interactive crop session |
//! | [`raster`] | Pixel canvas, text and image rasterization, compositor |
//! | [`assets`] | Decoded-bitmap store; resolves `data:` URIs |
//! | [`color`] | CSS-style color parsing |
//! | [`geom`] | Points, rects, rotation helpers |
//! | [`consts`] | Shared numeric constants (snap threshold, minimum sizes) |

pub mod assets;
pub mod color;
pub mod consts;
pub mod element;
pub mod engine;
pub mod error;
pub mod fit;
pub mod geom;
pub mod guides;
pub mod raster;
pub mod template;
pub mod transform;

pub use assets::ImageStore;
pub use color::Color;
pub use element::{Element, ElementId};
pub use engine::{Action, Engine, TemplateStore};
pub use error::EngineError;
pub use geom::{Point, Rect};
pub use raster::FontStore;
pub use template::Template;
