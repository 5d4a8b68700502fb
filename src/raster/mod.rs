//! From-scratch rasterizer: pixel canvas, text, images, and the scene
//! compositor that drives them from a template's layer order.

pub mod canvas;
pub mod compositor;
pub mod image_el;
pub mod text;

pub use canvas::Canvas;
pub use compositor::{encode_png, render};
pub use text::FontStore;
