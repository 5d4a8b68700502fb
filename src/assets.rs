//! Decoded-bitmap store for image elements.
//!
//! The engine never performs network or file I/O on its own. Hosts decode
//! remote sources however they like and insert the pixels here keyed by the
//! element's `src` string; `data:` URIs are the one source the store can
//! resolve by itself, since the bytes are embedded in the string.

#[cfg(test)]
#[path = "assets_test.rs"]
mod assets_test;

use std::collections::HashMap;

use base64::Engine as _;
use image::RgbaImage;

use crate::error::EngineError;

/// Bitmaps available to the compositor, keyed by element source string.
#[derive(Debug, Default)]
pub struct ImageStore {
    bitmaps: HashMap<String, RgbaImage>,
}

impl ImageStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a host-decoded bitmap under the given source key.
    pub fn insert(&mut self, src: impl Into<String>, bitmap: RgbaImage) {
        self.bitmaps.insert(src.into(), bitmap);
    }

    #[must_use]
    pub fn get(&self, src: &str) -> Option<&RgbaImage> {
        self.bitmaps.get(src)
    }

    #[must_use]
    pub fn contains(&self, src: &str) -> bool {
        self.bitmaps.contains_key(src)
    }

    /// Natural pixel size of a stored bitmap.
    #[must_use]
    pub fn natural_size(&self, src: &str) -> Option<(f64, f64)> {
        self.bitmaps.get(src).map(|b| (f64::from(b.width()), f64::from(b.height())))
    }

    /// Ensure `src` is decoded and stored. Only `data:` URIs can be resolved
    /// here; anything else must have been inserted by the host first.
    pub fn resolve(&mut self, src: &str) -> Result<(), EngineError> {
        if self.bitmaps.contains_key(src) {
            return Ok(());
        }
        let bitmap = decode_data_uri(src)?;
        self.bitmaps.insert(src.to_owned(), bitmap);
        Ok(())
    }
}

/// Decode a `data:<mime>;base64,<payload>` URI into pixels.
pub fn decode_data_uri(src: &str) -> Result<RgbaImage, EngineError> {
    let Some(rest) = src.strip_prefix("data:") else {
        return Err(EngineError::UnsupportedSource(truncate_src(src)));
    };
    let Some((_mime, payload)) = rest.split_once(";base64,") else {
        return Err(EngineError::UnsupportedSource(truncate_src(src)));
    };
    let bytes = base64::engine::general_purpose::STANDARD.decode(payload.trim())?;
    Ok(image::load_from_memory(&bytes)?.to_rgba8())
}

// Source strings can be megabytes of base64; keep error text readable.
fn truncate_src(src: &str) -> String {
    const MAX: usize = 64;
    if src.len() <= MAX {
        src.to_owned()
    } else {
        let cut = src.char_indices().take(MAX).last().map_or(0, |(i, c)| i + c.len_utf8());
        format!("{}...", &src[..cut])
    }
}
