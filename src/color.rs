//! CSS color string parsing.
//!
//! Element styles carry colors as CSS strings in persisted records
//! (`"#d94b4b"`, `"rgb(30, 144, 255)"`, `"rgba(0,0,0,0.5)"`, `"white"`).
//! The rasterizer needs concrete RGBA bytes, so this module parses the
//! subset of CSS color syntax that templates actually use.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

use crate::error::EngineError;

/// An RGBA color with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };

    #[must_use]
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[must_use]
    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a CSS color string.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidColor`] when the string is not a
    /// recognized hex, `rgb()`/`rgba()`, or named color.
    pub fn parse(input: &str) -> Result<Self, EngineError> {
        let s = input.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| EngineError::InvalidColor(input.to_owned()));
        }
        let lower = s.to_ascii_lowercase();
        if lower.starts_with("rgb(") || lower.starts_with("rgba(") {
            return parse_rgb_func(&lower).ok_or_else(|| EngineError::InvalidColor(input.to_owned()));
        }
        named(&lower).ok_or_else(|| EngineError::InvalidColor(input.to_owned()))
    }

    /// Parse a CSS color string, falling back to `fallback` on any error.
    ///
    /// Render paths use this so one malformed color never aborts a paint.
    #[must_use]
    pub fn parse_or(input: &str, fallback: Color) -> Self {
        Self::parse(input).unwrap_or(fallback)
    }

    /// Scale alpha by an opacity percentage in `0..=100`.
    #[must_use]
    pub fn with_opacity(self, percent: f64) -> Self {
        let factor = (percent / 100.0).clamp(0.0, 1.0);
        let a = (f64::from(self.a) * factor).round();
        Self { a: a.clamp(0.0, 255.0) as u8, ..self }
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    let expand = |c: u8| c * 17;
    let digit = |c: char| c.to_digit(16).map(|d| d as u8);
    let chars: Vec<char> = hex.chars().collect();
    match chars.len() {
        3 | 4 => {
            let r = expand(digit(chars[0])?);
            let g = expand(digit(chars[1])?);
            let b = expand(digit(chars[2])?);
            let a = if chars.len() == 4 { expand(digit(chars[3])?) } else { 255 };
            Some(Color::rgba(r, g, b, a))
        }
        6 | 8 => {
            let byte = |i: usize| -> Option<u8> { Some(digit(chars[i])? * 16 + digit(chars[i + 1])?) };
            let r = byte(0)?;
            let g = byte(2)?;
            let b = byte(4)?;
            let a = if chars.len() == 8 { byte(6)? } else { 255 };
            Some(Color::rgba(r, g, b, a))
        }
        _ => None,
    }
}

fn parse_rgb_func(lower: &str) -> Option<Color> {
    let inner = lower.split_once('(')?.1.strip_suffix(')')?;
    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }
    let channel = |s: &str| -> Option<u8> {
        let v: f64 = s.parse().ok()?;
        if v.is_finite() { Some(v.clamp(0.0, 255.0).round() as u8) } else { None }
    };
    let r = channel(parts[0])?;
    let g = channel(parts[1])?;
    let b = channel(parts[2])?;
    let a = if parts.len() == 4 {
        let v: f64 = parts[3].parse().ok()?;
        if !v.is_finite() {
            return None;
        }
        (v.clamp(0.0, 1.0) * 255.0).round() as u8
    } else {
        255
    };
    Some(Color::rgba(r, g, b, a))
}

fn named(lower: &str) -> Option<Color> {
    let c = match lower {
        "black" => Color::BLACK,
        "white" => Color::WHITE,
        "transparent" | "none" => Color::TRANSPARENT,
        "red" => Color::rgb(255, 0, 0),
        "green" => Color::rgb(0, 128, 0),
        "blue" => Color::rgb(0, 0, 255),
        "gray" | "grey" => Color::rgb(128, 128, 128),
        "yellow" => Color::rgb(255, 255, 0),
        "orange" => Color::rgb(255, 165, 0),
        _ => return None,
    };
    Some(c)
}
