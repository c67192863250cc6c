//! # Color
//!
//! RGBA color parsed from `#rrggbb` / `#aarrggbb` attribute strings.

use serde::{Deserialize, Serialize};

/// Linear RGBA color, components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    /// Error previews are drawn in red.
    pub const RED: Color = Color {
        r: 1.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };

    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parses `#rrggbb` or `#aarrggbb`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use skeletal_model::Color;
    ///
    /// let c = Color::parse("#ff8000").unwrap();
    /// assert!((c.r - 1.0).abs() < 1e-6);
    /// assert!((c.g - 0.50196).abs() < 1e-4);
    /// assert_eq!(c.b, 0.0);
    /// ```
    pub fn parse(value: &str) -> Option<Self> {
        let hex = value.strip_prefix('#')?;
        let byte = |range: std::ops::Range<usize>| -> Option<f32> {
            u8::from_str_radix(hex.get(range)?, 16)
                .ok()
                .map(|b| f32::from(b) / 255.0)
        };
        match hex.len() {
            6 => Some(Self {
                r: byte(0..2)?,
                g: byte(2..4)?,
                b: byte(4..6)?,
                a: 1.0,
            }),
            8 => Some(Self {
                a: byte(0..2)?,
                r: byte(2..4)?,
                g: byte(4..6)?,
                b: byte(6..8)?,
            }),
            _ => None,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}
