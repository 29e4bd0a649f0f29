//! Marker and lane colors.
//!
//! Colors come in from configuration as CSS color strings and leave in the
//! layout output as normalized hex strings.

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::{DynamicColor, Srgb};
use serde::{Serialize, Serializer};

/// A parsed CSS color.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color(DynamicColor);

impl Color {
    /// Parses any CSS color: hex, `rgb(...)`, or a named color.
    ///
    /// ```
    /// use procession_core::color::Color;
    ///
    /// assert_eq!(Color::new("teal").unwrap().to_hex_string(), "#008080");
    /// assert!(Color::new("#12").is_err());
    /// ```
    pub fn new(css: &str) -> Result<Self, String> {
        DynamicColor::from_str(css)
            .map(Self)
            .map_err(|err| format!("invalid color `{css}`: {err}"))
    }

    /// `#rrggbb`, or `#rrggbbaa` for translucent colors.
    pub fn to_hex_string(self) -> String {
        let rgba = self.0.to_alpha_color::<Srgb>().to_rgba8();
        let (r, g, b, a) = (rgba.r, rgba.g, rgba.b, rgba.a);
        if a == u8::MAX {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_hex_string().hash(state);
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex_string())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
