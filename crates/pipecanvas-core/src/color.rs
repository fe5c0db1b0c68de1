//! Node colors and the palette new nodes draw their background from.
//!
//! [`Color`] validates a CSS color string with `DynamicColor` from the color
//! crate and keeps the string as written. [`Palette`] is the fixed, non-empty
//! list a freshly dropped node picks its background color from.

use std::{fmt, str::FromStr};

use color::DynamicColor;
use thiserror::Error;

/// Errors raised while building colors and palettes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("invalid color `{input}`: {reason}")]
    Invalid { input: String, reason: String },

    #[error("palette must contain at least one color")]
    EmptyPalette,
}

/// A validated CSS color.
///
/// Displays as the string it was parsed from, so `#E3F2FD` stays `#E3F2FD`
/// instead of being re-encoded from the parsed components.
#[derive(Clone, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
    source: String,
}

impl Eq for Color {}

impl Color {
    /// Parses a CSS color string such as `"#E3F2FD"`, `"rgb(0, 0, 0)"` or `"white"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pipecanvas_core::color::Color;
    ///
    /// let sky = Color::new("#E3F2FD").unwrap();
    /// assert_eq!(sky.to_string(), "#E3F2FD");
    /// assert!(Color::new("not-a-color").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, ColorError> {
        let source = color_str.trim();
        DynamicColor::from_str(source)
            .map(|color| Self {
                color,
                source: source.to_string(),
            })
            .map_err(|err| ColorError::Invalid {
                input: color_str.to_string(),
                reason: err.to_string(),
            })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Soft background colors used by the editor unless configured otherwise.
pub const DEFAULT_PALETTE: [&str; 16] = [
    "#F0F4F8", "#E3F2FD", "#E8F5E9", "#F3E5F5", "#FFF3E0", "#FBE9E7", "#E0F7FA", "#F1F8E9",
    "#FCE4EC", "#EDE7F6", "#E8F5E6", "#FFEBEE", "#E0F2F1", "#F5F5F5", "#FFF8E1", "#EFEBE9",
];

/// An ordered, non-empty list of colors.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// Builds a palette from already parsed colors.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::EmptyPalette`] when `colors` is empty.
    pub fn new(colors: Vec<Color>) -> Result<Self, ColorError> {
        if colors.is_empty() {
            return Err(ColorError::EmptyPalette);
        }
        Ok(Self { colors })
    }

    /// Parses every entry as a CSS color.
    ///
    /// # Examples
    ///
    /// ```
    /// use pipecanvas_core::color::Palette;
    ///
    /// let palette = Palette::parse(["#FFFFFF", "black"]).unwrap();
    /// assert_eq!(palette.len(), 2);
    /// assert!(Palette::parse(Vec::<String>::new()).is_err());
    /// ```
    pub fn parse<I, S>(colors: I) -> Result<Self, ColorError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let colors = colors
            .into_iter()
            .map(|c| Color::new(c.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(colors)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Returns the color at `index`, wrapping around the palette length.
    pub fn get(&self, index: usize) -> &Color {
        &self.colors[index % self.colors.len()]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::parse(DEFAULT_PALETTE).expect("default palette colors are valid CSS")
    }
}
