//! Configuration types for the pipecanvas editor and layout engine.
//!
//! All types implement [`serde::Deserialize`] with defaults on every field,
//! so a partial TOML file only overrides what it names.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and style settings.
//! - [`LayoutConfig`] - Direction, spacing and placeholder size used by the layout engine.
//! - [`StyleConfig`] - The background palette new nodes draw their color from.
//!
//! # Example
//!
//! ```
//! # use pipecanvas::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.validate().is_ok());
//! assert_eq!(config.style().palette().unwrap().len(), 16);
//! ```

use serde::Deserialize;

use pipecanvas_core::{
    color::Palette,
    geometry::Size,
    model::Direction,
};

use crate::error::CanvasError;

/// Top-level application configuration combining layout and style settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified layout and style configurations.
    pub fn new(layout: LayoutConfig, style: StyleConfig) -> Self {
        Self { layout, style }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Checks every section for values the editor cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Config`] describing the first invalid value.
    pub fn validate(&self) -> Result<(), CanvasError> {
        self.layout.validate()?;
        self.style.palette()?;
        Ok(())
    }
}

/// Where a laid out node's `position` sits on its box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionOrigin {
    /// `position` is the centre of the node.
    #[default]
    Center,
    /// `position` is the top-left corner of the node.
    TopLeft,
}

/// Width and height of the size assumed for unmeasured nodes.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SizeConfig {
    #[serde(default = "default_placeholder_width")]
    width: f32,
    #[serde(default = "default_placeholder_height")]
    height: f32,
}

fn default_placeholder_width() -> f32 {
    200.0
}

fn default_placeholder_height() -> f32 {
    50.0
}

impl SizeConfig {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn to_size(self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl Default for SizeConfig {
    fn default() -> Self {
        Self::new(default_placeholder_width(), default_placeholder_height())
    }
}

/// Layout engine settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Flow direction used when no direction is given explicitly.
    direction: Direction,

    /// Minimum gap between two real nodes in the same rank.
    node_spacing: f32,

    /// Gap contributed by the dummy vertices of long edges.
    edge_spacing: f32,

    /// Gap between adjacent ranks.
    rank_spacing: f32,

    /// Size assumed for nodes the renderer has not measured yet.
    placeholder: SizeConfig,

    /// Maximum number of crossing-reduction sweeps.
    ordering_passes: usize,

    /// Anchor of the emitted positions.
    position_origin: PositionOrigin,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            direction: Direction::default(),
            node_spacing: 50.0,
            edge_spacing: 10.0,
            rank_spacing: 50.0,
            placeholder: SizeConfig::default(),
            ordering_passes: 24,
            position_origin: PositionOrigin::default(),
        }
    }
}

impl LayoutConfig {
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn node_spacing(&self) -> f32 {
        self.node_spacing
    }

    pub fn edge_spacing(&self) -> f32 {
        self.edge_spacing
    }

    pub fn rank_spacing(&self) -> f32 {
        self.rank_spacing
    }

    pub fn placeholder(&self) -> Size {
        self.placeholder.to_size()
    }

    pub fn ordering_passes(&self) -> usize {
        self.ordering_passes
    }

    pub fn position_origin(&self) -> PositionOrigin {
        self.position_origin
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_position_origin(mut self, origin: PositionOrigin) -> Self {
        self.position_origin = origin;
        self
    }

    pub fn with_placeholder(mut self, placeholder: SizeConfig) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn with_spacing(mut self, node_spacing: f32, edge_spacing: f32, rank_spacing: f32) -> Self {
        self.node_spacing = node_spacing;
        self.edge_spacing = edge_spacing;
        self.rank_spacing = rank_spacing;
        self
    }

    pub fn with_ordering_passes(mut self, passes: usize) -> Self {
        self.ordering_passes = passes;
        self
    }

    /// # Errors
    ///
    /// Returns [`CanvasError::Config`] for negative or non-finite spacing
    /// and for a placeholder that is not strictly positive.
    pub fn validate(&self) -> Result<(), CanvasError> {
        let spacings = [
            ("node_spacing", self.node_spacing),
            ("edge_spacing", self.edge_spacing),
            ("rank_spacing", self.rank_spacing),
        ];
        for (name, value) in spacings {
            if !value.is_finite() || value < 0.0 {
                return Err(CanvasError::Config(format!(
                    "layout.{name} must be a non-negative number, got {value}"
                )));
            }
        }

        let placeholder = self.placeholder();
        if !placeholder.is_valid() || placeholder.width() <= 0.0 || placeholder.height() <= 0.0 {
            return Err(CanvasError::Config(format!(
                "layout.placeholder must be strictly positive, got {}x{}",
                placeholder.width(),
                placeholder.height()
            )));
        }
        Ok(())
    }
}

/// Visual styling configuration.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    /// CSS colors replacing the default background palette.
    #[serde(default)]
    palette: Option<Vec<String>>,
}

impl StyleConfig {
    pub fn new(palette: Option<Vec<String>>) -> Self {
        Self { palette }
    }

    /// Returns the configured palette, or the default one if none is set.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Config`] if the list is empty or contains a
    /// string that is not a CSS color.
    pub fn palette(&self) -> Result<Palette, CanvasError> {
        match &self.palette {
            None => Ok(Palette::default()),
            Some(colors) => Palette::parse(colors)
                .map_err(|err| CanvasError::Config(format!("Invalid palette in config: {err}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_defaults() {
        let layout = LayoutConfig::default();
        assert_eq!(layout.direction(), Direction::LR);
        assert_eq!(layout.node_spacing(), 50.0);
        assert_eq!(layout.edge_spacing(), 10.0);
        assert_eq!(layout.rank_spacing(), 50.0);
        assert_eq!(layout.placeholder(), Size::new(200.0, 50.0));
        assert_eq!(layout.ordering_passes(), 24);
        assert_eq!(layout.position_origin(), PositionOrigin::Center);
    }

    #[test]
    fn test_negative_spacing_rejected() {
        let layout = LayoutConfig::default().with_spacing(-1.0, 10.0, 50.0);
        assert!(matches!(layout.validate(), Err(CanvasError::Config(_))));
    }

    #[test]
    fn test_zero_placeholder_rejected() {
        let layout = LayoutConfig::default().with_placeholder(SizeConfig::new(0.0, 50.0));
        assert!(matches!(layout.validate(), Err(CanvasError::Config(_))));
    }

    #[test]
    fn test_palette_override() {
        let style = StyleConfig::new(Some(vec!["red".to_string(), "#00FF00".to_string()]));
        assert_eq!(style.palette().unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_palette() {
        let empty = StyleConfig::new(Some(Vec::new()));
        assert!(matches!(empty.palette(), Err(CanvasError::Config(_))));

        let bad = StyleConfig::new(Some(vec!["definitely-not-a-color".to_string()]));
        assert!(matches!(bad.palette(), Err(CanvasError::Config(_))));

        let config = AppConfig::new(LayoutConfig::default(), bad);
        assert!(config.validate().is_err());
    }
}
