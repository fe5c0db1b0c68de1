//! Value records describing a pipeline graph.
//!
//! Nodes and edges are immutable values: every change produces a new record
//! through the `with_*` builders, and whoever holds the canonical list
//! (the graph store, or an external renderer) swaps records in wholesale.
//!
//! The serde shape matches what canvas renderers exchange as JSON:
//!
//! ```json
//! {
//!   "id": "svc-1",
//!   "type": "task",
//!   "position": { "x": 100.0, "y": 100.0 },
//!   "style": { "backgroundColor": "#E3F2FD", "class": "pipeline-node" },
//!   "data": { "label": "Fetch", "predecessors": [], "successors": [], "serviceRef": "Fetch" },
//!   "sourcePosition": "right",
//!   "targetPosition": "left"
//! }
//! ```

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    geometry::{Point, Size},
    identifier::Id,
};

/// Flow direction of a layered layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Left to right
    #[default]
    LR,
    /// Right to left
    RL,
    /// Top to bottom
    #[serde(alias = "TD")]
    TB,
    /// Bottom to top
    BT,
}

/// Error returned when a direction string is not one of `LR`, `RL`, `TB`/`TD`, `BT`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown direction `{0}`; use LR, RL, TB (or TD), or BT")]
pub struct ParseDirectionError(String);

impl Direction {
    /// True when ranks advance along the x axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::LR | Direction::RL)
    }

    /// Connection sides that make edges leave and enter nodes along the flow.
    ///
    /// # Examples
    ///
    /// ```
    /// use pipecanvas_core::model::{AnchorSide, Direction};
    ///
    /// let sides = Direction::LR.anchor_sides();
    /// assert_eq!(sides.source(), AnchorSide::Right);
    /// assert_eq!(sides.target(), AnchorSide::Left);
    ///
    /// let sides = Direction::TB.anchor_sides();
    /// assert_eq!(sides.source(), AnchorSide::Bottom);
    /// assert_eq!(sides.target(), AnchorSide::Top);
    /// ```
    pub fn anchor_sides(self) -> AnchorSides {
        match self {
            Direction::LR => AnchorSides::new(AnchorSide::Right, AnchorSide::Left),
            Direction::RL => AnchorSides::new(AnchorSide::Left, AnchorSide::Right),
            Direction::TB => AnchorSides::new(AnchorSide::Bottom, AnchorSide::Top),
            Direction::BT => AnchorSides::new(AnchorSide::Top, AnchorSide::Bottom),
        }
    }
}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LR" => Ok(Direction::LR),
            "RL" => Ok(Direction::RL),
            "TB" | "TD" => Ok(Direction::TB),
            "BT" => Ok(Direction::BT),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::LR => "LR",
            Direction::RL => "RL",
            Direction::TB => "TB",
            Direction::BT => "BT",
        };
        f.write_str(name)
    }
}

/// The side of a node's box where connectors attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorSide {
    Left,
    Right,
    Top,
    Bottom,
}

/// Outgoing (`source`) and incoming (`target`) connector sides of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnchorSides {
    #[serde(rename = "sourcePosition", default = "default_source_side")]
    source: AnchorSide,
    #[serde(rename = "targetPosition", default = "default_target_side")]
    target: AnchorSide,
}

fn default_source_side() -> AnchorSide {
    Direction::default().anchor_sides().source
}

fn default_target_side() -> AnchorSide {
    Direction::default().anchor_sides().target
}

impl AnchorSides {
    pub fn new(source: AnchorSide, target: AnchorSide) -> Self {
        Self { source, target }
    }

    pub fn source(self) -> AnchorSide {
        self.source
    }

    pub fn target(self) -> AnchorSide {
        self.target
    }
}

impl Default for AnchorSides {
    fn default() -> Self {
        Direction::default().anchor_sides()
    }
}

/// A service entry from the palette, carried by a drag gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    id: Id,
    name: String,
}

impl PaletteEntry {
    pub fn new(id: impl Into<Id>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Presentation hints stored on a node; opaque to layout.
///
/// The background color is kept as the renderer wrote it. Values such as
/// `var(--node-bg)` are not CSS colors the core could parse, and they must
/// survive a layout pass untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    class: Option<String>,
}

impl NodeStyle {
    pub fn new(background_color: impl Into<String>) -> Self {
        Self {
            background_color: Some(background_color.into()),
            class: None,
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn background_color(&self) -> Option<&str> {
        self.background_color.as_deref()
    }

    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }
}

/// Pipeline payload of a node.
///
/// `predecessors` and `successors` mirror the edges touching the node and are
/// maintained by the graph store when edges are connected or removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    #[serde(default)]
    label: String,
    #[serde(default, alias = "prev")]
    predecessors: Vec<Id>,
    #[serde(default, alias = "succ")]
    successors: Vec<Id>,
    #[serde(default, alias = "service_id")]
    service_ref: String,
}

impl NodeData {
    pub fn new(label: impl Into<String>, service_ref: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            predecessors: Vec::new(),
            successors: Vec::new(),
            service_ref: service_ref.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn predecessors(&self) -> &[Id] {
        &self.predecessors
    }

    pub fn successors(&self) -> &[Id] {
        &self.successors
    }

    pub fn service_ref(&self) -> &str {
        &self.service_ref
    }

    /// Returns a copy with `id` appended to the predecessors, if not already present.
    pub fn with_predecessor(mut self, id: Id) -> Self {
        if !self.predecessors.contains(&id) {
            self.predecessors.push(id);
        }
        self
    }

    /// Returns a copy with `id` appended to the successors, if not already present.
    pub fn with_successor(mut self, id: Id) -> Self {
        if !self.successors.contains(&id) {
            self.successors.push(id);
        }
        self
    }

    /// Returns a copy whose neighbour lists are replaced wholesale.
    pub fn with_neighbours(mut self, predecessors: Vec<Id>, successors: Vec<Id>) -> Self {
        self.predecessors = predecessors;
        self.successors = successors;
        self
    }

    /// Returns a copy with `id` removed from both neighbour lists.
    pub fn without_neighbour(mut self, id: Id) -> Self {
        self.predecessors.retain(|p| *p != id);
        self.successors.retain(|s| *s != id);
        self
    }

    /// Returns a copy with `id` removed from the predecessors only.
    pub fn without_predecessor(mut self, id: Id) -> Self {
        self.predecessors.retain(|p| *p != id);
        self
    }

    /// Returns a copy with `id` removed from the successors only.
    pub fn without_successor(mut self, id: Id) -> Self {
        self.successors.retain(|s| *s != id);
        self
    }
}

fn default_kind() -> Id {
    Id::new("default")
}

/// A node on the canvas.
///
/// `dimensions` stays `None` until the renderer measures the node; the core
/// never invents a measurement, it only substitutes a placeholder size inside
/// the layout computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    id: Id,
    #[serde(rename = "type", default = "default_kind")]
    kind: Id,
    #[serde(default)]
    position: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dimensions: Option<Size>,
    #[serde(default)]
    style: NodeStyle,
    #[serde(default)]
    data: NodeData,
    #[serde(flatten)]
    anchors: AnchorSides,
}

impl Node {
    /// Creates an unmeasured node at the origin with default style and data.
    pub fn new(id: impl Into<Id>, kind: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            position: Point::default(),
            dimensions: None,
            style: NodeStyle::default(),
            data: NodeData::default(),
            anchors: AnchorSides::default(),
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn kind(&self) -> Id {
        self.kind
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn dimensions(&self) -> Option<Size> {
        self.dimensions
    }

    pub fn style(&self) -> &NodeStyle {
        &self.style
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    pub fn anchors(&self) -> AnchorSides {
        self.anchors
    }

    pub fn with_position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    pub fn with_dimensions(mut self, dimensions: Size) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    pub fn with_style(mut self, style: NodeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_data(mut self, data: NodeData) -> Self {
        self.data = data;
        self
    }

    pub fn with_anchors(mut self, anchors: AnchorSides) -> Self {
        self.anchors = anchors;
        self
    }
}

/// A directed connection between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    source: Id,
    target: Id,
}

impl Edge {
    pub fn new(source: impl Into<Id>, target: impl Into<Id>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }

    /// True if the edge starts and ends at the same node.
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }

    /// True if either endpoint is `id`.
    pub fn touches(&self, id: Id) -> bool {
        self.source == id || self.target == id
    }
}
