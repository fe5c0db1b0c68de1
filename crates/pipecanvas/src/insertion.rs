//! Turns a drop on the canvas into a new pipeline node.

use log::{debug, info};
use rand::{Rng, SeedableRng, rngs::StdRng};

use pipecanvas_core::{
    color::Palette,
    geometry::Point,
    identifier::Id,
    model::{Direction, Node, NodeData, NodeStyle},
};

use crate::{
    error::CanvasError,
    feedback,
    renderer::Viewport,
    session::{DragEvent, DraggedItem},
    store::GraphStore,
    subscription::{NodesInitialized, Subscription},
};

/// Presentation class given to every node created from the palette.
pub const NODE_CLASS: &str = "pipeline-node";

/// Outcome of a successful drop.
#[derive(Debug, Clone)]
pub struct Insertion {
    node_id: Id,
    drop_point: Point,
    subscription: Subscription,
}

impl Insertion {
    pub fn node_id(&self) -> Id {
        self.node_id
    }

    /// Canvas coordinates of the drop.
    pub fn drop_point(&self) -> Point {
        self.drop_point
    }

    /// Handle of the pending recenter callback.
    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }
}

/// Builds nodes from dropped palette entries and commits them to a store.
#[derive(Debug)]
pub struct InsertionController {
    direction: Direction,
    palette: Palette,
    rng: StdRng,
}

impl InsertionController {
    /// Creates a controller whose background colors are drawn from a randomly seeded generator.
    pub fn new(direction: Direction, palette: Palette) -> Self {
        Self {
            direction,
            palette,
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Creates a controller with reproducible background colors.
    pub fn with_seed(direction: Direction, palette: Palette, seed: u64) -> Self {
        Self {
            direction,
            palette,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Changes the flow direction used for the anchor sides of new nodes.
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Inserts the node for `dragged` at the drop position of `event`.
    ///
    /// Returns `Ok(None)` without touching the store when nothing was being
    /// dragged. On success the node's position is the drop point until the
    /// renderer measures it; a callback registered on `initialized` then
    /// shifts it by half the measured size so the drop point becomes the
    /// node's visual centre.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidDropEvent`] if the event carries no
    /// usable client coordinates.
    pub fn handle_drop(
        &mut self,
        event: &mut DragEvent,
        dragged: Option<DraggedItem>,
        viewport: &dyn Viewport,
        store: &mut GraphStore,
        initialized: &mut NodesInitialized,
    ) -> Result<Option<Insertion>, CanvasError> {
        event.prevent_default();

        let Some(dragged) = dragged else {
            debug!("Drop without an active drag, ignoring");
            return Ok(None);
        };

        let client = event.client().ok_or_else(|| {
            CanvasError::InvalidDropEvent("drop event has no client coordinates".to_string())
        })?;
        if !client.is_finite() {
            return Err(CanvasError::InvalidDropEvent(format!(
                "drop coordinates are not finite: ({}, {})",
                client.x(),
                client.y()
            )));
        }

        let drop_point = viewport.screen_to_canvas(client);
        if !drop_point.is_finite() {
            return Err(CanvasError::InvalidDropEvent(format!(
                "viewport mapped ({}, {}) to a non-finite canvas point",
                client.x(),
                client.y()
            )));
        }

        let node = self.build_node(&dragged, drop_point);
        let node_id = node.id();
        store.insert(node);

        let subscription =
            initialized.subscribe(feedback::recenter_on_measure(node_id, drop_point));

        info!(
            node = node_id.to_string(),
            kind = dragged.kind().to_string(),
            x = drop_point.x(),
            y = drop_point.y();
            "Inserted node"
        );

        Ok(Some(Insertion {
            node_id,
            drop_point,
            subscription,
        }))
    }

    fn build_node(&mut self, dragged: &DraggedItem, drop_point: Point) -> Node {
        let payload = dragged.payload();
        let style = NodeStyle::new(self.next_color()).with_class(NODE_CLASS);

        Node::new(payload.id(), dragged.kind())
            .with_position(drop_point)
            .with_style(style)
            .with_data(NodeData::new(payload.name(), payload.name()))
            .with_anchors(self.direction.anchor_sides())
    }

    fn next_color(&mut self) -> String {
        let index = self.rng.random_range(0..self.palette.len());
        self.palette.get(index).to_string()
    }
}
