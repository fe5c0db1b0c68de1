//! Host facade tying the editing components together.

use log::info;

use pipecanvas_core::{
    geometry::Size,
    identifier::Id,
    model::{Direction, Node},
};

use crate::{
    config::AppConfig,
    error::CanvasError,
    insertion::{Insertion, InsertionController},
    layout::{Engine, Layout},
    renderer::Viewport,
    session::{DragEvent, DragSession, Document},
    store::GraphStore,
    subscription::NodesInitialized,
};

/// A pipeline editor: the graph store plus everything that mutates it.
///
/// The drag session is not owned by the editor; hosts pass theirs in so
/// several canvases can share one gesture state or keep separate ones.
///
/// # Examples
///
/// ```
/// use pipecanvas::{
///     Editor,
///     config::AppConfig,
///     renderer::Transform,
///     session::{DragEvent, DragSession},
/// };
/// use pipecanvas_core::{
///     geometry::{Point, Size},
///     identifier::Id,
///     model::PaletteEntry,
/// };
///
/// let mut editor = Editor::with_seed(&AppConfig::default(), Box::new(Transform::identity()), 1).unwrap();
/// let mut session: DragSession = DragSession::default();
///
/// let mut start = DragEvent::at(Point::new(0.0, 0.0));
/// session.on_drag_start(&mut start, Id::new("task"), PaletteEntry::new("svc-1", "Fetch"));
///
/// let mut drop = DragEvent::at(Point::new(100.0, 100.0));
/// let insertion = editor.on_drop(&mut session, &mut drop).unwrap().unwrap();
/// assert!(!session.is_dragging());
///
/// editor.report_dimensions(&insertion.node_id(), Size::new(80.0, 40.0));
/// let node = editor.store().get(&insertion.node_id()).unwrap();
/// assert_eq!(node.position(), Point::new(60.0, 80.0));
/// ```
pub struct Editor {
    store: GraphStore,
    viewport: Box<dyn Viewport>,
    initialized: NodesInitialized,
    controller: InsertionController,
    engine: Engine,
}

impl Editor {
    /// Creates an empty editor.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Config`] if `config` does not validate.
    pub fn new(config: &AppConfig, viewport: Box<dyn Viewport>) -> Result<Self, CanvasError> {
        config.validate()?;
        let controller =
            InsertionController::new(config.layout().direction(), config.style().palette()?);
        Ok(Self::assemble(config, viewport, controller))
    }

    /// Creates an empty editor whose node colors are reproducible.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Config`] if `config` does not validate.
    pub fn with_seed(
        config: &AppConfig,
        viewport: Box<dyn Viewport>,
        seed: u64,
    ) -> Result<Self, CanvasError> {
        config.validate()?;
        let controller = InsertionController::with_seed(
            config.layout().direction(),
            config.style().palette()?,
            seed,
        );
        Ok(Self::assemble(config, viewport, controller))
    }

    fn assemble(
        config: &AppConfig,
        viewport: Box<dyn Viewport>,
        controller: InsertionController,
    ) -> Self {
        Self {
            store: GraphStore::new(),
            viewport,
            initialized: NodesInitialized::new(),
            controller,
            engine: Engine::new(config.layout().clone()),
        }
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    /// Number of inserted nodes still waiting for their first measurement.
    pub fn pending_measurements(&self) -> usize {
        self.initialized.pending()
    }

    /// Handles a drop on the canvas. The session is always reset, whatever
    /// the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidDropEvent`] if the drop carries no coordinates.
    pub fn on_drop<D: Document>(
        &mut self,
        session: &mut DragSession<D>,
        event: &mut DragEvent,
    ) -> Result<Option<Insertion>, CanvasError> {
        let dragged = session.finish();
        self.controller.handle_drop(
            event,
            dragged,
            self.viewport.as_ref(),
            &mut self.store,
            &mut self.initialized,
        )
    }

    /// Records a renderer measurement and signals that nodes were initialized.
    ///
    /// Returns false if the node is unknown.
    pub fn report_dimensions(&mut self, id: &Id, size: Size) -> bool {
        if !self.store.set_dimensions(id, size) {
            return false;
        }
        self.initialized.notify(&mut self.store);
        true
    }

    /// Lays out the whole graph in `direction` and applies the positions to
    /// the store. New nodes dropped afterwards use `direction` for their
    /// anchor sides.
    pub fn auto_arrange(&mut self, direction: Direction) -> Layout {
        let nodes = self.store.to_vec();
        let layout = self.engine.calculate(&nodes, self.store.edges(), direction);
        let applied = self.store.apply_layout(layout.nodes());
        self.controller.set_direction(direction);
        info!(applied, direction:% = direction; "Auto arranged pipeline");
        layout
    }

    /// # Errors
    ///
    /// See [`GraphStore::connect`].
    pub fn connect(&mut self, source: Id, target: Id) -> Result<(), CanvasError> {
        self.store.connect(source, target)
    }

    pub fn disconnect(&mut self, source: Id, target: Id) -> bool {
        self.store.disconnect(source, target)
    }

    pub fn remove(&mut self, id: &Id) -> Option<Node> {
        self.store.remove(id)
    }

    /// # Errors
    ///
    /// See [`GraphStore::validate`].
    pub fn validate(&self) -> Result<(), CanvasError> {
        self.store.validate()
    }
}
