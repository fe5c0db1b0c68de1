//! Drag-and-drop gesture state.
//!
//! A [`DragSession`] tracks one gesture at a time: the palette entry being
//! dragged, whether the pointer is over the canvas, and the document side
//! effects that must hold while a drag is in flight (text selection off,
//! a global drop listener registered). Every way a gesture can end, from a
//! drop on the canvas to a drop outside it or a cancelled drag, returns the
//! session to [`SessionState::Idle`].
//!
//! The session is an owned value. A host that wants a single process-wide
//! session shares one instance explicitly.

use indexmap::IndexMap;
use log::{debug, trace};

use pipecanvas_core::{geometry::Point, identifier::Id, model::PaletteEntry};

/// Data transfer type under which the dragged node kind is published.
pub const NODE_MIME_TYPE: &str = "application/x-pipecanvas-node";

/// Operation a drag source allows or a drop target accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DropEffect {
    #[default]
    None,
    Copy,
    Move,
    Link,
}

/// Data carried by a drag event between source and target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTransfer {
    data: IndexMap<String, String>,
    effect_allowed: DropEffect,
    drop_effect: DropEffect,
}

impl DataTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_data(&mut self, format: &str, value: impl Into<String>) {
        self.data.insert(format.to_string(), value.into());
    }

    pub fn get_data(&self, format: &str) -> Option<&str> {
        self.data.get(format).map(String::as_str)
    }

    pub fn effect_allowed(&self) -> DropEffect {
        self.effect_allowed
    }

    pub fn set_effect_allowed(&mut self, effect: DropEffect) {
        self.effect_allowed = effect;
    }

    pub fn drop_effect(&self) -> DropEffect {
        self.drop_effect
    }

    pub fn set_drop_effect(&mut self, effect: DropEffect) {
        self.drop_effect = effect;
    }
}

/// A pointer event of a drag gesture.
///
/// `client` is `None` when the platform delivered the event without pointer
/// coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragEvent {
    client: Option<Point>,
    data_transfer: Option<DataTransfer>,
    default_prevented: bool,
}

impl DragEvent {
    /// An event at client coordinates `client`, carrying an empty data transfer.
    pub fn at(client: Point) -> Self {
        Self {
            client: Some(client),
            data_transfer: Some(DataTransfer::new()),
            default_prevented: false,
        }
    }

    /// An event without pointer coordinates.
    pub fn without_coordinates() -> Self {
        Self {
            client: None,
            data_transfer: Some(DataTransfer::new()),
            default_prevented: false,
        }
    }

    pub fn with_data_transfer(mut self, data_transfer: Option<DataTransfer>) -> Self {
        self.data_transfer = data_transfer;
        self
    }

    pub fn client(&self) -> Option<Point> {
        self.client
    }

    pub fn data_transfer(&self) -> Option<&DataTransfer> {
        self.data_transfer.as_ref()
    }

    pub fn data_transfer_mut(&mut self) -> Option<&mut DataTransfer> {
        self.data_transfer.as_mut()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Handle of a listener registered on the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Document-wide side effects of a drag gesture.
pub trait Document {
    /// Enables or disables text selection on the whole document.
    fn set_text_selection(&mut self, enabled: bool);

    /// Registers a listener that resets the session on a drop anywhere in the document.
    fn add_drop_listener(&mut self) -> ListenerId;

    fn remove_drop_listener(&mut self, id: ListenerId);
}

/// A document that is not attached to any UI; every side effect is a no-op.
#[derive(Debug, Default)]
pub struct Detached {
    next_listener: u64,
}

impl Document for Detached {
    fn set_text_selection(&mut self, _enabled: bool) {}

    fn add_drop_listener(&mut self) -> ListenerId {
        self.next_listener += 1;
        ListenerId::new(self.next_listener)
    }

    fn remove_drop_listener(&mut self, _id: ListenerId) {}
}

/// The palette entry carried by a gesture, with its node kind.
#[derive(Debug, Clone, PartialEq)]
pub struct DraggedItem {
    kind: Id,
    payload: PaletteEntry,
}

impl DraggedItem {
    pub fn new(kind: Id, payload: PaletteEntry) -> Self {
        Self { kind, payload }
    }

    pub fn kind(&self) -> Id {
        self.kind
    }

    pub fn payload(&self) -> &PaletteEntry {
        &self.payload
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    #[default]
    Idle,
    Dragging {
        item: DraggedItem,
        /// Whether the pointer is over a drop surface.
        over: bool,
    },
}

/// State machine of a drag gesture.
///
/// # Examples
///
/// ```
/// use pipecanvas::session::{DragEvent, DragSession, SessionState};
/// use pipecanvas_core::{geometry::Point, identifier::Id, model::PaletteEntry};
///
/// let mut session: DragSession = DragSession::default();
/// let mut event = DragEvent::at(Point::new(0.0, 0.0));
/// session.on_drag_start(&mut event, Id::new("task"), PaletteEntry::new("svc-1", "Fetch"));
/// assert!(session.is_dragging());
///
/// session.on_drag_end();
/// assert_eq!(session.state(), &SessionState::Idle);
/// ```
#[derive(Debug, Default)]
pub struct DragSession<D: Document = Detached> {
    state: SessionState,
    document: D,
    listener: Option<ListenerId>,
}

impl<D: Document> DragSession<D> {
    pub fn new(document: D) -> Self {
        Self {
            state: SessionState::Idle,
            document,
            listener: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, SessionState::Dragging { .. })
    }

    pub fn is_drag_over(&self) -> bool {
        matches!(self.state, SessionState::Dragging { over: true, .. })
    }

    pub fn dragged_kind(&self) -> Option<Id> {
        match &self.state {
            SessionState::Dragging { item, .. } => Some(item.kind()),
            SessionState::Idle => None,
        }
    }

    pub fn dragged_payload(&self) -> Option<&PaletteEntry> {
        match &self.state {
            SessionState::Dragging { item, .. } => Some(item.payload()),
            SessionState::Idle => None,
        }
    }

    /// Starts a gesture dragging `payload` as a node of type `kind`.
    ///
    /// A gesture that was never closed is discarded first.
    pub fn on_drag_start(&mut self, event: &mut DragEvent, kind: Id, payload: PaletteEntry) {
        if self.is_dragging() {
            debug!("Drag started while another drag was active, discarding the stale one");
        }
        self.release_listener();

        if let Some(transfer) = event.data_transfer_mut() {
            transfer.set_data(NODE_MIME_TYPE, kind.to_string());
            transfer.set_effect_allowed(DropEffect::Move);
        }

        debug!(kind = kind.to_string(), payload = payload.id().to_string(); "Drag started");
        self.state = SessionState::Dragging {
            item: DraggedItem::new(kind, payload),
            over: false,
        };
        self.document.set_text_selection(false);
        self.listener = Some(self.document.add_drop_listener());
    }

    /// Handles the pointer moving over the canvas.
    ///
    /// Always prevents the default handling so the drop event fires. Returns
    /// true if a drag is active.
    pub fn on_drag_over(&mut self, event: &mut DragEvent) -> bool {
        event.prevent_default();
        let SessionState::Dragging { over, .. } = &mut self.state else {
            return false;
        };
        *over = true;
        if let Some(transfer) = event.data_transfer_mut() {
            transfer.set_drop_effect(DropEffect::Move);
        }
        true
    }

    /// The pointer left the canvas; the gesture itself continues.
    pub fn on_drag_leave(&mut self) {
        if let SessionState::Dragging { over, .. } = &mut self.state {
            *over = false;
        }
    }

    /// The gesture ended without a drop on the canvas.
    pub fn on_drag_end(&mut self) {
        self.reset();
    }

    /// A drop landed somewhere in the document.
    pub fn on_global_drop(&mut self) {
        self.reset();
    }

    /// Takes the dragged item and resets the session.
    pub fn finish(&mut self) -> Option<DraggedItem> {
        let item = match std::mem::take(&mut self.state) {
            SessionState::Dragging { item, .. } => Some(item),
            SessionState::Idle => None,
        };
        if item.is_some() {
            self.document.set_text_selection(true);
        }
        self.release_listener();
        item
    }

    fn reset(&mut self) {
        if self.finish().is_some() {
            trace!("Drag session reset");
        }
    }

    fn release_listener(&mut self) {
        if let Some(listener) = self.listener.take() {
            self.document.remove_drop_listener(listener);
        }
    }
}
