//! The renderer's "nodes initialized" signal.
//!
//! Callbacks registered on [`NodesInitialized`] run every time the renderer
//! finishes a measurement pass. A callback decides when it is finished by
//! returning [`Delivery::Done`]; the hub then drops it and deactivates its
//! [`Subscription`], so it can never run again.

use std::{cell::Cell, fmt, rc::Rc};

use log::trace;

use crate::renderer::LiveNodes;

/// What a callback wants after it ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The callback is finished and must be deregistered.
    Done,
    /// Keep the callback for the next notification.
    Pending,
}

type Callback = Box<dyn FnMut(&mut dyn LiveNodes) -> Delivery>;

struct Listener {
    id: u64,
    active: Rc<Cell<bool>>,
    callback: Callback,
}

/// Handle to a registered callback.
///
/// Dropping the handle does not deregister the callback; call
/// [`Subscription::cancel`] for that.
#[derive(Clone)]
pub struct Subscription {
    id: u64,
    active: Rc<Cell<bool>>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// True until the callback finished or was cancelled.
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Deregisters the callback without running it.
    pub fn cancel(&self) {
        self.active.set(false);
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

/// Registry of callbacks waiting for the renderer to measure nodes.
#[derive(Default)]
pub struct NodesInitialized {
    next_id: u64,
    listeners: Vec<Listener>,
}

impl NodesInitialized {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` and returns its handle.
    pub fn subscribe<F>(&mut self, callback: F) -> Subscription
    where
        F: FnMut(&mut dyn LiveNodes) -> Delivery + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;

        let active = Rc::new(Cell::new(true));
        self.listeners.push(Listener {
            id,
            active: Rc::clone(&active),
            callback: Box::new(callback),
        });
        trace!(subscription = id; "Subscribed to nodes initialized");

        Subscription { id, active }
    }

    /// Number of callbacks still waiting.
    pub fn pending(&self) -> usize {
        self.listeners.iter().filter(|l| l.active.get()).count()
    }

    /// Runs every active callback against `nodes` and returns how many ran.
    pub fn notify(&mut self, nodes: &mut dyn LiveNodes) -> usize {
        self.listeners.retain(|listener| listener.active.get());

        let mut delivered = 0;
        for listener in &mut self.listeners {
            if !listener.active.get() {
                continue;
            }
            delivered += 1;
            if (listener.callback)(&mut *nodes) == Delivery::Done {
                listener.active.set(false);
                trace!(subscription = listener.id; "Subscription finished");
            }
        }

        self.listeners.retain(|listener| listener.active.get());
        delivered
    }
}

impl fmt::Debug for NodesInitialized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodesInitialized")
            .field("pending", &self.pending())
            .finish()
    }
}
