//! The web-side orchestrator: pending-message queue, callback table, and
//! message-id generation.
//!
//! A [`Bridge`] is single-threaded by design (one instance per web context,
//! no locks). Interior mutability lets callbacks and adapters re-enter
//! [`Bridge::send`] through a shared `Rc<Bridge>` while a send or flush is
//! still on the stack.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;
use tracing::debug;

use crate::message::{empty_data, Message, MessageId};

/// Callback invoked with each reply that carries the registered message id.
///
/// `Fn` rather than `FnMut`: the table's borrow is released before the call,
/// so a callback may freely `send`, `cancel`, or `receive` on the same
/// bridge. Callbacks needing mutable state should carry their own
/// `Cell`/`RefCell`.
pub type MessageCallback = Rc<dyn Fn(&Message)>;

/// Platform capability source and delivery mechanism, supplied once via
/// [`Bridge::set_adapter`].
///
/// The supported-component set may change over the adapter's lifetime, so
/// [`supported_components`](Adapter::supported_components) returns a fresh
/// snapshot. An empty set is the sole signal that capabilities are not yet
/// known.
pub trait Adapter {
    /// Identifier for the embedding host (e.g. `"ios"`, `"android"`).
    fn platform(&self) -> &str;

    /// Current snapshot of supported component names, in registration order.
    fn supported_components(&self) -> Vec<String>;

    /// Whether the named component is currently supported.
    fn supports_component(&self, component: &str) -> bool {
        self.supported_components().iter().any(|c| c == component)
    }

    /// Delivery primitive: hands a message to the native side. The bridge
    /// does not observe a return value or errors.
    fn receive(&self, message: &Message);
}

/// Hooks the bridge uses to surface state to its host page: a one-shot
/// readiness notification plus two attributes republished on every
/// capability change. All methods default to no-ops, so headless embedders
/// can ignore the whole trait.
pub trait Page {
    /// Fired once from [`Bridge::start`].
    fn bridge_did_start(&self) {}

    /// Platform identifier, republished when an adapter is installed.
    fn platform_changed(&self, _platform: &str) {}

    /// Space-separated supported component names, republished on every
    /// capability change.
    fn components_changed(&self, _components: &str) {}
}

struct NoopPage;

impl Page for NoopPage {}

/// Outcome of a [`Bridge::send`] call.
///
/// `Queued` and `Unsupported` are deliberately distinct: "capabilities not
/// yet known" buffers the call for a later flush, while "component known and
/// absent" rejects it outright with nothing queued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendStatus {
    /// Delivered to the adapter under the returned message id.
    Sent(MessageId),
    /// Capabilities are not yet known; the call was buffered and will be
    /// resent as a fresh call (new id) on the next flush.
    Queued,
    /// The adapter reports the component as unsupported. Not queued.
    Unsupported,
}

impl SendStatus {
    /// The generated message id, when the call was actually delivered.
    pub fn message_id(&self) -> Option<&MessageId> {
        match self {
            SendStatus::Sent(id) => Some(id),
            _ => None,
        }
    }
}

struct PendingMessage {
    component: String,
    event: String,
    data: Value,
    callback: Option<MessageCallback>,
}

/// The web-side orchestrator. One instance per web context; all state is
/// discarded with the context.
///
/// See the crate-level docs for the full lifecycle. In short:
///
/// - [`send`](Bridge::send) queues until an adapter has announced at least
///   one supported component, then delivers directly.
/// - [`receive`](Bridge::receive) correlates inbound replies to registered
///   callbacks by message id; unknown ids are silently dropped.
/// - [`set_adapter`](Bridge::set_adapter) installs the adapter and flushes
///   anything queued for newly known components.
pub struct Bridge {
    adapter: RefCell<Option<Rc<dyn Adapter>>>,
    page: Rc<dyn Page>,
    last_message_id: Cell<u64>,
    pending_messages: RefCell<Vec<PendingMessage>>,
    pending_callbacks: RefCell<HashMap<MessageId, MessageCallback>>,
}

impl Bridge {
    /// A bridge with no page hooks (headless).
    pub fn new() -> Self {
        Self::with_page(Rc::new(NoopPage))
    }

    /// A bridge that surfaces readiness and capability changes to `page`.
    pub fn with_page(page: Rc<dyn Page>) -> Self {
        Self {
            adapter: RefCell::new(None),
            page,
            last_message_id: Cell::new(0),
            pending_messages: RefCell::new(Vec::new()),
            pending_callbacks: RefCell::new(HashMap::new()),
        }
    }

    /// Signals to the surrounding page that the bridge is ready for use.
    /// Calling twice re-notifies.
    pub fn start(&self) {
        self.page.bridge_did_start();
    }

    /// Whether any capability information has been registered yet: an
    /// adapter is installed and reports at least one supported component.
    pub fn supported_components_registered(&self) -> bool {
        match &*self.adapter.borrow() {
            Some(adapter) => !adapter.supported_components().is_empty(),
            None => false,
        }
    }

    /// Whether the named component is currently supported. `false` while no
    /// adapter is installed.
    pub fn supports_component(&self, component: &str) -> bool {
        match &*self.adapter.borrow() {
            Some(adapter) => adapter.supports_component(component),
            None => false,
        }
    }

    /// Sends `event` to `component` with an optional payload (defaults to
    /// `{}`) and an optional reply callback.
    ///
    /// - Before any capabilities are known, the call is buffered and
    ///   [`SendStatus::Queued`] is returned; no id exists yet. The buffered
    ///   call is resent as a fresh call, with the original callback, when a
    ///   capability change triggers a flush.
    /// - When capabilities are known but the component is absent,
    ///   [`SendStatus::Unsupported`] is returned and nothing is queued.
    /// - Otherwise the message is handed to the adapter and the callback (if
    ///   any) is registered under the freshly generated id.
    ///
    /// The callback stays registered after each invocation, so one call may
    /// observe several replies (progress then completion). Remove it with
    /// [`cancel`](Bridge::cancel) when no further replies are wanted.
    pub fn send(
        &self,
        component: impl Into<String>,
        event: impl Into<String>,
        data: Option<Value>,
        callback: Option<MessageCallback>,
    ) -> SendStatus {
        let component = component.into();
        let event = event.into();
        let data = data.unwrap_or_else(empty_data);

        if !self.supported_components_registered() {
            debug!(%component, %event, "capabilities unknown, queueing message");
            self.pending_messages.borrow_mut().push(PendingMessage {
                component,
                event,
                data,
                callback,
            });
            return SendStatus::Queued;
        }

        if !self.supports_component(&component) {
            debug!(%component, %event, "component unsupported, dropping send");
            return SendStatus::Unsupported;
        }

        let id = self.generate_message_id();
        let message = Message::new(id.clone(), component, event, data);

        // Clone out of the slot so no RefCell borrow is held while the
        // adapter runs; it may re-enter the bridge synchronously.
        let adapter = self
            .adapter
            .borrow()
            .clone()
            .expect("adapter present when components are registered");
        adapter.receive(&message);

        if let Some(callback) = callback {
            self.pending_callbacks.borrow_mut().insert(id.clone(), callback);
        }

        SendStatus::Sent(id)
    }

    /// Entry point for inbound messages from the native side.
    ///
    /// Invokes the callback registered under `message.id`, leaving the table
    /// entry in place for further replies. Messages with an unknown id are
    /// silently dropped; late, duplicate, and foreign replies are expected
    /// to be harmless.
    pub fn receive(&self, message: &Message) {
        let callback = self.pending_callbacks.borrow().get(&message.id).cloned();
        match callback {
            Some(callback) => callback(message),
            None => debug!(id = %message.id, "no callback registered, dropping message"),
        }
    }

    /// Stops replies for an in-flight call: removes the callback registered
    /// under `id`. No-op when absent.
    pub fn cancel(&self, id: &str) {
        self.pending_callbacks.borrow_mut().remove(id);
    }

    /// Installs the adapter, publishes its platform identifier to the page,
    /// and runs the capability-change path (which may flush queued calls,
    /// since capabilities may now be known for the first time).
    pub fn set_adapter(&self, adapter: Rc<dyn Adapter>) {
        self.page.platform_changed(adapter.platform());
        *self.adapter.borrow_mut() = Some(adapter);
        self.adapter_did_update_supported_components();
    }

    /// Call whenever the adapter's supported-component set changes
    /// (including the initial install). Republishes the component list to
    /// the page, then flushes the pending queue if at least one component
    /// is now registered.
    pub fn adapter_did_update_supported_components(&self) {
        let components = match &*self.adapter.borrow() {
            Some(adapter) => adapter.supported_components(),
            None => Vec::new(),
        };
        self.page.components_changed(&components.join(" "));

        if self.supported_components_registered() {
            self.send_pending_messages();
        }
    }

    /// Drops all queued calls targeting `component` without invoking their
    /// callbacks. For components that have become permanently unavailable.
    pub fn remove_pending_messages_for(&self, component: &str) {
        self.pending_messages
            .borrow_mut()
            .retain(|pending| pending.component != component);
    }

    fn generate_message_id(&self) -> MessageId {
        let id = self.last_message_id.get() + 1;
        self.last_message_id.set(id);
        id.to_string()
    }

    /// Snapshot-then-clear flush: the queue is taken whole before replaying,
    /// so re-entrant sends from flushed callbacks land in the fresh queue
    /// and wait for the next capability change.
    fn send_pending_messages(&self) {
        let pending = std::mem::take(&mut *self.pending_messages.borrow_mut());
        debug!(count = pending.len(), "flushing pending messages");
        for message in pending {
            self.send(
                message.component,
                message.event,
                Some(message.data),
                message.callback,
            );
        }
    }
}

impl Default for Bridge {
    fn default() -> Self {
        Self::new()
    }
}
