//! # web_bridge
//!
//! A batteries-included Rust crate for **web view ↔ native bridging**:
//!
//! - Run a web-side **[`Bridge`]** that lets embedded script invoke native
//!   capabilities ("components") and receive typed replies
//! - Buffer outbound calls until the native side has announced what it
//!   supports, then replay them in order
//! - Encode/decode the **wire envelope** that crosses the boundary, and
//!   (optionally) frame it over stdio for out-of-process hosts
//!
//! The goal is to be the "it just works" crate for hybrid-app messaging —
//! especially the parts that usually waste hours (calls fired before the
//! native side is ready, replies that match nothing, and accidentally
//! treating garbage from the boundary as fatal).
//!
//! ---
//!
//! ## How the bridge works
//!
//! Two cooperating pieces, one per side of the boundary:
//!
//! 1. The **[`Bridge`]** (web side) owns the pending-message queue, the
//!    callback table, and message-id generation. Application code calls
//!    [`Bridge::send`]; the bridge either queues the call or forwards it to
//!    the adapter.
//! 2. The **[`Adapter`]** (your platform glue) announces which components
//!    the host supports and physically delivers each message. Replies come
//!    back through [`Bridge::receive`], which invokes the callback
//!    registered under the reply's id.
//!
//! The [`envelope`] module converts between the wire JSON shape and a
//! [`Message`]; the [`host`] module adds length-prefixed framing for hosts
//! that live in a separate process.
//!
//! ### Most important gotchas (read this first)
//!
//! - **Nothing is delivered until components are registered:** before the
//!   adapter reports at least one supported component, every `send` is
//!   queued and returns [`SendStatus::Queued`] — there is no id yet. The
//!   queue is flushed, in original order, on the first capability change
//!   that registers a component.
//! - **Unknown-yet is not known-and-missing:** once capabilities are known,
//!   a send to an unsupported component returns
//!   [`SendStatus::Unsupported`] and is *not* queued. Check
//!   [`Bridge::supports_component`] first if you need to know in advance.
//! - **Callbacks fire more than once:** a table entry stays registered
//!   after each invocation so one call can observe several replies
//!   (progress then completion). Remove it with [`Bridge::cancel`] when
//!   you're done, or it lives until the context is torn down.
//! - **Silent drops are the contract:** a reply with an unknown id and a
//!   malformed envelope are both logged and discarded, never raised. Late,
//!   duplicate, and foreign messages are expected to be harmless.
//! - **Never log to stdout in a framed host:** stdout is reserved for
//!   protocol frames. Use stderr or a `tracing` subscriber writing
//!   elsewhere.
//!
//! ---
//!
//! ## Crate layout
//!
//! - [`bridge`] — the web-side orchestrator: queueing, flushing, callback
//!   correlation, the [`Adapter`] and [`Page`] contracts.
//! - [`message`] — the [`Message`] unit and id type.
//! - [`envelope`] — wire JSON codec (structural only, malformed input is
//!   discarded with a diagnostic).
//! - [`host`] — framing + stdio helpers + a high-level async event loop
//!   for out-of-process hosts (feature `tokio`, on by default).
//!
//! ---
//!
//! ## Quick start: wire up a bridge
//!
//! ```rust
//! use std::rc::Rc;
//! use serde_json::json;
//! use web_bridge::{Adapter, Bridge, Message, SendStatus};
//!
//! struct IosAdapter;
//!
//! impl Adapter for IosAdapter {
//!     fn platform(&self) -> &str {
//!         "ios"
//!     }
//!
//!     fn supported_components(&self) -> Vec<String> {
//!         vec!["form".to_string(), "page-refresh".to_string()]
//!     }
//!
//!     fn receive(&self, message: &Message) {
//!         // Hand the message to the native side here, e.g. a WebKit
//!         // message handler. Errors and return values are not observed.
//!         let _ = message;
//!     }
//! }
//!
//! let bridge = Rc::new(Bridge::new());
//! bridge.start();
//! bridge.set_adapter(Rc::new(IosAdapter));
//!
//! let status = bridge.send("form", "submit", Some(json!({"title": "Save"})), None);
//! assert!(matches!(status, SendStatus::Sent(_)));
//! ```
//!
//! ### Correlating replies
//!
//! Register a callback with the send; invoke [`Bridge::receive`] with each
//! inbound message. The callback fires for every reply carrying the call's
//! id until you [`Bridge::cancel`] it:
//!
//! ```rust
//! # use std::rc::Rc;
//! # use serde_json::json;
//! # use web_bridge::{Adapter, Bridge, Message, MessageCallback, SendStatus};
//! # struct IosAdapter;
//! # impl Adapter for IosAdapter {
//! #     fn platform(&self) -> &str { "ios" }
//! #     fn supported_components(&self) -> Vec<String> { vec!["form".to_string()] }
//! #     fn receive(&self, _message: &Message) {}
//! # }
//! # let bridge = Rc::new(Bridge::new());
//! # bridge.set_adapter(Rc::new(IosAdapter));
//! use std::cell::Cell;
//!
//! let replies = Rc::new(Cell::new(0u32));
//! let counter = replies.clone();
//! let callback: MessageCallback = Rc::new(move |_reply: &Message| {
//!     counter.set(counter.get() + 1);
//! });
//!
//! let id = match bridge.send("form", "connect", None, Some(callback)) {
//!     SendStatus::Sent(id) => id,
//!     other => panic!("unexpected: {other:?}"),
//! };
//!
//! bridge.receive(&Message::new(id.clone(), "form", "connected", json!({"ok": true})));
//! assert_eq!(replies.get(), 1);
//!
//! bridge.cancel(&id);
//! bridge.receive(&Message::new(id, "form", "connected", json!({})));
//! assert_eq!(replies.get(), 1); // cancelled, no further invocations
//! ```
//!
//! ### Queue-then-flush
//!
//! Calls made before any adapter is installed wait in FIFO order and are
//! resent as fresh calls (new ids, original callbacks) once a capability
//! change registers at least one component. A send during the flush — say,
//! from a flushed callback — lands in the queue for the *next* flush, never
//! the current one.
//!
//! ---
//!
//! ## The wire envelope
//!
//! A flat JSON object: `id`, `component`, `event`, and an optional `data`
//! object defaulting to `{}`. Decoding is tolerant by design — structural
//! failure produces no message and a diagnostic, never an error:
//!
//! ```rust
//! use web_bridge::envelope;
//!
//! let message = envelope::decode(r#"{"id":"1","component":"form","event":"connect"}"#).unwrap();
//! assert_eq!(message.data, serde_json::json!({}));
//!
//! assert!(envelope::decode("not json").is_none()); // logged, not thrown
//! ```
//!
//! ---
//!
//! ## Pure framing (runnable example)
//!
//! Out-of-process hosts exchange envelopes with a 4-byte native-endian
//! length prefix. You can unit-test framing without stdin/stdout by using
//! an in-memory buffer:
//!
//! ```rust
//! use std::io::Cursor;
//! use serde_json::json;
//! use web_bridge::host::{encode_frame, read_message, MAX_INBOUND};
//! use web_bridge::Message;
//!
//! let msg = Message::new("7", "page-refresh", "refresh", json!({"reason": "stale"}));
//! let frame = encode_frame(&msg).unwrap();
//!
//! let mut cur = Cursor::new(frame);
//! let back = read_message(&mut cur, MAX_INBOUND).unwrap().unwrap();
//! assert_eq!(back, msg);
//! ```
//!
//! ---
//!
//! ## Async host loop (feature `tokio`, on by default)
//!
//! The best default for a host that runs as its own process: read frames
//! continuously, skip malformed envelopes, reply with the originating id so
//! the web-side bridge can correlate:
//!
//! ```no_run
//! use serde_json::json;
//! use web_bridge::host::{event_loop, send_message};
//! use web_bridge::Message;
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     event_loop(|message: Message| async move {
//!         let reply = Message::new(
//!             message.id.clone(),
//!             message.component.clone(),
//!             "reply",
//!             json!({"ok": true}),
//!         );
//!         send_message(&reply).await
//!     })
//!     .await
//! }
//! ```
//!
//! EOF on stdin is the embedder closing the pipe — treat it as a normal
//! shutdown, not a failure.
//!
//! ---
//!
//! ## Troubleshooting (read this if "my call never arrives")
//!
//! Bridge failures are usually lifecycle issues, not code issues.
//!
//! ### 1) `send` keeps returning `Queued`
//! No adapter has registered a component yet. Check that `set_adapter` ran
//! and that the adapter's `supported_components()` is non-empty — an empty
//! list means "capabilities not yet known" and queues everything.
//!
//! ### 2) `send` returns `Unsupported` for a component the host has
//! The adapter's `supports_component` disagrees with you. Component names
//! are compared verbatim; check for case or hyphenation drift.
//!
//! ### 3) My callback never fires
//! The reply's `id` must match the id `send` returned, exactly. Replies
//! with unknown ids are dropped silently. Also remember queued calls get a
//! *fresh* id at flush time — correlate after the flush, not before.
//!
//! ### 4) My callback fires twice
//! That's the contract: entries stay registered until [`Bridge::cancel`].
//! Cancel from inside the callback if you want exactly-once.
//!
//! ---
//!
//! ## API re-exports
//!
//! The common entry points live at the crate root: [`Bridge`], [`Adapter`],
//! [`Page`], [`SendStatus`], [`Message`], [`MessageId`],
//! [`MessageCallback`]. For the codec and transport, see [`envelope`] and
//! [`host`] directly.

pub mod bridge;
pub mod envelope;
pub mod host;
pub mod message;

// -------- Bridge re-exports --------

#[doc(inline)]
pub use bridge::{Adapter, Bridge, MessageCallback, Page, SendStatus};

// -------- Message re-exports --------

#[doc(inline)]
pub use message::{Message, MessageId};

// -------- Host re-exports --------

#[cfg(feature = "tokio")]
#[doc(inline)]
pub use host::{event_loop, get_message, send_message};
