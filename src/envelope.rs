//! The wire envelope: the JSON shape a [`Message`] takes when crossing the
//! web/native boundary.
//!
//! Purely a structural transform. `component` and `event` values are not
//! validated, and the payload passes through unchanged. Malformed input is
//! discarded with a diagnostic rather than surfaced as an error; callers
//! depend on that tolerance for late and foreign messages.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::message::{empty_data, Message};

/// The flat wire record: `id`, `component`, `event`, and an optional `data`
/// object that defaults to `{}` when the field is missing.
#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    id: String,
    component: String,
    event: String,
    #[serde(default = "empty_data")]
    data: Value,
}

impl WireMessage {
    fn into_message(self) -> Message {
        Message {
            id: self.id,
            component: self.component,
            event: self.event,
            data: self.data,
        }
    }

    fn from_message(message: &Message) -> Self {
        Self {
            id: message.id.clone(),
            component: message.component.clone(),
            event: message.event.clone(),
            data: message.data.clone(),
        }
    }
}

/// Parses a wire envelope from raw text.
///
/// Returns `None` on structural failure — invalid JSON or a missing required
/// field — after logging a diagnostic. No error ever propagates to the
/// caller.
pub fn decode(raw: &str) -> Option<Message> {
    match serde_json::from_str::<WireMessage>(raw) {
        Ok(wire) => Some(wire.into_message()),
        Err(err) => {
            warn!(%err, raw, "discarding invalid message");
            None
        }
    }
}

/// Renders a message as wire-envelope text.
///
/// Total transform: every well-formed [`Message`] produces a valid envelope.
pub fn encode(message: &Message) -> String {
    // All fields are strings or a JSON value with string keys, so
    // serialization cannot fail.
    serde_json::to_string(&WireMessage::from_message(message))
        .expect("envelope serialization is infallible")
}
