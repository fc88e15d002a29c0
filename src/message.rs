use serde_json::{Map, Value};

/// Correlation identifier for a message.
///
/// Assigned by the [`Bridge`](crate::bridge::Bridge) at send time; unique for
/// the lifetime of one web context (contexts reset the counter on reload, so
/// ids are **not** globally unique across reloads).
pub type MessageId = String;

/// The logical unit exchanged across the web/native boundary.
///
/// A message lives for exactly one round trip: it is built transiently at
/// send time on the web side, or at decode time on the native side, and is
/// never stored beyond that.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Correlates a reply to its originating call.
    pub id: MessageId,
    /// Logical capability the message targets (e.g. a feature area name).
    pub component: String,
    /// Specific action or notification within the component.
    pub event: String,
    /// Arbitrary structured payload. The bridge treats it as opaque;
    /// component handlers impose their own schema.
    pub data: Value,
}

impl Message {
    pub fn new(
        id: impl Into<MessageId>,
        component: impl Into<String>,
        event: impl Into<String>,
        data: Value,
    ) -> Self {
        Self {
            id: id.into(),
            component: component.into(),
            event: event.into(),
            data,
        }
    }
}

/// The default payload: an empty JSON object, `{}`.
pub fn empty_data() -> Value {
    Value::Object(Map::new())
}
