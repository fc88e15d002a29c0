mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::RecordingAdapter;
use serde_json::json;
use web_bridge::{Bridge, Message, MessageCallback, SendStatus};

fn sent_id(status: SendStatus) -> String {
    match status {
        SendStatus::Sent(id) => id,
        other => panic!("expected Sent, got {other:?}"),
    }
}

/// Callback that appends every reply it sees to a shared log.
fn recording_callback(log: &Rc<RefCell<Vec<Message>>>) -> MessageCallback {
    let log = log.clone();
    Rc::new(move |message: &Message| log.borrow_mut().push(message.clone()))
}

#[test]
fn reply_invokes_exactly_the_matching_callback() {
    let bridge = Bridge::new();
    bridge.set_adapter(RecordingAdapter::new("ios", &["form"]));

    let first = Rc::new(RefCell::new(Vec::new()));
    let second = Rc::new(RefCell::new(Vec::new()));
    let first_id = sent_id(bridge.send("form", "connect", None, Some(recording_callback(&first))));
    let second_id = sent_id(bridge.send("form", "connect", None, Some(recording_callback(&second))));

    let reply = Message::new(first_id, "form", "connected", json!({"ok": true}));
    bridge.receive(&reply);

    assert_eq!(*first.borrow(), vec![reply]);
    assert!(second.borrow().is_empty());

    bridge.receive(&Message::new(second_id, "form", "connected", json!({})));
    assert_eq!(first.borrow().len(), 1);
    assert_eq!(second.borrow().len(), 1);
}

#[test]
fn unknown_id_is_silently_dropped() {
    let bridge = Bridge::new();
    bridge.set_adapter(RecordingAdapter::new("ios", &["form"]));

    let log = Rc::new(RefCell::new(Vec::new()));
    bridge.send("form", "connect", None, Some(recording_callback(&log)));

    bridge.receive(&Message::new("no-such-id", "form", "connected", json!({})));
    assert!(log.borrow().is_empty());
}

#[test]
fn callback_fires_for_each_reply_until_cancelled() {
    let bridge = Bridge::new();
    bridge.set_adapter(RecordingAdapter::new("ios", &["form"]));

    let log = Rc::new(RefCell::new(Vec::new()));
    let id = sent_id(bridge.send("form", "upload", None, Some(recording_callback(&log))));

    // Streaming-style: progress replies, then completion.
    bridge.receive(&Message::new(id.clone(), "form", "progress", json!({"pct": 50})));
    bridge.receive(&Message::new(id.clone(), "form", "progress", json!({"pct": 100})));
    bridge.receive(&Message::new(id.clone(), "form", "done", json!({})));
    assert_eq!(log.borrow().len(), 3);

    bridge.cancel(&id);
    bridge.receive(&Message::new(id, "form", "late", json!({})));
    assert_eq!(log.borrow().len(), 3);
}

#[test]
fn cancel_unknown_id_is_a_noop() {
    let bridge = Bridge::new();
    bridge.cancel("42");
}

#[test]
fn queued_call_keeps_its_callback_through_the_flush() {
    let bridge = Bridge::new();

    let log = Rc::new(RefCell::new(Vec::new()));
    assert_eq!(
        bridge.send("a", "ping", Some(json!({})), Some(recording_callback(&log))),
        SendStatus::Queued
    );

    let adapter = RecordingAdapter::new("android", &["a", "b"]);
    bridge.set_adapter(adapter.clone());

    // Flushed as a fresh call with a newly generated id.
    let delivered = adapter.deliveries();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].component, "a");
    assert_eq!(delivered[0].event, "ping");
    assert_eq!(delivered[0].data, json!({}));

    let reply = Message::new(
        delivered[0].id.clone(),
        "a",
        "pong",
        json!({"ok": true}),
    );
    bridge.receive(&reply);
    assert_eq!(*log.borrow(), vec![reply]);
}

#[test]
fn callback_may_send_on_the_same_bridge() {
    let bridge = Rc::new(Bridge::new());
    let adapter = RecordingAdapter::new("ios", &["form"]);
    bridge.set_adapter(adapter.clone());

    let inner = bridge.clone();
    let callback: MessageCallback = Rc::new(move |_reply: &Message| {
        inner.send("form", "followup", None, None);
    });
    let id = sent_id(bridge.send("form", "connect", None, Some(callback)));

    bridge.receive(&Message::new(id, "form", "connected", json!({})));

    let events: Vec<String> = adapter
        .deliveries()
        .iter()
        .map(|m| m.event.clone())
        .collect();
    assert_eq!(events, ["connect", "followup"]);
}

#[test]
fn callback_may_cancel_itself_for_exactly_once_delivery() {
    let bridge = Rc::new(Bridge::new());
    bridge.set_adapter(RecordingAdapter::new("ios", &["form"]));

    let log = Rc::new(RefCell::new(Vec::new()));
    let seen = log.clone();
    let canceller = bridge.clone();
    let callback: MessageCallback = Rc::new(move |message: &Message| {
        seen.borrow_mut().push(message.clone());
        canceller.cancel(&message.id);
    });
    let id = sent_id(bridge.send("form", "connect", None, Some(callback)));

    bridge.receive(&Message::new(id.clone(), "form", "connected", json!({})));
    bridge.receive(&Message::new(id, "form", "connected", json!({})));
    assert_eq!(log.borrow().len(), 1);
}
