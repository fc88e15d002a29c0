use std::cell::{Cell, RefCell};
use std::rc::Rc;

use web_bridge::{Adapter, Message, Page};

/// Adapter that records every delivery and lets tests change the
/// supported-component set mid-flight (capability sets are mutable over an
/// adapter's lifetime).
pub struct RecordingAdapter {
    platform: String,
    components: RefCell<Vec<String>>,
    deliveries: RefCell<Vec<Message>>,
}

impl RecordingAdapter {
    pub fn new(platform: &str, components: &[&str]) -> Rc<Self> {
        Rc::new(Self {
            platform: platform.to_string(),
            components: RefCell::new(components.iter().map(|c| c.to_string()).collect()),
            deliveries: RefCell::new(Vec::new()),
        })
    }

    pub fn register_components(&self, components: &[&str]) {
        *self.components.borrow_mut() = components.iter().map(|c| c.to_string()).collect();
    }

    pub fn deliveries(&self) -> Vec<Message> {
        self.deliveries.borrow().clone()
    }
}

impl Adapter for RecordingAdapter {
    fn platform(&self) -> &str {
        &self.platform
    }

    fn supported_components(&self) -> Vec<String> {
        self.components.borrow().clone()
    }

    fn receive(&self, message: &Message) {
        self.deliveries.borrow_mut().push(message.clone());
    }
}

/// Page hook that records readiness notifications and republished
/// attributes.
pub struct RecordingPage {
    pub ready_count: Cell<u32>,
    pub platform: RefCell<Option<String>>,
    pub component_updates: RefCell<Vec<String>>,
}

impl RecordingPage {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            ready_count: Cell::new(0),
            platform: RefCell::new(None),
            component_updates: RefCell::new(Vec::new()),
        })
    }
}

impl Page for RecordingPage {
    fn bridge_did_start(&self) {
        self.ready_count.set(self.ready_count.get() + 1);
    }

    fn platform_changed(&self, platform: &str) {
        *self.platform.borrow_mut() = Some(platform.to_string());
    }

    fn components_changed(&self, components: &str) {
        self.component_updates
            .borrow_mut()
            .push(components.to_string());
    }
}
