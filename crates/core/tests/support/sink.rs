use std::sync::{Arc, Mutex};

use esignbridge_core::{SinkEvent, StatusSink};

/// Sink that keeps every published event for later assertions.
#[derive(Default, Clone)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<SinkEvent>>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl StatusSink for RecordingSink {
    fn publish(&self, event: SinkEvent) {
        self.events.lock().unwrap().push(event);
    }
}
