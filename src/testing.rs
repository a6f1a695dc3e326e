use std::sync::Mutex;

use crate::{error::DeliveryError, message::Outbound, room::Outbox};

/// Outbox that keeps every frame it is handed.
#[derive(Debug, Default)]
pub struct RecordingOutbox {
    frames: Mutex<Vec<String>>,
}

impl RecordingOutbox {
    pub fn frames(&self) -> Vec<String> {
        self.frames.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<Outbound> {
        self.frames()
            .iter()
            .map(|frame| serde_json::from_str(frame).unwrap())
            .collect()
    }
}

impl Outbox for RecordingOutbox {
    fn deliver(&self, text: String) -> Result<(), DeliveryError> {
        self.frames.lock().unwrap().push(text);
        Ok(())
    }
}

/// Outbox whose peer is already gone.
#[derive(Debug)]
pub struct ClosedOutbox;

impl Outbox for ClosedOutbox {
    fn deliver(&self, _text: String) -> Result<(), DeliveryError> {
        Err(DeliveryError::Closed)
    }
}
