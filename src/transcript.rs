//! Recorded print traffic.
//!
//! A [`Transcript`] is the ordered list of notifications a listener saw across
//! both streams. [`RecordingListener`] produces one; [`Transcript::replay`]
//! feeds one back into any listener, which is how the `zg_print replay` command
//! reproduces engine output.

use std::fs;
use std::path::Path;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::TranscriptError;
use crate::listener::ZenGardenListener;

/// Which notification a message arrived on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PrintStream {
    #[serde(rename = "std")]
    Standard,
    #[serde(rename = "err")]
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrintEvent {
    pub stream: PrintStream,
    pub message: String,
}

impl PrintEvent {
    pub fn new(stream: PrintStream, message: impl Into<String>) -> Self {
        Self {
            stream,
            message: message.into(),
        }
    }
}

/// Ordered print events; serialized as a bare JSON array.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Transcript {
    pub events: Vec<PrintEvent>,
}

impl Transcript {
    pub fn new(events: Vec<PrintEvent>) -> Self {
        Self { events }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TranscriptError> {
        let contents = fs::read_to_string(&path).map_err(|err| TranscriptError::Read {
            path: path.as_ref().display().to_string(),
            details: err.to_string(),
        })?;
        let transcript = Self::from_json(&contents)?;
        log::info!(
            "[Transcript] Loaded {} events from {:?}",
            transcript.len(),
            path.as_ref()
        );
        Ok(transcript)
    }

    pub fn from_json(json: &str) -> Result<Self, TranscriptError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, TranscriptError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Invoke `listener` once per event, in order.
    pub fn replay(&self, listener: &dyn ZenGardenListener) {
        for event in &self.events {
            match event.stream {
                PrintStream::Standard => listener.on_print_std(&event.message),
                PrintStream::Error => listener.on_print_err(&event.message),
            }
        }
    }

    /// Exact text the given stream would hold after a replay.
    pub fn stream_text(&self, stream: PrintStream) -> String {
        self.events
            .iter()
            .filter(|event| event.stream == stream)
            .map(|event| event.message.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Listener that records every notification, preserving cross-stream order.
#[derive(Debug, Default)]
pub struct RecordingListener {
    events: Mutex<Vec<PrintEvent>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transcript(&self) -> Transcript {
        Transcript::new(
            self.events
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .clone(),
        )
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    fn record(&self, stream: PrintStream, message: &str) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(PrintEvent::new(stream, message));
    }
}

impl ZenGardenListener for RecordingListener {
    fn on_print_err(&self, message: &str) {
        self.record(PrintStream::Error, message);
    }

    fn on_print_std(&self, message: &str) {
        self.record(PrintStream::Standard, message);
    }
}
