//! Text sinks: destinations for listener output.
//!
//! The default adapter never names `std::io::stdout()` directly; it writes
//! through a [`TextSink`] so tests can swap the process streams for a
//! [`MemorySink`].

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crate::error::SinkError;

/// A destination for verbatim text.
///
/// Implementations must write `text` exactly as given: no newline added,
/// nothing stripped.
pub trait TextSink: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), SinkError>;
}

impl<S: TextSink + ?Sized> TextSink for Arc<S> {
    fn write_text(&self, text: &str) -> Result<(), SinkError> {
        (**self).write_text(text)
    }
}

impl<S: TextSink + ?Sized> TextSink for Box<S> {
    fn write_text(&self, text: &str) -> Result<(), SinkError> {
        (**self).write_text(text)
    }
}

/// Writes to the process standard output.
#[derive(Debug, Clone, Copy)]
pub struct StdoutSink {
    flush: bool,
}

impl StdoutSink {
    pub fn new(flush: bool) -> Self {
        Self { flush }
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new(true)
    }
}

impl TextSink for StdoutSink {
    fn write_text(&self, text: &str) -> Result<(), SinkError> {
        let mut out = io::stdout().lock();
        out.write_all(text.as_bytes())?;
        if self.flush {
            out.flush()?;
        }
        Ok(())
    }
}

/// Writes to the process standard error.
///
/// Stderr is unbuffered in std, so `flush` only matters for symmetry.
#[derive(Debug, Clone, Copy)]
pub struct StderrSink {
    flush: bool,
}

impl StderrSink {
    pub fn new(flush: bool) -> Self {
        Self { flush }
    }
}

impl Default for StderrSink {
    fn default() -> Self {
        Self::new(true)
    }
}

impl TextSink for StderrSink {
    fn write_text(&self, text: &str) -> Result<(), SinkError> {
        let mut err = io::stderr().lock();
        err.write_all(text.as_bytes())?;
        if self.flush {
            err.flush()?;
        }
        Ok(())
    }
}

/// In-memory sink. Clones share one buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buffer: Arc<Mutex<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far.
    pub fn contents(&self) -> String {
        self.buffer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Drain the buffer, returning what it held.
    pub fn take(&self) -> String {
        let mut buffer = self
            .buffer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::take(&mut *buffer)
    }

    pub fn len(&self) -> usize {
        self.buffer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TextSink for MemorySink {
    fn write_text(&self, text: &str) -> Result<(), SinkError> {
        let mut buffer = self.buffer.lock().map_err(|_| SinkError::LockPoisoned {
            sink: "memory".to_string(),
        })?;
        buffer.push_str(text);
        Ok(())
    }
}

/// Sink that rejects every write.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct FailingSink;

#[cfg(test)]
impl TextSink for FailingSink {
    fn write_text(&self, _text: &str) -> Result<(), SinkError> {
        Err(SinkError::BrokenPipe)
    }
}
