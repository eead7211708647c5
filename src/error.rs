// Error types for the ZenGarden listener crate
//
// Listener operations never fail from the engine's point of view. These types
// cover the pieces underneath them (sinks, transcripts, raw callback codes) and
// carry numeric codes so a C host can reason about them.

use log::debug;
use std::fmt;
use std::io;

/// Error codes for structured error reporting
///
/// Gives every error in the crate a stable numeric code plus a
/// human-readable message, independent of `Display` formatting.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}

/// Log a sink error that is being absorbed
///
/// Logged at debug level: the failing sink may well be stderr itself, and the
/// installed logger usually writes there too.
pub fn log_sink_error(err: &SinkError, stream: &str) {
    debug!(
        "Sink error on {}: code={}, component=ZenGardenAdapter, message={}",
        stream,
        err.code(),
        err.message()
    );
}

/// Errors raised while writing text to a sink
///
/// Error code ranges: 2001-2003
#[derive(Debug, Clone, PartialEq)]
pub enum SinkError {
    /// Underlying write or flush failed
    Io { kind: io::ErrorKind, details: String },

    /// Reader side of the stream has gone away
    BrokenPipe,

    /// Mutex guarding an in-memory sink was poisoned
    LockPoisoned { sink: String },
}

impl ErrorCode for SinkError {
    fn code(&self) -> i32 {
        match self {
            SinkError::Io { .. } => 2001,
            SinkError::BrokenPipe => 2002,
            SinkError::LockPoisoned { .. } => 2003,
        }
    }

    fn message(&self) -> String {
        match self {
            SinkError::Io { kind, details } => format!("I/O error ({:?}): {}", kind, details),
            SinkError::BrokenPipe => "Stream closed by reader".to_string(),
            SinkError::LockPoisoned { sink } => format!("Lock poisoned for sink: {}", sink),
        }
    }
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SinkError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for SinkError {}

impl From<io::Error> for SinkError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::BrokenPipe => SinkError::BrokenPipe,
            kind => SinkError::Io {
                kind,
                details: err.to_string(),
            },
        }
    }
}

/// Errors raised while loading a recorded transcript
///
/// Error code ranges: 2101-2102
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptError {
    /// Transcript file could not be read
    Read { path: String, details: String },

    /// Transcript JSON was malformed
    Parse { details: String },
}

impl ErrorCode for TranscriptError {
    fn code(&self) -> i32 {
        match self {
            TranscriptError::Read { .. } => 2101,
            TranscriptError::Parse { .. } => 2102,
        }
    }

    fn message(&self) -> String {
        match self {
            TranscriptError::Read { path, details } => {
                format!("Failed to read transcript {}: {}", path, details)
            }
            TranscriptError::Parse { details } => format!("Invalid transcript JSON: {}", details),
        }
    }
}

impl fmt::Display for TranscriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TranscriptError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for TranscriptError {}

impl From<serde_json::Error> for TranscriptError {
    fn from(err: serde_json::Error) -> Self {
        TranscriptError::Parse {
            details: err.to_string(),
        }
    }
}

/// Raw callback code that does not name a known notification
///
/// Error code: 2201
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownCallback(pub i32);

impl ErrorCode for UnknownCallback {
    fn code(&self) -> i32 {
        2201
    }

    fn message(&self) -> String {
        format!("Unknown callback function code {}", self.0)
    }
}

impl fmt::Display for UnknownCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UnknownCallback (code {}): {}", self.code(), self.message())
    }
}

impl std::error::Error for UnknownCallback {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_error_codes() {
        assert_eq!(SinkError::BrokenPipe.code(), 2002);
        assert_eq!(
            SinkError::LockPoisoned {
                sink: "memory".to_string()
            }
            .code(),
            2003
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let broken: SinkError = io::Error::new(io::ErrorKind::BrokenPipe, "gone").into();
        assert_eq!(broken, SinkError::BrokenPipe);

        let other: SinkError = io::Error::new(io::ErrorKind::Other, "disk on fire").into();
        match other {
            SinkError::Io { kind, details } => {
                assert_eq!(kind, io::ErrorKind::Other);
                assert!(details.contains("disk on fire"));
            }
            e => panic!("Expected Io, got {:?}", e),
        }
    }

    #[test]
    fn test_display_includes_code() {
        let err = TranscriptError::Parse {
            details: "eof".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("2102"));
        assert!(display.contains("eof"));

        assert!(UnknownCallback(7).to_string().contains("code 7"));
    }
}
