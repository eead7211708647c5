// ZenGarden Listener - host-side notification capability
// Forwards engine print/error text to injectable sinks (stdout/stderr by default)

// Module declarations
pub mod callback;
pub mod config;
pub mod error;
pub mod listener;
pub mod notifier;
pub mod sink;
pub mod transcript;

// Re-exports for convenience
pub use callback::{dispatch, CallbackFunction, ListenerHandle};
pub use config::{AppConfig, ListenerConfig};
pub use error::{ErrorCode, SinkError, TranscriptError, UnknownCallback};
pub use listener::{ZenGardenAdapter, ZenGardenListener, PRINT_LOG_TARGET};
pub use notifier::{ListenerId, Notifier};
pub use sink::{MemorySink, StderrSink, StdoutSink, TextSink};
pub use transcript::{PrintEvent, PrintStream, RecordingListener, Transcript};
