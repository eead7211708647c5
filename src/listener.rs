//! Listener capability and its default adapter
//!
//! The engine reports text through two notifications: routine output and error
//! output. [`ZenGardenListener`] is that capability; [`ZenGardenAdapter`] is
//! the stock implementation that forwards each message to a pair of sinks,
//! stdout/stderr unless told otherwise.
//!
//! # Example
//! ```
//! use zengarden_listener::{MemorySink, ZenGardenAdapter, ZenGardenListener};
//!
//! let out = MemorySink::new();
//! let err = MemorySink::new();
//! let adapter = ZenGardenAdapter::new(out.clone(), err.clone());
//!
//! adapter.on_print_std("engine initialized");
//! adapter.on_print_err("buffer underrun");
//!
//! assert_eq!(out.contents(), "engine initialized");
//! assert_eq!(err.contents(), "buffer underrun");
//! ```

use std::sync::Arc;

use crate::config::ListenerConfig;
use crate::error::log_sink_error;
use crate::sink::{StderrSink, StdoutSink, TextSink};

/// Tracing target used when messages are mirrored to the log.
pub const PRINT_LOG_TARGET: &str = "zengarden::print";

/// Notification capability invoked by the engine.
///
/// Messages are opaque text, delivered once per call. Implementations must not
/// assume a trailing newline and must tolerate the empty string.
pub trait ZenGardenListener: Send + Sync {
    /// Error output from the engine.
    fn on_print_err(&self, message: &str);

    /// Standard output from the engine.
    fn on_print_std(&self, message: &str);
}

impl<L: ZenGardenListener + ?Sized> ZenGardenListener for Arc<L> {
    fn on_print_err(&self, message: &str) {
        (**self).on_print_err(message)
    }

    fn on_print_std(&self, message: &str) {
        (**self).on_print_std(message)
    }
}

impl<L: ZenGardenListener + ?Sized> ZenGardenListener for Box<L> {
    fn on_print_err(&self, message: &str) {
        (**self).on_print_err(message)
    }

    fn on_print_std(&self, message: &str) {
        (**self).on_print_std(message)
    }
}

impl<L: ZenGardenListener + ?Sized> ZenGardenListener for &L {
    fn on_print_err(&self, message: &str) {
        (**self).on_print_err(message)
    }

    fn on_print_std(&self, message: &str) {
        (**self).on_print_std(message)
    }
}

/// Default listener: writes each message verbatim to its sink.
///
/// Sink failures are swallowed after a debug log; the engine never sees them.
#[derive(Debug, Clone)]
pub struct ZenGardenAdapter<O = StdoutSink, E = StderrSink> {
    out: O,
    err: E,
    mirror_to_log: bool,
}

impl ZenGardenAdapter<StdoutSink, StderrSink> {
    /// Adapter bound to the process streams, flushing after every write.
    pub fn stdio() -> Self {
        Self::new(StdoutSink::default(), StderrSink::default())
    }

    pub fn from_config(config: &ListenerConfig) -> Self {
        Self::new(
            StdoutSink::new(config.flush_each_write),
            StderrSink::new(config.flush_each_write),
        )
        .with_log_mirror(config.mirror_to_log)
    }
}

impl Default for ZenGardenAdapter<StdoutSink, StderrSink> {
    fn default() -> Self {
        Self::stdio()
    }
}

impl<O: TextSink, E: TextSink> ZenGardenAdapter<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self {
            out,
            err,
            mirror_to_log: false,
        }
    }

    /// Also emit every message as a trace event on [`PRINT_LOG_TARGET`].
    pub fn with_log_mirror(mut self, enabled: bool) -> Self {
        self.mirror_to_log = enabled;
        self
    }

    pub fn out_sink(&self) -> &O {
        &self.out
    }

    pub fn err_sink(&self) -> &E {
        &self.err
    }
}

impl<O: TextSink, E: TextSink> ZenGardenListener for ZenGardenAdapter<O, E> {
    fn on_print_err(&self, message: &str) {
        if self.mirror_to_log {
            tracing::trace!(target: PRINT_LOG_TARGET, stream = "err", "{}", message);
        }
        if let Err(e) = self.err.write_text(message) {
            log_sink_error(&e, "stderr");
        }
    }

    fn on_print_std(&self, message: &str) {
        if self.mirror_to_log {
            tracing::trace!(target: PRINT_LOG_TARGET, stream = "std", "{}", message);
        }
        if let Err(e) = self.out.write_text(message) {
            log_sink_error(&e, "stdout");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{FailingSink, MemorySink};

    fn memory_adapter() -> (ZenGardenAdapter<MemorySink, MemorySink>, MemorySink, MemorySink) {
        let out = MemorySink::new();
        let err = MemorySink::new();
        (ZenGardenAdapter::new(out.clone(), err.clone()), out, err)
    }

    #[test]
    fn test_messages_are_delivered_verbatim() {
        let (adapter, out, err) = memory_adapter();
        let samples = ["", "plain", "two\nlines\n", "  padded  ", "ünïcödé ✓ 音"];

        for sample in samples {
            adapter.on_print_std(sample);
            adapter.on_print_err(sample);
            assert_eq!(out.take(), sample);
            assert_eq!(err.take(), sample);
        }
    }

    #[test]
    fn test_streams_do_not_cross() {
        let (adapter, out, err) = memory_adapter();

        adapter.on_print_std("engine initialized");
        assert!(err.is_empty());

        adapter.on_print_err("buffer underrun");
        assert_eq!(out.contents(), "engine initialized");
        assert_eq!(err.contents(), "buffer underrun");
    }

    #[test]
    fn test_sequential_messages_concatenate_in_order() {
        let (adapter, out, err) = memory_adapter();

        adapter.on_print_std("m1");
        adapter.on_print_std("m2");
        adapter.on_print_err("e1");
        adapter.on_print_err("e2");

        assert_eq!(out.contents(), "m1m2");
        assert_eq!(err.contents(), "e1e2");
    }

    #[test]
    fn test_independent_instances_behave_identically() {
        let (first, first_out, first_err) = memory_adapter();
        let (second, second_out, second_err) = memory_adapter();

        for listener in [&first, &second] {
            listener.on_print_std("print: 1\n");
            listener.on_print_err("error: bad arg\n");
        }

        assert_eq!(first_out.contents(), second_out.contents());
        assert_eq!(first_err.contents(), second_err.contents());
    }

    #[test]
    fn test_sink_failure_is_absorbed() {
        let err = MemorySink::new();
        let adapter = ZenGardenAdapter::new(FailingSink, err.clone());

        adapter.on_print_std("lost");
        adapter.on_print_err("kept");

        assert_eq!(err.contents(), "kept");
    }

    #[test]
    fn test_log_mirror_keeps_sink_output() {
        let (adapter, out, _err) = memory_adapter();
        let adapter = adapter.with_log_mirror(true);

        adapter.on_print_std("mirrored");
        assert_eq!(out.contents(), "mirrored");
    }

    #[test]
    fn test_trait_object_and_arc_forwarding() {
        let (adapter, out, err) = memory_adapter();
        let shared: Arc<dyn ZenGardenListener> = Arc::new(adapter);

        shared.on_print_std("a");
        Arc::clone(&shared).on_print_err("b");

        assert_eq!(out.contents(), "a");
        assert_eq!(err.contents(), "b");
    }

    #[test]
    fn test_from_config_respects_flags() {
        let config = ListenerConfig {
            flush_each_write: false,
            mirror_to_log: true,
        };
        let adapter = ZenGardenAdapter::from_config(&config);
        assert!(adapter.mirror_to_log);
    }
}
