// Notifier: engine-side fan-out of print calls
// Single Responsibility: listener registry and delivery order

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::listener::{ZenGardenAdapter, ZenGardenListener};

/// Handle returned by [`Notifier::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

type Registry = Vec<(ListenerId, Arc<dyn ZenGardenListener>)>;

/// Delivers engine print calls to every registered listener
///
/// Delivery follows registration order. The listener list is snapshotted
/// before delivery, so a listener may add or remove listeners from inside a
/// callback; the change applies from the next print.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use zengarden_listener::{zg_print_std, MemorySink, Notifier, ZenGardenAdapter};
///
/// let out = MemorySink::new();
/// let notifier = Notifier::new();
/// notifier.add_listener(Arc::new(ZenGardenAdapter::new(out.clone(), MemorySink::new())));
///
/// zg_print_std!(notifier, "block size: {}\n", 64);
/// assert_eq!(out.contents(), "block size: 64\n");
/// ```
pub struct Notifier {
    listeners: RwLock<Registry>,
    next_id: AtomicU64,
}

impl Notifier {
    /// Create a notifier with no listeners. Prints are dropped until one is added.
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Create a notifier pre-wired to the stdio [`ZenGardenAdapter`].
    pub fn with_default_listener() -> Self {
        let notifier = Self::new();
        notifier.add_listener(Arc::new(ZenGardenAdapter::stdio()));
        notifier
    }

    pub fn add_listener(&self, listener: Arc<dyn ZenGardenListener>) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.write_registry().push((id, listener));
        log::debug!("[Notifier] Registered listener {}", id.0);
        id
    }

    /// Returns `false` if `id` was not registered (or already removed).
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut registry = self.write_registry();
        let before = registry.len();
        registry.retain(|(registered, _)| *registered != id);
        let removed = registry.len() != before;
        if removed {
            log::debug!("[Notifier] Removed listener {}", id.0);
        }
        removed
    }

    pub fn listener_count(&self) -> usize {
        self.snapshot().len()
    }

    pub fn print_std(&self, message: &str) {
        let listeners = self.snapshot();
        if listeners.is_empty() {
            log::trace!("[Notifier] No listeners, dropping std message");
            return;
        }
        for listener in &listeners {
            listener.on_print_std(message);
        }
    }

    pub fn print_err(&self, message: &str) {
        let listeners = self.snapshot();
        if listeners.is_empty() {
            log::trace!("[Notifier] No listeners, dropping err message");
            return;
        }
        for listener in &listeners {
            listener.on_print_err(message);
        }
    }

    /// Format once, then deliver as [`Notifier::print_std`].
    pub fn print_std_fmt(&self, args: fmt::Arguments<'_>) {
        match args.as_str() {
            Some(literal) => self.print_std(literal),
            None => self.print_std(&args.to_string()),
        }
    }

    /// Format once, then deliver as [`Notifier::print_err`].
    pub fn print_err_fmt(&self, args: fmt::Arguments<'_>) {
        match args.as_str() {
            Some(literal) => self.print_err(literal),
            None => self.print_err(&args.to_string()),
        }
    }

    fn snapshot(&self) -> Vec<Arc<dyn ZenGardenListener>> {
        self.listeners
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect()
    }

    fn write_registry(&self) -> std::sync::RwLockWriteGuard<'_, Registry> {
        self.listeners
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Formatted standard print through a [`Notifier`].
#[macro_export]
macro_rules! zg_print_std {
    ($notifier:expr, $($arg:tt)*) => {
        $notifier.print_std_fmt(::std::format_args!($($arg)*))
    };
}

/// Formatted error print through a [`Notifier`].
#[macro_export]
macro_rules! zg_print_err {
    ($notifier:expr, $($arg:tt)*) => {
        $notifier.print_err_fmt(::std::format_args!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::{PrintEvent, PrintStream, RecordingListener};

    #[test]
    fn test_empty_notifier_drops_messages() {
        let notifier = Notifier::new();
        assert_eq!(notifier.listener_count(), 0);
        notifier.print_std("nobody listening");
        notifier.print_err("nobody listening");
    }

    #[test]
    fn test_delivery_follows_registration_order() {
        let order = Arc::new(RecordingListener::new());

        struct Tagged {
            tag: &'static str,
            log: Arc<RecordingListener>,
        }

        impl ZenGardenListener for Tagged {
            fn on_print_err(&self, message: &str) {
                self.log.on_print_err(&format!("{}:{}", self.tag, message));
            }

            fn on_print_std(&self, message: &str) {
                self.log.on_print_std(&format!("{}:{}", self.tag, message));
            }
        }

        let notifier = Notifier::new();
        for tag in ["a", "b", "c"] {
            notifier.add_listener(Arc::new(Tagged {
                tag,
                log: Arc::clone(&order),
            }));
        }

        notifier.print_std("x");
        let messages: Vec<String> = order
            .transcript()
            .events
            .into_iter()
            .map(|event| event.message)
            .collect();
        assert_eq!(messages, vec!["a:x", "b:x", "c:x"]);
    }

    #[test]
    fn test_removed_listener_receives_nothing() {
        let kept = Arc::new(RecordingListener::new());
        let removed = Arc::new(RecordingListener::new());

        let notifier = Notifier::new();
        notifier.add_listener(kept.clone());
        let id = notifier.add_listener(removed.clone());

        notifier.print_err("first");
        assert!(notifier.remove_listener(id));
        assert!(!notifier.remove_listener(id));
        notifier.print_err("second");

        assert_eq!(kept.transcript().len(), 2);
        assert_eq!(
            removed.transcript().events,
            vec![PrintEvent::new(PrintStream::Error, "first")]
        );
    }

    #[test]
    fn test_listener_ids_are_not_reused() {
        let notifier = Notifier::new();
        let first = notifier.add_listener(Arc::new(RecordingListener::new()));
        notifier.remove_listener(first);
        let second = notifier.add_listener(Arc::new(RecordingListener::new()));
        assert!(second > first);
    }

    #[test]
    fn test_formatted_prints() {
        let recorder = Arc::new(RecordingListener::new());
        let notifier = Notifier::new();
        notifier.add_listener(recorder.clone());

        zg_print_std!(notifier, "sample rate: {}Hz\n", 44100);
        zg_print_err!(notifier, "unknown object: {}", "osc~~");
        zg_print_std!(notifier, "literal");

        assert_eq!(
            recorder.transcript().events,
            vec![
                PrintEvent::new(PrintStream::Standard, "sample rate: 44100Hz\n"),
                PrintEvent::new(PrintStream::Error, "unknown object: osc~~"),
                PrintEvent::new(PrintStream::Standard, "literal"),
            ]
        );
    }

    #[test]
    fn test_listener_may_register_during_delivery() {
        struct Registrar {
            notifier: Arc<Notifier>,
            late: Arc<RecordingListener>,
        }

        impl ZenGardenListener for Registrar {
            fn on_print_err(&self, _message: &str) {}

            fn on_print_std(&self, _message: &str) {
                self.notifier.add_listener(self.late.clone());
            }
        }

        let notifier = Arc::new(Notifier::new());
        let late = Arc::new(RecordingListener::new());
        notifier.add_listener(Arc::new(Registrar {
            notifier: Arc::clone(&notifier),
            late: Arc::clone(&late),
        }));

        notifier.print_std("trigger");
        assert!(late.transcript().is_empty());
        assert_eq!(notifier.listener_count(), 2);
    }

    #[test]
    fn test_default_listener_is_registered() {
        assert_eq!(Notifier::with_default_listener().listener_count(), 1);
    }
}
