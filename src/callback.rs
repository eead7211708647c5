//! Raw engine callback bridge
//!
//! The native engine does not know about Rust traits. It registers a single C
//! function plus an opaque `user_data` pointer and calls it as
//! `callback(function, user_data, ptr)`, where `function` says what happened and
//! `ptr` points at a NUL-terminated message. This module turns that call back
//! into a [`ZenGardenListener`] notification.
//!
//! # Architecture
//! ```text
//! engine printStd/printErr
//!   └─> zg_listener_trampoline(function, user_data, ptr)   [C ABI]
//!       ├─> CallbackFunction::try_from(function)
//!       ├─> ListenerHandle (from user_data)
//!       └─> dispatch() ─> on_print_std / on_print_err
//! ```

use std::ffi::{c_int, c_void, CStr};

use crate::error::UnknownCallback;
use crate::listener::ZenGardenListener;

/// Notification codes passed as the first callback argument.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackFunction {
    PrintStd = 0,
    PrintErr = 1,
}

impl TryFrom<i32> for CallbackFunction {
    type Error = UnknownCallback;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(CallbackFunction::PrintStd),
            1 => Ok(CallbackFunction::PrintErr),
            other => Err(UnknownCallback(other)),
        }
    }
}

/// Route one message to the matching listener operation.
pub fn dispatch(listener: &dyn ZenGardenListener, function: CallbackFunction, message: &str) {
    match function {
        CallbackFunction::PrintStd => listener.on_print_std(message),
        CallbackFunction::PrintErr => listener.on_print_err(message),
    }
}

/// Owns a listener on behalf of the engine.
///
/// The listener is double-boxed so [`ListenerHandle::user_data`] is a thin
/// pointer that stays valid until the handle is dropped. The host must keep the
/// handle alive for as long as the engine may invoke the callback.
pub struct ListenerHandle {
    listener: Box<Box<dyn ZenGardenListener>>,
}

impl ListenerHandle {
    pub fn new<L: ZenGardenListener + 'static>(listener: L) -> Self {
        Self {
            listener: Box::new(Box::new(listener)),
        }
    }

    /// Pointer to hand to the engine as callback `user_data`.
    pub fn user_data(&self) -> *mut c_void {
        let inner: *const Box<dyn ZenGardenListener> = &*self.listener;
        inner as *mut c_void
    }

    pub fn listener(&self) -> &dyn ZenGardenListener {
        &**self.listener
    }
}

/// C ABI entry point the engine registers as its callback.
///
/// Null `user_data`, null `ptr` or an unknown `function` code is ignored.
/// Invalid UTF-8 in the message is replaced lossily.
///
/// # Safety
/// `user_data` must be null or come from [`ListenerHandle::user_data`] on a
/// handle that is still alive. `ptr` must be null or point at a NUL-terminated
/// string that stays valid for the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn zg_listener_trampoline(
    function: c_int,
    user_data: *mut c_void,
    ptr: *mut c_void,
) {
    let function = match CallbackFunction::try_from(function) {
        Ok(function) => function,
        Err(err) => {
            log::debug!("[Callback] Ignoring callback: {}", err);
            return;
        }
    };

    if user_data.is_null() || ptr.is_null() {
        log::debug!(
            "[Callback] Ignoring {:?} with null user_data or message",
            function
        );
        return;
    }

    // SAFETY: guaranteed by the caller contract above.
    let listener = unsafe { &*(user_data as *const Box<dyn ZenGardenListener>) };
    let message = unsafe { CStr::from_ptr(ptr as *const std::ffi::c_char) }.to_string_lossy();

    dispatch(&**listener, function, &message);
}
