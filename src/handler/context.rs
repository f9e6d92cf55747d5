//! Call context for handlers.
//!
//! Gives a handler read access to the [`Call`] and a way to deliver its own
//! result back to the caller through the dispatcher's sink.
//!
//! # Example
//!
//! ```ignore
//! fn login(cx: &CallContext<'_>) -> bool {
//!     let user: Option<String> = cx.param("user").unwrap_or(None);
//!     cx.send_result(CallResult::success_with("user", user).unwrap());
//!     true
//! }
//! ```

use serde::de::DeserializeOwned;

use crate::call::{Call, CallId};
use crate::error::Result;
use crate::result::CallResult;
use crate::sink::ResultSink;

/// Context passed to action handlers.
///
/// Borrowed for the duration of a single dispatch.
#[derive(Clone, Copy)]
pub struct CallContext<'a> {
    call: &'a Call,
    sink: &'a dyn ResultSink,
}

impl<'a> CallContext<'a> {
    /// Create a context for `call` delivering results to `sink`.
    pub fn new(call: &'a Call, sink: &'a dyn ResultSink) -> Self {
        Self { call, sink }
    }

    /// The call being handled.
    #[inline]
    pub fn call(&self) -> &'a Call {
        self.call
    }

    /// Get the action name.
    #[inline]
    pub fn action_name(&self) -> &'a str {
        self.call.action_name()
    }

    /// Get the call id.
    #[inline]
    pub fn call_id(&self) -> &'a CallId {
        self.call.call_id()
    }

    /// Read a typed call parameter.
    pub fn param<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.call.param(key)
    }

    /// Deliver a result to the caller.
    pub fn send_result(&self, result: CallResult) {
        self.sink.send_result(self.call.call_id(), result);
    }
}
