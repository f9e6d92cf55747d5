//! Handler module - action handlers and their registry.
//!
//! Provides:
//! - [`ActionHandler`] - a named unit of logic for one action
//! - [`HandlerRegistry`] - maps action names to handlers
//! - [`CallContext`] - gives handlers the call and a way to send results
//!
//! # Example
//!
//! ```
//! use action_dispatch::handler::{ActionHandler, CallContext, HandlerRegistry};
//! use action_dispatch::CallResult;
//!
//! struct Login;
//!
//! impl ActionHandler for Login {
//!     fn name(&self) -> &str {
//!         "login"
//!     }
//!
//!     fn invoke(&self, cx: &CallContext<'_>) -> bool {
//!         cx.send_result(CallResult::success());
//!         true
//!     }
//! }
//!
//! let mut registry = HandlerRegistry::new();
//! registry.register(Login);
//! registry.register_fn("ping", |_cx| true);
//! ```

mod context;
mod registry;

pub use context::CallContext;
pub use registry::{ActionHandler, FnHandler, HandlerRegistry};
