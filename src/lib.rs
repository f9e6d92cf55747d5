//! # action-dispatch
//!
//! Lazily initialized, thread-safe action dispatcher for component frameworks.
//!
//! A dispatching unit receives a [`Call`] naming an action, routes it to the
//! single handler registered for that action, and reports an error through a
//! [`ResultSink`] when no handler exists.
//!
//! ## Architecture
//!
//! - **Registry initializer**: handlers are registered exactly once, on first
//!   use, even when many threads make the first call at the same time
//! - **Dispatcher**: resolves the handler by action name and forwards its
//!   boolean result
//!
//! ## Example
//!
//! ```
//! use action_dispatch::{ActionDispatcher, Call, CallResult, Component};
//! use action_dispatch::sink::JsonLineSink;
//!
//! let component = ActionDispatcher::builder()
//!     .name("ComponentB")
//!     .action("login", |cx| {
//!         cx.send_result(CallResult::success());
//!         true
//!     })
//!     .sink(JsonLineSink::stdout())
//!     .build();
//!
//! assert!(component.on_call(&Call::new("login", "c1")));
//! assert!(!component.on_call(&Call::new("logout", "c2")));
//! ```

pub mod call;
pub mod error;
pub mod handler;
pub mod logging;
pub mod result;
pub mod sink;

mod component;

pub use call::{Call, CallId};
pub use component::{
    ActionDispatcher, Component, DispatcherBuilder, DispatcherConfig, DEFAULT_COMPONENT_NAME,
    DEFAULT_REGISTRY_CAPACITY,
};
pub use error::DispatchError;
pub use handler::{ActionHandler, CallContext};
pub use result::CallResult;
pub use sink::ResultSink;
