//! Dispatcher builder and the lazily initialized action dispatcher.
//!
//! The [`DispatcherBuilder`] collects registration feeds and configuration.
//! The resulting [`ActionDispatcher`] runs those feeds exactly once, on the
//! first call (or first explicit [`ActionDispatcher::ensure_initialized`]),
//! then routes every call to the handler registered for its action name.
//!
//! # Example
//!
//! ```
//! use action_dispatch::{ActionDispatcher, Call, Component};
//! use action_dispatch::sink::ChannelSink;
//!
//! let (sink, mut results) = ChannelSink::channel();
//! let component = ActionDispatcher::builder()
//!     .name("ComponentB")
//!     .action("login", |_cx| true)
//!     .sink(sink)
//!     .build();
//!
//! assert!(component.on_call(&Call::new("login", "c1")));
//! assert!(!component.on_call(&Call::new("logout", "c2")));
//!
//! let report = results.try_recv().unwrap();
//! assert_eq!(report.call_id.as_str(), "c2");
//! ```

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, OnceLock};

use serde::Deserialize;

use crate::call::Call;
use crate::error::DispatchError;
use crate::handler::{ActionHandler, CallContext, FnHandler, HandlerRegistry};
use crate::result::{CallResult, CODE_ERROR_EXCEPTION_RESULT};
use crate::sink::{NullSink, ResultSink};

/// Default identity string of a dispatching unit.
pub const DEFAULT_COMPONENT_NAME: &str = "ComponentB";

/// Default initial capacity of the handler registry.
pub const DEFAULT_REGISTRY_CAPACITY: usize = 4;

/// A dispatching unit as seen by the hosting framework.
pub trait Component: Send + Sync {
    /// Static identity of this unit, used by the host for discovery.
    fn name(&self) -> &str;

    /// Handle an inbound call. Returns the handler's result, or `false` if
    /// the call could not be routed.
    fn on_call(&self, call: &Call) -> bool;
}

/// Configuration for an [`ActionDispatcher`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DispatcherConfig {
    /// Identity string reported by [`Component::name`].
    pub name: String,
    /// Initial capacity of the handler registry.
    pub registry_capacity: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_COMPONENT_NAME.to_string(),
            registry_capacity: DEFAULT_REGISTRY_CAPACITY,
        }
    }
}

/// Deferred registration work, run once inside the initialization window.
type RegistrationFeed = Box<dyn FnOnce(&mut HandlerRegistry) + Send + 'static>;

/// Builder for configuring and creating an [`ActionDispatcher`].
///
/// Nothing registered here touches the registry until the dispatcher is
/// first used.
pub struct DispatcherBuilder {
    config: DispatcherConfig,
    feeds: Vec<RegistrationFeed>,
    sink: Option<Arc<dyn ResultSink>>,
}

impl DispatcherBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: DispatcherConfig::default(),
            feeds: Vec::new(),
            sink: None,
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: DispatcherConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the identity string of the unit.
    ///
    /// Default: "ComponentB"
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Set the initial registry capacity.
    ///
    /// Default: 4
    pub fn registry_capacity(mut self, capacity: usize) -> Self {
        self.config.registry_capacity = capacity;
        self
    }

    /// Set the sink receiving error reports and handler results.
    ///
    /// Default: [`NullSink`]
    pub fn sink<S: ResultSink>(mut self, sink: S) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Set a sink shared with other units.
    pub fn shared_sink(mut self, sink: Arc<dyn ResultSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Register a handler value.
    pub fn handler<H: ActionHandler>(mut self, handler: H) -> Self {
        self.feeds.push(Box::new(move |registry| registry.register(handler)));
        self
    }

    /// Register a closure handler for `name`.
    pub fn action<F>(self, name: &str, handler: F) -> Self
    where
        F: Fn(&CallContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.handler(FnHandler::new(name, handler))
    }

    /// Add a registration feed.
    ///
    /// The feed runs once, when the dispatcher initializes, after every feed
    /// added before it.
    pub fn registrations<F>(mut self, feed: F) -> Self
    where
        F: FnOnce(&mut HandlerRegistry) + Send + 'static,
    {
        self.feeds.push(Box::new(feed));
        self
    }

    /// Build the dispatcher. Registration is deferred to first use.
    pub fn build(self) -> ActionDispatcher {
        ActionDispatcher {
            config: self.config,
            registry: OnceLock::new(),
            feeds: Mutex::new(self.feeds),
            sink: self.sink.unwrap_or_else(|| Arc::new(NullSink)),
        }
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Routes calls to handlers by action name.
///
/// The registry is populated exactly once, even under concurrent first
/// calls; callers racing the first population block until it completes.
/// Afterwards lookups take no lock.
pub struct ActionDispatcher {
    config: DispatcherConfig,
    registry: OnceLock<HandlerRegistry>,
    /// Drained by the first initialization.
    feeds: Mutex<Vec<RegistrationFeed>>,
    sink: Arc<dyn ResultSink>,
}

impl ActionDispatcher {
    /// Create a new dispatcher builder.
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    /// Configuration this dispatcher was built with.
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Populate the registry if that has not happened yet, and return it.
    ///
    /// A registration feed that panics is skipped: handlers it registered
    /// before panicking stay, and the remaining feeds still run.
    pub fn ensure_initialized(&self) -> &HandlerRegistry {
        self.initialize().0
    }

    /// Like [`ensure_initialized`](Self::ensure_initialized), but also
    /// returns the panic messages of failed feeds to the caller that ran
    /// population. Every other caller gets an empty list.
    fn initialize(&self) -> (&HandlerRegistry, Vec<String>) {
        let mut failures = Vec::new();
        let registry = self.registry.get_or_init(|| self.populate(&mut failures));
        (registry, failures)
    }

    fn populate(&self, failures: &mut Vec<String>) -> HandlerRegistry {
        let feeds = std::mem::take(&mut *self.feeds.lock().unwrap_or_else(|e| e.into_inner()));
        let mut registry = HandlerRegistry::with_capacity(self.config.registry_capacity);
        for feed in feeds {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| feed(&mut registry))) {
                let message = panic_message(&*payload);
                tracing::error!(
                    component = %self.config.name,
                    "Registration feed panicked: {}",
                    message
                );
                failures.push(message);
            }
        }
        tracing::debug!(
            component = %self.config.name,
            handlers = registry.len(),
            failed_feeds = failures.len(),
            "Action registry initialized"
        );
        registry
    }

    /// Whether the registry has been populated.
    pub fn is_initialized(&self) -> bool {
        self.registry.get().is_some()
    }

    /// Registered action names, sorted. Forces initialization.
    pub fn action_names(&self) -> Vec<&str> {
        self.ensure_initialized().action_names()
    }

    /// Number of registered handlers. Forces initialization.
    pub fn handler_count(&self) -> usize {
        self.ensure_initialized().len()
    }

    /// Route `call` to its handler.
    ///
    /// Returns the handler's result unchanged. When no handler exists, an
    /// error naming the action is reported to the call's id and `false` is
    /// returned. Panics from handlers are caught and reported the same way,
    /// as are registration feed panics, to the call that triggered
    /// population.
    pub fn dispatch(&self, call: &Call) -> bool {
        let (registry, failures) = self.initialize();
        if !failures.is_empty() {
            let err = DispatchError::HandlerPanicked {
                action: call.action_name().to_string(),
                message: format!("registration failed: {}", failures.join("; ")),
            };
            return self.report_panic(call, err);
        }

        let Some(handler) = registry.get_handler(call.action_name()) else {
            let err = DispatchError::UnroutableAction {
                action: call.action_name().to_string(),
            };
            tracing::warn!(
                component = %self.config.name,
                call_id = %call.call_id(),
                "{}",
                err
            );
            self.sink.report_error(call.call_id(), &err.to_string());
            return false;
        };

        tracing::debug!(
            component = %self.config.name,
            action = call.action_name(),
            call_id = %call.call_id(),
            "Dispatching call"
        );

        let cx = CallContext::new(call, self.sink.as_ref());
        match panic::catch_unwind(AssertUnwindSafe(|| handler.invoke(&cx))) {
            Ok(result) => result,
            Err(payload) => {
                let err = DispatchError::HandlerPanicked {
                    action: call.action_name().to_string(),
                    message: panic_message(&*payload),
                };
                self.report_panic(call, err)
            }
        }
    }

    fn report_panic(&self, call: &Call, err: DispatchError) -> bool {
        tracing::error!(
            component = %self.config.name,
            call_id = %call.call_id(),
            "{}",
            err
        );
        self.sink.send_result(
            call.call_id(),
            CallResult::error_with_code(CODE_ERROR_EXCEPTION_RESULT, err.to_string()),
        );
        false
    }
}

impl Component for ActionDispatcher {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn on_call(&self, call: &Call) -> bool {
        self.dispatch(call)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
