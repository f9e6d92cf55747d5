//! Handler registry for dispatching calls by action name.
//!
//! The registry maps action names to handlers. Registering a second handler
//! under an existing name replaces the first (last registration wins) and
//! logs a warning.
//!
//! # Example
//!
//! ```
//! use action_dispatch::handler::HandlerRegistry;
//!
//! let mut registry = HandlerRegistry::new();
//! registry.register_fn("ping", |_cx| true);
//!
//! assert!(registry.get_handler("ping").is_some());
//! assert!(registry.get_handler("pong").is_none());
//! ```

use std::collections::HashMap;

use super::CallContext;

/// Trait for action handlers.
pub trait ActionHandler: Send + Sync + 'static {
    /// Action name this handler serves.
    fn name(&self) -> &str;

    /// Run the action. Returns whether it succeeded.
    fn invoke(&self, cx: &CallContext<'_>) -> bool;
}

/// Handler built from a name and a closure.
pub struct FnHandler<F>
where
    F: Fn(&CallContext<'_>) -> bool + Send + Sync + 'static,
{
    name: String,
    handler: F,
}

impl<F> FnHandler<F>
where
    F: Fn(&CallContext<'_>) -> bool + Send + Sync + 'static,
{
    /// Create a new closure handler.
    pub fn new(name: impl Into<String>, handler: F) -> Self {
        Self {
            name: name.into(),
            handler,
        }
    }
}

impl<F> ActionHandler for FnHandler<F>
where
    F: Fn(&CallContext<'_>) -> bool + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&self, cx: &CallContext<'_>) -> bool {
        (self.handler)(cx)
    }
}

/// Registry mapping action names to handlers.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Box<dyn ActionHandler>>,
}

impl HandlerRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry sized for `capacity` actions.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            handlers: HashMap::with_capacity(capacity),
        }
    }

    /// Register a handler under its own name.
    ///
    /// Replaces any handler already registered under that name.
    pub fn register<H: ActionHandler>(&mut self, handler: H) {
        self.register_boxed(Box::new(handler));
    }

    /// Register an already boxed handler.
    pub fn register_boxed(&mut self, handler: Box<dyn ActionHandler>) {
        let name = handler.name().to_string();
        if self.handlers.insert(name.clone(), handler).is_some() {
            tracing::warn!(
                action = %name,
                "Duplicate action registration, replacing previous handler"
            );
        } else {
            tracing::debug!(action = %name, "Registered action handler");
        }
    }

    /// Register a closure handler.
    pub fn register_fn<F>(&mut self, name: &str, handler: F)
    where
        F: Fn(&CallContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.register(FnHandler::new(name, handler));
    }

    /// Get a handler by action name.
    pub fn get_handler(&self, name: &str) -> Option<&dyn ActionHandler> {
        self.handlers.get(name).map(|h| h.as_ref())
    }

    /// Whether a handler is registered for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered action names, sorted.
    pub fn action_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
