//! Inbound calls.
//!
//! A [`Call`] names the action to run, carries the [`CallId`] used to address
//! results back to the caller, and an optional map of JSON parameters.
//!
//! # Example
//!
//! ```
//! use action_dispatch::Call;
//!
//! let call = Call::new("login", "c1")
//!     .with_param("user", "billy")
//!     .unwrap();
//!
//! assert_eq!(call.action_name(), "login");
//! assert_eq!(call.param::<String>("user").unwrap().as_deref(), Some("billy"));
//! ```

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// Opaque identifier of a call, used to route results back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallId(String);

impl CallId {
    /// Create a call id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CallId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CallId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// An inbound request for a named action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Call {
    action_name: String,
    call_id: CallId,
    #[serde(default)]
    params: Map<String, Value>,
}

impl Call {
    /// Create a call with no parameters.
    pub fn new(action_name: impl Into<String>, call_id: impl Into<CallId>) -> Self {
        Self {
            action_name: action_name.into(),
            call_id: call_id.into(),
            params: Map::new(),
        }
    }

    /// Attach a parameter, serializing it to JSON.
    pub fn with_param<T: Serialize>(mut self, key: impl Into<String>, value: T) -> Result<Self> {
        self.params.insert(key.into(), serde_json::to_value(value)?);
        Ok(self)
    }

    /// Get the action name.
    #[inline]
    pub fn action_name(&self) -> &str {
        &self.action_name
    }

    /// Get the call id.
    #[inline]
    pub fn call_id(&self) -> &CallId {
        &self.call_id
    }

    /// Raw parameter map.
    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    /// Read a typed parameter.
    ///
    /// Returns `Ok(None)` when the key is absent and an error when the value
    /// does not deserialize into `T`.
    pub fn param<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.params.get(key) {
            Some(value) => Ok(Some(T::deserialize(value)?)),
            None => Ok(None),
        }
    }
}
