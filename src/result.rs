//! Call results delivered back to the caller.
//!
//! # Example
//!
//! ```
//! use action_dispatch::CallResult;
//!
//! let ok = CallResult::success_with("token", "abc").unwrap();
//! assert!(ok.is_success());
//!
//! let err = CallResult::error("has not support for action:logout");
//! assert_eq!(err.code(), action_dispatch::result::CODE_ERROR_BUSINESS);
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// The call completed successfully.
pub const CODE_SUCCESS: i32 = 0;

/// The action ran (or was rejected) and reported a business-level failure.
pub const CODE_ERROR_BUSINESS: i32 = 1;

/// The handler panicked while processing the call.
pub const CODE_ERROR_EXCEPTION_RESULT: i32 = -4;

/// Outcome of a call, as seen by the original caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallResult {
    code: i32,
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
    #[serde(default)]
    data: Map<String, Value>,
}

impl CallResult {
    /// Successful result with no data.
    pub fn success() -> Self {
        Self {
            code: CODE_SUCCESS,
            success: true,
            error_message: None,
            data: Map::new(),
        }
    }

    /// Successful result carrying a single data entry.
    pub fn success_with<T: Serialize>(key: impl Into<String>, value: T) -> Result<Self> {
        Self::success().add_data(key, value)
    }

    /// Business error with a human-readable message.
    pub fn error(message: impl Into<String>) -> Self {
        Self::error_with_code(CODE_ERROR_BUSINESS, message)
    }

    /// Error with an explicit result code.
    pub fn error_with_code(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            success: false,
            error_message: Some(message.into()),
            data: Map::new(),
        }
    }

    /// Add a data entry, serializing it to JSON.
    pub fn add_data<T: Serialize>(mut self, key: impl Into<String>, value: T) -> Result<Self> {
        self.data.insert(key.into(), serde_json::to_value(value)?);
        Ok(self)
    }

    /// Read a typed data entry.
    pub fn data<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.data.get(key) {
            Some(value) => Ok(Some(T::deserialize(value)?)),
            None => Ok(None),
        }
    }

    /// Result code.
    #[inline]
    pub fn code(&self) -> i32 {
        self.code
    }

    /// Whether the call succeeded.
    #[inline]
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Error message, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}
