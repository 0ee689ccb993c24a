//! Shared Error Types
//!
//! Failures decided without any I/O. The backend wraps them in `BackendError`
//! and maps each variant to a status code.
//!
//! # Error Categories
//!
//! - `ValidationError` - Input rejected before any network or database call
//! - `TransitionError` - A contact request or mailbox flag cannot move to the
//!   requested state
//! - `SerializationError` - a payload could not be encoded or decoded
//!
//! # Usage
//!
//! ```rust
//! use interphone::shared::error::SharedError;
//!
//! let error = SharedError::validation("message", "Message cannot be empty");
//! ```
use thiserror::Error;

/// Error raised by the pure domain layer
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    #[error("Serialization error: {message}")]
    SerializationError {
        message: String,
    },

    /// Input rejected; `field` names the offending request field
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        field: String,
        message: String,
    },

    /// State transition refused
    #[error("Cannot move from '{from}' to '{to}'")]
    TransitionError {
        /// Current state
        from: String,
        /// Requested state
        to: String,
    },
}

impl SharedError {
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Rejection of `field` with a message shown to the caller
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn transition(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::TransitionError {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Whether this error was raised by input validation
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError { .. })
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}

/// Require a non-blank string field, returning its trimmed value
pub fn require_text<'a>(field: &str, value: &'a str) -> Result<&'a str, SharedError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SharedError::validation(field, format!("{} is required", field)));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = SharedError::validation("email", "Invalid email format");
        match error {
            SharedError::ValidationError { field, message } => {
                assert_eq!(field, "email");
                assert_eq!(message, "Invalid email format");
            }
            _ => panic!("Expected ValidationError"),
        }
    }

    #[test]
    fn test_transition_error_display() {
        let error = SharedError::transition("accepted", "declined");
        let display = format!("{}", error);
        assert!(display.contains("accepted"));
        assert!(display.contains("declined"));
        assert!(!error.is_validation());
    }

    #[test]
    fn test_from_serde_error() {
        let result: Result<serde_json::Value, _> = serde_json::from_str("{ invalid json }");
        let shared_error: SharedError = result.unwrap_err().into();
        assert!(matches!(shared_error, SharedError::SerializationError { .. }));
    }

    #[test]
    fn test_require_text_trims() {
        assert_eq!(require_text("message", "  Colis  ").unwrap(), "Colis");
    }

    #[test]
    fn test_require_text_rejects_blank() {
        let err = require_text("message", "   \n\t").unwrap_err();
        assert!(err.is_validation());
    }
}
