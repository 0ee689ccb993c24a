/**
 * Backend Error Types
 *
 * Every handler returns `BackendError`; its variant decides the status code.
 *
 * # Error Categories
 *
 * ## Validation
 *
 * Raised before any network or database call (`400`). They come from
 * `SharedError::ValidationError` or from the intercom planners.
 *
 * ## Persistence
 *
 * `sqlx::Error` is carried verbatim. Unique violations map to `409`, a missing
 * row to `404`, everything else to `500`. A server started without a database
 * answers `503`.
 *
 * ## Upstream
 *
 * Failures of the geocoding API map to `502`.
 *
 * Notification dispatch failures never become a response: they are logged and
 * swallowed where the dispatch happens.
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::shared::directory::mailbox::GateRefusal;
use crate::shared::intercom::IntercomError;
use crate::shared::SharedError;

/// PostgreSQL SQLSTATE for unique violations
const UNIQUE_VIOLATION: &str = "23505";

/// Error returned by HTTP handlers
///
/// # Usage
///
/// ```rust
/// use interphone::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::handler(StatusCode::BAD_REQUEST, "Invalid request");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Explicit status chosen by the handler
    #[error("Handler error: {message}")]
    HandlerError {
        status: StatusCode,
        message: String,
    },

    /// The server was started without a database
    #[error("Database not configured")]
    DatabaseUnavailable,

    /// Store failure, surfaced verbatim
    #[error(transparent)]
    DatabaseError(#[from] sqlx::Error),

    /// The address API failed or answered garbage
    #[error("Upstream error: {message}")]
    UpstreamError {
        message: String,
    },

    /// Domain validation or transition failure
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Refusal from the intercom state machine
    #[error(transparent)]
    IntercomError(#[from] IntercomError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl BackendError {
    /// Error with an explicit status
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::NOT_FOUND, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::FORBIDDEN, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::CONFLICT, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Address API failure, answered as 502
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::UpstreamError {
            message: message.into(),
        }
    }

    /// Status code sent to the client
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::DatabaseUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::DatabaseError(err) => match err {
                sqlx::Error::RowNotFound => StatusCode::NOT_FOUND,
                sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                    StatusCode::CONFLICT
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::UpstreamError { .. } => StatusCode::BAD_GATEWAY,
            Self::SharedError(err) => shared_status(err),
            Self::IntercomError(err) => match err {
                IntercomError::Invalid(shared) => shared_status(shared),
                IntercomError::Refused(GateRefusal::NotListed) => StatusCode::NOT_FOUND,
                IntercomError::Refused(_) => StatusCode::CONFLICT,
                IntercomError::Forbidden => StatusCode::FORBIDDEN,
                IntercomError::NotARequest => StatusCode::NOT_FOUND,
                IntercomError::AlreadyResponded { .. } => StatusCode::CONFLICT,
            },
            Self::SerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the `error` field of the body
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::UpstreamError { message } => message.clone(),
            Self::SharedError(SharedError::ValidationError { message, .. }) => message.clone(),
            Self::IntercomError(IntercomError::Invalid(SharedError::ValidationError { message, .. })) => {
                message.clone()
            }
            other => other.to_string(),
        }
    }
}

impl From<GateRefusal> for BackendError {
    fn from(refusal: GateRefusal) -> Self {
        Self::IntercomError(IntercomError::Refused(refusal))
    }
}

fn shared_status(err: &SharedError) -> StatusCode {
    match err {
        SharedError::SerializationError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        SharedError::ValidationError { .. } => StatusCode::BAD_REQUEST,
        SharedError::TransitionError { .. } => StatusCode::CONFLICT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::intercom::RequestStatus;

    #[test]
    fn test_handler_error() {
        let error = BackendError::handler(StatusCode::BAD_REQUEST, "Invalid request");
        match error {
            BackendError::HandlerError { status, message } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(message, "Invalid request");
            }
            _ => panic!("Expected HandlerError"),
        }
    }

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(BackendError::unauthorized("x").status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(BackendError::DatabaseUnavailable.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(BackendError::upstream("down").status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            BackendError::from(sqlx::Error::RowNotFound).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            BackendError::from(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err: BackendError = SharedError::validation("message", "message is required").into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "message is required");
    }

    #[test]
    fn test_intercom_mapping() {
        let cases = [
            (IntercomError::Refused(GateRefusal::NotListed), StatusCode::NOT_FOUND),
            (IntercomError::Refused(GateRefusal::DoNotDisturb), StatusCode::CONFLICT),
            (IntercomError::Refused(GateRefusal::RingDisabled), StatusCode::CONFLICT),
            (IntercomError::Forbidden, StatusCode::FORBIDDEN),
            (IntercomError::NotARequest, StatusCode::NOT_FOUND),
            (
                IntercomError::AlreadyResponded { status: RequestStatus::Accepted },
                StatusCode::CONFLICT,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(BackendError::from(err).status_code(), status);
        }
    }

    #[test]
    fn test_transition_maps_to_conflict() {
        let err: BackendError = SharedError::transition("unlisted", "red_list").into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_already_responded_message() {
        let err = BackendError::from(IntercomError::AlreadyResponded { status: RequestStatus::Declined });
        assert!(err.message().contains("declined"));
    }
}
