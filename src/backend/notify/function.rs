/**
 * Email Function Stub
 *
 * Serves `POST /functions/v1/send-notification-email`. The function validates the
 * payload and logs it; it does not deliver anything.
 */

use axum::{http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};

use crate::backend::error::BackendError;

/// Incoming payload; fields are optional so that missing ones map to `400`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmailFunctionRequest {
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub html: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmailFunctionResponse {
    pub success: bool,
    pub message: String,
}

/// Log an email notification
pub async fn send_notification_email(
    Json(request): Json<EmailFunctionRequest>,
) -> Result<Json<EmailFunctionResponse>, BackendError> {
    if request.to.trim().is_empty() || request.subject.trim().is_empty() || request.html.trim().is_empty() {
        tracing::warn!("Email function called without to/subject/html");
        return Err(BackendError::handler(
            StatusCode::BAD_REQUEST,
            "Missing required fields: to, subject, html",
        ));
    }

    tracing::info!(
        "Sending {} email to {} with subject: {}",
        request.kind.as_deref().unwrap_or("notification"),
        request.to,
        request.subject
    );
    tracing::debug!("Email content: {}", request.html);

    Ok(Json(EmailFunctionResponse {
        success: true,
        message: "Email notification logged successfully".to_string(),
    }))
}
