/**
 * Notification Dispatch
 *
 * Hands composed emails to the email function. Delivery is best effort: callers
 * use `dispatch_best_effort`, which logs failures at `warn` and never returns an
 * error, so a failed email never undoes a stored ring or response.
 */

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::shared::intercom::EmailNotification;

/// Timeout for outbound HTTP calls
pub const OUTBOUND_TIMEOUT: Duration = Duration::from_secs(10);

/// Dispatch failures
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("email function unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("email function answered {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("email function reported failure")]
    Unsuccessful,
}

/// Something that can deliver an email notification
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn dispatch(&self, notification: &EmailNotification) -> Result<(), DispatchError>;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

/// Dispatch and swallow failures
pub async fn dispatch_best_effort(dispatcher: &dyn NotificationDispatcher, notification: &EmailNotification) {
    match dispatcher.dispatch(notification).await {
        Ok(()) => tracing::info!(
            dispatcher = dispatcher.name(),
            kind = notification.kind.as_str(),
            "Notification dispatched to {}",
            notification.to
        ),
        Err(e) => tracing::warn!(
            dispatcher = dispatcher.name(),
            kind = notification.kind.as_str(),
            "Failed to dispatch notification to {}: {}",
            notification.to,
            e
        ),
    }
}

/// Posts `{to, subject, html, type}` to the email function
pub struct HttpFunctionDispatcher {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FunctionReply {
    #[serde(default)]
    success: bool,
}

impl HttpFunctionDispatcher {
    pub fn new(url: impl Into<String>, api_key: Option<String>) -> Result<Self, DispatchError> {
        let client = reqwest::Client::builder().timeout(OUTBOUND_TIMEOUT).build()?;
        Ok(Self {
            client,
            url: url.into(),
            api_key,
        })
    }
}

#[async_trait]
impl NotificationDispatcher for HttpFunctionDispatcher {
    async fn dispatch(&self, notification: &EmailNotification) -> Result<(), DispatchError> {
        let mut request = self.client.post(&self.url).json(notification);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DispatchError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let reply: FunctionReply = response.json().await?;
        if reply.success {
            Ok(())
        } else {
            Err(DispatchError::Unsuccessful)
        }
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Logs notifications instead of sending them
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDispatcher;

#[async_trait]
impl NotificationDispatcher for LogDispatcher {
    async fn dispatch(&self, notification: &EmailNotification) -> Result<(), DispatchError> {
        tracing::info!(
            kind = notification.kind.as_str(),
            "Sending {} email to {} with subject: {}",
            notification.kind.as_str(),
            notification.to,
            notification.subject
        );
        tracing::debug!("Email content: {}", notification.html);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::intercom::notification::compose_declined;

    #[tokio::test]
    async fn test_log_dispatcher_always_succeeds() {
        let email = compose_declined("sender@example.fr", "Chez Paul");
        assert!(LogDispatcher.dispatch(&email).await.is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_function_is_swallowed() {
        let dispatcher = HttpFunctionDispatcher::new("http://127.0.0.1:9/unreachable", None).unwrap();
        let email = compose_declined("sender@example.fr", "Chez Paul");
        assert!(dispatcher.dispatch(&email).await.is_err());
        dispatch_best_effort(&dispatcher, &email).await;
    }
}
