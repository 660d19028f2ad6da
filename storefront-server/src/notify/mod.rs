//! Notifier collaborator
//!
//! Order creation and status changes inform an external notification
//! service (which owns templating, delivery and retries). Every call from
//! this crate is best-effort: bounded by a timeout, logged on failure,
//! never surfaced to the caller.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use crate::db::models::OrderStatus;

/// What the notification is about
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "intent", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationIntent {
    OrderPlaced,
    StatusChanged { status: OrderStatus },
}

/// Outbound notification payload
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub recipient_email: String,
    pub recipient_name: String,
    #[serde(flatten)]
    pub intent: NotificationIntent,
    pub order_id: String,
    pub summary: String,
}

/// Notifier errors
#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("Notification endpoint returned status {0}")]
    Endpoint(u16),

    #[error("Notification request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifierError>;
}

/// Posts notifications as JSON to a configured HTTP endpoint
pub struct WebhookNotifier {
    client: reqwest::Client,
    endpoint: String,
}

impl WebhookNotifier {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifierError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(notification)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(NotifierError::Endpoint(response.status().as_u16()));
        }
        Ok(())
    }
}

/// Used when no endpoint is configured
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifierError> {
        tracing::debug!(
            order_id = %notification.order_id,
            recipient = %notification.recipient_email,
            "Notification skipped (no endpoint configured)"
        );
        Ok(())
    }
}

/// Fire a notification without letting its outcome affect the caller.
///
/// Failures and timeouts are logged and swallowed; retry belongs to the
/// notification service, not here.
pub async fn send_best_effort(notifier: &dyn Notifier, notification: Notification, timeout: Duration) {
    match tokio::time::timeout(timeout, notifier.notify(&notification)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            tracing::warn!(
                order_id = %notification.order_id,
                error = %e,
                "Notification failed"
            );
        }
        Err(_) => {
            tracing::warn!(
                order_id = %notification.order_id,
                timeout_ms = timeout.as_millis() as u64,
                "Notification timed out"
            );
        }
    }
}
