//! Outbound transactional e-mail.
//!
//! Delivery is best effort: callers use [`dispatch`], which never fails and
//! instead reports a [`NotificationReport`] to attach to the API response.

mod resend;
pub mod templates;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use resend::ResendNotifier;

/// Single plain-text message addressed to one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
}

/// Successful outcome of a send call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchReceipt {
    Delivered { id: Option<String> },
    Skipped { reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("email transport failed: {0}")]
    Transport(String),
    #[error("email provider rejected message ({status}): {body}")]
    Provider { status: u16, body: String },
}

/// E-mail provider boundary so workflows can be exercised without network access.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<DispatchReceipt, NotificationError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    Sent,
    Skipped,
    Failed,
}

/// Soft field describing what happened to the e-mail triggered by a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationReport {
    pub status: NotificationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl NotificationReport {
    pub fn sent() -> Self {
        Self {
            status: NotificationStatus::Sent,
            detail: None,
        }
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            status: NotificationStatus::Skipped,
            detail: Some(reason.into()),
        }
    }

    pub fn failed(detail: impl Into<String>) -> Self {
        Self {
            status: NotificationStatus::Failed,
            detail: Some(detail.into()),
        }
    }

    pub fn is_sent(&self) -> bool {
        self.status == NotificationStatus::Sent
    }
}

/// Send `message` if there is one, downgrading every failure to a report.
pub async fn dispatch<N>(notifier: &N, message: Option<EmailMessage>) -> NotificationReport
where
    N: Notifier + ?Sized,
{
    let Some(message) = message else {
        debug!("no recipient on file; notification skipped");
        return NotificationReport::skipped("no recipient on file");
    };

    let subject = message.subject.clone();
    match notifier.send(message).await {
        Ok(DispatchReceipt::Delivered { id }) => {
            debug!(%subject, ?id, "notification delivered");
            NotificationReport::sent()
        }
        Ok(DispatchReceipt::Skipped { reason }) => {
            debug!(%subject, %reason, "notification skipped");
            NotificationReport::skipped(reason)
        }
        Err(err) => {
            warn!(%subject, error = %err, "notification failed");
            NotificationReport::failed(err.to_string())
        }
    }
}
