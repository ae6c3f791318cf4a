use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{DispatchReceipt, EmailMessage, NotificationError, Notifier};
use crate::config::NotificationConfig;

#[derive(Debug, Serialize)]
struct ResendPayload<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ResendAccepted {
    #[serde(default)]
    id: Option<String>,
}

/// Resend e-mail API client. Without an API key every send is skipped.
#[derive(Clone)]
pub struct ResendNotifier {
    client: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
    from: String,
}

impl ResendNotifier {
    pub fn new(config: &NotificationConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: &NotificationConfig) -> Self {
        Self {
            client,
            api_key: config.resend_api_key.clone(),
            endpoint: config.resend_api_url.clone(),
            from: config.email_from.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

impl std::fmt::Debug for ResendNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResendNotifier")
            .field("endpoint", &self.endpoint)
            .field("from", &self.from)
            .field("configured", &self.is_configured())
            .finish()
    }
}

#[async_trait]
impl Notifier for ResendNotifier {
    async fn send(&self, message: EmailMessage) -> Result<DispatchReceipt, NotificationError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(DispatchReceipt::Skipped {
                reason: "RESEND_API_KEY not set".to_string(),
            });
        };

        let payload = ResendPayload {
            from: &self.from,
            to: [message.to.as_str()],
            subject: &message.subject,
            text: &message.text,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|err| NotificationError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotificationError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let accepted = response.json::<ResendAccepted>().await.ok();
        Ok(DispatchReceipt::Delivered {
            id: accepted.and_then(|body| body.id),
        })
    }
}
