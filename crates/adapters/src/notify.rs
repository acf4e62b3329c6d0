// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

pub const SENDGRID_URL: &str = "https://api.sendgrid.com/v3/mail/send";

/// Errors from notify operations
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("send failed: {0}")]
    SendFailed(String),
    #[error("mail API returned {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("no recipients")]
    NoRecipients,
}

/// An HTML email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

/// Adapter for sending notifications
#[async_trait]
pub trait NotifyAdapter: Clone + Send + Sync + 'static {
    /// Send one email to all of its recipients
    async fn send(&self, email: &Email) -> Result<(), NotifyError>;
}

/// Email adapter for the SendGrid v3 mail API.
#[derive(Clone)]
pub struct SendGridNotifier {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    from: String,
}

impl SendGridNotifier {
    pub fn new(api_key: impl Into<String>, from: impl Into<String>) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| NotifyError::SendFailed(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: SENDGRID_URL.to_string(),
            api_key: api_key.into(),
            from: from.into(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn payload(&self, email: &Email) -> serde_json::Value {
        let to: Vec<_> = email.to.iter().map(|addr| json!({ "email": addr })).collect();
        json!({
            "personalizations": [{ "to": to }],
            "from": { "email": self.from },
            "subject": email.subject,
            "content": [{ "type": "text/html", "value": email.html }],
        })
    }
}

#[async_trait]
impl NotifyAdapter for SendGridNotifier {
    async fn send(&self, email: &Email) -> Result<(), NotifyError> {
        if email.to.is_empty() {
            return Err(NotifyError::NoRecipients);
        }
        tracing::info!(subject = %email.subject, recipients = email.to.len(), "sending email");
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.payload(email))
            .send()
            .await
            .map_err(|e| NotifyError::SendFailed(e.to_string()))?;
        let status = response.status().as_u16();
        if status != 202 {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected { status, body });
        }
        tracing::info!(subject = %email.subject, "email sent");
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{Email, NotifyAdapter, NotifyError};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeNotifyState {
        sent: Vec<Email>,
        fail: bool,
    }

    /// Fake notification adapter for testing
    #[derive(Clone, Default)]
    pub struct FakeNotifyAdapter {
        inner: Arc<Mutex<FakeNotifyState>>,
    }

    impl FakeNotifyAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make every later send fail
        pub fn fail_sends(&self) {
            self.inner.lock().fail = true;
        }

        /// Get all recorded emails
        pub fn sent(&self) -> Vec<Email> {
            self.inner.lock().sent.clone()
        }
    }

    #[async_trait]
    impl NotifyAdapter for FakeNotifyAdapter {
        async fn send(&self, email: &Email) -> Result<(), NotifyError> {
            let mut state = self.inner.lock();
            if state.fail {
                return Err(NotifyError::SendFailed("fake failure".to_string()));
            }
            state.sent.push(email.clone());
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeNotifyAdapter;

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
