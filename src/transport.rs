//! Delivery of messages to the sequencer.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::message::{Message, API_ENDPOINT};

/// Trait for message transports.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `message` to `path` on the destination.
    async fn post(&self, path: &str, message: &Message) -> Result<()>;

    /// Returns the name of this transport.
    fn name(&self) -> &str;
}

/// JSON POST over HTTP. Each call waits for the response or the timeout.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Creates a transport for `base_url` with a bounded request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Full URL for `path`.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, path: &str, message: &Message) -> Result<()> {
        let url = self.url_for(path);
        let response = self.client.post(&url).json(message).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url,
            });
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Sends `message` and swallows any failure.
///
/// Returns whether the sequencer accepted the message. Failures are logged
/// with their cause and never propagated.
pub async fn deliver(transport: &dyn Transport, message: &Message) -> bool {
    match transport.post(API_ENDPOINT, message).await {
        Ok(()) => {
            tracing::info!(
                event = message.event(),
                test_id = %message.test_id(),
                "sent message"
            );
            true
        }
        Err(e) => {
            tracing::warn!(
                event = message.event(),
                test_id = %message.test_id(),
                transport = transport.name(),
                error = %e,
                "failed to send message"
            );
            false
        }
    }
}
