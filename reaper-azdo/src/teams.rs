//! Microsoft Teams incoming-webhook notifier

use std::time::Duration;

use async_trait::async_trait;
use reaper_core::Notifier;
use reqwest::StatusCode;
use serde_json::json;
use tracing::{debug, info};

use crate::{Error, Result};

/// Posts a single `{"text": ...}` message to a Teams webhook
pub struct TeamsNotifier {
    http: reqwest::Client,
    url: String,
}

impl TeamsNotifier {
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            url: url.into(),
        })
    }

    /// Send the message; only HTTP 200 counts as delivered
    pub async fn send(&self, text: &str) -> Result<()> {
        debug!(chars = text.chars().count(), "Posting Teams notification");

        let response = self
            .http
            .post(&self.url)
            .json(&json!({ "text": text }))
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }

        info!("Teams notification delivered");
        Ok(())
    }
}

impl std::fmt::Debug for TeamsNotifier {
    // webhook URLs embed their own credential
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeamsNotifier").finish_non_exhaustive()
    }
}

#[async_trait]
impl Notifier for TeamsNotifier {
    async fn notify(&self, text: &str) -> reaper_core::Result<()> {
        Ok(self.send(text).await?)
    }
}
