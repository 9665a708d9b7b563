//! Webhook sync client.
//!
//! Delivery is at-most-once: one POST, no retry, no queue. Every failure is
//! logged and swallowed; nothing here can reach the session state.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::models::profile::Profile;
use crate::models::script::Script;

pub const WEBHOOK_URL: &str = "https://webhook.iatechnologies.com.br/webhook/proroteiroai";
pub const SCRIPTS_READY_EVENT: &str = "scripts_ready";

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("webhook responded with status {0}")]
    Status(u16),
}

/// JSON body posted to the webhook.
#[derive(Debug, Serialize)]
pub struct SyncPayload<'a> {
    pub event: &'static str,
    /// ISO-8601 with millisecond precision, UTC.
    pub timestamp: String,
    pub cliente: &'a Profile,
    pub scripts: &'a [Script],
}

impl<'a> SyncPayload<'a> {
    pub fn new(profile: &'a Profile, scripts: &'a [Script], at: DateTime<Utc>) -> Self {
        Self {
            event: SCRIPTS_READY_EVENT,
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            cliente: profile,
            scripts,
        }
    }
}

/// Forwards a completed generation. Implementations never return errors.
#[async_trait]
pub trait BackendSync: Send + Sync {
    async fn sync(&self, profile: &Profile, scripts: &[Script]);
}

/// Runs `sync` on a detached task. The handle is returned for tests only;
/// callers in the request path drop it without joining.
pub fn spawn_sync(
    sync: Arc<dyn BackendSync>,
    profile: Profile,
    scripts: Vec<Script>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        sync.sync(&profile, &scripts).await;
    })
}

#[derive(Clone)]
pub struct WebhookClient {
    client: Client,
    url: String,
}

impl WebhookClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    /// One POST of the payload. Only the status code is inspected.
    pub async fn deliver(&self, payload: &SyncPayload<'_>) -> Result<(), SyncError> {
        let response = self.client.post(&self.url).json(payload).send().await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(SyncError::Status(status.as_u16()))
        }
    }
}

#[async_trait]
impl BackendSync for WebhookClient {
    async fn sync(&self, profile: &Profile, scripts: &[Script]) {
        info!(
            "Syncing {} scripts for client '{}' with webhook",
            scripts.len(),
            profile.name
        );

        let payload = SyncPayload::new(profile, scripts, Utc::now());
        match self.deliver(&payload).await {
            Ok(()) => info!("Webhook sync succeeded"),
            Err(SyncError::Status(status)) => {
                warn!("Webhook received the data but returned status {status}")
            }
            Err(e) => error!("Webhook sync failed: {e}"),
        }
    }
}
