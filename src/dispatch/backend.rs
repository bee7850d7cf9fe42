//! Device backend abstraction and the Hook API client
//!
//! The Hook API is fire-and-forget: a trigger answers with a `return_value`
//! of `"1"` when the bridge accepted the command and anything else when it
//! did not. Nothing is confirmed about the device state itself.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Deserialize;

use super::counter::AttemptResult;
use crate::devices::HookTarget;
use crate::{Error, Result};

/// Default Hook trigger endpoint
pub const DEFAULT_HOOK_BASE_URL: &str = "https://api.gethook.io/v1/device/trigger";

/// Value of `return_value` that marks an accepted trigger
const SUCCESS_VALUE: &str = "1";

/// A backend able to deliver one action to one device
#[async_trait]
pub trait DeviceBackend: Send + Sync {
    /// Fire `action` at `target` once and return the raw `return_value`
    async fn trigger(&self, target: &HookTarget, action: &str) -> Result<String>;
}

/// Classify a backend reply; every error counts as a failed attempt
#[must_use]
pub fn classify(reply: &Result<String>) -> AttemptResult {
    match reply {
        Ok(value) if value == SUCCESS_VALUE => AttemptResult::Success,
        _ => AttemptResult::Failure,
    }
}

/// Body returned by the Hook trigger endpoint
#[derive(Debug, Deserialize)]
struct TriggerResponse {
    return_value: serde_json::Value,
}

/// Hook API client
#[derive(Debug, Clone)]
pub struct HookBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HookBackend {
    /// Create a client for `base_url` with a per-request timeout
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Trigger URL without the token query
    #[must_use]
    pub fn trigger_url(&self, hook_id: &str, action: &str) -> String {
        format!(
            "{}/{}/{}/",
            self.base_url,
            urlencoding::encode(hook_id),
            urlencoding::encode(action)
        )
    }
}

#[async_trait]
impl DeviceBackend for HookBackend {
    async fn trigger(&self, target: &HookTarget, action: &str) -> Result<String> {
        let response = self
            .client
            .get(self.trigger_url(&target.hook_id, action))
            .query(&[("token", target.token.expose_secret())])
            .send()
            .await?
            .error_for_status()?;

        let body: TriggerResponse = response.json().await?;
        match body.return_value {
            serde_json::Value::String(value) => Ok(value),
            other => Err(Error::Backend(format!("unexpected return_value {other}"))),
        }
    }
}
