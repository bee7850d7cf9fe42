//! Shared test utilities
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use homeskill_gateway::devices::{DeviceDescriptor, HookTarget};
use homeskill_gateway::directive::Directive;
use homeskill_gateway::security::Profile;
use homeskill_gateway::{
    DeviceBackend, DeviceRegistry, DirectiveRouter, Dispatcher, Error, IdentityProvider,
    IdentityVerifier, Result, WaitPolicy,
};
use secrecy::SecretString;

pub const AUTHORIZED_USER: &str = "amzn1.account.authorized";
pub const VALID_TOKEN: &str = "Atza|valid";
pub const DEVICE_ID: &str = "hook_bedroom";

/// Scripted reply for one backend call
#[derive(Debug, Clone, Copy)]
pub enum Reply {
    /// `return_value` after a delay
    Value(&'static str, Duration),
    /// Transport error after a delay
    Error(Duration),
}

/// Backend answering calls in arrival order from a script
pub struct ScriptedBackend {
    script: Vec<Reply>,
    fallback: Reply,
    calls: AtomicUsize,
    first_success: Mutex<Option<Instant>>,
}

impl ScriptedBackend {
    pub fn new(script: Vec<Reply>, fallback: Reply) -> Arc<Self> {
        Arc::new(Self {
            script,
            fallback,
            calls: AtomicUsize::new(0),
            first_success: Mutex::new(None),
        })
    }

    /// Every call answers the same way
    pub fn always(reply: Reply) -> Arc<Self> {
        Self::new(Vec::new(), reply)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn first_success(&self) -> Option<Instant> {
        *self.first_success.lock().unwrap()
    }
}

#[async_trait]
impl DeviceBackend for ScriptedBackend {
    async fn trigger(&self, _target: &HookTarget, _action: &str) -> Result<String> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.script.get(index).copied().unwrap_or(self.fallback);

        match reply {
            Reply::Value(value, delay) => {
                tokio::time::sleep(delay).await;
                if value == "1" {
                    self.first_success
                        .lock()
                        .unwrap()
                        .get_or_insert_with(Instant::now);
                }
                Ok(value.to_string())
            }
            Reply::Error(delay) => {
                tokio::time::sleep(delay).await;
                Err(Error::Backend("connection timed out".to_string()))
            }
        }
    }
}

/// Identity provider that knows one token
pub struct StaticIdentity;

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn profile(&self, access_token: &str) -> Result<Profile> {
        let user_id = if access_token == VALID_TOKEN {
            AUTHORIZED_USER
        } else {
            "amzn1.account.stranger"
        };
        Ok(Profile {
            user_id: user_id.to_string(),
            name: Some("Test User".to_string()),
            email: None,
        })
    }
}

/// Registry with a single on/off outlet
pub fn single_device_registry() -> DeviceRegistry {
    DeviceRegistry::new([DeviceDescriptor::hook_outlet(
        DEVICE_ID,
        "Bedroom lamp",
        "Lamp by the bed",
        SecretString::from("hook-token".to_string()),
    )])
    .expect("failed to build registry")
}

/// Wait policy with short durations for tests
pub fn fast_policy(timeout: Duration) -> WaitPolicy {
    WaitPolicy {
        timeout,
        poll_interval: Duration::from_millis(50),
        exit_when_all_failed: false,
    }
}

/// Build a router over a scripted backend
pub fn build_router(
    registry: DeviceRegistry,
    backend: Arc<ScriptedBackend>,
    attempts: u32,
    policy: WaitPolicy,
) -> DirectiveRouter {
    DirectiveRouter::new(
        Arc::new(registry),
        Dispatcher::with_limits(backend, attempts, 64),
        IdentityVerifier::new(Box::new(StaticIdentity), AUTHORIZED_USER),
        policy,
    )
}

/// Build a directive envelope
pub fn directive(namespace: &str, name: &str, token: &str, appliance: Option<&str>) -> Directive {
    let mut payload = serde_json::json!({ "accessToken": token });
    if let Some(id) = appliance {
        payload["appliance"] = serde_json::json!({
            "applianceId": id,
            "additionalApplianceDetails": {}
        });
    }

    serde_json::from_value(serde_json::json!({
        "header": {
            "messageId": "6d6d6e14-8aee-473e-8c24-0d31ff9c17a2",
            "name": name,
            "namespace": namespace,
            "payloadVersion": "2"
        },
        "payload": payload
    }))
    .expect("invalid test directive")
}
