//! Inbound and outbound directive envelopes

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::names::response_name;
use crate::devices::DiscoveredAppliance;

/// Directive sent by the voice assistant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Directive {
    pub header: DirectiveHeader,
    pub payload: DirectivePayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectiveHeader {
    pub name: String,
    pub namespace: String,
    pub payload_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectivePayload {
    #[serde(default)]
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appliance: Option<Appliance>,
}

impl std::fmt::Debug for DirectivePayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectivePayload")
            .field("access_token", &"[REDACTED]")
            .field("appliance", &self.appliance)
            .finish()
    }
}

/// Appliance a control directive targets
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appliance {
    pub appliance_id: String,
    #[serde(default)]
    pub additional_appliance_details: BTreeMap<String, serde_json::Value>,
}

/// Header of a response envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseHeader {
    pub message_id: String,
    pub name: String,
    pub namespace: String,
    pub payload_version: String,
}

impl ResponseHeader {
    /// Build the header answering `request`, with a fresh message id
    #[must_use]
    pub fn for_request(request: &DirectiveHeader, success: bool) -> Self {
        Self {
            message_id: Uuid::new_v4().to_string(),
            name: response_name(&request.name, success).to_string(),
            namespace: request.namespace.clone(),
            payload_version: request.payload_version.clone(),
        }
    }
}

/// Response sent back to the voice assistant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub header: ResponseHeader,
    pub payload: serde_json::Value,
}

/// Payload of a discovery response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryPayload {
    pub discovered_appliances: Vec<DiscoveredAppliance>,
}
