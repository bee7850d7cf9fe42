//! Directive routing
//!
//! Every directive is authenticated first, then routed by namespace:
//! discovery lists the registry, control resolves the appliance, translates
//! the directive into a backend action and delivers it through a burst.
//! Control failures of any kind collapse into a `DriverInternalError`
//! response; only authentication and routing failures abort the invocation.

use std::sync::Arc;

use crate::devices::{DeviceRegistry, action_for_directive, translate};
use crate::directive::{
    CONTROL_NAMESPACE, DISCOVERY_NAMESPACE, Directive, DiscoveryPayload, ResponseEnvelope,
    ResponseHeader,
};
use crate::dispatch::{Dispatcher, WaitPolicy, await_outcome};
use crate::security::IdentityVerifier;
use crate::{Error, Result};

/// Routes directives to discovery or control handling
#[derive(Debug)]
pub struct DirectiveRouter {
    registry: Arc<DeviceRegistry>,
    dispatcher: Dispatcher,
    identity: IdentityVerifier,
    wait_policy: WaitPolicy,
}

impl DirectiveRouter {
    #[must_use]
    pub fn new(
        registry: Arc<DeviceRegistry>,
        dispatcher: Dispatcher,
        identity: IdentityVerifier,
        wait_policy: WaitPolicy,
    ) -> Self {
        Self {
            registry,
            dispatcher,
            identity,
            wait_policy,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Handle one directive and build its response envelope
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidToken` if the access token does not belong to
    /// the authorized account, and `Error::UnsupportedNamespace` for
    /// namespaces other than discovery and control. No command is sent to
    /// any device in either case.
    pub async fn handle(&self, directive: &Directive) -> Result<ResponseEnvelope> {
        let header = &directive.header;
        self.identity.verify(&directive.payload.access_token).await?;

        tracing::info!(
            namespace = %header.namespace,
            directive = %header.name,
            "routing directive"
        );

        let (success, payload) = match header.namespace.as_str() {
            DISCOVERY_NAMESPACE => (true, serde_json::to_value(self.discover())?),
            CONTROL_NAMESPACE => {
                let success = match self.control(directive).await {
                    Ok(success) => success,
                    Err(e @ (Error::NotFound(_) | Error::UnsupportedAction(_))) => {
                        tracing::warn!(error = %e, "control directive rejected");
                        false
                    }
                    Err(e) => return Err(e),
                };
                (success, serde_json::json!({}))
            }
            other => {
                tracing::warn!(namespace = %other, "unsupported namespace");
                return Err(Error::UnsupportedNamespace(other.to_string()));
            }
        };

        tracing::info!(success, "directive handled");

        Ok(ResponseEnvelope {
            header: ResponseHeader::for_request(header, success),
            payload,
        })
    }

    /// List every registered appliance
    #[must_use]
    pub fn discover(&self) -> DiscoveryPayload {
        DiscoveryPayload {
            discovered_appliances: self.registry.iter().map(|d| d.discovered()).collect(),
        }
    }

    /// Deliver a control directive and wait for the outcome
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` for an unknown or missing appliance and
    /// `Error::UnsupportedAction` if the directive is not an on/off request
    /// the appliance supports. Both are raised before any backend call.
    pub async fn control(&self, directive: &Directive) -> Result<bool> {
        let appliance = directive
            .payload
            .appliance
            .as_ref()
            .ok_or_else(|| Error::NotFound("directive names no appliance".to_string()))?;

        let device = self.registry.lookup(&appliance.appliance_id)?;
        let action = action_for_directive(&directive.header.name)?;
        let backend_action = translate(&device.actions, action)?;

        tracing::debug!(
            appliance_id = %device.appliance_id,
            action,
            backend_action,
            "delivering control directive"
        );

        let handle = self.dispatcher.dispatch(&device.backend, backend_action);
        Ok(await_outcome(&handle, &self.wait_policy).await)
    }
}
