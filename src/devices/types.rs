//! Device descriptor types

use std::collections::BTreeMap;

use secrecy::SecretString;
use serde::Serialize;

/// Abstract action for switching a device on
pub const TURN_ON: &str = "turnOn";
/// Abstract action for switching a device off
pub const TURN_OFF: &str = "turnOff";

/// Backend identity of a Hook-controlled device
#[derive(Debug, Clone)]
pub struct HookTarget {
    /// Device id on the Hook API
    pub hook_id: String,
    /// API token sent with every trigger
    pub token: SecretString,
}

/// An appliance exposed to the voice assistant
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct DeviceDescriptor {
    pub appliance_id: String,
    pub friendly_name: String,
    pub friendly_description: String,
    /// Supported abstract actions, in declaration order
    pub actions: Vec<String>,
    pub additional_details: BTreeMap<String, String>,
    pub is_reachable: bool,
    pub manufacturer_name: String,
    pub model_name: String,
    pub version: String,
    pub backend: HookTarget,
}

impl DeviceDescriptor {
    /// Describe an RF outlet driven through the Hook API
    ///
    /// The appliance id is the Hook device id.
    #[must_use]
    pub fn hook_outlet(
        hook_id: impl Into<String>,
        friendly_name: impl Into<String>,
        friendly_description: impl Into<String>,
        token: SecretString,
    ) -> Self {
        let hook_id = hook_id.into();
        Self {
            appliance_id: hook_id.clone(),
            friendly_name: friendly_name.into(),
            friendly_description: friendly_description.into(),
            actions: vec![TURN_ON.to_string(), TURN_OFF.to_string()],
            additional_details: BTreeMap::new(),
            is_reachable: true,
            manufacturer_name: "EtekCity".to_string(),
            model_name: "RF Outlet".to_string(),
            version: "1.0".to_string(),
            backend: HookTarget { hook_id, token },
        }
    }

    /// Render the discovery entry for this device
    #[must_use]
    pub fn discovered(&self) -> DiscoveredAppliance {
        DiscoveredAppliance {
            actions: self.actions.clone(),
            additional_appliance_details: self.additional_details.clone(),
            appliance_id: self.appliance_id.clone(),
            friendly_description: self.friendly_description.clone(),
            friendly_name: self.friendly_name.clone(),
            is_reachable: self.is_reachable,
            manufacturer_name: self.manufacturer_name.clone(),
            model_name: self.model_name.clone(),
            version: self.version.clone(),
        }
    }
}

/// One entry of a discovery response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredAppliance {
    pub actions: Vec<String>,
    pub additional_appliance_details: BTreeMap<String, String>,
    pub appliance_id: String,
    pub friendly_description: String,
    pub friendly_name: String,
    pub is_reachable: bool,
    pub manufacturer_name: String,
    pub model_name: String,
    pub version: String,
}
