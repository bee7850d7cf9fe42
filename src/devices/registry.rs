//! Registry of configured appliances

use indexmap::IndexMap;
use secrecy::SecretString;

use super::types::DeviceDescriptor;
use crate::config::DeviceConfig;
use crate::{Error, Result};

/// Registry of appliances known to the gateway
///
/// Populated once at startup and read-only afterwards, so it can be shared
/// behind an `Arc` without locking. Iteration follows registration order.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: IndexMap<String, DeviceDescriptor>,
}

impl DeviceRegistry {
    /// Build a registry from already constructed descriptors
    ///
    /// # Errors
    ///
    /// Returns error if two descriptors share an appliance id
    pub fn new(devices: impl IntoIterator<Item = DeviceDescriptor>) -> Result<Self> {
        let mut map = IndexMap::new();
        for device in devices {
            let id = device.appliance_id.clone();
            if map.insert(id.clone(), device).is_some() {
                return Err(Error::Config(format!("duplicate appliance id '{id}'")));
            }
        }
        Ok(Self { devices: map })
    }

    /// Build Hook outlets from configuration, sharing one API token
    ///
    /// # Errors
    ///
    /// Returns error if two devices share an appliance id
    pub fn from_config(devices: &[DeviceConfig], token: &SecretString) -> Result<Self> {
        Self::new(devices.iter().map(|d| {
            let mut device = DeviceDescriptor::hook_outlet(
                d.hook_id.clone(),
                d.friendly_name.clone(),
                d.friendly_description.clone(),
                token.clone(),
            );
            if let Some(appliance_id) = &d.appliance_id {
                device.appliance_id.clone_from(appliance_id);
            }
            device.additional_details.clone_from(&d.additional_details);
            device
        }))
    }

    /// Get an appliance by id
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if the id is not registered
    pub fn lookup(&self, appliance_id: &str) -> Result<&DeviceDescriptor> {
        self.devices
            .get(appliance_id)
            .ok_or_else(|| Error::NotFound(format!("appliance '{appliance_id}'")))
    }

    /// Iterate appliances in registration order
    pub fn iter(&self) -> impl Iterator<Item = &DeviceDescriptor> {
        self.devices.values()
    }

    /// Number of registered appliances
    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Whether the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
