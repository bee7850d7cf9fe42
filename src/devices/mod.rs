//! Appliance registry and action vocabulary
//!
//! Appliances are declared in configuration, registered once at startup and
//! exposed to the voice assistant through discovery

pub mod actions;
pub mod registry;
pub mod types;

pub use actions::{action_for_directive, translate};
pub use registry::DeviceRegistry;
pub use types::{DeviceDescriptor, DiscoveredAppliance, HookTarget, TURN_OFF, TURN_ON};
