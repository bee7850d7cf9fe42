//! Smart-home directive envelopes
//!
//! Wire types for the v2 Smart Home Skill API: the directive the voice
//! assistant sends and the response envelope the gateway answers with.

pub mod names;
pub mod types;

pub use names::{
    CONTROL_NAMESPACE, DISCOVERY_NAMESPACE, DRIVER_INTERNAL_ERROR, confirmation_for, response_name,
};
pub use types::{
    Appliance, Directive, DirectiveHeader, DirectivePayload, DiscoveryPayload, ResponseEnvelope,
    ResponseHeader,
};
