//! Homeskill Gateway - smart-home directive router
//!
//! This library turns voice-assistant smart-home directives into commands
//! for RF outlets behind the Hook API:
//! - Access token verification against the identity provider
//! - Appliance discovery from a static registry
//! - On/off control with redundant, burst-based delivery
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │              Voice assistant event trigger           │
//! └────────────────────┬────────────────────────────────┘
//!                      │  POST /directive
//! ┌────────────────────▼────────────────────────────────┐
//! │                 DirectiveRouter                      │
//! │   Identity  │  Discovery  │  Control                 │
//! └────────────────────┬────────────────────────────────┘
//!                      │  burst of N attempts
//! ┌────────────────────▼────────────────────────────────┐
//! │      Dispatcher ──▶ Hook API ◀── outcome waiter      │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod config;
pub mod devices;
pub mod directive;
pub mod dispatch;
pub mod error;
pub mod router;
pub mod security;

pub use config::Config;
pub use devices::{DeviceDescriptor, DeviceRegistry};
pub use directive::{Directive, ResponseEnvelope};
pub use dispatch::{DeviceBackend, DispatchHandle, Dispatcher, HookBackend, WaitPolicy};
pub use error::{Error, Result};
pub use router::DirectiveRouter;
pub use security::{AmazonProfileClient, IdentityProvider, IdentityVerifier};
