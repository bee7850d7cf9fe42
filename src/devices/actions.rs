//! Translation from voice-assistant vocabulary to Hook actions

use super::types::{TURN_OFF, TURN_ON};
use crate::{Error, Result};

/// Abstract action → Hook API action token
const HOOK_ACTIONS: &[(&str, &str)] = &[(TURN_ON, "On"), (TURN_OFF, "Off")];

/// Control directive name → abstract action
const DIRECTIVE_ACTIONS: &[(&str, &str)] =
    &[("TurnOnRequest", TURN_ON), ("TurnOffRequest", TURN_OFF)];

/// Translate an abstract action into the backend token for a device
///
/// # Errors
///
/// Returns `Error::UnsupportedAction` if the device does not declare the
/// action, or if the backend has no token for it
pub fn translate(capabilities: &[String], action: &str) -> Result<&'static str> {
    if !capabilities.iter().any(|c| c == action) {
        return Err(Error::UnsupportedAction(format!(
            "'{action}' is not a declared capability"
        )));
    }

    HOOK_ACTIONS
        .iter()
        .find(|(abstract_action, _)| *abstract_action == action)
        .map(|(_, backend_action)| *backend_action)
        .ok_or_else(|| Error::UnsupportedAction(format!("no backend action for '{action}'")))
}

/// Map a control directive name to its abstract action
///
/// # Errors
///
/// Returns `Error::UnsupportedAction` for any name other than
/// `TurnOnRequest` and `TurnOffRequest`
pub fn action_for_directive(name: &str) -> Result<&'static str> {
    DIRECTIVE_ACTIONS
        .iter()
        .find(|(directive, _)| *directive == name)
        .map(|(_, action)| *action)
        .ok_or_else(|| Error::UnsupportedAction(format!("directive '{name}'")))
}
