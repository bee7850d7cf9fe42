//! Fixed directive vocabulary

/// Namespace of discovery directives
pub const DISCOVERY_NAMESPACE: &str = "Alexa.ConnectedHome.Discovery";

/// Namespace of control directives
pub const CONTROL_NAMESPACE: &str = "Alexa.ConnectedHome.Control";

/// Response name reported for every failure
pub const DRIVER_INTERNAL_ERROR: &str = "DriverInternalError";

/// Request name → response name on success
const CONFIRMATIONS: &[(&str, &str)] = &[
    ("DiscoverAppliancesRequest", "DiscoverAppliancesResponse"),
    ("TurnOnRequest", "TurnOnConfirmation"),
    ("TurnOffRequest", "TurnOffConfirmation"),
    ("GetLockStateRequest", "GetLockStateResponse"),
    ("SetLockStateRequest", "SetLockStateConfirmation"),
    ("GetTemperatureReadingRequest", "GetTemperatureReadingResponse"),
    ("GetTargetTemperatureRequest", "GetTargetTemperatureResponse"),
    ("SetTargetTemperatureRequest", "SetTargetTemperatureConfirmation"),
    (
        "IncrementTargetTemperatureRequest",
        "IncrementTargetTemperatureConfirmation",
    ),
    (
        "DecrementTargetTemperatureRequest",
        "DecrementTargetTemperatureConfirmation",
    ),
    ("SetPercentageRequest", "SetPercentageConfirmation"),
    ("IncrementPercentageRequest", "IncrementPercentageConfirmation"),
    ("DecrementPercentageRequest", "DecrementPercentageConfirmation"),
    ("HealthCheckRequest", "HealthCheckResponse"),
];

/// Confirmation name for a request, if the request is known
#[must_use]
pub fn confirmation_for(request: &str) -> Option<&'static str> {
    CONFIRMATIONS
        .iter()
        .find(|(name, _)| *name == request)
        .map(|(_, confirmation)| *confirmation)
}

/// Response name for a request outcome
///
/// A success for a request missing from the table is reported as a failure.
#[must_use]
pub fn response_name(request: &str, success: bool) -> &'static str {
    if success {
        confirmation_for(request).unwrap_or(DRIVER_INTERNAL_ERROR)
    } else {
        DRIVER_INTERNAL_ERROR
    }
}
