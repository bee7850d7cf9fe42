//! Directive routing integration tests
//!
//! Drives the router end to end over a scripted device backend

use std::time::{Duration, Instant};

use homeskill_gateway::devices::DeviceDescriptor;
use homeskill_gateway::directive::{CONTROL_NAMESPACE, DISCOVERY_NAMESPACE, DRIVER_INTERNAL_ERROR};
use homeskill_gateway::{DeviceRegistry, Error};
use secrecy::SecretString;

mod common;
use common::{
    DEVICE_ID, Reply, ScriptedBackend, VALID_TOKEN, build_router, directive, fast_policy,
    single_device_registry,
};

const NEVER: Duration = Duration::from_secs(30);

#[tokio::test]
async fn third_attempt_success_confirms_turn_on() {
    let zero = Reply::Value("0", Duration::from_millis(10));
    let backend = ScriptedBackend::new(
        vec![
            zero,
            Reply::Error(Duration::from_millis(10)),
            Reply::Value("1", Duration::from_millis(100)),
        ],
        Reply::Error(NEVER),
    );
    let router = build_router(
        single_device_registry(),
        backend.clone(),
        10,
        fast_policy(Duration::from_secs(10)),
    );

    let response = router
        .handle(&directive(CONTROL_NAMESPACE, "TurnOnRequest", VALID_TOKEN, Some(DEVICE_ID)))
        .await
        .unwrap();
    let answered = Instant::now();

    assert_eq!(response.header.name, "TurnOnConfirmation");
    assert_eq!(response.header.namespace, CONTROL_NAMESPACE);
    assert_eq!(response.header.payload_version, "2");
    assert_eq!(response.payload, serde_json::json!({}));
    assert_eq!(backend.calls(), 10);

    let succeeded = backend.first_success().expect("no success recorded");
    assert!(answered.duration_since(succeeded) <= Duration::from_millis(150));
}

#[tokio::test]
async fn turn_off_confirmation() {
    let backend = ScriptedBackend::always(Reply::Value("1", Duration::ZERO));
    let router = build_router(
        single_device_registry(),
        backend,
        3,
        fast_policy(Duration::from_secs(5)),
    );

    let response = router
        .handle(&directive(CONTROL_NAMESPACE, "TurnOffRequest", VALID_TOKEN, Some(DEVICE_ID)))
        .await
        .unwrap();
    assert_eq!(response.header.name, "TurnOffConfirmation");
}

#[tokio::test]
async fn all_zero_replies_report_driver_error_after_timeout() {
    let backend = ScriptedBackend::always(Reply::Value("0", Duration::from_millis(5)));
    let timeout = Duration::from_millis(400);
    let router = build_router(single_device_registry(), backend.clone(), 10, fast_policy(timeout));

    let start = Instant::now();
    let response = router
        .handle(&directive(CONTROL_NAMESPACE, "TurnOnRequest", VALID_TOKEN, Some(DEVICE_ID)))
        .await
        .unwrap();

    let elapsed = start.elapsed();
    assert!(elapsed >= timeout);
    assert!(elapsed < timeout + Duration::from_millis(100));
    assert_eq!(response.header.name, DRIVER_INTERNAL_ERROR);
    assert_eq!(backend.calls(), 10);
}

#[tokio::test]
async fn transport_timeouts_report_driver_error() {
    let backend = ScriptedBackend::always(Reply::Error(Duration::from_secs(2)));
    let router = build_router(
        single_device_registry(),
        backend,
        10,
        fast_policy(Duration::from_millis(200)),
    );

    let response = router
        .handle(&directive(CONTROL_NAMESPACE, "TurnOnRequest", VALID_TOKEN, Some(DEVICE_ID)))
        .await
        .unwrap();
    assert_eq!(response.header.name, DRIVER_INTERNAL_ERROR);
}

#[tokio::test]
async fn unsupported_directive_sends_nothing() {
    let backend = ScriptedBackend::always(Reply::Value("1", Duration::ZERO));
    let router = build_router(
        single_device_registry(),
        backend.clone(),
        10,
        fast_policy(Duration::from_secs(5)),
    );
    let lock = directive(CONTROL_NAMESPACE, "SetLockStateRequest", VALID_TOKEN, Some(DEVICE_ID));

    assert!(matches!(
        router.control(&lock).await,
        Err(Error::UnsupportedAction(_))
    ));

    let response = router.handle(&lock).await.unwrap();
    assert_eq!(response.header.name, DRIVER_INTERNAL_ERROR);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn undeclared_capability_sends_nothing() {
    let mut device = DeviceDescriptor::hook_outlet(
        DEVICE_ID,
        "Night light",
        "Only turns on",
        SecretString::from("hook-token".to_string()),
    );
    device.actions = vec!["turnOn".to_string()];
    let registry = DeviceRegistry::new([device]).unwrap();

    let backend = ScriptedBackend::always(Reply::Value("1", Duration::ZERO));
    let router = build_router(registry, backend.clone(), 10, fast_policy(Duration::from_secs(5)));

    let off = directive(CONTROL_NAMESPACE, "TurnOffRequest", VALID_TOKEN, Some(DEVICE_ID));
    assert!(matches!(
        router.control(&off).await,
        Err(Error::UnsupportedAction(_))
    ));
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn unknown_appliance_reports_driver_error() {
    let backend = ScriptedBackend::always(Reply::Value("1", Duration::ZERO));
    let router = build_router(
        single_device_registry(),
        backend.clone(),
        10,
        fast_policy(Duration::from_secs(5)),
    );
    let unknown = directive(CONTROL_NAMESPACE, "TurnOnRequest", VALID_TOKEN, Some("hook_garage"));

    assert!(matches!(
        router.control(&unknown).await,
        Err(Error::NotFound(_))
    ));

    let response = router.handle(&unknown).await.unwrap();
    assert_eq!(response.header.name, DRIVER_INTERNAL_ERROR);
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn invalid_token_fails_before_dispatch() {
    let backend = ScriptedBackend::always(Reply::Value("1", Duration::ZERO));
    let router = build_router(
        single_device_registry(),
        backend.clone(),
        10,
        fast_policy(Duration::from_secs(5)),
    );

    let result = router
        .handle(&directive(CONTROL_NAMESPACE, "TurnOnRequest", "Atza|stolen", Some(DEVICE_ID)))
        .await;

    assert!(matches!(result, Err(Error::InvalidToken(_))));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn unknown_namespace_fails_invocation() {
    let backend = ScriptedBackend::always(Reply::Value("1", Duration::ZERO));
    let router = build_router(
        single_device_registry(),
        backend.clone(),
        10,
        fast_policy(Duration::from_secs(5)),
    );

    let result = router
        .handle(&directive(
            "Alexa.ConnectedHome.Query",
            "TurnOnRequest",
            VALID_TOKEN,
            Some(DEVICE_ID),
        ))
        .await;

    assert!(matches!(result, Err(Error::UnsupportedNamespace(_))));
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn discovery_lists_every_device() {
    let token = || SecretString::from("hook-token".to_string());
    let registry = DeviceRegistry::new([
        DeviceDescriptor::hook_outlet("hook_1", "Lamp", "Bedroom lamp", token()),
        DeviceDescriptor::hook_outlet("hook_2", "Fan", "Bedroom fan", token()),
        DeviceDescriptor::hook_outlet("hook_3", "Heater", "Bedroom heater", token()),
    ])
    .unwrap();
    let backend = ScriptedBackend::always(Reply::Value("1", Duration::ZERO));
    let router = build_router(registry, backend.clone(), 10, fast_policy(Duration::from_secs(5)));

    let response = router
        .handle(&directive(
            DISCOVERY_NAMESPACE,
            "DiscoverAppliancesRequest",
            VALID_TOKEN,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.header.name, "DiscoverAppliancesResponse");
    assert_eq!(response.header.namespace, DISCOVERY_NAMESPACE);

    let appliances = response.payload["discoveredAppliances"].as_array().unwrap();
    assert_eq!(appliances.len(), 3);
    for appliance in appliances {
        let fields = appliance.as_object().unwrap();
        assert_eq!(fields.len(), 9);
        assert_eq!(appliance["actions"], serde_json::json!(["turnOn", "turnOff"]));
        assert_eq!(appliance["isReachable"], true);
    }
    assert_eq!(appliances[1]["applianceId"], "hook_2");
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn discovery_namespace_ignores_directive_name() {
    let backend = ScriptedBackend::always(Reply::Value("1", Duration::ZERO));
    let router = build_router(
        single_device_registry(),
        backend.clone(),
        10,
        fast_policy(Duration::from_secs(5)),
    );

    let response = router
        .handle(&directive(
            DISCOVERY_NAMESPACE,
            "TurnOnRequest",
            VALID_TOKEN,
            Some(DEVICE_ID),
        ))
        .await
        .unwrap();

    assert!(response.payload["discoveredAppliances"].is_array());
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn each_response_gets_a_new_message_id() {
    let backend = ScriptedBackend::always(Reply::Value("1", Duration::ZERO));
    let router = build_router(
        single_device_registry(),
        backend,
        2,
        fast_policy(Duration::from_secs(5)),
    );
    let on = directive(CONTROL_NAMESPACE, "TurnOnRequest", VALID_TOKEN, Some(DEVICE_ID));

    let first = router.handle(&on).await.unwrap();
    let second = router.handle(&on).await.unwrap();
    assert_ne!(first.header.message_id, second.header.message_id);
}
