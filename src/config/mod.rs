//! Configuration management for the homeskill gateway

pub mod file;

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;

use crate::dispatch::{
    DEFAULT_ATTEMPTS, DEFAULT_HOOK_BASE_URL, DEFAULT_MAX_IN_FLIGHT, DEFAULT_POLL_INTERVAL,
    DEFAULT_TIMEOUT, WaitPolicy,
};
use crate::security::DEFAULT_PROFILE_URL;
use crate::{Error, Result};

use file::HomeskillConfigFile;

/// Default port for the directive endpoint
pub const DEFAULT_PORT: u16 = 18790;

/// Homeskill gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Identity provider configuration
    pub identity: IdentityConfig,

    /// Hook API configuration
    pub backend: BackendConfig,

    /// Burst and wait tuning
    pub dispatch: DispatchConfig,

    /// Appliances exposed to the voice assistant
    pub devices: Vec<DeviceConfig>,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// Profile endpoint resolving access tokens
    pub profile_url: String,

    /// The only account allowed to issue directives
    pub authorized_user_id: String,
}

#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Hook trigger endpoint
    pub base_url: String,

    /// Hook API token shared by every device
    pub token: SecretString,
}

/// Burst and wait tuning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Requests fired per control directive
    pub attempts: u32,

    /// How long to wait for the first accepted request
    pub timeout: Duration,

    /// Delay between outcome checks
    pub poll_interval: Duration,

    /// Lifetime cap of a single backend request
    pub request_timeout: Duration,

    /// Concurrent backend requests across all directives
    pub max_in_flight: usize,

    /// Answer before the timeout once every request has failed
    pub exit_when_all_failed: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_TIMEOUT / 2,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            exit_when_all_failed: false,
        }
    }
}

impl DispatchConfig {
    /// Waiter policy derived from this configuration
    #[must_use]
    pub const fn wait_policy(&self) -> WaitPolicy {
        WaitPolicy {
            timeout: self.timeout,
            poll_interval: self.poll_interval,
            exit_when_all_failed: self.exit_when_all_failed,
        }
    }
}

/// One appliance entry of the config file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeviceConfig {
    /// Hook device id
    pub hook_id: String,
    /// Id exposed to the voice assistant, defaults to `hook_id`
    #[serde(default)]
    pub appliance_id: Option<String>,
    pub friendly_name: String,
    pub friendly_description: String,
    #[serde(default)]
    pub additional_details: BTreeMap<String, String>,
}

impl Config {
    /// Load configuration (env > toml > default)
    ///
    /// # Errors
    ///
    /// Returns error if the config file cannot be loaded or the merged
    /// configuration is invalid
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let fc = file::load_config_file(path)?;
        Self::from_sources(fc, |key| std::env::var(key).ok())
    }

    /// Merge a parsed config file with an environment lookup
    ///
    /// # Errors
    ///
    /// Returns error if a required value is missing or malformed
    pub fn from_sources(
        fc: HomeskillConfigFile,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let server = ServerConfig {
            port: match parse_env(&env, "HOMESKILL_PORT")? {
                Some(port) => Some(port),
                None => parse_env(&env, "PORT")?,
            }
            .or(fc.server.port)
            .unwrap_or(DEFAULT_PORT),
        };

        let identity = IdentityConfig {
            profile_url: env("HOMESKILL_PROFILE_URL")
                .or(fc.identity.profile_url)
                .unwrap_or_else(|| DEFAULT_PROFILE_URL.to_string()),
            authorized_user_id: env("HOMESKILL_AUTHORIZED_USER_ID")
                .or(fc.identity.authorized_user_id)
                .ok_or_else(|| {
                    Error::Config("identity.authorized_user_id is required".to_string())
                })?,
        };

        let token = env("HOOK_API_TOKEN").or(fc.backend.token);
        if token.is_none() && !fc.devices.is_empty() {
            return Err(Error::Config(
                "backend.token is required when devices are configured".to_string(),
            ));
        }
        let backend = BackendConfig {
            base_url: env("HOOK_BASE_URL")
                .or(fc.backend.base_url)
                .unwrap_or_else(|| DEFAULT_HOOK_BASE_URL.to_string()),
            token: SecretString::from(token.unwrap_or_default()),
        };

        let defaults = DispatchConfig::default();
        let timeout = parse_env(&env, "HOMESKILL_TIMEOUT_MS")?
            .or(fc.dispatch.timeout_ms)
            .map_or(defaults.timeout, Duration::from_millis);
        let dispatch = DispatchConfig {
            attempts: parse_env(&env, "HOMESKILL_ATTEMPTS")?
                .or(fc.dispatch.attempts)
                .unwrap_or(defaults.attempts),
            timeout,
            poll_interval: parse_env(&env, "HOMESKILL_POLL_INTERVAL_MS")?
                .or(fc.dispatch.poll_interval_ms)
                .map_or(defaults.poll_interval, Duration::from_millis),
            // Abandoned attempts must release their permits before the next
            // directive's deadline
            request_timeout: parse_env(&env, "HOMESKILL_REQUEST_TIMEOUT_MS")?
                .or(fc.dispatch.request_timeout_ms)
                .map_or(timeout / 2, Duration::from_millis),
            max_in_flight: parse_env(&env, "HOMESKILL_MAX_IN_FLIGHT")?
                .or(fc.dispatch.max_in_flight)
                .unwrap_or(defaults.max_in_flight),
            exit_when_all_failed: fc
                .dispatch
                .exit_when_all_failed
                .unwrap_or(defaults.exit_when_all_failed),
        };

        let config = Self {
            server,
            identity,
            backend,
            dispatch,
            devices: fc.devices,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        url::Url::parse(&self.backend.base_url)
            .map_err(|e| Error::Config(format!("invalid backend.base_url: {e}")))?;
        url::Url::parse(&self.identity.profile_url)
            .map_err(|e| Error::Config(format!("invalid identity.profile_url: {e}")))?;

        if self.dispatch.attempts == 0 {
            return Err(Error::Config("dispatch.attempts must be at least 1".to_string()));
        }
        if self.dispatch.poll_interval.is_zero() {
            return Err(Error::Config(
                "dispatch.poll_interval_ms must be positive".to_string(),
            ));
        }
        if self.dispatch.request_timeout.is_zero()
            || self.dispatch.request_timeout >= self.dispatch.timeout
        {
            return Err(Error::Config(
                "dispatch.request_timeout_ms must be positive and below dispatch.timeout_ms"
                    .to_string(),
            ));
        }
        if self.dispatch.max_in_flight == 0 {
            return Err(Error::Config(
                "dispatch.max_in_flight must be at least 1".to_string(),
            ));
        }
        if self.devices.is_empty() {
            tracing::warn!("no devices configured, discovery will be empty");
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(
    env: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>> {
    env(key)
        .map(|raw| {
            raw.parse()
                .map_err(|_| Error::Config(format!("{key} has invalid value '{raw}'")))
        })
        .transpose()
}
