//! Access token verification against the voice assistant's identity service
//!
//! Directives carry the account holder's OAuth access token. The gateway
//! serves exactly one account: the token is resolved to a profile and the
//! profile's user id must match the configured one.

use async_trait::async_trait;
use serde::Deserialize;

use crate::{Error, Result};

/// Default Login with Amazon profile endpoint
pub const DEFAULT_PROFILE_URL: &str = "https://api.amazon.com/user/profile";

/// Profile returned by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Profile {
    pub user_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Source of profiles for access tokens
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve an access token to the profile that owns it
    async fn profile(&self, access_token: &str) -> Result<Profile>;
}

/// Identity provider backed by the Login with Amazon profile API
#[derive(Debug, Clone)]
pub struct AmazonProfileClient {
    profile_url: String,
    client: reqwest::Client,
}

impl AmazonProfileClient {
    /// Create a client for the given profile endpoint
    #[must_use]
    pub fn new(profile_url: impl Into<String>) -> Self {
        Self {
            profile_url: profile_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl IdentityProvider for AmazonProfileClient {
    async fn profile(&self, access_token: &str) -> Result<Profile> {
        let profile = self
            .client
            .get(&self.profile_url)
            .query(&[("access_token", access_token)])
            .send()
            .await?
            .error_for_status()?
            .json::<Profile>()
            .await?;
        Ok(profile)
    }
}

/// Checks that access tokens belong to the authorized account
pub struct IdentityVerifier {
    provider: Box<dyn IdentityProvider>,
    authorized_user_id: String,
}

impl std::fmt::Debug for IdentityVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityVerifier")
            .field("authorized_user_id", &self.authorized_user_id)
            .finish_non_exhaustive()
    }
}

impl IdentityVerifier {
    #[must_use]
    pub fn new(provider: Box<dyn IdentityProvider>, authorized_user_id: impl Into<String>) -> Self {
        Self {
            provider,
            authorized_user_id: authorized_user_id.into(),
        }
    }

    /// Verify an access token and return the matching profile
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidToken` if the token cannot be resolved or
    /// belongs to a different account
    pub async fn verify(&self, access_token: &str) -> Result<Profile> {
        if access_token.is_empty() {
            return Err(Error::InvalidToken("empty access token".to_string()));
        }

        let profile = self.provider.profile(access_token).await.map_err(|e| {
            tracing::warn!(error = %e, "profile lookup failed");
            Error::InvalidToken(format!("profile lookup failed: {e}"))
        })?;

        if profile.user_id != self.authorized_user_id {
            tracing::debug!(user_id = %profile.user_id, "token belongs to another account");
            return Err(Error::InvalidToken(format!(
                "user '{}' is not authorized",
                profile.user_id
            )));
        }

        tracing::info!(
            user_id = %profile.user_id,
            name = profile.name.as_deref().unwrap_or_default(),
            "authenticated"
        );
        Ok(profile)
    }
}
