//! Access token verification

pub mod identity;

pub use identity::{
    AmazonProfileClient, DEFAULT_PROFILE_URL, IdentityProvider, IdentityVerifier, Profile,
};
