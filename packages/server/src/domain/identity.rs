//! Identity resolution boundary.
//!
//! Credential issuance and validation live in an external system; the
//! chat core only consumes this trait. A session whose credential fails
//! to resolve proceeds as anonymous rather than failing the handshake.

use async_trait::async_trait;
use thiserror::Error;

use super::value_object::Identity;

/// Why a credential was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidCredential {
    /// The credential could not be parsed at all.
    #[error("credential is malformed")]
    Malformed,
    /// The credential was valid once but is past its expiry.
    #[error("credential has expired")]
    Expired,
    /// The credential is of a class that does not authenticate a
    /// session (e.g. a refresh credential).
    #[error("credential is not an access credential")]
    WrongClass,
    /// The credential is well-formed but unknown to the issuer.
    #[error("credential is not recognized")]
    Unrecognized,
}

/// Turns a request credential into a display identity.
///
/// Pure with respect to the chat core: no shared state with the
/// registry or the persistence pipeline.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, credential: &str) -> Result<Identity, InvalidCredential>;
}
