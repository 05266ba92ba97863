//! Static token table implementing [`IdentityResolver`].
//!
//! Stands in for the external credential system the same way the
//! in-memory store stands in for a real database: good enough for the
//! binary, tests, and development. It reproduces the validation rules
//! the core relies on: only non-expired access-class tokens
//! authenticate a session.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{Identity, IdentityResolver, InvalidCredential};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenClass {
    Access,
    Refresh,
}

struct TokenEntry {
    class: TokenClass,
    expired: bool,
    identity: Identity,
}

/// Resolver backed by a fixed token table.
#[derive(Default)]
pub struct StaticTokenResolver {
    tokens: HashMap<String, TokenEntry>,
}

impl StaticTokenResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a valid access token for `identity`.
    pub fn with_access_token(mut self, token: impl Into<String>, identity: Identity) -> Self {
        self.tokens.insert(
            token.into(),
            TokenEntry {
                class: TokenClass::Access,
                expired: false,
                identity,
            },
        );
        self
    }

    /// Register a refresh token; resolving it is rejected as wrong-class.
    pub fn with_refresh_token(mut self, token: impl Into<String>, identity: Identity) -> Self {
        self.tokens.insert(
            token.into(),
            TokenEntry {
                class: TokenClass::Refresh,
                expired: false,
                identity,
            },
        );
        self
    }

    /// Register an access token that is past its expiry.
    pub fn with_expired_token(mut self, token: impl Into<String>, identity: Identity) -> Self {
        self.tokens.insert(
            token.into(),
            TokenEntry {
                class: TokenClass::Access,
                expired: true,
                identity,
            },
        );
        self
    }
}

#[async_trait]
impl IdentityResolver for StaticTokenResolver {
    async fn resolve(&self, credential: &str) -> Result<Identity, InvalidCredential> {
        if credential.trim().is_empty() {
            return Err(InvalidCredential::Malformed);
        }
        match self.tokens.get(credential) {
            Some(entry) if entry.expired => Err(InvalidCredential::Expired),
            Some(entry) if entry.class != TokenClass::Access => Err(InvalidCredential::WrongClass),
            Some(entry) => Ok(entry.identity.clone()),
            None => Err(InvalidCredential::Unrecognized),
        }
    }
}
