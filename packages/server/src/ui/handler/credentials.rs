//! Credential extraction for the WebSocket handshake.
//!
//! Credentials may arrive in a cookie, an `Authorization: Bearer`
//! header, or a query parameter. Extraction is an ordered chain of pure
//! functions tried in that priority order; the first credential the
//! resolver validates wins. A request with no valid credential yields
//! the anonymous identity, never a handshake failure.

use std::collections::HashMap;

use axum::http::{HeaderMap, header};

use crate::domain::{Identity, IdentityResolver};

/// Cookie carrying the access credential.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Query parameter carrying the access credential.
pub const TOKEN_QUERY_PARAM: &str = "token";

type CredentialExtractor = fn(&HeaderMap, &HashMap<String, String>) -> Option<String>;

/// Extraction strategies in priority order.
const EXTRACTORS: [(&str, CredentialExtractor); 3] = [
    ("cookie", extract_from_cookie),
    ("authorization", extract_from_bearer),
    ("query", extract_from_query),
];

fn extract_from_cookie(headers: &HeaderMap, _params: &HashMap<String, String>) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == ACCESS_TOKEN_COOKIE && !value.is_empty()).then(|| value.to_string())
    })
}

fn extract_from_bearer(headers: &HeaderMap, _params: &HashMap<String, String>) -> Option<String> {
    let authorization = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = authorization.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_string())
}

fn extract_from_query(_headers: &HeaderMap, params: &HashMap<String, String>) -> Option<String> {
    params
        .get(TOKEN_QUERY_PARAM)
        .filter(|token| !token.is_empty())
        .cloned()
}

/// Shorten a credential for logging.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 12 {
        return token.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 6..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Resolve the identity of a handshake request.
///
/// Each extractor is tried in priority order; a credential the resolver
/// rejects falls through to the next source rather than failing the
/// session.
pub async fn resolve_identity(
    resolver: &dyn IdentityResolver,
    headers: &HeaderMap,
    params: &HashMap<String, String>,
) -> Identity {
    for (source, extract) in EXTRACTORS {
        let Some(credential) = extract(headers, params) else {
            continue;
        };
        match resolver.resolve(&credential).await {
            Ok(identity) => {
                tracing::info!(
                    "credential from {} accepted for '{}' ({})",
                    source,
                    identity.display_name,
                    mask_token(&credential)
                );
                return identity;
            }
            Err(e) => {
                tracing::debug!(
                    "credential from {} rejected ({}): {}",
                    source,
                    mask_token(&credential),
                    e
                );
            }
        }
    }
    tracing::info!("no valid credential, session is anonymous");
    Identity::anonymous()
}
