//! Base string construction.
//!
//! The base string is what actually gets signed:
//!
//! ```text
//! <METHOD> <host[:port]><path>?<payload>
//! ```
//!
//! The scheme is left out so an http/https switch does not invalidate a
//! signature; the host is kept so a signature cannot be replayed against a
//! different host. The `?` is always present, even with an empty payload.

use crate::core::errors::AuthError;
use crate::core::kernel::codec;
use crate::core::kernel::normalize::normalize;
use crate::core::types::{CanonicalPayload, OutboundRequest};
use reqwest::{Method, Url};

/// Host (plus any explicit non-default port) followed by the path.
///
/// Scheme, userinfo, query and fragment are all dropped.
pub fn host_and_path(url: &Url) -> Result<String, AuthError> {
    let host = url
        .host_str()
        .filter(|host| !host.is_empty())
        .ok_or_else(|| AuthError::MalformedRequest(format!("URL '{}' has no host", url)))?;

    Ok(match url.port() {
        Some(port) => format!("{}:{}{}", host, port, url.path()),
        None => format!("{}{}", host, url.path()),
    })
}

/// Pick the payload for a request.
///
/// POST, PUT and PATCH use the body bytes verbatim. Every other method uses
/// its query string, parsed, normalized and re-encoded.
pub fn canonical_payload(request: &OutboundRequest) -> Result<CanonicalPayload, AuthError> {
    if request.is_body_bearing() {
        return Ok(CanonicalPayload::Body(request.body().to_vec()));
    }

    let params = codec::parse(request.query())?;
    Ok(CanonicalPayload::Query(codec::encode(&normalize(&params))))
}

/// Assemble `"<METHOD> <HOST_AND_PATH>?<PAYLOAD>"` as bytes.
///
/// A body payload is appended exactly as it will be transmitted, whether or
/// not it is valid UTF-8.
pub fn build(
    method: &Method,
    url: &Url,
    payload: &CanonicalPayload,
) -> Result<Vec<u8>, AuthError> {
    let prefix = format!(
        "{} {}?",
        method.as_str().to_ascii_uppercase(),
        host_and_path(url)?
    );

    let mut base = Vec::with_capacity(prefix.len() + payload.as_bytes().len());
    base.extend_from_slice(prefix.as_bytes());
    base.extend_from_slice(payload.as_bytes());
    Ok(base)
}

/// Base string for a request as it currently stands.
pub fn build_for_request(request: &OutboundRequest) -> Result<Vec<u8>, AuthError> {
    let payload = canonical_payload(request)?;
    build(request.method(), request.url(), &payload)
}
