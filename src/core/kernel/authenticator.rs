use crate::core::credential::Credential;
use crate::core::errors::AuthError;
use crate::core::kernel::normalize::normalize;
use crate::core::kernel::{base_string, codec, signer};
use crate::core::types::{OutboundRequest, SignatureResult};
use reqwest::header::{HeaderName, HeaderValue};
use tracing::{debug, instrument, trace};

/// Header carrying the plaintext API token.
pub const TOKEN_HEADER: &str = "x-token";

/// Header carrying the base64 HMAC-SHA256 signature.
pub const SIGNATURE_HEADER: &str = "x-signature";

/// Pre-dispatch hook run by the transport on every outbound request.
///
/// A hook receives the request as built by the caller and returns the
/// request that should actually be sent, or an error that aborts dispatch.
/// Hooks never see or alter the response.
pub trait RequestHook: Send + Sync {
    fn prepare(&self, request: &OutboundRequest) -> Result<OutboundRequest, AuthError>;
}

/// Signs requests with `X-Token` / `X-Signature` headers.
///
/// For GET-like methods the query string is rewritten to its canonical form
/// (absent values dropped, keys sorted, RFC1738 encoding) before signing, so
/// the bytes on the wire are exactly the bytes that were signed. POST, PUT
/// and PATCH sign their body verbatim and keep their URL untouched.
///
/// The authenticator holds no mutable state and can be shared across threads.
#[derive(Debug, Clone)]
pub struct RequestAuthenticator {
    credential: Credential,
    token_value: HeaderValue,
}

impl RequestAuthenticator {
    /// Create an authenticator, rejecting empty or header-unsafe credentials.
    pub fn new(credential: Credential) -> Result<Self, AuthError> {
        if credential.token().is_empty() {
            return Err(AuthError::InvalidCredential(
                "API token is empty".to_string(),
            ));
        }
        if credential.secret_is_empty() {
            return Err(AuthError::InvalidCredential(
                "API secret is empty".to_string(),
            ));
        }

        let token_value = HeaderValue::from_str(credential.token()).map_err(|e| {
            AuthError::InvalidCredential(format!("API token is not a valid header value: {}", e))
        })?;

        Ok(Self {
            credential,
            token_value,
        })
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Rewrite the query string of a GET-like request to its canonical form.
    ///
    /// Body-bearing requests come back unchanged.
    pub fn canonicalize(&self, request: &OutboundRequest) -> Result<OutboundRequest, AuthError> {
        if request.is_body_bearing() {
            return Ok(request.clone());
        }

        let params = codec::parse(request.query())?;
        let query = codec::encode(&normalize(&params));
        Ok(request.clone().with_query(&query))
    }

    /// Base string and signature for `request`, computed after canonicalization.
    pub fn signature(&self, request: &OutboundRequest) -> Result<SignatureResult, AuthError> {
        let canonical = self.canonicalize(request)?;
        self.sign_canonical(&canonical)
    }

    /// Return a signed copy of `request`.
    ///
    /// The input is left untouched. Either a fully signed request comes back
    /// or an error does; there is no partially signed result.
    #[instrument(skip_all, fields(method = %request.method(), path = %request.url().path()))]
    pub fn authenticate(&self, request: &OutboundRequest) -> Result<OutboundRequest, AuthError> {
        let canonical = self.canonicalize(request)?;
        let result = self.sign_canonical(&canonical)?;

        trace!(base_string = %result.base_string, signature = %result.signature, "Computed signature");

        let signature_value = HeaderValue::from_str(&result.signature).map_err(|e| {
            AuthError::MalformedRequest(format!("Signature is not a valid header value: {}", e))
        })?;

        debug!(token = %self.credential.token(), "Signed request");

        Ok(canonical
            .with_header(
                HeaderName::from_static(TOKEN_HEADER),
                self.token_value.clone(),
            )
            .with_header(HeaderName::from_static(SIGNATURE_HEADER), signature_value))
    }

    fn sign_canonical(&self, canonical: &OutboundRequest) -> Result<SignatureResult, AuthError> {
        let base = base_string::build_for_request(canonical)?;
        let signature = signer::sign_base64(&base, self.credential.expose_secret())?;

        Ok(SignatureResult {
            base_string: String::from_utf8_lossy(&base).into_owned(),
            signature,
        })
    }
}

impl RequestHook for RequestAuthenticator {
    fn prepare(&self, request: &OutboundRequest) -> Result<OutboundRequest, AuthError> {
        self.authenticate(request)
    }
}
