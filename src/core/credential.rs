//! Shared API credential used to sign requests.
//!
//! The secret is wrapped in `secrecy::Secret` so it never shows up in
//! `Debug` output and is zeroed on drop.

use secrecy::{ExposeSecret, Secret};

/// API token and secret pair.
///
/// Only the token ever leaves the process (as the `X-Token` header). The
/// secret is used as raw HMAC key material and nothing else.
#[derive(Clone)]
pub struct Credential {
    token: String,
    secret: Secret<String>,
}

impl Credential {
    /// Create a credential from explicit values.
    ///
    /// No validation happens here; `RequestAuthenticator::new` rejects empty
    /// or header-unsafe values.
    pub fn new(token: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            secret: Secret::new(secret.into()),
        }
    }

    /// The token identifier (public, safe to log).
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Expose the secret for signing.
    ///
    /// **WARNING**: Only use this as HMAC key material. Never log or display
    /// the return value.
    pub fn expose_secret(&self) -> &[u8] {
        self.secret.expose_secret().as_bytes()
    }

    pub(crate) fn secret_is_empty(&self) -> bool {
        self.secret.expose_secret().is_empty()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("token", &self.token)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
