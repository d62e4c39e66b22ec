use crate::core::errors::AuthError;
use base64::engine::general_purpose;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Compute the raw HMAC-SHA256 of `base_string` keyed with `secret`.
pub fn sign(base_string: &[u8], secret: &[u8]) -> Result<Vec<u8>, AuthError> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AuthError::InvalidCredential(format!("Invalid secret key: {}", e)))?;

    mac.update(base_string);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Same as [`sign`], encoded with the standard base64 alphabet (padded) for
/// the `X-Signature` header.
pub fn sign_base64(base_string: &[u8], secret: &[u8]) -> Result<String, AuthError> {
    sign(base_string, secret).map(|digest| general_purpose::STANDARD.encode(digest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_known_vector() {
        // Widely published HMAC-SHA256 vector:
        // f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8
        let signature =
            sign_base64(b"The quick brown fox jumps over the lazy dog", b"key").unwrap();
        assert_eq!(signature, "97yD9DBThCSxMpjmqm+xQ+9NWaFJRhdZl0edvC0aPNg=");
    }

    #[test]
    fn test_sign_raw_digest_length() {
        let digest = sign(b"GET api.example.com/v9/events?", b"S1").unwrap();
        assert_eq!(digest.len(), 32);
        assert_eq!(
            general_purpose::STANDARD.encode(&digest),
            "f/ZVxZi42sZgKKzH5y6ovrU+4s4kLO5+LAlKV9cHROA="
        );
    }

    #[test]
    fn test_sign_is_deterministic() {
        let base = b"GET api.example.com/v9/events?foo=&format=json&id=5";
        assert_eq!(
            sign_base64(base, b"S1").unwrap(),
            sign_base64(base, b"S1").unwrap()
        );
        assert_ne!(
            sign_base64(base, b"S1").unwrap(),
            sign_base64(base, b"S2").unwrap()
        );
    }

    #[test]
    fn test_sign_empty_message() {
        // Should not panic on empty message
        let signature = sign_base64(b"", b"secret").unwrap();
        assert_eq!(signature.len(), 44);
        assert!(signature.ends_with('='));
    }
}
