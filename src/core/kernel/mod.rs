//! Request signing kernel.
//!
//! The pipeline is split into small, pure stages so that each one can be
//! tested on its own:
//!
//! ## Canonicalization
//! - `codec`: RFC1738 query string parse/encode
//! - `normalize`: drop absent values, sort by key bytes
//! - `base_string`: `"<METHOD> <host><path>?<payload>"`
//!
//! ## Authentication
//! - `signer`: HMAC-SHA256 over the base string, base64-encoded
//! - `RequestAuthenticator`: runs the stages against an `OutboundRequest`
//!   and attaches `X-Token` / `X-Signature`
//!
//! ## Transport
//! - `RequestHook`: pre-dispatch hook interface
//! - `ReqwestRest`: reqwest client that runs hooks before sending
//!
//! # Example
//!
//! ```rust,no_run
//! use tevo_auth::core::credential::Credential;
//! use tevo_auth::core::kernel::*;
//! use tevo_auth::core::types::OutboundRequest;
//! use reqwest::Method;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let authenticator = RequestAuthenticator::new(Credential::new("token", "secret"))?;
//!
//! // Sign a request without sending it
//! let request = OutboundRequest::new(Method::GET, "https://api.ticketevolution.com/v9/events?id=5")?;
//! let signed = authenticator.authenticate(&request)?;
//! assert!(signed.header("X-Signature").is_some());
//!
//! // Or let the transport sign every request it sends
//! let rest = RestClientBuilder::new(RestClientConfig::new(
//!     "https://api.ticketevolution.com/v9".to_string(),
//! ))
//! .with_hook(Arc::new(authenticator))
//! .build()?;
//! let response = rest.get("/events", &[("id", "5")]).await?;
//! println!("{}", response.status());
//! # Ok(())
//! # }
//! ```
pub mod authenticator;
pub mod base_string;
pub mod codec;
pub mod normalize;
pub mod rest;
pub mod signer;

// Re-export key types for convenience
pub use authenticator::{RequestAuthenticator, RequestHook, SIGNATURE_HEADER, TOKEN_HEADER};
pub use rest::{ReqwestRest, RestClient, RestClientBuilder, RestClientConfig};
