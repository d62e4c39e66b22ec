//! Client-side request signing for the Ticket Evolution API.
//!
//! Every request carries an `X-Token` header with the API token and an
//! `X-Signature` header holding a base64 HMAC-SHA256 of a canonical base
//! string built from the method, host, path and either the sorted query
//! string or the raw body.

pub mod core;

pub use crate::core::{
    config::ClientConfig,
    credential::Credential,
    errors::AuthError,
    kernel::{RequestAuthenticator, RequestHook, ReqwestRest, RestClient},
    types::{CanonicalPayload, OutboundRequest, ParameterSet, SignatureResult},
};
