use crate::core::errors::AuthError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Body, Method, Url};

/// Ordered query parameters.
///
/// Keys keep the order in which they were first seen. A key that appears
/// more than once accumulates its values, in order, under the same entry.
/// A value of `None` is a parameter present without `=` (e.g. `?flag`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    entries: Vec<(String, Vec<Option<String>>)>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value under `key`, creating the entry on first sight.
    pub fn insert(&mut self, key: impl Into<String>, value: Option<String>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: Option<&str>) -> Self {
        self.insert(key, value.map(str::to_string));
        self
    }

    pub fn get(&self, key: &str) -> Option<&[Option<String>]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Option<String>])> {
        self.entries
            .iter()
            .map(|(k, values)| (k.as_str(), values.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entries_mut(&mut self) -> &mut Vec<(String, Vec<Option<String>>)> {
        &mut self.entries
    }
}

impl<K: Into<String>> FromIterator<(K, Option<String>)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, Option<String>)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (key, value) in iter {
            set.insert(key, value);
        }
        set
    }
}

/// What gets appended after the `?` of the base string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonicalPayload {
    /// Normalized, RFC1738-encoded query string (GET, DELETE, HEAD, ...).
    Query(String),
    /// Request body exactly as transmitted (POST, PUT, PATCH).
    Body(Vec<u8>),
}

impl CanonicalPayload {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Query(query) => query.as_bytes(),
            Self::Body(body) => body,
        }
    }
}

/// Base string and the base64 HMAC computed over it.
///
/// `base_string` is for diagnostics only. A binary body shows up with
/// replacement characters here; the signature covers the raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureResult {
    pub base_string: String,
    pub signature: String,
}

/// An HTTP request about to be dispatched.
///
/// Values are never mutated in place by the signing pipeline; every
/// transformation returns a new `OutboundRequest`.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
}

impl OutboundRequest {
    /// Parse `url` and build a request with no headers and no body.
    pub fn new(method: Method, url: &str) -> Result<Self, AuthError> {
        let url = Url::parse(url)
            .map_err(|e| AuthError::MalformedRequest(format!("Invalid URL '{}': {}", url, e)))?;
        Self::from_url(method, url)
    }

    /// Build a request from an already parsed URL.
    ///
    /// The URL must carry a host, since the host is part of what gets signed.
    pub fn from_url(method: Method, url: Url) -> Result<Self, AuthError> {
        if url.host_str().is_none_or(str::is_empty) {
            return Err(AuthError::MalformedRequest(format!(
                "URL '{}' has no host",
                url
            )));
        }

        Ok(Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        })
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header value as text, if present and visible ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Raw query string without the leading `?` (empty when absent).
    pub fn query(&self) -> &str {
        self.url.query().unwrap_or_default()
    }

    /// Body bytes (empty when the request has no body).
    pub fn body(&self) -> &[u8] {
        self.body.as_deref().unwrap_or_default()
    }

    /// POST, PUT and PATCH sign their body instead of their query string.
    pub fn is_body_bearing(&self) -> bool {
        let method = self.method.as_str();
        ["POST", "PUT", "PATCH"]
            .iter()
            .any(|m| m.eq_ignore_ascii_case(method))
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Replace the query string. An empty string removes the `?` entirely.
    pub fn with_query(mut self, query: &str) -> Self {
        if query.is_empty() {
            self.url.set_query(None);
        } else {
            self.url.set_query(Some(query));
        }
        self
    }

    /// Convert into a `reqwest::Request` ready for `Client::execute`.
    pub fn into_reqwest(self) -> reqwest::Request {
        let mut request = reqwest::Request::new(self.method, self.url);
        *request.headers_mut() = self.headers;
        if let Some(body) = self.body {
            *request.body_mut() = Some(Body::from(body));
        }
        request
    }
}
