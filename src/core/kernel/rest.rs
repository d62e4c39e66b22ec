use crate::core::config::ClientConfig;
use crate::core::errors::AuthError;
use crate::core::kernel::authenticator::{RequestAuthenticator, RequestHook};
use crate::core::kernel::codec;
use crate::core::types::OutboundRequest;
use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, Response};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

/// REST client trait for dispatching requests through the hook pipeline
///
/// Responses are handed back exactly as received: no status mapping, no
/// body parsing. That is the caller's concern.
#[async_trait]
pub trait RestClient: Send + Sync {
    /// Run every hook over `request`, then send it
    async fn execute(&self, request: OutboundRequest) -> Result<Response, AuthError>;

    /// Make a GET request
    ///
    /// # Arguments
    /// * `path` - Path appended to the base URL
    /// * `query_params` - Query parameters as key-value pairs
    async fn get(&self, path: &str, query_params: &[(&str, &str)])
        -> Result<Response, AuthError>;

    /// Make a DELETE request
    async fn delete(
        &self,
        path: &str,
        query_params: &[(&str, &str)],
    ) -> Result<Response, AuthError>;

    /// Make a POST request with a JSON body
    ///
    /// The body is serialized once; those exact bytes are signed and sent.
    async fn post(&self, path: &str, body: &Value) -> Result<Response, AuthError>;

    /// Make a PUT request with a JSON body
    async fn put(&self, path: &str, body: &Value) -> Result<Response, AuthError>;

    /// Make a PATCH request with a JSON body
    async fn patch(&self, path: &str, body: &Value) -> Result<Response, AuthError>;
}

/// Configuration for the REST client
#[derive(Clone, Debug)]
pub struct RestClientConfig {
    /// Base URL for the API, e.g. `https://api.ticketevolution.com/v9`
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string to include in requests
    pub user_agent: String,
}

impl RestClientConfig {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            timeout_seconds: 30,
            user_agent: concat!("tevo-auth/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Set the user agent string
    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

/// Builder for creating REST client instances
pub struct RestClientBuilder {
    config: RestClientConfig,
    hooks: Vec<Arc<dyn RequestHook>>,
}

impl RestClientBuilder {
    pub fn new(config: RestClientConfig) -> Self {
        Self {
            config,
            hooks: Vec::new(),
        }
    }

    /// Add a pre-dispatch hook. Hooks run in the order they were added.
    pub fn with_hook(mut self, hook: Arc<dyn RequestHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn build(self) -> Result<ReqwestRest, AuthError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(self.config.timeout_seconds))
            .user_agent(&self.config.user_agent)
            .build()?;

        Ok(ReqwestRest {
            client,
            config: self.config,
            hooks: self.hooks,
        })
    }
}

/// Implementation of `RestClient` using reqwest
#[derive(Clone)]
pub struct ReqwestRest {
    client: Client,
    config: RestClientConfig,
    hooks: Vec<Arc<dyn RequestHook>>,
}

impl std::fmt::Debug for ReqwestRest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestRest")
            .field("config", &self.config)
            .field("hook_count", &self.hooks.len())
            .finish_non_exhaustive()
    }
}

impl ReqwestRest {
    /// Build a signing client from a `ClientConfig`.
    ///
    /// Fails with `InvalidCredential` when the token or secret is empty.
    pub fn from_config(config: &ClientConfig) -> Result<Self, AuthError> {
        let authenticator = RequestAuthenticator::new(config.credential())?;
        let rest_config = RestClientConfig::new(config.effective_base_url())
            .with_timeout(config.timeout_seconds)
            .with_user_agent(config.user_agent.clone());

        RestClientBuilder::new(rest_config)
            .with_hook(Arc::new(authenticator))
            .build()
    }

    pub fn config(&self) -> &RestClientConfig {
        &self.config
    }

    /// Build an unsigned request for `path` relative to the base URL.
    ///
    /// `query_params` are appended after any query already present in `path`.
    pub fn build_request(
        &self,
        method: Method,
        path: &str,
        query_params: &[(&str, &str)],
    ) -> Result<OutboundRequest, AuthError> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        let request = OutboundRequest::new(method, &url)?;
        if query_params.is_empty() {
            return Ok(request);
        }

        let mut params = codec::parse(request.query())?;
        for (key, value) in query_params {
            params.insert(*key, Some((*value).to_string()));
        }
        let query = codec::encode(&params);
        Ok(request.with_query(&query))
    }

    /// Run the hook pipeline and produce the `reqwest::Request` that would
    /// be sent. Nothing goes over the network.
    pub fn prepare(&self, request: OutboundRequest) -> Result<reqwest::Request, AuthError> {
        let mut request = request;
        for hook in &self.hooks {
            request = hook.prepare(&request)?;
        }
        Ok(request.into_reqwest())
    }

    async fn send_json(
        &self,
        method: Method,
        path: &str,
        body: &Value,
    ) -> Result<Response, AuthError> {
        let body_bytes = serde_json::to_vec(body)?;
        let request = self
            .build_request(method, path, &[])?
            .with_header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .with_body(body_bytes);

        self.execute(request).await
    }
}

#[async_trait]
impl RestClient for ReqwestRest {
    #[instrument(skip(self, request), fields(method = %request.method(), url = %request.url()))]
    async fn execute(&self, request: OutboundRequest) -> Result<Response, AuthError> {
        let request = self.prepare(request)?;
        let response = self.client.execute(request).await?;

        debug!(status = %response.status(), "Received response");
        Ok(response)
    }

    #[instrument(skip(self, query_params), fields(path = %path, param_count = query_params.len()))]
    async fn get(
        &self,
        path: &str,
        query_params: &[(&str, &str)],
    ) -> Result<Response, AuthError> {
        let request = self.build_request(Method::GET, path, query_params)?;
        self.execute(request).await
    }

    #[instrument(skip(self, query_params), fields(path = %path, param_count = query_params.len()))]
    async fn delete(
        &self,
        path: &str,
        query_params: &[(&str, &str)],
    ) -> Result<Response, AuthError> {
        let request = self.build_request(Method::DELETE, path, query_params)?;
        self.execute(request).await
    }

    #[instrument(skip(self, body), fields(path = %path))]
    async fn post(&self, path: &str, body: &Value) -> Result<Response, AuthError> {
        self.send_json(Method::POST, path, body).await
    }

    #[instrument(skip(self, body), fields(path = %path))]
    async fn put(&self, path: &str, body: &Value) -> Result<Response, AuthError> {
        self.send_json(Method::PUT, path, body).await
    }

    #[instrument(skip(self, body), fields(path = %path))]
    async fn patch(&self, path: &str, body: &Value) -> Result<Response, AuthError> {
        self.send_json(Method::PATCH, path, body).await
    }
}
