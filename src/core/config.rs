use crate::core::credential::Credential;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;

pub const PRODUCTION_BASE_URL: &str = "https://api.ticketevolution.com/v9";
pub const SANDBOX_BASE_URL: &str = "https://api.sandbox.ticketevolution.com/v9";

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

fn default_user_agent() -> String {
    concat!("tevo-auth/", env!("CARGO_PKG_VERSION")).to_string()
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_token: String,
    pub api_secret: Secret<String>,
    pub sandbox: bool,
    pub base_url: Option<String>,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

// Custom Serialize implementation - never expose credentials in serialization
impl Serialize for ClientConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("ClientConfig", 6)?;
        state.serialize_field("api_token", "[REDACTED]")?;
        state.serialize_field("api_secret", "[REDACTED]")?;
        state.serialize_field("sandbox", &self.sandbox)?;
        state.serialize_field("base_url", &self.base_url)?;
        state.serialize_field("timeout_seconds", &self.timeout_seconds)?;
        state.serialize_field("user_agent", &self.user_agent)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for ClientConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ClientConfigHelper {
            api_token: String,
            api_secret: String,
            #[serde(default)]
            sandbox: bool,
            base_url: Option<String>,
            timeout_seconds: Option<u64>,
            user_agent: Option<String>,
        }

        let helper = ClientConfigHelper::deserialize(deserializer)?;
        Ok(Self {
            api_token: helper.api_token,
            api_secret: Secret::new(helper.api_secret),
            sandbox: helper.sandbox,
            base_url: helper.base_url,
            timeout_seconds: helper.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS),
            user_agent: helper.user_agent.unwrap_or_else(default_user_agent),
        })
    }
}

impl ClientConfig {
    /// Create a new configuration with API credentials
    #[must_use]
    pub fn new(api_token: String, api_secret: String) -> Self {
        Self {
            api_token,
            api_secret: Secret::new(api_secret),
            sandbox: false,
            base_url: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: default_user_agent(),
        }
    }

    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `{PREFIX}_API_TOKEN` (e.g., `TEVO_API_TOKEN`)
    /// - `{PREFIX}_API_SECRET` (e.g., `TEVO_API_SECRET`)
    /// - `{PREFIX}_SANDBOX` (optional, defaults to false)
    /// - `{PREFIX}_BASE_URL` (optional)
    pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        let prefix = prefix.to_uppercase();
        let token_var = format!("{}_API_TOKEN", prefix);
        let secret_var = format!("{}_API_SECRET", prefix);
        let sandbox_var = format!("{}_SANDBOX", prefix);
        let base_url_var = format!("{}_BASE_URL", prefix);

        let api_token =
            env::var(&token_var).map_err(|_| ConfigError::MissingEnvironmentVariable(token_var))?;

        let api_secret = env::var(&secret_var)
            .map_err(|_| ConfigError::MissingEnvironmentVariable(secret_var))?;

        let sandbox = match env::var(&sandbox_var) {
            Ok(value) => value.parse::<bool>().map_err(|_| {
                ConfigError::InvalidConfiguration(format!(
                    "{} must be 'true' or 'false', got '{}'",
                    sandbox_var, value
                ))
            })?,
            Err(_) => false,
        };

        let base_url = env::var(&base_url_var).ok().filter(|url| !url.is_empty());

        Ok(Self {
            api_token,
            api_secret: Secret::new(api_secret),
            sandbox,
            base_url,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: default_user_agent(),
        })
    }

    /// Create configuration from .env file and environment variables
    ///
    /// **Security Warning**: Never commit .env files to version control!
    #[cfg(feature = "env-file")]
    pub fn from_env_file(prefix: &str) -> Result<Self, ConfigError> {
        Self::from_env_file_with_path(prefix, ".env")
    }

    /// Create configuration from a specific .env file path
    ///
    /// A missing file is not an error; system environment variables are
    /// used as-is in that case.
    #[cfg(feature = "env-file")]
    pub fn from_env_file_with_path(prefix: &str, env_file_path: &str) -> Result<Self, ConfigError> {
        match dotenv::from_path(env_file_path) {
            Ok(()) => {}
            Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "Failed to load .env file '{}': {}",
                    env_file_path, e
                )));
            }
        }

        Self::from_env(prefix)
    }

    /// Check if this configuration carries both halves of the credential
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.api_token.is_empty() && !self.api_secret.expose_secret().is_empty()
    }

    /// Set sandbox mode
    #[must_use]
    pub const fn sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    /// Set custom base URL
    #[must_use]
    pub fn base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    #[must_use]
    pub const fn timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Explicit base URL if set, otherwise the sandbox or production API.
    pub fn effective_base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.clone(),
            None if self.sandbox => SANDBOX_BASE_URL.to_string(),
            None => PRODUCTION_BASE_URL.to_string(),
        }
    }

    /// Build the signing credential from this configuration
    pub fn credential(&self) -> Credential {
        Credential::new(
            self.api_token.clone(),
            self.api_secret.expose_secret().clone(),
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvironmentVariable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
