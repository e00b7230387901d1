//! Configuration Types
//!
//! Santander client configuration types.

use secrecy::{ExposeSecret, SecretString};
use std::path::PathBuf;
use std::time::Duration;

use crate::builders::SantanderConfigBuilder;
use crate::error::{SantanderError, SantanderResult};
use crate::flows::PollPolicy;

/// Santander client configuration.
#[derive(Clone)]
pub struct SantanderConfig {
    /// Client identifier, also sent as `X-Application-Key`.
    pub client_id: String,
    /// Client secret.
    pub client_secret: SecretString,
    /// PEM file holding the client certificate and its private key (mutual TLS).
    pub cert_path: PathBuf,
    /// API base URL.
    pub base_url: String,
    /// Workspace id; resolved from the account when absent.
    pub workspace_id: Option<String>,
    /// HTTP timeout.
    pub timeout: Duration,
    /// Status polling bounds.
    pub poll: PollPolicy,
}

impl SantanderConfig {
    /// Create a new configuration builder.
    pub fn builder() -> SantanderConfigBuilder {
        SantanderConfigBuilder::new()
    }

    /// Create a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SANTANDER_CLIENT_ID` (required)
    /// - `SANTANDER_CLIENT_SECRET` (required)
    /// - `SANTANDER_CERT_PATH` (required): PEM with certificate and private key
    /// - `SANTANDER_BASE_URL` (required)
    /// - `SANTANDER_WORKSPACE_ID` (optional)
    /// - `SANTANDER_TIMEOUT_SECS` (optional)
    pub fn from_env() -> SantanderResult<Self> {
        let required = |name: &str| {
            std::env::var(name).map_err(|_| {
                SantanderError::configuration(format!("{} environment variable not set", name))
            })
        };

        let mut builder = SantanderConfigBuilder::new()
            .client_id(required("SANTANDER_CLIENT_ID")?)
            .client_secret(required("SANTANDER_CLIENT_SECRET")?)
            .cert_path(required("SANTANDER_CERT_PATH")?)
            .base_url(required("SANTANDER_BASE_URL")?);

        if let Ok(workspace_id) = std::env::var("SANTANDER_WORKSPACE_ID") {
            if !workspace_id.is_empty() {
                builder = builder.workspace_id(workspace_id);
            }
        }

        if let Ok(timeout_str) = std::env::var("SANTANDER_TIMEOUT_SECS") {
            let secs = timeout_str.parse::<u64>().map_err(|_| {
                SantanderError::configuration(format!(
                    "SANTANDER_TIMEOUT_SECS must be a number of seconds, got {:?}",
                    timeout_str
                ))
            })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }

        builder.build()
    }

    /// Check every required credential before any call is made.
    pub fn validate(&self) -> SantanderResult<()> {
        if self.client_id.trim().is_empty() {
            return Err(SantanderError::configuration("client_id is required"));
        }
        if self.client_secret.expose_secret().trim().is_empty() {
            return Err(SantanderError::configuration("client_secret is required"));
        }
        if self.cert_path.as_os_str().is_empty() {
            return Err(SantanderError::configuration(
                "client certificate path is required",
            ));
        }

        let url = url::Url::parse(&self.base_url).map_err(|e| {
            SantanderError::configuration(format!("invalid base_url {:?}: {}", self.base_url, e))
        })?;
        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(SantanderError::configuration(
                "base_url must start with http:// or https://",
            ));
        }

        if self.timeout.is_zero() {
            return Err(SantanderError::configuration("timeout must be positive"));
        }

        self.poll.validate()
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl std::fmt::Debug for SantanderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SantanderConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("cert_path", &self.cert_path)
            .field("base_url", &self.base_url)
            .field("workspace_id", &self.workspace_id)
            .field("timeout", &self.timeout)
            .field("poll", &self.poll)
            .finish()
    }
}

/// Default HTTP timeout for every Santander call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Santander sandbox base URL.
pub const SANDBOX_BASE_URL: &str = "https://trust-sandbox.api.santander.com.br";

/// Santander production base URL.
pub const PRODUCTION_BASE_URL: &str = "https://trust-open.api.santander.com.br";
