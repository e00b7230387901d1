//! Configuration Builder
//!
//! Fluent builder for Santander configuration.

use secrecy::SecretString;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{SantanderError, SantanderResult};
use crate::flows::PollPolicy;
use crate::types::{SantanderConfig, DEFAULT_TIMEOUT};

/// Santander configuration builder.
#[derive(Default)]
pub struct SantanderConfigBuilder {
    client_id: Option<String>,
    client_secret: Option<SecretString>,
    cert_path: Option<PathBuf>,
    base_url: Option<String>,
    workspace_id: Option<String>,
    timeout: Option<Duration>,
    poll: Option<PollPolicy>,
}

impl SantanderConfigBuilder {
    /// Create new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set client ID.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set client secret.
    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(SecretString::new(client_secret.into()));
        self
    }

    /// Set the PEM file with the client certificate and key.
    pub fn cert_path(mut self, cert_path: impl Into<PathBuf>) -> Self {
        self.cert_path = Some(cert_path.into());
        self
    }

    /// Set API base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set a fixed workspace id, skipping workspace discovery.
    pub fn workspace_id(mut self, workspace_id: impl Into<String>) -> Self {
        self.workspace_id = Some(workspace_id.into());
        self
    }

    /// Set request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override status polling bounds.
    pub fn poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = Some(poll);
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> SantanderResult<SantanderConfig> {
        let missing = |field: &str| SantanderError::configuration(format!("{} is required", field));

        let config = SantanderConfig {
            client_id: self.client_id.ok_or_else(|| missing("client_id"))?,
            client_secret: self.client_secret.ok_or_else(|| missing("client_secret"))?,
            cert_path: self
                .cert_path
                .ok_or_else(|| missing("client certificate path"))?,
            base_url: self.base_url.ok_or_else(|| missing("base_url"))?,
            workspace_id: self.workspace_id.filter(|id| !id.is_empty()),
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            poll: self.poll.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}

/// Create a new configuration builder.
pub fn santander_config() -> SantanderConfigBuilder {
    SantanderConfigBuilder::new()
}
