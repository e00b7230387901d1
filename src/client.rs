//! Santander Client
//!
//! Authenticated JSON gateway over the Santander payments-partner API. One
//! client holds one identity and one workspace.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::auth::TokenAuthority;
use crate::core::{Clock, HttpMethod, HttpRequest, HttpTransport, ReqwestHttpTransport, SystemClock};
use crate::error::{SantanderError, SantanderResult};
use crate::flows::PollPolicy;
use crate::types::{SantanderConfig, WorkspaceType};
use crate::workspaces;

/// Path placeholder replaced by the client's workspace id.
pub const WORKSPACE_PLACEHOLDER: &str = ":workspaceid";

/// Minimal capability interface the payment flow depends on.
///
/// Endpoints are relative to the base URL and may contain `:workspaceid`.
/// Non-2xx answers and transport failures are `SantanderError::Request`.
#[async_trait]
pub trait HttpGateway: Send + Sync {
    async fn get(&self, endpoint: &str) -> SantanderResult<Value>;

    async fn post(&self, endpoint: &str, body: &Value) -> SantanderResult<Value>;

    async fn put(&self, endpoint: &str, body: &Value) -> SantanderResult<Value>;

    async fn patch(&self, endpoint: &str, body: &Value) -> SantanderResult<Value>;

    async fn delete(&self, endpoint: &str) -> SantanderResult<Value>;
}

/// Santander API client.
pub struct SantanderClient {
    config: SantanderConfig,
    transport: Arc<dyn HttpTransport>,
    authority: TokenAuthority,
}

impl SantanderClient {
    /// Connect with the configured client certificate over mutual TLS.
    ///
    /// Resolves the workspace when none is configured; configuration and
    /// workspace errors surface here, before any payment call.
    pub async fn connect(config: SantanderConfig) -> SantanderResult<Self> {
        config.validate()?;
        let transport = Arc::new(ReqwestHttpTransport::from_config(&config)?);
        Self::with_components(config, transport, Arc::new(SystemClock)).await
    }

    /// Create a client over a custom transport.
    pub async fn with_transport(
        config: SantanderConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> SantanderResult<Self> {
        Self::with_components(config, transport, Arc::new(SystemClock)).await
    }

    /// Create a client with custom transport and clock.
    pub async fn with_components(
        config: SantanderConfig,
        transport: Arc<dyn HttpTransport>,
        clock: Arc<dyn Clock>,
    ) -> SantanderResult<Self> {
        config.validate()?;
        let authority = TokenAuthority::with_clock(&config, transport.clone(), clock);
        let mut client = Self {
            config,
            transport,
            authority,
        };

        if client.config.workspace_id.is_none() {
            let workspace_id =
                workspaces::first_workspace_id_of_type(&client, WorkspaceType::Payments)
                    .await?
                    .ok_or_else(|| SantanderError::Workspace {
                        message: format!(
                            "no active {} workspace found for this account",
                            WorkspaceType::Payments.as_str()
                        ),
                    })?;
            tracing::info!(workspace_id = %workspace_id, "workspace resolved");
            client.config.workspace_id = Some(workspace_id);
        }

        Ok(client)
    }

    /// Get the configuration.
    pub fn config(&self) -> &SantanderConfig {
        &self.config
    }

    /// Workspace every payment endpoint is scoped to.
    pub fn workspace_id(&self) -> Option<&str> {
        self.config.workspace_id.as_deref()
    }

    pub fn poll_policy(&self) -> PollPolicy {
        self.config.poll
    }

    /// Token authority of this client.
    pub fn authority(&self) -> &TokenAuthority {
        &self.authority
    }

    /// Substitute the workspace placeholder, matching it in any case.
    pub fn resolve_endpoint(&self, endpoint: &str) -> SantanderResult<String> {
        replace_workspace_placeholder(endpoint, self.workspace_id())
    }

    async fn request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<&Value>,
    ) -> SantanderResult<Value> {
        let path = self.resolve_endpoint(endpoint)?;
        let separator = if path.starts_with('/') { "" } else { "/" };
        let url = format!("{}{}{}", self.config.base_url(), separator, path);

        let mut request = HttpRequest::new(method, url);
        if let Some(body) = body {
            request = request.with_json(body);
        }
        request
            .headers
            .insert("accept".to_string(), "application/json".to_string());
        request.timeout = Some(self.config.timeout);
        self.authority.authorize(&mut request).await?;

        tracing::debug!(method = method.as_str(), endpoint = %path, "sending request");
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            tracing::warn!(
                method = method.as_str(),
                endpoint = %path,
                status = response.status,
                "request failed"
            );
            return Err(SantanderError::from_status(response.status, &response.body));
        }

        if response.body.trim().is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }

        serde_json::from_str(&response.body).map_err(|e| {
            SantanderError::client(format!(
                "invalid JSON from {} {}: {}",
                method.as_str(),
                path,
                e
            ))
        })
    }
}

/// Replace every `:workspaceid` occurrence, ignoring case. The rest of the
/// path keeps its case.
pub fn replace_workspace_placeholder(
    endpoint: &str,
    workspace_id: Option<&str>,
) -> SantanderResult<String> {
    let lowered = endpoint.to_ascii_lowercase();
    if !lowered.contains(WORKSPACE_PLACEHOLDER) {
        return Ok(endpoint.to_string());
    }

    let workspace_id = workspace_id.filter(|id| !id.is_empty()).ok_or_else(|| {
        SantanderError::configuration(format!(
            "workspace id is required for endpoint {}",
            endpoint
        ))
    })?;

    let mut resolved = String::with_capacity(endpoint.len() + workspace_id.len());
    let mut cursor = 0;
    while let Some(offset) = lowered[cursor..].find(WORKSPACE_PLACEHOLDER) {
        let start = cursor + offset;
        resolved.push_str(&endpoint[cursor..start]);
        resolved.push_str(workspace_id);
        cursor = start + WORKSPACE_PLACEHOLDER.len();
    }
    resolved.push_str(&endpoint[cursor..]);

    Ok(resolved)
}

#[async_trait]
impl HttpGateway for SantanderClient {
    async fn get(&self, endpoint: &str) -> SantanderResult<Value> {
        self.request(HttpMethod::Get, endpoint, None).await
    }

    async fn post(&self, endpoint: &str, body: &Value) -> SantanderResult<Value> {
        self.request(HttpMethod::Post, endpoint, Some(body)).await
    }

    async fn put(&self, endpoint: &str, body: &Value) -> SantanderResult<Value> {
        self.request(HttpMethod::Put, endpoint, Some(body)).await
    }

    async fn patch(&self, endpoint: &str, body: &Value) -> SantanderResult<Value> {
        self.request(HttpMethod::Patch, endpoint, Some(body)).await
    }

    async fn delete(&self, endpoint: &str) -> SantanderResult<Value> {
        self.request(HttpMethod::Delete, endpoint, None).await
    }
}

impl std::fmt::Debug for SantanderClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SantanderClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
