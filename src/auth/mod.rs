//! Token Authority
//!
//! OAuth2 client-credentials token acquisition, expiry tracking and request
//! decoration for the Santander API.

use chrono::Duration;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::core::{Clock, HttpMethod, HttpRequest, HttpTransport, SystemClock};
use crate::error::{SantanderError, SantanderResult};
use crate::types::{AccessToken, SantanderConfig, TokenResponse, DEFAULT_EXPIRES_IN_SECS};

/// Token endpoint, relative to the base URL.
pub const TOKEN_ENDPOINT: &str = "/auth/oauth/v2/token";

/// Renew this long before the bank's expiry.
pub const EXPIRY_MARGIN_SECS: i64 = 60;

/// Owns the bearer token of one client identity.
///
/// The cached token sits behind an async mutex and the expiry check and the
/// renewal both happen while it is held, so concurrent callers share a
/// single renewal.
pub struct TokenAuthority {
    client_id: String,
    client_secret: SecretString,
    token_url: String,
    transport: Arc<dyn HttpTransport>,
    clock: Arc<dyn Clock>,
    token: Mutex<Option<AccessToken>>,
}

impl TokenAuthority {
    /// Authority using the wall clock.
    pub fn new(config: &SantanderConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self::with_clock(config, transport, Arc::new(SystemClock))
    }

    /// Authority with an injected clock.
    pub fn with_clock(
        config: &SantanderConfig,
        transport: Arc<dyn HttpTransport>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            token_url: format!("{}{}", config.base_url(), TOKEN_ENDPOINT),
            transport,
            clock,
            token: Mutex::new(None),
        }
    }

    /// Return a bearer token valid for at least the safety margin, renewing
    /// it first when needed.
    pub async fn ensure_valid(&self) -> SantanderResult<String> {
        let mut cached = self.token.lock().await;
        let now = self.clock.now();
        let margin = Duration::seconds(EXPIRY_MARGIN_SECS);

        if let Some(token) = cached.as_ref() {
            if token.is_valid_at(now, margin) {
                return Ok(token.secret().to_string());
            }
            tracing::debug!(expires_at = %token.expires_at(), "access token inside renewal margin");
        }

        let token = self.request_token().await?;
        let value = token.secret().to_string();
        tracing::info!(expires_at = %token.expires_at(), "access token renewed");
        *cached = Some(token);

        Ok(value)
    }

    /// Add `Authorization` and `X-Application-Key` to an outbound request.
    pub async fn authorize(&self, request: &mut HttpRequest) -> SantanderResult<()> {
        let token = self.ensure_valid().await?;
        request
            .headers
            .insert("authorization".to_string(), format!("Bearer {}", token));
        request
            .headers
            .insert("x-application-key".to_string(), self.client_id.clone());
        Ok(())
    }

    /// Drop the cached token so the next call renews.
    pub async fn invalidate(&self) {
        self.token.lock().await.take();
    }

    async fn request_token(&self) -> SantanderResult<AccessToken> {
        let form = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose_secret().as_str()),
            ("grant_type", "client_credentials"),
        ];
        let body = serde_urlencoded::to_string(form).map_err(|e| {
            SantanderError::client(format!("failed to encode token request: {}", e))
        })?;

        let mut request = HttpRequest::new(HttpMethod::Post, self.token_url.clone());
        request.headers.insert(
            "content-type".to_string(),
            "application/x-www-form-urlencoded".to_string(),
        );
        request
            .headers
            .insert("accept".to_string(), "application/json".to_string());
        request.body = Some(body);

        let requested_at = self.clock.now();
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            tracing::error!(status = response.status, "token request failed");
            return Err(SantanderError::from_status(response.status, &response.body));
        }

        let token_response: TokenResponse = serde_json::from_str(&response.body).map_err(|e| {
            SantanderError::client(format!("invalid token response: {}", e))
        })?;

        let access_token = token_response
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| SantanderError::client("token response without access_token"))?;
        let expires_in = token_response.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS);

        AccessToken::new(access_token, requested_at, expires_in)
    }
}

impl std::fmt::Debug for TokenAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenAuthority")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("token_url", &self.token_url)
            .finish_non_exhaustive()
    }
}
