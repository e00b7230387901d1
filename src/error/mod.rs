//! Santander Error Types
//!
//! One error kind per failure class of the payment integration. Configuration
//! and workspace errors surface from client construction; everything else is
//! caught by the transfer operations and folded into a `TransferResult`.

use thiserror::Error;

use crate::flows::FlowStep;

/// Placeholder used when the bank rejects a payment without a reason.
pub const REJECT_REASON_NOT_RETURNED: &str = "reason not returned by the bank";

/// Root error type for the Santander integration.
#[derive(Error, Debug)]
pub enum SantanderError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Workspace error: {message}")]
    Workspace { message: String },

    #[error("Request failed: {message} - {status_code} {}", display_content(.content))]
    Request {
        message: String,
        status_code: u16,
        content: Option<serde_json::Value>,
    },

    #[error("Santander client error: {message}")]
    Client { message: String },

    #[error("Invalid data: {message}")]
    Validation { message: String },

    #[error("Payment rejected: payment rejected by the bank at step {step} - reason: {reason}")]
    Rejected { step: FlowStep, reason: String },

    #[error(
        "Status update timed out after {attempts} attempts during {} phase",
        .phase.as_phase()
    )]
    StatusTimeout { phase: FlowStep, attempts: u32 },
}

fn display_content(content: &Option<serde_json::Value>) -> String {
    match content {
        Some(value) => value.to_string(),
        None => "no details in response".to_string(),
    }
}

impl SantanderError {
    /// Configuration error shorthand.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Client-contract violation shorthand.
    pub fn client(message: impl Into<String>) -> Self {
        Self::Client {
            message: message.into(),
        }
    }

    /// Value-validation error shorthand.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Build a request error from an HTTP status and raw body.
    pub fn from_status(status_code: u16, body: &str) -> Self {
        Self::Request {
            message: status_code_description(status_code),
            status_code,
            content: parse_error_content(body),
        }
    }

    /// Build a request error for a failure that produced no HTTP response.
    pub fn transport(message: impl std::fmt::Display) -> Self {
        Self::Request {
            message: format!("request error: {}", message),
            status_code: 0,
            content: None,
        }
    }

    /// Stable error code for logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "SANTANDER_CONFIG",
            Self::Workspace { .. } => "SANTANDER_WORKSPACE",
            Self::Request { .. } => "SANTANDER_REQUEST",
            Self::Client { .. } => "SANTANDER_CLIENT",
            Self::Validation { .. } => "SANTANDER_VALIDATION",
            Self::Rejected { .. } => "SANTANDER_REJECTED",
            Self::StatusTimeout { .. } => "SANTANDER_STATUS_TIMEOUT",
        }
    }

    /// Only transport and HTTP failures are worth repeating.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Request { .. })
    }

    /// HTTP status carried by a request error (0 when no response was received).
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Request { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

/// Result type for Santander operations.
pub type SantanderResult<T> = Result<T, SantanderError>;

/// Parse a JSON error body, if there is one.
pub fn parse_error_content(body: &str) -> Option<serde_json::Value> {
    if body.trim().is_empty() {
        return None;
    }
    serde_json::from_str(body).ok()
}

/// Human description of an HTTP status returned by the Santander API.
pub fn status_code_description(status_code: u16) -> String {
    let description = match status_code {
        200 => "Success",
        201 => "Created",
        204 => "No content",
        400 => "Invalid request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not found",
        405 => "Method not allowed",
        406 => "Not acceptable",
        409 => "Conflict",
        422 => "Unprocessable entity",
        429 => "Too many requests",
        500 => "Internal server error",
        501 => "Not implemented",
        502 => "Bad gateway",
        503 => "Service unavailable",
        504 => "Gateway timeout",
        _ => "Unknown error",
    };
    format!("{} - {}", status_code, description)
}
