//! Santander Payments Integration
//!
//! Client for the Santander payments-partner API: PIX transfers and
//! bank-slip/barcode payments.
//!
//! # Features
//!
//! - OAuth2 client-credentials tokens over mutual TLS, renewed 60 seconds
//!   before expiry
//! - Workspace discovery at client construction
//! - Create, ready, confirm and settle lifecycle with bounded status polling
//! - Transfers that always answer with a [`TransferResult`]
//!
//! # Example
//!
//! ```rust,ignore
//! use integrations_santander::{santander_config, transfer_pix, SantanderClient};
//! use rust_decimal::Decimal;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = santander_config()
//!         .client_id("my-client-id")
//!         .client_secret("my-client-secret")
//!         .cert_path("/etc/santander/client.pem")
//!         .base_url(integrations_santander::types::SANDBOX_BASE_URL)
//!         .build()?;
//!
//!     let client = SantanderClient::connect(config).await?;
//!
//!     let result = transfer_pix(
//!         &client,
//!         "12345678909",
//!         Decimal::new(10000, 2),
//!         "invoice 42",
//!         &[],
//!     )
//!     .await;
//!
//!     if result.success {
//!         println!("paid: {:?}", result.data);
//!     } else {
//!         eprintln!("transfer {} failed: {}", result.request_id, result.error);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `types`: configuration, token, workspace and payment data structures
//! - `error`: error taxonomy
//! - `core`: HTTP transport and clock
//! - `auth`: token authority
//! - `client`: authenticated gateway and workspace scoping
//! - `workspaces`: workspace listing
//! - `resilience`: retry of status reads
//! - `flows`: payment lifecycle state machine
//! - `services`: PIX and barcode operations
//! - `builders`: fluent configuration builder

pub mod auth;
pub mod builders;
pub mod client;
pub mod core;
pub mod error;
pub mod flows;
pub mod resilience;
pub mod services;
pub mod types;
pub mod workspaces;

// Re-export main client
pub use client::{HttpGateway, SantanderClient};

// Re-export builders
pub use builders::{santander_config, SantanderConfigBuilder};

// Re-export errors
pub use error::{SantanderError, SantanderResult};

// Re-export core types
pub use types::{
    AccountType, Beneficiary, DocumentType, OrderStatus, PaymentOrder, PixKeyType, PixTarget,
    SantanderConfig, TransferResult, Workspace, WorkspaceType,
};

// Re-export flows
pub use flows::{FlowStep, PaymentFlow, PollOutcome, PollPolicy};

// Re-export operations
pub use services::{
    get_barcode_status, get_transfer, pay_barcode, pix_key_type, transfer_pix, truncate_value,
    BarcodeType,
};

// Re-export token authority
pub use auth::TokenAuthority;

// Re-export transports
pub use crate::core::{HttpTransport, MockHttpTransport, ReqwestHttpTransport};
