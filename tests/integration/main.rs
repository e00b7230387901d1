//! Integration tests
//!
//! Full transfer flows through `SantanderClient`, over the in-memory
//! transport and over HTTP against WireMock.

mod http;
mod pix;

use integrations_santander::core::{HttpMethod, MockHttpTransport};
use integrations_santander::{SantanderClient, SantanderConfig};
use serde_json::{json, Value};
use std::sync::Arc;

pub const WORKSPACE_ID: &str = "ws-3f9a";

pub const PIX_PATH: &str = "/management_payments_partners/v1/workspaces/ws-3f9a/pix_payments";

pub fn config(base_url: &str) -> SantanderConfig {
    SantanderConfig::builder()
        .client_id("test-client-id")
        .client_secret("test-client-secret")
        .cert_path("/tmp/santander-test.pem")
        .base_url(base_url)
        .workspace_id(WORKSPACE_ID)
        .build()
        .expect("valid test configuration")
}

/// Client over a mock transport with the token already queued.
pub async fn mock_client() -> (SantanderClient, Arc<MockHttpTransport>) {
    let transport = Arc::new(MockHttpTransport::new());
    let client = SantanderClient::with_transport(
        config("https://santander.test"),
        transport.clone(),
    )
    .await
    .expect("client");
    transport.queue_json_response(200, &token_response());
    (client, transport)
}

pub fn token_response() -> Value {
    json!({
        "access_token": "test-access-token",
        "expires_in": 900,
        "token_type": "Bearer",
    })
}

pub fn pix_order(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "workspaceId": WORKSPACE_ID,
        "status": status,
        "tags": [],
        "paymentValue": "100.00",
        "remittanceInformation": "transfer description",
        "dictCode": "12345678909",
        "dictCodeType": "CPF",
        "rejectReason": null,
    })
}

/// Requests with `method` against the PIX collection or one of its orders.
pub fn pix_calls(transport: &MockHttpTransport, method: HttpMethod) -> usize {
    transport
        .get_requests()
        .iter()
        .filter(|r| r.method == method && r.url.contains(PIX_PATH))
        .count()
}
