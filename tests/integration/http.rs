//! Transfers over HTTP against WireMock

use super::*;
use integrations_santander::{transfer_pix, OrderStatus, ReqwestHttpTransport, SantanderError};
use rust_decimal::Decimal;
use std::time::Duration;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN_PATH: &str = "/auth/oauth/v2/token";

async fn setup_mock_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=test-client-id"))
        .and(body_string_contains("client_secret=test-client-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response()))
        .expect(1)
        .mount(&server)
        .await;
    server
}

fn transport() -> Arc<ReqwestHttpTransport> {
    Arc::new(ReqwestHttpTransport::with_options(Duration::from_secs(5), None).unwrap())
}

/// Authenticated request matcher.
fn authorized(http_method: &str, request_path: &str) -> wiremock::MockBuilder {
    Mock::given(method(http_method))
        .and(path(request_path))
        .and(header("authorization", "Bearer test-access-token"))
        .and(header("x-application-key", "test-client-id"))
}

#[tokio::test]
async fn test_pix_transfer_over_http() {
    let server = setup_mock_server().await;
    let order_path = format!("{}/pix-1", PIX_PATH);

    authorized("POST", PIX_PATH)
        .and(body_json(json!({
            "tags": [],
            "paymentValue": "100.00",
            "remittanceInformation": "transfer description",
            "dictCode": "12345678909",
            "dictCodeType": "CPF",
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(pix_order("pix-1", "READY_TO_PAY")))
        .expect(1)
        .mount(&server)
        .await;
    authorized("PATCH", &order_path)
        .and(body_json(json!({"status": "AUTHORIZED", "paymentValue": "100.00"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(pix_order("pix-1", "PENDING_CONFIRMATION")),
        )
        .expect(1)
        .mount(&server)
        .await;
    authorized("GET", &order_path)
        .respond_with(ResponseTemplate::new(200).set_body_json(pix_order("pix-1", "PAYED")))
        .expect(1)
        .mount(&server)
        .await;

    let client = SantanderClient::with_transport(config(&server.uri()), transport())
        .await
        .unwrap();
    let result = transfer_pix(
        &client,
        "12345678909",
        Decimal::new(10000, 2),
        "transfer description",
        &[],
    )
    .await;

    assert!(result.success, "{}", result.error);
    let data = result.data.unwrap();
    assert_eq!(data.status, Some(OrderStatus::Payed));
    assert_eq!(data.field("dictCodeType"), Some(&json!("CPF")));
}

#[tokio::test]
async fn test_workspace_resolved_over_http() {
    let server = setup_mock_server().await;
    authorized("GET", "/management_payments_partners/v1/workspaces")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_pageable": {"offset": 0, "limit": 10},
            "_content": [
                {"id": "ws-old", "type": "PAYMENTS", "status": "INACTIVE"},
                {"id": WORKSPACE_ID, "type": "PAYMENTS", "status": "ACTIVE", "description": "main"},
            ],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = SantanderConfig::builder()
        .client_id("test-client-id")
        .client_secret("test-client-secret")
        .cert_path("/tmp/santander-test.pem")
        .base_url(server.uri())
        .build()
        .unwrap();
    let client = SantanderClient::with_transport(config, transport())
        .await
        .unwrap();

    assert_eq!(client.workspace_id(), Some(WORKSPACE_ID));
}

#[tokio::test]
async fn test_confirmation_error_reconciled_over_http() {
    let server = setup_mock_server().await;
    let order_path = format!("{}/pix-2", PIX_PATH);

    authorized("POST", PIX_PATH)
        .respond_with(ResponseTemplate::new(201).set_body_json(pix_order("pix-2", "READY_TO_PAY")))
        .mount(&server)
        .await;
    authorized("PATCH", &order_path)
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "upstream"})))
        .expect(1)
        .mount(&server)
        .await;
    authorized("GET", &order_path)
        .respond_with(ResponseTemplate::new(200).set_body_json(pix_order("pix-2", "PAYED")))
        .expect(1)
        .mount(&server)
        .await;

    let client = SantanderClient::with_transport(config(&server.uri()), transport())
        .await
        .unwrap();
    let result = transfer_pix(&client, "12345678909", Decimal::ONE_HUNDRED, "", &[]).await;

    assert!(result.success, "{}", result.error);
    assert_eq!(result.data.unwrap().status, Some(OrderStatus::Payed));
}

#[tokio::test]
async fn test_error_body_surfaces_in_result() {
    let server = setup_mock_server().await;
    authorized("POST", PIX_PATH)
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "_errorCode": 400,
            "_message": "Bad Request",
            "_details": "dictCode invalid",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = SantanderClient::with_transport(config(&server.uri()), transport())
        .await
        .unwrap();
    let result = transfer_pix(&client, "12345678909", Decimal::ONE, "", &[]).await;

    assert!(!result.success);
    assert!(result.error.starts_with("Request failed: 400 - Invalid request"), "{}", result.error);
    assert!(result.error.contains("dictCode invalid"));
}

#[tokio::test]
async fn test_connection_failure_is_request_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = SantanderClient::with_transport(config(&uri), transport())
        .await
        .unwrap();
    let err = integrations_santander::HttpGateway::get(&client, "/anything")
        .await
        .unwrap_err();

    assert!(matches!(err, SantanderError::Request { status_code: 0, .. }));
    assert!(err.is_retryable());
}
