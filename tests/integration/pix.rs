//! PIX transfers over the in-memory transport

use super::*;
use integrations_santander::core::HttpMethod;
use integrations_santander::{
    get_transfer, transfer_pix, AccountType, Beneficiary, OrderStatus, SantanderError,
};
use rust_decimal::Decimal;
use serde_json::json;
use std::str::FromStr;

fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

#[tokio::test]
async fn test_transfer_pix_end_to_end() {
    let (client, transport) = mock_client().await;
    transport
        .queue_json_response(201, &pix_order("pix-1", "READY_TO_PAY"))
        .queue_json_response(200, &pix_order("pix-1", "PENDING_CONFIRMATION"))
        .queue_json_response(200, &pix_order("pix-1", "PAYED"));

    let result = transfer_pix(
        &client,
        "12345678909",
        dec("100.00"),
        "transfer description",
        &[],
    )
    .await;

    assert!(result.success, "{}", result.error);
    assert_eq!(result.error, "");
    let data = result.data.unwrap();
    assert_eq!(data.status, Some(OrderStatus::Payed));
    assert_eq!(data.payment_id(), Some("pix-1"));
    assert_eq!(result.request_id.len(), 36);

    assert_eq!(pix_calls(&transport, HttpMethod::Post), 1);
    assert_eq!(pix_calls(&transport, HttpMethod::Patch), 1);
    assert_eq!(pix_calls(&transport, HttpMethod::Get), 1);

    let requests = transport.get_requests();
    let create = &requests[1];
    assert_eq!(
        create.json_body().unwrap(),
        json!({
            "tags": [],
            "paymentValue": "100.00",
            "remittanceInformation": "transfer description",
            "dictCode": "12345678909",
            "dictCodeType": "CPF",
        })
    );
    let confirm = &requests[2];
    assert!(confirm.url.ends_with("/pix_payments/pix-1"));
    assert_eq!(
        confirm.json_body().unwrap(),
        json!({"status": "AUTHORIZED", "paymentValue": "100.00"})
    );
}

#[tokio::test]
async fn test_value_is_truncated_not_rounded() {
    let (client, transport) = mock_client().await;
    transport
        .queue_json_response(201, &pix_order("pix-2", "READY_TO_PAY"))
        .queue_json_response(200, &pix_order("pix-2", "PAYED"));

    let result = transfer_pix(&client, "+5511912345678", dec("123.456"), "", &[]).await;
    assert!(result.success, "{}", result.error);

    let requests = transport.get_requests();
    assert_eq!(requests[1].json_body().unwrap()["paymentValue"], "123.45");
    assert_eq!(requests[1].json_body().unwrap()["dictCodeType"], "CELULAR");
    assert_eq!(requests[2].json_body().unwrap()["paymentValue"], "123.45");
}

#[tokio::test]
async fn test_pix_key_is_sent_trimmed() {
    let (client, transport) = mock_client().await;
    transport
        .queue_json_response(201, &pix_order("pix-9", "READY_TO_PAY"))
        .queue_json_response(200, &pix_order("pix-9", "PAYED"));

    let result = transfer_pix(&client, " 12345678909 ", dec("1"), "", &[]).await;
    assert!(result.success, "{}", result.error);

    let body = transport.get_requests()[1].json_body().unwrap();
    assert_eq!(body["dictCode"], "12345678909");
    assert_eq!(body["dictCodeType"], "CPF");
}

#[tokio::test]
async fn test_unrepresentable_token_lifetime_becomes_result() {
    let transport = Arc::new(MockHttpTransport::new());
    let client = SantanderClient::with_transport(
        config("https://santander.test"),
        transport.clone(),
    )
    .await
    .unwrap();
    transport.queue_json_response(
        200,
        &json!({"access_token": "t", "expires_in": 100_000_000_000_000_000u64}),
    );

    let result = transfer_pix(&client, "12345678909", dec("10"), "", &[]).await;

    assert!(!result.success);
    assert!(result.data.is_none());
    assert!(result.error.contains("expires_in"), "{}", result.error);
    assert_eq!(pix_calls(&transport, HttpMethod::Post), 0);
}

#[tokio::test]
async fn test_non_positive_values_never_reach_the_network() {
    let (client, transport) = mock_client().await;

    for value in ["0", "-0.01", "-100"] {
        let result = transfer_pix(&client, "12345678909", dec(value), "", &[]).await;
        assert!(!result.success);
        assert!(result.data.is_none());
        assert!(result.error.starts_with("Invalid data"), "{}", result.error);
    }
    assert!(transport.get_requests().is_empty());
}

#[tokio::test]
async fn test_rejected_on_creation() {
    let (client, transport) = mock_client().await;
    transport.queue_json_response(
        201,
        &json!({"id": "pix-3", "status": "REJECTED", "rejectReason": "Saldo insuficiente"}),
    );

    let result = transfer_pix(&client, "12345678909", dec("10"), "", &[]).await;

    assert!(!result.success);
    assert!(result.data.is_none());
    assert!(result.error.contains("step create"), "{}", result.error);
    assert!(result.error.contains("reason: Saldo insuficiente"));
    assert_eq!(pix_calls(&transport, HttpMethod::Patch), 0);
    assert_eq!(pix_calls(&transport, HttpMethod::Get), 0);
}

#[tokio::test(start_paused = true)]
async fn test_ready_polling_stops_at_ready() {
    let (client, transport) = mock_client().await;
    transport
        .queue_json_response(201, &pix_order("pix-4", "PENDING_VALIDATION"))
        .queue_json_response(200, &pix_order("pix-4", "PENDING_VALIDATION"))
        .queue_json_response(200, &pix_order("pix-4", "PENDING_VALIDATION"))
        .queue_json_response(200, &pix_order("pix-4", "READY_TO_PAY"))
        .queue_json_response(200, &pix_order("pix-4", "PAYED"));

    let result = transfer_pix(&client, "12345678909", dec("100"), "", &[]).await;

    assert!(result.success, "{}", result.error);
    assert_eq!(pix_calls(&transport, HttpMethod::Get), 3);
    assert_eq!(pix_calls(&transport, HttpMethod::Patch), 1);
    assert_eq!(transport.pending_replies(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_ready_polling_timeout_fails_transfer() {
    let (client, transport) = mock_client().await;
    transport.queue_json_response(201, &pix_order("pix-5", "PENDING_VALIDATION"));
    for _ in 0..10 {
        transport.queue_json_response(200, &pix_order("pix-5", "PENDING_VALIDATION"));
    }

    let result = transfer_pix(&client, "12345678909", dec("100"), "", &[]).await;

    assert!(!result.success);
    assert!(result.error.contains("CREATE"), "{}", result.error);
    assert_eq!(pix_calls(&transport, HttpMethod::Get), 10);
    assert_eq!(pix_calls(&transport, HttpMethod::Patch), 0);
}

#[tokio::test(start_paused = true)]
async fn test_settlement_timeout_returns_pending_snapshot() {
    let (client, transport) = mock_client().await;
    transport
        .queue_json_response(201, &pix_order("pix-6", "READY_TO_PAY"))
        .queue_json_response(200, &pix_order("pix-6", "PENDING_CONFIRMATION"));
    for _ in 0..120 {
        transport.queue_json_response(200, &pix_order("pix-6", "PENDING_CONFIRMATION"));
    }

    let result = transfer_pix(&client, "12345678909", dec("100"), "", &[]).await;

    assert!(result.success, "{}", result.error);
    assert_eq!(
        result.data.unwrap().status,
        Some(OrderStatus::PendingConfirmation)
    );
    assert_eq!(pix_calls(&transport, HttpMethod::Get), 120);
}

#[tokio::test]
async fn test_beneficiary_without_routing_code_fails_before_request() {
    let (client, transport) = mock_client().await;
    let beneficiary = Beneficiary {
        name: "John Doe".to_string(),
        document_number: "12345678909".to_string(),
        document_type: None,
        branch: "2424".to_string(),
        number: "123456789".to_string(),
        account_type: AccountType::ContaCorrente,
        bank_code: None,
        ispb: None,
    };

    let result = transfer_pix(&client, beneficiary, dec("10"), "", &[]).await;

    assert!(!result.success);
    assert!(result.error.contains("bank_code or ispb"));
    assert!(transport.get_requests().is_empty());
}

#[tokio::test]
async fn test_beneficiary_with_both_codes_drops_ispb() {
    let (client, transport) = mock_client().await;
    transport
        .queue_json_response(201, &pix_order("pix-7", "READY_TO_PAY"))
        .queue_json_response(200, &pix_order("pix-7", "PAYED"));
    let beneficiary = Beneficiary {
        name: "John Doe".to_string(),
        document_number: "12345678909".to_string(),
        document_type: None,
        branch: "2424".to_string(),
        number: "123456789".to_string(),
        account_type: AccountType::ContaCorrente,
        bank_code: Some("404".to_string()),
        ispb: Some("12345678".to_string()),
    };

    let result = transfer_pix(&client, beneficiary, dec("10"), "", &["rent".to_string()]).await;
    assert!(result.success, "{}", result.error);

    let body = transport.get_requests()[1].json_body().unwrap();
    assert_eq!(body["beneficiary"]["bankCode"], "404");
    assert!(body["beneficiary"].get("ispb").is_none());
    assert_eq!(body["tags"], json!(["rent"]));
}

#[tokio::test]
async fn test_token_failure_becomes_result() {
    let transport = Arc::new(MockHttpTransport::new());
    let client = SantanderClient::with_transport(
        config("https://santander.test"),
        transport.clone(),
    )
    .await
    .unwrap();
    transport.queue_json_response(401, &json!({"error": "invalid_client"}));

    let result = transfer_pix(&client, "12345678909", dec("10"), "", &[]).await;

    assert!(!result.success);
    assert!(result.error.contains("401"), "{}", result.error);
    assert!(result.error.contains("invalid_client"));
}

#[tokio::test]
async fn test_get_transfer() {
    let (client, transport) = mock_client().await;
    transport.queue_json_response(200, &pix_order("pix-8", "REJECTED"));

    let order = get_transfer(&client, "pix-8").await.unwrap();
    assert_eq!(order.status, Some(OrderStatus::Rejected));
    assert!(transport
        .get_last_request()
        .unwrap()
        .url
        .ends_with("/pix_payments/pix-8"));

    assert!(matches!(
        get_transfer(&client, "").await,
        Err(SantanderError::Validation { .. })
    ));
}
