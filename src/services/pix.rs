//! PIX Transfers
//!
//! Transfers to a PIX key or to an explicit bank account.

use rust_decimal::Decimal;
use serde_json::{json, Value};
use tracing::{info_span, Instrument};

use crate::client::SantanderClient;
use crate::error::{SantanderError, SantanderResult};
use crate::flows::payment_flow::authorize_body;
use crate::flows::PaymentFlow;
use crate::services::helpers::{payment_value, pix_key_type};
use crate::types::{PaymentOrder, PixTarget, TransferResult};

/// PIX payments collection.
pub const PIX_ENDPOINT: &str =
    "/management_payments_partners/v1/workspaces/:workspaceid/pix_payments";

/// Transfer `value` to a PIX key or a beneficiary account.
///
/// Never fails: every error, from validation to a rejection by the bank,
/// comes back as `success == false` with its message in `error`.
pub async fn transfer_pix(
    client: &SantanderClient,
    target: impl Into<PixTarget>,
    value: Decimal,
    description: &str,
    tags: &[String],
) -> TransferResult {
    let flow = PaymentFlow::new(client, PIX_ENDPOINT, client.poll_policy());
    let request_id = flow.request_id().to_string();
    let target = target.into();
    let span = info_span!("transfer_pix", request_id = %request_id);

    let outcome = async {
        let payment_value = payment_value(value)?;
        let body = create_body(&target, &payment_value, description, tags)?;
        flow.execute(&body, |_| Ok(authorize_body(&payment_value)))
            .await
    }
    .instrument(span)
    .await;

    match outcome {
        Ok(order) => TransferResult::succeeded(request_id, order),
        Err(error) => {
            tracing::error!(
                request_id = %request_id,
                error_code = error.error_code(),
                error = %error,
                "PIX transfer failed"
            );
            TransferResult::failed(request_id, &error)
        }
    }
}

/// Current state of a PIX transfer.
pub async fn get_transfer(
    client: &SantanderClient,
    payment_id: &str,
) -> SantanderResult<PaymentOrder> {
    if payment_id.trim().is_empty() {
        return Err(SantanderError::validation("payment id not provided"));
    }
    PaymentFlow::new(client, PIX_ENDPOINT, client.poll_policy())
        .fetch_order(payment_id)
        .await
}

/// Creation body for a PIX order.
pub fn create_body(
    target: &PixTarget,
    payment_value: &str,
    description: &str,
    tags: &[String],
) -> SantanderResult<Value> {
    let mut body = json!({
        "tags": tags,
        "paymentValue": payment_value,
        "remittanceInformation": description,
    });

    match target {
        PixTarget::Key(key) => {
            let key = key.trim();
            let key_type = pix_key_type(key)?;
            body["dictCode"] = json!(key);
            body["dictCodeType"] = json!(key_type.as_str());
        }
        PixTarget::Beneficiary(beneficiary) => {
            let payload = serde_json::to_value(beneficiary.to_payload()?).map_err(|e| {
                SantanderError::client(format!("failed to encode beneficiary: {}", e))
            })?;
            body["beneficiary"] = payload;
        }
    }

    Ok(body)
}
