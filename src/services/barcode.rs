//! Barcode Payments
//!
//! Bank slips (boletos) and utility/tax barcodes (arrecadação).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tracing::{info_span, Instrument};

use crate::client::SantanderClient;
use crate::error::{SantanderError, SantanderResult};
use crate::flows::payment_flow::authorize_body;
use crate::flows::PaymentFlow;
use crate::services::helpers::{iso_date, payment_value};
use crate::types::{PaymentOrder, TransferResult};

/// Bank slip payments collection.
pub const BANKSLIP_ENDPOINT: &str =
    "/management_payments_partners/v1/workspaces/:workspaceid/bank_slip_payments";

/// Utility/tax barcode payments collection.
pub const BARCODE_ENDPOINT: &str =
    "/management_payments_partners/v1/workspaces/:workspaceid/barcode_payments";

/// Kind of barcode being paid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BarcodeType {
    /// Boleto bancário.
    #[default]
    BankSlip,
    /// Boleto de arrecadação.
    Barcode,
}

impl BarcodeType {
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::BankSlip => BANKSLIP_ENDPOINT,
            Self::Barcode => BARCODE_ENDPOINT,
        }
    }
}

/// Pay a barcode. Never fails; see [`TransferResult`].
pub async fn pay_barcode(
    client: &SantanderClient,
    code: &str,
    value: Decimal,
    payment_date: NaiveDate,
    tags: &[String],
    barcode_type: BarcodeType,
) -> TransferResult {
    let flow = PaymentFlow::new(client, barcode_type.endpoint(), client.poll_policy());
    let request_id = flow.request_id().to_string();
    let span = info_span!("pay_barcode", request_id = %request_id, barcode_type = ?barcode_type);

    let outcome = async {
        let payment_value = payment_value(value)?;
        let code = code.trim();
        if code.is_empty() {
            return Err(SantanderError::validation("barcode not provided"));
        }

        let body = json!({
            "code": code,
            "tags": tags,
            "paymentDate": iso_date(payment_date),
        });
        flow.execute(&body, |created| Ok(confirm_body(created, &payment_value)))
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
                "barcode payment failed"
            );
            TransferResult::failed(request_id, &error)
        }
    }
}

/// Current state of a barcode payment.
pub async fn get_barcode_status(
    client: &SantanderClient,
    payment_id: &str,
    barcode_type: BarcodeType,
) -> SantanderResult<PaymentOrder> {
    if payment_id.trim().is_empty() {
        return Err(SantanderError::validation("payment id not provided"));
    }
    PaymentFlow::new(client, barcode_type.endpoint(), client.poll_policy())
        .fetch_order(payment_id)
        .await
}

/// Authorization body echoing the payer accounts the bank chose on creation.
fn confirm_body(created: &PaymentOrder, payment_value: &str) -> Value {
    let mut body = authorize_body(payment_value);
    body["debitAccount"] = created.debit_account.clone().unwrap_or(Value::Null);
    body["finalPayer"] = created.final_payer.clone().unwrap_or(Value::Null);
    body
}
