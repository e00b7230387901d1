//! Payment Types
//!
//! Payment orders as reported by the bank, and the envelope returned by the
//! transfer operations.

use serde::{Deserialize, Serialize};

use crate::error::{SantanderError, SantanderResult};

/// Payment order status.
///
/// Values the bank reports that are not listed here are kept verbatim in
/// [`OrderStatus::Other`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    PendingValidation,
    ReadyToPay,
    PendingConfirmation,
    Payed,
    Rejected,
    Other(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::PendingValidation => "PENDING_VALIDATION",
            Self::ReadyToPay => "READY_TO_PAY",
            Self::PendingConfirmation => "PENDING_CONFIRMATION",
            Self::Payed => "PAYED",
            Self::Rejected => "REJECTED",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "PENDING_VALIDATION" => Self::PendingValidation,
            "READY_TO_PAY" => Self::ReadyToPay,
            "PENDING_CONFIRMATION" => Self::PendingConfirmation,
            "PAYED" => Self::Payed,
            "REJECTED" => Self::Rejected,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for OrderStatus {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a payment order (PIX, bank slip or barcode).
///
/// Fields the flow acts on are typed; everything else the bank sent is kept
/// in `extra` so the snapshot handed back to callers is complete.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOrder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remittance_information: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reject_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debit_account: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_payer: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PaymentOrder {
    /// Decode a response body once, at the boundary.
    pub fn from_value(value: serde_json::Value) -> SantanderResult<Self> {
        serde_json::from_value(value).map_err(|e| {
            SantanderError::client(format!("unexpected payment payload from the bank: {}", e))
        })
    }

    /// Order id, if the bank assigned a non-empty one.
    pub fn payment_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn has_status(&self, status: &OrderStatus) -> bool {
        self.status.as_ref() == Some(status)
    }

    pub fn status_label(&self) -> &str {
        self.status.as_ref().map(OrderStatus::as_str).unwrap_or("<none>")
    }

    /// Lookup among the fields without a typed counterpart.
    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.extra.get(name)
    }
}

/// Result envelope of every transfer operation. Never an error.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TransferResult {
    pub success: bool,
    pub request_id: String,
    pub data: Option<PaymentOrder>,
    pub error: String,
}

impl TransferResult {
    pub fn succeeded(request_id: impl Into<String>, order: PaymentOrder) -> Self {
        Self {
            success: true,
            request_id: request_id.into(),
            data: Some(order),
            error: String::new(),
        }
    }

    pub fn failed(request_id: impl Into<String>, error: &SantanderError) -> Self {
        Self {
            success: false,
            request_id: request_id.into(),
            data: None,
            error: error.to_string(),
        }
    }
}
