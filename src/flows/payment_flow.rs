//! Payment Flow
//!
//! Drives one payment order through its lifecycle:
//!
//! ```text
//! create ──▶ (poll until READY_TO_PAY) ──▶ confirm ──▶ (poll until PAYED)
//! ```
//!
//! A `REJECTED` status seen at any point stops the flow. Running out of
//! attempts before confirmation fails the payment; running out after the
//! bank accepted the confirmation returns the last pending snapshot, since
//! reporting a failure there invites a duplicate payment.

use serde_json::{json, Value};
use std::time::Duration;
use uuid::Uuid;

use crate::client::HttpGateway;
use crate::error::{SantanderError, SantanderResult, REJECT_REASON_NOT_RETURNED};
use crate::resilience::{RetryExecutor, SantanderRetryExecutor};
use crate::types::{OrderStatus, PaymentOrder};

/// Phase of the lifecycle, used in rejection and timeout errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowStep {
    Create,
    Confirm,
}

impl FlowStep {
    /// Upper-case phase label.
    pub fn as_phase(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Confirm => "CONFIRM",
        }
    }
}

impl std::fmt::Display for FlowStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::Confirm => "confirm",
        })
    }
}

/// Bounds of the two polling phases.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollPolicy {
    /// Status reads while waiting for `READY_TO_PAY`.
    pub ready_attempts: u32,
    /// Status reads while waiting for `PAYED`.
    pub settle_attempts: u32,
    /// Pause between two reads.
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            ready_attempts: 10,
            settle_attempts: 120,
            interval: Duration::from_secs(2),
        }
    }
}

impl PollPolicy {
    pub fn validate(&self) -> SantanderResult<()> {
        if self.ready_attempts == 0 || self.settle_attempts == 0 {
            return Err(SantanderError::configuration(
                "poll attempts must be at least 1",
            ));
        }
        if self.interval.is_zero() {
            return Err(SantanderError::configuration(
                "poll interval must be positive",
            ));
        }
        Ok(())
    }
}

/// Result of a bounded status poll.
#[derive(Clone, Debug, PartialEq)]
pub enum PollOutcome {
    /// The order reached the awaited status.
    Reached(PaymentOrder),
    /// Attempts ran out; `last` is the most recent snapshot.
    TimedOut {
        last: PaymentOrder,
        phase: FlowStep,
        attempts: u32,
    },
}

/// One payment order against one payment endpoint.
pub struct PaymentFlow<'a> {
    gateway: &'a dyn HttpGateway,
    endpoint: String,
    policy: PollPolicy,
    retry: SantanderRetryExecutor,
    request_id: String,
}

impl<'a> PaymentFlow<'a> {
    /// Flow for a collection endpoint such as
    /// `/management_payments_partners/v1/workspaces/:workspaceid/pix_payments`.
    pub fn new(
        gateway: &'a dyn HttpGateway,
        endpoint: impl Into<String>,
        policy: PollPolicy,
    ) -> Self {
        Self {
            gateway,
            endpoint: endpoint.into(),
            policy,
            retry: SantanderRetryExecutor::default(),
            request_id: Uuid::new_v4().to_string(),
        }
    }

    /// Correlation id of this payment, for logs and the result envelope.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Create, wait until payable, confirm, wait for settlement.
    ///
    /// `confirm_body` builds the authorization body from the order as
    /// created.
    pub async fn execute<F>(
        &self,
        create_body: &Value,
        confirm_body: F,
    ) -> SantanderResult<PaymentOrder>
    where
        F: FnOnce(&PaymentOrder) -> SantanderResult<Value>,
    {
        let created = self.create_payment(create_body).await?;
        let payment_id = created
            .payment_id()
            .map(str::to_string)
            .ok_or_else(|| SantanderError::client("payment id not returned"))?;

        self.ensure_ready_to_pay(created.clone()).await?;

        let body = confirm_body(&created)?;
        self.confirm_payment(&body, &payment_id).await
    }

    /// POST a new order. The bank must answer with an id and a status.
    pub async fn create_payment(&self, body: &Value) -> SantanderResult<PaymentOrder> {
        let response = self.gateway.post(&self.endpoint, body).await?;
        let order = PaymentOrder::from_value(response)?;

        self.check_rejected(&order, FlowStep::Create)?;

        let payment_id = order.payment_id().ok_or_else(|| {
            SantanderError::client("payment id was not returned on creation")
        })?;
        if order.status.is_none() {
            return Err(SantanderError::client(
                "payment status was not returned on creation",
            ));
        }

        tracing::info!(payment_id, status = order.status_label(), "payment created");
        Ok(order)
    }

    /// Poll until the order is `READY_TO_PAY`. Running out of attempts is
    /// an error.
    pub async fn ensure_ready_to_pay(&self, order: PaymentOrder) -> SantanderResult<PaymentOrder> {
        if order.has_status(&OrderStatus::ReadyToPay) {
            return Ok(order);
        }

        tracing::debug!(
            payment_id = order.payment_id().unwrap_or_default(),
            status = order.status_label(),
            "payment not ready, polling"
        );

        match self
            .poll_until(order, OrderStatus::ReadyToPay, FlowStep::Create)
            .await?
        {
            PollOutcome::Reached(order) => Ok(order),
            PollOutcome::TimedOut {
                phase, attempts, ..
            } => Err(SantanderError::StatusTimeout { phase, attempts }),
        }
    }

    /// PATCH the authorization and follow it until settled.
    ///
    /// A failed PATCH is reconciled with one status read, since the bank
    /// may have accepted it anyway. Settlement that outlasts the attempts
    /// returns the last pending snapshot.
    pub async fn confirm_payment(
        &self,
        body: &Value,
        payment_id: &str,
    ) -> SantanderResult<PaymentOrder> {
        let endpoint = self.order_endpoint(payment_id);
        let order = match self.gateway.patch(&endpoint, body).await {
            Ok(response) => PaymentOrder::from_value(response)?,
            Err(error) if error.is_retryable() => {
                tracing::warn!(
                    payment_id,
                    error = %error,
                    "confirmation failed, reading current status"
                );
                self.read_status(payment_id, FlowStep::Confirm).await?
            }
            Err(error) => return Err(error),
        };

        self.check_rejected(&order, FlowStep::Confirm)?;

        match order.status.clone() {
            Some(OrderStatus::Payed) => {
                tracing::info!(payment_id, "payment settled");
                Ok(order)
            }
            Some(OrderStatus::PendingConfirmation) => {
                match self
                    .poll_until(order, OrderStatus::Payed, FlowStep::Confirm)
                    .await?
                {
                    PollOutcome::Reached(order) => {
                        tracing::info!(payment_id, "payment settled");
                        Ok(order)
                    }
                    PollOutcome::TimedOut { last, attempts, .. } => {
                        tracing::warn!(
                            payment_id,
                            attempts,
                            status = last.status_label(),
                            "settlement still pending, returning last known state"
                        );
                        Ok(last)
                    }
                }
            }
            _ => Err(SantanderError::client(format!(
                "unexpected status after confirmation: {}",
                order.status_label()
            ))),
        }
    }

    /// Current state of an order. Transport failures are retried once.
    pub async fn fetch_order(&self, payment_id: &str) -> SantanderResult<PaymentOrder> {
        let endpoint = self.order_endpoint(payment_id);
        let response = self.retry.execute(|| self.gateway.get(&endpoint)).await?;
        PaymentOrder::from_value(response)
    }

    /// Bounded poll starting right away; `seed` is the snapshot returned
    /// when no read happens to reach `target`.
    pub async fn poll_until(
        &self,
        seed: PaymentOrder,
        target: OrderStatus,
        phase: FlowStep,
    ) -> SantanderResult<PollOutcome> {
        let payment_id = seed
            .payment_id()
            .map(str::to_string)
            .ok_or_else(|| SantanderError::client("cannot poll an order without id"))?;
        let attempts = match phase {
            FlowStep::Create => self.policy.ready_attempts,
            FlowStep::Confirm => self.policy.settle_attempts,
        };

        let mut last = seed;
        for attempt in 1..=attempts {
            if attempt > 1 {
                tokio::time::sleep(self.policy.interval).await;
            }

            let order = self.read_status(&payment_id, phase).await?;
            tracing::debug!(
                payment_id = %payment_id,
                attempt,
                status = order.status_label(),
                phase = phase.as_phase(),
                "status polled"
            );

            if order.has_status(&target) {
                return Ok(PollOutcome::Reached(order));
            }
            last = order;
        }

        Ok(PollOutcome::TimedOut {
            last,
            phase,
            attempts,
        })
    }

    async fn read_status(&self, payment_id: &str, step: FlowStep) -> SantanderResult<PaymentOrder> {
        let order = self.fetch_order(payment_id).await?;
        self.check_rejected(&order, step)?;
        Ok(order)
    }

    fn check_rejected(&self, order: &PaymentOrder, step: FlowStep) -> SantanderResult<()> {
        if !order.has_status(&OrderStatus::Rejected) {
            return Ok(());
        }

        let reason = order
            .reject_reason
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .unwrap_or(REJECT_REASON_NOT_RETURNED)
            .to_string();
        tracing::error!(
            payment_id = order.payment_id().unwrap_or_default(),
            step = %step,
            reason = %reason,
            "payment rejected"
        );
        Err(SantanderError::Rejected { step, reason })
    }

    fn order_endpoint(&self, payment_id: &str) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), payment_id)
    }
}

/// Authorization body shared by every payment type.
pub(crate) fn authorize_body(payment_value: &str) -> Value {
    json!({
        "status": "AUTHORIZED",
        "paymentValue": payment_value,
    })
}
