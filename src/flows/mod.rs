//! Payment Flows
//!
//! The create, ready, confirm and settle lifecycle shared by every
//! Santander payment type.

pub mod payment_flow;

pub use payment_flow::{FlowStep, PaymentFlow, PollOutcome, PollPolicy};
