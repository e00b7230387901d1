//! Santander Types
//!
//! Configuration, token, workspace and payment data structures.

pub mod beneficiary;
pub mod config;
pub mod payment;
pub mod token;
pub mod workspace;

pub use beneficiary::*;
pub use config::*;
pub use payment::*;
pub use token::*;
pub use workspace::*;
