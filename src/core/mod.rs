//! Santander Core Components
//!
//! HTTP transport and time source.

pub mod clock;
pub mod transport;

pub use clock::*;
pub use transport::*;
