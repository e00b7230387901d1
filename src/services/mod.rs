//! Transfer Services
//!
//! Public payment operations. Transfers report every outcome through a
//! `TransferResult`; status reads return a plain `SantanderResult`.

pub mod barcode;
pub mod helpers;
pub mod pix;

pub use barcode::{
    get_barcode_status, pay_barcode, BarcodeType, BANKSLIP_ENDPOINT, BARCODE_ENDPOINT,
};
pub use helpers::{iso_date, payment_value, pix_key_type, truncate_value};
pub use pix::{get_transfer, transfer_pix, PIX_ENDPOINT};
