//! Payment Helpers
//!
//! Money formatting and PIX key classification.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{SantanderError, SantanderResult};
use crate::types::PixKeyType;

/// Render a value with exactly two decimals, truncating toward zero.
///
/// `123.456` becomes `"123.45"` and `123.4` becomes `"123.40"`.
pub fn truncate_value(value: Decimal) -> String {
    let mut truncated = value.round_dp_with_strategy(2, RoundingStrategy::ToZero);
    truncated.rescale(2);
    truncated.to_string()
}

/// Check a payment amount and return its wire form.
pub fn payment_value(value: Decimal) -> SantanderResult<String> {
    if value <= Decimal::ZERO {
        return Err(SantanderError::validation(format!(
            "invalid payment value: {}",
            value
        )));
    }

    let rendered = truncate_value(value);
    if rendered == "0.00" {
        return Err(SantanderError::validation(format!(
            "payment value below one cent: {}",
            value
        )));
    }
    Ok(rendered)
}

/// ISO date (`YYYY-MM-DD`).
pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Classify a PIX key by its lexical form.
pub fn pix_key_type(key: &str) -> SantanderResult<PixKeyType> {
    let key = key.trim();
    let invalid = || SantanderError::validation(format!("invalid PIX key: {}", key));

    if let Some(number) = key.strip_prefix('+') {
        return if number.len() == 13 && number.chars().all(|c| c.is_ascii_digit()) {
            Ok(PixKeyType::Celular)
        } else {
            Err(invalid())
        };
    }

    if key.contains('@') {
        return if is_email(key) {
            Ok(PixKeyType::Email)
        } else {
            Err(invalid())
        };
    }

    if key
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '/'))
    {
        match key.chars().filter(|c| c.is_ascii_digit()).count() {
            11 => return Ok(PixKeyType::Cpf),
            14 => return Ok(PixKeyType::Cnpj),
            _ => {}
        }
    }

    if is_random_key(key) {
        return Ok(PixKeyType::Evp);
    }

    Err(invalid())
}

fn is_email(key: &str) -> bool {
    let Some((local, domain)) = key.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !key.chars().any(char::is_whitespace)
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

fn is_random_key(key: &str) -> bool {
    match key.len() {
        32 => key.chars().all(|c| c.is_ascii_alphanumeric()),
        36 => uuid::Uuid::try_parse(key).is_ok(),
        _ => false,
    }
}
