//! Payee Types
//!
//! Who a PIX transfer goes to: a registered PIX key, or explicit bank
//! account routing details.

use serde::{Deserialize, Serialize};

use crate::error::{SantanderError, SantanderResult};

/// Destination of a PIX transfer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PixTarget {
    /// CPF, CNPJ, phone (`+5511912345678`), email or random (EVP) key.
    Key(String),
    /// Explicit bank account.
    Beneficiary(Beneficiary),
}

impl From<&str> for PixTarget {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PixTarget {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<Beneficiary> for PixTarget {
    fn from(beneficiary: Beneficiary) -> Self {
        Self::Beneficiary(beneficiary)
    }
}

/// PIX key type as the DICT understands it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PixKeyType {
    Cpf,
    Cnpj,
    Celular,
    Email,
    Evp,
}

impl PixKeyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cpf => "CPF",
            Self::Cnpj => "CNPJ",
            Self::Celular => "CELULAR",
            Self::Email => "EMAIL",
            Self::Evp => "EVP",
        }
    }
}

/// Bank account type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    ContaCorrente,
    ContaPoupanca,
    ContaPagamento,
}

/// Holder document type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentType {
    Cpf,
    Cnpj,
}

impl DocumentType {
    /// Infer from the digits of a document number: 11 is a CPF, 14 a CNPJ.
    pub fn infer(document_number: &str) -> SantanderResult<Self> {
        let digits = document_number.chars().filter(|c| c.is_ascii_digit()).count();
        let only_digits_and_marks = document_number
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '/'));

        match (only_digits_and_marks, digits) {
            (true, 11) => Ok(Self::Cpf),
            (true, 14) => Ok(Self::Cnpj),
            _ => Err(SantanderError::validation(format!(
                "invalid document number: {}",
                document_number
            ))),
        }
    }
}

/// Explicit bank account of the payee.
///
/// Exactly one of `bank_code` (compensation code) and `ispb` reaches the
/// wire; see [`Beneficiary::to_payload`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Beneficiary {
    pub name: String,
    pub document_number: String,
    /// Inferred from `document_number` when absent.
    pub document_type: Option<DocumentType>,
    pub branch: String,
    /// Account number including the check digit.
    pub number: String,
    pub account_type: AccountType,
    pub bank_code: Option<String>,
    pub ispb: Option<String>,
}

/// Wire representation of a beneficiary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeneficiaryPayload {
    pub name: String,
    pub document_type: DocumentType,
    pub document_number: String,
    pub branch: String,
    pub number: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ispb: Option<String>,
}

impl Beneficiary {
    /// Validate and shape for transmission. The compensation code wins when
    /// both routing codes are set; neither set is a validation error.
    pub fn to_payload(&self) -> SantanderResult<BeneficiaryPayload> {
        let required = [
            ("name", &self.name),
            ("document_number", &self.document_number),
            ("branch", &self.branch),
            ("number", &self.number),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(SantanderError::validation(format!(
                    "beneficiary field is required: {}",
                    field
                )));
            }
        }

        let non_empty = |v: &Option<String>| v.as_ref().filter(|s| !s.trim().is_empty()).cloned();
        let (bank_code, ispb) = match (non_empty(&self.bank_code), non_empty(&self.ispb)) {
            (Some(code), _) => (Some(code), None),
            (None, Some(ispb)) => (None, Some(ispb)),
            (None, None) => {
                return Err(SantanderError::validation(
                    "beneficiary requires either bank_code or ispb",
                ))
            }
        };

        let document_type = match self.document_type {
            Some(document_type) => document_type,
            None => DocumentType::infer(&self.document_number)?,
        };

        Ok(BeneficiaryPayload {
            name: self.name.clone(),
            document_type,
            document_number: self.document_number.clone(),
            branch: self.branch.clone(),
            number: self.number.clone(),
            account_type: self.account_type,
            bank_code,
            ispb,
        })
    }
}
