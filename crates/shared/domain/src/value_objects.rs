//! Value objects of the customer domain.
//!
//! Immutable, compared by value, no identity. Each one owns its parsing and
//! its wire representation.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::{
    FREE_EMAIL_DOMAINS, OBFUSCATED_DIGITS, OBFUSCATED_MASK, PAYMENT_BANK_TRANSFER,
    PAYMENT_CREDIT_CARD, PAYMENT_DEBIT_CARD,
};
use crate::error::{DomainError, DomainResult};

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@(?:[^@\s.]+\.)+[^@\s.]+$").expect("email pattern compiles")
});

// ── FullName ────────────────────────────────────────────────────────────────

/// Customer name split into given names and surnames.
///
/// Only built through [`FullName::parse`], so the split is always the one the
/// display form re-parses to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct FullName {
    given_names: String,
    surnames: String,
}

impl FullName {
    fn new(given_names: impl Into<String>, surnames: impl Into<String>) -> Self {
        Self {
            given_names: given_names.into().trim().to_string(),
            surnames: surnames.into().trim().to_string(),
        }
    }

    /// Split a display name at its first run of whitespace.
    ///
    /// Never fails: a single word yields empty surnames, which the
    /// `ValidNames` rule rejects.
    pub fn parse(display: &str) -> Self {
        let trimmed = display.trim();
        match trimmed.split_once(char::is_whitespace) {
            Some((given, rest)) => Self::new(given, rest),
            None => Self::new(trimmed, ""),
        }
    }

    pub fn given_names(&self) -> &str {
        &self.given_names
    }

    pub fn surnames(&self) -> &str {
        &self.surnames
    }

    /// Both parts present.
    pub fn is_complete(&self) -> bool {
        !self.given_names.is_empty() && !self.surnames.is_empty()
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.given_names.is_empty(), self.surnames.is_empty()) {
            (false, false) => write!(f, "{} {}", self.given_names, self.surnames),
            (false, true) => f.write_str(&self.given_names),
            (true, _) => f.write_str(&self.surnames),
        }
    }
}

impl From<String> for FullName {
    fn from(display: String) -> Self {
        Self::parse(&display)
    }
}

impl From<FullName> for String {
    fn from(name: FullName) -> Self {
        name.to_string()
    }
}

// ── Email ───────────────────────────────────────────────────────────────────

/// Validated email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    address: String,
    domain: String,
    is_corporate: bool,
}

impl Email {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let address = raw.trim().to_lowercase();
        if !EMAIL_PATTERN.is_match(&address) {
            return Err(DomainError::validation("El email no tiene un formato válido"));
        }

        let domain = address
            .rsplit_once('@')
            .map(|(_, domain)| domain.to_string())
            .unwrap_or_default();
        let is_corporate = !FREE_EMAIL_DOMAINS.contains(&domain.as_str());

        Ok(Self {
            address,
            domain,
            is_corporate,
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Address is not on a free mail provider.
    pub fn is_corporate(&self) -> bool {
        self.is_corporate
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)
    }
}

// ── Identity documents ──────────────────────────────────────────────────────

/// National identity number of an individual (cédula).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NationalId(String);

impl NationalId {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        non_empty(raw, "cedula").map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Tax identifier of a company (RUT).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxId(String);

impl TaxId {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        non_empty(raw, "rut").map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ── PaymentType ─────────────────────────────────────────────────────────────

/// Kind of payment instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentType {
    #[serde(rename = "tarjeta_credito")]
    CreditCard,
    #[serde(rename = "tarjeta_debito")]
    DebitCard,
    #[serde(rename = "transferencia_bancaria")]
    BankTransfer,
}

impl PaymentType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreditCard => PAYMENT_CREDIT_CARD,
            Self::DebitCard => PAYMENT_DEBIT_CARD,
            Self::BankTransfer => PAYMENT_BANK_TRANSFER,
        }
    }

    /// Card-based instruments carry brand and last digits.
    pub const fn is_card(&self) -> bool {
        matches!(self, Self::CreditCard | Self::DebitCard)
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            PAYMENT_CREDIT_CARD => Ok(Self::CreditCard),
            PAYMENT_DEBIT_CARD => Ok(Self::DebitCard),
            PAYMENT_BANK_TRANSFER => Ok(Self::BankTransfer),
            other => Err(DomainError::validation(format!(
                "Unknown payment type '{}'. Must be one of: {}, {}, {}",
                other, PAYMENT_CREDIT_CARD, PAYMENT_DEBIT_CARD, PAYMENT_BANK_TRANSFER
            ))),
        }
    }
}

// ── SecurityToken ───────────────────────────────────────────────────────────

/// Persistent token used to recover the real payment data from the vault.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityToken(String);

impl SecurityToken {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        non_empty(raw, "token_seguridad").map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens must not leak into logs.
impl fmt::Debug for SecurityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SecurityToken").field(&"[REDACTED]").finish()
    }
}

// ── ObfuscatedData ──────────────────────────────────────────────────────────

/// Displayable remainder of a card: brand plus its last four digits.
///
/// Wire form is `"<brand> ****<last4>"`, e.g. `"Visa ****4242"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObfuscatedData {
    last_digits: String,
    brand: String,
}

impl ObfuscatedData {
    pub fn new(last_digits: &str, brand: &str) -> DomainResult<Self> {
        let last_digits = last_digits.trim();
        if last_digits.len() != OBFUSCATED_DIGITS
            || !last_digits.chars().all(|c| c.is_ascii_digit())
        {
            return Err(DomainError::validation(format!(
                "datos_ofuscados must keep exactly {} digits",
                OBFUSCATED_DIGITS
            )));
        }
        let brand = non_empty(brand, "marca")?;

        Ok(Self {
            last_digits: last_digits.to_string(),
            brand,
        })
    }

    /// Parse the wire form.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let (brand, digits) = raw.trim().rsplit_once(OBFUSCATED_MASK).ok_or_else(|| {
            DomainError::validation(format!(
                "datos_ofuscados must look like '<marca>{}<ultimos {} digitos>'",
                OBFUSCATED_MASK, OBFUSCATED_DIGITS
            ))
        })?;
        Self::new(digits, brand)
    }

    pub fn last_digits(&self) -> &str {
        &self.last_digits
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }
}

impl fmt::Display for ObfuscatedData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.brand, OBFUSCATED_MASK, self.last_digits)
    }
}

fn non_empty(raw: &str, field: &str) -> DomainResult<String> {
    let value = raw.trim();
    if value.is_empty() {
        Err(DomainError::validation(format!("{} is required", field)))
    } else {
        Ok(value.to_string())
    }
}
