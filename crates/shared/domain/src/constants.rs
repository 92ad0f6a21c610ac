//! Domain-level constants.
//!
//! These constants define business rules and wire-level identifiers.

// =============================================================================
// Customer Kinds
// =============================================================================

/// Discriminator for individual customers (cliente natural)
pub const KIND_NATURAL: &str = "natural";

/// Discriminator for corporate customers (cliente empresa)
pub const KIND_COMPANY: &str = "empresa";

/// Discriminator for users without type-specific data
pub const KIND_BASE: &str = "base";

/// Discriminator assumed when an external payload omits `tipo_usuario`
pub const DEFAULT_KIND: &str = KIND_NATURAL;

// =============================================================================
// Payment Methods
// =============================================================================

/// Credit card payment type
pub const PAYMENT_CREDIT_CARD: &str = "tarjeta_credito";

/// Debit card payment type
pub const PAYMENT_DEBIT_CARD: &str = "tarjeta_debito";

/// Bank transfer payment type
pub const PAYMENT_BANK_TRANSFER: &str = "transferencia_bancaria";

/// Number of card digits kept in obfuscated display data
pub const OBFUSCATED_DIGITS: usize = 4;

/// Separator between brand and digits in obfuscated display data
pub const OBFUSCATED_MASK: &str = " ****";

// =============================================================================
// Timestamps
// =============================================================================

/// Fixed UTC pattern used for every serialized timestamp
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

// =============================================================================
// Email
// =============================================================================

/// Free mail providers; addresses on any other domain count as corporate
pub const FREE_EMAIL_DOMAINS: &[&str] = &[
    "gmail.com",
    "hotmail.com",
    "outlook.com",
    "yahoo.com",
    "icloud.com",
    "live.com",
];
