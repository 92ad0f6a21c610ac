//! Business rules checked when aggregates are built.

use crate::error::{DomainError, DomainResult};
use crate::user::User;

/// A named invariant over domain state.
pub trait BusinessRule {
    fn is_valid(&self) -> bool;

    /// Message reported when the rule is broken.
    fn message(&self) -> String;
}

/// Fail with [`DomainError::BusinessRule`] when `rule` is broken.
pub fn check_rule(rule: &dyn BusinessRule) -> DomainResult<()> {
    if rule.is_valid() {
        Ok(())
    } else {
        Err(DomainError::business_rule(rule.message()))
    }
}

/// The user's name has both given names and surnames.
pub struct ValidNames<'a>(pub &'a User);

impl BusinessRule for ValidNames<'_> {
    fn is_valid(&self) -> bool {
        self.0.name().is_complete()
    }

    fn message(&self) -> String {
        "El nombre debe incluir nombres y apellidos".to_string()
    }
}

/// The user owns at least one active payment method.
pub struct HasPaymentMethod<'a>(pub &'a User);

impl BusinessRule for HasPaymentMethod<'_> {
    fn is_valid(&self) -> bool {
        self.0.active_payment_methods().next().is_some()
    }

    fn message(&self) -> String {
        "El usuario debe tener al menos un método de pago válido".to_string()
    }
}
