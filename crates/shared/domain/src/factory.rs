//! Factories that build aggregates and enforce their rules.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DomainResult;
use crate::payment_method::PaymentMethod;
use crate::rules::{check_rule, HasPaymentMethod, ValidNames};
use crate::time;
use crate::user::{CustomerKind, User};
use crate::value_objects::{Email, FullName, ObfuscatedData, PaymentType, SecurityToken};

/// Unvalidated user data. Absent ids and timestamps are assigned on build.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub kind: CustomerKind,
    pub payment_methods: Vec<PaymentMethod>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Unvalidated payment method data.
#[derive(Debug, Clone)]
pub struct NewPaymentMethod {
    pub id: Option<Uuid>,
    pub payment_type: String,
    pub name: String,
    pub security_token: String,
    /// Wire form `"<brand> ****<last4>"`; empty means absent
    pub obfuscated_data: String,
    pub active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Builds `User` aggregates.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserFactory {
    require_payment_method: bool,
}

impl UserFactory {
    pub fn new(require_payment_method: bool) -> Self {
        Self {
            require_payment_method,
        }
    }

    /// Build a user and check every business rule.
    pub fn create(&self, draft: NewUser) -> DomainResult<User> {
        let now = time::now();
        let user = User::restore(
            draft.id.unwrap_or_else(Uuid::new_v4),
            FullName::parse(&draft.name),
            Email::parse(&draft.email)?,
            draft.kind,
            draft.payment_methods,
            draft.created_at.unwrap_or(now),
            draft.updated_at.unwrap_or(now),
        );

        self.validate(&user)?;
        Ok(user)
    }

    /// Re-check rules on an existing aggregate after it was modified.
    pub fn validate(&self, user: &User) -> DomainResult<()> {
        check_rule(&ValidNames(user))?;
        if self.require_payment_method {
            check_rule(&HasPaymentMethod(user))?;
        }
        Ok(())
    }
}

/// Builds `PaymentMethod` entities.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaymentMethodFactory;

impl PaymentMethodFactory {
    pub fn create(&self, draft: NewPaymentMethod) -> DomainResult<PaymentMethod> {
        let payment_type: PaymentType = draft.payment_type.parse()?;
        let obfuscated_data = if draft.obfuscated_data.trim().is_empty() {
            None
        } else {
            Some(ObfuscatedData::parse(&draft.obfuscated_data)?)
        };
        let now = time::now();

        PaymentMethod::restore(
            draft.id.unwrap_or_else(Uuid::new_v4),
            payment_type,
            draft.name,
            SecurityToken::parse(&draft.security_token)?,
            obfuscated_data,
            draft.active,
            draft.created_at.unwrap_or(now),
            draft.updated_at.unwrap_or(now),
        )
    }
}
