//! User aggregate root and customer kinds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{KIND_BASE, KIND_COMPANY, KIND_NATURAL};
use crate::error::{DomainError, DomainResult};
use crate::payment_method::PaymentMethod;
use crate::time;
use crate::value_objects::{Email, FullName, NationalId, TaxId};

/// Type-specific data of a customer, selected by the `tipo_usuario`
/// discriminator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomerKind {
    /// Individual customer (cliente natural)
    Natural {
        national_id: Option<NationalId>,
        birth_date: Option<DateTime<Utc>>,
    },
    /// Corporate customer (cliente empresa)
    Company {
        tax_id: Option<TaxId>,
        incorporation_date: Option<DateTime<Utc>>,
    },
    /// Unrecognized discriminator; no type-specific fields
    Base,
}

impl CustomerKind {
    /// Wire discriminator of this kind.
    pub fn discriminator(&self) -> &'static str {
        match self {
            CustomerKind::Natural { .. } => KIND_NATURAL,
            CustomerKind::Company { .. } => KIND_COMPANY,
            CustomerKind::Base => KIND_BASE,
        }
    }

    pub fn is_natural(&self) -> bool {
        matches!(self, CustomerKind::Natural { .. })
    }
}

impl std::fmt::Display for CustomerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.discriminator())
    }
}

/// User aggregate root.
///
/// The identifier is assigned once, either at creation or when the
/// aggregate is rebuilt from storage, and has no setter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: Uuid,
    name: FullName,
    email: Email,
    pub kind: CustomerKind,
    payment_methods: Vec<PaymentMethod>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a fresh identity.
    pub fn new(
        name: FullName,
        email: Email,
        kind: CustomerKind,
        payment_methods: Vec<PaymentMethod>,
    ) -> Self {
        let now = time::now();
        Self::restore(Uuid::new_v4(), name, email, kind, payment_methods, now, now)
    }

    /// Rebuild a user from stored or transferred state.
    pub fn restore(
        id: Uuid,
        name: FullName,
        email: Email,
        kind: CustomerKind,
        payment_methods: Vec<PaymentMethod>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            kind,
            payment_methods,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &FullName {
        &self.name
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn payment_methods(&self) -> &[PaymentMethod] {
        &self.payment_methods
    }

    /// Payment methods that have not been deactivated.
    pub fn active_payment_methods(&self) -> impl Iterator<Item = &PaymentMethod> {
        self.payment_methods.iter().filter(|m| m.is_active())
    }

    pub fn rename(&mut self, name: FullName) {
        self.name = name;
        self.touch();
    }

    pub fn change_email(&mut self, email: Email) {
        self.email = email;
        self.touch();
    }

    /// Replace the whole list of owned payment methods.
    pub fn replace_payment_methods(&mut self, methods: Vec<PaymentMethod>) {
        self.payment_methods = methods;
        self.touch();
    }

    pub fn add_payment_method(&mut self, method: PaymentMethod) {
        self.payment_methods.push(method);
        self.touch();
    }

    /// Mutable access to one owned payment method.
    pub fn payment_method_mut(&mut self, method_id: Uuid) -> DomainResult<&mut PaymentMethod> {
        self.payment_methods
            .iter_mut()
            .find(|m| m.id() == method_id)
            .ok_or_else(|| DomainError::not_found(format!("Payment method {}", method_id)))
    }

    /// Mark the aggregate as modified now.
    pub fn touch(&mut self) {
        self.updated_at = time::now();
    }
}
