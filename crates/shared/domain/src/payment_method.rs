//! Payment method entity.
//!
//! Payment methods live inside the `User` aggregate and are only reachable
//! through their owner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::time;
use crate::value_objects::{ObfuscatedData, PaymentType, SecurityToken};

/// Payment method owned by a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    id: Uuid,
    pub payment_type: PaymentType,
    name: String,
    pub security_token: SecurityToken,
    pub obfuscated_data: Option<ObfuscatedData>,
    active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PaymentMethod {
    /// Create a new, active payment method with a fresh identity.
    pub fn new(
        payment_type: PaymentType,
        name: impl Into<String>,
        security_token: SecurityToken,
        obfuscated_data: Option<ObfuscatedData>,
    ) -> DomainResult<Self> {
        let now = time::now();
        Self::restore(
            Uuid::new_v4(),
            payment_type,
            name,
            security_token,
            obfuscated_data,
            true,
            now,
            now,
        )
    }

    /// Rebuild a payment method from stored or transferred state.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: Uuid,
        payment_type: PaymentType,
        name: impl Into<String>,
        security_token: SecurityToken,
        obfuscated_data: Option<ObfuscatedData>,
        active: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        Ok(Self {
            id,
            payment_type,
            name: validate_name(name.into())?,
            security_token,
            obfuscated_data,
            active,
            created_at,
            updated_at,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Change the user-facing display name.
    pub fn rename(&mut self, name: impl Into<String>) -> DomainResult<()> {
        self.name = validate_name(name.into())?;
        self.updated_at = time::now();
        Ok(())
    }

    /// Deactivate the method. Deactivating twice is a no-op.
    pub fn deactivate(&mut self) {
        if self.active {
            self.active = false;
            self.updated_at = time::now();
        }
    }
}

fn validate_name(name: String) -> DomainResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("Payment method name cannot be empty"));
    }
    Ok(trimmed.to_string())
}
