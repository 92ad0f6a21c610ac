//! Domain layer - Customer entities, value objects, rules and factories.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.

pub mod constants;
pub mod error;
pub mod factory;
pub mod payment_method;
pub mod rules;
pub mod time;
pub mod user;
pub mod value_objects;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use factory::{NewPaymentMethod, NewUser, PaymentMethodFactory, UserFactory};
pub use payment_method::PaymentMethod;
pub use rules::{check_rule, BusinessRule, HasPaymentMethod, ValidNames};
pub use user::{CustomerKind, User};
pub use value_objects::{
    Email, FullName, NationalId, ObfuscatedData, PaymentType, SecurityToken, TaxId,
};
