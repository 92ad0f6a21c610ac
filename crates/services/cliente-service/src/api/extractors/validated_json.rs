//! Validated JSON extractor.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use common::AppError;

/// JSON extractor that automatically validates the payload.
///
/// Malformed bodies are rejected as `BAD_REQUEST`; rule violations as
/// `VALIDATION_ERROR` carrying the first violated rule's message.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;

        value.validate().map_err(|e| {
            let message = first_message(&e).unwrap_or_else(|| "Validation failed".to_string());
            AppError::validation(message)
        })?;

        Ok(ValidatedJson(value))
    }
}

/// First message found, descending into nested structs and lists.
fn first_message(errors: &ValidationErrors) -> Option<String> {
    errors.errors().values().find_map(|kind| match kind {
        ValidationErrorsKind::Field(field_errors) => field_errors
            .iter()
            .find_map(|error| error.message.as_ref().map(|msg| msg.to_string())),
        ValidationErrorsKind::Struct(nested) => first_message(nested),
        ValidationErrorsKind::List(items) => items.values().find_map(|item| first_message(item)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::UserPayload;

    #[test]
    fn finds_message_in_nested_list() {
        let mut payload = UserPayload::default();
        payload.metodos_pago.push(crate::service::PaymentMethodPayload {
            nombre: "x".repeat(101),
            ..Default::default()
        });

        let errors = payload.validate().unwrap_err();
        assert_eq!(
            first_message(&errors).as_deref(),
            Some("El nombre del método de pago es demasiado largo")
        );
    }
}
