//! Transfer objects.
//!
//! `UserPayload` / `PaymentMethodPayload` are the JSON bodies exchanged with
//! HTTP clients. The `*Dto` types are the string-typed objects the service
//! layer works with.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use domain::{KIND_BASE, KIND_COMPANY, KIND_NATURAL};

// =============================================================================
// Application DTOs
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentMethodDto {
    pub id: String,
    pub tipo: String,
    pub nombre: String,
    pub token_seguridad: String,
    pub datos_ofuscados: String,
    pub activo: bool,
    pub fecha_creacion: String,
    pub fecha_actualizacion: String,
}

/// Type-specific part of a [`UserDto`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserKindDto {
    Natural {
        cedula: String,
        fecha_nacimiento: String,
    },
    Empresa {
        rut: String,
        fecha_constitucion: String,
    },
    Base,
}

impl Default for PaymentMethodDto {
    fn default() -> Self {
        Self {
            id: String::new(),
            tipo: String::new(),
            nombre: String::new(),
            token_seguridad: String::new(),
            datos_ofuscados: String::new(),
            activo: true,
            fecha_creacion: String::new(),
            fecha_actualizacion: String::new(),
        }
    }
}

impl Default for UserKindDto {
    fn default() -> Self {
        UserKindDto::Natural {
            cedula: String::new(),
            fecha_nacimiento: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDto {
    pub id: String,
    pub nombre: String,
    pub email: String,
    pub kind: UserKindDto,
    pub fecha_creacion: String,
    pub fecha_actualizacion: String,
    pub metodos_pago: Vec<PaymentMethodDto>,
}

impl UserDto {
    /// Discriminator string of this user's kind.
    pub fn tipo_usuario(&self) -> &'static str {
        match self.kind {
            UserKindDto::Natural { .. } => KIND_NATURAL,
            UserKindDto::Empresa { .. } => KIND_COMPANY,
            UserKindDto::Base => KIND_BASE,
        }
    }
}

/// Input of the create use case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateUserDto {
    pub tipo_usuario: String,
    pub nombre: String,
    pub email: String,
    pub cedula: String,
    pub fecha_nacimiento: String,
    pub rut: String,
    pub fecha_constitucion: String,
    pub metodos_pago: Vec<PaymentMethodDto>,
}

impl From<CreateUserDto> for UserDto {
    fn from(dto: CreateUserDto) -> Self {
        UserDto {
            id: String::new(),
            nombre: dto.nombre,
            email: dto.email,
            kind: kind_from_parts(
                &dto.tipo_usuario,
                dto.cedula,
                dto.fecha_nacimiento,
                dto.rut,
                dto.fecha_constitucion,
            ),
            fecha_creacion: String::new(),
            fecha_actualizacion: String::new(),
            metodos_pago: dto.metodos_pago,
        }
    }
}

/// Input of the update use case. Empty fields keep the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUserDto {
    pub id: String,
    pub nombre: String,
    pub email: String,
    pub metodos_pago: Vec<PaymentMethodDto>,
}

/// Select the kind from its discriminator, defaulting to natural when empty.
pub(crate) fn kind_from_parts(
    tipo_usuario: &str,
    cedula: String,
    fecha_nacimiento: String,
    rut: String,
    fecha_constitucion: String,
) -> UserKindDto {
    let tipo = if tipo_usuario.is_empty() {
        domain::DEFAULT_KIND
    } else {
        tipo_usuario
    };

    match tipo {
        KIND_NATURAL => UserKindDto::Natural {
            cedula,
            fecha_nacimiento,
        },
        KIND_COMPANY => UserKindDto::Empresa {
            rut,
            fecha_constitucion,
        },
        _ => UserKindDto::Base,
    }
}

// =============================================================================
// External JSON
// =============================================================================

/// Payment method as exchanged with HTTP clients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct PaymentMethodPayload {
    #[schema(example = "")]
    pub id: String,
    /// tarjeta_credito, tarjeta_debito or transferencia_bancaria
    #[schema(example = "tarjeta_credito")]
    pub tipo: String,
    #[validate(length(max = 100, message = "El nombre del método de pago es demasiado largo"))]
    #[schema(example = "Visa personal")]
    pub nombre: String,
    #[schema(example = "tok_4f9a0c")]
    pub token_seguridad: String,
    #[schema(example = "Visa ****4242")]
    pub datos_ofuscados: String,
    /// Defaults to true when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activo: Option<bool>,
    #[schema(example = "2024-03-01T10:15:00Z")]
    pub fecha_creacion: String,
    #[schema(example = "2024-03-01T10:15:00Z")]
    pub fecha_actualizacion: String,
}

/// User as exchanged with HTTP clients.
///
/// Missing keys read as empty strings. Type-specific keys are only written
/// for the matching `tipo_usuario`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct UserPayload {
    pub id: String,
    /// natural, empresa; defaults to natural when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "natural")]
    pub tipo_usuario: Option<String>,
    #[validate(length(max = 200, message = "El nombre es demasiado largo"))]
    #[schema(example = "Ana María Gómez Pérez")]
    pub nombre: String,
    #[validate(length(max = 254, message = "El email es demasiado largo"))]
    #[schema(example = "ana.gomez@example.com")]
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "1020304050")]
    pub cedula: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "1990-05-17T00:00:00Z")]
    pub fecha_nacimiento: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rut: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_constitucion: Option<String>,
    pub fecha_creacion: String,
    pub fecha_actualizacion: String,
    #[validate(nested)]
    pub metodos_pago: Vec<PaymentMethodPayload>,
}

/// Body of the rename-payment-method endpoint.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RenamePaymentMethodRequest {
    #[validate(length(min = 1, max = 100, message = "El nombre no puede estar vacío"))]
    #[schema(example = "Tarjeta de viajes")]
    pub nombre: String,
}

/// Plain confirmation message.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_method_dto_defaults_to_active() {
        let dto = PaymentMethodDto {
            nombre: "Débito".to_string(),
            ..Default::default()
        };
        assert!(dto.activo);
    }

    #[test]
    fn create_dto_selects_kind_by_discriminator() {
        let natural: UserDto = CreateUserDto {
            tipo_usuario: "natural".to_string(),
            cedula: "123".to_string(),
            rut: "ignored".to_string(),
            ..Default::default()
        }
        .into();
        assert_eq!(
            natural.kind,
            UserKindDto::Natural {
                cedula: "123".to_string(),
                fecha_nacimiento: String::new()
            }
        );

        let empresa: UserDto = CreateUserDto {
            tipo_usuario: "empresa".to_string(),
            rut: "76.123.456-7".to_string(),
            ..Default::default()
        }
        .into();
        assert_eq!(empresa.tipo_usuario(), "empresa");

        let base: UserDto = CreateUserDto {
            tipo_usuario: "vip".to_string(),
            ..Default::default()
        }
        .into();
        assert_eq!(base.kind, UserKindDto::Base);
    }

    #[test]
    fn empty_discriminator_defaults_to_natural() {
        let dto: UserDto = CreateUserDto::default().into();
        assert_eq!(dto.tipo_usuario(), "natural");
    }

    #[test]
    fn payload_reads_missing_keys_as_empty() {
        let payload: UserPayload =
            serde_json::from_str(r#"{"nombre": "Ana Gómez", "email": "ana@example.com"}"#)
                .unwrap();
        assert_eq!(payload.id, "");
        assert_eq!(payload.tipo_usuario, None);
        assert!(payload.metodos_pago.is_empty());
    }
}
