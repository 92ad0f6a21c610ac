//! Mappers between the external JSON, the DTOs and the `User` aggregate.

use uuid::Uuid;

use common::{AppError, AppResult};
use domain::time::{format_optional_timestamp, format_timestamp, parse_optional_timestamp};
use domain::{
    CustomerKind, NationalId, NewPaymentMethod, NewUser, PaymentMethod, PaymentMethodFactory,
    TaxId, User, UserFactory,
};

use super::dto::{
    kind_from_parts, PaymentMethodDto, PaymentMethodPayload, UserDto, UserKindDto, UserPayload,
};

// =============================================================================
// External JSON <-> DTO
// =============================================================================

/// Maps the JSON bodies of the HTTP API to and from DTOs.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonUserMapper;

impl JsonUserMapper {
    pub fn to_dto(&self, payload: UserPayload) -> UserDto {
        UserDto {
            id: payload.id,
            nombre: payload.nombre,
            email: payload.email,
            kind: kind_from_parts(
                payload.tipo_usuario.as_deref().unwrap_or_default(),
                payload.cedula.unwrap_or_default(),
                payload.fecha_nacimiento.unwrap_or_default(),
                payload.rut.unwrap_or_default(),
                payload.fecha_constitucion.unwrap_or_default(),
            ),
            fecha_creacion: payload.fecha_creacion,
            fecha_actualizacion: payload.fecha_actualizacion,
            metodos_pago: payload
                .metodos_pago
                .into_iter()
                .map(|m| self.method_to_dto(m))
                .collect(),
        }
    }

    pub fn to_payload(&self, dto: &UserDto) -> UserPayload {
        let mut payload = UserPayload {
            id: dto.id.clone(),
            tipo_usuario: Some(dto.tipo_usuario().to_string()),
            nombre: dto.nombre.clone(),
            email: dto.email.clone(),
            fecha_creacion: dto.fecha_creacion.clone(),
            fecha_actualizacion: dto.fecha_actualizacion.clone(),
            metodos_pago: dto
                .metodos_pago
                .iter()
                .map(|m| self.method_to_payload(m))
                .collect(),
            ..Default::default()
        };

        match &dto.kind {
            UserKindDto::Natural {
                cedula,
                fecha_nacimiento,
            } => {
                payload.cedula = Some(cedula.clone());
                payload.fecha_nacimiento = Some(fecha_nacimiento.clone());
            }
            UserKindDto::Empresa {
                rut,
                fecha_constitucion,
            } => {
                payload.rut = Some(rut.clone());
                payload.fecha_constitucion = Some(fecha_constitucion.clone());
            }
            UserKindDto::Base => {}
        }

        payload
    }

    pub fn method_to_dto(&self, payload: PaymentMethodPayload) -> PaymentMethodDto {
        PaymentMethodDto {
            id: payload.id,
            tipo: payload.tipo,
            nombre: payload.nombre,
            token_seguridad: payload.token_seguridad,
            datos_ofuscados: payload.datos_ofuscados,
            activo: payload.activo.unwrap_or(true),
            fecha_creacion: payload.fecha_creacion,
            fecha_actualizacion: payload.fecha_actualizacion,
        }
    }

    pub fn method_to_payload(&self, dto: &PaymentMethodDto) -> PaymentMethodPayload {
        PaymentMethodPayload {
            id: dto.id.clone(),
            tipo: dto.tipo.clone(),
            nombre: dto.nombre.clone(),
            token_seguridad: dto.token_seguridad.clone(),
            datos_ofuscados: dto.datos_ofuscados.clone(),
            activo: Some(dto.activo),
            fecha_creacion: dto.fecha_creacion.clone(),
            fecha_actualizacion: dto.fecha_actualizacion.clone(),
        }
    }
}

// =============================================================================
// DTO <-> Entity
// =============================================================================

/// Maps DTOs to and from the `User` aggregate.
///
/// The DTO to entity direction goes through the factories, so every rule is
/// checked on the way in.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserMapper {
    factory: UserFactory,
}

impl UserMapper {
    pub fn new(factory: UserFactory) -> Self {
        Self { factory }
    }

    pub fn to_dto(&self, user: &User) -> UserDto {
        let kind = match &user.kind {
            CustomerKind::Natural {
                national_id,
                birth_date,
            } => UserKindDto::Natural {
                cedula: national_id
                    .as_ref()
                    .map(|id| id.as_str().to_string())
                    .unwrap_or_default(),
                fecha_nacimiento: format_optional_timestamp(birth_date.as_ref()),
            },
            CustomerKind::Company {
                tax_id,
                incorporation_date,
            } => UserKindDto::Empresa {
                rut: tax_id
                    .as_ref()
                    .map(|id| id.as_str().to_string())
                    .unwrap_or_default(),
                fecha_constitucion: format_optional_timestamp(incorporation_date.as_ref()),
            },
            CustomerKind::Base => UserKindDto::Base,
        };

        UserDto {
            id: user.id().to_string(),
            nombre: user.name().to_string(),
            email: user.email().address().to_string(),
            kind,
            fecha_creacion: format_timestamp(&user.created_at),
            fecha_actualizacion: format_timestamp(&user.updated_at),
            metodos_pago: user
                .payment_methods()
                .iter()
                .map(|m| self.method_to_dto(m))
                .collect(),
        }
    }

    pub fn to_entity(&self, dto: UserDto) -> AppResult<User> {
        let kind = match dto.kind {
            UserKindDto::Natural {
                cedula,
                fecha_nacimiento,
            } => CustomerKind::Natural {
                national_id: optional(&cedula, NationalId::parse)?,
                birth_date: parse_optional_timestamp(&fecha_nacimiento)?,
            },
            UserKindDto::Empresa {
                rut,
                fecha_constitucion,
            } => CustomerKind::Company {
                tax_id: optional(&rut, TaxId::parse)?,
                incorporation_date: parse_optional_timestamp(&fecha_constitucion)?,
            },
            UserKindDto::Base => CustomerKind::Base,
        };

        let payment_methods = dto
            .metodos_pago
            .into_iter()
            .map(|m| self.method_to_entity(m))
            .collect::<AppResult<Vec<_>>>()?;

        let user = self.factory.create(NewUser {
            id: parse_optional_id(&dto.id)?,
            name: dto.nombre,
            email: dto.email,
            kind,
            payment_methods,
            created_at: parse_optional_timestamp(&dto.fecha_creacion)?,
            updated_at: parse_optional_timestamp(&dto.fecha_actualizacion)?,
        })?;

        Ok(user)
    }

    pub fn method_to_dto(&self, method: &PaymentMethod) -> PaymentMethodDto {
        PaymentMethodDto {
            id: method.id().to_string(),
            tipo: method.payment_type.as_str().to_string(),
            nombre: method.name().to_string(),
            token_seguridad: method.security_token.as_str().to_string(),
            datos_ofuscados: method
                .obfuscated_data
                .as_ref()
                .map(|data| data.to_string())
                .unwrap_or_default(),
            activo: method.is_active(),
            fecha_creacion: format_timestamp(&method.created_at),
            fecha_actualizacion: format_timestamp(&method.updated_at),
        }
    }

    pub fn method_to_entity(&self, dto: PaymentMethodDto) -> AppResult<PaymentMethod> {
        let method = PaymentMethodFactory.create(NewPaymentMethod {
            id: parse_optional_id(&dto.id)?,
            payment_type: dto.tipo,
            name: dto.nombre,
            security_token: dto.token_seguridad,
            obfuscated_data: dto.datos_ofuscados,
            active: dto.activo,
            created_at: parse_optional_timestamp(&dto.fecha_creacion)?,
            updated_at: parse_optional_timestamp(&dto.fecha_actualizacion)?,
        })?;

        Ok(method)
    }
}

/// Empty means absent; anything else must be a UUID.
pub fn parse_optional_id(raw: &str) -> AppResult<Option<Uuid>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    Uuid::parse_str(raw)
        .map(Some)
        .map_err(|_| AppError::validation(format!("'{}' no es un identificador válido", raw)))
}

fn optional<T>(
    raw: &str,
    parse: impl Fn(&str) -> domain::DomainResult<T>,
) -> AppResult<Option<T>> {
    if raw.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(parse(raw)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::time;
    use domain::{Email, FullName, ObfuscatedData, PaymentType, SecurityToken};

    fn card() -> PaymentMethod {
        PaymentMethod::new(
            PaymentType::CreditCard,
            "Visa personal",
            SecurityToken::parse("tok_visa").unwrap(),
            Some(ObfuscatedData::new("4242", "Visa").unwrap()),
        )
        .unwrap()
    }

    fn user(kind: CustomerKind) -> User {
        User::new(
            FullName::parse("Ana María Gómez"),
            Email::parse("ana@example.com").unwrap(),
            kind,
            vec![card()],
        )
    }

    #[test]
    fn entity_round_trips_through_dto() {
        let mapper = UserMapper::default();
        let kinds = [
            CustomerKind::Natural {
                national_id: Some(NationalId::parse("1020304050").unwrap()),
                birth_date: Some(time::parse_timestamp("1990-05-17T08:30:00Z").unwrap()),
            },
            CustomerKind::Company {
                tax_id: Some(TaxId::parse("76.123.456-7").unwrap()),
                incorporation_date: Some(time::parse_timestamp("2001-01-01T00:00:00Z").unwrap()),
            },
            CustomerKind::Base,
        ];

        for kind in kinds {
            let original = user(kind);
            let restored = mapper.to_entity(mapper.to_dto(&original)).unwrap();
            assert_eq!(restored, original);
        }
    }

    #[test]
    fn long_names_round_trip_through_dto() {
        let mapper = UserMapper::default();
        for display in ["Juan Carlos Pérez", "María José de la Fuente Rojas"] {
            let original = User::new(
                FullName::parse(display),
                Email::parse("juan@example.com").unwrap(),
                CustomerKind::Base,
                vec![card()],
            );
            let restored = mapper.to_entity(mapper.to_dto(&original)).unwrap();
            assert_eq!(restored.name(), original.name());
            assert_eq!(restored, original);
        }
    }

    #[test]
    fn deactivated_method_round_trips() {
        let mapper = UserMapper::default();
        let mut original = user(CustomerKind::Base);
        let id = original.payment_methods()[0].id();
        original.payment_method_mut(id).unwrap().deactivate();

        let restored = mapper.to_entity(mapper.to_dto(&original)).unwrap();
        assert!(!restored.payment_methods()[0].is_active());
    }

    #[test]
    fn timestamps_use_fixed_pattern() {
        let dto = UserMapper::default().to_dto(&user(CustomerKind::Base));
        assert_eq!(dto.fecha_creacion.len(), "2024-01-01T00:00:00Z".len());
        assert!(dto.fecha_creacion.ends_with('Z'));
        assert_eq!(dto.metodos_pago[0].datos_ofuscados, "Visa ****4242");
    }

    #[test]
    fn empty_id_and_timestamps_are_assigned() {
        let dto = UserDto {
            nombre: "Ana Gómez".to_string(),
            email: "ana@example.com".to_string(),
            ..Default::default()
        };
        let user = UserMapper::default().to_entity(dto).unwrap();
        assert!(!user.id().is_nil());
        assert!(user.kind.is_natural());
    }

    #[test]
    fn malformed_values_are_validation_errors() {
        let mapper = UserMapper::default();
        let base = UserDto {
            nombre: "Ana Gómez".to_string(),
            email: "ana@example.com".to_string(),
            ..Default::default()
        };

        let bad_id = UserDto {
            id: "not-a-uuid".to_string(),
            ..base.clone()
        };
        assert!(matches!(mapper.to_entity(bad_id), Err(AppError::Validation(_))));

        let bad_date = UserDto {
            fecha_creacion: "17/05/1990".to_string(),
            ..base
        };
        assert!(matches!(mapper.to_entity(bad_date), Err(AppError::Validation(_))));
    }

    #[test]
    fn short_name_breaks_rule() {
        let dto = UserDto {
            nombre: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            UserMapper::default().to_entity(dto),
            Err(AppError::BusinessRule(_))
        ));
    }

    #[test]
    fn json_output_only_carries_matching_kind_fields() {
        let json = JsonUserMapper;
        let empresa = UserDto {
            kind: UserKindDto::Empresa {
                rut: "76.123.456-7".to_string(),
                fecha_constitucion: String::new(),
            },
            ..Default::default()
        };

        let value = serde_json::to_value(json.to_payload(&empresa)).unwrap();
        assert_eq!(value["tipo_usuario"], "empresa");
        assert_eq!(value["rut"], "76.123.456-7");
        assert!(value.get("cedula").is_none());
        assert!(value.get("fecha_nacimiento").is_none());

        let base = UserDto {
            kind: UserKindDto::Base,
            ..Default::default()
        };
        let value = serde_json::to_value(json.to_payload(&base)).unwrap();
        assert_eq!(value["tipo_usuario"], "base");
        assert!(value.get("rut").is_none());
        assert!(value.get("cedula").is_none());
    }

    #[test]
    fn json_input_defaults() {
        let payload: UserPayload = serde_json::from_value(serde_json::json!({
            "nombre": "Ana Gómez",
            "email": "ana@example.com",
            "cedula": "1020304050",
            "metodos_pago": [{ "tipo": "tarjeta_debito", "nombre": "Débito" }]
        }))
        .unwrap();

        let dto = JsonUserMapper.to_dto(payload);
        assert_eq!(
            dto.kind,
            UserKindDto::Natural {
                cedula: "1020304050".to_string(),
                fecha_nacimiento: String::new()
            }
        );
        assert!(dto.metodos_pago[0].activo);
        assert_eq!(dto.metodos_pago[0].token_seguridad, "");
    }
}
