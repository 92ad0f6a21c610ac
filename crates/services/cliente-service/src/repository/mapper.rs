//! Conversion between the `User` aggregate and its table rows.

use common::AppResult;
use domain::{
    CustomerKind, Email, FullName, NationalId, ObfuscatedData, PaymentMethod, PaymentType,
    SecurityToken, TaxId, User, KIND_COMPANY, KIND_NATURAL,
};

use super::entities::{metodo_pago, usuario};

/// Split a user into its `usuarios` row and its owned `metodos_pago` rows.
///
/// `secuencia` is left at zero; the store assigns it on insert.
pub fn user_to_rows(user: &User) -> (usuario::Model, Vec<metodo_pago::Model>) {
    let (cedula, fecha_nacimiento, rut, fecha_constitucion) = match &user.kind {
        CustomerKind::Natural {
            national_id,
            birth_date,
        } => (
            national_id.as_ref().map(|id| id.as_str().to_string()),
            *birth_date,
            None,
            None,
        ),
        CustomerKind::Company {
            tax_id,
            incorporation_date,
        } => (
            None,
            None,
            tax_id.as_ref().map(|id| id.as_str().to_string()),
            *incorporation_date,
        ),
        CustomerKind::Base => (None, None, None, None),
    };

    let row = usuario::Model {
        id: user.id(),
        secuencia: 0,
        tipo_usuario: user.kind.discriminator().to_string(),
        nombre: user.name().to_string(),
        email: user.email().address().to_string(),
        cedula,
        fecha_nacimiento,
        rut,
        fecha_constitucion,
        fecha_creacion: user.created_at,
        fecha_actualizacion: user.updated_at,
    };

    let methods = user
        .payment_methods()
        .iter()
        .enumerate()
        .map(|(position, method)| metodo_pago::Model {
            id: method.id(),
            usuario_id: user.id(),
            posicion: position as i32,
            tipo: method.payment_type.as_str().to_string(),
            nombre: method.name().to_string(),
            token_seguridad: method.security_token.as_str().to_string(),
            ultimos_digitos: method
                .obfuscated_data
                .as_ref()
                .map(|data| data.last_digits().to_string()),
            marca: method
                .obfuscated_data
                .as_ref()
                .map(|data| data.brand().to_string()),
            activo: method.is_active(),
            fecha_creacion: method.created_at,
            fecha_actualizacion: method.updated_at,
        })
        .collect();

    (row, methods)
}

/// Rebuild a user from its rows. `methods` must already be in list order.
pub fn user_from_rows(row: usuario::Model, methods: Vec<metodo_pago::Model>) -> AppResult<User> {
    let kind = match row.tipo_usuario.as_str() {
        KIND_NATURAL => CustomerKind::Natural {
            national_id: row.cedula.as_deref().map(NationalId::parse).transpose()?,
            birth_date: row.fecha_nacimiento,
        },
        KIND_COMPANY => CustomerKind::Company {
            tax_id: row.rut.as_deref().map(TaxId::parse).transpose()?,
            incorporation_date: row.fecha_constitucion,
        },
        _ => CustomerKind::Base,
    };

    let payment_methods = methods
        .into_iter()
        .map(payment_method_from_row)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(User::restore(
        row.id,
        FullName::parse(&row.nombre),
        Email::parse(&row.email)?,
        kind,
        payment_methods,
        row.fecha_creacion,
        row.fecha_actualizacion,
    ))
}

fn payment_method_from_row(row: metodo_pago::Model) -> AppResult<PaymentMethod> {
    let obfuscated_data = match (row.ultimos_digitos.as_deref(), row.marca.as_deref()) {
        (Some(digits), Some(brand)) => Some(ObfuscatedData::new(digits, brand)?),
        _ => None,
    };

    Ok(PaymentMethod::restore(
        row.id,
        row.tipo.parse::<PaymentType>()?,
        row.nombre,
        SecurityToken::parse(&row.token_seguridad)?,
        obfuscated_data,
        row.activo,
        row.fecha_creacion,
        row.fecha_actualizacion,
    )?)
}
