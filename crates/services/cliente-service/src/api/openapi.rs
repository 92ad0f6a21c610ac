//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::api::handlers::health_handler::{HealthResponse, ServiceHealth};
use crate::service::{MessageResponse, PaymentMethodPayload, RenamePaymentMethodRequest, UserPayload};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::health_handler::health_check,
        crate::api::handlers::usuario_handler::create_usuario,
        crate::api::handlers::usuario_handler::list_usuarios,
        crate::api::handlers::usuario_handler::get_usuario,
        crate::api::handlers::usuario_handler::get_usuario_by_email,
        crate::api::handlers::usuario_handler::update_usuario,
        crate::api::handlers::usuario_handler::delete_usuario,
        crate::api::handlers::usuario_handler::add_metodo_pago,
        crate::api::handlers::usuario_handler::rename_metodo_pago,
        crate::api::handlers::usuario_handler::deactivate_metodo_pago,
    ),
    components(
        schemas(
            UserPayload,
            PaymentMethodPayload,
            RenamePaymentMethodRequest,
            MessageResponse,
            HealthResponse,
            ServiceHealth,
        )
    ),
    tags(
        (name = "Usuarios", description = "Customer management endpoints"),
        (name = "Metodos de pago", description = "Payment methods owned by a customer"),
        (name = "Health", description = "Module health"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_cliente_path() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/cliente/health",
            "/cliente/usuarios",
            "/cliente/usuarios/{id}",
            "/cliente/usuarios/email/{email}",
            "/cliente/usuarios/{id}/metodos_pago",
            "/cliente/usuarios/{id}/metodos_pago/{metodo_id}",
            "/cliente/usuarios/{id}/metodos_pago/{metodo_id}/desactivar",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {}",
                expected
            );
        }
    }
}
