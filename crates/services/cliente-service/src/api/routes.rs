//! Route configuration.

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{health_routes, usuario_routes};
use super::openapi::ApiDoc;
use super::state::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest(
            "/cliente",
            Router::new()
                .nest("/health", health_routes())
                .nest("/usuarios", usuario_routes()),
        )
        .with_state(state)
}
