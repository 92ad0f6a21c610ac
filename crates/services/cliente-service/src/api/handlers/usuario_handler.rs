//! Usuario handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use uuid::Uuid;

use common::{AppError, AppResult};

use crate::api::extractors::ValidatedJson;
use crate::api::state::AppState;
use crate::service::{
    JsonUserMapper, MessageResponse, PaymentMethodPayload, RenamePaymentMethodRequest,
    UpdateUserDto, UserPayload,
};

/// Create usuario routes
pub fn usuario_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_usuarios).post(create_usuario))
        .route("/email/:email", get(get_usuario_by_email))
        .route(
            "/:id",
            get(get_usuario).put(update_usuario).delete(delete_usuario),
        )
        .route("/:id/metodos_pago", post(add_metodo_pago))
        .route("/:id/metodos_pago/:metodo_id", put(rename_metodo_pago))
        .route(
            "/:id/metodos_pago/:metodo_id/desactivar",
            post(deactivate_metodo_pago),
        )
}

fn parse_user_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::validation("ID de usuario inválido"))
}

fn parse_method_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::validation("ID de método de pago inválido"))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/cliente/usuarios",
    tag = "Usuarios",
    request_body = UserPayload,
    responses(
        (status = 201, description = "User created", body = UserPayload),
        (status = 400, description = "Validation error or broken business rule"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_usuario(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UserPayload>,
) -> AppResult<(StatusCode, Json<UserPayload>)> {
    let user = state.user_service.create_user_from_json(payload).await?;
    Ok((StatusCode::CREATED, Json(JsonUserMapper.to_payload(&user))))
}

/// List all users
#[utoipa::path(
    get,
    path = "/cliente/usuarios",
    tag = "Usuarios",
    responses(
        (status = 200, description = "All users", body = Vec<UserPayload>)
    )
)]
pub async fn list_usuarios(State(state): State<AppState>) -> AppResult<Json<Vec<UserPayload>>> {
    let users = state.user_service.list_users().await?;
    Ok(Json(
        users.iter().map(|u| JsonUserMapper.to_payload(u)).collect(),
    ))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/cliente/usuarios/{id}",
    tag = "Usuarios",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = UserPayload),
        (status = 400, description = "Invalid user ID"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_usuario(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserPayload>> {
    let user = state.user_service.get_user(parse_user_id(&id)?).await?;
    Ok(Json(JsonUserMapper.to_payload(&user)))
}

/// Get user by email
#[utoipa::path(
    get,
    path = "/cliente/usuarios/email/{email}",
    tag = "Usuarios",
    params(
        ("email" = String, Path, description = "User email")
    ),
    responses(
        (status = 200, description = "User found", body = UserPayload),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_usuario_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<Json<UserPayload>> {
    let user = state.user_service.get_user_by_email(&email).await?;
    Ok(Json(JsonUserMapper.to_payload(&user)))
}

/// Update a user
///
/// Empty fields keep their stored value. A non-empty `metodos_pago` list
/// replaces every payment method.
#[utoipa::path(
    put,
    path = "/cliente/usuarios/{id}",
    tag = "Usuarios",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = UserPayload,
    responses(
        (status = 200, description = "User updated", body = UserPayload),
        (status = 400, description = "Invalid ID, mismatched body ID or validation error"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn update_usuario(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UserPayload>,
) -> AppResult<Json<UserPayload>> {
    let user_id = parse_user_id(&id)?;
    if !payload.id.trim().is_empty() && Uuid::parse_str(payload.id.trim()).ok() != Some(user_id) {
        return Err(AppError::validation(
            "El ID del path no coincide con el del body",
        ));
    }

    let dto = UpdateUserDto {
        id: user_id.to_string(),
        nombre: payload.nombre,
        email: payload.email,
        metodos_pago: payload
            .metodos_pago
            .into_iter()
            .map(|m| JsonUserMapper.method_to_dto(m))
            .collect(),
    };

    let user = state.user_service.update_user(dto).await?;
    Ok(Json(JsonUserMapper.to_payload(&user)))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/cliente/usuarios/{id}",
    tag = "Usuarios",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, description = "Invalid user ID"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_usuario(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.user_service.delete_user(parse_user_id(&id)?).await?;
    Ok(Json(MessageResponse {
        message: "Usuario eliminado correctamente".to_string(),
    }))
}

/// Add a payment method to a user
#[utoipa::path(
    post,
    path = "/cliente/usuarios/{id}/metodos_pago",
    tag = "Metodos de pago",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = PaymentMethodPayload,
    responses(
        (status = 201, description = "Payment method added", body = UserPayload),
        (status = 400, description = "Validation error"),
        (status = 404, description = "User not found")
    )
)]
pub async fn add_metodo_pago(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<PaymentMethodPayload>,
) -> AppResult<(StatusCode, Json<UserPayload>)> {
    let user = state
        .user_service
        .add_payment_method(parse_user_id(&id)?, JsonUserMapper.method_to_dto(payload))
        .await?;
    Ok((StatusCode::CREATED, Json(JsonUserMapper.to_payload(&user))))
}

/// Rename a payment method
#[utoipa::path(
    put,
    path = "/cliente/usuarios/{id}/metodos_pago/{metodo_id}",
    tag = "Metodos de pago",
    params(
        ("id" = String, Path, description = "User ID"),
        ("metodo_id" = String, Path, description = "Payment method ID")
    ),
    request_body = RenamePaymentMethodRequest,
    responses(
        (status = 200, description = "Payment method renamed", body = UserPayload),
        (status = 400, description = "Validation error"),
        (status = 404, description = "User or payment method not found")
    )
)]
pub async fn rename_metodo_pago(
    State(state): State<AppState>,
    Path((id, metodo_id)): Path<(String, String)>,
    ValidatedJson(payload): ValidatedJson<RenamePaymentMethodRequest>,
) -> AppResult<Json<UserPayload>> {
    let user = state
        .user_service
        .rename_payment_method(
            parse_user_id(&id)?,
            parse_method_id(&metodo_id)?,
            payload.nombre,
        )
        .await?;
    Ok(Json(JsonUserMapper.to_payload(&user)))
}

/// Deactivate a payment method
#[utoipa::path(
    post,
    path = "/cliente/usuarios/{id}/metodos_pago/{metodo_id}/desactivar",
    tag = "Metodos de pago",
    params(
        ("id" = String, Path, description = "User ID"),
        ("metodo_id" = String, Path, description = "Payment method ID")
    ),
    responses(
        (status = 200, description = "Payment method deactivated", body = UserPayload),
        (status = 400, description = "Invalid ID or broken business rule"),
        (status = 404, description = "User or payment method not found")
    )
)]
pub async fn deactivate_metodo_pago(
    State(state): State<AppState>,
    Path((id, metodo_id)): Path<(String, String)>,
) -> AppResult<Json<UserPayload>> {
    let user = state
        .user_service
        .deactivate_payment_method(parse_user_id(&id)?, parse_method_id(&metodo_id)?)
        .await?;
    Ok(Json(JsonUserMapper.to_payload(&user)))
}
