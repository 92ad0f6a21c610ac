//! Integration tests for API endpoints.
//!
//! These tests drive the router with `tower::ServiceExt::oneshot` on top of an
//! in-memory repository, without requiring an actual database.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use cliente_service_lib::api::{create_router, AppState};
use cliente_service_lib::repository::UserRepository;
use cliente_service_lib::service::UserManager;
use common::{AppError, AppResult};
use domain::{User, UserFactory};

// =============================================================================
// In-memory repository for testing
// =============================================================================

#[derive(Default)]
struct InMemoryUsers {
    users: Mutex<HashMap<Uuid, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let email = email.to_lowercase();
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email().address() == email)
            .cloned())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let mut users: Vec<User> = self.users.lock().unwrap().values().cloned().collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn add(&self, user: &User) -> AppResult<User> {
        self.users.lock().unwrap().insert(user.id(), user.clone());
        Ok(user.clone())
    }

    async fn update(&self, user: &User) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        if !users.contains_key(&user.id()) {
            return Err(AppError::NotFound);
        }
        users.insert(user.id(), user.clone());
        Ok(user.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.users
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::NotFound)
    }
}

fn app() -> Router {
    app_with_factory(UserFactory::default())
}

fn app_with_factory(factory: UserFactory) -> Router {
    let repo = Arc::new(InMemoryUsers::default());
    let service = Arc::new(UserManager::new(repo, factory));
    create_router(AppState::new(service, None))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn natural_user() -> Value {
    json!({
        "tipo_usuario": "natural",
        "nombre": "Ana María Gómez",
        "email": "ana@example.com",
        "cedula": "1020304050",
        "fecha_nacimiento": "1990-05-17T00:00:00Z",
        "metodos_pago": [{
            "tipo": "tarjeta_credito",
            "nombre": "Visa personal",
            "token_seguridad": "tok_visa",
            "datos_ofuscados": "Visa ****4242"
        }]
    })
}

// =============================================================================
// Health Check Tests
// =============================================================================

#[tokio::test]
async fn test_health_check() {
    let (status, body) = send(&app(), "GET", "/cliente/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["module"], "cliente");
}

// =============================================================================
// Usuario Tests
// =============================================================================

#[tokio::test]
async fn test_create_user() {
    let (status, body) = send(&app(), "POST", "/cliente/usuarios", Some(natural_user())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(Uuid::parse_str(body["id"].as_str().unwrap()).is_ok());
    assert_eq!(body["tipo_usuario"], "natural");
    assert_eq!(body["cedula"], "1020304050");
    assert_eq!(body["fecha_nacimiento"], "1990-05-17T00:00:00Z");
    assert!(body.get("rut").is_none());
    assert_eq!(body["metodos_pago"][0]["datos_ofuscados"], "Visa ****4242");
    assert_eq!(body["metodos_pago"][0]["activo"], true);
}

#[tokio::test]
async fn test_create_company_user() {
    let payload = json!({
        "tipo_usuario": "empresa",
        "nombre": "Comercial Andes",
        "email": "contacto@andes.cl",
        "rut": "76.123.456-7"
    });
    let (status, body) = send(&app(), "POST", "/cliente/usuarios", Some(payload)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["tipo_usuario"], "empresa");
    assert_eq!(body["rut"], "76.123.456-7");
    assert_eq!(body["fecha_constitucion"], "");
    assert!(body.get("cedula").is_none());
}

#[tokio::test]
async fn test_create_user_invalid_name() {
    let mut payload = natural_user();
    payload["nombre"] = json!("Ana");
    let (status, body) = send(&app(), "POST", "/cliente/usuarios", Some(payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BUSINESS_RULE_VIOLATION");
    assert_eq!(
        body["error"]["message"],
        "El nombre debe incluir nombres y apellidos"
    );
}

#[tokio::test]
async fn test_create_user_invalid_email() {
    let mut payload = natural_user();
    payload["email"] = json!("ana.example.com");
    let (status, body) = send(&app(), "POST", "/cliente/usuarios", Some(payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_create_user_duplicate_email() {
    let app = app();
    send(&app, "POST", "/cliente/usuarios", Some(natural_user())).await;
    let (status, body) = send(&app, "POST", "/cliente/usuarios", Some(natural_user())).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_create_user_requires_payment_method_when_enabled() {
    let app = app_with_factory(UserFactory::new(true));
    let mut payload = natural_user();
    payload["metodos_pago"] = json!([]);
    let (status, body) = send(&app, "POST", "/cliente/usuarios", Some(payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"]["message"],
        "El usuario debe tener al menos un método de pago válido"
    );
}

#[tokio::test]
async fn test_malformed_json() {
    let request = Request::builder()
        .method("POST")
        .uri("/cliente/usuarios")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_user_by_id_and_email() {
    let app = app();
    let (_, created) = send(&app, "POST", "/cliente/usuarios", Some(natural_user())).await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = send(&app, "GET", &format!("/cliente/usuarios/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, created);

    let (status, body) = send(&app, "GET", "/cliente/usuarios/email/ana@example.com", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], created["id"]);
}

#[tokio::test]
async fn test_get_user_invalid_id() {
    let (status, body) = send(&app(), "GET", "/cliente/usuarios/not-a-uuid", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "ID de usuario inválido");
}

#[tokio::test]
async fn test_get_user_not_found() {
    let uri = format!("/cliente/usuarios/{}", Uuid::new_v4());
    let (status, body) = send(&app(), "GET", &uri, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, _) = send(&app(), "GET", "/cliente/usuarios/email/nadie@example.com", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_users() {
    let app = app();
    send(&app, "POST", "/cliente/usuarios", Some(natural_user())).await;
    let mut other = natural_user();
    other["email"] = json!("luis@example.com");
    send(&app, "POST", "/cliente/usuarios", Some(other)).await;

    let (status, body) = send(&app, "GET", "/cliente/usuarios", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_update_user() {
    let app = app();
    let (_, created) = send(&app, "POST", "/cliente/usuarios", Some(natural_user())).await;
    let id = created["id"].as_str().unwrap();

    let update = json!({
        "nombre": "Ana María Gómez Rojas",
        "metodos_pago": [{
            "tipo": "transferencia_bancaria",
            "nombre": "Cuenta corriente",
            "token_seguridad": "tok_bank"
        }]
    });
    let uri = format!("/cliente/usuarios/{}", id);
    let (status, body) = send(&app, "PUT", &uri, Some(update)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nombre"], "Ana María Gómez Rojas");
    assert_eq!(body["email"], "ana@example.com");
    assert_eq!(body["cedula"], "1020304050");
    assert_eq!(body["metodos_pago"].as_array().unwrap().len(), 1);
    assert_eq!(body["metodos_pago"][0]["tipo"], "transferencia_bancaria");
}

#[tokio::test]
async fn test_update_user_mismatched_id() {
    let app = app();
    let (_, created) = send(&app, "POST", "/cliente/usuarios", Some(natural_user())).await;
    let id = created["id"].as_str().unwrap();

    let update = json!({ "id": Uuid::new_v4().to_string(), "nombre": "Ana Rojas" });
    let uri = format!("/cliente/usuarios/{}", id);
    let (status, body) = send(&app, "PUT", &uri, Some(update)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"]["message"],
        "El ID del path no coincide con el del body"
    );
}

#[tokio::test]
async fn test_delete_user() {
    let app = app();
    let (_, created) = send(&app, "POST", "/cliente/usuarios", Some(natural_user())).await;
    let uri = format!("/cliente/usuarios/{}", created["id"].as_str().unwrap());

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Usuario eliminado correctamente");

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Payment Method Tests
// =============================================================================

#[tokio::test]
async fn test_payment_method_lifecycle() {
    let app = app();
    let (_, created) = send(&app, "POST", "/cliente/usuarios", Some(natural_user())).await;
    let id = created["id"].as_str().unwrap();

    let method = json!({
        "tipo": "tarjeta_debito",
        "nombre": "Débito",
        "token_seguridad": "tok_debit",
        "datos_ofuscados": "Mastercard ****5100"
    });
    let uri = format!("/cliente/usuarios/{}/metodos_pago", id);
    let (status, body) = send(&app, "POST", &uri, Some(method)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["metodos_pago"].as_array().unwrap().len(), 2);

    let method_id = body["metodos_pago"][1]["id"].as_str().unwrap().to_string();
    let uri = format!("/cliente/usuarios/{}/metodos_pago/{}", id, method_id);
    let (status, body) = send(&app, "PUT", &uri, Some(json!({ "nombre": "Débito viajes" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metodos_pago"][1]["nombre"], "Débito viajes");

    let uri = format!(
        "/cliente/usuarios/{}/metodos_pago/{}/desactivar",
        id, method_id
    );
    let (status, body) = send(&app, "POST", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metodos_pago"][1]["activo"], false);
    assert_eq!(body["metodos_pago"][0]["activo"], true);
}

#[tokio::test]
async fn test_rename_payment_method_empty_name() {
    let app = app();
    let (_, created) = send(&app, "POST", "/cliente/usuarios", Some(natural_user())).await;
    let uri = format!(
        "/cliente/usuarios/{}/metodos_pago/{}",
        created["id"].as_str().unwrap(),
        created["metodos_pago"][0]["id"].as_str().unwrap()
    );

    let (status, body) = send(&app, "PUT", &uri, Some(json!({ "nombre": "" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "El nombre no puede estar vacío");
}

#[tokio::test]
async fn test_invalid_payment_type() {
    let app = app();
    let (_, created) = send(&app, "POST", "/cliente/usuarios", Some(natural_user())).await;
    let uri = format!(
        "/cliente/usuarios/{}/metodos_pago",
        created["id"].as_str().unwrap()
    );

    let method = json!({ "tipo": "cheque", "nombre": "Cheque", "token_seguridad": "tok" });
    let (status, body) = send(&app, "POST", &uri, Some(method)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_openapi_document_served() {
    let (status, body) = send(&app(), "GET", "/api-docs/openapi.json", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/cliente/usuarios"].is_object());
}
