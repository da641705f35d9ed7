// tests/api_auth_tests.rs
//
// Exercita o router sem banco: o pool é lazy e nenhuma das rotas abaixo chega a consultá-lo.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use uuid::Uuid;

use otica_backoffice::{
    config::{AppState, Config},
    models::auth::{Claims, UserRole},
    routes::build_router,
    services::auth::encode_claims,
};

const SECRET: &str = "segredo-de-teste";

fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "JWT_SECRET" => Some(SECRET.to_string()),
        "DATABASE_URL" => Some("postgres://postgres@127.0.0.1:1/inexistente".to_string()),
        _ => None,
    })
    .expect("configuração de teste")
}

fn app() -> Router {
    let config = test_config();
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_lazy(&config.database_url)
        .expect("pool lazy");
    build_router(AppState::from_pool(pool, config).expect("estado"))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.expect("corpo").to_bytes();
    serde_json::from_slice(&bytes).expect("json")
}

#[tokio::test]
async fn health_check_responds_ok() {
    let response = app()
        .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn me_without_token_is_unauthorized() {
    let response = app()
        .oneshot(Request::get("/api/auth/me").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Authentication token is invalid or missing.");
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let response = app()
        .oneshot(
            Request::get("/api/clients")
                .header(header::AUTHORIZATION, "Bearer nao-e-um-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_signed_with_another_secret_is_unauthorized() {
    let now = Utc::now().timestamp() as usize;
    let id = Uuid::new_v4();
    let claims = Claims {
        sub: id,
        id,
        role: UserRole::SuperAdmin,
        franchise_id: None,
        iat: now,
        exp: now + 3600,
    };
    let token = encode_claims(&claims, "outro-segredo").unwrap();

    let response = app()
        .oneshot(
            Request::get("/api/dashboard/summary")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unauthorized_message_follows_accept_language() {
    let response = app()
        .oneshot(
            Request::get("/api/orders")
                .header(header::ACCEPT_LANGUAGE, "pt-BR,pt;q=0.9")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Token de autenticação inválido ou ausente.");
}

#[tokio::test]
async fn invalid_login_payload_is_rejected_before_hitting_the_database() {
    let payload = json!({ "email": "nao-e-email", "password": "123" });
    let response = app()
        .oneshot(
            Request::post("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["details"]["email"].is_array());
    assert!(body["details"]["password"].is_array());
}

#[tokio::test]
async fn openapi_document_is_served() {
    let response = app()
        .oneshot(Request::get("/api/docs/openapi.json").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["paths"]["/api/cashier/open"].is_object());
    assert!(body["components"]["securitySchemes"]["api_jwt"].is_object());
}
