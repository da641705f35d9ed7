// src/handlers/users.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{ManagerOnly, RequireRole},
        tenancy::FranchiseContext,
    },
    models::auth::{CreateUserPayload, SetUserActivePayload, User},
};

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateUserPayload,
    params(("x-franchise-id" = Option<Uuid>, Header, description = "Obrigatório para SUPER_ADMIN")),
    responses(
        (status = 201, description = "Usuário criado na franquia", body = User),
        (status = 403, description = "Cargo não permitido")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(actor): AuthenticatedUser,
    franchise: FranchiseContext,
    _guard: RequireRole<ManagerOnly>,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let user = app_state
        .user_service
        .create_user(&actor, Some(franchise.0), payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    params(("x-franchise-id" = Option<Uuid>, Header, description = "Obrigatório para SUPER_ADMIN")),
    responses((status = 200, description = "Usuários da franquia", body = [User])),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    locale: Locale,
    franchise: FranchiseContext,
    _guard: RequireRole<ManagerOnly>,
) -> Result<impl IntoResponse, ApiError> {
    let users = app_state
        .user_service
        .list_users(Some(franchise.0))
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(users)))
}

#[utoipa::path(
    patch,
    path = "/api/users/{id}/active",
    tag = "Users",
    request_body = SetUserActivePayload,
    params(
        ("id" = Uuid, Path, description = "ID do usuário"),
        ("x-franchise-id" = Option<Uuid>, Header, description = "Obrigatório para SUPER_ADMIN")
    ),
    responses((status = 200, description = "Usuário ativado/desativado", body = User)),
    security(("api_jwt" = []))
)]
pub async fn set_user_active(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(actor): AuthenticatedUser,
    franchise: FranchiseContext,
    _guard: RequireRole<ManagerOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetUserActivePayload>,
) -> Result<impl IntoResponse, ApiError> {
    // Ninguém desativa a si mesmo
    if id == actor.id && !payload.is_active {
        return Err(AppError::Forbidden.to_api_error(&locale, &app_state.i18n_store));
    }

    let user = app_state
        .user_service
        .set_active(franchise.0, id, payload.is_active)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(user)))
}
