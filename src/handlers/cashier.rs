// src/handlers/cashier.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{ManagerOnly, RequireRole},
        tenancy::FranchiseContext,
    },
    models::cashier::{CashierSession, CashierSessionDetail, CashierSessionStatus, SessionDrift},
};

// ---
// Payloads
// ---

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpenSessionPayload {
    /// Troco inicial em dinheiro.
    #[schema(value_type = f64, example = 200.00)]
    pub initial_amount: Decimal,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CloseSessionPayload {
    /// Valor contado na gaveta no fechamento.
    #[schema(value_type = f64, example = 1520.50)]
    pub final_amount: Decimal,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SessionQuery {
    pub status: Option<CashierSessionStatus>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReconcileQuery {
    /// Grava os totais recalculados (padrão: só relata).
    #[serde(default)]
    pub apply: bool,
}

// ---
// Handlers
// ---

#[utoipa::path(
    post,
    path = "/api/cashier/open",
    tag = "Cashier",
    request_body = OpenSessionPayload,
    params(("x-franchise-id" = Option<Uuid>, Header, description = "Obrigatório para SUPER_ADMIN")),
    responses(
        (status = 201, description = "Caixa aberto", body = CashierSession),
        (status = 409, description = "Operador já tem caixa aberto")
    ),
    security(("api_jwt" = []))
)]
pub async fn open_session(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    franchise: FranchiseContext,
    Json(payload): Json<OpenSessionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let session = app_state
        .cashier_service
        .open_session(franchise.0, &user, payload.initial_amount, payload.notes.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(session)))
}

#[utoipa::path(
    get,
    path = "/api/cashier/current",
    tag = "Cashier",
    params(("x-franchise-id" = Option<Uuid>, Header, description = "Obrigatório para SUPER_ADMIN")),
    responses(
        (status = 200, description = "Caixa aberto do operador", body = CashierSession),
        (status = 404, description = "Nenhum caixa aberto")
    ),
    security(("api_jwt" = []))
)]
pub async fn current_session(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    franchise: FranchiseContext,
) -> Result<impl IntoResponse, ApiError> {
    let session = app_state
        .cashier_service
        .current_session(franchise.0, user.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(session)))
}

#[utoipa::path(
    post,
    path = "/api/cashier/sessions/{id}/close",
    tag = "Cashier",
    request_body = CloseSessionPayload,
    params(
        ("id" = Uuid, Path, description = "ID da sessão de caixa"),
        ("x-franchise-id" = Option<Uuid>, Header, description = "Obrigatório para SUPER_ADMIN")
    ),
    responses(
        (status = 200, description = "Caixa fechado com diferença apurada", body = CashierSession),
        (status = 403, description = "Só o operador ou um gerente fecha o caixa"),
        (status = 409, description = "Caixa já fechado")
    ),
    security(("api_jwt" = []))
)]
pub async fn close_session(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    franchise: FranchiseContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<CloseSessionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let session = app_state
        .cashier_service
        .close_session(franchise.0, &user, id, payload.final_amount, payload.notes.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(session)))
}

#[utoipa::path(
    get,
    path = "/api/cashier/sessions",
    tag = "Cashier",
    params(
        SessionQuery,
        ("x-franchise-id" = Option<Uuid>, Header, description = "Obrigatório para SUPER_ADMIN")
    ),
    responses((status = 200, description = "Sessões de caixa", body = [CashierSession])),
    security(("api_jwt" = []))
)]
pub async fn list_sessions(
    State(app_state): State<AppState>,
    locale: Locale,
    franchise: FranchiseContext,
    Query(query): Query<SessionQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let sessions = app_state
        .cashier_service
        .list_sessions(franchise.0, query.status)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(sessions)))
}

#[utoipa::path(
    get,
    path = "/api/cashier/sessions/{id}",
    tag = "Cashier",
    params(
        ("id" = Uuid, Path, description = "ID da sessão de caixa"),
        ("x-franchise-id" = Option<Uuid>, Header, description = "Obrigatório para SUPER_ADMIN")
    ),
    responses((status = 200, description = "Sessão com suas ordens", body = CashierSessionDetail)),
    security(("api_jwt" = []))
)]
pub async fn get_session(
    State(app_state): State<AppState>,
    locale: Locale,
    franchise: FranchiseContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = app_state
        .cashier_service
        .session_detail(franchise.0, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(detail)))
}

#[utoipa::path(
    post,
    path = "/api/cashier/sessions/{id}/reconcile",
    tag = "Cashier",
    params(
        ("id" = Uuid, Path, description = "ID da sessão de caixa"),
        ReconcileQuery,
        ("x-franchise-id" = Option<Uuid>, Header, description = "Obrigatório para SUPER_ADMIN")
    ),
    responses((status = 200, description = "Divergência encontrada", body = SessionDrift)),
    security(("api_jwt" = []))
)]
pub async fn reconcile_session(
    State(app_state): State<AppState>,
    locale: Locale,
    franchise: FranchiseContext,
    _guard: RequireRole<ManagerOnly>,
    Path(id): Path<Uuid>,
    Query(query): Query<ReconcileQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let drift = app_state
        .cashier_service
        .reconcile_session(franchise.0, id, query.apply)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(drift)))
}
