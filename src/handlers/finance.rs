// src/handlers/finance.rs
//
// Contas a pagar e a receber compartilham a mesma lógica; cada rota só fixa o tipo.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{i18n::Locale, tenancy::FranchiseContext},
    models::{
        finance::{FinancialTitle, NewTitle, TitleFilter, TitleKind, TitleStatus},
        orders::PaymentMethod,
    },
};

// ---
// Payloads
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTitlePayload {
    #[validate(length(min = 1, message = "validation.required"))]
    #[schema(example = "Fornecedor de lentes - NF 1234")]
    pub description: String,
    pub counterparty: Option<String>,
    pub client_id: Option<Uuid>,
    pub category: Option<String>,
    #[schema(value_type = f64, example = 500.00)]
    pub amount: Decimal,
    #[schema(value_type = String, format = Date, example = "2025-12-31")]
    pub due_date: NaiveDate,
    pub notes: Option<String>,
}

impl From<CreateTitlePayload> for NewTitle {
    fn from(p: CreateTitlePayload) -> Self {
        NewTitle {
            description: p.description.trim().to_string(),
            counterparty: p.counterparty,
            client_id: p.client_id,
            category: p.category,
            amount: p.amount,
            due_date: p.due_date,
            notes: p.notes,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayTitlePayload {
    pub payment_method: PaymentMethod,
    /// Sem valor, considera o momento da chamada.
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct TitleQuery {
    pub status: Option<TitleStatus>,
    #[param(value_type = Option<String>, format = Date)]
    pub due_from: Option<NaiveDate>,
    #[param(value_type = Option<String>, format = Date)]
    pub due_to: Option<NaiveDate>,
}

impl From<TitleQuery> for TitleFilter {
    fn from(q: TitleQuery) -> Self {
        TitleFilter {
            status: q.status,
            due_from: q.due_from,
            due_to: q.due_to,
        }
    }
}

// ---
// Lógica comum aos dois tipos
// ---

async fn create_title(
    app_state: AppState,
    locale: Locale,
    franchise: FranchiseContext,
    kind: TitleKind,
    payload: CreateTitlePayload,
) -> Result<(StatusCode, Json<FinancialTitle>), ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let title = app_state
        .finance_service
        .create_title(franchise.0, kind, payload.into())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(title)))
}

async fn list_titles(
    app_state: AppState,
    locale: Locale,
    franchise: FranchiseContext,
    kind: TitleKind,
    query: TitleQuery,
) -> Result<(StatusCode, Json<Vec<FinancialTitle>>), ApiError> {
    let titles = app_state
        .finance_service
        .list_titles(franchise.0, kind, &query.into())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(titles)))
}

async fn pay_title(
    app_state: AppState,
    locale: Locale,
    franchise: FranchiseContext,
    kind: TitleKind,
    id: Uuid,
    payload: PayTitlePayload,
) -> Result<(StatusCode, Json<FinancialTitle>), ApiError> {
    let title = app_state
        .finance_service
        .pay_title(franchise.0, kind, id, payload.payment_method, payload.paid_at)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(title)))
}

async fn cancel_title(
    app_state: AppState,
    locale: Locale,
    franchise: FranchiseContext,
    kind: TitleKind,
    id: Uuid,
) -> Result<(StatusCode, Json<FinancialTitle>), ApiError> {
    let title = app_state
        .finance_service
        .cancel_title(franchise.0, kind, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(title)))
}

// ---
// Contas a pagar
// ---

#[utoipa::path(
    post,
    path = "/api/payables",
    tag = "Finance",
    request_body = CreateTitlePayload,
    params(("x-franchise-id" = Option<Uuid>, Header, description = "Obrigatório para SUPER_ADMIN")),
    responses((status = 201, description = "Conta a pagar criada", body = FinancialTitle)),
    security(("api_jwt" = []))
)]
pub async fn create_payable(
    State(app_state): State<AppState>,
    locale: Locale,
    franchise: FranchiseContext,
    Json(payload): Json<CreateTitlePayload>,
) -> Result<impl IntoResponse, ApiError> {
    create_title(app_state, locale, franchise, TitleKind::Payable, payload).await
}

#[utoipa::path(
    get,
    path = "/api/payables",
    tag = "Finance",
    params(
        TitleQuery,
        ("x-franchise-id" = Option<Uuid>, Header, description = "Obrigatório para SUPER_ADMIN")
    ),
    responses((status = 200, description = "Contas a pagar", body = [FinancialTitle])),
    security(("api_jwt" = []))
)]
pub async fn list_payables(
    State(app_state): State<AppState>,
    locale: Locale,
    franchise: FranchiseContext,
    Query(query): Query<TitleQuery>,
) -> Result<impl IntoResponse, ApiError> {
    list_titles(app_state, locale, franchise, TitleKind::Payable, query).await
}

#[utoipa::path(
    post,
    path = "/api/payables/{id}/pay",
    tag = "Finance",
    request_body = PayTitlePayload,
    params(
        ("id" = Uuid, Path, description = "ID do título"),
        ("x-franchise-id" = Option<Uuid>, Header, description = "Obrigatório para SUPER_ADMIN")
    ),
    responses(
        (status = 200, description = "Conta paga", body = FinancialTitle),
        (status = 409, description = "Título já pago ou cancelado")
    ),
    security(("api_jwt" = []))
)]
pub async fn pay_payable(
    State(app_state): State<AppState>,
    locale: Locale,
    franchise: FranchiseContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<PayTitlePayload>,
) -> Result<impl IntoResponse, ApiError> {
    pay_title(app_state, locale, franchise, TitleKind::Payable, id, payload).await
}

#[utoipa::path(
    post,
    path = "/api/payables/{id}/cancel",
    tag = "Finance",
    params(
        ("id" = Uuid, Path, description = "ID do título"),
        ("x-franchise-id" = Option<Uuid>, Header, description = "Obrigatório para SUPER_ADMIN")
    ),
    responses(
        (status = 200, description = "Conta cancelada", body = FinancialTitle),
        (status = 409, description = "Título já pago ou cancelado")
    ),
    security(("api_jwt" = []))
)]
pub async fn cancel_payable(
    State(app_state): State<AppState>,
    locale: Locale,
    franchise: FranchiseContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    cancel_title(app_state, locale, franchise, TitleKind::Payable, id).await
}

// ---
// Contas a receber
// ---

#[utoipa::path(
    post,
    path = "/api/receivables",
    tag = "Finance",
    request_body = CreateTitlePayload,
    params(("x-franchise-id" = Option<Uuid>, Header, description = "Obrigatório para SUPER_ADMIN")),
    responses((status = 201, description = "Conta a receber criada", body = FinancialTitle)),
    security(("api_jwt" = []))
)]
pub async fn create_receivable(
    State(app_state): State<AppState>,
    locale: Locale,
    franchise: FranchiseContext,
    Json(payload): Json<CreateTitlePayload>,
) -> Result<impl IntoResponse, ApiError> {
    create_title(app_state, locale, franchise, TitleKind::Receivable, payload).await
}

#[utoipa::path(
    get,
    path = "/api/receivables",
    tag = "Finance",
    params(
        TitleQuery,
        ("x-franchise-id" = Option<Uuid>, Header, description = "Obrigatório para SUPER_ADMIN")
    ),
    responses((status = 200, description = "Contas a receber", body = [FinancialTitle])),
    security(("api_jwt" = []))
)]
pub async fn list_receivables(
    State(app_state): State<AppState>,
    locale: Locale,
    franchise: FranchiseContext,
    Query(query): Query<TitleQuery>,
) -> Result<impl IntoResponse, ApiError> {
    list_titles(app_state, locale, franchise, TitleKind::Receivable, query).await
}

#[utoipa::path(
    post,
    path = "/api/receivables/{id}/pay",
    tag = "Finance",
    request_body = PayTitlePayload,
    params(
        ("id" = Uuid, Path, description = "ID do título"),
        ("x-franchise-id" = Option<Uuid>, Header, description = "Obrigatório para SUPER_ADMIN")
    ),
    responses(
        (status = 200, description = "Conta recebida", body = FinancialTitle),
        (status = 409, description = "Título já pago ou cancelado")
    ),
    security(("api_jwt" = []))
)]
pub async fn pay_receivable(
    State(app_state): State<AppState>,
    locale: Locale,
    franchise: FranchiseContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<PayTitlePayload>,
) -> Result<impl IntoResponse, ApiError> {
    pay_title(app_state, locale, franchise, TitleKind::Receivable, id, payload).await
}

#[utoipa::path(
    post,
    path = "/api/receivables/{id}/cancel",
    tag = "Finance",
    params(
        ("id" = Uuid, Path, description = "ID do título"),
        ("x-franchise-id" = Option<Uuid>, Header, description = "Obrigatório para SUPER_ADMIN")
    ),
    responses(
        (status = 200, description = "Conta cancelada", body = FinancialTitle),
        (status = 409, description = "Título já pago ou cancelado")
    ),
    security(("api_jwt" = []))
)]
pub async fn cancel_receivable(
    State(app_state): State<AppState>,
    locale: Locale,
    franchise: FranchiseContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    cancel_title(app_state, locale, franchise, TitleKind::Receivable, id).await
}
