// src/handlers/admin.rs
//
// Rotas globais do SUPER_ADMIN: franquias, usuários e planos.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{RequireRole, SuperAdminOnly},
    },
    models::{
        auth::{CreateUserPayload, User},
        franchise::{Franchise, FranchiseData, FranchiseStatus},
        subscription::{Subscription, SubscriptionPlan, SubscriptionStatus},
    },
};

// ---
// Payloads
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FranchisePayload {
    #[validate(length(min = 1, message = "validation.required"))]
    #[schema(example = "Ótica Centro")]
    pub name: String,

    /// Aceita com ou sem pontuação.
    #[validate(length(min = 14, max = 18, message = "validation.cnpj"))]
    #[schema(example = "12.345.678/0001-99")]
    pub cnpj: String,

    pub address: Option<String>,
    pub city: Option<String>,

    #[validate(length(equal = 2, message = "validation.state"))]
    #[schema(example = "PR")]
    pub state: Option<String>,

    pub phone: Option<String>,

    #[validate(email(message = "validation.email"))]
    pub email: Option<String>,
}

impl From<FranchisePayload> for FranchiseData {
    fn from(p: FranchisePayload) -> Self {
        FranchiseData {
            name: p.name,
            cnpj: p.cnpj,
            address: p.address,
            city: p.city,
            state: p.state,
            phone: p.phone,
            email: p.email,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FranchiseStatusPayload {
    pub status: FranchiseStatus,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlanPayload {
    #[validate(length(min = 1, message = "validation.required"))]
    #[schema(example = "Franquia Plus")]
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = f64, example = 249.90)]
    pub monthly_price: Decimal,
    pub max_users: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignSubscriptionPayload {
    pub plan_id: Uuid,
    pub status: SubscriptionStatus,
    /// Sem valor, o período vai até daqui a 30 dias.
    pub current_period_end: Option<DateTime<Utc>>,
    pub external_reference: Option<String>,
}

// ---
// Franquias
// ---

#[utoipa::path(
    post,
    path = "/api/admin/franchises",
    tag = "Admin",
    request_body = FranchisePayload,
    responses(
        (status = 201, description = "Franquia criada (com avaliação, se houver plano ativo)", body = Franchise),
        (status = 409, description = "CNPJ já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_franchise(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<SuperAdminOnly>,
    Json(payload): Json<FranchisePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let franchise = app_state
        .franchise_service
        .create_franchise(payload.into())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(franchise)))
}

#[utoipa::path(
    get,
    path = "/api/admin/franchises",
    tag = "Admin",
    responses((status = 200, description = "Todas as franquias", body = [Franchise])),
    security(("api_jwt" = []))
)]
pub async fn list_franchises(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<SuperAdminOnly>,
) -> Result<impl IntoResponse, ApiError> {
    let franchises = app_state
        .franchise_service
        .list_franchises()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(franchises)))
}

#[utoipa::path(
    get,
    path = "/api/admin/franchises/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID da franquia")),
    responses(
        (status = 200, description = "Franquia", body = Franchise),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_franchise(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<SuperAdminOnly>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let franchise = app_state
        .franchise_service
        .get_franchise(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(franchise)))
}

#[utoipa::path(
    put,
    path = "/api/admin/franchises/{id}",
    tag = "Admin",
    request_body = FranchisePayload,
    params(("id" = Uuid, Path, description = "ID da franquia")),
    responses((status = 200, description = "Franquia atualizada", body = Franchise)),
    security(("api_jwt" = []))
)]
pub async fn update_franchise(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<SuperAdminOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<FranchisePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let franchise = app_state
        .franchise_service
        .update_franchise(id, payload.into())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(franchise)))
}

#[utoipa::path(
    patch,
    path = "/api/admin/franchises/{id}/status",
    tag = "Admin",
    request_body = FranchiseStatusPayload,
    params(("id" = Uuid, Path, description = "ID da franquia")),
    responses((status = 200, description = "Status alterado", body = Franchise)),
    security(("api_jwt" = []))
)]
pub async fn set_franchise_status(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<SuperAdminOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<FranchiseStatusPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let franchise = app_state
        .franchise_service
        .set_status(id, payload.status)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(franchise)))
}

// ---
// Usuários (qualquer franquia)
// ---

#[utoipa::path(
    post,
    path = "/api/admin/users",
    tag = "Admin",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "Usuário criado", body = User),
        (status = 409, description = "E-mail já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(actor): AuthenticatedUser,
    _guard: RequireRole<SuperAdminOnly>,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let user = app_state
        .user_service
        .create_user(&actor, None, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Admin",
    responses((status = 200, description = "Todos os usuários", body = [User])),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<SuperAdminOnly>,
) -> Result<impl IntoResponse, ApiError> {
    let users = app_state
        .user_service
        .list_users(None)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(users)))
}

// ---
// Planos e assinaturas
// ---

#[utoipa::path(
    post,
    path = "/api/admin/subscription-plans",
    tag = "Admin",
    request_body = CreatePlanPayload,
    responses(
        (status = 201, description = "Plano criado", body = SubscriptionPlan),
        (status = 409, description = "Nome já usado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_plan(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<SuperAdminOnly>,
    Json(payload): Json<CreatePlanPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let plan = app_state
        .subscription_service
        .create_plan(
            &payload.name,
            payload.description.as_deref(),
            payload.monthly_price,
            payload.max_users,
        )
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(plan)))
}

#[utoipa::path(
    put,
    path = "/api/admin/franchises/{id}/subscription",
    tag = "Admin",
    request_body = AssignSubscriptionPayload,
    params(("id" = Uuid, Path, description = "ID da franquia")),
    responses((status = 200, description = "Assinatura definida", body = Subscription)),
    security(("api_jwt" = []))
)]
pub async fn assign_subscription(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<SuperAdminOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignSubscriptionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let sub = app_state
        .subscription_service
        .assign(
            id,
            payload.plan_id,
            payload.status,
            payload.current_period_end,
            payload.external_reference.as_deref(),
        )
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(sub)))
}
