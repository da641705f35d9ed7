// src/handlers/clients.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{i18n::Locale, tenancy::FranchiseContext},
    models::client::{Client, ClientData},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientPayload {
    #[validate(length(min = 1, message = "validation.required"))]
    #[schema(example = "Carlos Pereira")]
    pub full_name: String,
    #[schema(example = "123.456.789-09")]
    pub cpf: Option<String>,
    #[validate(email(message = "validation.email"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    #[schema(value_type = Option<String>, format = Date, example = "1985-07-21")]
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl From<ClientPayload> for ClientData {
    fn from(p: ClientPayload) -> Self {
        ClientData {
            full_name: p.full_name,
            cpf: p.cpf,
            email: p.email,
            phone: p.phone,
            birth_date: p.birth_date,
            address: p.address,
            notes: p.notes,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ClientSearch {
    /// Nome, CPF, e-mail ou telefone.
    pub search: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/clients",
    tag = "Clients",
    request_body = ClientPayload,
    params(("x-franchise-id" = Option<Uuid>, Header, description = "Obrigatório para SUPER_ADMIN")),
    responses(
        (status = 201, description = "Cliente cadastrado", body = Client),
        (status = 409, description = "CPF já cadastrado na franquia")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_client(
    State(app_state): State<AppState>,
    locale: Locale,
    franchise: FranchiseContext,
    Json(payload): Json<ClientPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let client = app_state
        .client_service
        .create_client(franchise.0, payload.into())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(client)))
}

#[utoipa::path(
    get,
    path = "/api/clients",
    tag = "Clients",
    params(
        ClientSearch,
        ("x-franchise-id" = Option<Uuid>, Header, description = "Obrigatório para SUPER_ADMIN")
    ),
    responses((status = 200, description = "Clientes da franquia", body = [Client])),
    security(("api_jwt" = []))
)]
pub async fn list_clients(
    State(app_state): State<AppState>,
    locale: Locale,
    franchise: FranchiseContext,
    Query(query): Query<ClientSearch>,
) -> Result<impl IntoResponse, ApiError> {
    let clients = app_state
        .client_service
        .list_clients(franchise.0, query.search.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(clients)))
}

#[utoipa::path(
    get,
    path = "/api/clients/{id}",
    tag = "Clients",
    params(
        ("id" = Uuid, Path, description = "ID do cliente"),
        ("x-franchise-id" = Option<Uuid>, Header, description = "Obrigatório para SUPER_ADMIN")
    ),
    responses((status = 200, description = "Cliente", body = Client)),
    security(("api_jwt" = []))
)]
pub async fn get_client(
    State(app_state): State<AppState>,
    locale: Locale,
    franchise: FranchiseContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let client = app_state
        .client_service
        .get_client(franchise.0, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(client)))
}

#[utoipa::path(
    put,
    path = "/api/clients/{id}",
    tag = "Clients",
    request_body = ClientPayload,
    params(
        ("id" = Uuid, Path, description = "ID do cliente"),
        ("x-franchise-id" = Option<Uuid>, Header, description = "Obrigatório para SUPER_ADMIN")
    ),
    responses((status = 200, description = "Cliente atualizado", body = Client)),
    security(("api_jwt" = []))
)]
pub async fn update_client(
    State(app_state): State<AppState>,
    locale: Locale,
    franchise: FranchiseContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<ClientPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let client = app_state
        .client_service
        .update_client(franchise.0, id, payload.into())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(client)))
}

#[utoipa::path(
    delete,
    path = "/api/clients/{id}",
    tag = "Clients",
    params(
        ("id" = Uuid, Path, description = "ID do cliente"),
        ("x-franchise-id" = Option<Uuid>, Header, description = "Obrigatório para SUPER_ADMIN")
    ),
    responses(
        (status = 204, description = "Cliente removido"),
        (status = 409, description = "Cliente possui ordens ou títulos")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_client(
    State(app_state): State<AppState>,
    locale: Locale,
    franchise: FranchiseContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .client_service
        .delete_client(franchise.0, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
