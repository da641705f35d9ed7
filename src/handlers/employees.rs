// src/handlers/employees.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{ManagerOnly, RequireRole},
        tenancy::FranchiseContext,
    },
    models::employee::{Employee, EmployeeData},
};

// ---
// Payloads
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePayload {
    #[validate(length(min = 1, message = "validation.required"))]
    #[schema(example = "Ana Lima")]
    pub full_name: String,
    #[schema(example = "Optometrista")]
    pub position: Option<String>,
    pub document_number: Option<String>,
    #[schema(value_type = Option<String>, format = Date, example = "2024-03-01")]
    pub hire_date: Option<NaiveDate>,
    #[schema(value_type = Option<f64>, example = 2800.00)]
    pub salary: Option<Decimal>,
    /// Percentual sobre as vendas (0 a 100).
    #[schema(value_type = Option<f64>, example = 3.5)]
    pub commission_rate: Option<Decimal>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl From<EmployeePayload> for EmployeeData {
    fn from(p: EmployeePayload) -> Self {
        EmployeeData {
            full_name: p.full_name.trim().to_string(),
            position: p.position,
            document_number: p.document_number,
            hire_date: p.hire_date,
            salary: p.salary,
            commission_rate: p.commission_rate,
            is_active: p.is_active,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeePayload {
    /// Usuário da franquia que ganha o perfil.
    pub user_id: Uuid,
    #[serde(flatten)]
    #[validate(nested)]
    pub profile: EmployeePayload,
}

// ---
// Handlers
// ---

#[utoipa::path(
    post,
    path = "/api/employees",
    tag = "Employees",
    request_body = CreateEmployeePayload,
    params(("x-franchise-id" = Option<Uuid>, Header, description = "Obrigatório para SUPER_ADMIN")),
    responses(
        (status = 201, description = "Funcionário cadastrado", body = Employee),
        (status = 404, description = "Usuário não pertence à franquia"),
        (status = 409, description = "Usuário já tem perfil")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_employee(
    State(app_state): State<AppState>,
    locale: Locale,
    franchise: FranchiseContext,
    _guard: RequireRole<ManagerOnly>,
    Json(payload): Json<CreateEmployeePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let employee = app_state
        .employee_service
        .create_employee(franchise.0, payload.user_id, payload.profile.into())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(employee)))
}

#[utoipa::path(
    get,
    path = "/api/employees",
    tag = "Employees",
    params(("x-franchise-id" = Option<Uuid>, Header, description = "Obrigatório para SUPER_ADMIN")),
    responses((status = 200, description = "Funcionários da franquia", body = [Employee])),
    security(("api_jwt" = []))
)]
pub async fn list_employees(
    State(app_state): State<AppState>,
    locale: Locale,
    franchise: FranchiseContext,
) -> Result<impl IntoResponse, ApiError> {
    let employees = app_state
        .employee_service
        .list_employees(franchise.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(employees)))
}

#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    tag = "Employees",
    params(
        ("id" = Uuid, Path, description = "ID do funcionário"),
        ("x-franchise-id" = Option<Uuid>, Header, description = "Obrigatório para SUPER_ADMIN")
    ),
    responses((status = 200, description = "Funcionário", body = Employee)),
    security(("api_jwt" = []))
)]
pub async fn get_employee(
    State(app_state): State<AppState>,
    locale: Locale,
    franchise: FranchiseContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let employee = app_state
        .employee_service
        .get_employee(franchise.0, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(employee)))
}

#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    tag = "Employees",
    request_body = EmployeePayload,
    params(
        ("id" = Uuid, Path, description = "ID do funcionário"),
        ("x-franchise-id" = Option<Uuid>, Header, description = "Obrigatório para SUPER_ADMIN")
    ),
    responses((status = 200, description = "Funcionário atualizado", body = Employee)),
    security(("api_jwt" = []))
)]
pub async fn update_employee(
    State(app_state): State<AppState>,
    locale: Locale,
    franchise: FranchiseContext,
    _guard: RequireRole<ManagerOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<EmployeePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let employee = app_state
        .employee_service
        .update_employee(franchise.0, id, payload.into())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(employee)))
}
