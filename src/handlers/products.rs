// src/handlers/products.rs

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
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{ManagerOnly, RequireRole},
        tenancy::FranchiseContext,
    },
    models::product::{Product, ProductData},
};

// ---
// Payloads
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    #[validate(length(min = 1, message = "validation.required"))]
    #[schema(example = "ARM-RB-3025")]
    pub sku: String,
    #[validate(length(min = 1, message = "validation.required"))]
    #[schema(example = "Armação Ray-Ban Aviador")]
    pub name: String,
    pub category: Option<String>,
    pub brand: Option<String>,
    #[schema(value_type = f64, example = 689.90)]
    pub price: Decimal,
    #[schema(value_type = Option<f64>, example = 310.00)]
    pub cost: Option<Decimal>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Só usado na criação.
    #[serde(default)]
    pub initial_stock: i32,
}

fn default_active() -> bool {
    true
}

impl ProductPayload {
    fn data(&self) -> ProductData {
        ProductData {
            sku: self.sku.trim().to_string(),
            name: self.name.trim().to_string(),
            category: self.category.clone(),
            brand: self.brand.clone(),
            price: self.price,
            cost: self.cost,
            is_active: self.is_active,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StockAdjustmentPayload {
    /// Positivo para entrada, negativo para baixa.
    #[schema(example = -2)]
    pub delta: i32,
    #[schema(example = "Quebra no laboratório")]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct ProductSearch {
    pub search: Option<String>,
    #[serde(default)]
    pub active_only: bool,
}

// ---
// Handlers
// ---

#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Products",
    request_body = ProductPayload,
    params(("x-franchise-id" = Option<Uuid>, Header, description = "Obrigatório para SUPER_ADMIN")),
    responses(
        (status = 201, description = "Produto cadastrado", body = Product),
        (status = 409, description = "SKU já existe na franquia")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    locale: Locale,
    franchise: FranchiseContext,
    _guard: RequireRole<ManagerOnly>,
    Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let product = app_state
        .product_service
        .create_product(franchise.0, payload.data(), payload.initial_stock)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    params(
        ProductSearch,
        ("x-franchise-id" = Option<Uuid>, Header, description = "Obrigatório para SUPER_ADMIN")
    ),
    responses((status = 200, description = "Produtos da franquia", body = [Product])),
    security(("api_jwt" = []))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    locale: Locale,
    franchise: FranchiseContext,
    Query(query): Query<ProductSearch>,
) -> Result<impl IntoResponse, ApiError> {
    let products = app_state
        .product_service
        .list_products(franchise.0, query.search.as_deref(), query.active_only)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(products)))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "ID do produto"),
        ("x-franchise-id" = Option<Uuid>, Header, description = "Obrigatório para SUPER_ADMIN")
    ),
    responses((status = 200, description = "Produto", body = Product)),
    security(("api_jwt" = []))
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    locale: Locale,
    franchise: FranchiseContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let product = app_state
        .product_service
        .get_product(franchise.0, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(product)))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Products",
    request_body = ProductPayload,
    params(
        ("id" = Uuid, Path, description = "ID do produto"),
        ("x-franchise-id" = Option<Uuid>, Header, description = "Obrigatório para SUPER_ADMIN")
    ),
    responses((status = 200, description = "Produto atualizado", body = Product)),
    security(("api_jwt" = []))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    locale: Locale,
    franchise: FranchiseContext,
    _guard: RequireRole<ManagerOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let product = app_state
        .product_service
        .update_product(franchise.0, id, payload.data())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(product)))
}

#[utoipa::path(
    post,
    path = "/api/products/{id}/stock",
    tag = "Products",
    request_body = StockAdjustmentPayload,
    params(
        ("id" = Uuid, Path, description = "ID do produto"),
        ("x-franchise-id" = Option<Uuid>, Header, description = "Obrigatório para SUPER_ADMIN")
    ),
    responses(
        (status = 200, description = "Estoque ajustado", body = Product),
        (status = 422, description = "Estoque ficaria negativo")
    ),
    security(("api_jwt" = []))
)]
pub async fn adjust_stock(
    State(app_state): State<AppState>,
    locale: Locale,
    franchise: FranchiseContext,
    _guard: RequireRole<ManagerOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StockAdjustmentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let product = app_state
        .product_service
        .adjust_stock(franchise.0, id, payload.delta, payload.reason.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(product)))
}
