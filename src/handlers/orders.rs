// src/handlers/orders.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    db::order_repo::OrderFilter,
    middleware::{auth::AuthenticatedUser, i18n::Locale, tenancy::FranchiseContext},
    models::orders::{NewOrderItem, OrderStatus, PaymentMethod, ServiceOrder, ServiceOrderDetail},
    services::order_service::NewOrder,
};

// ---
// Payloads
// ---

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemPayload {
    /// Vazio para serviços (montagem, ajuste).
    pub product_id: Option<Uuid>,
    #[validate(length(min = 1, message = "validation.required"))]
    #[schema(example = "Lente multifocal Varilux")]
    pub description: String,
    #[validate(range(min = 1, message = "validation.quantity"))]
    #[schema(example = 1)]
    pub quantity: i32,
    #[schema(value_type = f64, example = 600.00)]
    pub unit_price: Decimal,
    #[serde(default)]
    #[schema(value_type = f64, example = 0.00)]
    pub discount: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    pub client_id: Uuid,
    /// Sem valor, usa o perfil de funcionário de quem está logado.
    pub employee_id: Option<Uuid>,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    #[validate(length(min = 1, message = "validation.items_required"), nested)]
    pub items: Vec<OrderItemPayload>,
}

impl From<CreateOrderPayload> for NewOrder {
    fn from(p: CreateOrderPayload) -> Self {
        NewOrder {
            client_id: p.client_id,
            employee_id: p.employee_id,
            payment_method: p.payment_method,
            notes: p.notes,
            items: p
                .items
                .into_iter()
                .map(|item| NewOrderItem {
                    product_id: item.product_id,
                    description: item.description.trim().to_string(),
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    discount: item.discount,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangeStatusPayload {
    pub status: OrderStatus,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct OrderQuery {
    pub status: Option<OrderStatus>,
    pub session_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
}

// ---
// Handlers
// ---

#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Orders",
    request_body = CreateOrderPayload,
    params(("x-franchise-id" = Option<Uuid>, Header, description = "Obrigatório para SUPER_ADMIN")),
    responses(
        (status = 201, description = "Ordem criada no caixa aberto do operador", body = ServiceOrderDetail),
        (status = 422, description = "Sem caixa aberto, estoque insuficiente ou valores inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_order(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    franchise: FranchiseContext,
    Json(payload): Json<CreateOrderPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let order = app_state
        .order_service
        .create_order(franchise.0, &user, payload.into())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(order)))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "Orders",
    params(
        OrderQuery,
        ("x-franchise-id" = Option<Uuid>, Header, description = "Obrigatório para SUPER_ADMIN")
    ),
    responses((status = 200, description = "Ordens de serviço", body = [ServiceOrder])),
    security(("api_jwt" = []))
)]
pub async fn list_orders(
    State(app_state): State<AppState>,
    locale: Locale,
    franchise: FranchiseContext,
    Query(query): Query<OrderQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = OrderFilter {
        status: query.status,
        session_id: query.session_id,
        client_id: query.client_id,
    };

    let orders = app_state
        .order_service
        .list_orders(franchise.0, &filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(orders)))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    tag = "Orders",
    params(
        ("id" = Uuid, Path, description = "ID da ordem"),
        ("x-franchise-id" = Option<Uuid>, Header, description = "Obrigatório para SUPER_ADMIN")
    ),
    responses((status = 200, description = "Ordem com itens", body = ServiceOrderDetail)),
    security(("api_jwt" = []))
)]
pub async fn get_order(
    State(app_state): State<AppState>,
    locale: Locale,
    franchise: FranchiseContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let order = app_state
        .order_service
        .get_order(franchise.0, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(order)))
}

#[utoipa::path(
    patch,
    path = "/api/orders/{id}/status",
    tag = "Orders",
    request_body = ChangeStatusPayload,
    params(
        ("id" = Uuid, Path, description = "ID da ordem"),
        ("x-franchise-id" = Option<Uuid>, Header, description = "Obrigatório para SUPER_ADMIN")
    ),
    responses(
        (status = 200, description = "Status alterado", body = ServiceOrder),
        (status = 409, description = "Caixa da ordem já fechado"),
        (status = 422, description = "Transição não permitida")
    ),
    security(("api_jwt" = []))
)]
pub async fn change_status(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    franchise: FranchiseContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<ChangeStatusPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let order = app_state
        .order_service
        .change_status(franchise.0, &user, id, payload.status)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(order)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(items: serde_json::Value) -> CreateOrderPayload {
        serde_json::from_value(json!({
            "clientId": Uuid::nil(),
            "paymentMethod": "cash",
            "items": items,
        }))
        .unwrap()
    }

    #[test]
    fn empty_item_list_is_a_field_error() {
        let errors = payload(json!([])).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("items"));
    }

    #[test]
    fn oversized_price_passes_shape_validation_but_not_amount_checks() {
        let order = payload(json!([{ "description": "Lente", "quantity": 2, "unitPrice": 7e28 }]));
        assert!(order.validate().is_ok());

        let order: NewOrder = order.into();
        assert_eq!(order.items[0].check_amounts(), Err("unitPrice"));
    }
}
