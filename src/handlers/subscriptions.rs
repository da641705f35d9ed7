// src/handlers/subscriptions.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{i18n::Locale, tenancy::FranchiseContext},
    models::subscription::{Subscription, SubscriptionPlan},
};

#[utoipa::path(
    get,
    path = "/api/subscriptions/plans",
    tag = "Subscriptions",
    responses((status = 200, description = "Planos ativos", body = [SubscriptionPlan])),
    security(("api_jwt" = []))
)]
pub async fn list_plans(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let plans = app_state
        .subscription_service
        .list_plans(true)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(plans)))
}

#[utoipa::path(
    get,
    path = "/api/subscriptions/current",
    tag = "Subscriptions",
    params(("x-franchise-id" = Option<uuid::Uuid>, Header, description = "Obrigatório para SUPER_ADMIN")),
    responses(
        (status = 200, description = "Assinatura da franquia", body = Subscription),
        (status = 404, description = "Franquia sem assinatura")
    ),
    security(("api_jwt" = []))
)]
pub async fn current_subscription(
    State(app_state): State<AppState>,
    locale: Locale,
    franchise: FranchiseContext,
) -> Result<impl IntoResponse, ApiError> {
    let sub = app_state
        .subscription_service
        .current(franchise.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(sub)))
}
