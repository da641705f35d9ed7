// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post, put},
    Json, Router,
};
use utoipa::OpenApi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

/// Monta o router completo. Tudo fora de `/api/health`, `/api/docs` e
/// `/api/auth/login` passa pelo `auth_guard`.
pub fn build_router(app_state: AppState) -> Router {
    let guard = || axum_middleware::from_fn_with_state(app_state.clone(), auth_guard);

    // Rotas públicas de autenticação
    let auth_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .merge(Router::new().route("/me", get(handlers::auth::get_me)).layer(guard()));

    // Plataforma (somente SUPER_ADMIN; o papel é checado no handler)
    let admin_routes = Router::new()
        .route(
            "/franchises",
            post(handlers::admin::create_franchise).get(handlers::admin::list_franchises),
        )
        .route(
            "/franchises/{id}",
            get(handlers::admin::get_franchise).put(handlers::admin::update_franchise),
        )
        .route("/franchises/{id}/status", patch(handlers::admin::set_franchise_status))
        .route("/franchises/{id}/subscription", put(handlers::admin::assign_subscription))
        .route(
            "/users",
            post(handlers::admin::create_user).get(handlers::admin::list_users),
        )
        .route("/subscription-plans", post(handlers::admin::create_plan))
        .layer(guard());

    let user_routes = Router::new()
        .route(
            "/",
            post(handlers::users::create_user).get(handlers::users::list_users),
        )
        .route("/{id}/active", patch(handlers::users::set_user_active))
        .layer(guard());

    let employee_routes = Router::new()
        .route(
            "/",
            post(handlers::employees::create_employee).get(handlers::employees::list_employees),
        )
        .route(
            "/{id}",
            get(handlers::employees::get_employee).put(handlers::employees::update_employee),
        )
        .layer(guard());

    let client_routes = Router::new()
        .route(
            "/",
            post(handlers::clients::create_client).get(handlers::clients::list_clients),
        )
        .route(
            "/{id}",
            get(handlers::clients::get_client)
                .put(handlers::clients::update_client)
                .delete(handlers::clients::delete_client),
        )
        .layer(guard());

    let product_routes = Router::new()
        .route(
            "/",
            post(handlers::products::create_product).get(handlers::products::list_products),
        )
        .route(
            "/{id}",
            get(handlers::products::get_product).put(handlers::products::update_product),
        )
        .route("/{id}/stock", post(handlers::products::adjust_stock))
        .layer(guard());

    let cashier_routes = Router::new()
        .route("/open", post(handlers::cashier::open_session))
        .route("/current", get(handlers::cashier::current_session))
        .route("/sessions", get(handlers::cashier::list_sessions))
        .route("/sessions/{id}", get(handlers::cashier::get_session))
        .route("/sessions/{id}/close", post(handlers::cashier::close_session))
        .route("/sessions/{id}/reconcile", post(handlers::cashier::reconcile_session))
        .layer(guard());

    let order_routes = Router::new()
        .route(
            "/",
            post(handlers::orders::create_order).get(handlers::orders::list_orders),
        )
        .route("/{id}", get(handlers::orders::get_order))
        .route("/{id}/status", patch(handlers::orders::change_status))
        .layer(guard());

    let payable_routes = Router::new()
        .route(
            "/",
            post(handlers::finance::create_payable).get(handlers::finance::list_payables),
        )
        .route("/{id}/pay", post(handlers::finance::pay_payable))
        .route("/{id}/cancel", post(handlers::finance::cancel_payable))
        .layer(guard());

    let receivable_routes = Router::new()
        .route(
            "/",
            post(handlers::finance::create_receivable).get(handlers::finance::list_receivables),
        )
        .route("/{id}/pay", post(handlers::finance::pay_receivable))
        .route("/{id}/cancel", post(handlers::finance::cancel_receivable))
        .layer(guard());

    let subscription_routes = Router::new()
        .route("/plans", get(handlers::subscriptions::list_plans))
        .route("/current", get(handlers::subscriptions::current_subscription))
        .layer(guard());

    let dashboard_routes = Router::new()
        .route("/summary", get(handlers::dashboard::get_summary))
        .layer(guard());

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .nest("/api/auth", auth_routes)
        .nest("/api/admin", admin_routes)
        .nest("/api/users", user_routes)
        .nest("/api/employees", employee_routes)
        .nest("/api/clients", client_routes)
        .nest("/api/products", product_routes)
        .nest("/api/cashier", cashier_routes)
        .nest("/api/orders", order_routes)
        .nest("/api/payables", payable_routes)
        .nest("/api/receivables", receivable_routes)
        .nest("/api/subscriptions", subscription_routes)
        .nest("/api/dashboard", dashboard_routes)
        .with_state(app_state)
}
