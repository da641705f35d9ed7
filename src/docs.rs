// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(title = "Ótica Backoffice API", description = "Retaguarda multi-franquia para óticas"),
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Admin ---
        handlers::admin::create_franchise,
        handlers::admin::list_franchises,
        handlers::admin::get_franchise,
        handlers::admin::update_franchise,
        handlers::admin::set_franchise_status,
        handlers::admin::create_user,
        handlers::admin::list_users,
        handlers::admin::create_plan,
        handlers::admin::assign_subscription,

        // --- Users ---
        handlers::users::create_user,
        handlers::users::list_users,
        handlers::users::set_user_active,

        // --- Employees ---
        handlers::employees::create_employee,
        handlers::employees::list_employees,
        handlers::employees::get_employee,
        handlers::employees::update_employee,

        // --- Clients ---
        handlers::clients::create_client,
        handlers::clients::list_clients,
        handlers::clients::get_client,
        handlers::clients::update_client,
        handlers::clients::delete_client,

        // --- Products ---
        handlers::products::create_product,
        handlers::products::list_products,
        handlers::products::get_product,
        handlers::products::update_product,
        handlers::products::adjust_stock,

        // --- Cashier ---
        handlers::cashier::open_session,
        handlers::cashier::current_session,
        handlers::cashier::close_session,
        handlers::cashier::list_sessions,
        handlers::cashier::get_session,
        handlers::cashier::reconcile_session,

        // --- Orders ---
        handlers::orders::create_order,
        handlers::orders::list_orders,
        handlers::orders::get_order,
        handlers::orders::change_status,

        // --- Finance ---
        handlers::finance::create_payable,
        handlers::finance::list_payables,
        handlers::finance::pay_payable,
        handlers::finance::cancel_payable,
        handlers::finance::create_receivable,
        handlers::finance::list_receivables,
        handlers::finance::pay_receivable,
        handlers::finance::cancel_receivable,

        // --- Subscriptions ---
        handlers::subscriptions::list_plans,
        handlers::subscriptions::current_subscription,

        // --- Dashboard ---
        handlers::dashboard::get_summary,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::auth::CreateUserPayload,
            models::auth::SetUserActivePayload,

            // --- Franquias / Assinaturas ---
            models::franchise::FranchiseStatus,
            models::franchise::Franchise,
            models::subscription::SubscriptionStatus,
            models::subscription::SubscriptionPlan,
            models::subscription::Subscription,

            // --- Cadastros ---
            models::employee::Employee,
            models::client::Client,
            models::product::Product,

            // --- Caixa / Ordens ---
            models::cashier::CashierSessionStatus,
            models::cashier::CashierSession,
            models::cashier::CashierSessionDetail,
            models::cashier::SessionTotals,
            models::cashier::SessionDrift,
            models::orders::OrderStatus,
            models::orders::PaymentMethod,
            models::orders::ServiceOrder,
            models::orders::ServiceOrderItem,
            models::orders::ServiceOrderDetail,

            // --- Financeiro ---
            models::finance::TitleKind,
            models::finance::TitleStatus,
            models::finance::FinancialTitle,

            // --- Dashboard ---
            models::dashboard::DashboardSummary,

            // --- Payloads ---
            handlers::admin::FranchisePayload,
            handlers::admin::FranchiseStatusPayload,
            handlers::admin::CreatePlanPayload,
            handlers::admin::AssignSubscriptionPayload,
            handlers::employees::EmployeePayload,
            handlers::employees::CreateEmployeePayload,
            handlers::clients::ClientPayload,
            handlers::products::ProductPayload,
            handlers::products::StockAdjustmentPayload,
            handlers::cashier::OpenSessionPayload,
            handlers::cashier::CloseSessionPayload,
            handlers::orders::OrderItemPayload,
            handlers::orders::CreateOrderPayload,
            handlers::orders::ChangeStatusPayload,
            handlers::finance::CreateTitlePayload,
            handlers::finance::PayTitlePayload,
        )
    ),
    tags(
        (name = "Auth", description = "Login e dados do usuário logado"),
        (name = "Admin", description = "Gestão da plataforma (franquias, planos, usuários)"),
        (name = "Users", description = "Usuários da franquia"),
        (name = "Employees", description = "Funcionários e comissões"),
        (name = "Clients", description = "Cadastro de clientes"),
        (name = "Products", description = "Produtos e estoque"),
        (name = "Cashier", description = "Abertura, fechamento e conferência de caixa"),
        (name = "Orders", description = "Ordens de serviço"),
        (name = "Finance", description = "Contas a pagar e a receber"),
        (name = "Subscriptions", description = "Planos e assinatura da franquia"),
        (name = "Dashboard", description = "Indicadores do dia")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme("api_jwt", SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route_group() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/auth/login",
            "/api/admin/franchises",
            "/api/cashier/sessions/{id}/close",
            "/api/orders/{id}/status",
            "/api/payables/{id}/pay",
            "/api/receivables",
            "/api/dashboard/summary",
        ] {
            assert!(doc.paths.paths.contains_key(path), "faltando {path}");
        }
    }

    #[test]
    fn registers_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("api_jwt"));
    }
}
