// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

// Resumo do Dia (Os Cards do Topo)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub sales_today: Decimal,          // Ordens não canceladas criadas hoje
    pub orders_today: i64,
    pub open_sessions: i64,            // Caixas abertos agora
    pub receivables_due_today: Decimal,
    pub payables_due_today: Decimal,
    pub overdue_titles: i64,
    pub clients: i64,
}
