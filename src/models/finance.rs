// src/models/finance.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use utoipa::ToSchema;

use crate::models::orders::PaymentMethod;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "title_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TitleKind {
    Payable,    // A Pagar
    Receivable, // A Receber
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "title_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TitleStatus {
    Pending,   // Aberto
    Paid,      // Quitado
    Overdue,   // Vencido
    Cancelled, // Cancelado
}

impl TitleStatus {
    /// Título em aberto com vencimento no passado está vencido.
    pub fn effective(self, due_date: NaiveDate, today: NaiveDate) -> TitleStatus {
        match self {
            TitleStatus::Pending if due_date < today => TitleStatus::Overdue,
            other => other,
        }
    }

    pub fn is_settled(self) -> bool {
        matches!(self, TitleStatus::Paid | TitleStatus::Cancelled)
    }
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinancialTitle {
    pub id: Uuid,

    #[schema(ignore)]
    pub franchise_id: Uuid,

    pub kind: TitleKind,
    pub status: TitleStatus,

    #[schema(example = "Fornecedor de lentes - NF 1234")]
    pub description: String,
    #[schema(example = "Essilor do Brasil")]
    pub counterparty: Option<String>,
    pub client_id: Option<Uuid>,
    #[schema(example = "Fornecedores")]
    pub category: Option<String>,

    #[schema(example = "500.00")]
    pub amount: Decimal,

    #[schema(value_type = String, format = Date, example = "2025-12-31")]
    pub due_date: NaiveDate,

    pub payment_method: Option<PaymentMethod>,
    pub paid_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTitle {
    pub description: String,
    pub counterparty: Option<String>,
    pub client_id: Option<Uuid>,
    pub category: Option<String>,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TitleFilter {
    pub status: Option<TitleStatus>,
    pub due_from: Option<NaiveDate>,
    pub due_to: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn pending_past_due_becomes_overdue() {
        let today = day("2025-06-10");
        assert_eq!(TitleStatus::Pending.effective(day("2025-06-09"), today), TitleStatus::Overdue);
        // Vence hoje ainda não está vencido
        assert_eq!(TitleStatus::Pending.effective(today, today), TitleStatus::Pending);
        assert_eq!(TitleStatus::Paid.effective(day("2025-01-01"), today), TitleStatus::Paid);
        assert_eq!(
            TitleStatus::Cancelled.effective(day("2025-01-01"), today),
            TitleStatus::Cancelled
        );
    }

    #[test]
    fn settled_titles() {
        assert!(TitleStatus::Paid.is_settled());
        assert!(TitleStatus::Cancelled.is_settled());
        assert!(!TitleStatus::Overdue.is_settled());
        assert!(!TitleStatus::Pending.is_settled());
    }
}
