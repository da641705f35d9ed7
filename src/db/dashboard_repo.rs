// src/db/dashboard_repo.rs

use rust_decimal::Decimal;
use sqlx::{Acquire, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::dashboard::DashboardSummary};

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Cards do topo. Todas as consultas leem o mesmo snapshot.
    pub async fn get_summary<'e, A>(&self, conn: A, franchise_id: Uuid) -> Result<DashboardSummary, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let mut tx = conn.begin().await?;

        // A. Vendas de hoje (ordens não canceladas)
        let (sales_today, orders_today): (Decimal, i64) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(total_amount), 0), COUNT(*)
            FROM service_orders
            WHERE franchise_id = $1
              AND status <> 'cancelled'
              AND created_at::date = CURRENT_DATE
            "#,
        )
        .bind(franchise_id)
        .fetch_one(&mut *tx)
        .await?;

        // B. Caixas abertos
        let open_sessions: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM cashier_sessions WHERE franchise_id = $1 AND status = 'open'",
        )
        .bind(franchise_id)
        .fetch_one(&mut *tx)
        .await?;

        // C. A receber / a pagar hoje
        let (receivables_due_today, payables_due_today): (Decimal, Decimal) = sqlx::query_as(
            r#"
            SELECT
                COALESCE(SUM(amount) FILTER (WHERE kind = 'receivable'), 0),
                COALESCE(SUM(amount) FILTER (WHERE kind = 'payable'), 0)
            FROM financial_titles
            WHERE franchise_id = $1
              AND status = 'pending'
              AND due_date = CURRENT_DATE
            "#,
        )
        .bind(franchise_id)
        .fetch_one(&mut *tx)
        .await?;

        // D. Vencidos (inclui pendentes com vencimento passado)
        let overdue_titles: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM financial_titles
            WHERE franchise_id = $1
              AND (status = 'overdue' OR (status = 'pending' AND due_date < CURRENT_DATE))
            "#,
        )
        .bind(franchise_id)
        .fetch_one(&mut *tx)
        .await?;

        let clients: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients WHERE franchise_id = $1")
            .bind(franchise_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(DashboardSummary {
            sales_today,
            orders_today,
            open_sessions,
            receivables_due_today,
            payables_due_today,
            overdue_titles,
            clients,
        })
    }

    pub async fn summary(&self, franchise_id: Uuid) -> Result<DashboardSummary, AppError> {
        self.get_summary(&self.pool, franchise_id).await
    }
}
