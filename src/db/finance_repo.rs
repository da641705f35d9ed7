// src/db/finance_repo.rs

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        finance::{FinancialTitle, NewTitle, TitleFilter, TitleKind, TitleStatus},
        orders::PaymentMethod,
    },
};

/// Sem estado próprio: toda consulta recebe o executor (pool ou transação) do serviço.
#[derive(Clone, Default)]
pub struct FinanceRepository;

impl FinanceRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  TÍTULOS (Contas a Pagar / Receber)
    // =========================================================================

    pub async fn create_title<'e, E>(
        &self,
        executor: E,
        franchise_id: Uuid,
        kind: TitleKind,
        title: &NewTitle,
    ) -> Result<FinancialTitle, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let created = sqlx::query_as::<_, FinancialTitle>(
            r#"
            INSERT INTO financial_titles (
                franchise_id, kind, description, counterparty, client_id,
                category, amount, due_date, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(franchise_id)
        .bind(kind)
        .bind(&title.description)
        .bind(&title.counterparty)
        .bind(title.client_id)
        .bind(&title.category)
        .bind(title.amount)
        .bind(title.due_date)
        .bind(&title.notes)
        .fetch_one(executor)
        .await?;

        Ok(created)
    }

    /// Marca como vencidos os títulos em aberto com vencimento anterior a `today`.
    pub async fn mark_overdue<'e, E>(
        &self,
        executor: E,
        franchise_id: Uuid,
        today: NaiveDate,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE financial_titles
            SET status = 'overdue', updated_at = NOW()
            WHERE franchise_id = $1 AND status = 'pending' AND due_date < $2
            "#,
        )
        .bind(franchise_id)
        .bind(today)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn list_titles<'e, E>(
        &self,
        executor: E,
        franchise_id: Uuid,
        kind: TitleKind,
        filter: &TitleFilter,
    ) -> Result<Vec<FinancialTitle>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let titles = sqlx::query_as::<_, FinancialTitle>(
            r#"
            SELECT * FROM financial_titles
            WHERE franchise_id = $1
              AND kind = $2
              AND ($3::title_status IS NULL OR status = $3)
              AND ($4::date IS NULL OR due_date >= $4)
              AND ($5::date IS NULL OR due_date <= $5)
            ORDER BY due_date ASC, created_at ASC
            "#,
        )
        .bind(franchise_id)
        .bind(kind)
        .bind(filter.status)
        .bind(filter.due_from)
        .bind(filter.due_to)
        .fetch_all(executor)
        .await?;

        Ok(titles)
    }

    pub async fn find_title<'e, E>(
        &self,
        executor: E,
        franchise_id: Uuid,
        kind: TitleKind,
        id: Uuid,
    ) -> Result<Option<FinancialTitle>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let title = sqlx::query_as::<_, FinancialTitle>(
            "SELECT * FROM financial_titles WHERE id = $1 AND franchise_id = $2 AND kind = $3 FOR UPDATE",
        )
        .bind(id)
        .bind(franchise_id)
        .bind(kind)
        .fetch_optional(executor)
        .await?;

        Ok(title)
    }

    pub async fn settle_title<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: TitleStatus,
        payment_method: Option<PaymentMethod>,
        paid_at: Option<DateTime<Utc>>,
    ) -> Result<FinancialTitle, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let title = sqlx::query_as::<_, FinancialTitle>(
            r#"
            UPDATE financial_titles
            SET status = $2, payment_method = $3, paid_at = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(payment_method)
        .bind(paid_at)
        .fetch_one(executor)
        .await?;

        Ok(title)
    }
}
