// src/db/cashier_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::cashier::{CashierSession, CashierSessionStatus, OrderTally, SessionTotals},
};

#[derive(Clone)]
pub struct CashierRepository {
    pool: PgPool,
}

impl CashierRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  ABERTURA / LEITURA
    // =========================================================================

    pub async fn open_session<'e, E>(
        &self,
        executor: E,
        franchise_id: Uuid,
        opened_by: Uuid,
        initial_amount: Decimal,
        notes: Option<&str>,
    ) -> Result<CashierSession, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, CashierSession>(
            r#"
            INSERT INTO cashier_sessions (franchise_id, opened_by, initial_amount, opening_notes)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(franchise_id)
        .bind(opened_by)
        .bind(initial_amount)
        .bind(notes)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            // O índice parcial uq_cashier_sessions_one_open garante um caixa aberto por operador
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::CashierSessionAlreadyOpen;
                }
            }
            e.into()
        })
    }

    /// Caixa aberto do operador. Com `for_update`, trava a linha até o fim da transação.
    pub async fn find_open_for_operator<'e, E>(
        &self,
        executor: E,
        franchise_id: Uuid,
        operator_id: Uuid,
        for_update: bool,
    ) -> Result<Option<CashierSession>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = if for_update {
            "SELECT * FROM cashier_sessions WHERE franchise_id = $1 AND opened_by = $2 AND status = 'open' FOR UPDATE"
        } else {
            "SELECT * FROM cashier_sessions WHERE franchise_id = $1 AND opened_by = $2 AND status = 'open'"
        };

        let session = sqlx::query_as::<_, CashierSession>(sql)
            .bind(franchise_id)
            .bind(operator_id)
            .fetch_optional(executor)
            .await?;

        Ok(session)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        franchise_id: Uuid,
        id: Uuid,
        for_update: bool,
    ) -> Result<Option<CashierSession>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = if for_update {
            "SELECT * FROM cashier_sessions WHERE id = $1 AND franchise_id = $2 FOR UPDATE"
        } else {
            "SELECT * FROM cashier_sessions WHERE id = $1 AND franchise_id = $2"
        };

        let session = sqlx::query_as::<_, CashierSession>(sql)
            .bind(id)
            .bind(franchise_id)
            .fetch_optional(executor)
            .await?;

        Ok(session)
    }

    pub async fn list_sessions<'e, E>(
        &self,
        executor: E,
        franchise_id: Uuid,
        status: Option<CashierSessionStatus>,
    ) -> Result<Vec<CashierSession>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sessions = sqlx::query_as::<_, CashierSession>(
            r#"
            SELECT * FROM cashier_sessions
            WHERE franchise_id = $1
              AND ($2::cashier_session_status IS NULL OR status = $2)
            ORDER BY opened_at DESC
            LIMIT 200
            "#,
        )
        .bind(franchise_id)
        .bind(status)
        .fetch_all(executor)
        .await?;

        Ok(sessions)
    }

    /// IDs de sessões para a reconciliação em lote (todas as franquias quando `None`).
    pub async fn list_session_ids(&self, franchise_id: Option<Uuid>) -> Result<Vec<(Uuid, Uuid)>, AppError> {
        let rows = sqlx::query_as::<_, (Uuid, Uuid)>(
            r#"
            SELECT id, franchise_id FROM cashier_sessions
            WHERE ($1::uuid IS NULL OR franchise_id = $1)
            ORDER BY opened_at ASC
            "#,
        )
        .bind(franchise_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // =========================================================================
    //  TOTAIS
    // =========================================================================

    /// Status, forma de pagamento e total de cada ordem da sessão.
    pub async fn order_tallies<'e, E>(
        &self,
        executor: E,
        franchise_id: Uuid,
        session_id: Uuid,
    ) -> Result<Vec<OrderTally>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let tallies = sqlx::query_as::<_, OrderTally>(
            r#"
            SELECT status, payment_method, total_amount
            FROM service_orders
            WHERE session_id = $1 AND franchise_id = $2
            "#,
        )
        .bind(session_id)
        .bind(franchise_id)
        .fetch_all(executor)
        .await?;

        Ok(tallies)
    }

    pub async fn write_totals<'e, E>(
        &self,
        executor: E,
        session_id: Uuid,
        totals: &SessionTotals,
    ) -> Result<CashierSession, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let session = sqlx::query_as::<_, CashierSession>(
            r#"
            UPDATE cashier_sessions
            SET total_sales = $2, cash_sales = $3, credit_card_sales = $4,
                debit_card_sales = $5, pix_sales = $6, other_sales = $7,
                order_count = $8, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(session_id)
        .bind(totals.total_sales)
        .bind(totals.cash_sales)
        .bind(totals.credit_card_sales)
        .bind(totals.debit_card_sales)
        .bind(totals.pix_sales)
        .bind(totals.other_sales)
        .bind(totals.order_count)
        .fetch_one(executor)
        .await?;

        Ok(session)
    }

    /// Regrava expected/difference de uma sessão já fechada (reconciliação).
    pub async fn write_reconciliation<'e, E>(
        &self,
        executor: E,
        session_id: Uuid,
        expected_amount: Decimal,
        difference: Decimal,
    ) -> Result<CashierSession, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let session = sqlx::query_as::<_, CashierSession>(
            r#"
            UPDATE cashier_sessions
            SET expected_amount = $2, difference = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(session_id)
        .bind(expected_amount)
        .bind(difference)
        .fetch_one(executor)
        .await?;

        Ok(session)
    }

    // =========================================================================
    //  FECHAMENTO
    // =========================================================================

    pub async fn close_session<'e, E>(
        &self,
        executor: E,
        session_id: Uuid,
        closed_by: Uuid,
        final_amount: Decimal,
        expected_amount: Decimal,
        difference: Decimal,
        notes: Option<&str>,
    ) -> Result<CashierSession, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let session = sqlx::query_as::<_, CashierSession>(
            r#"
            UPDATE cashier_sessions
            SET status = 'closed', closed_by = $2, final_amount = $3,
                expected_amount = $4, difference = $5, closing_notes = $6,
                closed_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND status = 'open'
            RETURNING *
            "#,
        )
        .bind(session_id)
        .bind(closed_by)
        .bind(final_amount)
        .bind(expected_amount)
        .bind(difference)
        .bind(notes)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::CashierSessionClosed)?;

        Ok(session)
    }
}
