// src/services/finance_service.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ClientRepository, FinanceRepository},
    models::{
        finance::{FinancialTitle, NewTitle, TitleFilter, TitleKind, TitleStatus},
        orders::PaymentMethod,
    },
};

#[derive(Clone)]
pub struct FinanceService {
    pool: PgPool,
    repo: FinanceRepository,
    client_repo: ClientRepository,
}

impl FinanceService {
    pub fn new(pool: PgPool, repo: FinanceRepository, client_repo: ClientRepository) -> Self {
        Self { pool, repo, client_repo }
    }

    pub async fn create_title(&self, franchise_id: Uuid, kind: TitleKind, title: NewTitle) -> Result<FinancialTitle, AppError> {
        if title.amount <= Decimal::ZERO {
            return Err(AppError::InvalidAmount("amount".into()));
        }

        let mut tx = self.pool.begin().await?;

        // Cliente vinculado precisa ser da mesma franquia
        if let Some(client_id) = title.client_id {
            self.client_repo
                .find_by_id(&mut *tx, franchise_id, client_id)
                .await?
                .ok_or_else(|| AppError::ResourceNotFound("client".into()))?;
        }

        let created = self.repo.create_title(&mut *tx, franchise_id, kind, &title).await?;

        tx.commit().await?;

        tracing::info!(title_id = %created.id, kind = ?kind, amount = %created.amount, "Título criado");
        Ok(created)
    }

    /// Lista títulos, marcando antes como vencidos os pendentes fora do prazo.
    pub async fn list_titles(
        &self,
        franchise_id: Uuid,
        kind: TitleKind,
        filter: &TitleFilter,
    ) -> Result<Vec<FinancialTitle>, AppError> {
        let today = Utc::now().date_naive();

        let mut tx = self.pool.begin().await?;

        let flipped = self.repo.mark_overdue(&mut *tx, franchise_id, today).await?;
        if flipped > 0 {
            tracing::debug!(franchise_id = %franchise_id, flipped, "Títulos marcados como vencidos");
        }

        let titles = self.repo.list_titles(&mut *tx, franchise_id, kind, filter).await?;

        tx.commit().await?;
        Ok(titles)
    }

    pub async fn pay_title(
        &self,
        franchise_id: Uuid,
        kind: TitleKind,
        id: Uuid,
        payment_method: PaymentMethod,
        paid_at: Option<DateTime<Utc>>,
    ) -> Result<FinancialTitle, AppError> {
        let mut tx = self.pool.begin().await?;

        let title = self.locked_title(&mut tx, franchise_id, kind, id).await?;
        if title.status.is_settled() {
            return Err(AppError::TitleAlreadySettled);
        }

        let paid = self
            .repo
            .settle_title(
                &mut *tx,
                title.id,
                TitleStatus::Paid,
                Some(payment_method),
                Some(paid_at.unwrap_or_else(Utc::now)),
            )
            .await?;

        tx.commit().await?;

        tracing::info!(title_id = %paid.id, kind = ?kind, amount = %paid.amount, "Título liquidado");
        Ok(paid)
    }

    pub async fn cancel_title(&self, franchise_id: Uuid, kind: TitleKind, id: Uuid) -> Result<FinancialTitle, AppError> {
        let mut tx = self.pool.begin().await?;

        let title = self.locked_title(&mut tx, franchise_id, kind, id).await?;
        if title.status.is_settled() {
            return Err(AppError::TitleAlreadySettled);
        }

        let cancelled = self
            .repo
            .settle_title(&mut *tx, title.id, TitleStatus::Cancelled, None, None)
            .await?;

        tx.commit().await?;

        tracing::info!(title_id = %cancelled.id, kind = ?kind, "Título cancelado");
        Ok(cancelled)
    }

    async fn locked_title(
        &self,
        conn: &mut sqlx::PgConnection,
        franchise_id: Uuid,
        kind: TitleKind,
        id: Uuid,
    ) -> Result<FinancialTitle, AppError> {
        let resource = match kind {
            TitleKind::Payable => "payable",
            TitleKind::Receivable => "receivable",
        };

        self.repo
            .find_title(conn, franchise_id, kind, id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(resource.into()))
    }
}
