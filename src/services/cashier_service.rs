// src/services/cashier_service.rs

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{order_repo::OrderFilter, CashierRepository, OrderRepository},
    models::{
        auth::User,
        cashier::{
            cash_difference, expected_total, CashierSession, CashierSessionDetail, CashierSessionStatus,
            ReconciliationReport, SessionDrift, SessionTotals,
        },
    },
};

#[derive(Clone)]
pub struct CashierService {
    pool: PgPool,
    repo: CashierRepository,
    order_repo: OrderRepository,
}

impl CashierService {
    pub fn new(pool: PgPool, repo: CashierRepository, order_repo: OrderRepository) -> Self {
        Self { pool, repo, order_repo }
    }

    // =========================================================================
    //  ABERTURA
    // =========================================================================

    pub async fn open_session(
        &self,
        franchise_id: Uuid,
        operator: &User,
        initial_amount: Decimal,
        notes: Option<&str>,
    ) -> Result<CashierSession, AppError> {
        if initial_amount < Decimal::ZERO {
            return Err(AppError::InvalidAmount("initialAmount".into()));
        }

        let session = self
            .repo
            .open_session(&self.pool, franchise_id, operator.id, initial_amount, notes)
            .await?;

        tracing::info!(
            session_id = %session.id,
            franchise_id = %franchise_id,
            operator_id = %operator.id,
            initial_amount = %initial_amount,
            "Caixa aberto"
        );
        Ok(session)
    }

    pub async fn current_session(&self, franchise_id: Uuid, operator_id: Uuid) -> Result<CashierSession, AppError> {
        self.repo
            .find_open_for_operator(&self.pool, franchise_id, operator_id, false)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("cashier session".into()))
    }

    // =========================================================================
    //  FECHAMENTO
    // =========================================================================

    /// Fecha o caixa com os totais recalculados das ordens, na mesma transação.
    pub async fn close_session(
        &self,
        franchise_id: Uuid,
        actor: &User,
        session_id: Uuid,
        final_amount: Decimal,
        notes: Option<&str>,
    ) -> Result<CashierSession, AppError> {
        if final_amount < Decimal::ZERO {
            return Err(AppError::InvalidAmount("finalAmount".into()));
        }

        let mut tx = self.pool.begin().await?;

        let session = self
            .repo
            .find_by_id(&mut *tx, franchise_id, session_id, true)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("cashier session".into()))?;

        if !session.is_open() {
            return Err(AppError::CashierSessionClosed);
        }
        if session.opened_by != actor.id && !actor.role.is_manager() {
            return Err(AppError::Forbidden);
        }

        let refreshed = self.refresh_totals(&mut tx, franchise_id, session_id).await?;

        let expected = expected_total(refreshed.initial_amount, refreshed.total_sales);
        let difference = cash_difference(final_amount, refreshed.initial_amount, refreshed.total_sales);

        let closed = self
            .repo
            .close_session(&mut *tx, session_id, actor.id, final_amount, expected, difference, notes)
            .await?;

        tx.commit().await?;

        tracing::info!(
            session_id = %closed.id,
            closed_by = %actor.id,
            total_sales = %closed.total_sales,
            expected = %expected,
            final_amount = %final_amount,
            difference = %difference,
            "Caixa fechado"
        );
        Ok(closed)
    }

    // =========================================================================
    //  CONSULTAS
    // =========================================================================

    pub async fn list_sessions(
        &self,
        franchise_id: Uuid,
        status: Option<CashierSessionStatus>,
    ) -> Result<Vec<CashierSession>, AppError> {
        self.repo.list_sessions(&self.pool, franchise_id, status).await
    }

    pub async fn session_detail(&self, franchise_id: Uuid, session_id: Uuid) -> Result<CashierSessionDetail, AppError> {
        let session = self
            .repo
            .find_by_id(&self.pool, franchise_id, session_id, false)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("cashier session".into()))?;

        let filter = OrderFilter {
            session_id: Some(session.id),
            ..Default::default()
        };
        let orders = self.order_repo.list_orders(&self.pool, franchise_id, &filter).await?;

        Ok(CashierSessionDetail { session, orders })
    }

    // =========================================================================
    //  TOTAIS / RECONCILIAÇÃO
    // =========================================================================

    /// Recalcula os totais a partir das ordens e grava na sessão.
    /// Chamado dentro da transação de quem alterou as ordens.
    pub async fn refresh_totals(
        &self,
        conn: &mut PgConnection,
        franchise_id: Uuid,
        session_id: Uuid,
    ) -> Result<CashierSession, AppError> {
        let tallies = self.repo.order_tallies(&mut *conn, franchise_id, session_id).await?;
        let totals = SessionTotals::from_orders(tallies);
        self.repo.write_totals(&mut *conn, session_id, &totals).await
    }

    /// Compara os totais gravados com os recalculados; com `apply`, corrige.
    pub async fn reconcile_session(
        &self,
        franchise_id: Uuid,
        session_id: Uuid,
        apply: bool,
    ) -> Result<SessionDrift, AppError> {
        let mut tx = self.pool.begin().await?;

        let session = self
            .repo
            .find_by_id(&mut *tx, franchise_id, session_id, true)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("cashier session".into()))?;

        let tallies = self.repo.order_tallies(&mut *tx, franchise_id, session_id).await?;
        let drift = SessionDrift::between(&session, SessionTotals::from_orders(tallies));

        if drift.drifted {
            tracing::warn!(
                session_id = %session_id,
                stored_total = %drift.stored.total_sales,
                recomputed_total = %drift.recomputed.total_sales,
                apply,
                "Divergência nos totais do caixa"
            );

            if apply {
                let updated = self.repo.write_totals(&mut *tx, session_id, &drift.recomputed).await?;
                // Caixa fechado: esperado e diferença acompanham os novos totais
                if let Some(difference) = drift.recomputed_difference {
                    let expected = expected_total(updated.initial_amount, updated.total_sales);
                    self.repo
                        .write_reconciliation(&mut *tx, session_id, expected, difference)
                        .await?;
                }
            }
        }

        tx.commit().await?;
        Ok(drift)
    }

    /// Reconciliação em lote (admin-cli). Sem franquia, percorre todas.
    /// Falha numa sessão não interrompe as demais; fica registrada no relatório.
    pub async fn reconcile_all(&self, franchise_id: Option<Uuid>, apply: bool) -> Result<ReconciliationReport, AppError> {
        let ids = self.repo.list_session_ids(franchise_id).await?;

        let mut report = ReconciliationReport {
            drifts: Vec::with_capacity(ids.len()),
            failed: Vec::new(),
        };
        for (session_id, session_franchise) in ids {
            match self.reconcile_session(session_franchise, session_id, apply).await {
                Ok(drift) => report.drifts.push(drift),
                Err(e) => {
                    tracing::error!(session_id = %session_id, error = %e, "Falha ao reconciliar sessão");
                    report.failed.push(session_id);
                }
            }
        }

        tracing::info!(
            sessions = report.drifts.len(),
            drifted = report.drifted().count(),
            failed = report.failed.len(),
            apply,
            "Reconciliação concluída"
        );
        Ok(report)
    }
}
