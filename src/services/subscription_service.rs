// src/services/subscription_service.rs

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{FranchiseRepository, SubscriptionRepository},
    models::subscription::{Subscription, SubscriptionPlan, SubscriptionStatus},
};

// Período padrão quando o admin não informa o fim
const DEFAULT_PERIOD_DAYS: i64 = 30;

#[derive(Clone)]
pub struct SubscriptionService {
    pool: PgPool,
    repo: SubscriptionRepository,
    franchise_repo: FranchiseRepository,
}

impl SubscriptionService {
    pub fn new(pool: PgPool, repo: SubscriptionRepository, franchise_repo: FranchiseRepository) -> Self {
        Self {
            pool,
            repo,
            franchise_repo,
        }
    }

    pub async fn list_plans(&self, active_only: bool) -> Result<Vec<SubscriptionPlan>, AppError> {
        self.repo.list_plans(active_only).await
    }

    pub async fn create_plan(
        &self,
        name: &str,
        description: Option<&str>,
        monthly_price: Decimal,
        max_users: Option<i32>,
    ) -> Result<SubscriptionPlan, AppError> {
        if monthly_price < Decimal::ZERO {
            return Err(AppError::InvalidAmount("monthlyPrice".into()));
        }

        let plan = self
            .repo
            .create_plan(&self.pool, name.trim(), description, monthly_price, max_users)
            .await?;

        tracing::info!(plan_id = %plan.id, name = %plan.name, "Plano criado");
        Ok(plan)
    }

    pub async fn current(&self, franchise_id: Uuid) -> Result<Subscription, AppError> {
        self.repo
            .find_by_franchise(&self.pool, franchise_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("subscription".into()))
    }

    /// Troca plano/status da assinatura da franquia (ajuste manual do admin).
    pub async fn assign(
        &self,
        franchise_id: Uuid,
        plan_id: Uuid,
        status: SubscriptionStatus,
        period_end: Option<DateTime<Utc>>,
        external_reference: Option<&str>,
    ) -> Result<Subscription, AppError> {
        let now = Utc::now();
        let period_end = period_end.unwrap_or(now + Duration::days(DEFAULT_PERIOD_DAYS));
        if period_end <= now && status != SubscriptionStatus::Canceled {
            return Err(AppError::InvalidAmount("currentPeriodEnd".into()));
        }

        let mut tx = self.pool.begin().await?;

        self.franchise_repo
            .find_by_id(&mut *tx, franchise_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("franchise".into()))?;
        self.repo
            .find_plan(&mut *tx, plan_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("plan".into()))?;

        let sub = self
            .repo
            .upsert_subscription(&mut *tx, franchise_id, plan_id, status, (now, period_end), external_reference)
            .await?;

        tx.commit().await?;

        tracing::info!(franchise_id = %franchise_id, plan_id = %plan_id, status = ?status, "Assinatura atualizada");
        Ok(sub)
    }
}
