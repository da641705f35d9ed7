// src/db/subscription_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    models::subscription::{Subscription, SubscriptionPlan, SubscriptionStatus},
};

#[derive(Clone)]
pub struct SubscriptionRepository {
    pool: PgPool,
}

impl SubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  PLANOS
    // =========================================================================

    pub async fn create_plan<'e, E>(
        &self,
        executor: E,
        name: &str,
        description: Option<&str>,
        monthly_price: Decimal,
        max_users: Option<i32>,
    ) -> Result<SubscriptionPlan, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, SubscriptionPlan>(
            r#"
            INSERT INTO subscription_plans (name, description, monthly_price, max_users)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(monthly_price)
        .bind(max_users)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, "name"))
    }

    pub async fn list_plans(&self, active_only: bool) -> Result<Vec<SubscriptionPlan>, AppError> {
        let plans = sqlx::query_as::<_, SubscriptionPlan>(
            r#"
            SELECT * FROM subscription_plans
            WHERE (NOT $1 OR is_active)
            ORDER BY monthly_price ASC, name ASC
            "#,
        )
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(plans)
    }

    pub async fn find_plan<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<SubscriptionPlan>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let plan = sqlx::query_as::<_, SubscriptionPlan>("SELECT * FROM subscription_plans WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(plan)
    }

    /// Plano usado no período de avaliação de franquias novas.
    pub async fn find_cheapest_active_plan<'e, E>(&self, executor: E) -> Result<Option<SubscriptionPlan>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let plan = sqlx::query_as::<_, SubscriptionPlan>(
            r#"
            SELECT * FROM subscription_plans
            WHERE is_active
            ORDER BY monthly_price ASC, created_at ASC
            LIMIT 1
            "#,
        )
        .fetch_optional(executor)
        .await?;

        Ok(plan)
    }

    // =========================================================================
    //  ASSINATURAS
    // =========================================================================

    pub async fn find_by_franchise<'e, E>(
        &self,
        executor: E,
        franchise_id: Uuid,
    ) -> Result<Option<Subscription>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sub = sqlx::query_as::<_, Subscription>("SELECT * FROM subscriptions WHERE franchise_id = $1")
            .bind(franchise_id)
            .fetch_optional(executor)
            .await?;

        Ok(sub)
    }

    /// Uma assinatura por franquia: cria ou substitui a existente.
    pub async fn upsert_subscription<'e, E>(
        &self,
        executor: E,
        franchise_id: Uuid,
        plan_id: Uuid,
        status: SubscriptionStatus,
        period: (DateTime<Utc>, DateTime<Utc>),
        external_reference: Option<&str>,
    ) -> Result<Subscription, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let (period_start, period_end) = period;

        let sub = sqlx::query_as::<_, Subscription>(
            r#"
            INSERT INTO subscriptions (
                franchise_id, plan_id, status, current_period_start,
                current_period_end, external_reference
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (franchise_id) DO UPDATE
            SET plan_id = EXCLUDED.plan_id,
                status = EXCLUDED.status,
                current_period_start = EXCLUDED.current_period_start,
                current_period_end = EXCLUDED.current_period_end,
                external_reference = EXCLUDED.external_reference,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(franchise_id)
        .bind(plan_id)
        .bind(status)
        .bind(period_start)
        .bind(period_end)
        .bind(external_reference)
        .fetch_one(executor)
        .await?;

        Ok(sub)
    }
}
