// src/db/order_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::orders::{NewOrderItem, OrderStatus, PaymentMethod, ServiceOrder, ServiceOrderItem},
};

#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub session_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
}

/// Sem estado próprio: toda consulta recebe o executor (pool ou transação) do serviço.
#[derive(Clone, Default)]
pub struct OrderRepository;

impl OrderRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  ORDENS
    // =========================================================================

    pub async fn insert_order<'e, E>(
        &self,
        executor: E,
        franchise_id: Uuid,
        session_id: Uuid,
        client_id: Uuid,
        employee_id: Option<Uuid>,
        created_by: Uuid,
        payment_method: PaymentMethod,
        totals: (Decimal, Decimal),
        notes: Option<&str>,
    ) -> Result<ServiceOrder, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let (total_amount, total_discount) = totals;

        let order = sqlx::query_as::<_, ServiceOrder>(
            r#"
            INSERT INTO service_orders (
                franchise_id, session_id, client_id, employee_id, created_by,
                payment_method, total_amount, total_discount, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(franchise_id)
        .bind(session_id)
        .bind(client_id)
        .bind(employee_id)
        .bind(created_by)
        .bind(payment_method)
        .bind(total_amount)
        .bind(total_discount)
        .bind(notes)
        .fetch_one(executor)
        .await?;

        Ok(order)
    }

    pub async fn insert_item<'e, E>(
        &self,
        executor: E,
        franchise_id: Uuid,
        order_id: Uuid,
        item: &NewOrderItem,
    ) -> Result<ServiceOrderItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let line_total = item
            .line_total()
            .ok_or_else(|| AppError::InvalidAmount("unitPrice".to_string()))?;

        let row = sqlx::query_as::<_, ServiceOrderItem>(
            r#"
            INSERT INTO service_order_items (
                franchise_id, order_id, product_id, description,
                quantity, unit_price, discount, line_total
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(franchise_id)
        .bind(order_id)
        .bind(item.product_id)
        .bind(&item.description)
        .bind(item.quantity)
        .bind(item.unit_price)
        .bind(item.discount)
        .bind(line_total)
        .fetch_one(executor)
        .await?;

        Ok(row)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        franchise_id: Uuid,
        id: Uuid,
        for_update: bool,
    ) -> Result<Option<ServiceOrder>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = if for_update {
            "SELECT * FROM service_orders WHERE id = $1 AND franchise_id = $2 FOR UPDATE"
        } else {
            "SELECT * FROM service_orders WHERE id = $1 AND franchise_id = $2"
        };

        let order = sqlx::query_as::<_, ServiceOrder>(sql)
            .bind(id)
            .bind(franchise_id)
            .fetch_optional(executor)
            .await?;

        Ok(order)
    }

    pub async fn list_orders<'e, E>(
        &self,
        executor: E,
        franchise_id: Uuid,
        filter: &OrderFilter,
    ) -> Result<Vec<ServiceOrder>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let orders = sqlx::query_as::<_, ServiceOrder>(
            r#"
            SELECT * FROM service_orders
            WHERE franchise_id = $1
              AND ($2::order_status IS NULL OR status = $2)
              AND ($3::uuid IS NULL OR session_id = $3)
              AND ($4::uuid IS NULL OR client_id = $4)
            ORDER BY created_at DESC
            LIMIT 500
            "#,
        )
        .bind(franchise_id)
        .bind(filter.status)
        .bind(filter.session_id)
        .bind(filter.client_id)
        .fetch_all(executor)
        .await?;

        Ok(orders)
    }

    pub async fn list_items<'e, E>(
        &self,
        executor: E,
        franchise_id: Uuid,
        order_id: Uuid,
    ) -> Result<Vec<ServiceOrderItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, ServiceOrderItem>(
            r#"
            SELECT * FROM service_order_items
            WHERE order_id = $1 AND franchise_id = $2
            ORDER BY created_at ASC
            "#,
        )
        .bind(order_id)
        .bind(franchise_id)
        .fetch_all(executor)
        .await?;

        Ok(items)
    }

    pub async fn client_name<'e, E>(&self, executor: E, client_id: Uuid) -> Result<String, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let name: String = sqlx::query_scalar("SELECT full_name FROM clients WHERE id = $1")
            .bind(client_id)
            .fetch_one(executor)
            .await?;

        Ok(name)
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<ServiceOrder, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // completed_at / cancelled_at acompanham o status
        let order = sqlx::query_as::<_, ServiceOrder>(
            r#"
            UPDATE service_orders
            SET status = $2,
                completed_at = CASE WHEN $2 = 'completed'::order_status THEN NOW() ELSE completed_at END,
                cancelled_at = CASE WHEN $2 = 'cancelled'::order_status THEN NOW() ELSE cancelled_at END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_one(executor)
        .await?;

        Ok(order)
    }
}
