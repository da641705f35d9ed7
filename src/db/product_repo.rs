// src/db/product_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    models::product::{Product, ProductData},
};

#[derive(Clone, Default)]
pub struct ProductRepository;

impl ProductRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create_product<'e, E>(
        &self,
        executor: E,
        franchise_id: Uuid,
        data: &ProductData,
        initial_stock: i32,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (
                franchise_id, sku, name, category, brand, price, cost, stock_quantity, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(franchise_id)
        .bind(&data.sku)
        .bind(&data.name)
        .bind(&data.category)
        .bind(&data.brand)
        .bind(data.price)
        .bind(data.cost)
        .bind(initial_stock)
        .bind(data.is_active)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, "sku"))
    }

    pub async fn list_products<'e, E>(
        &self,
        executor: E,
        franchise_id: Uuid,
        search: Option<&str>,
        active_only: bool,
    ) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let pattern = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE franchise_id = $1
              AND ($2::text IS NULL OR name ILIKE $2 OR sku ILIKE $2 OR brand ILIKE $2)
              AND (NOT $3 OR is_active)
            ORDER BY name ASC
            "#,
        )
        .bind(franchise_id)
        .bind(pattern)
        .bind(active_only)
        .fetch_all(executor)
        .await?;

        Ok(products)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        franchise_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE id = $1 AND franchise_id = $2",
        )
        .bind(id)
        .bind(franchise_id)
        .fetch_optional(executor)
        .await?;

        Ok(product)
    }

    pub async fn update_product<'e, E>(
        &self,
        executor: E,
        franchise_id: Uuid,
        id: Uuid,
        data: &ProductData,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET sku = $3, name = $4, category = $5, brand = $6, price = $7, cost = $8,
                is_active = $9, updated_at = NOW()
            WHERE id = $1 AND franchise_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(franchise_id)
        .bind(&data.sku)
        .bind(&data.name)
        .bind(&data.category)
        .bind(&data.brand)
        .bind(data.price)
        .bind(data.cost)
        .bind(data.is_active)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_unique_violation(e, "sku"))
    }

    /// Aplica `delta` ao estoque numa única instrução. Retorna `None` quando o
    /// produto não existe ou o saldo ficaria negativo.
    pub async fn adjust_stock<'e, E>(
        &self,
        executor: E,
        franchise_id: Uuid,
        id: Uuid,
        delta: i32,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET stock_quantity = stock_quantity + $3, updated_at = NOW()
            WHERE id = $1 AND franchise_id = $2 AND stock_quantity + $3 >= 0
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(franchise_id)
        .bind(delta)
        .fetch_optional(executor)
        .await?;

        Ok(product)
    }
}
