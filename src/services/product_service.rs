// src/services/product_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ProductRepository,
    models::product::{Product, ProductData},
};

#[derive(Clone)]
pub struct ProductService {
    pool: PgPool,
    repo: ProductRepository,
}

impl ProductService {
    pub fn new(pool: PgPool, repo: ProductRepository) -> Self {
        Self { pool, repo }
    }

    pub async fn create_product(
        &self,
        franchise_id: Uuid,
        data: ProductData,
        initial_stock: i32,
    ) -> Result<Product, AppError> {
        check_prices(&data)?;
        if initial_stock < 0 {
            return Err(AppError::InvalidAmount("initialStock".into()));
        }

        let product = self
            .repo
            .create_product(&self.pool, franchise_id, &data, initial_stock)
            .await?;

        tracing::info!(product_id = %product.id, sku = %product.sku, "Produto cadastrado");
        Ok(product)
    }

    pub async fn list_products(
        &self,
        franchise_id: Uuid,
        search: Option<&str>,
        active_only: bool,
    ) -> Result<Vec<Product>, AppError> {
        self.repo.list_products(&self.pool, franchise_id, search, active_only).await
    }

    pub async fn get_product(&self, franchise_id: Uuid, id: Uuid) -> Result<Product, AppError> {
        self.repo
            .find_by_id(&self.pool, franchise_id, id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("product".into()))
    }

    pub async fn update_product(&self, franchise_id: Uuid, id: Uuid, data: ProductData) -> Result<Product, AppError> {
        check_prices(&data)?;

        self.repo
            .update_product(&self.pool, franchise_id, id, &data)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("product".into()))
    }

    /// Entrada (delta > 0) ou baixa manual (delta < 0) de estoque.
    pub async fn adjust_stock(
        &self,
        franchise_id: Uuid,
        id: Uuid,
        delta: i32,
        reason: Option<&str>,
    ) -> Result<Product, AppError> {
        if delta == 0 {
            return Err(AppError::InvalidAmount("delta".into()));
        }

        let mut tx = self.pool.begin().await?;

        let product = self
            .repo
            .find_by_id(&mut *tx, franchise_id, id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("product".into()))?;

        let updated = self
            .repo
            .adjust_stock(&mut *tx, franchise_id, id, delta)
            .await?
            .ok_or_else(|| AppError::InsufficientStock(product.name.clone()))?;

        tx.commit().await?;

        tracing::info!(
            product_id = %id,
            delta,
            stock = updated.stock_quantity,
            reason = reason.unwrap_or("-"),
            "Estoque ajustado"
        );
        Ok(updated)
    }
}

fn check_prices(data: &ProductData) -> Result<(), AppError> {
    if data.price < Decimal::ZERO {
        return Err(AppError::InvalidAmount("price".into()));
    }
    if data.cost.is_some_and(|c| c < Decimal::ZERO) {
        return Err(AppError::InvalidAmount("cost".into()));
    }
    Ok(())
}
