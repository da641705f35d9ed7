// src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use utoipa::ToSchema;

// Armações, lentes, acessórios...
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    #[schema(ignore)]
    pub franchise_id: Uuid,
    #[schema(example = "ARM-RB-3025")]
    pub sku: String,
    #[schema(example = "Armação Ray-Ban Aviador")]
    pub name: String,
    #[schema(example = "Armações")]
    pub category: Option<String>,
    #[schema(example = "Ray-Ban")]
    pub brand: Option<String>,
    #[schema(example = "799.90")]
    pub price: Decimal,
    #[schema(example = "420.00")]
    pub cost: Option<Decimal>,
    #[schema(example = 12)]
    pub stock_quantity: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ProductData {
    pub sku: String,
    pub name: String,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub price: Decimal,
    pub cost: Option<Decimal>,
    pub is_active: bool,
}
