// src/models/franchise.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "franchise_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FranchiseStatus {
    Active,
    Inactive,
    Suspended,
}

// ---
// Franquia: a raiz da multi-tenancy
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Franchise {
    pub id: Uuid,
    #[schema(example = "Ótica Visão Centro")]
    pub name: String,
    #[schema(example = "12345678000199")]
    pub cnpj: String,
    #[schema(example = "Rua das Flores, 123")]
    pub address: Option<String>,
    #[schema(example = "Curitiba")]
    pub city: Option<String>,
    #[schema(example = "PR")]
    pub state: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub status: FranchiseStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Dados de cadastro já normalizados (CNPJ só com dígitos)
#[derive(Debug, Clone)]
pub struct FranchiseData {
    pub name: String,
    pub cnpj: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}
