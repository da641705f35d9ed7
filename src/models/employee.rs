// src/models/employee.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use utoipa::ToSchema;

// Perfil operacional (RH) ligado 1:1 a um usuário da franquia
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    #[schema(ignore)]
    pub franchise_id: Uuid,
    pub user_id: Uuid,
    #[schema(example = "Carlos Pereira")]
    pub full_name: String,
    #[schema(example = "Optometrista")]
    pub position: Option<String>,
    pub document_number: Option<String>,
    #[schema(value_type = Option<String>, format = Date, example = "2024-03-01")]
    pub hire_date: Option<NaiveDate>,
    #[schema(example = "3500.00")]
    pub salary: Option<Decimal>,
    #[schema(example = "2.5")]
    pub commission_rate: Option<Decimal>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct EmployeeData {
    pub full_name: String,
    pub position: Option<String>,
    pub document_number: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub salary: Option<Decimal>,
    pub commission_rate: Option<Decimal>,
    pub is_active: bool,
}
