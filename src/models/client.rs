// src/models/client.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use utoipa::ToSchema;

// Cliente final da franquia (receitas, ordens de serviço, agendamentos)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    #[schema(ignore)]
    pub franchise_id: Uuid,
    #[schema(example = "Ana Beatriz Costa")]
    pub full_name: String,
    #[schema(example = "12345678909")]
    pub cpf: Option<String>,
    pub email: Option<String>,
    #[schema(example = "(41) 99999-8888")]
    pub phone: Option<String>,
    #[schema(value_type = Option<String>, format = Date, example = "1990-05-17")]
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ClientData {
    pub full_name: String,
    pub cpf: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub notes: Option<String>,
}
