// src/db/client_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    models::client::{Client, ClientData},
};

#[derive(Clone, Default)]
pub struct ClientRepository;

impl ClientRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create_client<'e, E>(
        &self,
        executor: E,
        franchise_id: Uuid,
        data: &ClientData,
    ) -> Result<Client, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (
                franchise_id, full_name, cpf, email, phone, birth_date, address, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(franchise_id)
        .bind(&data.full_name)
        .bind(&data.cpf)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(data.birth_date)
        .bind(&data.address)
        .bind(&data.notes)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, "cpf"))
    }

    /// Lista clientes; com `search`, filtra por nome, CPF, e-mail ou telefone.
    pub async fn list_clients<'e, E>(
        &self,
        executor: E,
        franchise_id: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let pattern = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));

        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT * FROM clients
            WHERE franchise_id = $1
              AND (
                $2::text IS NULL
                OR full_name ILIKE $2
                OR cpf ILIKE $2
                OR email ILIKE $2
                OR phone ILIKE $2
              )
            ORDER BY full_name ASC
            LIMIT 200
            "#,
        )
        .bind(franchise_id)
        .bind(pattern)
        .fetch_all(executor)
        .await?;

        Ok(clients)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        franchise_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let client = sqlx::query_as::<_, Client>(
            "SELECT * FROM clients WHERE id = $1 AND franchise_id = $2",
        )
        .bind(id)
        .bind(franchise_id)
        .fetch_optional(executor)
        .await?;

        Ok(client)
    }

    pub async fn update_client<'e, E>(
        &self,
        executor: E,
        franchise_id: Uuid,
        id: Uuid,
        data: &ClientData,
    ) -> Result<Option<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Client>(
            r#"
            UPDATE clients
            SET full_name = $3, cpf = $4, email = $5, phone = $6,
                birth_date = $7, address = $8, notes = $9, updated_at = NOW()
            WHERE id = $1 AND franchise_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(franchise_id)
        .bind(&data.full_name)
        .bind(&data.cpf)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(data.birth_date)
        .bind(&data.address)
        .bind(&data.notes)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_unique_violation(e, "cpf"))
    }

    /// Retorna `false` quando nada foi removido.
    pub async fn delete_client<'e, E>(&self, executor: E, franchise_id: Uuid, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1 AND franchise_id = $2")
            .bind(id)
            .bind(franchise_id)
            .execute(executor)
            .await
            .map_err(|e| {
                // Cliente com ordens ou títulos vinculados
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_foreign_key_violation() {
                        return AppError::ResourceInUse("client".to_string());
                    }
                }
                AppError::from(e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}
