// src/db/franchise_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    models::franchise::{Franchise, FranchiseData, FranchiseStatus},
};

#[derive(Clone)]
pub struct FranchiseRepository {
    pool: PgPool,
}

impl FranchiseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_franchise<'e, E>(
        &self,
        executor: E,
        data: &FranchiseData,
    ) -> Result<Franchise, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Franchise>(
            r#"
            INSERT INTO franchises (name, cnpj, address, city, state, phone, email)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.cnpj)
        .bind(&data.address)
        .bind(&data.city)
        .bind(&data.state)
        .bind(&data.phone)
        .bind(&data.email)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, "cnpj"))
    }

    pub async fn list_franchises(&self) -> Result<Vec<Franchise>, AppError> {
        let franchises = sqlx::query_as::<_, Franchise>("SELECT * FROM franchises ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(franchises)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Franchise>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let franchise = sqlx::query_as::<_, Franchise>("SELECT * FROM franchises WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(franchise)
    }

    pub async fn update_franchise<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        data: &FranchiseData,
    ) -> Result<Option<Franchise>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Franchise>(
            r#"
            UPDATE franchises
            SET name = $2, cnpj = $3, address = $4, city = $5, state = $6,
                phone = $7, email = $8, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.cnpj)
        .bind(&data.address)
        .bind(&data.city)
        .bind(&data.state)
        .bind(&data.phone)
        .bind(&data.email)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_unique_violation(e, "cnpj"))
    }

    pub async fn set_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: FranchiseStatus,
    ) -> Result<Option<Franchise>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let franchise = sqlx::query_as::<_, Franchise>(
            "UPDATE franchises SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(executor)
        .await?;

        Ok(franchise)
    }
}
