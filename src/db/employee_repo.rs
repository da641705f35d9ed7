// src/db/employee_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    models::employee::{Employee, EmployeeData},
};

#[derive(Clone, Default)]
pub struct EmployeeRepository;

impl EmployeeRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create_employee<'e, E>(
        &self,
        executor: E,
        franchise_id: Uuid,
        user_id: Uuid,
        data: &EmployeeData,
    ) -> Result<Employee, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees (
                franchise_id, user_id, full_name, position, document_number,
                hire_date, salary, commission_rate, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(franchise_id)
        .bind(user_id)
        .bind(&data.full_name)
        .bind(&data.position)
        .bind(&data.document_number)
        .bind(data.hire_date)
        .bind(data.salary)
        .bind(data.commission_rate)
        .bind(data.is_active)
        .fetch_one(executor)
        .await
        // Um perfil por usuário
        .map_err(|e| map_unique_violation(e, "userId"))
    }

    pub async fn list_employees<'e, E>(&self, executor: E, franchise_id: Uuid) -> Result<Vec<Employee>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let employees = sqlx::query_as::<_, Employee>(
            "SELECT * FROM employees WHERE franchise_id = $1 ORDER BY full_name ASC",
        )
        .bind(franchise_id)
        .fetch_all(executor)
        .await?;

        Ok(employees)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        franchise_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Employee>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let employee = sqlx::query_as::<_, Employee>(
            "SELECT * FROM employees WHERE id = $1 AND franchise_id = $2",
        )
        .bind(id)
        .bind(franchise_id)
        .fetch_optional(executor)
        .await?;

        Ok(employee)
    }

    pub async fn find_by_user<'e, E>(
        &self,
        executor: E,
        franchise_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Employee>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let employee = sqlx::query_as::<_, Employee>(
            "SELECT * FROM employees WHERE user_id = $1 AND franchise_id = $2",
        )
        .bind(user_id)
        .bind(franchise_id)
        .fetch_optional(executor)
        .await?;

        Ok(employee)
    }

    pub async fn update_employee<'e, E>(
        &self,
        executor: E,
        franchise_id: Uuid,
        id: Uuid,
        data: &EmployeeData,
    ) -> Result<Option<Employee>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            UPDATE employees
            SET full_name = $3, position = $4, document_number = $5, hire_date = $6,
                salary = $7, commission_rate = $8, is_active = $9, updated_at = NOW()
            WHERE id = $1 AND franchise_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(franchise_id)
        .bind(&data.full_name)
        .bind(&data.position)
        .bind(&data.document_number)
        .bind(data.hire_date)
        .bind(data.salary)
        .bind(data.commission_rate)
        .bind(data.is_active)
        .fetch_optional(executor)
        .await?;

        Ok(employee)
    }
}
