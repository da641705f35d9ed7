// src/services/employee_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{EmployeeRepository, UserRepository},
    models::employee::{Employee, EmployeeData},
};

#[derive(Clone)]
pub struct EmployeeService {
    pool: PgPool,
    repo: EmployeeRepository,
    user_repo: UserRepository,
}

impl EmployeeService {
    pub fn new(pool: PgPool, repo: EmployeeRepository, user_repo: UserRepository) -> Self {
        Self { pool, repo, user_repo }
    }

    /// Vincula um usuário da franquia a um perfil de funcionário.
    pub async fn create_employee(
        &self,
        franchise_id: Uuid,
        user_id: Uuid,
        data: EmployeeData,
    ) -> Result<Employee, AppError> {
        check_amounts(&data)?;

        let mut tx = self.pool.begin().await?;

        // Usuário de outra franquia é tratado como inexistente
        self.user_repo
            .find_in_franchise(&mut *tx, franchise_id, user_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("user".into()))?;

        let employee = self.repo.create_employee(&mut *tx, franchise_id, user_id, &data).await?;

        tx.commit().await?;

        tracing::info!(employee_id = %employee.id, user_id = %user_id, franchise_id = %franchise_id, "Funcionário cadastrado");
        Ok(employee)
    }

    pub async fn list_employees(&self, franchise_id: Uuid) -> Result<Vec<Employee>, AppError> {
        self.repo.list_employees(&self.pool, franchise_id).await
    }

    pub async fn get_employee(&self, franchise_id: Uuid, id: Uuid) -> Result<Employee, AppError> {
        self.repo
            .find_by_id(&self.pool, franchise_id, id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("employee".into()))
    }

    pub async fn update_employee(&self, franchise_id: Uuid, id: Uuid, data: EmployeeData) -> Result<Employee, AppError> {
        check_amounts(&data)?;

        self.repo
            .update_employee(&self.pool, franchise_id, id, &data)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("employee".into()))
    }
}

// Salário não negativo; comissão em percentual (0 a 100)
fn check_amounts(data: &EmployeeData) -> Result<(), AppError> {
    if data.salary.is_some_and(|s| s < Decimal::ZERO) {
        return Err(AppError::InvalidAmount("salary".into()));
    }
    if data
        .commission_rate
        .is_some_and(|r| r < Decimal::ZERO || r > Decimal::ONE_HUNDRED)
    {
        return Err(AppError::InvalidAmount("commissionRate".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(salary: i64, commission: i64) -> EmployeeData {
        EmployeeData {
            full_name: "Ana".into(),
            position: None,
            document_number: None,
            hire_date: None,
            salary: Some(Decimal::from(salary)),
            commission_rate: Some(Decimal::from(commission)),
            is_active: true,
        }
    }

    #[test]
    fn commission_is_a_percentage() {
        assert!(check_amounts(&data(2500, 5)).is_ok());
        assert!(check_amounts(&data(2500, 100)).is_ok());
        assert!(matches!(
            check_amounts(&data(2500, 101)),
            Err(AppError::InvalidAmount(field)) if field == "commissionRate"
        ));
        assert!(matches!(
            check_amounts(&data(-1, 5)),
            Err(AppError::InvalidAmount(field)) if field == "salary"
        ));
    }
}
