// src/services/franchise_service.rs

use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        documents::normalize_cnpj,
        error::{field_error, AppError},
    },
    db::{FranchiseRepository, SubscriptionRepository},
    models::{
        franchise::{Franchise, FranchiseData, FranchiseStatus},
        subscription::{SubscriptionStatus, TRIAL_DAYS},
    },
};

#[derive(Clone)]
pub struct FranchiseService {
    pool: PgPool,
    franchise_repo: FranchiseRepository,
    subscription_repo: SubscriptionRepository,
}

impl FranchiseService {
    pub fn new(pool: PgPool, franchise_repo: FranchiseRepository, subscription_repo: SubscriptionRepository) -> Self {
        Self {
            pool,
            franchise_repo,
            subscription_repo,
        }
    }

    /// Cadastra a franquia e, havendo plano ativo, abre o período de avaliação.
    pub async fn create_franchise(&self, data: FranchiseData) -> Result<Franchise, AppError> {
        let data = normalized(data)?;

        let mut tx = self.pool.begin().await?;

        let franchise = self.franchise_repo.create_franchise(&mut *tx, &data).await?;

        if let Some(plan) = self.subscription_repo.find_cheapest_active_plan(&mut *tx).await? {
            let now = Utc::now();
            self.subscription_repo
                .upsert_subscription(
                    &mut *tx,
                    franchise.id,
                    plan.id,
                    SubscriptionStatus::Trialing,
                    (now, now + Duration::days(TRIAL_DAYS)),
                    None,
                )
                .await?;
        } else {
            tracing::warn!(franchise_id = %franchise.id, "Nenhum plano ativo: franquia criada sem assinatura");
        }

        tx.commit().await?;

        tracing::info!(franchise_id = %franchise.id, cnpj = %franchise.cnpj, "Franquia criada");
        Ok(franchise)
    }

    pub async fn list_franchises(&self) -> Result<Vec<Franchise>, AppError> {
        self.franchise_repo.list_franchises().await
    }

    pub async fn get_franchise(&self, id: Uuid) -> Result<Franchise, AppError> {
        self.franchise_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("franchise".into()))
    }

    pub async fn update_franchise(&self, id: Uuid, data: FranchiseData) -> Result<Franchise, AppError> {
        let data = normalized(data)?;

        self.franchise_repo
            .update_franchise(&self.pool, id, &data)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("franchise".into()))
    }

    pub async fn set_status(&self, id: Uuid, status: FranchiseStatus) -> Result<Franchise, AppError> {
        let franchise = self
            .franchise_repo
            .set_status(&self.pool, id, status)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("franchise".into()))?;

        tracing::info!(franchise_id = %franchise.id, status = ?franchise.status, "Status da franquia alterado");
        Ok(franchise)
    }
}

// CNPJ só com dígitos; UF em maiúsculas
fn normalized(mut data: FranchiseData) -> Result<FranchiseData, AppError> {
    data.cnpj = normalize_cnpj(&data.cnpj).ok_or_else(|| field_error("cnpj", "validation.cnpj"))?;
    data.name = data.name.trim().to_string();
    data.state = data.state.map(|uf| uf.trim().to_uppercase());
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(cnpj: &str) -> FranchiseData {
        FranchiseData {
            name: "  Ótica Centro ".into(),
            cnpj: cnpj.into(),
            address: None,
            city: Some("Curitiba".into()),
            state: Some("pr".into()),
            phone: None,
            email: None,
        }
    }

    #[test]
    fn normalizes_cnpj_name_and_state() {
        let data = normalized(data("12.345.678/0001-99")).unwrap();
        assert_eq!(data.cnpj, "12345678000199");
        assert_eq!(data.name, "Ótica Centro");
        assert_eq!(data.state.as_deref(), Some("PR"));
    }

    #[test]
    fn rejects_short_cnpj() {
        assert!(matches!(normalized(data("12.345")), Err(AppError::ValidationError(_))));
    }
}
