// src/services/user_service.rs

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{FranchiseRepository, UserRepository},
    models::auth::{CreateUserPayload, User},
    services::auth::hash_password,
};

#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
    user_repo: UserRepository,
    franchise_repo: FranchiseRepository,
}

impl UserService {
    pub fn new(pool: PgPool, user_repo: UserRepository, franchise_repo: FranchiseRepository) -> Self {
        Self {
            pool,
            user_repo,
            franchise_repo,
        }
    }

    /// Cria um usuário. `scope` é a franquia da requisição (rotas da franquia);
    /// nas rotas globais vale o `franchise_id` do payload.
    pub async fn create_user(
        &self,
        actor: &User,
        scope: Option<Uuid>,
        payload: CreateUserPayload,
    ) -> Result<User, AppError> {
        payload.validate()?;

        if !actor.role.can_assign(payload.role) {
            return Err(AppError::Forbidden);
        }

        let franchise_id = if payload.role.requires_franchise() {
            Some(
                scope
                    .or(payload.franchise_id)
                    .ok_or(AppError::FranchiseContextMissing)?,
            )
        } else {
            None
        };

        let hashed_password = hash_password(&payload.password).await?;

        let mut tx = self.pool.begin().await?;

        if let Some(fid) = franchise_id {
            self.franchise_repo
                .find_by_id(&mut *tx, fid)
                .await?
                .ok_or_else(|| AppError::ResourceNotFound("franchise".into()))?;
        }

        let user = self
            .user_repo
            .create_user(
                &mut *tx,
                &payload.email,
                &hashed_password,
                payload.full_name.trim(),
                payload.role,
                franchise_id,
            )
            .await?;

        tx.commit().await?;

        tracing::info!(user_id = %user.id, role = ?user.role, franchise_id = ?user.franchise_id, created_by = %actor.id, "Usuário criado");
        Ok(user)
    }

    pub async fn list_users(&self, franchise_id: Option<Uuid>) -> Result<Vec<User>, AppError> {
        self.user_repo.list_users(&self.pool, franchise_id).await
    }

    pub async fn set_active(&self, franchise_id: Uuid, user_id: Uuid, is_active: bool) -> Result<User, AppError> {
        let user = self
            .user_repo
            .set_active(&self.pool, franchise_id, user_id, is_active)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("user".into()))?;

        tracing::info!(user_id = %user.id, is_active, "Status do usuário alterado");
        Ok(user)
    }
}
