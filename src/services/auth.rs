// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{AuthResponse, Claims, User},
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    jwt_expiration_hours: i64,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String, jwt_expiration_hours: i64) -> Self {
        Self {
            user_repo,
            jwt_secret,
            jwt_expiration_hours,
        }
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        // Usuário desativado não entra, mas não revelamos o motivo
        if !is_password_valid || !user.is_active {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.create_token(&user)?;
        tracing::info!(user_id = %user.id, role = ?user.role, "Login efetuado");

        Ok(AuthResponse { token, user })
    }

    /// Decodifica o token e recarrega o usuário: desativar alguém revoga o acesso na hora.
    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let claims = decode_claims(token, &self.jwt_secret)?;

        let user = self
            .user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)?;

        if !user.is_active {
            return Err(AppError::InvalidToken);
        }

        Ok(user)
    }

    pub fn create_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::hours(self.jwt_expiration_hours);

        let claims = Claims {
            sub: user.id,
            id: user.id,
            role: user.role,
            franchise_id: user.franchise_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode_claims(&claims, &self.jwt_secret)
    }
}

pub fn encode_claims(claims: &Claims, secret: &str) -> Result<String, AppError> {
    Ok(encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

/// Assinatura inválida, token expirado ou malformado viram `InvalidToken`.
pub fn decode_claims(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::InvalidToken)
}

pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password_clone = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

    Ok(hashed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::UserRole;
    use uuid::Uuid;

    fn claims(exp_offset_secs: i64) -> Claims {
        let now = Utc::now().timestamp();
        let id = Uuid::new_v4();
        Claims {
            sub: id,
            id,
            role: UserRole::Employee,
            franchise_id: Some(Uuid::new_v4()),
            exp: (now + exp_offset_secs) as usize,
            iat: now as usize,
        }
    }

    #[test]
    fn token_carries_role_and_franchise() {
        let original = claims(3600);
        let token = encode_claims(&original, "segredo").unwrap();
        let decoded = decode_claims(&token, "segredo").unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = encode_claims(&claims(3600), "segredo").unwrap();
        assert!(matches!(decode_claims(&token, "outro"), Err(AppError::InvalidToken)));
    }

    #[test]
    fn expired_token_is_rejected() {
        // Bem além da tolerância padrão de 60s
        let token = encode_claims(&claims(-3600), "segredo").unwrap();
        assert!(matches!(decode_claims(&token, "segredo"), Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn hashed_password_verifies() {
        let hashed = hash_password("senha123").await.unwrap();
        assert!(verify("senha123", &hashed).unwrap());
        assert!(!verify("errada", &hashed).unwrap());
    }
}
