// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use utoipa::ToSchema;
use validator::Validate;

// Mapeia o CREATE TYPE user_role do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    SuperAdmin,
    FranchiseAdmin,
    Employee,
}

impl UserRole {
    /// Gerentes: administram a franquia (ou todas, no caso do SUPER_ADMIN).
    pub fn is_manager(self) -> bool {
        matches!(self, UserRole::SuperAdmin | UserRole::FranchiseAdmin)
    }

    /// Quem pode criar usuários com qual cargo.
    pub fn can_assign(self, target: UserRole) -> bool {
        match self {
            UserRole::SuperAdmin => true,
            UserRole::FranchiseAdmin => target != UserRole::SuperAdmin,
            UserRole::Employee => false,
        }
    }

    /// SUPER_ADMIN nunca pertence a uma franquia; os demais sempre.
    pub fn requires_franchise(self) -> bool {
        self != UserRole::SuperAdmin
    }
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    #[schema(example = "gerente@otica.com.br")]
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password_hash: String,

    #[schema(example = "Maria Souza")]
    pub full_name: String,
    pub role: UserRole,
    pub franchise_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "validation.email"))]
    #[schema(example = "gerente@otica.com.br")]
    pub email: String,
    #[validate(length(min = 6, message = "validation.password_length"))]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

// Estrutura de dados ("claims") dentro do JWT: {id, role, franchiseId}
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub sub: Uuid,
    pub id: Uuid,
    pub role: UserRole,
    pub franchise_id: Option<Uuid>,
    pub exp: usize,
    pub iat: usize,
}

// Criação de usuário (admin global ou gerente da franquia)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    #[validate(email(message = "validation.email"))]
    pub email: String,

    #[validate(length(min = 6, message = "validation.password_length"))]
    pub password: String,

    #[validate(length(min = 1, message = "validation.required"))]
    #[schema(example = "João Lima")]
    pub full_name: String,

    pub role: UserRole,

    /// Ignorado nas rotas da franquia: o contexto da requisição decide.
    pub franchise_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetUserActivePayload {
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_assignment_rules() {
        assert!(UserRole::SuperAdmin.can_assign(UserRole::SuperAdmin));
        assert!(UserRole::FranchiseAdmin.can_assign(UserRole::Employee));
        assert!(UserRole::FranchiseAdmin.can_assign(UserRole::FranchiseAdmin));
        assert!(!UserRole::FranchiseAdmin.can_assign(UserRole::SuperAdmin));
        assert!(!UserRole::Employee.can_assign(UserRole::Employee));
    }

    #[test]
    fn claims_use_camel_case_franchise_id() {
        let id = Uuid::new_v4();
        let franchise = Uuid::new_v4();
        let claims = Claims {
            sub: id,
            id,
            role: UserRole::FranchiseAdmin,
            franchise_id: Some(franchise),
            exp: 10,
            iat: 1,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["role"], "FRANCHISE_ADMIN");
        assert_eq!(json["franchiseId"], franchise.to_string());
    }
}
