// src/middleware/rbac.rs

use std::marker::PhantomData;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::auth::UserRole,
};

/// 1. O Trait que define quais cargos passam
pub trait RoleDef: Send + Sync + 'static {
    fn allows(role: UserRole) -> bool;
}

/// 2. O Extractor (Guardião)
pub struct RequireRole<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let error = match parts.extensions.get::<AuthenticatedUser>() {
            Some(AuthenticatedUser(user)) if T::allows(user.role) => return Ok(RequireRole(PhantomData)),
            Some(AuthenticatedUser(user)) => {
                tracing::debug!(user_id = %user.id, role = ?user.role, "Acesso negado pelo cargo");
                AppError::Forbidden
            }
            None => AppError::InvalidToken,
        };

        let app_state = AppState::from_ref(state);
        Err(error.to_api_error(&Locale::from_headers(&parts.headers), &app_state.i18n_store))
    }
}

// ---
// DEFINIÇÃO DOS CARGOS (TIPOS)
// ---

pub struct SuperAdminOnly;
impl RoleDef for SuperAdminOnly {
    fn allows(role: UserRole) -> bool {
        role == UserRole::SuperAdmin
    }
}

pub struct ManagerOnly;
impl RoleDef for ManagerOnly {
    fn allows(role: UserRole) -> bool {
        role.is_manager()
    }
}

pub struct AnyStaff;
impl RoleDef for AnyStaff {
    fn allows(_role: UserRole) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_markers() {
        assert!(SuperAdminOnly::allows(UserRole::SuperAdmin));
        assert!(!SuperAdminOnly::allows(UserRole::FranchiseAdmin));
        assert!(ManagerOnly::allows(UserRole::FranchiseAdmin));
        assert!(ManagerOnly::allows(UserRole::SuperAdmin));
        assert!(!ManagerOnly::allows(UserRole::Employee));
        assert!(AnyStaff::allows(UserRole::Employee));
    }
}
