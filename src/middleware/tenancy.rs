// src/middleware/tenancy.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, HeaderValue},
};
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::auth::{User, UserRole},
};

// O nome do nosso cabeçalho HTTP customizado
pub const FRANCHISE_ID_HEADER: &str = "x-franchise-id";

/// Franquia sobre a qual a requisição opera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FranchiseContext(pub Uuid);

/// Usuário de franquia fica preso à franquia do token; o SUPER_ADMIN escolhe
/// pelo cabeçalho.
pub fn resolve_franchise(user: &User, header: Option<&HeaderValue>) -> Result<Uuid, AppError> {
    let requested = header
        .map(|value| {
            value
                .to_str()
                .ok()
                .and_then(|s| Uuid::parse_str(s.trim()).ok())
                .ok_or(AppError::InvalidFranchiseHeader)
        })
        .transpose()?;

    match (user.role, user.franchise_id) {
        (UserRole::SuperAdmin, _) => requested.ok_or(AppError::FranchiseContextMissing),
        (_, Some(own)) => match requested {
            Some(other) if other != own => Err(AppError::Forbidden),
            _ => Ok(own),
        },
        // Usuário de franquia sem franquia: o CHECK do banco impede, mas não confiamos
        (_, None) => Err(AppError::Forbidden),
    }
}

impl<S> FromRequestParts<S> for FranchiseContext
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let locale = Locale::from_headers(&parts.headers);
        let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

        let AuthenticatedUser(user) = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| to_api(AppError::InvalidToken))?;

        let franchise_id = resolve_franchise(&user, parts.headers.get(FRANCHISE_ID_HEADER)).map_err(to_api)?;

        // O SUPER_ADMIN pode digitar qualquer UUID: confere se a franquia existe
        if user.role == UserRole::SuperAdmin {
            app_state
                .franchise_service
                .get_franchise(franchise_id)
                .await
                .map_err(to_api)?;
        }

        Ok(FranchiseContext(franchise_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(role: UserRole, franchise_id: Option<Uuid>) -> User {
        User {
            id: Uuid::new_v4(),
            email: "a@b.com".into(),
            password_hash: String::new(),
            full_name: "Teste".into(),
            role,
            franchise_id,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn header(id: &str) -> HeaderValue {
        HeaderValue::from_str(id).unwrap()
    }

    #[test]
    fn franchise_user_is_bound_to_token_franchise() {
        let own = Uuid::new_v4();
        let employee = user(UserRole::Employee, Some(own));

        assert_eq!(resolve_franchise(&employee, None).unwrap(), own);
        assert_eq!(resolve_franchise(&employee, Some(&header(&own.to_string()))).unwrap(), own);
        assert!(matches!(
            resolve_franchise(&employee, Some(&header(&Uuid::new_v4().to_string()))),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn super_admin_must_name_the_franchise() {
        let admin = user(UserRole::SuperAdmin, None);
        let target = Uuid::new_v4();

        assert!(matches!(resolve_franchise(&admin, None), Err(AppError::FranchiseContextMissing)));
        assert_eq!(resolve_franchise(&admin, Some(&header(&target.to_string()))).unwrap(), target);
    }

    #[test]
    fn malformed_header_is_rejected() {
        let admin = user(UserRole::SuperAdmin, None);
        assert!(matches!(
            resolve_franchise(&admin, Some(&header("loja-1"))),
            Err(AppError::InvalidFranchiseHeader)
        ));
    }
}
