// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::{common::i18n::I18nStore, middleware::i18n::Locale};

// Erros de domínio e de infraestrutura. Os handlers convertem para ApiError
// (já traduzido) antes de responder.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Acesso negado")]
    Forbidden,

    #[error("Contexto de franquia ausente")]
    FranchiseContextMissing,

    #[error("Cabeçalho x-franchise-id inválido")]
    InvalidFranchiseHeader,

    #[error("Recurso não encontrado: {0}")]
    ResourceNotFound(String),

    #[error("Valor duplicado para o campo {0}")]
    UniqueConstraintViolation(String),

    #[error("Nenhum caixa aberto para o operador")]
    NoOpenCashierSession,

    #[error("O operador já possui um caixa aberto")]
    CashierSessionAlreadyOpen,

    #[error("Caixa já fechado")]
    CashierSessionClosed,

    #[error("Transição de status inválida: {from} -> {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Estoque insuficiente: {0}")]
    InsufficientStock(String),

    #[error("Valor inválido: {0}")]
    InvalidAmount(String),

    #[error("Título já liquidado")]
    TitleAlreadySettled,

    #[error("Recurso em uso: {0}")]
    ResourceInUse(String),

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::FranchiseContextMissing
            | AppError::InvalidFranchiseHeader => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::UserNotFound | AppError::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            AppError::EmailAlreadyExists
            | AppError::UniqueConstraintViolation(_)
            | AppError::CashierSessionAlreadyOpen
            | AppError::CashierSessionClosed
            | AppError::TitleAlreadySettled
            | AppError::ResourceInUse(_) => StatusCode::CONFLICT,
            AppError::NoOpenCashierSession
            | AppError::InvalidStatusTransition { .. }
            | AppError::InsufficientStock(_)
            | AppError::InvalidAmount(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Chave do catálogo de mensagens e os argumentos para interpolação.
    fn message_key(&self) -> (&'static str, Vec<(&'static str, String)>) {
        match self {
            AppError::ValidationError(_) => ("errors.validation", vec![]),
            AppError::EmailAlreadyExists => ("errors.email_already_exists", vec![]),
            AppError::InvalidCredentials => ("errors.invalid_credentials", vec![]),
            AppError::InvalidToken => ("errors.invalid_token", vec![]),
            AppError::UserNotFound => ("errors.user_not_found", vec![]),
            AppError::Forbidden => ("errors.forbidden", vec![]),
            AppError::FranchiseContextMissing => ("errors.franchise_context_missing", vec![]),
            AppError::InvalidFranchiseHeader => ("errors.invalid_franchise_header", vec![]),
            AppError::ResourceNotFound(resource) => {
                ("errors.resource_not_found", vec![("resource", resource.clone())])
            }
            AppError::DatabaseError(sqlx::Error::RowNotFound) => {
                ("errors.resource_not_found", vec![("resource", "record".to_string())])
            }
            AppError::UniqueConstraintViolation(field) => {
                ("errors.unique_violation", vec![("field", field.clone())])
            }
            AppError::NoOpenCashierSession => ("errors.no_open_cashier_session", vec![]),
            AppError::CashierSessionAlreadyOpen => ("errors.cashier_session_already_open", vec![]),
            AppError::CashierSessionClosed => ("errors.cashier_session_closed", vec![]),
            AppError::InvalidStatusTransition { from, to } => (
                "errors.invalid_status_transition",
                vec![("from", from.clone()), ("to", to.clone())],
            ),
            AppError::InsufficientStock(product) => {
                ("errors.insufficient_stock", vec![("product", product.clone())])
            }
            AppError::InvalidAmount(field) => ("errors.invalid_amount", vec![("field", field.clone())]),
            AppError::TitleAlreadySettled => ("errors.title_already_settled", vec![]),
            AppError::ResourceInUse(resource) => {
                ("errors.resource_in_use", vec![("resource", resource.clone())])
            }
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => ("errors.internal", vec![]),
        }
    }

    /// Converte o erro de domínio na resposta HTTP traduzida para o idioma do cliente.
    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let lang = locale.0.as_str();
        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "Erro Interno do Servidor");
        }

        let (key, args) = self.message_key();
        let message = store.translate(lang, key, &args);

        // Erros de validação carregam o detalhe campo a campo
        let details = match self {
            AppError::ValidationError(errors) => {
                let mut fields = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<Value> = field_errors
                        .iter()
                        .map(|e| {
                            let key = e
                                .message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string());
                            Value::String(store.translate(lang, &key, &[]))
                        })
                        .collect();
                    fields.insert(field.to_string(), Value::Array(messages));
                }
                Some(Value::Object(fields))
            }
            _ => None,
        };

        ApiError {
            status,
            error: message,
            details,
        }
    }
}

/// Erro de validação de um único campo, para regras checadas fora do `Validate`.
pub fn field_error(field: &'static str, message_key: &'static str) -> AppError {
    let mut error = validator::ValidationError::new("invalid");
    error.message = Some(message_key.into());
    let mut errors = validator::ValidationErrors::new();
    errors.add(field, error);
    AppError::ValidationError(errors)
}

/// Mapeia violação de unicidade do Postgres para um erro amigável.
pub(crate) fn map_unique_violation(e: sqlx::Error, field: &str) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return AppError::UniqueConstraintViolation(field.to_string());
        }
    }
    e.into()
}

// O erro que efetivamente sai pela API
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(email(message = "validation.email"))]
        email: String,
    }

    fn store() -> I18nStore {
        I18nStore::load().expect("catálogos embutidos devem ser válidos")
    }

    #[test]
    fn maps_domain_errors_to_http_status() {
        assert_eq!(AppError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::CashierSessionClosed.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::NoOpenCashierSession.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::DatabaseError(sqlx::Error::RowNotFound).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::DatabaseError(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn translates_message_with_arguments() {
        let err = AppError::InvalidStatusTransition {
            from: "cancelled".into(),
            to: "completed".into(),
        };
        let api = err.to_api_error(&Locale("pt".into()), &store());
        assert_eq!(api.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            api.error,
            "Não é possível mudar o status de 'cancelled' para 'completed'."
        );
    }

    #[test]
    fn validation_errors_carry_field_details() {
        let errors = Sample { email: "not-an-email".into() }
            .validate()
            .expect_err("e-mail inválido deve falhar");
        let api = AppError::ValidationError(errors).to_api_error(&Locale("en".into()), &store());

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        let details = api.details.expect("detalhes de validação");
        assert_eq!(details["email"][0], "The e-mail provided is invalid.");
    }

    #[test]
    fn single_field_error_is_a_bad_request() {
        let api = field_error("cnpj", "validation.cnpj").to_api_error(&Locale("en".into()), &store());
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert!(api.details.expect("detalhes")["cnpj"][0].is_string());
    }
}
