// src/services/client_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        documents::normalize_cpf,
        error::{field_error, AppError},
    },
    db::ClientRepository,
    models::client::{Client, ClientData},
};

#[derive(Clone)]
pub struct ClientService {
    pool: PgPool,
    repo: ClientRepository,
}

impl ClientService {
    pub fn new(pool: PgPool, repo: ClientRepository) -> Self {
        Self { pool, repo }
    }

    pub async fn create_client(&self, franchise_id: Uuid, data: ClientData) -> Result<Client, AppError> {
        let data = normalized(data)?;
        let client = self.repo.create_client(&self.pool, franchise_id, &data).await?;

        tracing::info!(client_id = %client.id, franchise_id = %franchise_id, "Cliente cadastrado");
        Ok(client)
    }

    pub async fn list_clients(&self, franchise_id: Uuid, search: Option<&str>) -> Result<Vec<Client>, AppError> {
        self.repo.list_clients(&self.pool, franchise_id, search).await
    }

    pub async fn get_client(&self, franchise_id: Uuid, id: Uuid) -> Result<Client, AppError> {
        self.repo
            .find_by_id(&self.pool, franchise_id, id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("client".into()))
    }

    pub async fn update_client(&self, franchise_id: Uuid, id: Uuid, data: ClientData) -> Result<Client, AppError> {
        let data = normalized(data)?;

        self.repo
            .update_client(&self.pool, franchise_id, id, &data)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("client".into()))
    }

    pub async fn delete_client(&self, franchise_id: Uuid, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete_client(&self.pool, franchise_id, id).await? {
            return Err(AppError::ResourceNotFound("client".into()));
        }

        tracing::info!(client_id = %id, franchise_id = %franchise_id, "Cliente removido");
        Ok(())
    }
}

// CPF vazio vira None; preenchido precisa ter 11 dígitos
fn normalized(mut data: ClientData) -> Result<ClientData, AppError> {
    data.full_name = data.full_name.trim().to_string();
    data.cpf = match data.cpf.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(normalize_cpf(raw).ok_or_else(|| field_error("cpf", "validation.cpf"))?),
    };
    data.email = data.email.map(|e| e.trim().to_lowercase()).filter(|e| !e.is_empty());
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(cpf: Option<&str>) -> ClientData {
        ClientData {
            full_name: " Carlos Pereira ".into(),
            cpf: cpf.map(String::from),
            email: Some(" Carlos@Mail.com ".into()),
            phone: None,
            birth_date: None,
            address: None,
            notes: None,
        }
    }

    #[test]
    fn stores_cpf_digits_only() {
        let data = normalized(data(Some("123.456.789-09"))).unwrap();
        assert_eq!(data.cpf.as_deref(), Some("12345678909"));
        assert_eq!(data.full_name, "Carlos Pereira");
        assert_eq!(data.email.as_deref(), Some("carlos@mail.com"));
    }

    #[test]
    fn blank_cpf_is_absent_and_bad_cpf_fails() {
        assert_eq!(normalized(data(Some("  "))).unwrap().cpf, None);
        assert!(matches!(normalized(data(Some("123"))), Err(AppError::ValidationError(_))));
    }
}
