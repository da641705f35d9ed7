// src/services/order_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::{field_error, AppError},
    db::{order_repo::OrderFilter, CashierRepository, ClientRepository, EmployeeRepository, OrderRepository, ProductRepository},
    models::{
        auth::User,
        orders::{order_totals, stock_movements, NewOrderItem, OrderStatus, PaymentMethod, ServiceOrder, ServiceOrderDetail},
    },
    services::cashier_service::CashierService,
};

/// Ordem de serviço recebida da API, já desserializada.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub client_id: Uuid,
    pub employee_id: Option<Uuid>,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    pub items: Vec<NewOrderItem>,
}

#[derive(Clone)]
pub struct OrderService {
    pool: PgPool,
    repo: OrderRepository,
    cashier_repo: CashierRepository,
    client_repo: ClientRepository,
    employee_repo: EmployeeRepository,
    product_repo: ProductRepository,
    cashier_service: CashierService,
}

impl OrderService {
    pub fn new(
        pool: PgPool,
        repo: OrderRepository,
        cashier_repo: CashierRepository,
        client_repo: ClientRepository,
        employee_repo: EmployeeRepository,
        product_repo: ProductRepository,
        cashier_service: CashierService,
    ) -> Self {
        Self {
            pool,
            repo,
            cashier_repo,
            client_repo,
            employee_repo,
            product_repo,
            cashier_service,
        }
    }

    // =========================================================================
    //  CRIAÇÃO
    // =========================================================================

    /// Cria a ordem no caixa aberto do operador: baixa estoque, grava ordem e
    /// itens e atualiza os totais do caixa, tudo numa transação.
    pub async fn create_order(&self, franchise_id: Uuid, actor: &User, input: NewOrder) -> Result<ServiceOrderDetail, AppError> {
        if input.items.is_empty() {
            return Err(field_error("items", "validation.items_required"));
        }
        for item in &input.items {
            item.check_amounts()
                .map_err(|field| AppError::InvalidAmount(field.to_string()))?;
        }
        let totals = order_totals(&input.items).map_err(|field| AppError::InvalidAmount(field.to_string()))?;
        let movements = stock_movements(
            input
                .items
                .iter()
                .filter_map(|item| item.product_id.map(|product_id| (product_id, item.quantity))),
        )
        .map_err(|field| AppError::InvalidAmount(field.to_string()))?;

        let mut tx = self.pool.begin().await?;

        // Trava o caixa: fechamento concorrente espera esta transação
        let session = self
            .cashier_repo
            .find_open_for_operator(&mut *tx, franchise_id, actor.id, true)
            .await?
            .ok_or(AppError::NoOpenCashierSession)?;

        let client = self
            .client_repo
            .find_by_id(&mut *tx, franchise_id, input.client_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("client".into()))?;

        let employee_id = match input.employee_id {
            Some(id) => Some(
                self.employee_repo
                    .find_by_id(&mut *tx, franchise_id, id)
                    .await?
                    .ok_or_else(|| AppError::ResourceNotFound("employee".into()))?
                    .id,
            ),
            None => self
                .employee_repo
                .find_by_user(&mut *tx, franchise_id, actor.id)
                .await?
                .map(|e| e.id),
        };

        // Ordem fixa por produto: evita deadlock entre ordens concorrentes
        for (product_id, quantity) in movements {
            let adjusted = self
                .product_repo
                .adjust_stock(&mut *tx, franchise_id, product_id, -quantity)
                .await?;
            if adjusted.is_none() {
                let product = self
                    .product_repo
                    .find_by_id(&mut *tx, franchise_id, product_id)
                    .await?
                    .ok_or_else(|| AppError::ResourceNotFound("product".into()))?;
                return Err(AppError::InsufficientStock(product.name));
            }
        }

        let order = self
            .repo
            .insert_order(
                &mut *tx,
                franchise_id,
                session.id,
                client.id,
                employee_id,
                actor.id,
                input.payment_method,
                totals,
                input.notes.as_deref(),
            )
            .await?;

        let mut items = Vec::with_capacity(input.items.len());
        for item in &input.items {
            items.push(self.repo.insert_item(&mut *tx, franchise_id, order.id, item).await?);
        }

        self.cashier_service
            .refresh_totals(&mut tx, franchise_id, session.id)
            .await?;

        tx.commit().await?;

        tracing::info!(
            order_id = %order.id,
            session_id = %session.id,
            total = %order.total_amount,
            payment_method = ?order.payment_method,
            "Ordem de serviço criada"
        );

        Ok(ServiceOrderDetail {
            header: order,
            client_name: client.full_name,
            items,
        })
    }

    // =========================================================================
    //  CONSULTAS
    // =========================================================================

    pub async fn list_orders(&self, franchise_id: Uuid, filter: &OrderFilter) -> Result<Vec<ServiceOrder>, AppError> {
        self.repo.list_orders(&self.pool, franchise_id, filter).await
    }

    pub async fn get_order(&self, franchise_id: Uuid, id: Uuid) -> Result<ServiceOrderDetail, AppError> {
        let order = self
            .repo
            .find_by_id(&self.pool, franchise_id, id, false)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("order".into()))?;

        let items = self.repo.list_items(&self.pool, franchise_id, order.id).await?;
        let client_name = self.repo.client_name(&self.pool, order.client_id).await?;

        Ok(ServiceOrderDetail {
            header: order,
            client_name,
            items,
        })
    }

    // =========================================================================
    //  STATUS
    // =========================================================================

    pub async fn change_status(
        &self,
        franchise_id: Uuid,
        actor: &User,
        id: Uuid,
        next: OrderStatus,
    ) -> Result<ServiceOrder, AppError> {
        let mut tx = self.pool.begin().await?;

        let order = self
            .repo
            .find_by_id(&mut *tx, franchise_id, id, true)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("order".into()))?;

        // Ordens de caixa fechado não mudam mais
        let session = self
            .cashier_repo
            .find_by_id(&mut *tx, franchise_id, order.session_id, true)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("cashier session".into()))?;
        if !session.is_open() {
            return Err(AppError::CashierSessionClosed);
        }

        let current = order.status;
        if !current.can_transition_to(next) {
            return Err(AppError::InvalidStatusTransition {
                from: current.as_str().to_string(),
                to: next.as_str().to_string(),
            });
        }
        if current == OrderStatus::Completed && !actor.role.is_manager() {
            return Err(AppError::Forbidden);
        }

        let updated = self.repo.update_status(&mut *tx, order.id, next).await?;

        if next == OrderStatus::Cancelled {
            // Devolve ao estoque o que a ordem tinha baixado
            let items = self.repo.list_items(&mut *tx, franchise_id, order.id).await?;
            let movements = stock_movements(
                items
                    .iter()
                    .filter_map(|item| item.product_id.map(|product_id| (product_id, item.quantity))),
            )
            .map_err(|field| AppError::InvalidAmount(field.to_string()))?;
            for (product_id, quantity) in movements {
                self.product_repo
                    .adjust_stock(&mut *tx, franchise_id, product_id, quantity)
                    .await?;
            }
        }

        if current.counts_as_sale() != next.counts_as_sale() {
            self.cashier_service
                .refresh_totals(&mut tx, franchise_id, session.id)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(
            order_id = %order.id,
            from = current.as_str(),
            to = next.as_str(),
            changed_by = %actor.id,
            "Status da ordem alterado"
        );
        Ok(updated)
    }
}
