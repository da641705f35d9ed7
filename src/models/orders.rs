// src/models/orders.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use utoipa::ToSchema;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "order_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Cancelado é terminal; o resto só anda para frente.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, InProgress)
                | (Pending, Completed)
                | (Pending, Cancelled)
                | (InProgress, Completed)
                | (InProgress, Cancelled)
                | (Completed, Cancelled)
        )
    }

    /// Entra no total de vendas do caixa.
    pub fn counts_as_sale(self) -> bool {
        self != OrderStatus::Cancelled
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    DebitCard,
    Pix,
    BankSlip,
    Other,
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrder {
    pub id: Uuid,
    #[schema(ignore)]
    pub franchise_id: Uuid,
    pub session_id: Uuid,
    pub client_id: Uuid,
    pub employee_id: Option<Uuid>,
    pub created_by: Uuid,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    #[schema(example = "1250.00")]
    pub total_amount: Decimal,
    #[schema(example = "50.00")]
    pub total_discount: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrderItem {
    pub id: Uuid,
    #[schema(ignore)]
    pub franchise_id: Uuid,
    pub order_id: Uuid,
    pub product_id: Option<Uuid>,
    #[schema(example = "Lente multifocal Varilux")]
    pub description: String,
    #[schema(example = 2)]
    pub quantity: i32,
    #[schema(example = "600.00")]
    pub unit_price: Decimal,
    #[schema(example = "0.00")]
    pub discount: Decimal,
    #[schema(example = "1200.00")]
    pub line_total: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrderDetail {
    #[serde(flatten)]
    pub header: ServiceOrder,
    pub client_name: String,
    pub items: Vec<ServiceOrderItem>,
}

// Item já validado, pronto para gravar
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
    pub product_id: Option<Uuid>,
    pub description: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub discount: Decimal,
}

/// Maior valor que cabe em NUMERIC(12, 2).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

impl NewOrderItem {
    /// `None` quando a multiplicação estoura.
    pub fn gross(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }

    pub fn line_total(&self) -> Option<Decimal> {
        self.gross()?.checked_sub(self.discount)
    }

    /// Retorna o nome do campo inválido, se houver.
    pub fn check_amounts(&self) -> Result<(), &'static str> {
        if self.quantity <= 0 {
            return Err("quantity");
        }
        if self.unit_price < Decimal::ZERO || self.unit_price > MAX_AMOUNT {
            return Err("unitPrice");
        }
        let gross = self
            .gross()
            .filter(|gross| *gross <= MAX_AMOUNT)
            .ok_or("unitPrice")?;
        if self.discount < Decimal::ZERO || self.discount > MAX_AMOUNT || self.discount > gross {
            return Err("discount");
        }
        Ok(())
    }
}

/// (total líquido, total de descontos) de um conjunto de itens. Estouro ou
/// total acima de `MAX_AMOUNT` devolve o campo culpado.
pub fn order_totals(items: &[NewOrderItem]) -> Result<(Decimal, Decimal), &'static str> {
    let mut total = Decimal::ZERO;
    let mut discount = Decimal::ZERO;
    for item in items {
        total = item
            .line_total()
            .and_then(|line| total.checked_add(line))
            .filter(|t| *t <= MAX_AMOUNT)
            .ok_or("items")?;
        discount = discount
            .checked_add(item.discount)
            .filter(|d| *d <= MAX_AMOUNT)
            .ok_or("discount")?;
    }
    Ok((total, discount))
}

/// Baixas/devoluções de estoque agrupadas por produto e ordenadas pelo id,
/// para que transações concorrentes travem as linhas na mesma ordem.
pub fn stock_movements<I>(entries: I) -> Result<Vec<(Uuid, i32)>, &'static str>
where
    I: IntoIterator<Item = (Uuid, i32)>,
{
    let mut merged: BTreeMap<Uuid, i32> = BTreeMap::new();
    for (product_id, quantity) in entries {
        let slot = merged.entry(product_id).or_insert(0);
        *slot = slot.checked_add(quantity).ok_or("quantity")?;
    }
    Ok(merged.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn item(quantity: i32, price: &str, discount: &str) -> NewOrderItem {
        NewOrderItem {
            product_id: None,
            description: "Lente".into(),
            quantity,
            unit_price: Decimal::from_str(price).unwrap(),
            discount: Decimal::from_str(discount).unwrap(),
        }
    }

    #[test]
    fn cancelled_is_terminal() {
        for next in [
            OrderStatus::Pending,
            OrderStatus::InProgress,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert!(!OrderStatus::Cancelled.can_transition_to(next));
        }
    }

    #[test]
    fn orders_only_move_forward() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::InProgress));
        assert!(OrderStatus::InProgress.can_transition_to(OrderStatus::Completed));
        assert!(OrderStatus::Completed.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::InProgress.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn totals_subtract_line_discounts() {
        let items = vec![item(2, "600.00", "50.00"), item(1, "89.90", "0")];
        let (total, discount) = order_totals(&items).unwrap();
        assert_eq!(total, Decimal::from_str("1239.90").unwrap());
        assert_eq!(discount, Decimal::from_str("50.00").unwrap());
    }

    #[test]
    fn rejects_discount_above_gross_and_non_positive_quantity() {
        assert_eq!(item(1, "10.00", "10.01").check_amounts(), Err("discount"));
        assert_eq!(item(0, "10.00", "0").check_amounts(), Err("quantity"));
        assert_eq!(item(1, "-1", "0").check_amounts(), Err("unitPrice"));
        assert_eq!(item(3, "10.00", "30.00").check_amounts(), Ok(()));
    }

    #[test]
    fn huge_amounts_are_rejected_instead_of_overflowing() {
        let mut big = item(2, "0", "0");
        big.unit_price = Decimal::from_str("70000000000000000000000000000").unwrap();
        assert_eq!(big.check_amounts(), Err("unitPrice"));
        assert_eq!(big.gross(), None);
        assert!(order_totals(&[big]).is_err());
    }

    #[test]
    fn amounts_above_numeric_column_are_rejected() {
        assert_eq!(MAX_AMOUNT, Decimal::from_str("9999999999.99").unwrap());
        assert_eq!(item(1, "9999999999.99", "0").check_amounts(), Ok(()));
        assert_eq!(item(1, "10000000000.00", "0").check_amounts(), Err("unitPrice"));
        // cada preço cabe, mas o bruto da linha não
        assert_eq!(item(2, "6000000000.00", "0").check_amounts(), Err("unitPrice"));
        assert_eq!(item(1, "10.00", "10000000000.00").check_amounts(), Err("discount"));

        let items = vec![item(1, "6000000000.00", "0"), item(1, "6000000000.00", "0")];
        assert_eq!(order_totals(&items), Err("items"));
    }

    #[test]
    fn stock_movements_are_merged_and_sorted_by_product() {
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);
        let moves = stock_movements([(b, 1), (a, 2), (b, 3)]).unwrap();
        assert_eq!(moves, vec![(a, 2), (b, 4)]);

        // pedidos com [A, B] e [B, A] travam na mesma ordem
        assert_eq!(
            stock_movements([(a, 1), (b, 1)]).unwrap(),
            stock_movements([(b, 1), (a, 1)]).unwrap()
        );
        assert_eq!(stock_movements([(a, i32::MAX), (a, 1)]), Err("quantity"));
    }
}
