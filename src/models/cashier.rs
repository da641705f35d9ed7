// src/models/cashier.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use utoipa::ToSchema;

use crate::models::orders::{OrderStatus, PaymentMethod};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "cashier_session_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CashierSessionStatus {
    Open,
    Closed,
}

// ---
// Sessão de caixa (um turno do operador)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CashierSession {
    pub id: Uuid,
    #[schema(ignore)]
    pub franchise_id: Uuid,
    pub opened_by: Uuid,
    pub closed_by: Option<Uuid>,
    pub status: CashierSessionStatus,
    #[schema(example = "200.00")]
    pub initial_amount: Decimal,
    #[schema(example = "1840.50")]
    pub total_sales: Decimal,
    pub cash_sales: Decimal,
    pub credit_card_sales: Decimal,
    pub debit_card_sales: Decimal,
    pub pix_sales: Decimal,
    pub other_sales: Decimal,
    pub order_count: i32,
    pub final_amount: Option<Decimal>,
    pub expected_amount: Option<Decimal>,
    #[schema(example = "-2.50")]
    pub difference: Option<Decimal>,
    pub opening_notes: Option<String>,
    pub closing_notes: Option<String>,
    pub opened_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl CashierSession {
    pub fn is_open(&self) -> bool {
        self.status == CashierSessionStatus::Open
    }

    /// Os totais como estão gravados na linha (podem estar desatualizados).
    pub fn stored_totals(&self) -> SessionTotals {
        SessionTotals {
            total_sales: self.total_sales,
            cash_sales: self.cash_sales,
            credit_card_sales: self.credit_card_sales,
            debit_card_sales: self.debit_card_sales,
            pix_sales: self.pix_sales,
            other_sales: self.other_sales,
            order_count: self.order_count,
        }
    }
}

// O mínimo de uma ordem que importa para o fechamento
#[derive(Debug, Clone, FromRow)]
pub struct OrderTally {
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub total_amount: Decimal,
}

/// Totais de venda de uma sessão, separados por forma de pagamento.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionTotals {
    pub total_sales: Decimal,
    pub cash_sales: Decimal,
    pub credit_card_sales: Decimal,
    pub debit_card_sales: Decimal,
    pub pix_sales: Decimal,
    pub other_sales: Decimal,
    pub order_count: i32,
}

impl SessionTotals {
    /// Soma as ordens não canceladas da sessão.
    pub fn from_orders<I>(orders: I) -> Self
    where
        I: IntoIterator<Item = OrderTally>,
    {
        orders
            .into_iter()
            .filter(|order| order.status.counts_as_sale())
            .fold(SessionTotals::default(), |mut totals, order| {
                let amount = order.total_amount;
                totals.total_sales += amount;
                match order.payment_method {
                    PaymentMethod::Cash => totals.cash_sales += amount,
                    PaymentMethod::CreditCard => totals.credit_card_sales += amount,
                    PaymentMethod::DebitCard => totals.debit_card_sales += amount,
                    PaymentMethod::Pix => totals.pix_sales += amount,
                    PaymentMethod::BankSlip | PaymentMethod::Other => totals.other_sales += amount,
                }
                totals.order_count += 1;
                totals
            })
    }
}

/// initial_amount + total_sales
pub fn expected_total(initial_amount: Decimal, total_sales: Decimal) -> Decimal {
    initial_amount + total_sales
}

/// final_amount − (initial_amount + total_sales). Negativo = falta no caixa.
pub fn cash_difference(final_amount: Decimal, initial_amount: Decimal, total_sales: Decimal) -> Decimal {
    final_amount - expected_total(initial_amount, total_sales)
}

// Sessão + ordens, para a tela de conferência
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CashierSessionDetail {
    #[serde(flatten)]
    pub session: CashierSession,
    pub orders: Vec<crate::models::orders::ServiceOrder>,
}

// Resultado de uma reconciliação: o que estava gravado x o que as ordens dizem
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionDrift {
    pub session_id: Uuid,
    pub stored: SessionTotals,
    pub recomputed: SessionTotals,
    pub stored_difference: Option<Decimal>,
    pub recomputed_difference: Option<Decimal>,
    pub drifted: bool,
}

impl SessionDrift {
    pub fn between(session: &CashierSession, recomputed: SessionTotals) -> Self {
        let stored = session.stored_totals();
        let recomputed_difference = session
            .final_amount
            .map(|final_amount| cash_difference(final_amount, session.initial_amount, recomputed.total_sales));
        let drifted = stored != recomputed || session.difference != recomputed_difference;

        Self {
            session_id: session.id,
            stored,
            recomputed,
            stored_difference: session.difference,
            recomputed_difference,
            drifted,
        }
    }
}

/// Saída da reconciliação em lote: sessões conferidas e as que falharam.
#[derive(Debug, Default)]
pub struct ReconciliationReport {
    pub drifts: Vec<SessionDrift>,
    pub failed: Vec<Uuid>,
}

impl ReconciliationReport {
    pub fn drifted(&self) -> impl Iterator<Item = &SessionDrift> {
        self.drifts.iter().filter(|d| d.drifted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(v: &str) -> Decimal {
        Decimal::from_str(v).unwrap()
    }

    fn tally(status: OrderStatus, method: PaymentMethod, amount: &str) -> OrderTally {
        OrderTally {
            status,
            payment_method: method,
            total_amount: dec(amount),
        }
    }

    fn session(initial: &str, totals: &SessionTotals, final_amount: Option<&str>, difference: Option<&str>) -> CashierSession {
        let now = Utc::now();
        CashierSession {
            id: Uuid::new_v4(),
            franchise_id: Uuid::new_v4(),
            opened_by: Uuid::new_v4(),
            closed_by: None,
            status: if final_amount.is_some() {
                CashierSessionStatus::Closed
            } else {
                CashierSessionStatus::Open
            },
            initial_amount: dec(initial),
            total_sales: totals.total_sales,
            cash_sales: totals.cash_sales,
            credit_card_sales: totals.credit_card_sales,
            debit_card_sales: totals.debit_card_sales,
            pix_sales: totals.pix_sales,
            other_sales: totals.other_sales,
            order_count: totals.order_count,
            final_amount: final_amount.map(dec),
            expected_amount: None,
            difference: difference.map(dec),
            opening_notes: None,
            closing_notes: None,
            opened_at: now,
            closed_at: final_amount.map(|_| now),
            updated_at: now,
        }
    }

    #[test]
    fn totals_ignore_cancelled_orders() {
        let totals = SessionTotals::from_orders(vec![
            tally(OrderStatus::Completed, PaymentMethod::Cash, "100.00"),
            tally(OrderStatus::Pending, PaymentMethod::Pix, "50.50"),
            tally(OrderStatus::Cancelled, PaymentMethod::Cash, "999.99"),
            tally(OrderStatus::InProgress, PaymentMethod::CreditCard, "300.00"),
            tally(OrderStatus::Completed, PaymentMethod::BankSlip, "20.00"),
        ]);

        assert_eq!(totals.total_sales, dec("470.50"));
        assert_eq!(totals.cash_sales, dec("100.00"));
        assert_eq!(totals.pix_sales, dec("50.50"));
        assert_eq!(totals.credit_card_sales, dec("300.00"));
        assert_eq!(totals.debit_card_sales, Decimal::ZERO);
        assert_eq!(totals.other_sales, dec("20.00"));
        assert_eq!(totals.order_count, 4);
    }

    #[test]
    fn tender_buckets_add_up_to_total() {
        let totals = SessionTotals::from_orders(vec![
            tally(OrderStatus::Completed, PaymentMethod::Cash, "10.00"),
            tally(OrderStatus::Completed, PaymentMethod::DebitCard, "15.25"),
            tally(OrderStatus::Completed, PaymentMethod::Other, "4.75"),
        ]);
        let buckets = totals.cash_sales
            + totals.credit_card_sales
            + totals.debit_card_sales
            + totals.pix_sales
            + totals.other_sales;
        assert_eq!(buckets, totals.total_sales);
    }

    #[test]
    fn empty_session_has_zero_totals() {
        assert_eq!(SessionTotals::from_orders(Vec::new()), SessionTotals::default());
    }

    #[test]
    fn difference_is_final_minus_expected() {
        assert_eq!(expected_total(dec("200.00"), dec("1840.50")), dec("2040.50"));
        assert_eq!(cash_difference(dec("2038.00"), dec("200.00"), dec("1840.50")), dec("-2.50"));
        assert_eq!(cash_difference(dec("2040.50"), dec("200.00"), dec("1840.50")), Decimal::ZERO);
        assert_eq!(cash_difference(dec("2100.00"), dec("200.00"), dec("1840.50")), dec("59.50"));
    }

    #[test]
    fn drift_detects_stale_totals() {
        let stale = SessionTotals {
            total_sales: dec("100.00"),
            cash_sales: dec("100.00"),
            order_count: 1,
            ..Default::default()
        };
        let open = session("50.00", &stale, None, None);
        let live = SessionTotals::from_orders(vec![
            tally(OrderStatus::Completed, PaymentMethod::Cash, "100.00"),
            tally(OrderStatus::Completed, PaymentMethod::Pix, "30.00"),
        ]);

        let drift = SessionDrift::between(&open, live.clone());
        assert!(drift.drifted);
        assert_eq!(drift.recomputed, live);
        assert_eq!(drift.recomputed_difference, None);
    }

    #[test]
    fn drift_recomputes_difference_of_closed_session() {
        let totals = SessionTotals {
            total_sales: dec("100.00"),
            cash_sales: dec("100.00"),
            order_count: 1,
            ..Default::default()
        };
        // Diferença gravada errada: deveria ser 150 - (50 + 100) = 0
        let closed = session("50.00", &totals, Some("150.00"), Some("10.00"));

        let drift = SessionDrift::between(&closed, totals.clone());
        assert!(drift.drifted);
        assert_eq!(drift.recomputed_difference, Some(Decimal::ZERO));

        let consistent = session("50.00", &totals, Some("150.00"), Some("0"));
        assert!(!SessionDrift::between(&consistent, totals).drifted);
    }
}
