// tests/cashier_order_tests.rs
//
// Fluxo caixa + ordens contra um Postgres real. Cada teste recebe um banco
// novo do `sqlx::test`, com as migrações aplicadas (requer DATABASE_URL).

use axum::http::StatusCode;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use otica_backoffice::{
    common::error::AppError,
    config::{AppState, Config},
    db::UserRepository,
    models::{
        auth::{User, UserRole},
        client::ClientData,
        franchise::FranchiseData,
        orders::{NewOrderItem, OrderStatus, PaymentMethod},
        product::{Product, ProductData},
    },
    services::order_service::NewOrder,
};

struct Fixture {
    app: AppState,
    franchise_id: Uuid,
    operator: User,
    client_id: Uuid,
    product: Product,
}

fn money(raw: &str) -> Decimal {
    raw.parse().expect("decimal válido")
}

async fn setup(pool: PgPool) -> Fixture {
    let config = Config::from_lookup(|key| match key {
        "JWT_SECRET" => Some("segredo-de-teste".to_string()),
        _ => None,
    })
    .expect("configuração de teste");
    let app = AppState::from_pool(pool.clone(), config).expect("estado da aplicação");

    let franchise = app
        .franchise_service
        .create_franchise(FranchiseData {
            name: "Ótica Teste".into(),
            cnpj: "12.345.678/0001-99".into(),
            address: None,
            city: Some("Curitiba".into()),
            state: Some("PR".into()),
            phone: None,
            email: None,
        })
        .await
        .expect("franquia criada");

    let operator = UserRepository::new(pool.clone())
        .create_user(
            &pool,
            "gerente@otica.test",
            "hash-irrelevante",
            "Gerente Teste",
            UserRole::FranchiseAdmin,
            Some(franchise.id),
        )
        .await
        .expect("operador criado");

    let client = app
        .client_service
        .create_client(
            franchise.id,
            ClientData {
                full_name: "Ana Cliente".into(),
                cpf: None,
                email: None,
                phone: None,
                birth_date: None,
                address: None,
                notes: None,
            },
        )
        .await
        .expect("cliente criado");

    let product = app
        .product_service
        .create_product(
            franchise.id,
            ProductData {
                sku: "ARM-001".into(),
                name: "Armação Aviador".into(),
                category: Some("Armações".into()),
                brand: None,
                price: money("200.00"),
                cost: None,
                is_active: true,
            },
            10,
        )
        .await
        .expect("produto criado");

    Fixture {
        app,
        franchise_id: franchise.id,
        operator,
        client_id: client.id,
        product,
    }
}

impl Fixture {
    fn order(&self, payment_method: PaymentMethod, items: Vec<NewOrderItem>) -> NewOrder {
        NewOrder {
            client_id: self.client_id,
            employee_id: None,
            payment_method,
            notes: None,
            items,
        }
    }

    fn frame(&self, quantity: i32) -> NewOrderItem {
        NewOrderItem {
            product_id: Some(self.product.id),
            description: self.product.name.clone(),
            quantity,
            unit_price: money("200.00"),
            discount: Decimal::ZERO,
        }
    }

    fn service(&self, description: &str, price: &str) -> NewOrderItem {
        NewOrderItem {
            product_id: None,
            description: description.into(),
            quantity: 1,
            unit_price: money(price),
            discount: Decimal::ZERO,
        }
    }

    async fn stock(&self) -> i32 {
        self.app
            .product_service
            .get_product(self.franchise_id, self.product.id)
            .await
            .expect("produto")
            .stock_quantity
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn create_order_updates_session_totals_and_stock(pool: PgPool) {
    let fx = setup(pool).await;
    let session = fx
        .app
        .cashier_service
        .open_session(fx.franchise_id, &fx.operator, money("100.00"), None)
        .await
        .expect("caixa aberto");

    // Duas linhas do mesmo produto viram uma única baixa de 3 unidades
    let mut frame_line = fx.frame(2);
    frame_line.discount = money("20.00");
    let detail = fx
        .app
        .order_service
        .create_order(
            fx.franchise_id,
            &fx.operator,
            fx.order(
                PaymentMethod::Cash,
                vec![frame_line, fx.service("Montagem", "50.00"), fx.frame(1)],
            ),
        )
        .await
        .expect("ordem criada");

    assert_eq!(detail.header.session_id, session.id);
    assert_eq!(detail.header.total_amount, money("630.00"));
    assert_eq!(detail.header.total_discount, money("20.00"));
    assert_eq!(detail.items.len(), 3);
    assert_eq!(fx.stock().await, 7);

    let current = fx
        .app
        .cashier_service
        .current_session(fx.franchise_id, fx.operator.id)
        .await
        .expect("caixa atual");
    assert_eq!(current.total_sales, money("630.00"));
    assert_eq!(current.cash_sales, money("630.00"));
    assert_eq!(current.order_count, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn cancelling_an_order_restores_stock_and_drops_it_from_totals(pool: PgPool) {
    let fx = setup(pool).await;
    fx.app
        .cashier_service
        .open_session(fx.franchise_id, &fx.operator, Decimal::ZERO, None)
        .await
        .expect("caixa aberto");

    let kept = fx
        .app
        .order_service
        .create_order(
            fx.franchise_id,
            &fx.operator,
            fx.order(PaymentMethod::Pix, vec![fx.service("Ajuste", "30.00")]),
        )
        .await
        .expect("ordem mantida");
    let cancelled = fx
        .app
        .order_service
        .create_order(
            fx.franchise_id,
            &fx.operator,
            fx.order(PaymentMethod::Cash, vec![fx.frame(3), fx.frame(1)]),
        )
        .await
        .expect("ordem a cancelar");
    assert_eq!(fx.stock().await, 6);

    let updated = fx
        .app
        .order_service
        .change_status(fx.franchise_id, &fx.operator, cancelled.header.id, OrderStatus::Cancelled)
        .await
        .expect("ordem cancelada");
    assert_eq!(updated.status, OrderStatus::Cancelled);
    assert_eq!(fx.stock().await, 10);

    let session = fx
        .app
        .cashier_service
        .current_session(fx.franchise_id, fx.operator.id)
        .await
        .expect("caixa atual");
    assert_eq!(session.total_sales, kept.header.total_amount);
    assert_eq!(session.pix_sales, money("30.00"));
    assert_eq!(session.cash_sales, Decimal::ZERO);
    assert_eq!(session.order_count, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn order_without_open_session_is_rejected(pool: PgPool) {
    let fx = setup(pool).await;

    let err = fx
        .app
        .order_service
        .create_order(fx.franchise_id, &fx.operator, fx.order(PaymentMethod::Cash, vec![fx.frame(1)]))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NoOpenCashierSession), "{err:?}");
    assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(fx.stock().await, 10);
}

#[sqlx::test(migrations = "./migrations")]
async fn insufficient_stock_rolls_back_the_whole_order(pool: PgPool) {
    let fx = setup(pool).await;
    fx.app
        .cashier_service
        .open_session(fx.franchise_id, &fx.operator, Decimal::ZERO, None)
        .await
        .expect("caixa aberto");

    let err = fx
        .app
        .order_service
        .create_order(
            fx.franchise_id,
            &fx.operator,
            fx.order(PaymentMethod::Cash, vec![fx.frame(6), fx.frame(5)]),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InsufficientStock(ref name) if name == "Armação Aviador"), "{err:?}");
    assert_eq!(fx.stock().await, 10);
    let session = fx
        .app
        .cashier_service
        .current_session(fx.franchise_id, fx.operator.id)
        .await
        .expect("caixa atual");
    assert_eq!(session.order_count, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn orders_of_a_closed_session_cannot_change_status(pool: PgPool) {
    let fx = setup(pool).await;
    let session = fx
        .app
        .cashier_service
        .open_session(fx.franchise_id, &fx.operator, Decimal::ZERO, None)
        .await
        .expect("caixa aberto");
    let order = fx
        .app
        .order_service
        .create_order(fx.franchise_id, &fx.operator, fx.order(PaymentMethod::Cash, vec![fx.frame(1)]))
        .await
        .expect("ordem criada");
    fx.app
        .cashier_service
        .close_session(fx.franchise_id, &fx.operator, session.id, money("200.00"), None)
        .await
        .expect("caixa fechado");

    let err = fx
        .app
        .order_service
        .change_status(fx.franchise_id, &fx.operator, order.header.id, OrderStatus::Cancelled)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::CashierSessionClosed), "{err:?}");
    assert_eq!(err.status_code(), StatusCode::CONFLICT);
    assert_eq!(fx.stock().await, 9);
}

#[sqlx::test(migrations = "./migrations")]
async fn close_session_uses_recomputed_totals(pool: PgPool) {
    let fx = setup(pool.clone()).await;
    let session = fx
        .app
        .cashier_service
        .open_session(fx.franchise_id, &fx.operator, money("100.00"), None)
        .await
        .expect("caixa aberto");
    for (method, price) in [(PaymentMethod::Cash, "200.00"), (PaymentMethod::Pix, "50.00")] {
        fx.app
            .order_service
            .create_order(fx.franchise_id, &fx.operator, fx.order(method, vec![fx.service("Exame", price)]))
            .await
            .expect("ordem criada");
    }

    // Totais gravados corrompidos: o fechamento não pode confiar neles
    sqlx::query("UPDATE cashier_sessions SET total_sales = 0, cash_sales = 0, order_count = 0 WHERE id = $1")
        .bind(session.id)
        .execute(&pool)
        .await
        .expect("corrompe totais");

    let closed = fx
        .app
        .cashier_service
        .close_session(fx.franchise_id, &fx.operator, session.id, money("290.00"), Some("fim do dia"))
        .await
        .expect("caixa fechado");

    assert!(!closed.is_open());
    assert_eq!(closed.total_sales, money("250.00"));
    assert_eq!(closed.cash_sales, money("200.00"));
    assert_eq!(closed.pix_sales, money("50.00"));
    assert_eq!(closed.order_count, 2);
    assert_eq!(closed.expected_amount, Some(money("350.00")));
    assert_eq!(closed.difference, Some(money("-60.00")));

    let again = fx
        .app
        .cashier_service
        .close_session(fx.franchise_id, &fx.operator, session.id, money("290.00"), None)
        .await
        .unwrap_err();
    assert!(matches!(again, AppError::CashierSessionClosed), "{again:?}");
}

#[sqlx::test(migrations = "./migrations")]
async fn operator_cannot_open_two_sessions(pool: PgPool) {
    let fx = setup(pool).await;
    fx.app
        .cashier_service
        .open_session(fx.franchise_id, &fx.operator, Decimal::ZERO, None)
        .await
        .expect("primeiro caixa");

    let err = fx
        .app
        .cashier_service
        .open_session(fx.franchise_id, &fx.operator, money("10.00"), None)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::CashierSessionAlreadyOpen), "{err:?}");
    assert_eq!(err.status_code(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn reconcile_with_apply_fixes_drifted_closed_session(pool: PgPool) {
    let fx = setup(pool.clone()).await;
    let session = fx
        .app
        .cashier_service
        .open_session(fx.franchise_id, &fx.operator, money("50.00"), None)
        .await
        .expect("caixa aberto");
    fx.app
        .order_service
        .create_order(fx.franchise_id, &fx.operator, fx.order(PaymentMethod::Cash, vec![fx.service("Lente", "100.00")]))
        .await
        .expect("ordem criada");
    fx.app
        .cashier_service
        .close_session(fx.franchise_id, &fx.operator, session.id, money("150.00"), None)
        .await
        .expect("caixa fechado");

    sqlx::query("UPDATE cashier_sessions SET total_sales = 80, cash_sales = 80, difference = 20 WHERE id = $1")
        .bind(session.id)
        .execute(&pool)
        .await
        .expect("corrompe totais");

    let dry = fx
        .app
        .cashier_service
        .reconcile_session(fx.franchise_id, session.id, false)
        .await
        .expect("conferência");
    assert!(dry.drifted);
    assert_eq!(dry.stored.total_sales, money("80.00"));

    let fixed = fx
        .app
        .cashier_service
        .reconcile_session(fx.franchise_id, session.id, true)
        .await
        .expect("correção");
    assert!(fixed.drifted);
    assert_eq!(fixed.recomputed.total_sales, money("100.00"));
    assert_eq!(fixed.recomputed_difference, Some(Decimal::ZERO));

    let detail = fx
        .app
        .cashier_service
        .session_detail(fx.franchise_id, session.id)
        .await
        .expect("detalhe");
    assert_eq!(detail.session.total_sales, money("100.00"));
    assert_eq!(detail.session.expected_amount, Some(money("150.00")));
    assert_eq!(detail.session.difference, Some(Decimal::ZERO));

    let clean = fx
        .app
        .cashier_service
        .reconcile_session(fx.franchise_id, session.id, false)
        .await
        .expect("nova conferência");
    assert!(!clean.drifted);
}

#[sqlx::test(migrations = "./migrations")]
async fn batch_reconcile_keeps_going_after_a_failed_session(pool: PgPool) {
    let fx = setup(pool.clone()).await;

    // Sessão cujo valor esperado não cabe em NUMERIC(12, 2): a correção falha no banco
    let broken = fx
        .app
        .cashier_service
        .open_session(fx.franchise_id, &fx.operator, money("9999999999.99"), None)
        .await
        .expect("caixa aberto");
    fx.app
        .order_service
        .create_order(fx.franchise_id, &fx.operator, fx.order(PaymentMethod::Cash, vec![fx.service("Exame", "100.00")]))
        .await
        .expect("ordem criada");
    sqlx::query(
        r#"
        UPDATE cashier_sessions
        SET status = 'closed', closed_at = NOW(), closed_by = opened_by,
            final_amount = 0, expected_amount = 0, difference = 0,
            total_sales = 0, cash_sales = 0, order_count = 0
        WHERE id = $1
        "#,
    )
    .bind(broken.id)
    .execute(&pool)
    .await
    .expect("fecha sessão à mão");

    let healthy = fx
        .app
        .cashier_service
        .open_session(fx.franchise_id, &fx.operator, Decimal::ZERO, None)
        .await
        .expect("segundo caixa");
    fx.app
        .order_service
        .create_order(fx.franchise_id, &fx.operator, fx.order(PaymentMethod::Pix, vec![fx.service("Ajuste", "40.00")]))
        .await
        .expect("ordem criada");
    sqlx::query("UPDATE cashier_sessions SET total_sales = 0, pix_sales = 0 WHERE id = $1")
        .bind(healthy.id)
        .execute(&pool)
        .await
        .expect("corrompe totais");

    let report = fx
        .app
        .cashier_service
        .reconcile_all(Some(fx.franchise_id), true)
        .await
        .expect("lote concluído");

    assert_eq!(report.failed, vec![broken.id]);
    assert_eq!(report.drifts.len(), 1);
    assert_eq!(report.drifts[0].session_id, healthy.id);
    assert_eq!(report.drifted().count(), 1);

    let current = fx
        .app
        .cashier_service
        .current_session(fx.franchise_id, fx.operator.id)
        .await
        .expect("caixa atual");
    assert_eq!(current.id, healthy.id);
    assert_eq!(current.total_sales, money("40.00"));
    assert_eq!(current.pix_sales, money("40.00"));
}
