// src/db.rs

pub mod cashier_repo;
pub mod client_repo;
pub mod dashboard_repo;
pub mod employee_repo;
pub mod finance_repo;
pub mod franchise_repo;
pub mod order_repo;
pub mod product_repo;
pub mod subscription_repo;
pub mod user_repo;

pub use cashier_repo::CashierRepository;
pub use client_repo::ClientRepository;
pub use dashboard_repo::DashboardRepository;
pub use employee_repo::EmployeeRepository;
pub use finance_repo::FinanceRepository;
pub use franchise_repo::FranchiseRepository;
pub use order_repo::OrderRepository;
pub use product_repo::ProductRepository;
pub use subscription_repo::SubscriptionRepository;
pub use user_repo::UserRepository;
