// src/services.rs

pub mod auth;
pub mod cashier_service;
pub mod client_service;
pub mod dashboard_service;
pub mod employee_service;
pub mod finance_service;
pub mod franchise_service;
pub mod order_service;
pub mod product_service;
pub mod subscription_service;
pub mod user_service;
