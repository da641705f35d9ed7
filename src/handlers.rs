// src/handlers.rs

pub mod admin;
pub mod auth;
pub mod cashier;
pub mod clients;
pub mod dashboard;
pub mod employees;
pub mod finance;
pub mod orders;
pub mod products;
pub mod subscriptions;
pub mod users;
