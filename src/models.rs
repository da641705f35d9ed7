// src/models.rs

pub mod auth;
pub mod cashier;
pub mod client;
pub mod dashboard;
pub mod employee;
pub mod finance;
pub mod franchise;
pub mod orders;
pub mod product;
pub mod subscription;
