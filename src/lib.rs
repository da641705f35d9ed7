// src/lib.rs
//
// Biblioteca compartilhada pelo servidor HTTP e pelo admin-cli.

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
