// src/common.rs

pub mod documents;
pub mod error;
pub mod i18n;
