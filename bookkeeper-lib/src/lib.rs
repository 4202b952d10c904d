pub mod ai;
pub mod auth;
pub mod categories;
pub mod config;
mod error;
pub mod excel;
pub mod tracing;
pub mod transaction;
