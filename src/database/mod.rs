//! # Database Module
//!
//! PostgreSQL integration using tokio-postgres with a deadpool connection pool.
//! Includes connection management, models, the catalog filter builder and
//! migrations.

pub mod connection;
pub mod filter;
pub mod migrations;
pub mod models;

pub use connection::{DatabaseConfig, DatabaseConnection};
pub use filter::CatalogFilter;
pub use models::*;
