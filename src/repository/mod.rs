//! # Repository Module
//!
//! Persistence interfaces used by the route handlers. The PostgreSQL
//! implementation lives on [`DatabaseConnection`](crate::database::DatabaseConnection).

use async_trait::async_trait;

use crate::database::{CatalogFilter, Manufacturer, Product, User};
use crate::error::AppResult;

pub mod postgres;

#[cfg(test)]
pub mod memory;

/// Admin account storage
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Inserts the user and returns it with its new id. A taken username is
    /// a `Conflict`.
    async fn create(&self, user: &User) -> AppResult<User>;
}

#[async_trait]
pub trait ManufacturerRepository: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Manufacturer>>;

    async fn get(&self, id: i32) -> AppResult<Option<Manufacturer>>;

    async fn create(&self, manufacturer: &Manufacturer) -> AppResult<Manufacturer>;

    /// Returns false when no manufacturer has that id
    async fn update(&self, manufacturer: &Manufacturer) -> AppResult<bool>;

    async fn delete(&self, id: i32) -> AppResult<bool>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products with their manufacturer, ordered by id
    async fn list(&self) -> AppResult<Vec<Product>>;

    /// Catalog search; see [`CatalogFilter::build`]
    async fn search(&self, filter: &CatalogFilter) -> AppResult<Vec<Product>>;

    async fn get(&self, id: i32) -> AppResult<Option<Product>>;

    /// An unknown `manufacturer_id` is a `Validation` error
    async fn create(&self, product: &Product) -> AppResult<Product>;

    async fn update(&self, product: &Product) -> AppResult<bool>;

    async fn delete(&self, id: i32) -> AppResult<bool>;
}
