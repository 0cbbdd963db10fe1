// PostgreSQL repositories
//
// Straight SQL mappers over the pool held by DatabaseConnection. All values
// are bound parameters.

use anyhow::Context;
use async_trait::async_trait;
use deadpool_postgres::Client;
use tokio_postgres::error::SqlState;

use crate::database::models::FromRow;
use crate::database::{CatalogFilter, DatabaseConnection, Manufacturer, Product, User};
use crate::error::{AppError, AppResult};
use crate::repository::{ManufacturerRepository, ProductRepository, UserRepository};

const PRODUCT_SELECT: &str = "SELECT p.product_id, p.product_title, p.product_description, \
     p.contraindications, p.application, p.volume, p.photo, p.manufacturer_id, \
     m.manufacturer_title, m.country, m.address, m.contact_list \
     FROM products p \
     LEFT JOIN manufacturer m ON p.manufacturer_id = m.manufacturer_id";

const MANUFACTURER_SELECT: &str =
    "SELECT manufacturer_id, manufacturer_title, country, address, contact_list FROM manufacturer";

impl DatabaseConnection {
    async fn client(&self) -> AppResult<Client> {
        Ok(self
            .pool()
            .get()
            .await
            .context("Failed to get DB connection")?)
    }
}

fn query_error(err: tokio_postgres::Error, context: &'static str) -> AppError {
    AppError::Storage(anyhow::Error::new(err).context(context))
}

fn map_rows<T: FromRow>(rows: &[tokio_postgres::Row]) -> AppResult<Vec<T>> {
    rows.iter()
        .map(|row| T::from_row(row).context("Failed to map row"))
        .collect::<anyhow::Result<Vec<T>>>()
        .map_err(AppError::from)
}

#[async_trait]
impl UserRepository for DatabaseConnection {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let client = self.client().await?;
        let row = client
            .query_opt(
                "SELECT id, username, password_hash FROM users WHERE username = $1",
                &[&username],
            )
            .await
            .map_err(|e| query_error(e, "Failed to query user by username"))?;

        row.map(|r| User::from_row(&r).context("Failed to map user row"))
            .transpose()
            .map_err(AppError::from)
    }

    async fn create(&self, user: &User) -> AppResult<User> {
        let client = self.client().await?;
        let row = client
            .query_one(
                "INSERT INTO users (username, password_hash) VALUES ($1, $2) RETURNING id",
                &[&user.username, &user.password_hash],
            )
            .await
            .map_err(|e| {
                if e.code() == Some(&SqlState::UNIQUE_VIOLATION) {
                    AppError::Conflict("Username is already taken".to_string())
                } else {
                    query_error(e, "Failed to insert user")
                }
            })?;

        Ok(User {
            id: row.get(0),
            ..user.clone()
        })
    }
}

#[async_trait]
impl ManufacturerRepository for DatabaseConnection {
    async fn list(&self) -> AppResult<Vec<Manufacturer>> {
        let client = self.client().await?;
        let rows = client
            .query(&format!("{MANUFACTURER_SELECT} ORDER BY manufacturer_id ASC"), &[])
            .await
            .map_err(|e| query_error(e, "Failed to list manufacturers"))?;
        map_rows(&rows)
    }

    async fn get(&self, id: i32) -> AppResult<Option<Manufacturer>> {
        let client = self.client().await?;
        let row = client
            .query_opt(&format!("{MANUFACTURER_SELECT} WHERE manufacturer_id = $1"), &[&id])
            .await
            .map_err(|e| query_error(e, "Failed to query manufacturer"))?;

        row.map(|r| Manufacturer::from_row(&r).context("Failed to map manufacturer row"))
            .transpose()
            .map_err(AppError::from)
    }

    async fn create(&self, manufacturer: &Manufacturer) -> AppResult<Manufacturer> {
        let client = self.client().await?;
        let row = client
            .query_one(
                "INSERT INTO manufacturer (manufacturer_title, country, address, contact_list) \
                 VALUES ($1, $2, $3, $4) RETURNING manufacturer_id",
                &[
                    &manufacturer.title,
                    &manufacturer.country,
                    &manufacturer.address,
                    &manufacturer.contact_list,
                ],
            )
            .await
            .map_err(|e| query_error(e, "Failed to insert manufacturer"))?;

        Ok(Manufacturer {
            id: row.get(0),
            ..manufacturer.clone()
        })
    }

    async fn update(&self, manufacturer: &Manufacturer) -> AppResult<bool> {
        let client = self.client().await?;
        let n = client
            .execute(
                "UPDATE manufacturer SET manufacturer_title = $1, country = $2, address = $3, \
                 contact_list = $4 WHERE manufacturer_id = $5",
                &[
                    &manufacturer.title,
                    &manufacturer.country,
                    &manufacturer.address,
                    &manufacturer.contact_list,
                    &manufacturer.id,
                ],
            )
            .await
            .map_err(|e| query_error(e, "Failed to update manufacturer"))?;
        Ok(n > 0)
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let client = self.client().await?;
        let n = client
            .execute("DELETE FROM manufacturer WHERE manufacturer_id = $1", &[&id])
            .await
            .map_err(|e| query_error(e, "Failed to delete manufacturer"))?;
        Ok(n > 0)
    }
}

fn product_write_error(err: tokio_postgres::Error, context: &'static str) -> AppError {
    if err.code() == Some(&SqlState::FOREIGN_KEY_VIOLATION) {
        AppError::Validation("Unknown manufacturer".to_string())
    } else {
        query_error(err, context)
    }
}

#[async_trait]
impl ProductRepository for DatabaseConnection {
    async fn list(&self) -> AppResult<Vec<Product>> {
        let client = self.client().await?;
        let rows = client
            .query(&format!("{PRODUCT_SELECT} ORDER BY p.product_id ASC"), &[])
            .await
            .map_err(|e| query_error(e, "Failed to list products"))?;
        map_rows(&rows)
    }

    async fn search(&self, filter: &CatalogFilter) -> AppResult<Vec<Product>> {
        let query = filter.build();
        let client = self.client().await?;
        let rows = client
            .query(&query.sql(), &query.sql_params())
            .await
            .map_err(|e| query_error(e, "Failed to run filtered product query"))?;
        map_rows(&rows)
    }

    async fn get(&self, id: i32) -> AppResult<Option<Product>> {
        let client = self.client().await?;
        let row = client
            .query_opt(&format!("{PRODUCT_SELECT} WHERE p.product_id = $1"), &[&id])
            .await
            .map_err(|e| query_error(e, "Failed to query product"))?;

        row.map(|r| Product::from_row(&r).context("Failed to map product row"))
            .transpose()
            .map_err(AppError::from)
    }

    async fn create(&self, product: &Product) -> AppResult<Product> {
        let client = self.client().await?;
        let row = client
            .query_one(
                "INSERT INTO products (product_title, product_description, contraindications, \
                 application, volume, photo, manufacturer_id) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING product_id",
                &[
                    &product.title,
                    &product.description,
                    &product.contraindications,
                    &product.application,
                    &product.volume,
                    &product.photo,
                    &product.manufacturer_id,
                ],
            )
            .await
            .map_err(|e| product_write_error(e, "Failed to insert product"))?;

        Ok(Product {
            id: row.get(0),
            ..product.clone()
        })
    }

    async fn update(&self, product: &Product) -> AppResult<bool> {
        let client = self.client().await?;
        let n = client
            .execute(
                "UPDATE products SET product_title = $1, product_description = $2, \
                 contraindications = $3, application = $4, volume = $5, photo = $6, \
                 manufacturer_id = $7 WHERE product_id = $8",
                &[
                    &product.title,
                    &product.description,
                    &product.contraindications,
                    &product.application,
                    &product.volume,
                    &product.photo,
                    &product.manufacturer_id,
                    &product.id,
                ],
            )
            .await
            .map_err(|e| product_write_error(e, "Failed to update product"))?;
        Ok(n > 0)
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let client = self.client().await?;
        let n = client
            .execute("DELETE FROM products WHERE product_id = $1", &[&id])
            .await
            .map_err(|e| query_error(e, "Failed to delete product"))?;
        Ok(n > 0)
    }
}
