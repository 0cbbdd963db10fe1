// Database Models
//
// Tokio-postgres compatible models for the catalog tables: users,
// manufacturer and products.

use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

/// Trait for converting from tokio-postgres Row
pub trait FromRow {
    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> where Self: Sized;
}

// ============================================================================
// USER MODELS
// ============================================================================

/// Admin account. The hash is an Argon2 PHC string, never the password.
#[derive(Debug, Clone, Default)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: 0,
            username: username.into(),
            password_hash: String::new(),
        }
    }
}

impl FromRow for User {
    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            password_hash: row.try_get("password_hash")?,
        })
    }
}

// ============================================================================
// CATALOG MODELS
// ============================================================================

/// Cosmetics manufacturer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manufacturer {
    pub id: i32,
    pub title: String,
    pub country: String,
    pub address: String,
    pub contact_list: String,
}

impl FromRow for Manufacturer {
    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            id: row.try_get("manufacturer_id")?,
            title: row.try_get("manufacturer_title")?,
            country: row.try_get("country")?,
            address: row.try_get("address")?,
            contact_list: row.try_get("contact_list")?,
        })
    }
}

/// Create/update payload for a manufacturer
#[derive(Debug, Clone, Deserialize)]
pub struct ManufacturerInput {
    pub title: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub contact_list: String,
}

impl ManufacturerInput {
    pub fn into_manufacturer(self, id: i32) -> Manufacturer {
        Manufacturer {
            id,
            title: self.title,
            country: self.country,
            address: self.address,
            contact_list: self.contact_list,
        }
    }
}

/// Cosmetic product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i32,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contraindications: Option<String>,
    pub application: String,
    pub volume: f64,
    pub photo: String,
    pub manufacturer_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<Manufacturer>,
}

impl FromRow for Product {
    /// Reads the product columns and, when the row came from a join with
    /// `manufacturer`, attaches the manufacturer as well.
    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        let manufacturer = match row.try_get::<_, Option<String>>("manufacturer_title") {
            Ok(Some(_)) => Some(Manufacturer::from_row(row)?),
            _ => None,
        };

        Ok(Self {
            id: row.try_get("product_id")?,
            title: row.try_get("product_title")?,
            description: row.try_get("product_description")?,
            contraindications: row.try_get("contraindications")?,
            application: row.try_get("application")?,
            volume: row.try_get("volume")?,
            photo: row.try_get("photo")?,
            manufacturer_id: row.try_get("manufacturer_id")?,
            manufacturer,
        })
    }
}

/// Create/update payload for a product
#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub contraindications: Option<String>,
    #[serde(default)]
    pub application: String,
    pub volume: f64,
    #[serde(default)]
    pub photo: String,
    pub manufacturer_id: i32,
}

impl ProductInput {
    pub fn into_product(self, id: i32) -> Product {
        Product {
            id,
            title: self.title,
            description: self.description,
            contraindications: self
                .contraindications
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            application: self.application,
            volume: self.volume,
            photo: self.photo,
            manufacturer_id: self.manufacturer_id,
            manufacturer: None,
        }
    }
}
