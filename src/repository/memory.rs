// In-memory repositories for router tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::database::{CatalogFilter, Manufacturer, Product, User};
use crate::error::{AppError, AppResult};
use crate::repository::{ManufacturerRepository, ProductRepository, UserRepository};

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    manufacturers: Mutex<Vec<Manufacturer>>,
    products: Mutex<Vec<Product>>,
}

// Mirrors the SQL built by CatalogFilter::build, which escapes LIKE
// metacharacters so the search is a literal substring match
fn matches(filter: &CatalogFilter, product: &Product) -> bool {
    (filter.manufacturer_id <= 0 || product.manufacturer_id == filter.manufacturer_id)
        && (filter.search.is_empty() || product.title.contains(&filter.search))
}

fn next_id(ids: impl Iterator<Item = i32>) -> i32 {
    ids.max().unwrap_or(0) + 1
}

impl MemoryStore {
    fn attach_manufacturer(&self, mut product: Product) -> Product {
        product.manufacturer = self
            .manufacturers
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == product.manufacturer_id)
            .cloned();
        product
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create(&self, user: &User) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == user.username) {
            return Err(AppError::Conflict("Username is already taken".to_string()));
        }
        let created = User {
            id: next_id(users.iter().map(|u| u.id)),
            ..user.clone()
        };
        users.push(created.clone());
        Ok(created)
    }
}

#[async_trait]
impl ManufacturerRepository for MemoryStore {
    async fn list(&self) -> AppResult<Vec<Manufacturer>> {
        Ok(self.manufacturers.lock().unwrap().clone())
    }

    async fn get(&self, id: i32) -> AppResult<Option<Manufacturer>> {
        Ok(self
            .manufacturers
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == id)
            .cloned())
    }

    async fn create(&self, manufacturer: &Manufacturer) -> AppResult<Manufacturer> {
        let mut manufacturers = self.manufacturers.lock().unwrap();
        let created = Manufacturer {
            id: next_id(manufacturers.iter().map(|m| m.id)),
            ..manufacturer.clone()
        };
        manufacturers.push(created.clone());
        Ok(created)
    }

    async fn update(&self, manufacturer: &Manufacturer) -> AppResult<bool> {
        let mut manufacturers = self.manufacturers.lock().unwrap();
        match manufacturers.iter_mut().find(|m| m.id == manufacturer.id) {
            Some(existing) => {
                *existing = manufacturer.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let mut manufacturers = self.manufacturers.lock().unwrap();
        let before = manufacturers.len();
        manufacturers.retain(|m| m.id != id);
        let removed = manufacturers.len() != before;
        drop(manufacturers);
        if removed {
            self.products.lock().unwrap().retain(|p| p.manufacturer_id != id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl ProductRepository for MemoryStore {
    async fn list(&self) -> AppResult<Vec<Product>> {
        let products = self.products.lock().unwrap().clone();
        Ok(products.into_iter().map(|p| self.attach_manufacturer(p)).collect())
    }

    async fn search(&self, filter: &CatalogFilter) -> AppResult<Vec<Product>> {
        let products = self.products.lock().unwrap().clone();
        Ok(products
            .into_iter()
            .filter(|p| matches(filter, p))
            .map(|p| self.attach_manufacturer(p))
            .collect())
    }

    async fn get(&self, id: i32) -> AppResult<Option<Product>> {
        let product = self.products.lock().unwrap().iter().find(|p| p.id == id).cloned();
        Ok(product.map(|p| self.attach_manufacturer(p)))
    }

    async fn create(&self, product: &Product) -> AppResult<Product> {
        if ManufacturerRepository::get(self, product.manufacturer_id).await?.is_none() {
            return Err(AppError::Validation("Unknown manufacturer".to_string()));
        }
        let mut products = self.products.lock().unwrap();
        let created = Product {
            id: next_id(products.iter().map(|p| p.id)),
            manufacturer: None,
            ..product.clone()
        };
        products.push(created.clone());
        Ok(created)
    }

    async fn update(&self, product: &Product) -> AppResult<bool> {
        if ManufacturerRepository::get(self, product.manufacturer_id).await?.is_none() {
            return Err(AppError::Validation("Unknown manufacturer".to_string()));
        }
        let mut products = self.products.lock().unwrap();
        match products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => {
                *existing = Product { manufacturer: None, ..product.clone() };
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let mut products = self.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() != before)
    }
}
