//! Product JSON API and the admin panel's product form.

use axum::{
    Form, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Redirect,
};
use serde::Deserialize;

use crate::auth::models::AuthUser;
use crate::database::{Product, ProductInput};
use crate::error::{AppError, AppResult};
use crate::routes::auth::ADMIN_PATH;
use crate::routes::{ApiResponse, json_body};
use crate::server::AppState;

fn not_found() -> AppError {
    AppError::NotFound("Product not found".to_string())
}

fn validate(product: &Product) -> AppResult<()> {
    if product.title.trim().is_empty() {
        return Err(AppError::Validation("Product title is required".to_string()));
    }
    if !product.volume.is_finite() || product.volume < 0.0 {
        return Err(AppError::Validation("Volume must be a non-negative number".to_string()));
    }
    Ok(())
}

pub async fn list_products(
    State(app_state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Product>>>> {
    let products = app_state.products.list().await?;
    Ok(Json(ApiResponse::with_data("Products retrieved", products)))
}

pub async fn get_product(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = app_state.products.get(id).await?.ok_or_else(not_found)?;
    Ok(Json(ApiResponse::with_data("Product retrieved", product)))
}

pub async fn create_product(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<Product>>)> {
    let product = json_body(payload)?.into_product(0);
    validate(&product)?;

    let product = app_state.products.create(&product).await?;
    tracing::info!("{} created product {}", auth_user.username, product.id);

    Ok((StatusCode::CREATED, Json(ApiResponse::with_data("Product created", product))))
}

pub async fn update_product(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = json_body(payload)?.into_product(id);
    validate(&product)?;

    if !app_state.products.update(&product).await? {
        return Err(not_found());
    }
    tracing::info!("{} updated product {}", auth_user.username, id);

    Ok(Json(ApiResponse::with_data("Product updated", product)))
}

pub async fn delete_product(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<()>>> {
    if !app_state.products.delete(id).await? {
        return Err(not_found());
    }
    tracing::info!("{} deleted product {}", auth_user.username, id);

    Ok(Json(ApiResponse::message("Product deleted")))
}

// ============================================================================
// ADMIN FORM
// ============================================================================

/// Product form as posted by the admin panel. HTML forms can only POST, so
/// updates and deletes travel as `_method=PUT` / `_method=DELETE`.
#[derive(Debug, Default, Deserialize)]
pub struct ProductForm {
    #[serde(default, rename = "_method")]
    pub method: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub contraindications: String,
    #[serde(default)]
    pub application: String,
    #[serde(default)]
    pub volume: String,
    #[serde(default)]
    pub photo: String,
    #[serde(default)]
    pub manufacturer_id: String,
}

impl ProductForm {
    fn into_product(self, id: i32) -> AppResult<Product> {
        let volume = self
            .volume
            .trim()
            .parse::<f64>()
            .map_err(|_| AppError::Validation("Invalid volume".to_string()))?;
        let manufacturer_id = self
            .manufacturer_id
            .trim()
            .parse::<i32>()
            .map_err(|_| AppError::Validation("Invalid manufacturer id".to_string()))?;

        let input = ProductInput {
            title: self.title,
            description: self.description,
            contraindications: Some(self.contraindications),
            application: self.application,
            volume,
            photo: self.photo,
            manufacturer_id,
        };
        let product = input.into_product(id);
        validate(&product)?;
        Ok(product)
    }
}

/// `POST /admin/products` - create from the admin form
pub async fn submit_new_product(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
    Form(form): Form<ProductForm>,
) -> AppResult<Redirect> {
    if !form.method.is_empty() && !form.method.eq_ignore_ascii_case("POST") {
        return Err(AppError::MethodNotAllowed);
    }

    let product = app_state.products.create(&form.into_product(0)?).await?;
    tracing::info!("{} created product {} from the admin panel", auth_user.username, product.id);

    Ok(Redirect::to(ADMIN_PATH))
}

/// `POST /admin/products/{id}` - update or delete according to `_method`
pub async fn submit_existing_product(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
    Form(form): Form<ProductForm>,
) -> AppResult<Redirect> {
    match form.method.to_ascii_uppercase().as_str() {
        "DELETE" => {
            if !app_state.products.delete(id).await? {
                return Err(not_found());
            }
            tracing::info!("{} deleted product {} from the admin panel", auth_user.username, id);
        }
        "PUT" => {
            let product = form.into_product(id)?;
            if !app_state.products.update(&product).await? {
                return Err(not_found());
            }
            tracing::info!("{} updated product {} from the admin panel", auth_user.username, id);
        }
        _ => return Err(AppError::MethodNotAllowed),
    }

    Ok(Redirect::to(ADMIN_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(volume: &str, manufacturer_id: &str) -> ProductForm {
        ProductForm {
            title: "Hydrating Cream".to_string(),
            volume: volume.to_string(),
            manufacturer_id: manufacturer_id.to_string(),
            ..ProductForm::default()
        }
    }

    #[test]
    fn test_form_parses_numbers_and_blank_contraindications() {
        let product = ProductForm {
            contraindications: "   ".to_string(),
            ..form("50.5", "3")
        }
        .into_product(7)
        .unwrap();

        assert_eq!(product.id, 7);
        assert_eq!(product.volume, 50.5);
        assert_eq!(product.manufacturer_id, 3);
        assert_eq!(product.contraindications, None);
    }

    #[test]
    fn test_form_keeps_contraindications_text() {
        let product = ProductForm {
            contraindications: " pregnancy ".to_string(),
            ..form("30", "1")
        }
        .into_product(0)
        .unwrap();

        assert_eq!(product.contraindications.as_deref(), Some("pregnancy"));
    }

    #[test]
    fn test_form_rejects_bad_numbers() {
        assert!(matches!(form("lots", "1").into_product(0), Err(AppError::Validation(_))));
        assert!(matches!(form("10", "acme").into_product(0), Err(AppError::Validation(_))));
        assert!(matches!(form("-1", "1").into_product(0), Err(AppError::Validation(_))));
    }
}
