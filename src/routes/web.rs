//! Page data for the public catalog and the admin panel.
//!
//! Rendering is left to the templating layer; these handlers produce the
//! data struct it consumes and serve it as JSON.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::auth::models::AuthUser;
use crate::database::{CatalogFilter, Manufacturer, Product};
use crate::error::AppResult;
use crate::server::AppState;

/// Data behind the catalog and admin pages
#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogPage {
    pub products: Vec<Product>,
    pub manufacturers: Vec<Manufacturer>,
    pub selected_manufacturer_id: i32,
    pub search_query: String,
    pub is_authenticated: bool,
}

/// Raw query string; kept as text so a bad `manufacturer_id` just disables
/// that filter instead of failing the page.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogParams {
    pub manufacturer_id: Option<String>,
    pub query: Option<String>,
}

/// `GET /` - filtered product listing
pub async fn catalog_page(
    State(app_state): State<AppState>,
    viewer: Option<AuthUser>,
    Query(params): Query<CatalogParams>,
) -> AppResult<Json<CatalogPage>> {
    let filter = CatalogFilter::from_params(params.manufacturer_id.as_deref(), params.query.as_deref());
    let products = app_state.products.search(&filter).await?;
    let manufacturers = manufacturers_or_empty(&app_state).await;

    Ok(Json(CatalogPage {
        products,
        manufacturers,
        selected_manufacturer_id: filter.manufacturer_id,
        search_query: filter.search,
        is_authenticated: viewer.is_some(),
    }))
}

/// `GET /admin` - every product, for the admin panel. Only reachable
/// through the session gate.
pub async fn admin_page(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<CatalogPage>> {
    let products = app_state.products.list().await?;
    let manufacturers = manufacturers_or_empty(&app_state).await;
    tracing::debug!("Admin panel opened by {}", auth_user.username);

    Ok(Json(CatalogPage {
        products,
        manufacturers,
        selected_manufacturer_id: 0,
        search_query: String::new(),
        is_authenticated: true,
    }))
}

/// `GET /api` - welcome message
pub async fn welcome() -> Json<crate::routes::ApiResponse<()>> {
    Json(crate::routes::ApiResponse::message("Welcome to the cosmetics catalog API"))
}

// Non-fatal: the page still renders, with an empty manufacturer list
async fn manufacturers_or_empty(app_state: &AppState) -> Vec<Manufacturer> {
    match app_state.manufacturers.list().await {
        Ok(manufacturers) => manufacturers,
        Err(e) => {
            tracing::error!("Failed to load manufacturers: {}", e);
            Vec::new()
        }
    }
}
