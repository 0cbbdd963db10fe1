//! Manufacturer JSON API. Reads are public, writes sit behind the API gate.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::auth::models::AuthUser;
use crate::database::{Manufacturer, ManufacturerInput};
use crate::error::{AppError, AppResult};
use crate::routes::{ApiResponse, json_body};
use crate::server::AppState;

fn not_found() -> AppError {
    AppError::NotFound("Manufacturer not found".to_string())
}

fn validate(input: &ManufacturerInput) -> AppResult<()> {
    if input.title.trim().is_empty() {
        return Err(AppError::Validation("Manufacturer title is required".to_string()));
    }
    Ok(())
}

pub async fn list_manufacturers(
    State(app_state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Manufacturer>>>> {
    let manufacturers = app_state.manufacturers.list().await?;
    Ok(Json(ApiResponse::with_data("Manufacturers retrieved", manufacturers)))
}

pub async fn get_manufacturer(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Manufacturer>>> {
    let manufacturer = app_state.manufacturers.get(id).await?.ok_or_else(not_found)?;
    Ok(Json(ApiResponse::with_data("Manufacturer retrieved", manufacturer)))
}

pub async fn create_manufacturer(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
    payload: Result<Json<ManufacturerInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<Manufacturer>>)> {
    let input = json_body(payload)?;
    validate(&input)?;

    let manufacturer = app_state
        .manufacturers
        .create(&input.into_manufacturer(0))
        .await?;
    tracing::info!("{} created manufacturer {}", auth_user.username, manufacturer.id);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_data("Manufacturer created", manufacturer)),
    ))
}

pub async fn update_manufacturer(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
    payload: Result<Json<ManufacturerInput>, JsonRejection>,
) -> AppResult<Json<ApiResponse<Manufacturer>>> {
    let input = json_body(payload)?;
    validate(&input)?;

    let manufacturer = input.into_manufacturer(id);
    if !app_state.manufacturers.update(&manufacturer).await? {
        return Err(not_found());
    }
    tracing::info!("{} updated manufacturer {}", auth_user.username, id);

    Ok(Json(ApiResponse::with_data("Manufacturer updated", manufacturer)))
}

pub async fn delete_manufacturer(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<()>>> {
    if !app_state.manufacturers.delete(id).await? {
        return Err(not_found());
    }
    tracing::info!("{} deleted manufacturer {}", auth_user.username, id);

    Ok(Json(ApiResponse::message("Manufacturer deleted")))
}
