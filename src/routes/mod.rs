// # Routes Module
//
// HTTP route handlers, grouped by area:
// - `health`: liveness and database health
// - `auth`: registration, login (JSON and form) and logout
// - `products` / `manufacturers`: JSON CRUD plus the admin product form
// - `web`: data for the public catalog page and the admin panel
//
// Routers are assembled and gated in `server.rs`.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Health check and monitoring endpoints
pub mod health;

/// Registration, login and logout
pub mod auth;

pub mod manufacturers;
pub mod products;

/// Catalog and admin page data
pub mod web;


/// Response envelope: `{message, data}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
        }
    }
}

/// Unwraps a JSON body, turning every rejection into a 400.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}
