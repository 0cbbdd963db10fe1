//! Authentication Middleware
//!
//! Axum middleware for session token validation. Two rejection styles exist:
//! HTML routes redirect to `/login`, API routes answer 401. A missing token
//! and a bad token are rejected the same way.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::auth::{TOKEN_COOKIE, jwt::JwtService, models::AuthUser};
use crate::error::AppError;

pub const LOGIN_PATH: &str = "/login";

/// Authentication middleware that validates session tokens and injects user info
pub struct AuthMiddleware;

impl AuthMiddleware {
    /// Gate for HTML routes: redirects (303) to the login page on failure
    pub async fn require_session(
        State(jwt_service): State<Arc<JwtService>>,
        jar: CookieJar,
        mut req: Request,
        next: Next,
    ) -> Response {
        match authenticate(&jwt_service, cookie_token(&jar)) {
            Some(auth_user) => {
                req.extensions_mut().insert(auth_user);
                next.run(req).await
            }
            None => {
                tracing::info!("[AuthMiddleware] Rejected {} {}, redirecting to login", req.method(), req.uri());
                Redirect::to(LOGIN_PATH).into_response()
            }
        }
    }

    /// Gate for JSON API routes: answers 401 `{error, message}` on failure
    pub async fn require_api_token(
        State(jwt_service): State<Arc<JwtService>>,
        jar: CookieJar,
        mut req: Request,
        next: Next,
    ) -> Result<Response, AppError> {
        let token = cookie_token(&jar).or_else(|| bearer_token(&req));
        let auth_user = authenticate(&jwt_service, token).ok_or_else(|| {
            tracing::info!("[AuthMiddleware] Rejected {} {} with 401", req.method(), req.uri());
            AppError::unauthenticated()
        })?;

        req.extensions_mut().insert(auth_user);
        Ok(next.run(req).await)
    }

    /// Optional authentication - doesn't fail if no token is provided
    pub async fn optional_auth(
        State(jwt_service): State<Arc<JwtService>>,
        jar: CookieJar,
        mut req: Request,
        next: Next,
    ) -> Response {
        if let Some(auth_user) = authenticate(&jwt_service, cookie_token(&jar)) {
            req.extensions_mut().insert(auth_user);
        }
        next.run(req).await
    }
}

/// Session token from the `token` cookie. HTML routes only look here.
fn cookie_token(jar: &CookieJar) -> Option<String> {
    jar.get(TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

/// Token from an `Authorization: Bearer` header, accepted by the JSON API.
fn bearer_token(req: &Request) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

fn authenticate(jwt_service: &JwtService, token: Option<String>) -> Option<AuthUser> {
    let username = jwt_service.verify_token(&token?)?;
    tracing::debug!("[AuthMiddleware] Authenticated {}", username);
    Some(AuthUser { username })
}
