//! Auth routes for registration, login and logout

use axum::{
    Form, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::auth::jwt::TOKEN_TTL_HOURS;
use crate::auth::middleware::LOGIN_PATH;
use crate::auth::password::{DUMMY_PASSWORD_HASH, verify_password};
use crate::auth::models::{Credentials, LoginForm, TokenResponse};
use crate::auth::TOKEN_COOKIE;
use crate::database::User;
use crate::error::{AppError, AppResult};
use crate::routes::{ApiResponse, json_body};
use crate::server::AppState;

/// Where a successful form login lands
pub const ADMIN_PATH: &str = "/admin";

/// `POST /api/register` - create an admin account from `{username, password}`
pub async fn register(
    State(app_state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let credentials = json_body(payload)?;
    let username = credentials.username.trim().to_string();
    if username.is_empty() || credentials.password.is_empty() {
        return Err(AppError::Validation(
            "Username and password are required".to_string(),
        ));
    }

    // Argon2 is deliberately slow; keep it off the async workers
    let password = credentials.password;
    let mut user = User::new(username);
    let user = tokio::task::spawn_blocking(move || {
        user.set_password(&password)?;
        Ok::<_, AppError>(user)
    })
    .await
    .map_err(|e| AppError::Hash(e.to_string()))??;

    let user = app_state.users.create(&user).await?;
    tracing::info!("Registered user {}", user.username);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::message("Registration successful")),
    ))
}

/// `POST /api/login` - returns `{message, data: {token}}`
pub async fn login_api(
    State(app_state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> AppResult<Json<ApiResponse<TokenResponse>>> {
    let credentials = json_body(payload)?;
    let token = authenticate_credentials(&app_state, &credentials.username, credentials.password).await?;

    Ok(Json(ApiResponse::with_data(
        "Login successful",
        TokenResponse { token },
    )))
}

/// `POST /login` - form login; sets the `token` cookie and redirects to the
/// admin panel
pub async fn login_form(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> AppResult<impl IntoResponse> {
    let token = authenticate_credentials(&app_state, &form.username, form.password).await?;

    Ok((jar.add(session_cookie(token)), Redirect::to(ADMIN_PATH)))
}

/// `GET|POST /logout` - overwrites the cookie with an expired empty value
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (jar.add(expired_session_cookie()), Redirect::to(LOGIN_PATH))
}

/// Checks the password and issues a token. Unknown user and wrong password
/// produce the same error.
async fn authenticate_credentials(
    app_state: &AppState,
    username: &str,
    password: String,
) -> AppResult<String> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(AppError::invalid_credentials());
    }

    let user = app_state.users.find_by_username(username).await?;

    // Unknown users still pay for one Argon2 verification
    let (user, matches) = tokio::task::spawn_blocking(move || match user {
        Some(user) => {
            let matches = user.check_password(&password);
            (Some(user), matches)
        }
        None => (None, verify_password(&password, DUMMY_PASSWORD_HASH)),
    })
    .await
    .map_err(|e| AppError::Hash(e.to_string()))?;

    let user = match user {
        Some(user) if matches => user,
        Some(user) => {
            tracing::info!("Login failed for {}", user.username);
            return Err(AppError::invalid_credentials());
        }
        None => {
            tracing::info!("Login failed for unknown user");
            return Err(AppError::invalid_credentials());
        }
    };

    let token = app_state.jwt_service.create_token(&user.username)?;
    tracing::info!("User {} logged in", user.username);
    Ok(token)
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::hours(TOKEN_TTL_HOURS))
        .build()
}

fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, ""))
        .path("/")
        .http_only(true)
        .max_age(time::Duration::ZERO)
        .expires(time::OffsetDateTime::now_utc() - time::Duration::hours(1))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc".to_string());
        assert_eq!(cookie.name(), "token");
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.max_age(), Some(time::Duration::hours(24)));
    }

    #[test]
    fn test_expired_cookie_is_in_the_past() {
        let cookie = expired_session_cookie();
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
        let expires = cookie.expires_datetime().unwrap();
        assert!(expires < time::OffsetDateTime::now_utc());
    }
}
