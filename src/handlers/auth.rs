// src/handlers/auth.rs

use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde_json::json;
use validator::Validate;

use crate::{
    config::{ADMIN_COOKIE_NAME, ADMIN_SESSION_SECONDS, Config},
    error::AppError,
    extract::AppJson,
    models::admin::LoginRequest,
    state::AdminCredential,
    utils::{hash::verify_password, jwt::sign_admin_token},
};

/// Authenticates the administrator and sets the session cookie.
///
/// The cookie holds a signed token that expires after 7 days.
/// A wrong username or password answers 401 without touching the jar.
pub async fn login(
    State(config): State<Config>,
    State(admin): State<AdminCredential>,
    jar: CookieJar,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.validate().is_err() {
        return Err(AppError::AuthError("Username atau password salah.".to_string()));
    }

    let username_ok = payload.username == admin.username;
    let password_ok = verify_password(&payload.password, &admin.password_hash)?;

    if !(username_ok && password_ok) {
        tracing::warn!("Rejected admin login for '{}'", payload.username);
        return Err(AppError::AuthError("Username atau password salah.".to_string()));
    }

    let token = sign_admin_token(&admin.username, &config.cookie_secret, ADMIN_SESSION_SECONDS)?;

    let cookie = Cookie::build((ADMIN_COOKIE_NAME, token))
        .http_only(true)
        .secure(config.secure_cookies)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::seconds(ADMIN_SESSION_SECONDS as i64))
        .build();

    tracing::info!("Admin '{}' logged in", admin.username);

    Ok((
        jar.add(cookie),
        Json(json!({
            "success": true,
            "message": "Login berhasil",
            "redirectUrl": "/dashboard"
        })),
    ))
}

/// Clears the admin cookie.
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (
        jar.remove(Cookie::build(ADMIN_COOKIE_NAME).path("/")),
        Json(json!({
            "success": true,
            "message": "Logout berhasil",
            "redirectUrl": "/login"
        })),
    )
}
