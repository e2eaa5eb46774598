// src/utils/jwt.rs

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{
    config::{ADMIN_COOKIE_NAME, Config},
    error::AppError,
};

pub const ADMIN_ROLE: &str = "admin";

/// Claims carried by the admin cookie.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Subject - the admin username.
    pub sub: String,
    pub role: String,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

/// Signs a token for the admin account, valid for `expiration_seconds`.
pub fn sign_admin_token(
    username: &str,
    secret: &str,
    expiration_seconds: u64,
) -> Result<String, AppError> {
    let expiration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .as_secs() as usize
        + expiration_seconds as usize;

    let claims = Claims {
        sub: username.to_owned(),
        role: ADMIN_ROLE.to_owned(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Verifies and decodes a token string.
///
/// Expired tokens, bad signatures and non-admin roles are all rejected.
pub fn verify_admin_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::AuthError("Invalid session".to_string()))?;

    if token_data.claims.role != ADMIN_ROLE {
        return Err(AppError::AuthError("Invalid session".to_string()));
    }

    Ok(token_data.claims)
}

fn admin_claims(jar: &CookieJar, secret: &str) -> Option<Claims> {
    let cookie = jar.get(ADMIN_COOKIE_NAME)?;
    verify_admin_token(cookie.value(), secret).ok()
}

/// Axum Middleware: admin gate for JSON routes.
///
/// Reads the admin cookie; on success injects `Claims` into the request
/// extensions, otherwise answers 401.
pub async fn require_admin(
    State(config): State<Config>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = admin_claims(&jar, &config.cookie_secret)
        .ok_or_else(|| AppError::AuthError("Login required".to_string()))?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Axum Middleware: admin gate for HTML pages. Redirects to `/login`.
pub async fn require_admin_page(
    State(config): State<Config>,
    jar: CookieJar,
    req: Request,
    next: Next,
) -> Response {
    match admin_claims(&jar, &config.cookie_secret) {
        Some(_) => next.run(req).await,
        None => Redirect::to("/login").into_response(),
    }
}
