// src/config.rs

use std::env;
use dotenvy::dotenv;

/// Lifetime of the admin cookie and the token inside it (7 days).
pub const ADMIN_SESSION_SECONDS: u64 = 7 * 24 * 60 * 60;

/// Name of the cookie carrying the admin token.
pub const ADMIN_COOKIE_NAME: &str = "session_token";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub admin_username: String,
    pub admin_password: String,
    /// Secret used to sign the admin token stored in the cookie.
    pub cookie_secret: String,
    pub port: u16,
    pub rust_log: String,
    /// Sets the `Secure` flag on the admin cookie.
    pub secure_cookies: bool,
    /// Directory holding the HTML pages and static assets.
    pub public_dir: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set");

        let admin_username = env::var("ADMIN_USERNAME")
            .expect("ADMIN_USERNAME must be set");

        let admin_password = env::var("ADMIN_PASSWORD")
            .expect("ADMIN_PASSWORD must be set");

        let cookie_secret = env::var("COOKIE_SECRET")
            .expect("COOKIE_SECRET must be set");

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let secure_cookies = env::var("APP_ENV")
            .map(|v| v == "production")
            .unwrap_or(false);

        let public_dir = env::var("PUBLIC_DIR")
            .unwrap_or_else(|_| "public".to_string());

        Self {
            database_url,
            admin_username,
            admin_password,
            cookie_secret,
            port,
            rust_log,
            secure_cookies,
            public_dir,
        }
    }
}
