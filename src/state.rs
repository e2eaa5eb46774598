use crate::{config::Config, error::AppError, utils::hash::hash_password};
use axum::extract::FromRef;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub admin: AdminCredential,
}

/// The single admin account, with the password kept only as an Argon2 hash.
#[derive(Debug, Clone)]
pub struct AdminCredential {
    pub username: String,
    pub password_hash: String,
}

impl AppState {
    /// Builds the state, hashing the configured admin password once.
    pub fn new(pool: PgPool, config: Config) -> Result<Self, AppError> {
        let admin = AdminCredential {
            username: config.admin_username.clone(),
            password_hash: hash_password(&config.admin_password)?,
        };

        Ok(Self {
            pool,
            config,
            admin,
        })
    }
}

impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for AdminCredential {
    fn from_ref(state: &AppState) -> Self {
        state.admin.clone()
    }
}
