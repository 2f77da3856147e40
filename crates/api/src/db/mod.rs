//! Database operations for the Prato `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `user_identity` / `account` - accounts and their backing users
//! - `store` / `store_opening_hours`
//! - `section` / `product` / `product_section` - catalog
//! - `address` - account- or store-owned, one default per owner
//! - `customer_order` / `order_item`
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p prato-cli -- migrate
//! ```
//!
//! All queries here are runtime-checked (`sqlx::query`/`query_as` with
//! explicit binds); functions that must participate in a caller's
//! transaction take a [`sqlx::PgConnection`] or a generic executor.

pub mod accounts;
pub mod addresses;
pub mod orders;
pub mod products;
pub mod stores;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique CPF, duplicate default address).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a sqlx error, converting unique/check violations to
    /// [`RepositoryError::Conflict`] with the given message.
    #[must_use]
    pub fn from_sqlx(e: sqlx::Error, conflict_message: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = e
            && (db_err.is_unique_violation() || db_err.is_check_violation())
        {
            return Self::Conflict(conflict_message.to_owned());
        }
        Self::Database(e)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
