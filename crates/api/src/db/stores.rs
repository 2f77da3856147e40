//! Database operations for stores and opening hours.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use prato_core::{AccountId, Cnpj, StoreId};

use super::RepositoryError;
use crate::models::{OpeningHours, Store};

const STORE_COLUMNS: &str = "id, uuid, owner_account_id, name, fantasy_name, slug, cnpj, \
     thumbnail, banner, min_order_value, delivery_fee, delivery_time, \
     created_at, updated_at";

/// Parameters for creating a store.
#[derive(Debug)]
pub struct CreateStore {
    pub owner_account_id: AccountId,
    pub name: String,
    pub fantasy_name: Option<String>,
    pub slug: String,
    pub cnpj: Cnpj,
    pub thumbnail: Option<String>,
    pub banner: Option<String>,
    pub min_order_value: Decimal,
    pub delivery_fee: Decimal,
    pub delivery_time: i32,
}

/// Get a store by its public UUID.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get_by_uuid(pool: &PgPool, uuid: Uuid) -> Result<Option<Store>, RepositoryError> {
    let query = format!("SELECT {STORE_COLUMNS} FROM store WHERE uuid = $1");
    let store = sqlx::query_as::<_, Store>(&query)
        .bind(uuid)
        .fetch_optional(pool)
        .await?;

    Ok(store)
}

/// List all stores, alphabetically.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list(pool: &PgPool) -> Result<Vec<Store>, RepositoryError> {
    let query = format!("SELECT {STORE_COLUMNS} FROM store ORDER BY name");
    let stores = sqlx::query_as::<_, Store>(&query).fetch_all(pool).await?;

    Ok(stores)
}

/// List a store's opening windows ordered by weekday and start time.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn opening_hours(
    pool: &PgPool,
    store_id: StoreId,
) -> Result<Vec<OpeningHours>, RepositoryError> {
    let hours = sqlx::query_as::<_, OpeningHours>(
        r"
        SELECT id, store_id, weekday, from_hour, to_hour
        FROM store_opening_hours
        WHERE store_id = $1
        ORDER BY weekday, from_hour
        ",
    )
    .bind(store_id)
    .fetch_all(pool)
    .await?;

    Ok(hours)
}

/// Insert a store.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the CNPJ, slug or owner is
/// already taken.
pub async fn insert(
    conn: &mut PgConnection,
    params: &CreateStore,
) -> Result<Store, RepositoryError> {
    let query = format!(
        "INSERT INTO store (owner_account_id, name, fantasy_name, slug, cnpj, thumbnail,
                            banner, min_order_value, delivery_fee, delivery_time)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
         RETURNING {STORE_COLUMNS}"
    );
    sqlx::query_as::<_, Store>(&query)
        .bind(params.owner_account_id)
        .bind(&params.name)
        .bind(&params.fantasy_name)
        .bind(&params.slug)
        .bind(&params.cnpj)
        .bind(&params.thumbnail)
        .bind(&params.banner)
        .bind(params.min_order_value)
        .bind(params.delivery_fee)
        .bind(params.delivery_time)
        .fetch_one(conn)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "cnpj, slug or owner already registered"))
}

/// Insert one opening window for a store.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` on an overlapping window key.
pub async fn insert_opening_hours(
    conn: &mut PgConnection,
    store_id: StoreId,
    weekday: i16,
    from_hour: NaiveTime,
    to_hour: NaiveTime,
) -> Result<OpeningHours, RepositoryError> {
    sqlx::query_as::<_, OpeningHours>(
        r"
        INSERT INTO store_opening_hours (store_id, weekday, from_hour, to_hour)
        VALUES ($1, $2, $3, $4)
        RETURNING id, store_id, weekday, from_hour, to_hour
        ",
    )
    .bind(store_id)
    .bind(weekday)
    .bind(from_hour)
    .bind(to_hour)
    .fetch_one(conn)
    .await
    .map_err(|e| RepositoryError::from_sqlx(e, "opening window already registered"))
}
