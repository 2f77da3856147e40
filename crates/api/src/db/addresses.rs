//! Database operations for addresses.
//!
//! The default-address invariant is maintained by the address service; the
//! lock/demote primitives here operate on an *owner scope* - the set of
//! addresses attributable to one account (with no store owner) or one
//! store (with no account owner).

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use prato_core::{AddressId, AddressOwner, Uf, ZipCode};

use super::RepositoryError;
use crate::models::Address;

const ADDRESS_COLUMNS: &str = "id, uuid, account_id, store_id, label, is_default, zip_code, \
     street, number, neighborhood, complement, reference, city, state, \
     latitude, longitude, created_at, updated_at";

/// Field values for inserting or updating an address.
#[derive(Debug, Clone)]
pub struct AddressRecord {
    pub owner: AddressOwner,
    pub label: Option<String>,
    pub is_default: bool,
    pub zip_code: ZipCode,
    pub street: String,
    pub number: String,
    pub neighborhood: Option<String>,
    pub complement: Option<String>,
    pub reference: Option<String>,
    pub city: String,
    pub state: Uf,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
}

/// Get an address by its public UUID.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get_by_uuid(pool: &PgPool, uuid: Uuid) -> Result<Option<Address>, RepositoryError> {
    let query = format!("SELECT {ADDRESS_COLUMNS} FROM address WHERE uuid = $1");
    let address = sqlx::query_as::<_, Address>(&query)
        .bind(uuid)
        .fetch_optional(pool)
        .await?;

    Ok(address)
}

/// Get an address by UUID and lock its row for the rest of the
/// transaction, so a concurrent save of the same address serializes here.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get_by_uuid_for_update(
    conn: &mut PgConnection,
    uuid: Uuid,
) -> Result<Option<Address>, RepositoryError> {
    let query = format!("SELECT {ADDRESS_COLUMNS} FROM address WHERE uuid = $1 FOR UPDATE");
    let address = sqlx::query_as::<_, Address>(&query)
        .bind(uuid)
        .fetch_optional(conn)
        .await?;

    Ok(address)
}

/// List the addresses of one owner, defaults first, then newest first.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_for_owner(
    pool: &PgPool,
    owner: AddressOwner,
) -> Result<Vec<Address>, RepositoryError> {
    let (account_id, store_id) = owner.as_columns();
    let query = format!(
        "SELECT {ADDRESS_COLUMNS}
         FROM address
         WHERE (account_id = $1 AND store_id IS NULL)
            OR (store_id = $2 AND account_id IS NULL)
         ORDER BY is_default DESC, created_at DESC"
    );
    let addresses = sqlx::query_as::<_, Address>(&query)
        .bind(account_id)
        .bind(store_id)
        .fetch_all(pool)
        .await?;

    Ok(addresses)
}

/// Lock every *other* default address in the owner's scope.
///
/// Acquires row-level locks (`FOR UPDATE`) on the candidate set so that
/// concurrent writers targeting the same owner serialize here, and returns
/// the locked ids. `exclude` removes the address being saved from the
/// candidate set when it already exists.
///
/// Must run inside the transaction that also persists the saved address.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn lock_other_defaults(
    conn: &mut PgConnection,
    owner: AddressOwner,
    exclude: Option<AddressId>,
) -> Result<Vec<AddressId>, RepositoryError> {
    let (account_id, store_id) = owner.as_columns();
    let ids: Vec<(AddressId,)> = sqlx::query_as(
        r"
        SELECT id
        FROM address
        WHERE ((account_id = $1 AND store_id IS NULL)
            OR (store_id = $2 AND account_id IS NULL))
          AND is_default
          AND ($3::integer IS NULL OR id <> $3)
        FOR UPDATE
        ",
    )
    .bind(account_id)
    .bind(store_id)
    .bind(exclude)
    .fetch_all(conn)
    .await?;

    Ok(ids.into_iter().map(|(id,)| id).collect())
}

/// Clear the default flag on the given addresses.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the update fails.
pub async fn demote(conn: &mut PgConnection, ids: &[AddressId]) -> Result<u64, RepositoryError> {
    if ids.is_empty() {
        return Ok(0);
    }

    let raw: Vec<i32> = ids.iter().map(|id| id.get()).collect();
    let result = sqlx::query(
        r"
        UPDATE address
        SET is_default = FALSE
        WHERE id = ANY($1)
        ",
    )
    .bind(&raw)
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}

/// Insert an address.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if a storage constraint (duplicate
/// default, owner XOR) rejects the row.
pub async fn insert(
    conn: &mut PgConnection,
    record: &AddressRecord,
) -> Result<Address, RepositoryError> {
    let (account_id, store_id) = record.owner.as_columns();
    let query = format!(
        "INSERT INTO address (account_id, store_id, label, is_default, zip_code, street,
                              number, neighborhood, complement, reference, city, state,
                              latitude, longitude)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
         RETURNING {ADDRESS_COLUMNS}"
    );
    sqlx::query_as::<_, Address>(&query)
        .bind(account_id)
        .bind(store_id)
        .bind(&record.label)
        .bind(record.is_default)
        .bind(&record.zip_code)
        .bind(&record.street)
        .bind(&record.number)
        .bind(&record.neighborhood)
        .bind(&record.complement)
        .bind(&record.reference)
        .bind(&record.city)
        .bind(&record.state)
        .bind(record.latitude)
        .bind(record.longitude)
        .fetch_one(conn)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "address constraint violation"))
}

/// Update an existing address in place. The owner columns are not touched;
/// an address never moves between owners.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the address does not exist, or
/// `RepositoryError::Conflict` if a storage constraint rejects the row.
pub async fn update(
    conn: &mut PgConnection,
    id: AddressId,
    record: &AddressRecord,
) -> Result<Address, RepositoryError> {
    let query = format!(
        "UPDATE address
         SET label = $2, is_default = $3, zip_code = $4, street = $5, number = $6,
             neighborhood = $7, complement = $8, reference = $9, city = $10,
             state = $11, latitude = $12, longitude = $13
         WHERE id = $1
         RETURNING {ADDRESS_COLUMNS}"
    );
    let address = sqlx::query_as::<_, Address>(&query)
        .bind(id)
        .bind(&record.label)
        .bind(record.is_default)
        .bind(&record.zip_code)
        .bind(&record.street)
        .bind(&record.number)
        .bind(&record.neighborhood)
        .bind(&record.complement)
        .bind(&record.reference)
        .bind(&record.city)
        .bind(&record.state)
        .bind(record.latitude)
        .bind(record.longitude)
        .fetch_optional(conn)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "address constraint violation"))?;

    address.ok_or(RepositoryError::NotFound)
}
