//! Database operations for accounts and user identities.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use prato_core::{AccountId, AccountKind, Cpf, Phone, UserId};

use super::RepositoryError;
use crate::models::{Account, UserIdentity};

/// Parameters for creating a user identity.
#[derive(Debug)]
pub struct CreateUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_staff: bool,
}

/// Parameters for creating an account.
#[derive(Debug)]
pub struct CreateAccount {
    pub user_id: UserId,
    pub kind: AccountKind,
    pub cpf: Cpf,
    pub phone: Phone,
}

/// Get an account by its public UUID.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get_by_uuid(pool: &PgPool, uuid: Uuid) -> Result<Option<Account>, RepositoryError> {
    let account = sqlx::query_as::<_, Account>(
        r"
        SELECT id, uuid, user_id, kind, cpf, phone, created_at, updated_at
        FROM account
        WHERE uuid = $1
        ",
    )
    .bind(uuid)
    .fetch_optional(pool)
    .await?;

    Ok(account)
}

/// List all accounts, newest first.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list(pool: &PgPool) -> Result<Vec<Account>, RepositoryError> {
    let accounts = sqlx::query_as::<_, Account>(
        r"
        SELECT id, uuid, user_id, kind, cpf, phone, created_at, updated_at
        FROM account
        ORDER BY created_at DESC
        ",
    )
    .fetch_all(pool)
    .await?;

    Ok(accounts)
}

/// Get the user identity behind an account.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the user row is missing.
pub async fn get_user(pool: &PgPool, user_id: UserId) -> Result<UserIdentity, RepositoryError> {
    let user = sqlx::query_as::<_, UserIdentity>(
        r"
        SELECT id, first_name, last_name, email, is_staff, created_at, updated_at
        FROM user_identity
        WHERE id = $1
        ",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    user.ok_or(RepositoryError::NotFound)
}

/// Insert a user identity.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the email already exists.
pub async fn insert_user(
    conn: &mut PgConnection,
    params: &CreateUser,
) -> Result<UserIdentity, RepositoryError> {
    sqlx::query_as::<_, UserIdentity>(
        r"
        INSERT INTO user_identity (first_name, last_name, email, is_staff)
        VALUES ($1, $2, $3, $4)
        RETURNING id, first_name, last_name, email, is_staff, created_at, updated_at
        ",
    )
    .bind(&params.first_name)
    .bind(&params.last_name)
    .bind(&params.email)
    .bind(params.is_staff)
    .fetch_one(conn)
    .await
    .map_err(|e| RepositoryError::from_sqlx(e, "email already exists"))
}

/// Insert an account.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the CPF, phone or user link is
/// already taken.
pub async fn insert(
    conn: &mut PgConnection,
    params: &CreateAccount,
) -> Result<Account, RepositoryError> {
    sqlx::query_as::<_, Account>(
        r"
        INSERT INTO account (user_id, kind, cpf, phone)
        VALUES ($1, $2, $3, $4)
        RETURNING id, uuid, user_id, kind, cpf, phone, created_at, updated_at
        ",
    )
    .bind(params.user_id)
    .bind(params.kind)
    .bind(&params.cpf)
    .bind(&params.phone)
    .fetch_one(conn)
    .await
    .map_err(|e| RepositoryError::from_sqlx(e, "cpf, phone or user already registered"))
}

/// Set an account's kind.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the account does not exist.
pub async fn set_kind(
    conn: &mut PgConnection,
    id: AccountId,
    kind: AccountKind,
) -> Result<Account, RepositoryError> {
    let account = sqlx::query_as::<_, Account>(
        r"
        UPDATE account
        SET kind = $2
        WHERE id = $1
        RETURNING id, uuid, user_id, kind, cpf, phone, created_at, updated_at
        ",
    )
    .bind(id)
    .bind(kind)
    .fetch_optional(conn)
    .await?;

    account.ok_or(RepositoryError::NotFound)
}

/// Set the staff flag on a user identity.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the user does not exist.
pub async fn set_user_staff(
    conn: &mut PgConnection,
    user_id: UserId,
    is_staff: bool,
) -> Result<(), RepositoryError> {
    let result = sqlx::query(
        r"
        UPDATE user_identity
        SET is_staff = $2
        WHERE id = $1
        ",
    )
    .bind(user_id)
    .bind(is_staff)
    .execute(conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}
