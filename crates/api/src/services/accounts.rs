//! Account creation and admin promotion.
//!
//! The source system flipped the staff flag inside a model save hook; here
//! it is an explicit operation so every call site shows the side effect.

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use prato_core::{AccountKind, Cpf, Phone};

use crate::db::accounts::{CreateAccount, CreateUser};
use crate::db::{self, RepositoryError};
use crate::models::{Account, UserIdentity};

/// Errors produced by account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("account not found")]
    AccountNotFound,

    /// A field was present but malformed (CPF, phone, ...).
    #[error("invalid account: {0}")]
    Invalid(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Input for [`AccountService::create`].
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub kind: AccountKind,
    pub cpf: String,
    pub phone: String,
}

/// Service for account lifecycle operations.
pub struct AccountService<'a> {
    pool: &'a PgPool,
}

impl<'a> AccountService<'a> {
    /// Create a new account service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create an account with its backing user identity.
    ///
    /// An admin-kind account implies a staff user; the flag is set here at
    /// creation so the invariant holds from the first save.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Invalid`] for malformed CPF/phone and
    /// `Conflict` repository errors for duplicates.
    pub async fn create(&self, input: NewAccount) -> Result<(Account, UserIdentity), AccountError> {
        let cpf = Cpf::parse(&input.cpf).map_err(|e| AccountError::Invalid(e.to_string()))?;
        let phone = Phone::parse(&input.phone).map_err(|e| AccountError::Invalid(e.to_string()))?;

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let user = db::accounts::insert_user(
            &mut *tx,
            &CreateUser {
                first_name: input.first_name,
                last_name: input.last_name,
                email: input.email,
                is_staff: input.kind == AccountKind::Admin,
            },
        )
        .await?;

        let account = db::accounts::insert(
            &mut *tx,
            &CreateAccount {
                user_id: user.id,
                kind: input.kind,
                cpf,
                phone,
            },
        )
        .await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        Ok((account, user))
    }

    /// Promote an account to admin, re-asserting the staff flag on the
    /// linked user in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::AccountNotFound`] for an unknown UUID.
    pub async fn promote_to_admin(&self, uuid: Uuid) -> Result<Account, AccountError> {
        let account = db::accounts::get_by_uuid(self.pool, uuid)
            .await?
            .ok_or(AccountError::AccountNotFound)?;

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let account = if account.is_admin() {
            // Already admin: still re-assert the staff flag below.
            account
        } else {
            db::accounts::set_kind(&mut *tx, account.id, AccountKind::Admin).await?
        };
        db::accounts::set_user_staff(&mut *tx, account.user_id, true).await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        tracing::info!(account = %account.uuid, "Account promoted to admin");
        Ok(account)
    }
}
