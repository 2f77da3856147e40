//! Default-address invariant management.
//!
//! Saving an address with `is_default = true` must atomically demote any
//! other default in the same owner scope. Competing writers for one owner
//! serialize on the row locks taken by `lock_other_defaults`; the partial
//! unique indexes in the schema reject anything that slips past.

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use prato_core::{AddressOwner, Uf, ZipCode};

use crate::db::addresses::AddressRecord;
use crate::db::{self, RepositoryError};
use crate::models::Address;

/// Errors produced by address saves.
#[derive(Debug, Error)]
pub enum AddressError {
    #[error("address not found")]
    AddressNotFound,

    #[error("account not found")]
    AccountNotFound,

    #[error("store not found")]
    StoreNotFound,

    /// The caller must name exactly one owner: an account or a store.
    #[error("address must belong to exactly one of account or store")]
    OwnerRequired,

    /// A field was present but malformed (zip code, state, ...).
    #[error("invalid address: {0}")]
    Invalid(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Input for saving an address.
#[derive(Debug, Clone)]
pub struct SaveAddress {
    pub label: Option<String>,
    pub is_default: bool,
    pub zip_code: String,
    pub street: String,
    pub number: String,
    pub neighborhood: Option<String>,
    pub complement: Option<String>,
    pub reference: Option<String>,
    pub city: String,
    pub state: String,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
}

/// Service maintaining the one-default-per-owner invariant.
pub struct AddressService<'a> {
    pool: &'a PgPool,
}

impl<'a> AddressService<'a> {
    /// Create a new address service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Resolve the owner named by an `account_uuid`/`store_uuid` pair.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::OwnerRequired`] unless exactly one side is
    /// given, and a not-found error when the named owner does not exist.
    pub async fn resolve_owner(
        &self,
        account_uuid: Option<Uuid>,
        store_uuid: Option<Uuid>,
    ) -> Result<AddressOwner, AddressError> {
        match (account_uuid, store_uuid) {
            (Some(account_uuid), None) => {
                let account = db::accounts::get_by_uuid(self.pool, account_uuid)
                    .await?
                    .ok_or(AddressError::AccountNotFound)?;
                Ok(AddressOwner::Account(account.id))
            }
            (None, Some(store_uuid)) => {
                let store = db::stores::get_by_uuid(self.pool, store_uuid)
                    .await?
                    .ok_or(AddressError::StoreNotFound)?;
                Ok(AddressOwner::Store(store.id))
            }
            _ => Err(AddressError::OwnerRequired),
        }
    }

    /// Create an address for an owner.
    ///
    /// When the address is flagged default, every other default in the
    /// owner's scope is demoted first, under row locks, in the same
    /// transaction that inserts the new row.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::Invalid`] for malformed fields and
    /// repository errors for storage failures.
    pub async fn create(
        &self,
        owner: AddressOwner,
        input: SaveAddress,
    ) -> Result<Address, AddressError> {
        let record = build_record(owner, &input)?;

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        if record.is_default {
            demote_scope(&mut tx, owner, None).await?;
        }
        let address = db::addresses::insert(&mut *tx, &record).await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        tracing::debug!(address = %address.uuid, is_default = address.is_default, "Address created");
        Ok(address)
    }

    /// Update an existing address in place. The owner never changes.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::AddressNotFound`] for an unknown UUID.
    pub async fn update(&self, uuid: Uuid, input: SaveAddress) -> Result<Address, AddressError> {
        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let existing = db::addresses::get_by_uuid_for_update(&mut *tx, uuid)
            .await?
            .ok_or(AddressError::AddressNotFound)?;
        let owner = existing.owner()?;

        let record = build_record(owner, &input)?;

        if record.is_default {
            demote_scope(&mut tx, owner, Some(existing.id)).await?;
        }
        let address = db::addresses::update(&mut *tx, existing.id, &record).await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        Ok(address)
    }

    /// List an owner's addresses, defaults first.
    ///
    /// # Errors
    ///
    /// Returns repository errors for storage failures.
    pub async fn list(&self, owner: AddressOwner) -> Result<Vec<Address>, AddressError> {
        Ok(db::addresses::list_for_owner(self.pool, owner).await?)
    }
}

/// Lock and demote every other default address in the owner's scope.
async fn demote_scope(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    owner: AddressOwner,
    exclude: Option<prato_core::AddressId>,
) -> Result<(), AddressError> {
    let others = db::addresses::lock_other_defaults(&mut **tx, owner, exclude).await?;
    if !others.is_empty() {
        let demoted = db::addresses::demote(&mut **tx, &others).await?;
        tracing::debug!(count = demoted, "Demoted previous default addresses");
    }
    Ok(())
}

fn build_record(owner: AddressOwner, input: &SaveAddress) -> Result<AddressRecord, AddressError> {
    let zip_code =
        ZipCode::parse(&input.zip_code).map_err(|e| AddressError::Invalid(e.to_string()))?;
    let state = Uf::parse(&input.state).map_err(|e| AddressError::Invalid(e.to_string()))?;

    if input.street.trim().is_empty() {
        return Err(AddressError::Invalid("street cannot be empty".to_owned()));
    }
    if input.number.trim().is_empty() {
        return Err(AddressError::Invalid("number cannot be empty".to_owned()));
    }
    if input.city.trim().is_empty() {
        return Err(AddressError::Invalid("city cannot be empty".to_owned()));
    }

    Ok(AddressRecord {
        owner,
        label: input.label.clone(),
        is_default: input.is_default,
        zip_code,
        street: input.street.clone(),
        number: input.number.clone(),
        neighborhood: input.neighborhood.clone(),
        complement: input.complement.clone(),
        reference: input.reference.clone(),
        city: input.city.clone(),
        state,
        latitude: input.latitude,
        longitude: input.longitude,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use prato_core::AccountId;

    fn input() -> SaveAddress {
        SaveAddress {
            label: Some("Casa".to_owned()),
            is_default: true,
            zip_code: "01310-100".to_owned(),
            street: "Avenida Paulista".to_owned(),
            number: "1000".to_owned(),
            neighborhood: None,
            complement: None,
            reference: None,
            city: "São Paulo".to_owned(),
            state: "sp".to_owned(),
            latitude: None,
            longitude: None,
        }
    }

    #[test]
    fn test_build_record_normalizes_fields() {
        let owner = AddressOwner::Account(AccountId::new(1));
        let record = build_record(owner, &input()).unwrap();
        assert_eq!(record.zip_code.as_str(), "01310100");
        assert_eq!(record.state.as_str(), "SP");
        assert!(record.is_default);
        assert_eq!(record.owner, owner);
    }

    #[test]
    fn test_build_record_rejects_bad_zip() {
        let owner = AddressOwner::Account(AccountId::new(1));
        let mut bad = input();
        bad.zip_code = "123".to_owned();
        assert!(matches!(
            build_record(owner, &bad),
            Err(AddressError::Invalid(_))
        ));
    }

    #[test]
    fn test_build_record_rejects_blank_street() {
        let owner = AddressOwner::Account(AccountId::new(1));
        let mut bad = input();
        bad.street = "  ".to_owned();
        assert!(matches!(
            build_record(owner, &bad),
            Err(AddressError::Invalid(_))
        ));
    }
}
