//! Address model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use prato_core::{AccountId, AddressId, AddressOwner, StoreId, Uf, ZipCode};

use crate::db::RepositoryError;

/// A delivery address owned by an account XOR a store.
///
/// The two nullable foreign keys mirror the storage schema; [`Self::owner`]
/// reassembles them into the [`AddressOwner`] sum type and treats a
/// violated XOR as data corruption (the database CHECK makes that
/// unreachable in practice).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Address {
    pub id: AddressId,
    pub uuid: Uuid,
    pub account_id: Option<AccountId>,
    pub store_id: Option<StoreId>,
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Address {
    /// The owner of this address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if the row violates the
    /// account-XOR-store invariant.
    pub fn owner(&self) -> Result<AddressOwner, RepositoryError> {
        AddressOwner::from_columns(self.account_id, self.store_id).ok_or_else(|| {
            RepositoryError::DataCorruption(format!(
                "address {} violates the owner XOR invariant",
                self.uuid
            ))
        })
    }
}
