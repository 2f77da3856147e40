//! Address ownership.
//!
//! An address belongs to exactly one account or exactly one store, never
//! both and never neither. Representing the owner as a sum type makes the
//! illegal states unrepresentable in application code; the database keeps a
//! symmetric CHECK constraint as the last line of defense.

use serde::{Deserialize, Serialize};

use crate::types::{AccountId, StoreId};

/// The owner of an address: an account XOR a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressOwner {
    /// Owned by a customer account.
    Account(AccountId),
    /// Owned by a store.
    Store(StoreId),
}

impl AddressOwner {
    /// The account id, when account-owned.
    #[must_use]
    pub const fn account_id(self) -> Option<AccountId> {
        match self {
            Self::Account(id) => Some(id),
            Self::Store(_) => None,
        }
    }

    /// The store id, when store-owned.
    #[must_use]
    pub const fn store_id(self) -> Option<StoreId> {
        match self {
            Self::Account(_) => None,
            Self::Store(id) => Some(id),
        }
    }

    /// Split into the `(account_id, store_id)` column pair persisted by the
    /// storage layer. Exactly one side is `Some`.
    #[must_use]
    pub const fn as_columns(self) -> (Option<AccountId>, Option<StoreId>) {
        match self {
            Self::Account(id) => (Some(id), None),
            Self::Store(id) => (None, Some(id)),
        }
    }

    /// Reassemble from the column pair, if it satisfies the XOR invariant.
    #[must_use]
    pub const fn from_columns(
        account_id: Option<AccountId>,
        store_id: Option<StoreId>,
    ) -> Option<Self> {
        match (account_id, store_id) {
            (Some(id), None) => Some(Self::Account(id)),
            (None, Some(id)) => Some(Self::Store(id)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_roundtrip() {
        let owner = AddressOwner::Account(AccountId::new(1));
        let (acc, store) = owner.as_columns();
        assert_eq!(AddressOwner::from_columns(acc, store), Some(owner));

        let owner = AddressOwner::Store(StoreId::new(2));
        let (acc, store) = owner.as_columns();
        assert_eq!(AddressOwner::from_columns(acc, store), Some(owner));
    }

    #[test]
    fn test_illegal_column_pairs() {
        assert_eq!(AddressOwner::from_columns(None, None), None);
        assert_eq!(
            AddressOwner::from_columns(Some(AccountId::new(1)), Some(StoreId::new(2))),
            None
        );
    }

    #[test]
    fn test_accessors() {
        let owner = AddressOwner::Account(AccountId::new(5));
        assert_eq!(owner.account_id(), Some(AccountId::new(5)));
        assert_eq!(owner.store_id(), None);
    }
}
