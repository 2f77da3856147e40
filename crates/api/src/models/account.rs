//! Account and user identity models.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use prato_core::{AccountId, AccountKind, Cpf, Phone, UserId};

/// The system user behind an account.
///
/// Authentication itself is handled elsewhere; this row only carries the
/// profile fields and the staff flag that admin-kind accounts re-assert.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserIdentity {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A marketplace account: a client or a store administrator.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    pub id: AccountId,
    pub uuid: Uuid,
    pub user_id: UserId,
    pub kind: AccountKind,
    pub cpf: Cpf,
    pub phone: Phone,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Whether this account may own a store.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.kind == AccountKind::Admin
    }
}

