//! Store and opening hours models.

use chrono::{DateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use prato_core::{AccountId, Cnpj, StoreId};

/// A store on the marketplace, owned by exactly one admin account.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Store {
    pub id: StoreId,
    pub uuid: Uuid,
    pub owner_account_id: AccountId,
    pub name: String,
    pub fantasy_name: Option<String>,
    pub slug: String,
    pub cnpj: Cnpj,
    pub thumbnail: Option<String>,
    pub banner: Option<String>,
    /// Minimum order subtotal accepted at creation time.
    pub min_order_value: Decimal,
    /// Flat fee copied onto every order at creation time.
    pub delivery_fee: Decimal,
    /// Estimated delivery time in minutes.
    pub delivery_time: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One opening window of a store. ISO weekday: 1 = Monday .. 7 = Sunday.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OpeningHours {
    pub id: i32,
    pub store_id: StoreId,
    pub weekday: i16,
    pub from_hour: NaiveTime,
    pub to_hour: NaiveTime,
}
