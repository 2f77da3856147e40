//! Order and order item models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use prato_core::{AccountId, OrderId, OrderItemId, OrderStatus, StoreId, Uf, ZipCode};

/// A placed order with its denormalized address snapshot and totals.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    pub uuid: Uuid,
    pub store_id: StoreId,
    pub account_id: AccountId,
    pub status: OrderStatus,
    pub notes: Option<String>,
    pub delivery_fee: Decimal,
    pub subtotal: Decimal,
    pub total: Decimal,

    // Address snapshot, copied at creation time
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

/// One line of an order, snapshotting the product at order time.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub uuid: Uuid,
    pub order_id: OrderId,
    pub product_uuid: Uuid,
    pub product_name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderItem {
    /// Line total: `unit_price × quantity`.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}
