//! Catalog models: sections and products.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use prato_core::{ProductId, SectionForm, SectionId, StoreId};

/// A display grouping of products within a store.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Section {
    pub id: SectionId,
    pub uuid: Uuid,
    pub store_id: StoreId,
    pub title: String,
    pub position: i32,
    pub min_products: i32,
    pub max_products: i32,
    pub is_active: bool,
    pub is_required: bool,
    pub is_highlighted: bool,
    pub form: SectionForm,
    pub textbox_help_text: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A sellable product, belonging to a store and a primary section.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub uuid: Uuid,
    pub store_id: StoreId,
    pub section_id: SectionId,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    /// Percentage in [0, 100]; 10.00 means 10% off.
    pub discount_percentage: Decimal,
    pub position: i32,
    pub is_active: bool,
    pub picture: Option<String>,
    pub thumbnail: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Unit price after applying the product's discount.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        prato_core::pricing::effective_price(self.price, self.discount_percentage)
    }
}
