//! Order assembly and mutation.
//!
//! `create_order` turns a cart into a priced, immutable order snapshot:
//! resolve store and account, merge duplicate cart lines, resolve the
//! requested products against the store's active catalog (batch-reporting
//! everything that is missing), snapshot the delivery address, price each
//! item, and enforce the store's minimum order value - all inside one
//! transaction. Either the full order with all its items is durably
//! created, or no trace of it persists.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use prato_core::cart::{self, CartError, CartLine};
use prato_core::{OrderStatus, Uf, ZipCode};

use crate::db::orders::{NewOrder, NewOrderItem};
use crate::db::{self, RepositoryError};
use crate::models::{Order, OrderItem, Product};

/// Errors produced by order assembly and mutation.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("store not found")]
    StoreNotFound,

    #[error("account not found")]
    AccountNotFound,

    #[error("order not found")]
    OrderNotFound,

    #[error(transparent)]
    Cart(#[from] CartError),

    /// Requested products that do not exist, are inactive, or belong to
    /// another store. Always carries the complete list, not just the
    /// first offender.
    #[error("products not found or inactive: {}", format_uuids(.0))]
    ProductsNotFound(Vec<Uuid>),

    /// Mandatory delivery address fields that were absent or blank.
    #[error("delivery address fields are required: {}", .0.join(", "))]
    MissingAddressFields(Vec<&'static str>),

    /// A delivery address field was present but malformed.
    #[error("invalid delivery address: {0}")]
    InvalidAddress(String),

    #[error("order subtotal {subtotal} is below the minimum order value of {minimum}")]
    BelowMinimum {
        subtotal: Decimal,
        minimum: Decimal,
    },

    #[error("cannot transition order from {from} to {to}")]
    InvalidStatusTransition {
        from: OrderStatus,
        to: OrderStatus,
    },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

fn format_uuids(uuids: &[Uuid]) -> String {
    uuids
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Input for [`OrderService::create_order`].
#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub store_uuid: Uuid,
    pub account_uuid: Uuid,
    pub items: Vec<CartLine>,
    pub notes: Option<String>,
    pub address: DeliveryAddressInput,
}

/// Raw delivery address fields as received from the caller.
///
/// Presence and format are validated by the assembler, not at the JSON
/// boundary, so that one structured error can name every missing field.
#[derive(Debug, Clone, Default)]
pub struct DeliveryAddressInput {
    pub zip_code: Option<String>,
    pub street: Option<String>,
    pub number: Option<String>,
    pub neighborhood: Option<String>,
    pub complement: Option<String>,
    pub reference: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
}

/// Validated delivery address, ready to be snapshotted onto the order row.
#[derive(Debug, Clone)]
struct AddressSnapshot {
    zip_code: ZipCode,
    street: String,
    number: String,
    neighborhood: Option<String>,
    complement: Option<String>,
    reference: Option<String>,
    city: String,
    state: Uf,
    latitude: Option<Decimal>,
    longitude: Option<Decimal>,
}

/// Service for order assembly and administrative order mutations.
pub struct OrderService<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a fully priced order from a cart.
    ///
    /// # Errors
    ///
    /// - [`OrderError::StoreNotFound`] / [`OrderError::AccountNotFound`]
    ///   when the referenced entities do not exist
    /// - [`OrderError::Cart`] for an empty cart or a zero quantity
    /// - [`OrderError::ProductsNotFound`] naming every requested product
    ///   that is missing from the store's active catalog
    /// - [`OrderError::MissingAddressFields`] /
    ///   [`OrderError::InvalidAddress`] for an incomplete snapshot
    /// - [`OrderError::BelowMinimum`] when the subtotal does not reach the
    ///   store's minimum order value (equality passes)
    ///
    /// Any failure rolls the whole transaction back; no partial order is
    /// ever observable.
    pub async fn create_order(
        &self,
        input: CreateOrder,
    ) -> Result<(Order, Vec<OrderItem>), OrderError> {
        let store = db::stores::get_by_uuid(self.pool, input.store_uuid)
            .await?
            .ok_or(OrderError::StoreNotFound)?;
        let account = db::accounts::get_by_uuid(self.pool, input.account_uuid)
            .await?
            .ok_or(OrderError::AccountNotFound)?;

        let merged = cart::normalize(&input.items)?;
        let snapshot = validate_address(&input.address)?;

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let requested: Vec<Uuid> = merged.keys().copied().collect();
        let products = db::products::resolve_active_for_store(&mut *tx, store.id, &requested).await?;

        let missing = missing_product_uuids(&requested, &products);
        if !missing.is_empty() {
            // Dropping the transaction rolls it back.
            return Err(OrderError::ProductsNotFound(missing));
        }

        let order = db::orders::insert(
            &mut *tx,
            &NewOrder {
                store_id: store.id,
                account_id: account.id,
                notes: input.notes,
                delivery_fee: store.delivery_fee,
                zip_code: snapshot.zip_code,
                street: snapshot.street,
                number: snapshot.number,
                neighborhood: snapshot.neighborhood,
                complement: snapshot.complement,
                reference: snapshot.reference,
                city: snapshot.city,
                state: snapshot.state,
                latitude: snapshot.latitude,
                longitude: snapshot.longitude,
            },
        )
        .await?;

        let new_items = build_items(&merged, &products);
        let items = db::orders::insert_items(&mut *tx, order.id, &new_items).await?;

        let (subtotal, total) = db::orders::recalculate_totals(&mut *tx, order.id).await?;

        if subtotal < store.min_order_value {
            return Err(OrderError::BelowMinimum {
                subtotal,
                minimum: store.min_order_value,
            });
        }

        tx.commit().await.map_err(RepositoryError::from)?;

        let order = Order {
            subtotal,
            total,
            ..order
        };

        tracing::info!(
            order = %order.uuid,
            store = %store.uuid,
            subtotal = %subtotal,
            total = %total,
            items = items.len(),
            "Order created"
        );

        Ok((order, items))
    }

    /// Move an order along its lifecycle.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::InvalidStatusTransition`] when the state
    /// machine forbids the move.
    pub async fn set_status(&self, uuid: Uuid, next: OrderStatus) -> Result<Order, OrderError> {
        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let order = db::orders::get_by_uuid_for_update(&mut *tx, uuid)
            .await?
            .ok_or(OrderError::OrderNotFound)?;

        if !order.status.can_transition_to(next) {
            return Err(OrderError::InvalidStatusTransition {
                from: order.status,
                to: next,
            });
        }

        let order = db::orders::set_status(&mut *tx, order.id, next).await?;
        tx.commit().await.map_err(RepositoryError::from)?;

        Ok(order)
    }

    /// Administrative edit: set one item's quantity and recompute the
    /// order's totals in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Cart`] for a zero quantity and
    /// [`OrderError::OrderNotFound`] for an unknown order or item.
    pub async fn set_item_quantity(
        &self,
        order_uuid: Uuid,
        product_uuid: Uuid,
        quantity: u32,
    ) -> Result<(Order, Vec<OrderItem>), OrderError> {
        if quantity == 0 {
            return Err(OrderError::Cart(CartError::ZeroQuantity { product_uuid }));
        }
        let quantity = i32::try_from(quantity).unwrap_or(i32::MAX);

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let order = db::orders::get_by_uuid_for_update(&mut *tx, order_uuid)
            .await?
            .ok_or(OrderError::OrderNotFound)?;

        db::orders::set_item_quantity(&mut *tx, order.id, product_uuid, quantity)
            .await
            .map_err(item_not_found)?;
        let (subtotal, total) = db::orders::recalculate_totals(&mut *tx, order.id).await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        let order = Order {
            subtotal,
            total,
            ..order
        };
        let items = db::orders::items(self.pool, order.id).await?;
        Ok((order, items))
    }

    /// Administrative edit: remove one item and recompute the order's
    /// totals in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::OrderNotFound`] for an unknown order or item.
    pub async fn remove_item(
        &self,
        order_uuid: Uuid,
        product_uuid: Uuid,
    ) -> Result<(Order, Vec<OrderItem>), OrderError> {
        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let order = db::orders::get_by_uuid_for_update(&mut *tx, order_uuid)
            .await?
            .ok_or(OrderError::OrderNotFound)?;

        db::orders::delete_item(&mut *tx, order.id, product_uuid)
            .await
            .map_err(item_not_found)?;
        let (subtotal, total) = db::orders::recalculate_totals(&mut *tx, order.id).await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        let order = Order {
            subtotal,
            total,
            ..order
        };
        let items = db::orders::items(self.pool, order.id).await?;
        Ok((order, items))
    }
}

fn item_not_found(e: RepositoryError) -> OrderError {
    match e {
        RepositoryError::NotFound => OrderError::OrderNotFound,
        other => OrderError::Repository(other),
    }
}

/// Compare the requested UUIDs against the resolved products and return
/// every UUID that did not resolve, preserving request order.
fn missing_product_uuids(requested: &[Uuid], resolved: &[Product]) -> Vec<Uuid> {
    requested
        .iter()
        .filter(|uuid| !resolved.iter().any(|p| p.uuid == **uuid))
        .copied()
        .collect()
}

/// Build the item rows: one per resolved product, with the product's
/// uuid and name snapshotted and the unit price run through the pricing
/// engine.
fn build_items(merged: &BTreeMap<Uuid, u32>, products: &[Product]) -> Vec<NewOrderItem> {
    products
        .iter()
        .filter_map(|product| {
            merged.get(&product.uuid).map(|quantity| NewOrderItem {
                product_uuid: product.uuid,
                product_name: product.name.clone(),
                unit_price: product.effective_price(),
                quantity: i32::try_from(*quantity).unwrap_or(i32::MAX),
            })
        })
        .collect()
}

/// Check mandatory fields and parse the formatted ones.
fn validate_address(input: &DeliveryAddressInput) -> Result<AddressSnapshot, OrderError> {
    let mut missing = Vec::new();

    let filled = |value: &Option<String>| -> Option<String> {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(ToOwned::to_owned)
    };

    let zip_code = filled(&input.zip_code);
    let street = filled(&input.street);
    let number = filled(&input.number);
    let city = filled(&input.city);
    let state = filled(&input.state);

    if zip_code.is_none() {
        missing.push("zip_code");
    }
    if street.is_none() {
        missing.push("street");
    }
    if number.is_none() {
        missing.push("number");
    }
    if city.is_none() {
        missing.push("city");
    }
    if state.is_none() {
        missing.push("state");
    }

    if !missing.is_empty() {
        return Err(OrderError::MissingAddressFields(missing));
    }

    let (Some(zip_code), Some(street), Some(number), Some(city), Some(state)) =
        (zip_code, street, number, city, state)
    else {
        // All five were just checked.
        return Err(OrderError::MissingAddressFields(missing));
    };

    let zip_code =
        ZipCode::parse(&zip_code).map_err(|e| OrderError::InvalidAddress(e.to_string()))?;
    let state = Uf::parse(&state).map_err(|e| OrderError::InvalidAddress(e.to_string()))?;

    Ok(AddressSnapshot {
        zip_code,
        street,
        number,
        neighborhood: filled(&input.neighborhood),
        complement: filled(&input.complement),
        reference: filled(&input.reference),
        city,
        state,
        latitude: input.latitude,
        longitude: input.longitude,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use prato_core::{ProductId, SectionId, StoreId};
    use rust_decimal::dec;

    fn product(uuid: Uuid, price: Decimal, discount: Decimal) -> Product {
        Product {
            id: ProductId::new(1),
            uuid,
            store_id: StoreId::new(1),
            section_id: SectionId::new(1),
            name: "Marmita".to_owned(),
            description: None,
            price,
            discount_percentage: discount,
            position: 0,
            is_active: true,
            picture: None,
            thumbnail: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn full_address() -> DeliveryAddressInput {
        DeliveryAddressInput {
            zip_code: Some("01310100".to_owned()),
            street: Some("Avenida Paulista".to_owned()),
            number: Some("1000".to_owned()),
            neighborhood: Some("Bela Vista".to_owned()),
            city: Some("São Paulo".to_owned()),
            state: Some("SP".to_owned()),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_products_reports_every_uuid() {
        let known = Uuid::new_v4();
        let missing_a = Uuid::new_v4();
        let missing_b = Uuid::new_v4();
        let resolved = vec![product(known, dec!(10.00), dec!(0))];

        let missing = missing_product_uuids(&[known, missing_a, missing_b], &resolved);
        assert_eq!(missing, vec![missing_a, missing_b]);
    }

    #[test]
    fn test_no_missing_products() {
        let known = Uuid::new_v4();
        let resolved = vec![product(known, dec!(10.00), dec!(0))];
        assert!(missing_product_uuids(&[known], &resolved).is_empty());
    }

    #[test]
    fn test_build_items_snapshots_effective_price() {
        let uuid = Uuid::new_v4();
        let products = vec![product(uuid, dec!(20.00), dec!(10))];
        let merged = BTreeMap::from([(uuid, 3)]);

        let items = build_items(&merged, &products);
        assert_eq!(items.len(), 1);
        let item = items.first().unwrap();
        assert_eq!(item.product_uuid, uuid);
        assert_eq!(item.product_name, "Marmita");
        assert_eq!(item.unit_price, dec!(18.00));
        assert_eq!(item.quantity, 3);
    }

    #[test]
    fn test_validate_address_accepts_complete_input() {
        let snapshot = validate_address(&full_address()).unwrap();
        assert_eq!(snapshot.zip_code.as_str(), "01310100");
        assert_eq!(snapshot.state.as_str(), "SP");
        assert_eq!(snapshot.complement, None);
    }

    #[test]
    fn test_validate_address_reports_every_missing_field() {
        let input = DeliveryAddressInput {
            city: Some("São Paulo".to_owned()),
            state: Some("SP".to_owned()),
            ..Default::default()
        };
        match validate_address(&input) {
            Err(OrderError::MissingAddressFields(fields)) => {
                assert_eq!(fields, vec!["zip_code", "street", "number"]);
            }
            other => panic!("expected MissingAddressFields, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_address_treats_blank_as_missing() {
        let mut input = full_address();
        input.street = Some("   ".to_owned());
        match validate_address(&input) {
            Err(OrderError::MissingAddressFields(fields)) => {
                assert_eq!(fields, vec!["street"]);
            }
            other => panic!("expected MissingAddressFields, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_address_rejects_malformed_zip() {
        let mut input = full_address();
        input.zip_code = Some("013101".to_owned());
        assert!(matches!(
            validate_address(&input),
            Err(OrderError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_products_not_found_message_names_all() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let message = OrderError::ProductsNotFound(vec![a, b]).to_string();
        assert!(message.contains(&a.to_string()));
        assert!(message.contains(&b.to_string()));
    }
}
