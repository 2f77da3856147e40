//! Database operations for orders and order items.
//!
//! Inserts here always run inside the order service's transaction; reads
//! take the pool directly.

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use prato_core::{AccountId, OrderId, OrderStatus, StoreId, Uf, ZipCode};

use super::RepositoryError;
use crate::models::{Order, OrderItem};

const ORDER_COLUMNS: &str = "id, uuid, store_id, account_id, status, notes, delivery_fee, \
     subtotal, total, zip_code, street, number, neighborhood, complement, \
     reference, city, state, latitude, longitude, created_at, updated_at";

const ITEM_COLUMNS: &str =
    "id, uuid, order_id, product_uuid, product_name, unit_price, quantity, \
     created_at, updated_at";

/// Field values for inserting an order row.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub store_id: StoreId,
    pub account_id: AccountId,
    pub notes: Option<String>,
    pub delivery_fee: Decimal,
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
}

/// Field values for inserting one order item.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_uuid: Uuid,
    pub product_name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
}

/// Insert the order row with status `pending` and zeroed totals.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn insert(conn: &mut PgConnection, new: &NewOrder) -> Result<Order, RepositoryError> {
    let query = format!(
        "INSERT INTO customer_order (store_id, account_id, status, notes, delivery_fee,
                                     zip_code, street, number, neighborhood, complement,
                                     reference, city, state, latitude, longitude)
         VALUES ($1, $2, 'pending', $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
         RETURNING {ORDER_COLUMNS}"
    );
    let order = sqlx::query_as::<_, Order>(&query)
        .bind(new.store_id)
        .bind(new.account_id)
        .bind(&new.notes)
        .bind(new.delivery_fee)
        .bind(&new.zip_code)
        .bind(&new.street)
        .bind(&new.number)
        .bind(&new.neighborhood)
        .bind(&new.complement)
        .bind(&new.reference)
        .bind(&new.city)
        .bind(&new.state)
        .bind(new.latitude)
        .bind(new.longitude)
        .fetch_one(conn)
        .await?;

    Ok(order)
}

/// Insert the order's items.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if a product appears twice for the
/// same order (quantities are expected to be pre-merged).
pub async fn insert_items(
    conn: &mut PgConnection,
    order_id: OrderId,
    items: &[NewOrderItem],
) -> Result<Vec<OrderItem>, RepositoryError> {
    let query = format!(
        "INSERT INTO order_item (order_id, product_uuid, product_name, unit_price, quantity)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {ITEM_COLUMNS}"
    );

    let mut created = Vec::with_capacity(items.len());
    for item in items {
        let row = sqlx::query_as::<_, OrderItem>(&query)
            .bind(order_id)
            .bind(item.product_uuid)
            .bind(&item.product_name)
            .bind(item.unit_price)
            .bind(item.quantity)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "product appears twice in order"))?;
        created.push(row);
    }

    Ok(created)
}

/// Recompute the order's totals from its current item set.
///
/// `subtotal = Σ(unit_price × quantity)` (zero when there are no items),
/// `total = subtotal + delivery_fee`. Idempotent for an unchanged item
/// set; used by order creation and by administrative item mutations.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the order does not exist.
pub async fn recalculate_totals(
    conn: &mut PgConnection,
    order_id: OrderId,
) -> Result<(Decimal, Decimal), RepositoryError> {
    let totals: Option<(Decimal, Decimal)> = sqlx::query_as(
        r"
        UPDATE customer_order o
        SET subtotal = agg.items_subtotal,
            total = agg.items_subtotal + o.delivery_fee
        FROM (
            SELECT COALESCE(SUM(unit_price * quantity), 0.00) AS items_subtotal
            FROM order_item
            WHERE order_id = $1
        ) agg
        WHERE o.id = $1
        RETURNING o.subtotal, o.total
        ",
    )
    .bind(order_id)
    .fetch_optional(conn)
    .await?;

    totals.ok_or(RepositoryError::NotFound)
}

/// An order joined with the public UUIDs of its store and account, for
/// API representations.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderWithRefs {
    #[sqlx(flatten)]
    pub order: Order,
    pub store_uuid: Uuid,
    pub account_uuid: Uuid,
}

const ORDER_REF_COLUMNS: &str = "o.id, o.uuid, o.store_id, o.account_id, o.status, o.notes, \
     o.delivery_fee, o.subtotal, o.total, o.zip_code, o.street, o.number, \
     o.neighborhood, o.complement, o.reference, o.city, o.state, \
     o.latitude, o.longitude, o.created_at, o.updated_at, \
     s.uuid AS store_uuid, a.uuid AS account_uuid";

/// Get an order with its store/account UUIDs by its public UUID.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get_by_uuid_with_refs(
    pool: &PgPool,
    uuid: Uuid,
) -> Result<Option<OrderWithRefs>, RepositoryError> {
    let query = format!(
        "SELECT {ORDER_REF_COLUMNS}
         FROM customer_order o
         JOIN store s ON s.id = o.store_id
         JOIN account a ON a.id = o.account_id
         WHERE o.uuid = $1"
    );
    let order = sqlx::query_as::<_, OrderWithRefs>(&query)
        .bind(uuid)
        .fetch_optional(pool)
        .await?;

    Ok(order)
}

/// List an account's orders with refs, newest first.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_for_account_with_refs(
    pool: &PgPool,
    account_id: AccountId,
) -> Result<Vec<OrderWithRefs>, RepositoryError> {
    let query = format!(
        "SELECT {ORDER_REF_COLUMNS}
         FROM customer_order o
         JOIN store s ON s.id = o.store_id
         JOIN account a ON a.id = o.account_id
         WHERE o.account_id = $1
         ORDER BY o.created_at DESC"
    );
    let orders = sqlx::query_as::<_, OrderWithRefs>(&query)
        .bind(account_id)
        .fetch_all(pool)
        .await?;

    Ok(orders)
}

/// Get an order by UUID and lock its row for the rest of the transaction.
///
/// Item mutations lock the order first so concurrent edits of the same
/// order's item set serialize.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get_by_uuid_for_update(
    conn: &mut PgConnection,
    uuid: Uuid,
) -> Result<Option<Order>, RepositoryError> {
    let query = format!("SELECT {ORDER_COLUMNS} FROM customer_order WHERE uuid = $1 FOR UPDATE");
    let order = sqlx::query_as::<_, Order>(&query)
        .bind(uuid)
        .fetch_optional(conn)
        .await?;

    Ok(order)
}

/// List the items of an order.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn items<'e, E>(executor: E, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError>
where
    E: sqlx::PgExecutor<'e>,
{
    let query = format!(
        "SELECT {ITEM_COLUMNS}
         FROM order_item
         WHERE order_id = $1
         ORDER BY product_uuid"
    );
    let items = sqlx::query_as::<_, OrderItem>(&query)
        .bind(order_id)
        .fetch_all(executor)
        .await?;

    Ok(items)
}

/// Set an order's status.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the order does not exist.
pub async fn set_status(
    conn: &mut PgConnection,
    id: OrderId,
    status: OrderStatus,
) -> Result<Order, RepositoryError> {
    let query = format!(
        "UPDATE customer_order
         SET status = $2
         WHERE id = $1
         RETURNING {ORDER_COLUMNS}"
    );
    let order = sqlx::query_as::<_, Order>(&query)
        .bind(id)
        .bind(status)
        .fetch_optional(conn)
        .await?;

    order.ok_or(RepositoryError::NotFound)
}

/// Set the quantity of one order item.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the order has no item for the
/// product.
pub async fn set_item_quantity(
    conn: &mut PgConnection,
    order_id: OrderId,
    product_uuid: Uuid,
    quantity: i32,
) -> Result<OrderItem, RepositoryError> {
    let query = format!(
        "UPDATE order_item
         SET quantity = $3
         WHERE order_id = $1 AND product_uuid = $2
         RETURNING {ITEM_COLUMNS}"
    );
    let item = sqlx::query_as::<_, OrderItem>(&query)
        .bind(order_id)
        .bind(product_uuid)
        .bind(quantity)
        .fetch_optional(conn)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "quantity must be at least 1"))?;

    item.ok_or(RepositoryError::NotFound)
}

/// Remove one item from an order.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the order has no item for the
/// product.
pub async fn delete_item(
    conn: &mut PgConnection,
    order_id: OrderId,
    product_uuid: Uuid,
) -> Result<(), RepositoryError> {
    let result = sqlx::query(
        r"
        DELETE FROM order_item
        WHERE order_id = $1 AND product_uuid = $2
        ",
    )
    .bind(order_id)
    .bind(product_uuid)
    .execute(conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}
