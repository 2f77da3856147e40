//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Health check
//!
//! # Stores
//! GET  /api/stores                      - Store listing
//! GET  /api/stores/{uuid}               - Store detail (with opening hours)
//! GET  /api/stores/{uuid}/sections      - Active sections with their products
//!
//! # Products
//! GET  /api/products?store_uuid=...     - Product listing for a store
//! GET  /api/products/{uuid}             - Product detail
//!
//! # Accounts
//! GET  /api/accounts                    - Account listing
//! GET  /api/accounts/{uuid}             - Account detail (with addresses)
//! POST /api/accounts                    - Create account
//! POST /api/accounts/{uuid}/promote     - Promote to admin (flags user staff)
//!
//! # Addresses
//! GET  /api/addresses?account_uuid=...  - Addresses of one owner
//! POST /api/addresses                   - Create (maintains one default per owner)
//! PUT  /api/addresses/{uuid}            - Update (same invariant)
//!
//! # Orders
//! POST  /api/orders                     - Create a priced order from a cart
//! GET   /api/orders?account_uuid=...    - Order history of an account
//! GET   /api/orders/{uuid}              - Order detail with items
//! PATCH /api/orders/{uuid}/status       - Lifecycle transition
//! PUT   /api/orders/{uuid}/items/{product_uuid}  - Set item quantity
//! DELETE /api/orders/{uuid}/items/{product_uuid} - Remove item
//! ```

pub mod accounts;
pub mod addresses;
pub mod health;
pub mod orders;
pub mod products;
pub mod stores;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the store routes router.
pub fn store_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(stores::index))
        .route("/{uuid}", get(stores::show))
        .route("/{uuid}/sections", get(stores::sections))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{uuid}", get(products::show))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(accounts::index).post(accounts::create))
        .route("/{uuid}", get(accounts::show))
        .route("/{uuid}/promote", post(accounts::promote))
}

/// Create the address routes router.
pub fn address_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(addresses::index).post(addresses::create))
        .route("/{uuid}", put(addresses::update))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index).post(orders::create))
        .route("/{uuid}", get(orders::show))
        .route("/{uuid}/status", axum::routing::patch(orders::set_status))
        .route(
            "/{uuid}/items/{product_uuid}",
            put(orders::set_item_quantity).delete(orders::remove_item),
        )
}

/// Assemble the full application router.
pub fn router() -> Router<AppState> {
    let api = Router::new()
        .nest("/stores", store_routes())
        .nest("/products", product_routes())
        .nest("/accounts", account_routes())
        .nest("/addresses", address_routes())
        .nest("/orders", order_routes());

    Router::new()
        .route("/health", get(health::check))
        .nest("/api", api)
}
