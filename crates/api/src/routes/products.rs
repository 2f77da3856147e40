//! Product routes.

use axum::Json;
use axum::extract::{Path, Query, State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db;
use crate::error::{AppError, Result};
use crate::models::Product;
use crate::state::AppState;

/// Product representation. `effective_price` is the unit price a new
/// order item would snapshot right now.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub uuid: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub discount_percentage: Decimal,
    pub effective_price: Decimal,
    pub position: i32,
    pub is_active: bool,
    pub picture: Option<String>,
    pub thumbnail: Option<String>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        let effective_price = product.effective_price();
        Self {
            uuid: product.uuid,
            name: product.name,
            description: product.description,
            price: product.price,
            discount_percentage: product.discount_percentage,
            effective_price,
            position: product.position,
            is_active: product.is_active,
            picture: product.picture,
            thumbnail: product.thumbnail,
        }
    }
}

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
    pub store_uuid: Uuid,
    /// When true (default), only active products are returned.
    #[serde(default = "default_active")]
    pub active: bool,
}

const fn default_active() -> bool {
    true
}

/// GET /api/products?store_uuid=...
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> Result<Json<Vec<ProductResponse>>> {
    let store = db::stores::get_by_uuid(state.pool(), query.store_uuid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("store {}", query.store_uuid)))?;

    let products = db::products::list_for_store(state.pool(), store.id, query.active).await?;

    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// GET /api/products/{uuid}
pub async fn show(
    State(state): State<AppState>,
    Path(uuid): Path<Uuid>,
) -> Result<Json<ProductResponse>> {
    let product = db::products::get_by_uuid(state.pool(), uuid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {uuid}")))?;

    Ok(Json(product.into()))
}
