//! Order routes.
//!
//! `create` accepts the flat payload the mobile clients send: cart lines
//! plus the delivery address fields inline. On success the caller gets the
//! complete priced order back, items included; on failure a structured
//! error names exactly what was invalid.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use prato_core::{CartLine, OrderStatus};

use crate::db;
use crate::error::{AppError, Result};
use crate::models::{Order, OrderItem};
use crate::services::OrderService;
use crate::services::orders::{CreateOrder, DeliveryAddressInput, OrderError};
use crate::state::AppState;

/// One cart line in the creation payload.
#[derive(Debug, Deserialize)]
pub struct OrderItemInput {
    pub product_uuid: Uuid,
    pub quantity: u32,
}

/// Request to create an order.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub store_uuid: Uuid,
    pub account_uuid: Uuid,
    pub items: Vec<OrderItemInput>,
    pub notes: Option<String>,

    // Delivery address, validated by the assembler
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

/// One order item in responses, with its computed line total.
#[derive(Debug, Serialize)]
pub struct OrderItemResponse {
    pub uuid: Uuid,
    pub product_uuid: Uuid,
    pub product_name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub total: Decimal,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        let total = item.total();
        Self {
            uuid: item.uuid,
            product_uuid: item.product_uuid,
            product_name: item.product_name,
            unit_price: item.unit_price,
            quantity: item.quantity,
            total,
        }
    }
}

/// Full order representation.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub uuid: Uuid,
    pub store_uuid: Uuid,
    pub account_uuid: Uuid,
    pub status: OrderStatus,
    pub notes: Option<String>,
    pub delivery_fee: Decimal,
    pub subtotal: Decimal,
    pub total: Decimal,
    pub zip_code: String,
    pub street: String,
    pub number: String,
    pub neighborhood: Option<String>,
    pub complement: Option<String>,
    pub reference: Option<String>,
    pub city: String,
    pub state: String,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<OrderItemResponse>,
}

impl OrderResponse {
    fn from_parts(
        order: Order,
        store_uuid: Uuid,
        account_uuid: Uuid,
        items: Vec<OrderItem>,
    ) -> Self {
        Self {
            uuid: order.uuid,
            store_uuid,
            account_uuid,
            status: order.status,
            notes: order.notes,
            delivery_fee: order.delivery_fee,
            subtotal: order.subtotal,
            total: order.total,
            zip_code: order.zip_code.formatted(),
            street: order.street,
            number: order.number,
            neighborhood: order.neighborhood,
            complement: order.complement,
            reference: order.reference,
            city: order.city,
            state: order.state.as_str().to_owned(),
            latitude: order.latitude,
            longitude: order.longitude,
            created_at: order.created_at,
            updated_at: order.updated_at,
            items: items.into_iter().map(Into::into).collect(),
        }
    }
}

/// Query parameters for the order listing.
#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    pub account_uuid: Uuid,
}

/// Request to transition an order's status.
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: OrderStatus,
}

/// Request to set one item's quantity.
#[derive(Debug, Deserialize)]
pub struct SetItemQuantityRequest {
    pub quantity: u32,
}

/// POST /api/orders
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>)> {
    let store_uuid = request.store_uuid;
    let account_uuid = request.account_uuid;

    let service = OrderService::new(state.pool());
    let (order, items) = service
        .create_order(CreateOrder {
            store_uuid,
            account_uuid,
            items: request
                .items
                .into_iter()
                .map(|line| CartLine {
                    product_uuid: line.product_uuid,
                    quantity: line.quantity,
                })
                .collect(),
            notes: request.notes,
            address: DeliveryAddressInput {
                zip_code: request.zip_code,
                street: request.street,
                number: request.number,
                neighborhood: request.neighborhood,
                complement: request.complement,
                reference: request.reference,
                city: request.city,
                state: request.state,
                latitude: request.latitude,
                longitude: request.longitude,
            },
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(OrderResponse::from_parts(
            order,
            store_uuid,
            account_uuid,
            items,
        )),
    ))
}

/// GET /api/orders?account_uuid=...
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Vec<OrderResponse>>> {
    let account = db::accounts::get_by_uuid(state.pool(), query.account_uuid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("account {}", query.account_uuid)))?;

    let orders = db::orders::list_for_account_with_refs(state.pool(), account.id).await?;

    let mut responses = Vec::with_capacity(orders.len());
    for with_refs in orders {
        let items = db::orders::items(state.pool(), with_refs.order.id).await?;
        responses.push(OrderResponse::from_parts(
            with_refs.order,
            with_refs.store_uuid,
            with_refs.account_uuid,
            items,
        ));
    }

    Ok(Json(responses))
}

/// GET /api/orders/{uuid}
pub async fn show(
    State(state): State<AppState>,
    Path(uuid): Path<Uuid>,
) -> Result<Json<OrderResponse>> {
    respond_with_refs(&state, uuid).await
}

/// PATCH /api/orders/{uuid}/status
pub async fn set_status(
    State(state): State<AppState>,
    Path(uuid): Path<Uuid>,
    Json(request): Json<SetStatusRequest>,
) -> Result<Json<OrderResponse>> {
    let service = OrderService::new(state.pool());
    service.set_status(uuid, request.status).await?;

    respond_with_refs(&state, uuid).await
}

/// PUT /api/orders/{uuid}/items/{product_uuid}
pub async fn set_item_quantity(
    State(state): State<AppState>,
    Path((uuid, product_uuid)): Path<(Uuid, Uuid)>,
    Json(request): Json<SetItemQuantityRequest>,
) -> Result<Json<OrderResponse>> {
    let service = OrderService::new(state.pool());
    service
        .set_item_quantity(uuid, product_uuid, request.quantity)
        .await?;

    respond_with_refs(&state, uuid).await
}

/// DELETE /api/orders/{uuid}/items/{product_uuid}
pub async fn remove_item(
    State(state): State<AppState>,
    Path((uuid, product_uuid)): Path<(Uuid, Uuid)>,
) -> Result<Json<OrderResponse>> {
    let service = OrderService::new(state.pool());
    service.remove_item(uuid, product_uuid).await?;

    respond_with_refs(&state, uuid).await
}

async fn respond_with_refs(state: &AppState, uuid: Uuid) -> Result<Json<OrderResponse>> {
    let with_refs = db::orders::get_by_uuid_with_refs(state.pool(), uuid)
        .await?
        .ok_or(AppError::Order(OrderError::OrderNotFound))?;
    let items = db::orders::items(state.pool(), with_refs.order.id).await?;

    Ok(Json(OrderResponse::from_parts(
        with_refs.order,
        with_refs.store_uuid,
        with_refs.account_uuid,
        items,
    )))
}
