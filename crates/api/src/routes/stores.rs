//! Store routes.

use axum::Json;
use axum::extract::{Path, State};
use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::db;
use crate::error::{AppError, Result};
use crate::models::{OpeningHours, Product, Section, Store};
use crate::routes::products::ProductResponse;
use crate::state::AppState;

/// Store representation.
#[derive(Debug, Serialize)]
pub struct StoreResponse {
    pub uuid: Uuid,
    pub name: String,
    pub fantasy_name: Option<String>,
    pub slug: String,
    pub cnpj: String,
    pub thumbnail: Option<String>,
    pub banner: Option<String>,
    pub min_order_value: Decimal,
    pub delivery_fee: Decimal,
    pub delivery_time: i32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub opening_hours: Vec<OpeningHoursResponse>,
}

/// One opening window.
#[derive(Debug, Serialize)]
pub struct OpeningHoursResponse {
    pub weekday: i16,
    pub from_hour: NaiveTime,
    pub to_hour: NaiveTime,
}

/// A section with the products it displays.
#[derive(Debug, Serialize)]
pub struct SectionResponse {
    pub uuid: Uuid,
    pub title: String,
    pub position: i32,
    pub min_products: i32,
    pub max_products: i32,
    pub is_required: bool,
    pub is_highlighted: bool,
    pub form: prato_core::SectionForm,
    pub textbox_help_text: Option<String>,
    pub products: Vec<ProductResponse>,
}

impl StoreResponse {
    fn from_store(store: Store, hours: Vec<OpeningHours>) -> Self {
        Self {
            uuid: store.uuid,
            name: store.name,
            fantasy_name: store.fantasy_name,
            slug: store.slug,
            cnpj: store.cnpj.formatted(),
            thumbnail: store.thumbnail,
            banner: store.banner,
            min_order_value: store.min_order_value,
            delivery_fee: store.delivery_fee,
            delivery_time: store.delivery_time,
            opening_hours: hours
                .into_iter()
                .map(|h| OpeningHoursResponse {
                    weekday: h.weekday,
                    from_hour: h.from_hour,
                    to_hour: h.to_hour,
                })
                .collect(),
        }
    }
}

impl SectionResponse {
    fn from_section(section: Section, products: Vec<Product>) -> Self {
        Self {
            uuid: section.uuid,
            title: section.title,
            position: section.position,
            min_products: section.min_products,
            max_products: section.max_products,
            is_required: section.is_required,
            is_highlighted: section.is_highlighted,
            form: section.form,
            textbox_help_text: section.textbox_help_text,
            products: products.into_iter().map(ProductResponse::from).collect(),
        }
    }
}

/// GET /api/stores
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<StoreResponse>>> {
    let stores = db::stores::list(state.pool()).await?;
    let responses = stores
        .into_iter()
        .map(|store| StoreResponse::from_store(store, Vec::new()))
        .collect();

    Ok(Json(responses))
}

/// GET /api/stores/{uuid}
pub async fn show(
    State(state): State<AppState>,
    Path(uuid): Path<Uuid>,
) -> Result<Json<StoreResponse>> {
    let store = db::stores::get_by_uuid(state.pool(), uuid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("store {uuid}")))?;
    let hours = db::stores::opening_hours(state.pool(), store.id).await?;

    Ok(Json(StoreResponse::from_store(store, hours)))
}

/// GET /api/stores/{uuid}/sections
///
/// Active sections with their active products, both ordered by position.
pub async fn sections(
    State(state): State<AppState>,
    Path(uuid): Path<Uuid>,
) -> Result<Json<Vec<SectionResponse>>> {
    let store = db::stores::get_by_uuid(state.pool(), uuid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("store {uuid}")))?;

    let sections = db::products::list_sections_for_store(state.pool(), store.id, true).await?;

    let mut responses = Vec::with_capacity(sections.len());
    for section in sections {
        let products = db::products::list_for_section(state.pool(), section.id, true).await?;
        responses.push(SectionResponse::from_section(section, products));
    }

    Ok(Json(responses))
}
