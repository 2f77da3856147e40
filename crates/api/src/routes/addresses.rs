//! Address routes.
//!
//! Every write goes through the address service so the one-default-per-
//! owner invariant holds no matter which endpoint touched the row.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::models::Address;
use crate::services::AddressService;
use crate::services::addresses::SaveAddress;
use crate::state::AppState;

/// Address representation with a formatted zip code.
#[derive(Debug, Serialize)]
pub struct AddressResponse {
    pub uuid: Uuid,
    pub label: Option<String>,
    pub is_default: bool,
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
}

impl From<Address> for AddressResponse {
    fn from(address: Address) -> Self {
        Self {
            uuid: address.uuid,
            label: address.label,
            is_default: address.is_default,
            zip_code: address.zip_code.formatted(),
            street: address.street,
            number: address.number,
            neighborhood: address.neighborhood,
            complement: address.complement,
            reference: address.reference,
            city: address.city,
            state: address.state.as_str().to_owned(),
            latitude: address.latitude,
            longitude: address.longitude,
        }
    }
}

/// Owner selector: exactly one of the two must be present.
#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub account_uuid: Option<Uuid>,
    pub store_uuid: Option<Uuid>,
}

/// Request to create an address.
#[derive(Debug, Deserialize)]
pub struct CreateAddressRequest {
    pub account_uuid: Option<Uuid>,
    pub store_uuid: Option<Uuid>,
    #[serde(flatten)]
    pub fields: AddressFields,
}

/// Request to update an address (the owner never changes).
#[derive(Debug, Deserialize)]
pub struct UpdateAddressRequest {
    #[serde(flatten)]
    pub fields: AddressFields,
}

/// The writable address fields.
#[derive(Debug, Deserialize)]
pub struct AddressFields {
    pub label: Option<String>,
    #[serde(default)]
    pub is_default: bool,
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
}

impl From<AddressFields> for SaveAddress {
    fn from(fields: AddressFields) -> Self {
        Self {
            label: fields.label,
            is_default: fields.is_default,
            zip_code: fields.zip_code,
            street: fields.street,
            number: fields.number,
            neighborhood: fields.neighborhood,
            complement: fields.complement,
            reference: fields.reference,
            city: fields.city,
            state: fields.state,
            latitude: fields.latitude,
            longitude: fields.longitude,
        }
    }
}

/// GET /api/addresses?account_uuid=... | ?store_uuid=...
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<Vec<AddressResponse>>> {
    let service = AddressService::new(state.pool());
    let owner = service
        .resolve_owner(query.account_uuid, query.store_uuid)
        .await?;
    let addresses = service.list(owner).await?;

    Ok(Json(addresses.into_iter().map(Into::into).collect()))
}

/// POST /api/addresses
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateAddressRequest>,
) -> Result<(StatusCode, Json<AddressResponse>)> {
    let service = AddressService::new(state.pool());
    let owner = service
        .resolve_owner(request.account_uuid, request.store_uuid)
        .await?;
    let address = service.create(owner, request.fields.into()).await?;

    Ok((StatusCode::CREATED, Json(address.into())))
}

/// PUT /api/addresses/{uuid}
pub async fn update(
    State(state): State<AppState>,
    Path(uuid): Path<Uuid>,
    Json(request): Json<UpdateAddressRequest>,
) -> Result<Json<AddressResponse>> {
    let service = AddressService::new(state.pool());
    let address = service.update(uuid, request.fields.into()).await?;

    Ok(Json(address.into()))
}
