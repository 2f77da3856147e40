//! Account routes.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use prato_core::{AccountKind, AddressOwner};

use crate::db;
use crate::error::{AppError, Result};
use crate::models::{Account, UserIdentity};
use crate::routes::addresses::AddressResponse;
use crate::services::AccountService;
use crate::services::accounts::NewAccount;
use crate::state::AppState;

/// Nested user representation.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Account representation with formatted documents.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub uuid: Uuid,
    pub kind: AccountKind,
    pub cpf: String,
    pub phone: String,
    pub user: UserResponse,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<AddressResponse>,
}

impl AccountResponse {
    fn from_parts(account: Account, user: UserIdentity, addresses: Vec<AddressResponse>) -> Self {
        Self {
            uuid: account.uuid,
            kind: account.kind,
            cpf: account.cpf.formatted(),
            phone: account.phone.formatted(),
            user: UserResponse {
                first_name: user.first_name,
                last_name: user.last_name,
                email: user.email,
            },
            addresses,
        }
    }
}

/// Request to create an account.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub kind: AccountKind,
    pub cpf: String,
    pub phone: String,
}

/// GET /api/accounts
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<AccountResponse>>> {
    let accounts = db::accounts::list(state.pool()).await?;

    let mut responses = Vec::with_capacity(accounts.len());
    for account in accounts {
        let user = db::accounts::get_user(state.pool(), account.user_id).await?;
        responses.push(AccountResponse::from_parts(account, user, Vec::new()));
    }

    Ok(Json(responses))
}

/// GET /api/accounts/{uuid}
pub async fn show(
    State(state): State<AppState>,
    Path(uuid): Path<Uuid>,
) -> Result<Json<AccountResponse>> {
    let account = db::accounts::get_by_uuid(state.pool(), uuid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("account {uuid}")))?;
    let user = db::accounts::get_user(state.pool(), account.user_id).await?;

    let addresses =
        db::addresses::list_for_owner(state.pool(), AddressOwner::Account(account.id)).await?;
    let addresses = addresses
        .into_iter()
        .map(AddressResponse::from)
        .collect::<Vec<_>>();

    Ok(Json(AccountResponse::from_parts(account, user, addresses)))
}

/// POST /api/accounts
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<AccountResponse>)> {
    let service = AccountService::new(state.pool());
    let (account, user) = service
        .create(NewAccount {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            kind: request.kind,
            cpf: request.cpf,
            phone: request.phone,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AccountResponse::from_parts(account, user, Vec::new())),
    ))
}

/// POST /api/accounts/{uuid}/promote
///
/// Promotes the account to admin and flags its user as staff.
pub async fn promote(
    State(state): State<AppState>,
    Path(uuid): Path<Uuid>,
) -> Result<Json<AccountResponse>> {
    let service = AccountService::new(state.pool());
    let account = service.promote_to_admin(uuid).await?;
    let user = db::accounts::get_user(state.pool(), account.user_id).await?;

    Ok(Json(AccountResponse::from_parts(account, user, Vec::new())))
}
