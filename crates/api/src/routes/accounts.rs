//! Chart of accounts routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::{AppState, authz::require_book_capability, middleware::AuthUser};
use folio_core::rbac::Capability;
use folio_db::entities::sea_orm_active_enums::AccountType;
use folio_db::repositories::{AccountError, AccountRepository, CreateAccountInput};

/// Creates the accounts router (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", post(create_account))
        .route("/accounts/book/{book_id}", get(list_accounts))
}

/// Request body for POST /accounts.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Book the account belongs to.
    pub book_id: uuid::Uuid,
    /// Parent account within the same book.
    pub parent_id: Option<uuid::Uuid>,
    /// Account name.
    pub name: String,
    /// Account type; ROOT is refused.
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Commodity the account is denominated in.
    pub commodity_id: uuid::Uuid,
    /// Account code used for ordering.
    pub code: Option<String>,
    /// Account description.
    pub description: Option<String>,
    /// Placeholder accounts cannot take postings.
    #[serde(default)]
    pub placeholder: bool,
}

/// POST /accounts - Create an ordinary account.
async fn create_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateAccountRequest>,
) -> impl IntoResponse {
    if let Err(resp) =
        require_book_capability(&state, &auth, payload.book_id, Capability::WriteAccounts).await
    {
        return resp;
    }

    let repo = AccountRepository::new((*state.db).clone());
    let result = repo
        .create_account(CreateAccountInput {
            book_id: payload.book_id,
            parent_id: payload.parent_id,
            name: payload.name,
            account_type: payload.account_type,
            commodity_id: payload.commodity_id,
            code: payload.code,
            description: payload.description,
            placeholder: payload.placeholder,
        })
        .await;

    match result {
        Ok(account) => {
            info!(account_id = %account.id, book_id = %account.book_id, "Account created");
            (StatusCode::CREATED, Json(json!(account))).into_response()
        }
        Err(AccountError::RootNotAllowed) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "root_not_allowed",
                "message": "Root accounts cannot be created directly"
            })),
        )
            .into_response(),
        Err(
            e @ (AccountError::BookNotFound(_)
            | AccountError::CommodityNotFound(_)
            | AccountError::ParentNotFound(_)),
        ) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": e.to_string()
            })),
        )
            .into_response(),
        Err(
            e @ (AccountError::CommodityWrongBook
            | AccountError::ParentWrongBook
            | AccountError::ParentRequired),
        ) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": e.to_string()
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to create account");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred creating the account"
                })),
            )
                .into_response()
        }
    }
}

/// GET `/accounts/book/{book_id}` - List a book's accounts in chart order.
async fn list_accounts(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(book_id): Path<uuid::Uuid>,
) -> impl IntoResponse {
    if let Err(resp) =
        require_book_capability(&state, &auth, book_id, Capability::ReadAccounts).await
    {
        return resp;
    }

    let repo = AccountRepository::new((*state.db).clone());
    match repo.list_accounts(book_id).await {
        Ok(accounts) => (StatusCode::OK, Json(json!(accounts))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list accounts");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response()
        }
    }
}
