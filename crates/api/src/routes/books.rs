//! Book provisioning and settings routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::{
    AppState,
    authz::{require_book_capability, require_capability},
    middleware::AuthUser,
};
use folio_core::rbac::Capability;
use folio_db::repositories::{
    BookError, BookRepository, CurrencySpec, ProvisionBookInput, UpdateBookSettingsInput,
};

/// Creates the books router (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/books", post(create_book))
        .route("/books/organization/{org_id}", get(list_books))
        .route("/books/{book_id}/settings", get(get_settings))
        .route("/books/{book_id}/settings", put(update_settings))
}

/// Currency fields for book creation.
#[derive(Debug, Deserialize, Default)]
pub struct CurrencyPayload {
    /// ISO-style code.
    pub mnemonic: Option<String>,
    /// Full currency name.
    pub fullname: Option<String>,
    /// Minor units per major unit.
    pub fraction: Option<i32>,
}

/// Request body for POST /books.
#[derive(Debug, Deserialize)]
pub struct CreateBookRequest {
    /// Owning organization.
    pub organization_id: uuid::Uuid,
    /// Book name.
    pub name: String,
    /// Book description.
    pub description: Option<String>,
    /// First day of the fiscal year.
    pub fiscal_year_start: NaiveDate,
    /// Base currency specification; defaults to USD when absent.
    #[serde(default)]
    pub currency: CurrencyPayload,
}

/// POST /books - Provision a book with its base currency, root
/// account, and settings as one atomic unit.
async fn create_book(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateBookRequest>,
) -> impl IntoResponse {
    if let Err(resp) = require_capability(
        &state,
        &auth,
        payload.organization_id,
        Capability::WriteBooks,
    )
    .await
    {
        return resp;
    }

    let repo = BookRepository::new((*state.db).clone());

    let provisioned = match repo
        .provision_book(ProvisionBookInput {
            organization_id: payload.organization_id,
            name: payload.name,
            description: payload.description,
            fiscal_year_start: payload.fiscal_year_start,
            currency: CurrencySpec {
                mnemonic: payload.currency.mnemonic,
                fullname: payload.currency.fullname,
                fraction: payload.currency.fraction,
            },
        })
        .await
    {
        Ok(p) => p,
        Err(BookError::OrganizationNotFound(_)) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": "not_found",
                    "message": "Organization not found"
                })),
            )
                .into_response();
        }
        Err(e @ (BookError::InvalidName | BookError::InvalidMnemonic)) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "validation_error",
                    "message": e.to_string()
                })),
            )
                .into_response();
        }
        Err(BookError::InvalidFraction(f)) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "invalid_fraction",
                    "message": format!("Commodity fraction must be positive, got {f}")
                })),
            )
                .into_response();
        }
        Err(e) => {
            // The transaction has already rolled back; nothing from
            // this call persists and the caller gets no raw detail.
            error!(error = %e, "Book provisioning failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred creating the book"
                })),
            )
                .into_response();
        }
    };

    info!(
        book_id = %provisioned.book.id,
        org_id = %provisioned.book.organization_id,
        currency = %provisioned.base_currency.mnemonic,
        "Book provisioned"
    );

    (
        StatusCode::CREATED,
        Json(json!({
            "book": provisioned.book,
            "base_currency": provisioned.base_currency,
            "root_account": provisioned.root_account
        })),
    )
        .into_response()
}

/// GET `/books/organization/{org_id}` - List an organization's books.
async fn list_books(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<uuid::Uuid>,
) -> impl IntoResponse {
    if let Err(resp) = require_capability(&state, &auth, org_id, Capability::ReadBooks).await {
        return resp;
    }

    let repo = BookRepository::new((*state.db).clone());
    match repo.find_by_organization(org_id).await {
        Ok(books) => (StatusCode::OK, Json(json!(books))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list books");
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

/// GET `/books/{book_id}/settings` - Read a book's settings.
async fn get_settings(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(book_id): Path<uuid::Uuid>,
) -> impl IntoResponse {
    if let Err(resp) =
        require_book_capability(&state, &auth, book_id, Capability::ReadSettings).await
    {
        return resp;
    }

    let repo = BookRepository::new((*state.db).clone());
    match repo.get_settings(book_id).await {
        Ok(Some(settings)) => (StatusCode::OK, Json(json!(settings))).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Settings not found"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to fetch settings");
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

/// Request body for PUT `/books/{book_id}/settings`. Only these fields
/// can be changed; anything else in the payload is ignored.
#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    /// Use trading accounts for commodity movements.
    pub use_trading_accounts: Option<bool>,
    /// Show the split action field.
    pub use_split_action_field: Option<bool>,
    /// Days after which transactions become read-only.
    pub auto_readonly_days: Option<String>,
    /// Enable euro support.
    pub enable_euro_support: Option<bool>,
    /// Accounting period structure.
    pub accounting_period: Option<serde_json::Value>,
}

/// PUT `/books/{book_id}/settings` - Apply an allow-listed partial update.
async fn update_settings(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(book_id): Path<uuid::Uuid>,
    Json(payload): Json<UpdateSettingsRequest>,
) -> impl IntoResponse {
    if let Err(resp) =
        require_book_capability(&state, &auth, book_id, Capability::WriteSettings).await
    {
        return resp;
    }

    let repo = BookRepository::new((*state.db).clone());
    let result = repo
        .update_settings(
            book_id,
            UpdateBookSettingsInput {
                use_trading_accounts: payload.use_trading_accounts,
                use_split_action_field: payload.use_split_action_field,
                auto_readonly_days: payload.auto_readonly_days,
                enable_euro_support: payload.enable_euro_support,
                accounting_period: payload.accounting_period,
            },
        )
        .await;

    match result {
        Ok(settings) => (StatusCode::OK, Json(json!(settings))).into_response(),
        Err(BookError::EmptyUpdate) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "empty_update",
                "message": "No fields provided for update"
            })),
        )
            .into_response(),
        Err(BookError::SettingsNotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Settings not found"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to update settings");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred updating settings"
                })),
            )
                .into_response()
        }
    }
}
