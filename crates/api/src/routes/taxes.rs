//! Tax table routes.
//!
//! The combined rate is computed server-side with exact rational
//! arithmetic and shipped both as a fraction and as a round-half-up
//! percent string, so clients never re-derive it with floats.

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
use folio_db::entities::sea_orm_active_enums::TaxEntryType;
use folio_db::repositories::{
    CreateTaxEntryInput, CreateTaxTableInput, TaxError, TaxRepository, TaxTableWithEntries,
};

/// Creates the taxes router (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/taxes", post(create_tax_table))
        .route("/taxes/book/{book_id}", get(list_tax_tables))
}

/// One component entry in a tax table request.
#[derive(Debug, Deserialize)]
pub struct TaxEntryPayload {
    /// Account the tax amount posts to.
    pub account_id: uuid::Uuid,
    /// Rate numerator.
    pub amount_num: i64,
    /// Rate denominator.
    #[serde(default = "default_denom")]
    pub amount_denom: i64,
    /// Entry type.
    #[serde(rename = "type", default = "default_entry_type")]
    pub entry_type: TaxEntryType,
    /// Presentation order.
    #[serde(default)]
    pub sort_order: i32,
}

const fn default_denom() -> i64 {
    100
}

const fn default_entry_type() -> TaxEntryType {
    TaxEntryType::Percent
}

/// Request body for POST /taxes.
#[derive(Debug, Deserialize)]
pub struct CreateTaxTableRequest {
    /// Book the table belongs to.
    pub book_id: uuid::Uuid,
    /// Table name.
    pub name: String,
    /// Whether this is the book's default table.
    #[serde(default)]
    pub is_default: bool,
    /// Component entries.
    #[serde(default)]
    pub entries: Vec<TaxEntryPayload>,
}

/// Renders a table with entries and its exact combined rate.
fn table_json(table: &TaxTableWithEntries) -> serde_json::Value {
    let entries: Vec<_> = table
        .entries
        .iter()
        .map(|e| {
            json!({
                "id": e.entry.id,
                "tax_table_id": e.entry.tax_table_id,
                "account_id": e.entry.account_id,
                "account_name": e.account_name,
                "amount_num": e.entry.amount_num,
                "amount_denom": e.entry.amount_denom,
                "type": e.entry.entry_type,
                "sort_order": e.entry.sort_order
            })
        })
        .collect();

    json!({
        "id": table.table.id,
        "book_id": table.table.book_id,
        "name": table.table.name,
        "is_default": table.table.is_default,
        "active": table.table.active,
        "created_at": table.table.created_at,
        "entries": entries,
        "total_rate": {
            "num": table.total_rate.numerator(),
            "denom": table.total_rate.denominator()
        },
        "total_rate_percent": table.total_rate.to_percent(2).to_string()
    })
}

/// POST /taxes - Create a tax table with all entries atomically.
async fn create_tax_table(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateTaxTableRequest>,
) -> impl IntoResponse {
    if let Err(resp) =
        require_book_capability(&state, &auth, payload.book_id, Capability::WriteTaxes).await
    {
        return resp;
    }

    let repo = TaxRepository::new((*state.db).clone());
    let result = repo
        .create_tax_table(CreateTaxTableInput {
            book_id: payload.book_id,
            name: payload.name,
            is_default: payload.is_default,
            entries: payload
                .entries
                .into_iter()
                .map(|e| CreateTaxEntryInput {
                    account_id: e.account_id,
                    amount_num: e.amount_num,
                    amount_denom: e.amount_denom,
                    entry_type: e.entry_type,
                    sort_order: e.sort_order,
                })
                .collect(),
        })
        .await;

    match result {
        Ok(table) => {
            info!(
                table_id = %table.table.id,
                book_id = %table.table.book_id,
                entries = table.entries.len(),
                "Tax table created"
            );
            (StatusCode::CREATED, Json(table_json(&table))).into_response()
        }
        Err(e @ (TaxError::InvalidName | TaxError::InvalidDenominator(_))) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": e.to_string()
            })),
        )
            .into_response(),
        Err(e @ (TaxError::BookNotFound(_) | TaxError::AccountNotFound(_))) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": e.to_string()
            })),
        )
            .into_response(),
        Err(e @ TaxError::AccountWrongBook(_)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": e.to_string()
            })),
        )
            .into_response(),
        Err(e) => {
            // All inserts from this call rolled back together.
            error!(error = %e, "Tax table creation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred creating the tax table"
                })),
            )
                .into_response()
        }
    }
}

/// GET `/taxes/book/{book_id}` - List a book's tax tables with entries
/// and exact combined rates.
async fn list_tax_tables(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(book_id): Path<uuid::Uuid>,
) -> impl IntoResponse {
    if let Err(resp) = require_book_capability(&state, &auth, book_id, Capability::ReadTaxes).await
    {
        return resp;
    }

    let repo = TaxRepository::new((*state.db).clone());
    match repo.list_by_book(book_id).await {
        Ok(tables) => {
            let body: Vec<_> = tables.iter().map(table_json).collect();
            (StatusCode::OK, Json(json!(body))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list tax tables");
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
