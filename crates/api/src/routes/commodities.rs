//! Commodity routes: standard catalog and book-scoped records.

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
use folio_core::currency::standard_currencies;
use folio_core::rbac::Capability;
use folio_db::repositories::{CommodityError, CommodityRepository, CreateCommodityInput};

/// Creates the commodities router (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/commodities/standard", get(list_standard))
        .route("/commodities", post(create_commodity))
        .route("/commodities/book/{book_id}", get(list_book_commodities))
}

/// GET /commodities/standard - The static currency catalog.
async fn list_standard(_auth: AuthUser) -> impl IntoResponse {
    (StatusCode::OK, Json(json!(standard_currencies())))
}

/// Request body for POST /commodities.
#[derive(Debug, Deserialize)]
pub struct CreateCommodityRequest {
    /// Book the commodity belongs to.
    pub book_id: uuid::Uuid,
    /// Commodity namespace.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Short code, e.g. "EUR".
    pub mnemonic: String,
    /// Full name.
    pub fullname: String,
    /// Minor units per major unit.
    #[serde(default = "default_fraction")]
    pub fraction: i32,
    /// Quote source tag.
    pub quote_source: Option<String>,
    /// Whether online quotes are fetched.
    #[serde(default)]
    pub get_quotes: bool,
}

fn default_namespace() -> String {
    "CURRENCY".to_string()
}

const fn default_fraction() -> i32 {
    100
}

/// POST /commodities - Create a commodity in a book.
async fn create_commodity(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateCommodityRequest>,
) -> impl IntoResponse {
    if let Err(resp) =
        require_book_capability(&state, &auth, payload.book_id, Capability::WriteBooks).await
    {
        return resp;
    }

    let repo = CommodityRepository::new((*state.db).clone());
    let result = repo
        .create_commodity(CreateCommodityInput {
            book_id: payload.book_id,
            namespace: payload.namespace,
            mnemonic: payload.mnemonic,
            fullname: payload.fullname,
            fraction: payload.fraction,
            quote_source: payload.quote_source,
            get_quotes: payload.get_quotes,
        })
        .await;

    match result {
        Ok(commodity) => {
            info!(
                commodity_id = %commodity.id,
                book_id = %commodity.book_id,
                mnemonic = %commodity.mnemonic,
                "Commodity created"
            );
            (StatusCode::CREATED, Json(json!(commodity))).into_response()
        }
        Err(e @ (CommodityError::InvalidFraction(_) | CommodityError::InvalidMnemonic)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": e.to_string()
            })),
        )
            .into_response(),
        Err(CommodityError::BookNotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Book not found"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to create commodity");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred creating the commodity"
                })),
            )
                .into_response()
        }
    }
}

/// GET `/commodities/book/{book_id}` - List a book's commodities.
async fn list_book_commodities(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(book_id): Path<uuid::Uuid>,
) -> impl IntoResponse {
    if let Err(resp) = require_book_capability(&state, &auth, book_id, Capability::ReadBooks).await
    {
        return resp;
    }

    let repo = CommodityRepository::new((*state.db).clone());
    match repo.find_by_book(book_id).await {
        Ok(commodities) => (StatusCode::OK, Json(json!(commodities))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list commodities");
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
