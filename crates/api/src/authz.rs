//! Request-level role/capability enforcement.
//!
//! Every protected operation runs the same sequence: tenant check
//! (the token's organization must be the target organization), then
//! capability resolution against the caller's stored role. Cross-tenant
//! requests are rejected before any role lookup, so the no-role read
//! fallback never applies outside the caller's own organization.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use folio_core::rbac::{self, Capability};
use folio_db::UserRoleRepository;
use folio_db::entities::books;

/// Checks that the caller may exercise `capability` in the target
/// organization.
///
/// # Errors
///
/// Returns a ready-to-send response: 403 for tenant mismatch or
/// capability denial, 500 for a lookup failure.
pub async fn require_capability(
    state: &AppState,
    auth: &AuthUser,
    organization_id: Uuid,
    capability: Capability,
) -> Result<(), Response> {
    if auth.organization_id() != organization_id {
        return Err((
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": "forbidden",
                "message": "You are not a member of this organization"
            })),
        )
            .into_response());
    }

    let role_repo = UserRoleRepository::new((*state.db).clone());
    let role = match role_repo
        .find_by_user_and_org(auth.user_id(), organization_id)
        .await
    {
        Ok(row) => row.map(|r| r.role.into()),
        Err(e) => {
            error!(error = %e, "Database error resolving role");
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response());
        }
    };

    if let Err(deny) = rbac::authorize(role, capability) {
        return Err((
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": "forbidden",
                "message": deny.to_string()
            })),
        )
            .into_response());
    }

    Ok(())
}

/// Resolves a book, then checks `capability` against its owning
/// organization.
///
/// # Errors
///
/// Returns a ready-to-send response: 404 for a missing book, plus
/// everything `require_capability` produces.
pub async fn require_book_capability(
    state: &AppState,
    auth: &AuthUser,
    book_id: Uuid,
    capability: Capability,
) -> Result<books::Model, Response> {
    let book_repo = folio_db::BookRepository::new((*state.db).clone());

    let book = match book_repo.find_by_id(book_id).await {
        Ok(Some(b)) => b,
        Ok(None) => {
            return Err((
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": "not_found",
                    "message": "Book not found"
                })),
            )
                .into_response());
        }
        Err(e) => {
            error!(error = %e, "Database error fetching book");
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response());
        }
    };

    require_capability(state, auth, book.organization_id, capability).await?;

    Ok(book)
}
