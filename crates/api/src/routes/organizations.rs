//! Organization management routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::{AppState, authz::require_capability, middleware::AuthUser};
use folio_core::rbac::Capability;
use folio_db::repositories::{
    CreateOrganizationInput, OrganizationError, OrganizationRepository, UpdateOrganizationInput,
};

/// Creates the organizations router (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/organizations", post(create_organization))
        .route("/organizations/{org_id}", get(get_organization))
        .route("/organizations/{org_id}", put(update_organization))
        .route("/organizations/{org_id}", delete(delete_organization))
}

/// Request body for organization create/update.
#[derive(Debug, Deserialize, Default)]
pub struct OrganizationPayload {
    /// Organization name.
    pub name: Option<String>,
    /// Tax identifier.
    pub tax_id: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// City.
    pub city: Option<String>,
    /// State or province.
    pub state: Option<String>,
    /// Country.
    pub country: Option<String>,
    /// Postal code.
    pub postal_code: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Contact email.
    pub email: Option<String>,
}

/// POST /organizations - Create an organization.
async fn create_organization(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<OrganizationPayload>,
) -> impl IntoResponse {
    let Some(name) = payload.name else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": "Organization name is required"
            })),
        )
            .into_response();
    };

    let repo = OrganizationRepository::new((*state.db).clone());
    let result = repo
        .create(CreateOrganizationInput {
            name,
            tax_id: payload.tax_id,
            address: payload.address,
            city: payload.city,
            state: payload.state,
            country: payload.country,
            postal_code: payload.postal_code,
            phone: payload.phone,
            email: payload.email,
        })
        .await;

    match result {
        Ok(org) => {
            info!(org_id = %org.id, created_by = %auth.user_id(), "Organization created");
            (StatusCode::CREATED, Json(json!(org))).into_response()
        }
        Err(OrganizationError::InvalidName) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": "Organization name must not be empty"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to create organization");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred creating the organization"
                })),
            )
                .into_response()
        }
    }
}

/// GET `/organizations/{org_id}` - Get organization details.
async fn get_organization(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<uuid::Uuid>,
) -> impl IntoResponse {
    if let Err(resp) =
        require_capability(&state, &auth, org_id, Capability::ReadOrganization).await
    {
        return resp;
    }

    let repo = OrganizationRepository::new((*state.db).clone());
    match repo.find_by_id(org_id).await {
        Ok(Some(org)) => (StatusCode::OK, Json(json!(org))).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Organization not found"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Database error fetching organization");
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

/// PUT `/organizations/{org_id}` - Update organization details.
async fn update_organization(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<uuid::Uuid>,
    Json(payload): Json<OrganizationPayload>,
) -> impl IntoResponse {
    if let Err(resp) =
        require_capability(&state, &auth, org_id, Capability::UpdateOrganization).await
    {
        return resp;
    }

    let repo = OrganizationRepository::new((*state.db).clone());
    let result = repo
        .update(
            org_id,
            UpdateOrganizationInput {
                name: payload.name,
                tax_id: payload.tax_id,
                address: payload.address,
                city: payload.city,
                state: payload.state,
                country: payload.country,
                postal_code: payload.postal_code,
                phone: payload.phone,
                email: payload.email,
            },
        )
        .await;

    match result {
        Ok(org) => {
            info!(org_id = %org_id, updated_by = %auth.user_id(), "Organization updated");
            (StatusCode::OK, Json(json!(org))).into_response()
        }
        Err(OrganizationError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Organization not found"
            })),
        )
            .into_response(),
        Err(OrganizationError::InvalidName) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": "Organization name must not be empty"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to update organization");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred updating the organization"
                })),
            )
                .into_response()
        }
    }
}

/// DELETE `/organizations/{org_id}` - Soft-delete an organization.
async fn delete_organization(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<uuid::Uuid>,
) -> impl IntoResponse {
    if let Err(resp) =
        require_capability(&state, &auth, org_id, Capability::DeleteOrganization).await
    {
        return resp;
    }

    let repo = OrganizationRepository::new((*state.db).clone());
    match repo.deactivate(org_id).await {
        Ok(_) => {
            info!(org_id = %org_id, deleted_by = %auth.user_id(), "Organization deactivated");
            (
                StatusCode::OK,
                Json(json!({ "message": "Organization deactivated successfully" })),
            )
                .into_response()
        }
        Err(OrganizationError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Organization not found"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to deactivate organization");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred deleting the organization"
                })),
            )
                .into_response()
        }
    }
}
