//! Role assignment routes.

use std::str::FromStr;

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
use folio_core::rbac::{Capability, Role};
use folio_db::entities::user_roles;
use folio_db::repositories::{AssignRoleInput, UserRoleError, UserRoleRepository};

/// Creates the user-roles router (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/user-roles", post(assign_role))
        .route("/user-roles/user/{user_id}", get(list_user_roles))
        .route("/user-roles/{id}", put(update_role))
        .route("/user-roles/{id}", delete(remove_role))
}

/// The capability needed to manage an assignment with the given role.
/// Touching admin assignments takes the stronger capability.
const fn manage_capability(role: Role) -> Capability {
    match role {
        Role::Admin => Capability::AssignAdminRole,
        _ => Capability::AssignRoles,
    }
}

/// Request body for POST /user-roles.
#[derive(Debug, Deserialize)]
pub struct AssignRoleRequest {
    /// The user receiving the role.
    pub user_id: uuid::Uuid,
    /// The organization the role is scoped to.
    pub organization_id: uuid::Uuid,
    /// Role name: admin, manager, accountant, or viewer.
    pub role: String,
    /// Free-form permissions map.
    pub permissions: Option<serde_json::Value>,
}

/// POST /user-roles - Assign a role to a user within an organization.
async fn assign_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<AssignRoleRequest>,
) -> impl IntoResponse {
    let Ok(role) = Role::from_str(&payload.role) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_role",
                "message": "Invalid role. Must be one of: admin, manager, accountant, viewer"
            })),
        )
            .into_response();
    };

    if let Err(resp) = require_capability(
        &state,
        &auth,
        payload.organization_id,
        manage_capability(role),
    )
    .await
    {
        return resp;
    }

    let repo = UserRoleRepository::new((*state.db).clone());
    let result = repo
        .assign(AssignRoleInput {
            user_id: payload.user_id,
            organization_id: payload.organization_id,
            role: role.into(),
            permissions: payload.permissions.unwrap_or_else(|| json!({})),
        })
        .await;

    match result {
        Ok(assignment) => {
            info!(
                user_id = %assignment.user_id,
                org_id = %assignment.organization_id,
                role = %payload.role,
                assigned_by = %auth.user_id(),
                "Role assigned"
            );
            (StatusCode::CREATED, Json(json!(assignment))).into_response()
        }
        Err(UserRoleError::AlreadyAssigned) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "already_assigned",
                "message": "User already has a role in this organization"
            })),
        )
            .into_response(),
        Err(
            e @ (UserRoleError::UserNotFound(_) | UserRoleError::OrganizationNotFound(_)),
        ) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": e.to_string()
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to assign role");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred assigning the role"
                })),
            )
                .into_response()
        }
    }
}

/// GET `/user-roles/user/{user_id}` - List a user's role assignments.
///
/// Callers see their own assignments in full; anyone else needs the
/// read-roles capability and only sees assignments in the shared
/// organization.
async fn list_user_roles(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<uuid::Uuid>,
) -> impl IntoResponse {
    let own_request = auth.user_id() == user_id;

    if !own_request
        && let Err(resp) =
            require_capability(&state, &auth, auth.organization_id(), Capability::ReadRoles).await
    {
        return resp;
    }

    let repo = UserRoleRepository::new((*state.db).clone());
    match repo.find_by_user(user_id).await {
        Ok(roles) => {
            let body: Vec<_> = roles
                .into_iter()
                .filter(|r| own_request || r.role.organization_id == auth.organization_id())
                .map(|r| {
                    json!({
                        "id": r.role.id,
                        "user_id": r.role.user_id,
                        "organization_id": r.role.organization_id,
                        "organization_name": r.organization_name,
                        "role": r.role.role,
                        "permissions": r.role.permissions,
                        "created_at": r.role.created_at
                    })
                })
                .collect();

            (StatusCode::OK, Json(json!(body))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list roles");
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

/// Request body for PUT `/user-roles/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    /// New role name, if changing.
    pub role: Option<String>,
    /// New permissions map, if changing.
    pub permissions: Option<serde_json::Value>,
}

/// PUT `/user-roles/{id}` - Update a role assignment.
async fn update_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<uuid::Uuid>,
    Json(payload): Json<UpdateRoleRequest>,
) -> impl IntoResponse {
    let new_role = match payload.role.as_deref().map(Role::from_str) {
        Some(Ok(r)) => Some(r),
        Some(Err(_)) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "invalid_role",
                    "message": "Invalid role. Must be one of: admin, manager, accountant, viewer"
                })),
            )
                .into_response();
        }
        None => None,
    };

    let repo = UserRoleRepository::new((*state.db).clone());

    let Some(existing) = (match repo.find_by_id(id).await {
        Ok(r) => r,
        Err(e) => {
            error!(error = %e, "Database error fetching role assignment");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response();
        }
    }) else {
        return role_not_found();
    };

    // Raising to or demoting from admin both need the admin-grant
    // capability; everything else is ordinary role management.
    let needed = manage_capability(
        new_role.map_or_else(|| existing.role.clone().into(), |r| strongest(r, &existing)),
    );
    if let Err(resp) = require_capability(&state, &auth, existing.organization_id, needed).await {
        return resp;
    }

    let result = repo
        .update(
            id,
            new_role.map(Into::into),
            payload.permissions,
        )
        .await;

    match result {
        Ok(updated) => {
            info!(assignment_id = %id, updated_by = %auth.user_id(), "Role assignment updated");
            (StatusCode::OK, Json(json!(updated))).into_response()
        }
        Err(UserRoleError::NotFound(_)) => role_not_found(),
        Err(e) => {
            error!(error = %e, "Failed to update role assignment");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred updating the role"
                })),
            )
                .into_response()
        }
    }
}

/// DELETE `/user-roles/{id}` - Remove a role assignment.
async fn remove_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<uuid::Uuid>,
) -> impl IntoResponse {
    let repo = UserRoleRepository::new((*state.db).clone());

    let Some(existing) = (match repo.find_by_id(id).await {
        Ok(r) => r,
        Err(e) => {
            error!(error = %e, "Database error fetching role assignment");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response();
        }
    }) else {
        return role_not_found();
    };

    let needed = manage_capability(existing.role.clone().into());
    if let Err(resp) = require_capability(&state, &auth, existing.organization_id, needed).await {
        return resp;
    }

    match repo.remove(id).await {
        Ok(()) => {
            info!(assignment_id = %id, removed_by = %auth.user_id(), "Role assignment removed");
            (
                StatusCode::OK,
                Json(json!({ "message": "Role removed successfully" })),
            )
                .into_response()
        }
        Err(UserRoleError::NotFound(_)) => role_not_found(),
        Err(e) => {
            error!(error = %e, "Failed to remove role assignment");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred removing the role"
                })),
            )
                .into_response()
        }
    }
}

/// Picks the stronger of the requested and currently stored role for
/// the capability check.
fn strongest(requested: Role, existing: &user_roles::Model) -> Role {
    let current: Role = existing.role.clone().into();
    if current == Role::Admin || requested == Role::Admin {
        Role::Admin
    } else {
        requested
    }
}

fn role_not_found() -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "not_found",
            "message": "Role assignment not found"
        })),
    )
        .into_response()
}
