//! Authentication routes for registration, login, and profile.
//!
//! Registration creates the user, their organization, and the initial
//! admin role in one transactional unit - the only path that grants
//! admin without an explicit assignment.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tracing::{error, info};
use validator::Validate;

use crate::{AppState, middleware::AuthUser};
use folio_core::auth::{hash_password, verify_password};
use folio_db::repositories::{RegisterInput, UserRepository, UserRoleRepository};
use folio_shared::auth::{
    AuthResponse, LoginRequest, OrganizationInfo, RegisterRequest, UserInfo,
};

/// Creates the public auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

/// Creates the auth routes that require an authenticated caller.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(me))
}

/// POST /auth/register - Register a user with a fresh organization.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    if let Err(e) = payload.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": e.to_string()
            })),
        )
            .into_response();
    }

    let user_repo = UserRepository::new((*state.db).clone());

    match user_repo.email_exists(&payload.email).await {
        Ok(true) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "email_exists",
                    "message": "An account with this email already exists"
                })),
            )
                .into_response();
        }
        Ok(false) => {}
        Err(e) => {
            error!(error = %e, "Database error checking email");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred during registration"
                })),
            )
                .into_response();
        }
    }

    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred during registration"
                })),
            )
                .into_response();
        }
    };

    // User + organization + admin role, all or nothing.
    let registered = match user_repo
        .register_with_organization(RegisterInput {
            email: payload.email,
            password_hash,
            first_name: payload.first_name,
            last_name: payload.last_name,
            phone: payload.phone,
            org_name: payload.org_name,
            org_tax_id: payload.org_tax_id,
            org_address: payload.org_address,
        })
        .await
    {
        Ok(r) => r,
        Err(e) => {
            error!(error = %e, "Failed to register user");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred during registration"
                })),
            )
                .into_response();
        }
    };

    let token = match state.jwt_service.generate_token(
        registered.user.id,
        registered.organization.id,
        "admin",
    ) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate token");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred during registration"
                })),
            )
                .into_response();
        }
    };

    info!(
        user_id = %registered.user.id,
        org_id = %registered.organization.id,
        "User registered with new organization"
    );

    let response = AuthResponse {
        user: UserInfo {
            id: registered.user.id,
            email: registered.user.email,
            first_name: registered.user.first_name,
            last_name: registered.user.last_name,
            role: "admin".to_string(),
        },
        organization: OrganizationInfo {
            id: registered.organization.id,
            name: registered.organization.name,
        },
        token,
    };

    (StatusCode::CREATED, Json(response)).into_response()
}

/// POST /auth/login - Authenticate and return a token with the user's
/// organization context.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    let user = match user_repo.find_by_email(&payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            info!(email = %payload.email, "Login attempt for non-existent user");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "invalid_credentials",
                    "message": "Invalid email or password"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred during login"
                })),
            )
                .into_response();
        }
    };

    if !user.is_active {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "account_disabled",
                "message": "This account has been disabled"
            })),
        )
            .into_response();
    }

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %user.id, "Failed login attempt - invalid password");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "invalid_credentials",
                    "message": "Invalid email or password"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred during login"
                })),
            )
                .into_response();
        }
    }

    // Resolve the user's organization context from their role rows.
    let role_repo = UserRoleRepository::new((*state.db).clone());
    let roles = match role_repo.find_by_user(user.id).await {
        Ok(r) => r,
        Err(e) => {
            error!(error = %e, "Failed to resolve user roles");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred during login"
                })),
            )
                .into_response();
        }
    };

    let Some(membership) = roles.first() else {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": "no_organization",
                "message": "User is not a member of any organization"
            })),
        )
            .into_response();
    };

    let role_str = folio_core::rbac::Role::from(membership.role.role.clone()).to_string();
    let token = match state.jwt_service.generate_token(
        user.id,
        membership.role.organization_id,
        &role_str,
    ) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate token");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred during login"
                })),
            )
                .into_response();
        }
    };

    info!(user_id = %user.id, "User logged in successfully");

    let response = AuthResponse {
        user: UserInfo {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: role_str,
        },
        organization: OrganizationInfo {
            id: membership.role.organization_id,
            name: membership.organization_name.clone(),
        },
        token,
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// GET /auth/me - Resolve the caller's profile, organization, and role.
async fn me(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    let user = match user_repo.find_by_id(auth.user_id()).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": "not_found",
                    "message": "User not found"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Database error fetching user");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response();
        }
    };

    (
        StatusCode::OK,
        Json(json!({
            "user": {
                "id": user.id,
                "email": user.email,
                "first_name": user.first_name,
                "last_name": user.last_name,
                "phone": user.phone,
                "role": auth.role()
            },
            "organization_id": auth.organization_id()
        })),
    )
        .into_response()
}
