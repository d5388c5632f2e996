//! Authentication types shared between the API layer and the JWT service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// JWT claims for issued tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Organization ID (current tenant context).
    pub org: Uuid,
    /// User's role in the organization.
    pub role: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(user_id: Uuid, org_id: Uuid, role: &str, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            org: org_id,
            role: role.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the organization ID from claims.
    #[must_use]
    pub const fn organization_id(&self) -> Uuid {
        self.org
    }
}

/// Registration request payload.
///
/// Registration creates the user, their organization, and the initial
/// admin role assignment in one unit.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// User email.
    #[validate(email)]
    pub email: String,
    /// User password.
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    /// User first name.
    #[validate(length(min = 1, max = 255))]
    pub first_name: String,
    /// User last name.
    #[validate(length(min = 1, max = 255))]
    pub last_name: String,
    /// User phone number.
    pub phone: Option<String>,
    /// Organization name.
    #[validate(length(min = 1, max = 255))]
    pub org_name: String,
    /// Organization tax identifier.
    pub org_tax_id: Option<String>,
    /// Organization address.
    pub org_address: Option<String>,
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// User email.
    pub email: String,
    /// User password.
    pub password: String,
}

/// User info returned by auth endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub id: Uuid,
    /// User email.
    pub email: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Role in the current organization.
    pub role: String,
}

/// Organization summary returned by auth endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct OrganizationInfo {
    /// Organization ID.
    pub id: Uuid,
    /// Organization name.
    pub name: String,
}

/// Response for register/login.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    /// The authenticated user.
    pub user: UserInfo,
    /// The user's organization.
    pub organization: OrganizationInfo,
    /// Bearer token.
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_accessors() {
        let user_id = Uuid::new_v4();
        let org_id = Uuid::new_v4();
        let expires = Utc::now() + chrono::Duration::hours(1);

        let claims = Claims::new(user_id, org_id, "admin", expires);

        assert_eq!(claims.user_id(), user_id);
        assert_eq!(claims.organization_id(), org_id);
        assert_eq!(claims.role, "admin");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_register_request_rejects_bad_email() {
        let req = RegisterRequest {
            email: "not-an-email".to_string(),
            password: "password123".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            phone: None,
            org_name: "Acme Org".to_string(),
            org_tax_id: None,
            org_address: None,
        };

        assert!(req.validate().is_err());
    }

    #[test]
    fn test_register_request_rejects_short_password() {
        let req = RegisterRequest {
            email: "a@x.com".to_string(),
            password: "short".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            phone: None,
            org_name: "Acme Org".to_string(),
            org_tax_id: None,
            org_address: None,
        };

        assert!(req.validate().is_err());
    }

    #[test]
    fn test_register_request_accepts_valid() {
        let req = RegisterRequest {
            email: "a@x.com".to_string(),
            password: "Password123!".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            phone: Some("1234567890".to_string()),
            org_name: "Acme Org".to_string(),
            org_tax_id: Some("TAX-123".to_string()),
            org_address: Some("123 Street".to_string()),
        };

        assert!(req.validate().is_ok());
    }
}
