//! Role and capability definitions.

use serde::{Deserialize, Serialize};

/// A user's role within one organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full control over the organization and everything it owns.
    Admin,
    /// Runs the books day to day; cannot delete the organization or
    /// hand out admin roles.
    Manager,
    /// Works on ledger-adjacent data only.
    Accountant,
    /// Read-only access.
    Viewer,
}

impl Role {
    /// All roles, in descending privilege order.
    pub const ALL: [Self; 4] = [Self::Admin, Self::Manager, Self::Accountant, Self::Viewer];
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Manager => write!(f, "manager"),
            Self::Accountant => write!(f, "accountant"),
            Self::Viewer => write!(f, "viewer"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "accountant" => Ok(Self::Accountant),
            "viewer" => Ok(Self::Viewer),
            _ => Err(format!("unknown role: {s}")),
        }
    }
}

/// A named permission required by a protected operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Read organization details.
    ReadOrganization,
    /// Update organization details.
    UpdateOrganization,
    /// Soft-delete the organization.
    DeleteOrganization,
    /// Read books.
    ReadBooks,
    /// Create books (provisioning) and update book fields.
    WriteBooks,
    /// Read the chart of accounts.
    ReadAccounts,
    /// Create or update accounts.
    WriteAccounts,
    /// Read tax tables.
    ReadTaxes,
    /// Create or update tax tables.
    WriteTaxes,
    /// Read book settings.
    ReadSettings,
    /// Update book settings.
    WriteSettings,
    /// Read the organization's user list.
    ReadUsers,
    /// Read role assignments.
    ReadRoles,
    /// Assign, update, or remove non-admin roles.
    AssignRoles,
    /// Grant or reassign the admin role.
    AssignAdminRole,
}

impl Capability {
    /// Returns true for read-only capabilities.
    #[must_use]
    pub const fn is_read(self) -> bool {
        matches!(
            self,
            Self::ReadOrganization
                | Self::ReadBooks
                | Self::ReadAccounts
                | Self::ReadTaxes
                | Self::ReadSettings
                | Self::ReadUsers
                | Self::ReadRoles
        )
    }
}

/// Returns whether a role grants a capability.
#[must_use]
pub const fn allows(role: Role, capability: Capability) -> bool {
    match role {
        Role::Admin => true,
        Role::Manager => {
            capability.is_read()
                || matches!(
                    capability,
                    Capability::WriteBooks
                        | Capability::WriteAccounts
                        | Capability::WriteTaxes
                        | Capability::WriteSettings
                        | Capability::AssignRoles
                )
        }
        Role::Accountant => {
            capability.is_read()
                || matches!(
                    capability,
                    Capability::WriteBooks | Capability::WriteAccounts | Capability::WriteTaxes
                )
        }
        Role::Viewer => capability.is_read(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[test]
    fn test_role_roundtrip() {
        for role in Role::ALL {
            assert_eq!(Role::from_str(&role.to_string()).unwrap(), role);
        }
    }

    #[test]
    fn test_role_parse_case_insensitive() {
        assert_eq!(Role::from_str("Admin").unwrap(), Role::Admin);
        assert_eq!(Role::from_str("VIEWER").unwrap(), Role::Viewer);
    }

    #[test]
    fn test_role_parse_rejects_unknown() {
        assert!(Role::from_str("owner").is_err());
        assert!(Role::from_str("").is_err());
    }

    #[test]
    fn test_admin_allows_everything() {
        assert!(allows(Role::Admin, Capability::DeleteOrganization));
        assert!(allows(Role::Admin, Capability::AssignAdminRole));
        assert!(allows(Role::Admin, Capability::WriteSettings));
    }

    #[test]
    fn test_manager_limits() {
        assert!(allows(Role::Manager, Capability::WriteBooks));
        assert!(allows(Role::Manager, Capability::WriteSettings));
        assert!(allows(Role::Manager, Capability::AssignRoles));
        assert!(!allows(Role::Manager, Capability::DeleteOrganization));
        assert!(!allows(Role::Manager, Capability::AssignAdminRole));
        assert!(!allows(Role::Manager, Capability::UpdateOrganization));
    }

    #[test]
    fn test_accountant_ledger_only() {
        assert!(allows(Role::Accountant, Capability::WriteAccounts));
        assert!(allows(Role::Accountant, Capability::WriteTaxes));
        assert!(allows(Role::Accountant, Capability::WriteBooks));
        assert!(!allows(Role::Accountant, Capability::WriteSettings));
        assert!(!allows(Role::Accountant, Capability::AssignRoles));
        assert!(!allows(Role::Accountant, Capability::UpdateOrganization));
    }

    #[test]
    fn test_viewer_read_only() {
        assert!(allows(Role::Viewer, Capability::ReadBooks));
        assert!(allows(Role::Viewer, Capability::ReadTaxes));
    }

    #[rstest]
    #[case(Role::Manager, Capability::DeleteOrganization)]
    #[case(Role::Manager, Capability::AssignAdminRole)]
    #[case(Role::Accountant, Capability::WriteSettings)]
    #[case(Role::Accountant, Capability::AssignRoles)]
    #[case(Role::Viewer, Capability::WriteBooks)]
    #[case(Role::Viewer, Capability::WriteAccounts)]
    #[case(Role::Viewer, Capability::WriteTaxes)]
    #[case(Role::Viewer, Capability::AssignRoles)]
    fn test_denied_capabilities(#[case] role: Role, #[case] capability: Capability) {
        assert!(!allows(role, capability));
    }

    /// Every role can read everything its organization owns.
    #[rstest]
    #[case(Role::Admin)]
    #[case(Role::Manager)]
    #[case(Role::Accountant)]
    #[case(Role::Viewer)]
    fn test_all_roles_can_read(#[case] role: Role) {
        for capability in [
            Capability::ReadOrganization,
            Capability::ReadBooks,
            Capability::ReadAccounts,
            Capability::ReadTaxes,
            Capability::ReadSettings,
            Capability::ReadUsers,
            Capability::ReadRoles,
        ] {
            assert!(allows(role, capability));
        }
    }
}
