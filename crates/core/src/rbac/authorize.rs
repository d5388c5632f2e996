//! Capability resolution for a (user, organization) pair.

use super::types::{Capability, Role, allows};

/// Reason an operation was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deny {
    /// The user has no role in this organization.
    ///
    /// Reads still resolve as viewer for display compatibility, but no
    /// write capability is ever granted through this fallback.
    NoRoleAssigned {
        /// The capability that was requested.
        capability: Capability,
    },
    /// The user's role does not grant the capability.
    CapabilityDenied {
        /// The role the user holds.
        role: Role,
        /// The capability that was requested.
        capability: Capability,
    },
}

impl std::fmt::Display for Deny {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoRoleAssigned { .. } => {
                write!(f, "no role assigned in this organization")
            }
            Self::CapabilityDenied { role, .. } => {
                write!(f, "role '{role}' does not grant this capability")
            }
        }
    }
}

/// Resolves whether the holder of `role` (or of no role at all) may
/// exercise `capability`.
///
/// The no-role case is deliberately split from the viewer role: reads
/// fall back to viewer semantics, writes are denied with their own
/// reason so callers cannot mistake the fallback for a grant.
pub const fn authorize(role: Option<Role>, capability: Capability) -> Result<(), Deny> {
    match role {
        Some(role) => {
            if allows(role, capability) {
                Ok(())
            } else {
                Err(Deny::CapabilityDenied { role, capability })
            }
        }
        None => {
            if capability.is_read() {
                Ok(())
            } else {
                Err(Deny::NoRoleAssigned { capability })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_role_reads_fall_back_to_viewer() {
        assert!(authorize(None, Capability::ReadBooks).is_ok());
        assert!(authorize(None, Capability::ReadTaxes).is_ok());
        assert!(authorize(None, Capability::ReadOrganization).is_ok());
    }

    #[test]
    fn test_no_role_writes_denied_with_distinct_reason() {
        for capability in [
            Capability::WriteBooks,
            Capability::WriteAccounts,
            Capability::WriteTaxes,
            Capability::WriteSettings,
            Capability::AssignRoles,
            Capability::AssignAdminRole,
            Capability::UpdateOrganization,
            Capability::DeleteOrganization,
        ] {
            assert_eq!(
                authorize(None, capability),
                Err(Deny::NoRoleAssigned { capability })
            );
        }
    }

    #[test]
    fn test_viewer_denied_writes_with_role_reason() {
        assert_eq!(
            authorize(Some(Role::Viewer), Capability::WriteBooks),
            Err(Deny::CapabilityDenied {
                role: Role::Viewer,
                capability: Capability::WriteBooks,
            })
        );
    }

    #[test]
    fn test_admin_allowed_everything() {
        assert!(authorize(Some(Role::Admin), Capability::DeleteOrganization).is_ok());
        assert!(authorize(Some(Role::Admin), Capability::AssignAdminRole).is_ok());
    }

    #[test]
    fn test_deny_messages_do_not_leak_capability_internals() {
        let deny = Deny::NoRoleAssigned {
            capability: Capability::WriteBooks,
        };
        assert_eq!(deny.to_string(), "no role assigned in this organization");

        let deny = Deny::CapabilityDenied {
            role: Role::Viewer,
            capability: Capability::WriteBooks,
        };
        assert_eq!(
            deny.to_string(),
            "role 'viewer' does not grant this capability"
        );
    }
}
