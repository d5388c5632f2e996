//! Role-based access control.
//!
//! Roles are scoped to an organization: a user holds at most one role per
//! organization, and every protected operation names the capability it
//! needs. Resolution is pure - the caller looks up the stored role (if
//! any) and asks [`authorize`] whether the capability is granted.

mod authorize;
mod types;

pub use authorize::{Deny, authorize};
pub use types::{Capability, Role};
