//! Database enum types mapped to Postgres enums.

use folio_core::rbac::Role;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A user's role within an organization.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full control over the organization.
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Day-to-day management without org deletion or admin grants.
    #[sea_orm(string_value = "manager")]
    Manager,
    /// Ledger-adjacent read/write only.
    #[sea_orm(string_value = "accountant")]
    Accountant,
    /// Read-only.
    #[sea_orm(string_value = "viewer")]
    Viewer,
}

impl From<UserRole> for Role {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Admin => Self::Admin,
            UserRole::Manager => Self::Manager,
            UserRole::Accountant => Self::Accountant,
            UserRole::Viewer => Self::Viewer,
        }
    }
}

impl From<Role> for UserRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Admin => Self::Admin,
            Role::Manager => Self::Manager,
            Role::Accountant => Self::Accountant,
            Role::Viewer => Self::Viewer,
        }
    }
}

/// Account type within a book's chart of accounts.
///
/// ROOT exists exactly once per book and is created only by book
/// provisioning; all other types are ordinary, user-creatable accounts.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountType {
    /// The single hidden root of a book's hierarchy.
    #[sea_orm(string_value = "ROOT")]
    Root,
    /// Generic asset.
    #[sea_orm(string_value = "ASSET")]
    Asset,
    /// Bank account.
    #[sea_orm(string_value = "BANK")]
    Bank,
    /// Cash on hand.
    #[sea_orm(string_value = "CASH")]
    Cash,
    /// Credit card.
    #[sea_orm(string_value = "CREDIT")]
    Credit,
    /// Generic liability.
    #[sea_orm(string_value = "LIABILITY")]
    Liability,
    /// Equity.
    #[sea_orm(string_value = "EQUITY")]
    Equity,
    /// Income.
    #[sea_orm(string_value = "INCOME")]
    Income,
    /// Expense.
    #[sea_orm(string_value = "EXPENSE")]
    Expense,
    /// Accounts receivable.
    #[sea_orm(string_value = "RECEIVABLE")]
    Receivable,
    /// Accounts payable.
    #[sea_orm(string_value = "PAYABLE")]
    Payable,
    /// Trading account for commodity movements.
    #[sea_orm(string_value = "TRADING")]
    Trading,
}

/// Tax table entry type.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "tax_entry_type")]
#[serde(rename_all = "UPPERCASE")]
pub enum TaxEntryType {
    /// Rate expressed as an exact percentage fraction.
    #[sea_orm(string_value = "PERCENT")]
    Percent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_core_roundtrip() {
        for db_role in [
            UserRole::Admin,
            UserRole::Manager,
            UserRole::Accountant,
            UserRole::Viewer,
        ] {
            let core: Role = db_role.clone().into();
            assert_eq!(UserRole::from(core), db_role);
        }
    }
}
