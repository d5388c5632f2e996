//! Account repository for chart of accounts database operations.

use std::cmp::Ordering;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::entities::{accounts, books, commodities, sea_orm_active_enums::AccountType};

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// ROOT accounts are created only by book provisioning.
    #[error("Root accounts cannot be created directly")]
    RootNotAllowed,

    /// Book not found.
    #[error("Book not found: {0}")]
    BookNotFound(Uuid),

    /// Commodity not found.
    #[error("Commodity not found: {0}")]
    CommodityNotFound(Uuid),

    /// Commodity belongs to a different book.
    #[error("Commodity belongs to a different book")]
    CommodityWrongBook,

    /// Ordinary accounts must sit under a parent.
    #[error("Non-root accounts require a parent account")]
    ParentRequired,

    /// Parent account not found.
    #[error("Parent account not found: {0}")]
    ParentNotFound(Uuid),

    /// Parent account belongs to a different book.
    #[error("Parent account belongs to a different book")]
    ParentWrongBook,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an ordinary account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Book the account belongs to.
    pub book_id: Uuid,
    /// Parent account within the same book.
    pub parent_id: Option<Uuid>,
    /// Account name.
    pub name: String,
    /// Account type; ROOT is refused here.
    pub account_type: AccountType,
    /// Commodity the account is denominated in.
    pub commodity_id: Uuid,
    /// Account code used for ordering.
    pub code: Option<String>,
    /// Account description.
    pub description: Option<String>,
    /// Placeholder accounts cannot take postings.
    pub placeholder: bool,
}

/// Account repository for chart of accounts operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an ordinary account with referential validation.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the type is ROOT (reserved for provisioning)
    /// - no parent is given (every ordinary account hangs off one)
    /// - the book does not exist
    /// - the commodity does not exist or belongs to a different book
    /// - the parent does not exist or belongs to a different book
    pub async fn create_account(
        &self,
        input: CreateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        if input.account_type == AccountType::Root {
            return Err(AccountError::RootNotAllowed);
        }
        let Some(parent_id) = input.parent_id else {
            return Err(AccountError::ParentRequired);
        };

        let book = books::Entity::find_by_id(input.book_id).one(&self.db).await?;
        if book.is_none() {
            return Err(AccountError::BookNotFound(input.book_id));
        }

        let commodity = commodities::Entity::find_by_id(input.commodity_id)
            .one(&self.db)
            .await?;
        match commodity {
            None => return Err(AccountError::CommodityNotFound(input.commodity_id)),
            Some(c) if c.book_id != input.book_id => {
                return Err(AccountError::CommodityWrongBook);
            }
            _ => {}
        }

        let parent = accounts::Entity::find_by_id(parent_id).one(&self.db).await?;
        match parent {
            None => return Err(AccountError::ParentNotFound(parent_id)),
            Some(p) if p.book_id != input.book_id => {
                return Err(AccountError::ParentWrongBook);
            }
            _ => {}
        }

        let now = chrono::Utc::now().into();
        let account = accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            book_id: Set(input.book_id),
            parent_id: Set(Some(parent_id)),
            name: Set(input.name),
            account_type: Set(input.account_type),
            commodity_id: Set(input.commodity_id),
            code: Set(input.code),
            description: Set(input.description),
            placeholder: Set(input.placeholder),
            hidden: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(account.insert(&self.db).await?)
    }

    /// Lists a book's accounts in chart order.
    ///
    /// Ordering is byte-wise (stable and locale independent): ascending
    /// by code with missing codes after populated ones, ties broken by
    /// name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_accounts(&self, book_id: Uuid) -> Result<Vec<accounts::Model>, AccountError> {
        let mut rows = accounts::Entity::find()
            .filter(accounts::Column::BookId.eq(book_id))
            .all(&self.db)
            .await?;

        rows.sort_by(|a, b| chart_order(a.code.as_deref(), &a.name, b.code.as_deref(), &b.name));

        Ok(rows)
    }

    /// Finds an account by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<accounts::Model>, DbErr> {
        accounts::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds a book's root account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_root(&self, book_id: Uuid) -> Result<Option<accounts::Model>, DbErr> {
        accounts::Entity::find()
            .filter(accounts::Column::BookId.eq(book_id))
            .filter(accounts::Column::AccountType.eq(AccountType::Root))
            .one(&self.db)
            .await
    }
}

// ============================================================================
// Pure ordering function, testable without database access
// ============================================================================

/// Chart-of-accounts ordering: code ascending with absent (null or
/// empty) codes last, then name ascending. Byte-wise comparison keeps
/// the order stable across locales.
#[must_use]
pub fn chart_order(
    a_code: Option<&str>,
    a_name: &str,
    b_code: Option<&str>,
    b_name: &str,
) -> Ordering {
    let a_code = a_code.filter(|c| !c.is_empty());
    let b_code = b_code.filter(|c| !c.is_empty());

    let by_code = match (a_code, b_code) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };

    by_code.then_with(|| a_name.cmp(b_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_sort_ascending() {
        assert_eq!(
            chart_order(Some("1000"), "Cash", Some("2000"), "Payables"),
            Ordering::Less
        );
    }

    #[test]
    fn test_missing_codes_sort_last() {
        assert_eq!(
            chart_order(Some("9999"), "Other", None, "Anything"),
            Ordering::Less
        );
        assert_eq!(
            chart_order(None, "Anything", Some("0001"), "First"),
            Ordering::Greater
        );
    }

    #[test]
    fn test_empty_code_treated_as_missing() {
        assert_eq!(
            chart_order(Some(""), "Zed", Some("1000"), "Cash"),
            Ordering::Greater
        );
    }

    #[test]
    fn test_ties_break_by_name() {
        assert_eq!(
            chart_order(Some("1000"), "Alpha", Some("1000"), "Beta"),
            Ordering::Less
        );
        assert_eq!(chart_order(None, "Alpha", None, "Beta"), Ordering::Less);
    }

    #[test]
    fn test_comparison_is_byte_wise() {
        // Uppercase sorts before lowercase; no locale folding.
        assert_eq!(
            chart_order(Some("A"), "x", Some("a"), "x"),
            Ordering::Less
        );
    }
}

/// Ordering properties.
#[cfg(test)]
mod props {
    use super::*;
    use proptest::prelude::*;

    fn code_strategy() -> impl Strategy<Value = Option<String>> {
        prop::option::of("[A-Za-z0-9]{0,6}")
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// The comparator is antisymmetric.
        #[test]
        fn prop_antisymmetric(
            a_code in code_strategy(), a_name in "[a-z]{1,8}",
            b_code in code_strategy(), b_name in "[a-z]{1,8}",
        ) {
            let ab = chart_order(a_code.as_deref(), &a_name, b_code.as_deref(), &b_name);
            let ba = chart_order(b_code.as_deref(), &b_name, a_code.as_deref(), &a_name);
            prop_assert_eq!(ab, ba.reverse());
        }

        /// The comparator is reflexive-equal.
        #[test]
        fn prop_equal_to_self(code in code_strategy(), name in "[a-z]{1,8}") {
            prop_assert_eq!(
                chart_order(code.as_deref(), &name, code.as_deref(), &name),
                Ordering::Equal
            );
        }

        /// Populated codes always precede missing ones.
        #[test]
        fn prop_coded_before_uncoded(
            code in "[A-Za-z0-9]{1,6}",
            a_name in "[a-z]{1,8}",
            b_name in "[a-z]{1,8}",
        ) {
            prop_assert_eq!(
                chart_order(Some(code.as_str()), &a_name, None, &b_name),
                Ordering::Less
            );
        }
    }
}
