//! Book repository: atomic provisioning plus settings access.
//!
//! Provisioning creates four rows (book, base commodity, root account,
//! settings) in one serializable transaction. The book and its
//! commodity/root account reference each other, so the book is
//! inserted first with null link columns and updated once the other
//! rows exist - no reader ever observes the half-linked state.

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IsolationLevel,
    QueryFilter, Set, TransactionTrait,
};
use serde_json::json;
use uuid::Uuid;

use crate::entities::{
    accounts, book_settings, books, commodities, organizations, sea_orm_active_enums::AccountType,
};

/// Error types for book operations.
#[derive(Debug, thiserror::Error)]
pub enum BookError {
    /// Organization not found or inactive.
    #[error("Organization not found: {0}")]
    OrganizationNotFound(Uuid),

    /// Book not found.
    #[error("Book not found: {0}")]
    BookNotFound(Uuid),

    /// Settings row not found for the book.
    #[error("Settings not found for book: {0}")]
    SettingsNotFound(Uuid),

    /// Book name must not be empty.
    #[error("Book name must not be empty")]
    InvalidName,

    /// Currency mnemonic must not be empty.
    #[error("Currency mnemonic must not be empty")]
    InvalidMnemonic,

    /// Commodity fraction must be a positive integer.
    #[error("Commodity fraction must be positive, got {0}")]
    InvalidFraction(i32),

    /// A settings update supplied no recognized field.
    #[error("No fields provided for update")]
    EmptyUpdate,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Currency specification for provisioning.
///
/// Defaults apply only to wholly absent fields; a present-but-empty
/// mnemonic or non-positive fraction is rejected.
#[derive(Debug, Clone, Default)]
pub struct CurrencySpec {
    /// ISO-style code, e.g. "USD".
    pub mnemonic: Option<String>,
    /// Full currency name.
    pub fullname: Option<String>,
    /// Minor units per major unit.
    pub fraction: Option<i32>,
}

/// A fully resolved currency spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCurrency {
    /// ISO-style code.
    pub mnemonic: String,
    /// Full currency name.
    pub fullname: String,
    /// Minor units per major unit, always positive.
    pub fraction: i32,
}

impl CurrencySpec {
    /// Applies defaults and validates the spec.
    ///
    /// # Errors
    ///
    /// Returns `InvalidMnemonic` for a present-but-empty mnemonic and
    /// `InvalidFraction` for a non-positive fraction.
    pub fn resolve(self) -> Result<ResolvedCurrency, BookError> {
        let mnemonic = match self.mnemonic {
            Some(m) => {
                if m.trim().is_empty() {
                    return Err(BookError::InvalidMnemonic);
                }
                m
            }
            None => "USD".to_string(),
        };

        let fullname = self.fullname.unwrap_or_else(|| "US Dollar".to_string());

        let fraction = self.fraction.unwrap_or(100);
        if fraction <= 0 {
            return Err(BookError::InvalidFraction(fraction));
        }

        Ok(ResolvedCurrency {
            mnemonic,
            fullname,
            fraction,
        })
    }
}

/// Input for provisioning a book.
#[derive(Debug, Clone)]
pub struct ProvisionBookInput {
    /// Owning organization.
    pub organization_id: Uuid,
    /// Book name.
    pub name: String,
    /// Book description.
    pub description: Option<String>,
    /// First day of the fiscal year.
    pub fiscal_year_start: NaiveDate,
    /// Base currency specification.
    pub currency: CurrencySpec,
}

/// Everything created by a successful provisioning call.
#[derive(Debug, Clone)]
pub struct ProvisionedBook {
    /// The fully linked book.
    pub book: books::Model,
    /// The book's base currency commodity.
    pub base_currency: commodities::Model,
    /// The book's root account.
    pub root_account: accounts::Model,
}

/// Input for the allow-listed settings update; absent fields keep
/// their stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateBookSettingsInput {
    /// Use trading accounts for commodity movements.
    pub use_trading_accounts: Option<bool>,
    /// Show the split action field.
    pub use_split_action_field: Option<bool>,
    /// Days after which transactions become read-only.
    pub auto_readonly_days: Option<String>,
    /// Enable euro support.
    pub enable_euro_support: Option<bool>,
    /// Accounting period structure.
    pub accounting_period: Option<serde_json::Value>,
}

impl UpdateBookSettingsInput {
    /// Returns true when no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.use_trading_accounts.is_none()
            && self.use_split_action_field.is_none()
            && self.auto_readonly_days.is_none()
            && self.enable_euro_support.is_none()
            && self.accounting_period.is_none()
    }
}

/// Book repository: provisioning, listing, settings.
#[derive(Debug, Clone)]
pub struct BookRepository {
    db: DatabaseConnection,
}

impl BookRepository {
    /// Creates a new book repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Provisions a book with its base currency, root account, and
    /// settings as one all-or-nothing unit.
    ///
    /// Steps inside a serializable transaction:
    /// 1. insert the book with null link columns,
    /// 2. insert the base currency commodity,
    /// 3. insert the ROOT account (placeholder, hidden, no parent),
    /// 4. update the book with both references,
    /// 5. insert the settings row with fixed defaults.
    ///
    /// Any failure rolls everything back; no row from the call
    /// survives.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty name/mnemonic or a
    /// non-positive fraction, `OrganizationNotFound` for a missing or
    /// inactive organization, and `Database` when a statement fails
    /// (after rollback).
    pub async fn provision_book(
        &self,
        input: ProvisionBookInput,
    ) -> Result<ProvisionedBook, BookError> {
        if input.name.trim().is_empty() {
            return Err(BookError::InvalidName);
        }
        let currency = input.currency.resolve()?;

        let org = organizations::Entity::find_by_id(input.organization_id)
            .filter(organizations::Column::IsActive.eq(true))
            .one(&self.db)
            .await?;
        if org.is_none() {
            return Err(BookError::OrganizationNotFound(input.organization_id));
        }

        // Serializable so no reader can catch the book between the
        // initial insert and the link-back update.
        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::Serializable), None)
            .await?;

        let now = chrono::Utc::now().into();
        let book_id = Uuid::new_v4();

        // 1. Book with null currency/root references.
        let book = books::ActiveModel {
            id: Set(book_id),
            organization_id: Set(input.organization_id),
            name: Set(input.name),
            description: Set(input.description),
            fiscal_year_start: Set(input.fiscal_year_start),
            settings: Set(json!({})),
            default_currency_id: Set(None),
            root_account_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let book = book.insert(&txn).await?;

        // 2. Base currency scoped to the new book.
        let base_currency = commodities::ActiveModel {
            id: Set(Uuid::new_v4()),
            book_id: Set(book_id),
            namespace: Set("CURRENCY".to_string()),
            mnemonic: Set(currency.mnemonic),
            fullname: Set(currency.fullname),
            fraction: Set(currency.fraction),
            quote_source: Set(Some("CURRENCY".to_string())),
            get_quotes: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let base_currency = base_currency.insert(&txn).await?;

        // 3. Root account.
        let root_account = accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            book_id: Set(book_id),
            parent_id: Set(None),
            name: Set("Root Account".to_string()),
            account_type: Set(AccountType::Root),
            commodity_id: Set(base_currency.id),
            code: Set(None),
            description: Set(None),
            placeholder: Set(true),
            hidden: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let root_account = root_account.insert(&txn).await?;

        // 4. Close the circle: point the book at its commodity and root.
        let mut book_update: books::ActiveModel = book.into();
        book_update.default_currency_id = Set(Some(base_currency.id));
        book_update.root_account_id = Set(Some(root_account.id));
        book_update.updated_at = Set(now);
        let book = book_update.update(&txn).await?;

        // 5. Settings with fixed defaults.
        let settings = book_settings::ActiveModel {
            book_id: Set(book_id),
            use_trading_accounts: Set(false),
            use_split_action_field: Set(false),
            auto_readonly_days: Set("0".to_string()),
            enable_euro_support: Set(false),
            accounting_period: Set(json!({})),
            created_at: Set(now),
            updated_at: Set(now),
        };
        settings.insert(&txn).await?;

        txn.commit().await?;

        Ok(ProvisionedBook {
            book,
            base_currency,
            root_account,
        })
    }

    /// Lists an organization's books.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_organization(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<books::Model>, DbErr> {
        books::Entity::find()
            .filter(books::Column::OrganizationId.eq(organization_id))
            .all(&self.db)
            .await
    }

    /// Finds a book by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<books::Model>, DbErr> {
        books::Entity::find_by_id(id).one(&self.db).await
    }

    /// Reads a book's settings row.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_settings(
        &self,
        book_id: Uuid,
    ) -> Result<Option<book_settings::Model>, DbErr> {
        book_settings::Entity::find_by_id(book_id).one(&self.db).await
    }

    /// Applies an allow-listed partial update to a book's settings.
    ///
    /// # Errors
    ///
    /// Returns `EmptyUpdate` when no field is provided and
    /// `SettingsNotFound` when the book has no settings row.
    pub async fn update_settings(
        &self,
        book_id: Uuid,
        input: UpdateBookSettingsInput,
    ) -> Result<book_settings::Model, BookError> {
        if input.is_empty() {
            return Err(BookError::EmptyUpdate);
        }

        let settings = book_settings::Entity::find_by_id(book_id)
            .one(&self.db)
            .await?
            .ok_or(BookError::SettingsNotFound(book_id))?;

        let now = chrono::Utc::now().into();
        let mut active: book_settings::ActiveModel = settings.into();

        if let Some(v) = input.use_trading_accounts {
            active.use_trading_accounts = Set(v);
        }
        if let Some(v) = input.use_split_action_field {
            active.use_split_action_field = Set(v);
        }
        if let Some(v) = input.auto_readonly_days {
            active.auto_readonly_days = Set(v);
        }
        if let Some(v) = input.enable_euro_support {
            active.enable_euro_support = Set(v);
        }
        if let Some(v) = input.accounting_period {
            active.accounting_period = Set(v);
        }
        active.updated_at = Set(now);

        Ok(active.update(&self.db).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_spec_defaults_apply_only_when_absent() {
        let resolved = CurrencySpec::default().resolve().unwrap();
        assert_eq!(resolved.mnemonic, "USD");
        assert_eq!(resolved.fullname, "US Dollar");
        assert_eq!(resolved.fraction, 100);
    }

    #[test]
    fn test_currency_spec_keeps_provided_fields() {
        let resolved = CurrencySpec {
            mnemonic: Some("JPY".to_string()),
            fullname: Some("Japanese Yen".to_string()),
            fraction: Some(1),
        }
        .resolve()
        .unwrap();

        assert_eq!(resolved.mnemonic, "JPY");
        assert_eq!(resolved.fullname, "Japanese Yen");
        assert_eq!(resolved.fraction, 1);
    }

    #[test]
    fn test_currency_spec_rejects_empty_mnemonic() {
        let spec = CurrencySpec {
            mnemonic: Some("   ".to_string()),
            ..CurrencySpec::default()
        };
        assert!(matches!(spec.resolve(), Err(BookError::InvalidMnemonic)));
    }

    #[test]
    fn test_currency_spec_rejects_non_positive_fraction() {
        for fraction in [0, -1, -100] {
            let spec = CurrencySpec {
                fraction: Some(fraction),
                ..CurrencySpec::default()
            };
            assert!(matches!(
                spec.resolve(),
                Err(BookError::InvalidFraction(f)) if f == fraction
            ));
        }
    }

    #[test]
    fn test_settings_update_empty_detection() {
        assert!(UpdateBookSettingsInput::default().is_empty());
        assert!(
            !UpdateBookSettingsInput {
                use_trading_accounts: Some(true),
                ..UpdateBookSettingsInput::default()
            }
            .is_empty()
        );
    }
}
