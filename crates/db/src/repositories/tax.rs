//! Tax table repository: atomic creation and exact rate computation.
//!
//! A tax table and its entries are one unit: if any entry fails to
//! insert (missing account, wrong book), the header and every entry
//! inserted so far roll back together. Rates stay rational end to end;
//! only the presentation layer renders decimals.

use folio_core::tax::{self, RateError, Rational};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{
    accounts, books, sea_orm_active_enums::TaxEntryType, tax_table_entries, tax_tables,
};

/// Error types for tax table operations.
#[derive(Debug, thiserror::Error)]
pub enum TaxError {
    /// Book not found.
    #[error("Book not found: {0}")]
    BookNotFound(Uuid),

    /// An entry references a missing account.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// An entry references an account from a different book.
    #[error("Account belongs to a different book")]
    AccountWrongBook(Uuid),

    /// Tax table not found.
    #[error("Tax table not found: {0}")]
    TableNotFound(Uuid),

    /// Tax table name must not be empty.
    #[error("Tax table name must not be empty")]
    InvalidName,

    /// An entry's denominator is not positive.
    #[error("Entry denominator must be positive, got {0}")]
    InvalidDenominator(i64),

    /// Exact rate arithmetic failed.
    #[error("Rate computation failed: {0}")]
    Rate(#[from] RateError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for one tax table entry.
#[derive(Debug, Clone)]
pub struct CreateTaxEntryInput {
    /// Account the tax amount posts to.
    pub account_id: Uuid,
    /// Rate numerator.
    pub amount_num: i64,
    /// Rate denominator.
    pub amount_denom: i64,
    /// Entry type.
    pub entry_type: TaxEntryType,
    /// Presentation order among the table's entries.
    pub sort_order: i32,
}

/// Input for creating a tax table with its entries.
#[derive(Debug, Clone)]
pub struct CreateTaxTableInput {
    /// Book the table belongs to.
    pub book_id: Uuid,
    /// Table name.
    pub name: String,
    /// Whether this is the book's default table.
    pub is_default: bool,
    /// The component entries.
    pub entries: Vec<CreateTaxEntryInput>,
}

/// An entry joined with its target account's name.
#[derive(Debug, Clone)]
pub struct TaxEntryWithAccount {
    /// The entry row.
    pub entry: tax_table_entries::Model,
    /// Name of the account the entry posts to.
    pub account_name: String,
}

/// A tax table with entries and its combined rate.
#[derive(Debug, Clone)]
pub struct TaxTableWithEntries {
    /// The table header.
    pub table: tax_tables::Model,
    /// Entries ordered by sort_order.
    pub entries: Vec<TaxEntryWithAccount>,
    /// Exact sum of the component fractions.
    pub total_rate: Rational,
}

/// Tax table repository.
#[derive(Debug, Clone)]
pub struct TaxRepository {
    db: DatabaseConnection,
}

impl TaxRepository {
    /// Creates a new tax repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a tax table together with all its entries.
    ///
    /// Validation happens before any insert (name, denominators) and
    /// inside the transaction (every account must exist and belong to
    /// the table's book). Any failure rolls back the header and all
    /// entries inserted so far.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty name or non-positive
    /// denominator, `BookNotFound`/`AccountNotFound`/`AccountWrongBook`
    /// for broken references, and `Database` for statement failures
    /// (after rollback).
    pub async fn create_tax_table(
        &self,
        input: CreateTaxTableInput,
    ) -> Result<TaxTableWithEntries, TaxError> {
        if input.name.trim().is_empty() {
            return Err(TaxError::InvalidName);
        }
        for entry in &input.entries {
            if entry.amount_denom <= 0 {
                return Err(TaxError::InvalidDenominator(entry.amount_denom));
            }
        }

        let book = books::Entity::find_by_id(input.book_id).one(&self.db).await?;
        if book.is_none() {
            return Err(TaxError::BookNotFound(input.book_id));
        }

        let txn = self.db.begin().await?;
        let now = chrono::Utc::now().into();

        let table = tax_tables::ActiveModel {
            id: Set(Uuid::new_v4()),
            book_id: Set(input.book_id),
            name: Set(input.name),
            is_default: Set(input.is_default),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let table = table.insert(&txn).await?;

        let mut entries = Vec::with_capacity(input.entries.len());
        for entry in input.entries {
            let account = accounts::Entity::find_by_id(entry.account_id)
                .one(&txn)
                .await?;
            let account = match account {
                None => return Err(TaxError::AccountNotFound(entry.account_id)),
                Some(a) if a.book_id != input.book_id => {
                    return Err(TaxError::AccountWrongBook(entry.account_id));
                }
                Some(a) => a,
            };

            let row = tax_table_entries::ActiveModel {
                id: Set(Uuid::new_v4()),
                tax_table_id: Set(table.id),
                account_id: Set(entry.account_id),
                amount_num: Set(entry.amount_num),
                amount_denom: Set(entry.amount_denom),
                entry_type: Set(entry.entry_type),
                sort_order: Set(entry.sort_order),
                created_at: Set(now),
            };
            let row = row.insert(&txn).await?;

            entries.push(TaxEntryWithAccount {
                entry: row,
                account_name: account.name,
            });
        }

        txn.commit().await?;

        entries.sort_by_key(|e| e.entry.sort_order);
        let total_rate = sum_entries(entries.iter().map(|e| &e.entry))?;

        Ok(TaxTableWithEntries {
            table,
            entries,
            total_rate,
        })
    }

    /// Lists a book's active tax tables with entries and rates.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_book(&self, book_id: Uuid) -> Result<Vec<TaxTableWithEntries>, TaxError> {
        let tables = tax_tables::Entity::find()
            .filter(tax_tables::Column::BookId.eq(book_id))
            .filter(tax_tables::Column::Active.eq(true))
            .order_by_asc(tax_tables::Column::Name)
            .all(&self.db)
            .await?;

        let mut results = Vec::with_capacity(tables.len());
        for table in tables {
            let entries = self.entries_with_accounts(table.id).await?;
            let total_rate = sum_entries(entries.iter().map(|e| &e.entry))?;
            results.push(TaxTableWithEntries {
                table,
                entries,
                total_rate,
            });
        }

        Ok(results)
    }

    /// Finds one tax table with entries and rate.
    ///
    /// # Errors
    ///
    /// Returns `TableNotFound` if the table does not exist.
    pub async fn find_by_id(&self, id: Uuid) -> Result<TaxTableWithEntries, TaxError> {
        let table = tax_tables::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(TaxError::TableNotFound(id))?;

        let entries = self.entries_with_accounts(table.id).await?;
        let total_rate = sum_entries(entries.iter().map(|e| &e.entry))?;

        Ok(TaxTableWithEntries {
            table,
            entries,
            total_rate,
        })
    }

    /// Computes a table's combined rate as an exact rational.
    ///
    /// The sum is taken over all entries ordered by sort_order using
    /// cross-multiplied fraction addition - floating point never
    /// enters the computation.
    ///
    /// # Errors
    ///
    /// Returns `TableNotFound` if the table does not exist.
    pub async fn compute_total_rate(&self, table_id: Uuid) -> Result<Rational, TaxError> {
        let table = tax_tables::Entity::find_by_id(table_id)
            .one(&self.db)
            .await?
            .ok_or(TaxError::TableNotFound(table_id))?;

        let entries = tax_table_entries::Entity::find()
            .filter(tax_table_entries::Column::TaxTableId.eq(table.id))
            .order_by_asc(tax_table_entries::Column::SortOrder)
            .all(&self.db)
            .await?;

        sum_entries(entries.iter())
    }

    /// Loads a table's entries with account names, ordered by
    /// sort_order.
    async fn entries_with_accounts(
        &self,
        table_id: Uuid,
    ) -> Result<Vec<TaxEntryWithAccount>, TaxError> {
        let rows = tax_table_entries::Entity::find()
            .filter(tax_table_entries::Column::TaxTableId.eq(table_id))
            .order_by_asc(tax_table_entries::Column::SortOrder)
            .find_also_related(accounts::Entity)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(entry, account)| {
                account.map(|a| TaxEntryWithAccount {
                    entry,
                    account_name: a.name,
                })
            })
            .collect())
    }
}

/// Sums entry fractions exactly.
fn sum_entries<'a, I>(entries: I) -> Result<Rational, TaxError>
where
    I: Iterator<Item = &'a tax_table_entries::Model>,
{
    let components = entries
        .map(|e| Rational::new(e.amount_num, e.amount_denom))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(tax::total_rate(components)?)
}
