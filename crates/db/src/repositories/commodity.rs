//! Commodity repository for currency/unit records scoped to a book.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::entities::{books, commodities};

/// Error types for commodity operations.
#[derive(Debug, thiserror::Error)]
pub enum CommodityError {
    /// Book not found.
    #[error("Book not found: {0}")]
    BookNotFound(Uuid),

    /// Fraction must be a positive integer.
    #[error("Commodity fraction must be positive, got {0}")]
    InvalidFraction(i32),

    /// Mnemonic must not be empty.
    #[error("Commodity mnemonic must not be empty")]
    InvalidMnemonic,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a commodity.
#[derive(Debug, Clone)]
pub struct CreateCommodityInput {
    /// Book the commodity belongs to.
    pub book_id: Uuid,
    /// Commodity namespace (e.g. "CURRENCY", "ISO4217").
    pub namespace: String,
    /// Short code, e.g. "EUR".
    pub mnemonic: String,
    /// Full name.
    pub fullname: String,
    /// Minor units per major unit.
    pub fraction: i32,
    /// Quote source tag.
    pub quote_source: Option<String>,
    /// Whether online quotes are fetched.
    pub get_quotes: bool,
}

/// Commodity repository.
#[derive(Debug, Clone)]
pub struct CommodityRepository {
    db: DatabaseConnection,
}

impl CommodityRepository {
    /// Creates a new commodity repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a commodity in a book.
    ///
    /// # Errors
    ///
    /// Returns an error if the fraction is not positive, the mnemonic
    /// is empty, or the book does not exist.
    pub async fn create_commodity(
        &self,
        input: CreateCommodityInput,
    ) -> Result<commodities::Model, CommodityError> {
        if input.fraction <= 0 {
            return Err(CommodityError::InvalidFraction(input.fraction));
        }
        if input.mnemonic.trim().is_empty() {
            return Err(CommodityError::InvalidMnemonic);
        }

        let book = books::Entity::find_by_id(input.book_id).one(&self.db).await?;
        if book.is_none() {
            return Err(CommodityError::BookNotFound(input.book_id));
        }

        let now = chrono::Utc::now().into();
        let commodity = commodities::ActiveModel {
            id: Set(Uuid::new_v4()),
            book_id: Set(input.book_id),
            namespace: Set(input.namespace),
            mnemonic: Set(input.mnemonic),
            fullname: Set(input.fullname),
            fraction: Set(input.fraction),
            quote_source: Set(input.quote_source),
            get_quotes: Set(input.get_quotes),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(commodity.insert(&self.db).await?)
    }

    /// Lists a book's commodities.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_book(&self, book_id: Uuid) -> Result<Vec<commodities::Model>, DbErr> {
        commodities::Entity::find()
            .filter(commodities::Column::BookId.eq(book_id))
            .all(&self.db)
            .await
    }

    /// Finds a commodity by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<commodities::Model>, DbErr> {
        commodities::Entity::find_by_id(id).one(&self.db).await
    }
}
