//! Organization repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::entities::organizations;

/// Error types for organization operations.
#[derive(Debug, thiserror::Error)]
pub enum OrganizationError {
    /// Organization not found.
    #[error("Organization not found: {0}")]
    NotFound(Uuid),

    /// Organization name must not be empty.
    #[error("Organization name must not be empty")]
    InvalidName,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an organization.
#[derive(Debug, Clone, Default)]
pub struct CreateOrganizationInput {
    /// Organization name.
    pub name: String,
    /// Tax identifier.
    pub tax_id: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// City.
    pub city: Option<String>,
    /// State or province.
    pub state: Option<String>,
    /// Country.
    pub country: Option<String>,
    /// Postal code.
    pub postal_code: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Contact email.
    pub email: Option<String>,
}

/// Input for a partial organization update; absent fields keep their
/// stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateOrganizationInput {
    /// Organization name.
    pub name: Option<String>,
    /// Tax identifier.
    pub tax_id: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// City.
    pub city: Option<String>,
    /// State or province.
    pub state: Option<String>,
    /// Country.
    pub country: Option<String>,
    /// Postal code.
    pub postal_code: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Contact email.
    pub email: Option<String>,
}

/// Organization repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct OrganizationRepository {
    db: DatabaseConnection,
}

impl OrganizationRepository {
    /// Creates a new organization repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or the insert fails.
    pub async fn create(
        &self,
        input: CreateOrganizationInput,
    ) -> Result<organizations::Model, OrganizationError> {
        if input.name.trim().is_empty() {
            return Err(OrganizationError::InvalidName);
        }

        let now = chrono::Utc::now().into();
        let org = organizations::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            tax_id: Set(input.tax_id),
            address: Set(input.address),
            city: Set(input.city),
            state: Set(input.state),
            country: Set(input.country),
            postal_code: Set(input.postal_code),
            phone: Set(input.phone),
            email: Set(input.email),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(org.insert(&self.db).await?)
    }

    /// Finds an organization by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<organizations::Model>, DbErr> {
        organizations::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds an active organization by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_active_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<organizations::Model>, DbErr> {
        organizations::Entity::find_by_id(id)
            .filter(organizations::Column::IsActive.eq(true))
            .one(&self.db)
            .await
    }

    /// Partially updates an organization; only provided fields change.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no organization with the ID exists.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateOrganizationInput,
    ) -> Result<organizations::Model, OrganizationError> {
        let org = organizations::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(OrganizationError::NotFound(id))?;

        let now = chrono::Utc::now().into();
        let mut active: organizations::ActiveModel = org.into();

        if let Some(name) = input.name {
            if name.trim().is_empty() {
                return Err(OrganizationError::InvalidName);
            }
            active.name = Set(name);
        }
        if let Some(tax_id) = input.tax_id {
            active.tax_id = Set(Some(tax_id));
        }
        if let Some(address) = input.address {
            active.address = Set(Some(address));
        }
        if let Some(city) = input.city {
            active.city = Set(Some(city));
        }
        if let Some(state) = input.state {
            active.state = Set(Some(state));
        }
        if let Some(country) = input.country {
            active.country = Set(Some(country));
        }
        if let Some(postal_code) = input.postal_code {
            active.postal_code = Set(Some(postal_code));
        }
        if let Some(phone) = input.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(email) = input.email {
            active.email = Set(Some(email));
        }
        active.updated_at = Set(now);

        Ok(active.update(&self.db).await?)
    }

    /// Soft-deletes an organization by flipping its active flag.
    ///
    /// Rows are never physically removed so historical references stay
    /// valid.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no organization with the ID exists.
    pub async fn deactivate(&self, id: Uuid) -> Result<organizations::Model, OrganizationError> {
        let org = organizations::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(OrganizationError::NotFound(id))?;

        let now = chrono::Utc::now().into();
        let mut active: organizations::ActiveModel = org.into();
        active.is_active = Set(false);
        active.updated_at = Set(now);

        Ok(active.update(&self.db).await?)
    }
}
