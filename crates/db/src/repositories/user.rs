//! User repository for database operations.
//!
//! Registration is the one place a user, an organization, and the
//! initial admin role assignment are created together - it is the only
//! path that grants admin without an explicit assignment call.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set, TransactionTrait,
};
use serde_json::json;
use uuid::Uuid;

use crate::entities::{organizations, sea_orm_active_enums::UserRole, user_roles, users};

/// Input for registering a user together with their organization.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    /// User email.
    pub email: String,
    /// Argon2id password hash (hashing happens in the core crate).
    pub password_hash: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Organization name.
    pub org_name: String,
    /// Organization tax identifier.
    pub org_tax_id: Option<String>,
    /// Organization address.
    pub org_address: Option<String>,
}

/// Everything created by registration.
#[derive(Debug, Clone)]
pub struct RegisteredUser {
    /// The new user.
    pub user: users::Model,
    /// The new organization.
    pub organization: organizations::Model,
    /// The admin role assignment linking the two.
    pub role: user_roles::Model,
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Checks if an email is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_exists(&self, email: &str) -> Result<bool, DbErr> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Registers a user with a fresh organization and admin role.
    ///
    /// The user, organization, and role rows are inserted in one
    /// transaction: either all three exist afterwards or none do. The
    /// role is always admin with permissions `{"all": true}`.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails (the transaction rolls
    /// back).
    pub async fn register_with_organization(
        &self,
        input: RegisterInput,
    ) -> Result<RegisteredUser, DbErr> {
        let txn = self.db.begin().await?;

        let now = chrono::Utc::now().into();

        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(input.email),
            password_hash: Set(input.password_hash),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            phone: Set(input.phone.clone()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let user = user.insert(&txn).await?;

        // Org contact details default to the registering user's.
        let organization = organizations::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.org_name),
            tax_id: Set(input.org_tax_id),
            address: Set(input.org_address),
            city: Set(None),
            state: Set(None),
            country: Set(None),
            postal_code: Set(None),
            phone: Set(input.phone),
            email: Set(Some(user.email.clone())),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let organization = organization.insert(&txn).await?;

        let role = user_roles::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user.id),
            organization_id: Set(organization.id),
            role: Set(UserRole::Admin),
            permissions: Set(json!({ "all": true })),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let role = role.insert(&txn).await?;

        txn.commit().await?;

        Ok(RegisteredUser {
            user,
            organization,
            role,
        })
    }
}
