//! User role repository for role assignment operations.
//!
//! At most one role per (user, organization) pair. The unique index on
//! that pair is the arbiter for concurrent assignments: the first
//! insert wins and the second surfaces as a conflict.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    QueryFilter, Set, SqlErr,
};
use uuid::Uuid;

use crate::entities::{organizations, sea_orm_active_enums::UserRole, user_roles};

/// Error types for role assignment operations.
#[derive(Debug, thiserror::Error)]
pub enum UserRoleError {
    /// The user already holds a role in this organization.
    #[error("User already has a role in this organization")]
    AlreadyAssigned,

    /// Role assignment not found.
    #[error("Role assignment not found: {0}")]
    NotFound(Uuid),

    /// User not found.
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    /// Organization not found.
    #[error("Organization not found: {0}")]
    OrganizationNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for assigning a role.
#[derive(Debug, Clone)]
pub struct AssignRoleInput {
    /// The user receiving the role.
    pub user_id: Uuid,
    /// The organization the role is scoped to.
    pub organization_id: Uuid,
    /// The role to assign.
    pub role: UserRole,
    /// Free-form permissions map.
    pub permissions: serde_json::Value,
}

/// A role assignment joined with its organization's name.
#[derive(Debug, Clone)]
pub struct UserRoleWithOrganization {
    /// The role assignment.
    pub role: user_roles::Model,
    /// Name of the organization it applies to.
    pub organization_name: String,
}

/// User role repository.
#[derive(Debug, Clone)]
pub struct UserRoleRepository {
    db: DatabaseConnection,
}

impl UserRoleRepository {
    /// Creates a new user role repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Assigns a role to a user within an organization.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyAssigned` if the (user, organization) pair
    /// already has a role - the unique constraint decides, so two
    /// concurrent assignments cannot both succeed. The existing row is
    /// left untouched.
    pub async fn assign(
        &self,
        input: AssignRoleInput,
    ) -> Result<user_roles::Model, UserRoleError> {
        let user = crate::entities::users::Entity::find_by_id(input.user_id)
            .one(&self.db)
            .await?;
        if user.is_none() {
            return Err(UserRoleError::UserNotFound(input.user_id));
        }

        let org = organizations::Entity::find_by_id(input.organization_id)
            .one(&self.db)
            .await?;
        if org.is_none() {
            return Err(UserRoleError::OrganizationNotFound(input.organization_id));
        }

        let now = chrono::Utc::now().into();

        let role = user_roles::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(input.user_id),
            organization_id: Set(input.organization_id),
            role: Set(input.role),
            permissions: Set(input.permissions),
            created_at: Set(now),
            updated_at: Set(now),
        };

        role.insert(&self.db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => UserRoleError::AlreadyAssigned,
            _ => UserRoleError::Database(e),
        })
    }

    /// Lists a user's role assignments with organization names.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<UserRoleWithOrganization>, UserRoleError> {
        let rows = user_roles::Entity::find()
            .filter(user_roles::Column::UserId.eq(user_id))
            .find_also_related(organizations::Entity)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(role, org)| {
                org.map(|o| UserRoleWithOrganization {
                    role,
                    organization_name: o.name,
                })
            })
            .collect())
    }

    /// Finds the role a user holds in an organization, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_user_and_org(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> Result<Option<user_roles::Model>, DbErr> {
        user_roles::Entity::find()
            .filter(user_roles::Column::UserId.eq(user_id))
            .filter(user_roles::Column::OrganizationId.eq(organization_id))
            .one(&self.db)
            .await
    }

    /// Finds a role assignment by its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<user_roles::Model>, DbErr> {
        user_roles::Entity::find_by_id(id).one(&self.db).await
    }

    /// Updates a role assignment by its ID.
    ///
    /// Absent fields keep their stored value.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no assignment with the ID exists.
    pub async fn update(
        &self,
        id: Uuid,
        role: Option<UserRole>,
        permissions: Option<serde_json::Value>,
    ) -> Result<user_roles::Model, UserRoleError> {
        let existing = user_roles::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(UserRoleError::NotFound(id))?;

        let now = chrono::Utc::now().into();
        let mut active: user_roles::ActiveModel = existing.into();

        if let Some(role) = role {
            active.role = Set(role);
        }
        if let Some(permissions) = permissions {
            active.permissions = Set(permissions);
        }
        active.updated_at = Set(now);

        Ok(active.update(&self.db).await?)
    }

    /// Removes a role assignment by its ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no assignment with the ID exists.
    pub async fn remove(&self, id: Uuid) -> Result<(), UserRoleError> {
        let existing = user_roles::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(UserRoleError::NotFound(id))?;

        existing.delete(&self.db).await?;
        Ok(())
    }
}
