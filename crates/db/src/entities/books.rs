//! `SeaORM` Entity for the books table.
//!
//! `default_currency_id` and `root_account_id` are nullable only for
//! the window inside the provisioning transaction; committed rows
//! always carry both references.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub fiscal_year_start: Date,
    pub settings: Json,
    pub default_currency_id: Option<Uuid>,
    pub root_account_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::organizations::Entity",
        from = "Column::OrganizationId",
        to = "super::organizations::Column::Id"
    )]
    Organizations,
    #[sea_orm(has_many = "super::commodities::Entity")]
    Commodities,
    #[sea_orm(has_many = "super::accounts::Entity")]
    Accounts,
    #[sea_orm(has_one = "super::book_settings::Entity")]
    BookSettings,
    #[sea_orm(has_many = "super::tax_tables::Entity")]
    TaxTables,
}

impl Related<super::organizations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organizations.def()
    }
}

impl Related<super::commodities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Commodities.def()
    }
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl Related<super::book_settings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BookSettings.def()
    }
}

impl Related<super::tax_tables::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TaxTables.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
