//! `SeaORM` Entity for the accounts table.
//!
//! Accounts form a tree per book; exactly one row per book has type
//! ROOT (partial unique index), and only the ROOT row has a null
//! parent.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::AccountType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub book_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub commodity_id: Uuid,
    pub code: Option<String>,
    pub description: Option<String>,
    pub placeholder: bool,
    pub hidden: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::books::Entity",
        from = "Column::BookId",
        to = "super::books::Column::Id"
    )]
    Books,
    #[sea_orm(
        belongs_to = "super::commodities::Entity",
        from = "Column::CommodityId",
        to = "super::commodities::Column::Id"
    )]
    Commodities,
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id"
    )]
    SelfRef,
    #[sea_orm(has_many = "super::tax_table_entries::Entity")]
    TaxTableEntries,
}

impl Related<super::books::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Books.def()
    }
}

impl Related<super::commodities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Commodities.def()
    }
}

impl Related<super::tax_table_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TaxTableEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
