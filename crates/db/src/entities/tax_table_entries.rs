//! `SeaORM` Entity for the tax_table_entries table.
//!
//! Entries are exclusively owned by their tax table (ON DELETE
//! CASCADE); the rate is an exact fraction `amount_num / amount_denom`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::TaxEntryType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "tax_table_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tax_table_id: Uuid,
    pub account_id: Uuid,
    pub amount_num: i64,
    pub amount_denom: i64,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub entry_type: TaxEntryType,
    pub sort_order: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tax_tables::Entity",
        from = "Column::TaxTableId",
        to = "super::tax_tables::Column::Id"
    )]
    TaxTables,
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id"
    )]
    Accounts,
}

impl Related<super::tax_tables::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TaxTables.def()
    }
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
