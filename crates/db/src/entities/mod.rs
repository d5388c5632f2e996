//! `SeaORM` entity definitions.

pub mod accounts;
pub mod book_settings;
pub mod books;
pub mod commodities;
pub mod organizations;
pub mod sea_orm_active_enums;
pub mod tax_table_entries;
pub mod tax_tables;
pub mod user_roles;
pub mod users;
