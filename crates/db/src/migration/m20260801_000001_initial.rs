//! Initial database migration.
//!
//! Creates all enums, tables, constraints, and indexes. The circular
//! reference between books and commodities/accounts is resolved by
//! creating books first with nullable link columns and adding the
//! foreign keys afterwards.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: TENANCY
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(ORGANIZATIONS_SQL).await?;
        db.execute_unprepared(USER_ROLES_SQL).await?;

        // ============================================================
        // PART 3: BOOKS, COMMODITIES, CHART OF ACCOUNTS
        // ============================================================
        db.execute_unprepared(BOOKS_SQL).await?;
        db.execute_unprepared(COMMODITIES_SQL).await?;
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(BOOK_LINKS_SQL).await?;
        db.execute_unprepared(BOOK_SETTINGS_SQL).await?;

        // ============================================================
        // PART 4: TAX TABLES
        // ============================================================
        db.execute_unprepared(TAX_TABLES_SQL).await?;
        db.execute_unprepared(TAX_TABLE_ENTRIES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- User roles (one per user per organization)
CREATE TYPE user_role AS ENUM (
    'admin',
    'manager',
    'accountant',
    'viewer'
);

-- Account types; ROOT is reserved for the provisioning transaction
CREATE TYPE account_type AS ENUM (
    'ROOT',
    'ASSET',
    'BANK',
    'CASH',
    'CREDIT',
    'LIABILITY',
    'EQUITY',
    'INCOME',
    'EXPENSE',
    'RECEIVABLE',
    'PAYABLE',
    'TRADING'
);

-- Tax table entry types
CREATE TYPE tax_entry_type AS ENUM (
    'PERCENT'
);
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    first_name VARCHAR(255) NOT NULL,
    last_name VARCHAR(255) NOT NULL,
    phone VARCHAR(50),
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_users_email ON users(email) WHERE is_active = true;
";

const ORGANIZATIONS_SQL: &str = r"
CREATE TABLE organizations (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    tax_id VARCHAR(100),
    address TEXT,
    city VARCHAR(100),
    state VARCHAR(100),
    country VARCHAR(100),
    postal_code VARCHAR(20),
    phone VARCHAR(50),
    email VARCHAR(255),
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const USER_ROLES_SQL: &str = r"
CREATE TABLE user_roles (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    role user_role NOT NULL,
    permissions JSONB NOT NULL DEFAULT '{}',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (user_id, organization_id)
);

CREATE INDEX idx_user_roles_org ON user_roles(organization_id);
";

const BOOKS_SQL: &str = r"
CREATE TABLE books (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    description TEXT,
    fiscal_year_start DATE NOT NULL,
    settings JSONB NOT NULL DEFAULT '{}',
    -- Link columns are nullable; the provisioning transaction fills
    -- them once the commodity and root account exist. Foreign keys are
    -- added after those tables are created.
    default_currency_id UUID,
    root_account_id UUID,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_books_org ON books(organization_id);
";

const COMMODITIES_SQL: &str = r"
CREATE TABLE commodities (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    book_id UUID NOT NULL REFERENCES books(id) ON DELETE CASCADE,
    namespace VARCHAR(50) NOT NULL,
    mnemonic VARCHAR(50) NOT NULL,
    fullname VARCHAR(255) NOT NULL,
    fraction INTEGER NOT NULL DEFAULT 100,
    quote_source VARCHAR(50),
    get_quotes BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_fraction_positive CHECK (fraction > 0)
);

CREATE INDEX idx_commodities_book ON commodities(book_id);
";

const ACCOUNTS_SQL: &str = r#"
CREATE TABLE accounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    book_id UUID NOT NULL REFERENCES books(id) ON DELETE CASCADE,
    parent_id UUID REFERENCES accounts(id),
    name VARCHAR(255) NOT NULL,
    "type" account_type NOT NULL,
    commodity_id UUID NOT NULL REFERENCES commodities(id),
    code VARCHAR(100),
    description TEXT,
    placeholder BOOLEAN NOT NULL DEFAULT false,
    hidden BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    -- Only the root may omit a parent
    CONSTRAINT chk_root_has_no_parent
        CHECK (("type" = 'ROOT' AND parent_id IS NULL) OR ("type" <> 'ROOT' AND parent_id IS NOT NULL))
);

-- Exactly one ROOT account per book
CREATE UNIQUE INDEX idx_accounts_one_root_per_book ON accounts(book_id) WHERE "type" = 'ROOT';

CREATE INDEX idx_accounts_book ON accounts(book_id);
CREATE INDEX idx_accounts_parent ON accounts(parent_id) WHERE parent_id IS NOT NULL;
"#;

const BOOK_LINKS_SQL: &str = r"
ALTER TABLE books
    ADD CONSTRAINT fk_books_default_currency
        FOREIGN KEY (default_currency_id) REFERENCES commodities(id),
    ADD CONSTRAINT fk_books_root_account
        FOREIGN KEY (root_account_id) REFERENCES accounts(id);
";

const BOOK_SETTINGS_SQL: &str = r"
CREATE TABLE book_settings (
    book_id UUID PRIMARY KEY REFERENCES books(id) ON DELETE CASCADE,
    use_trading_accounts BOOLEAN NOT NULL DEFAULT false,
    use_split_action_field BOOLEAN NOT NULL DEFAULT false,
    auto_readonly_days VARCHAR(10) NOT NULL DEFAULT '0',
    enable_euro_support BOOLEAN NOT NULL DEFAULT false,
    accounting_period JSONB NOT NULL DEFAULT '{}',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const TAX_TABLES_SQL: &str = r"
CREATE TABLE tax_tables (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    book_id UUID NOT NULL REFERENCES books(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    is_default BOOLEAN NOT NULL DEFAULT false,
    active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_tax_tables_book ON tax_tables(book_id) WHERE active = true;
";

const TAX_TABLE_ENTRIES_SQL: &str = r#"
CREATE TABLE tax_table_entries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tax_table_id UUID NOT NULL REFERENCES tax_tables(id) ON DELETE CASCADE,
    account_id UUID NOT NULL REFERENCES accounts(id),
    amount_num BIGINT NOT NULL,
    amount_denom BIGINT NOT NULL DEFAULT 100,
    "type" tax_entry_type NOT NULL DEFAULT 'PERCENT',
    sort_order INTEGER NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_denom_positive CHECK (amount_denom > 0)
);

CREATE INDEX idx_tax_entries_table ON tax_table_entries(tax_table_id);
"#;

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS tax_table_entries CASCADE;
DROP TABLE IF EXISTS tax_tables CASCADE;
DROP TABLE IF EXISTS book_settings CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;
DROP TABLE IF EXISTS commodities CASCADE;
DROP TABLE IF EXISTS books CASCADE;
DROP TABLE IF EXISTS user_roles CASCADE;
DROP TABLE IF EXISTS organizations CASCADE;
DROP TABLE IF EXISTS users CASCADE;
DROP TYPE IF EXISTS tax_entry_type;
DROP TYPE IF EXISTS account_type;
DROP TYPE IF EXISTS user_role;
";
