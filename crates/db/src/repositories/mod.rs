//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. Multi-statement units (book provisioning, tax table
//! creation, registration) each run inside one transaction.

pub mod account;
pub mod book;
pub mod commodity;
pub mod organization;
pub mod tax;
pub mod user;
pub mod user_role;

pub use account::{AccountError, AccountRepository, CreateAccountInput};
pub use book::{
    BookError, BookRepository, CurrencySpec, ProvisionBookInput, ProvisionedBook,
    ResolvedCurrency, UpdateBookSettingsInput,
};
pub use commodity::{CommodityError, CommodityRepository, CreateCommodityInput};
pub use organization::{
    CreateOrganizationInput, OrganizationError, OrganizationRepository, UpdateOrganizationInput,
};
pub use tax::{
    CreateTaxEntryInput, CreateTaxTableInput, TaxEntryWithAccount, TaxError, TaxRepository,
    TaxTableWithEntries,
};
pub use user::{RegisterInput, RegisteredUser, UserRepository};
pub use user_role::{
    AssignRoleInput, UserRoleError, UserRoleRepository, UserRoleWithOrganization,
};
