//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the user, project and transaction repository
//! ports, backed by `diesel-async` connections from a shared `bb8` pool.
//!
//! - Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//!   internal; only domain types cross the port boundary.
//! - Driver errors are logged at debug level and reduced to the port's
//!   `Connection`/`Query` variants, except the two named unique indexes on
//!   `transactions`, which map to their own variants.
//!
//! # Example
//!
//! ```ignore
//! use campus_hub::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/campus_hub")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_project_repository;
mod diesel_transaction_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_project_repository::DieselProjectRepository;
pub use diesel_transaction_repository::DieselTransactionRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
