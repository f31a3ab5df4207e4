//! PostgreSQL adapters built on Diesel, `diesel-async`, and `bb8`.
//!
//! Adapters only translate between Diesel rows and domain types. Row structs
//! (`models`) and table definitions (`schema`) stay private to this module,
//! and every database failure is mapped onto the calling port's error type.
//!
//! # Example
//!
//! ```rust,no_run
//! use longbox::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/longbox")).await?;
//! let users = DieselUserRepository::new(pool);
//! # let _ = users;
//! # Ok(())
//! # }
//! ```

mod diesel_catalogue_read_repository;
pub(crate) mod diesel_helpers;
mod diesel_publisher_repository;
mod diesel_seed_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_catalogue_read_repository::DieselCatalogueReadRepository;
pub use diesel_publisher_repository::DieselPublisherRepository;
pub use diesel_seed_repository::DieselSeedRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
